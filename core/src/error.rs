use crate::types::ComplaintId;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum DeskError {
    #[error("Database error: {0}")]
    Database(#[from] rusqlite::Error),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("Invalid transition for {complaint_id}: {from} -> {to}")]
    InvalidTransition {
        complaint_id: ComplaintId,
        from: String,
        to: String,
    },

    #[error("Actor may not edit complaint {complaint_id} in department '{department}'")]
    Unauthorized {
        complaint_id: ComplaintId,
        department: String,
    },

    #[error("Unknown department '{name}'")]
    UnknownDepartment { name: String },

    #[error("Duplicate complaint at '{location}'")]
    DuplicateComplaint { location: String },

    #[error("Complaint '{complaint_id}' not found")]
    ComplaintNotFound { complaint_id: ComplaintId },

    #[error("Stale write to {complaint_id}: expected version {expected}")]
    StaleWrite {
        complaint_id: ComplaintId,
        expected: u64,
    },

    #[error("Invalid {field} value '{value}'")]
    InvalidValue { field: &'static str, value: String },

    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

pub type DeskResult<T> = Result<T, DeskError>;
