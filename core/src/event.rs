//! Desk events: the append-only audit trail.
//!
//! RULE: Every intake decision and every status edit, accepted or
//! rejected, is recorded. Variants are only ever appended.

use crate::{
    complaint::{ComplaintStatus, Priority},
    types::{ComplaintId, DepartmentName, Timestamp},
};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum DeskEvent {
    ComplaintFiled {
        at: Timestamp,
        complaint_id: ComplaintId,
        department: DepartmentName,
        priority: Priority,
    },
    DuplicateRejected {
        at: Timestamp,
        duplicate_of: ComplaintId,
        location: String,
    },
    StatusChanged {
        at: Timestamp,
        complaint_id: ComplaintId,
        from: ComplaintStatus,
        to: ComplaintStatus,
        actor_id: String,
    },
    TransitionRejected {
        at: Timestamp,
        complaint_id: ComplaintId,
        requested: ComplaintStatus,
        actor_id: String,
        reason: String,
    },
}

impl DeskEvent {
    /// Stable name for the event_type column.
    pub fn type_name(&self) -> &'static str {
        match self {
            Self::ComplaintFiled { .. } => "complaint_filed",
            Self::DuplicateRejected { .. } => "duplicate_rejected",
            Self::StatusChanged { .. } => "status_changed",
            Self::TransitionRejected { .. } => "transition_rejected",
        }
    }

    pub fn at(&self) -> Timestamp {
        match self {
            Self::ComplaintFiled { at, .. }
            | Self::DuplicateRejected { at, .. }
            | Self::StatusChanged { at, .. }
            | Self::TransitionRejected { at, .. } => *at,
        }
    }

    /// The complaint the event is about. Duplicate rejections point at the
    /// record that caused them.
    pub fn complaint_id(&self) -> &str {
        match self {
            Self::ComplaintFiled { complaint_id, .. }
            | Self::StatusChanged { complaint_id, .. }
            | Self::TransitionRejected { complaint_id, .. } => complaint_id,
            Self::DuplicateRejected { duplicate_of, .. } => duplicate_of,
        }
    }
}

/// A persisted event row.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EventLogEntry {
    pub id: Option<i64>,
    pub complaint_id: Option<ComplaintId>,
    pub event_type: String,
    pub payload: String,
    pub created_at: Timestamp,
}

impl EventLogEntry {
    pub fn from_event(event: &DeskEvent) -> serde_json::Result<Self> {
        Ok(Self {
            id: None,
            complaint_id: Some(event.complaint_id().to_string()),
            event_type: event.type_name().to_string(),
            payload: serde_json::to_string(event)?,
            created_at: event.at(),
        })
    }

    pub fn decode(&self) -> serde_json::Result<DeskEvent> {
        serde_json::from_str(&self.payload)
    }
}
