//! Complaint lifecycle state machine.
//!
//!   New → Seen → Assigned → In Progress → Completed → Closed
//!
//! Strictly linear: no skips, no cycles. Closed is terminal.
//! Invalid requests are rejected, never clamped or advanced further.

use crate::{
    complaint::{Complaint, ComplaintStatus},
    error::{DeskError, DeskResult},
    session::EditCapability,
    types::{ComplaintId, Timestamp},
};
use serde::{Deserialize, Serialize};

/// Allowed successors of `current`: the next state, or none from Closed.
pub fn next_statuses(current: ComplaintStatus) -> &'static [ComplaintStatus] {
    use ComplaintStatus::*;
    match current {
        New => &[Seen],
        Seen => &[Assigned],
        Assigned => &[InProgress],
        InProgress => &[Completed],
        Completed => &[Closed],
        Closed => &[],
    }
}

pub fn can_transition(from: ComplaintStatus, to: ComplaintStatus) -> bool {
    next_statuses(from).contains(&to)
}

/// A request to move one complaint to its next status.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct StatusUpdate {
    pub complaint_id: ComplaintId,
    pub requested_status: ComplaintStatus,
    #[serde(default)]
    pub worker_notes: Option<String>,
    #[serde(default)]
    pub assigned_worker: Option<String>,
}

impl StatusUpdate {
    pub fn new(complaint_id: impl Into<ComplaintId>, requested_status: ComplaintStatus) -> Self {
        Self {
            complaint_id: complaint_id.into(),
            requested_status,
            worker_notes: None,
            assigned_worker: None,
        }
    }

    pub fn with_notes(mut self, notes: impl Into<String>) -> Self {
        self.worker_notes = Some(notes.into());
        self
    }

    pub fn with_worker(mut self, worker: impl Into<String>) -> Self {
        self.assigned_worker = Some(worker.into());
        self
    }
}

/// The caller's capability must name the complaint's department.
pub fn authorize(capability: Option<&EditCapability>, complaint: &Complaint) -> DeskResult<()> {
    match capability {
        Some(cap) if cap.permits(&complaint.department) => Ok(()),
        _ => Err(DeskError::Unauthorized {
            complaint_id: complaint.id.clone(),
            department: complaint.department.clone(),
        }),
    }
}

pub fn validate_transition(complaint: &Complaint, requested: ComplaintStatus) -> DeskResult<()> {
    if can_transition(complaint.status, requested) {
        Ok(())
    } else {
        Err(DeskError::InvalidTransition {
            complaint_id: complaint.id.clone(),
            from: complaint.status.to_string(),
            to: requested.to_string(),
        })
    }
}

/// Authorize, validate, and produce the updated record.
/// The input record is left untouched; persisting the result is the caller's job.
pub fn apply_transition(
    complaint: &Complaint,
    update: &StatusUpdate,
    capability: Option<&EditCapability>,
    now: Timestamp,
) -> DeskResult<Complaint> {
    authorize(capability, complaint)?;
    validate_transition(complaint, update.requested_status)?;

    let mut next = complaint.clone();
    next.status = update.requested_status;
    if let Some(notes) = non_empty(&update.worker_notes) {
        next.worker_notes = Some(notes.to_string());
    }
    if let Some(worker) = non_empty(&update.assigned_worker) {
        next.assigned_worker = Some(worker.to_string());
    }
    // updated_at never precedes created_at, even under a skewed clock.
    next.updated_at = now.max(complaint.created_at);
    Ok(next)
}

fn non_empty(value: &Option<String>) -> Option<&str> {
    value.as_deref().filter(|v| !v.is_empty())
}
