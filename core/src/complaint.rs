//! Complaint records and the enumerations stored on them.

use crate::{
    error::DeskError,
    types::{ComplaintId, DepartmentName, Timestamp},
};
use serde::{Deserialize, Serialize};
use std::{fmt, str::FromStr};

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum Priority {
    High,
    Medium,
    Low,
}

impl Priority {
    pub const ALL: [Priority; 3] = [Priority::High, Priority::Medium, Priority::Low];

    /// Sort rank: High=3, Medium=2, Low=1.
    pub fn rank(self) -> u8 {
        match self {
            Self::High => 3,
            Self::Medium => 2,
            Self::Low => 1,
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Self::High => "High",
            Self::Medium => "Medium",
            Self::Low => "Low",
        }
    }
}

impl fmt::Display for Priority {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Priority {
    type Err = DeskError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "High" => Ok(Self::High),
            "Medium" => Ok(Self::Medium),
            "Low" => Ok(Self::Low),
            other => Err(DeskError::InvalidValue {
                field: "priority",
                value: other.to_string(),
            }),
        }
    }
}

/// Resolution workflow states, in lifecycle order.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum ComplaintStatus {
    New,
    Seen,
    Assigned,
    #[serde(rename = "In Progress")]
    InProgress,
    Completed,
    Closed,
}

impl ComplaintStatus {
    pub const ALL: [ComplaintStatus; 6] = [
        ComplaintStatus::New,
        ComplaintStatus::Seen,
        ComplaintStatus::Assigned,
        ComplaintStatus::InProgress,
        ComplaintStatus::Completed,
        ComplaintStatus::Closed,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            Self::New => "New",
            Self::Seen => "Seen",
            Self::Assigned => "Assigned",
            Self::InProgress => "In Progress",
            Self::Completed => "Completed",
            Self::Closed => "Closed",
        }
    }

    /// Completed and Closed complaints no longer count toward the backlog.
    pub fn is_open(self) -> bool {
        !matches!(self, Self::Completed | Self::Closed)
    }
}

impl fmt::Display for ComplaintStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ComplaintStatus {
    type Err = DeskError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|status| status.as_str() == s)
            .ok_or_else(|| DeskError::InvalidValue {
                field: "status",
                value: s.to_string(),
            })
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Complaint {
    pub id: ComplaintId,
    pub citizen_name: String,
    pub department: DepartmentName,
    pub description: String,
    pub location: String,
    pub priority: Priority,
    pub status: ComplaintStatus,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
    #[serde(default)]
    pub photos: Vec<String>,
    pub assigned_worker: Option<String>,
    pub worker_notes: Option<String>,
    /// Optimistic-concurrency stamp, bumped on every successful write.
    #[serde(default = "first_version")]
    pub version: u64,
}

fn first_version() -> u64 {
    1
}

impl Complaint {
    /// Attach a store-assigned identity to a freshly classified draft.
    pub fn from_draft(id: ComplaintId, draft: ComplaintDraft) -> Self {
        Self {
            id,
            citizen_name: draft.citizen_name,
            department: draft.department,
            description: draft.description,
            location: draft.location,
            priority: draft.priority,
            status: draft.status,
            created_at: draft.created_at,
            updated_at: draft.updated_at,
            photos: draft.photos,
            assigned_worker: None,
            worker_notes: None,
            version: first_version(),
        }
    }

    pub fn has_photos(&self) -> bool {
        !self.photos.is_empty()
    }

    /// Hours between creation and the last update.
    pub fn hours_open(&self) -> f64 {
        (self.updated_at - self.created_at).num_milliseconds() as f64 / 3_600_000.0
    }
}

/// A classified complaint that has not yet been given an identity.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ComplaintDraft {
    pub citizen_name: String,
    pub department: DepartmentName,
    pub description: String,
    pub location: String,
    pub priority: Priority,
    pub status: ComplaintStatus,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
    pub photos: Vec<String>,
}

/// Raw citizen submission, as received by the intake path.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Submission {
    pub citizen_name: String,
    pub description: String,
    pub location: String,
    #[serde(default)]
    pub photos: Vec<String>,
}
