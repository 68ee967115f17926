use crate::{complaint::Submission, lifecycle::StatusUpdate, query::ComplaintQuery};
use serde::{Deserialize, Serialize};

/// Requests a front end may send to the desk runner, one per line.
/// Variants are only ever appended.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(tag = "cmd", rename_all = "snake_case")]
pub enum DeskCommand {
    // ── Session ───────────────────────────────────
    Login { username: String, secret: String },
    Logout,

    // ── Intake and lifecycle ──────────────────────
    Submit {
        #[serde(flatten)]
        submission: Submission,
    },
    UpdateStatus {
        #[serde(flatten)]
        update: StatusUpdate,
    },

    // ── Read paths ────────────────────────────────
    List {
        #[serde(default)]
        query: ComplaintQuery,
    },
    Dashboard,
    Analytics,

    Quit,
}
