//! Shared primitive types used across the complaint desk.

use chrono::{DateTime, Utc};

/// Every instant the desk records or compares against.
pub type Timestamp = DateTime<Utc>;

/// A stable, unique complaint identifier assigned by the store.
pub type ComplaintId = String;

/// Display name of a department. This is the foreign key stored on a complaint.
pub type DepartmentName = String;
