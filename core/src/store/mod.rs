//! SQLite persistence layer.
//!
//! RULE: Only the store talks to the database.
//! The desk calls ComplaintStore methods; it never executes SQL directly.

use crate::{
    complaint::Complaint,
    error::{DeskError, DeskResult},
    event::{DeskEvent, EventLogEntry},
    types::Timestamp,
};
use chrono::DateTime;
use rusqlite::{params, Connection};

mod complaint;

/// What the desk needs from persistence. Complaints are never deleted.
pub trait ComplaintStore {
    fn all_complaints(&self) -> DeskResult<Vec<Complaint>>;

    fn get_complaint(&self, complaint_id: &str) -> DeskResult<Complaint>;

    fn insert_complaint(&self, complaint: &Complaint) -> DeskResult<()>;

    /// Write `complaint` only if the stored version still equals
    /// `complaint.version`. Returns the record with its new version.
    fn update_complaint(&self, complaint: &Complaint) -> DeskResult<Complaint>;

    fn append_event(&self, event: &DeskEvent) -> DeskResult<()>;
}

pub struct DeskStore {
    conn: Connection,
}

impl DeskStore {
    pub fn open(path: &str) -> DeskResult<Self> {
        let conn = Connection::open_with_flags(
            path,
            rusqlite::OpenFlags::SQLITE_OPEN_READ_WRITE
                | rusqlite::OpenFlags::SQLITE_OPEN_CREATE
                | rusqlite::OpenFlags::SQLITE_OPEN_URI,
        )?;
        // WAL mode only for real files (shared-memory and :memory: ignore it).
        let _ = conn.execute_batch("PRAGMA journal_mode=WAL;");
        conn.execute_batch("PRAGMA foreign_keys=ON;")?;
        Ok(Self { conn })
    }

    /// Open an in-memory database (used in tests).
    pub fn in_memory() -> DeskResult<Self> {
        let conn = Connection::open(":memory:")?;
        conn.execute_batch("PRAGMA foreign_keys=ON;")?;
        Ok(Self { conn })
    }

    /// Apply all schema migrations in order.
    pub fn migrate(&self) -> DeskResult<()> {
        self.conn
            .execute_batch(include_str!("../../../migrations/001_foundation.sql"))?;
        self.conn
            .execute_batch(include_str!("../../../migrations/002_complaints.sql"))?;
        Ok(())
    }

    // ── Event log ──────────────────────────────────────────────

    pub fn append_log_entry(&self, entry: &EventLogEntry) -> DeskResult<()> {
        self.conn.execute(
            "INSERT INTO event_log (complaint_id, event_type, payload, created_at)
             VALUES (?1, ?2, ?3, ?4)",
            params![
                entry.complaint_id.as_deref(),
                entry.event_type,
                entry.payload,
                entry.created_at.timestamp_millis(),
            ],
        )?;
        Ok(())
    }

    pub fn events_for_complaint(&self, complaint_id: &str) -> DeskResult<Vec<EventLogEntry>> {
        let mut stmt = self.conn.prepare(
            "SELECT id, complaint_id, event_type, payload, created_at
             FROM event_log WHERE complaint_id = ?1
             ORDER BY id ASC",
        )?;
        let rows = stmt
            .query_map(params![complaint_id], |row| {
                Ok((
                    row.get::<_, i64>(0)?,
                    row.get::<_, Option<String>>(1)?,
                    row.get::<_, String>(2)?,
                    row.get::<_, String>(3)?,
                    row.get::<_, i64>(4)?,
                ))
            })?
            .collect::<Result<Vec<_>, _>>()?;

        rows.into_iter()
            .map(|(id, complaint_id, event_type, payload, created_at)| {
                Ok(EventLogEntry {
                    id: Some(id),
                    complaint_id,
                    event_type,
                    payload,
                    created_at: from_millis("event_log.created_at", created_at)?,
                })
            })
            .collect()
    }

    pub fn event_count(&self, event_type: &str) -> DeskResult<i64> {
        self.conn
            .query_row(
                "SELECT COUNT(*) FROM event_log WHERE event_type = ?1",
                params![event_type],
                |row| row.get(0),
            )
            .map_err(Into::into)
    }
}

pub(crate) fn from_millis(field: &'static str, millis: i64) -> DeskResult<Timestamp> {
    DateTime::from_timestamp_millis(millis).ok_or_else(|| DeskError::InvalidValue {
        field,
        value: millis.to_string(),
    })
}
