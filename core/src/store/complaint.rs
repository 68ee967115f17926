use super::{from_millis, ComplaintStore, DeskStore};
use crate::{
    complaint::Complaint,
    error::{DeskError, DeskResult},
    event::{DeskEvent, EventLogEntry},
};
use rusqlite::{params, OptionalExtension};

const COMPLAINT_COLUMNS: &str = "complaint_id, citizen_name, department, description, location,
    priority, status, created_at, updated_at, photos, assigned_worker, worker_notes, version";

/// Column values as SQLite hands them back, before enum and JSON decoding.
struct ComplaintRow {
    complaint_id: String,
    citizen_name: String,
    department: String,
    description: String,
    location: String,
    priority: String,
    status: String,
    created_at: i64,
    updated_at: i64,
    photos: String,
    assigned_worker: Option<String>,
    worker_notes: Option<String>,
    version: i64,
}

// Helper function for mapping complaint rows
fn complaint_row_mapper(row: &rusqlite::Row<'_>) -> rusqlite::Result<ComplaintRow> {
    Ok(ComplaintRow {
        complaint_id: row.get(0)?,
        citizen_name: row.get(1)?,
        department: row.get(2)?,
        description: row.get(3)?,
        location: row.get(4)?,
        priority: row.get(5)?,
        status: row.get(6)?,
        created_at: row.get(7)?,
        updated_at: row.get(8)?,
        photos: row.get(9)?,
        assigned_worker: row.get(10)?,
        worker_notes: row.get(11)?,
        version: row.get(12)?,
    })
}

impl ComplaintRow {
    fn into_complaint(self) -> DeskResult<Complaint> {
        Ok(Complaint {
            id: self.complaint_id,
            citizen_name: self.citizen_name,
            department: self.department,
            description: self.description,
            location: self.location,
            priority: self.priority.parse()?,
            status: self.status.parse()?,
            created_at: from_millis("complaint.created_at", self.created_at)?,
            updated_at: from_millis("complaint.updated_at", self.updated_at)?,
            photos: serde_json::from_str(&self.photos)?,
            assigned_worker: self.assigned_worker,
            worker_notes: self.worker_notes,
            version: self.version as u64,
        })
    }
}

impl DeskStore {
    // ── Complaint ──────────────────────────────────────────────────

    pub fn complaint_count(&self) -> DeskResult<i64> {
        self.conn
            .query_row("SELECT COUNT(*) FROM complaint", [], |row| row.get(0))
            .map_err(Into::into)
    }
}

impl ComplaintStore for DeskStore {
    /// Newest first, the order the dashboard lists by default.
    fn all_complaints(&self) -> DeskResult<Vec<Complaint>> {
        let mut stmt = self.conn.prepare(&format!(
            "SELECT {COMPLAINT_COLUMNS} FROM complaint ORDER BY created_at DESC"
        ))?;
        let rows = stmt
            .query_map([], complaint_row_mapper)?
            .collect::<Result<Vec<_>, _>>()?;
        rows.into_iter().map(ComplaintRow::into_complaint).collect()
    }

    fn get_complaint(&self, complaint_id: &str) -> DeskResult<Complaint> {
        let row = self
            .conn
            .query_row(
                &format!("SELECT {COMPLAINT_COLUMNS} FROM complaint WHERE complaint_id = ?1"),
                params![complaint_id],
                complaint_row_mapper,
            )
            .optional()?;
        match row {
            Some(row) => row.into_complaint(),
            None => Err(DeskError::ComplaintNotFound {
                complaint_id: complaint_id.to_string(),
            }),
        }
    }

    fn insert_complaint(&self, c: &Complaint) -> DeskResult<()> {
        self.conn.execute(
            "INSERT INTO complaint (
                complaint_id, citizen_name, department, description, location,
                priority, status, created_at, updated_at, photos,
                assigned_worker, worker_notes, version
             ) VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10, ?11, ?12, ?13)",
            params![
                &c.id,
                &c.citizen_name,
                &c.department,
                &c.description,
                &c.location,
                c.priority.as_str(),
                c.status.as_str(),
                c.created_at.timestamp_millis(),
                c.updated_at.timestamp_millis(),
                serde_json::to_string(&c.photos)?,
                c.assigned_worker.as_deref(),
                c.worker_notes.as_deref(),
                c.version as i64,
            ],
        )?;
        Ok(())
    }

    fn update_complaint(&self, c: &Complaint) -> DeskResult<Complaint> {
        let changed = self.conn.execute(
            "UPDATE complaint SET status = ?1, updated_at = ?2, assigned_worker = ?3,
                worker_notes = ?4, version = version + 1
             WHERE complaint_id = ?5 AND version = ?6",
            params![
                c.status.as_str(),
                c.updated_at.timestamp_millis(),
                c.assigned_worker.as_deref(),
                c.worker_notes.as_deref(),
                &c.id,
                c.version as i64,
            ],
        )?;
        if changed == 0 {
            // Either the row is gone or someone else wrote first.
            self.get_complaint(&c.id)?;
            return Err(DeskError::StaleWrite {
                complaint_id: c.id.clone(),
                expected: c.version,
            });
        }
        let mut written = c.clone();
        written.version += 1;
        Ok(written)
    }

    fn append_event(&self, event: &DeskEvent) -> DeskResult<()> {
        self.append_log_entry(&EventLogEntry::from_event(event)?)
    }
}
