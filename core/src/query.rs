//! Complaint list pipeline.
//!
//! STAGE ORDER (fixed):
//!   1. Role scoping     : sub-admins see only their department
//!   2. Free-text search : any of citizen_name, description, location, id
//!   3. Equality filters : status, department (super-admin only), priority
//!   4. Photo filter     : with_photo / without_photo
//!   5. SLA filter       : within / approaching / overdue at `now`
//!   6. Stable sort      : created_at, updated_at or priority rank
//!
//! All filters AND together. An absent filter is a no-op.
//! The input slice is never reordered; the result is a fresh Vec.

use crate::{
    complaint::{Complaint, ComplaintStatus, Priority},
    session::{Actor, Scope},
    sla::{SlaState, SlaTable},
    types::{DepartmentName, Timestamp},
};
use serde::{Deserialize, Serialize};
use std::cmp::Ordering;

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum PhotoFilter {
    WithPhoto,
    WithoutPhoto,
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Default)]
#[serde(rename_all = "snake_case")]
pub enum SortKey {
    #[default]
    CreatedAt,
    UpdatedAt,
    Priority,
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Default)]
#[serde(rename_all = "snake_case")]
pub enum SortOrder {
    Asc,
    #[default]
    Desc,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct ComplaintQuery {
    pub search: Option<String>,
    pub status: Option<ComplaintStatus>,
    /// Honoured for super-admins only; sub-admins are already scoped.
    pub department: Option<DepartmentName>,
    pub priority: Option<Priority>,
    pub photo: Option<PhotoFilter>,
    pub sla: Option<SlaState>,
    pub sort_key: SortKey,
    pub sort_order: SortOrder,
}

impl ComplaintQuery {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn search(mut self, term: impl Into<String>) -> Self {
        self.search = Some(term.into());
        self
    }

    pub fn status(mut self, status: ComplaintStatus) -> Self {
        self.status = Some(status);
        self
    }

    pub fn department(mut self, department: impl Into<DepartmentName>) -> Self {
        self.department = Some(department.into());
        self
    }

    pub fn priority(mut self, priority: Priority) -> Self {
        self.priority = Some(priority);
        self
    }

    pub fn photo(mut self, photo: PhotoFilter) -> Self {
        self.photo = Some(photo);
        self
    }

    pub fn sla(mut self, sla: SlaState) -> Self {
        self.sla = Some(sla);
        self
    }

    pub fn sort(mut self, key: SortKey, order: SortOrder) -> Self {
        self.sort_key = key;
        self.sort_order = order;
        self
    }
}

/// Stage 1 on its own. Also used by the analytics read path.
pub fn scope_to_actor<'a>(complaints: &'a [Complaint], actor: &Actor) -> Vec<&'a Complaint> {
    let scope = actor.scope();
    complaints
        .iter()
        .filter(|c| scope.admits(&c.department))
        .collect()
}

pub fn run_query(
    complaints: &[Complaint],
    actor: &Actor,
    query: &ComplaintQuery,
    sla: &SlaTable,
    now: Timestamp,
) -> Vec<Complaint> {
    let term = query
        .search
        .as_deref()
        .map(str::to_lowercase)
        .filter(|t| !t.is_empty());
    let department_filter = match actor.scope() {
        Scope::All => query.department.as_deref(),
        Scope::Department(_) | Scope::Nothing => None,
    };

    let mut result: Vec<Complaint> = scope_to_actor(complaints, actor)
        .into_iter()
        .filter(|c| term.as_deref().map_or(true, |t| matches_search(c, t)))
        .filter(|c| query.status.map_or(true, |s| c.status == s))
        .filter(|c| department_filter.map_or(true, |d| c.department == d))
        .filter(|c| query.priority.map_or(true, |p| c.priority == p))
        .filter(|c| match query.photo {
            None => true,
            Some(PhotoFilter::WithPhoto) => c.has_photos(),
            Some(PhotoFilter::WithoutPhoto) => !c.has_photos(),
        })
        .filter(|c| query.sla.map_or(true, |state| matches_sla(c, state, sla, now)))
        .cloned()
        .collect();

    // Vec::sort_by is stable: ties keep input order.
    result.sort_by(|a, b| {
        let ord = compare_by(a, b, query.sort_key);
        match query.sort_order {
            SortOrder::Asc => ord,
            SortOrder::Desc => ord.reverse(),
        }
    });

    log::debug!(
        "query for {} returned {} of {} complaints",
        actor.user_id,
        result.len(),
        complaints.len()
    );
    result
}

fn matches_search(c: &Complaint, term: &str) -> bool {
    [&c.citizen_name, &c.description, &c.location, &c.id]
        .iter()
        .any(|field| field.to_lowercase().contains(term))
}

/// Approaching and overdue only describe work that is still open.
fn matches_sla(c: &Complaint, state: SlaState, sla: &SlaTable, now: Timestamp) -> bool {
    let computed = sla.calculate(c.created_at, &c.department, now).status;
    match state {
        SlaState::Within => computed == SlaState::Within,
        _ => computed == state && c.status.is_open(),
    }
}

fn compare_by(a: &Complaint, b: &Complaint, key: SortKey) -> Ordering {
    match key {
        SortKey::CreatedAt => a.created_at.cmp(&b.created_at),
        SortKey::UpdatedAt => a.updated_at.cmp(&b.updated_at),
        SortKey::Priority => a.priority.rank().cmp(&b.priority.rank()),
    }
}
