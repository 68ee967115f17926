//! The complaint desk: intake, status edits, list views and stats over a store.
//!
//! FLOW:
//!   submit       : duplicate check → classify → insert → ComplaintFiled
//!   update_status: load → authorize → transition → versioned write → StatusChanged
//!   list / stats : load → scope to actor → query pipeline / reductions
//!
//! RULES:
//!   - The desk holds no complaint state between calls; the store owns records.
//!   - "now" is always a parameter. Nothing here reads the wall clock.
//!   - Every accepted or rejected decision is appended to the event log.

use crate::{
    analytics::{
        self, DashboardStats, DepartmentMetrics, LocationCount, MonthlyTrend, PriorityBreakdown,
        SlaPerformance,
    },
    classifier::Classifier,
    complaint::{Complaint, ComplaintStatus, Submission},
    config::DeskConfig,
    duplicate,
    error::{DeskError, DeskResult},
    event::DeskEvent,
    lifecycle::{self, StatusUpdate},
    query::{self, ComplaintQuery},
    sample_data,
    session::Actor,
    sla::{SlaStatus, SlaTable},
    store::ComplaintStore,
    types::Timestamp,
};
use chrono::SubsecRound;
use serde::{Deserialize, Serialize};

const TOP_LOCATIONS: usize = 10;
const TREND_MONTHS: u32 = 6;

/// Everything the analytics view shows, for one actor at one instant.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct AnalyticsReport {
    pub departments: Vec<DepartmentMetrics>,
    pub priorities: Vec<PriorityBreakdown>,
    pub sla: SlaPerformance,
    pub top_locations: Vec<LocationCount>,
    pub monthly_trends: Vec<MonthlyTrend>,
}

pub struct ComplaintDesk<S: ComplaintStore> {
    classifier: Classifier,
    sla: SlaTable,
    store: S,
}

impl<S: ComplaintStore> ComplaintDesk<S> {
    pub fn new(config: DeskConfig, store: S) -> Self {
        Self {
            classifier: Classifier::new(&config),
            sla: SlaTable::new(&config),
            store,
        }
    }

    pub fn store(&self) -> &S {
        &self.store
    }

    /// Accept a citizen submission, unless it repeats an existing complaint.
    pub fn submit(&self, submission: Submission, now: Timestamp) -> DeskResult<Complaint> {
        let now = store_precision(now);
        let existing = self.store.all_complaints()?;
        if let Some(original) =
            duplicate::find_duplicate(&existing, &submission.description, &submission.location)
        {
            log::warn!(
                "Rejected duplicate of {} at '{}'",
                original.id,
                submission.location
            );
            self.store.append_event(&DeskEvent::DuplicateRejected {
                at: now,
                duplicate_of: original.id.clone(),
                location: submission.location.clone(),
            })?;
            return Err(DeskError::DuplicateComplaint {
                location: submission.location,
            });
        }

        let draft = self.classifier.process_new_complaint(submission, now);
        let id = format!("cmp-{}", uuid::Uuid::new_v4().simple());
        let complaint = Complaint::from_draft(id, draft);
        self.store.insert_complaint(&complaint)?;
        self.store.append_event(&DeskEvent::ComplaintFiled {
            at: now,
            complaint_id: complaint.id.clone(),
            department: complaint.department.clone(),
            priority: complaint.priority,
        })?;
        log::debug!(
            "filed {} → {}/{}",
            complaint.id,
            complaint.department,
            complaint.priority
        );
        Ok(complaint)
    }

    /// Move a complaint one step along its lifecycle on behalf of `actor`.
    pub fn update_status(
        &self,
        actor: &Actor,
        update: &StatusUpdate,
        now: Timestamp,
    ) -> DeskResult<Complaint> {
        let now = store_precision(now);
        let current = self.store.get_complaint(&update.complaint_id)?;
        let capability = actor.edit_capability();

        let next = match lifecycle::apply_transition(&current, update, capability.as_ref(), now) {
            Ok(next) => next,
            Err(err) => {
                log::warn!("{err} (actor {})", actor.user_id);
                self.store.append_event(&DeskEvent::TransitionRejected {
                    at: now,
                    complaint_id: current.id.clone(),
                    requested: update.requested_status,
                    actor_id: actor.user_id.clone(),
                    reason: err.to_string(),
                })?;
                return Err(err);
            }
        };

        let written = self.store.update_complaint(&next)?;
        self.store.append_event(&DeskEvent::StatusChanged {
            at: now,
            complaint_id: written.id.clone(),
            from: current.status,
            to: written.status,
            actor_id: actor.user_id.clone(),
        })?;
        log::debug!("{}: {} → {}", written.id, current.status, written.status);
        Ok(written)
    }

    /// Statuses `actor` may move this complaint to right now. Empty when
    /// the actor holds no capability for its department.
    pub fn allowed_statuses(
        &self,
        actor: &Actor,
        complaint: &Complaint,
    ) -> &'static [ComplaintStatus] {
        match lifecycle::authorize(actor.edit_capability().as_ref(), complaint) {
            Ok(()) => lifecycle::next_statuses(complaint.status),
            Err(_) => &[],
        }
    }

    pub fn sla_status(&self, complaint: &Complaint, now: Timestamp) -> SlaStatus {
        self.sla
            .calculate(complaint.created_at, &complaint.department, now)
    }

    pub fn list(
        &self,
        actor: &Actor,
        query: &ComplaintQuery,
        now: Timestamp,
    ) -> DeskResult<Vec<Complaint>> {
        let complaints = self.store.all_complaints()?;
        Ok(query::run_query(&complaints, actor, query, &self.sla, now))
    }

    pub fn dashboard(&self, actor: &Actor, now: Timestamp) -> DeskResult<DashboardStats> {
        let complaints = self.store.all_complaints()?;
        let scoped = query::scope_to_actor(&complaints, actor);
        Ok(analytics::dashboard_stats(&scoped, &self.sla, now))
    }

    pub fn analytics(&self, actor: &Actor, now: Timestamp) -> DeskResult<AnalyticsReport> {
        let complaints = self.store.all_complaints()?;
        let scoped = query::scope_to_actor(&complaints, actor);
        Ok(AnalyticsReport {
            departments: analytics::department_metrics(&scoped, &self.sla, now),
            priorities: analytics::priority_breakdown(&scoped, &self.sla, now),
            sla: analytics::sla_performance(&scoped, &self.sla, now),
            top_locations: analytics::top_locations(&scoped, TOP_LOCATIONS),
            monthly_trends: analytics::monthly_trends(&scoped, TREND_MONTHS, now),
        })
    }

    /// Load a deterministic sample population straight into the store.
    /// Bypasses intake: sample records keep their template routing.
    pub fn seed_sample(&self, seed: u64, count: usize, now: Timestamp) -> DeskResult<usize> {
        let complaints = sample_data::generate_complaints(seed, count, store_precision(now));
        for complaint in &complaints {
            self.store.insert_complaint(complaint)?;
        }
        log::info!("seeded {} sample complaints", complaints.len());
        Ok(complaints.len())
    }
}

/// The store keeps unix millis; records handed back must match what a reload sees.
fn store_precision(now: Timestamp) -> Timestamp {
    now.trunc_subsecs(3)
}
