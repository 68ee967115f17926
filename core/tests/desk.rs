//! End-to-end desk tests over an in-memory SQLite store.

use chrono::{Duration, TimeZone, Utc};
use complaint_desk_core::{
    clock::{DeskClock, FixedClock},
    complaint::{ComplaintStatus, Priority, Submission},
    config::DeskConfig,
    desk::ComplaintDesk,
    error::DeskError,
    event::DeskEvent,
    lifecycle::StatusUpdate,
    query::ComplaintQuery,
    session::Actor,
    store::{ComplaintStore, DeskStore},
    types::Timestamp,
};

// ── Helpers ──────────────────────────────────────────────────────────────────

fn init_logging() {
    let _ = env_logger::builder().is_test(true).try_init();
}

fn t0() -> Timestamp {
    Utc.with_ymd_and_hms(2026, 4, 2, 9, 0, 0).unwrap()
}

fn desk() -> ComplaintDesk<DeskStore> {
    init_logging();
    let store = DeskStore::in_memory().unwrap();
    store.migrate().unwrap();
    ComplaintDesk::new(DeskConfig::default_test(), store)
}

fn submission(description: &str, location: &str) -> Submission {
    Submission {
        citizen_name: "Mike Johnson".into(),
        description: description.into(),
        location: location.into(),
        photos: vec![],
    }
}

fn water_admin() -> Actor {
    Actor::sub_admin("2", "Water Department Admin", "Water")
}

// ── Intake ───────────────────────────────────────────────────────────────────

#[test]
fn submit_classifies_and_persists() {
    let desk = desk();
    let filed = desk
        .submit(submission("Urgent gas leak near Market Square", "Market Square"), t0())
        .unwrap();

    assert!(filed.id.starts_with("cmp-"));
    assert_eq!(filed.department, "Water");
    assert_eq!(filed.priority, Priority::High);
    assert_eq!(filed.status, ComplaintStatus::New);
    assert_eq!(filed.version, 1);

    let stored = desk.store().get_complaint(&filed.id).unwrap();
    assert_eq!(stored, filed);
    assert_eq!(desk.store().event_count("complaint_filed").unwrap(), 1);
}

/// A repeat submission is rejected, logged, and not stored.
#[test]
fn duplicate_submission_is_rejected_and_recorded() {
    let desk = desk();
    let first = desk
        .submit(submission("No water supply since morning", "Sector 15"), t0())
        .unwrap();

    let err = desk
        .submit(submission("no water supply, since morning!", "sector 15 "), t0())
        .unwrap_err();
    assert!(matches!(err, DeskError::DuplicateComplaint { .. }));
    assert_eq!(desk.store().complaint_count().unwrap(), 1);

    let events = desk.store().events_for_complaint(&first.id).unwrap();
    let kinds: Vec<&str> = events.iter().map(|e| e.event_type.as_str()).collect();
    assert_eq!(kinds, vec!["complaint_filed", "duplicate_rejected"]);
    match events[1].decode().unwrap() {
        DeskEvent::DuplicateRejected { duplicate_of, .. } => assert_eq!(duplicate_of, first.id),
        other => panic!("expected DuplicateRejected, got {other:?}"),
    }
}

#[test]
fn same_text_at_another_location_is_accepted() {
    let desk = desk();
    desk.submit(submission("Pothole on main road", "MG Road"), t0()).unwrap();
    desk.submit(submission("Pothole on main road", "Civil Lines"), t0()).unwrap();
    assert_eq!(desk.store().complaint_count().unwrap(), 2);
}

// ── Lifecycle ────────────────────────────────────────────────────────────────

/// Walk one complaint from New to Closed with a department admin.
#[test]
fn full_lifecycle_to_closed() {
    let desk = desk();
    let clock = FixedClock::new(t0());
    let filed = desk
        .submit(submission("Water leakage near the gate", "Sector 15"), clock.now())
        .unwrap();
    let actor = water_admin();

    let steps = [
        ComplaintStatus::Seen,
        ComplaintStatus::Assigned,
        ComplaintStatus::InProgress,
        ComplaintStatus::Completed,
        ComplaintStatus::Closed,
    ];
    for (i, status) in steps.iter().enumerate() {
        clock.advance_hours(3);
        let mut update = StatusUpdate::new(&filed.id, *status);
        if *status == ComplaintStatus::Assigned {
            update = update.with_worker("Worker 7");
        }
        let written = desk.update_status(&actor, &update, clock.now()).unwrap();
        assert_eq!(written.status, *status);
        assert_eq!(written.version, i as u64 + 2);
        assert_eq!(written.updated_at, clock.now());
    }

    let closed = desk.store().get_complaint(&filed.id).unwrap();
    assert_eq!(closed.status, ComplaintStatus::Closed);
    assert_eq!(closed.assigned_worker.as_deref(), Some("Worker 7"));
    assert_eq!(closed.updated_at, t0() + Duration::hours(15));
    assert!(desk.allowed_statuses(&actor, &closed).is_empty());
    assert_eq!(desk.store().event_count("status_changed").unwrap(), 5);
}

#[test]
fn invalid_transition_is_rejected_and_recorded() {
    let desk = desk();
    let filed = desk
        .submit(submission("Water leakage near the gate", "Sector 15"), t0())
        .unwrap();

    let err = desk
        .update_status(
            &water_admin(),
            &StatusUpdate::new(&filed.id, ComplaintStatus::Completed),
            t0(),
        )
        .unwrap_err();
    assert!(matches!(err, DeskError::InvalidTransition { .. }));

    let stored = desk.store().get_complaint(&filed.id).unwrap();
    assert_eq!(stored.status, ComplaintStatus::New);
    assert_eq!(stored.version, 1);
    assert_eq!(desk.store().event_count("transition_rejected").unwrap(), 1);
}

/// The super-admin can read every complaint but edit none.
#[test]
fn main_admin_update_is_unauthorized() {
    let desk = desk();
    let filed = desk
        .submit(submission("Water leakage near the gate", "Sector 15"), t0())
        .unwrap();
    let admin = Actor::main_admin("1", "Main Administrator");

    let err = desk
        .update_status(&admin, &StatusUpdate::new(&filed.id, ComplaintStatus::Seen), t0())
        .unwrap_err();
    assert!(matches!(err, DeskError::Unauthorized { .. }));
    assert!(desk.allowed_statuses(&admin, &filed).is_empty());
    assert_eq!(desk.allowed_statuses(&water_admin(), &filed), &[ComplaintStatus::Seen]);
}

#[test]
fn other_department_admin_is_unauthorized() {
    let desk = desk();
    let filed = desk
        .submit(submission("Water leakage near the gate", "Sector 15"), t0())
        .unwrap();
    let roads = Actor::sub_admin("3", "Roads Department Admin", "Roads");
    let err = desk
        .update_status(&roads, &StatusUpdate::new(&filed.id, ComplaintStatus::Seen), t0())
        .unwrap_err();
    assert!(matches!(err, DeskError::Unauthorized { .. }));
}

#[test]
fn unknown_complaint_is_not_found() {
    let desk = desk();
    let err = desk
        .update_status(&water_admin(), &StatusUpdate::new("cmp-missing", ComplaintStatus::Seen), t0())
        .unwrap_err();
    match err {
        DeskError::ComplaintNotFound { complaint_id } => assert_eq!(complaint_id, "cmp-missing"),
        other => panic!("expected ComplaintNotFound, got {other:?}"),
    }
}

/// A write based on an old read loses to the write that landed first.
#[test]
fn stale_write_is_rejected() {
    let desk = desk();
    let filed = desk
        .submit(submission("Water leakage near the gate", "Sector 15"), t0())
        .unwrap();
    let stale_copy = desk.store().get_complaint(&filed.id).unwrap();

    desk.update_status(&water_admin(), &StatusUpdate::new(&filed.id, ComplaintStatus::Seen), t0())
        .unwrap();

    let mut conflicting = stale_copy.clone();
    conflicting.status = ComplaintStatus::Seen;
    conflicting.worker_notes = Some("checked".into());
    match desk.store().update_complaint(&conflicting) {
        Err(DeskError::StaleWrite { expected, .. }) => assert_eq!(expected, 1),
        other => panic!("expected StaleWrite, got {other:?}"),
    }
    let stored = desk.store().get_complaint(&filed.id).unwrap();
    assert_eq!(stored.version, 2);
    assert_eq!(stored.worker_notes, None);
}

/// Returned records carry the same millisecond precision the store keeps.
#[test]
fn returned_records_match_reloaded_records() {
    let desk = desk();
    let now = t0() + Duration::nanoseconds(123_456_789);
    let filed = desk
        .submit(submission("Water leakage near the gate", "Sector 15"), now)
        .unwrap();
    assert_eq!(filed.created_at, t0() + Duration::milliseconds(123));
    assert_eq!(desk.store().get_complaint(&filed.id).unwrap(), filed);

    let later = now + Duration::nanoseconds(999_999);
    let update = StatusUpdate::new(&filed.id, ComplaintStatus::Seen);
    let seen = desk.update_status(&water_admin(), &update, later).unwrap();
    assert_eq!(desk.store().get_complaint(&filed.id).unwrap(), seen);
}

// ── Read paths ───────────────────────────────────────────────────────────────

#[test]
fn list_is_scoped_to_actor() {
    let desk = desk();
    desk.submit(submission("Water leakage near the gate", "Sector 15"), t0()).unwrap();
    desk.submit(submission("Pothole on main road", "MG Road"), t0()).unwrap();
    desk.submit(submission("Overflowing dustbin", "Old City"), t0()).unwrap();

    let water = desk.list(&water_admin(), &ComplaintQuery::new(), t0()).unwrap();
    assert_eq!(water.len(), 1);
    assert_eq!(water[0].department, "Water");

    let admin = Actor::main_admin("1", "Main Administrator");
    assert_eq!(desk.list(&admin, &ComplaintQuery::new(), t0()).unwrap().len(), 3);
    assert_eq!(desk.dashboard(&admin, t0()).unwrap().total, 3);
    assert_eq!(desk.dashboard(&water_admin(), t0()).unwrap().total, 1);

    let stats = desk.dashboard(&admin, t0()).unwrap();
    assert_eq!(stats.daily_intake.len(), 7);
    assert_eq!(stats.daily_intake.last().map(|d| d.created), Some(3));
    assert_eq!(stats.resolution_rate_pct, 0);
}

#[test]
fn sla_status_tracks_department_budget() {
    let desk = desk();
    let filed = desk.submit(submission("Overflowing dustbin", "Old City"), t0()).unwrap();
    assert_eq!(filed.department, "Garbage");
    let later = t0() + Duration::hours(30);
    let status = desk.sla_status(&filed, later);
    assert!((status.hours_remaining + 6.0).abs() < 1e-6);
}

// ── Sample data ──────────────────────────────────────────────────────────────

#[test]
fn seed_sample_populates_store() {
    let desk = desk();
    let inserted = desk.seed_sample(7, 25, t0()).unwrap();
    assert_eq!(inserted, 25);
    assert_eq!(desk.store().complaint_count().unwrap(), 25);

    let admin = Actor::main_admin("1", "Main Administrator");
    let report = desk.analytics(&admin, t0()).unwrap();
    assert_eq!(report.sla.total, 25);
    assert_eq!(report.monthly_trends.len(), 6);
    assert!(report.top_locations.len() <= 10);
}

/// The same seed yields the same stored population.
#[test]
fn seed_sample_is_deterministic() {
    let a = desk();
    let b = desk();
    a.seed_sample(99, 15, t0()).unwrap();
    b.seed_sample(99, 15, t0()).unwrap();
    assert_eq!(a.store().all_complaints().unwrap(), b.store().all_complaints().unwrap());
}
