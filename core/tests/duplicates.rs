//! Duplicate detection tests.

use chrono::{TimeZone, Utc};
use complaint_desk_core::{
    complaint::{Complaint, ComplaintStatus, Priority},
    duplicate::{find_duplicate, is_duplicate_complaint},
};

fn existing(id: &str, description: &str, location: &str) -> Complaint {
    let at = Utc.with_ymd_and_hms(2026, 1, 5, 10, 0, 0).unwrap();
    Complaint {
        id: id.into(),
        citizen_name: "Emma Garcia".into(),
        department: "Roads".into(),
        description: description.into(),
        location: location.into(),
        priority: Priority::Medium,
        status: ComplaintStatus::New,
        created_at: at,
        updated_at: at,
        photos: vec![],
        assigned_worker: None,
        worker_notes: None,
        version: 1,
    }
}

/// Punctuation, case and whitespace differences are ignored.
#[test]
fn cosmetic_differences_still_match() {
    let records = vec![existing("c1", "Large pothole on the main road", "MG Road")];
    assert!(is_duplicate_complaint(&records, "large   POTHOLE, on the main road!!", "mg road."));
    assert!(is_duplicate_complaint(&records, "  Large pothole on the main road ", "  MG   Road"));
}

#[test]
fn different_location_is_not_a_duplicate() {
    let records = vec![existing("c1", "Large pothole on the main road", "MG Road")];
    assert!(!is_duplicate_complaint(&records, "Large pothole on the main road", "Civil Lines"));
}

/// Exact match after normalization only; no substring or fuzzy match.
#[test]
fn near_misses_are_not_duplicates() {
    let records = vec![existing("c1", "Large pothole on the main road", "MG Road")];
    assert!(!is_duplicate_complaint(&records, "Large pothole on the main road near bank", "MG Road"));
    assert!(!is_duplicate_complaint(&records, "Large pothole", "MG Road"));
    assert!(!is_duplicate_complaint(&records, "Large pothole on the main road", "MG Road 2"));
}

#[test]
fn empty_store_has_no_duplicates() {
    assert!(!is_duplicate_complaint(&[], "anything", "anywhere"));
}

#[test]
fn find_returns_the_matching_record() {
    let records = vec![
        existing("c1", "No water supply", "Old City"),
        existing("c2", "Broken streetlight", "Model Town"),
    ];
    let hit = find_duplicate(&records, "broken street-light", "model town").map(|c| c.id.as_str());
    // "street-light" normalizes to "streetlight", which matches.
    assert_eq!(hit, Some("c2"));
}
