//! Classifier tests: department routing, priority precedence, intake drafts.

use chrono::{TimeZone, Utc};
use complaint_desk_core::{
    classifier::Classifier,
    complaint::{ComplaintStatus, Priority, Submission},
    config::DeskConfig,
};

// ── Helpers ──────────────────────────────────────────────────────────────────

fn classifier() -> Classifier {
    Classifier::new(&DeskConfig::default_test())
}

// ── Department routing ───────────────────────────────────────────────────────

/// Descriptions with no configured keyword fall back to Roads.
#[test]
fn no_keyword_routes_to_default_department() {
    let c = classifier();
    for desc in ["", "Neighbour plays loud music", "Stray dogs near the park", "12345"] {
        assert_eq!(c.determine_department(desc), "Roads", "description {desc:?}");
    }
}

#[test]
fn keyword_match_is_case_insensitive_substring() {
    let c = classifier();
    assert_eq!(c.determine_department("PLUMBING failure in block C"), "Water");
    assert_eq!(c.determine_department("Hospital lift not working"), "Health");
    assert_eq!(c.determine_department("Overflowing DUSTBIN"), "Garbage");
    // "books" inside "notebooks" still matches as a substring.
    assert_eq!(c.determine_department("No notebooks for pupils"), "Education");
}

/// Department order decides ties: Water is tested before Electricity,
/// Roads before Electricity.
#[test]
fn first_department_in_order_wins() {
    let c = classifier();
    // "water" (Water) and "power" (Electricity) both present.
    assert_eq!(c.determine_department("Power cut stopped the water pump"), "Water");
    // "street" (Roads) matches before "streetlight" (Electricity) is considered.
    assert_eq!(c.determine_department("Streetlight flickering all night"), "Roads");
    // Only Electricity terms.
    assert_eq!(c.determine_department("Electric pole leaning"), "Electricity");
}

// ── Priority ─────────────────────────────────────────────────────────────────

/// Emergency-class terms give High regardless of department.
#[test]
fn high_terms_win_for_every_department() {
    let c = classifier();
    let config = DeskConfig::default_test();
    for dept in &config.departments {
        for desc in ["Emergency!", "urgent help", "fire near the shop", "Gas leak reported"] {
            assert_eq!(
                c.determine_priority(desc, &dept.name),
                Priority::High,
                "{desc:?} in {}",
                dept.name
            );
        }
    }
}

/// A description carrying both high and medium terms is High.
#[test]
fn high_precedes_medium() {
    let c = classifier();
    assert_eq!(
        c.determine_priority("Broken pipe, dangerous for children", "Water"),
        Priority::High
    );
    assert_eq!(c.determine_priority("Pothole needs repair", "Roads"), Priority::Medium);
}

/// Medium keywords precede the department default; the default precedes Low.
#[test]
fn department_default_applies_only_without_keywords() {
    let c = classifier();
    assert_eq!(c.determine_priority("Bins not emptied", "Garbage"), Priority::Medium);
    assert_eq!(c.determine_priority("Clinic closed early", "Health"), Priority::Medium);
    assert_eq!(c.determine_priority("Bins not emptied", "Roads"), Priority::Low);
    assert_eq!(c.determine_priority("Teacher absent", "Education"), Priority::Low);
    assert_eq!(c.determine_priority("Desk damaged", "Education"), Priority::Medium);
}

/// "Broken wire" is a high term even though "broken" alone is medium.
#[test]
fn multi_word_high_term_beats_its_medium_prefix() {
    let c = classifier();
    assert_eq!(c.determine_priority("Broken wire on the pole", "Electricity"), Priority::High);
    assert_eq!(c.determine_priority("Broken bench", "Roads"), Priority::Medium);
}

// ── End to end ───────────────────────────────────────────────────────────────

/// "leak" routes to Water; "urgent" and "gas leak" make it High.
#[test]
fn urgent_gas_leak_is_high_priority_water() {
    let c = classifier();
    let desc = "Urgent gas leak near Market Square";
    let dept = c.determine_department(desc);
    assert_eq!(dept, "Water");
    assert_eq!(c.determine_priority(desc, &dept), Priority::High);
}

#[test]
fn new_complaint_draft_is_fully_populated() {
    let c = classifier();
    let now = Utc.with_ymd_and_hms(2026, 5, 1, 9, 30, 0).unwrap();
    let draft = c.process_new_complaint(
        Submission {
            citizen_name: "Jane Smith".into(),
            description: "Garbage piling up behind the market".into(),
            location: "Old City".into(),
            photos: vec!["photos/a.jpg".into()],
        },
        now,
    );

    assert_eq!(draft.department, "Garbage");
    assert_eq!(draft.priority, Priority::Medium);
    assert_eq!(draft.status, ComplaintStatus::New);
    assert_eq!(draft.created_at, now);
    assert_eq!(draft.updated_at, now);
    assert_eq!(draft.citizen_name, "Jane Smith");
    assert_eq!(draft.location, "Old City");
    assert_eq!(draft.photos, vec!["photos/a.jpg".to_string()]);
}

/// Changing the department order changes the outcome; order is the contract.
#[test]
fn reordered_departments_change_routing() {
    let mut config = DeskConfig::default_test();
    let electricity = config
        .departments
        .iter()
        .position(|d| d.name == "Electricity")
        .unwrap();
    let dept = config.departments.remove(electricity);
    config.departments.insert(0, dept);

    let c = Classifier::new(&config);
    assert_eq!(c.determine_department("Streetlight flickering all night"), "Electricity");
}
