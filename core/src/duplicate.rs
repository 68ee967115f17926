//! Intake duplicate detection.
//!
//! Two complaints are duplicates iff both their normalized description and
//! normalized location are exactly equal. No fuzzy or substring matching.

use crate::{classifier::normalize_text, complaint::Complaint};

pub fn is_duplicate_complaint(existing: &[Complaint], description: &str, location: &str) -> bool {
    find_duplicate(existing, description, location).is_some()
}

/// The first existing record the submission duplicates, if any.
pub fn find_duplicate<'a>(
    existing: &'a [Complaint],
    description: &str,
    location: &str,
) -> Option<&'a Complaint> {
    let norm_desc = normalize_text(description);
    let norm_loc = normalize_text(location);
    existing.iter().find(|c| {
        normalize_text(&c.description) == norm_desc && normalize_text(&c.location) == norm_loc
    })
}
