//! Rule-based complaint routing.
//!
//! MATCH ORDER (the contract, never reordered):
//!   1. Departments in configured order; inside each, keywords in order.
//!      First substring hit wins. No hit → the default department.
//!   2. Priority: high keywords → medium keywords → default-medium
//!      departments → Low.

use crate::{
    complaint::{ComplaintDraft, ComplaintStatus, Priority, Submission},
    config::{DeskConfig, RoutingRules},
    types::{DepartmentName, Timestamp},
};

struct DepartmentRule {
    name: DepartmentName,
    keywords: Vec<String>,
}

pub struct Classifier {
    departments: Vec<DepartmentRule>,
    rules: RoutingRules,
}

impl Classifier {
    pub fn new(config: &DeskConfig) -> Self {
        let departments = config
            .departments
            .iter()
            .map(|d| DepartmentRule {
                name: d.name.clone(),
                keywords: lowercase_all(&d.keywords),
            })
            .collect();

        let rules = RoutingRules {
            default_department: config.routing.default_department.clone(),
            high_priority_keywords: lowercase_all(&config.routing.high_priority_keywords),
            medium_priority_keywords: lowercase_all(&config.routing.medium_priority_keywords),
            default_medium_departments: config.routing.default_medium_departments.clone(),
        };

        Self { departments, rules }
    }

    /// Route a description to the first department with a keyword hit.
    pub fn determine_department(&self, description: &str) -> DepartmentName {
        let lower = description.to_lowercase();
        for dept in &self.departments {
            if dept.keywords.iter().any(|kw| lower.contains(kw.as_str())) {
                return dept.name.clone();
            }
        }
        self.rules.default_department.clone()
    }

    pub fn determine_priority(&self, description: &str, department: &str) -> Priority {
        let lower = description.to_lowercase();

        if contains_any(&lower, &self.rules.high_priority_keywords) {
            return Priority::High;
        }
        if contains_any(&lower, &self.rules.medium_priority_keywords) {
            return Priority::Medium;
        }
        if self
            .rules
            .default_medium_departments
            .iter()
            .any(|d| d == department)
        {
            return Priority::Medium;
        }
        Priority::Low
    }

    /// Classify a submission into a complete record minus identity.
    pub fn process_new_complaint(&self, submission: Submission, now: Timestamp) -> ComplaintDraft {
        let department = self.determine_department(&submission.description);
        let priority = self.determine_priority(&submission.description, &department);
        log::debug!("classified complaint at '{}' → {department}/{priority}", submission.location);

        ComplaintDraft {
            citizen_name: submission.citizen_name,
            department,
            description: submission.description,
            location: submission.location,
            priority,
            status: ComplaintStatus::New,
            created_at: now,
            updated_at: now,
            photos: submission.photos,
        }
    }
}

/// Canonical form for duplicate comparison: lowercase ASCII alphanumerics
/// and single spaces, trimmed.
pub fn normalize_text(text: &str) -> String {
    let lower = text.to_lowercase();
    let kept: String = lower
        .chars()
        .filter(|c| c.is_ascii_lowercase() || c.is_ascii_digit() || c.is_whitespace())
        .collect();
    kept.split_whitespace().collect::<Vec<_>>().join(" ")
}

fn lowercase_all(words: &[String]) -> Vec<String> {
    words.iter().map(|w| w.to_lowercase()).collect()
}

fn contains_any(haystack: &str, needles: &[String]) -> bool {
    needles.iter().any(|n| haystack.contains(n.as_str()))
}
