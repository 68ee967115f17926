//! Deterministic sample complaint population.
//!
//! Same seed + same `now` = same complaints, ids included. Used by the
//! runner's demo mode and by tests that need a realistic mixed set.

use crate::{
    complaint::{Complaint, ComplaintStatus, Priority},
    rng::{SampleStream, SeededRng},
    types::Timestamp,
};
use chrono::Duration;

struct Template {
    department: &'static str,
    description: &'static str,
}

const TEMPLATES: &[Template] = &[
    Template { department: "Water",       description: "Water leakage in the main pipe causing flooding in the street" },
    Template { department: "Water",       description: "No water supply for the past 3 days in our area" },
    Template { department: "Roads",       description: "Large pothole on the main road causing traffic issues" },
    Template { department: "Roads",       description: "Broken streetlight making the area unsafe at night" },
    Template { department: "Electricity", description: "Power outage in the residential area for over 12 hours" },
    Template { department: "Electricity", description: "Damaged electrical wire hanging dangerously low" },
    Template { department: "Garbage",     description: "Garbage not collected for a week, creating unhygienic conditions" },
    Template { department: "Garbage",     description: "Overflowing dustbin attracting stray animals" },
    Template { department: "Health",      description: "Mosquito breeding in stagnant water near health center" },
    Template { department: "Health",      description: "Lack of medical staff at the community health center" },
    Template { department: "Education",   description: "Broken desks and chairs in the primary school" },
    Template { department: "Education",   description: "No proper drinking water facility in the school" },
];

const CITIZENS: &[&str] = &[
    "John Doe", "Jane Smith", "Mike Johnson", "Sarah Wilson", "David Brown",
    "Lisa Davis", "Tom Miller", "Emma Garcia", "Chris Lee", "Anna Martinez",
];

const LOCATIONS: &[&str] = &[
    "MG Road", "Gandhi Nagar", "Civil Lines", "Model Town", "Sector 15",
    "New Colony", "Old City", "Industrial Area", "Housing Board", "Market Square",
];

const WEEK_MS: u64 = 7 * 24 * 3_600_000;
const TWO_DAYS_MS: u64 = 2 * 24 * 3_600_000;

/// Generate `count` complaints created within the week before `now`,
/// newest first.
pub fn generate_complaints(seed: u64, count: usize, now: Timestamp) -> Vec<Complaint> {
    let mut rng = SeededRng::new(seed, SampleStream::Complaints);
    let mut complaints: Vec<Complaint> = (1..=count)
        .map(|i| sample_complaint(&mut rng, i, now))
        .collect();
    complaints.sort_by(|a, b| b.created_at.cmp(&a.created_at));
    log::debug!("generated {} sample complaints (seed {seed})", complaints.len());
    complaints
}

fn sample_complaint(rng: &mut SeededRng, index: usize, now: Timestamp) -> Complaint {
    let template = rng.pick(TEMPLATES);
    let created_at = now - Duration::milliseconds(rng.next_u64_below(WEEK_MS) as i64);
    let updated_at =
        (created_at + Duration::milliseconds(rng.next_u64_below(TWO_DAYS_MS) as i64)).min(now);

    let photos = if rng.chance(0.7) {
        vec![format!("photos/{}-{index}.jpg", template.department.to_lowercase())]
    } else {
        Vec::new()
    };
    let assigned_worker = rng
        .chance(0.5)
        .then(|| format!("Worker {}", rng.next_u64_below(10) + 1));
    let worker_notes = rng
        .chance(0.3)
        .then(|| "Investigation in progress".to_string());

    Complaint {
        id: format!("complaint_{index}"),
        citizen_name: rng.pick(CITIZENS).to_string(),
        department: template.department.to_string(),
        description: template.description.to_string(),
        location: rng.pick(LOCATIONS).to_string(),
        priority: *rng.pick(&Priority::ALL),
        status: *rng.pick(&ComplaintStatus::ALL),
        created_at,
        updated_at,
        photos,
        assigned_worker,
        worker_notes,
        version: 1,
    }
}
