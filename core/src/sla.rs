//! SLA deadline calculator.
//!
//! SLA status is derived, never stored: it is a pure function of
//! (created_at, department, now) and changes as time passes.
//!
//! The department reference records are the single source of SLA hours.
//! Unknown departments fall back to the policy's default budget.

use crate::{
    config::DeskConfig,
    error::{DeskError, DeskResult},
    types::Timestamp,
};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "snake_case")]
pub enum SlaState {
    Within,
    Approaching,
    Overdue,
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq)]
pub struct SlaStatus {
    pub status: SlaState,
    /// Negative once the deadline has passed.
    pub hours_remaining: f64,
}

pub struct SlaTable {
    hours: HashMap<String, u32>,
    default_hours: u32,
    approaching_fraction: f64,
}

impl SlaTable {
    pub fn new(config: &DeskConfig) -> Self {
        let hours = config
            .departments
            .iter()
            .map(|d| (d.name.clone(), d.sla_hours))
            .collect();
        Self {
            hours,
            default_hours: config.sla.default_hours,
            approaching_fraction: config.sla.approaching_fraction,
        }
    }

    /// Strict lookup for callers that want to know about unknown departments.
    pub fn resolve(&self, department: &str) -> DeskResult<u32> {
        self.hours
            .get(department)
            .copied()
            .ok_or_else(|| DeskError::UnknownDepartment {
                name: department.to_string(),
            })
    }

    /// Budget in hours, falling back to the default for unknown departments.
    pub fn deadline_hours(&self, department: &str) -> u32 {
        self.resolve(department).unwrap_or_else(|err| {
            log::warn!("{err}; using default SLA of {}h", self.default_hours);
            self.default_hours
        })
    }

    pub fn calculate(&self, created_at: Timestamp, department: &str, now: Timestamp) -> SlaStatus {
        let deadline = self.deadline_hours(department) as f64;
        let elapsed_hours = (now - created_at).num_milliseconds() as f64 / 3_600_000.0;
        let hours_remaining = deadline - elapsed_hours;

        let status = if hours_remaining <= 0.0 {
            SlaState::Overdue
        } else if hours_remaining <= deadline * self.approaching_fraction {
            SlaState::Approaching
        } else {
            SlaState::Within
        };

        SlaStatus {
            status,
            hours_remaining,
        }
    }
}
