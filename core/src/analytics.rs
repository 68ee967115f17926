//! Dashboard and analytics reductions.
//!
//! Every figure is a straight fold over an already-scoped complaint set,
//! evaluated at a caller-supplied `now`. Map-valued fields are BTreeMaps
//! so that output order is stable.

use crate::{
    complaint::{Complaint, ComplaintStatus, Priority},
    sla::{SlaState, SlaTable},
    types::{DepartmentName, Timestamp},
};
use chrono::{Datelike, NaiveDate};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Length of the dashboard's recent-intake series.
pub const DAILY_INTAKE_DAYS: u32 = 7;

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct DashboardStats {
    pub total: usize,
    pub pending: usize,
    pub resolved_today: usize,
    pub overdue: usize,
    pub avg_resolution_hours: f64,
    /// Share of complaints no longer pending, rounded.
    pub resolution_rate_pct: i64,
    pub by_status: BTreeMap<ComplaintStatus, usize>,
    pub by_priority: BTreeMap<Priority, usize>,
    pub by_department: BTreeMap<DepartmentName, usize>,
    pub daily_intake: Vec<DailyIntake>,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct DailyIntake {
    pub date: NaiveDate,
    pub created: usize,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct DepartmentMetrics {
    pub department: DepartmentName,
    pub total: usize,
    pub resolved: usize,
    pub pending: usize,
    pub overdue: usize,
    pub avg_resolution_hours: i64,
    pub resolution_rate_pct: i64,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct PriorityBreakdown {
    pub priority: Priority,
    pub total: usize,
    pub resolved: usize,
    pub pending: usize,
    pub overdue: usize,
    pub resolution_rate_pct: i64,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct SlaPerformance {
    /// Share of complaints within SLA or already Completed, rounded.
    pub within_pct: i64,
    pub approaching: usize,
    pub breached: usize,
    pub total: usize,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct LocationCount {
    pub location: String,
    pub count: usize,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct MonthlyTrend {
    pub year: i32,
    pub month: u32,
    pub created: usize,
    pub resolved: usize,
}

fn is_resolved(c: &Complaint) -> bool {
    c.status == ComplaintStatus::Completed
}

fn is_overdue(c: &Complaint, sla: &SlaTable, now: Timestamp) -> bool {
    c.status.is_open() && sla.calculate(c.created_at, &c.department, now).status == SlaState::Overdue
}

fn avg_resolution_hours<'a>(complaints: impl Iterator<Item = &'a Complaint>) -> f64 {
    let (sum, n) = complaints
        .filter(|c| is_resolved(c))
        .fold((0.0, 0usize), |(sum, n), c| (sum + c.hours_open(), n + 1));
    if n == 0 {
        0.0
    } else {
        sum / n as f64
    }
}

fn pct(part: usize, whole: usize) -> i64 {
    if whole == 0 {
        0
    } else {
        (part as f64 / whole as f64 * 100.0).round() as i64
    }
}

pub fn dashboard_stats(complaints: &[&Complaint], sla: &SlaTable, now: Timestamp) -> DashboardStats {
    let today = now.date_naive();
    let mut by_status = BTreeMap::new();
    let mut by_priority = BTreeMap::new();
    let mut by_department = BTreeMap::new();
    for c in complaints {
        *by_status.entry(c.status).or_insert(0) += 1;
        *by_priority.entry(c.priority).or_insert(0) += 1;
        *by_department.entry(c.department.clone()).or_insert(0) += 1;
    }

    let pending = complaints.iter().filter(|c| c.status.is_open()).count();

    DashboardStats {
        total: complaints.len(),
        pending,
        resolved_today: complaints
            .iter()
            .filter(|c| is_resolved(c) && c.updated_at.date_naive() == today)
            .count(),
        overdue: complaints.iter().filter(|c| is_overdue(c, sla, now)).count(),
        avg_resolution_hours: avg_resolution_hours(complaints.iter().copied()),
        resolution_rate_pct: pct(complaints.len() - pending, complaints.len()),
        by_status,
        by_priority,
        by_department,
        daily_intake: daily_intake(complaints, DAILY_INTAKE_DAYS, now),
    }
}

pub fn department_metrics(
    complaints: &[&Complaint],
    sla: &SlaTable,
    now: Timestamp,
) -> Vec<DepartmentMetrics> {
    let mut groups: BTreeMap<&str, Vec<&Complaint>> = BTreeMap::new();
    for c in complaints {
        groups.entry(c.department.as_str()).or_default().push(*c);
    }

    groups
        .into_iter()
        .map(|(department, group)| {
            let total = group.len();
            let resolved = group.iter().filter(|c| is_resolved(c)).count();
            DepartmentMetrics {
                department: department.to_string(),
                total,
                resolved,
                pending: group.iter().filter(|c| c.status.is_open()).count(),
                overdue: group.iter().filter(|c| is_overdue(c, sla, now)).count(),
                avg_resolution_hours: avg_resolution_hours(group.iter().copied()).round() as i64,
                resolution_rate_pct: pct(resolved, total),
            }
        })
        .collect()
}

/// One row per priority tier present in the set, High first.
pub fn priority_breakdown(
    complaints: &[&Complaint],
    sla: &SlaTable,
    now: Timestamp,
) -> Vec<PriorityBreakdown> {
    Priority::ALL
        .into_iter()
        .filter_map(|priority| {
            let group: Vec<&Complaint> = complaints
                .iter()
                .copied()
                .filter(|c| c.priority == priority)
                .collect();
            if group.is_empty() {
                return None;
            }
            let resolved = group.iter().filter(|c| is_resolved(c)).count();
            Some(PriorityBreakdown {
                priority,
                total: group.len(),
                resolved,
                pending: group.iter().filter(|c| c.status.is_open()).count(),
                overdue: group.iter().filter(|c| is_overdue(c, sla, now)).count(),
                resolution_rate_pct: pct(resolved, group.len()),
            })
        })
        .collect()
}

pub fn sla_performance(complaints: &[&Complaint], sla: &SlaTable, now: Timestamp) -> SlaPerformance {
    let mut within = 0;
    let mut approaching = 0;
    let mut breached = 0;
    for c in complaints {
        let state = sla.calculate(c.created_at, &c.department, now).status;
        if state == SlaState::Within || is_resolved(c) {
            within += 1;
        }
        if c.status.is_open() {
            match state {
                SlaState::Approaching => approaching += 1,
                SlaState::Overdue => breached += 1,
                SlaState::Within => {}
            }
        }
    }
    SlaPerformance {
        within_pct: pct(within, complaints.len()),
        approaching,
        breached,
        total: complaints.len(),
    }
}

/// Most-complained-about locations, busiest first; ties by name.
pub fn top_locations(complaints: &[&Complaint], limit: usize) -> Vec<LocationCount> {
    let mut counts: BTreeMap<&str, usize> = BTreeMap::new();
    for c in complaints {
        *counts.entry(c.location.as_str()).or_insert(0) += 1;
    }
    let mut ranked: Vec<LocationCount> = counts
        .into_iter()
        .map(|(location, count)| LocationCount {
            location: location.to_string(),
            count,
        })
        .collect();
    ranked.sort_by(|a, b| b.count.cmp(&a.count));
    ranked.truncate(limit);
    ranked
}

/// Complaints created on each of the `days` UTC dates ending with now's, oldest first.
pub fn daily_intake(complaints: &[&Complaint], days: u32, now: Timestamp) -> Vec<DailyIntake> {
    let today = now.date_naive();
    (0..days)
        .rev()
        .filter_map(|back| today.checked_sub_days(chrono::Days::new(u64::from(back))))
        .map(|date| DailyIntake {
            date,
            created: complaints
                .iter()
                .filter(|c| c.created_at.date_naive() == date)
                .count(),
        })
        .collect()
}

/// Created and resolved counts for the `months` calendar months ending with now's month.
pub fn monthly_trends(complaints: &[&Complaint], months: u32, now: Timestamp) -> Vec<MonthlyTrend> {
    let current = NaiveDate::from_ymd_opt(now.year(), now.month(), 1).unwrap_or(now.date_naive());
    (0..months)
        .rev()
        .filter_map(|back| current.checked_sub_months(chrono::Months::new(back)))
        .map(|start| {
            let in_month: Vec<&&Complaint> = complaints
                .iter()
                .filter(|c| c.created_at.year() == start.year() && c.created_at.month() == start.month())
                .collect();
            MonthlyTrend {
                year: start.year(),
                month: start.month(),
                created: in_month.len(),
                resolved: in_month.iter().filter(|c| is_resolved(c)).count(),
            }
        })
        .collect()
}
