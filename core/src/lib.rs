//! Complaint routing, SLA and lifecycle engine for a municipal complaint desk.
//!
//! Leaves first: `classifier`, `sla`, `lifecycle`, `duplicate`, `query`.
//! `desk` composes them over a `store::ComplaintStore`.

pub mod analytics;
pub mod classifier;
pub mod clock;
pub mod command;
pub mod complaint;
pub mod config;
pub mod desk;
pub mod duplicate;
pub mod error;
pub mod event;
pub mod lifecycle;
pub mod query;
pub mod rng;
pub mod sample_data;
pub mod session;
pub mod sla;
pub mod store;
pub mod types;
