//! Outbound adapters (driven side).

pub mod remote;
pub mod report;
