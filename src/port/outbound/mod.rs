//! Outbound ports (driven side): interfaces implemented by outbound adapters.
//!
//! These contracts describe the external data the engine consumes: the
//! ledger, an optional helper service, precomputed remote results and report
//! files.

pub mod ledger;
pub mod remote;
pub mod report;
