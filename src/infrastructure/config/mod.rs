//! Infrastructure configuration modules.

pub mod cache;
pub mod logging;
pub mod remote;
pub mod report;
pub mod settings;
