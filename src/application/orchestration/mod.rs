//! Request orchestration across the cache, remote and collector tiers.
//!
//! # Modules
//!
//! - `context`: per-request parameters and caller cancellation
//! - `state`: per-category fetch lifecycle
//! - [`orchestrator`]: the [`FetchOrchestrator`] itself

mod context;
pub mod orchestrator;
mod state;

pub use context::RequestContext;
pub use orchestrator::{FetchOrchestrator, FetchOrchestratorBuilder, Tier, DEFAULT_REMOTE_TIMEOUT};
pub use state::FetchState;
