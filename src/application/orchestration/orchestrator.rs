//! Fetch orchestrator: cache, then remote precomputed results, then collectors.
//!
//! # Architecture
//!
//! ```text
//! request(category, ctx)
//!     |
//!     +-- supersede in-flight request for category (cancel it)
//!     |
//!     +-- ResultCache hit ---------------------------> payload
//!     |
//!     +-- PrecomputedSource (bounded by timeout) ----> cache + payload
//!     |
//!     +-- Collector (e.g. DelegationCrawler) --------> cache + payload
//! ```
//!
//! Only the latest request for a category may write the cache. A superseded
//! or cancelled request returns [`Error::Cancelled`] and leaves the cache
//! untouched.

use std::collections::HashMap;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;
use std::time::Duration;

use dashmap::mapref::entry::Entry;
use dashmap::DashMap;
use tracing::{debug, info, trace, warn};

use super::context::RequestContext;
use super::state::FetchState;
use crate::application::cache::{CacheLookup, ResultCache};
use crate::application::cancel::{CancelSource, CancelToken};
use crate::application::collector::Collector;
use crate::domain::{Category, CrawlResult, Payload};
use crate::error::{Error, Result};
use crate::port::PrecomputedSource;

/// Default bound on a remote precomputed-source lookup.
pub const DEFAULT_REMOTE_TIMEOUT: Duration = Duration::from_secs(5);

/// Which tier produced a response.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Tier {
    Cache,
    Remote,
    Collector,
}

impl Tier {
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Cache => "cache",
            Self::Remote => "remote",
            Self::Collector => "collector",
        }
    }
}

/// The latest request for a category.
struct InFlight {
    generation: u64,
    source: CancelSource,
}

/// Serves category results with last-request-wins cancellation.
pub struct FetchOrchestrator {
    cache: Arc<ResultCache>,
    collectors: HashMap<Category, Arc<dyn Collector>>,
    remote: Option<Arc<dyn PrecomputedSource>>,
    remote_timeout: Duration,
    inflight: DashMap<Category, InFlight>,
    states: DashMap<Category, FetchState>,
    next_generation: AtomicU64,
}

impl FetchOrchestrator {
    #[must_use]
    pub fn builder() -> FetchOrchestratorBuilder {
        FetchOrchestratorBuilder::new()
    }

    /// The shared result cache.
    #[must_use]
    pub fn cache(&self) -> &Arc<ResultCache> {
        &self.cache
    }

    /// State of the latest request for `category`.
    #[must_use]
    pub fn state(&self, category: Category) -> FetchState {
        self.states.get(&category).map_or(FetchState::Idle, |s| *s)
    }

    /// True while a request for `category` is running.
    #[must_use]
    pub fn is_in_flight(&self, category: Category) -> bool {
        self.inflight.contains_key(&category)
    }

    /// Categories with a registered collector.
    #[must_use]
    pub fn categories(&self) -> Vec<Category> {
        let mut categories: Vec<_> = self.collectors.keys().copied().collect();
        categories.sort();
        categories
    }

    /// Serve `category`, cancelling any earlier request for it.
    ///
    /// # Errors
    ///
    /// - [`Error::Cancelled`] if superseded, shut down, or cancelled by `ctx`
    /// - [`Error::SourceUnavailable`] and other collector errors otherwise;
    ///   failures are never cached
    pub async fn request(&self, category: Category, ctx: &RequestContext) -> Result<Payload> {
        let (generation, token) = self.begin(category);
        let ctx = ctx.linked(&token);

        match self.cache.lookup(category) {
            CacheLookup::Hit(payload) => {
                debug!(category = %category, tier = Tier::Cache.as_str(), "Request served");
                self.finish(category, generation, FetchState::Succeeded);
                return Ok(payload);
            }
            CacheLookup::Stale(reason) => {
                debug!(category = %category, reason = ?reason, "Stale cache entry ignored");
            }
            CacheLookup::Miss => {
                trace!(category = %category, "Cache miss");
            }
        }
        self.set_state_if_current(category, generation, FetchState::Fetching);

        let outcome = tokio::select! {
            () = ctx.cancel.cancelled() => Err(Error::Cancelled),
            outcome = self.fetch_uncached(category, &ctx) => outcome,
        };

        match outcome {
            Ok((payload, tier)) => {
                if self.commit(category, generation, &ctx.cancel, &payload) {
                    info!(category = %category, tier = tier.as_str(), "Request served");
                    Ok(payload)
                } else {
                    debug!(category = %category, generation, "Result discarded, request no longer current");
                    Err(Error::Cancelled)
                }
            }
            Err(e) if e.is_cancelled() => {
                debug!(category = %category, generation, "Request cancelled");
                self.finish(category, generation, FetchState::Idle);
                Err(e)
            }
            Err(e) => {
                warn!(category = %category, error = %e, "Request failed");
                self.finish(category, generation, FetchState::Failed);
                Err(e)
            }
        }
    }

    /// [`request`](Self::request) for the delegation graph.
    ///
    /// # Errors
    ///
    /// As `request`, plus [`Error::UnexpectedPayload`] if a source answered
    /// with another category's result.
    pub async fn request_delegation(&self, ctx: &RequestContext) -> Result<CrawlResult> {
        self.request(Category::Delegation, ctx)
            .await?
            .into_delegation()
            .ok_or(Error::UnexpectedPayload(Category::Delegation))
    }

    /// Cancel the in-flight request for `category`, if any.
    pub fn cancel(&self, category: Category) {
        if let Some((_, inflight)) = self.inflight.remove(&category) {
            inflight.source.cancel();
            self.states.insert(category, FetchState::Idle);
        }
    }

    /// Cancel every in-flight request. Called when the consumer is torn down.
    pub fn shutdown(&self) {
        let categories: Vec<Category> = self.inflight.iter().map(|entry| *entry.key()).collect();
        for category in categories {
            self.cancel(category);
        }
        info!("Orchestrator shut down");
    }

    /// Register a new request as the current one and cancel its predecessor.
    fn begin(&self, category: Category) -> (u64, CancelToken) {
        let generation = self.next_generation.fetch_add(1, Ordering::Relaxed) + 1;
        let source = CancelSource::new();
        let token = source.token();

        let superseded = match self.inflight.entry(category) {
            Entry::Occupied(mut occupied) => {
                let previous = occupied.insert(InFlight { generation, source });
                self.states.insert(category, FetchState::Idle);
                Some(previous)
            }
            Entry::Vacant(vacant) => {
                vacant.insert(InFlight { generation, source });
                self.states.insert(category, FetchState::Idle);
                None
            }
        };

        if let Some(previous) = superseded {
            debug!(
                category = %category,
                superseded = previous.generation,
                generation,
                "Cancelling superseded request"
            );
            previous.source.cancel();
        }
        (generation, token)
    }

    fn set_state_if_current(&self, category: Category, generation: u64, state: FetchState) {
        if let Some(inflight) = self.inflight.get(&category) {
            if inflight.generation == generation {
                self.states.insert(category, state);
            }
        }
    }

    /// Record the final state if `generation` is still current.
    fn finish(&self, category: Category, generation: u64, state: FetchState) {
        if let Entry::Occupied(occupied) = self.inflight.entry(category) {
            if occupied.get().generation == generation {
                self.states.insert(category, state);
                occupied.remove();
            }
        }
    }

    /// Write `payload` to the cache if this request is still current and not
    /// cancelled. The check and the write happen under the in-flight lock, so
    /// a newer request cannot slip in between.
    fn commit(
        &self,
        category: Category,
        generation: u64,
        cancel: &CancelToken,
        payload: &Payload,
    ) -> bool {
        let Entry::Occupied(occupied) = self.inflight.entry(category) else {
            return false;
        };
        if occupied.get().generation != generation {
            return false;
        }

        let committed = !cancel.is_cancelled();
        if committed {
            self.cache.put(category, payload.clone());
            self.states.insert(category, FetchState::Succeeded);
        } else {
            self.states.insert(category, FetchState::Idle);
        }
        occupied.remove();
        committed
    }

    async fn fetch_uncached(&self, category: Category, ctx: &RequestContext) -> Result<(Payload, Tier)> {
        if let Some(remote) = &self.remote {
            ctx.cancel.check()?;
            match tokio::time::timeout(self.remote_timeout, remote.fetch(category)).await {
                Ok(Ok(Some(payload))) if !payload.is_empty() => {
                    return Ok((payload, Tier::Remote));
                }
                Ok(Ok(Some(_))) => {
                    debug!(source = remote.name(), category = %category, "Remote result empty, falling back");
                }
                Ok(Ok(None)) => {
                    debug!(source = remote.name(), category = %category, "Remote has no result, falling back");
                }
                Ok(Err(e)) => {
                    warn!(source = remote.name(), category = %category, error = %e, "Remote source failed, falling back");
                }
                Err(_) => {
                    warn!(
                        source = remote.name(),
                        category = %category,
                        timeout_ms = self.remote_timeout.as_millis() as u64,
                        "Remote source timed out, falling back"
                    );
                }
            }
        }

        ctx.cancel.check()?;
        let collector = self
            .collectors
            .get(&category)
            .ok_or(Error::NoCollector(category))?;
        let payload = collector.collect(ctx).await?;
        Ok((payload, Tier::Collector))
    }
}

/// Builder for [`FetchOrchestrator`].
pub struct FetchOrchestratorBuilder {
    cache: Option<Arc<ResultCache>>,
    collectors: HashMap<Category, Arc<dyn Collector>>,
    remote: Option<Arc<dyn PrecomputedSource>>,
    remote_timeout: Duration,
}

impl FetchOrchestratorBuilder {
    #[must_use]
    pub fn new() -> Self {
        Self {
            cache: None,
            collectors: HashMap::new(),
            remote: None,
            remote_timeout: DEFAULT_REMOTE_TIMEOUT,
        }
    }

    /// Use a shared cache instead of a private default one.
    #[must_use]
    pub fn cache(mut self, cache: Arc<ResultCache>) -> Self {
        self.cache = Some(cache);
        self
    }

    /// Register a collector for its category, replacing any earlier one.
    #[must_use]
    pub fn collector(mut self, collector: Arc<dyn Collector>) -> Self {
        self.collectors.insert(collector.category(), collector);
        self
    }

    #[must_use]
    pub fn remote(mut self, remote: Arc<dyn PrecomputedSource>) -> Self {
        self.remote = Some(remote);
        self
    }

    #[must_use]
    pub fn remote_timeout(mut self, timeout: Duration) -> Self {
        self.remote_timeout = timeout;
        self
    }

    #[must_use]
    pub fn build(self) -> FetchOrchestrator {
        FetchOrchestrator {
            cache: self.cache.unwrap_or_default(),
            collectors: self.collectors,
            remote: self.remote,
            remote_timeout: self.remote_timeout,
            inflight: DashMap::new(),
            states: DashMap::new(),
            next_generation: AtomicU64::new(0),
        }
    }
}

impl Default for FetchOrchestratorBuilder {
    fn default() -> Self {
        Self::new()
    }
}
