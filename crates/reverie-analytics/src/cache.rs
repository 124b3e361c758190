//! Memoized analytics keyed by user and input hash.
//!
//! The engine is a pure function of its inputs and the reference day, so a
//! result can be reused for as long as neither changes. The hash covers the
//! canonical JSON of both record slices plus the local reference date.

use std::collections::{HashMap, VecDeque};
use std::sync::Arc;

use chrono::{DateTime, Utc};
use parking_lot::Mutex;
use reverie_core::{DreamRecord, InterpretationRecord};
use serde::Serialize;
use sha2::{Digest, Sha256};
use tracing::{debug, warn};

use crate::engine::AnalyticsEngine;
use crate::types::DreamAnalytics;

/// Default number of cached results.
pub const DEFAULT_CAPACITY: usize = 64;

type CacheKey = (String, String);

#[derive(Default)]
struct CacheInner {
    entries: HashMap<CacheKey, Arc<DreamAnalytics>>,
    order: VecDeque<CacheKey>,
}

/// Bounded, thread-safe memo over an [`AnalyticsEngine`].
///
/// When full, the oldest inserted entry is evicted.
pub struct AnalyticsCache {
    engine: AnalyticsEngine,
    capacity: usize,
    inner: Mutex<CacheInner>,
}

impl AnalyticsCache {
    /// Cache results of `engine`, holding at most `capacity` entries.
    pub fn new(engine: AnalyticsEngine, capacity: usize) -> Self {
        Self {
            engine,
            capacity: capacity.max(1),
            inner: Mutex::new(CacheInner::default()),
        }
    }

    /// The wrapped engine.
    pub fn engine(&self) -> &AnalyticsEngine {
        &self.engine
    }

    /// Cached result for this input, computing and storing it on a miss.
    pub fn get_or_compute(
        &self,
        user_id: &str,
        dreams: &[DreamRecord],
        interpretations: &[InterpretationRecord],
        now: DateTime<Utc>,
    ) -> Arc<DreamAnalytics> {
        let reference_day = self.engine.calendar().date(&now).to_string();
        let Some(hash) = input_hash(dreams, interpretations, &reference_day) else {
            warn!(user_id, "analytics input not hashable, bypassing cache");
            return Arc::new(self.engine.compute_at(dreams, interpretations, now));
        };
        let key = (user_id.to_owned(), hash);

        if let Some(hit) = self.inner.lock().entries.get(&key) {
            debug!(user_id, "analytics cache hit");
            return Arc::clone(hit);
        }

        let result = Arc::new(self.engine.compute_at(dreams, interpretations, now));
        self.insert(key, Arc::clone(&result));
        result
    }

    fn insert(&self, key: CacheKey, value: Arc<DreamAnalytics>) {
        let mut inner = self.inner.lock();
        if inner.entries.insert(key.clone(), value).is_some() {
            return;
        }
        inner.order.push_back(key);
        while inner.order.len() > self.capacity {
            if let Some(oldest) = inner.order.pop_front() {
                let _ = inner.entries.remove(&oldest);
                debug!(user_id = %oldest.0, "evicted cached analytics");
            }
        }
    }

    /// Drop every entry for `user_id`. Returns how many were removed.
    pub fn invalidate_user(&self, user_id: &str) -> usize {
        let mut inner = self.inner.lock();
        let before = inner.entries.len();
        inner.entries.retain(|(user, _), _| user != user_id);
        inner.order.retain(|(user, _)| user != user_id);
        before - inner.entries.len()
    }

    /// Number of cached results.
    pub fn len(&self) -> usize {
        self.inner.lock().entries.len()
    }

    /// Whether the cache holds nothing.
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Drop every entry.
    pub fn clear(&self) {
        let mut inner = self.inner.lock();
        inner.entries.clear();
        inner.order.clear();
    }
}

impl Default for AnalyticsCache {
    fn default() -> Self {
        Self::new(AnalyticsEngine::default(), DEFAULT_CAPACITY)
    }
}

#[derive(Serialize)]
struct HashInput<'a> {
    dreams: &'a [DreamRecord],
    interpretations: &'a [InterpretationRecord],
    reference_day: &'a str,
}

/// Hex SHA-256 of the canonical JSON of the inputs.
fn input_hash(
    dreams: &[DreamRecord],
    interpretations: &[InterpretationRecord],
    reference_day: &str,
) -> Option<String> {
    let bytes = serde_json::to_vec(&HashInput {
        dreams,
        interpretations,
        reference_day,
    })
    .ok()?;
    let mut hasher = Sha256::new();
    hasher.update(&bytes);
    Some(format!("{:x}", hasher.finalize()))
}

// ─────────────────────────────────────────────────────────────────────────────
// Tests
// ─────────────────────────────────────────────────────────────────────────────
