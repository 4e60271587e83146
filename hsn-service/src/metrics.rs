//! Lookup counters and the GET /metrics handler.

use crate::state::SharedState;
use axum::extract::State;
use axum::Json;
use serde::Serialize;
use std::collections::HashMap;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Mutex;

const TOP_N: usize = 20;

#[derive(Default)]
pub struct Metrics {
    pub exact_count: AtomicU64,
    pub prefix_count: AtomicU64,
    pub not_found_count: AtomicU64,
    pub invalid_count: AtomicU64,
    pub search_count: AtomicU64,
    pub reload_count: AtomicU64,
    pub reload_failures: AtomicU64,
    pub total_lookup_us: AtomicU64,
    pub top_codes: Mutex<HashMap<String, u64>>,
}

/// Which branch a lookup ended in
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Outcome {
    Exact,
    Prefix,
    NotFound,
}

impl Outcome {
    pub fn as_str(&self) -> &'static str {
        match self {
            Outcome::Exact => "exact",
            Outcome::Prefix => "prefix",
            Outcome::NotFound => "not_found",
        }
    }
}

impl Metrics {
    pub fn record_lookup(&self, code: &str, outcome: Outcome, duration_us: u64) {
        let counter = match outcome {
            Outcome::Exact => &self.exact_count,
            Outcome::Prefix => &self.prefix_count,
            Outcome::NotFound => &self.not_found_count,
        };
        counter.fetch_add(1, Ordering::Relaxed);
        self.total_lookup_us
            .fetch_add(duration_us, Ordering::Relaxed);

        // Only hits are ranked; their keys are bounded by the table
        if outcome == Outcome::NotFound {
            return;
        }
        if let Ok(mut top) = self.top_codes.lock() {
            *top.entry(code.to_string()).or_insert(0) += 1;
        }
    }
}

#[derive(Serialize)]
pub struct MetricsResponse {
    pub lookups: LookupMetrics,
    pub searches: u64,
    pub reloads: u64,
    pub reload_failures: u64,
    pub top_codes: Vec<CodeCount>,
}

#[derive(Serialize)]
pub struct LookupMetrics {
    pub total: u64,
    pub exact: u64,
    pub prefix: u64,
    pub not_found: u64,
    pub invalid: u64,
    pub avg_lookup_us: u64,
}

#[derive(Serialize)]
pub struct CodeCount {
    pub code: String,
    pub count: u64,
}

fn top_n_sorted(map: &HashMap<String, u64>, n: usize) -> Vec<(String, u64)> {
    let mut entries: Vec<_> = map.iter().map(|(k, v)| (k.clone(), *v)).collect();
    // Ties broken by code so the listing is stable between calls
    entries.sort_by(|a, b| b.1.cmp(&a.1).then_with(|| a.0.cmp(&b.0)));
    entries.truncate(n);
    entries
}

pub async fn metrics(State(state): State<SharedState>) -> Json<MetricsResponse> {
    let m = &state.metrics;
    let exact = m.exact_count.load(Ordering::Relaxed);
    let prefix = m.prefix_count.load(Ordering::Relaxed);
    let not_found = m.not_found_count.load(Ordering::Relaxed);
    let total = exact + prefix + not_found;
    let total_lookup_us = m.total_lookup_us.load(Ordering::Relaxed);

    let avg_lookup_us = if total > 0 {
        total_lookup_us / total
    } else {
        0
    };

    let top_codes = match m.top_codes.lock() {
        Ok(top) => top_n_sorted(&top, TOP_N)
            .into_iter()
            .map(|(code, count)| CodeCount { code, count })
            .collect(),
        Err(_) => Vec::new(),
    };

    Json(MetricsResponse {
        lookups: LookupMetrics {
            total,
            exact,
            prefix,
            not_found,
            invalid: m.invalid_count.load(Ordering::Relaxed),
            avg_lookup_us,
        },
        searches: m.search_count.load(Ordering::Relaxed),
        reloads: m.reload_count.load(Ordering::Relaxed),
        reload_failures: m.reload_failures.load(Ordering::Relaxed),
        top_codes,
    })
}
