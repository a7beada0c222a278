//! Prometheus metrics for the import engine.
//!
//! This module provides metrics for:
//! - Import requests by provider, operation and outcome
//! - Upstream call latency
//! - Search results dropped during normalization

use once_cell::sync::Lazy;
use prometheus::{HistogramOpts, HistogramVec, IntCounterVec, Opts};

/// Import requests total by provider, operation and outcome.
pub static IMPORT_REQUESTS: Lazy<IntCounterVec> = Lazy::new(|| {
    IntCounterVec::new(
        Opts::new("album_import_requests_total", "Total import requests"),
        &["provider", "operation", "outcome"], // outcome: "success" or an error kind
    )
    .unwrap()
});

/// Upstream call duration in seconds.
pub static UPSTREAM_DURATION: Lazy<HistogramVec> = Lazy::new(|| {
    HistogramVec::new(
        HistogramOpts::new(
            "album_import_upstream_duration_seconds",
            "Duration of calls to external metadata providers",
        )
        .buckets(vec![0.05, 0.1, 0.25, 0.5, 1.0, 2.5, 5.0, 10.0, 30.0]),
        &["provider", "operation"],
    )
    .unwrap()
});

/// Search results skipped because they lacked required fields.
pub static SEARCH_RESULTS_SKIPPED: Lazy<IntCounterVec> = Lazy::new(|| {
    IntCounterVec::new(
        Opts::new(
            "album_import_search_results_skipped_total",
            "Search results dropped during normalization",
        ),
        &["provider"],
    )
    .unwrap()
});

/// All core metrics, for registration in the server's registry.
pub fn all_metrics() -> Vec<Box<dyn prometheus::core::Collector>> {
    vec![
        Box::new(IMPORT_REQUESTS.clone()),
        Box::new(UPSTREAM_DURATION.clone()),
        Box::new(SEARCH_RESULTS_SKIPPED.clone()),
    ]
}
