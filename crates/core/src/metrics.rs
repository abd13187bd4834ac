//! Prometheus metrics for core components.
//!
//! This module provides metrics for:
//! - Storage backends (operations by backend and outcome)
//! - Catalog mutations (add, delete, update)
//! - Metadata lookups against the external service

use once_cell::sync::Lazy;
use prometheus::{HistogramOpts, HistogramVec, IntCounterVec, Opts};

// =============================================================================
// Storage Metrics
// =============================================================================

/// Storage operations by backend, operation and result.
pub static STORE_OPERATIONS: Lazy<IntCounterVec> = Lazy::new(|| {
    IntCounterVec::new(
        Opts::new(
            "cinelog_store_operations_total",
            "Total storage backend operations",
        ),
        &["backend", "operation", "result"], // result: "ok" or an error kind
    )
    .unwrap()
});

// =============================================================================
// Catalog Metrics
// =============================================================================

/// Catalog mutations by operation and result.
pub static CATALOG_MUTATIONS: Lazy<IntCounterVec> = Lazy::new(|| {
    IntCounterVec::new(
        Opts::new(
            "cinelog_catalog_mutations_total",
            "Total catalog mutation requests",
        ),
        &["operation", "result"],
    )
    .unwrap()
});

// =============================================================================
// Resolver Metrics
// =============================================================================

/// Metadata lookups by result.
pub static RESOLVER_LOOKUPS: Lazy<IntCounterVec> = Lazy::new(|| {
    IntCounterVec::new(
        Opts::new(
            "cinelog_resolver_lookups_total",
            "Total metadata lookups against the external service",
        ),
        &["result"], // "found", "not_found", "transient"
    )
    .unwrap()
});

/// Metadata lookup latency.
pub static RESOLVER_DURATION: Lazy<HistogramVec> = Lazy::new(|| {
    HistogramVec::new(
        HistogramOpts::new(
            "cinelog_resolver_duration_seconds",
            "Duration of metadata lookups",
        )
        .buckets(vec![0.05, 0.1, 0.25, 0.5, 1.0, 2.5, 5.0, 10.0, 30.0]),
        &["result"],
    )
    .unwrap()
});

// =============================================================================
// Helpers
// =============================================================================

/// Record a storage operation outcome.
pub fn record_store_op(backend: &str, operation: &str, result: &str) {
    STORE_OPERATIONS
        .with_label_values(&[backend, operation, result])
        .inc();
}

/// Record a catalog mutation outcome.
pub fn record_mutation(operation: &str, result: &str) {
    CATALOG_MUTATIONS
        .with_label_values(&[operation, result])
        .inc();
}

/// Record a metadata lookup outcome and its duration.
pub fn record_lookup(result: &str, duration_secs: f64) {
    RESOLVER_LOOKUPS.with_label_values(&[result]).inc();
    RESOLVER_DURATION
        .with_label_values(&[result])
        .observe(duration_secs);
}

/// All core metrics, for registration in the host's registry.
pub fn all_metrics() -> Vec<Box<dyn prometheus::core::Collector>> {
    vec![
        Box::new(STORE_OPERATIONS.clone()),
        Box::new(CATALOG_MUTATIONS.clone()),
        Box::new(RESOLVER_LOOKUPS.clone()),
        Box::new(RESOLVER_DURATION.clone()),
    ]
}
