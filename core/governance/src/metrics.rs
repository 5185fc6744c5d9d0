// gem/core/governance/src/metrics.rs

// Metrics for tracking governance queries
use once_cell::sync::Lazy;
use prometheus::{register_int_counter_vec, IntCounterVec};

pub static GOVERNANCE_QUERIES_TOTAL: Lazy<IntCounterVec> = Lazy::new(|| {
    register_int_counter_vec!(
        "gem_governance_queries_total",
        "Governance contract queries by method and outcome",
        &["method", "status"]
    )
    .expect("register gem_governance_queries_total")
});
