// gem/core/execution/src/metrics.rs

// Metrics for tracking VM calls
use once_cell::sync::Lazy;
use prometheus::{register_counter_vec, register_histogram, CounterVec, Histogram};

pub static VM_CALLS_TOTAL: Lazy<CounterVec> = Lazy::new(|| {
    register_counter_vec!(
        "gem_vm_calls_total",
        "Number of read-only VM calls",
        &["status"]
    )
    .expect("register gem_vm_calls_total")
});

pub static VM_GAS_USED: Lazy<Histogram> = Lazy::new(|| {
    register_histogram!("gem_vm_gas_used", "Gas used by read-only VM calls")
        .expect("register gem_vm_gas_used")
});
