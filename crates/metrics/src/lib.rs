//! Metrics collection and export for msgrelay.
//!
//! All instrumentation goes through the `metrics` crate facade. With the
//! `prometheus` feature the gateway can render them at `/metrics`; without it
//! every macro call is a no-op.
//!
//! ```rust,ignore
//! use msgrelay_metrics::{counter, labels, msgsvc};
//!
//! counter!(msgsvc::DISPATCH_TOTAL, labels::SERVICE => "svc-01").increment(1);
//! ```

mod definitions;
mod recorder;

pub use {
    definitions::*,
    recorder::{MetricsHandle, MetricsRecorderConfig, init_metrics},
};

// Re-export metrics macros for convenience
pub use metrics::{counter, gauge, histogram};
