//! Prometheus-backed metrics adapters, compiled with the `metrics` feature.

mod prometheus_accounts;

pub use prometheus_accounts::PrometheusAccountMetrics;
