//! Prometheus adapter for account activity counters.

use async_trait::async_trait;
use prometheus::{IntCounter, Registry};

use crate::domain::ports::{AccountMetrics, AccountMetricsError};

/// Counts registrations and successful logins.
pub struct PrometheusAccountMetrics {
    registrations: IntCounter,
    logins: IntCounter,
}

impl PrometheusAccountMetrics {
    /// Create and register counters with the provided registry.
    ///
    /// # Errors
    ///
    /// Returns an error when Prometheus rejects metric registration.
    pub fn new(registry: &Registry) -> Result<Self, prometheus::Error> {
        let registrations =
            IntCounter::new("user_registrations_total", "Total successful registrations")?;
        let logins = IntCounter::new("user_logins_total", "Total successful logins")?;
        registry.register(Box::new(registrations.clone()))?;
        registry.register(Box::new(logins.clone()))?;
        Ok(Self {
            registrations,
            logins,
        })
    }
}

#[async_trait]
impl AccountMetrics for PrometheusAccountMetrics {
    async fn record_registration(&self) -> Result<(), AccountMetricsError> {
        self.registrations.inc();
        Ok(())
    }

    async fn record_login(&self) -> Result<(), AccountMetricsError> {
        self.logins.inc();
        Ok(())
    }
}
