//! Domain port for recording account activity counters.
//!
//! Implementations may export to Prometheus or discard everything. Recording
//! is best-effort and never affects the outcome of an operation.

use async_trait::async_trait;
use thiserror::Error;

/// Errors exposed when recording account metrics.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum AccountMetricsError {
    /// Metric exporter rejected the write.
    #[error("account metrics exporter failed: {message}")]
    Export {
        /// Exporter detail.
        message: String,
    },
}

impl AccountMetricsError {
    /// Build an [`AccountMetricsError::Export`].
    pub fn export(message: impl Into<String>) -> Self {
        Self::Export {
            message: message.into(),
        }
    }
}

/// Counters for successful registrations and logins.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait AccountMetrics: Send + Sync {
    /// Count one successful registration.
    async fn record_registration(&self) -> Result<(), AccountMetricsError>;

    /// Count one successful login.
    async fn record_login(&self) -> Result<(), AccountMetricsError>;
}

/// No-op implementation for when metrics are disabled or in tests.
#[derive(Debug, Default, Clone, Copy)]
pub struct NoOpAccountMetrics;

#[async_trait]
impl AccountMetrics for NoOpAccountMetrics {
    async fn record_registration(&self) -> Result<(), AccountMetricsError> {
        Ok(())
    }

    async fn record_login(&self) -> Result<(), AccountMetricsError> {
        Ok(())
    }
}
