//! Port abstraction for the outbound account event stream.

use thiserror::Error;

use crate::domain::AccountEvent;

/// Errors surfaced when an event cannot be handed off.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum EventPublishError {
    /// The publisher has shut down or its backend is unreachable.
    #[error("event stream is unavailable: {message}")]
    Unavailable {
        /// Adapter-level detail.
        message: String,
    },
    /// The event was refused, e.g. because the send buffer is full.
    #[error("event was rejected: {message}")]
    Rejected {
        /// Adapter-level detail.
        message: String,
    },
}

impl EventPublishError {
    /// Build an [`EventPublishError::Unavailable`].
    pub fn unavailable(message: impl Into<String>) -> Self {
        Self::Unavailable {
            message: message.into(),
        }
    }

    /// Build an [`EventPublishError::Rejected`].
    pub fn rejected(message: impl Into<String>) -> Self {
        Self::Rejected {
            message: message.into(),
        }
    }
}

/// Fire-and-forget hand-off of account events.
///
/// `publish` must return without waiting on the broker. Delivery is
/// best-effort: implementations make a single attempt and never retry on
/// the caller's path.
#[cfg_attr(test, mockall::automock)]
pub trait AccountEventPublisher: Send + Sync {
    /// Queue `event` for delivery.
    fn publish(&self, event: AccountEvent) -> Result<(), EventPublishError>;
}
