//! Publisher that records events in the structured log only.

use tracing::info;

use crate::domain::AccountEvent;
use crate::domain::ports::{AccountEventPublisher, EventPublishError};

/// Logs each event at `info` instead of delivering it.
#[derive(Debug, Default, Clone, Copy)]
pub struct LoggingEventPublisher;

impl AccountEventPublisher for LoggingEventPublisher {
    fn publish(&self, event: AccountEvent) -> Result<(), EventPublishError> {
        let envelope = event
            .envelope()
            .map_err(|err| EventPublishError::rejected(err.to_string()))?;
        info!(
            event_type = envelope.event_type,
            subject_id = %envelope.subject_id,
            trace_id = envelope.trace_id.as_deref(),
            "account event"
        );
        Ok(())
    }
}
