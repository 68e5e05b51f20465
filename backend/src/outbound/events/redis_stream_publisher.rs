//! Redis Streams adapter for the account event port.
//!
//! `publish` encodes the envelope on the caller's task, so the trace id in
//! scope is captured, then hands it to a bounded channel. A single background
//! task drains the channel with one `XADD` per event. Failed appends are
//! logged and dropped.

use bb8_redis::redis;
use tokio::sync::mpsc::{self, error::TrySendError};
use tokio::task::JoinHandle;
use tracing::{debug, warn};

use crate::domain::AccountEvent;
use crate::domain::ports::{AccountEventPublisher, EventPublishError};
use crate::outbound::redis_pool::RedisPool;

/// Stream naming, trimming, and buffering.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StreamConfig {
    /// Streams are named `{prefix}:{event_type}`.
    pub prefix: String,
    /// Approximate `MAXLEN` applied on every append.
    pub max_len: u64,
    /// Events held in memory while the appender catches up.
    pub buffer: usize,
}

impl Default for StreamConfig {
    fn default() -> Self {
        Self {
            prefix: "events".to_owned(),
            max_len: 100_000,
            buffer: 1024,
        }
    }
}

/// An encoded event waiting to be appended.
#[derive(Debug, Clone, PartialEq, Eq)]
struct StreamEntry {
    stream: String,
    envelope: String,
}

/// Fire-and-forget publisher backed by Redis Streams.
#[derive(Debug, Clone)]
pub struct RedisStreamPublisher {
    prefix: String,
    sender: mpsc::Sender<StreamEntry>,
}

impl RedisStreamPublisher {
    /// Start the background appender and return a publisher feeding it.
    ///
    /// The task ends once every publisher clone has been dropped and the
    /// buffer is drained.
    pub fn spawn(pool: RedisPool, config: StreamConfig) -> (Self, JoinHandle<()>) {
        let max_len = config.max_len;
        let (publisher, receiver) = Self::channel(config);
        let handle = tokio::spawn(run_appender(pool, receiver, max_len));
        (publisher, handle)
    }

    fn channel(config: StreamConfig) -> (Self, mpsc::Receiver<StreamEntry>) {
        let (sender, receiver) = mpsc::channel(config.buffer.max(1));
        (
            Self {
                prefix: config.prefix,
                sender,
            },
            receiver,
        )
    }
}

impl AccountEventPublisher for RedisStreamPublisher {
    fn publish(&self, event: AccountEvent) -> Result<(), EventPublishError> {
        let envelope = event
            .envelope()
            .map_err(|err| EventPublishError::rejected(err.to_string()))?;
        let stream = format!("{}:{}", self.prefix, envelope.event_type);
        let envelope = serde_json::to_string(&envelope)
            .map_err(|err| EventPublishError::rejected(err.to_string()))?;
        self.sender
            .try_send(StreamEntry { stream, envelope })
            .map_err(|err| match err {
                TrySendError::Full(_) => EventPublishError::rejected("event buffer is full"),
                TrySendError::Closed(_) => EventPublishError::unavailable("event appender stopped"),
            })
    }
}

async fn run_appender(pool: RedisPool, mut receiver: mpsc::Receiver<StreamEntry>, max_len: u64) {
    while let Some(entry) = receiver.recv().await {
        match append(&pool, &entry, max_len).await {
            Ok(id) => debug!(stream = %entry.stream, %id, "event appended"),
            Err(message) => {
                warn!(stream = %entry.stream, %message, "dropping event after failed append");
            }
        }
    }
    debug!("event appender stopped");
}

async fn append(pool: &RedisPool, entry: &StreamEntry, max_len: u64) -> Result<String, String> {
    let mut conn = pool.get().await.map_err(|err| err.to_string())?;
    redis::cmd("XADD")
        .arg(&entry.stream)
        .arg("MAXLEN")
        .arg("~")
        .arg(max_len)
        .arg("*")
        .arg("envelope")
        .arg(&entry.envelope)
        .query_async::<String>(&mut *conn)
        .await
        .map_err(|err| err.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::{TraceId, UserId};
    use chrono::Utc;
    use rstest::rstest;
    use serde_json::Value;

    fn follow_event() -> AccountEvent {
        AccountEvent::Followed {
            follower_id: UserId::random(),
            followee_id: UserId::random(),
            at: Utc::now(),
        }
    }

    fn config(buffer: usize) -> StreamConfig {
        StreamConfig {
            buffer,
            ..StreamConfig::default()
        }
    }

    #[rstest]
    fn entries_are_routed_by_event_type() {
        let (publisher, mut receiver) = RedisStreamPublisher::channel(config(4));
        publisher.publish(follow_event()).expect("queued");

        let entry = receiver.try_recv().expect("entry");
        assert_eq!(entry.stream, "events:user.follow");
        let envelope: Value = serde_json::from_str(&entry.envelope).expect("json");
        assert_eq!(envelope["eventType"], "user.follow");
        assert_eq!(envelope["payload"]["action"], "follow");
    }

    #[rstest]
    fn full_buffer_rejects_without_blocking() {
        let (publisher, _receiver) = RedisStreamPublisher::channel(config(1));
        publisher.publish(follow_event()).expect("first fits");

        let error = publisher.publish(follow_event()).expect_err("buffer full");
        assert!(matches!(error, EventPublishError::Rejected { .. }));
    }

    #[rstest]
    fn stopped_appender_reports_unavailable() {
        let (publisher, receiver) = RedisStreamPublisher::channel(config(4));
        drop(receiver);

        let error = publisher.publish(follow_event()).expect_err("closed");
        assert!(matches!(error, EventPublishError::Unavailable { .. }));
    }

    #[tokio::test]
    async fn envelope_carries_the_publishing_trace() {
        let (publisher, mut receiver) = RedisStreamPublisher::channel(config(4));
        let trace_id = TraceId::generate();
        TraceId::scope(trace_id, async { publisher.publish(follow_event()) })
            .await
            .expect("queued");

        let entry = receiver.try_recv().expect("entry");
        let envelope: Value = serde_json::from_str(&entry.envelope).expect("json");
        assert_eq!(envelope["traceId"], trace_id.to_string());
    }
}
