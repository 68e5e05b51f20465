//! Event stream adapters.
//!
//! - [`RedisStreamPublisher`] appends envelopes to Redis streams from a
//!   background task.
//! - [`LoggingEventPublisher`] writes envelopes to the log when no stream is
//!   configured.

mod logging_event_publisher;
mod redis_stream_publisher;

pub use logging_event_publisher::LoggingEventPublisher;
pub use redis_stream_publisher::{RedisStreamPublisher, StreamConfig};
