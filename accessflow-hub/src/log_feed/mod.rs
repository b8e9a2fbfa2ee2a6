//! Live access log: bounded buffer plus the synthetic feed that fills it

pub mod buffer;
pub mod generator;

pub use buffer::{AccessLogBuffer, SharedLogBuffer, DEFAULT_CAPACITY};
pub use generator::{FeedHandle, LogFeed, SyntheticEventSource, DEFAULT_FEED_INTERVAL};
