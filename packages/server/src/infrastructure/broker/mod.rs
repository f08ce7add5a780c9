//! Broker connectors.

pub mod redis;

pub use self::redis::RedisConnector;
