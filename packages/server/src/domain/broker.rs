//! Message broker seam.

use async_trait::async_trait;
use futures_util::stream::BoxStream;

use super::{BrokerMessage, error::BrokerError};

/// Stream of messages delivered by one subscription, in broker order.
///
/// The stream ends when the broker connection is lost.
pub type BrokerStream = BoxStream<'static, BrokerMessage>;

#[async_trait]
pub trait BrokerConnector: Send + Sync {
    /// Open a fresh connection and subscribe to `channels`.
    async fn subscribe(&self, channels: &[String]) -> Result<BrokerStream, BrokerError>;
}
