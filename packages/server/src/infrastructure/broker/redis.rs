//! Redis pub/sub connector.

use async_trait::async_trait;
use futures_util::{StreamExt, future};

use crate::domain::{BrokerConnector, BrokerError, BrokerMessage, BrokerStream};

/// Subscribes to Redis pub/sub channels.
///
/// Every call to [`BrokerConnector::subscribe`] opens a dedicated pub/sub
/// connection; dropping the returned stream closes it.
pub struct RedisConnector {
    client: redis::Client,
}

impl RedisConnector {
    pub fn new(url: &str) -> Result<Self, BrokerError> {
        let client = redis::Client::open(url).map_err(|e| BrokerError::Connect(e.to_string()))?;
        Ok(Self { client })
    }
}

#[async_trait]
impl BrokerConnector for RedisConnector {
    async fn subscribe(&self, channels: &[String]) -> Result<BrokerStream, BrokerError> {
        let mut pubsub = self
            .client
            .get_async_pubsub()
            .await
            .map_err(|e| BrokerError::Connect(e.to_string()))?;

        for channel in channels {
            pubsub
                .subscribe(channel.as_str())
                .await
                .map_err(|e| BrokerError::Subscribe {
                    channels: channels.to_vec(),
                    reason: e.to_string(),
                })?;
        }

        let stream = pubsub.into_on_message().filter_map(|msg| {
            let channel = msg.get_channel_name().to_string();
            let message = match msg.get_payload::<String>() {
                Ok(payload) => Some(BrokerMessage::new(channel, payload)),
                Err(e) => {
                    tracing::warn!("Dropping non-text message on '{}': {}", channel, e);
                    None
                }
            };
            future::ready(message)
        });

        Ok(stream.boxed())
    }
}
