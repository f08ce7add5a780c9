//! Pub/Sub bridge.
//!
//! Owns the broker subscription and forwards every message it receives,
//! in broker order, to [`RelayEventUseCase`]. When the subscription cannot
//! be established or the broker drops it, the bridge resubscribes with
//! exponential backoff until the service shuts down.

use std::{sync::Arc, time::Duration};

use futures_util::StreamExt;
use tokio::sync::watch;

use crate::{
    domain::{BrokerConnector, BrokerMessage},
    usecase::RelayEventUseCase,
};

/// Resubscribe delays: `initial`, doubling up to `max`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ReconnectPolicy {
    pub initial: Duration,
    pub max: Duration,
}

impl ReconnectPolicy {
    pub fn new(initial: Duration, max: Duration) -> Self {
        Self {
            initial,
            max: max.max(initial),
        }
    }

    pub fn next_delay(&self, current: Duration) -> Duration {
        current.saturating_mul(2).min(self.max)
    }
}

impl Default for ReconnectPolicy {
    fn default() -> Self {
        Self::new(Duration::from_millis(500), Duration::from_secs(30))
    }
}

pub struct PubSubBridge {
    connector: Arc<dyn BrokerConnector>,
    relay: RelayEventUseCase,
    channels: Vec<String>,
    reconnect: ReconnectPolicy,
}

impl PubSubBridge {
    pub fn new(
        connector: Arc<dyn BrokerConnector>,
        relay: RelayEventUseCase,
        channels: Vec<String>,
        reconnect: ReconnectPolicy,
    ) -> Self {
        Self {
            connector,
            relay,
            channels,
            reconnect,
        }
    }

    /// Run until `shutdown` flips to `true` or its sender is dropped.
    pub async fn run(self, mut shutdown: watch::Receiver<bool>) {
        let mut delay = self.reconnect.initial;

        loop {
            if *shutdown.borrow() {
                break;
            }

            let subscribed = tokio::select! {
                result = self.connector.subscribe(&self.channels) => result,
                _ = shutdown.changed() => break,
            };

            match subscribed {
                Ok(mut stream) => {
                    tracing::info!("Subscribed to broker channels {:?}", self.channels);
                    delay = self.reconnect.initial;

                    loop {
                        tokio::select! {
                            message = stream.next() => match message {
                                Some(message) => self.handle(message).await,
                                None => {
                                    tracing::warn!("Broker subscription ended");
                                    break;
                                }
                            },
                            _ = shutdown.changed() => {
                                tracing::info!("Releasing broker subscription");
                                return;
                            }
                        }
                    }
                }
                Err(e) => {
                    tracing::error!("Broker subscription failed: {}", e);
                }
            }

            tracing::info!("Resubscribing to broker in {:?}", delay);
            tokio::select! {
                _ = tokio::time::sleep(delay) => {}
                _ = shutdown.changed() => break,
            }
            delay = self.reconnect.next_delay(delay);
        }

        tracing::info!("Pub/Sub bridge stopped");
    }

    async fn handle(&self, message: BrokerMessage) {
        // decode and routing errors only drop this message
        if let Err(e) = self.relay.execute(message).await {
            tracing::warn!("Dropping broker message: {}", e);
        }
    }
}
