//! Shared helpers for the integration tests.
//!
//! [`TestServer`] starts a real relay on an ephemeral port with an in-process
//! broker in place of Redis.

#![allow(dead_code)]

use std::{sync::Arc, time::Duration};

use async_trait::async_trait;
use futures_util::{SinkExt, StreamExt, stream};
use relay_server::{
    RelayConfig, RelayService, RunningRelay,
    domain::{BrokerConnector, BrokerError, BrokerMessage, BrokerStream},
    infrastructure::{auth::JwtTokenVerifier, registry::InMemoryConnectionRegistry},
};
use serde_json::{Value, json};
use tokio::{
    net::TcpStream,
    sync::{Mutex, mpsc},
};
use tokio_tungstenite::{
    MaybeTlsStream, WebSocketStream, connect_async, tungstenite::protocol::Message,
};

pub const JWT_SECRET: &str = "integration-test-secret";
pub const ORDERS_CHANNEL: &str = "orders";

/// In-process broker: everything published is delivered to the first
/// subscription.
pub struct ChannelConnector {
    receiver: Mutex<Option<mpsc::UnboundedReceiver<BrokerMessage>>>,
}

#[async_trait]
impl BrokerConnector for ChannelConnector {
    async fn subscribe(&self, _channels: &[String]) -> Result<BrokerStream, BrokerError> {
        match self.receiver.lock().await.take() {
            Some(rx) => Ok(stream::unfold(rx, |mut rx| async move {
                rx.recv().await.map(|message| (message, rx))
            })
            .boxed()),
            None => Ok(stream::pending::<BrokerMessage>().boxed()),
        }
    }
}

pub struct TestServer {
    relay: Option<RunningRelay>,
    registry: Arc<InMemoryConnectionRegistry>,
    publisher: mpsc::UnboundedSender<BrokerMessage>,
    base_url: String,
    ws_url: String,
}

pub fn test_config(dev_reload: bool, reload_secret: &str) -> RelayConfig {
    RelayConfig {
        host: "127.0.0.1".to_string(),
        port: 0,
        redis_url: "redis://127.0.0.1:6379".to_string(),
        orders_channel: ORDERS_CHANNEL.to_string(),
        jwt_secret: JWT_SECRET.to_string(),
        jwt_algorithm: "HS256".to_string(),
        jwt_leeway_secs: 0,
        dev_reload,
        dev_reload_secret: reload_secret.to_string(),
        reconnect_initial_ms: 50,
        reconnect_max_ms: 200,
        log_level: "debug".to_string(),
    }
}

impl TestServer {
    /// Start a relay with the dev channel enabled and no reload secret.
    pub async fn start() -> Self {
        Self::start_with(test_config(true, "")).await
    }

    pub async fn start_with(config: RelayConfig) -> Self {
        let (publisher, rx) = mpsc::unbounded_channel();
        let connector = Arc::new(ChannelConnector {
            receiver: Mutex::new(Some(rx)),
        });
        let verifier = Arc::new(
            JwtTokenVerifier::new(config.jwt_secret.as_bytes(), &config.jwt_algorithm)
                .expect("Failed to build verifier")
                .with_leeway(config.jwt_leeway_secs),
        );

        let service = RelayService::new(config, verifier, connector);
        let registry = service.registry();
        let relay = service.start().await.expect("Failed to start relay");
        let addr = relay.local_addr();

        Self {
            relay: Some(relay),
            registry,
            publisher,
            base_url: format!("http://{}", addr),
            ws_url: format!("ws://{}", addr),
        }
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    pub fn registry(&self) -> Arc<InMemoryConnectionRegistry> {
        self.registry.clone()
    }

    /// Publish a raw payload on a broker channel.
    pub fn publish(&self, channel: &str, payload: impl Into<String>) {
        self.publisher
            .send(BrokerMessage::new(channel, payload))
            .expect("Bridge dropped the broker receiver");
    }

    /// Connect to the default channel with `token` as the query credential.
    pub async fn connect_default(&self, token: &str) -> TestClient {
        TestClient::connect(&format!("{}/ws?token={}", self.ws_url, token)).await
    }

    /// Connect to the default channel without any credential.
    pub async fn connect_default_anonymous(&self) -> TestClient {
        TestClient::connect(&format!("{}/ws", self.ws_url)).await
    }

    pub async fn connect_dev(&self) -> TestClient {
        TestClient::connect(&format!("{}/dev/ws", self.ws_url)).await
    }

    pub async fn stop(mut self) {
        if let Some(relay) = self.relay.take() {
            relay.stop().await.expect("Failed to stop relay");
        }
    }
}

pub struct TestClient {
    stream: WebSocketStream<MaybeTlsStream<TcpStream>>,
}

impl TestClient {
    async fn connect(url: &str) -> Self {
        let (stream, _) = connect_async(url)
            .await
            .expect("Failed to connect WebSocket");
        Self { stream }
    }

    /// Next frame, or `None` if nothing arrives within `wait`.
    pub async fn next_message(&mut self, wait: Duration) -> Option<Message> {
        match tokio::time::timeout(wait, self.stream.next()).await {
            Ok(Some(Ok(message))) => Some(message),
            _ => None,
        }
    }

    /// Next text frame decoded as an `{"event", "data"}` envelope.
    pub async fn next_event(&mut self, wait: Duration) -> Option<Value> {
        loop {
            match self.next_message(wait).await? {
                Message::Text(text) => {
                    return Some(serde_json::from_str(&text).expect("Frame is not JSON"));
                }
                Message::Ping(_) | Message::Pong(_) => continue,
                _ => return None,
            }
        }
    }

    /// Wait for the `connected` frame sent after admission.
    pub async fn expect_connected(&mut self) -> Value {
        let event = self
            .next_event(Duration::from_secs(2))
            .await
            .expect("No connected frame received");
        assert_eq!(event["event"], "connected");
        event["data"].clone()
    }

    pub async fn close(mut self) {
        let _ = self.stream.send(Message::Close(None)).await;
    }
}

/// Sign a token the way the backend does.
pub fn sign_token(subject: &str, role: &str) -> String {
    sign_claims(json!({
        "sub": subject,
        "role": role,
        "exp": relay_shared::time::now_secs() + 3600,
    }))
}

pub fn sign_claims(claims: Value) -> String {
    jsonwebtoken::encode(
        &jsonwebtoken::Header::default(),
        &claims,
        &jsonwebtoken::EncodingKey::from_secret(JWT_SECRET.as_bytes()),
    )
    .expect("Failed to sign token")
}
