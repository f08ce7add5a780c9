//! Relay service lifecycle.
//!
//! [`RelayService`] wires the gateway, the reload endpoint and the Pub/Sub
//! bridge together. [`RelayService::start`] binds the listener and spawns
//! both tasks; [`RunningRelay::stop`] shuts them down and closes every
//! open client connection.

use std::{io, net::SocketAddr, sync::Arc};

use thiserror::Error;
use tokio::{net::TcpListener, sync::watch, task::JoinHandle};

use crate::{
    config::RelayConfig,
    domain::{
        BrokerConnector, BrokerError, ConnectionRegistry, RoomPolicy, RouteTable, TokenVerifier,
        ValueObjectError,
    },
    infrastructure::{
        auth::{JwtKeyError, JwtTokenVerifier},
        broker::RedisConnector,
        registry::InMemoryConnectionRegistry,
    },
    ui::{AppState, PubSubBridge, build_router},
    usecase::RelayEventUseCase,
};

#[derive(Debug, Error)]
pub enum ServerError {
    #[error("invalid token verifier configuration: {0}")]
    Jwt(#[from] JwtKeyError),

    #[error("broker error: {0}")]
    Broker(#[from] BrokerError),

    #[error("invalid configuration: {0}")]
    Config(#[from] ValueObjectError),

    #[error("failed to bind {addr}: {source}")]
    Bind { addr: String, source: io::Error },

    #[error("I/O error: {0}")]
    Io(#[from] io::Error),

    #[error("task failed: {0}")]
    Join(#[from] tokio::task::JoinError),
}

pub struct RelayService {
    config: RelayConfig,
    registry: Arc<InMemoryConnectionRegistry>,
    verifier: Arc<dyn TokenVerifier>,
    connector: Arc<dyn BrokerConnector>,
}

impl RelayService {
    pub fn new(
        config: RelayConfig,
        verifier: Arc<dyn TokenVerifier>,
        connector: Arc<dyn BrokerConnector>,
    ) -> Self {
        Self {
            config,
            registry: Arc::new(InMemoryConnectionRegistry::new()),
            verifier,
            connector,
        }
    }

    /// Build the production service: JWT verifier and Redis connector.
    pub fn from_config(config: RelayConfig) -> Result<Self, ServerError> {
        let verifier = JwtTokenVerifier::new(config.jwt_secret.as_bytes(), &config.jwt_algorithm)?
            .with_leeway(config.jwt_leeway_secs);
        let connector = RedisConnector::new(&config.redis_url)?;
        Ok(Self::new(config, Arc::new(verifier), Arc::new(connector)))
    }

    pub fn registry(&self) -> Arc<InMemoryConnectionRegistry> {
        self.registry.clone()
    }

    /// Bind the listener and spawn the HTTP server and the Pub/Sub bridge.
    pub async fn start(self) -> Result<RunningRelay, ServerError> {
        let Self {
            config,
            registry,
            verifier,
            connector,
        } = self;

        let routes = Arc::new(RouteTable::standard(&config.orders_channel)?);
        let room_policy = Arc::new(RoomPolicy::standard()?);
        let registry: Arc<dyn ConnectionRegistry> = registry;
        let (shutdown_tx, shutdown_rx) = watch::channel(false);

        let state = Arc::new(AppState {
            registry: registry.clone(),
            verifier,
            room_policy,
            reload_secret: config.reload_secret(),
            shutdown: shutdown_rx.clone(),
        });
        let app = build_router(state, config.dev_reload);

        let addr = config.bind_addr();
        let listener = TcpListener::bind(&addr)
            .await
            .map_err(|source| ServerError::Bind {
                addr: addr.clone(),
                source,
            })?;
        let local_addr = listener.local_addr()?;

        tracing::info!("Relay listening on {}", local_addr);
        if config.dev_reload {
            tracing::warn!("Dev reload endpoints are enabled (/dev/ws, /dev/reload)");
            if !config.reload_secret().is_configured() {
                tracing::warn!("No reload secret configured; /dev/reload is open");
            }
        }

        let mut server_shutdown = shutdown_rx.clone();
        let server = tokio::spawn(async move {
            axum::serve(listener, app)
                .with_graceful_shutdown(async move {
                    let _ = server_shutdown.wait_for(|stopping| *stopping).await;
                })
                .await
        });

        let channels = routes.channels();
        let relay = RelayEventUseCase::new(registry, routes);
        let bridge = PubSubBridge::new(connector, relay, channels, config.reconnect_policy());
        let bridge = tokio::spawn(bridge.run(shutdown_rx));

        Ok(RunningRelay {
            local_addr,
            shutdown: shutdown_tx,
            server,
            bridge,
        })
    }
}

/// Handle to a started relay.
pub struct RunningRelay {
    local_addr: SocketAddr,
    shutdown: watch::Sender<bool>,
    server: JoinHandle<io::Result<()>>,
    bridge: JoinHandle<()>,
}

impl RunningRelay {
    pub fn local_addr(&self) -> SocketAddr {
        self.local_addr
    }

    /// Stop accepting connections, close open sockets and release the
    /// broker subscription.
    pub async fn stop(self) -> Result<(), ServerError> {
        tracing::info!("Stopping relay");
        // receivers may already be gone if both tasks exited
        let _ = self.shutdown.send(true);

        self.bridge.await?;
        self.server.await??;

        tracing::info!("Relay stopped");
        Ok(())
    }
}
