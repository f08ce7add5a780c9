//! WebSocket connection handlers.

use std::sync::Arc;

use axum::{
    extract::{
        Query, State,
        ws::{CloseFrame, Message, WebSocket, WebSocketUpgrade},
    },
    http::{HeaderMap, header::AUTHORIZATION},
    response::IntoResponse,
};
use futures_util::{sink::SinkExt, stream::StreamExt};
use tokio::sync::mpsc;

use crate::{
    domain::{AuthError, Connection},
    infrastructure::dto::websocket::{
        CONNECT_ERROR_EVENT, CONNECTED_EVENT, ConnectErrorPayload, ConnectedPayload,
        UNAUTHORIZED_CLOSE_CODE, encode_event,
    },
    ui::state::{AppState, ConnectQuery},
    usecase::{AdmitConnectionUseCase, AdmitError, ReleaseConnectionUseCase},
};

/// Authenticated default channel (`GET /ws`)
///
/// The credential is read from the `token` query parameter, falling back to
/// the `Authorization` header.
pub async fn default_ws_handler(
    ws: WebSocketUpgrade,
    State(state): State<Arc<AppState>>,
    Query(query): Query<ConnectQuery>,
    headers: HeaderMap,
) -> impl IntoResponse {
    let credential = query
        .token
        .or_else(|| {
            headers
                .get(AUTHORIZATION)
                .and_then(|value| value.to_str().ok())
                .map(str::to_string)
        })
        .unwrap_or_default();

    ws.on_upgrade(move |socket| handle_default_socket(socket, state, credential))
}

/// Unauthenticated dev channel (`GET /dev/ws`)
pub async fn dev_ws_handler(
    ws: WebSocketUpgrade,
    State(state): State<Arc<AppState>>,
) -> impl IntoResponse {
    ws.on_upgrade(move |socket| handle_dev_socket(socket, state))
}

async fn handle_default_socket(socket: WebSocket, state: Arc<AppState>, credential: String) {
    let (tx, rx) = mpsc::unbounded_channel();
    let admit_usecase = AdmitConnectionUseCase::new(
        state.registry.clone(),
        state.verifier.clone(),
        state.room_policy.clone(),
    );

    match admit_usecase.admit_authenticated(&credential, tx).await {
        Ok(connection) => {
            tracing::info!(
                "Admitted '{}' (subject: {:?}, rooms: {:?})",
                connection.id,
                connection.claims.as_ref().map(|c| c.subject.as_str()),
                connection.rooms
            );
            serve_connection(socket, state, connection, rx).await;
        }
        Err(AdmitError::Unauthenticated(e)) => {
            tracing::warn!("Rejecting connection: {}", e);
            reject_socket(socket, e).await;
        }
        Err(AdmitError::Registry(e)) => {
            tracing::error!("Failed to register connection: {}", e);
        }
    }
}

async fn handle_dev_socket(socket: WebSocket, state: Arc<AppState>) {
    let (tx, rx) = mpsc::unbounded_channel();
    let admit_usecase = AdmitConnectionUseCase::new(
        state.registry.clone(),
        state.verifier.clone(),
        state.room_policy.clone(),
    );

    match admit_usecase.admit_dev(tx).await {
        Ok(connection) => {
            tracing::info!("Admitted dev client '{}'", connection.id);
            serve_connection(socket, state, connection, rx).await;
        }
        Err(e) => {
            tracing::error!("Failed to register dev connection: {}", e);
        }
    }
}

/// Send the authentication error signal, then close.
async fn reject_socket(mut socket: WebSocket, error: AuthError) {
    match encode_event(
        CONNECT_ERROR_EVENT,
        &ConnectErrorPayload::unauthorized(error.kind()),
    ) {
        Ok(text) => {
            if let Err(e) = socket.send(Message::Text(text.into())).await {
                tracing::debug!("Failed to send connect_error: {}", e);
                return;
            }
        }
        Err(e) => tracing::warn!("Failed to encode connect_error: {}", e),
    }

    let close = Message::Close(Some(CloseFrame {
        code: UNAUTHORIZED_CLOSE_CODE,
        reason: "unauthorized".into(),
    }));
    if let Err(e) = socket.send(close).await {
        tracing::debug!("Failed to send close frame: {}", e);
    }
}

/// Pump queued messages to an admitted client until it disconnects or the
/// service stops, then release it.
async fn serve_connection(
    socket: WebSocket,
    state: Arc<AppState>,
    connection: Connection,
    mut rx: mpsc::UnboundedReceiver<String>,
) {
    let (mut sender, mut receiver) = socket.split();
    let connection_id = connection.id.clone();

    // Tell the client it has been admitted before anything queued for it
    match encode_event(CONNECTED_EVENT, &ConnectedPayload::from(&connection)) {
        Ok(text) => {
            if let Err(e) = sender.send(Message::Text(text.into())).await {
                tracing::warn!("Failed to send connected to '{}': {}", connection_id, e);
            }
        }
        Err(e) => tracing::warn!("Failed to encode connected: {}", e),
    }

    let mut shutdown = state.shutdown.clone();

    // Spawn a task to forward broadcasts to this client
    let mut send_task = tokio::spawn(async move {
        loop {
            tokio::select! {
                msg = rx.recv() => match msg {
                    Some(text) => {
                        if sender.send(Message::Text(text.into())).await.is_err() {
                            break;
                        }
                    }
                    None => break,
                },
                _ = shutdown.changed() => {
                    let _ = sender.send(Message::Close(None)).await;
                    break;
                }
            }
        }
    });

    // Spawn a task to watch for the client going away
    let recv_id = connection_id.clone();
    let mut recv_task = tokio::spawn(async move {
        while let Some(msg) = receiver.next().await {
            match msg {
                Ok(Message::Close(_)) => {
                    tracing::info!("Client '{}' requested close", recv_id);
                    break;
                }
                Ok(Message::Text(_)) | Ok(Message::Binary(_)) => {
                    tracing::debug!("Ignoring inbound frame from '{}'", recv_id);
                }
                Ok(_) => {}
                Err(e) => {
                    tracing::debug!("WebSocket error on '{}': {}", recv_id, e);
                    break;
                }
            }
        }
    });

    // If any one of the tasks completes, abort the other
    tokio::select! {
        _ = &mut recv_task => send_task.abort(),
        _ = &mut send_task => recv_task.abort(),
    };

    let release_usecase = ReleaseConnectionUseCase::new(state.registry.clone());
    match release_usecase.execute(&connection_id).await {
        Ok(released) => tracing::info!(
            "Released '{}' ({} channel, rooms: {:?})",
            released.id,
            released.channel,
            released.rooms
        ),
        Err(e) => tracing::warn!("Failed to release '{}': {}", connection_id, e),
    }
}
