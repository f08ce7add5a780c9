//! InMemory Connection Registry 実装
//!
//! ドメイン層が定義する ConnectionRegistry trait の具体的な実装。
//! 接続・チャンネル内の登録順・ルームメンバーシップを 1 つの Mutex で保護し、
//! 登録／解除とブロードキャストの走査が互いに割り込まないことを保証します。

use std::collections::HashMap;

use async_trait::async_trait;
use serde_json::Value;
use tokio::sync::{Mutex, mpsc::UnboundedSender};

use crate::{
    domain::{ChannelKind, Connection, ConnectionId, ConnectionRegistry, RegistryError, RoomName},
    infrastructure::dto::websocket::encode_event,
};

/// 登録済み接続（送信チャンネルを含む）
struct Entry {
    connection: Connection,
    sender: UnboundedSender<String>,
}

#[derive(Default)]
struct RegistryState {
    connections: HashMap<ConnectionId, Entry>,
    /// 全接続の登録順
    order: Vec<ConnectionId>,
    /// ルーム名 → メンバー（登録順）
    rooms: HashMap<RoomName, Vec<ConnectionId>>,
}

impl RegistryState {
    fn deliver<'a>(
        &self,
        targets: impl Iterator<Item = &'a ConnectionId>,
        text: &str,
    ) -> usize {
        let mut delivered = 0;
        for id in targets {
            let Some(entry) = self.connections.get(id) else {
                continue;
            };
            if entry.sender.send(text.to_string()).is_ok() {
                delivered += 1;
            } else {
                tracing::debug!("Skipping closed connection '{}'", id);
            }
        }
        delivered
    }
}

/// インメモリ Connection Registry 実装
#[derive(Default)]
pub struct InMemoryConnectionRegistry {
    state: Mutex<RegistryState>,
}

impl InMemoryConnectionRegistry {
    /// 新しい InMemoryConnectionRegistry を作成
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl ConnectionRegistry for InMemoryConnectionRegistry {
    async fn register(
        &self,
        connection: Connection,
        sender: UnboundedSender<String>,
    ) -> Result<(), RegistryError> {
        let mut state = self.state.lock().await;
        if state.connections.contains_key(&connection.id) {
            return Err(RegistryError::DuplicateConnection(
                connection.id.as_str().to_string(),
            ));
        }

        // dev チャンネルの接続はルームに入れない
        if connection.channel == ChannelKind::Default {
            for room in &connection.rooms {
                state
                    .rooms
                    .entry(room.clone())
                    .or_default()
                    .push(connection.id.clone());
            }
        }

        state.order.push(connection.id.clone());
        state
            .connections
            .insert(connection.id.clone(), Entry { connection, sender });

        Ok(())
    }

    async fn unregister(&self, id: &ConnectionId) -> Result<Connection, RegistryError> {
        let mut state = self.state.lock().await;
        let entry = state
            .connections
            .remove(id)
            .ok_or_else(|| RegistryError::ConnectionNotFound(id.as_str().to_string()))?;

        state.order.retain(|c| c != id);
        for room in &entry.connection.rooms {
            let emptied = match state.rooms.get_mut(room) {
                Some(members) => {
                    members.retain(|c| c != id);
                    members.is_empty()
                }
                None => false,
            };
            if emptied {
                state.rooms.remove(room);
            }
        }

        Ok(entry.connection)
    }

    async fn get_connection(&self, id: &ConnectionId) -> Option<Connection> {
        let state = self.state.lock().await;
        state.connections.get(id).map(|e| e.connection.clone())
    }

    async fn room_members(&self, room: &RoomName) -> Vec<ConnectionId> {
        let state = self.state.lock().await;
        state.rooms.get(room).cloned().unwrap_or_default()
    }

    async fn count_connections(&self, channel: ChannelKind) -> usize {
        let state = self.state.lock().await;
        state
            .connections
            .values()
            .filter(|e| e.connection.channel == channel)
            .count()
    }

    async fn broadcast_to_room(
        &self,
        room: &RoomName,
        message_name: &str,
        payload: &Value,
    ) -> usize {
        let text = match encode_event(message_name, payload) {
            Ok(text) => text,
            Err(e) => {
                tracing::warn!("Failed to encode '{}' for room '{}': {}", message_name, room, e);
                return 0;
            }
        };

        let state = self.state.lock().await;
        let Some(members) = state.rooms.get(room) else {
            return 0;
        };
        state.deliver(members.iter(), &text)
    }

    async fn broadcast_to_channel(
        &self,
        channel: ChannelKind,
        message_name: &str,
        payload: &Value,
    ) -> usize {
        let text = match encode_event(message_name, payload) {
            Ok(text) => text,
            Err(e) => {
                tracing::warn!(
                    "Failed to encode '{}' for channel '{}': {}",
                    message_name,
                    channel,
                    e
                );
                return 0;
            }
        };

        let state = self.state.lock().await;
        let targets = state.order.iter().filter(|id| {
            state
                .connections
                .get(*id)
                .is_some_and(|e| e.connection.channel == channel)
        });
        state.deliver(targets, &text)
    }
}
