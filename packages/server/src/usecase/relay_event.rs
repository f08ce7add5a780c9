//! UseCase: ブローカーイベントの中継処理
//!
//! ## テスト実装の作業記録
//!
//! ### 何をテストしているか
//! - RelayEventUseCase::execute() メソッド
//! - デコード成功時にルートに従って 1 回だけブロードキャストされること
//! - デコード失敗時・ルートなし時にブロードキャストされないこと

use std::sync::Arc;

use serde_json::Value;

use crate::domain::{BrokerMessage, ConnectionRegistry, RouteTable};

use super::error::RelayError;

/// ブローカーイベント中継のユースケース
pub struct RelayEventUseCase {
    registry: Arc<dyn ConnectionRegistry>,
    routes: Arc<RouteTable>,
}

impl RelayEventUseCase {
    /// 新しい RelayEventUseCase を作成
    pub fn new(registry: Arc<dyn ConnectionRegistry>, routes: Arc<RouteTable>) -> Self {
        Self { registry, routes }
    }

    /// ブローカーから受信したメッセージを中継する
    ///
    /// # Returns
    ///
    /// * `Ok(usize)` - メッセージを配信キューに積んだ接続数
    /// * `Err(RelayError)` - デコード失敗またはルート未定義（メッセージは破棄）
    pub async fn execute(&self, message: BrokerMessage) -> Result<usize, RelayError> {
        // 1. ペイロードをデコード
        let payload: Value =
            serde_json::from_str(&message.payload).map_err(|e| RelayError::Decode {
                channel: message.channel.clone(),
                reason: e.to_string(),
            })?;

        // 2. チャンネルからルートを引く
        let route = self
            .routes
            .lookup(&message.channel)
            .ok_or_else(|| RelayError::Unrouted(message.channel.clone()))?;

        // 3. ルームへブロードキャスト
        let delivered = self
            .registry
            .broadcast_to_room(&route.room, &route.message_name, &payload)
            .await;

        tracing::debug!(
            "Relayed '{}' from '{}' to room '{}' ({} connections)",
            route.message_name,
            message.channel,
            route.room,
            delivered
        );

        Ok(delivered)
    }
}
