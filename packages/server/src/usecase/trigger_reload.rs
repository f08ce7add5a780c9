//! UseCase: 開発用リロード通知
//!
//! ## テスト実装の作業記録
//!
//! ### 何をテストしているか
//! - TriggerReloadUseCase::execute() メソッド
//! - シークレット設定時は完全一致した場合のみ dev チャンネルへ配信されること
//! - シークレット未設定時は常に配信されること
//! - 省略されたフィールドにデフォルト値が入り、ts がサーバー側で付与されること

use std::sync::Arc;

use crate::{
    domain::{
        ChannelKind, ConnectionRegistry, ReloadEvent, ReloadSecret, Timestamp,
        entity::RELOAD_EVENT,
    },
    infrastructure::dto::http::ReloadRequestDto,
};

use super::error::ReloadError;

/// リロード通知のユースケース
pub struct TriggerReloadUseCase {
    registry: Arc<dyn ConnectionRegistry>,
    secret: ReloadSecret,
}

impl TriggerReloadUseCase {
    /// 新しい TriggerReloadUseCase を作成
    pub fn new(registry: Arc<dyn ConnectionRegistry>, secret: ReloadSecret) -> Self {
        Self { registry, secret }
    }

    /// リクエストのシークレットを検証する
    ///
    /// シークレット未設定の場合は常に成功する
    pub fn authorize(&self, provided_secret: Option<&str>) -> Result<(), ReloadError> {
        if self.secret.is_configured()
            && !provided_secret.is_some_and(|provided| self.secret.matches(provided))
        {
            return Err(ReloadError::Unauthorized);
        }
        Ok(())
    }

    /// リロード通知を実行
    ///
    /// # Arguments
    ///
    /// * `provided_secret` - リクエストヘッダーのシークレット
    /// * `request` - リクエストボディ（省略時はデフォルト）
    ///
    /// # Returns
    ///
    /// * `Ok(ReloadEvent)` - 配信したイベント
    /// * `Err(ReloadError::Unauthorized)` - シークレット不一致（配信なし）
    pub async fn execute(
        &self,
        provided_secret: Option<&str>,
        request: ReloadRequestDto,
    ) -> Result<ReloadEvent, ReloadError> {
        // 1. 認可
        self.authorize(provided_secret)?;

        // 2. イベント生成
        let event = ReloadEvent::new(request.reason, request.source, request.file, Timestamp::now());

        // 3. dev チャンネルへ配信（完了は待たない）
        let payload = match serde_json::to_value(&event) {
            Ok(payload) => payload,
            Err(e) => {
                tracing::warn!("Failed to encode reload event: {}", e);
                return Ok(event);
            }
        };
        let delivered = self
            .registry
            .broadcast_to_channel(ChannelKind::Dev, RELOAD_EVENT, &payload)
            .await;
        tracing::info!(
            "Reload broadcast (reason: {}, source: {}, file: {:?}) to {} dev clients",
            event.reason,
            event.source,
            event.file,
            delivered
        );

        Ok(event)
    }
}
