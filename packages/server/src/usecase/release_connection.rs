//! UseCase: 接続の解放処理
//!
//! 切断・トランスポートエラー・サーバー停止のいずれでも呼ばれ、
//! 接続を Registry から外してすべてのルームメンバーシップを解放します。

use std::sync::Arc;

use crate::domain::{Connection, ConnectionId, ConnectionRegistry, RegistryError};

/// 接続解放のユースケース
pub struct ReleaseConnectionUseCase {
    registry: Arc<dyn ConnectionRegistry>,
}

impl ReleaseConnectionUseCase {
    /// 新しい ReleaseConnectionUseCase を作成
    pub fn new(registry: Arc<dyn ConnectionRegistry>) -> Self {
        Self { registry }
    }

    /// 接続解放を実行
    ///
    /// # Returns
    ///
    /// * `Ok(Connection)` - 解放された接続
    /// * `Err(RegistryError)` - 接続が登録されていない
    pub async fn execute(&self, id: &ConnectionId) -> Result<Connection, RegistryError> {
        self.registry.unregister(id).await
    }
}
