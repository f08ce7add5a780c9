//! UseCase: 接続の受け入れ処理
//!
//! ## テスト実装の作業記録
//!
//! ### 何をテストしているか
//! - AdmitConnectionUseCase::admit_authenticated() / admit_dev()
//! - 認証結果とロールに応じたルーム割り当て、Registry への登録
//!
//! ### どのような状況を想定しているか
//! - 正常系：ADMIN / SUPERADMIN は admins ルームへ、その他のロールはルームなし
//! - 異常系：認証失敗時は Registry に一切登録しない
//! - dev 接続は認証なしで登録され、ルームを持たない

use std::sync::Arc;

use tokio::sync::mpsc::UnboundedSender;

use crate::domain::{
    Connection, ConnectionIdFactory, ConnectionRegistry, RoomPolicy, Timestamp, TokenVerifier,
};

use super::error::AdmitError;

/// 接続受け入れのユースケース
pub struct AdmitConnectionUseCase {
    registry: Arc<dyn ConnectionRegistry>,
    verifier: Arc<dyn TokenVerifier>,
    room_policy: Arc<RoomPolicy>,
}

impl AdmitConnectionUseCase {
    /// 新しい AdmitConnectionUseCase を作成
    pub fn new(
        registry: Arc<dyn ConnectionRegistry>,
        verifier: Arc<dyn TokenVerifier>,
        room_policy: Arc<RoomPolicy>,
    ) -> Self {
        Self {
            registry,
            verifier,
            room_policy,
        }
    }

    /// default チャンネルの接続を認証して受け入れる
    ///
    /// # Arguments
    ///
    /// * `credential` - クライアントが提示した資格情報（未提示なら空文字列）
    /// * `sender` - このクライアント宛てのメッセージ送信チャンネル
    ///
    /// # Returns
    ///
    /// * `Ok(Connection)` - 登録済みの接続
    /// * `Err(AdmitError)` - 認証失敗または登録失敗
    pub async fn admit_authenticated(
        &self,
        credential: &str,
        sender: UnboundedSender<String>,
    ) -> Result<Connection, AdmitError> {
        // 1. 認証（失敗した場合は何も登録しない）
        let claims = self.verifier.verify(credential)?;

        // 2. ロールからルームを決定
        let rooms = self.room_policy.rooms_for(claims.role);

        // 3. Registry に登録
        let connection = Connection::authenticated(
            ConnectionIdFactory::generate(),
            claims,
            rooms,
            Timestamp::now(),
        );
        self.registry.register(connection.clone(), sender).await?;

        Ok(connection)
    }

    /// dev チャンネルの接続を受け入れる（認証なし）
    pub async fn admit_dev(
        &self,
        sender: UnboundedSender<String>,
    ) -> Result<Connection, AdmitError> {
        let connection = Connection::dev(ConnectionIdFactory::generate(), Timestamp::now());
        self.registry.register(connection.clone(), sender).await?;
        Ok(connection)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{
        domain::{
            AuthError, ChannelKind, Claims, MockConnectionRegistry, MockTokenVerifier, Role,
            RoomName,
        },
        infrastructure::registry::InMemoryConnectionRegistry,
    };
    use tokio::sync::mpsc;

    fn verifier_returning(result: Result<Claims, AuthError>) -> Arc<MockTokenVerifier> {
        let mut verifier = MockTokenVerifier::new();
        verifier
            .expect_verify()
            .times(1)
            .returning(move |_| result.clone());
        Arc::new(verifier)
    }

    fn policy() -> Arc<RoomPolicy> {
        Arc::new(RoomPolicy::standard().unwrap())
    }

    #[tokio::test]
    async fn test_admit_admin_joins_admins_room() {
        // テスト項目: ADMIN ロールの接続は admins ルームに登録される
        // given (前提条件):
        let registry = Arc::new(InMemoryConnectionRegistry::new());
        let verifier = verifier_returning(Ok(Claims::new("7", Role::Admin)));
        let usecase = AdmitConnectionUseCase::new(registry.clone(), verifier, policy());
        let (tx, _rx) = mpsc::unbounded_channel();

        // when (操作):
        let result = usecase.admit_authenticated("token", tx).await;

        // then (期待する結果):
        let connection = result.unwrap();
        let admins = RoomName::new("admins").unwrap();
        assert_eq!(connection.rooms, vec![admins.clone()]);
        assert_eq!(registry.room_members(&admins).await, vec![connection.id]);
    }

    #[tokio::test]
    async fn test_admit_superadmin_joins_admins_room() {
        // テスト項目: SUPERADMIN ロールの接続も admins ルームに登録される
        // given (前提条件):
        let registry = Arc::new(InMemoryConnectionRegistry::new());
        let verifier = verifier_returning(Ok(Claims::new("1", Role::SuperAdmin)));
        let usecase = AdmitConnectionUseCase::new(registry.clone(), verifier, policy());
        let (tx, _rx) = mpsc::unbounded_channel();

        // when (操作):
        let connection = usecase.admit_authenticated("token", tx).await.unwrap();

        // then (期待する結果):
        assert!(connection.is_member_of(&RoomName::new("admins").unwrap()));
    }

    #[tokio::test]
    async fn test_admit_customer_joins_no_room() {
        // テスト項目: CUSTOMER ロールの接続は登録されるがルームには入らない
        // given (前提条件):
        let registry = Arc::new(InMemoryConnectionRegistry::new());
        let verifier = verifier_returning(Ok(Claims::new("99", Role::Customer)));
        let usecase = AdmitConnectionUseCase::new(registry.clone(), verifier, policy());
        let (tx, _rx) = mpsc::unbounded_channel();

        // when (操作):
        let connection = usecase.admit_authenticated("token", tx).await.unwrap();

        // then (期待する結果):
        assert!(connection.rooms.is_empty());
        assert_eq!(registry.count_connections(ChannelKind::Default).await, 1);
        assert!(
            registry
                .room_members(&RoomName::new("admins").unwrap())
                .await
                .is_empty()
        );
    }

    #[tokio::test]
    async fn test_admit_rejected_credential_is_never_registered() {
        // テスト項目: 認証に失敗した接続は Registry に登録されない
        // given (前提条件):
        let mut registry = MockConnectionRegistry::new();
        registry.expect_register().never();
        let verifier = verifier_returning(Err(AuthError::Expired));
        let usecase = AdmitConnectionUseCase::new(Arc::new(registry), verifier, policy());
        let (tx, _rx) = mpsc::unbounded_channel();

        // when (操作):
        let result = usecase.admit_authenticated("expired-token", tx).await;

        // then (期待する結果):
        assert_eq!(
            result,
            Err(AdmitError::Unauthenticated(AuthError::Expired))
        );
    }

    #[tokio::test]
    async fn test_admit_passes_credential_to_verifier() {
        // テスト項目: 提示された資格情報がそのまま Verifier に渡される
        // given (前提条件):
        let registry = Arc::new(InMemoryConnectionRegistry::new());
        let mut verifier = MockTokenVerifier::new();
        verifier
            .expect_verify()
            .withf(|credential| credential == "abc.def.ghi")
            .times(1)
            .returning(|_| Ok(Claims::new("5", Role::Merchant)));
        let usecase = AdmitConnectionUseCase::new(registry, Arc::new(verifier), policy());
        let (tx, _rx) = mpsc::unbounded_channel();

        // when (操作):
        let result = usecase.admit_authenticated("abc.def.ghi", tx).await;

        // then (期待する結果):
        assert_eq!(result.unwrap().claims, Some(Claims::new("5", Role::Merchant)));
    }

    #[tokio::test]
    async fn test_admit_dev_skips_authentication() {
        // テスト項目: dev 接続は Verifier を呼ばずに登録される
        // given (前提条件):
        let registry = Arc::new(InMemoryConnectionRegistry::new());
        let mut verifier = MockTokenVerifier::new();
        verifier.expect_verify().never();
        let usecase = AdmitConnectionUseCase::new(registry.clone(), Arc::new(verifier), policy());
        let (tx, _rx) = mpsc::unbounded_channel();

        // when (操作):
        let connection = usecase.admit_dev(tx).await.unwrap();

        // then (期待する結果):
        assert_eq!(connection.channel, ChannelKind::Dev);
        assert!(connection.claims.is_none());
        assert_eq!(registry.count_connections(ChannelKind::Dev).await, 1);
    }
}
