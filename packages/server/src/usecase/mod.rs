//! UseCase 層
//!
//! リレーの各操作を実装するレイヤー。
//! UI 層（WebSocket / HTTP ハンドラ、Pub/Sub ブリッジ）から呼び出され、
//! Domain 層の trait を通して Registry や Verifier を操作します。

pub mod admit_connection;
pub mod error;
pub mod relay_event;
pub mod release_connection;
pub mod trigger_reload;

pub use admit_connection::AdmitConnectionUseCase;
pub use error::{AdmitError, RelayError, ReloadError};
pub use relay_event::RelayEventUseCase;
pub use release_connection::ReleaseConnectionUseCase;
pub use trigger_reload::TriggerReloadUseCase;
