//! Value Objects for domain models.
//!
//! Value Objects are immutable objects that represent values in the domain.
//! They are compared by their value, not by identity.

use serde::{Deserialize, Serialize};
use std::{fmt, str::FromStr};

use super::error::ValueObjectError;

/// Maximum length of a room name.
pub const ROOM_NAME_MAX_LEN: usize = 100;

/// Connection identifier value object.
///
/// Opaque identifier assigned to a connection when its transport handshake
/// completes. Generated through [`super::factory::ConnectionIdFactory`].
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ConnectionId(String);

impl ConnectionId {
    /// Create a ConnectionId from its string form.
    pub fn new(id: String) -> Result<Self, ValueObjectError> {
        if id.is_empty() {
            return Err(ValueObjectError::ConnectionIdEmpty);
        }
        Ok(Self(id))
    }

    /// Create a ConnectionId from a UUID.
    pub fn from_uuid(uuid: uuid::Uuid) -> Self {
        Self(uuid.to_string())
    }

    /// Get the inner string value.
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for ConnectionId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Room name value object.
///
/// A room is a named partition of default-channel connections that share a
/// broadcast target (e.g. `"admins"`).
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct RoomName(String);

impl RoomName {
    /// Create a new RoomName.
    ///
    /// # Arguments
    ///
    /// * `name` - The room name string
    ///
    /// # Returns
    ///
    /// A Result containing the RoomName or an error if validation fails
    pub fn new(name: impl Into<String>) -> Result<Self, ValueObjectError> {
        let name = name.into();
        if name.is_empty() {
            return Err(ValueObjectError::RoomNameEmpty);
        }
        let len = name.len();
        if len > ROOM_NAME_MAX_LEN {
            return Err(ValueObjectError::RoomNameTooLong {
                max: ROOM_NAME_MAX_LEN,
                actual: len,
            });
        }
        Ok(Self(name))
    }

    /// Get the inner string value.
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for RoomName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Logical connection endpoint.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum ChannelKind {
    /// Authenticated channel; connections are placed in role-derived rooms.
    Default,
    /// Unauthenticated development channel; never part of any room.
    Dev,
}

impl ChannelKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            ChannelKind::Default => "default",
            ChannelKind::Dev => "dev",
        }
    }
}

impl fmt::Display for ChannelKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Closed set of roles a verified credential can carry.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum Role {
    #[serde(rename = "SUPERADMIN")]
    SuperAdmin,
    Admin,
    Merchant,
    Customer,
    /// Any role value the relay does not know about.
    Unknown,
}

impl Role {
    pub fn as_str(&self) -> &'static str {
        match self {
            Role::SuperAdmin => "SUPERADMIN",
            Role::Admin => "ADMIN",
            Role::Merchant => "MERCHANT",
            Role::Customer => "CUSTOMER",
            Role::Unknown => "UNKNOWN",
        }
    }

    /// Parse a role claim. Matching is case-insensitive and never fails;
    /// unrecognised values become [`Role::Unknown`].
    pub fn parse_lenient(value: &str) -> Self {
        value.parse().unwrap_or(Role::Unknown)
    }
}

impl FromStr for Role {
    type Err = ValueObjectError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_uppercase().as_str() {
            "SUPERADMIN" | "SUPER_ADMIN" => Ok(Role::SuperAdmin),
            "ADMIN" => Ok(Role::Admin),
            "MERCHANT" => Ok(Role::Merchant),
            "CUSTOMER" | "USER" => Ok(Role::Customer),
            _ => Err(ValueObjectError::RoleUnrecognized(s.to_string())),
        }
    }
}

impl fmt::Display for Role {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Identity and role extracted from a verified credential.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Claims {
    pub subject: String,
    pub role: Role,
}

impl Claims {
    pub fn new(subject: impl Into<String>, role: Role) -> Self {
        Self {
            subject: subject.into(),
            role,
        }
    }
}

/// Shared secret guarding the reload trigger.
///
/// An empty secret means the trigger is open.
#[derive(Clone, Default, PartialEq, Eq)]
pub struct ReloadSecret(String);

impl ReloadSecret {
    pub fn new(secret: impl Into<String>) -> Self {
        Self(secret.into())
    }

    pub fn is_configured(&self) -> bool {
        !self.0.is_empty()
    }

    /// Byte-exact comparison in constant time.
    pub fn matches(&self, provided: &str) -> bool {
        if provided.len() != self.0.len() {
            return false;
        }

        let mut result = 0u8;
        for (a, b) in provided.bytes().zip(self.0.bytes()) {
            result |= a ^ b;
        }
        result == 0
    }
}

impl fmt::Debug for ReloadSecret {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.is_configured() {
            f.write_str("ReloadSecret(***)")
        } else {
            f.write_str("ReloadSecret(<none>)")
        }
    }
}

/// Timestamp value object.
///
/// Represents a Unix timestamp in milliseconds (UTC).
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
pub struct Timestamp(i64);

impl Timestamp {
    pub fn new(value: i64) -> Self {
        Self(value)
    }

    /// Current wall-clock time.
    pub fn now() -> Self {
        Self(relay_shared::time::now_millis())
    }

    /// Get the inner i64 value.
    pub fn value(&self) -> i64 {
        self.0
    }
}

impl fmt::Display for Timestamp {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_room_name_new_success() {
        // テスト項目: 有効なルーム名を作成できる
        // given (前提条件):
        let name = "admins";

        // when (操作):
        let result = RoomName::new(name);

        // then (期待する結果):
        assert!(result.is_ok());
        assert_eq!(result.unwrap().as_str(), "admins");
    }

    #[test]
    fn test_room_name_new_empty_fails() {
        // テスト項目: 空のルーム名は作成できない
        // when (操作):
        let result = RoomName::new("");

        // then (期待する結果):
        assert_eq!(result.unwrap_err(), ValueObjectError::RoomNameEmpty);
    }

    #[test]
    fn test_room_name_new_too_long_fails() {
        // テスト項目: 101 文字以上のルーム名は作成できない
        // given (前提条件):
        let name = "a".repeat(101);

        // when (操作):
        let result = RoomName::new(name);

        // then (期待する結果):
        assert_eq!(
            result.unwrap_err(),
            ValueObjectError::RoomNameTooLong {
                max: 100,
                actual: 101
            }
        );
    }

    #[test]
    fn test_connection_id_new_empty_fails() {
        // テスト項目: 空の接続 ID は作成できない
        // when (操作):
        let result = ConnectionId::new(String::new());

        // then (期待する結果):
        assert_eq!(result.unwrap_err(), ValueObjectError::ConnectionIdEmpty);
    }

    #[test]
    fn test_role_parse_is_case_insensitive() {
        // テスト項目: ロールは大文字小文字を区別せずに解釈される
        // then (期待する結果):
        assert_eq!("ADMIN".parse::<Role>(), Ok(Role::Admin));
        assert_eq!("admin".parse::<Role>(), Ok(Role::Admin));
        assert_eq!("SuperAdmin".parse::<Role>(), Ok(Role::SuperAdmin));
        assert_eq!("merchant".parse::<Role>(), Ok(Role::Merchant));
        assert_eq!("CUSTOMER".parse::<Role>(), Ok(Role::Customer));
    }

    #[test]
    fn test_role_parse_lenient_unknown() {
        // テスト項目: 未知のロールは Unknown として扱われる
        // when (操作):
        let role = Role::parse_lenient("WAREHOUSE");

        // then (期待する結果):
        assert_eq!(role, Role::Unknown);
        assert!("WAREHOUSE".parse::<Role>().is_err());
    }

    #[test]
    fn test_channel_kind_serialization() {
        // テスト項目: チャンネル種別は小文字でシリアライズされる
        // then (期待する結果):
        assert_eq!(
            serde_json::to_string(&ChannelKind::Default).unwrap(),
            "\"default\""
        );
        assert_eq!(serde_json::to_string(&ChannelKind::Dev).unwrap(), "\"dev\"");
    }

    #[test]
    fn test_reload_secret_matches_exactly() {
        // テスト項目: シークレットはバイト単位で完全一致した場合のみ一致する
        // given (前提条件):
        let secret = ReloadSecret::new("s3cret");

        // then (期待する結果):
        assert!(secret.is_configured());
        assert!(secret.matches("s3cret"));
        assert!(!secret.matches("s3cret "));
        assert!(!secret.matches("S3cret"));
        assert!(!secret.matches(""));
    }

    #[test]
    fn test_reload_secret_debug_is_redacted() {
        // テスト項目: Debug 出力にシークレットが含まれない
        // then (期待する結果):
        assert_eq!(format!("{:?}", ReloadSecret::new("s3cret")), "ReloadSecret(***)");
        assert_eq!(format!("{:?}", ReloadSecret::default()), "ReloadSecret(<none>)");
        assert!(!ReloadSecret::default().is_configured());
    }
}
