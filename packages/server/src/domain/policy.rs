//! Static routing policies.
//!
//! - [`RoomPolicy`] decides which rooms a verified role joins.
//! - [`RouteTable`] decides which room and message name a broker channel
//!   is forwarded to.
//!
//! Both are plain lookup tables built once at startup.

use super::{Role, RoomName, error::ValueObjectError};

/// Room that receives back-office events
pub const ADMINS_ROOM: &str = "admins";

/// Message name used for new-order events
pub const ORDER_NEW_EVENT: &str = "order:new";

/// Role → room mapping
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RoomPolicy {
    entries: Vec<(Role, RoomName)>,
}

impl RoomPolicy {
    pub fn new(entries: Vec<(Role, RoomName)>) -> Self {
        Self { entries }
    }

    /// `ADMIN` and `SUPERADMIN` join `"admins"`; every other role joins nothing.
    pub fn standard() -> Result<Self, ValueObjectError> {
        let admins = RoomName::new(ADMINS_ROOM)?;
        Ok(Self::new(vec![
            (Role::SuperAdmin, admins.clone()),
            (Role::Admin, admins),
        ]))
    }

    /// Rooms for `role`, in table order and without duplicates.
    pub fn rooms_for(&self, role: Role) -> Vec<RoomName> {
        let mut rooms: Vec<RoomName> = Vec::new();
        for (entry_role, room) in &self.entries {
            if *entry_role == role && !rooms.contains(room) {
                rooms.push(room.clone());
            }
        }
        rooms
    }
}

/// Where a broker channel is forwarded to
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Route {
    pub room: RoomName,
    pub message_name: String,
}

/// Broker channel → (room, message name) mapping
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RouteTable {
    routes: Vec<(String, Route)>,
}

impl RouteTable {
    pub fn new() -> Self {
        Self::default()
    }

    /// Orders published on `orders_channel` go to `"admins"` as `"order:new"`.
    pub fn standard(orders_channel: impl Into<String>) -> Result<Self, ValueObjectError> {
        Ok(Self::new().with_route(
            orders_channel,
            RoomName::new(ADMINS_ROOM)?,
            ORDER_NEW_EVENT,
        ))
    }

    /// Add a route. A later route for the same channel replaces the earlier one.
    pub fn with_route(
        mut self,
        channel: impl Into<String>,
        room: RoomName,
        message_name: impl Into<String>,
    ) -> Self {
        let channel = channel.into();
        self.routes.retain(|(c, _)| c != &channel);
        self.routes.push((
            channel,
            Route {
                room,
                message_name: message_name.into(),
            },
        ));
        self
    }

    pub fn lookup(&self, channel: &str) -> Option<&Route> {
        self.routes
            .iter()
            .find(|(c, _)| c == channel)
            .map(|(_, route)| route)
    }

    /// Broker channels the bridge has to subscribe to.
    pub fn channels(&self) -> Vec<String> {
        self.routes.iter().map(|(c, _)| c.clone()).collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_standard_policy_admin_roles_join_admins() {
        // テスト項目: ADMIN と SUPERADMIN は admins ルームに入る
        // given (前提条件):
        let policy = RoomPolicy::standard().unwrap();
        let admins = RoomName::new("admins").unwrap();

        // then (期待する結果):
        assert_eq!(policy.rooms_for(Role::Admin), vec![admins.clone()]);
        assert_eq!(policy.rooms_for(Role::SuperAdmin), vec![admins]);
    }

    #[test]
    fn test_standard_policy_other_roles_join_nothing() {
        // テスト項目: その他のロールはどのルームにも入らない
        // given (前提条件):
        let policy = RoomPolicy::standard().unwrap();

        // then (期待する結果):
        assert!(policy.rooms_for(Role::Customer).is_empty());
        assert!(policy.rooms_for(Role::Merchant).is_empty());
        assert!(policy.rooms_for(Role::Unknown).is_empty());
    }

    #[test]
    fn test_policy_multiple_rooms_deduplicated() {
        // テスト項目: 1 つのロールが複数ルームに対応でき、重複は除かれる
        // given (前提条件):
        let admins = RoomName::new("admins").unwrap();
        let merchants = RoomName::new("merchants").unwrap();
        let policy = RoomPolicy::new(vec![
            (Role::Admin, admins.clone()),
            (Role::Admin, merchants.clone()),
            (Role::Admin, admins.clone()),
        ]);

        // when (操作):
        let rooms = policy.rooms_for(Role::Admin);

        // then (期待する結果):
        assert_eq!(rooms, vec![admins, merchants]);
    }

    #[test]
    fn test_standard_route_table() {
        // テスト項目: 注文チャンネルは admins / order:new にルーティングされる
        // given (前提条件):
        let table = RouteTable::standard("orders").unwrap();

        // when (操作):
        let route = table.lookup("orders").unwrap();

        // then (期待する結果):
        assert_eq!(route.room.as_str(), "admins");
        assert_eq!(route.message_name, "order:new");
        assert!(table.lookup("payments").is_none());
        assert_eq!(table.channels(), vec!["orders".to_string()]);
    }

    #[test]
    fn test_route_table_replaces_same_channel() {
        // テスト項目: 同じチャンネルのルートは後勝ちで置き換えられる
        // given (前提条件):
        let table = RouteTable::new()
            .with_route("orders", RoomName::new("admins").unwrap(), "order:new")
            .with_route("orders", RoomName::new("ops").unwrap(), "order:created");

        // when (操作):
        let route = table.lookup("orders").unwrap();

        // then (期待する結果):
        assert_eq!(route.room.as_str(), "ops");
        assert_eq!(route.message_name, "order:created");
        assert_eq!(table.channels().len(), 1);
    }
}
