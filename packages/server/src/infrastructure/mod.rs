//! Infrastructure layer
//!
//! Concrete implementations of the traits the domain layer defines:
//! JWT verification, the Redis broker connector, the in-memory connection
//! registry, and the wire DTOs exchanged with clients.

pub mod auth;
pub mod broker;
pub mod dto;
pub mod registry;
