//! Token verification backends.

pub mod jwt;

pub use jwt::{JwtKeyError, JwtTokenVerifier};
