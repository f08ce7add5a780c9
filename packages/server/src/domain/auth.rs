//! Credential verification seam.

use super::{Claims, error::AuthError};

/// Validates a bearer credential and extracts its claims.
///
/// Implementations are pure: no side effects on failure, no state besides
/// their key material. An empty credential means the client supplied none.
#[cfg_attr(test, mockall::automock)]
pub trait TokenVerifier: Send + Sync {
    fn verify(&self, credential: &str) -> Result<Claims, AuthError>;
}
