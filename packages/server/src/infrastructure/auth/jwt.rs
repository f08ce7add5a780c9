//! JWT bearer-token verifier.
//!
//! Tokens are issued by the backend API and signed with a shared HMAC key.
//! The backend puts the user id in `user_id` and the account kind in
//! `user_type`; tokens that carry the registered `sub` claim and an explicit
//! `role` claim are read from those first.

use jsonwebtoken::{Algorithm, DecodingKey, Validation, errors::ErrorKind};
use serde::Deserialize;
use thiserror::Error;

use crate::domain::{AuthError, Claims, Role, TokenVerifier};

const BEARER_SCHEME: &str = "Bearer";

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum JwtKeyError {
    #[error("JWT secret cannot be empty")]
    EmptySecret,

    #[error("unsupported JWT algorithm: {0}")]
    UnsupportedAlgorithm(String),
}

#[derive(Debug, Deserialize)]
#[serde(untagged)]
enum SubjectClaim {
    Text(String),
    Number(i64),
}

impl SubjectClaim {
    fn into_string(self) -> String {
        match self {
            SubjectClaim::Text(s) => s,
            SubjectClaim::Number(n) => n.to_string(),
        }
    }
}

#[derive(Debug, Deserialize)]
struct TokenClaims {
    #[serde(default)]
    sub: Option<SubjectClaim>,
    #[serde(default)]
    user_id: Option<SubjectClaim>,
    #[serde(default)]
    role: Option<String>,
    #[serde(default)]
    user_type: Option<String>,
}

/// Verifies HMAC-signed JWTs.
pub struct JwtTokenVerifier {
    key: DecodingKey,
    validation: Validation,
}

impl JwtTokenVerifier {
    /// Build a verifier for `algorithm` (`HS256`, `HS384` or `HS512`).
    pub fn new(secret: &[u8], algorithm: &str) -> Result<Self, JwtKeyError> {
        if secret.is_empty() {
            return Err(JwtKeyError::EmptySecret);
        }
        let algorithm = match algorithm.trim().to_ascii_uppercase().as_str() {
            "HS256" => Algorithm::HS256,
            "HS384" => Algorithm::HS384,
            "HS512" => Algorithm::HS512,
            other => return Err(JwtKeyError::UnsupportedAlgorithm(other.to_string())),
        };

        // exp is required; no clock skew unless with_leeway is called
        let mut validation = Validation::new(algorithm);
        validation.leeway = 0;

        Ok(Self {
            key: DecodingKey::from_secret(secret),
            validation,
        })
    }

    /// Tolerate `seconds` of clock skew when checking `exp` (default 0).
    pub fn with_leeway(mut self, seconds: u64) -> Self {
        self.validation.leeway = seconds;
        self
    }
}

impl TokenVerifier for JwtTokenVerifier {
    fn verify(&self, credential: &str) -> Result<Claims, AuthError> {
        let trimmed = credential.trim();
        let token = match trimmed.strip_prefix(BEARER_SCHEME) {
            Some(rest) if rest.is_empty() || rest.starts_with(' ') => rest.trim(),
            _ => trimmed,
        };
        if token.is_empty() {
            return Err(AuthError::Missing);
        }

        let data = jsonwebtoken::decode::<TokenClaims>(token, &self.key, &self.validation)
            .map_err(|e| match e.kind() {
                ErrorKind::ExpiredSignature => AuthError::Expired,
                ErrorKind::InvalidSignature => AuthError::SignatureInvalid,
                _ => AuthError::Malformed,
            })?;

        let TokenClaims {
            sub,
            user_id,
            role,
            user_type,
        } = data.claims;

        let subject = sub
            .or(user_id)
            .map(SubjectClaim::into_string)
            .filter(|s| !s.is_empty())
            .ok_or(AuthError::Malformed)?;
        let role = role.or(user_type).ok_or(AuthError::Malformed)?;

        Ok(Claims::new(subject, Role::parse_lenient(&role)))
    }
}
