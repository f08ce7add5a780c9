//! HTTP API DTOs for the relay.

use serde::{Deserialize, Serialize};

/// Body of `POST /dev/reload`; every field is optional
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ReloadRequestDto {
    pub reason: Option<String>,
    pub source: Option<String>,
    pub file: Option<String>,
}

/// Response of `POST /dev/reload`
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ReloadResponseDto {
    pub ok: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl ReloadResponseDto {
    pub fn ok() -> Self {
        Self {
            ok: true,
            error: None,
        }
    }

    pub fn error(message: impl Into<String>) -> Self {
        Self {
            ok: false,
            error: Some(message.into()),
        }
    }
}
