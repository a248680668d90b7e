use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::domain::AssetId;

/// Failures observed by asset commands.
///
/// Everything except `UnknownAttribute` is converted into a failure event and
/// surfaced through the store's status; it never reaches the caller as `Err`.
#[derive(Debug, Clone, PartialEq, Error, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum AssetError {
    #[error("server responded with status {status}")]
    Transport {
        status: u16,
        #[serde(default)]
        body: serde_json::Value,
    },
    #[error("network error: {message}")]
    Network { message: String },
    #[error("malformed response: {message}")]
    Decode { message: String },
    #[error("unknown asset attribute '{name}'")]
    UnknownAttribute { name: String },
    #[error("asset {asset_id} is not in the current collection")]
    AssetNotFound { asset_id: AssetId },
    #[error("file exceeds the maximum size of {limit_mb} MB")]
    ExceededMaxSize { limit_mb: u64 },
    #[error("batch exceeds the maximum of {limit} files")]
    ExceededMaxCount { limit: usize },
}

impl AssetError {
    pub fn network(message: impl Into<String>) -> Self {
        Self::Network {
            message: message.into(),
        }
    }

    pub fn decode(message: impl Into<String>) -> Self {
        Self::Decode {
            message: message.into(),
        }
    }

    pub fn unknown_attribute(name: impl Into<String>) -> Self {
        Self::UnknownAttribute { name: name.into() }
    }

    pub fn status(&self) -> Option<u16> {
        match self {
            Self::Transport { status, .. } => Some(*status),
            _ => None,
        }
    }
}
