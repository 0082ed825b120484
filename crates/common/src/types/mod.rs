use serde::{Deserialize, Serialize};

pub const STATUS_OK: &str = "OK";
pub const STATUS_ERROR: &str = "Error";
pub const MONGODB_CONNECTED: &str = "Connected";
pub const MONGODB_DISCONNECTED: &str = "Disconnected";

/// Body of `GET /health`.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
pub struct Health {
    pub status: String,
    pub mongodb: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl Health {
    pub fn connected() -> Self {
        Self {
            status: STATUS_OK.into(),
            mongodb: MONGODB_CONNECTED.into(),
            error: None,
        }
    }

    pub fn disconnected(error: impl Into<String>) -> Self {
        Self {
            status: STATUS_ERROR.into(),
            mongodb: MONGODB_DISCONNECTED.into(),
            error: Some(error.into()),
        }
    }
}

/// Uniform JSON error body: `{"error": "..."}`.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
pub struct ErrorBody {
    pub error: String,
}

/// JSON confirmation returned by the delete route.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct DeleteResult {
    pub message: String,
    pub deleted_count: u64,
}
