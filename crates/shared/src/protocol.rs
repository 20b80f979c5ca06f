use serde::{Deserialize, Serialize};

use crate::domain::ResultLink;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AuthenticateRequest {
    pub token: String,
}

/// Reply envelope for `POST /authenticate`. The backend multiplexes success
/// and well-formed failures over one body shape discriminated by `status`;
/// every field other than `status` is optional so that classification can
/// happen after decoding instead of failing the decode.
#[derive(Debug, Clone, Deserialize)]
pub struct AuthenticateReply {
    pub status: String,
    #[serde(default)]
    pub message: Option<String>,
    #[serde(default)]
    pub retry_after: Option<u64>,
    #[serde(default)]
    pub display_name: Option<String>,
    #[serde(default)]
    pub cleaned_token: Option<String>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct GenresReply {
    pub genres: Vec<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GenerateRequest {
    pub token: String,
    pub genres: Vec<String>,
    pub playlist_name: String,
    pub description: String,
    pub track_count: u32,
}

/// Reply envelope for `POST /execute`, same discriminated shape as
/// [`AuthenticateReply`].
#[derive(Debug, Clone, Deserialize)]
pub struct GenerateReply {
    pub status: String,
    #[serde(default)]
    pub message: Option<String>,
    #[serde(default)]
    pub retry_after: Option<u64>,
    #[serde(default)]
    pub links: Option<Vec<ResultLink>>,
}

/// `status` value marking a successful reply; anything else is a
/// well-formed failure classified by the caller.
pub const STATUS_SUCCESS: &str = "success";
pub const STATUS_RATE_LIMIT: &str = "rate_limit";
pub const STATUS_AUTH_ERROR: &str = "auth_error";
pub const STATUS_FORBIDDEN: &str = "forbidden";
