use serde::{Deserialize, Serialize};

/// Authenticated session held by the client. The token is opaque: it is
/// stored and forwarded, never parsed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Session {
    pub token: String,
    pub profile: Option<UserProfile>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UserProfile {
    pub display_name: Option<String>,
}

/// Playlist generation request, built from validated form state at
/// submission time. `track_count` is always a positive integer here;
/// unparseable input never makes it past local validation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PlaylistRequest {
    pub name: String,
    pub description: String,
    pub track_count: u32,
    pub genres: Vec<String>,
}

/// Link to one generated playlist. Produced only by a successful
/// generation reply; the sequence order is the backend's order.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ResultLink {
    pub name: String,
    pub url: String,
}
