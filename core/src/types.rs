//! Caller-facing input types for the put.io API.
//!
//! Response payloads are left as `serde_json::Value`; their shape belongs to
//! put.io, not to this crate.

use serde::{Deserialize, Serialize};

/// OAuth application and user credentials.
///
/// None of the fields are validated. `oauth_token` is sent with every
/// file operation; the others are only used by the OAuth2 flow.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Credentials {
    #[serde(default)]
    pub client_id: Option<String>,
    #[serde(default)]
    pub client_secret: Option<String>,
    #[serde(default)]
    pub redirect_uri: Option<String>,
    #[serde(default)]
    pub client_token: Option<String>,
    #[serde(default)]
    pub oauth_token: Option<String>,
}

impl Credentials {
    /// Credentials for an already authorized user.
    pub fn with_oauth_token(token: impl Into<String>) -> Self {
        Self {
            oauth_token: Some(token.into()),
            ..Self::default()
        }
    }
}

/// Filters for `files/search`. Defaults match put.io's own defaults.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct SearchFilters {
    /// Path segment preceding `/page/`.
    pub query: String,
    pub page_no: u32,
    /// Sent as `from`.
    pub shared_from: String,
    /// Sent as `type`.
    pub file_type: String,
    /// Sent as `ext`.
    pub file_ext: String,
    /// Sent as `time`.
    pub timeframe: String,
}

impl Default for SearchFilters {
    fn default() -> Self {
        Self {
            query: "0".to_string(),
            page_no: 0,
            shared_from: "me".to_string(),
            file_type: "all".to_string(),
            file_ext: "all".to_string(),
            timeframe: "all".to_string(),
        }
    }
}

/// Body of a successful token exchange.
#[derive(Debug, Deserialize)]
pub(crate) struct AccessTokenResponse {
    pub access_token: String,
}
