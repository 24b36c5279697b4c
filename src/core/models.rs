use std::time::Duration;

use super::types::*;

/// Everything the client needs to talk to one identity provider.
///
/// Built once at startup and never mutated afterwards.
#[derive(Debug, Clone)]
pub struct ClientConfig {
    pub base_url: String,
    pub client_id: ClientId,
    pub client_secret: ClientSecret,
    pub redirect_uri: RedirectUri,
    pub authorize_path: String,
    pub token_path: String,
    pub timeout: Duration,
}

impl ClientConfig {
    pub const BASE_URL: &'static str = "ORANGEHRM_BASE_URL";
    pub const CLIENT_ID: &'static str = "ORANGEHRM_CLIENT_ID";
    pub const CLIENT_SECRET: &'static str = "ORANGEHRM_CLIENT_SECRET";
    pub const REDIRECT_URI: &'static str = "REDIRECT_URI";
    pub const AUTHORIZE_PATH: &'static str = "ORANGEHRM_AUTHORIZE_PATH";
    pub const TOKEN_PATH: &'static str = "ORANGEHRM_TOKEN_PATH";

    pub const DEFAULT_AUTHORIZE_PATH: &'static str = "/oauth2/authorize";
    pub const DEFAULT_TOKEN_PATH: &'static str = "/oauth2/token";
    pub const DEFAULT_TIMEOUT_SECS: u64 = 30;

    pub fn new(
        base_url: impl Into<String>,
        client_id: ClientId,
        client_secret: ClientSecret,
        redirect_uri: RedirectUri,
    ) -> Self {
        Self {
            base_url: base_url.into(),
            client_id,
            client_secret,
            redirect_uri,
            authorize_path: Self::DEFAULT_AUTHORIZE_PATH.to_string(),
            token_path: Self::DEFAULT_TOKEN_PATH.to_string(),
            timeout: Duration::from_secs(Self::DEFAULT_TIMEOUT_SECS),
        }
    }

    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }
}
