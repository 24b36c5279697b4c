//! OAuth 2.0 authorization code client.
//!
//! [`OAuthClient`] builds the URL a user visits to authorize the application
//! and trades the code the provider hands back for tokens. It keeps no state
//! between calls, so one instance can be shared freely across tasks.

use reqwest::header::ACCEPT;
use tracing::{event, Level};
use url::Url;

use crate::auth::{
    AccessTokenResponse, AuthorizationCodeTokenRequest, AuthorizationRequest, Error,
    RefreshTokenRequest, UpstreamFailure,
};
use crate::core::models::ClientConfig;
use crate::core::types::{
    AuthCode, ClientId, ClientSecret, GrantType, RedirectUri, RefreshToken, ResponseType, State,
};
use crate::util::random::FromRandom;

#[derive(Debug, Clone)]
pub struct OAuthClient {
    base_url: String,
    client_id: ClientId,
    client_secret: ClientSecret,
    redirect_uri: RedirectUri,
    authorize_endpoint: Url,
    token_endpoint: Url,
    http: reqwest::Client,
}

fn require(key: &'static str, value: &str) -> Result<(), Error> {
    if value.trim().is_empty() {
        Err(Error::ConfigurationMissing(key))
    } else {
        Ok(())
    }
}

/// Joins a path onto the base URL textually, so a base that already has a
/// path (`https://host/web/index.php`) keeps it.
fn endpoint(base_url: &str, path: &str, key: &'static str) -> Result<Url, Error> {
    let joined = format!(
        "{}/{}",
        base_url.trim_end_matches('/'),
        path.trim_start_matches('/')
    );
    Url::parse(&joined).map_err(|e| Error::ConfigurationInvalid {
        key,
        reason: format!("{} ({})", e, joined),
    })
}

impl OAuthClient {
    pub fn new(config: ClientConfig) -> Result<Self, Error> {
        require(ClientConfig::BASE_URL, &config.base_url)?;
        require(ClientConfig::CLIENT_ID, &config.client_id.0)?;
        require(ClientConfig::CLIENT_SECRET, &config.client_secret.0)?;
        require(ClientConfig::REDIRECT_URI, &config.redirect_uri.0)?;

        Url::parse(&config.base_url).map_err(|e| Error::ConfigurationInvalid {
            key: ClientConfig::BASE_URL,
            reason: e.to_string(),
        })?;
        Url::parse(&config.redirect_uri.0).map_err(|e| Error::ConfigurationInvalid {
            key: ClientConfig::REDIRECT_URI,
            reason: e.to_string(),
        })?;

        let authorize_endpoint = endpoint(
            &config.base_url,
            &config.authorize_path,
            ClientConfig::AUTHORIZE_PATH,
        )?;
        let token_endpoint = endpoint(
            &config.base_url,
            &config.token_path,
            ClientConfig::TOKEN_PATH,
        )?;

        let http = reqwest::Client::builder()
            .timeout(config.timeout)
            .build()
            .map_err(Error::HttpClient)?;

        Ok(Self {
            base_url: config.base_url,
            client_id: config.client_id,
            client_secret: config.client_secret,
            redirect_uri: config.redirect_uri,
            authorize_endpoint,
            token_endpoint,
            http,
        })
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    pub fn client_id(&self) -> &ClientId {
        &self.client_id
    }

    pub fn redirect_uri(&self) -> &RedirectUri {
        &self.redirect_uri
    }

    pub fn token_endpoint(&self) -> &Url {
        &self.token_endpoint
    }

    /// URL of the provider's authorization page. A fresh random state is
    /// generated when none is given.
    pub fn authorization_url(&self, state: Option<State>) -> Url {
        let state = state.unwrap_or_else(State::from_random);

        let url = AuthorizationRequest {
            client_id: &self.client_id,
            redirect_uri: &self.redirect_uri,
            response_type: ResponseType::Code,
            state: &state,
        }
        .to_url(&self.authorize_endpoint);

        event!(Level::INFO, url = %url, "Authorization URL");
        url
    }

    /// Trades an authorization code for tokens. Codes are single-use, so a
    /// failure here is final for that code.
    #[tracing::instrument(skip_all, fields(endpoint = %self.token_endpoint))]
    pub async fn exchange_code(&self, code: &AuthCode) -> Result<AccessTokenResponse, Error> {
        event!(Level::INFO, "Exchanging authorization code for access token");

        let body = AuthorizationCodeTokenRequest {
            grant_type: GrantType::AuthorizationCode,
            client_id: &self.client_id,
            client_secret: &self.client_secret,
            redirect_uri: &self.redirect_uri,
            code,
        };

        self.token_request(&body).await.map_err(|failure| {
            event!(Level::ERROR, status = ?failure.status(), body = ?failure.body(), %failure, "Error exchanging code for token");
            Error::TokenExchangeFailed(failure)
        })
    }

    #[tracing::instrument(skip_all, fields(endpoint = %self.token_endpoint))]
    pub async fn refresh_access_token(
        &self,
        refresh_token: &RefreshToken,
    ) -> Result<AccessTokenResponse, Error> {
        event!(Level::INFO, "Refreshing access token");

        let body = RefreshTokenRequest {
            grant_type: GrantType::RefreshToken,
            client_id: &self.client_id,
            client_secret: &self.client_secret,
            refresh_token,
        };

        self.token_request(&body).await.map_err(|failure| {
            event!(Level::ERROR, status = ?failure.status(), body = ?failure.body(), %failure, "Error refreshing token");
            Error::TokenRefreshFailed(failure)
        })
    }

    async fn token_request(
        &self,
        body: &impl serde::Serialize,
    ) -> Result<AccessTokenResponse, UpstreamFailure> {
        let transport = |e: reqwest::Error| UpstreamFailure::Transport(describe(&e));

        let response = self
            .http
            .post(self.token_endpoint.clone())
            .header(ACCEPT, "application/json")
            .form(body)
            .send()
            .await
            .map_err(transport)?;

        let status = response.status();
        let text = response.text().await.map_err(transport)?;

        if !status.is_success() {
            return Err(UpstreamFailure::Status {
                status: status.as_u16(),
                body: text,
            });
        }

        let token: AccessTokenResponse =
            serde_json::from_str(&text).map_err(|e| UpstreamFailure::MalformedBody {
                status: status.as_u16(),
                body: text.clone(),
                reason: e.to_string(),
            })?;

        event!(
            Level::INFO,
            token_type = ?token.token_type(),
            expires_in = ?token.expires_in(),
            has_refresh_token = token.refresh_token().is_some(),
            "Access token received"
        );
        Ok(token)
    }
}

/// reqwest's top-level message hides the cause ("error sending request"),
/// so walk the source chain.
fn describe(error: &reqwest::Error) -> String {
    use std::error::Error as _;

    let mut message = error.to_string();
    let mut source = error.source();
    while let Some(cause) = source {
        message.push_str(": ");
        message.push_str(&cause.to_string());
        source = cause.source();
    }
    if error.is_timeout() {
        message.push_str(" (timed out)");
    }
    message
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::auth::ErrorKind;
    use std::collections::HashMap;

    fn config() -> ClientConfig {
        ClientConfig::new(
            "https://hrm.example.com/web/index.php/",
            ClientId("client id".to_string()),
            ClientSecret("secret".to_string()),
            RedirectUri("http://localhost:3000/callback?x=1&y=2".to_string()),
        )
    }

    fn query(url: &Url) -> HashMap<String, String> {
        url.query_pairs().into_owned().collect()
    }

    #[test]
    fn authorization_url_carries_exactly_the_request_parameters() {
        let client = OAuthClient::new(config()).unwrap();
        let url = client.authorization_url(Some(State("a b/c&d".to_string())));

        assert_eq!(
            url.as_str().split('?').next(),
            Some("https://hrm.example.com/web/index.php/oauth2/authorize")
        );

        let expected: HashMap<String, String> = [
            ("client_id", "client id"),
            ("redirect_uri", "http://localhost:3000/callback?x=1&y=2"),
            ("response_type", "code"),
            ("state", "a b/c&d"),
        ]
        .iter()
        .map(|(k, v)| (k.to_string(), v.to_string()))
        .collect();
        assert_eq!(query(&url), expected);
    }

    #[test]
    fn authorization_url_generates_state_when_absent() {
        let client = OAuthClient::new(config()).unwrap();
        let first = query(&client.authorization_url(None));
        let second = query(&client.authorization_url(None));

        assert!(!first["state"].is_empty());
        assert_ne!(first["state"], second["state"]);
    }

    #[test]
    fn endpoints_share_one_token_path() {
        let mut config = config();
        config.token_path = "oauth/token".to_string();
        let client = OAuthClient::new(config).unwrap();

        assert_eq!(
            client.token_endpoint().as_str(),
            "https://hrm.example.com/web/index.php/oauth/token"
        );
    }

    #[test]
    fn blank_values_fail_fast_with_their_key() {
        let mut missing = config();
        missing.client_secret = ClientSecret(" ".to_string());

        match OAuthClient::new(missing) {
            Err(Error::ConfigurationMissing(key)) => assert_eq!(key, "ORANGEHRM_CLIENT_SECRET"),
            other => panic!("unexpected: {:?}", other.map(|_| ())),
        }
    }

    #[test]
    fn unparsable_base_url_is_rejected() {
        let mut invalid = config();
        invalid.base_url = "hrm.example.com".to_string();

        let e = OAuthClient::new(invalid).unwrap_err();
        assert_eq!(e.kind(), ErrorKind::ConfigurationInvalid);
        assert!(e.to_string().contains("ORANGEHRM_BASE_URL"));
    }

    #[test]
    fn debug_output_hides_the_secret() {
        let client = OAuthClient::new(config()).unwrap();
        assert!(!format!("{:?}", client).contains("\"secret\""));
    }
}
