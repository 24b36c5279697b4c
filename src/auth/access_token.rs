use crate::core::types::{AuthCode, ClientId, ClientSecret, GrantType, RedirectUri, RefreshToken};

/// Form body for the `authorization_code` grant.
#[derive(Debug, serde::Serialize)]
pub struct AuthorizationCodeTokenRequest<'r> {
    pub grant_type: GrantType,
    pub client_id: &'r ClientId,
    pub client_secret: &'r ClientSecret,
    pub redirect_uri: &'r RedirectUri,
    pub code: &'r AuthCode,
}

/// Form body for the `refresh_token` grant.
#[derive(Debug, serde::Serialize)]
pub struct RefreshTokenRequest<'r> {
    pub grant_type: GrantType,
    pub client_id: &'r ClientId,
    pub client_secret: &'r ClientSecret,
    pub refresh_token: &'r RefreshToken,
}

/// Token endpoint response.
///
/// The body is kept exactly as the provider sent it. The well-known fields
/// are read through accessors that return `None` when a value is absent or
/// does not have the expected shape, so an unusual body never fails to parse
/// as long as it is a JSON object.
#[derive(Debug, Clone, PartialEq, serde::Deserialize, serde::Serialize)]
#[serde(transparent)]
pub struct AccessTokenResponse(pub serde_json::Map<String, serde_json::Value>);

impl AccessTokenResponse {
    fn text(&self, key: &str) -> Option<&str> {
        self.0.get(key).and_then(serde_json::Value::as_str)
    }

    pub fn access_token(&self) -> Option<&str> {
        self.text("access_token")
    }

    pub fn token_type(&self) -> Option<&str> {
        self.text("token_type")
    }

    /// Lifetime in seconds. Some providers send it as a string or a float.
    pub fn expires_in(&self) -> Option<u64> {
        use serde_json::Value;

        match self.0.get("expires_in")? {
            Value::Number(n) => n.as_u64().or_else(|| {
                n.as_f64()
                    .filter(|f| f.is_finite() && *f >= 0.0 && f.fract() == 0.0)
                    .map(|f| f as u64)
            }),
            Value::String(s) => s.trim().parse().ok(),
            _ => None,
        }
    }

    pub fn refresh_token(&self) -> Option<RefreshToken> {
        self.text("refresh_token").map(|t| RefreshToken(t.to_string()))
    }

    pub fn scope(&self) -> Option<&str> {
        self.text("scope")
    }

    pub fn get(&self, key: &str) -> Option<&serde_json::Value> {
        self.0.get(key)
    }
}
