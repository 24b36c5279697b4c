use url::Url;

use crate::core::types::{AuthCode, ClientId, RedirectUri, ResponseType, State};

use super::error::Error;

/// Query parameters of the authorization endpoint.
#[derive(Debug, Clone, serde::Serialize)]
pub struct AuthorizationRequest<'r> {
    pub client_id: &'r ClientId,
    pub redirect_uri: &'r RedirectUri,
    pub response_type: ResponseType,
    pub state: &'r State,
}

impl AuthorizationRequest<'_> {
    /// Appends the request to `endpoint` as form-encoded query pairs,
    /// keeping any query the endpoint already carries.
    pub fn to_url(&self, endpoint: &Url) -> Url {
        let mut url = endpoint.clone();
        let encoded = serde_urlencoded::to_string(self)
            .expect("authorization request is a flat struct of strings");
        let pairs = form_urlencoded::parse(encoded.as_bytes());
        url.query_pairs_mut().extend_pairs(pairs);
        url
    }
}

/// What the provider sends back to the redirect URI.
#[derive(Debug, Clone, Default, serde::Deserialize)]
pub struct CallbackParams {
    pub code: Option<String>,
    pub state: Option<String>,
    pub error: Option<String>,
    pub error_description: Option<String>,
}

fn non_empty(value: Option<String>) -> Option<String> {
    value.filter(|v| !v.is_empty())
}

impl CallbackParams {
    pub fn into_grant(self) -> Result<(AuthCode, Option<State>), Error> {
        if let Some(error) = non_empty(self.error) {
            return Err(Error::AuthorizationDenied {
                error,
                description: non_empty(self.error_description),
            });
        }

        let code = non_empty(self.code).ok_or(Error::MissingAuthorizationCode)?;
        Ok((AuthCode(code), non_empty(self.state).map(State)))
    }
}
