use std::fmt;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    ConfigurationMissing,
    ConfigurationInvalid,
    HttpClient,
    TokenExchangeFailed,
    TokenRefreshFailed,
    AuthorizationDenied,
    MissingAuthorizationCode,
    InvalidCallbackQuery,
}

/// Why a call to the token endpoint did not produce a token.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum UpstreamFailure {
    /// The provider answered with a non-success status.
    Status { status: u16, body: String },
    /// The provider answered 2xx but the body is not a JSON object.
    MalformedBody {
        status: u16,
        body: String,
        reason: String,
    },
    /// No response was received: connect failure, timeout, broken stream.
    Transport(String),
}

impl UpstreamFailure {
    pub fn status(&self) -> Option<u16> {
        match self {
            Self::Status { status, .. } | Self::MalformedBody { status, .. } => Some(*status),
            Self::Transport(_) => None,
        }
    }

    pub fn body(&self) -> Option<&str> {
        match self {
            Self::Status { body, .. } | Self::MalformedBody { body, .. } => Some(body),
            Self::Transport(_) => None,
        }
    }
}

impl fmt::Display for UpstreamFailure {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Status { status, body } => write!(f, "status {}: {}", status, body),
            Self::MalformedBody {
                status,
                body,
                reason,
            } => write!(f, "status {} with unreadable body ({}): {}", status, reason, body),
            Self::Transport(message) => write!(f, "transport error: {}", message),
        }
    }
}

#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error("Missing required configuration value {0}")]
    ConfigurationMissing(&'static str),
    #[error("Invalid configuration value {key}: {reason}")]
    ConfigurationInvalid { key: &'static str, reason: String },
    #[error("Failed to build HTTP client: {0}")]
    HttpClient(#[source] reqwest::Error),
    #[error("Token exchange failed: {0}")]
    TokenExchangeFailed(UpstreamFailure),
    #[error("Token refresh failed: {0}")]
    TokenRefreshFailed(UpstreamFailure),
    #[error("Authorization Error: {}", describe_denial(.error, .description))]
    AuthorizationDenied {
        error: String,
        description: Option<String>,
    },
    #[error("Missing authorization code")]
    MissingAuthorizationCode,
    #[error("Invalid callback query: {0}")]
    InvalidCallbackQuery(String),
}

fn describe_denial(error: &str, description: &Option<String>) -> String {
    match description {
        Some(d) => format!("{} ({})", error, d),
        None => error.to_string(),
    }
}

impl Error {
    pub fn kind(&self) -> ErrorKind {
        match self {
            Self::ConfigurationMissing(_) => ErrorKind::ConfigurationMissing,
            Self::ConfigurationInvalid { .. } => ErrorKind::ConfigurationInvalid,
            Self::HttpClient(_) => ErrorKind::HttpClient,
            Self::TokenExchangeFailed(_) => ErrorKind::TokenExchangeFailed,
            Self::TokenRefreshFailed(_) => ErrorKind::TokenRefreshFailed,
            Self::AuthorizationDenied { .. } => ErrorKind::AuthorizationDenied,
            Self::MissingAuthorizationCode => ErrorKind::MissingAuthorizationCode,
            Self::InvalidCallbackQuery(_) => ErrorKind::InvalidCallbackQuery,
        }
    }

    pub fn upstream(&self) -> Option<&UpstreamFailure> {
        match self {
            Self::TokenExchangeFailed(u) | Self::TokenRefreshFailed(u) => Some(u),
            _ => None,
        }
    }

    /// Whether the caller supplied bad input, as opposed to the provider
    /// or the process failing.
    pub fn is_client_error(&self) -> bool {
        matches!(
            self.kind(),
            ErrorKind::AuthorizationDenied
                | ErrorKind::MissingAuthorizationCode
                | ErrorKind::InvalidCallbackQuery
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn denial_carries_provider_text_verbatim() {
        let e = Error::AuthorizationDenied {
            error: "access_denied".to_string(),
            description: None,
        };
        assert_eq!(e.to_string(), "Authorization Error: access_denied");

        let e = Error::AuthorizationDenied {
            error: "access_denied".to_string(),
            description: Some("user cancelled".to_string()),
        };
        assert_eq!(e.to_string(), "Authorization Error: access_denied (user cancelled)");
    }

    #[test]
    fn transport_failures_have_no_status() {
        let e = Error::TokenExchangeFailed(UpstreamFailure::Transport("refused".to_string()));
        let upstream = e.upstream().unwrap();

        assert_eq!(upstream.status(), None);
        assert_eq!(upstream.body(), None);
        assert!(!e.is_client_error());
    }

    #[test]
    fn configuration_errors_name_the_key() {
        let e = Error::ConfigurationMissing("ORANGEHRM_CLIENT_ID");
        assert_eq!(e.kind(), ErrorKind::ConfigurationMissing);
        assert!(e.to_string().contains("ORANGEHRM_CLIENT_ID"));
    }
}
