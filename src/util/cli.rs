use std::net::{IpAddr, SocketAddr};
use std::time::Duration;

use clap::{Args, Parser, Subcommand};

use crate::auth::{AccessTokenResponse, Error};
use crate::client::OAuthClient;
use crate::core::models::ClientConfig;
use crate::core::types::{AuthCode, ClientId, ClientSecret, RedirectUri, RefreshToken, State};

/// Identity provider settings shared by every binary.
///
/// Required values are optional here so that a missing one is reported by
/// its environment key rather than by clap's flag name.
#[derive(Args, Clone)]
pub struct ConfigOptions {
    #[clap(long, env = "ORANGEHRM_BASE_URL")]
    base_url: Option<String>,
    #[clap(long, env = "ORANGEHRM_CLIENT_ID")]
    client_id: Option<String>,
    #[clap(long, env = "ORANGEHRM_CLIENT_SECRET", hide_env_values = true)]
    client_secret: Option<String>,
    #[clap(long, env = "REDIRECT_URI")]
    redirect_uri: Option<String>,
    #[clap(long, env = "ORANGEHRM_AUTHORIZE_PATH", default_value = ClientConfig::DEFAULT_AUTHORIZE_PATH)]
    authorize_path: String,
    #[clap(long, env = "ORANGEHRM_TOKEN_PATH", default_value = ClientConfig::DEFAULT_TOKEN_PATH)]
    token_path: String,
    #[clap(long, env = "ORANGEHRM_TIMEOUT_SECS", default_value = "30")]
    timeout_secs: u64,
}

fn required(value: Option<String>, key: &'static str) -> Result<String, Error> {
    value
        .filter(|v| !v.trim().is_empty())
        .ok_or(Error::ConfigurationMissing(key))
}

impl ConfigOptions {
    pub fn into_config(self) -> Result<ClientConfig, Error> {
        let base_url = required(self.base_url, ClientConfig::BASE_URL)?;
        let client_id = required(self.client_id, ClientConfig::CLIENT_ID)?;
        let client_secret = required(self.client_secret, ClientConfig::CLIENT_SECRET)?;
        let redirect_uri = required(self.redirect_uri, ClientConfig::REDIRECT_URI)?;

        let mut config = ClientConfig::new(
            base_url,
            ClientId(client_id),
            ClientSecret(client_secret),
            RedirectUri(redirect_uri),
        )
        .with_timeout(Duration::from_secs(self.timeout_secs));
        config.authorize_path = self.authorize_path;
        config.token_path = self.token_path;

        Ok(config)
    }

    pub fn into_client(self) -> Result<OAuthClient, Error> {
        OAuthClient::new(self.into_config()?)
    }
}

#[derive(Parser)]
#[clap(
    name = "hrm-oauthd",
    version = env!("CARGO_PKG_VERSION"),
    author = env!("CARGO_PKG_AUTHORS"),
    about = "Test server for the OrangeHRM OAuth 2.0 authorization code flow"
)]
pub struct ServerOptions {
    #[clap(flatten)]
    pub config: ConfigOptions,
    #[clap(long, env = "HOST", default_value = "127.0.0.1")]
    pub host: IpAddr,
    #[clap(long, env = "PORT", default_value = "3000")]
    pub port: u16,
}

impl ServerOptions {
    pub fn address(&self) -> SocketAddr {
        SocketAddr::new(self.host, self.port)
    }
}

#[derive(Parser)]
#[clap(
    name = "hrm-oauth-util",
    version = env!("CARGO_PKG_VERSION"),
    author = env!("CARGO_PKG_AUTHORS"),
    about = "Exercise the OrangeHRM OAuth 2.0 flow from the command line"
)]
pub struct Options {
    #[clap(flatten)]
    config: ConfigOptions,
    #[clap(subcommand)]
    command: SubCommand,
}

#[derive(Subcommand)]
enum SubCommand {
    /// Print an authorization URL to open in a browser
    AuthorizeUrl(AuthorizeUrl),
    /// Exchange an authorization code for an access token
    Exchange(Exchange),
    /// Obtain a new access token with a refresh token
    Refresh(Refresh),
}

#[derive(Parser)]
struct AuthorizeUrl {
    #[clap(short, long)]
    state: Option<String>,
}

#[derive(Parser)]
struct Exchange {
    #[clap(short, long)]
    code: String,
}

#[derive(Parser)]
struct Refresh {
    #[clap(short, long)]
    refresh_token: String,
}

fn authorize_url(c: &AuthorizeUrl, client: &OAuthClient) -> String {
    let url = client.authorization_url(c.state.clone().map(State));
    format!(
        "Copy and open this URL in your browser to authorize:\n\n{}\n\n\
         Then run `hrm-oauth-util exchange --code <code>` with the code from the redirect.",
        url
    )
}

fn format_token(token: &AccessTokenResponse) -> String {
    serde_json::to_string_pretty(token).unwrap_or_else(|_| format!("{:?}", token))
}

async fn exchange(c: &Exchange, client: &OAuthClient) -> Result<String, Error> {
    let token = client.exchange_code(&AuthCode(c.code.clone())).await?;
    Ok(format_token(&token))
}

async fn refresh(c: &Refresh, client: &OAuthClient) -> Result<String, Error> {
    let token = client
        .refresh_access_token(&RefreshToken(c.refresh_token.clone()))
        .await?;
    Ok(format_token(&token))
}

/// Runs the selected subcommand and returns what it would print.
pub async fn execute(opts: Options) -> Result<String, Error> {
    let client = opts.config.into_client()?;

    match &opts.command {
        SubCommand::AuthorizeUrl(c) => Ok(authorize_url(c, &client)),
        SubCommand::Exchange(c) => exchange(c, &client).await,
        SubCommand::Refresh(c) => refresh(c, &client).await,
    }
}

pub async fn run_cli_action(opts: Options) -> Result<(), Error> {
    println!("{}", execute(opts).await?);
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::auth::ErrorKind;
    use serde_json::json;
    use wiremock::matchers::{body_string_contains, method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    fn parse(args: &[&str]) -> ServerOptions {
        ServerOptions::try_parse_from(args).unwrap()
    }

    fn config_options(base_url: &str) -> ConfigOptions {
        ConfigOptions {
            base_url: Some(base_url.to_string()),
            client_id: Some("id".to_string()),
            client_secret: Some("secret".to_string()),
            redirect_uri: Some("http://localhost:3000/callback".to_string()),
            authorize_path: ClientConfig::DEFAULT_AUTHORIZE_PATH.to_string(),
            token_path: ClientConfig::DEFAULT_TOKEN_PATH.to_string(),
            timeout_secs: 5,
        }
    }

    fn options(base_url: &str, command: SubCommand) -> Options {
        Options {
            config: config_options(base_url),
            command,
        }
    }

    #[test]
    fn missing_values_are_reported_by_key() {
        let mut opts = config_options("https://hrm.example.com");
        opts.redirect_uri = None;

        let e = opts.into_config().unwrap_err();
        assert_eq!(e.kind(), ErrorKind::ConfigurationMissing);
        assert!(e.to_string().contains("REDIRECT_URI"));

        let mut opts = config_options("https://hrm.example.com");
        opts.client_secret = Some("  ".to_string());

        let e = opts.into_config().unwrap_err();
        assert!(e.to_string().contains("ORANGEHRM_CLIENT_SECRET"));
    }

    #[test]
    fn flags_build_a_config() {
        let opts = parse(&[
            "hrm-oauthd",
            "--base-url",
            "https://hrm.example.com",
            "--client-id",
            "id",
            "--client-secret",
            "secret",
            "--redirect-uri",
            "http://localhost:4000/callback",
            "--token-path",
            "/oauth/token",
            "--timeout-secs",
            "5",
            "--port",
            "4000",
        ]);

        assert_eq!(opts.address().port(), 4000);

        let config = opts.config.into_config().unwrap();
        assert_eq!(config.token_path, "/oauth/token");
        assert_eq!(config.timeout, Duration::from_secs(5));
        assert_eq!(config.client_secret, ClientSecret("secret".to_string()));
    }

    #[test]
    fn subcommands_parse() {
        let opts = Options::try_parse_from(&[
            "hrm-oauth-util",
            "--base-url",
            "https://hrm.example.com",
            "refresh",
            "--refresh-token",
            "r1",
        ])
        .unwrap();

        match opts.command {
            SubCommand::Refresh(c) => assert_eq!(c.refresh_token, "r1"),
            _ => panic!("expected refresh"),
        }
    }

    #[tokio::test]
    async fn authorize_url_carries_the_given_state() {
        let command = SubCommand::AuthorizeUrl(AuthorizeUrl {
            state: Some("my-state".to_string()),
        });

        let output = execute(options("https://hrm.example.com", command))
            .await
            .unwrap();

        assert!(output.contains("https://hrm.example.com/oauth2/authorize?"));
        assert!(output.contains("state=my-state"));
        assert!(output.contains("exchange --code"));
    }

    #[tokio::test]
    async fn exchange_prints_the_token_response() {
        let server = MockServer::start().await;

        Mock::given(method("POST"))
            .and(path("/oauth2/token"))
            .and(body_string_contains("grant_type=authorization_code"))
            .and(body_string_contains("code=abc"))
            .respond_with(
                ResponseTemplate::new(200)
                    .set_body_json(json!({ "access_token": "tok", "expires_in": 3600 })),
            )
            .expect(1)
            .mount(&server)
            .await;

        let command = SubCommand::Exchange(Exchange {
            code: "abc".to_string(),
        });
        let output = execute(options(&server.uri(), command)).await.unwrap();

        let printed: serde_json::Value = serde_json::from_str(&output).unwrap();
        assert_eq!(printed, json!({ "access_token": "tok", "expires_in": 3600 }));
    }

    #[tokio::test]
    async fn refresh_prints_the_token_response() {
        let server = MockServer::start().await;

        Mock::given(method("POST"))
            .and(path("/oauth2/token"))
            .and(body_string_contains("grant_type=refresh_token"))
            .and(body_string_contains("refresh_token=r1"))
            .respond_with(
                ResponseTemplate::new(200)
                    .set_body_json(json!({ "access_token": "new", "refresh_token": "r2" })),
            )
            .expect(1)
            .mount(&server)
            .await;

        let command = SubCommand::Refresh(Refresh {
            refresh_token: "r1".to_string(),
        });
        let output = execute(options(&server.uri(), command)).await.unwrap();

        let printed: serde_json::Value = serde_json::from_str(&output).unwrap();
        assert_eq!(printed, json!({ "access_token": "new", "refresh_token": "r2" }));
    }

    #[tokio::test]
    async fn failed_exchange_is_returned() {
        let server = MockServer::start().await;

        Mock::given(method("POST"))
            .respond_with(ResponseTemplate::new(400).set_body_string("invalid_grant"))
            .mount(&server)
            .await;

        let command = SubCommand::Exchange(Exchange {
            code: "stale".to_string(),
        });
        let e = execute(options(&server.uri(), command)).await.unwrap_err();

        assert_eq!(e.kind(), ErrorKind::TokenExchangeFailed);
    }
}
