use askama::Template;
use tracing::{event, Level};
use warp::http::StatusCode;
use warp::reply::{Reply, Response};

use crate::auth::AccessTokenResponse;

#[derive(Template)]
#[template(path = "home.html")]
pub struct HomePage {
    pub base_url: String,
    pub client_id: String,
    pub redirect_uri: String,
}

#[derive(Template)]
#[template(path = "authorize.html")]
pub struct AuthorizePage {
    pub url: String,
}

#[derive(Template)]
#[template(path = "token.html")]
pub struct TokenPage {
    pub token_json: String,
}

impl TokenPage {
    pub fn new(token: &AccessTokenResponse) -> Self {
        let token_json =
            serde_json::to_string_pretty(token).unwrap_or_else(|_| format!("{:?}", token));
        Self { token_json }
    }
}

#[derive(Template)]
#[template(path = "error.html")]
pub struct ErrorPage {
    pub message: String,
}

/// A rendered HTML page with a status code.
pub struct Page<T> {
    template: T,
    status: StatusCode,
}

impl<T: Template> Page<T> {
    pub fn ok(template: T) -> Self {
        Self::with_status(template, StatusCode::OK)
    }

    pub fn with_status(template: T, status: StatusCode) -> Self {
        Self { template, status }
    }
}

impl<T: Template + Send> Reply for Page<T> {
    fn into_response(self) -> Response {
        match self.template.render() {
            Ok(body) => warp::reply::with_status(warp::reply::html(body), self.status).into_response(),
            Err(e) => {
                event!(Level::ERROR, error = %e, "Failed to render page");
                warp::reply::with_status(
                    format!("Error: {}", e),
                    StatusCode::INTERNAL_SERVER_ERROR,
                )
                .into_response()
            }
        }
    }
}
