use tracing::{event, Level};
use warp::http::StatusCode;
use warp::{Rejection, Reply};

use crate::auth::Error;
use crate::http::response::{ErrorPage, Page};

#[derive(Debug)]
pub struct HarnessRejection(pub Error);

impl warp::reject::Reject for HarnessRejection {}

impl From<Error> for HarnessRejection {
    fn from(error: Error) -> Self {
        Self(error)
    }
}

impl HarnessRejection {
    pub fn status(&self) -> StatusCode {
        if self.0.is_client_error() {
            StatusCode::BAD_REQUEST
        } else {
            StatusCode::INTERNAL_SERVER_ERROR
        }
    }
}

pub async fn handle_reject(err: Rejection) -> Result<impl Reply, Rejection> {
    match err.find::<HarnessRejection>() {
        Some(e) => {
            let status = e.status();
            event!(Level::WARN, %status, error = %e.0, "Request failed");
            let page = ErrorPage {
                message: e.0.to_string(),
            };
            Ok(Page::with_status(page, status))
        }
        None => Err(err),
    }
}
