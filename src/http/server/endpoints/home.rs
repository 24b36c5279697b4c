use std::sync::Arc;

use warp::Filter;

use crate::client::OAuthClient;
use crate::http::response::{HomePage, Page};

pub fn home_endpoint(
    client: Arc<OAuthClient>,
) -> impl warp::Filter<Extract = (impl warp::Reply,), Error = warp::Rejection> + Clone {
    warp::path::end().and(warp::get()).map(move || {
        Page::ok(HomePage {
            base_url: client.base_url().to_string(),
            client_id: client.client_id().to_string(),
            redirect_uri: client.redirect_uri().to_string(),
        })
    })
}
