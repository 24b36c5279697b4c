use std::net::SocketAddr;
use std::sync::Arc;

use tracing::{event, Level};
use warp::Filter;

use crate::client::OAuthClient;

mod endpoints;

use endpoints::{home::home_endpoint, oauth::oauth_endpoint};

use super::encoding::error::handle_reject;

/// All harness routes, with failures recovered into error pages.
pub fn routes(
    client: Arc<OAuthClient>,
) -> impl Filter<Extract = (impl warp::Reply,), Error = warp::Rejection> + Clone {
    home_endpoint(client.clone())
        .or(oauth_endpoint(client))
        .recover(handle_reject)
        .with(warp::log("hrm_oauth::http"))
}

#[derive(Debug)]
pub struct Server {
    client: Arc<OAuthClient>,
    addr: SocketAddr,
}

impl Server {
    pub fn new(client: Arc<OAuthClient>, addr: SocketAddr) -> Self {
        Self { client, addr }
    }

    pub async fn serve(self) {
        event!(
            Level::INFO,
            address = %self.addr,
            base_url = %self.client.base_url(),
            client_id = %self.client.client_id(),
            redirect_uri = %self.client.redirect_uri(),
            "OrangeHRM OAuth flow test server running, open http://{} in your browser",
            self.addr
        );

        warp::serve(routes(self.client)).run(self.addr).await;
    }
}
