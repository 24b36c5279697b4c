use std::sync::Arc;

use tracing::{event, Level};
use warp::Filter;

use crate::auth::{CallbackParams, Error};
use crate::client::OAuthClient;
use crate::core::types::State;
use crate::http::encoding::{self, reply};
use crate::http::response::{AuthorizePage, Page, TokenPage};
use crate::util::random::FromRandom;

async fn exchange_callback(client: &OAuthClient, params: CallbackParams) -> Result<TokenPage, Error> {
    let (code, state) = params.into_grant()?;
    event!(Level::INFO, state = ?state, "Received callback with code");

    let token = client.exchange_code(&code).await?;
    Ok(TokenPage::new(&token))
}

pub fn oauth_endpoint(
    client: Arc<OAuthClient>,
) -> impl warp::Filter<Extract = (impl warp::Reply,), Error = warp::Rejection> + Clone {
    let with_client = warp::any().map(move || client.clone());

    let authorize = warp::path("auth")
        .and(warp::path::end())
        .and(warp::get())
        .and(with_client.clone())
        .map(|client: Arc<OAuthClient>| {
            let url = client.authorization_url(Some(State::from_random()));
            Page::ok(AuthorizePage {
                url: url.to_string(),
            })
        });

    // Either a token page or a rejection carrying the failure
    let callback = warp::path("callback")
        .and(warp::path::end())
        .and(warp::get())
        .and(encoding::callback_query())
        .and(with_client.clone())
        .and_then(|params: CallbackParams, client: Arc<OAuthClient>| async move {
            reply::page(exchange_callback(&client, params).await)
        });

    authorize.or(callback)
}
