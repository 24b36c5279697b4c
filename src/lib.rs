pub mod auth;
pub mod client;
pub mod core;
pub mod http;
pub mod util;

pub use auth::{AccessTokenResponse, Error, ErrorKind};
pub use client::OAuthClient;
pub use crate::core::models::ClientConfig;
