pub mod error;
pub mod reply;

use warp::{Filter, Rejection};

use crate::auth::{CallbackParams, Error};

/// Provider redirect parameters. A bare `/callback` yields empty params; a
/// query that does not decode is rejected rather than ignored.
pub fn callback_query() -> impl Filter<Extract = (CallbackParams,), Error = Rejection> + Clone {
    warp::query::raw()
        .or(warp::any().map(String::new))
        .unify()
        .and_then(|raw: String| async move {
            reply::accept(
                serde_urlencoded::from_str::<CallbackParams>(&raw)
                    .map_err(|e| Error::InvalidCallbackQuery(e.to_string())),
            )
        })
}
