use askama::Template;
use warp::Rejection;

use super::error::HarnessRejection;
use crate::http::response::Page;

pub fn accept<T, E>(result: Result<T, E>) -> Result<T, Rejection>
where
    E: Into<HarnessRejection>,
{
    result.map_err(|e| warp::reject::custom(e.into()))
}

pub fn page<T, E>(result: Result<T, E>) -> Result<Page<T>, Rejection>
where
    T: Template,
    E: Into<HarnessRejection>,
{
    accept(result).map(Page::ok)
}
