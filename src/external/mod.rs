pub mod nominatim;
pub mod osrm;

use std::time::Duration;

use async_trait::async_trait;
use reqwest::header::{HeaderMap, HeaderValue, USER_AGENT};

use crate::{
    entities::{Coordinates, RouteInfo},
    error::{config_error, Error, LookupError},
};

/// Free-text place lookup.
#[async_trait]
pub trait GeocodeProvider: Send + Sync {
    async fn search(&self, query: &str) -> Result<Coordinates, LookupError>;
}

/// Driving directions between two points.
#[async_trait]
pub trait RouteProvider: Send + Sync {
    async fn route(&self, start: Coordinates, end: Coordinates) -> Result<RouteInfo, LookupError>;
}

pub fn build_client(user_agent: &str, timeout: Duration) -> Result<reqwest::Client, Error> {
    let mut headers = HeaderMap::new();
    headers.insert(
        USER_AGENT,
        HeaderValue::from_str(user_agent).map_err(config_error)?,
    );

    Ok(reqwest::Client::builder()
        .default_headers(headers)
        .timeout(timeout)
        .build()?)
}
