use async_trait::async_trait;
use serde::Deserialize;

use crate::{
    entities::{Coordinates, RouteInfo},
    error::{Error, LookupError},
    external::{build_client, RouteProvider},
};

#[derive(Clone, Debug, Deserialize)]
struct Response {
    code: String,
    #[serde(default)]
    message: Option<String>,
    #[serde(default)]
    routes: Vec<Route>,
}

#[derive(Clone, Debug, Deserialize)]
struct Route {
    geometry: Geometry,
    /// Metres.
    distance: f64,
    /// Seconds.
    duration: f64,
}

#[derive(Clone, Debug, Deserialize)]
struct Geometry {
    coordinates: Vec<[f64; 2]>,
}

/// Client for an OSRM `route/v1/driving` endpoint.
#[derive(Clone, Debug)]
pub struct Osrm {
    client: reqwest::Client,
    base_url: String,
}

impl Osrm {
    pub fn new(
        base_url: &str,
        user_agent: &str,
        timeout: std::time::Duration,
    ) -> Result<Self, Error> {
        Ok(Self {
            client: build_client(user_agent, timeout)?,
            base_url: base_url.trim_end_matches('/').to_string(),
        })
    }
}

#[async_trait]
impl RouteProvider for Osrm {
    #[tracing::instrument(skip(self))]
    async fn route(&self, start: Coordinates, end: Coordinates) -> Result<RouteInfo, LookupError> {
        let url = format!(
            "{}/route/v1/driving/{},{};{},{}",
            self.base_url, start.lon, start.lat, end.lon, end.lat
        );

        let res = self
            .client
            .get(url)
            .query(&[("overview", "full")])
            .query(&[("geometries", "geojson")])
            .send()
            .await?;

        // OSRM reports NoRoute and friends with a 4xx status and a JSON body.
        let status = res.status();
        let body = res.text().await?;

        parse_route_response(&body).map_err(|err| match err {
            LookupError::Upstream(message) if !status.is_success() => LookupError::Upstream(
                format!("router returned HTTP {}: {}", status.as_u16(), message),
            ),
            err => err,
        })
    }
}

fn parse_route_response(body: &str) -> Result<RouteInfo, LookupError> {
    let data: Response = serde_json::from_str(body)
        .map_err(|err| LookupError::Upstream(format!("malformed router response: {}", err)))?;

    match data.code.as_str() {
        "Ok" => {}
        "NoRoute" | "NoSegment" => return Err(LookupError::RouteNotFound),
        code => {
            return Err(LookupError::Upstream(format!(
                "{}: {}",
                code,
                data.message.unwrap_or_default()
            )))
        }
    }

    let route = data
        .routes
        .into_iter()
        .next()
        .ok_or(LookupError::RouteNotFound)?;

    Ok(RouteInfo {
        geometry: route.geometry.coordinates,
        distance_km: route.distance / 1000.0,
        duration_min: route.duration / 60.0,
    })
}
