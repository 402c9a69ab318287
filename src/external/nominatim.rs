use async_trait::async_trait;
use serde::Deserialize;

use crate::{
    entities::Coordinates,
    error::{Error, LookupError},
    external::{build_client, GeocodeProvider},
};

#[derive(Clone, Debug, Deserialize)]
struct Place {
    lat: String,
    lon: String,
}

/// Client for a Nominatim-compatible `/search` endpoint.
#[derive(Clone, Debug)]
pub struct Nominatim {
    client: reqwest::Client,
    base_url: String,
    country_codes: String,
}

impl Nominatim {
    pub fn new(
        base_url: &str,
        country_codes: &str,
        user_agent: &str,
        timeout: std::time::Duration,
    ) -> Result<Self, Error> {
        Ok(Self {
            client: build_client(user_agent, timeout)?,
            base_url: base_url.trim_end_matches('/').to_string(),
            country_codes: country_codes.to_string(),
        })
    }
}

#[async_trait]
impl GeocodeProvider for Nominatim {
    #[tracing::instrument(skip(self))]
    async fn search(&self, query: &str) -> Result<Coordinates, LookupError> {
        let url = format!("{}/search", self.base_url);

        let res = self
            .client
            .get(url)
            .query(&[("q", query)])
            .query(&[("format", "json")])
            .query(&[("limit", "1")])
            .query(&[("countrycodes", self.country_codes.as_str())])
            .send()
            .await?;

        let status = res.status();

        if !status.is_success() {
            return Err(LookupError::Upstream(format!(
                "geocoder returned HTTP {}",
                status.as_u16()
            )));
        }

        let body = res.text().await?;

        parse_search_response(&body, query)
    }
}

fn parse_search_response(body: &str, query: &str) -> Result<Coordinates, LookupError> {
    let places: Vec<Place> = serde_json::from_str(body)
        .map_err(|err| LookupError::Upstream(format!("malformed geocoder response: {}", err)))?;

    let place = places
        .first()
        .ok_or_else(|| LookupError::AddressNotFound(query.to_string()))?;

    let lat = place.lat.trim().parse::<f64>();
    let lon = place.lon.trim().parse::<f64>();

    match (lat, lon) {
        (Ok(lat), Ok(lon)) => Coordinates::checked(lat, lon).ok_or_else(|| {
            LookupError::Upstream(format!("geocoder returned invalid coordinates {}, {}", lat, lon))
        }),
        _ => Err(LookupError::Upstream(format!(
            "geocoder returned unparseable coordinates {:?}, {:?}",
            place.lat, place.lon
        ))),
    }
}
