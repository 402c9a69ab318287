//! Service configuration read from the environment (a `.env` file is loaded first by `main`).

use std::env;
use std::net::SocketAddr;
use std::str::FromStr;
use std::time::Duration;

use crate::{
    engine::BatchSettings,
    entities::{Coordinates, Destination},
    error::{config_error, Error},
};

#[derive(Clone, Debug)]
pub struct Config {
    pub listen_addr: SocketAddr,
    pub service_name: String,
    pub geocoder_base_url: String,
    pub geocoder_country_codes: String,
    pub geocoder_timeout: Duration,
    pub router_base_url: String,
    pub router_timeout: Duration,
    pub user_agent: String,
    pub batch: BatchSettings,
    pub destination: Destination,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            listen_addr: SocketAddr::from(([0, 0, 0, 0], 5000)),
            service_name: "Route Visualizer API".into(),
            geocoder_base_url: "https://nominatim.openstreetmap.org".into(),
            geocoder_country_codes: "br".into(),
            geocoder_timeout: Duration::from_secs(5),
            router_base_url: "http://router.project-osrm.org".into(),
            router_timeout: Duration::from_secs(8),
            user_agent: "RouteVisualizer/1.0".into(),
            batch: BatchSettings::default(),
            destination: Destination::new(
                "Biopark Educação - Toledo, PR".into(),
                Coordinates::new(-24.7136, -53.7405),
                "R. da Faculdade, 645 - Jardim La Salle, Toledo - PR, 85902-532".into(),
            ),
        }
    }
}

impl Config {
    pub fn from_env() -> Result<Self, Error> {
        Self::from_lookup(|name| env::var(name))
    }

    /// Builds a config from an arbitrary variable source; unset variables keep their defaults.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, Error>
    where
        F: Fn(&str) -> Result<String, env::VarError>,
    {
        let defaults = Self::default();
        let var = |name: &str| -> Result<Option<String>, Error> {
            match lookup(name) {
                Ok(value) => Ok(Some(value)),
                Err(env::VarError::NotPresent) => Ok(None),
                Err(err) => Err(err.into()),
            }
        };
        let parsed = |name: &str| -> Result<Option<f64>, Error> { parse(name, var(name)?) };

        let batch_size: usize = parse("BATCH_SIZE", var("BATCH_SIZE")?)?
            .unwrap_or(defaults.batch.batch_size);
        let max_workers: usize = parse("MAX_WORKERS", var("MAX_WORKERS")?)?
            .unwrap_or(defaults.batch.max_workers);

        if batch_size == 0 || max_workers == 0 {
            return Err(config_error("BATCH_SIZE and MAX_WORKERS must be at least 1"));
        }

        let pause_ms: Option<u64> = parse("BATCH_PAUSE_MS", var("BATCH_PAUSE_MS")?)?;
        let geocoder_timeout: Option<u64> =
            parse("GEOCODER_TIMEOUT_SECS", var("GEOCODER_TIMEOUT_SECS")?)?;
        let router_timeout: Option<u64> =
            parse("ROUTER_TIMEOUT_SECS", var("ROUTER_TIMEOUT_SECS")?)?;

        let lat = parsed("DESTINATION_LAT")?.unwrap_or(defaults.destination.lat);
        let lon = parsed("DESTINATION_LON")?.unwrap_or(defaults.destination.lon);
        let coordinates = Coordinates::checked(lat, lon).ok_or_else(|| {
            config_error(format!("invalid destination coordinates {}, {}", lat, lon))
        })?;

        Ok(Self {
            listen_addr: parse("LISTEN_ADDR", var("LISTEN_ADDR")?)?.unwrap_or(defaults.listen_addr),
            service_name: var("SERVICE_NAME")?.unwrap_or(defaults.service_name),
            geocoder_base_url: var("GEOCODER_BASE_URL")?.unwrap_or(defaults.geocoder_base_url),
            geocoder_country_codes: var("GEOCODER_COUNTRY_CODES")?
                .unwrap_or(defaults.geocoder_country_codes),
            geocoder_timeout: geocoder_timeout
                .map(Duration::from_secs)
                .unwrap_or(defaults.geocoder_timeout),
            router_base_url: var("ROUTER_BASE_URL")?.unwrap_or(defaults.router_base_url),
            router_timeout: router_timeout
                .map(Duration::from_secs)
                .unwrap_or(defaults.router_timeout),
            user_agent: var("HTTP_USER_AGENT")?.unwrap_or(defaults.user_agent),
            batch: BatchSettings {
                batch_size,
                max_workers,
                pause: pause_ms
                    .map(Duration::from_millis)
                    .unwrap_or(defaults.batch.pause),
            },
            destination: Destination::new(
                var("DESTINATION_NAME")?.unwrap_or(defaults.destination.name),
                coordinates,
                var("DESTINATION_ADDRESS")?.unwrap_or(defaults.destination.address),
            ),
        })
    }
}

fn parse<T>(name: &str, value: Option<String>) -> Result<Option<T>, Error>
where
    T: FromStr,
    T::Err: std::fmt::Display,
{
    value
        .map(|value| {
            value
                .trim()
                .parse::<T>()
                .map_err(|err| config_error(format!("{}={:?}: {}", name, value, err)))
        })
        .transpose()
}
