mod estimate;
#[cfg(test)]
pub(crate) mod fakes;
mod geocoder;
mod map_api;
mod pipeline;
mod router;

pub use estimate::{estimated_duration_min, haversine_km};
pub use geocoder::Geocoder;
pub use pipeline::{BatchOutcome, BatchSettings, Pipeline};
pub use router::Router;

use std::sync::Arc;

use crate::{
    api::API,
    config::Config,
    entities::Destination,
    error::Error,
    external::{nominatim::Nominatim, osrm::Osrm, GeocodeProvider, RouteProvider},
    map::{LeafletRenderer, MapRenderer},
};

pub struct Engine {
    pipeline: Pipeline,
    renderer: Arc<dyn MapRenderer>,
    destination: Arc<Destination>,
    service_name: String,
}

impl Engine {
    /// Wires the public Nominatim/OSRM clients and the Leaflet renderer.
    #[tracing::instrument(name = "Engine::new", skip_all)]
    pub fn new(config: &Config) -> Result<Self, Error> {
        let geocode = Nominatim::new(
            &config.geocoder_base_url,
            &config.geocoder_country_codes,
            &config.user_agent,
            config.geocoder_timeout,
        )?;
        let route = Osrm::new(
            &config.router_base_url,
            &config.user_agent,
            config.router_timeout,
        )?;

        tracing::info!(
            geocoder = %config.geocoder_base_url,
            router = %config.router_base_url,
            destination = %config.destination.name,
            "engine ready"
        );

        Ok(Self::with_providers(
            config,
            Arc::new(geocode),
            Arc::new(route),
            Arc::new(LeafletRenderer),
        ))
    }

    pub fn with_providers(
        config: &Config,
        geocode: Arc<dyn GeocodeProvider>,
        route: Arc<dyn RouteProvider>,
        renderer: Arc<dyn MapRenderer>,
    ) -> Self {
        let destination = Arc::new(config.destination.clone());

        Self {
            pipeline: Pipeline::new(
                Arc::new(Geocoder::new(geocode)),
                Arc::new(Router::new(route)),
                Arc::clone(&destination),
                config.batch.clone(),
            ),
            renderer,
            destination,
            service_name: config.service_name.clone(),
        }
    }
}

impl API for Engine {}
