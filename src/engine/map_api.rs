use super::Engine;

use async_trait::async_trait;

use crate::{
    api::{MapAPI, ServiceAPI},
    entities::{Destination, GeneratedMap, Origin},
    error::{validation_error, Error},
    map::MapView,
};

#[async_trait]
impl MapAPI for Engine {
    #[tracing::instrument(skip_all, fields(origins = origins.len()))]
    async fn generate_map(&self, origins: Vec<Origin>) -> Result<GeneratedMap, Error> {
        if origins.is_empty() {
            return Err(validation_error("at least one origin must be provided"));
        }

        let resolved = self.pipeline.resolve_batch(origins).await.into_result()?;

        let view = MapView::build(&resolved, &self.destination);
        let map_html = self.renderer.render(&view)?;

        Ok(GeneratedMap {
            map_html,
            origins: resolved,
            destination: self.destination.as_ref().clone(),
        })
    }
}

impl ServiceAPI for Engine {
    fn service_name(&self) -> &str {
        &self.service_name
    }

    fn destination(&self) -> &Destination {
        &self.destination
    }
}
