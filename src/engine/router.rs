use std::sync::Arc;

use crate::{
    cache::{route_key, Cache},
    entities::{Coordinates, RouteInfo},
    error::LookupError,
    external::RouteProvider,
};

/// Driving routes between coordinate pairs, cached per endpoint pair.
pub struct Router {
    provider: Arc<dyn RouteProvider>,
    cache: Cache<String, RouteInfo>,
}

impl Router {
    pub fn new(provider: Arc<dyn RouteProvider>) -> Self {
        Self {
            provider,
            cache: Cache::new(),
        }
    }

    #[tracing::instrument(skip(self))]
    pub async fn resolve(
        &self,
        start: Coordinates,
        end: Coordinates,
    ) -> Result<RouteInfo, LookupError> {
        let key = route_key(start, end);

        if let Some(route) = self.cache.get(&key) {
            tracing::debug!("route cache hit");
            return Ok(route);
        }

        let route = self.provider.route(start, end).await?;
        self.cache.put(key, route.clone());

        Ok(route)
    }

    pub fn cached(&self) -> usize {
        self.cache.len()
    }
}
