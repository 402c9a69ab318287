use std::sync::Arc;

use crate::{
    cache::Cache,
    entities::Coordinates,
    error::LookupError,
    external::GeocodeProvider,
};

/// Resolves free-text places to coordinates, remembering every answer.
pub struct Geocoder {
    provider: Arc<dyn GeocodeProvider>,
    cache: Cache<String, Coordinates>,
}

impl Geocoder {
    pub fn new(provider: Arc<dyn GeocodeProvider>) -> Self {
        Self {
            provider,
            cache: Cache::new(),
        }
    }

    #[tracing::instrument(skip(self))]
    pub async fn resolve(&self, text: &str) -> Result<Coordinates, LookupError> {
        let key = text.trim().to_string();

        if key.is_empty() {
            return Err(LookupError::AddressNotFound(key));
        }

        if let Some(coordinates) = self.cache.get(&key) {
            tracing::debug!("geocode cache hit");
            return Ok(coordinates);
        }

        let coordinates = self.provider.search(&key).await?;
        self.cache.put(key, coordinates);

        Ok(coordinates)
    }

    pub fn cached(&self) -> usize {
        self.cache.len()
    }
}
