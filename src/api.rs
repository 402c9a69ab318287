use async_trait::async_trait;
use std::sync::Arc;

use crate::entities::{Destination, GeneratedMap, Origin};
use crate::error::Error;

#[async_trait]
pub trait MapAPI {
    async fn generate_map(&self, origins: Vec<Origin>) -> Result<GeneratedMap, Error>;
}

pub trait ServiceAPI {
    fn service_name(&self) -> &str;
    fn destination(&self) -> &Destination;
}

pub trait API: MapAPI + ServiceAPI {}

pub type DynAPI = Arc<dyn API + Send + Sync>;
