use serde::{Deserialize, Serialize};

use crate::entities::Coordinates;

/// The fixed target every route leads to.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Destination {
    pub name: String,
    pub lat: f64,
    pub lon: f64,
    pub address: String,
}

impl Destination {
    pub fn new(name: String, coordinates: Coordinates, address: String) -> Self {
        Self {
            name,
            lat: coordinates.lat,
            lon: coordinates.lon,
            address,
        }
    }

    pub fn coordinates(&self) -> Coordinates {
        Coordinates::new(self.lat, self.lon)
    }
}
