use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::entities::{Coordinates, Origin, RouteInfo};

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ResolvedOrigin {
    pub name: String,
    pub address: Option<String>,
    pub lat: f64,
    pub lon: f64,
    /// Kilometres.
    pub distance: f64,
    /// Minutes.
    pub duration: f64,
    pub route_geometry: Option<Vec<[f64; 2]>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub info: Option<Value>,
}

impl ResolvedOrigin {
    pub fn routed(origin: &Origin, coordinates: Coordinates, route: RouteInfo) -> Self {
        Self {
            name: origin.label(),
            address: origin.address(),
            lat: coordinates.lat,
            lon: coordinates.lon,
            distance: route.distance_km,
            duration: route.duration_min,
            route_geometry: Some(route.geometry),
            error: None,
            info: origin.info.clone(),
        }
    }

    /// Straight-line entry used when no route could be obtained.
    pub fn estimated(
        origin: &Origin,
        coordinates: Coordinates,
        distance_km: f64,
        duration_min: f64,
        note: String,
    ) -> Self {
        Self {
            name: origin.label(),
            address: origin.address(),
            lat: coordinates.lat,
            lon: coordinates.lon,
            distance: distance_km,
            duration: duration_min,
            route_geometry: None,
            error: Some(note),
            info: origin.info.clone(),
        }
    }

    pub fn coordinates(&self) -> Coordinates {
        Coordinates::new(self.lat, self.lon)
    }
}

/// An origin whose coordinates could not be obtained at all.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BatchError {
    pub display_name: String,
    pub message: String,
}
