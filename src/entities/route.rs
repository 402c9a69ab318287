use serde::{Deserialize, Serialize};

/// A driving route as returned by the directions service.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct RouteInfo {
    /// Ordered `[lon, lat]` points.
    pub geometry: Vec<[f64; 2]>,
    pub distance_km: f64,
    pub duration_min: f64,
}
