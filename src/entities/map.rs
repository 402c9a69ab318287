use serde::{Deserialize, Serialize};

use crate::entities::{Destination, ResolvedOrigin};

#[derive(Clone, Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GeneratedMap {
    pub map_html: String,
    pub origins: Vec<ResolvedOrigin>,
    pub destination: Destination,
}
