use serde::Deserialize;
use serde_json::Value;

use crate::entities::Coordinates;

/// Origin object as sent by the front-end. Every field is optional and the
/// coordinates may arrive as numbers or numeric strings.
#[derive(Clone, Debug, Default, Deserialize)]
pub struct RawOrigin {
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub address: Option<String>,
    #[serde(default)]
    pub lat: Option<Value>,
    #[serde(default)]
    pub lon: Option<Value>,
    #[serde(default)]
    pub info: Option<Value>,
    /// Sent by older front-ends (`"address"` / `"coordinates"`); ignored.
    #[serde(default, rename = "type")]
    pub kind: Option<String>,
}

#[derive(Clone, Debug, PartialEq)]
pub enum OriginSource {
    Coordinates(Coordinates),
    Address(String),
    Name(String),
}

/// A normalized origin, ready for resolution.
#[derive(Clone, Debug, PartialEq)]
pub struct Origin {
    pub name: Option<String>,
    pub source: OriginSource,
    /// Opaque metadata passed through to the response untouched.
    pub info: Option<Value>,
}

impl Origin {
    pub fn from_raw(raw: RawOrigin) -> Option<Self> {
        let name = non_empty(raw.name.as_deref());
        let coordinates = match (raw.lat.as_ref(), raw.lon.as_ref()) {
            (Some(lat), Some(lon)) => match (coordinate_value(lat), coordinate_value(lon)) {
                (Some(lat), Some(lon)) => Coordinates::checked(lat, lon),
                _ => None,
            },
            _ => None,
        };

        let source = if let Some(coordinates) = coordinates {
            OriginSource::Coordinates(coordinates)
        } else if let Some(address) = non_empty(raw.address.as_deref()) {
            address_source(address)
        } else if let Some(name) = name.clone() {
            OriginSource::Name(name)
        } else {
            return None;
        };

        Some(Self {
            name,
            source,
            info: raw.info.filter(|info| !info.is_null()),
        })
    }

    pub fn from_address(address: &str) -> Option<Self> {
        let address = non_empty(Some(address))?;

        Some(Self {
            name: None,
            source: address_source(address),
            info: None,
        })
    }

    /// Human readable label: the name, else the address, else the coordinates.
    pub fn label(&self) -> String {
        if let Some(name) = &self.name {
            return name.clone();
        }

        match &self.source {
            OriginSource::Address(address) | OriginSource::Name(address) => address.clone(),
            OriginSource::Coordinates(coordinates) => coordinates.to_string(),
        }
    }

    pub fn address(&self) -> Option<String> {
        match &self.source {
            OriginSource::Address(address) => Some(address.clone()),
            _ => None,
        }
    }
}

/// Normalizes the raw origin list, dropping entries that carry nothing to resolve.
pub fn normalize(raw: Vec<RawOrigin>) -> Vec<Origin> {
    raw.into_iter().filter_map(Origin::from_raw).collect()
}

pub fn normalize_addresses(addresses: &[String]) -> Vec<Origin> {
    addresses
        .iter()
        .filter_map(|address| Origin::from_address(address))
        .collect()
}

fn address_source(address: String) -> OriginSource {
    match Coordinates::parse_pair(&address) {
        Some(coordinates) => OriginSource::Coordinates(coordinates),
        None => OriginSource::Address(address),
    }
}

fn non_empty(text: Option<&str>) -> Option<String> {
    text.map(str::trim)
        .filter(|text| !text.is_empty())
        .map(String::from)
}

fn coordinate_value(value: &Value) -> Option<f64> {
    match value {
        Value::Number(number) => number.as_f64(),
        Value::String(text) => text.trim().parse().ok(),
        _ => None,
    }
}
