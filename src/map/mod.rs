//! Map description handed to a renderer: markers, polylines, center and bounds.

mod leaflet;

pub use leaflet::LeafletRenderer;

use geo_types::{Coord, LineString, Point, Rect};
use maud::{html, Markup};
use serde_json::Value;

use crate::{
    entities::{Destination, ResolvedOrigin},
    error::Error,
};

/// Colours cycled over origins; the destination is always red.
pub const PALETTE: [&str; 18] = [
    "blue",
    "green",
    "purple",
    "orange",
    "darkred",
    "lightcoral",
    "beige",
    "darkblue",
    "darkgreen",
    "cadetblue",
    "indigo",
    "white",
    "pink",
    "lightblue",
    "lightgreen",
    "gray",
    "black",
    "lightgray",
];

pub const DESTINATION_COLOR: &str = "red";

pub const DEFAULT_ZOOM: u8 = 10;

pub trait MapRenderer: Send + Sync {
    /// Produces a self-contained HTML document.
    fn render(&self, view: &MapView) -> Result<String, Error>;
}

#[derive(Clone, Debug)]
pub struct Marker {
    pub position: Point<f64>,
    pub color: &'static str,
    /// Pre-escaped HTML, as is `popup`.
    pub tooltip: String,
    pub popup: String,
}

#[derive(Clone, Debug)]
pub struct Polyline {
    /// `x` is longitude, `y` latitude.
    pub path: LineString<f64>,
    pub color: &'static str,
    pub popup: String,
}

#[derive(Clone, Debug)]
pub struct MapView {
    pub center: Point<f64>,
    pub zoom: u8,
    pub bounds: Rect<f64>,
    pub markers: Vec<Marker>,
    pub polylines: Vec<Polyline>,
}

impl MapView {
    pub fn build(origins: &[ResolvedOrigin], destination: &Destination) -> Self {
        let points: Vec<Point<f64>> = origins
            .iter()
            .map(|origin| origin.coordinates().into())
            .chain(std::iter::once(destination.coordinates().into()))
            .collect();

        let count = points.len() as f64;
        let center = Point::new(
            points.iter().map(|p| p.x()).sum::<f64>() / count,
            points.iter().map(|p| p.y()).sum::<f64>() / count,
        );

        let min_x = points.iter().map(|p| p.x()).fold(f64::INFINITY, f64::min);
        let min_y = points.iter().map(|p| p.y()).fold(f64::INFINITY, f64::min);
        let max_x = points.iter().map(|p| p.x()).fold(f64::NEG_INFINITY, f64::max);
        let max_y = points.iter().map(|p| p.y()).fold(f64::NEG_INFINITY, f64::max);
        let bounds = Rect::new(Coord { x: min_x, y: min_y }, Coord { x: max_x, y: max_y });

        let mut markers = vec![Marker {
            position: destination.coordinates().into(),
            color: DESTINATION_COLOR,
            tooltip: html! { "Destination: " (destination.name) }.into_string(),
            popup: destination_popup(destination).into_string(),
        }];
        let mut polylines = Vec::new();

        for (i, origin) in origins.iter().enumerate() {
            let number = i + 1;
            let color = PALETTE[i % PALETTE.len()];

            markers.push(Marker {
                position: origin.coordinates().into(),
                color,
                tooltip: html! { "Origin " (number) ": " (origin.name) }.into_string(),
                popup: origin_popup(number, origin).into_string(),
            });

            if let Some(geometry) = origin.route_geometry.as_ref().filter(|g| !g.is_empty()) {
                polylines.push(Polyline {
                    path: LineString::from(geometry.clone()),
                    color,
                    popup: format!(
                        "Route {}: {:.1} km, {:.0} min",
                        number, origin.distance, origin.duration
                    ),
                });
            }
        }

        Self {
            center,
            zoom: DEFAULT_ZOOM,
            bounds,
            markers,
            polylines,
        }
    }
}

fn destination_popup(destination: &Destination) -> Markup {
    html! {
        b { (destination.name) }
        br;
        (destination.address)
    }
}

fn origin_popup(number: usize, origin: &ResolvedOrigin) -> Markup {
    html! {
        b { "Origin " (number) ": " (origin.name) }
        @if let Some(address) = &origin.address {
            br;
            b { "Address:" } " " (address)
        }
        br;
        b { "Distance:" } " " (format!("{:.1}", origin.distance)) " km"
        br;
        b { "Time:" } " " (format!("{:.0}", origin.duration)) " min"
        @if let Some(error) = &origin.error {
            br;
            i { (error) }
        }
        @if let Some(info) = &origin.info {
            @for (key, value) in info_entries(info) {
                br;
                b { (key) ":" } " " (value)
            }
        }
    }
}

fn info_entries(info: &Value) -> Vec<(String, String)> {
    let text = |value: &Value| match value {
        Value::String(text) => text.clone(),
        Value::Null => "N/A".to_string(),
        other => other.to_string(),
    };

    match info {
        Value::Object(entries) => entries
            .iter()
            .map(|(key, value)| (key.clone(), text(value)))
            .collect(),
        Value::Null => Vec::new(),
        other => vec![("Info".to_string(), text(other))],
    }
}
