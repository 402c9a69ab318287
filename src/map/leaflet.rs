use maud::{html, PreEscaped, DOCTYPE};
use serde::Serialize;
use uuid::Uuid;

use crate::{
    error::{render_error, Error},
    map::{MapRenderer, MapView},
};

const LEAFLET_CSS: &str = "https://unpkg.com/leaflet@1.9.4/dist/leaflet.css";
const LEAFLET_JS: &str = "https://unpkg.com/leaflet@1.9.4/dist/leaflet.js";
const TILE_URL: &str = "https://{s}.tile.openstreetmap.org/{z}/{x}/{y}.png";
const ATTRIBUTION: &str =
    "&copy; <a href=\"https://www.openstreetmap.org/copyright\">OpenStreetMap</a> contributors";

const SCRIPT: &str = r#"(function () {
  var data = __DATA__;
  var map = L.map(data.id).setView(data.center, data.zoom);
  L.tileLayer(data.tiles, { maxZoom: 19, attribution: data.attribution }).addTo(map);
  data.polylines.forEach(function (line) {
    L.polyline(line.path, { color: line.color, weight: 4, opacity: 0.8 })
      .bindPopup(line.popup)
      .addTo(map);
  });
  data.markers.forEach(function (marker) {
    L.circleMarker(marker.position, {
      radius: 9, color: marker.color, fillColor: marker.color, fillOpacity: 0.9, weight: 2
    })
      .bindTooltip(marker.tooltip)
      .bindPopup(marker.popup, { maxWidth: 300 })
      .addTo(map);
  });
  map.fitBounds(data.bounds);
})();"#;

/// Renders a [`MapView`] as a standalone Leaflet page over OpenStreetMap tiles.
#[derive(Clone, Debug, Default)]
pub struct LeafletRenderer;

/// Leaflet wants `[lat, lon]` everywhere.
#[derive(Serialize)]
struct Payload<'a> {
    id: &'a str,
    tiles: &'static str,
    attribution: &'static str,
    center: [f64; 2],
    zoom: u8,
    bounds: [[f64; 2]; 2],
    markers: Vec<MarkerPayload<'a>>,
    polylines: Vec<PolylinePayload<'a>>,
}

#[derive(Serialize)]
struct MarkerPayload<'a> {
    position: [f64; 2],
    color: &'a str,
    tooltip: &'a str,
    popup: &'a str,
}

#[derive(Serialize)]
struct PolylinePayload<'a> {
    path: Vec<[f64; 2]>,
    color: &'a str,
    popup: &'a str,
}

impl MapRenderer for LeafletRenderer {
    #[tracing::instrument(skip_all, fields(markers = view.markers.len()))]
    fn render(&self, view: &MapView) -> Result<String, Error> {
        let id = format!("map_{}", Uuid::new_v4().simple());
        let (min, max) = (view.bounds.min(), view.bounds.max());

        let payload = Payload {
            id: &id,
            tiles: TILE_URL,
            attribution: ATTRIBUTION,
            center: [view.center.y(), view.center.x()],
            zoom: view.zoom,
            bounds: [[min.y, min.x], [max.y, max.x]],
            markers: view
                .markers
                .iter()
                .map(|marker| MarkerPayload {
                    position: [marker.position.y(), marker.position.x()],
                    color: marker.color,
                    tooltip: &marker.tooltip,
                    popup: &marker.popup,
                })
                .collect(),
            polylines: view
                .polylines
                .iter()
                .map(|line| PolylinePayload {
                    path: line.path.coords().map(|c| [c.y, c.x]).collect(),
                    color: line.color,
                    popup: &line.popup,
                })
                .collect(),
        };

        // "</" must not appear inside an inline script
        let data = serde_json::to_string(&payload)
            .map_err(render_error)?
            .replace("</", "<\\/");
        let script = SCRIPT.replace("__DATA__", &data);

        let document = html! {
            (DOCTYPE)
            html {
                head {
                    meta charset="utf-8";
                    meta name="viewport" content="width=device-width, initial-scale=1.0";
                    link rel="stylesheet" href=(LEAFLET_CSS);
                    script src=(LEAFLET_JS) {}
                    style {
                        "html, body { height: 100%; margin: 0; } "
                        "#" (id) " { width: 100%; height: 100%; }"
                    }
                }
                body {
                    div id=(id) {}
                    script { (PreEscaped(script)) }
                }
            }
        };

        Ok(document.into_string())
    }
}
