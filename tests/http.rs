use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use axum::body::Body;
use axum::http::{header, Method, Request, StatusCode};
use axum::Router;
use routemap::api::DynAPI;
use routemap::config::Config;
use routemap::engine::Engine;
use routemap::entities::{Coordinates, RouteInfo};
use routemap::error::{render_error, Error, LookupError};
use routemap::external::{GeocodeProvider, RouteProvider};
use routemap::map::{LeafletRenderer, MapRenderer, MapView};
use routemap::server::build_app;
use serde_json::{json, Value};
use tower::ServiceExt as _;

struct Geocoder {
    result: Result<Coordinates, LookupError>,
    calls: AtomicUsize,
}

impl Geocoder {
    fn found(lat: f64, lon: f64) -> Arc<Self> {
        Arc::new(Self {
            result: Ok(Coordinates::new(lat, lon)),
            calls: AtomicUsize::new(0),
        })
    }

    fn down() -> Arc<Self> {
        Arc::new(Self {
            result: Err(LookupError::Upstream("HTTP 503".into())),
            calls: AtomicUsize::new(0),
        })
    }
}

#[async_trait]
impl GeocodeProvider for Geocoder {
    async fn search(&self, _query: &str) -> Result<Coordinates, LookupError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        self.result.clone()
    }
}

struct Directions {
    reachable: bool,
}

#[async_trait]
impl RouteProvider for Directions {
    async fn route(&self, start: Coordinates, end: Coordinates) -> Result<RouteInfo, LookupError> {
        if !self.reachable {
            return Err(LookupError::Upstream("connection refused".into()));
        }

        Ok(RouteInfo {
            geometry: vec![
                [start.lon, start.lat],
                [(start.lon + end.lon) / 2.0, (start.lat + end.lat) / 2.0],
                [end.lon, end.lat],
            ],
            distance_km: 8.3,
            duration_min: 11.0,
        })
    }
}

struct BrokenRenderer;

impl MapRenderer for BrokenRenderer {
    fn render(&self, _view: &MapView) -> Result<String, Error> {
        Err(render_error("no template"))
    }
}

fn config() -> Config {
    let mut config = Config::default();
    config.batch.pause = Duration::ZERO;
    config
}

fn app_with(
    geocode: Arc<dyn GeocodeProvider>,
    reachable: bool,
    renderer: Arc<dyn MapRenderer>,
) -> Router {
    let engine = Engine::with_providers(
        &config(),
        geocode,
        Arc::new(Directions { reachable }),
        renderer,
    );

    build_app(Arc::new(engine) as DynAPI)
}

fn app(reachable: bool) -> Router {
    app_with(
        Geocoder::found(-24.7253, -53.7433),
        reachable,
        Arc::new(LeafletRenderer),
    )
}

fn post(uri: &str, body: impl Into<Body>) -> Request<Body> {
    Request::builder()
        .method(Method::POST)
        .uri(uri)
        .header(header::CONTENT_TYPE, "application/json")
        .header(header::ORIGIN, "http://localhost:3000")
        .body(body.into())
        .unwrap()
}

async fn send(app: Router, req: Request<Body>) -> (StatusCode, Value) {
    let res = app.oneshot(req).await.unwrap();
    let status = res.status();
    let bytes = hyper::body::to_bytes(res.into_body()).await.unwrap();

    (status, serde_json::from_slice(&bytes).unwrap())
}

#[tokio::test]
async fn health_reports_service_and_destination() {
    let req = Request::builder()
        .uri("/health")
        .body(Body::empty())
        .unwrap();

    let (status, body) = send(app(true), req).await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["status"], "OK");
    assert_eq!(body["service"], "Route Visualizer API");
    assert_eq!(body["destination"]["lat"], json!(-24.7136));
    assert_eq!(body["destination"]["lon"], json!(-53.7405));
}

#[tokio::test]
async fn address_origin_gets_a_routed_map() {
    let req = post(
        "/generate-map",
        json!({ "origins": [{ "address": "Rua X, Toledo, PR" }] }).to_string(),
    );

    let (status, body) = send(app(true), req).await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["success"], true);
    assert!(body["mapHtml"].as_str().unwrap().contains("<!DOCTYPE html>"));
    assert_eq!(body["destination"]["name"], config().destination.name);

    let origins = body["origins"].as_array().unwrap();
    assert_eq!(origins.len(), 1);
    assert!(origins[0]["distance"].as_f64().unwrap() > 0.0);
    assert_eq!(origins[0]["address"], "Rua X, Toledo, PR");
    assert_eq!(origins[0]["routeGeometry"].as_array().unwrap().len(), 3);
    assert!(origins[0].get("error").is_none());
}

#[tokio::test]
async fn explicit_coordinates_without_router_fall_back_to_estimate() {
    let geocoder = Geocoder::down();
    let app = app_with(geocoder.clone(), false, Arc::new(LeafletRenderer));
    let req = post(
        "/generate-map",
        json!({ "origins": [{ "lat": -24.7, "lon": -53.7, "info": { "passageiros": 2 } }] })
            .to_string(),
    );

    let (status, body) = send(app, req).await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["success"], true);
    assert_eq!(geocoder.calls.load(Ordering::SeqCst), 0);

    let origin = &body["origins"][0];
    let distance = origin["distance"].as_f64().unwrap();
    assert!(distance > 0.0);
    assert!(origin["routeGeometry"].is_null());
    assert!(origin["error"].as_str().unwrap().contains("route unavailable"));
    assert_eq!(origin["duration"].as_f64().unwrap(), distance * 1.5);
    assert_eq!(origin["info"]["passageiros"], 2);
}

#[tokio::test]
async fn selected_origins_are_used_when_origins_is_absent() {
    let req = post(
        "/api/generate-map",
        json!({ "selectedOrigins": ["Rua X, Toledo, PR", "  ", "Rua Y, Toledo, PR"] }).to_string(),
    );

    let (status, body) = send(app(true), req).await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["origins"].as_array().unwrap().len(), 2);
}

#[tokio::test]
async fn missing_origins_is_a_bad_request() {
    let (status, body) = send(app(true), post("/generate-map", "{}")).await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["success"], false);
    assert_eq!(body["error"], "origins list is required");
}

#[tokio::test]
async fn blank_origins_are_a_bad_request() {
    let req = post(
        "/generate-map",
        json!({ "origins": [{ "address": "  " }, {}] }).to_string(),
    );

    let (status, body) = send(app(true), req).await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["success"], false);
}

#[tokio::test]
async fn malformed_json_is_a_bad_request() {
    let (status, body) = send(app(true), post("/generate-map", "{\"origins\": [")).await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["success"], false);
    assert!(body["error"].as_str().unwrap().starts_with("invalid request body"));
}

#[tokio::test]
async fn all_failed_origins_are_a_bad_request() {
    let app = app_with(Geocoder::down(), true, Arc::new(LeafletRenderer));
    let req = post(
        "/generate-map",
        json!({ "origins": [
            { "address": "A" }, { "address": "B" }, { "address": "C" }, { "address": "D" }
        ] })
        .to_string(),
    );

    let (status, body) = send(app, req).await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["success"], false);
    assert_eq!(body["error"].as_str().unwrap().split("; ").count(), 3);
}

#[tokio::test]
async fn renderer_failure_is_an_internal_error() {
    let app = app_with(
        Geocoder::found(-24.7253, -53.7433),
        true,
        Arc::new(BrokenRenderer),
    );
    let req = post(
        "/generate-map",
        json!({ "origins": [{ "address": "Rua X, Toledo, PR" }] }).to_string(),
    );

    let (status, body) = send(app, req).await;

    assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
    assert_eq!(body["success"], false);
    assert!(body["error"].as_str().unwrap().starts_with("internal error"));
}

#[tokio::test]
async fn preflight_is_answered_with_cors_headers() {
    let req = Request::builder()
        .method(Method::OPTIONS)
        .uri("/generate-map")
        .header(header::ORIGIN, "http://localhost:3000")
        .header(header::ACCESS_CONTROL_REQUEST_METHOD, "POST")
        .header(header::ACCESS_CONTROL_REQUEST_HEADERS, "content-type")
        .body(Body::empty())
        .unwrap();

    let res = app(true).oneshot(req).await.unwrap();

    assert_eq!(res.status(), StatusCode::OK);
    assert_eq!(res.headers()[header::ACCESS_CONTROL_ALLOW_ORIGIN], "*");

    let methods = res.headers()[header::ACCESS_CONTROL_ALLOW_METHODS]
        .to_str()
        .unwrap()
        .to_string();
    assert!(methods.contains("POST"));
    assert!(methods.contains("OPTIONS"));
}

#[tokio::test]
async fn responses_allow_any_origin() {
    let res = app(true).oneshot(post("/generate-map", "{}")).await.unwrap();

    assert_eq!(res.headers()[header::ACCESS_CONTROL_ALLOW_ORIGIN], "*");
}
