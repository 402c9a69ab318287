use axum::extract::{Extension, Json};
use serde_json::{json, Value};

use crate::api::DynAPI;

pub async fn check(Extension(api): Extension<DynAPI>) -> Json<Value> {
    Json(json!({
        "status": "OK",
        "service": api.service_name(),
        "destination": api.destination(),
    }))
}
