use axum::extract::{rejection::JsonRejection, Extension, Json};
use axum_macros::debug_handler;
use serde::{Deserialize, Serialize};

use crate::{
    api::DynAPI,
    entities::{normalize, normalize_addresses, GeneratedMap, RawOrigin},
    error::{validation_error, Error},
};

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GenerateParams {
    #[serde(default)]
    origins: Option<Vec<RawOrigin>>,
    #[serde(default)]
    selected_origins: Option<Vec<String>>,
}

#[derive(Serialize)]
pub struct GenerateResponse {
    success: bool,
    #[serde(flatten)]
    map: GeneratedMap,
}

#[debug_handler]
pub async fn generate(
    Extension(api): Extension<DynAPI>,
    params: Result<Json<GenerateParams>, JsonRejection>,
) -> Result<Json<GenerateResponse>, Error> {
    let Json(params) = params.map_err(|rejection| {
        validation_error(format!("invalid request body: {}", rejection))
    })?;

    let origins = match (params.origins, params.selected_origins) {
        (Some(origins), _) => normalize(origins),
        (None, Some(addresses)) => normalize_addresses(&addresses),
        (None, None) => return Err(validation_error("origins list is required")),
    };

    let map = api.generate_map(origins).await?;

    Ok(GenerateResponse { success: true, map }.into())
}
