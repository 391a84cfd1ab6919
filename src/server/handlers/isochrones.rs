use axum::extract::{rejection::QueryRejection, Extension, Json, Query};
use serde::{Deserialize, Serialize};

use crate::entities::IsochroneRecord;
use crate::error::Error;
use crate::isochrone::DEFAULT_WALK_TIME;
use crate::server::DynAPI;

#[derive(Serialize, Deserialize)]
pub struct IsochroneParams {
    address: String,
    #[serde(default = "default_walk_time")]
    walk_time: u32,
}

fn default_walk_time() -> u32 {
    DEFAULT_WALK_TIME
}

#[derive(Serialize, Deserialize)]
pub struct IsochroneResponse {
    isochrone: String,
}

#[derive(Serialize, Deserialize)]
pub struct SavedResponse {
    message: String,
    id: i32,
}

#[derive(Serialize, Deserialize)]
pub struct ListResponse {
    isochrones: Vec<IsochroneRecord>,
}

pub async fn compute(
    Extension(api): Extension<DynAPI>,
    params: Result<Query<IsochroneParams>, QueryRejection>,
) -> Result<Json<IsochroneResponse>, Error> {
    let Query(params) = params?;

    let isochrone = api
        .compute_isochrone(&params.address, params.walk_time)
        .await?;

    Ok(IsochroneResponse { isochrone }.into())
}

pub async fn save(
    Extension(api): Extension<DynAPI>,
    params: Result<Query<IsochroneParams>, QueryRejection>,
) -> Result<Json<SavedResponse>, Error> {
    let Query(params) = params?;

    let id = api.save_isochrone(&params.address, params.walk_time).await?;

    Ok(SavedResponse {
        message: "Isochrone saved".into(),
        id,
    }
    .into())
}

pub async fn list(Extension(api): Extension<DynAPI>) -> Result<Json<ListResponse>, Error> {
    let isochrones = api.list_isochrones().await?;

    Ok(ListResponse { isochrones }.into())
}
