use axum::extract::{Extension, Json, Query};
use serde::{Deserialize, Serialize};

use crate::api::DynAPI;
use crate::entities::GeoPoint;
use crate::error::{invalid_input_error, Error};
use crate::filter::{LocationFilterSelection, RADIUS_OPTIONS_KM};
use crate::geo::Coordinates;
use crate::server::SharedFilter;

#[derive(Serialize, Deserialize)]
pub struct GeocodeParams {
    query: String,
}

#[derive(Serialize, Deserialize)]
pub struct ReverseGeocodeParams {
    lat: f64,
    lng: f64,
}

/// Turns a typed address into a selectable filter center.
pub async fn geocode(
    Extension(api): Extension<DynAPI>,
    Query(params): Query<GeocodeParams>,
) -> Result<Json<GeoPoint>, Error> {
    let point = api.geocode(&params.query).await?;

    Ok(point.into())
}

/// Names the driver's current position for the "use my location" shortcut.
/// `null` when the point has no address.
pub async fn reverse_geocode(
    Extension(api): Extension<DynAPI>,
    Query(params): Query<ReverseGeocodeParams>,
) -> Result<Json<Option<String>>, Error> {
    let address = api
        .reverse_geocode(Coordinates::new(params.lat, params.lng))
        .await?;

    Ok(address.into())
}

pub async fn find(
    Extension(filter): Extension<SharedFilter>,
) -> Result<Json<Option<LocationFilterSelection>>, Error> {
    let selection = filter
        .lock()
        .unwrap_or_else(|p| p.into_inner())
        .current()
        .cloned();

    Ok(selection.into())
}

pub async fn save(
    Extension(filter): Extension<SharedFilter>,
    Json(selection): Json<LocationFilterSelection>,
) -> Result<Json<LocationFilterSelection>, Error> {
    if !RADIUS_OPTIONS_KM.contains(&selection.radius) {
        return Err(invalid_input_error());
    }

    filter
        .lock()
        .unwrap_or_else(|p| p.into_inner())
        .save(selection.clone())?;

    Ok(selection.into())
}

pub async fn clear(Extension(filter): Extension<SharedFilter>) -> Result<(), Error> {
    filter.lock().unwrap_or_else(|p| p.into_inner()).clear()
}
