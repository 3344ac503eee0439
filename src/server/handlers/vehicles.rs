use axum::extract::{Extension, Json, Path};

use crate::api::DynAPI;
use crate::entities::{Driver, Vehicle, VehicleDraft, VehicleUpdate};
use crate::error::Error;

pub async fn list(
    Extension(api): Extension<DynAPI>,
    Extension(driver): Extension<Driver>,
) -> Result<Json<Vec<Vehicle>>, Error> {
    let vehicles = api.list_vehicles(&driver.id).await?;

    Ok(vehicles.into())
}

pub async fn create(
    Extension(api): Extension<DynAPI>,
    Extension(driver): Extension<Driver>,
    Json(draft): Json<VehicleDraft>,
) -> Result<Json<Vehicle>, Error> {
    let vehicle = api.add_vehicle(&driver.id, draft).await?;

    Ok(vehicle.into())
}

pub async fn update(
    Extension(api): Extension<DynAPI>,
    Extension(driver): Extension<Driver>,
    Path(id): Path<String>,
    Json(update): Json<VehicleUpdate>,
) -> Result<(), Error> {
    api.update_vehicle(&driver.id, &id, update).await
}

pub async fn remove(
    Extension(api): Extension<DynAPI>,
    Extension(driver): Extension<Driver>,
    Path(id): Path<String>,
) -> Result<(), Error> {
    api.remove_vehicle(&driver.id, &id).await
}
