use axum::extract::{Extension, Json};
use serde::{Deserialize, Serialize};

use crate::api::DynAPI;
use crate::entities::{Driver, Offer, OfferWithRequest};
use crate::error::Error;

#[derive(Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateParams {
    request_id: String,
    price: f64,
    #[serde(default)]
    message: String,
    vehicle_id: Option<String>,
}

pub async fn create(
    Extension(api): Extension<DynAPI>,
    Extension(driver): Extension<Driver>,
    Json(params): Json<CreateParams>,
) -> Result<Json<Offer>, Error> {
    let offer = api
        .submit_offer(
            &driver.id,
            &driver.name,
            &params.request_id,
            params.price,
            params.message,
            params.vehicle_id,
        )
        .await?;

    Ok(offer.into())
}

pub async fn list(
    Extension(api): Extension<DynAPI>,
    Extension(driver): Extension<Driver>,
) -> Result<Json<Vec<OfferWithRequest>>, Error> {
    let offers = api.list_driver_offers(&driver.id).await?;

    Ok(offers.into())
}
