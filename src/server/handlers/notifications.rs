use axum::extract::{Extension, Json};
use serde::{Deserialize, Serialize};

use crate::api::DynAPI;
use crate::entities::{Driver, Notification};
use crate::error::Error;

#[derive(Serialize, Deserialize)]
pub struct CreateParams {
    user_id: String,
    kind: String,
    title: String,
    message: String,
    #[serde(default)]
    link: String,
}

pub async fn list(
    Extension(api): Extension<DynAPI>,
    Extension(driver): Extension<Driver>,
) -> Result<Json<Vec<Notification>>, Error> {
    let notifications = api.list_notifications(&driver.id).await?;

    Ok(notifications.into())
}

pub async fn create(
    Extension(api): Extension<DynAPI>,
    Json(params): Json<CreateParams>,
) -> Result<Json<Notification>, Error> {
    let notification = api
        .create_notification(
            &params.user_id,
            &params.kind,
            &params.title,
            &params.message,
            &params.link,
        )
        .await?;

    Ok(notification.into())
}

pub async fn read_all(
    Extension(api): Extension<DynAPI>,
    Extension(driver): Extension<Driver>,
) -> Result<(), Error> {
    api.mark_all_read(&driver.id).await
}
