mod helpers;
mod notification_api;
mod offer_api;
mod request_api;
mod routing_api;
mod vehicle_api;

use crate::{
    api::API,
    entities::Driver,
    error::{not_found_error, Error},
    external::records::{RecordStore, Select},
};

pub(crate) const DRIVERS_TABLE: &str = "Drivers";
pub(crate) const REQUESTS_TABLE: &str = "Requests";
pub(crate) const OFFERS_TABLE: &str = "Offers";
pub(crate) const VEHICLES_TABLE: &str = "Vehicles";
pub(crate) const NOTIFICATIONS_TABLE: &str = "Notifications";

/// CRUD facade over the external record store plus the routing service.
/// All dashboard operations go through here; the store itself stays an
/// opaque table service.
#[derive(Debug, Clone)]
pub struct Engine {
    store: RecordStore,
}

impl Engine {
    pub fn new(store: RecordStore) -> Self {
        Self { store }
    }

    #[tracing::instrument(skip(self))]
    pub async fn find_driver_by_email(&self, email: &str) -> Result<Driver, Error> {
        let records = self
            .store
            .list(DRIVERS_TABLE, Select::field_eq("email", email).limit(1))
            .await?;

        let record = records.into_iter().next().ok_or_else(not_found_error)?;

        Ok(helpers::record_to_driver(record))
    }
}

impl API for Engine {}
