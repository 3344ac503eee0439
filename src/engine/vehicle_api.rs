use super::{helpers, Engine, VEHICLES_TABLE};

use async_trait::async_trait;
use chrono::{Datelike, Utc};
use serde_json::json;

use crate::{
    api::VehicleAPI,
    entities::{Vehicle, VehicleDraft, VehicleKind, VehicleUpdate},
    error::{not_found_error, Error},
    external::records::{Fields, Select},
};

fn kind_name(kind: VehicleKind) -> &'static str {
    match kind {
        VehicleKind::Bus => "bus",
        VehicleKind::Minibus => "minibus",
        VehicleKind::Car => "car",
    }
}

#[async_trait]
impl VehicleAPI for Engine {
    #[tracing::instrument(skip(self))]
    async fn list_vehicles(&self, driver_id: &str) -> Result<Vec<Vehicle>, Error> {
        let records = self
            .store
            .list(VEHICLES_TABLE, Select::field_eq("driverId", driver_id))
            .await?;

        let mut vehicles: Vec<Vehicle> =
            records.into_iter().map(helpers::record_to_vehicle).collect();
        vehicles.sort_by(|a, b| b.created_at.cmp(&a.created_at));

        Ok(vehicles)
    }

    #[tracing::instrument(skip(self, draft))]
    async fn add_vehicle(&self, driver_id: &str, draft: VehicleDraft) -> Result<Vehicle, Error> {
        let mut fields = Fields::new();
        fields.insert("driverId".into(), json!(driver_id));
        fields.insert("name".into(), json!(draft.name));
        fields.insert("type".into(), json!(kind_name(draft.kind)));
        fields.insert("brand".into(), json!(draft.brand));
        fields.insert("model".into(), json!(draft.model));
        fields.insert(
            "year".into(),
            json!(draft.year.unwrap_or_else(|| Utc::now().year() as u32)),
        );
        fields.insert("seats".into(), json!(draft.seats));
        fields.insert("licensePlate".into(), json!(draft.license_plate));
        fields.insert("color".into(), json!(draft.color));
        fields.insert("description".into(), json!(draft.description));
        fields.insert(
            "photos".into(),
            json!(serde_json::to_string(&draft.photos)?),
        );
        fields.insert("hasWifi".into(), json!(draft.has_wifi));
        fields.insert("hasWC".into(), json!(draft.has_wc));
        fields.insert("hasTV".into(), json!(draft.has_tv));
        fields.insert(
            "hasAirConditioning".into(),
            json!(draft.has_air_conditioning),
        );
        fields.insert("hasPowerOutlets".into(), json!(draft.has_power_outlets));
        fields.insert("hasLuggage".into(), json!(draft.has_luggage));
        fields.insert("isActive".into(), json!(true));
        fields.insert("createdAt".into(), json!(Utc::now().to_rfc3339()));

        let record = self.store.create(VEHICLES_TABLE, fields).await?;

        Ok(helpers::record_to_vehicle(record))
    }

    #[tracing::instrument(skip(self, update))]
    async fn update_vehicle(
        &self,
        driver_id: &str,
        vehicle_id: &str,
        update: VehicleUpdate,
    ) -> Result<(), Error> {
        self.owned_vehicle(driver_id, vehicle_id).await?;

        let mut fields = Fields::new();
        if let Some(name) = update.name {
            fields.insert("name".into(), json!(name));
        }
        if let Some(kind) = update.kind {
            fields.insert("type".into(), json!(kind_name(kind)));
        }
        if let Some(brand) = update.brand {
            fields.insert("brand".into(), json!(brand));
        }
        if let Some(model) = update.model {
            fields.insert("model".into(), json!(model));
        }
        if let Some(year) = update.year {
            fields.insert("year".into(), json!(year));
        }
        if let Some(seats) = update.seats {
            fields.insert("seats".into(), json!(seats));
        }
        if let Some(license_plate) = update.license_plate {
            fields.insert("licensePlate".into(), json!(license_plate));
        }
        if let Some(color) = update.color {
            fields.insert("color".into(), json!(color));
        }
        if let Some(description) = update.description {
            fields.insert("description".into(), json!(description));
        }
        if let Some(photos) = update.photos {
            fields.insert("photos".into(), json!(serde_json::to_string(&photos)?));
        }
        if let Some(has_wifi) = update.has_wifi {
            fields.insert("hasWifi".into(), json!(has_wifi));
        }
        if let Some(has_wc) = update.has_wc {
            fields.insert("hasWC".into(), json!(has_wc));
        }
        if let Some(has_tv) = update.has_tv {
            fields.insert("hasTV".into(), json!(has_tv));
        }
        if let Some(has_ac) = update.has_air_conditioning {
            fields.insert("hasAirConditioning".into(), json!(has_ac));
        }
        if let Some(has_outlets) = update.has_power_outlets {
            fields.insert("hasPowerOutlets".into(), json!(has_outlets));
        }
        if let Some(has_luggage) = update.has_luggage {
            fields.insert("hasLuggage".into(), json!(has_luggage));
        }
        if let Some(is_active) = update.is_active {
            fields.insert("isActive".into(), json!(is_active));
        }

        if fields.is_empty() {
            return Ok(());
        }

        self.store.update(VEHICLES_TABLE, vehicle_id, fields).await?;

        Ok(())
    }

    #[tracing::instrument(skip(self))]
    async fn remove_vehicle(&self, driver_id: &str, vehicle_id: &str) -> Result<(), Error> {
        self.owned_vehicle(driver_id, vehicle_id).await?;
        self.store.destroy(VEHICLES_TABLE, vehicle_id).await?;

        Ok(())
    }
}

impl Engine {
    /// A vehicle belonging to another driver is indistinguishable from a
    /// missing one.
    async fn owned_vehicle(&self, driver_id: &str, vehicle_id: &str) -> Result<Vehicle, Error> {
        let record = self.store.find(VEHICLES_TABLE, vehicle_id).await?;
        let vehicle = helpers::record_to_vehicle(record);

        if vehicle.driver_id != driver_id {
            return Err(not_found_error());
        }

        Ok(vehicle)
    }
}
