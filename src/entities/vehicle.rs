use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum VehicleKind {
    Bus,
    Minibus,
    Car,
}

#[derive(Clone, Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Vehicle {
    pub id: String,
    pub driver_id: String,
    pub name: String,
    #[serde(rename = "type")]
    pub kind: VehicleKind,
    pub brand: String,
    pub model: String,
    pub year: u32,
    pub seats: u32,
    pub license_plate: String,
    pub color: String,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub photos: Vec<String>,
    #[serde(default)]
    pub has_wifi: bool,
    #[serde(default)]
    pub has_wc: bool,
    #[serde(default)]
    pub has_tv: bool,
    #[serde(default)]
    pub has_air_conditioning: bool,
    #[serde(default)]
    pub has_power_outlets: bool,
    #[serde(default)]
    pub has_luggage: bool,
    pub is_active: bool,
    pub created_at: DateTime<Utc>,
}

/// Payload for registering a new vehicle. Brand, model, seats and plate are
/// required; everything else has a sensible default.
#[derive(Clone, Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct VehicleDraft {
    #[serde(default)]
    pub name: String,
    #[serde(rename = "type")]
    pub kind: VehicleKind,
    pub brand: String,
    pub model: String,
    pub year: Option<u32>,
    pub seats: u32,
    pub license_plate: String,
    #[serde(default)]
    pub color: String,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub photos: Vec<String>,
    #[serde(default)]
    pub has_wifi: bool,
    #[serde(default)]
    pub has_wc: bool,
    #[serde(default)]
    pub has_tv: bool,
    #[serde(default)]
    pub has_air_conditioning: bool,
    #[serde(default)]
    pub has_power_outlets: bool,
    #[serde(default)]
    pub has_luggage: bool,
}

/// Partial update; only populated fields are written back to the store.
#[derive(Clone, Debug, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct VehicleUpdate {
    pub name: Option<String>,
    #[serde(rename = "type")]
    pub kind: Option<VehicleKind>,
    pub brand: Option<String>,
    pub model: Option<String>,
    pub year: Option<u32>,
    pub seats: Option<u32>,
    pub license_plate: Option<String>,
    pub color: Option<String>,
    pub description: Option<String>,
    pub photos: Option<Vec<String>>,
    pub has_wifi: Option<bool>,
    pub has_wc: Option<bool>,
    pub has_tv: Option<bool>,
    pub has_air_conditioning: Option<bool>,
    pub has_power_outlets: Option<bool>,
    pub has_luggage: Option<bool>,
    pub is_active: Option<bool>,
}
