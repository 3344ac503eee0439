use serde::{Deserialize, Serialize};

use crate::entities::RideRequest;

#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum OfferStatus {
    New,
    Accepted,
    Rejected,
    Paid,
}

#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct Offer {
    pub id: String,
    #[serde(rename = "requestId")]
    pub request_id: String,
    #[serde(rename = "driverId")]
    pub driver_id: String,
    #[serde(rename = "vehicleId", skip_serializing_if = "Option::is_none")]
    pub vehicle_id: Option<String>,
    pub price: f64,
    pub message: String,
    pub status: OfferStatus,
}

#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct OfferWithRequest {
    #[serde(flatten)]
    pub offer: Offer,
    pub request: Option<RideRequest>,
}
