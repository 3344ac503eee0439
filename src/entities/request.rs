use serde::{Deserialize, Serialize};

use crate::entities::Route;

#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RequestStatus {
    Draft,
    Published,
    Accepted,
    Paid,
    Completed,
    Cancelled,
}

/// A passenger's ride request as materialized from the record store. The
/// `route` and `options` fields stay in their raw stored form; both are
/// parsed lazily and tolerantly.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct RideRequest {
    pub id: String,
    #[serde(rename = "userId")]
    pub user_id: String,
    #[serde(rename = "userEmail")]
    pub user_email: String,
    pub route: String,
    pub date: String,
    pub time: String,
    pub adults: u32,
    pub children: u32,
    pub options: String,
    pub status: RequestStatus,
}

impl RideRequest {
    pub fn parsed_route(&self) -> Option<Route> {
        Route::parse(&self.route)
    }

    pub fn parsed_options(&self) -> RequestOptions {
        serde_json::from_str(&self.options).unwrap_or_default()
    }
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct RequestOptions {
    pub wifi: bool,
    pub wc: bool,
    pub tv: bool,
    pub air_conditioning: bool,
    pub power_outlet: bool,
}
