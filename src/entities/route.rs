use serde::{Deserialize, Serialize};

use crate::entities::GeoPoint;

/// Full trip geometry as entered by the passenger. Stored on the ride-request
/// record as an opaque JSON string and immutable once parsed.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Route {
    pub origin: GeoPoint,
    pub destination: GeoPoint,
    #[serde(default)]
    pub waypoints: Vec<GeoPoint>,
}

impl Route {
    /// Parses the raw `route` field of a request record. Tolerant: any
    /// malformed blob yields `None` rather than an error, since a request
    /// with broken geometry is still a valid request.
    pub fn parse(raw: &str) -> Option<Route> {
        serde_json::from_str(raw).ok()
    }

    pub fn display(&self) -> String {
        format!("{} → {}", self.origin.address, self.destination.address)
    }
}

#[derive(Clone, Debug, PartialEq)]
pub struct RouteWithId {
    pub id: String,
    pub route: Route,
}
