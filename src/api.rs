use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use std::sync::Arc;

use crate::entities::{
    GeoPoint, Notification, Offer, OfferWithRequest, RideRequest, Route, Vehicle, VehicleDraft,
    VehicleUpdate,
};
use crate::error::Error;
use crate::geo::Coordinates;

/// One leg of a resolved navigable path.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct PathLeg {
    pub start: Coordinates,
    pub end: Coordinates,
    pub distance_meters: f64,
}

/// A turn-by-turn path as returned by the routing service, reduced to what
/// the map component needs: leg endpoints and distances.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct ResolvedPath {
    pub legs: Vec<PathLeg>,
}

impl ResolvedPath {
    pub fn distance_km(&self) -> f64 {
        self.legs.iter().map(|leg| leg.distance_meters).sum::<f64>() / 1000.0
    }
}

#[async_trait]
pub trait RequestAPI {
    async fn list_open_requests(&self) -> Result<Vec<RideRequest>, Error>;
    async fn find_request(&self, id: &str) -> Result<RideRequest, Error>;
}

#[async_trait]
pub trait OfferAPI {
    async fn submit_offer(
        &self,
        driver_id: &str,
        driver_name: &str,
        request_id: &str,
        price: f64,
        message: String,
        vehicle_id: Option<String>,
    ) -> Result<Offer, Error>;
    async fn list_driver_offers(&self, driver_id: &str) -> Result<Vec<OfferWithRequest>, Error>;
}

#[async_trait]
pub trait VehicleAPI {
    async fn list_vehicles(&self, driver_id: &str) -> Result<Vec<Vehicle>, Error>;
    async fn add_vehicle(&self, driver_id: &str, draft: VehicleDraft) -> Result<Vehicle, Error>;
    async fn update_vehicle(
        &self,
        driver_id: &str,
        vehicle_id: &str,
        update: VehicleUpdate,
    ) -> Result<(), Error>;
    async fn remove_vehicle(&self, driver_id: &str, vehicle_id: &str) -> Result<(), Error>;
}

#[async_trait]
pub trait NotificationAPI {
    async fn list_notifications(&self, user_id: &str) -> Result<Vec<Notification>, Error>;
    async fn create_notification(
        &self,
        user_id: &str,
        kind: &str,
        title: &str,
        message: &str,
        link: &str,
    ) -> Result<Notification, Error>;
    async fn mark_all_read(&self, user_id: &str) -> Result<(), Error>;
}

/// The seam between the map component and the routing service. The map
/// treats resolution as a black-box async call with a binary outcome.
#[async_trait]
pub trait RoutingAPI {
    async fn resolve_route(&self, route: &Route) -> Result<ResolvedPath, Error>;
    async fn geocode(&self, query: &str) -> Result<GeoPoint, Error>;
    async fn reverse_geocode(&self, location: Coordinates) -> Result<Option<String>, Error>;
}

pub trait API: RequestAPI + OfferAPI + VehicleAPI + NotificationAPI + RoutingAPI {}

pub type DynAPI = Arc<dyn API + Send + Sync>;
pub type DynRouting = Arc<dyn RoutingAPI + Send + Sync>;
