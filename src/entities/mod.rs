mod driver;
mod geo_point;
mod notification;
mod offer;
mod request;
mod route;
mod vehicle;

pub use driver::Driver;
pub use geo_point::GeoPoint;
pub use notification::Notification;
pub use offer::{Offer, OfferStatus, OfferWithRequest};
pub use request::{RequestOptions, RequestStatus, RideRequest};
pub use route::{Route, RouteWithId};
pub use vehicle::{Vehicle, VehicleDraft, VehicleKind, VehicleUpdate};
