use serde::{Deserialize, Serialize};

const EARTH_RADIUS_KM: f64 = 6371.0;

#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct Coordinates {
    pub lat: f64,
    pub lng: f64,
}

impl Coordinates {
    pub fn new(lat: f64, lng: f64) -> Self {
        Self { lat, lng }
    }
}

// "lat,lng" form expected by the mapping service's query params
impl From<Coordinates> for String {
    fn from(c: Coordinates) -> Self {
        format!("{},{}", c.lat, c.lng)
    }
}

impl From<Coordinates> for geo_types::Coord<f64> {
    fn from(c: Coordinates) -> Self {
        geo_types::Coord { x: c.lng, y: c.lat }
    }
}

/// Great-circle distance between two points in kilometers (haversine).
pub fn distance_km(a: Coordinates, b: Coordinates) -> f64 {
    let d_lat = (b.lat - a.lat).to_radians();
    let d_lng = (b.lng - a.lng).to_radians();

    let h = (d_lat / 2.0).sin().powi(2)
        + a.lat.to_radians().cos() * b.lat.to_radians().cos() * (d_lng / 2.0).sin().powi(2);
    let c = 2.0 * h.sqrt().atan2((1.0 - h).sqrt());

    EARTH_RADIUS_KM * c
}
