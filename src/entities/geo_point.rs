use serde::{Deserialize, Serialize};

use crate::geo::Coordinates;

/// A named location with optional coordinates. Points arrive from the record
/// store with `lat`/`lng` as plain numbers where a missing geocode is stored
/// as `0`; that sentinel is normalized to `None` here, at the decode
/// boundary, and never leaks past this type.
#[derive(Clone, Debug, PartialEq)]
pub struct GeoPoint {
    pub address: String,
    pub place_id: String,
    pub coordinates: Option<Coordinates>,
}

impl GeoPoint {
    pub fn new(address: String, place_id: String, coordinates: Option<Coordinates>) -> Self {
        Self {
            address,
            place_id,
            coordinates,
        }
    }
}

#[derive(Default, Serialize, Deserialize)]
struct RawGeoPoint {
    #[serde(default)]
    address: String,
    #[serde(default, rename = "placeId")]
    place_id: String,
    #[serde(default)]
    lat: f64,
    #[serde(default)]
    lng: f64,
}

impl From<RawGeoPoint> for GeoPoint {
    fn from(raw: RawGeoPoint) -> Self {
        // exactly (0, 0) is the legacy "not geocoded" marker
        let coordinates = if raw.lat == 0.0 && raw.lng == 0.0 {
            None
        } else {
            Some(Coordinates::new(raw.lat, raw.lng))
        };

        GeoPoint {
            address: raw.address,
            place_id: raw.place_id,
            coordinates,
        }
    }
}

impl From<&GeoPoint> for RawGeoPoint {
    fn from(point: &GeoPoint) -> Self {
        let (lat, lng) = match point.coordinates {
            Some(c) => (c.lat, c.lng),
            None => (0.0, 0.0),
        };

        RawGeoPoint {
            address: point.address.clone(),
            place_id: point.place_id.clone(),
            lat,
            lng,
        }
    }
}

impl Serialize for GeoPoint {
    fn serialize<S: serde::Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        RawGeoPoint::from(self).serialize(serializer)
    }
}

impl<'de> Deserialize<'de> for GeoPoint {
    fn deserialize<D: serde::Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        Ok(RawGeoPoint::deserialize(deserializer)?.into())
    }
}
