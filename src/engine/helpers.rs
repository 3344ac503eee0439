use chrono::{DateTime, Utc};
use serde_json::Value;

use crate::entities::{
    Driver, Notification, Offer, OfferStatus, RequestStatus, RideRequest, Vehicle, VehicleKind,
};
use crate::external::records::{Fields, Record};

pub fn get_str(fields: &Fields, key: &str) -> String {
    fields
        .get(key)
        .and_then(Value::as_str)
        .unwrap_or_default()
        .to_string()
}

pub fn get_f64(fields: &Fields, key: &str) -> f64 {
    fields.get(key).and_then(Value::as_f64).unwrap_or_default()
}

pub fn get_u32(fields: &Fields, key: &str) -> u32 {
    fields.get(key).and_then(Value::as_u64).unwrap_or_default() as u32
}

pub fn get_bool(fields: &Fields, key: &str) -> bool {
    fields.get(key).and_then(Value::as_bool).unwrap_or_default()
}

pub fn get_time(fields: &Fields, key: &str) -> DateTime<Utc> {
    fields
        .get(key)
        .and_then(Value::as_str)
        .and_then(|raw| DateTime::parse_from_rfc3339(raw).ok())
        .map(|t| t.with_timezone(&Utc))
        .unwrap_or_default()
}

/// Resolves a reference that the store may hold either as a linked-record
/// array, a plain text column, or a bare string. Older rows predate the
/// linked-record migration.
pub fn linked_id(fields: &Fields, link_key: &str, text_key: &str) -> String {
    match fields.get(link_key) {
        Some(Value::Array(links)) => links
            .first()
            .and_then(Value::as_str)
            .unwrap_or_default()
            .to_string(),
        Some(Value::String(id)) => id.clone(),
        _ => get_str(fields, text_key),
    }
}

pub fn record_to_driver(record: Record) -> Driver {
    let fields = &record.fields;

    Driver {
        id: record.id.clone(),
        email: get_str(fields, "email"),
        name: get_str(fields, "name"),
        phone: fields
            .get("phone")
            .and_then(Value::as_str)
            .map(str::to_string),
    }
}

pub fn record_to_request(record: Record) -> RideRequest {
    let fields = &record.fields;

    let route = match fields.get("route").and_then(Value::as_str) {
        Some(raw) if !raw.is_empty() => raw.to_string(),
        _ => "{}".to_string(),
    };

    RideRequest {
        id: record.id.clone(),
        user_id: linked_id(fields, "User", "userId"),
        user_email: get_str(fields, "userEmail"),
        route,
        date: get_str(fields, "date"),
        time: get_str(fields, "time"),
        adults: get_u32(fields, "adults"),
        children: get_u32(fields, "children"),
        options: get_str(fields, "options"),
        status: parse_request_status(&get_str(fields, "status")),
    }
}

fn parse_request_status(raw: &str) -> RequestStatus {
    match raw {
        "draft" => RequestStatus::Draft,
        "accepted" => RequestStatus::Accepted,
        "paid" => RequestStatus::Paid,
        "completed" => RequestStatus::Completed,
        "cancelled" => RequestStatus::Cancelled,
        // the store predates the draft/published split; unset means published
        _ => RequestStatus::Published,
    }
}

pub fn record_to_offer(record: Record) -> Offer {
    let fields = &record.fields;

    let vehicle_id = match linked_id(fields, "Vehicle", "vehicleId") {
        id if id.is_empty() => None,
        id => Some(id),
    };

    Offer {
        id: record.id.clone(),
        request_id: linked_id(fields, "Request", "requestId"),
        driver_id: linked_id(fields, "Driver", "driverId"),
        vehicle_id,
        price: get_f64(fields, "price"),
        message: get_str(fields, "message"),
        status: parse_offer_status(&get_str(fields, "status")),
    }
}

fn parse_offer_status(raw: &str) -> OfferStatus {
    match raw {
        "accepted" => OfferStatus::Accepted,
        "rejected" => OfferStatus::Rejected,
        "paid" => OfferStatus::Paid,
        _ => OfferStatus::New,
    }
}

pub fn record_to_vehicle(record: Record) -> Vehicle {
    let fields = &record.fields;

    let photos: Vec<String> = fields
        .get("photos")
        .and_then(Value::as_str)
        .and_then(|raw| serde_json::from_str(raw).ok())
        .unwrap_or_default();

    Vehicle {
        id: record.id.clone(),
        driver_id: get_str(fields, "driverId"),
        name: get_str(fields, "name"),
        kind: parse_vehicle_kind(&get_str(fields, "type")),
        brand: get_str(fields, "brand"),
        model: get_str(fields, "model"),
        year: get_u32(fields, "year"),
        seats: get_u32(fields, "seats"),
        license_plate: get_str(fields, "licensePlate"),
        color: get_str(fields, "color"),
        description: get_str(fields, "description"),
        photos,
        has_wifi: get_bool(fields, "hasWifi"),
        has_wc: get_bool(fields, "hasWC"),
        has_tv: get_bool(fields, "hasTV"),
        has_air_conditioning: get_bool(fields, "hasAirConditioning"),
        has_power_outlets: get_bool(fields, "hasPowerOutlets"),
        has_luggage: get_bool(fields, "hasLuggage"),
        is_active: get_bool(fields, "isActive"),
        created_at: get_time(fields, "createdAt"),
    }
}

fn parse_vehicle_kind(raw: &str) -> VehicleKind {
    match raw {
        "minibus" => VehicleKind::Minibus,
        "car" => VehicleKind::Car,
        _ => VehicleKind::Bus,
    }
}

pub fn record_to_notification(record: Record) -> Notification {
    let fields = &record.fields;

    Notification {
        id: record.id.clone(),
        user_id: get_str(fields, "userId"),
        kind: get_str(fields, "type"),
        title: get_str(fields, "title"),
        message: get_str(fields, "message"),
        link: get_str(fields, "link"),
        read: get_bool(fields, "read"),
        created_at: get_time(fields, "createdAt"),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn fields(value: serde_json::Value) -> Fields {
        value.as_object().unwrap().clone()
    }

    #[test]
    fn linked_id_prefers_link_arrays() {
        let f = fields(json!({ "Driver": ["recDrv1"], "driverId": "recOld" }));
        assert_eq!(linked_id(&f, "Driver", "driverId"), "recDrv1");
    }

    #[test]
    fn linked_id_falls_back_to_text_column() {
        let f = fields(json!({ "driverId": "recDrv2" }));
        assert_eq!(linked_id(&f, "Driver", "driverId"), "recDrv2");
    }

    #[test]
    fn linked_id_accepts_bare_strings() {
        let f = fields(json!({ "Driver": "recDrv3" }));
        assert_eq!(linked_id(&f, "Driver", "driverId"), "recDrv3");
    }

    #[test]
    fn request_mapping_defaults_missing_route() {
        let record = Record {
            id: "req1".into(),
            fields: fields(json!({ "userEmail": "p@example.com", "status": "published" })),
        };

        let request = record_to_request(record);
        assert_eq!(request.route, "{}");
        assert_eq!(request.parsed_route(), None);
    }

    #[test]
    fn vehicle_mapping_parses_photo_blob() {
        let record = Record {
            id: "veh1".into(),
            fields: fields(json!({
                "driverId": "drv1",
                "type": "minibus",
                "brand": "Mercedes-Benz",
                "model": "Sprinter",
                "seats": 19,
                "photos": "[\"https://img/1.jpg\"]",
                "isActive": true,
                "createdAt": "2026-03-01T10:00:00+00:00"
            })),
        };

        let vehicle = record_to_vehicle(record);
        assert_eq!(vehicle.kind, VehicleKind::Minibus);
        assert_eq!(vehicle.photos, vec!["https://img/1.jpg"]);
        assert_eq!(vehicle.seats, 19);
        assert!(vehicle.is_active);
    }
}
