use serde::{Deserialize, Serialize};
use std::env;

use crate::{
    error::{invalid_input_error, upstream_error, Error},
    geo::Coordinates,
};

#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct Directions {
    pub legs: Vec<DirectionsLeg>,
}

#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct DirectionsLeg {
    pub start_location: Coordinates,
    pub end_location: Coordinates,
    pub distance: TextValue,
}

#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct TextValue {
    pub text: String,
    pub value: f64,
}

#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct GeocodeResult {
    pub formatted_address: String,
    #[serde(default)]
    pub place_id: String,
    pub geometry: Geometry,
}

#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct Geometry {
    pub location: Coordinates,
}

#[derive(Clone, Debug, Serialize, Deserialize)]
struct Response<T> {
    status: String,
    routes: Option<T>,
    results: Option<T>,
}

#[derive(Clone, Debug, Serialize, Deserialize)]
struct DirectionsRoute {
    legs: Vec<DirectionsLeg>,
}

#[tracing::instrument]
pub async fn route_directions(
    origin: Coordinates,
    destination: Coordinates,
    waypoints: Vec<Coordinates>,
) -> Result<Directions, Error> {
    let origin: String = origin.into();
    let destination: String = destination.into();
    let waypoints = waypoints
        .into_iter()
        .map(String::from)
        .collect::<Vec<_>>()
        .join("|");

    let api_base = env::var("GOOGLE_MAPS_API_BASE")?;
    let url = format!("https://{}/maps/api/directions/json", api_base);
    let key = env::var("GOOGLE_MAPS_API_KEY")?;

    let mut req = reqwest::Client::new()
        .get(url)
        .query(&[("key", key)])
        .query(&[("origin", origin)])
        .query(&[("destination", destination)])
        .query(&[("mode", "driving".to_string())])
        .query(&[("region", "pl".to_string())]);

    if !waypoints.is_empty() {
        req = req.query(&[("waypoints", waypoints)]);
    }

    let res = req.send().await?;

    let status_code = res.status().as_u16();

    if status_code >= 400 && status_code < 500 {
        return Err(invalid_input_error());
    } else if status_code != 200 {
        return Err(upstream_error());
    }

    let data: Response<Vec<DirectionsRoute>> = res.json().await?;

    if data.status != "OK" {
        return Err(upstream_error());
    }

    let route = data
        .routes
        .and_then(|mut routes| {
            if routes.is_empty() {
                None
            } else {
                Some(routes.remove(0))
            }
        })
        .ok_or_else(upstream_error)?;

    Ok(Directions { legs: route.legs })
}

/// `None` when the service finds no address for the point; only transport
/// and protocol problems are errors.
#[tracing::instrument]
pub async fn reverse_geocode(location: Coordinates) -> Result<Option<String>, Error> {
    let latlng: String = location.into();

    let api_base = env::var("GOOGLE_MAPS_API_BASE")?;
    let url = format!("https://{}/maps/api/geocode/json", api_base);
    let key = env::var("GOOGLE_MAPS_API_KEY")?;

    let res = reqwest::Client::new()
        .get(url)
        .query(&[("key", key)])
        .query(&[("latlng", latlng)])
        .send()
        .await?;

    let status_code = res.status().as_u16();

    if status_code >= 400 && status_code < 500 {
        return Err(invalid_input_error());
    } else if status_code != 200 {
        return Err(upstream_error());
    }

    let data: Response<Vec<GeocodeResult>> = res.json().await?;

    extract_address(data)
}

fn extract_address(data: Response<Vec<GeocodeResult>>) -> Result<Option<String>, Error> {
    match data.status.as_str() {
        "OK" => {
            let results = data.results.ok_or_else(upstream_error)?;
            let first = results.into_iter().next().ok_or_else(upstream_error)?;

            Ok(Some(first.formatted_address))
        }
        "ZERO_RESULTS" => Ok(None),
        _ => Err(upstream_error()),
    }
}

#[tracing::instrument]
pub async fn geocode(query: String) -> Result<GeocodeResult, Error> {
    let api_base = env::var("GOOGLE_MAPS_API_BASE")?;
    let url = format!("https://{}/maps/api/geocode/json", api_base);
    let key = env::var("GOOGLE_MAPS_API_KEY")?;

    let res = reqwest::Client::new()
        .get(url)
        .query(&[("key", key)])
        .query(&[("address", query)])
        .send()
        .await?;

    let status_code = res.status().as_u16();

    if status_code >= 400 && status_code < 500 {
        return Err(invalid_input_error());
    } else if status_code != 200 {
        return Err(upstream_error());
    }

    let data: Response<Vec<GeocodeResult>> = res.json().await?;

    if data.status != "OK" {
        return Err(upstream_error());
    }

    let results = data.results.ok_or_else(upstream_error)?;

    results.into_iter().next().ok_or_else(upstream_error)
}
