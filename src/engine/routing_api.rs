use super::Engine;

use async_trait::async_trait;

use crate::{
    api::{PathLeg, ResolvedPath, RoutingAPI},
    entities::{GeoPoint, Route},
    error::{invalid_input_error, Error},
    external::google_maps,
    geo::Coordinates,
};

#[async_trait]
impl RoutingAPI for Engine {
    #[tracing::instrument(skip(self, route))]
    async fn resolve_route(&self, route: &Route) -> Result<ResolvedPath, Error> {
        let origin = route.origin.coordinates.ok_or_else(invalid_input_error)?;
        let destination = route
            .destination
            .coordinates
            .ok_or_else(invalid_input_error)?;

        // waypoints without a geocode are skipped, not fatal
        let waypoints: Vec<Coordinates> = route
            .waypoints
            .iter()
            .filter_map(|point| point.coordinates)
            .collect();

        let directions = google_maps::route_directions(origin, destination, waypoints).await?;

        let legs = directions
            .legs
            .into_iter()
            .map(|leg| PathLeg {
                start: leg.start_location,
                end: leg.end_location,
                distance_meters: leg.distance.value,
            })
            .collect();

        Ok(ResolvedPath { legs })
    }

    #[tracing::instrument(skip(self))]
    async fn geocode(&self, query: &str) -> Result<GeoPoint, Error> {
        let result = google_maps::geocode(query.to_string()).await?;

        Ok(GeoPoint::new(
            result.formatted_address,
            result.place_id,
            Some(result.geometry.location),
        ))
    }

    #[tracing::instrument(skip(self))]
    async fn reverse_geocode(&self, location: Coordinates) -> Result<Option<String>, Error> {
        google_maps::reverse_geocode(location).await
    }
}
