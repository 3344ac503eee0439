use crate::api::RequestAPI;
use crate::entities::{RideRequest, RouteWithId};
use crate::error::Error;
use crate::filter::{within_filter, LocationFilter, LocationFilterSelection};
use crate::map::CanvasEvent;

/// Applies the saved radius filter to a request list. A request whose route
/// blob is malformed or whose origin was never geocoded cannot be measured
/// and is kept, so a degraded record never disappears from the board.
/// Input order is preserved.
pub fn filter_requests<'a>(
    requests: &'a [RideRequest],
    selection: Option<&LocationFilterSelection>,
) -> Vec<&'a RideRequest> {
    let selection = match selection {
        Some(selection) => selection,
        None => return requests.iter().collect(),
    };

    requests
        .iter()
        .filter(|request| match request.parsed_route() {
            Some(route) => within_filter(&route.origin, selection),
            None => true,
        })
        .collect()
}

/// The driver's view of the open-request marketplace: the fetched request
/// list, the persisted radius filter, and at most one selected request.
pub struct RequestBoard {
    filter: LocationFilter,
    requests: Vec<RideRequest>,
    selected: Option<String>,
}

impl RequestBoard {
    pub fn new(filter: LocationFilter) -> Self {
        Self {
            filter,
            requests: Vec::new(),
            selected: None,
        }
    }

    /// Refetches the open requests. A selection pointing at a request that
    /// is no longer open is dropped.
    #[tracing::instrument(skip_all)]
    pub async fn refresh(&mut self, api: &(dyn RequestAPI + Send + Sync)) -> Result<(), Error> {
        self.requests = api.list_open_requests().await?;

        if let Some(id) = &self.selected {
            if !self.requests.iter().any(|request| request.id == *id) {
                self.selected = None;
            }
        }

        Ok(())
    }

    /// The requests that pass the current filter, in fetch order.
    pub fn visible(&self) -> Vec<&RideRequest> {
        filter_requests(&self.requests, self.filter.current())
    }

    /// The drawable routes of the visible requests. Requests without a
    /// parseable route are listed on the board but have nothing to draw.
    pub fn routes_for_map(&self) -> Vec<RouteWithId> {
        self.visible()
            .into_iter()
            .filter_map(|request| {
                request.parsed_route().map(|route| RouteWithId {
                    id: request.id.clone(),
                    route,
                })
            })
            .collect()
    }

    pub fn selected(&self) -> Option<&str> {
        self.selected.as_deref()
    }

    pub fn select(&mut self, id: &str) {
        self.selected = Some(id.to_string());
    }

    pub fn deselect(&mut self) {
        self.selected = None;
    }

    /// Marker clicks toggle: clicking the selected request's marker again
    /// deselects it.
    pub fn apply_event(&mut self, event: CanvasEvent) {
        match event {
            CanvasEvent::MarkerClicked { route_id } => {
                if self.selected.as_deref() == Some(route_id.as_str()) {
                    self.selected = None;
                } else {
                    self.selected = Some(route_id);
                }
            }
        }
    }

    pub fn filter_selection(&self) -> Option<&LocationFilterSelection> {
        self.filter.current()
    }

    pub fn set_filter(&mut self, selection: LocationFilterSelection) -> Result<(), Error> {
        self.filter.save(selection)
    }

    pub fn clear_filter(&mut self) -> Result<(), Error> {
        self.filter.clear()
    }
}
