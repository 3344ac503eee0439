use geo_types::{Coord, Rect};
use std::collections::HashMap;

use super::canvas::{DynCanvas, Handle, MarkerSpec, MarkerStyle, PathSpec};
use super::diff::diff_overlays;
use super::readiness::WidgetGate;
use crate::api::{DynRouting, ResolvedPath};
use crate::entities::RouteWithId;
use crate::geo::Coordinates;

pub const ROUTE_COLORS: [&str; 8] = [
    "#16a34a", // green
    "#2563eb", // blue
    "#dc2626", // red
    "#ca8a04", // yellow
    "#9333ea", // purple
    "#0891b2", // cyan
    "#ea580c", // orange
    "#db2777", // pink
];

const SELECTED_COLOR: &str = "#16a34a";
const SELECTED_DOT_SCALE: f64 = 10.0;
const IDLE_DOT_COLOR: &str = "#6b7280";
const IDLE_DOT_SCALE: f64 = 6.0;

/// Per-route lifecycle. `Pending` exists only while a resolution call is in
/// flight; `Failed` entries hold no handles but stay registered so the route
/// is not retried.
enum OverlayState {
    Pending,
    Resolved(OverlayEntry),
    Failed,
}

/// Handles for the live map objects of one route, plus the endpoints used
/// when the viewport is refit without re-resolving.
#[derive(Default)]
struct OverlayEntry {
    path: Option<Handle>,
    markers: Vec<Handle>,
    endpoints: Vec<Coordinates>,
}

#[derive(Clone, Debug, PartialEq)]
enum Mode {
    Idle,
    AllRoutes,
    Selection,
}

/// Keeps the canvas's drawn overlays in step with the input route list and
/// selection. The registry maps route id to overlay state; every update
/// tears stale entries down before anything new is drawn for a reused id.
pub struct RouteMapRenderer {
    canvas: DynCanvas,
    routing: DynRouting,
    gate: WidgetGate,
    overlays: HashMap<String, OverlayState>,
    mode: Mode,
    epoch: u64,
}

impl RouteMapRenderer {
    pub fn new(canvas: DynCanvas, routing: DynRouting, gate: WidgetGate) -> Self {
        Self {
            canvas,
            routing,
            gate,
            overlays: HashMap::new(),
            mode: Mode::Idle,
            epoch: 0,
        }
    }

    /// Ids currently holding a drawn overlay, sorted.
    pub fn overlay_ids(&self) -> Vec<String> {
        let mut ids: Vec<String> = self
            .overlays
            .iter()
            .filter(|(_, state)| matches!(state, OverlayState::Resolved(_)))
            .map(|(id, _)| id.clone())
            .collect();
        ids.sort();
        ids
    }

    /// All-routes mode: resolve and draw every route in the list, one
    /// awaited call at a time in input order, then fit the viewport to the
    /// bounding box of everything that resolved. The fit happens exactly
    /// once per pass, after every route reached Resolved or Failed.
    #[tracing::instrument(skip_all, fields(routes = routes.len()))]
    pub async fn render_all(&mut self, routes: &[RouteWithId]) {
        self.gate.ready().await;

        self.epoch += 1;
        let epoch = self.epoch;

        // overlays drawn by the selection view use different decoration and
        // cannot be kept across a mode switch
        if self.mode != Mode::AllRoutes {
            self.teardown_all();
        }
        self.mode = Mode::AllRoutes;

        let diff = diff_overlays(self.overlays.keys(), routes);
        for id in &diff.removed {
            self.teardown(id);
        }

        let mut bounds = BoundsBuilder::default();

        for (index, item) in routes.iter().enumerate() {
            if diff.kept.contains(&item.id) {
                match self.overlays.get(&item.id) {
                    // kept entries keep the color they were first drawn
                    // with; reordering the input does not restyle them
                    Some(OverlayState::Resolved(entry)) => {
                        for endpoint in &entry.endpoints {
                            bounds.extend(*endpoint);
                        }
                        continue;
                    }
                    Some(OverlayState::Failed) => continue,
                    // Pending left behind by a pass dropped mid-await;
                    // resolve it in this pass
                    _ => {}
                }
            }

            let (origin, destination) = match (
                item.route.origin.coordinates,
                item.route.destination.coordinates,
            ) {
                (Some(origin), Some(destination)) => (origin, destination),
                // undrawable, but processed: it must not stall the fit
                _ => {
                    self.overlays.insert(item.id.clone(), OverlayState::Failed);
                    continue;
                }
            };

            self.overlays.insert(item.id.clone(), OverlayState::Pending);

            let result = self.routing.resolve_route(&item.route).await;

            if self.epoch != epoch {
                // a newer pass or clear() superseded this one; drop the
                // stale result. Unreachable while callers hold the renderer
                // exclusively, but it pins the discard point if rendering
                // is ever driven through shared state.
                return;
            }

            match result {
                Ok(path) => {
                    let color = ROUTE_COLORS[index % ROUTE_COLORS.len()];
                    let entry = self.draw_plain(item, origin, destination, color, &path);

                    for endpoint in &entry.endpoints {
                        bounds.extend(*endpoint);
                    }

                    self.overlays
                        .insert(item.id.clone(), OverlayState::Resolved(entry));
                }
                Err(err) => {
                    tracing::info!("route {} did not resolve: {:?}", item.id, err);
                    self.overlays.insert(item.id.clone(), OverlayState::Failed);
                }
            }
        }

        if let Some(rect) = bounds.build() {
            self.canvas.fit_bounds(rect);
        }
    }

    /// Selection mode: a baseline origin dot for every route, plus a fully
    /// decorated overlay for the selected route if there is one. The whole
    /// view is rebuilt, so the previous selection's overlay is gone before
    /// the new one is drawn.
    #[tracing::instrument(skip_all, fields(routes = routes.len(), selected))]
    pub async fn render_selection(&mut self, routes: &[RouteWithId], selected: Option<&str>) {
        self.gate.ready().await;

        self.epoch += 1;
        let epoch = self.epoch;

        self.teardown_all();
        self.mode = Mode::Selection;

        for item in routes {
            let origin = match item.route.origin.coordinates {
                Some(origin) => origin,
                None => continue,
            };

            let is_selected = selected == Some(item.id.as_str());
            let (color, scale) = if is_selected {
                (SELECTED_COLOR, SELECTED_DOT_SCALE)
            } else {
                (IDLE_DOT_COLOR, IDLE_DOT_SCALE)
            };

            let marker = self.canvas.add_marker(MarkerSpec {
                route_id: item.id.clone(),
                position: origin,
                title: item.route.origin.address.clone(),
                style: MarkerStyle::Dot {
                    color: color.into(),
                    scale,
                },
            });

            self.overlays.insert(
                item.id.clone(),
                OverlayState::Resolved(OverlayEntry {
                    path: None,
                    markers: vec![marker],
                    endpoints: vec![origin],
                }),
            );
        }

        let selected_item = selected.and_then(|id| routes.iter().find(|item| item.id == id));
        let item = match selected_item {
            Some(item) => item,
            None => return,
        };

        let destination = match item.route.destination.coordinates {
            Some(destination) => destination,
            None => return,
        };

        let result = self.routing.resolve_route(&item.route).await;

        // superseded mid-flight, same discard point as in render_all
        if self.epoch != epoch {
            return;
        }

        let path = match result {
            Ok(path) => path,
            Err(err) => {
                tracing::info!("selected route {} did not resolve: {:?}", item.id, err);
                return;
            }
        };

        // replace the plain dot with the decorated overlay
        self.teardown(&item.id);
        let entry = self.draw_decorated(item, destination, &path);

        let mut bounds = BoundsBuilder::default();
        for endpoint in &entry.endpoints {
            bounds.extend(*endpoint);
        }

        self.overlays
            .insert(item.id.clone(), OverlayState::Resolved(entry));

        if let Some(rect) = bounds.build() {
            self.canvas.fit_bounds(rect);
        }
    }

    /// Detaches every drawn overlay and invalidates in-flight resolutions.
    pub fn clear(&mut self) {
        self.epoch += 1;
        self.teardown_all();
        self.mode = Mode::Idle;
    }

    fn draw_plain(
        &self,
        item: &RouteWithId,
        origin: Coordinates,
        destination: Coordinates,
        color: &str,
        path: &ResolvedPath,
    ) -> OverlayEntry {
        let mut entry = OverlayEntry::default();

        entry.path = Some(self.canvas.add_path(PathSpec {
            route_id: item.id.clone(),
            color: color.into(),
            points: path_points(path),
        }));

        for (position, title) in [
            (origin, &item.route.origin.address),
            (destination, &item.route.destination.address),
        ] {
            entry.markers.push(self.canvas.add_marker(MarkerSpec {
                route_id: item.id.clone(),
                position,
                title: title.clone(),
                style: MarkerStyle::Dot {
                    color: color.into(),
                    scale: 8.0,
                },
            }));
        }

        for leg in &path.legs {
            entry.endpoints.push(leg.start);
            entry.endpoints.push(leg.end);
        }

        entry
    }

    fn draw_decorated(
        &self,
        item: &RouteWithId,
        destination: Coordinates,
        path: &ResolvedPath,
    ) -> OverlayEntry {
        let mut entry = OverlayEntry::default();

        entry.path = Some(self.canvas.add_path(PathSpec {
            route_id: item.id.clone(),
            color: SELECTED_COLOR.into(),
            points: path_points(path),
        }));

        if let Some(origin) = item.route.origin.coordinates {
            entry.markers.push(self.canvas.add_marker(MarkerSpec {
                route_id: item.id.clone(),
                position: origin,
                title: item.route.origin.address.clone(),
                style: MarkerStyle::Labeled {
                    text: "A".into(),
                    color: SELECTED_COLOR.into(),
                },
            }));
        }

        entry.markers.push(self.canvas.add_marker(MarkerSpec {
            route_id: item.id.clone(),
            position: destination,
            title: item.route.destination.address.clone(),
            style: MarkerStyle::Labeled {
                text: "B".into(),
                color: SELECTED_COLOR.into(),
            },
        }));

        for (index, waypoint) in item.route.waypoints.iter().enumerate() {
            if let Some(position) = waypoint.coordinates {
                entry.markers.push(self.canvas.add_marker(MarkerSpec {
                    route_id: item.id.clone(),
                    position,
                    title: waypoint.address.clone(),
                    style: MarkerStyle::Numbered { number: index + 1 },
                }));
            }
        }

        for leg in &path.legs {
            entry.endpoints.push(leg.start);
            entry.endpoints.push(leg.end);
        }

        entry
    }

    /// Detach handles and drop the registry entry. Always runs before a new
    /// entry is created for the same id.
    fn teardown(&mut self, id: &str) {
        if let Some(OverlayState::Resolved(entry)) = self.overlays.remove(id) {
            if let Some(path) = entry.path {
                self.canvas.remove(path);
            }
            for marker in entry.markers {
                self.canvas.remove(marker);
            }
        }
    }

    fn teardown_all(&mut self) {
        let ids: Vec<String> = self.overlays.keys().cloned().collect();
        for id in ids {
            self.teardown(&id);
        }
    }
}

fn path_points(path: &ResolvedPath) -> Vec<Coordinates> {
    let mut points = Vec::with_capacity(path.legs.len() + 1);
    if let Some(first) = path.legs.first() {
        points.push(first.start);
    }
    for leg in &path.legs {
        points.push(leg.end);
    }
    points
}

#[derive(Default)]
struct BoundsBuilder {
    corners: Option<(Coord<f64>, Coord<f64>)>,
}

impl BoundsBuilder {
    fn extend(&mut self, c: Coordinates) {
        let c: Coord<f64> = c.into();

        match &mut self.corners {
            None => self.corners = Some((c, c)),
            Some((min, max)) => {
                min.x = min.x.min(c.x);
                min.y = min.y.min(c.y);
                max.x = max.x.max(c.x);
                max.y = max.y.max(c.y);
            }
        }
    }

    fn build(self) -> Option<Rect<f64>> {
        self.corners.map(|(min, max)| Rect::new(min, max))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::api::{PathLeg, RoutingAPI};
    use crate::entities::{GeoPoint, Route};
    use crate::error::{upstream_error, Error};
    use crate::map::canvas::{CanvasEvent, MapCanvas};
    use crate::map::readiness::WidgetGate;
    use async_trait::async_trait;
    use std::collections::{BTreeSet, HashMap, HashSet};
    use std::sync::atomic::{AtomicU64, Ordering};
    use std::sync::{Arc, Mutex};
    use std::time::Duration;
    use tokio::time::timeout;

    #[derive(Default)]
    struct FakeCanvasState {
        markers: HashMap<Handle, MarkerSpec>,
        paths: HashMap<Handle, PathSpec>,
        fits: Vec<Rect<f64>>,
    }

    #[derive(Default)]
    struct FakeCanvas {
        next_handle: AtomicU64,
        state: Mutex<FakeCanvasState>,
        events: Option<(
            async_channel::Sender<CanvasEvent>,
            async_channel::Receiver<CanvasEvent>,
        )>,
    }

    impl FakeCanvas {
        fn new() -> Arc<Self> {
            Arc::new(Self {
                events: Some(async_channel::unbounded()),
                ..Self::default()
            })
        }

        fn alloc(&self) -> Handle {
            Handle(self.next_handle.fetch_add(1, Ordering::SeqCst))
        }

        fn drawn_route_ids(&self) -> BTreeSet<String> {
            let state = self.state.lock().unwrap();
            state
                .markers
                .values()
                .map(|m| m.route_id.clone())
                .chain(state.paths.values().map(|p| p.route_id.clone()))
                .collect()
        }

        fn marker_styles(&self, route_id: &str) -> Vec<MarkerStyle> {
            let state = self.state.lock().unwrap();
            state
                .markers
                .values()
                .filter(|m| m.route_id == route_id)
                .map(|m| m.style.clone())
                .collect()
        }

        fn path_color(&self, route_id: &str) -> Option<String> {
            let state = self.state.lock().unwrap();
            state
                .paths
                .values()
                .find(|p| p.route_id == route_id)
                .map(|p| p.color.clone())
        }

        fn path_count(&self) -> usize {
            self.state.lock().unwrap().paths.len()
        }

        fn marker_count(&self) -> usize {
            self.state.lock().unwrap().markers.len()
        }

        fn fit_count(&self) -> usize {
            self.state.lock().unwrap().fits.len()
        }

        fn last_fit(&self) -> Option<Rect<f64>> {
            self.state.lock().unwrap().fits.last().copied()
        }
    }

    impl MapCanvas for FakeCanvas {
        fn add_marker(&self, spec: MarkerSpec) -> Handle {
            let handle = self.alloc();
            self.state.lock().unwrap().markers.insert(handle, spec);
            handle
        }

        fn add_path(&self, spec: PathSpec) -> Handle {
            let handle = self.alloc();
            self.state.lock().unwrap().paths.insert(handle, spec);
            handle
        }

        fn remove(&self, handle: Handle) {
            let mut state = self.state.lock().unwrap();
            state.markers.remove(&handle);
            state.paths.remove(&handle);
        }

        fn fit_bounds(&self, bounds: Rect<f64>) {
            self.state.lock().unwrap().fits.push(bounds);
        }

        fn subscribe(&self) -> async_channel::Receiver<CanvasEvent> {
            self.events.as_ref().unwrap().1.clone()
        }
    }

    #[derive(Default)]
    struct FakeRouting {
        fail_origins: Mutex<HashSet<String>>,
        stall_origins: Mutex<HashSet<String>>,
        calls: AtomicU64,
    }

    impl FakeRouting {
        fn new() -> Arc<Self> {
            Arc::new(Self::default())
        }

        fn failing_for(origins: &[&str]) -> Arc<Self> {
            let routing = Self::default();
            *routing.fail_origins.lock().unwrap() =
                origins.iter().map(|s| s.to_string()).collect();
            Arc::new(routing)
        }

        /// Resolutions for this origin hang until `unstall`.
        fn stall(&self, origin: &str) {
            self.stall_origins.lock().unwrap().insert(origin.into());
        }

        fn unstall(&self, origin: &str) {
            self.stall_origins.lock().unwrap().remove(origin);
        }

        fn call_count(&self) -> u64 {
            self.calls.load(Ordering::SeqCst)
        }
    }

    #[async_trait]
    impl RoutingAPI for FakeRouting {
        async fn resolve_route(&self, route: &Route) -> Result<ResolvedPath, Error> {
            self.calls.fetch_add(1, Ordering::SeqCst);

            let stalled = self
                .stall_origins
                .lock()
                .unwrap()
                .contains(&route.origin.address);
            if stalled {
                futures::future::pending::<()>().await;
            }

            let failing = self
                .fail_origins
                .lock()
                .unwrap()
                .contains(&route.origin.address);
            if failing {
                return Err(upstream_error());
            }

            let start = route.origin.coordinates.ok_or_else(upstream_error)?;
            let end = route.destination.coordinates.ok_or_else(upstream_error)?;

            Ok(ResolvedPath {
                legs: vec![PathLeg {
                    start,
                    end,
                    distance_meters: 1000.0,
                }],
            })
        }

        async fn geocode(&self, _query: &str) -> Result<GeoPoint, Error> {
            Err(upstream_error())
        }

        async fn reverse_geocode(&self, _location: Coordinates) -> Result<Option<String>, Error> {
            Ok(None)
        }
    }

    fn point(name: &str, lat: f64, lng: f64) -> GeoPoint {
        GeoPoint::new(name.into(), "".into(), Some(Coordinates::new(lat, lng)))
    }

    fn route(id: &str, origin: (f64, f64), destination: (f64, f64)) -> RouteWithId {
        RouteWithId {
            id: id.into(),
            route: Route {
                origin: point(&format!("{}-origin", id), origin.0, origin.1),
                destination: point(&format!("{}-dest", id), destination.0, destination.1),
                waypoints: vec![],
            },
        }
    }

    fn renderer(
        canvas: &Arc<FakeCanvas>,
        routing: &Arc<FakeRouting>,
        gate: WidgetGate,
    ) -> RouteMapRenderer {
        RouteMapRenderer::new(canvas.clone(), routing.clone(), gate)
    }

    fn ids(ids: &[&str]) -> BTreeSet<String> {
        ids.iter().map(|s| s.to_string()).collect()
    }

    #[tokio::test]
    async fn no_handles_leak_across_input_transitions() {
        let canvas = FakeCanvas::new();
        let routing = FakeRouting::new();
        let mut renderer = renderer(&canvas, &routing, WidgetGate::open());

        let a = route("a", (52.0, 21.0), (52.5, 21.5));
        let b = route("b", (50.0, 19.0), (50.5, 19.5));
        let c = route("c", (51.0, 20.0), (51.5, 20.5));

        renderer.render_all(&[a.clone(), b]).await;
        assert_eq!(canvas.drawn_route_ids(), ids(&["a", "b"]));

        renderer.render_all(&[a.clone(), c]).await;
        assert_eq!(canvas.drawn_route_ids(), ids(&["a", "c"]));

        renderer.render_all(&[a]).await;
        assert_eq!(canvas.drawn_route_ids(), ids(&["a"]));
        assert_eq!(renderer.overlay_ids(), vec!["a".to_string()]);

        // one path and two endpoint markers for the single survivor
        assert_eq!(canvas.path_count(), 1);
        assert_eq!(canvas.marker_count(), 2);
    }

    #[tokio::test]
    async fn kept_routes_are_not_resolved_again() {
        let canvas = FakeCanvas::new();
        let routing = FakeRouting::new();
        let mut renderer = renderer(&canvas, &routing, WidgetGate::open());

        let input = [
            route("a", (52.0, 21.0), (52.5, 21.5)),
            route("b", (50.0, 19.0), (50.5, 19.5)),
        ];

        renderer.render_all(&input).await;
        renderer.render_all(&input).await;

        assert_eq!(routing.call_count(), 2);
        // the viewport is still refit on every pass
        assert_eq!(canvas.fit_count(), 2);
    }

    #[tokio::test]
    async fn interrupted_pass_is_finished_by_the_next_one() {
        let canvas = FakeCanvas::new();
        let routing = FakeRouting::new();
        routing.stall("b-origin");
        let mut renderer = renderer(&canvas, &routing, WidgetGate::open());

        let input = [
            route("a", (52.0, 21.0), (52.5, 21.5)),
            route("b", (50.0, 19.0), (50.5, 19.5)),
        ];

        let interrupted = timeout(Duration::from_millis(10), renderer.render_all(&input)).await;
        assert!(interrupted.is_err());
        assert_eq!(canvas.drawn_route_ids(), ids(&["a"]));

        routing.unstall("b-origin");
        renderer.render_all(&input).await;

        assert_eq!(canvas.drawn_route_ids(), ids(&["a", "b"]));
        // the route that resolved before the interruption is not redone
        assert_eq!(routing.call_count(), 3);
    }

    #[tokio::test]
    async fn kept_routes_keep_their_first_color_across_reorders() {
        let canvas = FakeCanvas::new();
        let routing = FakeRouting::new();
        let mut renderer = renderer(&canvas, &routing, WidgetGate::open());

        let a = route("a", (52.0, 21.0), (52.5, 21.5));
        let b = route("b", (50.0, 19.0), (50.5, 19.5));

        renderer.render_all(&[a.clone(), b.clone()]).await;
        renderer.render_all(&[b, a]).await;

        assert_eq!(canvas.path_color("a").unwrap(), ROUTE_COLORS[0]);
        assert_eq!(canvas.path_color("b").unwrap(), ROUTE_COLORS[1]);
    }

    #[tokio::test]
    async fn fit_runs_once_after_every_route_processed() {
        let canvas = FakeCanvas::new();
        let routing = FakeRouting::new();
        let mut renderer = renderer(&canvas, &routing, WidgetGate::open());

        renderer
            .render_all(&[
                route("a", (52.0, 21.0), (52.5, 21.5)),
                route("b", (50.0, 19.0), (50.5, 19.5)),
                route("c", (51.0, 20.0), (51.5, 20.5)),
            ])
            .await;

        assert_eq!(canvas.fit_count(), 1);
        assert_eq!(routing.call_count(), 3);
    }

    #[tokio::test]
    async fn failed_route_is_omitted_and_excluded_from_bounds() {
        let canvas = FakeCanvas::new();
        let routing = FakeRouting::failing_for(&["b-origin"]);
        let mut renderer = renderer(&canvas, &routing, WidgetGate::open());

        renderer
            .render_all(&[
                route("a", (50.0, 19.0), (50.5, 19.5)),
                route("b", (60.0, 30.0), (61.0, 31.0)),
                route("c", (51.0, 20.0), (51.5, 20.5)),
            ])
            .await;

        assert_eq!(canvas.drawn_route_ids(), ids(&["a", "c"]));
        assert_eq!(canvas.fit_count(), 1);

        let rect = canvas.last_fit().unwrap();
        assert_eq!(rect.min().y, 50.0);
        assert_eq!(rect.max().y, 51.5);
        assert_eq!(rect.min().x, 19.0);
        assert_eq!(rect.max().x, 20.5);
    }

    #[tokio::test]
    async fn route_without_coordinates_cannot_stall_the_fit() {
        let canvas = FakeCanvas::new();
        let routing = FakeRouting::new();
        let mut renderer = renderer(&canvas, &routing, WidgetGate::open());

        let mut broken = route("broken", (0.0, 0.0), (50.5, 19.5));
        broken.route.origin = GeoPoint::new("nowhere".into(), "".into(), None);

        renderer
            .render_all(&[broken, route("a", (52.0, 21.0), (52.5, 21.5))])
            .await;

        assert_eq!(canvas.drawn_route_ids(), ids(&["a"]));
        assert_eq!(canvas.fit_count(), 1);
        assert_eq!(routing.call_count(), 1);
    }

    #[tokio::test]
    async fn selection_switch_leaves_exactly_one_decorated_overlay() {
        let canvas = FakeCanvas::new();
        let routing = FakeRouting::new();
        let mut renderer = renderer(&canvas, &routing, WidgetGate::open());

        let input = [
            route("a", (52.0, 21.0), (52.5, 21.5)),
            route("b", (50.0, 19.0), (50.5, 19.5)),
        ];

        renderer.render_selection(&input, Some("a")).await;
        renderer.render_selection(&input, Some("b")).await;

        let labeled_a = canvas
            .marker_styles("a")
            .iter()
            .filter(|s| matches!(s, MarkerStyle::Labeled { .. }))
            .count();
        let labeled_b = canvas
            .marker_styles("b")
            .iter()
            .filter(|s| matches!(s, MarkerStyle::Labeled { .. }))
            .count();

        assert_eq!(labeled_a, 0);
        assert_eq!(labeled_b, 2);
        assert_eq!(canvas.path_count(), 1);
    }

    #[tokio::test]
    async fn deselecting_returns_to_baseline_dots() {
        let canvas = FakeCanvas::new();
        let routing = FakeRouting::new();
        let mut renderer = renderer(&canvas, &routing, WidgetGate::open());

        let input = [
            route("a", (52.0, 21.0), (52.5, 21.5)),
            route("b", (50.0, 19.0), (50.5, 19.5)),
        ];

        renderer.render_selection(&input, Some("a")).await;
        renderer.render_selection(&input, None).await;

        assert_eq!(canvas.path_count(), 0);
        assert_eq!(canvas.marker_count(), 2);
        assert!(canvas
            .marker_styles("a")
            .iter()
            .chain(canvas.marker_styles("b").iter())
            .all(|s| matches!(s, MarkerStyle::Dot { .. })));
    }

    #[tokio::test]
    async fn decorated_overlay_numbers_waypoints() {
        let canvas = FakeCanvas::new();
        let routing = FakeRouting::new();
        let mut renderer = renderer(&canvas, &routing, WidgetGate::open());

        let mut item = route("a", (52.0, 21.0), (50.0, 19.0));
        item.route.waypoints = vec![
            point("w1", 51.5, 20.5),
            GeoPoint::new("ungeocoded".into(), "".into(), None),
            point("w2", 51.0, 20.0),
        ];

        renderer.render_selection(&[item], Some("a")).await;

        let numbers: Vec<usize> = canvas
            .marker_styles("a")
            .iter()
            .filter_map(|s| match s {
                MarkerStyle::Numbered { number } => Some(*number),
                _ => None,
            })
            .collect();

        // waypoints keep their positions in the sequence even when one is
        // skipped for having no geocode
        assert_eq!(numbers.len(), 2);
        assert!(numbers.contains(&1));
        assert!(numbers.contains(&3));
    }

    #[tokio::test]
    async fn failed_selection_keeps_the_baseline_dot() {
        let canvas = FakeCanvas::new();
        let routing = FakeRouting::failing_for(&["a-origin"]);
        let mut renderer = renderer(&canvas, &routing, WidgetGate::open());

        let input = [route("a", (52.0, 21.0), (52.5, 21.5))];
        renderer.render_selection(&input, Some("a")).await;

        assert_eq!(canvas.path_count(), 0);
        assert_eq!(canvas.marker_count(), 1);
        assert_eq!(canvas.fit_count(), 0);
    }

    #[tokio::test]
    async fn nothing_is_drawn_before_the_widget_is_ready() {
        let canvas = FakeCanvas::new();
        let routing = FakeRouting::new();
        let (gate, signal) = WidgetGate::new();
        let mut renderer = renderer(&canvas, &routing, gate);

        let input = [route("a", (52.0, 21.0), (52.5, 21.5))];

        let blocked = timeout(Duration::from_millis(10), renderer.render_all(&input)).await;
        assert!(blocked.is_err());
        assert_eq!(canvas.marker_count(), 0);
        assert_eq!(canvas.path_count(), 0);

        signal.notify();
        renderer.render_all(&input).await;
        assert_eq!(canvas.drawn_route_ids(), ids(&["a"]));
    }

    #[tokio::test]
    async fn clear_detaches_everything() {
        let canvas = FakeCanvas::new();
        let routing = FakeRouting::new();
        let mut renderer = renderer(&canvas, &routing, WidgetGate::open());

        renderer
            .render_all(&[route("a", (52.0, 21.0), (52.5, 21.5))])
            .await;
        renderer.clear();

        assert_eq!(canvas.marker_count(), 0);
        assert_eq!(canvas.path_count(), 0);
        assert!(renderer.overlay_ids().is_empty());
    }
}
