use async_channel::Receiver;
use geo_types::Rect;
use std::sync::Arc;

use crate::geo::Coordinates;

/// Opaque handle to one drawn map object, issued by the canvas.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct Handle(pub u64);

#[derive(Clone, Debug, PartialEq)]
pub enum MarkerStyle {
    /// Plain circle marker; scale and color carry the selection state.
    Dot { color: String, scale: f64 },
    /// Lettered endpoint marker for the decorated single-route view.
    Labeled { text: String, color: String },
    /// Numbered waypoint marker, 1-based.
    Numbered { number: usize },
}

#[derive(Clone, Debug, PartialEq)]
pub struct MarkerSpec {
    pub route_id: String,
    pub position: Coordinates,
    pub title: String,
    pub style: MarkerStyle,
}

#[derive(Clone, Debug, PartialEq)]
pub struct PathSpec {
    pub route_id: String,
    pub color: String,
    pub points: Vec<Coordinates>,
}

#[derive(Clone, Debug, PartialEq)]
pub enum CanvasEvent {
    MarkerClicked { route_id: String },
}

/// The embedded map widget, reduced to what the renderer needs: attach and
/// detach overlay objects, move the viewport, and surface marker clicks.
/// The single canvas instance is mutated exclusively by the renderer.
pub trait MapCanvas: Send + Sync {
    fn add_marker(&self, spec: MarkerSpec) -> Handle;
    fn add_path(&self, spec: PathSpec) -> Handle;
    fn remove(&self, handle: Handle);
    fn fit_bounds(&self, bounds: Rect<f64>);
    fn subscribe(&self) -> Receiver<CanvasEvent>;
}

pub type DynCanvas = Arc<dyn MapCanvas>;
