mod canvas;
mod diff;
mod readiness;
mod renderer;

pub use canvas::{CanvasEvent, DynCanvas, Handle, MapCanvas, MarkerSpec, MarkerStyle, PathSpec};
pub use diff::{diff_overlays, OverlayDiff};
pub use readiness::{ReadySignal, WidgetGate};
pub use renderer::{RouteMapRenderer, ROUTE_COLORS};
