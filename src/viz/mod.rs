//! Visualization dispatch: classify, build a display list, rasterize.

pub mod draw;
pub mod fonts;
pub mod kind;
pub mod raster;
pub mod scene;

pub use draw::{dispatch, draw_visualization};
pub use kind::VizKind;
pub use raster::{rasterize, Canvas, RenderError};
pub use scene::{DrawCommand, Scene};

use std::time::{SystemTime, UNIX_EPOCH};

/// Wall-clock seconds, the time base of every animated routine.
pub fn wall_clock_secs() -> f64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|elapsed| elapsed.as_secs_f64())
        .unwrap_or_default()
}
