//! Optional X11 window for watching a visualization animate.

pub mod backend;
pub mod events;
pub mod presenter;

pub use presenter::animate;
