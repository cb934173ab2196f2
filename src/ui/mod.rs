//! Explainer UI: a page controller driving an injected view.

pub mod client;
pub mod controller;
pub mod terminal;
pub mod view;

pub use client::{ClientError, ExplainClient, HttpExplainClient};
pub use controller::{ExplainOutcome, ExplainerController, UiError};
pub use terminal::TerminalView;
pub use view::{ExplainerView, ImageSlot, LoadingGuard, Panel};
