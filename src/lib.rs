//! AstroLens: explains astronomy concepts at three levels of depth through a
//! chat-completion model and draws a matching animated visualization.

pub mod cli;
pub mod config;
pub mod error;
pub mod explain;
pub mod llm;
pub mod server;
pub mod ui;
pub mod viz;
pub mod x11;

pub use config::{CompletionConfig, ServiceConfig, UiConfig};
pub use error::ExplainError;
