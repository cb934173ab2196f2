//! Explain service core: request/response model, completion parsing and the
//! transport-independent handler.

pub mod model;
pub mod parser;
pub mod service;
pub mod validator;

pub use model::{ExplainRequest, ExplainResponse, Explanation, Visualization};
pub use service::ExplainService;
