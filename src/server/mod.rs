pub mod http;
pub mod routes;

pub use http::HttpServer;
pub use routes::{AppState, DEGRADED_HEADER};
