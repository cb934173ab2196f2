//! Explain API routes.

use std::sync::Arc;

use axum::extract::rejection::{JsonRejection, QueryRejection};
use axum::extract::{Query, State};
use axum::http::{header, StatusCode};
use axum::response::{IntoResponse, Response};
use axum::routing::{get, post};
use axum::{Json, Router};
use fontdue::Font;
use rand::rngs::StdRng;
use rand::SeedableRng;
use serde::{Deserialize, Serialize};

use crate::error::{ErrorResponse, ExplainError};
use crate::explain::{ExplainRequest, ExplainService, Explanation};
use crate::viz::{self, RenderError};

/// Set on 200 responses synthesized from an unusable model reply.
pub const DEGRADED_HEADER: &str = "x-astrolens-degraded";

const VIZ_DEFAULT_WIDTH: u32 = 640;
const VIZ_DEFAULT_HEIGHT: u32 = 360;
const VIZ_MAX_DIMENSION: u32 = 2048;

#[derive(Clone)]
pub struct AppState {
    pub service: Arc<ExplainService>,
    pub font: Option<Arc<Font>>,
}

/// Routes mounted under `/api`.
pub fn explain_routes(state: AppState) -> Router {
    Router::new()
        .route("/ask", post(ask_handler).fallback(method_not_allowed))
        .route("/viz.png", get(viz_png_handler))
        .with_state(state)
}

/// Health check route
pub fn health_routes() -> Router {
    Router::new().route("/health", get(health_handler))
}

async fn ask_handler(
    State(state): State<AppState>,
    payload: Result<Json<ExplainRequest>, JsonRejection>,
) -> Result<Response, ExplainError> {
    let Json(request) =
        payload.map_err(|rejection| ExplainError::InvalidRequest(rejection.body_text()))?;

    let response = match state.service.explain(&request).await? {
        Explanation::Model(value) => (StatusCode::OK, Json(value)).into_response(),
        Explanation::Degraded(degraded) => {
            (StatusCode::OK, [(DEGRADED_HEADER, "true")], Json(degraded)).into_response()
        }
    };
    Ok(response)
}

async fn method_not_allowed() -> ExplainError {
    ExplainError::InvalidMethod
}

#[derive(Debug, Serialize)]
pub struct HealthResponse {
    pub status: String,
    pub version: String,
}

async fn health_handler() -> impl IntoResponse {
    let response = HealthResponse {
        status: "ok".to_string(),
        version: env!("CARGO_PKG_VERSION").to_string(),
    };

    (StatusCode::OK, Json(response))
}

#[derive(Debug, Default, Deserialize)]
pub struct VizQuery {
    #[serde(rename = "type")]
    pub viz_type: Option<String>,
    #[serde(default)]
    pub concept: String,
    /// Seconds; defaults to the wall clock.
    pub t: Option<f64>,
    pub width: Option<u32>,
    pub height: Option<u32>,
    pub seed: Option<u64>,
}

async fn viz_png_handler(
    State(state): State<AppState>,
    query: Result<Query<VizQuery>, QueryRejection>,
) -> Result<Response, VizError> {
    let Query(query) = query.map_err(|rejection| VizError::BadQuery(rejection.body_text()))?;
    let width = query.width.unwrap_or(VIZ_DEFAULT_WIDTH);
    let height = query.height.unwrap_or(VIZ_DEFAULT_HEIGHT);
    if width == 0 || height == 0 || width > VIZ_MAX_DIMENSION || height > VIZ_MAX_DIMENSION {
        return Err(VizError::BadSize { width, height });
    }

    let time = query.t.unwrap_or_else(viz::wall_clock_secs);
    let mut rng = match query.seed {
        Some(seed) => StdRng::seed_from_u64(seed),
        None => StdRng::from_entropy(),
    };
    let scene = viz::dispatch(
        query.viz_type.as_deref(),
        &query.concept,
        time,
        width,
        height,
        &mut rng,
    );
    let canvas = viz::rasterize(&scene, state.font.as_deref())?;
    let png = canvas.to_png()?;

    Ok((
        StatusCode::OK,
        [
            (header::CONTENT_TYPE, "image/png".to_string()),
            (header::HeaderName::from_static("x-astrolens-viz"), scene.kind.to_string()),
        ],
        png,
    )
        .into_response())
}

#[derive(Debug, thiserror::Error)]
enum VizError {
    #[error("{0}")]
    BadQuery(String),

    #[error("width and height must be within 1..=2048, got {width}x{height}")]
    BadSize { width: u32, height: u32 },

    #[error(transparent)]
    Render(#[from] RenderError),
}

impl IntoResponse for VizError {
    fn into_response(self) -> Response {
        let status = match self {
            VizError::BadQuery(_) | VizError::BadSize { .. } => StatusCode::BAD_REQUEST,
            VizError::Render(_) => StatusCode::INTERNAL_SERVER_ERROR,
        };
        let body = ErrorResponse {
            error: self.to_string(),
        };
        (status, Json(body)).into_response()
    }
}
