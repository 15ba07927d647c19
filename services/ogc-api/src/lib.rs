//! OGC API Service Library
//!
//! HTTP server implementation for the WMS-style map service and the
//! WFS-style feature service.

use std::sync::Arc;

use axum::{routing::get, Extension, Router};
use tower_http::{compression::CompressionLayer, cors::CorsLayer, trace::TraceLayer};

pub mod config;
pub mod content_negotiation;
pub mod feature_source;
pub mod handlers;
pub mod processor;
pub mod renderer;
pub mod state;

use state::AppState;

/// Build the service router with all routes and middleware.
///
/// Shared between `main` and the integration tests so both drive the same
/// stack.
pub fn build_router(state: Arc<AppState>) -> Router {
    Router::new()
        // Map service
        .route("/ogc/wms", get(handlers::wms::capabilities_handler))
        .route("/ogc/wms/map", get(handlers::wms::map_handler))
        // Feature service
        .route("/ogc/wfs", get(handlers::wfs::capabilities_handler))
        .route("/ogc/wfs/feature", get(handlers::wfs::feature_handler))
        // Health and metrics
        .route("/health", get(handlers::health::health_handler))
        .route("/metrics", get(handlers::health::metrics_handler))
        // Middleware
        .layer(Extension(state))
        .layer(TraceLayer::new_for_http())
        .layer(CompressionLayer::new())
        .layer(CorsLayer::permissive())
}
