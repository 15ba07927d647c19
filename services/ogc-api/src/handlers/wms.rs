//! Map service handlers: GetCapabilities and GetMap.

use std::sync::Arc;

use axum::{
    body::Body,
    extract::{Extension, Query},
    http::{header, HeaderMap, StatusCode},
    response::Response,
};
use metrics::counter;
use tracing::instrument;

use ogc_protocol::{xml, CapabilitiesKvp, GetMapKvp, MapCapabilities, ServiceKind};

use crate::content_negotiation::{negotiate, ResponseFormat};
use crate::handlers::common::{document_response, exception_response, internal_exception};
use crate::processor::process_get_map;
use crate::state::AppState;

/// GET /ogc/wms - map service GetCapabilities
#[instrument(skip_all)]
pub async fn capabilities_handler(
    Extension(state): Extension<Arc<AppState>>,
    headers: HeaderMap,
    Query(params): Query<CapabilitiesKvp>,
) -> Response {
    counter!("ogc_requests_total", "operation" => "wms_capabilities").increment(1);
    let format = negotiate(&headers);

    if let Err(ex) = params.validate(&state.catalog, ServiceKind::Map) {
        return exception_response(&ex, format);
    }

    let caps = MapCapabilities::from_catalog(&state.catalog);
    let body = match format {
        ResponseFormat::Json => {
            serde_json::to_string(&caps).map_err(|e| internal_exception("GetCapabilities", e))
        }
        ResponseFormat::Xml => xml::map_capabilities_xml(&caps)
            .map_err(|e| internal_exception("GetCapabilities", e)),
    };

    match body {
        Ok(body) => document_response(format.content_type(), body),
        Err(ex) => exception_response(&ex, format),
    }
}

/// GET /ogc/wms/map - GetMap
#[instrument(skip_all)]
pub async fn map_handler(
    Extension(state): Extension<Arc<AppState>>,
    headers: HeaderMap,
    Query(params): Query<GetMapKvp>,
) -> Response {
    counter!("ogc_requests_total", "operation" => "wms_getmap").increment(1);
    let format = negotiate(&headers);

    let request = match params.into_request(&state.catalog) {
        Ok(request) => request,
        Err(ex) => return exception_response(&ex, format),
    };

    match process_get_map(&state, &request).await {
        Ok(bytes) => Response::builder()
            .status(StatusCode::OK)
            .header(header::CONTENT_TYPE, request.format.as_str())
            .body(Body::from(bytes))
            .unwrap(),
        Err(ex) => exception_response(&ex, format),
    }
}
