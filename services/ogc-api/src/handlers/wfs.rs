//! Feature service handlers: GetCapabilities and GetFeature.

use std::sync::Arc;

use axum::{
    extract::{Extension, Query},
    http::HeaderMap,
    response::Response,
};
use metrics::counter;
use tracing::instrument;

use ogc_protocol::{xml, CapabilitiesKvp, FeatureCapabilities, GetFeatureKvp, ServiceKind};

use crate::content_negotiation::{negotiate, ResponseFormat};
use crate::handlers::common::{document_response, exception_response, internal_exception};
use crate::processor::process_get_feature;
use crate::state::AppState;

/// GET /ogc/wfs - feature service GetCapabilities
#[instrument(skip_all)]
pub async fn capabilities_handler(
    Extension(state): Extension<Arc<AppState>>,
    headers: HeaderMap,
    Query(params): Query<CapabilitiesKvp>,
) -> Response {
    counter!("ogc_requests_total", "operation" => "wfs_capabilities").increment(1);
    let format = negotiate(&headers);

    if let Err(ex) = params.validate(&state.catalog, ServiceKind::Feature) {
        return exception_response(&ex, format);
    }

    let caps = FeatureCapabilities::from_catalog(&state.catalog);
    let body = match format {
        ResponseFormat::Json => {
            serde_json::to_string(&caps).map_err(|e| internal_exception("GetCapabilities", e))
        }
        ResponseFormat::Xml => xml::feature_capabilities_xml(&caps)
            .map_err(|e| internal_exception("GetCapabilities", e)),
    };

    match body {
        Ok(body) => document_response(format.content_type(), body),
        Err(ex) => exception_response(&ex, format),
    }
}

/// GET /ogc/wfs/feature - GetFeature
///
/// The success body follows the validated `output_format`; exception
/// documents follow the Accept-negotiated format like every other response.
#[instrument(skip_all)]
pub async fn feature_handler(
    Extension(state): Extension<Arc<AppState>>,
    headers: HeaderMap,
    Query(params): Query<GetFeatureKvp>,
) -> Response {
    counter!("ogc_requests_total", "operation" => "wfs_getfeature").increment(1);
    let format = negotiate(&headers);

    let request = match params.into_request(&state.catalog) {
        Ok(request) => request,
        Err(ex) => return exception_response(&ex, format),
    };

    let collection = match process_get_feature(&state, &request).await {
        Ok(collection) => collection,
        Err(ex) => return exception_response(&ex, format),
    };

    let body = if request.output_format == "application/json" {
        serde_json::to_string(&collection).map_err(|e| internal_exception("GetFeature", e))
    } else {
        xml::feature_collection_xml(&collection).map_err(|e| internal_exception("GetFeature", e))
    };

    match body {
        Ok(body) => document_response(&request.output_format, body),
        Err(ex) => exception_response(&ex, format),
    }
}
