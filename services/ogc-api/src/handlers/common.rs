//! Shared handler utilities: exception translation and document responses.

use axum::http::{header, StatusCode};
use axum::response::Response;
use metrics::counter;
use ogc_common::ProtocolException;
use ogc_protocol::{xml, ExceptionDocument};

use crate::content_negotiation::ResponseFormat;

/// Translate a protocol exception into an HTTP response in the negotiated
/// format. The status code is a function of the exception code alone.
pub fn exception_response(ex: &ProtocolException, format: ResponseFormat) -> Response {
    counter!("ogc_exceptions_total", "code" => ex.code.as_str()).increment(1);

    let status =
        StatusCode::from_u16(ex.http_status()).unwrap_or(StatusCode::INTERNAL_SERVER_ERROR);
    let body = match format {
        ResponseFormat::Json => {
            serde_json::to_string(&ExceptionDocument::from(ex)).unwrap_or_default()
        }
        ResponseFormat::Xml => xml::exception_report_xml(ex),
    };

    Response::builder()
        .status(status)
        .header(header::CONTENT_TYPE, format.content_type())
        .body(body.into())
        .unwrap()
}

/// The broad catch for failures that are not already protocol exceptions:
/// log the cause, wrap it as `NoApplicableCode` with the operation name.
pub fn internal_exception(operation: &'static str, error: impl std::fmt::Display) -> ProtocolException {
    let message = error.to_string();
    tracing::error!(operation, error = %message, "Unhandled internal error");
    ProtocolException::no_applicable_code(message, operation)
}

/// A 200 response carrying a serialized document.
pub fn document_response(content_type: &str, body: String) -> Response {
    Response::builder()
        .status(StatusCode::OK)
        .header(header::CONTENT_TYPE, content_type)
        .body(body.into())
        .unwrap()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_status_follows_exception_code() {
        let ex = ProtocolException::invalid_parameter("Invalid service: WFS", "service");
        let resp = exception_response(&ex, ResponseFormat::Xml);
        assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
        assert_eq!(
            resp.headers().get(header::CONTENT_TYPE).unwrap(),
            "application/xml"
        );

        let ex = ProtocolException::processing_failed("backend down", "GetMap");
        let resp = exception_response(&ex, ResponseFormat::Json);
        assert_eq!(resp.status(), StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(
            resp.headers().get(header::CONTENT_TYPE).unwrap(),
            "application/json"
        );
    }

    #[test]
    fn test_internal_exception_wraps_message() {
        let ex = internal_exception("GetCapabilities", "serializer blew up");
        assert_eq!(ex.code, ogc_common::ExceptionCode::NoApplicableCode);
        assert_eq!(ex.message, "serializer blew up");
        assert_eq!(ex.locator.as_deref(), Some("GetCapabilities"));
    }
}
