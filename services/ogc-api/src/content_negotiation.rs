//! Content negotiation between the two wire formats.
//!
//! One rule for success and exception payloads alike: JSON only when the
//! client asks for `application/json` without also accepting
//! `application/xml`; everything else, including a missing Accept header,
//! gets XML.

use axum::http::{header, HeaderMap};

/// The two document formats the services speak.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ResponseFormat {
    /// XML (default)
    #[default]
    Xml,
    /// JSON
    Json,
}

impl ResponseFormat {
    /// Get the Content-Type header value for this format.
    pub fn content_type(&self) -> &'static str {
        match self {
            ResponseFormat::Xml => "application/xml",
            ResponseFormat::Json => "application/json",
        }
    }
}

/// Pick the response format from the Accept header.
pub fn negotiate(headers: &HeaderMap) -> ResponseFormat {
    let accept = headers
        .get(header::ACCEPT)
        .and_then(|v| v.to_str().ok())
        .unwrap_or("");

    if accept.contains("application/json") && !accept.contains("application/xml") {
        ResponseFormat::Json
    } else {
        ResponseFormat::Xml
    }
}
