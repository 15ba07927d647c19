//! Protocol exception types.
//!
//! Every fallible protocol operation returns `Result<_, ProtocolException>`;
//! exceptions are values, never unstructured errors crossing a component
//! boundary. The exception code vocabulary is fixed by the OGC-style wire
//! contract and is extended only by adding enum variants.

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Result type alias for protocol operations.
pub type ProtocolResult<T> = Result<T, ProtocolException>;

/// Fixed vocabulary of protocol exception codes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ExceptionCode {
    /// A required parameter has an unacceptable value.
    InvalidParameterValue,
    /// Requested or source CRS not supported, or a bbox transform failed.
    #[serde(rename = "InvalidCRS")]
    InvalidCrs,
    /// Requested output format not in the service's supported set.
    InvalidFormat,
    /// A geometry failed transformation or structural validation.
    InvalidGeometry,
    /// Capability generation failed unexpectedly.
    OperationNotSupported,
    /// GetMap/GetFeature processing failed without a more specific code.
    OperationProcessingFailed,
    /// Catch-all for any failure not otherwise classified.
    NoApplicableCode,
}

impl ExceptionCode {
    /// The wire spelling of this code.
    pub fn as_str(&self) -> &'static str {
        match self {
            ExceptionCode::InvalidParameterValue => "InvalidParameterValue",
            ExceptionCode::InvalidCrs => "InvalidCRS",
            ExceptionCode::InvalidFormat => "InvalidFormat",
            ExceptionCode::InvalidGeometry => "InvalidGeometry",
            ExceptionCode::OperationNotSupported => "OperationNotSupported",
            ExceptionCode::OperationProcessingFailed => "OperationProcessingFailed",
            ExceptionCode::NoApplicableCode => "NoApplicableCode",
        }
    }

    /// Get the HTTP status code for this exception code.
    ///
    /// Validation and parameter failures map to 400; processing and
    /// internal failures map to 500. The status is a function of the code
    /// alone, not of where the exception was raised.
    pub fn http_status(&self) -> u16 {
        match self {
            ExceptionCode::InvalidParameterValue
            | ExceptionCode::InvalidCrs
            | ExceptionCode::InvalidFormat
            | ExceptionCode::InvalidGeometry => 400,

            ExceptionCode::OperationNotSupported
            | ExceptionCode::OperationProcessingFailed
            | ExceptionCode::NoApplicableCode => 500,
        }
    }
}

impl std::fmt::Display for ExceptionCode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// A protocol exception: the terminal value of every non-success path.
#[derive(Debug, Clone, PartialEq, Error, Serialize, Deserialize)]
#[error("{code}: {message}")]
pub struct ProtocolException {
    pub code: ExceptionCode,
    pub message: String,
    pub locator: Option<String>,
}

impl ProtocolException {
    pub fn new(code: ExceptionCode, message: impl Into<String>) -> Self {
        Self {
            code,
            message: message.into(),
            locator: None,
        }
    }

    /// Attach the parameter or operation name this exception is attributed to.
    pub fn with_locator(mut self, locator: impl Into<String>) -> Self {
        self.locator = Some(locator.into());
        self
    }

    pub fn invalid_parameter(message: impl Into<String>, locator: impl Into<String>) -> Self {
        Self::new(ExceptionCode::InvalidParameterValue, message).with_locator(locator)
    }

    pub fn invalid_crs(message: impl Into<String>, locator: impl Into<String>) -> Self {
        Self::new(ExceptionCode::InvalidCrs, message).with_locator(locator)
    }

    pub fn invalid_format(message: impl Into<String>, locator: impl Into<String>) -> Self {
        Self::new(ExceptionCode::InvalidFormat, message).with_locator(locator)
    }

    pub fn invalid_geometry(message: impl Into<String>, locator: impl Into<String>) -> Self {
        Self::new(ExceptionCode::InvalidGeometry, message).with_locator(locator)
    }

    pub fn operation_not_supported(message: impl Into<String>, locator: impl Into<String>) -> Self {
        Self::new(ExceptionCode::OperationNotSupported, message).with_locator(locator)
    }

    pub fn processing_failed(message: impl Into<String>, locator: impl Into<String>) -> Self {
        Self::new(ExceptionCode::OperationProcessingFailed, message).with_locator(locator)
    }

    pub fn no_applicable_code(message: impl Into<String>, locator: impl Into<String>) -> Self {
        Self::new(ExceptionCode::NoApplicableCode, message).with_locator(locator)
    }

    /// Get the HTTP status code for this exception.
    pub fn http_status(&self) -> u16 {
        self.code.http_status()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_wire_spellings() {
        assert_eq!(ExceptionCode::InvalidCrs.as_str(), "InvalidCRS");
        assert_eq!(
            ExceptionCode::InvalidParameterValue.as_str(),
            "InvalidParameterValue"
        );
        assert_eq!(
            ExceptionCode::OperationProcessingFailed.as_str(),
            "OperationProcessingFailed"
        );
    }

    #[test]
    fn test_serde_uses_wire_spelling() {
        let json = serde_json::to_string(&ExceptionCode::InvalidCrs).unwrap();
        assert_eq!(json, "\"InvalidCRS\"");

        let back: ExceptionCode = serde_json::from_str("\"NoApplicableCode\"").unwrap();
        assert_eq!(back, ExceptionCode::NoApplicableCode);
    }

    #[test]
    fn test_http_status_mapping() {
        assert_eq!(ExceptionCode::InvalidParameterValue.http_status(), 400);
        assert_eq!(ExceptionCode::InvalidCrs.http_status(), 400);
        assert_eq!(ExceptionCode::InvalidFormat.http_status(), 400);
        assert_eq!(ExceptionCode::InvalidGeometry.http_status(), 400);
        assert_eq!(ExceptionCode::OperationNotSupported.http_status(), 500);
        assert_eq!(ExceptionCode::OperationProcessingFailed.http_status(), 500);
        assert_eq!(ExceptionCode::NoApplicableCode.http_status(), 500);
    }

    #[test]
    fn test_constructors_set_locator() {
        let ex = ProtocolException::invalid_crs("Unsupported CRS: EPSG:9999", "GetMap");
        assert_eq!(ex.code, ExceptionCode::InvalidCrs);
        assert_eq!(ex.locator.as_deref(), Some("GetMap"));
        assert_eq!(ex.http_status(), 400);
    }

    #[test]
    fn test_display() {
        let ex = ProtocolException::invalid_parameter("Invalid service: WFS", "service");
        assert_eq!(ex.to_string(), "InvalidParameterValue: Invalid service: WFS");
    }
}
