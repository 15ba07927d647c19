//! JSON wire form of protocol exceptions.

use ogc_common::ProtocolException;
use serde::{Deserialize, Serialize};

/// The JSON exception body.
///
/// Field names are part of the wire contract; the XML form of the same
/// exception is produced by [`crate::xml::exception_report_xml`].
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ExceptionDocument {
    pub exception_code: String,
    pub exception_text: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub locator: Option<String>,
}

impl From<&ProtocolException> for ExceptionDocument {
    fn from(ex: &ProtocolException) -> Self {
        Self {
            exception_code: ex.code.as_str().to_string(),
            exception_text: ex.message.clone(),
            locator: ex.locator.clone(),
        }
    }
}
