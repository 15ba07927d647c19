//! Capability documents and GetCapabilities KVP validation.

use crate::{ServiceCatalog, ServiceMetadata};
use ogc_common::{CrsCode, FeatureType, Layer, ProtocolException, ProtocolResult};
use serde::{Deserialize, Serialize};

/// Which protocol family an endpoint serves.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ServiceKind {
    Map,
    Feature,
}

impl ServiceKind {
    /// The literal `service` parameter value this family expects.
    pub fn service_name(&self) -> &'static str {
        match self {
            ServiceKind::Map => "WMS",
            ServiceKind::Feature => "WFS",
        }
    }

    pub fn version<'a>(&self, catalog: &'a ServiceCatalog) -> &'a str {
        match self {
            ServiceKind::Map => &catalog.wms_version,
            ServiceKind::Feature => &catalog.wfs_version,
        }
    }
}

/// Raw KVP query parameters for GetCapabilities.
#[derive(Debug, Default, Deserialize)]
pub struct CapabilitiesKvp {
    #[serde(rename = "SERVICE", alias = "service")]
    pub service: Option<String>,

    #[serde(rename = "REQUEST", alias = "request")]
    pub request: Option<String>,

    #[serde(rename = "VERSION", alias = "version")]
    pub version: Option<String>,
}

impl CapabilitiesKvp {
    /// Validate the service/request/version triple for a capabilities endpoint.
    pub fn validate(self, catalog: &ServiceCatalog, kind: ServiceKind) -> ProtocolResult<()> {
        let expected = kind.service_name();
        let service = self.service.as_deref().unwrap_or(expected);
        if service != expected {
            return Err(ProtocolException::invalid_parameter(
                format!("Invalid service: {service}. Expected {expected}"),
                "service",
            ));
        }

        let request = self.request.as_deref().unwrap_or("GetCapabilities");
        if request != "GetCapabilities" {
            return Err(ProtocolException::invalid_parameter(
                format!("Invalid request: {request}. Expected GetCapabilities"),
                "request",
            ));
        }

        let expected_version = kind.version(catalog);
        if let Some(v) = self.version.as_deref() {
            if v != expected_version {
                return Err(ProtocolException::invalid_parameter(
                    format!("Invalid version: {v}. Expected {expected_version}"),
                    "version",
                ));
            }
        }

        Ok(())
    }
}

/// The map-service capability document.
///
/// A pure function of the catalog; serde serialization is the JSON wire
/// form, the XML form lives in [`crate::xml`].
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct MapCapabilities {
    pub service: String,
    pub version: String,
    pub layers: Vec<Layer>,
    pub formats: Vec<String>,
    pub crs: Vec<CrsCode>,
    pub service_metadata: ServiceMetadata,
}

impl MapCapabilities {
    pub fn from_catalog(catalog: &ServiceCatalog) -> Self {
        Self {
            service: "WMS".to_string(),
            version: catalog.wms_version.clone(),
            layers: catalog.layers.clone(),
            formats: catalog.map_formats.clone(),
            crs: catalog.crs.clone(),
            service_metadata: catalog.wms_metadata.clone(),
        }
    }
}

/// The feature-service capability document.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct FeatureCapabilities {
    pub service: String,
    pub version: String,
    pub feature_types: Vec<FeatureType>,
    pub formats: Vec<String>,
    pub crs: Vec<CrsCode>,
    pub service_metadata: ServiceMetadata,
}

impl FeatureCapabilities {
    pub fn from_catalog(catalog: &ServiceCatalog) -> Self {
        Self {
            service: "WFS".to_string(),
            version: catalog.wfs_version.clone(),
            feature_types: catalog.feature_types.clone(),
            formats: catalog.feature_formats.clone(),
            crs: catalog.crs.clone(),
            service_metadata: catalog.wfs_metadata.clone(),
        }
    }
}
