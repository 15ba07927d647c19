//! GetMap request model and KVP validation.

use crate::ServiceCatalog;
use ogc_common::{BoundingBox, CrsCode, ProtocolException, ProtocolResult};
use serde::Deserialize;

/// Upper bound on GetMap width and height in pixels. A 4096x4096 RGBA
/// buffer is already 64 MiB; anything larger is rejected at validation so
/// no renderer ever sees an allocation-sized-by-the-client request.
pub const MAX_MAP_DIMENSION: u32 = 4096;

/// A validated, immutable GetMap request.
///
/// Only `GetMapKvp::into_request` constructs this; every field has already
/// passed the catalog allow-lists.
#[derive(Debug, Clone, PartialEq)]
pub struct GetMapRequest {
    pub version: String,
    pub layers: Vec<String>,
    pub styles: Vec<String>,
    pub crs: CrsCode,
    pub bbox: BoundingBox,
    pub width: u32,
    pub height: u32,
    pub format: String,
    pub transparent: bool,
}

/// Raw KVP query parameters for GetMap.
///
/// Every field is optional text; parameter names are accepted in upper- or
/// lowercase spelling. Numeric fields stay strings here so a malformed value
/// produces a protocol exception instead of a framework-level rejection.
#[derive(Debug, Default, Deserialize)]
pub struct GetMapKvp {
    #[serde(rename = "SERVICE", alias = "service")]
    pub service: Option<String>,

    #[serde(rename = "REQUEST", alias = "request")]
    pub request: Option<String>,

    #[serde(rename = "VERSION", alias = "version")]
    pub version: Option<String>,

    #[serde(rename = "LAYERS", alias = "layers")]
    pub layers: Option<String>,

    #[serde(rename = "STYLES", alias = "styles")]
    pub styles: Option<String>,

    #[serde(rename = "CRS", alias = "crs", alias = "SRS", alias = "srs")]
    pub crs: Option<String>,

    #[serde(rename = "BBOX", alias = "bbox")]
    pub bbox: Option<String>,

    #[serde(rename = "WIDTH", alias = "width")]
    pub width: Option<String>,

    #[serde(rename = "HEIGHT", alias = "height")]
    pub height: Option<String>,

    #[serde(rename = "FORMAT", alias = "format")]
    pub format: Option<String>,

    #[serde(rename = "TRANSPARENT", alias = "transparent")]
    pub transparent: Option<String>,
}

impl GetMapKvp {
    /// Validate against the catalog, returning on the first failure.
    pub fn into_request(self, catalog: &ServiceCatalog) -> ProtocolResult<GetMapRequest> {
        let service = self.service.as_deref().unwrap_or("WMS");
        if service != "WMS" {
            return Err(ProtocolException::invalid_parameter(
                format!("Invalid service: {service}. Expected WMS"),
                "service",
            ));
        }

        let request = self.request.as_deref().unwrap_or("GetMap");
        if request != "GetMap" {
            return Err(ProtocolException::invalid_parameter(
                format!("Invalid request: {request}. Expected GetMap"),
                "request",
            ));
        }

        let version = match self.version {
            Some(v) if v != catalog.wms_version => {
                return Err(ProtocolException::invalid_parameter(
                    format!("Invalid version: {v}. Expected {}", catalog.wms_version),
                    "version",
                ));
            }
            Some(v) => v,
            None => catalog.wms_version.clone(),
        };

        let bbox_str = self.bbox.ok_or_else(|| {
            ProtocolException::invalid_parameter("Missing required parameter: bbox", "bbox")
        })?;
        let bbox = BoundingBox::from_kvp_string(&bbox_str)
            .map_err(|e| ProtocolException::invalid_parameter(e.to_string(), "bbox"))?;

        let crs_str = self.crs.ok_or_else(|| {
            ProtocolException::invalid_parameter("Missing required parameter: crs", "crs")
        })?;
        let crs = parse_supported_crs(&crs_str, catalog, "GetMap")?;

        let format = self.format.unwrap_or_else(|| "image/png".to_string());
        if !catalog.is_map_format(&format) {
            return Err(ProtocolException::invalid_format(
                format!("Unsupported format: {format}"),
                "GetMap",
            ));
        }

        if !bbox.is_ordered() {
            return Err(ProtocolException::invalid_parameter(
                format!(
                    "Invalid bbox ordering: {}. Expected minx<=maxx and miny<=maxy",
                    bbox.to_kvp_string()
                ),
                "bbox",
            ));
        }

        let width = parse_positive(self.width.as_deref(), "width")?;
        let height = parse_positive(self.height.as_deref(), "height")?;

        let layers_str = self.layers.ok_or_else(|| {
            ProtocolException::invalid_parameter("Missing required parameter: layers", "layers")
        })?;
        let layers: Vec<String> = layers_str
            .split(',')
            .map(|s| s.trim().to_string())
            .filter(|s| !s.is_empty())
            .collect();
        if layers.is_empty() {
            return Err(ProtocolException::invalid_parameter(
                "At least one layer name is required",
                "layers",
            ));
        }
        for name in &layers {
            if catalog.find_layer(name).is_none() {
                return Err(ProtocolException::invalid_parameter(
                    format!("Unknown layer: {name}"),
                    "layers",
                ));
            }
        }

        let styles: Vec<String> = match self.styles.as_deref() {
            None | Some("") => Vec::new(),
            Some(s) => s.split(',').map(|s| s.trim().to_string()).collect(),
        };
        if !styles.is_empty() && styles.len() != layers.len() {
            return Err(ProtocolException::invalid_parameter(
                format!(
                    "styles lists {} entries for {} layers",
                    styles.len(),
                    layers.len()
                ),
                "styles",
            ));
        }

        let transparent = matches!(
            self.transparent.as_deref().map(str::to_ascii_lowercase).as_deref(),
            Some("true") | Some("1")
        );

        Ok(GetMapRequest {
            version,
            layers,
            styles,
            crs,
            bbox,
            width,
            height,
            format,
            transparent,
        })
    }
}

/// Parse a CRS parameter, rejecting anything outside the catalog.
pub(crate) fn parse_supported_crs(
    value: &str,
    catalog: &ServiceCatalog,
    operation: &str,
) -> ProtocolResult<CrsCode> {
    let crs = CrsCode::parse(value)
        .map_err(|_| ProtocolException::invalid_crs(format!("Unsupported CRS: {value}"), operation))?;
    if !catalog.supports_crs(&crs) {
        return Err(ProtocolException::invalid_crs(
            format!("Unsupported CRS: {value}"),
            operation,
        ));
    }
    Ok(crs)
}

fn parse_positive(value: Option<&str>, name: &str) -> ProtocolResult<u32> {
    let raw = value.ok_or_else(|| {
        ProtocolException::invalid_parameter(format!("Missing required parameter: {name}"), name)
    })?;
    match raw.trim().parse::<u32>() {
        Ok(n) if n == 0 => Err(ProtocolException::invalid_parameter(
            format!("Invalid {name}: {raw}. Expected a positive integer"),
            name,
        )),
        Ok(n) if n > MAX_MAP_DIMENSION => Err(ProtocolException::invalid_parameter(
            format!("Invalid {name}: {raw}. Maximum is {MAX_MAP_DIMENSION}"),
            name,
        )),
        Ok(n) => Ok(n),
        Err(_) => Err(ProtocolException::invalid_parameter(
            format!("Invalid {name}: {raw}. Expected a positive integer"),
            name,
        )),
    }
}
