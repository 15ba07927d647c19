//! GetFeature request model and KVP validation.

use crate::getmap::parse_supported_crs;
use crate::ServiceCatalog;
use ogc_common::{BoundingBox, CrsCode, ProtocolException, ProtocolResult};
use serde::Deserialize;

/// A validated, immutable GetFeature request.
#[derive(Debug, Clone, PartialEq)]
pub struct GetFeatureRequest {
    pub version: String,
    pub type_names: Vec<String>,
    pub count: Option<usize>,
    pub bbox: Option<BoundingBox>,
    pub crs: Option<CrsCode>,
    pub output_format: String,
}

/// Raw KVP query parameters for GetFeature.
///
/// Parameter names are accepted in upper- or lowercase spelling; both the
/// WFS 2.0 `TYPENAMES` and the snake_case form are recognized.
#[derive(Debug, Default, Deserialize)]
pub struct GetFeatureKvp {
    #[serde(rename = "SERVICE", alias = "service")]
    pub service: Option<String>,

    #[serde(rename = "REQUEST", alias = "request")]
    pub request: Option<String>,

    #[serde(rename = "VERSION", alias = "version")]
    pub version: Option<String>,

    #[serde(
        rename = "TYPENAMES",
        alias = "typenames",
        alias = "TYPE_NAMES",
        alias = "type_names"
    )]
    pub type_names: Option<String>,

    #[serde(rename = "COUNT", alias = "count")]
    pub count: Option<String>,

    #[serde(rename = "BBOX", alias = "bbox")]
    pub bbox: Option<String>,

    #[serde(rename = "CRS", alias = "crs", alias = "SRSNAME", alias = "srsname")]
    pub crs: Option<String>,

    #[serde(
        rename = "OUTPUTFORMAT",
        alias = "outputformat",
        alias = "OUTPUT_FORMAT",
        alias = "output_format"
    )]
    pub output_format: Option<String>,
}

impl GetFeatureKvp {
    /// Validate against the catalog, returning on the first failure.
    ///
    /// The bbox, when present, is parsed but its corner ordering is not
    /// enforced; a reversed bbox simply matches nothing at filter time.
    pub fn into_request(self, catalog: &ServiceCatalog) -> ProtocolResult<GetFeatureRequest> {
        let service = self.service.as_deref().unwrap_or("WFS");
        if service != "WFS" {
            return Err(ProtocolException::invalid_parameter(
                format!("Invalid service: {service}. Expected WFS"),
                "service",
            ));
        }

        let request = self.request.as_deref().unwrap_or("GetFeature");
        if request != "GetFeature" {
            return Err(ProtocolException::invalid_parameter(
                format!("Invalid request: {request}. Expected GetFeature"),
                "request",
            ));
        }

        let version = match self.version {
            Some(v) if v != catalog.wfs_version => {
                return Err(ProtocolException::invalid_parameter(
                    format!("Invalid version: {v}. Expected {}", catalog.wfs_version),
                    "version",
                ));
            }
            Some(v) => v,
            None => catalog.wfs_version.clone(),
        };

        let type_names_str = self.type_names.ok_or_else(|| {
            ProtocolException::invalid_parameter(
                "Missing required parameter: type_names",
                "type_names",
            )
        })?;
        let type_names: Vec<String> = type_names_str
            .split(',')
            .map(|s| s.trim().to_string())
            .filter(|s| !s.is_empty())
            .collect();
        if type_names.is_empty() {
            return Err(ProtocolException::invalid_parameter(
                "At least one feature type name is required",
                "type_names",
            ));
        }
        for name in &type_names {
            if catalog.find_feature_type(name).is_none() {
                return Err(ProtocolException::invalid_parameter(
                    format!("Unknown feature type: {name}"),
                    "type_names",
                ));
            }
        }

        let crs = match self.crs.as_deref() {
            Some(value) => Some(parse_supported_crs(value, catalog, "GetFeature")?),
            None => None,
        };

        let output_format = self
            .output_format
            .unwrap_or_else(|| "application/json".to_string());
        if !catalog.is_feature_format(&output_format) {
            return Err(ProtocolException::invalid_format(
                format!("Unsupported format: {output_format}"),
                "GetFeature",
            ));
        }

        let bbox = match self.bbox.as_deref() {
            Some(s) => Some(
                BoundingBox::from_kvp_string(s)
                    .map_err(|e| ProtocolException::invalid_parameter(e.to_string(), "bbox"))?,
            ),
            None => None,
        };

        let count = match self.count.as_deref() {
            Some(raw) => match raw.trim().parse::<usize>() {
                Ok(n) if n > 0 => Some(n),
                _ => {
                    return Err(ProtocolException::invalid_parameter(
                        format!("Invalid count: {raw}. Expected a positive integer"),
                        "count",
                    ));
                }
            },
            None => None,
        };

        Ok(GetFeatureRequest {
            version,
            type_names,
            count,
            bbox,
            crs,
            output_format,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use ogc_common::ExceptionCode;

    fn valid_kvp() -> GetFeatureKvp {
        GetFeatureKvp {
            service: Some("WFS".to_string()),
            request: Some("GetFeature".to_string()),
            version: Some("2.0.0".to_string()),
            type_names: Some("points_of_interest".to_string()),
            count: None,
            bbox: None,
            crs: None,
            output_format: None,
        }
    }

    #[test]
    fn test_valid_request_with_defaults() {
        let catalog = ServiceCatalog::builtin();
        let req = valid_kvp().into_request(&catalog).unwrap();
        assert_eq!(req.type_names, vec!["points_of_interest"]);
        assert_eq!(req.output_format, "application/json");
        assert_eq!(req.count, None);
        assert_eq!(req.bbox, None);
        assert_eq!(req.crs, None);
        assert_eq!(req.version, "2.0.0");
    }

    #[test]
    fn test_wrong_service() {
        let catalog = ServiceCatalog::builtin();
        let mut kvp = valid_kvp();
        kvp.service = Some("WMS".to_string());
        let err = kvp.into_request(&catalog).unwrap_err();
        assert_eq!(err.code, ExceptionCode::InvalidParameterValue);
        assert_eq!(err.locator.as_deref(), Some("service"));
    }

    #[test]
    fn test_unknown_type_name() {
        let catalog = ServiceCatalog::builtin();
        let mut kvp = valid_kvp();
        kvp.type_names = Some("points_of_interest,unknown_type".to_string());
        let err = kvp.into_request(&catalog).unwrap_err();
        assert_eq!(err.locator.as_deref(), Some("type_names"));
    }

    #[test]
    fn test_unsupported_crs_locator_is_operation() {
        let catalog = ServiceCatalog::builtin();
        let mut kvp = valid_kvp();
        kvp.crs = Some("EPSG:32633".to_string());
        let err = kvp.into_request(&catalog).unwrap_err();
        assert_eq!(err.code, ExceptionCode::InvalidCrs);
        assert_eq!(err.locator.as_deref(), Some("GetFeature"));
    }

    #[test]
    fn test_unsupported_output_format() {
        let catalog = ServiceCatalog::builtin();
        let mut kvp = valid_kvp();
        kvp.output_format = Some("text/csv".to_string());
        let err = kvp.into_request(&catalog).unwrap_err();
        assert_eq!(err.code, ExceptionCode::InvalidFormat);
        assert_eq!(err.locator.as_deref(), Some("GetFeature"));
    }

    #[test]
    fn test_bbox_and_count_parsing() {
        let catalog = ServiceCatalog::builtin();

        let mut kvp = valid_kvp();
        kvp.bbox = Some("-74.1,40.7,-73.9,40.8".to_string());
        kvp.count = Some("5".to_string());
        let req = kvp.into_request(&catalog).unwrap();
        assert_eq!(req.bbox.unwrap().min_x, -74.1);
        assert_eq!(req.count, Some(5));

        let mut kvp = valid_kvp();
        kvp.bbox = Some("not,a,real,bbox".to_string());
        let err = kvp.into_request(&catalog).unwrap_err();
        assert_eq!(err.locator.as_deref(), Some("bbox"));

        let mut kvp = valid_kvp();
        kvp.count = Some("-3".to_string());
        let err = kvp.into_request(&catalog).unwrap_err();
        assert_eq!(err.locator.as_deref(), Some("count"));

        let mut kvp = valid_kvp();
        kvp.count = Some("0".to_string());
        assert!(kvp.into_request(&catalog).is_err());
    }

    #[test]
    fn test_reversed_bbox_accepted() {
        let catalog = ServiceCatalog::builtin();
        let mut kvp = valid_kvp();
        kvp.bbox = Some("10,10,-10,-10".to_string());
        let req = kvp.into_request(&catalog).unwrap();
        assert!(!req.bbox.unwrap().is_ordered());
    }
}
