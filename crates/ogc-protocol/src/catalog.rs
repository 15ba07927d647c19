//! The service catalog: the immutable allow-lists every validator and
//! capability builder consults.
//!
//! Built once at startup, either from the built-in registry or from a YAML
//! file with the same shape, then shared read-only via `Arc`.

use ogc_common::{
    BoundingBox, CrsCode, FeatureType, Layer, PropertyDescriptor, PropertyType,
};
use serde::{Deserialize, Serialize};

/// Per-service descriptive metadata for capability documents.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ServiceMetadata {
    pub title: String,

    #[serde(rename = "abstract")]
    pub abstract_: String,

    #[serde(default)]
    pub keywords: Vec<String>,

    pub contact_person: String,
    pub organization: String,
    pub contact_email: String,
    pub access_constraints: String,
}

/// Everything the protocol layer knows about the deployed services.
///
/// CRS and format lists are ordered allow-lists; the first CRS of a feature
/// type is its default. The struct doubles as the YAML catalog file schema.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ServiceCatalog {
    pub wms_version: String,
    pub wfs_version: String,

    pub crs: Vec<CrsCode>,
    pub map_formats: Vec<String>,
    pub feature_formats: Vec<String>,

    pub layers: Vec<Layer>,
    pub feature_types: Vec<FeatureType>,

    pub wms_metadata: ServiceMetadata,
    pub wfs_metadata: ServiceMetadata,
}

impl ServiceCatalog {
    /// The built-in registry used when no catalog file is configured.
    pub fn builtin() -> Self {
        let world = BoundingBox::new(-180.0, -90.0, 180.0, 90.0);
        let all_crs = vec![
            CrsCode::Epsg4326,
            CrsCode::Epsg3857,
            CrsCode::Epsg3395,
            CrsCode::Crs84,
        ];

        Self {
            wms_version: "1.3.0".to_string(),
            wfs_version: "2.0.0".to_string(),

            crs: all_crs.clone(),
            map_formats: vec![
                "image/png".to_string(),
                "image/jpeg".to_string(),
                "image/gif".to_string(),
                "image/tiff".to_string(),
            ],
            feature_formats: vec![
                "application/json".to_string(),
                "application/gml+xml".to_string(),
                "text/xml".to_string(),
            ],

            layers: vec![
                Layer {
                    name: "basemap".to_string(),
                    title: "Base Map".to_string(),
                    abstract_: "Base map layer".to_string(),
                    queryable: false,
                    bbox: world,
                    crs: all_crs.clone(),
                    styles: vec!["default".to_string()],
                },
                Layer {
                    name: "data_layer".to_string(),
                    title: "Data Layer".to_string(),
                    abstract_: "Sample data layer".to_string(),
                    queryable: true,
                    bbox: world,
                    crs: all_crs.clone(),
                    styles: vec!["default".to_string(), "highlight".to_string()],
                },
            ],

            feature_types: vec![
                FeatureType {
                    name: "points_of_interest".to_string(),
                    title: "Points of Interest".to_string(),
                    abstract_: "Sample points of interest".to_string(),
                    keywords: vec![
                        "POI".to_string(),
                        "points".to_string(),
                        "locations".to_string(),
                    ],
                    bbox: world,
                    crs: all_crs.clone(),
                    properties: vec![
                        prop("id", PropertyType::Integer),
                        prop("name", PropertyType::String),
                        prop("category", PropertyType::String),
                        prop("description", PropertyType::String),
                    ],
                },
                FeatureType {
                    name: "boundaries".to_string(),
                    title: "Administrative Boundaries".to_string(),
                    abstract_: "Sample administrative boundaries".to_string(),
                    keywords: vec![
                        "boundaries".to_string(),
                        "administrative".to_string(),
                        "regions".to_string(),
                    ],
                    bbox: world,
                    crs: all_crs,
                    properties: vec![
                        prop("id", PropertyType::Integer),
                        prop("name", PropertyType::String),
                        prop("level", PropertyType::Integer),
                        prop("population", PropertyType::Integer),
                    ],
                },
            ],

            wms_metadata: ServiceMetadata {
                title: "ESDA Web Mapping WMS Service".to_string(),
                abstract_: "WMS service for geospatial data visualization".to_string(),
                keywords: vec!["WMS".to_string(), "GIS".to_string(), "Mapping".to_string()],
                contact_person: "Administrator".to_string(),
                organization: "ESDA".to_string(),
                contact_email: "admin@example.com".to_string(),
                access_constraints: "None".to_string(),
            },
            wfs_metadata: ServiceMetadata {
                title: "ESDA Web Mapping WFS Service".to_string(),
                abstract_: "WFS service for geospatial data access".to_string(),
                keywords: vec!["WFS".to_string(), "GIS".to_string(), "Features".to_string()],
                contact_person: "Administrator".to_string(),
                organization: "ESDA".to_string(),
                contact_email: "admin@example.com".to_string(),
                access_constraints: "None".to_string(),
            },
        }
    }

    pub fn supports_crs(&self, crs: &CrsCode) -> bool {
        self.crs.contains(crs)
    }

    pub fn is_map_format(&self, format: &str) -> bool {
        self.map_formats.iter().any(|f| f == format)
    }

    pub fn is_feature_format(&self, format: &str) -> bool {
        self.feature_formats.iter().any(|f| f == format)
    }

    pub fn find_layer(&self, name: &str) -> Option<&Layer> {
        self.layers.iter().find(|l| l.name == name)
    }

    pub fn find_feature_type(&self, name: &str) -> Option<&FeatureType> {
        self.feature_types.iter().find(|t| t.name == name)
    }
}

fn prop(name: &str, value_type: PropertyType) -> PropertyDescriptor {
    PropertyDescriptor {
        name: name.to_string(),
        value_type,
    }
}
