//! Layer and feature type descriptors.
//!
//! These are read from the static registry populated at startup; nothing
//! mutates them at request time.

use crate::{BoundingBox, CrsCode};
use serde::{Deserialize, Serialize};

/// A map service layer definition.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Layer {
    /// Unique layer name (the key used in GetMap `layers`).
    pub name: String,

    /// Human-readable title for capabilities.
    pub title: String,

    /// Description of the layer.
    #[serde(rename = "abstract")]
    pub abstract_: String,

    /// Whether the layer supports feature queries.
    pub queryable: bool,

    /// Geographic bounding box (always in WGS84).
    pub bbox: BoundingBox,

    /// Supported coordinate reference systems for this layer.
    pub crs: Vec<CrsCode>,

    /// Available style names for this layer.
    pub styles: Vec<String>,
}

impl Layer {
    /// Check if this layer supports a given CRS.
    pub fn supports_crs(&self, crs: &CrsCode) -> bool {
        self.crs.contains(crs)
    }

    /// Find a style by name.
    pub fn has_style(&self, name: &str) -> bool {
        self.styles.iter().any(|s| s == name)
    }
}

/// A feature service type definition.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct FeatureType {
    /// Unique type name (the key used in GetFeature `type_names`).
    pub name: String,

    /// Human-readable title for capabilities.
    pub title: String,

    /// Description of the feature type.
    #[serde(rename = "abstract")]
    pub abstract_: String,

    /// Keywords for capabilities.
    #[serde(default)]
    pub keywords: Vec<String>,

    /// Geographic bounding box (always in WGS84).
    pub bbox: BoundingBox,

    /// Supported coordinate reference systems for this type.
    pub crs: Vec<CrsCode>,

    /// Typed property descriptors.
    pub properties: Vec<PropertyDescriptor>,
}

impl FeatureType {
    /// The default CRS is the first entry of the type's CRS list.
    pub fn default_crs(&self) -> Option<CrsCode> {
        self.crs.first().copied()
    }

    /// Every supported CRS after the default.
    pub fn other_crs(&self) -> &[CrsCode] {
        if self.crs.is_empty() {
            &[]
        } else {
            &self.crs[1..]
        }
    }
}

/// A typed property of a feature type.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct PropertyDescriptor {
    pub name: String,
    #[serde(rename = "type")]
    pub value_type: PropertyType,
}

/// Value types a feature property can carry.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PropertyType {
    Integer,
    String,
    Float,
    Boolean,
}

impl PropertyType {
    pub fn as_str(&self) -> &'static str {
        match self {
            PropertyType::Integer => "integer",
            PropertyType::String => "string",
            PropertyType::Float => "float",
            PropertyType::Boolean => "boolean",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample_type() -> FeatureType {
        FeatureType {
            name: "points_of_interest".to_string(),
            title: "Points of Interest".to_string(),
            abstract_: "Sample points of interest".to_string(),
            keywords: vec!["POI".to_string()],
            bbox: BoundingBox::new(-180.0, -90.0, 180.0, 90.0),
            crs: vec![CrsCode::Epsg4326, CrsCode::Epsg3857, CrsCode::Crs84],
            properties: vec![PropertyDescriptor {
                name: "id".to_string(),
                value_type: PropertyType::Integer,
            }],
        }
    }

    #[test]
    fn test_default_and_other_crs() {
        let ft = sample_type();
        assert_eq!(ft.default_crs(), Some(CrsCode::Epsg4326));
        assert_eq!(ft.other_crs(), &[CrsCode::Epsg3857, CrsCode::Crs84]);
    }

    #[test]
    fn test_property_type_serde() {
        let json = serde_json::to_string(&PropertyType::Integer).unwrap();
        assert_eq!(json, "\"integer\"");

        let pd: PropertyDescriptor =
            serde_json::from_str(r#"{"name": "population", "type": "integer"}"#).unwrap();
        assert_eq!(pd.value_type, PropertyType::Integer);
    }

    #[test]
    fn test_layer_abstract_rename() {
        let layer = Layer {
            name: "basemap".to_string(),
            title: "Base Map".to_string(),
            abstract_: "Base map layer".to_string(),
            queryable: false,
            bbox: BoundingBox::new(-180.0, -90.0, 180.0, 90.0),
            crs: vec![CrsCode::Epsg4326],
            styles: vec!["default".to_string()],
        };

        let json = serde_json::to_value(&layer).unwrap();
        assert_eq!(json["abstract"], "Base map layer");
        assert_eq!(json["queryable"], false);
    }
}
