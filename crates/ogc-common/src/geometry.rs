//! GeoJSON-style feature and geometry types.
//!
//! Geometry is a tagged enum: each variant carries a coordinate array of
//! the statically correct nesting depth, and callers dispatch on the
//! variant rather than inspecting a generic map.

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// A position as `[longitude, latitude]` (or `[x, y]` in projected CRS).
pub type Position = [f64; 2];

/// GeoJSON geometry variants supported by the feature service.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(tag = "type")]
pub enum Geometry {
    /// A single position.
    Point { coordinates: Position },

    /// An array of positions.
    MultiPoint { coordinates: Vec<Position> },

    /// An array of two or more positions.
    LineString { coordinates: Vec<Position> },

    /// An array of LineString coordinate arrays.
    MultiLineString { coordinates: Vec<Vec<Position>> },

    /// An array of linear rings (first is exterior, rest are holes).
    Polygon { coordinates: Vec<Vec<Position>> },

    /// An array of Polygon coordinate arrays.
    MultiPolygon { coordinates: Vec<Vec<Vec<Position>>> },
}

impl Geometry {
    /// Create a point geometry.
    pub fn point(lon: f64, lat: f64) -> Self {
        Geometry::Point {
            coordinates: [lon, lat],
        }
    }

    /// Create a line string geometry.
    pub fn line_string(coordinates: Vec<Position>) -> Self {
        Geometry::LineString { coordinates }
    }

    /// Create a polygon geometry.
    pub fn polygon(coordinates: Vec<Vec<Position>>) -> Self {
        Geometry::Polygon { coordinates }
    }

    /// The GeoJSON type tag for this variant.
    pub fn type_name(&self) -> &'static str {
        match self {
            Geometry::Point { .. } => "Point",
            Geometry::MultiPoint { .. } => "MultiPoint",
            Geometry::LineString { .. } => "LineString",
            Geometry::MultiLineString { .. } => "MultiLineString",
            Geometry::Polygon { .. } => "Polygon",
            Geometry::MultiPolygon { .. } => "MultiPolygon",
        }
    }

    /// Apply a fallible coordinate remap to every position, producing a new
    /// geometry of the same variant. The input is never mutated.
    pub fn try_map_positions<E, F>(&self, mut f: F) -> Result<Self, E>
    where
        F: FnMut(Position) -> Result<Position, E>,
    {
        let mapped = match self {
            Geometry::Point { coordinates } => Geometry::Point {
                coordinates: f(*coordinates)?,
            },
            Geometry::MultiPoint { coordinates } => Geometry::MultiPoint {
                coordinates: map_line(coordinates, &mut f)?,
            },
            Geometry::LineString { coordinates } => Geometry::LineString {
                coordinates: map_line(coordinates, &mut f)?,
            },
            Geometry::MultiLineString { coordinates } => Geometry::MultiLineString {
                coordinates: map_rings(coordinates, &mut f)?,
            },
            Geometry::Polygon { coordinates } => Geometry::Polygon {
                coordinates: map_rings(coordinates, &mut f)?,
            },
            Geometry::MultiPolygon { coordinates } => Geometry::MultiPolygon {
                coordinates: coordinates
                    .iter()
                    .map(|polygon| map_rings(polygon, &mut f))
                    .collect::<Result<_, E>>()?,
            },
        };
        Ok(mapped)
    }
}

fn map_line<E, F>(line: &[Position], f: &mut F) -> Result<Vec<Position>, E>
where
    F: FnMut(Position) -> Result<Position, E>,
{
    line.iter().map(|p| f(*p)).collect()
}

fn map_rings<E, F>(rings: &[Vec<Position>], f: &mut F) -> Result<Vec<Vec<Position>>, E>
where
    F: FnMut(Position) -> Result<Position, E>,
{
    rings.iter().map(|ring| map_line(ring, f)).collect()
}

/// A single feature: geometry plus a flat property map plus optional id.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Feature {
    /// Type identifier (always "Feature").
    #[serde(rename = "type")]
    pub type_: String,

    /// Optional feature identifier.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,

    /// The geometry of this feature.
    pub geometry: Geometry,

    /// Flat key-value property map.
    pub properties: Map<String, Value>,
}

impl Feature {
    /// Create a new feature from a geometry, with empty properties.
    pub fn new(geometry: Geometry) -> Self {
        Self {
            type_: "Feature".to_string(),
            id: None,
            geometry,
            properties: Map::new(),
        }
    }

    /// Create a new feature with a point geometry.
    pub fn point(lon: f64, lat: f64) -> Self {
        Self::new(Geometry::point(lon, lat))
    }

    /// Set the feature ID.
    pub fn with_id(mut self, id: impl Into<String>) -> Self {
        self.id = Some(id.into());
        self
    }

    /// Add a property value.
    pub fn with_property(mut self, name: impl Into<String>, value: impl Into<Value>) -> Self {
        self.properties.insert(name.into(), value.into());
        self
    }
}

/// An ordered sequence of features.
///
/// Source order is preserved through filtering; count truncation takes a
/// prefix so repeated identical requests return identical results.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct FeatureCollection {
    /// Type identifier (always "FeatureCollection").
    #[serde(rename = "type")]
    pub type_: String,

    /// Array of features.
    pub features: Vec<Feature>,
}

impl FeatureCollection {
    /// Create a new empty FeatureCollection.
    pub fn new() -> Self {
        Self {
            type_: "FeatureCollection".to_string(),
            features: Vec::new(),
        }
    }

    /// Create a collection from an ordered list of features.
    pub fn from_features(features: Vec<Feature>) -> Self {
        Self {
            type_: "FeatureCollection".to_string(),
            features,
        }
    }

    /// Add a feature to the collection.
    pub fn with_feature(mut self, feature: Feature) -> Self {
        self.features.push(feature);
        self
    }

    pub fn len(&self) -> usize {
        self.features.len()
    }

    pub fn is_empty(&self) -> bool {
        self.features.is_empty()
    }
}

impl Default for FeatureCollection {
    fn default() -> Self {
        Self::new()
    }
}
