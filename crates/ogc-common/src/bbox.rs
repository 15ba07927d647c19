//! Bounding box types and operations.

use serde::{Deserialize, Serialize};

/// A geographic or projected bounding box.
///
/// For geographic CRS (EPSG:4326, CRS:84), coordinates are in degrees.
/// For projected CRS (EPSG:3857, EPSG:3395), coordinates are in meters.
///
/// Serializes as a `[min_x, min_y, max_x, max_y]` array, matching the
/// wire form used by capability documents.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(from = "[f64; 4]", into = "[f64; 4]")]
pub struct BoundingBox {
    pub min_x: f64,
    pub min_y: f64,
    pub max_x: f64,
    pub max_y: f64,
}

impl BoundingBox {
    /// Create a new bounding box from corner coordinates.
    pub fn new(min_x: f64, min_y: f64, max_x: f64, max_y: f64) -> Self {
        Self {
            min_x,
            min_y,
            max_x,
            max_y,
        }
    }

    /// Parse a KVP BBOX parameter string: "minx,miny,maxx,maxy"
    pub fn from_kvp_string(s: &str) -> Result<Self, BboxParseError> {
        let parts: Vec<&str> = s.split(',').collect();
        if parts.len() != 4 {
            return Err(BboxParseError::InvalidFormat(s.to_string()));
        }

        Ok(Self {
            min_x: parts[0]
                .trim()
                .parse()
                .map_err(|_| BboxParseError::InvalidNumber(parts[0].to_string()))?,
            min_y: parts[1]
                .trim()
                .parse()
                .map_err(|_| BboxParseError::InvalidNumber(parts[1].to_string()))?,
            max_x: parts[2]
                .trim()
                .parse()
                .map_err(|_| BboxParseError::InvalidNumber(parts[2].to_string()))?,
            max_y: parts[3]
                .trim()
                .parse()
                .map_err(|_| BboxParseError::InvalidNumber(parts[3].to_string()))?,
        })
    }

    /// Serialize back to the KVP "minx,miny,maxx,maxy" form.
    pub fn to_kvp_string(&self) -> String {
        format!("{},{},{},{}", self.min_x, self.min_y, self.max_x, self.max_y)
    }

    /// True when min corners do not exceed max corners on both axes.
    pub fn is_ordered(&self) -> bool {
        self.min_x <= self.max_x && self.min_y <= self.max_y
    }

    /// Width of the bounding box in coordinate units.
    pub fn width(&self) -> f64 {
        self.max_x - self.min_x
    }

    /// Height of the bounding box in coordinate units.
    pub fn height(&self) -> f64 {
        self.max_y - self.min_y
    }

    /// Check if a point is contained within this bbox (inclusive on all edges).
    pub fn contains_point(&self, x: f64, y: f64) -> bool {
        x >= self.min_x && x <= self.max_x && y >= self.min_y && y <= self.max_y
    }
}

impl From<[f64; 4]> for BoundingBox {
    fn from(v: [f64; 4]) -> Self {
        Self::new(v[0], v[1], v[2], v[3])
    }
}

impl From<BoundingBox> for [f64; 4] {
    fn from(b: BoundingBox) -> Self {
        [b.min_x, b.min_y, b.max_x, b.max_y]
    }
}

#[derive(Debug, thiserror::Error)]
pub enum BboxParseError {
    #[error("Invalid BBOX format: {0}. Expected 'minx,miny,maxx,maxy'")]
    InvalidFormat(String),

    #[error("Invalid number in BBOX: {0}")]
    InvalidNumber(String),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_kvp_bbox() {
        let bbox = BoundingBox::from_kvp_string("-74.1,40.7,-73.9,40.8").unwrap();
        assert_eq!(bbox.min_x, -74.1);
        assert_eq!(bbox.min_y, 40.7);
        assert_eq!(bbox.max_x, -73.9);
        assert_eq!(bbox.max_y, 40.8);
    }

    #[test]
    fn test_parse_rejects_wrong_count() {
        assert!(BoundingBox::from_kvp_string("1,2,3").is_err());
        assert!(BoundingBox::from_kvp_string("1,2,3,4,5").is_err());
    }

    #[test]
    fn test_parse_rejects_non_numeric() {
        assert!(BoundingBox::from_kvp_string("a,2,3,4").is_err());
        assert!(BoundingBox::from_kvp_string("1,2,,4").is_err());
    }

    #[test]
    fn test_kvp_round_trip() {
        for bbox in [
            BoundingBox::new(-180.0, -90.0, 180.0, 90.0),
            BoundingBox::new(-74.1, 40.7, -73.9, 40.8),
            BoundingBox::new(0.0, 0.0, 0.0, 0.0),
        ] {
            let parsed = BoundingBox::from_kvp_string(&bbox.to_kvp_string()).unwrap();
            assert_eq!(parsed, bbox);
        }
    }

    #[test]
    fn test_contains_point_inclusive() {
        let bbox = BoundingBox::new(-74.0, 40.7, -73.9, 40.8);
        assert!(bbox.contains_point(-73.985428, 40.748817));
        assert!(bbox.contains_point(-74.0, 40.7));
        assert!(bbox.contains_point(-73.9, 40.8));
        assert!(!bbox.contains_point(-74.013961, 40.704543));
    }

    #[test]
    fn test_ordering() {
        assert!(BoundingBox::new(0.0, 0.0, 1.0, 1.0).is_ordered());
        assert!(!BoundingBox::new(1.0, 0.0, 0.0, 1.0).is_ordered());
    }

    #[test]
    fn test_serde_array_form() {
        let bbox = BoundingBox::new(-180.0, -90.0, 180.0, 90.0);
        let json = serde_json::to_string(&bbox).unwrap();
        assert_eq!(json, "[-180.0,-90.0,180.0,90.0]");

        let back: BoundingBox = serde_json::from_str(&json).unwrap();
        assert_eq!(back, bbox);
    }
}
