//! Coordinate Reference System identifiers.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Well-known CRS codes accepted by the map and feature services.
///
/// This is a closed allow-list: any identifier outside it is rejected at
/// parse time, never silently coerced to a nearby CRS.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub enum CrsCode {
    /// WGS84 Geographic (lon/lat in degrees)
    Epsg4326,
    /// Spherical Web Mercator (meters)
    Epsg3857,
    /// Ellipsoidal World Mercator (meters)
    Epsg3395,
    /// WGS84 longitude-latitude, axis order always lon/lat
    Crs84,
}

impl CrsCode {
    /// Parse a CRS identifier from a request parameter.
    ///
    /// Accepts upper- or lowercase spellings like "EPSG:4326" or "crs:84".
    pub fn parse(s: &str) -> Result<Self, CrsParseError> {
        match s.to_uppercase().as_str() {
            "EPSG:4326" => Ok(CrsCode::Epsg4326),
            "EPSG:3857" => Ok(CrsCode::Epsg3857),
            "EPSG:3395" => Ok(CrsCode::Epsg3395),
            "CRS:84" => Ok(CrsCode::Crs84),
            _ => Err(CrsParseError::UnsupportedCrs(s.to_string())),
        }
    }

    /// The canonical identifier string.
    pub fn as_str(&self) -> &'static str {
        match self {
            CrsCode::Epsg4326 => "EPSG:4326",
            CrsCode::Epsg3857 => "EPSG:3857",
            CrsCode::Epsg3395 => "EPSG:3395",
            CrsCode::Crs84 => "CRS:84",
        }
    }

    /// Check if this is a geographic (lon/lat degrees) CRS.
    ///
    /// EPSG:4326 and CRS:84 share the same coordinate space here; the
    /// services use lon/lat axis order for both.
    pub fn is_geographic(&self) -> bool {
        matches!(self, CrsCode::Epsg4326 | CrsCode::Crs84)
    }
}

impl fmt::Display for CrsCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl TryFrom<String> for CrsCode {
    type Error = CrsParseError;

    fn try_from(s: String) -> Result<Self, Self::Error> {
        CrsCode::parse(&s)
    }
}

impl From<CrsCode> for String {
    fn from(code: CrsCode) -> Self {
        code.as_str().to_string()
    }
}

#[derive(Debug, thiserror::Error)]
pub enum CrsParseError {
    #[error("Unsupported CRS: {0}")]
    UnsupportedCrs(String),
}
