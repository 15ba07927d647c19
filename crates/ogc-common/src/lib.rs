//! Common geospatial types shared across the OGC protocol crates.

pub mod bbox;
pub mod crs;
pub mod error;
pub mod geometry;
pub mod layer;
pub mod transform;

pub use bbox::BoundingBox;
pub use crs::CrsCode;
pub use error::{ExceptionCode, ProtocolException, ProtocolResult};
pub use geometry::{Feature, FeatureCollection, Geometry};
pub use layer::{FeatureType, Layer, PropertyDescriptor, PropertyType};
pub use transform::{transform_bbox, transform_geometry, transform_point};
