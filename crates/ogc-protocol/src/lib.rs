//! OGC-style protocol layer: service catalog, KVP request validation,
//! capability models, and wire-format document serialization.
//!
//! Validators turn raw query parameters into typed requests; everything
//! fallible returns `Result<_, ProtocolException>` so the HTTP layer can
//! translate failures into exception documents without inspecting causes.

pub mod capabilities;
pub mod catalog;
pub mod exceptions;
pub mod getfeature;
pub mod getmap;
pub mod xml;

pub use capabilities::{CapabilitiesKvp, FeatureCapabilities, MapCapabilities, ServiceKind};
pub use catalog::{ServiceCatalog, ServiceMetadata};
pub use exceptions::ExceptionDocument;
pub use getfeature::{GetFeatureKvp, GetFeatureRequest};
pub use getmap::{GetMapKvp, GetMapRequest};
