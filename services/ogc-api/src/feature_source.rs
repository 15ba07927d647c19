//! The feature source collaborator seam.

use async_trait::async_trait;
use ogc_common::{Feature, Geometry};
use std::collections::HashMap;

/// Fetches the features of one feature type, in storage order (WGS84).
#[async_trait]
pub trait FeatureSource: Send + Sync {
    async fn fetch(&self, type_name: &str) -> anyhow::Result<Vec<Feature>>;
}

/// In-memory feature source backing the built-in registry.
#[derive(Default)]
pub struct MemoryFeatureSource {
    features: HashMap<String, Vec<Feature>>,
}

impl MemoryFeatureSource {
    pub fn new(features: HashMap<String, Vec<Feature>>) -> Self {
        Self { features }
    }

    /// The sample dataset for the built-in `points_of_interest` and
    /// `boundaries` types.
    pub fn with_sample_data() -> Self {
        let mut features = HashMap::new();

        features.insert(
            "points_of_interest".to_string(),
            vec![
                Feature::point(-73.985428, 40.748817)
                    .with_property("id", 1)
                    .with_property("name", "Empire State Building")
                    .with_property("category", "landmark")
                    .with_property("description", "Famous skyscraper in New York City"),
                Feature::point(-74.013961, 40.704543)
                    .with_property("id", 2)
                    .with_property("name", "Statue of Liberty")
                    .with_property("category", "landmark")
                    .with_property("description", "Famous statue in New York Harbor"),
            ],
        );

        features.insert(
            "boundaries".to_string(),
            vec![Feature::new(Geometry::polygon(vec![vec![
                [-74.0259, 40.7127],
                [-73.9397, 40.7127],
                [-73.9397, 40.7903],
                [-74.0259, 40.7903],
                [-74.0259, 40.7127],
            ]]))
            .with_property("id", 1)
            .with_property("name", "Manhattan")
            .with_property("level", 2)
            .with_property("population", 1_628_706)],
        );

        Self { features }
    }
}

#[async_trait]
impl FeatureSource for MemoryFeatureSource {
    async fn fetch(&self, type_name: &str) -> anyhow::Result<Vec<Feature>> {
        Ok(self.features.get(type_name).cloned().unwrap_or_default())
    }
}
