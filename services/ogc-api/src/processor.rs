//! Operation processors: the glue between validated requests and the
//! collaborator seams.

use bytes::Bytes;
use ogc_common::{
    transform_bbox, transform_geometry, CrsCode, Feature, FeatureCollection, Geometry,
    ProtocolException, ProtocolResult,
};
use ogc_protocol::{GetFeatureRequest, GetMapRequest};
use tokio::time::timeout;

use crate::state::AppState;

/// Execute a validated GetMap request and return the image bytes.
pub async fn process_get_map(state: &AppState, request: &GetMapRequest) -> ProtocolResult<Bytes> {
    let bbox_wgs84 = transform_bbox(&request.bbox, request.crs, CrsCode::Epsg4326)?;

    match timeout(
        state.collaborator_timeout,
        state.renderer.render(request, bbox_wgs84),
    )
    .await
    {
        Ok(Ok(bytes)) => Ok(bytes),
        Ok(Err(e)) => Err(ProtocolException::processing_failed(
            format!("Error processing GetMap request: {e}"),
            "GetMap",
        )),
        Err(_) => Err(ProtocolException::processing_failed(
            "Renderer timed out",
            "GetMap",
        )),
    }
}

/// Execute a validated GetFeature request and return the collection.
///
/// Type names are fetched in request order and concatenated, then bbox- and
/// count-filtered. The bbox filter only tests Point coordinates; non-point
/// geometries are conservatively kept, since we do not implement polygon
/// intersection.
pub async fn process_get_feature(
    state: &AppState,
    request: &GetFeatureRequest,
) -> ProtocolResult<FeatureCollection> {
    let mut features: Vec<Feature> = Vec::new();
    for type_name in &request.type_names {
        let fetched = match timeout(
            state.collaborator_timeout,
            state.feature_source.fetch(type_name),
        )
        .await
        {
            Ok(Ok(fetched)) => fetched,
            Ok(Err(e)) => {
                return Err(ProtocolException::processing_failed(
                    format!("Error processing GetFeature request: {e}"),
                    "GetFeature",
                ));
            }
            Err(_) => {
                return Err(ProtocolException::processing_failed(
                    "Feature source timed out",
                    "GetFeature",
                ));
            }
        };
        features.extend(fetched);
    }

    if let Some(bbox) = &request.bbox {
        features.retain(|feature| match &feature.geometry {
            Geometry::Point { coordinates } => bbox.contains_point(coordinates[0], coordinates[1]),
            _ => true,
        });
    }

    if let Some(count) = request.count {
        features.truncate(count);
    }

    // Storage is WGS84; only transform when the client asked for another CRS.
    if let Some(crs) = request.crs {
        if crs != CrsCode::Epsg4326 {
            let mut transformed = Vec::with_capacity(features.len());
            for feature in features {
                let geometry = transform_geometry(&feature.geometry, CrsCode::Epsg4326, crs)?;
                transformed.push(Feature { geometry, ..feature });
            }
            features = transformed;
        }
    }

    Ok(FeatureCollection::from_features(features))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::feature_source::FeatureSource;
    use crate::renderer::MapRenderer;
    use crate::state::AppState;
    use async_trait::async_trait;
    use ogc_common::{BoundingBox, ExceptionCode};
    use ogc_protocol::ServiceCatalog;
    use std::sync::Arc;
    use std::time::Duration;

    fn test_state() -> AppState {
        AppState::new(ServiceCatalog::builtin(), Duration::from_secs(1))
    }

    fn map_request(bbox: BoundingBox, crs: CrsCode) -> GetMapRequest {
        GetMapRequest {
            version: "1.3.0".to_string(),
            layers: vec!["basemap".to_string()],
            styles: vec![],
            crs,
            bbox,
            width: 256,
            height: 256,
            format: "image/png".to_string(),
            transparent: false,
        }
    }

    fn feature_request() -> GetFeatureRequest {
        GetFeatureRequest {
            version: "2.0.0".to_string(),
            type_names: vec!["points_of_interest".to_string()],
            count: None,
            bbox: None,
            crs: None,
            output_format: "application/json".to_string(),
        }
    }

    #[tokio::test]
    async fn test_get_map_returns_png() {
        let state = test_state();
        let request = map_request(BoundingBox::new(-180.0, -90.0, 180.0, 90.0), CrsCode::Epsg4326);
        let bytes = process_get_map(&state, &request).await.unwrap();
        assert_eq!(&bytes[0..8], &[0x89, 0x50, 0x4E, 0x47, 0x0D, 0x0A, 0x1A, 0x0A]);
    }

    #[tokio::test]
    async fn test_get_map_renderer_error_is_processing_failed() {
        struct FailingRenderer;

        #[async_trait]
        impl MapRenderer for FailingRenderer {
            async fn render(
                &self,
                _request: &GetMapRequest,
                _bbox_wgs84: BoundingBox,
            ) -> anyhow::Result<Bytes> {
                anyhow::bail!("backend unavailable")
            }
        }

        let mut state = test_state();
        state.renderer = Arc::new(FailingRenderer);
        let request = map_request(BoundingBox::new(-180.0, -90.0, 180.0, 90.0), CrsCode::Epsg4326);
        let err = process_get_map(&state, &request).await.unwrap_err();
        assert_eq!(err.code, ExceptionCode::OperationProcessingFailed);
        assert_eq!(err.locator.as_deref(), Some("GetMap"));
    }

    #[tokio::test]
    async fn test_get_map_timeout() {
        struct SlowRenderer;

        #[async_trait]
        impl MapRenderer for SlowRenderer {
            async fn render(
                &self,
                _request: &GetMapRequest,
                _bbox_wgs84: BoundingBox,
            ) -> anyhow::Result<Bytes> {
                tokio::time::sleep(Duration::from_secs(60)).await;
                Ok(Bytes::new())
            }
        }

        let mut state = test_state();
        state.renderer = Arc::new(SlowRenderer);
        state.collaborator_timeout = Duration::from_millis(10);
        let request = map_request(BoundingBox::new(-180.0, -90.0, 180.0, 90.0), CrsCode::Epsg4326);
        let err = process_get_map(&state, &request).await.unwrap_err();
        assert_eq!(err.code, ExceptionCode::OperationProcessingFailed);
        assert_eq!(err.locator.as_deref(), Some("GetMap"));
    }

    #[tokio::test]
    async fn test_bbox_filter_keeps_point_inside() {
        let state = test_state();
        let mut request = feature_request();
        request.bbox = Some(BoundingBox::new(-74.0, 40.7, -73.9, 40.8));
        let fc = process_get_feature(&state, &request).await.unwrap();
        assert_eq!(fc.len(), 1);
        assert_eq!(
            fc.features[0].properties.get("name").and_then(|v| v.as_str()),
            Some("Empire State Building")
        );
    }

    #[tokio::test]
    async fn test_non_point_conservatively_kept() {
        let state = test_state();
        let mut request = feature_request();
        request.type_names = vec!["boundaries".to_string()];
        // A bbox far from Manhattan still keeps the polygon.
        request.bbox = Some(BoundingBox::new(0.0, 0.0, 1.0, 1.0));
        let fc = process_get_feature(&state, &request).await.unwrap();
        assert_eq!(fc.len(), 1);
    }

    #[tokio::test]
    async fn test_count_is_prefix_and_deterministic() {
        let state = test_state();
        let mut request = feature_request();
        request.count = Some(1);

        let first = process_get_feature(&state, &request).await.unwrap();
        let second = process_get_feature(&state, &request).await.unwrap();
        assert_eq!(first, second);
        assert_eq!(first.len(), 1);
        assert_eq!(
            first.features[0].properties.get("name").and_then(|v| v.as_str()),
            Some("Empire State Building")
        );
    }

    #[tokio::test]
    async fn test_type_order_preserved() {
        let state = test_state();
        let mut request = feature_request();
        request.type_names = vec![
            "boundaries".to_string(),
            "points_of_interest".to_string(),
        ];
        let fc = process_get_feature(&state, &request).await.unwrap();
        assert_eq!(fc.len(), 3);
        assert_eq!(fc.features[0].geometry.type_name(), "Polygon");
    }

    #[tokio::test]
    async fn test_output_crs_transform() {
        let state = test_state();
        let mut request = feature_request();
        request.crs = Some(CrsCode::Epsg3857);
        let fc = process_get_feature(&state, &request).await.unwrap();
        match &fc.features[0].geometry {
            Geometry::Point { coordinates } => {
                // Projected meters, far outside the degree range.
                assert!(coordinates[0].abs() > 1_000_000.0);
            }
            other => panic!("Expected Point, got {}", other.type_name()),
        }
    }

    #[tokio::test]
    async fn test_source_error_is_processing_failed() {
        struct FailingSource;

        #[async_trait]
        impl FeatureSource for FailingSource {
            async fn fetch(&self, _type_name: &str) -> anyhow::Result<Vec<Feature>> {
                anyhow::bail!("connection refused")
            }
        }

        let mut state = test_state();
        state.feature_source = Arc::new(FailingSource);
        let err = process_get_feature(&state, &feature_request())
            .await
            .unwrap_err();
        assert_eq!(err.code, ExceptionCode::OperationProcessingFailed);
        assert_eq!(err.locator.as_deref(), Some("GetFeature"));
    }
}
