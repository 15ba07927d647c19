//! The map renderer collaborator seam.

use async_trait::async_trait;
use bytes::Bytes;
use ogc_common::BoundingBox;
use ogc_protocol::GetMapRequest;
use std::io::Write;

/// Renders a validated GetMap request into image bytes.
///
/// Implementations report failures as `anyhow::Error`; the processor
/// translates them into protocol exceptions.
#[async_trait]
pub trait MapRenderer: Send + Sync {
    /// Render the requested layers. `bbox_wgs84` is the request bbox already
    /// resolved to WGS84 lon/lat.
    async fn render(&self, request: &GetMapRequest, bbox_wgs84: BoundingBox)
        -> anyhow::Result<Bytes>;
}

/// Deterministic in-process renderer producing a flat-color PNG.
///
/// Stands in for a real rendering backend; the bytes depend only on the
/// request dimensions and the transparent flag.
pub struct PlaceholderRenderer;

#[async_trait]
impl MapRenderer for PlaceholderRenderer {
    async fn render(
        &self,
        request: &GetMapRequest,
        _bbox_wgs84: BoundingBox,
    ) -> anyhow::Result<Bytes> {
        let png = build_png(request.width, request.height, request.transparent)?;
        Ok(Bytes::from(png))
    }
}

/// Build a single-color RGBA PNG.
fn build_png(width: u32, height: u32, transparent: bool) -> anyhow::Result<Vec<u8>> {
    let mut data = Vec::new();

    // PNG signature
    data.extend_from_slice(&[0x89, 0x50, 0x4E, 0x47, 0x0D, 0x0A, 0x1A, 0x0A]);

    // IHDR chunk
    let mut ihdr = Vec::new();
    ihdr.extend_from_slice(&width.to_be_bytes());
    ihdr.extend_from_slice(&height.to_be_bytes());
    ihdr.push(8); // bit depth
    ihdr.push(6); // color type (RGBA)
    ihdr.push(0); // compression method
    ihdr.push(0); // filter method
    ihdr.push(0); // interlace method
    write_chunk(&mut data, b"IHDR", &ihdr);

    // IDAT chunk: one filter byte per scanline, then RGBA pixels
    let pixel: [u8; 4] = if transparent {
        [0, 0, 0, 0]
    } else {
        [200, 200, 200, 255]
    };
    let mut raw = Vec::with_capacity((height as usize) * (1 + 4 * width as usize));
    for _ in 0..height {
        raw.push(0); // filter type none
        for _ in 0..width {
            raw.extend_from_slice(&pixel);
        }
    }

    let mut encoder = flate2::write::ZlibEncoder::new(Vec::new(), flate2::Compression::fast());
    encoder.write_all(&raw)?;
    let compressed = encoder.finish()?;
    write_chunk(&mut data, b"IDAT", &compressed);

    // IEND chunk
    write_chunk(&mut data, b"IEND", &[]);

    Ok(data)
}

/// Write a PNG chunk with CRC.
fn write_chunk(out: &mut Vec<u8>, name: &[u8; 4], data: &[u8]) {
    out.extend_from_slice(&(data.len() as u32).to_be_bytes());
    out.extend_from_slice(name);
    out.extend_from_slice(data);
    let mut crc_data = Vec::new();
    crc_data.extend_from_slice(name);
    crc_data.extend_from_slice(data);
    let crc = crc32fast::hash(&crc_data);
    out.extend_from_slice(&crc.to_be_bytes());
}

#[cfg(test)]
mod tests {
    use super::*;
    use ogc_common::CrsCode;

    fn sample_request(transparent: bool) -> GetMapRequest {
        GetMapRequest {
            version: "1.3.0".to_string(),
            layers: vec!["basemap".to_string()],
            styles: vec![],
            crs: CrsCode::Epsg4326,
            bbox: BoundingBox::new(-180.0, -90.0, 180.0, 90.0),
            width: 64,
            height: 64,
            format: "image/png".to_string(),
            transparent,
        }
    }

    #[test]
    fn test_png_signature_and_size() {
        let png = build_png(64, 64, false).unwrap();
        assert_eq!(&png[0..8], &[0x89, 0x50, 0x4E, 0x47, 0x0D, 0x0A, 0x1A, 0x0A]);
        assert!(png.len() > 50);
    }

    #[tokio::test]
    async fn test_render_is_deterministic() {
        let renderer = PlaceholderRenderer;
        let request = sample_request(false);
        let bbox = request.bbox;
        let a = renderer.render(&request, bbox).await.unwrap();
        let b = renderer.render(&request, bbox).await.unwrap();
        assert_eq!(a, b);
    }

    #[tokio::test]
    async fn test_transparent_flag_changes_output() {
        let renderer = PlaceholderRenderer;
        let opaque = sample_request(false);
        let clear = sample_request(true);
        let bbox = opaque.bbox;
        let a = renderer.render(&opaque, bbox).await.unwrap();
        let b = renderer.render(&clear, bbox).await.unwrap();
        assert_ne!(a, b);
    }
}
