//! Coordinate transformations between the supported CRS.
//!
//! Every transformation pivots through WGS84 lon/lat: the source CRS is
//! inverted to degrees, then the target CRS is applied. EPSG:3857 uses the
//! spherical Mercator formulas; EPSG:3395 uses the ellipsoidal formulas with
//! an iterative inverse latitude.

use crate::{BoundingBox, CrsCode, Geometry, ProtocolException, ProtocolResult};

/// WGS84 semi-major axis in meters, also the Web Mercator sphere radius.
const EARTH_RADIUS_M: f64 = 6_378_137.0;

/// WGS84 first eccentricity.
const ECCENTRICITY: f64 = 0.081_819_190_842_622;

/// Latitude clamp for Mercator projections; the poles are not representable.
const MERCATOR_MAX_LAT: f64 = 89.9999;

/// Iterations for the ellipsoidal inverse latitude series.
const INVERSE_ITERATIONS: usize = 10;

#[derive(Debug, thiserror::Error)]
pub enum TransformError {
    #[error("Coordinate out of range for {crs}: ({x}, {y})")]
    OutOfRange { crs: CrsCode, x: f64, y: f64 },

    #[error("Non-finite coordinate produced transforming ({x}, {y})")]
    NonFinite { x: f64, y: f64 },
}

/// Transform a single point between CRS.
///
/// When `from == to` the point is returned unchanged, even if it lies
/// outside the nominal valid range of the CRS.
pub fn transform_point(
    x: f64,
    y: f64,
    from: CrsCode,
    to: CrsCode,
) -> Result<(f64, f64), TransformError> {
    if from == to {
        return Ok((x, y));
    }

    let (lon, lat) = to_lonlat(x, y, from)?;
    let (tx, ty) = from_lonlat(lon, lat, to)?;

    if !tx.is_finite() || !ty.is_finite() {
        return Err(TransformError::NonFinite { x, y });
    }
    Ok((tx, ty))
}

/// Transform all four corners of a bounding box.
///
/// Failures surface as `InvalidCRS` with locator `transform_bbox`.
pub fn transform_bbox(
    bbox: &BoundingBox,
    from: CrsCode,
    to: CrsCode,
) -> ProtocolResult<BoundingBox> {
    if from == to {
        return Ok(*bbox);
    }

    let (min_x, min_y) = transform_point(bbox.min_x, bbox.min_y, from, to).map_err(|e| {
        ProtocolException::invalid_crs(
            format!("Cannot transform bbox from {from} to {to}: {e}"),
            "transform_bbox",
        )
    })?;
    let (max_x, max_y) = transform_point(bbox.max_x, bbox.max_y, from, to).map_err(|e| {
        ProtocolException::invalid_crs(
            format!("Cannot transform bbox from {from} to {to}: {e}"),
            "transform_bbox",
        )
    })?;

    Ok(BoundingBox::new(min_x, min_y, max_x, max_y))
}

/// Transform every position of a geometry, preserving its structure.
///
/// Failures surface as `InvalidGeometry` with locator `transform_geometry`.
pub fn transform_geometry(
    geometry: &Geometry,
    from: CrsCode,
    to: CrsCode,
) -> ProtocolResult<Geometry> {
    if from == to {
        return Ok(geometry.clone());
    }

    geometry
        .try_map_positions(|[x, y]| transform_point(x, y, from, to).map(|(tx, ty)| [tx, ty]))
        .map_err(|e: TransformError| {
            ProtocolException::invalid_geometry(
                format!("Cannot transform geometry from {from} to {to}: {e}"),
                "transform_geometry",
            )
        })
}

/// Invert a CRS coordinate to WGS84 lon/lat degrees.
fn to_lonlat(x: f64, y: f64, from: CrsCode) -> Result<(f64, f64), TransformError> {
    if !x.is_finite() || !y.is_finite() {
        return Err(TransformError::NonFinite { x, y });
    }

    match from {
        CrsCode::Epsg4326 | CrsCode::Crs84 => {
            if x < -180.0 || x > 180.0 || y < -90.0 || y > 90.0 {
                return Err(TransformError::OutOfRange { crs: from, x, y });
            }
            Ok((x, y))
        }
        CrsCode::Epsg3857 => {
            let lon = (x / EARTH_RADIUS_M).to_degrees();
            let lat = ((y / EARTH_RADIUS_M).exp().atan() * 2.0 - std::f64::consts::FRAC_PI_2)
                .to_degrees();
            Ok((lon, lat))
        }
        CrsCode::Epsg3395 => {
            let lon = (x / EARTH_RADIUS_M).to_degrees();
            let t = (-y / EARTH_RADIUS_M).exp();
            let mut lat = std::f64::consts::FRAC_PI_2 - 2.0 * t.atan();
            for _ in 0..INVERSE_ITERATIONS {
                let con = ECCENTRICITY * lat.sin();
                lat = std::f64::consts::FRAC_PI_2
                    - 2.0
                        * (t * ((1.0 - con) / (1.0 + con)).powf(ECCENTRICITY / 2.0)).atan();
            }
            Ok((lon, lat.to_degrees()))
        }
    }
}

/// Project WGS84 lon/lat degrees into a target CRS.
fn from_lonlat(lon: f64, lat: f64, to: CrsCode) -> Result<(f64, f64), TransformError> {
    match to {
        CrsCode::Epsg4326 | CrsCode::Crs84 => Ok((lon, lat)),
        CrsCode::Epsg3857 => {
            if lat.abs() > MERCATOR_MAX_LAT {
                return Err(TransformError::OutOfRange {
                    crs: to,
                    x: lon,
                    y: lat,
                });
            }
            let x = EARTH_RADIUS_M * lon.to_radians();
            let y = EARTH_RADIUS_M
                * ((std::f64::consts::FRAC_PI_4 + lat.to_radians() / 2.0).tan()).ln();
            Ok((x, y))
        }
        CrsCode::Epsg3395 => {
            if lat.abs() > MERCATOR_MAX_LAT {
                return Err(TransformError::OutOfRange {
                    crs: to,
                    x: lon,
                    y: lat,
                });
            }
            let phi = lat.to_radians();
            let con = ECCENTRICITY * phi.sin();
            let x = EARTH_RADIUS_M * lon.to_radians();
            let y = EARTH_RADIUS_M
                * ((std::f64::consts::FRAC_PI_4 + phi / 2.0).tan()
                    * ((1.0 - con) / (1.0 + con)).powf(ECCENTRICITY / 2.0))
                .ln();
            Ok((x, y))
        }
    }
}
