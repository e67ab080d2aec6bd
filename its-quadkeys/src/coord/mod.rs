//! Coordinate conversion module
//!
//! Provides conversions between geographic coordinates (latitude/longitude)
//! and Web Mercator tile coordinates. This is the leaf of the quadtree
//! engine: [`crate::quadkey::QuadPath`] interleaves the row/col bits
//! produced here into its digit sequence.
//!
//! Unlike a strict projection, out-of-range positions are normalized rather
//! than rejected: longitude wraps into `[-180, 180)` and latitude is clamped
//! to the Web Mercator limit, so a position at the pole lands in the
//! northern- or southern-most tile row.

mod types;

pub use types::{TileCoord, MAX_LAT, MAX_LON, MAX_ZOOM, MIN_LAT, MIN_LON};

use std::f64::consts::PI;

use thiserror::Error;

/// Errors that can occur during coordinate conversion.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum CoordError {
    /// Latitude or longitude is NaN or infinite.
    #[error("Non-finite coordinate: ({lat}, {lon})")]
    NonFinite { lat: f64, lon: f64 },

    /// Zoom level is outside the supported range.
    #[error("Invalid zoom level: {0} (must be between 1 and 32)")]
    InvalidZoom(u8),
}

/// Wraps a longitude into `[-180, 180)`.
#[inline]
pub fn wrap_longitude(lon: f64) -> f64 {
    (lon - MIN_LON).rem_euclid(MAX_LON - MIN_LON) + MIN_LON
}

/// Clamps a latitude to the Web Mercator range.
#[inline]
pub fn clamp_latitude(lat: f64) -> f64 {
    lat.clamp(MIN_LAT, MAX_LAT)
}

/// Converts geographic coordinates to tile coordinates.
///
/// # Arguments
///
/// * `lat` - Latitude in degrees, clamped to ±85.05112878
/// * `lon` - Longitude in degrees, wrapped into -180.0..180.0
/// * `zoom` - Zoom level (1 to 32)
///
/// # Returns
///
/// A `Result` containing the tile coordinates, or an error if the input is
/// not finite or the zoom level is unsupported.
#[inline]
pub fn to_tile_coords(lat: f64, lon: f64, zoom: u8) -> Result<TileCoord, CoordError> {
    if !lat.is_finite() || !lon.is_finite() {
        return Err(CoordError::NonFinite { lat, lon });
    }
    if zoom == 0 || zoom > MAX_ZOOM {
        return Err(CoordError::InvalidZoom(zoom));
    }

    let lat = clamp_latitude(lat);
    let lon = wrap_longitude(lon);

    // Calculate number of tiles at this zoom level
    let n = (1u64 << zoom) as f64;
    let last = (1u64 << zoom) - 1;

    // Convert longitude to tile X coordinate
    let col = (((lon - MIN_LON) / 360.0 * n).floor().max(0.0) as u64).min(last);

    // Convert latitude to tile Y coordinate using Web Mercator projection
    let lat_rad = lat.to_radians();
    let row = ((((1.0 - lat_rad.tan().asinh() / PI) / 2.0) * n).floor().max(0.0) as u64).min(last);

    Ok(TileCoord {
        row: row as u32,
        col: col as u32,
        zoom,
    })
}

/// Converts tile coordinates back to geographic coordinates.
///
/// Returns the latitude/longitude of the tile's northwest corner.
#[inline]
pub fn tile_to_lat_lon(tile: &TileCoord) -> (f64, f64) {
    fractional_to_lat_lon(tile.row as f64, tile.col as f64, tile.zoom)
}

/// Converts tile coordinates to the geographic centre of the tile.
#[inline]
pub fn tile_to_lat_lon_center(tile: &TileCoord) -> (f64, f64) {
    fractional_to_lat_lon(tile.row as f64 + 0.5, tile.col as f64 + 0.5, tile.zoom)
}

fn fractional_to_lat_lon(row: f64, col: f64, zoom: u8) -> (f64, f64) {
    let n = (1u64 << zoom) as f64;

    // Convert tile X coordinate to longitude
    let lon = col / n * 360.0 + MIN_LON;

    // Convert tile Y coordinate to latitude using inverse Web Mercator
    let y = row / n;
    let lat = (PI * (1.0 - 2.0 * y)).sinh().atan().to_degrees();

    (lat, lon)
}
