//! Coordinate type definitions

/// Web Mercator valid latitude range
pub const MIN_LAT: f64 = -85.05112878;
pub const MAX_LAT: f64 = 85.05112878;

/// Valid longitude range (upper bound exclusive)
pub const MIN_LON: f64 = -180.0;
pub const MAX_LON: f64 = 180.0;

/// Deepest zoom level representable by a packed quadtree path.
pub const MAX_ZOOM: u8 = 32;

/// Tile coordinates in the Web Mercator / Slippy Map system.
///
/// `row` grows southward and `col` grows eastward, both starting at zero
/// in the north-west corner of the world.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct TileCoord {
    /// Y coordinate (north-south), 0 at north
    pub row: u32,
    /// X coordinate (east-west), 0 at west
    pub col: u32,
    /// Zoom level (1-32)
    pub zoom: u8,
}

impl TileCoord {
    /// Create a new tile coordinate.
    pub fn new(row: u32, col: u32, zoom: u8) -> Self {
        Self { row, col, zoom }
    }

    /// Number of tiles along one axis at this zoom level.
    #[inline]
    pub fn axis_len(&self) -> u64 {
        1u64 << self.zoom
    }

    /// Returns true if row and col both fall inside the grid.
    pub fn is_valid(&self) -> bool {
        self.zoom <= MAX_ZOOM
            && (self.row as u64) < self.axis_len()
            && (self.col as u64) < self.axis_len()
    }
}

impl std::fmt::Display for TileCoord {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}_{}@ZL{}", self.row, self.col, self.zoom)
    }
}
