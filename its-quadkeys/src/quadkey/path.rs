//! The `QuadPath` value type.

use std::cmp::Ordering;
use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Deserializer, Serialize, Serializer};

use crate::coord::{self, TileCoord, MAX_ZOOM};
use crate::error::QuadError;
use crate::zone::QuadRegion;

/// Deepest supported path (two bits per level in a `u64`).
pub const MAX_DEPTH: u8 = MAX_ZOOM;

/// Column bit of a digit (set for the eastern quadrants 1 and 3).
pub(super) const COL_BIT: u64 = 0b01;

/// Row bit of a digit (set for the southern quadrants 2 and 3).
pub(super) const ROW_BIT: u64 = 0b10;

/// A path from the quadtree root down to one tile.
///
/// Invariant: `1 <= depth <= MAX_DEPTH` and only the low `2 * depth` bits of
/// `bits` are used, the root digit being the most significant pair.
#[derive(Clone, Copy, PartialEq, Eq, Hash)]
pub struct QuadPath {
    bits: u64,
    depth: u8,
}

impl QuadPath {
    /// Parse a path from its digit string (e.g. `"1203"`).
    ///
    /// # Errors
    ///
    /// Returns [`QuadError::InvalidPath`] if the string is empty, longer than
    /// [`MAX_DEPTH`], or contains a character outside `0`-`3`.
    pub fn new(digits: &str) -> Result<Self, QuadError> {
        Self::check_len(digits.len(), || digits.to_string())?;

        let mut bits = 0u64;
        for c in digits.chars() {
            let digit = match c {
                '0'..='3' => c as u64 - '0' as u64,
                _ => {
                    return Err(QuadError::InvalidPath(format!(
                        "'{}' contains '{}' (digits must be 0-3)",
                        digits, c
                    )))
                }
            };
            bits = (bits << 2) | digit;
        }

        Ok(Self {
            bits,
            depth: digits.len() as u8,
        })
    }

    /// Build a path from digit values (each `0..=3`).
    pub fn from_digits(digits: &[u8]) -> Result<Self, QuadError> {
        Self::check_len(digits.len(), || format!("{:?}", digits))?;

        let mut bits = 0u64;
        for &digit in digits {
            if digit > 3 {
                return Err(QuadError::InvalidPath(format!(
                    "{:?} contains {} (digits must be 0-3)",
                    digits, digit
                )));
            }
            bits = (bits << 2) | digit as u64;
        }

        Ok(Self {
            bits,
            depth: digits.len() as u8,
        })
    }

    /// Locate the tile containing a position at the given depth.
    ///
    /// Longitude wraps and latitude clamps to the Web Mercator limit, so
    /// any finite position yields a path.
    ///
    /// # Errors
    ///
    /// Returns [`QuadError::InvalidPath`] for `depth < 1`, `depth > MAX_DEPTH`
    /// or a non-finite coordinate.
    pub fn from_position(lat: f64, lon: f64, depth: u8) -> Result<Self, QuadError> {
        let tile = coord::to_tile_coords(lat, lon, depth)?;
        Self::from_tile(tile)
    }

    /// Encode tile coordinates by interleaving row and column bits.
    pub fn from_tile(tile: TileCoord) -> Result<Self, QuadError> {
        if tile.zoom == 0 || !tile.is_valid() {
            return Err(QuadError::InvalidPath(format!(
                "tile {} is outside the grid",
                tile
            )));
        }

        let mut bits = 0u64;
        for level in (0..tile.zoom).rev() {
            let col = (tile.col as u64 >> level) & 1;
            let row = (tile.row as u64 >> level) & 1;
            bits = (bits << 2) | (row << 1) | col;
        }

        Ok(Self {
            bits,
            depth: tile.zoom,
        })
    }

    /// Build a path from already-packed bits. Caller upholds the invariant.
    #[inline]
    pub(crate) fn from_parts(bits: u64, depth: u8) -> Self {
        debug_assert!((1..=MAX_DEPTH).contains(&depth));
        Self { bits, depth }
    }

    fn check_len(len: usize, shown: impl FnOnce() -> String) -> Result<(), QuadError> {
        if len == 0 {
            return Err(QuadError::InvalidPath("path is empty".to_string()));
        }
        if len > MAX_DEPTH as usize {
            return Err(QuadError::InvalidPath(format!(
                "{} is {} levels deep (max {})",
                shown(),
                len,
                MAX_DEPTH
            )));
        }
        Ok(())
    }

    /// Number of digits in the path.
    #[inline]
    pub fn depth(&self) -> u8 {
        self.depth
    }

    #[inline]
    pub(crate) fn bits(&self) -> u64 {
        self.bits
    }

    /// The digit at `index` (0 is the root level).
    pub fn digit(&self, index: u8) -> Option<u8> {
        if index >= self.depth {
            return None;
        }
        let shift = 2 * (self.depth - 1 - index) as u32;
        Some(((self.bits >> shift) & 0b11) as u8)
    }

    /// Iterate the digits from the root down.
    pub fn digits(&self) -> impl Iterator<Item = u8> + '_ {
        (0..self.depth).filter_map(move |i| self.digit(i))
    }

    /// Decode the path back into tile coordinates.
    pub fn to_tile(&self) -> TileCoord {
        let mut row = 0u32;
        let mut col = 0u32;
        for digit in self.digits() {
            col = (col << 1) | (digit as u64 & COL_BIT) as u32;
            row = (row << 1) | ((digit as u64 & ROW_BIT) >> 1) as u32;
        }
        TileCoord::new(row, col, self.depth)
    }

    /// Geographic centre of the tile as `(lat, lon)`.
    pub fn center(&self) -> (f64, f64) {
        coord::tile_to_lat_lon_center(&self.to_tile())
    }

    /// True if `self` is a prefix of `other`, i.e. `other` lies inside this tile.
    ///
    /// Every path contains itself.
    #[inline]
    pub fn contains(&self, other: &QuadPath) -> bool {
        self.depth <= other.depth && other.truncate(self.depth).bits == self.bits
    }

    /// True if one of the two paths contains the other.
    #[inline]
    pub fn intersects(&self, other: &QuadPath) -> bool {
        self.contains(other) || other.contains(self)
    }

    /// The parent path, or `None` for a top-level tile.
    pub fn root(&self) -> Option<QuadPath> {
        (self.depth > 1).then(|| self.truncate(self.depth - 1))
    }

    /// Keep only the first `depth` digits. `depth` must be in `1..=self.depth`.
    #[inline]
    pub(crate) fn truncate(&self, depth: u8) -> QuadPath {
        let shift = 2 * (self.depth - depth) as u32;
        QuadPath {
            bits: self.bits >> shift,
            depth,
        }
    }

    /// Shorten the path.
    ///
    /// A selector `<= 0` drops that many trailing digits; a positive selector
    /// is the absolute depth to truncate to. The result is clamped between
    /// depth 1 and the current depth, so this never extends a path.
    pub fn make_shallower(&self, depth_selector: i64) -> QuadPath {
        let current = self.depth as i64;
        let target = if depth_selector <= 0 {
            current.saturating_add(depth_selector)
        } else {
            depth_selector
        };
        self.truncate(target.clamp(1, current) as u8)
    }

    /// The four direct children in quadrant order, or `None` at [`MAX_DEPTH`].
    pub fn children(&self) -> Option<[QuadPath; 4]> {
        if self.depth >= MAX_DEPTH {
            return None;
        }
        let base = self.bits << 2;
        let depth = self.depth + 1;
        Some([0, 1, 2, 3].map(|d| QuadPath { bits: base | d, depth }))
    }

    /// Expand into every descendant at a deeper level.
    ///
    /// Exactly one of `target_depth` (absolute) and `extra_depth` (relative)
    /// must be given. The result holds `4^k` paths where `k` is the number
    /// of extra levels; a target equal to the current depth yields the path
    /// itself.
    ///
    /// # Errors
    ///
    /// [`QuadError::InvalidDepthRequest`] when both or neither parameter is
    /// given, `extra_depth` is zero, the target is shallower than the path,
    /// or the target exceeds [`MAX_DEPTH`].
    pub fn split(
        &self,
        target_depth: Option<u8>,
        extra_depth: Option<u8>,
    ) -> Result<QuadRegion, QuadError> {
        let target = match (target_depth, extra_depth) {
            (Some(target), None) => target as u32,
            (None, Some(0)) => {
                return Err(QuadError::InvalidDepthRequest(
                    "extra_depth must be positive".to_string(),
                ))
            }
            (None, Some(extra)) => self.depth as u32 + extra as u32,
            (Some(_), Some(_)) => {
                return Err(QuadError::InvalidDepthRequest(
                    "give either target_depth or extra_depth, not both".to_string(),
                ))
            }
            (None, None) => {
                return Err(QuadError::InvalidDepthRequest(
                    "one of target_depth or extra_depth is required".to_string(),
                ))
            }
        };

        if target < self.depth as u32 {
            return Err(QuadError::InvalidDepthRequest(format!(
                "cannot split {} (depth {}) to shallower depth {}",
                self, self.depth, target
            )));
        }
        if target > MAX_DEPTH as u32 {
            return Err(QuadError::InvalidDepthRequest(format!(
                "depth {} exceeds maximum {}",
                target, MAX_DEPTH
            )));
        }

        Ok(self.descendants(target as u8).collect())
    }

    /// Split to an absolute depth. Shorthand for `split(Some(depth), None)`.
    pub fn split_to(&self, target_depth: u8) -> Result<QuadRegion, QuadError> {
        self.split(Some(target_depth), None)
    }

    /// Split by a number of extra levels. Shorthand for `split(None, Some(extra))`.
    pub fn split_by(&self, extra_depth: u8) -> Result<QuadRegion, QuadError> {
        self.split(None, Some(extra_depth))
    }

    /// All descendants at `depth` in lexicographic order. `depth` must be in
    /// `self.depth..=MAX_DEPTH`.
    pub(crate) fn descendants(&self, depth: u8) -> impl Iterator<Item = QuadPath> {
        let extra = 2 * (depth - self.depth) as u32;
        let base = self.bits << extra;
        let count = 1u64 << extra;
        (0..count).map(move |suffix| QuadPath {
            bits: base | suffix,
            depth,
        })
    }

    /// Render the digits joined by `separator`.
    ///
    /// An empty separator gives the compact form, `"/"` gives an MQTT topic
    /// suffix.
    pub fn to_str(&self, separator: &str) -> String {
        let mut out = String::with_capacity(self.depth as usize * (1 + separator.len()));
        for (i, digit) in self.digits().enumerate() {
            if i > 0 {
                out.push_str(separator);
            }
            out.push(char::from(b'0' + digit));
        }
        out
    }

    /// Digits left-aligned in the full 64-bit word; used for ordering.
    #[inline]
    fn aligned(&self) -> u64 {
        self.bits << (2 * (MAX_DEPTH - self.depth) as u32)
    }
}

/// Lexicographic by digit string: a path sorts right before its descendants.
impl Ord for QuadPath {
    fn cmp(&self, other: &Self) -> Ordering {
        self.aligned()
            .cmp(&other.aligned())
            .then(self.depth.cmp(&other.depth))
    }
}

impl PartialOrd for QuadPath {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl fmt::Display for QuadPath {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.to_str(""))
    }
}

impl fmt::Debug for QuadPath {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "QuadPath(\"{}\")", self)
    }
}

impl FromStr for QuadPath {
    type Err = QuadError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::new(s)
    }
}

impl TryFrom<&str> for QuadPath {
    type Error = QuadError;

    fn try_from(value: &str) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}

impl TryFrom<String> for QuadPath {
    type Error = QuadError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::new(&value)
    }
}

impl TryFrom<&[u8]> for QuadPath {
    type Error = QuadError;

    fn try_from(value: &[u8]) -> Result<Self, Self::Error> {
        Self::from_digits(value)
    }
}

impl Serialize for QuadPath {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&self.to_string())
    }
}

impl<'de> Deserialize<'de> for QuadPath {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let digits = String::deserialize(deserializer)?;
        QuadPath::new(&digits).map_err(serde::de::Error::custom)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn qp(s: &str) -> QuadPath {
        QuadPath::new(s).unwrap()
    }

    #[test]
    fn test_parse_and_display() {
        let path = qp("12030213");
        assert_eq!(path.depth(), 8);
        assert_eq!(path.to_string(), "12030213");
        assert_eq!(path.to_str("/"), "1/2/0/3/0/2/1/3");
        assert_eq!(path.to_str(""), "12030213");
    }

    #[test]
    fn test_empty_path_rejected() {
        assert!(matches!(QuadPath::new(""), Err(QuadError::InvalidPath(_))));
        assert!(matches!(
            QuadPath::from_digits(&[]),
            Err(QuadError::InvalidPath(_))
        ));
    }

    #[test]
    fn test_invalid_digit_rejected() {
        for bad in ["4", "1204", "12a", "1 2", "-1"] {
            assert!(
                matches!(QuadPath::new(bad), Err(QuadError::InvalidPath(_))),
                "{:?} should be rejected",
                bad
            );
        }
        assert!(QuadPath::from_digits(&[1, 2, 4]).is_err());
    }

    #[test]
    fn test_max_depth() {
        let deepest = "3".repeat(MAX_DEPTH as usize);
        let path = qp(&deepest);
        assert_eq!(path.depth(), MAX_DEPTH);
        assert_eq!(path.to_string(), deepest);
        assert!(path.children().is_none());

        let too_deep = "0".repeat(MAX_DEPTH as usize + 1);
        assert!(QuadPath::new(&too_deep).is_err());
    }

    #[test]
    fn test_from_digits_matches_string() {
        assert_eq!(QuadPath::from_digits(&[1, 2, 0, 3]).unwrap(), qp("1203"));
        let digits: &[u8] = &[0, 0, 3];
        assert_eq!(QuadPath::try_from(digits).unwrap(), qp("003"));
    }

    #[test]
    fn test_from_digits_error_messages() {
        let too_deep = [1u8; 33];
        let err = QuadPath::from_digits(&too_deep).unwrap_err().to_string();
        assert!(err.starts_with("Invalid quadkey path: [1, 1, "), "{}", err);
        assert!(err.ends_with("is 33 levels deep (max 32)"), "{}", err);

        let err = QuadPath::from_digits(&[]).unwrap_err().to_string();
        assert_eq!(err, "Invalid quadkey path: path is empty");

        let err = QuadPath::from_digits(&[1, 4]).unwrap_err().to_string();
        assert_eq!(err, "Invalid quadkey path: [1, 4] contains 4 (digits must be 0-3)");

        let err = QuadPath::new(&"2".repeat(33)).unwrap_err().to_string();
        assert!(err.contains(&format!("{} is 33 levels deep", "2".repeat(33))));
    }

    #[test]
    fn test_digit_access() {
        let path = qp("1203");
        assert_eq!(path.digits().collect::<Vec<_>>(), vec![1, 2, 0, 3]);
        assert_eq!(path.digit(0), Some(1));
        assert_eq!(path.digit(3), Some(3));
        assert_eq!(path.digit(4), None);
    }

    #[test]
    fn test_from_position_toulouse() {
        let path = QuadPath::from_position(43.63516355648167, 1.3744570239910097, 22).unwrap();
        assert_eq!(path.to_str("/"), "1/2/0/2/2/2/0/2/1/3/3/3/1/0/3/0/0/0/3/3/2/1");
    }

    #[test]
    fn test_from_position_depth_zero_rejected() {
        assert!(matches!(
            QuadPath::from_position(0.0, 0.0, 0),
            Err(QuadError::InvalidPath(_))
        ));
    }

    #[test]
    fn test_from_position_quadrants() {
        assert_eq!(QuadPath::from_position(45.0, -90.0, 1).unwrap(), qp("0"));
        assert_eq!(QuadPath::from_position(45.0, 90.0, 1).unwrap(), qp("1"));
        assert_eq!(QuadPath::from_position(-45.0, -90.0, 1).unwrap(), qp("2"));
        assert_eq!(QuadPath::from_position(-45.0, 90.0, 1).unwrap(), qp("3"));
    }

    #[test]
    fn test_from_position_normalizes() {
        // Beyond the pole clamps to the top row, 360° of longitude wraps
        assert_eq!(
            QuadPath::from_position(91.0, 10.0, 6).unwrap(),
            QuadPath::from_position(85.0511, 10.0, 6).unwrap()
        );
        assert_eq!(
            QuadPath::from_position(12.0, 370.0, 10).unwrap(),
            QuadPath::from_position(12.0, 10.0, 10).unwrap()
        );
    }

    #[test]
    fn test_tile_roundtrip() {
        let path = qp("1202220213331030003321");
        let tile = path.to_tile();
        assert_eq!(tile.zoom, 22);
        assert_eq!(QuadPath::from_tile(tile).unwrap(), path);
    }

    #[test]
    fn test_from_tile_out_of_grid() {
        assert!(QuadPath::from_tile(TileCoord::new(4, 0, 2)).is_err());
        assert!(QuadPath::from_tile(TileCoord::new(0, 0, 0)).is_err());
    }

    #[test]
    fn test_contains_is_prefix() {
        let parent = qp("120");
        assert!(parent.contains(&qp("120")));
        assert!(parent.contains(&qp("1203")));
        assert!(parent.contains(&qp("12000000")));
        assert!(!parent.contains(&qp("12")));
        assert!(!parent.contains(&qp("121")));
        assert!(!parent.contains(&qp("0120")));
        assert!(parent.intersects(&qp("12")));
        assert!(!parent.intersects(&qp("13")));
    }

    #[test]
    fn test_root() {
        assert_eq!(qp("1203").root(), Some(qp("120")));
        assert_eq!(qp("12").root(), Some(qp("1")));
        assert_eq!(qp("1").root(), None);
    }

    #[test]
    fn test_make_shallower() {
        let path = qp("12030213");
        assert_eq!(path.make_shallower(-5), qp("120"));
        assert_eq!(path.make_shallower(100), path);
        assert_eq!(path.make_shallower(0), path);
        assert_eq!(path.make_shallower(-100), qp("1"));
        assert_eq!(path.make_shallower(i64::MIN), qp("1"));
        assert_eq!(path.make_shallower(3), qp("120"));
        assert_eq!(path.make_shallower(1), qp("1"));
        assert_eq!(path.make_shallower(8), path);
    }

    #[test]
    fn test_children() {
        let children = qp("12").children().unwrap();
        assert_eq!(children, [qp("120"), qp("121"), qp("122"), qp("123")]);
    }

    #[test]
    fn test_split_target_and_extra() {
        let path = qp("12");
        let by_target = path.split(Some(4), None).unwrap();
        let by_extra = path.split(None, Some(2)).unwrap();
        assert_eq!(by_target.len(), 16);
        assert_eq!(by_target, by_extra);
        assert!(by_target.iter().all(|p| path.contains(p) && p.depth() == 4));

        assert_eq!(path.split_to(2).unwrap().to_strings(), vec!["12"]);
    }

    #[test]
    fn test_split_invalid_requests() {
        let path = qp("12");
        for result in [
            path.split(None, None),
            path.split(Some(4), Some(2)),
            path.split(None, Some(0)),
            path.split(Some(1), None),
            path.split(Some(MAX_DEPTH + 1), None),
        ] {
            assert!(matches!(result, Err(QuadError::InvalidDepthRequest(_))));
        }
    }

    #[test]
    fn test_ordering_is_lexicographic() {
        let mut paths = vec![qp("2"), qp("11"), qp("1"), qp("10"), qp("103"), qp("0333")];
        paths.sort();
        let rendered: Vec<String> = paths.iter().map(|p| p.to_string()).collect();
        assert_eq!(rendered, vec!["0333", "1", "10", "103", "11", "2"]);
    }

    #[test]
    fn test_serde_as_string() {
        let path = qp("1203");
        let json = serde_json::to_string(&path).unwrap();
        assert_eq!(json, "\"1203\"");
        let back: QuadPath = serde_json::from_str(&json).unwrap();
        assert_eq!(back, path);
        assert!(serde_json::from_str::<QuadPath>("\"125\"").is_err());
    }

    mod property_tests {
        use super::*;
        use proptest::prelude::*;

        fn path_string() -> impl Strategy<Value = String> {
            "[0-3]{1,20}"
        }

        proptest! {
            #[test]
            fn test_contains_iff_prefix(a in path_string(), b in path_string()) {
                let pa = qp(&a);
                let pb = qp(&b);
                prop_assert_eq!(pa.contains(&pb), b.starts_with(&a));
            }

            #[test]
            fn test_display_roundtrip(s in path_string()) {
                prop_assert_eq!(qp(&s).to_string(), s);
            }

            #[test]
            fn test_ordering_matches_strings(a in path_string(), b in path_string()) {
                prop_assert_eq!(qp(&a).cmp(&qp(&b)), a.cmp(&b));
            }

            #[test]
            fn test_split_members_contained(s in "[0-3]{1,8}", extra in 1u8..=3) {
                let path = qp(&s);
                let zone = path.split_by(extra)?;
                prop_assert_eq!(zone.len(), 4usize.pow(extra as u32));
                prop_assert_eq!(&zone, &path.split_to(path.depth() + extra)?);
                for member in zone.iter() {
                    prop_assert!(path.contains(member));
                    prop_assert_eq!(member.root().map(|r| r.depth()), Some(member.depth() - 1));
                }
            }

            #[test]
            fn test_tile_roundtrip(s in path_string()) {
                let path = qp(&s);
                prop_assert_eq!(QuadPath::from_tile(path.to_tile())?, path);
            }

            #[test]
            fn test_center_maps_back(s in "[0-3]{1,18}") {
                let path = qp(&s);
                let (lat, lon) = path.center();
                prop_assert_eq!(QuadPath::from_position(lat, lon, path.depth())?, path);
            }
        }
    }
}
