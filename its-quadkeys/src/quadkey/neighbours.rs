//! Same-depth neighbour computation.
//!
//! Moving one tile along an axis rewrites digits from the deepest level up,
//! like a binary increment on that axis: each digit that has to cross its
//! parent's edge flips and carries into the parent, the first digit that
//! does not cross flips and stops. A carry out of the root digit means the
//! move left the grid: east/west wrap around the antimeridian, north/south
//! have no neighbour beyond the pole rows.

use std::ops::Index;

use super::path::{QuadPath, COL_BIT, ROW_BIT};

/// The eight compass directions around a tile.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum Direction {
    NorthWest,
    North,
    NorthEast,
    West,
    East,
    SouthWest,
    South,
    SouthEast,
}

impl Direction {
    /// All directions, row by row from the north-west.
    pub const ALL: [Direction; 8] = [
        Direction::NorthWest,
        Direction::North,
        Direction::NorthEast,
        Direction::West,
        Direction::East,
        Direction::SouthWest,
        Direction::South,
        Direction::SouthEast,
    ];

    /// Row and column offsets `(d_row, d_col)`; row grows southward.
    pub fn offset(&self) -> (i8, i8) {
        match self {
            Direction::NorthWest => (-1, -1),
            Direction::North => (-1, 0),
            Direction::NorthEast => (-1, 1),
            Direction::West => (0, -1),
            Direction::East => (0, 1),
            Direction::SouthWest => (1, -1),
            Direction::South => (1, 0),
            Direction::SouthEast => (1, 1),
        }
    }

    /// The direction pointing the other way.
    pub fn opposite(&self) -> Direction {
        match self {
            Direction::NorthWest => Direction::SouthEast,
            Direction::North => Direction::South,
            Direction::NorthEast => Direction::SouthWest,
            Direction::West => Direction::East,
            Direction::East => Direction::West,
            Direction::SouthWest => Direction::NorthEast,
            Direction::South => Direction::North,
            Direction::SouthEast => Direction::NorthWest,
        }
    }

    /// Short compass label (`"NW"`, `"N"`, ...).
    pub fn label(&self) -> &'static str {
        match self {
            Direction::NorthWest => "NW",
            Direction::North => "N",
            Direction::NorthEast => "NE",
            Direction::West => "W",
            Direction::East => "E",
            Direction::SouthWest => "SW",
            Direction::South => "S",
            Direction::SouthEast => "SE",
        }
    }
}

impl std::fmt::Display for Direction {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.label())
    }
}

/// The eight same-depth neighbours of a path.
///
/// A `None` entry means there is no tile in that direction (beyond a pole).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Neighbours {
    pub north_west: Option<QuadPath>,
    pub north: Option<QuadPath>,
    pub north_east: Option<QuadPath>,
    pub west: Option<QuadPath>,
    pub east: Option<QuadPath>,
    pub south_west: Option<QuadPath>,
    pub south: Option<QuadPath>,
    pub south_east: Option<QuadPath>,
}

impl Neighbours {
    /// The neighbour in one direction.
    pub fn get(&self, direction: Direction) -> Option<QuadPath> {
        self[direction]
    }

    /// Every direction with its (possibly missing) neighbour.
    pub fn iter(&self) -> impl Iterator<Item = (Direction, Option<QuadPath>)> + '_ {
        Direction::ALL.into_iter().map(move |d| (d, self[d]))
    }

    /// Only the neighbours that exist.
    pub fn present(&self) -> impl Iterator<Item = (Direction, QuadPath)> + '_ {
        self.iter().filter_map(|(d, p)| p.map(|p| (d, p)))
    }
}

impl Index<Direction> for Neighbours {
    type Output = Option<QuadPath>;

    fn index(&self, direction: Direction) -> &Self::Output {
        match direction {
            Direction::NorthWest => &self.north_west,
            Direction::North => &self.north,
            Direction::NorthEast => &self.north_east,
            Direction::West => &self.west,
            Direction::East => &self.east,
            Direction::SouthWest => &self.south_west,
            Direction::South => &self.south,
            Direction::SouthEast => &self.south_east,
        }
    }
}

impl QuadPath {
    /// The same-depth neighbour in `direction`.
    ///
    /// Returns `None` north of the top row or south of the bottom row.
    /// East and west always exist, wrapping around the globe.
    pub fn neighbour(&self, direction: Direction) -> Option<QuadPath> {
        let (d_row, d_col) = direction.offset();
        let mut path = *self;
        if d_row != 0 {
            path = path.step(ROW_BIT, d_row > 0)?;
        }
        if d_col != 0 {
            path = path.step(COL_BIT, d_col > 0)?;
        }
        Some(path)
    }

    /// All eight same-depth neighbours.
    pub fn neighbours(&self) -> Neighbours {
        Neighbours {
            north_west: self.neighbour(Direction::NorthWest),
            north: self.neighbour(Direction::North),
            north_east: self.neighbour(Direction::NorthEast),
            west: self.neighbour(Direction::West),
            east: self.neighbour(Direction::East),
            south_west: self.neighbour(Direction::SouthWest),
            south: self.neighbour(Direction::South),
            south_east: self.neighbour(Direction::SouthEast),
        }
    }

    /// Move one tile along the axis selected by `axis_bit`.
    ///
    /// `forward` is eastward for the column axis and southward for the row
    /// axis.
    fn step(&self, axis_bit: u64, forward: bool) -> Option<QuadPath> {
        let mut bits = self.bits();
        for level in 0..self.depth() as u32 {
            let mask = axis_bit << (2 * level);
            let was_set = bits & mask != 0;
            bits ^= mask;
            // Forward stops on a digit that was on the near side of its parent
            if was_set != forward {
                return Some(QuadPath::from_parts(bits, self.depth()));
            }
        }

        // Carried out of the root digit
        (axis_bit == COL_BIT).then(|| QuadPath::from_parts(bits, self.depth()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn qp(s: &str) -> QuadPath {
        QuadPath::new(s).unwrap()
    }

    fn rendered(n: &Neighbours) -> Vec<(&'static str, Option<String>)> {
        n.iter()
            .map(|(d, p)| (d.label(), p.map(|p| p.to_string())))
            .collect()
    }

    fn some(s: &str) -> Option<String> {
        Some(s.to_string())
    }

    #[test]
    fn test_neighbours_interior_tile() {
        let n = qp("12030213").neighbours();
        assert_eq!(
            rendered(&n),
            vec![
                ("NW", some("12030210")),
                ("N", some("12030211")),
                ("NE", some("12030300")),
                ("W", some("12030212")),
                ("E", some("12030302")),
                ("SW", some("12030230")),
                ("S", some("12030231")),
                ("SE", some("12030320")),
            ]
        );
    }

    #[test]
    fn test_neighbours_of_top_level_tile() {
        let n = qp("0").neighbours();
        assert_eq!(n.north_west, None);
        assert_eq!(n.north, None);
        assert_eq!(n.north_east, None);
        assert_eq!(n.west, Some(qp("1")));
        assert_eq!(n.east, Some(qp("1")));
        assert_eq!(n.south_west, Some(qp("3")));
        assert_eq!(n.south, Some(qp("2")));
        assert_eq!(n.south_east, Some(qp("3")));
    }

    #[test]
    fn test_south_pole_row_has_no_south() {
        let n = qp("3233").neighbours();
        assert_eq!(n.south, None);
        assert_eq!(n.south_west, None);
        assert_eq!(n.south_east, None);
        assert_eq!(n.north, Some(qp("3231")));
    }

    #[test]
    fn test_antimeridian_wrap() {
        // Eastern-most column wraps to the western-most one
        assert_eq!(qp("1311").neighbour(Direction::East), Some(qp("0200")));
        assert_eq!(qp("0200").neighbour(Direction::West), Some(qp("1311")));
    }

    #[test]
    fn test_present_skips_missing() {
        let n = qp("01").neighbours();
        let dirs: Vec<Direction> = n.present().map(|(d, _)| d).collect();
        assert_eq!(
            dirs,
            vec![
                Direction::West,
                Direction::East,
                Direction::SouthWest,
                Direction::South,
                Direction::SouthEast
            ]
        );
    }

    #[test]
    fn test_matches_tile_arithmetic() {
        let path = qp("1202220213331030003321");
        let tile = path.to_tile();
        let east = path.neighbour(Direction::East).unwrap().to_tile();
        let south = path.neighbour(Direction::South).unwrap().to_tile();
        assert_eq!((east.row, east.col), (tile.row, tile.col + 1));
        assert_eq!((south.row, south.col), (tile.row + 1, tile.col));
    }

    #[test]
    fn test_direction_opposites() {
        for d in Direction::ALL {
            assert_eq!(d.opposite().opposite(), d);
            let (r, c) = d.offset();
            assert_eq!(d.opposite().offset(), (-r, -c));
        }
    }

    mod property_tests {
        use super::*;
        use proptest::prelude::*;

        proptest! {
            #[test]
            fn test_neighbour_symmetry(s in "[0-3]{1,20}") {
                let path = qp(&s);
                for (direction, neighbour) in path.neighbours().present() {
                    prop_assert_eq!(
                        neighbour.neighbour(direction.opposite()),
                        Some(path),
                        "{} {} of {}",
                        neighbour,
                        direction,
                        path
                    );
                    prop_assert_eq!(neighbour.depth(), path.depth());
                }
            }

            #[test]
            fn test_neighbour_offsets_match_tiles(s in "[0-3]{2,20}") {
                let path = qp(&s);
                let tile = path.to_tile();
                let size = 1i64 << path.depth();
                for (direction, neighbour) in path.neighbours().iter() {
                    let (d_row, d_col) = direction.offset();
                    let row = tile.row as i64 + d_row as i64;
                    if !(0..size).contains(&row) {
                        prop_assert!(neighbour.is_none());
                        continue;
                    }
                    let col = (tile.col as i64 + d_col as i64).rem_euclid(size);
                    let got = neighbour.map(|n| n.to_tile());
                    prop_assert_eq!(got.map(|t| (t.row as i64, t.col as i64)), Some((row, col)));
                }
            }
        }
    }
}
