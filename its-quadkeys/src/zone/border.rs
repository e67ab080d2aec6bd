//! Region-level neighbours: the ring of tiles around a region.

use std::cmp::Ordering;
use std::collections::BTreeSet;

use super::QuadRegion;
use crate::quadkey::{Direction, QuadPath, MAX_DEPTH};

impl QuadRegion {
    /// Tiles bordering the region, expressed at `depth`.
    ///
    /// For every member, each existing same-depth neighbour that the region
    /// does not already cover is converted to the requested depth:
    ///
    /// - same depth: kept as is
    /// - deeper: only the descendants along the edge shared with the member
    ///   are kept (the eastern column of a western neighbour, the single
    ///   south-east corner of a north-western one, ...)
    /// - shallower: truncated with [`QuadPath::make_shallower`]; several
    ///   neighbours may collapse onto the same coarse tile, and that tile may
    ///   overlap other members of the region
    ///
    /// `depth` is clamped into `1..=MAX_DEPTH`. The result is not optimised.
    pub fn neighbours(&self, depth: u8) -> QuadRegion {
        let depth = depth.clamp(1, MAX_DEPTH);
        let mut paths = BTreeSet::new();

        for member in &self.paths {
            for (direction, neighbour) in member.neighbours().present() {
                if self.contains(&neighbour) {
                    continue;
                }
                match depth.cmp(&neighbour.depth()) {
                    Ordering::Equal => {
                        paths.insert(neighbour);
                    }
                    Ordering::Less => {
                        paths.insert(neighbour.make_shallower(depth as i64));
                    }
                    Ordering::Greater => {
                        paths.extend(
                            edge_descendants(neighbour, direction, depth)
                                .filter(|p| !self.contains(p)),
                        );
                    }
                }
            }
        }

        QuadRegion { paths }
    }
}

/// Descendants of `neighbour` at `depth` touching the member it neighbours.
///
/// `direction` points from the member to `neighbour`, so the shared edge is
/// on the neighbour's opposite side.
fn edge_descendants(
    neighbour: QuadPath,
    direction: Direction,
    depth: u8,
) -> impl Iterator<Item = QuadPath> {
    let extra = depth - neighbour.depth();
    let last = (1u64 << extra) - 1;
    let (d_row, d_col) = direction.offset();

    let rows = match d_row {
        -1 => last..=last,
        1 => 0..=0,
        _ => 0..=last,
    };
    let cols = match d_col {
        -1 => last..=last,
        1 => 0..=0,
        _ => 0..=last,
    };

    rows.flat_map(move |row| {
        cols.clone()
            .map(move |col| descendant_at(neighbour, row, col, extra))
    })
}

/// The descendant `extra` levels down at sub-grid position `(row, col)`.
fn descendant_at(path: QuadPath, row: u64, col: u64, extra: u8) -> QuadPath {
    let mut suffix = 0u64;
    for level in (0..extra as u32).rev() {
        let digit = (((row >> level) & 1) << 1) | ((col >> level) & 1);
        suffix = (suffix << 2) | digit;
    }
    QuadPath::from_parts(
        (path.bits() << (2 * extra as u32)) | suffix,
        path.depth() + extra,
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    fn zone(paths: &[&str]) -> QuadRegion {
        QuadRegion::parse(paths).unwrap()
    }

    #[test]
    fn test_same_depth_ring() {
        let ring = zone(&["12030213"]).neighbours(8);
        assert_eq!(
            ring.to_strings(),
            vec![
                "12030210", "12030211", "12030212", "12030230", "12030231", "12030300",
                "12030302", "12030320",
            ]
        );
    }

    #[test]
    fn test_excludes_members() {
        let ring = zone(&["120", "121"]).neighbours(3);
        assert!(!ring.is_member(&QuadPath::new("120").unwrap()));
        assert!(!ring.is_member(&QuadPath::new("121").unwrap()));
        assert!(ring.is_member(&QuadPath::new("122").unwrap()));
        assert!(ring.is_member(&QuadPath::new("130").unwrap()));
    }

    #[test]
    fn test_deeper_keeps_only_shared_edge() {
        // 12 at depth 3: west neighbour 03 keeps its eastern column
        let ring = zone(&["12"]).neighbours(3);
        assert!(ring.is_member(&QuadPath::new("031").unwrap()));
        assert!(ring.is_member(&QuadPath::new("033").unwrap()));
        assert!(!ring.is_member(&QuadPath::new("030").unwrap()));
        assert!(!ring.is_member(&QuadPath::new("032").unwrap()));

        // North-west neighbour 01 keeps only its south-east corner
        assert!(ring.is_member(&QuadPath::new("013").unwrap()));
        assert!(!ring.is_member(&QuadPath::new("010").unwrap()));

        // 8 neighbours: 4 edges × 2 + 4 corners × 1
        assert_eq!(ring.len(), 12);
    }

    #[test]
    fn test_shallower_collapses_neighbours() {
        // Every neighbour of 1203 lies within 12, the member's own parent
        let ring = zone(&["1203"]).neighbours(2);
        assert_eq!(ring.to_strings(), vec!["12"]);

        // 1211 sits on the north-east corner of 12
        let ring = zone(&["1211"]).neighbours(2);
        assert_eq!(ring.to_strings(), vec!["10", "11", "12", "13"]);
    }

    #[test]
    fn test_pole_row_has_no_northern_ring() {
        let ring = zone(&["0"]).neighbours(1);
        assert_eq!(ring.to_strings(), vec!["1", "2", "3"]);
    }

    #[test]
    fn test_refined_tiles_inside_region_are_dropped() {
        // 13 borders 12 but part of it is already a member
        let ring = zone(&["12", "1300"]).neighbours(4);
        assert!(!ring.is_member(&QuadPath::new("1300").unwrap()));
        assert!(ring.is_member(&QuadPath::new("1302").unwrap()));
    }

    #[test]
    fn test_depth_is_clamped() {
        let ring = zone(&["12"]).neighbours(0);
        assert!(ring.iter().all(|p| p.depth() == 1));
    }

    #[test]
    fn test_empty_region_has_no_ring() {
        assert!(QuadRegion::new().neighbours(5).is_empty());
    }
}
