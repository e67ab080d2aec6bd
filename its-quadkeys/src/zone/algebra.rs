//! Set algebra over regions.
//!
//! Named methods come in pairs: a non-mutating one returning a new region
//! and an in-place one. The `+ - & ^` operators (and their assigning forms)
//! forward to them. Only the symmetric difference optimises its result.

use std::collections::BTreeSet;
use std::ops::{Add, AddAssign, BitAnd, BitAndAssign, BitXor, BitXorAssign, Sub, SubAssign};

use super::QuadRegion;
use crate::error::QuadError;
use crate::quadkey::QuadPath;

impl QuadRegion {
    /// All members of both regions.
    pub fn union(&self, other: &QuadRegion) -> QuadRegion {
        let mut out = self.clone();
        out.union_with(other);
        out
    }

    /// Add all members of `other`. Does not optimise.
    pub fn union_with(&mut self, other: &QuadRegion) {
        self.paths.extend(other.paths.iter().copied());
    }

    /// The area covered by both regions.
    ///
    /// Where a member of one side contains a member of the other, the deeper
    /// path is kept.
    pub fn intersection(&self, other: &QuadRegion) -> QuadRegion {
        let mut paths = BTreeSet::new();
        for path in &self.paths {
            if other.contains(path) {
                paths.insert(*path);
            } else {
                paths.extend(other.members_within(path).copied());
            }
        }
        QuadRegion { paths }
    }

    /// Keep only the area also covered by `other`.
    pub fn intersect_with(&mut self, other: &QuadRegion) {
        *self = self.intersection(other);
    }

    /// The area of `self` not covered by `other`.
    ///
    /// Members fully covered by `other` are dropped. Members that only
    /// partially overlap are split down as far as needed to cut out the
    /// covered part, keeping the uncovered children.
    ///
    /// Splitting stops at each level where a child is clear of `other`, so
    /// the result mixes depths: `"1" - "123"` gives `10, 11, 120, 121, 122,
    /// 13`, not every depth-3 tile of `1` except `123`. The covered area is
    /// the same as with a uniform split.
    pub fn difference(&self, other: &QuadRegion) -> QuadRegion {
        let mut paths = BTreeSet::new();
        for path in &self.paths {
            if other.contains(path) {
                continue;
            }
            if other.has_members_below(path) {
                carve(*path, other, &mut paths);
            } else {
                paths.insert(*path);
            }
        }
        QuadRegion { paths }
    }

    /// Remove the area covered by `other`.
    pub fn subtract(&mut self, other: &QuadRegion) {
        *self = self.difference(other);
    }

    /// Remove the area of a single path.
    pub fn subtract_path(&mut self, path: QuadPath) {
        self.subtract(&QuadRegion::from(path));
    }

    /// Remove the area of a single path given as a digit string.
    ///
    /// # Errors
    ///
    /// [`QuadError::InvalidPath`] if `digits` does not parse; the region is
    /// left untouched in that case.
    pub fn subtract_str(&mut self, digits: &str) -> Result<(), QuadError> {
        let path = QuadPath::new(digits)?;
        self.subtract_path(path);
        Ok(())
    }

    /// The area covered by exactly one of the two regions, optimised.
    pub fn symmetric_difference(&self, other: &QuadRegion) -> QuadRegion {
        let mut out = self.union(other).difference(&self.intersection(other));
        out.optimise();
        out
    }

    /// Replace with the symmetric difference.
    pub fn symmetric_difference_with(&mut self, other: &QuadRegion) {
        *self = self.symmetric_difference(other);
    }
}

/// Split `path` until every piece is either fully covered by `cut` (dropped)
/// or free of it (kept).
fn carve(path: QuadPath, cut: &QuadRegion, out: &mut BTreeSet<QuadPath>) {
    let mut pending = vec![path];
    while let Some(node) = pending.pop() {
        if cut.contains(&node) {
            continue;
        }
        match node.children() {
            Some(children) if cut.has_members_below(&node) => pending.extend(children),
            _ => {
                out.insert(node);
            }
        }
    }
}

macro_rules! region_operator {
    ($op:ident, $method:ident, $assign_op:ident, $assign_method:ident, $named:ident, $named_mut:ident) => {
        impl $op<&QuadRegion> for &QuadRegion {
            type Output = QuadRegion;

            fn $method(self, rhs: &QuadRegion) -> QuadRegion {
                self.$named(rhs)
            }
        }

        impl $op<QuadRegion> for QuadRegion {
            type Output = QuadRegion;

            fn $method(self, rhs: QuadRegion) -> QuadRegion {
                self.$named(&rhs)
            }
        }

        impl $op<&QuadRegion> for QuadRegion {
            type Output = QuadRegion;

            fn $method(self, rhs: &QuadRegion) -> QuadRegion {
                self.$named(rhs)
            }
        }

        impl $assign_op<&QuadRegion> for QuadRegion {
            fn $assign_method(&mut self, rhs: &QuadRegion) {
                self.$named_mut(rhs);
            }
        }

        impl $assign_op<QuadRegion> for QuadRegion {
            fn $assign_method(&mut self, rhs: QuadRegion) {
                self.$named_mut(&rhs);
            }
        }
    };
}

region_operator!(Add, add, AddAssign, add_assign, union, union_with);
region_operator!(Sub, sub, SubAssign, sub_assign, difference, subtract);
region_operator!(BitAnd, bitand, BitAndAssign, bitand_assign, intersection, intersect_with);
region_operator!(
    BitXor,
    bitxor,
    BitXorAssign,
    bitxor_assign,
    symmetric_difference,
    symmetric_difference_with
);

impl Sub<QuadPath> for &QuadRegion {
    type Output = QuadRegion;

    fn sub(self, rhs: QuadPath) -> QuadRegion {
        self.difference(&QuadRegion::from(rhs))
    }
}

impl Sub<QuadPath> for QuadRegion {
    type Output = QuadRegion;

    fn sub(self, rhs: QuadPath) -> QuadRegion {
        self.difference(&QuadRegion::from(rhs))
    }
}

impl SubAssign<QuadPath> for QuadRegion {
    fn sub_assign(&mut self, rhs: QuadPath) {
        self.subtract_path(rhs);
    }
}
