//! Zones: sets of quadtree paths describing an area.
//!
//! A [`QuadRegion`] is a plain set of [`QuadPath`]s. Nothing is normalized
//! on insertion, so a region may hold nested or redundant paths until
//! [`QuadRegion::optimise`] brings it to its canonical form:
//!
//! - no member contains another member
//! - no four siblings are present together (they are replaced by their parent)
//!
//! Members are kept ordered by digit string, which makes iteration and
//! serialization deterministic and lets containment queries walk a
//! contiguous range: every descendant of a path sorts right after it.
//!
//! # Example
//!
//! ```
//! use its_quadkeys::zone::QuadRegion;
//!
//! let mut zone = QuadRegion::parse(["120", "121", "122", "123", "1201"]).unwrap();
//! zone.optimise();
//! assert_eq!(zone.to_strings(), vec!["12"]);
//! ```

mod algebra;
mod border;
mod optimise;


use std::collections::btree_set;
use std::collections::BTreeSet;
use std::fmt;

use serde::{Deserialize, Serialize};

use crate::error::QuadError;
use crate::quadkey::QuadPath;

/// A set of quadtree paths.
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct QuadRegion {
    paths: BTreeSet<QuadPath>,
}

impl QuadRegion {
    /// Create an empty region.
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a region from paths, without optimising.
    pub fn from_paths(paths: impl IntoIterator<Item = QuadPath>) -> Self {
        Self {
            paths: paths.into_iter().collect(),
        }
    }

    /// Parse every digit string into a path.
    ///
    /// # Errors
    ///
    /// Fails with the first [`QuadError::InvalidPath`] encountered; no
    /// partially built region is returned.
    pub fn parse<I, S>(digits: I) -> Result<Self, QuadError>
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let paths = digits
            .into_iter()
            .map(|s| QuadPath::new(s.as_ref()))
            .collect::<Result<BTreeSet<_>, _>>()?;
        Ok(Self { paths })
    }

    /// Number of member paths.
    pub fn len(&self) -> usize {
        self.paths.len()
    }

    /// True if the region has no members.
    pub fn is_empty(&self) -> bool {
        self.paths.is_empty()
    }

    /// Add a path. Returns false if it was already a member.
    pub fn insert(&mut self, path: QuadPath) -> bool {
        self.paths.insert(path)
    }

    /// Remove an exact member. Does not carve sub-areas; see [`Self::subtract`].
    pub fn remove(&mut self, path: &QuadPath) -> bool {
        self.paths.remove(path)
    }

    /// True if `path` is an exact member.
    pub fn is_member(&self, path: &QuadPath) -> bool {
        self.paths.contains(path)
    }

    /// True if some member contains `path`, whatever their relative depths.
    pub fn contains(&self, path: &QuadPath) -> bool {
        (1..=path.depth()).any(|depth| self.paths.contains(&path.truncate(depth)))
    }

    /// Members lying inside `path`, including `path` itself if present.
    pub(crate) fn members_within<'a>(
        &'a self,
        path: &'a QuadPath,
    ) -> impl Iterator<Item = &'a QuadPath> + 'a {
        self.paths.range(*path..).take_while(move |p| path.contains(p))
    }

    /// True if some member lies strictly inside `path`.
    pub(crate) fn has_members_below(&self, path: &QuadPath) -> bool {
        self.members_within(path).any(|p| p != path)
    }

    /// Iterate members in digit-string order.
    pub fn iter(&self) -> btree_set::Iter<'_, QuadPath> {
        self.paths.iter()
    }

    /// Members as sorted digit strings.
    pub fn to_strings(&self) -> Vec<String> {
        self.paths.iter().map(|p| p.to_string()).collect()
    }

    /// Deepest member depth, or `None` for an empty region.
    pub fn max_depth(&self) -> Option<u8> {
        self.paths.iter().map(|p| p.depth()).max()
    }

    /// True if both regions cover exactly the same area.
    pub fn covers_same_area(&self, other: &QuadRegion) -> bool {
        self.optimised() == other.optimised()
    }
}

impl fmt::Display for QuadRegion {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("[")?;
        for (i, path) in self.paths.iter().enumerate() {
            if i > 0 {
                f.write_str(", ")?;
            }
            write!(f, "{}", path)?;
        }
        f.write_str("]")
    }
}

impl From<QuadPath> for QuadRegion {
    fn from(path: QuadPath) -> Self {
        Self::from_paths([path])
    }
}

impl FromIterator<QuadPath> for QuadRegion {
    fn from_iter<T: IntoIterator<Item = QuadPath>>(iter: T) -> Self {
        Self::from_paths(iter)
    }
}

impl Extend<QuadPath> for QuadRegion {
    fn extend<T: IntoIterator<Item = QuadPath>>(&mut self, iter: T) {
        self.paths.extend(iter);
    }
}

impl IntoIterator for QuadRegion {
    type Item = QuadPath;
    type IntoIter = btree_set::IntoIter<QuadPath>;

    fn into_iter(self) -> Self::IntoIter {
        self.paths.into_iter()
    }
}

impl<'a> IntoIterator for &'a QuadRegion {
    type Item = &'a QuadPath;
    type IntoIter = btree_set::Iter<'a, QuadPath>;

    fn into_iter(self) -> Self::IntoIter {
        self.paths.iter()
    }
}

impl TryFrom<&[&str]> for QuadRegion {
    type Error = QuadError;

    fn try_from(value: &[&str]) -> Result<Self, Self::Error> {
        Self::parse(value)
    }
}

impl TryFrom<Vec<String>> for QuadRegion {
    type Error = QuadError;

    fn try_from(value: Vec<String>) -> Result<Self, Self::Error> {
        Self::parse(value)
    }
}
