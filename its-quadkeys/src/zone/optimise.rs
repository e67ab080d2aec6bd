//! Canonicalization of a region.

use super::QuadRegion;
use crate::quadkey::QuadPath;

impl QuadRegion {
    /// Bring the region to its canonical minimal form, in place.
    ///
    /// Repeats redundancy removal and sibling merging until neither changes
    /// anything. The covered area is unchanged and the result does not depend
    /// on how the region was built.
    pub fn optimise(&mut self) {
        loop {
            let removed = self.remove_redundant();
            let merged = self.merge_siblings();
            if !removed && !merged {
                break;
            }
        }
    }

    /// An optimised copy of the region.
    pub fn optimised(&self) -> QuadRegion {
        let mut copy = self.clone();
        copy.optimise();
        copy
    }

    /// True if [`Self::optimise`] would leave the region unchanged.
    pub fn is_optimised(&self) -> bool {
        self.optimised() == *self
    }

    /// Drop every member contained in another member.
    ///
    /// Descendants sort right after their ancestor, so the last kept member
    /// is the only candidate that can contain the current one.
    fn remove_redundant(&mut self) -> bool {
        let before = self.paths.len();
        let mut last_kept: Option<QuadPath> = None;
        self.paths.retain(|path| match last_kept {
            Some(kept) if kept.contains(path) => false,
            _ => {
                last_kept = Some(*path);
                true
            }
        });
        self.paths.len() != before
    }

    /// Replace every complete group of four siblings by their parent.
    ///
    /// Depths are swept deepest first so a merge that completes a group one
    /// level up is picked up in the same sweep.
    fn merge_siblings(&mut self) -> bool {
        let Some(max_depth) = self.max_depth() else {
            return false;
        };

        let mut merged = false;
        for depth in (2..=max_depth).rev() {
            let parents: Vec<QuadPath> = self
                .paths
                .iter()
                .filter(|p| p.depth() == depth && p.digit(depth - 1) == Some(0))
                .filter_map(|p| p.root())
                .filter(|parent| {
                    parent
                        .children()
                        .is_some_and(|children| children.iter().all(|c| self.paths.contains(c)))
                })
                .collect();

            for parent in parents {
                if let Some(children) = parent.children() {
                    for child in &children {
                        self.paths.remove(child);
                    }
                }
                self.paths.insert(parent);
                merged = true;
            }
        }
        merged
    }
}
