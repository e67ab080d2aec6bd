//! Quadtree tile paths.
//!
//! A [`QuadPath`] names one tile of the global Web Mercator quadtree by the
//! sequence of quadrants taken from the root, one base-4 digit per zoom
//! level:
//!
//! ```text
//! ┌───┬───┐
//! │ 0 │ 1 │   0 = north-west   1 = north-east
//! ├───┼───┤
//! │ 2 │ 3 │   2 = south-west   3 = south-east
//! └───┴───┘
//! ```
//!
//! Digits are packed two bits per level into a `u64`, so paths are `Copy`
//! and neighbour/containment checks never allocate. Strings only appear at
//! the boundary (parsing and [`QuadPath::to_str`]).
//!
//! # Example
//!
//! ```
//! use its_quadkeys::quadkey::{Direction, QuadPath};
//!
//! let path: QuadPath = "12030213".parse().unwrap();
//! assert_eq!(path.to_str("/"), "1/2/0/3/0/2/1/3");
//!
//! let north = path.neighbour(Direction::North).unwrap();
//! assert_eq!(north.to_string(), "12030211");
//! ```

mod neighbours;
mod path;

pub use neighbours::{Direction, Neighbours};
pub use path::{QuadPath, MAX_DEPTH};
