//! ITS Quadkeys - quadtree tile paths for geographically sharded MQTT topics
//!
//! Intelligent Transport Systems stations (vehicles, road-side units) publish
//! and subscribe to messages by location. The Earth, in Web Mercator, is cut
//! into a quadtree: each tile is identified by a [`QuadPath`], the string of
//! quadrant digits leading to it, and those digits become topic levels.
//!
//! - [`quadkey`]: single tile paths, their neighbours and splitting
//! - [`zone`]: sets of paths ([`QuadRegion`]) with set algebra and
//!   optimisation into the smallest equivalent set
//! - [`topic`]: mapping paths and regions to MQTT topics and filters
//! - [`roi`]: region-of-interest tracking for a moving station
//!
//! ```
//! use its_quadkeys::{QuadPath, QuadRegion};
//!
//! let here = QuadPath::from_position(43.6352, 1.3745, 8)?;
//! let mut roi = QuadRegion::from(here);
//! let ring = roi.neighbours(8);
//! roi += ring;
//! roi.optimise();
//! assert!(roi.contains(&here));
//! # Ok::<(), its_quadkeys::QuadError>(())
//! ```

pub mod config;
pub mod coord;
pub mod error;
pub mod logging;
pub mod quadkey;
pub mod roi;
pub mod topic;
pub mod zone;

pub use error::QuadError;
pub use quadkey::{Direction, Neighbours, QuadPath, MAX_DEPTH};
pub use zone::QuadRegion;
