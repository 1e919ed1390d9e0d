//! In-memory geographic point index with range and k-nearest queries, geodesic
//! displacement math, and lazily expiring keyed sets.
//!
//! ## Features
//! - **Clustering index**: points bucketed into geohash-shaped cells, one R-tree per cell
//! - **Range queries**: inclusive lat/lon boxes, results in insertion order
//! - **k-nearest queries**: great-circle distance cutoff, caller predicate, deterministic ties
//! - **Geodesic math**: spherical short moves, ellipsoidal (Vincenty) long moves, haversine distance
//! - **Lazy TTL**: `ExpiringSet` hides expired entries on read; cleanup is explicit
//!
//! ## Lifecycle
//! Build the index fully, then publish it for readers:
//! - Seed with [`IndexBuilder`] or repeated [`ClusteringIndex::add`]
//! - Publish once through [`IndexCell`]
//! - Serve any number of concurrent `range`/`k_nearest` calls
//!
//! ```rust
//! use geocluster::prelude::*;
//!
//! let index = IndexBuilder::new()
//!     .cell_precision(5)
//!     .point(GeoPoint::new("a", 0.0, 0.0))
//!     .point(GeoPoint::new("b", 0.0, 1.0))
//!     .point(GeoPoint::new("c", 0.0, 2.0))
//!     .build()?;
//!
//! let origin = GeoPoint::new("origin", 0.0, 0.0);
//! let nearest = index.k_nearest(&origin, 2, 300_000.0, |_| true);
//! assert_eq!(nearest[0].id(), "a");
//! assert_eq!(nearest[1].id(), "b");
//!
//! let moved = move_point(&origin, 10_000.0, Direction::NORTH)?;
//! assert!(moved.lat() > 0.0);
//! # Ok::<(), geocluster::GeoClusterError>(())
//! ```

pub mod builder;
pub mod compute;
pub mod config;
pub mod error;
pub mod index;
pub mod store;

pub use builder::IndexBuilder;
pub use config::Config;
pub use error::{GeoClusterError, Result};

pub use geocluster_types::direction::Direction;
pub use geocluster_types::point::{GeoPoint, Point};

pub use index::{CellStats, ClusteringIndex, IndexCell, IndexStats, QueryStats};
pub use store::{Clock, ExpiringSet, KeyedSet, ManualClock, SystemClock};

pub const VERSION: &str = env!("CARGO_PKG_VERSION");

pub mod prelude {

    pub use crate::{Config, GeoClusterError, IndexBuilder, Result};

    pub use crate::{ClusteringIndex, IndexCell};

    pub use crate::{Direction, GeoPoint, Point};

    pub use crate::compute::geodesic::{great_circle_distance, move_point};

    pub use crate::{Clock, ExpiringSet, KeyedSet, ManualClock, SystemClock};
}
