//! # Cell-Partitioned Point Index
//!
//! Points are bucketed into fixed grid cells, and each non-empty cell keeps its
//! own R-tree.
//!
//! ## Architecture Overview
//!
//! 1. **Level 1 - Cell partitioning (coarse-grained)**
//!    - The world is divided into a grid with the shape of a geohash grid
//!    - Each point belongs to exactly one cell
//!
//! 2. **Level 2 - R-tree per cell (fine-grained)**
//!    - A cell's R-tree answers exact window lookups for the points it holds
//!
//! ### Insertion Flow
//! ```text
//! 1. Point arrives
//! 2. Any earlier point with the same identity is removed from its cell
//! 3. The point's cell is computed; unplaceable coordinates go to overflow
//! 4. The point is inserted into that cell's R-tree
//! ```
//!
//! ### Query Flow
//! ```text
//! 1. Query arrives (box or k-nearest)
//! 2. Compute the lat/lon window(s) the answer must lie in
//! 3. Select the populated cells under those windows
//! 4. Locate entries in each cell's R-tree, then apply the exact test
//! 5. Order results (insertion order for boxes, distance for k-NN)
//! ```
//!
//! ## Precision Guidelines
//!
//! | Precision | Cell Size (approx)  |
//! |-----------|---------------------|
//! | 3         | ~156km × 156km      |
//! | 4         | ~39km × 20km        |
//! | 5         | ~4.9km × 4.9km      |
//! | 6         | ~1.2km × 0.6km      |
//! | 7         | ~153m × 153m        |
//!
//! Cell size only affects latency; query results are identical at every
//! precision.

pub(crate) mod cell;
pub mod clustering;
pub mod query;
pub mod shared;

pub use clustering::{CellStats, ClusteringIndex, IndexStats};
pub use query::QueryStats;
pub use shared::IndexCell;
