//! The clustering index: points bucketed into grid cells, each cell an R-tree.

use super::cell::{CellEntry, CellGrid, CellId};
use crate::config::{Config, MAX_CELL_PRECISION, MIN_CELL_PRECISION};
use crate::error::{GeoClusterError, Result};
use crate::store::KeyedSet;
use geocluster_types::point::{GeoPoint, Point};
use rstar::RTree;
use rustc_hash::FxHashMap;

/// Statistics for a single cell.
#[derive(Debug, Clone)]
pub struct CellStats {
    /// Geohash of the cell at the index precision
    pub geohash: String,
    /// Number of points placed in the cell
    pub point_count: usize,
}

/// Overall statistics for the clustering index.
#[derive(Debug, Clone)]
pub struct IndexStats {
    /// Number of non-empty cells
    pub cell_count: usize,
    /// Number of points in the index
    pub point_count: usize,
    /// Points whose coordinates could not be assigned to a cell
    pub overflow_count: usize,
    /// Average points per non-empty cell
    pub avg_points_per_cell: f64,
    /// Cell precision (geohash length)
    pub precision: usize,
    /// Per-cell statistics, largest first
    pub cells: Vec<CellStats>,
}

/// Where a point currently lives.
#[derive(Debug, Clone)]
pub(crate) struct Placement<P> {
    pub point: P,
    /// `None` for points held in the overflow bucket
    pub cell: Option<CellId>,
    /// Insertion sequence of the latest `add` for this identity
    pub seq: u64,
}

/// A spatial index over [`Point`]s answering range and k-nearest queries.
///
/// # Architecture
///
/// ```text
/// ClusteringIndex
/// ├─ cells: HashMap<CellId, RTree<CellEntry>>
/// │  ├─ (3121, 4094) -> RTree [a, b]
/// │  └─ (3121, 4095) -> RTree [c]
/// ├─ points: KeyedSet<Placement>      identity -> point, cell, sequence
/// │  ├─ "a" -> (3121, 4094)
/// │  └─ ...
/// └─ overflow: KeyedSet<()>           points with unplaceable coordinates
/// ```
///
/// Every point lives in exactly one cell (or the overflow bucket). Adding an
/// identity that is already present moves it: last write wins.
///
/// # Thread Safety
///
/// Queries take `&self` and may run from many threads at once. `add` and
/// `remove` take `&mut self`; build the index fully before sharing it, for
/// example through [`IndexCell`](super::IndexCell).
///
/// # Examples
///
/// ```rust
/// use geocluster::{ClusteringIndex, GeoPoint, Point};
///
/// let mut index = ClusteringIndex::new();
/// index.add(GeoPoint::new("a", 0.0, 0.0));
/// index.add(GeoPoint::new("b", 0.0, 1.0));
/// index.add(GeoPoint::new("c", 0.0, 2.0));
///
/// let origin = GeoPoint::new("query", 0.0, 0.0);
/// let nearest = index.k_nearest(&origin, 2, 300_000.0, |_| true);
/// let ids: Vec<&str> = nearest.iter().map(|p| p.id()).collect();
/// assert_eq!(ids, vec!["a", "b"]);
/// ```
#[derive(Debug)]
pub struct ClusteringIndex<P = GeoPoint> {
    pub(crate) grid: CellGrid,
    pub(crate) cells: FxHashMap<CellId, RTree<CellEntry>>,
    pub(crate) overflow: KeyedSet<()>,
    pub(crate) points: KeyedSet<Placement<P>>,
    next_seq: u64,
}

impl<P: Point> ClusteringIndex<P> {
    /// Index with the default cell precision.
    pub fn new() -> Self {
        Self::with_precision(Config::default().cell_precision)
    }

    /// Index with an explicit cell precision.
    ///
    /// # Panics
    ///
    /// Panics if precision is not in range 1-12.
    pub fn with_precision(precision: usize) -> Self {
        assert!(
            (MIN_CELL_PRECISION..=MAX_CELL_PRECISION).contains(&precision),
            "Cell precision must be between 1 and 12"
        );

        Self {
            grid: CellGrid::new(precision),
            cells: FxHashMap::default(),
            overflow: KeyedSet::new(),
            points: KeyedSet::new(),
            next_seq: 0,
        }
    }

    /// Index configured from `config`, validating it first.
    pub fn from_config(config: &Config) -> Result<Self> {
        config.validate().map_err(GeoClusterError::InvalidConfig)?;
        Ok(Self::with_precision(config.cell_precision))
    }

    pub fn precision(&self) -> usize {
        self.grid.precision()
    }

    /// Number of non-empty cells.
    pub fn cell_count(&self) -> usize {
        self.cells.len()
    }

    /// Number of points in the index.
    pub fn len(&self) -> usize {
        self.points.len()
    }

    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }

    pub fn contains(&self, id: &str) -> bool {
        self.points.contains(id)
    }

    pub fn get(&self, id: &str) -> Option<&P> {
        self.points.get(id).map(|placement| &placement.point)
    }

    /// All points, in no particular order.
    pub fn points(&self) -> impl Iterator<Item = &P> {
        self.points.values().map(|placement| &placement.point)
    }

    /// Insert `point`, replacing any point with the same identity.
    ///
    /// Returns the replaced point. A replaced point is removed from its old
    /// cell before the new one is placed, and the identity takes a fresh
    /// insertion sequence.
    pub fn add(&mut self, point: P) -> Option<P> {
        let id = point.id().to_string();
        let previous = self.detach(&id);

        let cell = self.grid.cell_for(point.lat(), point.lon());
        match cell {
            Some(cell) => {
                self.cells
                    .entry(cell)
                    .or_default()
                    .insert(CellEntry::new(id.as_str(), point.lat(), point.lon()));
            }
            None => {
                log::warn!(
                    "Point {} has unplaceable coordinates ({}, {}); keeping it in the overflow bucket",
                    id,
                    point.lat(),
                    point.lon()
                );
                self.overflow.add(id.as_str(), ());
            }
        }

        let seq = self.next_seq;
        self.next_seq += 1;
        self.points.add(id, Placement { point, cell, seq });

        previous
    }

    /// Remove the point with identity `id`. Returns it if it was present.
    pub fn remove(&mut self, id: &str) -> Option<P> {
        self.detach(id)
    }

    /// Remove all points.
    pub fn clear(&mut self) {
        self.cells.clear();
        self.overflow.clear();
        self.points.clear();
    }

    /// Cell counts and occupancy.
    pub fn stats(&self) -> IndexStats {
        let cell_count = self.cells.len();
        let placed: usize = self.cells.values().map(|tree| tree.size()).sum();

        let avg_points_per_cell = if cell_count > 0 {
            placed as f64 / cell_count as f64
        } else {
            0.0
        };

        let mut cells: Vec<CellStats> = self
            .cells
            .iter()
            .map(|(id, tree)| CellStats {
                geohash: self.grid.geohash(*id),
                point_count: tree.size(),
            })
            .collect();

        cells.sort_by(|a, b| {
            b.point_count
                .cmp(&a.point_count)
                .then_with(|| a.geohash.cmp(&b.geohash))
        });

        IndexStats {
            cell_count,
            point_count: self.points.len(),
            overflow_count: self.overflow.len(),
            avg_points_per_cell,
            precision: self.grid.precision(),
            cells,
        }
    }

    /// Take `id` out of its cell and the placement map.
    fn detach(&mut self, id: &str) -> Option<P> {
        let placement = self.points.remove(id)?;

        match placement.cell {
            Some(cell) => {
                if let Some(tree) = self.cells.get_mut(&cell) {
                    let entry = CellEntry::new(id, placement.point.lat(), placement.point.lon());
                    if tree.remove(&entry).is_none() {
                        log::warn!("Point {} was missing from its cell", id);
                    }
                    if tree.size() == 0 {
                        self.cells.remove(&cell);
                    }
                }
            }
            None => {
                self.overflow.remove(id);
            }
        }

        Some(placement.point)
    }
}

impl<P: Point> Default for ClusteringIndex<P> {
    fn default() -> Self {
        Self::new()
    }
}

impl<P: Point> Extend<P> for ClusteringIndex<P> {
    fn extend<I: IntoIterator<Item = P>>(&mut self, iter: I) {
        for point in iter {
            self.add(point);
        }
    }
}

impl<P: Point> FromIterator<P> for ClusteringIndex<P> {
    fn from_iter<I: IntoIterator<Item = P>>(iter: I) -> Self {
        let mut index = Self::new();
        index.extend(iter);
        index
    }
}
