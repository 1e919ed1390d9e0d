//! Index builder for flexible configuration
//!
//! Collects configuration and seed points, then produces a fully built
//! [`ClusteringIndex`] ready to be published through an
//! [`IndexCell`](crate::index::IndexCell).

use crate::config::Config;
use crate::error::{GeoClusterError, Result};
use crate::index::ClusteringIndex;
use geocluster_types::point::{GeoPoint, Point};

/// Builder for a seeded clustering index.
#[derive(Debug)]
pub struct IndexBuilder<P = GeoPoint> {
    config: Config,
    points: Vec<P>,
}

impl<P: Point> IndexBuilder<P> {
    /// Create a new builder with the default configuration and no points.
    pub fn new() -> Self {
        Self {
            config: Config::default(),
            points: Vec::new(),
        }
    }

    /// Set the index configuration.
    pub fn config(mut self, config: Config) -> Self {
        self.config = config;
        self
    }

    /// Set the cell precision (geohash length). Checked in [`build`](Self::build).
    pub fn cell_precision(mut self, precision: usize) -> Self {
        self.config.cell_precision = precision;
        self
    }

    /// Queue one seed point.
    pub fn point(mut self, point: P) -> Self {
        self.points.push(point);
        self
    }

    /// Queue seed points. Later points replace earlier ones with the same identity.
    pub fn points<I: IntoIterator<Item = P>>(mut self, points: I) -> Self {
        self.points.extend(points);
        self
    }

    /// Build the index.
    pub fn build(self) -> Result<ClusteringIndex<P>> {
        self.config.validate().map_err(GeoClusterError::InvalidConfig)?;

        let seeded = self.points.len();
        let mut index = ClusteringIndex::with_precision(self.config.cell_precision);
        index.extend(self.points);

        log::info!(
            "Built index: {} points ({} seeded) in {} cells at precision {}",
            index.len(),
            seeded,
            index.cell_count(),
            index.precision()
        );
        Ok(index)
    }
}

impl<P: Point> Default for IndexBuilder<P> {
    fn default() -> Self {
        Self::new()
    }
}
