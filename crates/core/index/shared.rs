//! Build-once, serve-many holder for a finished index.

use super::clustering::ClusteringIndex;
use crate::error::{GeoClusterError, Result};
use geocluster_types::point::GeoPoint;
use once_cell::sync::OnceCell;

/// A write-once slot for a fully seeded [`ClusteringIndex`].
///
/// The index is handed over already built; there is no lazy construction on
/// first access. Until [`initialize`](Self::initialize) succeeds every
/// [`get`](Self::get) fails with [`GeoClusterError::NotInitialized`], and a
/// second `initialize` fails with [`GeoClusterError::AlreadyInitialized`].
///
/// ```rust
/// use geocluster::{ClusteringIndex, GeoPoint, IndexCell};
///
/// static INDEX: IndexCell = IndexCell::new();
///
/// let mut index = ClusteringIndex::new();
/// index.add(GeoPoint::new("a", 0.0, 0.0));
/// INDEX.initialize(index)?;
///
/// assert_eq!(INDEX.get()?.len(), 1);
/// # Ok::<(), geocluster::GeoClusterError>(())
/// ```
#[derive(Debug)]
pub struct IndexCell<P = GeoPoint> {
    inner: OnceCell<ClusteringIndex<P>>,
}

impl<P> IndexCell<P> {
    pub const fn new() -> Self {
        Self {
            inner: OnceCell::new(),
        }
    }

    /// Publish `index`. Fails if an index was already published; the
    /// rejected index is dropped.
    pub fn initialize(&self, index: ClusteringIndex<P>) -> Result<&ClusteringIndex<P>> {
        self.inner
            .set(index)
            .map_err(|_| GeoClusterError::AlreadyInitialized)?;
        log::info!("Index published for serving");
        self.get()
    }

    pub fn get(&self) -> Result<&ClusteringIndex<P>> {
        self.inner.get().ok_or(GeoClusterError::NotInitialized)
    }

    pub fn is_initialized(&self) -> bool {
        self.inner.get().is_some()
    }
}

impl<P> Default for IndexCell<P> {
    fn default() -> Self {
        Self::new()
    }
}
