//! Cell grid used to partition the index.
//!
//! The grid has the same shape as a geohash grid of the configured precision:
//! `ceil(5p / 2)` longitude bits and `floor(5p / 2)` latitude bits. Cells are
//! addressed by integer `(row, col)` so that placing a point and enumerating
//! the cells under a query window use the same arithmetic. The geohash string
//! of a cell is only used for reporting.

use rstar::{AABB, RTreeObject};

/// Integer address of one grid cell.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub(crate) struct CellId {
    pub row: u32,
    pub col: u32,
}

/// An inclusive latitude/longitude window.
#[derive(Debug, Clone, Copy, PartialEq)]
pub(crate) struct Window {
    pub min_lat: f64,
    pub max_lat: f64,
    pub min_lon: f64,
    pub max_lon: f64,
}

impl Window {
    pub const WORLD: Window = Window {
        min_lat: -90.0,
        max_lat: 90.0,
        min_lon: -180.0,
        max_lon: 180.0,
    };

    pub fn new(min_lat: f64, max_lat: f64, min_lon: f64, max_lon: f64) -> Self {
        Self {
            min_lat,
            max_lat,
            min_lon,
            max_lon,
        }
    }

    /// Inverted or NaN bounds select nothing.
    pub fn is_empty(&self) -> bool {
        !(self.min_lat <= self.max_lat && self.min_lon <= self.max_lon)
    }

    #[inline]
    pub fn contains(&self, lat: f64, lon: f64) -> bool {
        lat >= self.min_lat && lat <= self.max_lat && lon >= self.min_lon && lon <= self.max_lon
    }

    /// R-tree envelope in `[lon, lat]` order.
    pub fn envelope(&self) -> AABB<[f64; 2]> {
        AABB::from_corners([self.min_lon, self.min_lat], [self.max_lon, self.max_lat])
    }
}

/// A rectangular block of cells, inclusive on both ends.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) struct CellSpan {
    pub rows: (u32, u32),
    pub cols: (u32, u32),
}

impl CellSpan {
    pub fn cell_count(&self) -> u64 {
        let rows = u64::from(self.rows.1 - self.rows.0) + 1;
        let cols = u64::from(self.cols.1 - self.cols.0) + 1;
        rows.saturating_mul(cols)
    }

    #[inline]
    pub fn contains(&self, id: &CellId) -> bool {
        (self.rows.0..=self.rows.1).contains(&id.row) && (self.cols.0..=self.cols.1).contains(&id.col)
    }

    pub fn iter(&self) -> impl Iterator<Item = CellId> + '_ {
        (self.rows.0..=self.rows.1)
            .flat_map(move |row| (self.cols.0..=self.cols.1).map(move |col| CellId { row, col }))
    }
}

/// Maps coordinates to cells for one precision.
#[derive(Debug, Clone, Copy)]
pub(crate) struct CellGrid {
    precision: usize,
    rows: u32,
    cols: u32,
}

impl CellGrid {
    pub fn new(precision: usize) -> Self {
        let bits = 5 * precision as u32;
        let lat_bits = bits / 2;
        let lon_bits = bits - lat_bits;
        Self {
            precision,
            rows: 1 << lat_bits,
            cols: 1 << lon_bits,
        }
    }

    pub fn precision(&self) -> usize {
        self.precision
    }

    /// The cell holding `(lat, lon)`, or `None` for non-finite or
    /// out-of-range coordinates.
    pub fn cell_for(&self, lat: f64, lon: f64) -> Option<CellId> {
        if !lat.is_finite() || !lon.is_finite() {
            return None;
        }
        if !(-90.0..=90.0).contains(&lat) || !(-180.0..=180.0).contains(&lon) {
            return None;
        }
        Some(CellId {
            row: self.row(lat),
            col: self.col(lon),
        })
    }

    /// Cells whose area can hold a point inside `window`. The window is
    /// clamped to the world first; callers must reject empty windows.
    pub fn span(&self, window: &Window) -> CellSpan {
        let min_lat = window.min_lat.clamp(-90.0, 90.0);
        let max_lat = window.max_lat.clamp(-90.0, 90.0);
        let min_lon = window.min_lon.clamp(-180.0, 180.0);
        let max_lon = window.max_lon.clamp(-180.0, 180.0);

        CellSpan {
            rows: (self.row(min_lat), self.row(max_lat)),
            cols: (self.col(min_lon), self.col(max_lon)),
        }
    }

    /// Geohash naming the cell, taken at the cell's center.
    pub fn geohash(&self, id: CellId) -> String {
        let height = 180.0 / f64::from(self.rows);
        let width = 360.0 / f64::from(self.cols);
        let center = geohash::Coord {
            x: -180.0 + (f64::from(id.col) + 0.5) * width,
            y: -90.0 + (f64::from(id.row) + 0.5) * height,
        };
        geohash::encode(center, self.precision).unwrap_or_default()
    }

    #[inline]
    fn row(&self, lat: f64) -> u32 {
        Self::slot((lat + 90.0) / 180.0, self.rows)
    }

    #[inline]
    fn col(&self, lon: f64) -> u32 {
        Self::slot((lon + 180.0) / 360.0, self.cols)
    }

    /// `floor(fraction * count)` clamped to the last slot, so the top and
    /// right world edges fall into the last row/column.
    #[inline]
    fn slot(fraction: f64, count: u32) -> u32 {
        let slot = (fraction * f64::from(count)).floor();
        if slot <= 0.0 {
            0
        } else {
            (slot as u32).min(count - 1)
        }
    }
}

/// A point's footprint inside a cell's R-tree.
#[derive(Debug, Clone, PartialEq)]
pub(crate) struct CellEntry {
    pub id: String,
    /// `[lon, lat]`
    pub position: [f64; 2],
}

impl CellEntry {
    pub fn new(id: impl Into<String>, lat: f64, lon: f64) -> Self {
        Self {
            id: id.into(),
            position: [lon, lat],
        }
    }
}

impl RTreeObject for CellEntry {
    type Envelope = AABB<[f64; 2]>;

    fn envelope(&self) -> Self::Envelope {
        AABB::from_point(self.position)
    }
}
