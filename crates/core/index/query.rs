//! Range and k-nearest-neighbor queries.
//!
//! Both queries first narrow the search to the cells a query window can touch,
//! then ask each cell's R-tree for the entries inside the window, and finally
//! apply the exact test. Points in the overflow bucket are always checked.

use super::cell::{CellId, Window};
use super::clustering::{ClusteringIndex, Placement};
use crate::compute::geodesic::{EARTH_RADIUS_M, great_circle_distance, normalize_longitude};
use geocluster_types::point::Point;
use smallvec::{SmallVec, smallvec};
use std::cmp::Ordering;
use std::collections::BinaryHeap;
use std::f64::consts::PI;

/// Added to k-NN window half-widths so float error never drops a boundary point.
const WINDOW_MARGIN_DEG: f64 = 1e-9;

/// Statistics about a query execution.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct QueryStats {
    /// Number of non-empty cells searched
    pub cells_examined: usize,

    /// Number of points considered before the exact test
    pub candidates_examined: usize,

    /// Number of points returned
    pub results_returned: usize,
}

/// k-NN heap entry. Ordered by distance, then insertion sequence, so the
/// max-heap pops the worst candidate first.
struct Candidate<'a, P> {
    distance: f64,
    seq: u64,
    point: &'a P,
}

impl<P> PartialEq for Candidate<'_, P> {
    fn eq(&self, other: &Self) -> bool {
        self.cmp(other) == Ordering::Equal
    }
}

impl<P> Eq for Candidate<'_, P> {}

impl<P> PartialOrd for Candidate<'_, P> {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl<P> Ord for Candidate<'_, P> {
    fn cmp(&self, other: &Self) -> Ordering {
        self.distance
            .total_cmp(&other.distance)
            .then_with(|| self.seq.cmp(&other.seq))
    }
}

impl<P: Point + Clone> ClusteringIndex<P> {
    /// All points inside the box spanned by `top_left` and `bottom_right`.
    ///
    /// A point matches when `bottom_right.lat <= lat <= top_left.lat` and
    /// `top_left.lon <= lon <= bottom_right.lon`. This is a plain lat/lon box:
    /// a box whose left edge is east of its right edge (as across the
    /// antimeridian) is inverted and matches nothing, as do boxes with NaN
    /// corners.
    ///
    /// Results are in insertion order.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use geocluster::{ClusteringIndex, GeoPoint};
    ///
    /// let mut index = ClusteringIndex::new();
    /// index.add(GeoPoint::new("a", 0.0, 0.0));
    /// index.add(GeoPoint::new("b", 0.0, 1.0));
    /// index.add(GeoPoint::new("c", 0.0, 2.0));
    ///
    /// let top_left = GeoPoint::new("tl", 1.0, -1.0);
    /// let bottom_right = GeoPoint::new("br", -1.0, 3.0);
    /// assert_eq!(index.range(&top_left, &bottom_right).len(), 3);
    /// ```
    pub fn range<A, B>(&self, top_left: &A, bottom_right: &B) -> Vec<P>
    where
        A: Point + ?Sized,
        B: Point + ?Sized,
    {
        self.range_with_stats(top_left, bottom_right).0
    }

    /// [`range`](Self::range) that also reports how much work was done.
    pub fn range_with_stats<A, B>(&self, top_left: &A, bottom_right: &B) -> (Vec<P>, QueryStats)
    where
        A: Point + ?Sized,
        B: Point + ?Sized,
    {
        let mut stats = QueryStats::default();
        let window = Window::new(
            bottom_right.lat(),
            top_left.lat(),
            top_left.lon(),
            bottom_right.lon(),
        );
        if window.is_empty() {
            return (Vec::new(), stats);
        }

        let envelope = window.envelope();
        let mut hits: Vec<&Placement<P>> = Vec::new();

        for id in self.populated_cells(&window) {
            let Some(tree) = self.cells.get(&id) else {
                continue;
            };
            stats.cells_examined += 1;

            for entry in tree.locate_in_envelope(&envelope) {
                stats.candidates_examined += 1;
                if let Some(placement) = self.points.get(&entry.id) {
                    hits.push(placement);
                }
            }
        }

        for (id, _) in self.overflow.iter() {
            stats.candidates_examined += 1;
            if let Some(placement) = self.points.get(id)
                && window.contains(placement.point.lat(), placement.point.lon())
            {
                hits.push(placement);
            }
        }

        hits.sort_unstable_by_key(|placement| placement.seq);
        stats.results_returned = hits.len();

        let results = hits
            .into_iter()
            .map(|placement| placement.point.clone())
            .collect();
        (results, stats)
    }

    /// Up to `k` points within `max_distance` meters of `origin` that satisfy
    /// `predicate`, nearest first.
    ///
    /// Distance is [`great_circle_distance`]. Equal distances are ordered by
    /// insertion (earlier `add` first). When fewer than `k` points qualify,
    /// exactly the qualifying points are returned.
    ///
    /// `k == 0`, a negative or NaN `max_distance`, and a non-finite origin
    /// all yield an empty result.
    pub fn k_nearest<O, F>(&self, origin: &O, k: usize, max_distance: f64, predicate: F) -> Vec<P>
    where
        O: Point + ?Sized,
        F: Fn(&P) -> bool,
    {
        self.k_nearest_with_stats(origin, k, max_distance, predicate).0
    }

    /// [`k_nearest`](Self::k_nearest) that also reports how much work was done.
    pub fn k_nearest_with_stats<O, F>(
        &self,
        origin: &O,
        k: usize,
        max_distance: f64,
        predicate: F,
    ) -> (Vec<P>, QueryStats)
    where
        O: Point + ?Sized,
        F: Fn(&P) -> bool,
    {
        let mut stats = QueryStats::default();
        if k == 0 || !(max_distance >= 0.0) {
            return (Vec::new(), stats);
        }
        if !origin.lat().is_finite() || !origin.lon().is_finite() {
            return (Vec::new(), stats);
        }

        let windows = search_windows(origin.lat(), origin.lon(), max_distance);

        let mut cell_ids: Vec<CellId> = windows
            .iter()
            .flat_map(|window| self.populated_cells(window))
            .collect();
        cell_ids.sort_unstable();
        cell_ids.dedup();

        let mut placements: Vec<&Placement<P>> = Vec::new();
        for id in &cell_ids {
            let Some(tree) = self.cells.get(id) else {
                continue;
            };
            stats.cells_examined += 1;

            for window in &windows {
                for entry in tree.locate_in_envelope(&window.envelope()) {
                    stats.candidates_examined += 1;
                    if let Some(placement) = self.points.get(&entry.id) {
                        placements.push(placement);
                    }
                }
            }
        }
        for (id, _) in self.overflow.iter() {
            stats.candidates_examined += 1;
            if let Some(placement) = self.points.get(id) {
                placements.push(placement);
            }
        }

        // Max-heap of the best k so far; the worst is on top
        let mut heap = BinaryHeap::with_capacity(k.min(placements.len()));
        for placement in placements {
            let distance = great_circle_distance(origin, &placement.point);
            if !(distance <= max_distance) || !predicate(&placement.point) {
                continue;
            }

            let candidate = Candidate {
                distance,
                seq: placement.seq,
                point: &placement.point,
            };
            if heap.len() < k {
                heap.push(candidate);
            } else if heap.peek().is_some_and(|worst| candidate < *worst) {
                heap.pop();
                heap.push(candidate);
            }
        }

        let results: Vec<P> = heap
            .into_sorted_vec()
            .into_iter()
            .map(|candidate| candidate.point.clone())
            .collect();
        stats.results_returned = results.len();

        (results, stats)
    }
}

impl<P: Point> ClusteringIndex<P> {
    /// Non-empty cells that can hold a point inside `window`.
    ///
    /// Small windows enumerate their cell span; windows covering more cells
    /// than are populated scan the populated cells instead.
    fn populated_cells(&self, window: &Window) -> Vec<CellId> {
        let span = self.grid.span(window);

        if span.cell_count() <= self.cells.len() as u64 {
            span.iter()
                .filter(|id| self.cells.contains_key(id))
                .collect()
        } else {
            self.cells
                .keys()
                .filter(|id| span.contains(id))
                .copied()
                .collect()
        }
    }
}

/// Lat/lon windows covering every point within `max_distance` meters of
/// `(lat, lon)`.
///
/// The angular radius uses [`EARTH_RADIUS_M`], which is slightly smaller than
/// the haversine radius, so the windows never undershoot. A window that would
/// cross the antimeridian is split in two; one that reaches a pole spans all
/// longitudes.
fn search_windows(lat: f64, lon: f64, max_distance: f64) -> SmallVec<[Window; 2]> {
    let theta = max_distance / EARTH_RADIUS_M;
    if !theta.is_finite() || theta >= PI || lat.abs() > 90.0 {
        return smallvec![Window::WORLD];
    }

    let dlat = theta.to_degrees() + WINDOW_MARGIN_DEG;
    let min_lat = lat - dlat;
    let max_lat = lat + dlat;
    if min_lat <= -90.0 || max_lat >= 90.0 {
        return smallvec![Window::new(min_lat.max(-90.0), max_lat.min(90.0), -180.0, 180.0)];
    }

    let ratio = theta.sin() / lat.to_radians().cos();
    if !(ratio < 1.0) {
        return smallvec![Window::new(min_lat, max_lat, -180.0, 180.0)];
    }

    let dlon = ratio.asin().to_degrees() + WINDOW_MARGIN_DEG;
    let lon = normalize_longitude(lon);
    let west = lon - dlon;
    let east = lon + dlon;

    if east - west >= 360.0 {
        smallvec![Window::new(min_lat, max_lat, -180.0, 180.0)]
    } else if west < -180.0 {
        smallvec![
            Window::new(min_lat, max_lat, -180.0, east),
            Window::new(min_lat, max_lat, west + 360.0, 180.0),
        ]
    } else if east > 180.0 {
        smallvec![
            Window::new(min_lat, max_lat, west, 180.0),
            Window::new(min_lat, max_lat, -180.0, east - 360.0),
        ]
    } else {
        smallvec![Window::new(min_lat, max_lat, west, east)]
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_search_window_single() {
        let windows = search_windows(0.0, 0.0, 111_195.0);
        assert_eq!(windows.len(), 1);
        let w = windows[0];
        assert!((w.max_lat - 1.0).abs() < 1e-3);
        assert!((w.min_lon + 1.0).abs() < 1e-3);
    }

    #[test]
    fn test_search_window_splits_at_antimeridian() {
        let windows = search_windows(0.0, 179.5, 111_195.0);
        assert_eq!(windows.len(), 2);
        assert_eq!(windows[0].max_lon, 180.0);
        assert_eq!(windows[1].min_lon, -180.0);
        assert!((windows[1].max_lon + 179.5).abs() < 1e-3);

        let windows = search_windows(0.0, -179.5, 111_195.0);
        assert_eq!(windows.len(), 2);
        assert_eq!(windows[0].min_lon, -180.0);
        assert!((windows[1].min_lon - 179.5).abs() < 1e-3);
    }

    #[test]
    fn test_search_window_near_pole_spans_longitudes() {
        let windows = search_windows(89.5, 10.0, 200_000.0);
        assert_eq!(windows.len(), 1);
        assert_eq!(windows[0].max_lat, 90.0);
        assert_eq!(windows[0].min_lon, -180.0);
        assert_eq!(windows[0].max_lon, 180.0);
    }

    #[test]
    fn test_search_window_unbounded_distance() {
        assert_eq!(search_windows(10.0, 10.0, f64::INFINITY)[0], Window::WORLD);
        assert_eq!(search_windows(10.0, 10.0, 30_000_000.0)[0], Window::WORLD);
    }

    #[test]
    fn test_candidate_order() {
        let p = ();
        let near = Candidate { distance: 1.0, seq: 9, point: &p };
        let far = Candidate { distance: 2.0, seq: 0, point: &p };
        let tie = Candidate { distance: 1.0, seq: 3, point: &p };
        assert!(near < far);
        assert!(tie < near);
    }
}
