use geocluster::compute::geodesic::{great_circle_distance, move_point};
use geocluster::{
    ClusteringIndex, Config, Direction, ExpiringSet, GeoClusterError, GeoPoint, IndexBuilder,
    IndexCell, ManualClock, Point,
};
use std::io::Write;
use std::sync::Arc;
use std::thread;
use std::time::Duration;
use tempfile::NamedTempFile;

fn init_logging() {
    let _ = env_logger::builder().is_test(true).try_init();
}

fn capitals() -> Vec<GeoPoint> {
    vec![
        GeoPoint::new("london", 51.5074, -0.1278),
        GeoPoint::new("paris", 48.8566, 2.3522),
        GeoPoint::new("brussels", 50.8503, 4.3517),
        GeoPoint::new("amsterdam", 52.3676, 4.9041),
        GeoPoint::new("berlin", 52.5200, 13.4050),
        GeoPoint::new("madrid", 40.4168, -3.7038),
        GeoPoint::new("rome", 41.9028, 12.4964),
        GeoPoint::new("stockholm", 59.3293, 18.0686),
        GeoPoint::new("washington", 38.9072, -77.0369),
        GeoPoint::new("tokyo", 35.6762, 139.6503),
        GeoPoint::new("wellington", -41.2865, 174.7762),
        GeoPoint::new("suva", -18.1248, 178.4501),
        GeoPoint::new("apia", -13.8507, -171.7514),
    ]
}

fn ids(points: &[GeoPoint]) -> Vec<&str> {
    points.iter().map(|p| p.id()).collect()
}

#[test]
fn test_nearest_capitals_to_london() {
    init_logging();
    let index = IndexBuilder::new().points(capitals()).build().unwrap();

    let london = index.get("london").unwrap().clone();
    let nearest = index.k_nearest(&london, 4, 600_000.0, |p| p.id() != "london");
    assert_eq!(ids(&nearest), vec!["brussels", "paris", "amsterdam"]);

    let distances: Vec<f64> = nearest
        .iter()
        .map(|p| great_circle_distance(&london, p))
        .collect();
    assert!(distances.windows(2).all(|w| w[0] <= w[1]));
    assert!(distances.iter().all(|d| *d <= 600_000.0));
}

#[test]
fn test_box_over_western_europe() {
    let index: ClusteringIndex = capitals().into_iter().collect();

    let top_left = GeoPoint::new("tl", 53.0, -5.0);
    let bottom_right = GeoPoint::new("br", 40.0, 5.0);
    let results = index.range(&top_left, &bottom_right);
    assert_eq!(
        ids(&results),
        vec!["london", "paris", "brussels", "amsterdam", "madrid"]
    );
}

#[test]
fn test_pacific_neighbours_across_dateline() {
    let index: ClusteringIndex = capitals().into_iter().collect();

    let suva = index.get("suva").unwrap().clone();
    let nearest = index.k_nearest(&suva, 2, 1_500_000.0, |p| p.id() != "suva");
    assert_eq!(ids(&nearest), vec!["apia"]);

    let nearest = index.k_nearest(&suva, 3, 3_000_000.0, |_| true);
    assert_eq!(ids(&nearest), vec!["suva", "apia", "wellington"]);
}

#[test]
fn test_moving_points_keeps_one_entry() {
    init_logging();
    let mut index: ClusteringIndex = capitals().into_iter().collect();
    let before = index.len();

    let mut courier = GeoPoint::new("courier", 51.5074, -0.1278);
    index.add(courier.clone());
    for _ in 0..20 {
        courier = move_point(&courier, 15_000.0, Direction::SOUTH_EAST).unwrap();
        index.add(courier.clone());
    }

    assert_eq!(index.len(), before + 1);
    let found = index.k_nearest(&courier, 1, 1.0, |_| true);
    assert_eq!(ids(&found), vec!["courier"]);
    assert_eq!(found[0], courier);

    let stats = index.stats();
    assert_eq!(stats.point_count, before + 1);
    assert_eq!(stats.overflow_count, 0);
    let placed: usize = stats.cells.iter().map(|c| c.point_count).sum();
    assert_eq!(placed, before + 1);
}

#[test]
fn test_predicate_backed_by_expiring_set() {
    let clock = ManualClock::default();
    let mut recently_seen = ExpiringSet::with_clock(Duration::from_secs(600), clock.clone());

    let index: ClusteringIndex = capitals().into_iter().collect();
    recently_seen.add("paris", ());
    clock.advance(Duration::from_secs(500));
    recently_seen.add("brussels", ());
    clock.advance(Duration::from_secs(200));

    let london = index.get("london").unwrap().clone();
    let nearest = index.k_nearest(&london, 5, 1_000_000.0, |p| recently_seen.contains(p.id()));
    assert_eq!(ids(&nearest), vec!["brussels"]);
}

#[test]
fn test_build_once_then_serve() {
    init_logging();
    let cell: Arc<IndexCell> = Arc::new(IndexCell::new());
    assert!(matches!(cell.get(), Err(GeoClusterError::NotInitialized)));

    let index = IndexBuilder::new()
        .cell_precision(4)
        .points(capitals())
        .build()
        .unwrap();
    cell.initialize(index).unwrap();

    let handles: Vec<_> = (0..4)
        .map(|i| {
            let cell = Arc::clone(&cell);
            thread::spawn(move || {
                let index = cell.get().unwrap();
                let origin = GeoPoint::new("origin", 50.0 + i as f64 * 0.1, 4.0);
                let nearest = index.k_nearest(&origin, 1, 200_000.0, |_| true);
                nearest[0].id().to_string()
            })
        })
        .collect();

    for handle in handles {
        assert_eq!(handle.join().unwrap(), "brussels");
    }

    let again = IndexBuilder::new().build().unwrap();
    assert!(matches!(
        cell.initialize(again),
        Err(GeoClusterError::AlreadyInitialized)
    ));
}

#[test]
fn test_config_file_drives_precision() {
    let mut file = NamedTempFile::new().unwrap();
    write!(file, r#"{{ "cell_precision": 7 }}"#).unwrap();

    let config = Config::from_file(file.path()).unwrap();
    let index = IndexBuilder::new()
        .config(config)
        .points(capitals())
        .build()
        .unwrap();
    assert_eq!(index.precision(), 7);
    assert_eq!(index.stats().cells.len(), capitals().len());
    assert_eq!(index.stats().cells[0].geohash.len(), 7);
}

#[test]
fn test_bad_config_file() {
    let mut file = NamedTempFile::new().unwrap();
    write!(file, r#"{{ "cell_precision": 40 }}"#).unwrap();
    assert!(matches!(
        Config::from_file(file.path()),
        Err(GeoClusterError::Serialization(_))
    ));

    assert!(matches!(
        Config::from_file("/nonexistent/geocluster.json"),
        Err(GeoClusterError::Io(_))
    ));
}

#[test]
fn test_results_independent_of_precision() {
    let origin = GeoPoint::new("origin", 48.0, 8.0);
    let top_left = GeoPoint::new("tl", 60.0, -10.0);
    let bottom_right = GeoPoint::new("br", 45.0, 20.0);

    let query = |precision: usize| {
        let index = IndexBuilder::new()
            .cell_precision(precision)
            .points(capitals())
            .build()
            .unwrap();
        (
            index.k_nearest(&origin, 5, 2_000_000.0, |_| true),
            index.range(&top_left, &bottom_right),
        )
    };

    let (nearest, boxed) = query(1);
    assert_eq!(
        ids(&nearest),
        vec!["brussels", "paris", "amsterdam", "berlin", "london"]
    );
    assert_eq!(
        ids(&boxed),
        vec!["london", "paris", "brussels", "amsterdam", "berlin", "stockholm"]
    );

    for precision in 2..=9 {
        assert_eq!(query(precision), (nearest.clone(), boxed.clone()), "precision {}", precision);
    }
}
