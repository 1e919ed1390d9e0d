use geocluster::compute::geodesic::{great_circle_distance, move_point, move_point_long};
use geocluster::prelude::*;
use std::time::Duration;

static INDEX: IndexCell = IndexCell::new();

fn main() -> Result<()> {
    // Initialize logging (set RUST_LOG=debug to see detailed logs)
    env_logger::init();

    println!("=== geocluster - Capitals ===\n");

    // === BUILD ONCE ===
    println!("1. Building the index");
    println!("---------------------");

    let capitals = [
        ("london", 51.5074, -0.1278),
        ("paris", 48.8566, 2.3522),
        ("brussels", 50.8503, 4.3517),
        ("amsterdam", 52.3676, 4.9041),
        ("berlin", 52.5200, 13.4050),
        ("madrid", 40.4168, -3.7038),
        ("rome", 41.9028, 12.4964),
        ("stockholm", 59.3293, 18.0686),
        ("suva", -18.1248, 178.4501),
        ("apia", -13.8507, -171.7514),
    ];

    let index = IndexBuilder::new()
        .cell_precision(5)
        .points(
            capitals
                .iter()
                .map(|(id, lat, lon)| GeoPoint::new(*id, *lat, *lon)),
        )
        .build()?;
    let index = INDEX.initialize(index)?;

    let stats = index.stats();
    println!(
        "   {} points in {} cells (precision {})\n",
        stats.point_count, stats.cell_count, stats.precision
    );

    // === K-NEAREST ===
    println!("2. Nearest capitals");
    println!("-------------------");

    let london = GeoPoint::new("london", 51.5074, -0.1278);
    let nearest = index.k_nearest(&london, 3, 1_000_000.0, |p| p.id() != "london");
    println!("   3 nearest to London within 1000km:");
    for point in &nearest {
        println!(
            "     - {} ({:.0} km)",
            point.id(),
            great_circle_distance(&london, point) / 1000.0
        );
    }

    let suva = GeoPoint::new("suva", -18.1248, 178.4501);
    let (pacific, query_stats) =
        index.k_nearest_with_stats(&suva, 2, 2_000_000.0, |p| p.id() != "suva");
    println!(
        "   Across the date line from Suva: {:?} ({} cells, {} candidates)\n",
        pacific.iter().map(|p| p.id()).collect::<Vec<_>>(),
        query_stats.cells_examined,
        query_stats.candidates_examined
    );

    // === RANGE ===
    println!("3. Bounding box");
    println!("---------------");

    let top_left = GeoPoint::new("top_left", 55.0, -5.0);
    let bottom_right = GeoPoint::new("bottom_right", 45.0, 10.0);
    let boxed = index.range(&top_left, &bottom_right);
    println!("   Capitals between 45N-55N and 5W-10E:");
    for point in &boxed {
        println!("     - {}", point);
    }
    println!();

    // === GEODESIC MATH ===
    println!("4. Moving points");
    println!("----------------");

    let moved = move_point(&london, 25_000.0, Direction::NORTH_EAST)?.with_id("london+25km");
    println!("   {}", moved);

    match move_point(&london, 1_500_000.0, Direction::EAST) {
        Ok(point) => println!("   Unexpected long move: {}", point),
        Err(e) => println!("   Long move rejected: {}", e),
    }

    let far = move_point_long(&london, 1_500_000.0, Direction::EAST)?;
    println!("   Ellipsoidal solver: {}\n", far);

    // === EXPIRING MEMBERSHIP ===
    println!("5. Expiring membership");
    println!("----------------------");

    let clock = ManualClock::default();
    let mut active = ExpiringSet::with_clock(Duration::from_secs(600), clock.clone());
    active.add("paris", ());
    clock.advance(Duration::from_secs(400));
    active.add("amsterdam", ());
    clock.advance(Duration::from_secs(300));

    let nearest_active = index.k_nearest(&london, 3, 1_000_000.0, |p| active.contains(p.id()));
    println!(
        "   Active capitals near London after 700s: {:?}",
        nearest_active.iter().map(|p| p.id()).collect::<Vec<_>>()
    );
    println!("   Purged {} expired entries", active.cleanup_expired());

    Ok(())
}
