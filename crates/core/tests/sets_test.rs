use geocluster::{ExpiringSet, GeoPoint, KeyedSet, ManualClock, Point};
use std::time::{Duration, SystemTime};

fn charing_cross() -> GeoPoint {
    GeoPoint::new("Charing Cross", 51.508_359, -0.124_803)
}

fn embankment() -> GeoPoint {
    GeoPoint::new("Embankment", 51.507_312, -0.122_367)
}

fn piccadilly() -> GeoPoint {
    GeoPoint::new("Piccadilly Circus", 51.510_037, -0.134_094)
}

fn oxford_circus() -> GeoPoint {
    GeoPoint::new("Oxford Circus", 51.515_419, -0.141_099)
}

fn minutes(m: u64) -> Duration {
    Duration::from_secs(m * 60)
}

fn sorted_ids<'a>(points: impl Iterator<Item = &'a GeoPoint>) -> Vec<String> {
    let mut ids: Vec<String> = points.map(|p| p.id().to_string()).collect();
    ids.sort();
    ids
}

#[test]
fn test_keyed_set() {
    let mut set = KeyedSet::new();
    assert_eq!(set.len(), 0);

    set.add(charing_cross().id(), charing_cross());
    assert_eq!(set.len(), 1);

    set.add(embankment().id(), embankment());
    assert_eq!(set.len(), 2);

    set.remove(charing_cross().id());
    assert_eq!(set.len(), 1);

    assert!(set.get(charing_cross().id()).is_none());
    assert_eq!(set.get("Embankment").unwrap().id(), "Embankment");

    set.add(piccadilly().id(), piccadilly());
    set.add(oxford_circus().id(), oxford_circus());

    assert_eq!(
        sorted_ids(set.values()),
        vec!["Embankment", "Oxford Circus", "Piccadilly Circus"]
    );
}

#[test]
fn test_keyed_set_overwrites() {
    let mut set = KeyedSet::new();
    assert!(set.add("station", charing_cross()).is_none());

    let replaced = set.add("station", embankment()).unwrap();
    assert_eq!(replaced.id(), "Charing Cross");
    assert_eq!(set.len(), 1);
    assert_eq!(set.get("station").unwrap().id(), "Embankment");
}

#[test]
fn test_expiring_set() {
    let start = SystemTime::UNIX_EPOCH + Duration::from_secs(1_700_000_000);
    let clock = ManualClock::new(start);
    let mut set = ExpiringSet::with_clock(minutes(10), clock.clone());

    set.add(piccadilly().id(), piccadilly());

    clock.set(start + minutes(5));
    set.add(oxford_circus().id(), oxford_circus());
    assert_eq!(set.len(), 2);
    assert_eq!(set.values().count(), 2);

    set.remove(piccadilly().id());
    assert_eq!(set.len(), 1);

    clock.set(start + minutes(11));
    assert_eq!(set.len(), 1);

    set.add(oxford_circus().id(), oxford_circus());
    assert_eq!(set.len(), 1);
    assert_eq!(set.values().count(), 1);

    clock.set(start + minutes(16));
    assert_eq!(set.len(), 1);
    assert_eq!(set.values().count(), 1);

    clock.set(start + minutes(22));
    assert_eq!(set.len(), 0);
    assert_eq!(set.values().count(), 0);

    clock.set(start + minutes(24));
    assert_eq!(set.len(), 0);
    set.add(oxford_circus().id(), oxford_circus());
    clock.set(start + minutes(25));
    set.add(oxford_circus().id(), oxford_circus());
    clock.set(start + minutes(26));
    set.add(oxford_circus().id(), oxford_circus());
    assert_eq!(set.len(), 1);

    set.remove(oxford_circus().id());
    assert_eq!(set.len(), 0);
}

#[test]
fn test_refreshed_entry_outlives_sibling() {
    let start = SystemTime::UNIX_EPOCH + Duration::from_secs(1_700_000_000);
    let clock = ManualClock::new(start);
    let mut set = ExpiringSet::with_clock(minutes(10), clock.clone());

    set.add(piccadilly().id(), piccadilly());
    set.add(oxford_circus().id(), oxford_circus());

    clock.set(start + minutes(5));
    assert_eq!(set.len(), 2);
    set.remove(piccadilly().id());
    assert_eq!(set.len(), 1);

    clock.set(start + minutes(11));
    set.add(embankment().id(), embankment());
    for minute in [16, 17, 18] {
        clock.set(start + minutes(minute));
        set.add(oxford_circus().id(), oxford_circus());
        assert!(set.contains("Oxford Circus"));
        assert_eq!(set.len(), 2);
    }

    clock.set(start + minutes(22));
    assert!(set.contains("Oxford Circus"));
    assert!(!set.contains("Embankment"));
    assert_eq!(set.len(), 1);
    assert_eq!(sorted_ids(set.values()), vec!["Oxford Circus"]);
}

#[test]
fn test_expired_entry_lingers_until_cleanup() {
    let clock = ManualClock::default();
    let mut set = ExpiringSet::with_clock(minutes(10), clock.clone());

    set.add(embankment().id(), embankment());
    clock.advance(minutes(30));

    assert!(set.get("Embankment").is_none());
    assert!(!set.contains("Embankment"));
    assert_eq!(set.stored_len(), 1);

    assert_eq!(set.cleanup_expired(), 1);
    assert_eq!(set.stored_len(), 0);
}

#[test]
fn test_expiring_set_with_wall_clock() {
    let mut set = ExpiringSet::new(Duration::from_secs(3600));
    assert_eq!(set.ttl(), Duration::from_secs(3600));

    set.add(charing_cross().id(), charing_cross());
    assert_eq!(set.get("Charing Cross").unwrap().lat(), 51.508_359);
}
