use serde::{Deserialize, Serialize};

/// A compass bearing in degrees, clockwise from north, normalized to `[0, 360)`.
///
/// # Examples
///
/// ```
/// use geocluster_types::direction::Direction;
///
/// assert_eq!(Direction::EAST.degrees(), 90.0);
/// assert_eq!(Direction::new(-90.0), Direction::WEST);
/// assert_eq!(Direction::new(720.0), Direction::NORTH);
/// ```
#[derive(Debug, Clone, Copy, PartialEq, PartialOrd, Serialize, Deserialize)]
#[serde(from = "f64", into = "f64")]
pub struct Direction(f64);

impl Direction {
    pub const NORTH: Direction = Direction(0.0);
    pub const NORTH_EAST: Direction = Direction(45.0);
    pub const EAST: Direction = Direction(90.0);
    pub const SOUTH_EAST: Direction = Direction(135.0);
    pub const SOUTH: Direction = Direction(180.0);
    pub const SOUTH_WEST: Direction = Direction(225.0);
    pub const WEST: Direction = Direction(270.0);
    pub const NORTH_WEST: Direction = Direction(315.0);

    /// Bearing from an arbitrary angle in degrees; wraps into `[0, 360)`.
    pub fn new(degrees: f64) -> Self {
        let wrapped = degrees.rem_euclid(360.0);
        // rem_euclid can round up to exactly 360 for tiny negative inputs
        if wrapped >= 360.0 {
            Self(0.0)
        } else {
            Self(wrapped)
        }
    }

    /// Angle in degrees.
    #[inline]
    pub fn degrees(self) -> f64 {
        self.0
    }

    /// Angle in radians.
    #[inline]
    pub fn to_radians(self) -> f64 {
        self.0.to_radians()
    }

    /// The opposite heading.
    pub fn reverse(self) -> Self {
        Self::new(self.0 + 180.0)
    }
}

impl Default for Direction {
    fn default() -> Self {
        Self::NORTH
    }
}

impl From<f64> for Direction {
    fn from(degrees: f64) -> Self {
        Self::new(degrees)
    }
}

impl From<Direction> for f64 {
    fn from(direction: Direction) -> Self {
        direction.0
    }
}

impl std::fmt::Display for Direction {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}°", self.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_presets() {
        assert_eq!(Direction::NORTH.degrees(), 0.0);
        assert_eq!(Direction::EAST.degrees(), 90.0);
        assert_eq!(Direction::SOUTH.degrees(), 180.0);
        assert_eq!(Direction::WEST.degrees(), 270.0);
    }

    #[test]
    fn test_normalization() {
        assert_eq!(Direction::new(360.0), Direction::NORTH);
        assert_eq!(Direction::new(-45.0), Direction::NORTH_WEST);
        assert_eq!(Direction::new(-1e-20).degrees(), 0.0);
        assert!((Direction::new(1000.0).degrees() - 280.0).abs() < 1e-9);
    }

    #[test]
    fn test_deserialize_normalizes() {
        let wrapped: Direction = serde_json::from_str("450.0").unwrap();
        assert_eq!(wrapped, Direction::EAST);
        let negative: Direction = serde_json::from_str("-90.0").unwrap();
        assert_eq!(negative, Direction::WEST);

        assert_eq!(serde_json::to_string(&Direction::SOUTH).unwrap(), "180.0");
    }

    #[test]
    fn test_reverse() {
        assert_eq!(Direction::NORTH.reverse(), Direction::SOUTH);
        assert_eq!(Direction::WEST.reverse(), Direction::EAST);
    }

    #[test]
    fn test_radians() {
        assert!((Direction::SOUTH.to_radians() - std::f64::consts::PI).abs() < 1e-15);
    }
}
