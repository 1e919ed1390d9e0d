pub mod geodesic;
pub use geodesic::{
    bearing_to_radians, great_circle_distance, move_point, move_point_long, move_point_short,
    to_degrees, to_radians,
};
