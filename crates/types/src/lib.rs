//! # geocluster-types
//!
//! Core point types for the geocluster index.
//!
//! - **[`point::Point`]**: the capability the index stores (identity + lat/lon)
//! - **[`point::GeoPoint`]**: the concrete, serializable point
//! - **[`direction::Direction`]**: a compass bearing with named presets
//!
//! All types are serializable with Serde and convert into the `geo` crate's
//! primitives.
//!
//! ## Examples
//!
//! ```rust
//! use geocluster_types::direction::Direction;
//! use geocluster_types::point::{GeoPoint, Point};
//!
//! let london = GeoPoint::new("london", 51.5074, -0.1278);
//! let heading = Direction::NORTH_EAST;
//!
//! assert_eq!(london.to_geo().x(), -0.1278);
//! assert_eq!(heading.degrees(), 45.0);
//! ```

pub mod direction;
pub mod point;
