//! Small GeoJSON helpers
//!
//! Listing a property over every feature of a collection, and pulling a
//! single coordinate out of point geometries.

mod feature_list;
mod point_coordinate;

// Re-export key types
pub use self::feature_list::{feature_list, read_features, unique_values};
pub use self::point_coordinate::{point_coordinate, Axis};
