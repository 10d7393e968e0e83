//! Core data models for restaurant discovery

pub mod location;
pub mod restaurant;

pub use location::GeoPoint;
pub use restaurant::{OperatingHours, Restaurant};

use std::collections::HashSet;

/// Restaurant identifiers a user has marked as favourite.
///
/// Unordered; membership testing is the only operation the pipeline needs.
pub type FavouriteSet = HashSet<String>;
