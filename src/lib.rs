//! `DineMap` - restaurant discovery and nearby-favourites ranking
//!
//! This library provides the favourites pipeline of a restaurant discovery
//! application: given the restaurant directory and the user's coordinate, it
//! fetches the user's favourite IDs, joins each candidate against its remote
//! location record, and publishes the favourites within radius.

pub mod config;
pub mod error;
pub mod geo;
pub mod models;
pub mod pipeline;
pub mod providers;
pub mod store;

// Re-export core types for public API
pub use config::{DineMapConfig, LoggingConfig, SearchConfig, StoreConfig, init_logging};
pub use error::DineMapError;
pub use models::{FavouriteSet, GeoPoint, OperatingHours, Restaurant};
pub use pipeline::{FavouritesPipeline, PipelineState, RankedFavourite};
pub use providers::{FavouriteStore, IdentityProvider, LocationStore, UserLocationSource};
pub use store::DocumentStoreClient;

/// Library version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Core result type used throughout the library
pub type Result<T> = std::result::Result<T, DineMapError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_version_is_set() {
        assert!(!VERSION.is_empty());
    }
}
