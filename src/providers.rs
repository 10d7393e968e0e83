//! Provider interfaces consumed by the favourites pipeline
//!
//! The pipeline never talks to the managed backend directly; it goes through
//! these traits so tests can substitute in-memory fakes and the identity is
//! always passed explicitly rather than read from ambient global state.

use crate::models::{FavouriteSet, GeoPoint};
use anyhow::Result;
use async_trait::async_trait;

/// Source of the currently authenticated user identity.
///
/// `None` means nobody is signed in; the pipeline treats that as a hard stop.
pub trait IdentityProvider: Send + Sync {
    fn current_user_id(&self) -> Option<String>;
}

/// Remote store of per-user favourite restaurant IDs.
#[async_trait]
pub trait FavouriteStore: Send + Sync {
    /// List the restaurant IDs the given user has favourited.
    async fn list_favourite_ids(&self, user_id: &str) -> Result<FavouriteSet>;
}

/// Remote store of per-restaurant location records.
#[async_trait]
pub trait LocationStore: Send + Sync {
    /// Fetch one restaurant's coordinate.
    ///
    /// `Ok(None)` means the restaurant has no location document; an `Err`
    /// means the lookup itself failed. The pipeline treats both the same way
    /// (drop that candidate), but callers outside the pipeline may care.
    async fn restaurant_location(&self, restaurant_id: &str) -> Result<Option<GeoPoint>>;
}

/// Snapshot source for the user's own coordinate.
///
/// Backed by device location services or a remote user record; the pipeline
/// reads one snapshot per run and never blocks waiting for a fix.
pub trait UserLocationSource: Send + Sync {
    fn current_location(&self) -> Option<GeoPoint>;
}
