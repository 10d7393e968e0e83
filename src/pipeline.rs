//! Nearby-favourites pipeline
//!
//! Joins the user's favourite set against the restaurant directory, fans out
//! one remote location lookup per candidate, filters by great-circle distance
//! to the user, and publishes the surviving entries plus a loading flag
//! through an observable state container.

use crate::config::SearchConfig;
use crate::error::DineMapError;
use crate::geo;
use crate::models::{GeoPoint, Restaurant};
use crate::providers::{FavouriteStore, IdentityProvider, LocationStore, UserLocationSource};
use futures::future::join_all;
use std::sync::Arc;
use std::sync::atomic::{AtomicU64, Ordering};
use std::time::Duration;
use tokio::sync::watch;
use tracing::{debug, info, instrument, warn};

/// A favourited restaurant annotated with its distance from the user.
///
/// Produced per run, never persisted.
#[derive(Debug, Clone, PartialEq)]
pub struct RankedFavourite {
    pub restaurant: Restaurant,
    pub distance_km: f64,
}

/// State published to subscribers after each pipeline transition.
///
/// Single writer (the pipeline), any number of readers.
#[derive(Debug, Clone, Default)]
pub struct PipelineState {
    /// Favourites within radius, in directory order of the surviving candidates
    pub favourites: Vec<RankedFavourite>,
    /// True from run start until its join completes
    pub loading: bool,
    /// Generation of the run that produced this state
    pub generation: u64,
}

/// The favourites-with-geo-filtering pipeline.
///
/// Providers are injected explicitly so the identity, favourite set, and
/// location records can all be faked in tests.
pub struct FavouritesPipeline {
    identity: Arc<dyn IdentityProvider>,
    favourite_store: Arc<dyn FavouriteStore>,
    location_store: Arc<dyn LocationStore>,
    user_location: Arc<dyn UserLocationSource>,
    radius_km: f64,
    lookup_timeout: Duration,
    generation: AtomicU64,
    state_tx: watch::Sender<PipelineState>,
}

impl FavouritesPipeline {
    /// Create a new pipeline over the given providers
    pub fn new(
        identity: Arc<dyn IdentityProvider>,
        favourite_store: Arc<dyn FavouriteStore>,
        location_store: Arc<dyn LocationStore>,
        user_location: Arc<dyn UserLocationSource>,
        search: &SearchConfig,
    ) -> Self {
        let (state_tx, _) = watch::channel(PipelineState::default());
        Self {
            identity,
            favourite_store,
            location_store,
            user_location,
            radius_km: search.radius_km,
            lookup_timeout: Duration::from_secs(search.lookup_timeout_seconds.into()),
            generation: AtomicU64::new(0),
            state_tx,
        }
    }

    /// Subscribe to published pipeline state
    #[must_use]
    pub fn subscribe(&self) -> watch::Receiver<PipelineState> {
        self.state_tx.subscribe()
    }

    /// Last published state
    #[must_use]
    pub fn current_state(&self) -> PipelineState {
        self.state_tx.borrow().clone()
    }

    /// Run the pipeline once against the given restaurant directory.
    ///
    /// Returns the ranked favourites within radius. Run-level failures
    /// (identity, user location, favourite fetch) abort the run with a typed
    /// error; per-candidate lookup failures only drop that candidate. An
    /// `Ok(vec![])` therefore genuinely means "no favourites nearby".
    ///
    /// Overlapping runs are allowed; a run that has been superseded by a
    /// newer one still returns its result to the caller but no longer
    /// overwrites the published state.
    #[instrument(skip(self, directory), fields(directory_len = directory.len()))]
    pub async fn run(
        &self,
        directory: &[Restaurant],
    ) -> Result<Vec<RankedFavourite>, DineMapError> {
        let generation = self.generation.fetch_add(1, Ordering::SeqCst) + 1;
        self.publish(generation, Vec::new(), true);

        let Some(user_id) = self.identity.current_user_id() else {
            debug!("No authenticated user, stopping run {}", generation);
            self.publish(generation, Vec::new(), false);
            return Err(DineMapError::NotAuthenticated);
        };

        // Snapshot the coordinate once per run; never compute against a
        // stale or unresolved fix.
        let Some(user_point) = self.user_location.current_location() else {
            debug!("User location not resolved yet, run {} stays loading", generation);
            self.publish(generation, Vec::new(), true);
            return Err(DineMapError::LocationUnavailable);
        };

        let favourite_ids = match self.favourite_store.list_favourite_ids(&user_id).await {
            Ok(ids) => ids,
            Err(e) => {
                warn!("Favourite fetch failed for user {}: {}", user_id, e);
                self.publish(generation, Vec::new(), false);
                return Err(DineMapError::favourite_fetch(e.to_string()));
            }
        };

        let candidates: Vec<&Restaurant> = directory
            .iter()
            .filter(|restaurant| favourite_ids.contains(&restaurant.id))
            .collect();
        info!(
            "Run {}: joining locations for {} of {} directory entries",
            generation,
            candidates.len(),
            directory.len()
        );

        // Fan out one lookup per candidate; the join completes only after
        // every lookup has settled.
        let lookups = candidates
            .into_iter()
            .map(|restaurant| self.locate_and_rank(restaurant, user_point));
        let favourites: Vec<RankedFavourite> = join_all(lookups).await.into_iter().flatten().collect();

        debug!(
            "Run {}: {} favourites within {:.1} km",
            generation,
            favourites.len(),
            self.radius_km
        );
        self.publish(generation, favourites.clone(), false);
        Ok(favourites)
    }

    /// Fetch one candidate's location and rank it against the radius.
    ///
    /// Every failure mode (lookup error, timeout, missing or unparseable
    /// record, outside radius) drops the candidate without affecting the
    /// rest of the join.
    async fn locate_and_rank(
        &self,
        restaurant: &Restaurant,
        user_point: GeoPoint,
    ) -> Option<RankedFavourite> {
        let lookup = self.location_store.restaurant_location(&restaurant.id);
        let point = match tokio::time::timeout(self.lookup_timeout, lookup).await {
            Ok(Ok(Some(point))) => point,
            Ok(Ok(None)) => {
                debug!("No location record for {}", restaurant.id);
                return None;
            }
            Ok(Err(e)) => {
                debug!("Location lookup failed for {}: {}", restaurant.id, e);
                return None;
            }
            Err(_) => {
                debug!("Location lookup timed out for {}", restaurant.id);
                return None;
            }
        };

        let distance_km = geo::distance_km(&user_point, &point);
        if distance_km <= self.radius_km {
            Some(RankedFavourite {
                restaurant: restaurant.clone(),
                distance_km,
            })
        } else {
            debug!(
                "{} is {:.1} km away, outside {:.1} km radius",
                restaurant.id, distance_km, self.radius_km
            );
            None
        }
    }

    /// Publish state unless a newer run has already published.
    fn publish(&self, generation: u64, favourites: Vec<RankedFavourite>, loading: bool) {
        self.state_tx.send_modify(|state| {
            if generation < state.generation {
                debug!(
                    "Discarding publish from superseded run {} (current is {})",
                    generation, state.generation
                );
                return;
            }
            *state = PipelineState {
                favourites,
                loading,
                generation,
            };
        });
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{FavouriteSet, OperatingHours};
    use anyhow::Result;
    use async_trait::async_trait;
    use chrono::NaiveTime;

    struct NoIdentity;
    impl IdentityProvider for NoIdentity {
        fn current_user_id(&self) -> Option<String> {
            None
        }
    }

    struct SomeIdentity;
    impl IdentityProvider for SomeIdentity {
        fn current_user_id(&self) -> Option<String> {
            Some("user-1".to_string())
        }
    }

    /// Store that must never be reached
    struct UnreachableStore;
    #[async_trait]
    impl FavouriteStore for UnreachableStore {
        async fn list_favourite_ids(&self, _user_id: &str) -> Result<FavouriteSet> {
            panic!("favourite store must not be called");
        }
    }
    #[async_trait]
    impl LocationStore for UnreachableStore {
        async fn restaurant_location(&self, _restaurant_id: &str) -> Result<Option<GeoPoint>> {
            panic!("location store must not be called");
        }
    }

    struct NoFix;
    impl UserLocationSource for NoFix {
        fn current_location(&self) -> Option<GeoPoint> {
            None
        }
    }

    fn restaurant(id: &str) -> Restaurant {
        Restaurant {
            id: id.to_string(),
            name: format!("Restaurant {id}"),
            cuisine: "Test".to_string(),
            address: "1 Test St".to_string(),
            city: "Testville".to_string(),
            average_cost: "20".to_string(),
            hours: OperatingHours::new(
                NaiveTime::from_hms_opt(9, 0, 0).unwrap(),
                NaiveTime::from_hms_opt(22, 0, 0).unwrap(),
            ),
        }
    }

    fn pipeline(identity: Arc<dyn IdentityProvider>) -> FavouritesPipeline {
        FavouritesPipeline::new(
            identity,
            Arc::new(UnreachableStore),
            Arc::new(UnreachableStore),
            Arc::new(NoFix),
            &SearchConfig::default(),
        )
    }

    #[test]
    fn test_initial_state_is_idle_and_empty() {
        let state = pipeline(Arc::new(SomeIdentity)).current_state();
        assert!(state.favourites.is_empty());
        assert!(!state.loading);
        assert_eq!(state.generation, 0);
    }

    #[tokio::test]
    async fn test_not_authenticated_publishes_empty_and_idle() {
        let pipeline = pipeline(Arc::new(NoIdentity));
        let result = pipeline.run(&[restaurant("a")]).await;
        assert!(matches!(result, Err(DineMapError::NotAuthenticated)));

        let state = pipeline.current_state();
        assert!(state.favourites.is_empty());
        assert!(!state.loading);
    }

    #[tokio::test]
    async fn test_location_unavailable_stays_loading() {
        let pipeline = pipeline(Arc::new(SomeIdentity));
        let result = pipeline.run(&[restaurant("a")]).await;
        assert!(matches!(result, Err(DineMapError::LocationUnavailable)));

        let state = pipeline.current_state();
        assert!(state.favourites.is_empty());
        assert!(state.loading);
    }

    #[test]
    fn test_superseded_publish_is_discarded() {
        let pipeline = pipeline(Arc::new(SomeIdentity));
        let newer = vec![RankedFavourite {
            restaurant: restaurant("new"),
            distance_km: 1.0,
        }];
        pipeline.publish(2, newer.clone(), false);
        // Late result from an older run must not overwrite the newer one
        pipeline.publish(
            1,
            vec![RankedFavourite {
                restaurant: restaurant("old"),
                distance_km: 2.0,
            }],
            false,
        );

        let state = pipeline.current_state();
        assert_eq!(state.generation, 2);
        assert_eq!(state.favourites, newer);
    }
}
