//! Geocoded positions of spots and the region that frames them.
//!
//! [`SpotMap`] owns the coordinate map. Lookups run concurrently through
//! [`geocode_batch`]; their results are merged in one step per batch, after
//! which the region is recomputed and a [`MapSnapshot`] is published.

mod batch;
mod region;

use std::collections::{HashMap, HashSet};
use std::sync::{Mutex, MutexGuard, PoisonError};

use goodwave_client::Geocoder;
use goodwave_core::{Coordinate, Spot, SpotId};
use tokio::sync::watch;

use crate::list::ListSnapshot;
pub use batch::geocode_batch;
pub use region::MapRegion;

pub type CoordinateMap = HashMap<SpotId, Coordinate>;

#[derive(Debug, Clone, PartialEq, Default)]
pub struct MapSnapshot {
    pub coordinates: CoordinateMap,
    pub region: MapRegion,
    pub is_geocoding: bool,
}

/// What a [`SpotMap::geocode_missing`] call did.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BatchOutcome {
    /// Another batch is still running; nothing was started.
    Busy,
    /// Every spot already has a coordinate.
    NothingToDo,
    Completed { attempted: usize, resolved: usize },
}

#[derive(Debug, Default)]
struct MapState {
    coordinates: CoordinateMap,
    region: MapRegion,
    in_flight: bool,
}

impl MapState {
    fn snapshot(&self) -> MapSnapshot {
        MapSnapshot {
            coordinates: self.coordinates.clone(),
            region: self.region,
            is_geocoding: self.in_flight,
        }
    }

    fn fit_region(&mut self) {
        self.region = MapRegion::fit(self.coordinates.values()).unwrap_or_else(MapRegion::world);
    }
}

pub struct SpotMap<G> {
    geocoder: G,
    max_concurrent: usize,
    state: Mutex<MapState>,
    updates: watch::Sender<MapSnapshot>,
}

impl<G: Geocoder> SpotMap<G> {
    #[must_use]
    pub fn new(geocoder: G, max_concurrent: usize) -> Self {
        let state = MapState::default();
        let (updates, _) = watch::channel(state.snapshot());
        Self {
            geocoder,
            max_concurrent: max_concurrent.max(1),
            state: Mutex::new(state),
            updates,
        }
    }

    #[must_use]
    pub fn subscribe(&self) -> watch::Receiver<MapSnapshot> {
        self.updates.subscribe()
    }

    #[must_use]
    pub fn snapshot(&self) -> MapSnapshot {
        self.lock().snapshot()
    }

    #[must_use]
    pub fn coordinate(&self, id: &SpotId) -> Option<Coordinate> {
        self.lock().coordinates.get(id).copied()
    }

    /// Geocodes the spots that have no coordinate yet and merges the results
    /// into the map.
    ///
    /// Only one batch runs at a time; a call made while one is in flight
    /// returns [`BatchOutcome::Busy`]. Existing coordinates are never dropped.
    /// Failed lookups are left out and will be attempted again by the next
    /// call.
    pub async fn geocode_missing(&self, spots: &[Spot]) -> BatchOutcome {
        let pending: Vec<Spot> = {
            let mut state = self.lock();
            if state.in_flight {
                return BatchOutcome::Busy;
            }

            let mut seen = HashSet::new();
            let pending: Vec<Spot> = spots
                .iter()
                .filter(|s| !state.coordinates.contains_key(&s.id) && seen.insert(&s.id))
                .cloned()
                .collect();
            if pending.is_empty() {
                return BatchOutcome::NothingToDo;
            }

            state.in_flight = true;
            self.updates.send_replace(state.snapshot());
            pending
        };

        tracing::info!(pending = pending.len(), "geocoding spots");

        let mut batch = InFlightBatch {
            map: self,
            resolved: CoordinateMap::new(),
        };
        batch.resolved = geocode_batch(&self.geocoder, &pending, self.max_concurrent).await;
        let resolved = batch.resolved.len();
        drop(batch);

        BatchOutcome::Completed {
            attempted: pending.len(),
            resolved,
        }
    }

    /// Refits the region to every known coordinate, or the world view if
    /// there are none.
    pub fn recenter(&self) -> MapRegion {
        let mut state = self.lock();
        state.fit_region();
        self.updates.send_replace(state.snapshot());
        state.region
    }

    /// Geocodes newly listed spots each time `list` publishes, until the
    /// list is dropped.
    ///
    /// A snapshot that arrives while another batch is in flight is retried
    /// once that batch settles, so no published spots are left unplaced.
    pub async fn track_list(&self, mut list: watch::Receiver<ListSnapshot>) {
        let mut own = self.updates.subscribe();
        loop {
            let spots = list.borrow_and_update().spots.clone();
            loop {
                match self.geocode_missing(&spots).await {
                    BatchOutcome::Busy => {
                        tracing::debug!("map busy, retrying once the batch settles");
                        if own.wait_for(|snap| !snap.is_geocoding).await.is_err() {
                            return;
                        }
                    }
                    BatchOutcome::Completed { attempted, resolved } => {
                        tracing::debug!(attempted, resolved, "map caught up with list");
                        break;
                    }
                    BatchOutcome::NothingToDo => break,
                }
            }
            if list.changed().await.is_err() {
                break;
            }
        }
    }

    fn lock(&self) -> MutexGuard<'_, MapState> {
        self.state.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

/// Merges a batch's results and clears the in-flight flag when dropped, so a
/// cancelled batch does not leave the map stuck.
struct InFlightBatch<'a, G: Geocoder> {
    map: &'a SpotMap<G>,
    resolved: CoordinateMap,
}

impl<G: Geocoder> Drop for InFlightBatch<'_, G> {
    fn drop(&mut self) {
        let mut state = self.map.lock();
        if !self.resolved.is_empty() {
            state.coordinates.extend(self.resolved.drain());
            state.fit_region();
        }
        state.in_flight = false;
        self.map.updates.send_replace(state.snapshot());
    }
}

#[cfg(test)]
#[path = "map_test.rs"]
mod tests;
