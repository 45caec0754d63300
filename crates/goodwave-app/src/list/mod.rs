//! Paginated spot list with the favorites overlay applied.
//!
//! [`SpotList`] is the single writer of the list state. Network calls run
//! outside the lock; every transition is published to subscribers as a
//! [`ListSnapshot`].

mod state;

use std::sync::{Mutex, MutexGuard, PoisonError};

use goodwave_client::{ClientError, SpotClient};
use goodwave_core::{Spot, SpotFilter, SpotId};
use tokio::sync::watch;

use crate::error::ListError;
use crate::favorites::load_favorite_set;
pub use state::{ListPhase, ListSnapshot};
use state::{Completion, ListState, LoadTicket};

/// What a load request ended up doing.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LoadOutcome {
    /// The page was merged; `added` spots were new to the list.
    Loaded { added: usize },
    /// Refused without a request: a load is in flight, nothing has loaded
    /// yet, or the last page is already merged.
    Skipped,
    /// The response arrived after a newer first-page load and was discarded.
    Superseded,
}

#[derive(Debug)]
pub struct SpotList {
    client: SpotClient,
    page_size: u32,
    state: Mutex<ListState>,
    updates: watch::Sender<ListSnapshot>,
}

impl SpotList {
    #[must_use]
    pub fn new(client: SpotClient, page_size: u32) -> Self {
        let state = ListState::new();
        let (updates, _) = watch::channel(state.snapshot());
        Self {
            client,
            page_size: page_size.max(1),
            state: Mutex::new(state),
            updates,
        }
    }

    /// Receiver that observes every published snapshot.
    #[must_use]
    pub fn subscribe(&self) -> watch::Receiver<ListSnapshot> {
        self.updates.subscribe()
    }

    #[must_use]
    pub fn snapshot(&self) -> ListSnapshot {
        self.lock().snapshot()
    }

    /// Loads page 1, replacing the list.
    ///
    /// Any load still in flight is superseded and its result will be dropped.
    ///
    /// # Errors
    ///
    /// Returns the fetch or decode error. The error is also recorded in the
    /// published snapshot and previously loaded spots are kept.
    pub async fn load_first_page(&self) -> Result<LoadOutcome, ClientError> {
        let ticket = self.transition(ListState::begin_first_load);
        self.run(ticket).await
    }

    /// Reloads from page 1. Same as [`Self::load_first_page`].
    ///
    /// # Errors
    ///
    /// See [`Self::load_first_page`].
    pub async fn refresh(&self) -> Result<LoadOutcome, ClientError> {
        tracing::debug!("refreshing spot list");
        self.load_first_page().await
    }

    /// Loads and appends the page after the current one.
    ///
    /// Returns [`LoadOutcome::Skipped`] without issuing a request if another
    /// load is in flight, no page has loaded yet, or the last page is merged.
    ///
    /// # Errors
    ///
    /// Returns the fetch or decode error. Spots already merged stay in the
    /// list and the call may be retried.
    pub async fn load_next_page(&self) -> Result<LoadOutcome, ClientError> {
        let ticket = {
            let mut state = self.lock();
            let ticket = state.begin_next_load();
            if ticket.is_some() {
                self.updates.send_replace(state.snapshot());
            }
            ticket
        };
        let Some(ticket) = ticket else {
            tracing::debug!("next page skipped");
            return Ok(LoadOutcome::Skipped);
        };
        self.run(ticket).await
    }

    async fn run(&self, ticket: LoadTicket) -> Result<LoadOutcome, ClientError> {
        tracing::debug!(page = ticket.page, generation = ticket.generation, "loading spots page");

        let (page, favorites) = tokio::join!(
            self.client.fetch_spots(ticket.page, self.page_size),
            load_favorite_set(&self.client),
        );

        match page {
            Ok(page) => {
                let completion = self.transition(|s| s.complete_success(ticket, page, &favorites));
                Ok(match completion {
                    Completion::Applied { added } => {
                        tracing::info!(page = ticket.page, added, "spots page merged");
                        LoadOutcome::Loaded { added }
                    }
                    Completion::Stale => {
                        tracing::debug!(page = ticket.page, "discarding superseded page");
                        LoadOutcome::Superseded
                    }
                })
            }
            Err(e) => {
                let message = e.to_string();
                match self.transition(|s| s.complete_failure(ticket, message)) {
                    Completion::Applied { .. } => {
                        tracing::warn!(page = ticket.page, error = %e, "spots page failed");
                        Err(e)
                    }
                    Completion::Stale => {
                        tracing::debug!(page = ticket.page, error = %e, "ignoring failure of superseded load");
                        Ok(LoadOutcome::Superseded)
                    }
                }
            }
        }
    }

    /// Flips the saved flag of a loaded spot and persists it. Returns the new
    /// value.
    ///
    /// # Errors
    ///
    /// Returns [`ListError::UnknownSpot`] if `id` is not in the list, or the
    /// backend error; in the latter case the spot is left as it was.
    pub async fn toggle_saved(&self, id: &SpotId) -> Result<bool, ListError> {
        let Some(current) = self.lock().saved(id) else {
            return Err(ListError::UnknownSpot(id.clone()));
        };
        let target = !current;
        self.set_saved(id, target).await?;
        Ok(target)
    }

    /// Persists `saved` for `id`, then updates that one spot in the list.
    ///
    /// The id does not have to be loaded; the backend call is made either way.
    ///
    /// # Errors
    ///
    /// Returns the backend error after recording it in the published snapshot.
    /// Spots, phase and page counters are left unchanged.
    pub async fn set_saved(&self, id: &SpotId, saved: bool) -> Result<(), ListError> {
        if let Err(e) = self.client.set_favorite(id, saved).await {
            tracing::warn!(spot_id = %id, saved, error = %e, "favorite update failed");
            let message = e.to_string();
            self.transition(|s| s.record_error(message));
            return Err(e.into());
        }

        let applied = self.transition(|s| s.apply_saved(id, saved));
        tracing::info!(spot_id = %id, saved, in_list = applied, "favorite updated");
        Ok(())
    }

    /// Fetches one spot with its saved flag and refreshes the loaded copy.
    ///
    /// # Errors
    ///
    /// Returns the backend error for the spot itself. A failed favorites fetch
    /// only leaves the spot unsaved.
    pub async fn spot(&self, id: &SpotId) -> Result<Spot, ListError> {
        let (spot, favorites) =
            tokio::join!(self.client.fetch_spot(id), load_favorite_set(&self.client));
        let spot = spot?;
        let spot = spot.with_saved(favorites.contains(&spot.id));

        let fresh = spot.clone();
        self.transition(|s| s.replace(fresh));
        Ok(spot)
    }

    /// Loaded spots that pass `filter`, in list order.
    #[must_use]
    pub fn filtered(&self, filter: &SpotFilter) -> Vec<Spot> {
        let state = self.lock();
        filter
            .apply(state.spots())
            .into_iter()
            .cloned()
            .collect()
    }

    /// Runs `f` under the lock and publishes the resulting snapshot.
    fn transition<R>(&self, f: impl FnOnce(&mut ListState) -> R) -> R {
        let mut state = self.lock();
        let result = f(&mut state);
        self.updates.send_replace(state.snapshot());
        result
    }

    fn lock(&self) -> MutexGuard<'_, ListState> {
        self.state.lock().unwrap_or_else(PoisonError::into_inner)
    }
}
