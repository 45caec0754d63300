//! Pure state machine behind [`super::SpotList`].
//!
//! Loads are two-phase: `begin_*` hands out a [`LoadTicket`] and moves into a
//! loading phase, `complete_*` applies the result. Every first-page load bumps
//! the generation; a completion carrying an older generation is stale and is
//! dropped without touching state.

use std::collections::HashSet;

use goodwave_client::Page;
use goodwave_core::{Spot, SpotId};

use crate::favorites::FavoriteSet;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ListPhase {
    #[default]
    Idle,
    LoadingFirstPage,
    LoadingNextPage,
    Ready,
    Error,
}

impl ListPhase {
    #[must_use]
    pub fn is_loading(self) -> bool {
        matches!(self, ListPhase::LoadingFirstPage | ListPhase::LoadingNextPage)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum LoadKind {
    First,
    Next,
}

/// Permission to fetch one page, tagged with the generation it belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) struct LoadTicket {
    pub page: u32,
    pub generation: u64,
    pub kind: LoadKind,
}

/// Result of applying a completed fetch.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum Completion {
    /// State changed; `added` spots were new.
    Applied { added: usize },
    /// Superseded by a newer load; state untouched.
    Stale,
}

/// Published view of the list. `current_page` is 0 until a page has loaded.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct ListSnapshot {
    pub spots: Vec<Spot>,
    pub phase: ListPhase,
    pub is_loading: bool,
    pub error: Option<String>,
    pub current_page: u32,
    pub total_pages: u32,
}

#[derive(Debug, Default)]
pub(crate) struct ListState {
    spots: Vec<Spot>,
    phase: ListPhase,
    error: Option<String>,
    current_page: u32,
    total_pages: u32,
    generation: u64,
}

impl ListState {
    pub(crate) fn new() -> Self {
        Self::default()
    }

    /// Starts (or restarts) a load of page 1. Always granted; any load still in
    /// flight becomes stale.
    pub(crate) fn begin_first_load(&mut self) -> LoadTicket {
        self.generation += 1;
        self.phase = ListPhase::LoadingFirstPage;
        self.error = None;
        LoadTicket {
            page: 1,
            generation: self.generation,
            kind: LoadKind::First,
        }
    }

    /// Starts a load of the page after the current one.
    ///
    /// Returns `None` while another load is in flight, before the first page
    /// has loaded, or when the last page has already been merged.
    pub(crate) fn begin_next_load(&mut self) -> Option<LoadTicket> {
        if self.phase.is_loading() || self.current_page == 0 {
            return None;
        }
        if self.current_page >= self.total_pages {
            return None;
        }

        self.phase = ListPhase::LoadingNextPage;
        Some(LoadTicket {
            page: self.current_page + 1,
            generation: self.generation,
            kind: LoadKind::Next,
        })
    }

    fn is_current(&self, ticket: LoadTicket) -> bool {
        let expected_phase = match ticket.kind {
            LoadKind::First => ListPhase::LoadingFirstPage,
            LoadKind::Next => ListPhase::LoadingNextPage,
        };
        ticket.generation == self.generation && self.phase == expected_phase
    }

    /// Applies a successfully decoded page, stamping saved flags from
    /// `favorites` before anything becomes visible.
    ///
    /// Page 1 replaces the list. Later pages are appended in server order,
    /// skipping ids already present.
    pub(crate) fn complete_success(
        &mut self,
        ticket: LoadTicket,
        page: Page<Spot>,
        favorites: &FavoriteSet,
    ) -> Completion {
        if !self.is_current(ticket) {
            return Completion::Stale;
        }

        let current_page = page.current_page();
        let total_pages = page.total_pages();

        let mut incoming = match ticket.kind {
            LoadKind::First => {
                self.spots.clear();
                dedupe(page.items, &HashSet::new())
            }
            LoadKind::Next => {
                let seen: HashSet<SpotId> = self.spots.iter().map(|s| s.id.clone()).collect();
                dedupe(page.items, &seen)
            }
        };
        favorites.reconcile(&mut incoming);

        let added = incoming.len();
        self.spots.extend(incoming);
        self.current_page = current_page;
        self.total_pages = total_pages;
        self.phase = ListPhase::Ready;
        self.error = None;

        Completion::Applied { added }
    }

    /// Records a failed fetch. Already-merged spots are kept.
    pub(crate) fn complete_failure(&mut self, ticket: LoadTicket, message: String) -> Completion {
        if !self.is_current(ticket) {
            return Completion::Stale;
        }
        self.phase = ListPhase::Error;
        self.error = Some(message);
        Completion::Applied { added: 0 }
    }

    pub(crate) fn spots(&self) -> &[Spot] {
        &self.spots
    }

    pub(crate) fn saved(&self, id: &SpotId) -> Option<bool> {
        self.spots.iter().find(|s| s.id == *id).map(|s| s.saved)
    }

    /// Sets one spot's saved flag. Returns `false` if the id is not loaded.
    ///
    /// A settled list (`Idle` or `Error`) becomes `Ready`; a load in flight
    /// keeps its phase.
    pub(crate) fn apply_saved(&mut self, id: &SpotId, saved: bool) -> bool {
        let Some(spot) = self.spots.iter_mut().find(|s| s.id == *id) else {
            return false;
        };
        spot.saved = saved;
        if !self.phase.is_loading() {
            self.phase = ListPhase::Ready;
            self.error = None;
        }
        true
    }

    /// Replaces the loaded copy of `spot` with a newer decode of the same id.
    pub(crate) fn replace(&mut self, spot: Spot) -> bool {
        match self.spots.iter_mut().find(|s| s.id == spot.id) {
            Some(existing) => {
                *existing = spot;
                true
            }
            None => false,
        }
    }

    /// Surfaces an error without changing phase, spots, or page counters.
    pub(crate) fn record_error(&mut self, message: String) {
        self.error = Some(message);
    }

    pub(crate) fn snapshot(&self) -> ListSnapshot {
        ListSnapshot {
            spots: self.spots.clone(),
            phase: self.phase,
            is_loading: self.phase.is_loading(),
            error: self.error.clone(),
            current_page: self.current_page,
            total_pages: self.total_pages,
        }
    }
}

/// Drops spots whose id is in `seen` or repeats earlier in `items`.
fn dedupe(items: Vec<Spot>, seen: &HashSet<SpotId>) -> Vec<Spot> {
    let mut fresh: HashSet<SpotId> = HashSet::new();
    items
        .into_iter()
        .filter(|spot| !seen.contains(&spot.id) && fresh.insert(spot.id.clone()))
        .collect()
}

#[cfg(test)]
#[path = "state_test.rs"]
mod tests;
