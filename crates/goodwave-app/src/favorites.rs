//! Favorites overlay: which spots the current user has saved.

use std::collections::HashSet;

use goodwave_client::SpotClient;
use goodwave_core::{Spot, SpotId};

/// Identifiers of the user's favorited spots.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FavoriteSet {
    ids: HashSet<SpotId>,
}

impl FavoriteSet {
    #[must_use]
    pub fn from_spots(favorites: &[Spot]) -> Self {
        favorites.iter().map(|spot| spot.id.clone()).collect()
    }

    #[must_use]
    pub fn contains(&self, id: &SpotId) -> bool {
        self.ids.contains(id)
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.ids.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.ids.is_empty()
    }

    /// Membership of each id, in input order.
    pub fn saved_flags<'a>(&self, ids: impl IntoIterator<Item = &'a SpotId>) -> Vec<bool> {
        ids.into_iter().map(|id| self.contains(id)).collect()
    }

    /// Stamps every spot's `saved` flag from membership in this set.
    pub fn reconcile(&self, spots: &mut [Spot]) {
        for spot in spots {
            spot.saved = self.contains(&spot.id);
        }
    }
}

impl FromIterator<SpotId> for FavoriteSet {
    fn from_iter<I: IntoIterator<Item = SpotId>>(iter: I) -> Self {
        Self {
            ids: iter.into_iter().collect(),
        }
    }
}

/// Fetches the favorites of the configured user.
///
/// A failed fetch is logged and yields the empty set: the list still renders,
/// with every spot unsaved.
pub async fn load_favorite_set(client: &SpotClient) -> FavoriteSet {
    match client.fetch_favorites().await {
        Ok(favorites) => FavoriteSet::from_spots(&favorites),
        Err(e) => {
            tracing::warn!(
                user_id = client.user_id(),
                error = %e,
                "could not load favorites; treating every spot as unsaved"
            );
            FavoriteSet::default()
        }
    }
}
