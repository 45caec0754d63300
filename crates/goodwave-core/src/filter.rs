//! Client-side narrowing of an already-loaded spot list.

use crate::spot::Spot;

/// Criteria for narrowing a spot list. The default filter matches everything.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SpotFilter {
    /// Break type tag to look for, e.g. `"reef"`. Matches any spot whose
    /// tag contains it, so `"reef"` also keeps `"reef-break"`.
    pub spot_type: Option<String>,
    /// Case-insensitive substring matched against name and location.
    pub search: Option<String>,
    pub saved_only: bool,
}

impl SpotFilter {
    #[must_use]
    pub fn matches(&self, spot: &Spot) -> bool {
        if self.saved_only && !spot.saved {
            return false;
        }

        if let Some(spot_type) = &self.spot_type {
            if !spot.spot_type.contains(spot_type.as_str()) {
                return false;
            }
        }

        match self.search.as_deref().map(str::trim) {
            None | Some("") => true,
            Some(needle) => {
                let needle = needle.to_lowercase();
                spot.name.to_lowercase().contains(&needle)
                    || spot.location.to_lowercase().contains(&needle)
            }
        }
    }

    /// Returns the matching spots in their original order.
    #[must_use]
    pub fn apply<'a>(&self, spots: &'a [Spot]) -> Vec<&'a Spot> {
        spots.iter().filter(|spot| self.matches(spot)).collect()
    }
}
