//! Response envelopes for the single-record and favorites endpoints.
//!
//! ### `GET /spots/{id}`
//! Bare record in the current backend. API resources wrap it as
//! `{"data": {...}}`; both are accepted.
//!
//! ### `GET /users/{id}/favorites`
//! Bare JSON array of spot records, or the same array under `"data"`.

use goodwave_core::Spot;
use serde::Deserialize;

#[derive(Debug, Deserialize)]
#[serde(untagged)]
pub(crate) enum SpotBody {
    Wrapped { data: Spot },
    Bare(Spot),
}

impl SpotBody {
    pub(crate) fn into_spot(self) -> Spot {
        match self {
            SpotBody::Wrapped { data } | SpotBody::Bare(data) => data,
        }
    }
}

#[derive(Debug, Deserialize)]
#[serde(untagged)]
pub(crate) enum FavoritesBody {
    Bare(Vec<Spot>),
    Wrapped { data: Vec<Spot> },
}

impl FavoritesBody {
    pub(crate) fn into_spots(self) -> Vec<Spot> {
        match self {
            FavoritesBody::Bare(spots) | FavoritesBody::Wrapped { data: spots } => spots,
        }
    }
}

/// One hit from a Nominatim-style `/search?format=json` response.
///
/// Coordinates arrive as decimal strings, e.g. `"21.6650"`.
#[derive(Debug, Deserialize)]
pub(crate) struct GeocodeHit {
    pub lat: String,
    pub lon: String,
    #[serde(default)]
    pub display_name: Option<String>,
}
