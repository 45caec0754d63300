//! State owners for the spot browser: the paginated spot list with its
//! favorites overlay, and the geocoded map of spots.

pub mod error;
pub mod favorites;
pub mod list;
pub mod map;

pub use error::ListError;
pub use favorites::{load_favorite_set, FavoriteSet};
pub use list::{ListPhase, ListSnapshot, LoadOutcome, SpotList};
pub use map::{geocode_batch, BatchOutcome, CoordinateMap, MapRegion, MapSnapshot, SpotMap};
