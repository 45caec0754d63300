pub mod client;
pub mod error;
pub mod geocoder;
pub mod pagination;
pub mod types;

pub use client::SpotClient;
pub use error::{ClientError, GeocodeError};
pub use geocoder::{Geocoder, NominatimGeocoder};
pub use pagination::{classify_label, decode_page, LinkDirection, NavigationLinks, Page, PageMeta};
