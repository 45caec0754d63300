//! Decoding of the backend's paginated list responses.
//!
//! The backend follows the Laravel paginator layout:
//!
//! ```text
//! {
//!   "data": [ ...items... ],
//!   "links": [
//!     { "url": null,                "label": "&laquo; Previous", "active": false },
//!     { "url": "https://h/spots?page=1", "label": "1",          "active": true  },
//!     { "url": "https://h/spots?page=2", "label": "2",          "active": false },
//!     { "url": "https://h/spots?page=2", "label": "Next &raquo;", "active": false }
//!   ],
//!   "meta": { "current_page": 1, "last_page": 2, "per_page": 10, "total": 14, ... }
//! }
//! ```
//!
//! `links` is an ordered array of labelled entries rather than a keyed object,
//! so previous/next are recovered by matching labels against [`LINK_MARKERS`]
//! and first/last are taken positionally. The keyed `{first, last, prev, next}`
//! object form is accepted too. Both `links` and `meta` are optional.

use serde::de::DeserializeOwned;
use serde::{Deserialize, Deserializer};

use crate::error::ClientError;

/// Which way a labelled pagination link points.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LinkDirection {
    Previous,
    Next,
}

/// A known label fragment identifying a previous/next link.
#[derive(Debug, Clone, Copy)]
struct LinkMarker {
    fragment: &'static str,
    direction: LinkDirection,
    /// Words match regardless of case; entities and glyphs match exactly.
    ignore_case: bool,
}

impl LinkMarker {
    const fn word(fragment: &'static str, direction: LinkDirection) -> Self {
        Self {
            fragment,
            direction,
            ignore_case: true,
        }
    }

    const fn symbol(fragment: &'static str, direction: LinkDirection) -> Self {
        Self {
            fragment,
            direction,
            ignore_case: false,
        }
    }

    fn matches(&self, label: &str, lowered: &str) -> bool {
        if self.ignore_case {
            lowered.contains(self.fragment)
        } else {
            label.contains(self.fragment)
        }
    }
}

/// Label fragments by locale. Word fragments are stored lowercase.
///
/// The backend documents no contract for these labels beyond the paginator's
/// defaults, so new locales are added here as they are observed.
const LINK_MARKERS: &[LinkMarker] = &[
    // en
    LinkMarker::word("previous", LinkDirection::Previous),
    LinkMarker::word("next", LinkDirection::Next),
    // fr
    LinkMarker::word("précédent", LinkDirection::Previous),
    LinkMarker::word("suivant", LinkDirection::Next),
    // HTML entities, raw and decoded
    LinkMarker::symbol("&laquo;", LinkDirection::Previous),
    LinkMarker::symbol("&lsaquo;", LinkDirection::Previous),
    LinkMarker::symbol("\u{ab}", LinkDirection::Previous),
    LinkMarker::symbol("\u{2039}", LinkDirection::Previous),
    LinkMarker::symbol("&raquo;", LinkDirection::Next),
    LinkMarker::symbol("&rsaquo;", LinkDirection::Next),
    LinkMarker::symbol("\u{bb}", LinkDirection::Next),
    LinkMarker::symbol("\u{203a}", LinkDirection::Next),
];

/// Classifies a pagination link label, or `None` for page-number labels.
#[must_use]
pub fn classify_label(label: &str) -> Option<LinkDirection> {
    let lowered = label.to_lowercase();
    LINK_MARKERS
        .iter()
        .find(|marker| marker.matches(label, &lowered))
        .map(|marker| marker.direction)
}

/// One entry of the backend's `links` array. The `active` flag marks the
/// current page number and plays no part in navigation, so it is not read.
#[derive(Debug, Clone, Deserialize)]
struct LinkEntry {
    #[serde(default)]
    url: Option<String>,
    label: String,
}

/// Keyed form of `links`, as emitted by API resource collections.
#[derive(Debug, Clone, Default, Deserialize)]
struct LinkObject {
    #[serde(default)]
    first: Option<String>,
    #[serde(default)]
    last: Option<String>,
    #[serde(default)]
    prev: Option<String>,
    #[serde(default)]
    next: Option<String>,
}

#[derive(Debug, Deserialize)]
#[serde(untagged)]
enum RawLinks {
    Entries(Vec<LinkEntry>),
    Keyed(LinkObject),
}

/// First/last/previous/next URLs for a page. Every field may be unset.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct NavigationLinks {
    pub first: Option<String>,
    pub last: Option<String>,
    pub previous: Option<String>,
    pub next: Option<String>,
}

impl NavigationLinks {
    /// Recovers links from the ordered entry array.
    ///
    /// First and last are positional regardless of label; previous and next are
    /// the first entries whose labels carry a matching marker.
    fn from_entries(entries: &[LinkEntry]) -> Self {
        let find = |direction: LinkDirection| {
            entries
                .iter()
                .find(|entry| classify_label(&entry.label) == Some(direction))
                .and_then(|entry| entry.url.clone())
        };

        Self {
            first: entries.first().and_then(|entry| entry.url.clone()),
            last: entries.last().and_then(|entry| entry.url.clone()),
            previous: find(LinkDirection::Previous),
            next: find(LinkDirection::Next),
        }
    }
}

impl<'de> Deserialize<'de> for NavigationLinks {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        Ok(match Option::<RawLinks>::deserialize(deserializer)? {
            None => Self::default(),
            Some(RawLinks::Entries(entries)) => Self::from_entries(&entries),
            Some(RawLinks::Keyed(keyed)) => Self {
                first: keyed.first,
                last: keyed.last,
                previous: keyed.prev,
                next: keyed.next,
            },
        })
    }
}

/// Paginator metadata. Counts are 1-based.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct PageMeta {
    pub current_page: u32,
    pub last_page: u32,
    pub per_page: u32,
    pub total: u64,
    #[serde(default)]
    pub from: Option<u64>,
    #[serde(default)]
    pub to: Option<u64>,
    #[serde(default)]
    pub path: Option<String>,
}

/// One decoded page of a list endpoint.
#[derive(Debug, Clone, Deserialize)]
#[serde(bound(deserialize = "T: Deserialize<'de>"))]
pub struct Page<T> {
    #[serde(rename = "data", alias = "items")]
    pub items: Vec<T>,

    #[serde(default)]
    pub links: NavigationLinks,

    #[serde(default)]
    pub meta: Option<PageMeta>,
}

impl<T> Page<T> {
    /// Total page count, never below 1. Without metadata the page is treated
    /// as the complete, single page.
    #[must_use]
    pub fn total_pages(&self) -> u32 {
        self.meta.as_ref().map_or(1, |meta| meta.last_page.max(1))
    }

    /// Current page number, clamped into `1..=total_pages()`.
    #[must_use]
    pub fn current_page(&self) -> u32 {
        self.meta
            .as_ref()
            .map_or(1, |meta| meta.current_page.clamp(1, self.total_pages()))
    }

    #[must_use]
    pub fn total_items(&self) -> u64 {
        self.meta
            .as_ref()
            .map_or(self.items.len() as u64, |meta| meta.total)
    }

    #[must_use]
    pub fn per_page(&self) -> u32 {
        self.meta.as_ref().map_or_else(
            || u32::try_from(self.items.len()).unwrap_or(u32::MAX),
            |meta| meta.per_page,
        )
    }

    #[must_use]
    pub fn has_next(&self) -> bool {
        self.current_page() < self.total_pages()
    }
}

/// Decodes a full page body. Any malformed item fails the whole page.
///
/// # Errors
///
/// Returns [`ClientError::Decode`] if `body` is not a page of `T`.
pub fn decode_page<T: DeserializeOwned>(body: &str, context: &str) -> Result<Page<T>, ClientError> {
    serde_json::from_str::<Page<T>>(body).map_err(|e| ClientError::Decode {
        context: context.to_owned(),
        source: e,
    })
}

#[cfg(test)]
#[path = "pagination_test.rs"]
mod tests;
