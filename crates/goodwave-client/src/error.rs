use thiserror::Error;

/// Failures talking to the spots backend.
#[derive(Debug, Error)]
pub enum ClientError {
    #[error("invalid request \"{url}\": {reason}")]
    InvalidRequest { url: String, reason: String },

    #[error("backend unreachable at {url}: {source}")]
    Unreachable {
        url: String,
        #[source]
        source: reqwest::Error,
    },

    #[error("unexpected HTTP status {status} from {url}")]
    BadStatus { status: u16, url: String },

    #[error("JSON deserialization error for {context}: {source}")]
    Decode {
        context: String,
        #[source]
        source: serde_json::Error,
    },

    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),
}

impl ClientError {
    /// Classifies a transport failure for `url`.
    ///
    /// Connection and timeout faults become [`ClientError::Unreachable`];
    /// request-construction faults become [`ClientError::InvalidRequest`].
    pub(crate) fn from_transport(url: &str, err: reqwest::Error) -> Self {
        if err.is_connect() || err.is_timeout() {
            ClientError::Unreachable {
                url: url.to_owned(),
                source: err,
            }
        } else if err.is_builder() {
            ClientError::InvalidRequest {
                url: url.to_owned(),
                reason: err.to_string(),
            }
        } else {
            ClientError::Http(err)
        }
    }
}

/// Failures resolving an address to a coordinate.
#[derive(Debug, Error)]
pub enum GeocodeError {
    #[error("no geocoding match for \"{query}\"")]
    NoMatch { query: String },

    #[error("geocoder returned an unusable coordinate for \"{query}\": {reason}")]
    InvalidCoordinate { query: String, reason: String },

    #[error(transparent)]
    Client(#[from] ClientError),
}
