use goodwave_client::ClientError;
use goodwave_core::SpotId;
use thiserror::Error;

/// Errors returned by [`crate::SpotList`] operations that act on the user's
/// behalf.
#[derive(Debug, Error)]
pub enum ListError {
    #[error("spot {0} is not in the loaded list")]
    UnknownSpot(SpotId),

    #[error(transparent)]
    Client(#[from] ClientError),
}
