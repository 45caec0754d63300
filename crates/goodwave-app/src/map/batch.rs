use futures::future::join_all;
use goodwave_client::Geocoder;
use goodwave_core::Spot;
use tokio::sync::Semaphore;

use super::CoordinateMap;

/// Geocodes every spot with at most `max_concurrent` lookups outstanding.
///
/// Resolves once every lookup has finished. Spots whose lookup fails are
/// logged at debug level and left out of the result.
pub async fn geocode_batch<G: Geocoder>(
    geocoder: &G,
    spots: &[Spot],
    max_concurrent: usize,
) -> CoordinateMap {
    let gate = Semaphore::new(max_concurrent.max(1));

    let lookups = spots.iter().map(|spot| {
        let gate = &gate;
        async move {
            let Ok(permit) = gate.acquire().await else {
                return None;
            };
            let query = spot.geocode_query();
            let result = geocoder.geocode(query).await;
            drop(permit);

            match result {
                Ok(coordinate) => Some((spot.id.clone(), coordinate)),
                Err(e) => {
                    tracing::debug!(spot_id = %spot.id, query, error = %e, "geocoding failed");
                    None
                }
            }
        }
    });

    let resolved: CoordinateMap = join_all(lookups).await.into_iter().flatten().collect();

    tracing::debug!(
        requested = spots.len(),
        resolved = resolved.len(),
        "geocoding batch finished"
    );
    resolved
}
