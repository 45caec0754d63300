//! Map command handler.

use goodwave_app::{BatchOutcome, SpotMap};
use goodwave_client::NominatimGeocoder;
use goodwave_core::AppConfig;

use crate::spots::{build_list, load_pages};

/// Load spots, geocode them, and print each pin and the fitted region.
///
/// # Errors
///
/// Returns an error if the clients cannot be built or page 1 cannot be
/// loaded. Spots that fail to geocode are listed as unplaced.
pub(crate) async fn run_map(config: &AppConfig, pages: u32) -> anyhow::Result<()> {
    let list = build_list(config)?;
    load_pages(&list, pages).await?;

    let geocoder = NominatimGeocoder::new(config)
        .map_err(|e| anyhow::anyhow!("failed to build geocoder: {e}"))?;
    let map = SpotMap::new(geocoder, config.geocode_max_concurrent);

    let spots = list.snapshot().spots;
    if let BatchOutcome::Completed { attempted, resolved } = map.geocode_missing(&spots).await {
        tracing::info!(attempted, resolved, "geocoding finished");
    }

    let snapshot = map.snapshot();
    println!("{:<6}{:<32}{:>10}{:>11}", "ID", "NAME", "LAT", "LON");
    let mut unplaced = 0usize;
    for spot in &spots {
        match snapshot.coordinates.get(&spot.id) {
            Some(c) => println!(
                "{:<6}{:<32}{:>10.4}{:>11.4}",
                spot.id, spot.name, c.latitude, c.longitude
            ),
            None => {
                unplaced += 1;
                println!("{:<6}{:<32}{:>10}{:>11}", spot.id, spot.name, "-", "-");
            }
        }
    }

    let region = snapshot.region;
    println!(
        "\nregion: center ({:.4}, {:.4}), span {:.1} lat x {:.1} lon",
        region.center.latitude, region.center.longitude, region.latitude_span, region.longitude_span
    );
    if unplaced > 0 {
        println!("{unplaced} spot(s) could not be placed");
    }
    Ok(())
}
