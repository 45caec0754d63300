//! Spot list, detail, and favorites command handlers.

use goodwave_app::{LoadOutcome, SpotList};
use goodwave_client::SpotClient;
use goodwave_core::{AppConfig, Spot, SpotFilter, SpotId};

pub(crate) fn build_list(config: &AppConfig) -> anyhow::Result<SpotList> {
    let client = SpotClient::new(config)
        .map_err(|e| anyhow::anyhow!("failed to build spots client: {e}"))?;
    Ok(SpotList::new(client, config.page_size))
}

/// Loads page 1 and then up to `pages - 1` further pages, stopping early on
/// the last page.
///
/// # Errors
///
/// Returns an error if page 1 fails. A later page failing is logged and
/// whatever loaded so far is kept.
pub(crate) async fn load_pages(list: &SpotList, pages: u32) -> anyhow::Result<()> {
    list.load_first_page().await?;

    for _ in 1..pages {
        match list.load_next_page().await {
            Ok(LoadOutcome::Loaded { .. }) => {}
            Ok(LoadOutcome::Skipped | LoadOutcome::Superseded) => break,
            Err(e) => {
                tracing::warn!(error = %e, "stopping after partial load");
                break;
            }
        }
    }
    Ok(())
}

/// Print the loaded spots that pass `filter`.
///
/// # Errors
///
/// Returns an error if the client cannot be built or page 1 cannot be loaded.
pub(crate) async fn run_spots(
    config: &AppConfig,
    pages: u32,
    filter: &SpotFilter,
) -> anyhow::Result<()> {
    let list = build_list(config)?;
    load_pages(&list, pages).await?;

    let snapshot = list.snapshot();
    let spots = list.filtered(filter);

    if spots.is_empty() {
        println!("no spots match");
    } else {
        print_table(&spots);
    }
    println!(
        "\n{} of {} loaded spots shown (page {} of {})",
        spots.len(),
        snapshot.spots.len(),
        snapshot.current_page,
        snapshot.total_pages
    );
    if let Some(error) = snapshot.error {
        println!("last error: {error}");
    }
    Ok(())
}

/// Print one spot in detail.
///
/// # Errors
///
/// Returns an error if the spot cannot be fetched.
pub(crate) async fn run_spot(config: &AppConfig, id: &str) -> anyhow::Result<()> {
    let list = build_list(config)?;
    let spot = list.spot(&SpotId::new(id)).await?;

    println!("{} ({})", spot.name, spot.id);
    println!("Location:    {}", spot.location);
    println!("Type:        {}", spot.spot_type);
    println!("Level:       {} (difficulty {}/5)", spot.level, spot.difficulty());
    if let Some(ambiance) = &spot.ambiance {
        println!("Ambiance:    {ambiance}");
    }
    println!("Parking:     {}", yes_no(spot.accessibility_parking));
    println!("Ramp:        {}", yes_no(spot.accessibility_ramp));
    if let Some(distance) = spot.accessibility_distance {
        println!("Walk:        {distance} m");
    }
    println!("Protected:   {}", yes_no(spot.ecology_zone_protected));
    println!("Saved:       {}", if spot.saved { "yes" } else { "no" });
    Ok(())
}

/// Print the configured user's favorites.
///
/// # Errors
///
/// Returns an error if the favorites cannot be fetched.
pub(crate) async fn run_favorites(config: &AppConfig) -> anyhow::Result<()> {
    let client = SpotClient::new(config)
        .map_err(|e| anyhow::anyhow!("failed to build spots client: {e}"))?;
    let favorites: Vec<Spot> = client
        .fetch_favorites()
        .await?
        .into_iter()
        .map(|spot| spot.with_saved(true))
        .collect();

    if favorites.is_empty() {
        println!("no favorites for user {}", config.user_id);
        return Ok(());
    }
    print_table(&favorites);
    Ok(())
}

/// Add or remove one favorite.
///
/// # Errors
///
/// Returns an error if the backend rejects the change.
pub(crate) async fn run_set_saved(config: &AppConfig, id: &str, saved: bool) -> anyhow::Result<()> {
    let list = build_list(config)?;
    let id = SpotId::new(id);
    list.set_saved(&id, saved).await?;

    if saved {
        println!("saved spot {id}");
    } else {
        println!("removed spot {id} from favorites");
    }
    Ok(())
}

fn print_table(spots: &[Spot]) {
    println!(
        "{:<6}{:<32}{:<8}{:<14}{:<7}LOCATION",
        "ID", "NAME", "TYPE", "LEVEL", "SAVED"
    );
    for spot in spots {
        println!(
            "{:<6}{:<32}{:<8}{:<14}{:<7}{}",
            spot.id,
            truncate(&spot.name, 30),
            spot.spot_type,
            spot.level,
            if spot.saved { "*" } else { "" },
            spot.location
        );
    }
}

fn truncate(text: &str, max_chars: usize) -> String {
    if text.chars().count() > max_chars {
        format!("{}...", text.chars().take(max_chars - 3).collect::<String>())
    } else {
        text.to_owned()
    }
}

fn yes_no(flag: Option<bool>) -> &'static str {
    match flag {
        Some(true) => "yes",
        Some(false) => "no",
        None => "unknown",
    }
}
