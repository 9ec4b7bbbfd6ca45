//! Follow the realtime change feed: connect, then print store state as
//! the reconcilers apply backend-side changes. Runs until Ctrl-C.

use owo_colors::OwoColorize;

use safeops_core::{ClientConfig, SafeOpsClient};

use crate::cli::{GlobalOpts, WatchArgs, WatchTarget};
use crate::error::CliError;
use crate::output::should_color;

pub async fn handle(
    mut config: ClientConfig,
    args: WatchArgs,
    global: &GlobalOpts,
) -> Result<(), CliError> {
    config.realtime_enabled = true;
    let client = SafeOpsClient::new(config)?;
    client.connect().await?;

    let color = should_color(&global.color);
    let stores = client.stores();

    if !global.quiet {
        eprintln!(
            "Watching {} venues and {} RAWs. Ctrl-C to stop.",
            stores.venues.len(),
            stores.raws.len()
        );
    }

    let mut venue_updates = client.venue_updates();
    let mut raw_updates = client.raw_updates();
    let watch_venues = args.only.is_none_or(|t| t == WatchTarget::Venues);
    let watch_raws = args.only.is_none_or(|t| t == WatchTarget::Raws);

    loop {
        tokio::select! {
            biased;
            _ = tokio::signal::ctrl_c() => break,
            snapshot = venue_updates.changed(), if watch_venues => {
                let Some(snapshot) = snapshot else { break };
                let label = if color { "venues".green().to_string() } else { "venues".to_owned() };
                println!("[{label}] {} items", snapshot.items.len());
                for venue in snapshot.items.iter().take(5) {
                    println!("  {} {} ({})", venue.id, venue.name, venue.status);
                }
            }
            snapshot = raw_updates.changed(), if watch_raws => {
                let Some(snapshot) = snapshot else { break };
                let label = if color { "raws".cyan().to_string() } else { "raws".to_owned() };
                println!("[{label}] {} items", snapshot.items.len());
                for raw in snapshot.items.iter().take(5) {
                    println!(
                        "  {} {} ({})",
                        raw.id,
                        raw.venue_name.as_deref().unwrap_or("?"),
                        raw.status
                    );
                }
            }
        }
    }

    client.disconnect().await;
    if !global.quiet {
        eprintln!("Stopped watching");
    }
    Ok(())
}
