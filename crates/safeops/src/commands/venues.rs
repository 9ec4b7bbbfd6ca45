//! Venue command handlers.

use tabled::Tabled;

use safeops_core::{NewVenue, NewVenueHazard, SafeOpsClient, Venue, VenueHazard, VenueUpdate};

use crate::cli::{GlobalOpts, VenuesArgs, VenuesCommand};
use crate::error::CliError;
use crate::output::{print_output, render_list, render_single};

use super::util;

// ── Table rows ───────────────────────────────────────────────────────

#[derive(Tabled)]
struct VenueRow {
    #[tabled(rename = "ID")]
    id: String,
    #[tabled(rename = "NAME")]
    name: String,
    #[tabled(rename = "STATUS")]
    status: String,
    #[tabled(rename = "CRITICAL")]
    critical: u32,
    #[tabled(rename = "UPDATED")]
    updated: String,
}

fn venue_row(venue: &Venue) -> VenueRow {
    VenueRow {
        id: venue.id.to_string(),
        name: venue.name.clone(),
        status: venue.status.to_string(),
        critical: venue.critical_issues_count,
        updated: util::short_time(&venue.updated_at),
    }
}

#[derive(Tabled)]
struct HazardRow {
    #[tabled(rename = "ID")]
    id: String,
    #[tabled(rename = "CATEGORY")]
    category: String,
    #[tabled(rename = "SEVERITY")]
    severity: String,
    #[tabled(rename = "LIKELIHOOD")]
    likelihood: String,
    #[tabled(rename = "RPN")]
    rpn: u32,
    #[tabled(rename = "STATUS")]
    status: String,
}

fn hazard_row(hazard: &VenueHazard) -> HazardRow {
    HazardRow {
        id: hazard.id.to_string(),
        category: hazard.hazard_category.clone(),
        severity: hazard.severity.to_string(),
        likelihood: hazard.likelihood.to_string(),
        rpn: hazard.rpn,
        status: hazard.status.to_string(),
    }
}

fn venue_detail(venue: &Venue) -> String {
    format!(
        "Venue: {}\nID: {}\nAddress: {}{}\nLocation: {}, {}\nStatus: {}\nOpen critical issues: {}\nUpdated: {}",
        venue.name,
        venue.id,
        venue.address,
        venue
            .postal_code
            .as_deref()
            .map(|pc| format!(" ({pc})"))
            .unwrap_or_default(),
        venue.latitude,
        venue.longitude,
        venue.status,
        venue.critical_issues_count,
        util::short_time(&venue.updated_at),
    )
}

// ── Handler ──────────────────────────────────────────────────────────

pub async fn handle(
    client: &SafeOpsClient,
    args: VenuesArgs,
    global: &GlobalOpts,
) -> Result<(), CliError> {
    match args.command {
        VenuesCommand::List { search } => {
            let venues = match search {
                Some(ref needle) => client.venues().search(needle).await?,
                None => client.venues().get_all().await?,
            };
            let out = render_list(&global.output, &venues, venue_row, |v| v.id.to_string());
            print_output(&out, global.quiet);
            Ok(())
        }

        VenuesCommand::Get { venue } => {
            let Some(found) = client.venues().get_by_id(venue).await else {
                return Err(CliError::NotFound {
                    resource_type: "venue".into(),
                    identifier: venue.to_string(),
                    list_command: "venues list".into(),
                });
            };
            let out = render_single(&global.output, &found, venue_detail, |v| v.id.to_string());
            print_output(&out, global.quiet);
            Ok(())
        }

        VenuesCommand::Create {
            name,
            address,
            postal_code,
            latitude,
            longitude,
        } => {
            let venue = client
                .create_venue(NewVenue {
                    name,
                    address,
                    postal_code,
                    latitude,
                    longitude,
                })
                .await?;
            if !global.quiet {
                eprintln!("Venue created: {}", venue.id);
            }
            Ok(())
        }

        VenuesCommand::Update {
            venue,
            name,
            address,
            postal_code,
            latitude,
            longitude,
        } => {
            let update = VenueUpdate {
                name,
                address,
                postal_code,
                latitude,
                longitude,
            };
            let updated = client.update_venue(venue, &update).await?;
            let out = render_single(&global.output, &updated, venue_detail, |v| v.id.to_string());
            print_output(&out, global.quiet);
            Ok(())
        }

        VenuesCommand::Hazards { venue } => {
            let hazards = client.venues().get_hazards(venue).await?;
            let out = render_list(&global.output, &hazards, hazard_row, |h| h.id.to_string());
            print_output(&out, global.quiet);
            Ok(())
        }

        VenuesCommand::AddHazard {
            venue,
            category,
            description,
            severity,
            likelihood,
            status,
        } => {
            let hazard = client
                .add_venue_hazard(NewVenueHazard {
                    venue_id: venue,
                    hazard_category: category,
                    description,
                    severity,
                    likelihood,
                    status,
                })
                .await?;
            if !global.quiet {
                eprintln!("Hazard created: {} (RPN {})", hazard.id, hazard.rpn);
            }
            Ok(())
        }
    }
}
