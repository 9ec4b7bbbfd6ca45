//! RAW command handlers: listing, editing, and the approval lifecycle.

use tabled::Tabled;

use safeops_core::{NewRaw, NewRawHazard, RawHazard, RawSubmission, RawUpdate, SafeOpsClient};

use crate::cli::{GlobalOpts, RawsArgs, RawsCommand};
use crate::error::CliError;
use crate::output::{print_output, render_list, render_single};

use super::util;

// ── Table rows ───────────────────────────────────────────────────────

#[derive(Tabled)]
struct RawRow {
    #[tabled(rename = "ID")]
    id: String,
    #[tabled(rename = "VENUE")]
    venue: String,
    #[tabled(rename = "STATUS")]
    status: String,
    #[tabled(rename = "RISK")]
    risk: String,
    #[tabled(rename = "SUBMITTED")]
    submitted: String,
    #[tabled(rename = "UPDATED")]
    updated: String,
}

fn raw_row(raw: &RawSubmission) -> RawRow {
    RawRow {
        id: raw.id.to_string(),
        venue: raw
            .venue_name
            .clone()
            .unwrap_or_else(|| raw.venue_id.to_string()),
        status: raw.status.to_string(),
        risk: raw.risk_level.to_string(),
        submitted: raw
            .submitted_at
            .as_ref()
            .map_or_else(|| "-".into(), util::short_time),
        updated: util::short_time(&raw.updated_at),
    }
}

#[derive(Tabled)]
struct HazardRow {
    #[tabled(rename = "ID")]
    id: String,
    #[tabled(rename = "DESCRIPTION")]
    description: String,
    #[tabled(rename = "SEVERITY")]
    severity: String,
    #[tabled(rename = "LIKELIHOOD")]
    likelihood: String,
    #[tabled(rename = "RPN")]
    rpn: u32,
}

fn hazard_row(hazard: &RawHazard) -> HazardRow {
    HazardRow {
        id: hazard.id.to_string(),
        description: hazard.hazard_description.clone(),
        severity: hazard.severity.to_string(),
        likelihood: hazard.likelihood.to_string(),
        rpn: hazard.rpn,
    }
}

fn raw_detail(raw: &RawSubmission) -> String {
    let mut out = format!(
        "RAW: {}\nVenue: {}\nAuthor: {}\nStatus: {}\nRisk level: {}\nSubmitted: {}\nApprover: {}\nComments: {}",
        raw.id,
        raw.venue_name.as_deref().unwrap_or(&raw.venue_id.to_string()),
        raw.user_id,
        raw.status,
        raw.risk_level,
        raw.submitted_at
            .as_ref()
            .map_or_else(|| "-".into(), util::short_time),
        raw.approver_id
            .map_or_else(|| "-".into(), |id| id.to_string()),
        util::or_dash(raw.approver_comments.as_deref()),
    );

    if !raw.hazards.is_empty() {
        out.push_str("\n\nHazards (worst first):");
        for hazard in &raw.hazards {
            out.push_str(&format!(
                "\n  [{:>4}] {} ({}/{})",
                hazard.rpn, hazard.hazard_description, hazard.severity, hazard.likelihood
            ));
        }
    }

    out
}

// ── Handler ──────────────────────────────────────────────────────────

pub async fn handle(
    client: &SafeOpsClient,
    args: RawsArgs,
    global: &GlobalOpts,
) -> Result<(), CliError> {
    match args.command {
        RawsCommand::List { user } => {
            let raws = client.raws().get_all(user).await?;
            let out = render_list(&global.output, &raws, raw_row, |r| r.id.to_string());
            print_output(&out, global.quiet);
            Ok(())
        }

        RawsCommand::Get { raw } => {
            let Some(found) = client.raws().get_by_id(raw).await else {
                return Err(CliError::NotFound {
                    resource_type: "RAW".into(),
                    identifier: raw.to_string(),
                    list_command: "raws list".into(),
                });
            };
            let out = render_single(&global.output, &found, raw_detail, |r| r.id.to_string());
            print_output(&out, global.quiet);
            Ok(())
        }

        RawsCommand::Create {
            user,
            venue,
            risk_level,
        } => {
            let raw = client
                .create_raw(NewRaw {
                    user_id: user,
                    venue_id: venue,
                    status: None,
                    risk_level,
                })
                .await?;
            if !global.quiet {
                eprintln!("RAW created: {} ({})", raw.id, raw.status);
            }
            Ok(())
        }

        RawsCommand::Update {
            raw,
            venue,
            risk_level,
        } => {
            let update = RawUpdate {
                venue_id: venue,
                risk_level,
            };
            let updated = client.update_raw(raw, &update).await?;
            let out = render_single(&global.output, &updated, raw_detail, |r| r.id.to_string());
            print_output(&out, global.quiet);
            Ok(())
        }

        RawsCommand::Submit { raw, user } => {
            let submitted = client.submit_raw(raw, user).await?;
            if !global.quiet {
                eprintln!(
                    "RAW submitted at {}",
                    submitted
                        .submitted_at
                        .as_ref()
                        .map_or_else(|| "-".into(), util::short_time)
                );
            }
            Ok(())
        }

        RawsCommand::Approve { raw, approver } => {
            let approved = client.approve_raw(raw, approver).await?;
            if !global.quiet {
                eprintln!("RAW {} approved", approved.id);
            }
            Ok(())
        }

        RawsCommand::Reject {
            raw,
            approver,
            comments,
        } => {
            let rejected = client.reject_raw(raw, approver, comments).await?;
            if !global.quiet {
                eprintln!("RAW {} rejected", rejected.id);
            }
            Ok(())
        }

        RawsCommand::Delete { raw } => {
            if !util::confirm(&format!("Delete RAW {raw}? This is destructive."), global.yes)? {
                return Ok(());
            }
            client.delete_raw(raw).await?;
            if !global.quiet {
                eprintln!("RAW deleted");
            }
            Ok(())
        }

        RawsCommand::Hazards { raw } => {
            let hazards = client.raws().get_hazards(raw).await?;
            let out = render_list(&global.output, &hazards, hazard_row, |h| h.id.to_string());
            print_output(&out, global.quiet);
            Ok(())
        }

        RawsCommand::AddHazard {
            raw,
            description,
            severity,
            likelihood,
            controls,
        } => {
            let hazard = client
                .raws()
                .add_hazard(NewRawHazard {
                    raw_id: raw,
                    hazard_description: description,
                    severity,
                    likelihood,
                    control_measures: controls,
                })
                .await?;
            if !global.quiet {
                eprintln!("Hazard created: {} (RPN {})", hazard.id, hazard.rpn);
            }
            Ok(())
        }
    }
}
