//! Notification command handlers.

use tabled::Tabled;

use safeops_core::{Notification, SafeOpsClient};

use crate::cli::{GlobalOpts, NotificationsArgs, NotificationsCommand};
use crate::error::CliError;
use crate::output::{print_output, render_list};

use super::util;

#[derive(Tabled)]
struct NotificationRow {
    #[tabled(rename = "WHEN")]
    when: String,
    #[tabled(rename = "TYPE")]
    kind: String,
    #[tabled(rename = "TITLE")]
    title: String,
    #[tabled(rename = "RELATED")]
    related: String,
}

fn notification_row(n: &Notification) -> NotificationRow {
    NotificationRow {
        when: util::short_time(&n.created_at),
        kind: n.kind.clone(),
        title: n.title.clone(),
        related: n.related_id.map_or_else(|| "-".into(), |id| id.to_string()),
    }
}

pub async fn handle(
    client: &SafeOpsClient,
    args: NotificationsArgs,
    global: &GlobalOpts,
) -> Result<(), CliError> {
    match args.command {
        NotificationsCommand::List { user } => {
            let notifications = client.notifications().list_for_user(user).await?;
            let out = render_list(&global.output, &notifications, notification_row, |n| {
                n.id.to_string()
            });
            print_output(&out, global.quiet);
            Ok(())
        }
    }
}
