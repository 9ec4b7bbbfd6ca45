//! Command dispatch: bridges CLI args -> core services -> output formatting.

pub mod account;
pub mod config_cmd;
pub mod notifications;
pub mod raws;
pub mod util;
pub mod venues;
pub mod watch;

use safeops_core::{ClientConfig, SafeOpsClient};

use crate::cli::{Command, GlobalOpts};
use crate::error::CliError;

/// Dispatch a backend-bound command to the appropriate handler.
///
/// Service calls work without `connect()`; only `watch` starts the
/// realtime machinery, and does so itself.
pub async fn dispatch(
    cmd: Command,
    config: ClientConfig,
    global: &GlobalOpts,
) -> Result<(), CliError> {
    match cmd {
        Command::Watch(args) => watch::handle(config, args, global).await,
        cmd => {
            let mut config = config;
            config.realtime_enabled = false;
            let client = SafeOpsClient::new(config)?;

            match cmd {
                Command::Venues(args) => venues::handle(&client, args, global).await,
                Command::Raws(args) => raws::handle(&client, args, global).await,
                Command::Notifications(args) => {
                    notifications::handle(&client, args, global).await
                }
                Command::Account(args) => account::handle(&client, args, global).await,
                // Watch, Config, and Completions are handled before this point
                Command::Watch(_) | Command::Config(_) | Command::Completions(_) => unreachable!(),
            }
        }
    }
}
