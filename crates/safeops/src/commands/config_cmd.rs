//! Config command handlers: inspect the file and manage keyring keys.

use safeops_config::{config_path, load_config_or_default, store_api_key};

use crate::cli::{ConfigArgs, ConfigCommand, GlobalOpts};
use crate::error::CliError;

use super::util;

pub fn handle(args: ConfigArgs, global: &GlobalOpts) -> Result<(), CliError> {
    match args.command {
        ConfigCommand::Path => {
            println!("{}", config_path().display());
            Ok(())
        }

        ConfigCommand::Show => {
            let cfg = load_config_or_default();
            // API keys are resolved through env/keyring, so the file
            // contents are safe to echo as-is.
            let rendered = toml::to_string_pretty(&cfg)
                .map_err(safeops_config::ConfigError::Serialization)?;
            print!("{rendered}");
            Ok(())
        }

        ConfigCommand::SetKey { profile } => {
            let key = util::prompt_password(&format!("API key for profile '{profile}'"))?;
            store_api_key(&profile, &key)?;
            if !global.quiet {
                eprintln!("API key stored in the system keyring");
            }
            Ok(())
        }
    }
}
