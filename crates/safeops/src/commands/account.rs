//! Account command handlers.
//!
//! Passwords are prompted, never taken as flags, so they stay out of
//! shell history and process listings.

use secrecy::{ExposeSecret, SecretString};

use safeops_core::{SafeOpsClient, UserProfile};

use crate::cli::{AccountArgs, AccountCommand, GlobalOpts};
use crate::error::CliError;
use crate::output::{print_output, render_single};

use super::util;

fn profile_detail(profile: &UserProfile) -> String {
    format!(
        "Name: {}\nEmail: {}\nRole: {}\nProfile ID: {}\nPhone: {}",
        profile.full_name,
        profile.email,
        profile.role,
        profile.id,
        util::or_dash(profile.phone.as_deref()),
    )
}

pub async fn handle(
    client: &SafeOpsClient,
    args: AccountArgs,
    global: &GlobalOpts,
) -> Result<(), CliError> {
    match args.command {
        AccountCommand::SignUp {
            email,
            full_name,
            role,
        } => {
            let password = SecretString::from(util::prompt_password("Password")?);
            let (_session, profile) = client
                .identity()
                .sign_up(&email, &password, &full_name, role)
                .await?;
            if !global.quiet {
                eprintln!("Account created for {} ({})", profile.email, profile.role);
            }
            Ok(())
        }

        AccountCommand::SignIn { email } => {
            let password = SecretString::from(util::prompt_password("Password")?);
            let session = client.identity().sign_in(&email, &password).await?;
            // The token goes to stdout on purpose: scripts capture it via
            //   export SAFEOPS_ACCESS_TOKEN=$(safeops account sign-in ...)
            println!("{}", session.access_token.expose_secret());
            Ok(())
        }

        AccountCommand::SignOut { access_token } => {
            let token = SecretString::from(access_token);
            client.identity().sign_out(&token).await?;
            if !global.quiet {
                eprintln!("Signed out");
            }
            Ok(())
        }

        AccountCommand::Whoami { access_token } => {
            let token = SecretString::from(access_token);
            let Some(profile) = client.identity().current_user(&token).await else {
                return Err(CliError::AuthFailed {
                    profile: "current".into(),
                });
            };
            let out = render_single(&global.output, &profile, profile_detail, |p| {
                p.id.to_string()
            });
            print_output(&out, global.quiet);
            Ok(())
        }
    }
}
