//! Command dispatch: bridges CLI args to session actions, catalog calls and
//! output formatting.

pub mod auth;
pub mod cities;
pub mod config_cmd;
pub mod destinations;
pub mod states;
pub mod util;

use where2go_core::{Catalog, SessionContext};

use crate::cli::{Command, GlobalOpts};
use crate::config::Resolved;
use crate::error::CliError;

/// Dispatch a backend-bound command to its handler.
pub async fn dispatch(
    cmd: Command,
    resolved: &Resolved,
    global: &GlobalOpts,
) -> Result<(), CliError> {
    match cmd {
        Command::Login(args) => auth::login(args, resolved, global).await,
        Command::Logout => auth::logout(resolved, global).await,
        Command::Whoami => auth::whoami(resolved, global).await,
        Command::States(args) => {
            let catalog = signed_in(resolved, global).await?;
            states::handle(&catalog, args, resolved, global).await
        }
        Command::Cities(args) => {
            let catalog = signed_in(resolved, global).await?;
            cities::handle(&catalog, args, resolved, global).await
        }
        Command::Destinations(args) => {
            let catalog = signed_in(resolved, global).await?;
            destinations::handle(&catalog, args, resolved, global).await
        }
        // Config and Completions are handled before dispatch
        Command::Config(_) | Command::Completions(_) => Err(CliError::Internal(
            "offline command reached backend dispatch".into(),
        )),
    }
}

/// Restore the saved session and require it to be signed in.
async fn signed_in(resolved: &Resolved, global: &GlobalOpts) -> Result<Catalog, CliError> {
    let pb = util::spinner("Restoring session…", global.quiet);
    let ctx: Result<SessionContext, CliError> = resolved.session().await;
    pb.finish_and_clear();
    let ctx = ctx?;

    ctx.require_authenticated()
        .await
        .map_err(|e| CliError::from_core("Not signed in", e, &resolved.profile_name))?;
    Ok(ctx.catalog())
}
