//! login / logout / whoami.
//!
//! A successful login saves the client's cookie header to the profile's
//! session file; every later command restores it before talking to the
//! backend.

use std::io::IsTerminal;

use dialoguer::Input;
use secrecy::{ExposeSecret, SecretString};
use serde::Serialize;
use tracing::warn;

use where2go_config::ConfigError;
use where2go_core::{CoreError, Notification, Readiness, Session, SessionContext, validation};

use crate::cli::{GlobalOpts, LoginArgs};
use crate::config::Resolved;
use crate::error::CliError;
use crate::output;

use super::util;

// ── login ───────────────────────────────────────────────────────────

pub async fn login(args: LoginArgs, resolved: &Resolved, global: &GlobalOpts) -> Result<(), CliError> {
    let identifier = match args.identifier.or_else(|| resolved.profile.identifier.clone()) {
        Some(id) => id,
        None => Input::<String>::new()
            .with_prompt("Username or email")
            .interact_text()
            .map_err(util::prompt_err)?,
    };
    let password = read_password(args.password_stdin, resolved)?;

    validation::validate_sign_in(&identifier, password.expose_secret())?;

    // Fresh client: a stale cookie must not leak into the new session.
    let ctx = SessionContext::new(resolved.client.build_client()?);

    let pb = util::spinner("Signing in…", global.quiet);
    let result = ctx.actions().login(identifier.trim(), &password).await;
    pb.finish_and_clear();

    let resp = result.map_err(|e| {
        CliError::from_core("Login failed!", CoreError::from(e), &resolved.profile_name)
    })?;
    if !resp.success {
        return Err(CliError::login_rejected(resp.message, &resolved.profile_name));
    }

    match ctx.client().cookie_header() {
        Some(header) => resolved.session_file().save(&header)?,
        None => warn!("backend set no session cookie; later commands will be signed out"),
    }

    let session = ctx.store().get();
    let who = if session.email.is_empty() {
        identifier.trim()
    } else {
        session.email.as_str()
    };
    output::print_notification(
        &Notification::success(format!("Signed in as {who}")),
        global.quiet,
        &global.color,
    );
    Ok(())
}

/// `--password-stdin`, then the credential chain, then a prompt.
fn read_password(from_stdin: bool, resolved: &Resolved) -> Result<SecretString, CliError> {
    if from_stdin {
        let mut line = String::new();
        std::io::stdin().read_line(&mut line)?;
        return Ok(SecretString::from(
            line.trim_end_matches(['\r', '\n']).to_owned(),
        ));
    }

    match where2go_config::resolve_password(&resolved.profile, &resolved.profile_name) {
        Ok(pw) => Ok(pw),
        Err(ConfigError::NoCredentials { .. }) if std::io::stdin().is_terminal() => {
            let pw = rpassword::prompt_password("Password: ").map_err(util::prompt_err)?;
            Ok(SecretString::from(pw))
        }
        Err(e) => Err(e.into()),
    }
}

// ── logout ──────────────────────────────────────────────────────────

pub async fn logout(resolved: &Resolved, global: &GlobalOpts) -> Result<(), CliError> {
    let ctx = SessionContext::new(resolved.client_with_session()?);

    let resp = ctx.actions().logout().await.map_err(|e| {
        CliError::from_core("Logout failed", CoreError::from(e), &resolved.profile_name)
    })?;
    if !resp.success {
        return Err(CliError::from_core(
            "Logout failed",
            CoreError::Rejected {
                message: resp.message,
            },
            &resolved.profile_name,
        ));
    }

    resolved.session_file().clear()?;
    output::print_notification(
        &Notification::success("Signed out"),
        global.quiet,
        &global.color,
    );
    Ok(())
}

// ── whoami ──────────────────────────────────────────────────────────

#[derive(Serialize)]
struct WhoAmI {
    profile: String,
    backend: String,
    readiness: Readiness,
    #[serde(flatten)]
    session: Session,
}

pub async fn whoami(resolved: &Resolved, global: &GlobalOpts) -> Result<(), CliError> {
    let pb = util::spinner("Restoring session…", global.quiet);
    let ctx = resolved.session().await;
    pb.finish_and_clear();
    let ctx = ctx?;

    let session = ctx.store().get();
    if !session.is_authenticated() {
        return Err(CliError::NotAuthenticated {
            profile: resolved.profile_name.clone(),
        });
    }

    let view = WhoAmI {
        profile: resolved.profile_name.clone(),
        backend: resolved.client.backend_url.to_string(),
        readiness: ctx.store().readiness(),
        session: (*session).clone(),
    };

    let out = output::render_single(
        &global.output,
        &view,
        |v| {
            output::detail_block(&[
                ("ID", v.session.user_id.clone()),
                ("Email", v.session.email.clone()),
                ("Username", non_empty(&v.session.username)),
                ("Avatar", non_empty(&v.session.avatar)),
                ("Profile", v.profile.clone()),
                ("Backend", v.backend.clone()),
                ("Session", v.readiness.to_string()),
            ])
        },
        |v| v.session.user_id.clone(),
    )?;
    output::print_output(&out, global.quiet);
    Ok(())
}

fn non_empty(value: &str) -> String {
    if value.is_empty() {
        "-".into()
    } else {
        value.to_owned()
    }
}
