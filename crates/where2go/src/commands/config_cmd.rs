//! Config subcommand handlers. None of these talk to the backend.

use dialoguer::{Input, Select};
use secrecy::SecretString;

use where2go_core::Notification;
use where2go_core::config::DEFAULT_BACKEND_URL;

use crate::cli::{ConfigArgs, ConfigCommand, GlobalOpts};
use crate::config::{self, Config, Profile};
use crate::error::CliError;
use crate::output;

use super::util::prompt_err;

// ── Helpers ─────────────────────────────────────────────────────────

/// Format config for display, masking the password.
fn format_config_redacted(cfg: &Config) -> String {
    use std::fmt::Write;
    let mut out = String::new();

    if let Some(ref default) = cfg.default_profile {
        let _ = writeln!(out, "default_profile = \"{default}\"");
    }
    let _ = writeln!(out);
    let _ = writeln!(out, "[defaults]");
    let _ = writeln!(out, "output = \"{}\"", cfg.defaults.output);
    let _ = writeln!(out, "timeout = {}", cfg.defaults.timeout);

    let mut names: Vec<_> = cfg.profiles.keys().collect();
    names.sort();
    for name in names {
        let p = &cfg.profiles[name];
        let _ = writeln!(out);
        let _ = writeln!(out, "[profiles.{name}]");
        let _ = writeln!(out, "backend_url = \"{}\"", p.backend_url);
        if let Some(ref id) = p.identifier {
            let _ = writeln!(out, "identifier = \"{id}\"");
        }
        if p.password.is_some() {
            let _ = writeln!(out, "password = \"****\"");
        }
        if let Some(ref ca) = p.ca_cert {
            let _ = writeln!(out, "ca_cert = \"{}\"", ca.display());
        }
        if let Some(insecure) = p.insecure {
            let _ = writeln!(out, "insecure = {insecure}");
        }
        if let Some(timeout) = p.timeout {
            let _ = writeln!(out, "timeout = {timeout}");
        }
    }

    out
}

fn prompt_password() -> Result<String, CliError> {
    let pass = rpassword::prompt_password("Password: ").map_err(prompt_err)?;
    if pass.is_empty() {
        return Err(CliError::Validation {
            field: "password".into(),
            reason: "password cannot be empty".into(),
        });
    }
    Ok(pass)
}

// ── Handler ─────────────────────────────────────────────────────────

pub fn handle(args: ConfigArgs, global: &GlobalOpts) -> Result<(), CliError> {
    match args.command {
        ConfigCommand::Init => init(global),

        ConfigCommand::Show => {
            let cfg = config::load_config_or_default();
            output::print_output(format_config_redacted(&cfg).trim_end(), global.quiet);
            Ok(())
        }

        ConfigCommand::Profiles => {
            let cfg = config::load_config_or_default();
            let default = cfg.active_profile_name(None);
            let mut names: Vec<_> = cfg.profiles.keys().cloned().collect();
            names.sort();
            let lines: Vec<String> = names
                .into_iter()
                .map(|n| {
                    let marker = if n == default { "*" } else { " " };
                    format!("{marker} {n}")
                })
                .collect();
            output::print_output(&lines.join("\n"), global.quiet);
            Ok(())
        }

        ConfigCommand::Use { name } => {
            let mut cfg = config::load_config_or_default();
            cfg.profile(&name)?;
            cfg.default_profile = Some(name.clone());
            config::save_config(&cfg)?;
            output::print_notification(
                &Notification::success(format!("Default profile set to '{name}'")),
                global.quiet,
                &global.color,
            );
            Ok(())
        }

        ConfigCommand::SetPassword => {
            let cfg = config::load_config_or_default();
            let profile_name = config::active_profile_name(global, &cfg);
            let pass = prompt_password()?;
            where2go_config::store_password(&profile_name, &SecretString::from(pass))?;
            output::print_notification(
                &Notification::success(format!(
                    "Password for '{profile_name}' stored in system keyring"
                )),
                global.quiet,
                &global.color,
            );
            Ok(())
        }
    }
}

/// Guided setup: one profile per run, added to any existing config.
fn init(global: &GlobalOpts) -> Result<(), CliError> {
    let config_path = config::config_path();
    eprintln!("Where2Go CLI configuration");
    eprintln!("   Config path: {}\n", config_path.display());

    let mut cfg = config::load_config_or_default();

    let profile_name: String = Input::new()
        .with_prompt("Profile name")
        .default(global.profile.clone().unwrap_or_else(|| "default".into()))
        .interact_text()
        .map_err(prompt_err)?;

    let backend_url: String = Input::new()
        .with_prompt("Backend URL")
        .default(
            global
                .backend
                .clone()
                .unwrap_or_else(|| DEFAULT_BACKEND_URL.into()),
        )
        .validate_with(|raw: &String| {
            where2go_config::parse_backend_url(raw)
                .map(|_| ())
                .map_err(|e| e.to_string())
        })
        .interact_text()
        .map_err(prompt_err)?;

    let identifier: String = Input::new()
        .with_prompt("Username or email (blank to be asked at login)")
        .allow_empty(true)
        .interact_text()
        .map_err(prompt_err)?;

    let choices = &[
        "Store password in system keyring (recommended)",
        "Save password to config file (plaintext)",
        "Don't store a password",
    ];
    let storage = Select::new()
        .with_prompt("Password storage")
        .items(choices)
        .default(0)
        .interact()
        .map_err(prompt_err)?;

    let password = match storage {
        0 => {
            let pass = prompt_password()?;
            where2go_config::store_password(&profile_name, &SecretString::from(pass))?;
            eprintln!("   ✓ Password stored in system keyring");
            None
        }
        1 => Some(prompt_password()?),
        _ => None,
    };

    let profile = Profile {
        backend_url,
        identifier: (!identifier.trim().is_empty()).then(|| identifier.trim().to_owned()),
        password,
        ..Profile::default()
    };
    cfg.profiles.insert(profile_name.clone(), profile);
    if cfg.profiles.len() == 1 {
        cfg.default_profile = Some(profile_name.clone());
    }

    config::save_config(&cfg)?;
    output::print_notification(
        &Notification::success(format!("Profile '{profile_name}' saved")),
        global.quiet,
        &global.color,
    );
    eprintln!("   Next: where2go login --profile {profile_name}");
    Ok(())
}
