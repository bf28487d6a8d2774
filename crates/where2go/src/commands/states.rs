//! State command handlers.

use std::path::PathBuf;

use serde::Deserialize;
use tabled::Tabled;

use where2go_core::{Catalog, City, Notification, State, StateDetail};

use crate::cli::{GlobalOpts, OutputFormat, StateSaveArgs, StatesArgs, StatesCommand};
use crate::config::Resolved;
use crate::error::CliError;
use crate::output::{self, or_dash};

use super::util;

// ── Table rows ──────────────────────────────────────────────────────

#[derive(Tabled)]
struct StateRow {
    #[tabled(rename = "ID")]
    id: String,
    #[tabled(rename = "Name")]
    name: String,
    #[tabled(rename = "Cities")]
    cities: String,
    #[tabled(rename = "Updated")]
    updated: String,
}

impl From<&State> for StateRow {
    fn from(s: &State) -> Self {
        Self {
            id: s.id.clone(),
            name: s.name.clone(),
            cities: or_dash(s.total_cities),
            updated: or_dash(s.updated_at.map(|t| t.format("%Y-%m-%d %H:%M"))),
        }
    }
}

#[derive(Tabled)]
struct AttachedCityRow {
    #[tabled(rename = "City ID")]
    id: String,
    #[tabled(rename = "Name")]
    name: String,
    #[tabled(rename = "Pincode")]
    pincode: String,
}

impl From<&City> for AttachedCityRow {
    fn from(c: &City) -> Self {
        Self {
            id: c.id.clone(),
            name: c.name.clone(),
            pincode: or_dash(c.pincode.as_ref()),
        }
    }
}

fn state_detail(d: &StateDetail) -> String {
    let header = output::detail_block(&[
        ("ID", d.id.clone()),
        ("Name", d.name.clone()),
        ("Cities", d.cities.len().to_string()),
    ]);
    if d.cities.is_empty() {
        return header;
    }
    let rows: Vec<AttachedCityRow> = d.cities.iter().map(AttachedCityRow::from).collect();
    format!(
        "{header}\n\n{}",
        tabled::Table::new(rows).with(tabled::settings::Style::rounded())
    )
}

// ── Save draft ──────────────────────────────────────────────────────

/// `--from-file` payload. Flags given on the command line win.
#[derive(Debug, Default, Deserialize)]
struct StateDraft {
    #[serde(default, alias = "_id")]
    id: Option<String>,
    #[serde(default)]
    name: Option<String>,
    #[serde(default)]
    cities: Vec<String>,
}

fn load_draft(path: Option<&PathBuf>) -> Result<StateDraft, CliError> {
    path.map_or_else(|| Ok(StateDraft::default()), |p| util::read_json_file(p))
}

// ── Handler ─────────────────────────────────────────────────────────

pub async fn handle(
    catalog: &Catalog,
    args: StatesArgs,
    resolved: &Resolved,
    global: &GlobalOpts,
) -> Result<(), CliError> {
    let profile = resolved.profile_name.as_str();
    match args.command {
        StatesCommand::List => {
            let states = catalog
                .states()
                .await
                .map_err(|e| CliError::from_core("Failed to fetch states list.", e, profile))?;
            let out = output::render_list(
                &global.output,
                &states,
                |s| StateRow::from(s),
                |s| s.id.clone(),
            )?;
            output::print_output(&out, global.quiet);
            Ok(())
        }

        StatesCommand::Show { id } => {
            let detail = catalog
                .state(&id)
                .await
                .map_err(|e| CliError::from_core("Failed to fetch state details", e, profile))?;
            let out = output::render_single(&global.output, &detail, state_detail, |d| {
                d.cities
                    .iter()
                    .map(|c| c.id.clone())
                    .collect::<Vec<_>>()
                    .join("\n")
            })?;
            output::print_output(&out, global.quiet);
            Ok(())
        }

        StatesCommand::Save(save) => save_state(catalog, save, profile, global).await,
    }
}

async fn save_state(
    catalog: &Catalog,
    args: StateSaveArgs,
    profile: &str,
    global: &GlobalOpts,
) -> Result<(), CliError> {
    let draft = load_draft(args.from_file.as_ref())?;
    let id = args.id.or(draft.id);
    let name = args.name.or(draft.name);
    let wanted = util::merge_ids(draft.cities, args.cities);

    let mut form = catalog
        .state_form(id.as_deref())
        .await
        .map_err(|e| CliError::from_core("Failed to fetch orphan cities", e, profile))?;

    if let Some(name) = name {
        form.name = name;
    }
    for city in &wanted {
        if form.cities.iter().any(|c| &c.id == city) {
            continue;
        }
        form.check(city, true)?;
    }

    let saved = catalog
        .save_state(&form)
        .await
        .map_err(|e| CliError::from_core("Failed to save state", e, profile))?;

    output::print_notification(
        &Notification::success("State saved successfully"),
        global.quiet,
        &global.color,
    );
    if !matches!(global.output, OutputFormat::Table) {
        let out = output::render_single(&global.output, &saved, |_| String::new(), |v| {
            v.get("_id")
                .and_then(|id| id.as_str())
                .unwrap_or_default()
                .to_owned()
        })?;
        output::print_output(&out, global.quiet);
    }
    Ok(())
}
