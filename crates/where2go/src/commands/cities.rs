//! City command handlers.

use std::path::PathBuf;

use serde::Deserialize;
use tabled::Tabled;

use where2go_core::{Catalog, City, CityDetail, Destination, Notification};

use crate::cli::{CitiesArgs, CitiesCommand, CitySaveArgs, GlobalOpts, OutputFormat};
use crate::config::Resolved;
use crate::error::CliError;
use crate::output::{self, or_dash};

use super::util;

// ── Table rows ──────────────────────────────────────────────────────

#[derive(Tabled)]
struct CityRow {
    #[tabled(rename = "ID")]
    id: String,
    #[tabled(rename = "Name")]
    name: String,
    #[tabled(rename = "Pincode")]
    pincode: String,
    #[tabled(rename = "State")]
    state: String,
    #[tabled(rename = "Destinations")]
    destinations: String,
}

impl From<&City> for CityRow {
    fn from(c: &City) -> Self {
        Self {
            id: c.id.clone(),
            name: c.name.clone(),
            pincode: or_dash(c.pincode.as_ref()),
            state: or_dash(c.state.as_ref()),
            destinations: or_dash(c.total_destinations),
        }
    }
}

#[derive(Tabled)]
struct AttachedDestinationRow {
    #[tabled(rename = "Destination ID")]
    id: String,
    #[tabled(rename = "Name")]
    name: String,
    #[tabled(rename = "Likes")]
    likes: String,
}

impl From<&Destination> for AttachedDestinationRow {
    fn from(d: &Destination) -> Self {
        Self {
            id: d.id.clone(),
            name: d.name.clone(),
            likes: or_dash(d.likes),
        }
    }
}

fn city_detail(d: &CityDetail) -> String {
    let header = output::detail_block(&[
        ("ID", d.id.clone()),
        ("Name", d.name.clone()),
        ("Pincode", or_dash(d.pincode.as_ref())),
        ("Destinations", d.destinations.len().to_string()),
    ]);
    if d.destinations.is_empty() {
        return header;
    }
    let rows: Vec<AttachedDestinationRow> = d
        .destinations
        .iter()
        .map(AttachedDestinationRow::from)
        .collect();
    format!(
        "{header}\n\n{}",
        tabled::Table::new(rows).with(tabled::settings::Style::rounded())
    )
}

// ── Save draft ──────────────────────────────────────────────────────

/// `--from-file` payload. Flags given on the command line win.
#[derive(Debug, Default, Deserialize)]
struct CityDraft {
    #[serde(default, alias = "_id")]
    id: Option<String>,
    #[serde(default)]
    name: Option<String>,
    #[serde(default)]
    pincode: Option<serde_json::Value>,
    #[serde(default)]
    destinations: Vec<String>,
}

impl CityDraft {
    /// Pincodes are accepted as JSON numbers or strings.
    fn pincode(&self) -> Option<String> {
        match self.pincode.as_ref()? {
            serde_json::Value::String(s) => Some(s.clone()),
            serde_json::Value::Null => None,
            other => Some(other.to_string()),
        }
    }
}

fn load_draft(path: Option<&PathBuf>) -> Result<CityDraft, CliError> {
    path.map_or_else(|| Ok(CityDraft::default()), |p| util::read_json_file(p))
}

// ── Handler ─────────────────────────────────────────────────────────

pub async fn handle(
    catalog: &Catalog,
    args: CitiesArgs,
    resolved: &Resolved,
    global: &GlobalOpts,
) -> Result<(), CliError> {
    let profile = resolved.profile_name.as_str();
    match args.command {
        CitiesCommand::List => {
            let cities = catalog
                .cities()
                .await
                .map_err(|e| CliError::from_core("Failed to fetch cities list.", e, profile))?;
            print_cities(&cities, global)
        }

        CitiesCommand::Orphans => {
            let cities = catalog
                .orphan_cities()
                .await
                .map_err(|e| CliError::from_core("Failed to fetch orphan cities", e, profile))?;
            print_cities(&cities, global)
        }

        CitiesCommand::Show { id } => {
            let detail = catalog
                .city(&id)
                .await
                .map_err(|e| CliError::from_core("Failed to fetch city details", e, profile))?;
            let out = output::render_single(&global.output, &detail, city_detail, |d| {
                d.destinations
                    .iter()
                    .map(|x| x.id.clone())
                    .collect::<Vec<_>>()
                    .join("\n")
            })?;
            output::print_output(&out, global.quiet);
            Ok(())
        }

        CitiesCommand::Save(save) => save_city(catalog, save, profile, global).await,
    }
}

fn print_cities(cities: &[City], global: &GlobalOpts) -> Result<(), CliError> {
    let out = output::render_list(
        &global.output,
        cities,
        |c| CityRow::from(c),
        |c| c.id.clone(),
    )?;
    output::print_output(&out, global.quiet);
    Ok(())
}

async fn save_city(
    catalog: &Catalog,
    args: CitySaveArgs,
    profile: &str,
    global: &GlobalOpts,
) -> Result<(), CliError> {
    let draft = load_draft(args.from_file.as_ref())?;
    let pincode = args.pincode.or_else(|| draft.pincode());
    let id = args.id.or(draft.id);
    let name = args.name.or(draft.name);
    let wanted = util::merge_ids(draft.destinations, args.destinations);

    let mut form = catalog
        .city_form(id.as_deref())
        .await
        .map_err(|e| CliError::from_core("Failed to fetch orphan destinations", e, profile))?;

    if let Some(name) = name {
        form.name = name;
    }
    if let Some(pincode) = pincode {
        form.pincode = pincode;
    }
    for destination in &wanted {
        if form.destinations.iter().any(|d| &d.id == destination) {
            continue;
        }
        form.check(destination, true)?;
    }

    let saved = catalog
        .save_city(&form)
        .await
        .map_err(|e| CliError::from_core("Failed to save city", e, profile))?;

    output::print_notification(
        &Notification::success("City saved successfully"),
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

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn draft_accepts_numeric_pincode() {
        let draft: CityDraft =
            serde_json::from_str(r#"{ "name": "Pune", "pincode": 411001 }"#).unwrap();
        assert_eq!(draft.pincode().as_deref(), Some("411001"));

        let draft: CityDraft = serde_json::from_str(r#"{ "pincode": "411 001" }"#).unwrap();
        assert_eq!(draft.pincode().as_deref(), Some("411 001"));
    }
}
