//! Destination command handlers.

use tabled::Tabled;

use where2go_core::{Catalog, Destination};

use crate::cli::{DestinationsArgs, DestinationsCommand, GlobalOpts};
use crate::config::Resolved;
use crate::error::CliError;
use crate::output::{self, or_dash};

#[derive(Tabled)]
struct DestinationRow {
    #[tabled(rename = "ID")]
    id: String,
    #[tabled(rename = "Name")]
    name: String,
    #[tabled(rename = "City")]
    city: String,
    #[tabled(rename = "Likes")]
    likes: String,
}

impl From<&Destination> for DestinationRow {
    fn from(d: &Destination) -> Self {
        Self {
            id: d.id.clone(),
            name: d.name.clone(),
            city: or_dash(d.city.as_ref()),
            likes: or_dash(d.likes),
        }
    }
}

pub async fn handle(
    catalog: &Catalog,
    args: DestinationsArgs,
    resolved: &Resolved,
    global: &GlobalOpts,
) -> Result<(), CliError> {
    let profile = resolved.profile_name.as_str();
    let destinations = match args.command {
        DestinationsCommand::List => catalog
            .destinations()
            .await
            .map_err(|e| CliError::from_core("Failed to fetch destinations list.", e, profile))?,
        DestinationsCommand::Orphans => catalog.orphan_destinations().await.map_err(|e| {
            CliError::from_core("Failed to fetch orphan destinations", e, profile)
        })?,
    };

    let out = output::render_list(
        &global.output,
        &destinations,
        |d| DestinationRow::from(d),
        |d| d.id.clone(),
    )?;
    output::print_output(&out, global.quiet);
    Ok(())
}
