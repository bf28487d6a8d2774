//! Output formatting: table, JSON, YAML, plain.
//!
//! Data goes to stdout in the `--output` format; notifications go to
//! stderr so they never mix with machine-readable output.

use std::io::{self, IsTerminal, Write};

use owo_colors::OwoColorize;
use tabled::{Table, Tabled, settings::Style};

use where2go_core::Notification;

use crate::cli::{ColorMode, OutputFormat};
use crate::error::CliError;

pub fn should_color(mode: &ColorMode) -> bool {
    match mode {
        ColorMode::Always => true,
        ColorMode::Never => false,
        ColorMode::Auto => io::stderr().is_terminal() && std::env::var_os("NO_COLOR").is_none(),
    }
}

// ── Render dispatchers ───────────────────────────────────────────────

/// Render a list in the chosen format. `plain` emits one id per line.
pub fn render_list<T, R>(
    format: &OutputFormat,
    data: &[T],
    to_row: impl Fn(&T) -> R,
    id_fn: impl Fn(&T) -> String,
) -> Result<String, CliError>
where
    T: serde::Serialize,
    R: Tabled,
{
    Ok(match format {
        OutputFormat::Table => {
            let rows: Vec<R> = data.iter().map(to_row).collect();
            render_table(&rows)
        }
        OutputFormat::Json => serde_json::to_string_pretty(data)?,
        OutputFormat::JsonCompact => serde_json::to_string(data)?,
        OutputFormat::Yaml => render_yaml(data)?,
        OutputFormat::Plain => data.iter().map(&id_fn).collect::<Vec<_>>().join("\n"),
    })
}

/// Render one item. Table format uses `detail_fn` instead of `Tabled`.
pub fn render_single<T>(
    format: &OutputFormat,
    data: &T,
    detail_fn: impl Fn(&T) -> String,
    id_fn: impl Fn(&T) -> String,
) -> Result<String, CliError>
where
    T: serde::Serialize,
{
    Ok(match format {
        OutputFormat::Table => detail_fn(data),
        OutputFormat::Json => serde_json::to_string_pretty(data)?,
        OutputFormat::JsonCompact => serde_json::to_string(data)?,
        OutputFormat::Yaml => render_yaml(data)?,
        OutputFormat::Plain => id_fn(data),
    })
}

pub fn print_output(output: &str, quiet: bool) {
    if quiet || output.is_empty() {
        return;
    }
    let mut stdout = io::stdout().lock();
    let _ = writeln!(stdout, "{output}");
}

/// Show a notification on stderr.
pub fn print_notification(note: &Notification, quiet: bool, color: &ColorMode) {
    if quiet && !note.is_destructive() {
        return;
    }
    let mut stderr = io::stderr().lock();
    let line = note.to_string();
    let _ = match (should_color(color), note.is_destructive()) {
        (true, false) => writeln!(stderr, "{} {}", "✓".green(), line.bold()),
        (true, true) => writeln!(stderr, "{} {}", "✗".red(), line.red()),
        (false, false) => writeln!(stderr, "✓ {line}"),
        (false, true) => writeln!(stderr, "✗ {line}"),
    };
}

// ── Format-specific renderers ────────────────────────────────────────

fn render_table<R: Tabled>(rows: &[R]) -> String {
    Table::new(rows).with(Style::rounded()).to_string()
}

fn render_yaml<T: serde::Serialize + ?Sized>(data: &T) -> Result<String, CliError> {
    serde_yaml::to_string(data).map_err(|e| CliError::Internal(format!("YAML output: {e}")))
}

/// Key/value block for detail views.
pub fn detail_block(fields: &[(&str, String)]) -> String {
    let width = fields.iter().map(|(k, _)| k.len()).max().unwrap_or(0);
    fields
        .iter()
        .map(|(k, v)| format!("{k:<width$}  {v}"))
        .collect::<Vec<_>>()
        .join("\n")
}

pub fn or_dash(value: Option<impl ToString>) -> String {
    value.map_or_else(|| "-".into(), |v| v.to_string())
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use serde::Serialize;

    use super::*;

    #[derive(Serialize, Tabled)]
    struct Row {
        id: String,
        name: String,
    }

    fn rows() -> Vec<Row> {
        vec![
            Row {
                id: "s1".into(),
                name: "Goa".into(),
            },
            Row {
                id: "s2".into(),
                name: "Kerala".into(),
            },
        ]
    }

    fn same(r: &Row) -> Row {
        Row {
            id: r.id.clone(),
            name: r.name.clone(),
        }
    }

    #[test]
    fn plain_lists_ids() {
        let out = render_list(&OutputFormat::Plain, &rows(), same, |r| r.id.clone()).unwrap();
        assert_eq!(out, "s1\ns2");
    }

    #[test]
    fn compact_json_is_one_line() {
        let out = render_list(&OutputFormat::JsonCompact, &rows(), same, |r| r.id.clone()).unwrap();
        assert_eq!(out, r#"[{"id":"s1","name":"Goa"},{"id":"s2","name":"Kerala"}]"#);
    }

    #[test]
    fn table_has_headers() {
        let out = render_list(&OutputFormat::Table, &rows(), same, |r| r.id.clone()).unwrap();
        assert!(out.contains("name"));
        assert!(out.contains("Kerala"));
    }

    #[test]
    fn detail_block_aligns_keys() {
        let out = detail_block(&[("ID", "s1".into()), ("Name", "Goa".into())]);
        assert_eq!(out, "ID    s1\nName  Goa");
    }
}
