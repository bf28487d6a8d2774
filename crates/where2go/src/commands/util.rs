//! Shared helpers for command handlers.

use std::path::Path;
use std::time::Duration;

use indicatif::{ProgressBar, ProgressStyle};
use serde::de::DeserializeOwned;

use crate::error::CliError;

/// Read and parse a JSON file for `--from-file` flags.
pub fn read_json_file<T: DeserializeOwned>(path: &Path) -> Result<T, CliError> {
    let contents = std::fs::read_to_string(path)?;
    serde_json::from_str(&contents).map_err(|e| CliError::Validation {
        field: "from-file".into(),
        reason: format!("invalid JSON in {}: {e}", path.display()),
    })
}

/// Map a dialoguer / interactive I/O failure into CliError.
pub fn prompt_err(e: impl std::fmt::Display) -> CliError {
    CliError::Validation {
        field: "interactive".into(),
        reason: format!("prompt failed: {e}"),
    }
}

/// A stderr spinner for slow round-trips. Hidden in quiet mode and when
/// stderr is not a terminal.
pub fn spinner(message: &str, quiet: bool) -> ProgressBar {
    if quiet {
        return ProgressBar::hidden();
    }
    let pb = ProgressBar::new_spinner();
    if let Ok(style) = ProgressStyle::with_template("{spinner} {msg}") {
        pb.set_style(style);
    }
    pb.set_message(message.to_owned());
    pb.enable_steady_tick(Duration::from_millis(100));
    pb
}

/// Add `extra` ids after `base`, skipping repeats.
pub fn merge_ids(mut base: Vec<String>, extra: Vec<String>) -> Vec<String> {
    for id in extra {
        if !base.contains(&id) {
            base.push(id);
        }
    }
    base
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn merge_ids_keeps_order_and_drops_repeats() {
        let merged = merge_ids(
            vec!["c1".into(), "c2".into()],
            vec!["c2".into(), "c3".into()],
        );
        assert_eq!(merged, ["c1", "c2", "c3"]);
    }

    #[test]
    fn bad_json_file_is_validation_error() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("state.json");
        std::fs::write(&path, "{ not json").unwrap();
        let err = read_json_file::<serde_json::Value>(&path).unwrap_err();
        assert!(matches!(err, CliError::Validation { ref field, .. } if field == "from-file"));
    }
}
