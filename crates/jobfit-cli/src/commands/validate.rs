//! The `jobfit validate` command.

use std::path::PathBuf;

use anyhow::Result;

use jobfit_core::parser::{load_item_bank, validate_item_bank};

pub fn execute(config_path: Option<PathBuf>, dataset: Option<PathBuf>) -> Result<()> {
    let settings = super::load_settings(config_path, dataset)?;
    let bank = load_item_bank(&settings.dataset)?;

    println!(
        "Dataset: {} ({} questions, {} roles)",
        settings.dataset.display(),
        bank.len(),
        bank.roles().len()
    );

    let warnings = validate_item_bank(&bank, settings.assessment.max_questions);
    for w in &warnings {
        let prefix = w
            .role
            .as_ref()
            .map(|role| format!("  [{role}]"))
            .unwrap_or_else(|| "  ".to_string());
        println!("{prefix} WARNING: {}", w.message);
    }

    if warnings.is_empty() {
        println!("Dataset valid.");
    } else {
        println!("\n{} warning(s) found.", warnings.len());
    }

    Ok(())
}
