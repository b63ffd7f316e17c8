//! The `jobfit roles` command.

use std::collections::HashSet;
use std::path::PathBuf;

use anyhow::Result;
use comfy_table::{Cell, Table};

use jobfit_core::parser::load_item_bank;
use jobfit_core::Difficulty;

pub fn execute(config_path: Option<PathBuf>, dataset: Option<PathBuf>) -> Result<()> {
    let settings = super::load_settings(config_path, dataset)?;
    let bank = load_item_bank(&settings.dataset)?;
    let none = HashSet::new();

    let mut table = Table::new();
    let mut header = vec!["Role".to_string(), "Questions".to_string()];
    header.extend(Difficulty::all().map(|d| format!("Difficulty {d}")));
    table.set_header(header);

    for role in bank.roles() {
        let mut row = vec![Cell::new(role), Cell::new(bank.count_for_role(role))];
        row.extend(Difficulty::all().map(|d| Cell::new(bank.query(role, &[d], &none).len())));
        table.add_row(row);
    }

    println!("{table}");
    Ok(())
}
