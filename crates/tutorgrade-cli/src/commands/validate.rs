//! The `tutorgrade validate` command.

use std::path::PathBuf;

use anyhow::Result;

use tutorgrade_core::parser::{load_sheets, validate_sheet};

pub fn execute(sheet_path: PathBuf) -> Result<()> {
    let sheets = load_sheets(&sheet_path)?;
    anyhow::ensure!(
        !sheets.is_empty(),
        "no answer sheets found in {}",
        sheet_path.display()
    );

    let mut total_warnings = 0;

    for sheet in &sheets {
        println!("Answer sheet: {} ({} items)", sheet.name, sheet.items.len());

        let warnings = validate_sheet(sheet);
        for w in &warnings {
            let prefix = w
                .item_id
                .as_ref()
                .map(|id| format!("  [{id}]"))
                .unwrap_or_else(|| "  ".to_string());
            println!("{prefix} WARNING: {}", w.message);
        }
        total_warnings += warnings.len();
    }

    if total_warnings == 0 {
        println!("All answer sheets valid.");
    } else {
        println!("\n{total_warnings} warning(s) found.");
    }

    Ok(())
}
