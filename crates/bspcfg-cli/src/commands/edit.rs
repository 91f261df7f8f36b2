//! Edit command output
//!
//! Handles: bspcfg replace/set-option/set-key

use anyhow::Result;
use bspcfg_core::{EditResult, EditStatus};

use super::show::print_json;

/// One-line human summary of an edit
pub fn describe(result: &EditResult) -> String {
    let target = result.target.as_deref().unwrap_or_default();
    let value = result.value.as_deref().unwrap_or_default();
    let (updated, added, made) = if result.dry_run {
        ("Would have updated", "Would have added", "Would have made")
    } else {
        ("Updated", "Added", "Made")
    };

    match result.status {
        EditStatus::Updated => format!("{updated} '{target}' to '{value}' in {}", result.path),
        EditStatus::Added => format!("{added} '{target}' = '{value}' to {}", result.path),
        EditStatus::Ok => format!(
            "{made} {} replacement(s) in {}",
            result.replacements.unwrap_or_default(),
            result.path
        ),
        EditStatus::NoOp => format!("No changes to {}", result.path),
    }
}

pub fn print_result(result: &EditResult, json: bool) -> Result<()> {
    if json {
        return print_json(result);
    }

    println!("{}", describe(result));
    if let Some(diff) = &result.diff {
        print!("{diff}");
    }
    if let Some(backup_id) = &result.backup_id {
        println!("Backup created: {backup_id}");
    }
    Ok(())
}
