//! Read-only commands
//!
//! Handles: bspcfg files/read/options/ini/items

use anyhow::Result;
use bspcfg_core::store::{EditableItem, OptionMap};
use bspcfg_core::ConfigTools;

/// Print a value as pretty JSON
pub fn print_json<T: serde::Serialize>(value: &T) -> Result<()> {
    println!("{}", serde_json::to_string_pretty(value)?);
    Ok(())
}

pub fn files(tools: &ConfigTools, json: bool) -> Result<()> {
    let catalog = tools.list_files();
    if json {
        return print_json(catalog);
    }

    for group in catalog.groups() {
        println!("{}:", group.category);
        for file in &group.files {
            println!("  {file}");
        }
    }
    Ok(())
}

pub fn read(tools: &ConfigTools, path: &str, json: bool) -> Result<()> {
    let file = tools.read_config(path)?;
    if json {
        return print_json(&file);
    }
    print!("{}", file.content);
    Ok(())
}

/// Print options as an aligned `name = value (line N)` table
fn print_options(options: &OptionMap, indent: &str) {
    let width = options.iter().map(|o| o.name.len()).max().unwrap_or(0);
    for option in options.iter() {
        println!(
            "{indent}{:<width$} = {:<20} (line {})",
            option.name, option.value, option.line
        );
    }
}

pub fn options(tools: &ConfigTools, json: bool) -> Result<()> {
    let report = tools.get_bspwm_options()?;
    if json {
        return print_json(&report);
    }

    println!("File: {}\n", report.path);
    if report.options.is_empty() {
        println!("  (no bspc config options defined)");
    } else {
        print_options(&report.options, "  ");
    }
    Ok(())
}

pub fn ini(tools: &ConfigTools, path: &str, json: bool) -> Result<()> {
    let report = tools.get_ini_options(path)?;
    if json {
        return print_json(&report);
    }

    for section in report.sections.iter() {
        println!("[{}]", section.name);
        if section.options.is_empty() {
            println!("  (empty)");
        } else {
            print_options(&section.options, "  ");
        }
        println!();
    }
    Ok(())
}

pub fn items(tools: &ConfigTools, path: &str, json: bool) -> Result<()> {
    let report = tools.list_editable_items(path)?;
    if json {
        return print_json(&report);
    }

    if report.items.is_empty() {
        println!("No editable items found in {}.", report.path);
        return Ok(());
    }

    for item in &report.items {
        match item {
            EditableItem::BspcConfig {
                option, value, line, ..
            } => println!("{line:>4}  bspc config {option} {value}"),
            EditableItem::KeyValue {
                key, value, line, ..
            } => println!("{line:>4}  {key} = {value}"),
        }
    }
    Ok(())
}
