//! Plan command
//!
//! Handles: bspcfg apply <plan.json|->

use anyhow::{Context, Result};
use std::io::Read;

use bspcfg_core::plan::{ActionOutput, StepOutcome};
use bspcfg_core::{ConfigTools, Plan};

use super::edit::describe;
use super::show::print_json;

fn read_plan(source: &str) -> Result<String> {
    if source == "-" {
        let mut text = String::new();
        std::io::stdin()
            .read_to_string(&mut text)
            .context("Failed to read plan from stdin")?;
        Ok(text)
    } else {
        std::fs::read_to_string(source).with_context(|| format!("Failed to read plan {source}"))
    }
}

fn summarize(output: &ActionOutput) -> String {
    match output {
        ActionOutput::Files(catalog) => format!("{} categories", catalog.groups().count()),
        ActionOutput::BspwmOptions(report) => {
            format!("{} options in {}", report.options.len(), report.path)
        }
        ActionOutput::IniOptions(report) => {
            format!("{} sections in {}", report.sections.len(), report.path)
        }
        ActionOutput::Items(report) => format!("{} items in {}", report.items.len(), report.path),
        ActionOutput::Edit(result) => describe(result),
    }
}

pub fn apply(tools: &ConfigTools, source: &str, dry_run: bool, json: bool) -> Result<()> {
    let plan = Plan::from_json(&read_plan(source)?)?;
    let report = tools.execute_plan(&plan, dry_run);

    if json {
        print_json(&report)?;
    } else if report.steps.is_empty() {
        println!("Plan has no actions.");
    } else {
        let total = report.steps.len();
        for step in &report.steps {
            let line = match &step.outcome {
                StepOutcome::Done { result } => summarize(result),
                StepOutcome::Failed { message, .. } => format!("FAILED: {message}"),
                StepOutcome::Skipped { reason } => format!("skipped: {reason}"),
            };
            println!("[{}/{total}] {}: {line}", step.index, step.action);
        }
    }

    let failures = report.failures();
    if failures > 0 {
        anyhow::bail!("{failures} of {} actions failed", report.steps.len());
    }
    Ok(())
}
