//! Whole-file edits: text substitution and line upserts
//!
//! Each edit reads the whole file, computes the whole new text and writes it
//! back with a single `fs::write`, so a failed edit leaves the file as it was.
//! The text transforms are plain functions over `&str`; [`Mutator`] wraps them
//! with path resolution, backups and dry runs.

use std::fs;
use std::path::Path;

use tracing::{debug, info};

use crate::backup::BackupDir;
use crate::diff::{change_counts, unified_diff};
use crate::error::{ConfigError, ConfigResult};
use crate::ops::{EditResult, EditStatus};
use crate::parser::{BSPC_CONFIG_PREFIX, BSPWMRC_PATH};
use crate::root::ConfigRoot;

/// New text after a substitution
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Substitution {
    pub text: String,
    pub replacements: usize,
}

/// New text after an upsert
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Upsert {
    pub text: String,
    /// `Updated` if any line was rewritten, `Added` if a line was appended
    pub status: EditStatus,
}

/// Replace `search` with `replace`, at most `limit` times when given.
///
/// The count is `min(found, limit)` with a limit and `found` without, where
/// `found` counts non-overlapping occurrences in the original text.
#[must_use]
pub fn substitute(text: &str, search: &str, replace: &str, limit: Option<usize>) -> Substitution {
    let found = text.matches(search).count();
    match limit {
        Some(limit) => Substitution {
            text: text.replacen(search, replace, limit),
            replacements: found.min(limit),
        },
        None => Substitution {
            text: text.replace(search, replace),
            replacements: found,
        },
    }
}

/// Set `bspc config <option> <value>`, rewriting every existing occurrence
#[must_use]
pub fn upsert_command_option(text: &str, option: &str, value: &str) -> Upsert {
    let prefix = format!("{BSPC_CONFIG_PREFIX}{option} ");
    let replacement = format!("{prefix}{value}");
    upsert_lines(
        text,
        &replacement,
        |trimmed| trimmed.starts_with('#'),
        |trimmed| trimmed.starts_with(&prefix),
    )
}

/// Set `key = value`, rewriting every existing occurrence in any section
#[must_use]
pub fn upsert_key_value(text: &str, key: &str, value: &str) -> Upsert {
    let spaced = format!("{key} =");
    let tight = format!("{key}=");
    let replacement = format!("{key} = {value}");
    upsert_lines(
        text,
        &replacement,
        |trimmed| trimmed.is_empty() || trimmed.starts_with('#'),
        |trimmed| trimmed.starts_with(&spaced) || trimmed.starts_with(&tight),
    )
}

fn upsert_lines(
    text: &str,
    replacement: &str,
    passthrough: impl Fn(&str) -> bool,
    is_target: impl Fn(&str) -> bool,
) -> Upsert {
    let mut changed = false;
    let mut lines: Vec<&str> = text
        .lines()
        .map(|line| {
            let trimmed = line.trim();
            if !passthrough(trimmed) && is_target(trimmed) {
                changed = true;
                replacement
            } else {
                line
            }
        })
        .collect();

    if !changed {
        lines.push(replacement);
    }

    let mut output = lines.join("\n");
    output.push('\n');

    Upsert {
        text: output,
        status: if changed {
            EditStatus::Updated
        } else {
            EditStatus::Added
        },
    }
}

/// Read a config file as text; invalid UTF-8 becomes U+FFFD, which a
/// later write keeps
pub(crate) fn read_text(path: &Path) -> ConfigResult<String> {
    let bytes = fs::read(path).map_err(|e| ConfigError::io(path, &e))?;
    Ok(String::from_utf8_lossy(&bytes).into_owned())
}

fn require(field: &str, value: &str) -> ConfigResult<()> {
    if value.is_empty() {
        return Err(ConfigError::MissingParameter(field.to_string()));
    }
    Ok(())
}

/// Applies edits to files under a config root
#[derive(Debug, Clone, Copy)]
pub struct Mutator<'a> {
    root: &'a ConfigRoot,
    backups: Option<&'a BackupDir>,
    dry_run: bool,
}

impl<'a> Mutator<'a> {
    #[must_use]
    pub fn new(root: &'a ConfigRoot) -> Self {
        Self {
            root,
            backups: None,
            dry_run: false,
        }
    }

    /// Copy each file aside before overwriting it
    #[must_use]
    pub fn with_backups(mut self, backups: Option<&'a BackupDir>) -> Self {
        self.backups = backups;
        self
    }

    /// Compute edits and diffs without writing
    #[must_use]
    pub fn dry_run(mut self, dry_run: bool) -> Self {
        self.dry_run = dry_run;
        self
    }

    /// Replace text in a file
    ///
    /// # Errors
    /// Returns an error if the path is out of scope or missing, `search` is
    /// empty, or the file cannot be read or written
    pub fn substitute_text(
        &self,
        relative: &str,
        search: &str,
        replace: &str,
        limit: Option<usize>,
    ) -> ConfigResult<EditResult> {
        let path = self.root.resolve(relative)?;
        require("search", search)?;

        let original = read_text(&path)?;
        let substitution = substitute(&original, search, replace, limit);

        if substitution.text == original {
            debug!(path = relative, search, "substitution changed nothing");
            return Ok(EditResult::substitution(EditStatus::NoOp, 0, relative));
        }

        let result = EditResult::substitution(EditStatus::Ok, substitution.replacements, relative);
        self.commit(relative, &path, &original, &substitution.text, result)
    }

    /// Set a `bspc config` option in `bspwm/bspwmrc`
    ///
    /// # Errors
    /// Returns an error if the option is empty, `bspwmrc` is missing, or the
    /// file cannot be read or written
    pub fn upsert_command_option(&self, option: &str, value: &str) -> ConfigResult<EditResult> {
        require("option", option)?;
        let path = self.root.resolve(BSPWMRC_PATH)?;

        let original = read_text(&path)?;
        let upsert = upsert_command_option(&original, option, value);

        let result = EditResult::upsert(upsert.status, option, value, BSPWMRC_PATH);
        self.commit(BSPWMRC_PATH, &path, &original, &upsert.text, result)
    }

    /// Set a `key = value` line in an INI-style file
    ///
    /// # Errors
    /// Returns an error if the key is empty, the path is out of scope or
    /// missing, or the file cannot be read or written
    pub fn upsert_key_value(
        &self,
        relative: &str,
        key: &str,
        value: &str,
    ) -> ConfigResult<EditResult> {
        let path = self.root.resolve(relative)?;
        require("key", key)?;

        let original = read_text(&path)?;
        let upsert = upsert_key_value(&original, key, value);

        let result = EditResult::upsert(upsert.status, key, value, relative);
        self.commit(relative, &path, &original, &upsert.text, result)
    }

    fn commit(
        &self,
        relative: &str,
        path: &Path,
        original: &str,
        updated: &str,
        result: EditResult,
    ) -> ConfigResult<EditResult> {
        if self.dry_run {
            return Ok(result.with_diff(unified_diff(relative, original, updated)));
        }

        let backup_id = self.backups.map(|b| b.backup(path)).transpose()?;

        fs::write(path, updated).map_err(|e| ConfigError::io(path, &e))?;

        let (inserted, deleted) = change_counts(original, updated);
        info!(
            path = relative,
            status = %result.status,
            inserted,
            deleted,
            "config file written"
        );

        Ok(result.with_backup(backup_id))
    }
}
