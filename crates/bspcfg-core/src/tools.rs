//! Config tools
//!
//! The operations a caller (CLI, planner, transport) can invoke. Each call
//! resolves its path, re-reads the file from disk and builds its result from
//! scratch; nothing is cached between calls.

use serde::Serialize;
use sha2::{Digest, Sha256};
use std::fs;
use std::path::{Path, PathBuf};
use tracing::debug;

use crate::backup::BackupDir;
use crate::catalog::FileCatalog;
use crate::error::{ConfigError, ConfigResult};
use crate::mutate::{read_text, Mutator};
use crate::ops::EditResult;
use crate::parser::{parse, Dialect, LineRecord, BSPWMRC_PATH};
use crate::root::ConfigRoot;
use crate::store::{bspwm_options, editable_items, ini_sections, EditableItem, IniSections, OptionMap};

/// Raw file contents
#[derive(Debug, Clone, Serialize)]
pub struct ConfigFile {
    pub path: String,
    pub dialect: Dialect,
    pub sha256: String,
    pub content: String,
}

/// `bspc config` options of `bspwm/bspwmrc`
#[derive(Debug, Clone, Serialize)]
pub struct BspwmOptions {
    pub path: String,
    pub options: OptionMap,
}

/// Sections and keys of an INI-style file
#[derive(Debug, Clone, Serialize)]
pub struct IniOptions {
    pub path: String,
    pub sections: IniSections,
}

/// Editable lines of any config file
#[derive(Debug, Clone, Serialize)]
pub struct EditableItems {
    pub path: String,
    pub items: Vec<EditableItem>,
}

/// Entry point for reading and editing files under a config root
#[derive(Debug, Clone)]
pub struct ConfigTools {
    root: ConfigRoot,
    catalog: FileCatalog,
    backups: Option<BackupDir>,
}

impl ConfigTools {
    #[must_use]
    pub fn new(root: ConfigRoot, catalog: FileCatalog) -> Self {
        Self {
            root,
            catalog,
            backups: None,
        }
    }

    /// Enable file backups to a directory
    #[must_use]
    pub fn with_backup_dir(mut self, dir: impl Into<PathBuf>) -> Self {
        self.backups = Some(BackupDir::new(dir));
        self
    }

    #[must_use]
    pub fn root(&self) -> &ConfigRoot {
        &self.root
    }

    /// Dialect of a resolved file, judged by its place under the root
    fn dialect_of(&self, resolved: &Path) -> Dialect {
        resolved
            .strip_prefix(self.root.path())
            .map_or(Dialect::Ini, |rel| Dialect::for_path(&rel.to_string_lossy()))
    }

    /// Known config files by category
    #[must_use]
    pub fn list_files(&self) -> &FileCatalog {
        &self.catalog
    }

    /// Read a file verbatim
    ///
    /// # Errors
    /// Returns an error if the path is out of scope, missing or unreadable
    pub fn read_config(&self, relative: &str) -> ConfigResult<ConfigFile> {
        let path = self.root.resolve(relative)?;
        let bytes = fs::read(&path).map_err(|e| ConfigError::io(&path, &e))?;

        // Hash what is on disk, not the lossily decoded text
        let mut hasher = Sha256::new();
        hasher.update(&bytes);

        Ok(ConfigFile {
            path: relative.to_string(),
            dialect: self.dialect_of(&path),
            sha256: hex::encode(hasher.finalize()),
            content: String::from_utf8_lossy(&bytes).into_owned(),
        })
    }

    /// Parse a file into line records
    ///
    /// # Errors
    /// Returns an error if the path is out of scope, missing or unreadable
    pub fn parse_file(&self, relative: &str, dialect: Dialect) -> ConfigResult<Vec<LineRecord>> {
        let path = self.root.resolve(relative)?;
        let text = read_text(&path)?;
        let records = parse(&text, dialect);
        debug!(path = relative, %dialect, lines = records.len(), "parsed config file");
        Ok(records)
    }

    /// Current `bspc config` options
    ///
    /// # Errors
    /// Returns an error if `bspwm/bspwmrc` is missing or unreadable
    pub fn get_bspwm_options(&self) -> ConfigResult<BspwmOptions> {
        let records = self.parse_file(BSPWMRC_PATH, Dialect::Command)?;
        Ok(BspwmOptions {
            path: BSPWMRC_PATH.to_string(),
            options: bspwm_options(&records),
        })
    }

    /// Sections and keys of an INI-style file
    ///
    /// # Errors
    /// Returns an error if the path is out of scope, missing or unreadable
    pub fn get_ini_options(&self, relative: &str) -> ConfigResult<IniOptions> {
        let records = self.parse_file(relative, Dialect::Ini)?;
        Ok(IniOptions {
            path: relative.to_string(),
            sections: ini_sections(&records),
        })
    }

    /// Every editable line of a file, parsed in the file's own dialect
    ///
    /// # Errors
    /// Returns an error if the path is out of scope, missing or unreadable
    pub fn list_editable_items(&self, relative: &str) -> ConfigResult<EditableItems> {
        let path = self.root.resolve(relative)?;
        let dialect = self.dialect_of(&path);
        let records = parse(&read_text(&path)?, dialect);
        debug!(path = relative, %dialect, lines = records.len(), "parsed config file");
        Ok(EditableItems {
            path: relative.to_string(),
            items: editable_items(&records),
        })
    }

    /// Replace text in a file
    ///
    /// # Errors
    /// See [`Mutator::substitute_text`]
    pub fn replace_in_file(
        &self,
        relative: &str,
        search: &str,
        replace: &str,
        limit: Option<usize>,
        dry_run: bool,
    ) -> ConfigResult<EditResult> {
        self.mutator(dry_run)
            .substitute_text(relative, search, replace, limit)
    }

    /// Set a `bspc config` option
    ///
    /// # Errors
    /// See [`Mutator::upsert_command_option`]
    pub fn set_bspc_config(
        &self,
        option: &str,
        value: &str,
        dry_run: bool,
    ) -> ConfigResult<EditResult> {
        self.mutator(dry_run).upsert_command_option(option, value)
    }

    /// Set a `key = value` line
    ///
    /// # Errors
    /// See [`Mutator::upsert_key_value`]
    pub fn set_ini_key(
        &self,
        relative: &str,
        key: &str,
        value: &str,
        dry_run: bool,
    ) -> ConfigResult<EditResult> {
        self.mutator(dry_run).upsert_key_value(relative, key, value)
    }

    fn mutator(&self, dry_run: bool) -> Mutator<'_> {
        Mutator::new(&self.root)
            .with_backups(self.backups.as_ref())
            .dry_run(dry_run)
    }
}
