//! Edit outcomes

use serde::{Deserialize, Serialize};
use std::fmt;

/// What an edit did to the file
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum EditStatus {
    /// Upsert rewrote at least one existing line
    Updated,
    /// Upsert appended a new line
    Added,
    /// Substitution changed the text
    Ok,
    /// Substitution found nothing to change; nothing was written
    NoOp,
}

impl fmt::Display for EditStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Updated => write!(f, "updated"),
            Self::Added => write!(f, "added"),
            Self::Ok => write!(f, "ok"),
            Self::NoOp => write!(f, "no-op"),
        }
    }
}

/// Result of an edit operation
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EditResult {
    pub status: EditStatus,

    /// Option or key that was set (absent for substitutions)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub target: Option<String>,

    /// New value (absent for substitutions)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub value: Option<String>,

    /// Relative path of the affected file
    pub path: String,

    /// Number of replacements (substitutions only)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub replacements: Option<usize>,

    /// Nothing was written
    #[serde(default, skip_serializing_if = "std::ops::Not::not")]
    pub dry_run: bool,

    /// Line diff preview (dry runs only)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub diff: Option<String>,

    /// Backup ID (for manual restore)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub backup_id: Option<String>,
}

impl EditResult {
    /// Result of an upsert
    pub fn upsert(
        status: EditStatus,
        target: impl Into<String>,
        value: impl Into<String>,
        path: impl Into<String>,
    ) -> Self {
        Self {
            status,
            target: Some(target.into()),
            value: Some(value.into()),
            path: path.into(),
            replacements: None,
            dry_run: false,
            diff: None,
            backup_id: None,
        }
    }

    /// Result of a substitution
    pub fn substitution(status: EditStatus, replacements: usize, path: impl Into<String>) -> Self {
        Self {
            status,
            target: None,
            value: None,
            path: path.into(),
            replacements: Some(replacements),
            dry_run: false,
            diff: None,
            backup_id: None,
        }
    }

    /// Mark as a dry run with a diff preview
    #[must_use]
    pub fn with_diff(mut self, diff: impl Into<String>) -> Self {
        self.dry_run = true;
        self.diff = Some(diff.into());
        self
    }

    /// Attach a backup ID
    #[must_use]
    pub fn with_backup(mut self, backup_id: Option<String>) -> Self {
        self.backup_id = backup_id;
        self
    }
}
