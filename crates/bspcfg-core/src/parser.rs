//! Line classification for the two config dialects
//!
//! `bspwmrc` is a shell script where the interesting lines look like
//! `bspc config <option> <value>`. Everything else we edit (polybar, kitty,
//! picom, ...) is close enough to INI: `[section]` headers and `key = value`
//! lines. Both dialects are scanned line by line and every physical line gets
//! a [`LineRecord`], including the ones we never touch, so a file can always be
//! rendered back exactly as it was read.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Prefix shared by every bspwm option line
pub const BSPC_CONFIG_PREFIX: &str = "bspc config ";

/// Relative path of the one file that uses the command dialect
pub const BSPWMRC_PATH: &str = "bspwm/bspwmrc";

/// Section that holds options appearing before any header
pub const GLOBAL_SECTION: &str = "global";

/// Line syntax of a config file
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Dialect {
    /// `bspc config <option> <value>` lines, `#` comments
    Command,
    /// `[section]` headers and `key = value` lines, `#` and `;` comments
    Ini,
}

impl Dialect {
    /// Pick the dialect from the file's relative path
    ///
    /// `.` and `..` are folded first so every spelling that resolves to
    /// `bspwm/bspwmrc` gets the command dialect.
    #[must_use]
    pub fn for_path(relative: &str) -> Self {
        let mut parts: Vec<&str> = Vec::new();
        for part in relative.split(['/', '\\']) {
            match part {
                "" | "." => {}
                ".." => {
                    parts.pop();
                }
                other => parts.push(other),
            }
        }

        if parts.join("/") == BSPWMRC_PATH {
            Self::Command
        } else {
            Self::Ini
        }
    }

    fn is_comment(self, trimmed: &str) -> bool {
        match self {
            Self::Command => trimmed.starts_with('#'),
            Self::Ini => trimmed.starts_with('#') || trimmed.starts_with(';'),
        }
    }
}

impl fmt::Display for Dialect {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Command => write!(f, "command"),
            Self::Ini => write!(f, "ini"),
        }
    }
}

/// What a single line means
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum LineKind {
    Blank,
    Comment,
    SectionHeader { name: String },
    CommandOption { option: String, value: String },
    KeyValue { key: String, value: String },
    /// Anything else; kept verbatim and never projected
    Other,
}

/// Physical line terminator
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LineEnding {
    Lf,
    CrLf,
    /// Last line of a file with no trailing newline
    #[default]
    None,
}

impl LineEnding {
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Lf => "\n",
            Self::CrLf => "\r\n",
            Self::None => "",
        }
    }
}

/// One physical line of a config file
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LineRecord {
    /// 1-based line number
    pub line_number: usize,
    /// Line text without its terminator
    pub raw_text: String,
    #[serde(flatten)]
    pub kind: LineKind,
    #[serde(skip)]
    pub ending: LineEnding,
}

/// Classify one line (without terminator) in the given dialect
#[must_use]
pub fn classify(line: &str, dialect: Dialect) -> LineKind {
    let trimmed = line.trim();

    if trimmed.is_empty() {
        return LineKind::Blank;
    }
    if dialect.is_comment(trimmed) {
        return LineKind::Comment;
    }

    match dialect {
        Dialect::Command => classify_command(trimmed),
        Dialect::Ini => classify_ini(trimmed),
    }
}

fn classify_command(trimmed: &str) -> LineKind {
    let Some(rest) = trimmed.strip_prefix(BSPC_CONFIG_PREFIX) else {
        return LineKind::Other;
    };

    // Tokens 0 and 1 are `bspc config`; the value is whatever follows the option
    let rest = rest.trim_start();
    if rest.is_empty() {
        return LineKind::Other;
    }

    let (option, value) = match rest.split_once(char::is_whitespace) {
        Some((option, value)) => (option, value.trim_start()),
        None => (rest, ""),
    };

    LineKind::CommandOption {
        option: option.to_string(),
        value: value.to_string(),
    }
}

fn classify_ini(trimmed: &str) -> LineKind {
    if let Some(inner) = trimmed.strip_prefix('[').and_then(|s| s.strip_suffix(']')) {
        let inner = inner.trim();
        let name = if inner.is_empty() {
            GLOBAL_SECTION
        } else {
            inner
        };
        return LineKind::SectionHeader {
            name: name.to_string(),
        };
    }

    let Some((key, value)) = trimmed.split_once('=') else {
        return LineKind::Other;
    };

    let key = key.trim();
    if key.is_empty() {
        return LineKind::Other;
    }

    LineKind::KeyValue {
        key: key.to_string(),
        value: value.trim().to_string(),
    }
}

/// Split text into lines, keeping track of each terminator
fn split_lines(text: &str) -> impl Iterator<Item = (&str, LineEnding)> {
    text.split_inclusive('\n').map(|chunk| {
        if let Some(line) = chunk.strip_suffix("\r\n") {
            (line, LineEnding::CrLf)
        } else if let Some(line) = chunk.strip_suffix('\n') {
            (line, LineEnding::Lf)
        } else {
            (chunk, LineEnding::None)
        }
    })
}

/// Parse a whole file into line records
#[must_use]
pub fn parse(text: &str, dialect: Dialect) -> Vec<LineRecord> {
    split_lines(text)
        .enumerate()
        .map(|(idx, (line, ending))| LineRecord {
            line_number: idx + 1,
            raw_text: line.to_string(),
            kind: classify(line, dialect),
            ending,
        })
        .collect()
}

/// Render records back to text, byte for byte
#[must_use]
pub fn render(records: &[LineRecord]) -> String {
    let mut output = String::new();
    for record in records {
        output.push_str(&record.raw_text);
        output.push_str(record.ending.as_str());
    }
    output
}
