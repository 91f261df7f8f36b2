//! Read-only projections over parsed lines
//!
//! Projections are rebuilt from the records on every call and never written
//! back. When an option or key appears more than once, the projection keeps
//! the last occurrence (in the position of the first), while the file itself
//! still holds every copy until an upsert rewrites them all.

use serde::ser::{SerializeMap, SerializeStruct};
use serde::{Serialize, Serializer};

use crate::parser::{LineKind, LineRecord, GLOBAL_SECTION};

/// A single option or key with where it came from
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ConfigOption {
    pub name: String,
    pub value: String,
    /// 1-based source line
    pub line: usize,
    /// Source line as written
    pub raw: String,
}

impl ConfigOption {
    fn from_record(name: &str, value: &str, record: &LineRecord) -> Self {
        Self {
            name: name.to_string(),
            value: value.to_string(),
            line: record.line_number,
            raw: record.raw_text.clone(),
        }
    }
}

// Serialized as the value of a map entry keyed by `name`
impl Serialize for ConfigOption {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut state = serializer.serialize_struct("ConfigOption", 3)?;
        state.serialize_field("value", &self.value)?;
        state.serialize_field("line", &self.line)?;
        state.serialize_field("raw", &self.raw)?;
        state.end()
    }
}

/// Insertion-ordered name -> option mapping with last-write-wins inserts
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct OptionMap {
    entries: Vec<ConfigOption>,
}

impl OptionMap {
    /// Insert, replacing an existing entry of the same name in place
    pub fn insert(&mut self, option: ConfigOption) {
        match self.entries.iter_mut().find(|o| o.name == option.name) {
            Some(existing) => *existing = option,
            None => self.entries.push(option),
        }
    }

    #[must_use]
    pub fn get(&self, name: &str) -> Option<&ConfigOption> {
        self.entries.iter().find(|o| o.name == name)
    }

    pub fn iter(&self) -> impl Iterator<Item = &ConfigOption> {
        self.entries.iter()
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl Serialize for OptionMap {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(self.entries.len()))?;
        for option in &self.entries {
            map.serialize_entry(&option.name, option)?;
        }
        map.end()
    }
}

/// One INI section
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Section {
    pub name: String,
    pub options: OptionMap,
}

/// Ordered section name -> section mapping
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct IniSections {
    sections: Vec<Section>,
}

impl IniSections {
    fn new() -> Self {
        Self {
            sections: vec![Section {
                name: GLOBAL_SECTION.to_string(),
                options: OptionMap::default(),
            }],
        }
    }

    /// Index of the named section, creating it at the end if needed
    fn section_index(&mut self, name: &str) -> usize {
        if let Some(idx) = self.sections.iter().position(|s| s.name == name) {
            return idx;
        }
        self.sections.push(Section {
            name: name.to_string(),
            options: OptionMap::default(),
        });
        self.sections.len() - 1
    }

    #[must_use]
    pub fn get(&self, name: &str) -> Option<&Section> {
        self.sections.iter().find(|s| s.name == name)
    }

    pub fn iter(&self) -> impl Iterator<Item = &Section> {
        self.sections.iter()
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.sections.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.sections.is_empty()
    }
}

impl Serialize for IniSections {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(self.sections.len()))?;
        for section in &self.sections {
            map.serialize_entry(&section.name, &section.options)?;
        }
        map.end()
    }
}

/// An editable line, in file order, without de-duplication
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum EditableItem {
    BspcConfig {
        option: String,
        value: String,
        line: usize,
        raw: String,
    },
    KeyValue {
        key: String,
        value: String,
        line: usize,
        raw: String,
    },
}

impl EditableItem {
    #[must_use]
    pub fn line(&self) -> usize {
        match self {
            Self::BspcConfig { line, .. } | Self::KeyValue { line, .. } => *line,
        }
    }
}

/// Collect `bspc config` options
#[must_use]
pub fn bspwm_options(records: &[LineRecord]) -> OptionMap {
    let mut options = OptionMap::default();
    for record in records {
        if let LineKind::CommandOption { option, value } = &record.kind {
            options.insert(ConfigOption::from_record(option, value, record));
        }
    }
    options
}

/// Collect `key = value` lines grouped by section
#[must_use]
pub fn ini_sections(records: &[LineRecord]) -> IniSections {
    let mut sections = IniSections::new();
    let mut current = 0;

    for record in records {
        match &record.kind {
            LineKind::SectionHeader { name } => current = sections.section_index(name),
            LineKind::KeyValue { key, value } => sections.sections[current]
                .options
                .insert(ConfigOption::from_record(key, value, record)),
            _ => {}
        }
    }

    sections
}

/// Every option/key line, in order
#[must_use]
pub fn editable_items(records: &[LineRecord]) -> Vec<EditableItem> {
    records
        .iter()
        .filter_map(|record| match &record.kind {
            LineKind::CommandOption { option, value } => Some(EditableItem::BspcConfig {
                option: option.clone(),
                value: value.clone(),
                line: record.line_number,
                raw: record.raw_text.clone(),
            }),
            LineKind::KeyValue { key, value } => Some(EditableItem::KeyValue {
                key: key.clone(),
                value: value.clone(),
                line: record.line_number,
                raw: record.raw_text.clone(),
            }),
            _ => None,
        })
        .collect()
}
