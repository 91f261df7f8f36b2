//! Known config files grouped by program
//!
//! The catalog is a fixed list; it does not look at the disk, so entries may
//! name files that a particular setup does not have.

use serde::ser::SerializeMap;
use serde::{Serialize, Serializer};

/// Files of one program (`bspwm`, `polybar`, ...)
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CatalogGroup {
    pub category: String,
    pub files: Vec<String>,
}

/// Ordered category -> relative paths listing
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FileCatalog {
    groups: Vec<CatalogGroup>,
}

impl FileCatalog {
    /// Build a catalog from `(category, files)` pairs
    pub fn new<I, C, F, S>(groups: I) -> Self
    where
        I: IntoIterator<Item = (C, F)>,
        C: Into<String>,
        F: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            groups: groups
                .into_iter()
                .map(|(category, files)| CatalogGroup {
                    category: category.into(),
                    files: files.into_iter().map(Into::into).collect(),
                })
                .collect(),
        }
    }

    pub fn groups(&self) -> impl Iterator<Item = &CatalogGroup> {
        self.groups.iter()
    }

    /// Files listed under a category
    #[must_use]
    pub fn files(&self, category: &str) -> Option<&[String]> {
        self.groups
            .iter()
            .find(|g| g.category == category)
            .map(|g| g.files.as_slice())
    }

    /// Whether a relative path is listed in any category
    #[must_use]
    pub fn contains(&self, relative: &str) -> bool {
        self.groups
            .iter()
            .any(|g| g.files.iter().any(|f| f == relative))
    }
}

impl Default for FileCatalog {
    fn default() -> Self {
        Self::new([
            ("bspwm", vec!["bspwm/bspwmrc"]),
            (
                "polybar",
                vec![
                    "polybar/config",
                    "polybar/colors.ini",
                    "polybar/colors_dark.ini",
                    "polybar/colors_light.ini",
                    "polybar/current.ini",
                ],
            ),
            ("sxhkd", vec!["sxhkd/sxhkdrc"]),
            ("picom", vec!["picom/picom.conf"]),
            ("kitty", vec!["kitty/kitty.conf", "kitty/color.ini"]),
            ("nvim", vec!["nvim/init.lua"]),
        ])
    }
}

impl Serialize for FileCatalog {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(self.groups.len()))?;
        for group in &self.groups {
            map.serialize_entry(&group.category, &group.files)?;
        }
        map.end()
    }
}
