//! bspcfg Core - scoped reading and editing of desktop config files
//!
//! This crate parses and edits `bspwmrc` (`bspc config` lines) and INI-style
//! files (polybar, kitty, picom, ...) under a single config root, without
//! ever touching a path outside it.

#![forbid(unsafe_code)]
#![warn(clippy::all, clippy::pedantic)]
#![allow(clippy::module_name_repetitions, clippy::must_use_candidate)]

pub mod backup;
pub mod catalog;
pub mod diff;
pub mod error;
pub mod mutate;
pub mod ops;
pub mod parser;
pub mod plan;
pub mod root;
pub mod store;
pub mod tools;

pub use catalog::FileCatalog;
pub use error::{ConfigError, ConfigResult};
pub use ops::{EditResult, EditStatus};
pub use parser::{Dialect, LineKind, LineRecord};
pub use plan::{Action, Plan, PlanReport};
pub use root::ConfigRoot;
pub use tools::ConfigTools;
