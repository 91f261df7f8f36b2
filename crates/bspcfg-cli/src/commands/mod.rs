//! CLI command handlers
//!
//! Read-only views live in `show`, file edits in `edit`, and plan
//! execution in `plan`.

pub mod edit;
pub mod plan;
pub mod show;
