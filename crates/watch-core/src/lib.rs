//! Watch Core - shared library for template-driven project syncing
//!
//! This library syncs a local project with a remote template repository: it
//! fetches a fixed set of configuration files, merges the template's
//! manifest fields (scripts, name, author, repository URL) into the local
//! `package.json`, installs the template's declared dependencies via npm,
//! and rewrites the template's project name to the local one across every
//! downloaded file.
//!
//! # Architecture
//!
//! The library is organized into layers:
//!
//! - **Substitution** - line-oriented streaming replacement, shared by
//!   downloads and in-place edits
//! - **Manifest** - `package.json` reading, field picking, deep merging
//! - **Template** - remote manifest and file fetching
//! - **Runtime** - npm detection and the install subprocess
//! - **Sync** - the orchestrator sequencing a full run, and its report
//!
//! Binaries implement [`ProductConfig`] to supply their identity and
//! template-source defaults.

pub mod manifest;
pub mod product;
pub mod runtime;
pub mod substitute;
pub mod sync;
pub mod template;

// Re-export main types for convenience
pub use product::ProductConfig;
pub use substitute::{edit_in_place, EditError, Replacements};
pub use sync::report::{RunReport, Warning};
pub use sync::{run, SyncArgs};
pub use template::TemplateFetcher;
