//! Remote template access
//!
//! This module provides:
//! - Manifest fetching (the template's `package.json`, parsed as JSON)
//! - Streamed file downloads with on-the-fly name substitution
//! - The fixed file lists a sync run operates on

pub mod fetcher;
pub mod files;

pub use fetcher::TemplateFetcher;
pub use files::{destination_name, SECOND_PASS_FILES, TRACKED_FILES};
