//! Package-manager detection and invocation
//!
//! This module provides:
//! - npm availability detection
//! - The install subprocess runner

pub mod check;
pub mod npm;

pub use check::{check_npm, RuntimeInfo};
pub use npm::DepKind;
