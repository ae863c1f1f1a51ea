//! npm subprocess invocation
//!
//! Installs run as plain child processes with captured output. Whether a
//! failed install aborts anything is the caller's call; here a non-zero
//! exit is simply an error.

use anyhow::{Context, Result};
use colored::Colorize;
use serde_json::{Map, Value};
use std::fmt;
use tokio::process::Command;

/// Which dependency table an install targets.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DepKind {
    Regular,
    Dev,
}

impl DepKind {
    pub fn display_name(&self) -> &'static str {
        match self {
            DepKind::Regular => "regular",
            DepKind::Dev => "dev",
        }
    }
}

impl fmt::Display for DepKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.display_name())
    }
}

/// Render a dependency table as `name@version` specs, stripping a leading
/// caret so the exact listed version is requested.
pub fn render_packages(deps: &Map<String, Value>) -> Vec<String> {
    deps.iter()
        .map(|(name, version)| {
            let version = version.as_str().unwrap_or_default();
            let version = version.strip_prefix('^').unwrap_or(version);
            format!("{}@{}", name, version)
        })
        .collect()
}

/// Run `npm install [--save-dev] <packages...>`, capturing combined
/// stdout/stderr and echoing both. Non-zero exit is an error carrying the
/// exit code.
pub async fn install(packages: &[String], kind: DepKind) -> Result<()> {
    let mut cmd = Command::new("npm");
    cmd.arg("install");
    if kind == DepKind::Dev {
        cmd.arg("--save-dev");
    }
    cmd.args(packages);

    let mut rendered = String::from("npm install");
    if kind == DepKind::Dev {
        rendered.push_str(" --save-dev");
    }
    for package in packages {
        rendered.push(' ');
        rendered.push_str(package);
    }
    println!("{} {}", "Running:".dimmed(), rendered.yellow());

    let output = cmd.output().await.context("Failed to run npm install")?;

    let stdout = String::from_utf8_lossy(&output.stdout);
    if !stdout.trim().is_empty() {
        println!("{}", stdout.trim_end());
    }
    let stderr = String::from_utf8_lossy(&output.stderr);
    if !stderr.trim().is_empty() {
        eprintln!("{}", stderr.trim_end().yellow());
    }

    if !output.status.success() {
        anyhow::bail!(
            "npm install failed with exit code: {}",
            output.status.code().unwrap_or(-1)
        );
    }

    Ok(())
}
