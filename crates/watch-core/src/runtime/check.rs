//! Runtime detection for the external package manager

use std::process::Command;

/// Runtime detection result
#[derive(Debug, Clone)]
pub struct RuntimeInfo {
    pub name: &'static str,
    pub version: Option<String>,
    pub available: bool,
}

/// Check if npm is available
pub fn check_npm() -> RuntimeInfo {
    let output = Command::new("npm").arg("--version").output();

    match output {
        Ok(out) if out.status.success() => {
            let version = String::from_utf8_lossy(&out.stdout).trim().to_string();
            RuntimeInfo {
                name: "npm",
                version: Some(version),
                available: true,
            }
        }
        _ => RuntimeInfo {
            name: "npm",
            version: None,
            available: false,
        },
    }
}
