//! Orchestration of a full template sync run
//!
//! A run is a straight line: read the local manifest, fetch the template's,
//! install the template's dependencies, write the merged manifest, download
//! the tracked files with the project name substituted, then re-run the
//! substitution over every tracked file on disk. Only the manifest steps and
//! failed downloads abort the run; everything else degrades into warnings.

pub mod report;

use crate::manifest::{self, Manifest};
use crate::product::ProductConfig;
use crate::runtime::{check_npm, npm, DepKind};
use crate::substitute::{edit_in_place, Replacements};
use crate::template::{destination_name, TemplateFetcher, SECOND_PASS_FILES, TRACKED_FILES};
use anyhow::{Context, Result};
use colored::Colorize;
use report::{RunReport, Warning};
use std::path::PathBuf;
use tokio::fs;
use url::Url;

/// Arguments for a sync run.
#[derive(Debug, Clone)]
pub struct SyncArgs {
    /// Project directory holding the local manifest
    pub directory: PathBuf,

    /// Template base URL; falls back to the product's env var, then default
    pub uri: Option<String>,

    /// Author recorded in the merged manifest
    pub author: String,

    /// Project name; falls back to the local manifest's name
    pub project_name: Option<String>,

    /// Separate directory for written files (defaults to `directory`)
    pub output_path: Option<PathBuf>,
}

/// Run a full sync against the template repository.
///
/// Returns the report of downloaded files and collected warnings; fatal
/// failures (unreadable local manifest, failed manifest fetch, failed
/// download) propagate as errors.
pub async fn run<C: ProductConfig>(config: &C, args: SyncArgs) -> Result<RunReport> {
    let mut report = RunReport::new();

    // The local manifest is authoritative for identity; without it there is
    // nothing to merge into.
    let manifest_path = args.directory.join("package.json");
    let local = manifest::read_manifest(&manifest_path).await?;

    let fetcher = match &args.uri {
        Some(uri) => {
            let url = Url::parse(uri).with_context(|| format!("Invalid template URL: {}", uri))?;
            TemplateFetcher::new(url, config.user_agent())
        }
        None => TemplateFetcher::from_config(config)?,
    };
    let template = fetcher.fetch_manifest().await?;

    let project_name: Option<String> = args.project_name.clone().or_else(|| {
        local
            .get("name")
            .and_then(|v| v.as_str())
            .map(str::to_string)
    });

    let overrides =
        manifest::template_overrides(&template, &args.author, project_name.as_deref());

    install_template_deps(&template, &mut report).await;

    let merged = manifest::deep_merge(&local, &overrides);

    fs::create_dir_all(&args.directory)
        .await
        .with_context(|| format!("Failed to create {}", args.directory.display()))?;
    let out_root = match &args.output_path {
        Some(path) => {
            fs::create_dir_all(path)
                .await
                .with_context(|| format!("Failed to create {}", path.display()))?;
            path.clone()
        }
        None => args.directory.clone(),
    };

    let merged_path = out_root.join("package.json");
    match manifest::write_manifest(&merged_path, &merged).await {
        Ok(()) => println!("Wrote {}", merged_path.display()),
        Err(e) => report.warn(Warning::ManifestWrite {
            path: merged_path.clone(),
            message: format!("{:#}", e),
        }),
    }

    // Substitute the template's own name for ours in everything downloaded.
    let replacements = match (
        template.get("name").and_then(|v| v.as_str()),
        project_name.as_deref(),
    ) {
        (Some(from), Some(to)) if !from.is_empty() && !to.is_empty() => {
            Replacements::single(from, to)
        }
        _ => Replacements::new(),
    };

    let local_is_module = local.get("type").and_then(|v| v.as_str()) == Some("module");

    println!("{}", "Downloading template files...".cyan());
    for &file_name in TRACKED_FILES {
        let dest_name = destination_name(file_name, local_is_module);
        let dest = out_root.join(dest_name.as_ref());
        fetcher.download_file(file_name, &dest, &replacements).await?;
        println!("  {} {}", "->".blue(), dest_name);
        report.downloaded.push(dest_name.into_owned());
    }

    // Second pass over everything on disk: files written before the
    // replacement set was final, or never downloaded at all (README.md,
    // package-lock.json), still get the final substitution.
    println!("{}", "Re-applying substitutions...".cyan());
    for &file_name in SECOND_PASS_FILES {
        let path = out_root.join(file_name);
        if !fs::try_exists(&path).await.unwrap_or(false) {
            report.warn(Warning::MissingFile { path: path.clone() });
        }
        match edit_in_place(&path, &replacements).await {
            Ok(()) => println!("  {} {}", "->".blue(), file_name),
            Err(e) => report.warn(Warning::Edit {
                path,
                message: e.to_string(),
            }),
        }
    }

    Ok(report)
}

/// Install the template's declared dependency tables, dev table first.
/// Failures here never abort the run.
async fn install_template_deps(template: &Manifest, report: &mut RunReport) {
    let dev_deps = template.get("devDependencies").and_then(|v| v.as_object());
    let deps = template.get("dependencies").and_then(|v| v.as_object());
    if dev_deps.is_none() && deps.is_none() {
        return;
    }

    let runtime = check_npm();
    if !runtime.available {
        report.warn(Warning::NpmUnavailable);
        return;
    }
    println!(
        "Detected {} ({})",
        runtime.name,
        runtime.version.as_deref().unwrap_or("unknown")
    );

    if let Some(dev_deps) = dev_deps {
        let packages = npm::render_packages(dev_deps);
        if let Err(e) = npm::install(&packages, DepKind::Dev).await {
            report.warn(Warning::Install {
                kind: DepKind::Dev,
                message: format!("{:#}", e),
            });
        }
    }

    if let Some(deps) = deps {
        let packages = npm::render_packages(deps);
        if let Err(e) = npm::install(&packages, DepKind::Regular).await {
            report.warn(Warning::Install {
                kind: DepKind::Regular,
                message: format!("{:#}", e),
            });
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[derive(Clone)]
    struct TestConfig;

    impl ProductConfig for TestConfig {
        fn name(&self) -> &'static str {
            "watch-test"
        }
        fn display_name(&self) -> &'static str {
            "Watch Test"
        }
        fn default_template_url(&self) -> &'static str {
            "https://template.invalid/main"
        }
        fn template_url_env(&self) -> &'static str {
            "WATCH_TEST_TEMPLATE_URL"
        }
        fn default_author(&self) -> &'static str {
            "alice"
        }
    }

    #[tokio::test]
    async fn missing_local_manifest_is_fatal() {
        let dir = tempfile::tempdir().unwrap();
        let args = SyncArgs {
            directory: dir.path().to_path_buf(),
            uri: None,
            author: "alice".to_string(),
            project_name: None,
            output_path: None,
        };

        // Fails on the local manifest read, before any network activity.
        assert!(run(&TestConfig, args).await.is_err());
    }

    #[tokio::test]
    async fn unparseable_local_manifest_is_fatal() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(dir.path().join("package.json"), "{oops").unwrap();
        let args = SyncArgs {
            directory: dir.path().to_path_buf(),
            uri: None,
            author: "alice".to_string(),
            project_name: None,
            output_path: None,
        };

        assert!(run(&TestConfig, args).await.is_err());
    }
}
