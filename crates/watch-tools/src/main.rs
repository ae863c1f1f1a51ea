//! Watch CLI - sync a project with its remote template repository

use anyhow::Result;
use clap::Parser;
use colored::Colorize;
use std::path::PathBuf;
use watch_core::{ProductConfig, SyncArgs};

/// Watch product configuration
#[derive(Clone)]
pub struct WatchConfig;

impl ProductConfig for WatchConfig {
    fn name(&self) -> &'static str {
        "watch"
    }

    fn display_name(&self) -> &'static str {
        "Watch"
    }

    fn default_template_url(&self) -> &'static str {
        "https://raw.githubusercontent.com/carlba/typescript-template/main"
    }

    fn template_url_env(&self) -> &'static str {
        "WATCH_TEMPLATE_URL"
    }

    fn default_author(&self) -> &'static str {
        "carlba"
    }
}

#[derive(Parser, Debug)]
#[command(name = "watch")]
#[command(about = "Sync a project with its remote template repository")]
#[command(version)]
pub struct Args {
    /// Project directory to sync
    #[arg(default_value = ".")]
    pub directory: PathBuf,

    /// The URI to fetch the template from
    #[arg(short, long)]
    pub uri: Option<String>,

    /// The author of the repo
    #[arg(short, long)]
    pub author: Option<String>,

    /// The name of the project (defaults to the local manifest's name)
    #[arg(short, long = "project-name")]
    pub project_name: Option<String>,
}

#[tokio::main]
async fn main() -> Result<()> {
    let args = Args::parse();
    let config = WatchConfig;

    println!("{}", config.display_name().cyan().bold());

    let sync_args = SyncArgs {
        directory: args.directory,
        uri: args.uri,
        author: args
            .author
            .unwrap_or_else(|| config.default_author().to_string()),
        project_name: args.project_name,
        output_path: None,
    };

    let report = watch_core::run(&config, sync_args).await?;

    println!();
    if report.has_warnings() {
        println!(
            "{} {} file(s) synced, {} warning(s)",
            "Done.".yellow().bold(),
            report.downloaded.len(),
            report.warnings.len()
        );
        for warning in &report.warnings {
            println!("  {} {}", "-".yellow(), warning);
        }
    } else {
        println!(
            "{} {} file(s) synced",
            "Done.".green().bold(),
            report.downloaded.len()
        );
    }

    Ok(())
}
