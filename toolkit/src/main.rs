//! Batch utilities for the passenger dataset and the UI component tree.
//!
//! `top-fares` ranks a CSV table by fare and prints the top rows.
//! `fix-imports` strips `@<version>` suffixes from package imports in place.
//! Both read `toolkit.toml` when present and fall back to built-in defaults.

use std::path::{Path, PathBuf};

use anyhow::{Context, Result, bail};
use clap::{Parser, Subcommand, ValueEnum};
use tracing::debug;

use toolkit::exit_codes;
use toolkit::fix_imports::{fix_imports, render_failures, render_summary};
use toolkit::io::config::{DEFAULT_CONFIG_FILE, ToolkitConfig, load_config, write_config};
use toolkit::io::file_tree::WriteMode;
use toolkit::logging;
use toolkit::top_fares::{TopFaresRequest, render_json, render_report, top_fares};

#[derive(Parser)]
#[command(
    name = "toolkit",
    version,
    about = "Fare ranking and import-suffix rewriting utilities"
)]
struct Cli {
    /// Configuration file; relative paths inside it resolve against its directory.
    #[arg(long, global = true, default_value = DEFAULT_CONFIG_FILE)]
    config: PathBuf,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Print the passengers with the highest fares.
    TopFares {
        /// CSV file to rank (overrides `top_fares.csv_path`).
        #[arg(long)]
        csv: Option<PathBuf>,
        /// Column to rank by (overrides `top_fares.key_field`).
        #[arg(long)]
        key: Option<String>,
        /// Number of rows to show (overrides `top_fares.limit`).
        #[arg(long)]
        limit: Option<usize>,
        #[arg(long, value_enum, default_value_t = OutputFormat::Text)]
        format: OutputFormat,
    },
    /// Strip version suffixes from package imports under a directory.
    FixImports {
        /// Directory to rewrite (overrides `fix_imports.root`).
        #[arg(long)]
        root: Option<PathBuf>,
        /// Report what would change without writing.
        #[arg(long)]
        dry_run: bool,
    },
    /// Write the default configuration to the `--config` path.
    InitConfig {
        /// Overwrite an existing file.
        #[arg(short, long)]
        force: bool,
    },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
enum OutputFormat {
    Text,
    Json,
}

fn main() {
    logging::init();
    let code = match run() {
        Ok(code) => code,
        Err(err) => {
            eprintln!("{:#}", err);
            exit_codes::INVALID
        }
    };
    std::process::exit(code);
}

fn run() -> Result<i32> {
    let cli = Cli::parse();
    match cli.command {
        Command::TopFares {
            csv,
            key,
            limit,
            format,
        } => cmd_top_fares(&cli.config, csv, key, limit, format),
        Command::FixImports { root, dry_run } => cmd_fix_imports(&cli.config, root, dry_run),
        Command::InitConfig { force } => cmd_init_config(&cli.config, force),
    }
}

fn cmd_top_fares(
    config_path: &Path,
    csv: Option<PathBuf>,
    key: Option<String>,
    limit: Option<usize>,
    format: OutputFormat,
) -> Result<i32> {
    let cfg = load_config(config_path).context("load config")?;
    let mut request = TopFaresRequest::from(&cfg.top_fares);
    if let Some(csv) = csv {
        request.csv_path = csv;
    }
    if let Some(key) = key {
        request.key_field = key;
    }
    if let Some(limit) = limit {
        request.limit = limit;
    }
    debug!(?request, "top-fares request");

    let result = top_fares(&request)?;
    let output = match format {
        OutputFormat::Text => render_report(&result, &request.key_field),
        OutputFormat::Json => render_json(&result, &request.key_field)?,
    };
    print!("{output}");
    Ok(exit_codes::OK)
}

fn cmd_fix_imports(config_path: &Path, root: Option<PathBuf>, dry_run: bool) -> Result<i32> {
    let mut cfg = load_config(config_path).context("load config")?.fix_imports;
    if let Some(root) = root {
        cfg.root = root;
    }
    let mode = if dry_run {
        WriteMode::DryRun
    } else {
        WriteMode::Apply
    };

    let report = fix_imports(&cfg, mode)?;
    print!("{}", render_summary(&report, mode));
    for line in render_failures(&report) {
        eprintln!("{line}");
    }
    if report.failed_count() > 0 {
        return Ok(exit_codes::PARTIAL);
    }
    Ok(exit_codes::OK)
}

fn cmd_init_config(config_path: &Path, force: bool) -> Result<i32> {
    if config_path.exists() && !force {
        bail!(
            "{} already exists (use --force to overwrite)",
            config_path.display()
        );
    }
    write_config(config_path, &ToolkitConfig::default())
        .with_context(|| format!("write {}", config_path.display()))?;
    println!("{}", config_path.display());
    Ok(exit_codes::OK)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parse_top_fares_defaults() {
        let cli = Cli::parse_from(["toolkit", "top-fares"]);
        assert_eq!(cli.config, PathBuf::from(DEFAULT_CONFIG_FILE));
        assert!(matches!(
            cli.command,
            Command::TopFares {
                csv: None,
                key: None,
                limit: None,
                format: OutputFormat::Text,
            }
        ));
    }

    #[test]
    fn parse_top_fares_overrides() {
        let cli = Cli::parse_from([
            "toolkit",
            "top-fares",
            "--csv",
            "data.csv",
            "--limit",
            "3",
            "--format",
            "json",
        ]);
        match cli.command {
            Command::TopFares {
                csv, limit, format, ..
            } => {
                assert_eq!(csv, Some(PathBuf::from("data.csv")));
                assert_eq!(limit, Some(3));
                assert_eq!(format, OutputFormat::Json);
            }
            _ => panic!("expected top-fares"),
        }
    }

    #[test]
    fn parse_fix_imports_with_global_config() {
        let cli = Cli::parse_from([
            "toolkit",
            "fix-imports",
            "--dry-run",
            "--config",
            "alt.toml",
        ]);
        assert_eq!(cli.config, PathBuf::from("alt.toml"));
        assert!(matches!(
            cli.command,
            Command::FixImports {
                root: None,
                dry_run: true
            }
        ));
    }

    #[test]
    fn parse_init_config_force() {
        let cli = Cli::parse_from(["toolkit", "init-config", "--force"]);
        assert!(matches!(cli.command, Command::InitConfig { force: true }));
    }
}
