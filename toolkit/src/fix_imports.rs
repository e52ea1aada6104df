//! `toolkit fix-imports`: strip `@<version>` suffixes from package imports.

use std::path::Path;

use anyhow::{Context, Result};
use tracing::info;

use crate::io::config::FixImportsConfig;
use crate::io::file_tree::{
    FileStatus, RewriteReport, WriteMode, extension_filter, rewrite_tree,
};

/// Rewrite every eligible file under `cfg.root` with the configured rules.
pub fn fix_imports(cfg: &FixImportsConfig, mode: WriteMode) -> Result<RewriteReport> {
    let rules = cfg.rule_set()?;
    let report = rewrite_tree(&cfg.root, &rules, extension_filter(&cfg.extensions), mode)
        .with_context(|| format!("rewrite imports under {}", cfg.root.display()))?;
    info!(
        root = %cfg.root.display(),
        rules = rules.len(),
        visited = report.outcomes.len(),
        changed = report.changed_count(),
        failed = report.failed_count(),
        dry_run = mode == WriteMode::DryRun,
        "fix-imports finished"
    );
    Ok(report)
}

/// Stdout summary: one line per changed file, then the changed count.
pub fn render_summary(report: &RewriteReport, mode: WriteMode) -> String {
    let verb = match mode {
        WriteMode::Apply => "Fixed",
        WriteMode::DryRun => "Would fix",
    };
    let mut out = String::from("Fixing import paths...\n\n");
    for outcome in report.changed() {
        out.push_str(&format!("{verb}: {}\n", display_name(&outcome.path)));
    }
    out.push_str(&format!("\n{verb} {} files.\n", report.changed_count()));
    out
}

/// Stderr lines for files that could not be processed.
pub fn render_failures(report: &RewriteReport) -> Vec<String> {
    report
        .failures()
        .filter_map(|outcome| match &outcome.status {
            FileStatus::Failed { reason } => {
                Some(format!("Failed: {}: {}", outcome.path.display(), reason))
            }
            _ => None,
        })
        .collect()
}

fn display_name(path: &Path) -> String {
    path.file_name()
        .map(|name| name.to_string_lossy().into_owned())
        .unwrap_or_else(|| path.display().to_string())
}
