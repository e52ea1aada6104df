//! Directory traversal with conditional write-back.
//!
//! Each file goes through two stages. [`plan_file`] reads it and computes the
//! new content without touching storage; [`FilePlan::apply`] writes back only
//! when the content changed. [`rewrite_tree`] runs both stages one file at a
//! time, so at most one file's content is held in memory. [`plan_tree`]
//! collects the plans for a whole tree without writing anything. Per-file read
//! and write errors become [`FileStatus::Failed`] outcomes; traversal always
//! continues.

use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{Result, bail};
use serde::Serialize;
use tracing::{debug, warn};
use walkdir::{DirEntry, WalkDir};

use crate::core::rewrite::{RuleSet, plan_content};

/// Whether changed files are written back.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WriteMode {
    Apply,
    DryRun,
}

/// Per-file result of a rewrite pass.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum FileStatus {
    /// Content differed after applying the rules (and was written, unless dry run).
    Changed,
    Unchanged,
    Failed { reason: String },
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FileRewriteOutcome {
    pub path: PathBuf,
    #[serde(flatten)]
    pub status: FileStatus,
}

impl FileRewriteOutcome {
    pub fn changed(&self) -> bool {
        self.status == FileStatus::Changed
    }

    pub fn failed(&self) -> bool {
        matches!(self.status, FileStatus::Failed { .. })
    }
}

/// All outcomes of one pass, in traversal order.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct RewriteReport {
    pub outcomes: Vec<FileRewriteOutcome>,
}

impl RewriteReport {
    pub fn changed_count(&self) -> usize {
        self.outcomes.iter().filter(|outcome| outcome.changed()).count()
    }

    pub fn failed_count(&self) -> usize {
        self.outcomes.iter().filter(|outcome| outcome.failed()).count()
    }

    pub fn changed(&self) -> impl Iterator<Item = &FileRewriteOutcome> {
        self.outcomes.iter().filter(|outcome| outcome.changed())
    }

    pub fn failures(&self) -> impl Iterator<Item = &FileRewriteOutcome> {
        self.outcomes.iter().filter(|outcome| outcome.failed())
    }
}

/// Planned action for one file.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PlanAction {
    Write { content: String },
    Keep,
    Fail { reason: String },
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FilePlan {
    pub path: PathBuf,
    pub action: PlanAction,
}

impl FilePlan {
    /// Perform the planned write and report what happened.
    ///
    /// `DryRun` reports the planned status without writing.
    pub fn apply(self, mode: WriteMode) -> FileRewriteOutcome {
        let status = match self.action {
            PlanAction::Keep => FileStatus::Unchanged,
            PlanAction::Fail { reason } => FileStatus::Failed { reason },
            PlanAction::Write { .. } if mode == WriteMode::DryRun => FileStatus::Changed,
            PlanAction::Write { content } => match fs::write(&self.path, content) {
                Ok(()) => FileStatus::Changed,
                Err(err) => {
                    warn!(path = %self.path.display(), error = %err, "write failed");
                    FileStatus::Failed {
                        reason: format!("write: {err}"),
                    }
                }
            },
        };
        FileRewriteOutcome {
            path: self.path,
            status,
        }
    }
}

/// Build a filter accepting files whose extension is in `extensions`.
///
/// Matching is case-sensitive; `foo.d.ts` has extension `ts`.
pub fn extension_filter(extensions: &[String]) -> impl Fn(&Path) -> bool + '_ {
    move |path: &Path| {
        path.extension()
            .and_then(|ext| ext.to_str())
            .is_some_and(|ext| extensions.iter().any(|allowed| allowed == ext))
    }
}

/// Walk `root` and plan a rewrite for every file accepted by `filter`.
///
/// Entries are visited in file-name order, so plans come back in a stable
/// path order. Symlinked directories are not descended into; a symlink to a
/// file is planned like the file itself, and a dangling one fails its read.
/// Fails only when `root` itself is not a directory.
pub fn plan_tree<F>(root: &Path, rules: &RuleSet, filter: F) -> Result<Vec<FilePlan>>
where
    F: Fn(&Path) -> bool,
{
    ensure_root(root)?;
    Ok(tree_plans(root, rules, filter).collect())
}

/// Lazily plan each eligible file under `root`, in file-name order.
fn tree_plans<'a, F>(
    root: &'a Path,
    rules: &'a RuleSet,
    filter: F,
) -> impl Iterator<Item = FilePlan> + 'a
where
    F: Fn(&Path) -> bool + 'a,
{
    WalkDir::new(root)
        .sort_by_file_name()
        .into_iter()
        .filter_map(move |entry| match entry {
            Ok(entry) if is_eligible(&entry, &filter) => Some(plan_file(entry.path(), rules)),
            Ok(_) => None,
            Err(err) => {
                let path = err
                    .path()
                    .map(Path::to_path_buf)
                    .unwrap_or_else(|| root.to_path_buf());
                warn!(path = %path.display(), error = %err, "walk failed");
                Some(FilePlan {
                    path,
                    action: PlanAction::Fail {
                        reason: format!("walk: {err}"),
                    },
                })
            }
        })
}

fn is_eligible<F>(entry: &DirEntry, filter: &F) -> bool
where
    F: Fn(&Path) -> bool,
{
    let is_file = if entry.path_is_symlink() {
        !entry.path().is_dir()
    } else {
        entry.file_type().is_file()
    };
    is_file && filter(entry.path())
}

/// Read one file and decide whether it needs rewriting.
pub fn plan_file(path: &Path, rules: &RuleSet) -> FilePlan {
    let original = match fs::read_to_string(path) {
        Ok(contents) => contents,
        Err(err) => {
            warn!(path = %path.display(), error = %err, "read failed");
            return FilePlan {
                path: path.to_path_buf(),
                action: PlanAction::Fail {
                    reason: format!("read: {err}"),
                },
            };
        }
    };
    let plan = plan_content(&original, rules);
    debug!(
        path = %path.display(),
        matches = ?plan.rule_matches,
        changed = plan.changed(),
        "planned file"
    );
    let action = match plan.new_content {
        Some(content) => PlanAction::Write { content },
        None => PlanAction::Keep,
    };
    FilePlan {
        path: path.to_path_buf(),
        action,
    }
}

/// Apply every plan in order.
pub fn apply_plans(plans: Vec<FilePlan>, mode: WriteMode) -> RewriteReport {
    let outcomes = plans.into_iter().map(|plan| plan.apply(mode)).collect();
    RewriteReport { outcomes }
}

/// Plan and apply `rules` over every file under `root` accepted by `filter`.
///
/// Each file is written back before the next one is read.
pub fn rewrite_tree<F>(
    root: &Path,
    rules: &RuleSet,
    filter: F,
    mode: WriteMode,
) -> Result<RewriteReport>
where
    F: Fn(&Path) -> bool,
{
    ensure_root(root)?;
    let outcomes = tree_plans(root, rules, filter)
        .map(|plan| plan.apply(mode))
        .collect();
    let report = RewriteReport { outcomes };
    debug!(
        root = %root.display(),
        visited = report.outcomes.len(),
        changed = report.changed_count(),
        failed = report.failed_count(),
        "rewrite pass finished"
    );
    Ok(report)
}

fn ensure_root(root: &Path) -> Result<()> {
    if !root.exists() {
        bail!("missing directory {}", root.display());
    }
    if !root.is_dir() {
        bail!("expected directory {}", root.display());
    }
    Ok(())
}
