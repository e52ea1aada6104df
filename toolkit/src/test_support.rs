//! Test-only helpers for building fixtures on disk and in memory.

use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use tempfile::TempDir;

use crate::core::record::Record;
use crate::core::rewrite::{RuleSet, default_rule_pairs};

/// Header of the passenger CSV the `top-fares` command ranks by default.
pub const PASSENGER_HEADER: [&str; 12] = [
    "PassengerId",
    "Survived",
    "Pclass",
    "Name",
    "Sex",
    "Age",
    "SibSp",
    "Parch",
    "Ticket",
    "Fare",
    "Cabin",
    "Embarked",
];

/// Compile the shipped import-suffix rules.
pub fn default_rule_set() -> RuleSet {
    let pairs = default_rule_pairs();
    RuleSet::compile(
        pairs
            .iter()
            .map(|(pattern, replacement)| (pattern.as_str(), replacement.as_str())),
    )
    .expect("default rules compile")
}

/// Write `(relative path, contents)` pairs under `root`, creating parents.
pub fn write_tree_files(root: &Path, files: &[(&str, &str)]) -> Result<()> {
    for (relative, contents) in files {
        let path = root.join(relative);
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)
                .with_context(|| format!("create fixture dir {}", parent.display()))?;
        }
        fs::write(&path, contents).with_context(|| format!("write fixture {}", path.display()))?;
    }
    Ok(())
}

/// A passenger record with every header column present.
///
/// Columns not covered by the arguments are filled with deterministic values.
pub fn passenger(
    id: u32,
    name: &str,
    survived: &str,
    age: &str,
    fare: &str,
    embarked: &str,
) -> Record {
    let id = id.to_string();
    let values = [
        id.as_str(),
        survived,
        "1",
        name,
        "female",
        age,
        "0",
        "0",
        "PC 17599",
        fare,
        "",
        embarked,
    ];
    Record::from_pairs(PASSENGER_HEADER.iter().copied().zip(values))
}

/// Render records as headered CSV using [`PASSENGER_HEADER`] column order.
pub fn passenger_csv(records: &[Record]) -> String {
    let mut writer = csv::Writer::from_writer(Vec::new());
    writer.write_record(PASSENGER_HEADER).expect("write header");
    for record in records {
        let row: Vec<&str> = PASSENGER_HEADER
            .iter()
            .map(|column| record.get(column).unwrap_or_default())
            .collect();
        writer.write_record(&row).expect("write row");
    }
    let bytes = writer.into_inner().expect("flush csv");
    String::from_utf8(bytes).expect("utf-8 csv")
}

/// Scratch directory that is removed on drop.
pub struct TestTree {
    dir: TempDir,
}

impl TestTree {
    pub fn new() -> Result<Self> {
        let dir = tempfile::tempdir().context("create tempdir")?;
        Ok(Self { dir })
    }

    pub fn root(&self) -> &Path {
        self.dir.path()
    }

    pub fn path(&self, relative: &str) -> PathBuf {
        self.dir.path().join(relative)
    }

    pub fn write(&self, relative: &str, contents: &str) -> Result<PathBuf> {
        write_tree_files(self.root(), &[(relative, contents)])?;
        Ok(self.path(relative))
    }

    pub fn read(&self, relative: &str) -> Result<String> {
        let path = self.path(relative);
        fs::read_to_string(&path).with_context(|| format!("read fixture {}", path.display()))
    }
}
