//! `toolkit top-fares`: rank a passenger table by fare and present the top rows.

use std::path::PathBuf;

use anyhow::{Context, Result, bail};
use serde::Serialize;
use tracing::{debug, info};

use crate::core::rank::{RankedEntry, RankedResult, extract_top_k};
use crate::io::config::TopFaresConfig;
use crate::io::table::load_table;

const RULE_WIDTH: usize = 100;
const NOT_AVAILABLE: &str = "N/A";

/// Inputs for one ranking run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TopFaresRequest {
    pub csv_path: PathBuf,
    pub key_field: String,
    pub limit: usize,
}

impl From<&TopFaresConfig> for TopFaresRequest {
    fn from(cfg: &TopFaresConfig) -> Self {
        Self {
            csv_path: cfg.csv_path.clone(),
            key_field: cfg.key_field.clone(),
            limit: cfg.limit,
        }
    }
}

/// Load the table, check its header names the key field, and rank it.
pub fn top_fares(request: &TopFaresRequest) -> Result<RankedResult> {
    if request.key_field.trim().is_empty() {
        bail!("key field must be non-empty");
    }
    let table = load_table(&request.csv_path)?;
    table
        .require_column(&request.key_field)
        .with_context(|| format!("check header of {}", request.csv_path.display()))?;
    let total = table.len();
    let result = extract_top_k(table.records, &request.key_field, request.limit)
        .context("rank records")?;
    info!(
        path = %request.csv_path.display(),
        key = %request.key_field,
        total,
        shown = result.len(),
        "ranked table"
    );
    Ok(result)
}

/// Survival flag recoded from the raw `"1"` / `"0"` column.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Survival {
    Survived,
    Died,
}

impl Survival {
    /// `"1"` means survived; anything else, including blank, means died.
    pub fn from_flag(raw: &str) -> Self {
        if raw.trim() == "1" {
            Self::Survived
        } else {
            Self::Died
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            Self::Survived => "Survived",
            Self::Died => "Died",
        }
    }
}

/// Display adapter over one ranked passenger record.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PassengerView<'a> {
    pub rank: usize,
    pub name: &'a str,
    pub survival: Survival,
    pub class: &'a str,
    pub sex: &'a str,
    pub age: Option<&'a str>,
    pub fare: f64,
    pub embarked: Option<&'a str>,
}

impl<'a> PassengerView<'a> {
    pub fn from_entry(entry: &'a RankedEntry) -> Self {
        let record = &entry.record;
        Self {
            rank: entry.rank,
            name: record.get("Name").unwrap_or_default(),
            survival: Survival::from_flag(record.get("Survived").unwrap_or_default()),
            class: record.get("Pclass").unwrap_or_default(),
            sex: record.get("Sex").unwrap_or_default(),
            age: record.non_empty("Age"),
            fare: entry.key,
            embarked: record.non_empty("Embarked"),
        }
    }

    pub fn age_display(&self) -> &str {
        self.age.unwrap_or(NOT_AVAILABLE)
    }

    pub fn embarked_display(&self) -> &str {
        self.embarked.unwrap_or(NOT_AVAILABLE)
    }
}

/// Render the ranked result as the human-readable terminal report.
///
/// Entries appear in exactly the ranked order.
pub fn render_report(result: &RankedResult, key_field: &str) -> String {
    let heavy = "=".repeat(RULE_WIDTH);
    let light = "-".repeat(RULE_WIDTH);
    let mut out = String::new();

    out.push_str(&format!("{heavy}\n"));
    out.push_str(&format!(
        "Top {} passengers by {}\n",
        result.len(),
        key_field.to_lowercase()
    ));
    out.push_str(&format!("{heavy}\n\n"));

    for entry in &result.entries {
        let view = PassengerView::from_entry(entry);
        out.push_str(&format!("Rank: {}\n", view.rank));
        out.push_str(&format!("  Name: {}\n", view.name));
        out.push_str(&format!("  Survival: {}\n", view.survival.label()));
        out.push_str(&format!("  Class: {}\n", view.class));
        out.push_str(&format!("  Sex: {}\n", view.sex));
        out.push_str(&format!("  Age: {}\n", view.age_display()));
        out.push_str(&format!("  {}: ${:.2}\n", key_field, view.fare));
        out.push_str(&format!("  Embarked: {}\n", view.embarked_display()));
        out.push_str(&format!("{light}\n"));
    }

    out.push_str(&format!(
        "\nShowing top {} of {} passengers.\n",
        result.len(),
        result.total
    ));
    out
}

#[derive(Serialize)]
struct JsonReport<'a> {
    key_field: &'a str,
    total: usize,
    passengers: Vec<PassengerView<'a>>,
}

/// Render the ranked result as pretty-printed JSON with a trailing newline.
pub fn render_json(result: &RankedResult, key_field: &str) -> Result<String> {
    let report = JsonReport {
        key_field,
        total: result.total,
        passengers: result.entries.iter().map(PassengerView::from_entry).collect(),
    };
    let mut payload = serde_json::to_string_pretty(&report).context("serialize report json")?;
    payload.push('\n');
    debug!(bytes = payload.len(), "rendered json report");
    Ok(payload)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::record::Record;
    use crate::test_support::{TestTree, passenger, passenger_csv};

    fn request(tree: &TestTree, limit: usize) -> TopFaresRequest {
        TopFaresRequest {
            csv_path: tree.path("train.csv"),
            key_field: "Fare".to_string(),
            limit,
        }
    }

    #[test]
    fn ranks_csv_rows_by_fare() {
        let tree = TestTree::new().expect("tree");
        let rows = vec![
            passenger(1, "A", "1", "30", "80", "S"),
            passenger(2, "B", "0", "", "", "C"),
            passenger(3, "C", "1", "45", "120.5", ""),
            passenger(4, "D", "0", "12", "80", "Q"),
        ];
        tree.write("train.csv", &passenger_csv(&rows)).expect("csv");

        let result = top_fares(&request(&tree, 3)).expect("rank");
        let names: Vec<&str> = result
            .entries
            .iter()
            .map(|entry| entry.record.get("Name").unwrap_or_default())
            .collect();
        assert_eq!(names, vec!["C", "A", "D"]);
        assert_eq!(result.total, 4);
    }

    #[test]
    fn missing_key_column_fails_before_ranking() {
        let tree = TestTree::new().expect("tree");
        tree.write("train.csv", "Name,Price\nA,1\n").expect("csv");
        let err = top_fares(&request(&tree, 10)).expect_err("missing column");
        assert!(format!("{err:#}").contains("required column 'Fare'"));
    }

    #[test]
    fn missing_file_is_reported() {
        let tree = TestTree::new().expect("tree");
        let err = top_fares(&request(&tree, 10)).expect_err("missing file");
        assert!(format!("{err:#}").contains("train.csv"));
    }

    #[test]
    fn survival_recodes_flag() {
        assert_eq!(Survival::from_flag("1"), Survival::Survived);
        assert_eq!(Survival::from_flag("0"), Survival::Died);
        assert_eq!(Survival::from_flag(""), Survival::Died);
    }

    #[test]
    fn view_shows_na_for_blank_optional_fields() {
        let entry = RankedEntry {
            rank: 1,
            key: 7.25,
            record: passenger(1, "Braund, Mr. Owen Harris", "0", "", "7.25", " "),
        };
        let view = PassengerView::from_entry(&entry);
        assert_eq!(view.age_display(), "N/A");
        assert_eq!(view.embarked_display(), "N/A");
        assert_eq!(view.survival, Survival::Died);
    }

    #[test]
    fn report_lists_entries_in_rank_order_with_total() {
        let result = RankedResult {
            entries: vec![
                RankedEntry {
                    rank: 1,
                    key: 512.3292,
                    record: passenger(259, "Ward, Miss. Anna", "1", "35", "512.3292", "C"),
                },
                RankedEntry {
                    rank: 2,
                    key: 263.0,
                    record: passenger(28, "Fortune, Mr. Charles Alexander", "0", "", "263", ""),
                },
            ],
            total: 891,
        };
        let report = render_report(&result, "Fare");
        assert!(report.starts_with(&"=".repeat(100)));
        assert!(report.contains("Top 2 passengers by fare"));
        assert!(report.contains("  Fare: $512.33\n"));
        assert!(report.contains("  Survival: Survived\n"));
        assert!(report.contains("  Age: N/A\n"));
        assert!(report.contains("  Embarked: N/A\n"));
        assert!(report.ends_with("Showing top 2 of 891 passengers.\n"));
        let first = report.find("Ward, Miss. Anna").expect("first");
        let second = report.find("Fortune, Mr. Charles Alexander").expect("second");
        assert!(first < second);
    }

    #[test]
    fn report_block_layout_is_exact() {
        let result = RankedResult {
            entries: vec![RankedEntry {
                rank: 1,
                key: 80.0,
                record: passenger(7, "A", "0", "30", "80", "S"),
            }],
            total: 1,
        };
        let heavy = "=".repeat(100);
        let light = "-".repeat(100);
        let block = concat!(
            "Rank: 1\n",
            "  Name: A\n",
            "  Survival: Died\n",
            "  Class: 1\n",
            "  Sex: female\n",
            "  Age: 30\n",
            "  Fare: $80.00\n",
            "  Embarked: S\n",
        );
        let expected = format!(
            "{heavy}\nTop 1 passengers by fare\n{heavy}\n\n{block}{light}\n\n\
             Showing top 1 of 1 passengers.\n"
        );
        assert_eq!(render_report(&result, "Fare"), expected);
    }

    #[test]
    fn short_csv_row_ranks_with_zero_fare() {
        let tree = TestTree::new().expect("tree");
        tree.write(
            "train.csv",
            "Name,Survived,Fare,Embarked\nA,1,80,S\nB,0,120\nC,1\n",
        )
        .expect("csv");

        let result = top_fares(&request(&tree, 10)).expect("rank");
        let ranked: Vec<(&str, f64)> = result
            .entries
            .iter()
            .map(|entry| (entry.record.get("Name").unwrap_or_default(), entry.key))
            .collect();
        assert_eq!(ranked, vec![("B", 120.0), ("A", 80.0), ("C", 0.0)]);
        let view = PassengerView::from_entry(&result.entries[0]);
        assert_eq!(view.embarked_display(), "N/A");
    }

    #[test]
    fn json_report_carries_views_and_total() {
        let result = RankedResult {
            entries: vec![RankedEntry {
                rank: 1,
                key: 80.0,
                record: Record::from_pairs([("Name", "A"), ("Fare", "80"), ("Survived", "1")]),
            }],
            total: 3,
        };
        let json = render_json(&result, "Fare").expect("json");
        let value: serde_json::Value = serde_json::from_str(&json).expect("parse");
        assert_eq!(value["total"], 3);
        assert_eq!(value["passengers"][0]["name"], "A");
        assert_eq!(value["passengers"][0]["survival"], "survived");
        assert_eq!(value["passengers"][0]["fare"], 80.0);
        assert!(value["passengers"][0]["age"].is_null());
    }
}
