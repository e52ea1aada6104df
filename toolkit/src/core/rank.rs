//! Bounded top-K extraction over records with a tolerant numeric key.

use std::cmp::Ordering;

use serde::Serialize;
use thiserror::Error;

use crate::core::coerce::coerce_key;
use crate::core::record::Record;

/// Errors raised before any ranking happens.
///
/// Per-record parse failures are never errors; they coerce to zero.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum RankError {
    #[error("key field '{field}' is missing from record {index}")]
    MissingField { field: String, index: usize },
}

/// One ranked record with its materialized key.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RankedEntry {
    /// 1-based position in the ranking.
    pub rank: usize,
    pub key: f64,
    pub record: Record,
}

/// Top records in descending key order, ties kept in input order.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RankedResult {
    pub entries: Vec<RankedEntry>,
    /// Number of records considered, before truncation to `k`.
    pub total: usize,
}

impl RankedResult {
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

/// Rank `records` by `key_field` descending and keep the first `k`.
///
/// Every record must carry `key_field`; the first record without it fails the
/// whole call with [`RankError::MissingField`]. Values that do not parse as a
/// finite number rank as zero. The sort is stable, so equal keys keep their
/// relative input order.
pub fn extract_top_k(
    records: Vec<Record>,
    key_field: &str,
    k: usize,
) -> Result<RankedResult, RankError> {
    let total = records.len();
    let mut keyed = Vec::with_capacity(total);
    for (index, record) in records.into_iter().enumerate() {
        let raw = record.get(key_field).ok_or_else(|| RankError::MissingField {
            field: key_field.to_string(),
            index,
        })?;
        keyed.push((coerce_key(raw), record));
    }

    // `sort_by` is stable; keys are finite so partial_cmp never yields None.
    keyed.sort_by(|(a, _), (b, _)| b.partial_cmp(a).unwrap_or(Ordering::Equal));
    keyed.truncate(k);

    let entries = keyed
        .into_iter()
        .enumerate()
        .map(|(position, (key, record))| RankedEntry {
            rank: position + 1,
            key,
            record,
        })
        .collect();

    Ok(RankedResult { entries, total })
}
