//! Per-column profiling.
//!
//! [`profile_columns()`] folds a slice of [`Row`]s into one [`ColumnProfile`]
//! per distinct column name, in first-seen order. A row that omits a key adds
//! nothing to that column, so `total` counts only the rows carrying the key.
//!
//! ```
//! use csv_profiler::infer::ColumnKind;
//! use csv_profiler::profile::{Row, profile_columns};
//!
//! let rows = vec![
//!     Row::from_iter([("a", "1"), ("b", "x")]),
//!     Row::from_iter([("a", ""), ("b", "y")]),
//! ];
//! let profiles = profile_columns(&rows);
//! assert_eq!(profiles[0].name, "a");
//! assert_eq!(profiles[0].missing, 1);
//! assert_eq!(profiles[0].inferred_type, ColumnKind::Number);
//! ```

use std::collections::{HashMap, HashSet};

use clap::ValueEnum;
use serde::{Deserialize, Serialize};

use crate::{
    error::ProfileError,
    infer::{ColumnKind, infer_type},
    missing::is_missing,
};

/// One input record: column names mapped to raw field values, in header order.
///
/// `None` marks a field the source did not supply at all (a short record).
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Row {
    fields: Vec<(String, Option<String>)>,
}

impl Row {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            fields: Vec::with_capacity(capacity),
        }
    }

    /// Wraps fields whose keys are already distinct, keeping their order.
    pub(crate) fn from_fields(fields: Vec<(String, Option<String>)>) -> Self {
        Self { fields }
    }

    /// Sets `key` to `value`. An existing key keeps its position and takes the new value.
    pub fn insert(&mut self, key: impl Into<String>, value: Option<String>) {
        let key = key.into();
        match self.fields.iter_mut().find(|(existing, _)| *existing == key) {
            Some((_, slot)) => *slot = value,
            None => self.fields.push((key, value)),
        }
    }

    /// `None` when the key is absent; `Some(None)` when present without a value.
    pub fn get(&self, key: &str) -> Option<Option<&str>> {
        self.fields
            .iter()
            .find(|(existing, _)| existing == key)
            .map(|(_, value)| value.as_deref())
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, Option<&str>)> {
        self.fields
            .iter()
            .map(|(key, value)| (key.as_str(), value.as_deref()))
    }

    pub fn len(&self) -> usize {
        self.fields.len()
    }

    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }
}

impl<K, V> FromIterator<(K, V)> for Row
where
    K: Into<String>,
    V: Into<String>,
{
    fn from_iter<T: IntoIterator<Item = (K, V)>>(iter: T) -> Self {
        let mut row = Row::new();
        for (key, value) in iter {
            row.insert(key, Some(value.into()));
        }
        row
    }
}

/// Statistics for one column.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ColumnProfile {
    pub name: String,
    pub inferred_type: ColumnKind,
    pub total: usize,
    pub missing: usize,
    pub unique: usize,
}

impl ColumnProfile {
    pub fn missing_pct(&self) -> f64 {
        if self.total == 0 {
            0.0
        } else {
            100.0 * self.missing as f64 / self.total as f64
        }
    }

    pub fn present(&self) -> usize {
        self.total - self.missing
    }

    pub fn to_record(&self) -> ColumnRecord {
        ColumnRecord {
            name: self.name.clone(),
            kind: self.inferred_type,
            total: self.total,
            missing: self.missing,
            missing_pct: self.missing_pct(),
            unique: self.unique,
        }
    }
}

/// Serialized form of a [`ColumnProfile`], with the derived `missing_pct` filled in.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ColumnRecord {
    pub name: String,
    #[serde(rename = "type")]
    pub kind: ColumnKind,
    pub total: usize,
    pub missing: usize,
    pub missing_pct: f64,
    pub unique: usize,
}

/// How callers treat an input with zero data rows.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, ValueEnum, Serialize, Deserialize)]
#[value(rename_all = "kebab-case")]
#[serde(rename_all = "kebab-case")]
pub enum EmptyInputPolicy {
    /// Profile anyway and emit a report with no columns.
    #[default]
    Allow,
    /// Refuse the input before profiling.
    Reject,
}

pub fn check_rows(
    input: &str,
    rows: &[Row],
    policy: EmptyInputPolicy,
) -> Result<(), ProfileError> {
    if rows.is_empty() && policy == EmptyInputPolicy::Reject {
        return Err(ProfileError::EmptyInput {
            input: input.to_string(),
        });
    }
    Ok(())
}

pub fn profile_columns(rows: &[Row]) -> Vec<ColumnProfile> {
    let mut accumulator = ProfileAccumulator::default();
    for row in rows {
        accumulator.ingest(row);
    }
    accumulator.finish()
}

#[derive(Default)]
struct ProfileAccumulator<'a> {
    columns: Vec<(&'a str, Vec<Option<&'a str>>)>,
    positions: HashMap<&'a str, usize>,
}

impl<'a> ProfileAccumulator<'a> {
    fn ingest(&mut self, row: &'a Row) {
        for (name, value) in row.iter() {
            let columns = &mut self.columns;
            let idx = *self.positions.entry(name).or_insert_with(|| {
                columns.push((name, Vec::new()));
                columns.len() - 1
            });
            self.columns[idx].1.push(value);
        }
    }

    fn finish(self) -> Vec<ColumnProfile> {
        self.columns
            .into_iter()
            .map(|(name, values)| summarize(name, &values))
            .collect()
    }
}

fn summarize(name: &str, values: &[Option<&str>]) -> ColumnProfile {
    let mut missing = 0usize;
    let mut distinct = HashSet::new();
    for &value in values {
        match value {
            Some(raw) if !is_missing(value) => {
                distinct.insert(raw);
            }
            _ => missing += 1,
        }
    }
    ColumnProfile {
        name: name.to_string(),
        inferred_type: infer_type(values.iter().copied()),
        total: values.len(),
        missing,
        unique: distinct.len(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    fn row(pairs: &[(&str, &str)]) -> Row {
        pairs.iter().copied().collect()
    }

    fn find<'a>(profiles: &'a [ColumnProfile], name: &str) -> &'a ColumnProfile {
        profiles
            .iter()
            .find(|p| p.name == name)
            .unwrap_or_else(|| panic!("profile for {name}"))
    }

    #[test]
    fn profiles_mixed_numeric_and_text_columns() {
        let rows = vec![
            row(&[("a", "1"), ("b", "x")]),
            row(&[("a", ""), ("b", "y")]),
            row(&[("a", "3"), ("b", "z")]),
        ];
        let profiles = profile_columns(&rows);

        let a = find(&profiles, "a");
        assert_eq!((a.total, a.missing, a.unique), (3, 1, 2));
        assert_eq!(a.inferred_type, ColumnKind::Number);
        assert!((a.missing_pct() - 33.333).abs() < 0.01);

        let b = find(&profiles, "b");
        assert_eq!((b.total, b.missing, b.unique), (3, 0, 3));
        assert_eq!(b.inferred_type, ColumnKind::Text);
    }

    #[test]
    fn all_placeholder_column_defaults_to_text() {
        let rows = vec![row(&[("a", "NA")]), row(&[("a", "n/a")]), row(&[("a", "null")])];
        let profiles = profile_columns(&rows);
        let a = find(&profiles, "a");
        assert_eq!((a.total, a.missing, a.unique), (3, 3, 0));
        assert_eq!(a.inferred_type, ColumnKind::Text);
        assert_eq!(a.missing_pct(), 100.0);
    }

    #[test]
    fn ragged_rows_count_only_carried_keys() {
        let rows = vec![row(&[("a", "1"), ("b", "2")]), row(&[("a", "3")])];
        let profiles = profile_columns(&rows);
        assert_eq!(find(&profiles, "a").total, 2);
        assert_eq!(find(&profiles, "b").total, 1);
    }

    #[test]
    fn absent_values_count_as_missing() {
        let mut short = Row::new();
        short.insert("a", Some("1".to_string()));
        short.insert("b", None);
        let profiles = profile_columns(&[short, row(&[("a", "2"), ("b", "ok")])]);
        let b = find(&profiles, "b");
        assert_eq!((b.total, b.missing, b.unique), (2, 1, 1));
    }

    #[test]
    fn keeps_first_seen_column_order() {
        let rows = vec![
            row(&[("zeta", "1"), ("alpha", "2")]),
            row(&[("mid", "3"), ("alpha", "4")]),
        ];
        let names: Vec<_> = profile_columns(&rows).into_iter().map(|p| p.name).collect();
        assert_eq!(names, vec!["zeta", "alpha", "mid"]);
    }

    #[test]
    fn unique_counts_raw_strings() {
        let rows = vec![row(&[("n", "1")]), row(&[("n", "1.0")]), row(&[("n", "1")])];
        let n = &profile_columns(&rows)[0];
        assert_eq!(n.unique, 2);
        assert_eq!(n.inferred_type, ColumnKind::Number);
    }

    #[test]
    fn no_rows_yield_no_profiles() {
        assert!(profile_columns(&[]).is_empty());
    }

    #[test]
    fn zero_total_profile_has_zero_missing_pct() {
        let profile = ColumnProfile {
            name: "empty".into(),
            inferred_type: ColumnKind::Text,
            total: 0,
            missing: 0,
            unique: 0,
        };
        assert_eq!(profile.missing_pct(), 0.0);
        assert_eq!(profile.to_record().missing_pct, 0.0);
    }

    #[test]
    fn record_exposes_derived_missing_pct() {
        let rows = vec![row(&[("a", "x")]), row(&[("a", "")]), row(&[("a", "")]), row(&[("a", "y")])];
        let record = profile_columns(&rows)[0].to_record();
        assert_eq!(record.missing_pct, 50.0);
        assert_eq!(record.kind, ColumnKind::Text);
    }

    #[test]
    fn reject_policy_refuses_empty_input() {
        assert!(check_rows("data.csv", &[], EmptyInputPolicy::Allow).is_ok());
        assert_eq!(
            check_rows("data.csv", &[], EmptyInputPolicy::Reject),
            Err(ProfileError::EmptyInput {
                input: "data.csv".to_string()
            })
        );
        assert!(check_rows("data.csv", &[row(&[("a", "1")])], EmptyInputPolicy::Reject).is_ok());
    }

    #[test]
    fn insert_replaces_existing_key_in_place() {
        let mut r = Row::new();
        r.insert("a", Some("1".into()));
        r.insert("b", Some("2".into()));
        r.insert("a", Some("3".into()));
        assert_eq!(r.len(), 2);
        assert_eq!(r.get("a"), Some(Some("3")));
        assert_eq!(r.iter().map(|(k, _)| k).collect::<Vec<_>>(), vec!["a", "b"]);
        assert_eq!(r.get("missing"), None);
    }

    fn cell() -> impl Strategy<Value = Option<String>> {
        prop_oneof![
            Just(None),
            Just(Some(String::new())),
            Just(Some("NA".to_string())),
            "-?[0-9]{1,4}(\\.[0-9]{1,2})?".prop_map(Some),
            "[a-z]{1,3}".prop_map(Some),
        ]
    }

    proptest! {
        #[test]
        fn counts_stay_within_bounds(
            raw_rows in proptest::collection::vec(
                proptest::collection::vec(("[a-d]", cell()), 0..5),
                0..30,
            )
        ) {
            let rows: Vec<Row> = raw_rows
                .into_iter()
                .map(|fields| {
                    let mut row = Row::new();
                    for (key, value) in fields {
                        row.insert(key, value);
                    }
                    row
                })
                .collect();
            for profile in profile_columns(&rows) {
                prop_assert!(profile.missing <= profile.total);
                prop_assert!(profile.unique <= profile.present());
                let carried = rows.iter().filter(|r| r.get(&profile.name).is_some()).count();
                prop_assert_eq!(profile.total, carried);
                let record = profile.to_record();
                let recomputed = if record.total == 0 {
                    0.0
                } else {
                    100.0 * record.missing as f64 / record.total as f64
                };
                prop_assert!((record.missing_pct - recomputed).abs() < 1e-9);
            }
        }
    }
}
