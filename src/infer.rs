//! Column type inference.
//!
//! A column is `number` only when every non-missing value parses as a float;
//! a single non-numeric value, or having no usable values at all, makes it
//! `text`. There is no majority vote and no finer numeric distinction.

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::missing::is_missing;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ColumnKind {
    Number,
    Text,
}

impl ColumnKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            ColumnKind::Number => "number",
            ColumnKind::Text => "text",
        }
    }
}

impl fmt::Display for ColumnKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Strict float grammar: optional sign, digits, optional fraction and exponent.
///
/// `inf` and `infinity` in any case also count. Surrounding whitespace is
/// ignored; grouping separators, currency symbols and percent signs are not
/// accepted.
pub fn is_numeric(value: &str) -> bool {
    value.trim().parse::<f64>().is_ok()
}

/// Infers the kind of a column from its raw values, missing ones included.
pub fn infer_type<'a, I>(values: I) -> ColumnKind
where
    I: IntoIterator<Item = Option<&'a str>>,
{
    let mut usable = 0usize;
    for value in values {
        if is_missing(value) {
            continue;
        }
        usable += 1;
        // Not missing implies present.
        if let Some(raw) = value
            && !is_numeric(raw)
        {
            return ColumnKind::Text;
        }
    }
    if usable == 0 {
        ColumnKind::Text
    } else {
        ColumnKind::Number
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    fn infer(values: &[Option<&str>]) -> ColumnKind {
        infer_type(values.iter().copied())
    }

    #[test]
    fn accepts_standard_float_spellings() {
        let spellings = [
            "1e10", "-0.5", "+3", "42", ".5", "5.", "1E-3", " 7 ", "inf", "-Infinity",
        ];
        for value in spellings {
            assert!(is_numeric(value), "expected {value:?} to parse");
        }
    }

    #[test]
    fn rejects_formatted_numbers() {
        for value in ["1,000", "$5", "5%", "1/2", "0x10", "one", "1 2", ""] {
            assert!(!is_numeric(value), "expected {value:?} to be rejected");
        }
    }

    #[test]
    fn all_numeric_column_is_number() {
        assert_eq!(infer(&[Some("1"), Some("2.5"), Some("-3e2")]), ColumnKind::Number);
    }

    #[test]
    fn one_text_value_disqualifies_the_column() {
        assert_eq!(
            infer(&[Some("1"), Some("2"), Some("3"), Some("three")]),
            ColumnKind::Text
        );
    }

    #[test]
    fn missing_values_are_ignored() {
        assert_eq!(
            infer(&[Some("1"), None, Some("NA"), Some(" "), Some("4")]),
            ColumnKind::Number
        );
    }

    #[test]
    fn columns_without_usable_values_are_text() {
        assert_eq!(infer(&[]), ColumnKind::Text);
        assert_eq!(infer(&[None, Some("null"), Some("N/A")]), ColumnKind::Text);
    }

    proptest! {
        #[test]
        fn a_non_numeric_value_always_yields_text(
            numbers in proptest::collection::vec(-1.0e6f64..1.0e6, 0..20),
            word in "[a-zA-Z]{2,8}".prop_filter("not a placeholder or float keyword", |w| {
                !is_missing(Some(w.as_str())) && w.parse::<f64>().is_err()
            }),
            position in 0usize..20,
        ) {
            let mut values: Vec<String> = numbers.iter().map(|n| n.to_string()).collect();
            let at = position.min(values.len());
            values.insert(at, word);
            prop_assert_eq!(
                infer_type(values.iter().map(|v| Some(v.as_str()))),
                ColumnKind::Text
            );
        }

        #[test]
        fn numbers_mixed_with_missing_yield_number(
            numbers in proptest::collection::vec(-1.0e6f64..1.0e6, 1..20),
            gaps in proptest::collection::vec(prop_oneof![Just(""), Just("NA"), Just("null")], 1..5),
        ) {
            let mut values: Vec<Option<String>> =
                numbers.iter().map(|n| Some(n.to_string())).collect();
            values.extend(gaps.iter().map(|g| Some(g.to_string())));
            values.push(None);
            prop_assert_eq!(
                infer_type(values.iter().map(|v| v.as_deref())),
                ColumnKind::Number
            );
        }
    }
}
