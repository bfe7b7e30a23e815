//! Missing-value detection.
//!
//! A field is missing when it is absent, or when its trimmed, case-folded text
//! is one of the recognised placeholder tokens. No other normalization applies.

const MISSING_TOKENS: &[&str] = &["", "na", "n/a", "null", "none", "nan"];

/// Returns `true` when `value` should be counted as missing.
pub fn is_missing(value: Option<&str>) -> bool {
    match value {
        None => true,
        Some(raw) => is_placeholder(raw),
    }
}

fn is_placeholder(raw: &str) -> bool {
    let folded = raw.trim().to_lowercase();
    MISSING_TOKENS.contains(&folded.as_str())
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn absent_value_is_missing() {
        assert!(is_missing(None));
    }

    #[test]
    fn recognises_placeholder_tokens_regardless_of_case_and_padding() {
        for token in ["", "   ", "NA", "na", " N/A ", "Null", "NONE", "NaN", "\tnan\n"] {
            assert!(is_missing(Some(token)), "expected {token:?} to be missing");
        }
    }

    #[test]
    fn near_misses_are_present() {
        for token in ["n.a.", "-", "0", "nil", "missing", "unknown", "#N/A", "nan1"] {
            assert!(!is_missing(Some(token)), "expected {token:?} to be present");
        }
    }

    proptest! {
        #[test]
        fn insensitive_to_case_and_surrounding_whitespace(
            core in "(na|NA|N/a|n/A|Null|NONE|nan|NaN|[a-zA-Z0-9./ ]{0,6})",
            left in "[ \t]{0,3}",
            right in "[ \t]{0,3}",
        ) {
            let padded = format!("{left}{core}{right}");
            let normalized = padded.trim().to_lowercase();
            prop_assert_eq!(
                is_missing(Some(padded.as_str())),
                is_missing(Some(normalized.as_str()))
            );
        }
    }
}
