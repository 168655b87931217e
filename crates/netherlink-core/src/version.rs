//! Version-set parsing and normalization for launcher assets.
//!
//! Client payloads historically carried a single version string, then grew a
//! JSON-array form, and some tooling still submits the array *encoded as a
//! string*. All three shapes funnel through [`parse_version_input`], and the
//! resulting list is canonicalized with [`normalize_versions`].

use serde_json::Value;

/// The accepted shapes of a submitted version field.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum VersionInput {
    /// A plain version string, e.g. `"1.20.1"`.
    Single(String),
    /// A list of version strings.
    List(Vec<String>),
    /// Anything else (non-string array elements, numbers, objects, or a
    /// string that looks like a JSON array but does not parse as one).
    Invalid,
}

impl VersionInput {
    /// Convert into a raw version list, or `None` for invalid input.
    pub fn into_versions(self) -> Option<Vec<String>> {
        match self {
            Self::Single(v) => Some(vec![v]),
            Self::List(vs) => Some(vs),
            Self::Invalid => None,
        }
    }
}

/// Classify a JSON value as one of the accepted version shapes.
///
/// A string whose trimmed form starts with `[` is treated as a JSON-encoded
/// array and must parse as `Vec<String>`; any other string is a single
/// version. A JSON array must contain only strings.
pub fn parse_version_input(value: &Value) -> VersionInput {
    match value {
        Value::String(s) => {
            if s.trim_start().starts_with('[') {
                match serde_json::from_str::<Vec<String>>(s) {
                    Ok(list) => VersionInput::List(list),
                    Err(_) => VersionInput::Invalid,
                }
            } else {
                VersionInput::Single(s.clone())
            }
        }
        Value::Array(items) => {
            let mut list = Vec::with_capacity(items.len());
            for item in items {
                match item {
                    Value::String(s) => list.push(s.clone()),
                    _ => return VersionInput::Invalid,
                }
            }
            VersionInput::List(list)
        }
        _ => VersionInput::Invalid,
    }
}

/// Canonicalize a version list: trim each entry, drop empties, and remove
/// duplicates keeping the first occurrence. Order is otherwise preserved.
pub fn normalize_versions<I>(versions: I) -> Vec<String>
where
    I: IntoIterator<Item = String>,
{
    let mut seen = std::collections::HashSet::new();
    let mut result = Vec::new();
    for version in versions {
        let trimmed = version.trim();
        if trimmed.is_empty() {
            continue;
        }
        if seen.insert(trimmed.to_string()) {
            result.push(trimmed.to_string());
        }
    }
    result
}

#[cfg(test)]
#[allow(clippy::panic, clippy::expect_used, clippy::unwrap_used)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn plain_string_is_single() {
        let input = parse_version_input(&json!("1.20.1"));
        assert_eq!(input, VersionInput::Single("1.20.1".to_string()));
        assert_eq!(input.into_versions(), Some(vec!["1.20.1".to_string()]));
    }

    #[test]
    fn json_array_is_list() {
        let input = parse_version_input(&json!(["1.19.4", "1.20.1"]));
        assert_eq!(
            input.into_versions(),
            Some(vec!["1.19.4".to_string(), "1.20.1".to_string()])
        );
    }

    #[test]
    fn stringified_array_is_list() {
        let input = parse_version_input(&json!(r#"["1.19.4", "1.20.1"]"#));
        assert_eq!(
            input.into_versions(),
            Some(vec!["1.19.4".to_string(), "1.20.1".to_string()])
        );
    }

    #[test]
    fn malformed_stringified_array_is_invalid() {
        assert_eq!(parse_version_input(&json!(r#"["1.19.4""#)), VersionInput::Invalid);
        assert_eq!(parse_version_input(&json!("[1, 2]")), VersionInput::Invalid);
    }

    #[test]
    fn mixed_array_is_invalid() {
        assert_eq!(
            parse_version_input(&json!(["1.19.4", 5])),
            VersionInput::Invalid
        );
        assert_eq!(parse_version_input(&json!(42)), VersionInput::Invalid);
        assert_eq!(parse_version_input(&json!(null)), VersionInput::Invalid);
    }

    #[test]
    fn normalize_trims_dedups_and_keeps_order() {
        let versions = vec![
            "  1.20.1 ".to_string(),
            "1.19.4".to_string(),
            "1.20.1".to_string(),
            String::new(),
            "   ".to_string(),
            "1.18.2".to_string(),
        ];
        assert_eq!(
            normalize_versions(versions),
            vec!["1.20.1", "1.19.4", "1.18.2"]
        );
    }

    #[test]
    fn normalize_is_idempotent() {
        let once = normalize_versions(vec![
            " 1.20.1".to_string(),
            "1.20.1".to_string(),
            "1.19.4".to_string(),
        ]);
        let twice = normalize_versions(once.clone());
        assert_eq!(once, twice);
    }
}
