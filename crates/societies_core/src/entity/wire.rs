//! `key=value` text format exchanged with a remote synchronization peer.
//!
//! # Invariants
//! - One line per field, terminated by `\n`, keys are canonical column names.
//! - Unset values are written as an empty value (`key=`).
//! - Values are not escaped; callers keep them flat (no `\n`).

use super::row::{RowResult, RowShapeError, ValueMap};
use rusqlite::types::Value;

/// Renders `(key, value)` pairs in the given order.
pub fn write_fields(fields: &[(&str, Option<&str>)]) -> String {
    let mut out = String::new();
    for (key, value) in fields {
        out.push_str(key);
        out.push('=');
        out.push_str(value.unwrap_or_default());
        out.push('\n');
    }
    out
}

/// Parses a serialized block into a field map of text values.
///
/// Blank lines are ignored. Only the first `=` separates key from value.
pub fn parse_fields(text: &str) -> RowResult<ValueMap> {
    let mut fields = ValueMap::new();
    for line in text.lines() {
        let line = line.trim_end_matches('\r');
        if line.trim().is_empty() {
            continue;
        }
        let (key, value) = line
            .split_once('=')
            .ok_or_else(|| RowShapeError::MalformedLine(line.to_string()))?;
        let key = key.trim();
        if key.is_empty() {
            return Err(RowShapeError::MalformedLine(line.to_string()));
        }
        fields.put(key, Value::Text(value.to_string()));
    }
    Ok(fields)
}

#[cfg(test)]
mod tests {
    use super::{parse_fields, write_fields};
    use crate::entity::row::RowShapeError;
    use rusqlite::types::Value;

    #[test]
    fn writes_one_line_per_field_in_order() {
        let text = write_fields(&[("global_id", Some("c1")), ("name", None)]);
        assert_eq!(text, "global_id=c1\nname=\n");
    }

    #[test]
    fn parse_keeps_equals_signs_inside_values() {
        let fields = parse_fields("url=http://a/b?x=1\n\nname=n\n").unwrap();
        assert_eq!(
            fields.get("url"),
            Some(&Value::Text("http://a/b?x=1".to_string()))
        );
        assert_eq!(fields.len(), 2);
    }

    #[test]
    fn parse_rejects_lines_without_separator() {
        let err = parse_fields("global_id=c1\nbroken line\n").unwrap_err();
        assert_eq!(err, RowShapeError::MalformedLine("broken line".to_string()));
    }
}
