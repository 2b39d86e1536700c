//! Field value types used by filters and sorts

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::cmp::Ordering;

/// A polymorphic field value that can hold different types
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(untagged)]
pub enum FieldValue {
    String(String),
    Integer(i64),
    Float(f64),
    Boolean(bool),
    DateTime(DateTime<Utc>),
    Null,
}

impl FieldValue {
    /// Get the value as a string if possible
    pub fn as_string(&self) -> Option<&str> {
        match self {
            FieldValue::String(s) => Some(s),
            _ => None,
        }
    }

    /// Get the value as an integer if possible
    pub fn as_integer(&self) -> Option<i64> {
        match self {
            FieldValue::Integer(i) => Some(*i),
            _ => None,
        }
    }

    /// Get the value as a float, widening integers
    pub fn as_f64(&self) -> Option<f64> {
        match self {
            FieldValue::Integer(i) => Some(*i as f64),
            FieldValue::Float(f) => Some(*f),
            _ => None,
        }
    }

    /// Check if the value is null
    pub fn is_null(&self) -> bool {
        matches!(self, FieldValue::Null)
    }

    /// Lowercased text used by the text filter
    ///
    /// Returns `None` for `Null`, which never matches a search term.
    pub fn search_text(&self) -> Option<String> {
        match self {
            FieldValue::String(s) => Some(s.to_lowercase()),
            FieldValue::Integer(i) => Some(i.to_string()),
            FieldValue::Float(f) => Some(f.to_string()),
            FieldValue::Boolean(b) => Some(b.to_string()),
            FieldValue::DateTime(dt) => Some(dt.to_rfc3339().to_lowercase()),
            FieldValue::Null => None,
        }
    }

    /// Text used for exact-match categorical filtering
    pub fn match_text(&self) -> Option<String> {
        match self {
            FieldValue::String(s) => Some(s.clone()),
            FieldValue::Null => None,
            other => other.search_text(),
        }
    }

    /// Total ordering across all variants
    ///
    /// Values of different kinds order by kind: `Null < Boolean < numbers <
    /// DateTime < String`. Integers and floats compare numerically with each
    /// other; strings compare case-sensitively.
    pub fn compare(&self, other: &FieldValue) -> Ordering {
        match (self, other) {
            (FieldValue::String(a), FieldValue::String(b)) => a.cmp(b),
            (FieldValue::Integer(a), FieldValue::Integer(b)) => a.cmp(b),
            (FieldValue::Boolean(a), FieldValue::Boolean(b)) => a.cmp(b),
            (FieldValue::DateTime(a), FieldValue::DateTime(b)) => a.cmp(b),
            (FieldValue::Null, FieldValue::Null) => Ordering::Equal,
            (a, b) if a.rank() == 2 && b.rank() == 2 => {
                // Integer/Float mix, or Float/Float
                let (x, y) = (a.as_f64().unwrap_or_default(), b.as_f64().unwrap_or_default());
                x.total_cmp(&y)
            }
            (a, b) => a.rank().cmp(&b.rank()),
        }
    }

    fn rank(&self) -> u8 {
        match self {
            FieldValue::Null => 0,
            FieldValue::Boolean(_) => 1,
            FieldValue::Integer(_) | FieldValue::Float(_) => 2,
            FieldValue::DateTime(_) => 3,
            FieldValue::String(_) => 4,
        }
    }
}

impl From<&str> for FieldValue {
    fn from(value: &str) -> Self {
        FieldValue::String(value.to_string())
    }
}

impl From<String> for FieldValue {
    fn from(value: String) -> Self {
        FieldValue::String(value)
    }
}

impl From<i64> for FieldValue {
    fn from(value: i64) -> Self {
        FieldValue::Integer(value)
    }
}

impl From<f64> for FieldValue {
    fn from(value: f64) -> Self {
        FieldValue::Float(value)
    }
}

impl From<bool> for FieldValue {
    fn from(value: bool) -> Self {
        FieldValue::Boolean(value)
    }
}

impl From<DateTime<Utc>> for FieldValue {
    fn from(value: DateTime<Utc>) -> Self {
        FieldValue::DateTime(value)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_field_value_string() {
        let value = FieldValue::String("test".to_string());
        assert_eq!(value.as_string(), Some("test"));
        assert_eq!(value.as_integer(), None);
        assert!(!value.is_null());
    }

    #[test]
    fn test_field_value_integer() {
        let value = FieldValue::Integer(42);
        assert_eq!(value.as_integer(), Some(42));
        assert_eq!(value.as_f64(), Some(42.0));
        assert_eq!(value.as_string(), None);
    }

    #[test]
    fn test_field_value_null() {
        let value = FieldValue::Null;
        assert!(value.is_null());
        assert_eq!(value.search_text(), None);
        assert_eq!(value.match_text(), None);
    }

    #[test]
    fn test_search_text_is_lowercase() {
        let value = FieldValue::from("Summer Dress");
        assert_eq!(value.search_text().as_deref(), Some("summer dress"));
    }

    #[test]
    fn test_match_text_keeps_case() {
        let value = FieldValue::from("Men");
        assert_eq!(value.match_text().as_deref(), Some("Men"));
    }

    // --- ordering ---

    #[test]
    fn test_numbers_compare_numerically() {
        assert_eq!(
            FieldValue::Integer(9).compare(&FieldValue::Integer(10)),
            Ordering::Less
        );
        assert_eq!(
            FieldValue::Float(9.5).compare(&FieldValue::Integer(10)),
            Ordering::Less
        );
        assert_eq!(
            FieldValue::Integer(10).compare(&FieldValue::Float(10.0)),
            Ordering::Equal
        );
    }

    #[test]
    fn test_strings_compare_case_sensitively() {
        // Uppercase sorts before lowercase in native ordering
        assert_eq!(
            FieldValue::from("Zebra").compare(&FieldValue::from("apple")),
            Ordering::Less
        );
        assert_eq!(
            FieldValue::from("apple").compare(&FieldValue::from("banana")),
            Ordering::Less
        );
    }

    #[test]
    fn test_mixed_kinds_order_by_rank() {
        assert_eq!(
            FieldValue::Null.compare(&FieldValue::Integer(0)),
            Ordering::Less
        );
        assert_eq!(
            FieldValue::from("a").compare(&FieldValue::Float(1e9)),
            Ordering::Greater
        );
        assert_eq!(
            FieldValue::Boolean(true).compare(&FieldValue::Integer(-5)),
            Ordering::Less
        );
    }

    #[test]
    fn test_datetime_ordering() {
        let earlier = chrono::Utc::now();
        let later = earlier + chrono::Duration::seconds(5);
        assert_eq!(
            FieldValue::from(earlier).compare(&FieldValue::from(later)),
            Ordering::Less
        );
    }

    #[test]
    fn test_serde_untagged_number() {
        let restored: FieldValue = serde_json::from_str("42").expect("deserialize should succeed");
        assert_eq!(restored, FieldValue::Integer(42));
    }
}
