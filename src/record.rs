use indexmap::IndexMap;
use serde::{Deserialize, Serialize};

use crate::types::{CategoryName, FieldName};

/// One raw field value inside a record.
///
/// Shards are plain JSON, so the variants are untagged: a JSON number becomes
/// `Number`, a string becomes `Text`, and an array of strings becomes `List`.
/// Absence of a field is represented by the key not being present at all.
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq)]
#[serde(untagged)]
pub enum FieldValue {
    /// Scalar numeric value (budget, runtime, ...).
    Number(f64),
    /// Free-form text value (title, release date, ...).
    Text(String),
    /// List-valued categorical value (genres, languages, ...).
    List(Vec<CategoryName>),
}

impl FieldValue {
    /// Numeric view of this value, if it is a number.
    pub fn as_number(&self) -> Option<f64> {
        match self {
            FieldValue::Number(value) => Some(*value),
            _ => None,
        }
    }

    /// Text view of this value, if it is text.
    pub fn as_text(&self) -> Option<&str> {
        match self {
            FieldValue::Text(value) => Some(value),
            _ => None,
        }
    }

    /// Category list view of this value, if it is a list.
    pub fn as_list(&self) -> Option<&[CategoryName]> {
        match self {
            FieldValue::List(values) => Some(values),
            _ => None,
        }
    }
}

/// A raw movie record as loaded from a shard: a field-name to value mapping.
///
/// Insertion order is preserved so records round-trip through shard files
/// without reordering, but no field is guaranteed present.
#[derive(Clone, Debug, Default, Serialize, Deserialize)]
pub struct RawRecord(
    /// Field map in insertion order.
    pub IndexMap<FieldName, FieldValue>,
);

impl RawRecord {
    /// Empty record.
    pub fn new() -> Self {
        Self(IndexMap::new())
    }

    /// Look up a field by name.
    pub fn get(&self, field: &str) -> Option<&FieldValue> {
        self.0.get(field)
    }

    /// Insert or replace a field.
    pub fn set(&mut self, field: impl Into<FieldName>, value: FieldValue) {
        self.0.insert(field.into(), value);
    }
}

/// The list-valued categorical fields the flattener expands.
///
/// `ALL` fixes the processing order; indicator column groups are appended to
/// the feature matrix in this order. Field processing itself is independent
/// and order-commutative.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum ListField {
    /// Movie genres.
    Genre,
    /// Spoken languages.
    Language,
    /// Production companies.
    Production,
    /// Production countries.
    Country,
}

impl ListField {
    /// Fixed processing order for list-valued fields.
    pub const ALL: [ListField; 4] = [
        ListField::Genre,
        ListField::Language,
        ListField::Production,
        ListField::Country,
    ];

    /// Raw record field name for this list field.
    pub fn field_name(self) -> &'static str {
        match self {
            ListField::Genre => "genre",
            ListField::Language => "language",
            ListField::Production => "production",
            ListField::Country => "country",
        }
    }
}
