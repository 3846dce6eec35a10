//! Input items: either a raw string or a record (key→string map) with a
//! declared list of searchable field names (§3 "Item").

use ahash::AHashMap;

/// One thing the caller wants indexed: a bare string, or a record of named
/// text fields.
#[derive(Debug, Clone)]
pub enum Item {
    Text(String),
    Record(AHashMap<String, String>),
}

impl Item {
    pub fn text(value: impl Into<String>) -> Self {
        Item::Text(value.into())
    }

    pub fn record(fields: impl IntoIterator<Item = (String, String)>) -> Self {
        Item::Record(fields.into_iter().collect())
    }

    /// The canonical base id: the string itself for `Text`, or the value of
    /// `fields[0]` (in `declared_fields` order) for `Record`.
    pub fn base_id(&self, declared_fields: &[String]) -> Option<String> {
        match self {
            Item::Text(s) => Some(s.clone()),
            Item::Record(map) => declared_fields.first().and_then(|first| map.get(first)).cloned(),
        }
    }

    pub fn is_record(&self) -> bool {
        matches!(self, Item::Record(_))
    }

    pub fn field(&self, name: &str) -> Option<&str> {
        match self {
            Item::Text(s) => Some(s.as_str()),
            Item::Record(map) => map.get(name).map(String::as_str),
        }
    }
}
