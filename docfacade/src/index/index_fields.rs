use indexmap::IndexMap;

use crate::collection::Document;
use crate::common::SortOrder;

/// The key specification of an index: field names mapped to a direction,
/// in key order.
///
/// A single field name converts into `{field: ascending}`.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct IndexFields {
    fields: IndexMap<String, SortOrder>,
}

impl IndexFields {
    pub fn new() -> Self {
        IndexFields {
            fields: IndexMap::new(),
        }
    }

    /// Appends a key field.
    pub fn add(mut self, field: &str, order: SortOrder) -> Self {
        self.fields.insert(field.to_string(), order);
        self
    }

    pub fn field_names(&self) -> Vec<String> {
        self.fields.keys().cloned().collect()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&String, &SortOrder)> {
        self.fields.iter()
    }

    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }

    /// Key document sent to the store, e.g. `{email: 1, age: -1}`.
    pub fn to_document(&self) -> Document {
        self.fields
            .iter()
            .map(|(field, order)| (field.clone(), *order))
            .collect()
    }

    /// Reads a key document back; entries whose direction is not numeric
    /// are skipped.
    pub fn from_document(document: &Document) -> Self {
        let fields = document
            .iter()
            .filter_map(|(field, value)| SortOrder::from_value(value).map(|order| (field.clone(), order)))
            .collect();
        IndexFields { fields }
    }

    /// Conventional index name: `field_dir` segments joined by `_`,
    /// e.g. `email_1_age_-1`.
    pub fn index_name(&self) -> String {
        self.fields
            .iter()
            .map(|(field, order)| format!("{}_{}", field, order.as_i32()))
            .collect::<Vec<_>>()
            .join("_")
    }
}

impl From<&str> for IndexFields {
    fn from(field: &str) -> Self {
        IndexFields::new().add(field, SortOrder::Ascending)
    }
}

impl From<String> for IndexFields {
    fn from(field: String) -> Self {
        IndexFields::from(field.as_str())
    }
}

impl From<Vec<(&str, SortOrder)>> for IndexFields {
    fn from(pairs: Vec<(&str, SortOrder)>) -> Self {
        pairs
            .into_iter()
            .fold(IndexFields::new(), |fields, (field, order)| fields.add(field, order))
    }
}

impl<const N: usize> From<[(&str, SortOrder); N]> for IndexFields {
    fn from(pairs: [(&str, SortOrder); N]) -> Self {
        IndexFields::from(pairs.to_vec())
    }
}

impl From<&Document> for IndexFields {
    fn from(document: &Document) -> Self {
        IndexFields::from_document(document)
    }
}
