use indexmap::IndexMap;
use itertools::Itertools;
use std::cmp::Ordering;
use std::fmt::{Debug, Display};
use std::hash::{Hash, Hasher};

use crate::common::{split_path, Value, DOC_ID};

/// Raw field mapping exchanged with the store.
///
/// A document is an insertion-ordered map from field name to [Value]. Order
/// is significant: index key specifications (`{a: 1, b: -1}`) and sort
/// specifications are documents whose field order carries meaning, and two
/// documents compare equal only when their fields appear in the same order.
///
/// [Document::get] accepts dotted paths (`"address.city"`) and walks embedded
/// documents and array positions. [Document::put] always stores the key
/// literally, so operator documents such as `{"$set": {"a.b": 1}}` keep their
/// dotted keys; use [Document::put_path] to write into embedded documents.
#[derive(Clone, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Document {
    data: IndexMap<String, Value>,
}

impl Document {
    /// Creates a new empty document.
    pub fn new() -> Self {
        Document {
            data: IndexMap::new(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.data.is_empty()
    }

    pub fn size(&self) -> usize {
        self.data.len()
    }

    /// Associates `value` with `key`, keeping the key's position when it is
    /// already present. Returns the previous value.
    pub fn put(&mut self, key: impl Into<String>, value: impl Into<Value>) -> Option<Value> {
        self.data.insert(key.into(), value.into())
    }

    /// Returns the value at `key` (a plain or dotted path), or [Value::Null].
    pub fn get(&self, key: &str) -> Value {
        self.get_value(key).cloned().unwrap_or(Value::Null)
    }

    /// Returns a reference to the value at `key` (a plain or dotted path).
    ///
    /// A literal key containing dots wins over path traversal.
    pub fn get_value(&self, key: &str) -> Option<&Value> {
        if let Some(value) = self.data.get(key) {
            return Some(value);
        }
        if !key.contains('.') {
            return None;
        }

        let path = split_path(key);
        let mut current = self.data.get(path[0])?;
        for segment in &path[1..] {
            current = match current {
                Value::Document(doc) => doc.data.get(*segment)?,
                Value::Array(values) => values.get(segment.parse::<usize>().ok()?)?,
                _ => return None,
            };
        }
        Some(current)
    }

    /// Writes `value` at a dotted path, creating embedded documents on the
    /// way. A non-document value in the middle of the path is replaced.
    pub fn put_path(&mut self, path: &str, value: impl Into<Value>) {
        let value = value.into();
        match path.split_once('.') {
            None => {
                self.put(path, value);
            }
            Some((head, rest)) => {
                let entry = self
                    .data
                    .entry(head.to_string())
                    .or_insert_with(|| Value::Document(Document::new()));
                if !entry.is_document() {
                    *entry = Value::Document(Document::new());
                }
                if let Some(embedded) = entry.as_document_mut() {
                    embedded.put_path(rest, value);
                }
            }
        }
    }

    /// Removes the value at a dotted path. Returns the removed value.
    pub fn remove_path(&mut self, path: &str) -> Option<Value> {
        match path.split_once('.') {
            None => self.remove(path),
            Some((head, rest)) => self
                .data
                .get_mut(head)
                .and_then(|value| value.as_document_mut())
                .and_then(|embedded| embedded.remove_path(rest)),
        }
    }

    /// Removes a top-level key, keeping the order of the remaining fields.
    pub fn remove(&mut self, key: &str) -> Option<Value> {
        self.data.shift_remove(key)
    }

    pub fn contains_key(&self, key: &str) -> bool {
        self.get_value(key).is_some()
    }

    /// Top-level field names in insertion order.
    pub fn keys(&self) -> impl Iterator<Item = &String> {
        self.data.keys()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&String, &Value)> {
        self.data.iter()
    }

    /// The `_id` value of the document, if any.
    pub fn id(&self) -> Option<&Value> {
        self.data.get(DOC_ID)
    }

    /// Copies every field of `other` into this document.
    pub fn merge(&mut self, other: &Document) {
        for (key, value) in other.iter() {
            self.data.insert(key.clone(), value.clone());
        }
    }
}

impl PartialEq for Document {
    fn eq(&self, other: &Self) -> bool {
        self.cmp(other) == Ordering::Equal
    }
}

impl Eq for Document {}

impl PartialOrd for Document {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for Document {
    fn cmp(&self, other: &Self) -> Ordering {
        self.data.iter().cmp(other.data.iter())
    }
}

impl Hash for Document {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.data.len().hash(state);
        for (key, value) in self.data.iter() {
            key.hash(state);
            value.hash(state);
        }
    }
}

impl Display for Document {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let fields = self
            .data
            .iter()
            .map(|(key, value)| format!("{:?}: {}", key, value))
            .join(", ");
        write!(f, "{{{}}}", fields)
    }
}

impl Debug for Document {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        Display::fmt(self, f)
    }
}

impl<K: Into<String>, V: Into<Value>> FromIterator<(K, V)> for Document {
    fn from_iter<T: IntoIterator<Item = (K, V)>>(iter: T) -> Self {
        let mut doc = Document::new();
        for (key, value) in iter {
            doc.put(key, value);
        }
        doc
    }
}

impl IntoIterator for Document {
    type Item = (String, Value);
    type IntoIter = indexmap::map::IntoIter<String, Value>;

    fn into_iter(self) -> Self::IntoIter {
        self.data.into_iter()
    }
}

/// Strips the quotes `stringify!` leaves around string-literal keys.
#[doc(hidden)]
pub fn normalize(key: &str) -> String {
    key.trim_matches('"').to_string()
}

/// Builds a [Document] from a JSON-like literal.
///
/// Keys may be identifiers or string literals; values may be nested
/// `{...}` documents, `[...]` arrays or any expression convertible into a
/// [Value]. Wrap multi-token expressions (negative numbers, calls) in
/// parentheses.
///
/// ```rust,ignore
/// let filter = doc! { "$match": { status: "active", score: (-1) } };
/// ```
#[macro_export]
macro_rules! doc {
    () => {
        $crate::collection::Document::new()
    };

    ($($key:tt : $value:tt),* $(,)?) => {
        {
            let mut doc = $crate::collection::Document::new();
            $(
                doc.put($crate::collection::normalize(stringify!($key)), $crate::doc_value!($value));
            )*
            doc
        }
    };
}

/// Helper macro converting the values of a [doc!] literal.
#[macro_export]
macro_rules! doc_value {
    ({ $($key:tt : $value:tt),* $(,)? }) => {
        $crate::common::Value::Document($crate::doc!{ $($key : $value),* })
    };

    ([ $($value:tt),* $(,)? ]) => {
        $crate::common::Value::Array(vec![$($crate::doc_value!($value)),*])
    };

    ($value:expr) => {
        $crate::common::Value::from($value)
    };
}
