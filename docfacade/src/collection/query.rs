use super::{Document, Entity};
use crate::common::{DocumentCursor, SortOrder, Value};
use crate::errors::FacadeResult;
use crate::store::{FindOptions, ReadTimeout, StoreCollection};

/// A fluent query over one collection.
///
/// Conditions on the same field are merged into a single operator
/// document, so `query().gte("age", 18).lt("age", 65)` sends
/// `{age: {$gte: 18, $lt: 65}}`.
///
/// # Examples
///
/// ```rust,ignore
/// let adults = users
///     .query()
///     .gte("age", 18)
///     .sort("name", SortOrder::Ascending)
///     .limit(10)
///     .entities()?;
/// ```
#[derive(Clone)]
pub struct Query {
    store: StoreCollection,
    filter: Document,
    sort: Document,
    options: FindOptions,
}

impl Query {
    pub(crate) fn new(store: StoreCollection, timeout: ReadTimeout) -> Self {
        Query {
            store,
            filter: Document::new(),
            sort: Document::new(),
            options: FindOptions::new().timeout(timeout),
        }
    }

    pub fn eq(mut self, field: &str, value: impl Into<Value>) -> Self {
        self.filter.put(field, value);
        self
    }

    pub fn ne(self, field: &str, value: impl Into<Value>) -> Self {
        self.operator(field, "$ne", value.into())
    }

    pub fn gt(self, field: &str, value: impl Into<Value>) -> Self {
        self.operator(field, "$gt", value.into())
    }

    pub fn gte(self, field: &str, value: impl Into<Value>) -> Self {
        self.operator(field, "$gte", value.into())
    }

    pub fn lt(self, field: &str, value: impl Into<Value>) -> Self {
        self.operator(field, "$lt", value.into())
    }

    pub fn lte(self, field: &str, value: impl Into<Value>) -> Self {
        self.operator(field, "$lte", value.into())
    }

    pub fn in_values<V: Into<Value>>(self, field: &str, values: Vec<V>) -> Self {
        self.operator(field, "$in", Value::from(values))
    }

    pub fn exists(self, field: &str, exists: bool) -> Self {
        self.operator(field, "$exists", Value::from(exists))
    }

    pub fn sort(mut self, field: &str, order: SortOrder) -> Self {
        self.sort.put(field, order.as_i32());
        self
    }

    pub fn skip(mut self, skip: u64) -> Self {
        self.options = self.options.skip(skip);
        self
    }

    pub fn limit(mut self, limit: u64) -> Self {
        self.options = self.options.limit(limit);
        self
    }

    /// The filter document built so far.
    pub fn filter(&self) -> &Document {
        &self.filter
    }

    pub fn cursor(&self) -> FacadeResult<DocumentCursor> {
        let options = if self.sort.is_empty() {
            self.options.clone()
        } else {
            self.options.clone().sort(self.sort.clone())
        };
        self.store.find(&self.filter, &options)
    }

    pub fn entities(&self) -> FacadeResult<Vec<Entity>> {
        let name = self.store.name();
        self.cursor()?.into_entities(&name).collect()
    }

    pub fn count(&self) -> FacadeResult<u64> {
        self.store.count(&self.filter)
    }

    fn operator(mut self, field: &str, operator: &str, operand: Value) -> Self {
        let mut condition = match self.filter.get_value(field) {
            Some(Value::Document(existing)) if is_operator_document(existing) => existing.clone(),
            _ => Document::new(),
        };
        condition.put(operator, operand);
        self.filter.put(field, condition);
        self
    }
}

fn is_operator_document(document: &Document) -> bool {
    document
        .keys()
        .next()
        .map(|key| key.starts_with('$'))
        .unwrap_or(false)
}
