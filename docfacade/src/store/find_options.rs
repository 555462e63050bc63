use crate::collection::Document;
use crate::store::ReadTimeout;

/// Options of a store `find`.
///
/// # Examples
///
/// ```rust,ignore
/// use docfacade::store::FindOptions;
///
/// let options = FindOptions::new()
///     .sort(doc! { age: (-1) })
///     .skip(10)
///     .limit(20);
/// ```
#[derive(Debug, Clone, Default, PartialEq)]
pub struct FindOptions {
    timeout: ReadTimeout,
    sort: Option<Document>,
    projection: Option<Document>,
    skip: Option<u64>,
    limit: Option<u64>,
}

impl FindOptions {
    pub fn new() -> Self {
        FindOptions::default()
    }

    pub fn timeout(mut self, timeout: ReadTimeout) -> Self {
        self.timeout = timeout;
        self
    }

    /// Sort specification, e.g. `{age: -1, name: 1}`.
    pub fn sort(mut self, sort: Document) -> Self {
        self.sort = Some(sort);
        self
    }

    /// Inclusion projection, e.g. `{name: 1}`.
    pub fn projection(mut self, projection: Document) -> Self {
        self.projection = Some(projection);
        self
    }

    pub fn skip(mut self, skip: u64) -> Self {
        self.skip = Some(skip);
        self
    }

    pub fn limit(mut self, limit: u64) -> Self {
        self.limit = Some(limit);
        self
    }

    pub fn read_timeout(&self) -> ReadTimeout {
        self.timeout
    }

    pub fn sort_spec(&self) -> Option<&Document> {
        self.sort.as_ref()
    }

    pub fn projection_spec(&self) -> Option<&Document> {
        self.projection.as_ref()
    }

    pub fn skip_count(&self) -> Option<u64> {
        self.skip
    }

    pub fn limit_count(&self) -> Option<u64> {
        self.limit
    }
}

/// Options of the store's find-and-modify primitive.
///
/// `return_new` selects whether the post-update (`true`) or the pre-update
/// (`false`, the default) document is returned; the facade passes it through
/// without reinterpreting it.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct FindAndModifyOptions {
    return_new: bool,
    upsert: bool,
    remove: bool,
    sort: Option<Document>,
}

impl FindAndModifyOptions {
    pub fn new() -> Self {
        FindAndModifyOptions::default()
    }

    pub fn return_new(mut self, return_new: bool) -> Self {
        self.return_new = return_new;
        self
    }

    pub fn upsert(mut self, upsert: bool) -> Self {
        self.upsert = upsert;
        self
    }

    /// Remove the matched document instead of updating it.
    pub fn remove(mut self, remove: bool) -> Self {
        self.remove = remove;
        self
    }

    /// Picks the first document in this order when several match.
    pub fn sort(mut self, sort: Document) -> Self {
        self.sort = Some(sort);
        self
    }

    pub fn is_return_new(&self) -> bool {
        self.return_new
    }

    pub fn is_upsert(&self) -> bool {
        self.upsert
    }

    pub fn is_remove(&self) -> bool {
        self.remove
    }

    pub fn sort_spec(&self) -> Option<&Document> {
        self.sort.as_ref()
    }
}
