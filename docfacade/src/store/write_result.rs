use crate::common::Value;

/// The store's report of a write (insert, update, remove).
///
/// Write failures are values, not errors: check [WriteResult::is_ok] the way
/// the store's own convention requires. An unacknowledged write (`w = 0`)
/// reports success as soon as it was sent.
#[derive(Debug, Clone, PartialEq)]
pub struct WriteResult {
    ok: bool,
    acknowledged: bool,
    n: u64,
    upserted: Option<Value>,
    err: Option<String>,
}

impl WriteResult {
    /// A confirmed write that affected `n` documents.
    pub fn acknowledged(n: u64) -> Self {
        WriteResult {
            ok: true,
            acknowledged: true,
            n,
            upserted: None,
            err: None,
        }
    }

    /// A write sent without confirmation.
    pub fn unacknowledged() -> Self {
        WriteResult {
            ok: true,
            acknowledged: false,
            n: 0,
            upserted: None,
            err: None,
        }
    }

    /// A write the store rejected.
    pub fn failed(err: &str) -> Self {
        WriteResult {
            ok: false,
            acknowledged: true,
            n: 0,
            upserted: None,
            err: Some(err.to_string()),
        }
    }

    pub fn with_upserted(mut self, id: Value) -> Self {
        self.upserted = Some(id);
        self
    }

    pub fn is_ok(&self) -> bool {
        self.ok
    }

    pub fn is_acknowledged(&self) -> bool {
        self.acknowledged
    }

    /// Number of documents affected.
    pub fn n(&self) -> u64 {
        self.n
    }

    /// `_id` of the document inserted by an upsert.
    pub fn upserted(&self) -> Option<&Value> {
        self.upserted.as_ref()
    }

    pub fn err(&self) -> Option<&str> {
        self.err.as_deref()
    }
}
