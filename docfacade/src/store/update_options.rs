use crate::store::WriteConcern;

/// Options for controlling update operations.
///
/// # Examples
///
/// ```rust,ignore
/// use docfacade::store::{UpdateOptions, upsert, multi};
///
/// // Insert when nothing matches
/// let options = upsert();
///
/// // Update every matching document
/// let options = multi();
///
/// // Custom options
/// let options = UpdateOptions::new(true, true, WriteConcern::from_w(2));
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct UpdateOptions {
    upsert: bool,
    multi: bool,
    write_concern: WriteConcern,
}

impl UpdateOptions {
    pub fn new(upsert: bool, multi: bool, write_concern: WriteConcern) -> Self {
        Self {
            upsert,
            multi,
            write_concern,
        }
    }

    /// Returns whether to insert a document when nothing matches.
    pub fn is_upsert(&self) -> bool {
        self.upsert
    }

    /// Returns whether every matching document is updated instead of the
    /// first one only.
    pub fn is_multi(&self) -> bool {
        self.multi
    }

    pub fn write_concern(&self) -> WriteConcern {
        self.write_concern
    }

    pub fn with_write_concern(mut self, write_concern: WriteConcern) -> Self {
        self.write_concern = write_concern;
        self
    }
}

/// Creates `UpdateOptions` with upsert behavior.
pub fn upsert() -> UpdateOptions {
    UpdateOptions::new(true, false, WriteConcern::default())
}

/// Creates `UpdateOptions` that update every matching document.
pub fn multi() -> UpdateOptions {
    UpdateOptions::new(false, true, WriteConcern::default())
}
