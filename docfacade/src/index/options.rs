use crate::collection::Document;
use crate::common::{Value, INDEX_DROP_DUPS, INDEX_UNIQUE};

/// Options of an index: uniqueness and duplicate removal.
///
/// `drop_duplicates` implies `unique`; every constructor and setter keeps
/// that invariant.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct IndexOptions {
    unique: bool,
    drop_duplicates: bool,
}

impl IndexOptions {
    /// Builds options, promoting `unique` when `drop_duplicates` is set.
    pub fn new(unique: bool, drop_duplicates: bool) -> Self {
        IndexOptions {
            unique: unique || drop_duplicates,
            drop_duplicates,
        }
    }

    pub fn unique(mut self, unique: bool) -> Self {
        self.unique = unique || self.drop_duplicates;
        self
    }

    pub fn drop_duplicates(mut self, drop_duplicates: bool) -> Self {
        self.drop_duplicates = drop_duplicates;
        self.unique |= drop_duplicates;
        self
    }

    pub fn is_unique(&self) -> bool {
        self.unique
    }

    pub fn is_drop_duplicates(&self) -> bool {
        self.drop_duplicates
    }

    /// Option document sent to the store; only set flags are written.
    pub fn to_document(&self) -> Document {
        let mut document = Document::new();
        if self.unique {
            document.put(INDEX_UNIQUE, true);
        }
        if self.drop_duplicates {
            document.put(INDEX_DROP_DUPS, true);
        }
        document
    }
}

/// The options argument of `ensure_index`.
///
/// Besides a raw option set it accepts the two legacy convenience modes,
/// which collapse onto [IndexOptions].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum IndexParams {
    /// No options: a plain index.
    #[default]
    Plain,
    /// Unique index.
    Unique,
    /// Unique index that removes documents with duplicate keys.
    DropDuplicates,
    /// A raw option set.
    Options(IndexOptions),
}

impl IndexParams {
    /// Normalizes the params into an option set.
    pub fn to_options(&self) -> IndexOptions {
        match self {
            IndexParams::Plain => IndexOptions::default(),
            IndexParams::Unique => IndexOptions::new(true, false),
            IndexParams::DropDuplicates => IndexOptions::new(true, true),
            IndexParams::Options(options) => IndexOptions::new(options.unique, options.drop_duplicates),
        }
    }
}

impl From<IndexOptions> for IndexParams {
    fn from(options: IndexOptions) -> Self {
        IndexParams::Options(options)
    }
}

/// The option argument handed to the store's index creation primitive.
///
/// Some store client versions take a bare boolean meaning "unique" instead
/// of an option document; [IndexCreateOptions::Flag] carries that encoding.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum IndexCreateOptions {
    /// Legacy encoding: `true` creates a unique index.
    Flag(bool),
    /// Option document encoding.
    Options(IndexOptions),
}

impl IndexCreateOptions {
    /// Encodes `options` for the store, collapsing them to the unique flag
    /// when `legacy_boolean_unique` is set.
    pub fn encode(options: IndexOptions, legacy_boolean_unique: bool) -> Self {
        if legacy_boolean_unique {
            IndexCreateOptions::Flag(options.is_unique())
        } else {
            IndexCreateOptions::Options(options)
        }
    }

    /// Reads the option set back, whichever encoding was used.
    pub fn to_options(&self) -> IndexOptions {
        match self {
            IndexCreateOptions::Flag(unique) => IndexOptions::new(*unique, false),
            IndexCreateOptions::Options(options) => *options,
        }
    }

    /// Wire form: the bare flag or the option document.
    pub fn to_value(&self) -> Value {
        match self {
            IndexCreateOptions::Flag(unique) => Value::Bool(*unique),
            IndexCreateOptions::Options(options) => Value::Document(options.to_document()),
        }
    }
}

/// Creates options for a unique index.
pub fn unique_index() -> IndexOptions {
    IndexOptions::new(true, false)
}

/// Creates options for a unique index that drops duplicate documents.
pub fn drop_duplicates_index() -> IndexOptions {
    IndexOptions::new(true, true)
}
