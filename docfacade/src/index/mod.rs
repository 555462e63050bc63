//! Index specifications: key fields, options and their store encoding.
//!
//! An index is described by an [IndexFields] key specification and an
//! [IndexOptions] set. `ensure_index` additionally accepts the legacy
//! convenience modes of [IndexParams], and [IndexCreateOptions] captures the
//! two encodings store clients accept for the options argument.

mod index_fields;
mod options;

pub use index_fields::*;
pub use options::*;
