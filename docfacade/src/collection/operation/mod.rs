mod aggregate_operations;
mod collection_operations;
mod index_operations;
mod read_operations;
mod reference_operations;
mod write_operations;

pub(crate) use aggregate_operations::*;
pub(crate) use collection_operations::*;
pub use write_operations::RemoveTarget;
