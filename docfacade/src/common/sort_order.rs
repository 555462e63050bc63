use crate::common::Value;

/// Direction of an index key or a sort specification.
///
/// Encoded on the wire as `1` for ascending and `-1` for descending.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum SortOrder {
    /// Smallest to largest
    #[default]
    Ascending,
    /// Largest to smallest
    Descending,
}

impl SortOrder {
    /// Wire encoding of the direction.
    pub fn as_i32(&self) -> i32 {
        match self {
            SortOrder::Ascending => 1,
            SortOrder::Descending => -1,
        }
    }

    /// Reads a direction from its wire encoding; any negative number is
    /// descending, any other number ascending.
    pub fn from_value(value: &Value) -> Option<SortOrder> {
        value.as_number().map(|n| {
            if n < 0.0 {
                SortOrder::Descending
            } else {
                SortOrder::Ascending
            }
        })
    }
}

impl From<SortOrder> for Value {
    fn from(order: SortOrder) -> Self {
        Value::I32(order.as_i32())
    }
}
