/// Acknowledgment level (`w`) requested for a write.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WriteConcern {
    /// `w = 0`: fire and forget, the store does not confirm the write.
    Unacknowledged,
    /// `w >= 1`: the store confirms the write on this many members.
    Acknowledged(u32),
}

impl WriteConcern {
    /// Builds a write concern from the numeric `w` level.
    pub fn from_w(w: u32) -> Self {
        if w == 0 {
            WriteConcern::Unacknowledged
        } else {
            WriteConcern::Acknowledged(w)
        }
    }

    pub fn w(&self) -> u32 {
        match self {
            WriteConcern::Unacknowledged => 0,
            WriteConcern::Acknowledged(w) => *w,
        }
    }

    pub fn is_acknowledged(&self) -> bool {
        matches!(self, WriteConcern::Acknowledged(_))
    }
}

impl Default for WriteConcern {
    fn default() -> Self {
        WriteConcern::Acknowledged(1)
    }
}

impl From<u32> for WriteConcern {
    fn from(w: u32) -> Self {
        WriteConcern::from_w(w)
    }
}

/// Options of `insert` and `batch_insert`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct InsertOptions {
    write_concern: WriteConcern,
}

impl InsertOptions {
    pub fn new(write_concern: WriteConcern) -> Self {
        InsertOptions { write_concern }
    }

    pub fn write_concern(&self) -> WriteConcern {
        self.write_concern
    }
}

/// Options of `save`.
///
/// `save` is passed through to the store untouched; `write_concern` is the
/// requested acknowledgment level.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct SaveOptions {
    save: bool,
    write_concern: WriteConcern,
}

impl SaveOptions {
    pub fn new(save: bool, write_concern: WriteConcern) -> Self {
        SaveOptions { save, write_concern }
    }

    pub fn is_save(&self) -> bool {
        self.save
    }

    pub fn write_concern(&self) -> WriteConcern {
        self.write_concern
    }
}
