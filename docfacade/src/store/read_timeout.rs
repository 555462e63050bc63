use std::fmt::Display;
use std::time::Duration;

/// Read timeout applied to store cursors.
///
/// The setting is connection scoped: every collection of a database reads
/// the same value, and aggregation disables it for the length of one call.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ReadTimeout {
    /// Use the store client's built-in timeout.
    #[default]
    Default,
    /// No timeout: wait for the store as long as it takes.
    Disabled,
    /// Give up after this many milliseconds.
    Millis(u64),
}

impl ReadTimeout {
    /// The timeout as a duration; `None` for [ReadTimeout::Default] and
    /// [ReadTimeout::Disabled].
    pub fn duration(&self) -> Option<Duration> {
        match self {
            ReadTimeout::Millis(millis) => Some(Duration::from_millis(*millis)),
            _ => None,
        }
    }

    /// Reads the integer encoding used by store clients: negative disables
    /// the timeout, zero keeps the default, positive is milliseconds.
    pub fn from_millis(millis: i64) -> Self {
        match millis {
            m if m < 0 => ReadTimeout::Disabled,
            0 => ReadTimeout::Default,
            m => ReadTimeout::Millis(m as u64),
        }
    }

    /// Integer encoding, see [ReadTimeout::from_millis].
    pub fn as_millis(&self) -> i64 {
        match self {
            ReadTimeout::Default => 0,
            ReadTimeout::Disabled => -1,
            ReadTimeout::Millis(millis) => *millis as i64,
        }
    }
}

impl Display for ReadTimeout {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ReadTimeout::Default => write!(f, "default"),
            ReadTimeout::Disabled => write!(f, "disabled"),
            ReadTimeout::Millis(millis) => write!(f, "{}ms", millis),
        }
    }
}
