use crate::errors::{ErrorKind, FacadeError, FacadeResult};
use chrono::{DateTime, TimeZone, Utc};
use once_cell::sync::Lazy;
use rand::rngs::OsRng;
use rand::Rng;
use std::fmt::{Debug, Display, Write};
use std::str::FromStr;
use std::sync::atomic::{AtomicU32, Ordering};

/// Random bytes chosen once per process, shared by every generated id.
static PROCESS_UNIQUE: Lazy<[u8; 5]> = Lazy::new(|| OsRng.gen::<[u8; 5]>());

static COUNTER: Lazy<AtomicU32> = Lazy::new(|| AtomicU32::new(OsRng.gen_range(0..0x00FF_FFFF)));

/// Number of hexadecimal characters in the string form of an id.
pub const OBJECT_ID_HEX_LEN: usize = 24;

/// The native identifier of the document store.
///
/// Twelve bytes laid out as:
///
/// * 4 bytes: seconds since the Unix epoch, big-endian
/// * 5 bytes: random value unique to this process
/// * 3 bytes: incrementing counter, big-endian, seeded randomly
///
/// Ids generated by one process therefore sort by creation time. The string
/// form is 24 lower-case hexadecimal characters; [ObjectId::parse_str] is the
/// only way to build an id from text and rejects anything else.
#[derive(PartialEq, Eq, Ord, PartialOrd, Hash, Clone, Copy)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct ObjectId {
    bytes: [u8; 12],
}

impl ObjectId {
    /// Generates a new id from the current time.
    pub fn new() -> Self {
        let seconds = Utc::now().timestamp().clamp(0, u32::MAX as i64) as u32;
        let counter = COUNTER.fetch_add(1, Ordering::SeqCst) & 0x00FF_FFFF;

        let mut bytes = [0u8; 12];
        bytes[0..4].copy_from_slice(&seconds.to_be_bytes());
        bytes[4..9].copy_from_slice(&*PROCESS_UNIQUE);
        bytes[9..12].copy_from_slice(&counter.to_be_bytes()[1..4]);
        ObjectId { bytes }
    }

    pub fn from_bytes(bytes: [u8; 12]) -> Self {
        ObjectId { bytes }
    }

    /// Parses the 24-character hexadecimal form of an id.
    ///
    /// # Errors
    ///
    /// Fails with [ErrorKind::InvalidIdentifier] when `value` is not exactly
    /// 24 hexadecimal characters.
    pub fn parse_str(value: &str) -> FacadeResult<ObjectId> {
        if value.len() != OBJECT_ID_HEX_LEN || !value.bytes().all(|b| b.is_ascii_hexdigit()) {
            log::error!("Invalid object id {:?}", value);
            return Err(FacadeError::new(
                &format!("'{}' is not a valid object id: expected {} hex characters", value, OBJECT_ID_HEX_LEN),
                ErrorKind::InvalidIdentifier,
            ));
        }

        let mut bytes = [0u8; 12];
        for (i, byte) in bytes.iter_mut().enumerate() {
            *byte = u8::from_str_radix(&value[i * 2..i * 2 + 2], 16).map_err(|err| {
                log::error!("Invalid object id {:?}: {}", value, err);
                FacadeError::new(
                    &format!("'{}' is not a valid object id: {}", value, err),
                    ErrorKind::InvalidIdentifier,
                )
            })?;
        }
        Ok(ObjectId { bytes })
    }

    pub fn bytes(&self) -> [u8; 12] {
        self.bytes
    }

    /// Creation time encoded in the id.
    pub fn timestamp(&self) -> DateTime<Utc> {
        let seconds = u32::from_be_bytes([self.bytes[0], self.bytes[1], self.bytes[2], self.bytes[3]]);
        Utc.timestamp_opt(seconds as i64, 0)
            .single()
            .unwrap_or_default()
    }

    /// Lower-case hexadecimal form.
    pub fn to_hex(&self) -> String {
        let mut hex = String::with_capacity(OBJECT_ID_HEX_LEN);
        for byte in self.bytes.iter() {
            let _ = write!(hex, "{:02x}", byte);
        }
        hex
    }
}

impl Default for ObjectId {
    fn default() -> Self {
        ObjectId::new()
    }
}

impl FromStr for ObjectId {
    type Err = FacadeError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        ObjectId::parse_str(s)
    }
}

impl Debug for ObjectId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "ObjectId({})", self.to_hex())
    }
}

impl Display for ObjectId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.to_hex())
    }
}
