// document constants
pub const DOC_ID: &str = "_id";

// reference constants
pub const REF_COLLECTION: &str = "$ref";
pub const REF_ID: &str = "$id";
pub const REF_DATABASE: &str = "$db";

// index catalog constants
pub const SYSTEM_INDEXES: &str = "system.indexes";
pub const INDEX_KEY: &str = "key";
pub const INDEX_NAMESPACE: &str = "ns";
pub const INDEX_NAME: &str = "name";
pub const INDEX_VERSION: &str = "v";
pub const INDEX_UNIQUE: &str = "unique";
pub const INDEX_DROP_DUPS: &str = "dropDups";
pub const ID_INDEX_NAME: &str = "_id_";
pub const NAMESPACE_SEPARATOR: &str = ".";

// aggregation reply constants
pub const REPLY_OK: &str = "ok";
pub const REPLY_RESULT: &str = "result";
pub const REPLY_CODE: &str = "code";
pub const REPLY_ERRMSG: &str = "errmsg";

// store error codes
pub const ERR_BAD_VALUE: i64 = 2;
pub const ERR_UNKNOWN_STAGE: i64 = 40324;
pub const ERR_STAGE_SHAPE: i64 = 40323;
pub const ERR_DUPLICATE_KEY: i64 = 11000;

pub const FACADE_VERSION: &str = env!("CARGO_PKG_VERSION");
