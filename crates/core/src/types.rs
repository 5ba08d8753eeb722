/// Record identifiers are assigned by the hosted backend and treated as opaque.
pub type RecordId = String;

/// All timestamps are UTC.
pub type Timestamp = chrono::DateTime<chrono::Utc>;
