/// All timestamps are UTC.
pub type Timestamp = chrono::DateTime<chrono::Utc>;

/// Caller-supplied opaque session identifier (a UUID in practice).
pub type SessionId = String;
