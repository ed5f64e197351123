/// All database primary keys are PostgreSQL BIGSERIAL.
pub type DbId = i64;

/// All timestamps are UTC.
pub type Timestamp = chrono::DateTime<chrono::Utc>;

/// A timestamp that keeps the offset it was created or parsed with.
///
/// PostgreSQL `TIMESTAMPTZ` values come back in UTC (`+00:00`); an offset
/// only survives where the value never passes through the database, such
/// as JSON decoding.
pub type ZonedTimestamp = chrono::DateTime<chrono::FixedOffset>;
