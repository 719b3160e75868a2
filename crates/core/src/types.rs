/// All database primary keys are PostgreSQL BIGSERIAL.
pub type DbId = i64;

/// All timestamps are UTC.
pub type Timestamp = chrono::DateTime<chrono::Utc>;

/// Calendar dates (issue dates, deadlines, birth dates) carry no time zone.
pub type Date = chrono::NaiveDate;

/// The business calendar date: the server's local "today". Issue dates and
/// the birth-date check both use it.
pub fn today() -> Date {
    chrono::Local::now().date_naive()
}
