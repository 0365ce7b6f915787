//! ** idgen module **
//! Random identifiers: v4 uuids for new records and the textual conflict token.
use uuid::Uuid;

/// Fresh identity for a record being written for the first time.
pub fn new_id() -> Uuid {
    Uuid::new_v4()
}

/// Random suffix used when every candidate slug is taken.
///
/// Canonical lowercase hyphenated form of a v4 uuid (122 random bits).
pub fn conflict_token() -> String {
    Uuid::new_v4().hyphenated().to_string()
}
