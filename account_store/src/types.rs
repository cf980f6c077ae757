use serde::{Deserialize, Serialize};
use sqlx::FromRow;

/// A full account row as persisted, including the password hash.
///
/// This type never crosses the crate boundary and is never serialized;
/// callers only ever see the [`AccountInfo`] projection.
#[derive(Debug, Clone, FromRow, PartialEq)]
pub(crate) struct AccountRecord {
    pub(crate) id: i64,
    pub(crate) name: String,
    pub(crate) email: String,
    /// bcrypt hash of the password, never the plaintext
    pub(crate) password: String,
}

/// Public view of an account: the only shape returned to callers
#[derive(Debug, Clone, Serialize, Deserialize, FromRow, PartialEq)]
pub struct AccountInfo {
    /// Store-assigned id, unique and monotonically increasing
    pub id: i64,
    /// Display name, no uniqueness or format constraint
    pub name: String,
    /// Login identifier, unique across all accounts, case-sensitive
    pub email: String,
}

impl From<AccountRecord> for AccountInfo {
    fn from(record: AccountRecord) -> Self {
        Self {
            id: record.id,
            name: record.name,
            email: record.email,
        }
    }
}
