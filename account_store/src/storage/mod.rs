mod data_store;
mod postgres;
mod schema;
mod sqlite;

pub(crate) use data_store::{DataStore, PostgresDataStore, SqliteDataStore};
pub(crate) use postgres::*;
pub(crate) use sqlite::*;

use crate::errors::AccountError;

/// Map a sqlx error from an INSERT into the domain error, letting the
/// storage engine's uniqueness constraint arbitrate duplicate emails.
pub(crate) fn map_insert_error(err: sqlx::Error) -> AccountError {
    match &err {
        sqlx::Error::Database(e) if e.is_unique_violation() => AccountError::DuplicateEmail,
        _ => AccountError::Storage(err.to_string()),
    }
}
