use sqlx::{Pool, Sqlite};

use crate::config::DB_TABLE_ACCOUNTS;
use crate::errors::AccountError;
use crate::types::{AccountInfo, AccountRecord};

use super::map_insert_error;
use super::schema::validate_sqlite_table_schema;

// SQLite implementations
pub(crate) async fn create_tables_sqlite(pool: &Pool<Sqlite>) -> Result<(), AccountError> {
    let table_name = DB_TABLE_ACCOUNTS.as_str();

    // AUTOINCREMENT keeps ids monotonic and never reused, even after deletes
    sqlx::query(&format!(
        r#"
        CREATE TABLE IF NOT EXISTS {table_name} (
            id INTEGER PRIMARY KEY AUTOINCREMENT,
            name TEXT NOT NULL,
            email TEXT NOT NULL UNIQUE,
            password TEXT NOT NULL
        )
        "#
    ))
    .execute(pool)
    .await
    .map_err(|e| AccountError::Storage(e.to_string()))?;

    Ok(())
}

/// Validates that the accounts table schema matches what we expect
pub(crate) async fn validate_account_tables_sqlite(pool: &Pool<Sqlite>) -> Result<(), AccountError> {
    let table_name = DB_TABLE_ACCOUNTS.as_str();

    let expected_columns = vec![
        ("id", "INTEGER"),
        ("name", "TEXT"),
        ("email", "TEXT"),
        ("password", "TEXT"),
    ];

    validate_sqlite_table_schema(pool, table_name, &expected_columns, AccountError::Storage).await
}

pub(crate) async fn insert_account_sqlite(
    pool: &Pool<Sqlite>,
    name: &str,
    email: &str,
    password_hash: &str,
) -> Result<AccountInfo, AccountError> {
    // Ensure tables exist before any operations - this is critical for in-memory databases
    create_tables_sqlite(pool).await?;

    let table_name = DB_TABLE_ACCOUNTS.as_str();

    // Single atomic insert; the UNIQUE constraint on email is the sole
    // arbiter of duplicates, so concurrent registrations cannot both win
    let result = sqlx::query(&format!(
        r#"
        INSERT INTO {table_name} (name, email, password) VALUES (?, ?, ?)
        "#
    ))
    .bind(name)
    .bind(email)
    .bind(password_hash)
    .execute(pool)
    .await
    .map_err(map_insert_error)?;

    Ok(AccountInfo {
        id: result.last_insert_rowid(),
        name: name.to_string(),
        email: email.to_string(),
    })
}

pub(crate) async fn get_account_by_email_sqlite(
    pool: &Pool<Sqlite>,
    email: &str,
) -> Result<Option<AccountRecord>, AccountError> {
    // Ensure tables exist before any operations - this is critical for in-memory databases
    create_tables_sqlite(pool).await?;

    let table_name = DB_TABLE_ACCOUNTS.as_str();

    sqlx::query_as::<_, AccountRecord>(&format!(
        r#"
        SELECT * FROM {table_name} WHERE email = ?
        "#
    ))
    .bind(email)
    .fetch_optional(pool)
    .await
    .map_err(|e| AccountError::Storage(e.to_string()))
}

pub(crate) async fn get_all_accounts_sqlite(
    pool: &Pool<Sqlite>,
) -> Result<Vec<AccountInfo>, AccountError> {
    // Ensure tables exist before any operations - this is critical for in-memory databases
    create_tables_sqlite(pool).await?;

    let table_name = DB_TABLE_ACCOUNTS.as_str();

    sqlx::query_as::<_, AccountInfo>(&format!(
        r#"
        SELECT id, name, email FROM {table_name} ORDER BY id ASC
        "#
    ))
    .fetch_all(pool)
    .await
    .map_err(|e| AccountError::Storage(e.to_string()))
}

pub(crate) async fn delete_account_sqlite(
    pool: &Pool<Sqlite>,
    id: i64,
) -> Result<(), AccountError> {
    // Ensure tables exist before any operations - this is critical for in-memory databases
    create_tables_sqlite(pool).await?;

    let table_name = DB_TABLE_ACCOUNTS.as_str();

    // Deleting a missing id affects zero rows and still reports success
    sqlx::query(&format!(
        r#"
        DELETE FROM {table_name} WHERE id = ?
        "#
    ))
    .bind(id)
    .execute(pool)
    .await
    .map_err(|e| AccountError::Storage(e.to_string()))?;

    Ok(())
}

pub(crate) async fn update_password_sqlite(
    pool: &Pool<Sqlite>,
    id: i64,
    password_hash: &str,
) -> Result<(), AccountError> {
    // Ensure tables exist before any operations - this is critical for in-memory databases
    create_tables_sqlite(pool).await?;

    let table_name = DB_TABLE_ACCOUNTS.as_str();

    // Same idempotence posture as delete: zero affected rows is success
    sqlx::query(&format!(
        r#"
        UPDATE {table_name} SET password = ? WHERE id = ?
        "#
    ))
    .bind(password_hash)
    .bind(id)
    .execute(pool)
    .await
    .map_err(|e| AccountError::Storage(e.to_string()))?;

    Ok(())
}
