use sqlx::{Pool, Postgres};

use crate::config::DB_TABLE_ACCOUNTS;
use crate::errors::AccountError;
use crate::types::{AccountInfo, AccountRecord};

use super::map_insert_error;
use super::schema::validate_postgres_table_schema;

// PostgreSQL implementations
pub(crate) async fn create_tables_postgres(pool: &Pool<Postgres>) -> Result<(), AccountError> {
    let table_name = DB_TABLE_ACCOUNTS.as_str();

    sqlx::query(&format!(
        r#"
        CREATE TABLE IF NOT EXISTS {table_name} (
            id BIGSERIAL PRIMARY KEY,
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
pub(crate) async fn validate_account_tables_postgres(
    pool: &Pool<Postgres>,
) -> Result<(), AccountError> {
    let table_name = DB_TABLE_ACCOUNTS.as_str();

    let expected_columns = vec![
        ("id", "bigint"),
        ("name", "text"),
        ("email", "text"),
        ("password", "text"),
    ];

    validate_postgres_table_schema(pool, table_name, &expected_columns, AccountError::Storage).await
}

pub(crate) async fn insert_account_postgres(
    pool: &Pool<Postgres>,
    name: &str,
    email: &str,
    password_hash: &str,
) -> Result<AccountInfo, AccountError> {
    let table_name = DB_TABLE_ACCOUNTS.as_str();

    // Single atomic insert; the UNIQUE constraint on email is the sole
    // arbiter of duplicates, so concurrent registrations cannot both win
    let id: i64 = sqlx::query_scalar(&format!(
        r#"
        INSERT INTO {table_name} (name, email, password) VALUES ($1, $2, $3) RETURNING id
        "#
    ))
    .bind(name)
    .bind(email)
    .bind(password_hash)
    .fetch_one(pool)
    .await
    .map_err(map_insert_error)?;

    Ok(AccountInfo {
        id,
        name: name.to_string(),
        email: email.to_string(),
    })
}

pub(crate) async fn get_account_by_email_postgres(
    pool: &Pool<Postgres>,
    email: &str,
) -> Result<Option<AccountRecord>, AccountError> {
    let table_name = DB_TABLE_ACCOUNTS.as_str();

    sqlx::query_as::<_, AccountRecord>(&format!(
        r#"
        SELECT * FROM {table_name} WHERE email = $1
        "#
    ))
    .bind(email)
    .fetch_optional(pool)
    .await
    .map_err(|e| AccountError::Storage(e.to_string()))
}

pub(crate) async fn get_all_accounts_postgres(
    pool: &Pool<Postgres>,
) -> Result<Vec<AccountInfo>, AccountError> {
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

pub(crate) async fn delete_account_postgres(
    pool: &Pool<Postgres>,
    id: i64,
) -> Result<(), AccountError> {
    let table_name = DB_TABLE_ACCOUNTS.as_str();

    // Deleting a missing id affects zero rows and still reports success
    sqlx::query(&format!(
        r#"
        DELETE FROM {table_name} WHERE id = $1
        "#
    ))
    .bind(id)
    .execute(pool)
    .await
    .map_err(|e| AccountError::Storage(e.to_string()))?;

    Ok(())
}

pub(crate) async fn update_password_postgres(
    pool: &Pool<Postgres>,
    id: i64,
    password_hash: &str,
) -> Result<(), AccountError> {
    let table_name = DB_TABLE_ACCOUNTS.as_str();

    // Same idempotence posture as delete: zero affected rows is success
    sqlx::query(&format!(
        r#"
        UPDATE {table_name} SET password = $1 WHERE id = $2
        "#
    ))
    .bind(password_hash)
    .bind(id)
    .execute(pool)
    .await
    .map_err(|e| AccountError::Storage(e.to_string()))?;

    Ok(())
}
