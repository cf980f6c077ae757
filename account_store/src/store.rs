//! The AccountStore component
//!
//! An explicitly constructed store owning its connection pool. Handlers
//! receive it by shared reference; there is no ambient global handle.

use std::str::FromStr;
use std::sync::LazyLock;

use crate::errors::AccountError;
use crate::password::{DUMMY_HASH, hash_password, verify_password};
use crate::storage::{
    DataStore, PostgresDataStore, SqliteDataStore, create_tables_postgres, create_tables_sqlite,
    delete_account_postgres, delete_account_sqlite, get_account_by_email_postgres,
    get_account_by_email_sqlite, get_all_accounts_postgres, get_all_accounts_sqlite,
    insert_account_postgres, insert_account_sqlite, update_password_postgres,
    update_password_sqlite, validate_account_tables_postgres, validate_account_tables_sqlite,
};
use crate::types::AccountInfo;

/// Account management over a single relational accounts table
///
/// Owns one connection pool (SQLite or Postgres). Construct it once with
/// [`AccountStore::connect`], run [`AccountStore::init`], then share it
/// behind an `Arc` across request handlers.
pub struct AccountStore {
    store: Box<dyn DataStore>,
}

impl AccountStore {
    /// Build a store from a backend type (`"sqlite"` or `"postgres"`) and a
    /// connection string. Connections are established lazily.
    pub fn connect(store_type: &str, store_url: &str) -> Result<Self, AccountError> {
        let store: Box<dyn DataStore> = match store_type {
            "sqlite" => {
                let opts = sqlx::sqlite::SqliteConnectOptions::from_str(store_url)
                    .map_err(|e| {
                        AccountError::Storage(format!("Invalid SQLite connection string: {e}"))
                    })?
                    .create_if_missing(true);

                Box::new(SqliteDataStore {
                    pool: sqlx::sqlite::SqlitePool::connect_lazy_with(opts),
                })
            }
            "postgres" => Box::new(PostgresDataStore {
                pool: sqlx::PgPool::connect_lazy(store_url).map_err(|e| {
                    AccountError::Storage(format!("Failed to create Postgres pool: {e}"))
                })?,
            }),
            t => {
                return Err(AccountError::Storage(format!(
                    "Unsupported store type: {t}. Supported types are 'sqlite' and 'postgres'"
                )));
            }
        };

        // Unknown-email logins verify against this hash; computing it now
        // keeps the first such login from also paying hash generation.
        LazyLock::force(&DUMMY_HASH);

        tracing::info!("Initialized account data store with type: {}", store_type);

        Ok(Self { store })
    }

    /// Create the accounts table if missing and validate its schema
    pub async fn init(&self) -> Result<(), AccountError> {
        match (self.store.as_sqlite(), self.store.as_postgres()) {
            (Some(pool), _) => {
                create_tables_sqlite(pool).await?;
                validate_account_tables_sqlite(pool).await?;
                Ok(())
            }
            (_, Some(pool)) => {
                create_tables_postgres(pool).await?;
                validate_account_tables_postgres(pool).await?;
                Ok(())
            }
            _ => Err(AccountError::Storage(
                "Unsupported database type".to_string(),
            )),
        }
    }

    /// Register a new account
    ///
    /// Hashes the password with bcrypt and performs one atomic insert. A
    /// duplicate email is detected by the storage engine's uniqueness
    /// constraint at insert time, never by a prior read.
    #[tracing::instrument(skip(self, password))]
    pub async fn register(
        &self,
        name: &str,
        email: &str,
        password: &str,
    ) -> Result<AccountInfo, AccountError> {
        if name.is_empty() {
            return Err(AccountError::MissingField("name"));
        }
        if email.is_empty() {
            return Err(AccountError::MissingField("email"));
        }
        if password.is_empty() {
            return Err(AccountError::MissingField("password"));
        }

        let password_hash = hash_password(password).await?;

        let result = if let Some(pool) = self.store.as_sqlite() {
            insert_account_sqlite(pool, name, email, &password_hash).await
        } else if let Some(pool) = self.store.as_postgres() {
            insert_account_postgres(pool, name, email, &password_hash).await
        } else {
            Err(AccountError::Storage(
                "Unsupported database type".to_string(),
            ))
        };

        match &result {
            Ok(account) => {
                tracing::info!(account_id = account.id, "Account created");
            }
            Err(e) => {
                tracing::warn!(error = %e, "Account registration failed");
            }
        }

        result
    }

    /// Authenticate by email and password
    ///
    /// Unknown email and wrong password both return
    /// [`AccountError::InvalidCredentials`]; the unknown-email path still
    /// burns a bcrypt verification against a fixed dummy hash so the two
    /// failures cost the same.
    #[tracing::instrument(skip(self, password))]
    pub async fn authenticate(
        &self,
        email: &str,
        password: &str,
    ) -> Result<AccountInfo, AccountError> {
        if email.is_empty() {
            return Err(AccountError::MissingField("email"));
        }
        if password.is_empty() {
            return Err(AccountError::MissingField("password"));
        }

        let record = if let Some(pool) = self.store.as_sqlite() {
            get_account_by_email_sqlite(pool, email).await
        } else if let Some(pool) = self.store.as_postgres() {
            get_account_by_email_postgres(pool, email).await
        } else {
            Err(AccountError::Storage(
                "Unsupported database type".to_string(),
            ))
        }?;

        match record {
            Some(account) => {
                if verify_password(password, &account.password).await? {
                    tracing::info!(account_id = account.id, "Login succeeded");
                    Ok(account.into())
                } else {
                    tracing::info!("Login failed: password mismatch");
                    Err(AccountError::InvalidCredentials)
                }
            }
            None => {
                // The result is discarded; this only equalizes the cost of
                // the unknown-email path with a password mismatch.
                let _ = verify_password(password, DUMMY_HASH.as_str()).await;
                tracing::info!("Login failed: unknown email");
                Err(AccountError::InvalidCredentials)
            }
        }
    }

    /// List every account's public fields, ordered by id ascending
    #[tracing::instrument(skip(self))]
    pub async fn list_accounts(&self) -> Result<Vec<AccountInfo>, AccountError> {
        if let Some(pool) = self.store.as_sqlite() {
            get_all_accounts_sqlite(pool).await
        } else if let Some(pool) = self.store.as_postgres() {
            get_all_accounts_postgres(pool).await
        } else {
            Err(AccountError::Storage(
                "Unsupported database type".to_string(),
            ))
        }
    }

    /// Delete the account with the given id
    ///
    /// Idempotent: a missing id affects zero rows and reports success, the
    /// same contract the original service exposed.
    #[tracing::instrument(skip(self))]
    pub async fn delete_account(&self, id: i64) -> Result<(), AccountError> {
        if let Some(pool) = self.store.as_sqlite() {
            delete_account_sqlite(pool, id).await?;
        } else if let Some(pool) = self.store.as_postgres() {
            delete_account_postgres(pool, id).await?;
        } else {
            return Err(AccountError::Storage(
                "Unsupported database type".to_string(),
            ));
        }

        tracing::info!(account_id = id, "Account deleted");
        Ok(())
    }

    /// Force-reset the account's password to the configured fixed value
    ///
    /// Returns the new plaintext password; the caller is expected to relay
    /// it to the user. Idempotent on a missing id, like delete.
    #[tracing::instrument(skip(self))]
    pub async fn reset_password(&self, id: i64) -> Result<String, AccountError> {
        let new_password = crate::config::RESET_PASSWORD_VALUE.clone();
        let password_hash = hash_password(&new_password).await?;

        if let Some(pool) = self.store.as_sqlite() {
            update_password_sqlite(pool, id, &password_hash).await?;
        } else if let Some(pool) = self.store.as_postgres() {
            update_password_postgres(pool, id, &password_hash).await?;
        } else {
            return Err(AccountError::Storage(
                "Unsupported database type".to_string(),
            ));
        }

        tracing::info!(account_id = id, "Password reset");
        Ok(new_password)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::RESET_PASSWORD_VALUE;

    /// Each test gets its own shared-cache in-memory SQLite database, so
    /// tests are isolated and can run in parallel.
    async fn memory_store(tag: &str) -> AccountStore {
        let url = format!(
            "sqlite:file:{tag}-{}?mode=memory&cache=shared",
            uuid::Uuid::new_v4()
        );
        let store = AccountStore::connect("sqlite", &url).expect("Failed to build SQLite store");
        store.init().await.expect("Failed to initialize store");
        store
    }

    #[test]
    fn test_connect_rejects_unknown_backend() {
        let result = AccountStore::connect("mysql", "mysql://localhost/db");
        assert!(matches!(result, Err(AccountError::Storage(_))));
    }

    #[tokio::test]
    async fn test_connect_precomputes_dummy_hash() {
        let _store = AccountStore::connect("sqlite", "sqlite::memory:")
            .expect("Failed to build SQLite store");
        assert!(
            LazyLock::get(&DUMMY_HASH).is_some(),
            "The dummy verification hash should be ready after connect"
        );
    }

    #[tokio::test]
    async fn test_init_is_idempotent() {
        let store = memory_store("init").await;
        store.init().await.expect("Re-initialization should succeed");
    }

    #[tokio::test]
    async fn test_register_assigns_strictly_increasing_ids() {
        let store = memory_store("ids").await;

        let a = store
            .register("Ana", "ana@x.com", "secret1")
            .await
            .expect("First registration should succeed");
        let b = store
            .register("Bob", "bob@x.com", "secret2")
            .await
            .expect("Second registration should succeed");
        let c = store
            .register("Cleo", "cleo@x.com", "secret3")
            .await
            .expect("Third registration should succeed");

        assert!(a.id < b.id, "ids should increase");
        assert!(b.id < c.id, "ids should increase");
    }

    #[tokio::test]
    async fn test_register_requires_all_fields() {
        let store = memory_store("validation").await;

        let result = store.register("", "ana@x.com", "secret1").await;
        assert_eq!(result, Err(AccountError::MissingField("name")));

        let result = store.register("Ana", "", "secret1").await;
        assert_eq!(result, Err(AccountError::MissingField("email")));

        let result = store.register("Ana", "ana@x.com", "").await;
        assert_eq!(result, Err(AccountError::MissingField("password")));

        // Nothing should have been persisted
        let accounts = store.list_accounts().await.expect("list should succeed");
        assert!(accounts.is_empty());
    }

    #[tokio::test]
    async fn test_register_duplicate_email_fails_once() {
        let store = memory_store("duplicate").await;

        store
            .register("Ana", "ana@x.com", "secret1")
            .await
            .expect("First registration should succeed");

        let result = store.register("Impostor", "ana@x.com", "other").await;
        assert_eq!(result, Err(AccountError::DuplicateEmail));

        // Exactly one account with that email survives
        let accounts = store.list_accounts().await.expect("list should succeed");
        let matching: Vec<_> = accounts.iter().filter(|a| a.email == "ana@x.com").collect();
        assert_eq!(matching.len(), 1);
        assert_eq!(matching[0].name, "Ana");
    }

    /// Two simultaneous registrations with the same email: exactly one
    /// wins, arbitrated by the UNIQUE constraint rather than a read.
    #[tokio::test]
    async fn test_concurrent_register_same_email_one_wins() {
        let store = memory_store("concurrent").await;

        let (r1, r2) = tokio::join!(
            store.register("First", "race@x.com", "pw-one"),
            store.register("Second", "race@x.com", "pw-two"),
        );

        assert!(
            r1.is_ok() != r2.is_ok(),
            "Exactly one concurrent registration should succeed: {r1:?} / {r2:?}"
        );

        let loser = if r1.is_ok() { r2 } else { r1 };
        assert_eq!(loser, Err(AccountError::DuplicateEmail));

        let accounts = store.list_accounts().await.expect("list should succeed");
        assert_eq!(accounts.len(), 1);
    }

    #[tokio::test]
    async fn test_authenticate_round_trip() {
        let store = memory_store("auth").await;

        let created = store
            .register("Ana", "ana@x.com", "secret1")
            .await
            .expect("Registration should succeed");

        let user = store
            .authenticate("ana@x.com", "secret1")
            .await
            .expect("Authentication should succeed");

        assert_eq!(user.id, created.id);
        assert_eq!(user.name, "Ana");
        assert_eq!(user.email, "ana@x.com");
    }

    #[tokio::test]
    async fn test_authenticate_failures_are_indistinguishable() {
        let store = memory_store("auth-fail").await;

        store
            .register("Ana", "ana@x.com", "secret1")
            .await
            .expect("Registration should succeed");

        let wrong_password = store.authenticate("ana@x.com", "wrong").await;
        let unknown_email = store.authenticate("nobody@x.com", "secret1").await;

        assert_eq!(wrong_password, Err(AccountError::InvalidCredentials));
        assert_eq!(unknown_email, Err(AccountError::InvalidCredentials));
    }

    #[tokio::test]
    async fn test_authenticate_requires_both_fields() {
        let store = memory_store("auth-validation").await;

        let result = store.authenticate("", "secret1").await;
        assert_eq!(result, Err(AccountError::MissingField("email")));

        let result = store.authenticate("ana@x.com", "").await;
        assert_eq!(result, Err(AccountError::MissingField("password")));
    }

    #[tokio::test]
    async fn test_list_accounts_public_fields_in_id_order() {
        let store = memory_store("list").await;

        store
            .register("A", "a@x.com", "pw-a")
            .await
            .expect("Registration should succeed");
        store
            .register("B", "b@x.com", "pw-b")
            .await
            .expect("Registration should succeed");

        let accounts = store.list_accounts().await.expect("list should succeed");

        assert_eq!(accounts.len(), 2);
        assert_eq!(accounts[0].name, "A");
        assert_eq!(accounts[0].email, "a@x.com");
        assert_eq!(accounts[1].name, "B");
        assert_eq!(accounts[1].email, "b@x.com");
        assert!(accounts[0].id < accounts[1].id);

        // The serialized listing carries no password material
        let json = serde_json::to_string(&accounts).expect("serialize listing");
        assert!(!json.contains("password"));
        assert!(!json.contains("$2"));
    }

    #[tokio::test]
    async fn test_delete_account_removes_row_and_is_idempotent() {
        let store = memory_store("delete").await;

        let created = store
            .register("Ana", "ana@x.com", "secret1")
            .await
            .expect("Registration should succeed");

        store
            .delete_account(created.id)
            .await
            .expect("Deleting an existing account should succeed");

        let accounts = store.list_accounts().await.expect("list should succeed");
        assert!(accounts.is_empty(), "Deleted account should be gone");

        // Deleting again, or deleting an id that never existed, still succeeds
        store
            .delete_account(created.id)
            .await
            .expect("Deleting a missing id should succeed");
        store
            .delete_account(999_999)
            .await
            .expect("Deleting a never-assigned id should succeed");
    }

    #[tokio::test]
    async fn test_deleted_ids_are_not_reused() {
        let store = memory_store("id-reuse").await;

        let first = store
            .register("Ana", "ana@x.com", "secret1")
            .await
            .expect("Registration should succeed");
        store
            .delete_account(first.id)
            .await
            .expect("Delete should succeed");

        let second = store
            .register("Bob", "bob@x.com", "secret2")
            .await
            .expect("Registration should succeed");

        assert!(second.id > first.id, "Freed ids must never be reassigned");
    }

    #[tokio::test]
    async fn test_reset_password_rotates_credentials() {
        let store = memory_store("reset").await;

        let created = store
            .register("Ana", "ana@x.com", "secret1")
            .await
            .expect("Registration should succeed");

        let new_password = store
            .reset_password(created.id)
            .await
            .expect("Reset should succeed");
        assert_eq!(new_password, *RESET_PASSWORD_VALUE);

        // The old password no longer works; the returned one does
        let old = store.authenticate("ana@x.com", "secret1").await;
        assert_eq!(old, Err(AccountError::InvalidCredentials));

        let user = store
            .authenticate("ana@x.com", &new_password)
            .await
            .expect("New password should authenticate");
        assert_eq!(user.id, created.id);
    }

    #[tokio::test]
    async fn test_reset_password_on_missing_id_reports_success() {
        let store = memory_store("reset-missing").await;

        let new_password = store
            .reset_password(42)
            .await
            .expect("Reset on a missing id should succeed");
        assert_eq!(new_password, *RESET_PASSWORD_VALUE);

        let accounts = store.list_accounts().await.expect("list should succeed");
        assert!(accounts.is_empty(), "No account should have been created");
    }
}
