//! Environment-driven configuration for the account store

use std::{env, sync::LazyLock};

/// Accounts table name
pub(crate) static DB_TABLE_ACCOUNTS: LazyLock<String> =
    LazyLock::new(|| env::var("DB_TABLE_ACCOUNTS").unwrap_or_else(|_| "accounts".to_string()));

/// bcrypt cost factor for password hashing
///
/// bcrypt accepts costs 4..=31; values outside that range make hashing fail
/// at call time. Default: 10.
pub(crate) static PASSWORD_HASH_COST: LazyLock<u32> = LazyLock::new(|| {
    env::var("PASSWORD_HASH_COST")
        .ok()
        .and_then(|v| v.parse().ok())
        .unwrap_or(10)
});

/// The fixed plaintext value a forced password reset assigns
///
/// Default: "new12345". The reset endpoint returns this value to the caller
/// in clear text, mirroring the original service's contract.
pub static RESET_PASSWORD_VALUE: LazyLock<String> =
    LazyLock::new(|| env::var("RESET_PASSWORD_VALUE").unwrap_or_else(|_| "new12345".to_string()));
