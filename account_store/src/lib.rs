//! account-store - minimal email/password account management
//!
//! This crate provides the [`AccountStore`] component: a thin, explicitly
//! constructed wrapper around a relational accounts table (SQLite or
//! Postgres via sqlx) plus a bcrypt password-hashing layer.
//!
//! The store exposes five operations: register, authenticate, list,
//! delete, and force password reset. Password hashes never leave the
//! crate; every operation returns the public [`AccountInfo`] view only.

mod config;
mod errors;
mod password;
mod storage;
mod store;
mod types;

pub use config::RESET_PASSWORD_VALUE;
pub use errors::AccountError;
pub use store::AccountStore;
pub use types::AccountInfo;
