//! Axum integration for the account-store library
//!
//! Exposes the five account operations over HTTP with JSON bodies:
//!
//! - `POST /signup`
//! - `POST /login`
//! - `GET /users`
//! - `DELETE /users/{id}`
//! - `PUT /users/{id}/reset`
//!
//! Response bodies and status codes follow the original service contract,
//! including its documented sharp edges: the administrative endpoints
//! carry no authentication and the reset endpoint returns the new
//! plaintext password.

mod error;
mod handlers;
mod router;

pub use router::{account_router, account_router_no_trace};

// Re-export the core types so binaries only need one direct dependency
pub use account_store::{AccountError, AccountInfo, AccountStore};
