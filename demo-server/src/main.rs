//! Runnable account service: store construction plus the axum router.
//!
//! Configuration comes from the environment (optionally via a `.env`
//! file): `ACCOUNT_STORE_TYPE`, `ACCOUNT_STORE_URL` and `PORT`.

mod server;

use std::env;
use std::sync::Arc;

use account_store::AccountStore;
use account_store_axum::account_router;

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    dotenvy::dotenv().ok();
    server::init_tracing("demo_server");

    let store_type = env::var("ACCOUNT_STORE_TYPE").unwrap_or_else(|_| "sqlite".to_string());
    let store_url = env::var("ACCOUNT_STORE_URL").unwrap_or_else(|_| "sqlite:accounts.db".to_string());

    let store = Arc::new(AccountStore::connect(&store_type, &store_url)?);
    store.init().await?;

    let app = account_router(store);

    let port = env::var("PORT")
        .ok()
        .and_then(|p| p.parse().ok())
        .unwrap_or(3000);
    server::serve_http(port, app).await?;

    Ok(())
}
