//! Test helpers: build the router over in-memory stores.
//!
//! Run from workspace root: `cargo test -p reelvault-api`.

#![allow(dead_code)]

use axum_test::TestServer;
use reelvault_api::setup::routes;
use reelvault_api::state::AppState;
use reelvault_core::config::MediaHostKeys;
use reelvault_core::Config;
use reelvault_db::test_helpers::{FixedConnectionStatus, InMemoryAccountStore, InMemoryAssetStore};
use reelvault_db::ConnectionState;
use std::sync::Arc;

pub const TEST_PUBLIC_KEY: &str = "public_test_key";
pub const TEST_PRIVATE_KEY: &str = "private_test_key_do_not_leak";

/// API path prefix for tests.
pub fn api_path(path: &str) -> String {
    format!("{}{}", reelvault_api::constants::API_PREFIX, path)
}

pub fn test_config(media_host: MediaHostKeys) -> Config {
    Config {
        server_port: 0,
        environment: "test".to_string(),
        cors_origins: vec!["*".to_string()],
        database_url: "postgres://localhost/reelvault_test".to_string(),
        db_max_connections: 1,
        db_timeout_seconds: 1,
        media_host,
        upload_credential_ttl_secs: 1800,
        // Minimum bcrypt cost keeps registration tests fast
        bcrypt_cost: 4,
        max_body_bytes: 64 * 1024,
    }
}

pub fn test_keys() -> MediaHostKeys {
    MediaHostKeys {
        public_key: Some(TEST_PUBLIC_KEY.to_string()),
        private_key: Some(TEST_PRIVATE_KEY.to_string()),
    }
}

/// Test application: server plus handles on the backing stores.
pub struct TestApp {
    pub server: TestServer,
    pub assets: InMemoryAssetStore,
    pub accounts: InMemoryAccountStore,
}

impl TestApp {
    pub fn client(&self) -> &TestServer {
        &self.server
    }
}

pub fn setup_test_app() -> TestApp {
    setup_test_app_with_keys(test_keys())
}

pub fn setup_test_app_with_keys(media_host: MediaHostKeys) -> TestApp {
    let config = test_config(media_host);
    let assets = InMemoryAssetStore::new();
    let accounts = InMemoryAccountStore::new();

    let state = Arc::new(AppState::new(
        &config,
        Arc::new(assets.clone()),
        Arc::new(accounts.clone()),
        Arc::new(FixedConnectionStatus(ConnectionState::Established)),
    ));
    let router = routes::setup_routes(&config, state).expect("Failed to build router");
    let server = TestServer::new(router).expect("Failed to start test server");

    TestApp {
        server,
        assets,
        accounts,
    }
}
