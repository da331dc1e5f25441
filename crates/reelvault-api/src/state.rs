//! Application state shared by every handler.

use reelvault_core::Config;
use reelvault_db::{AccountStore, AssetStore, ConnectionStatus};
use std::sync::Arc;

use crate::services::{AccountService, AssetService, CredentialIssuer};

#[derive(Clone)]
pub struct AppState {
    pub credentials: CredentialIssuer,
    pub accounts: AccountService,
    pub assets: AssetService,
    /// Lifecycle of the database connection, for health reporting
    pub database: Arc<dyn ConnectionStatus>,
}

impl AppState {
    pub fn new(
        config: &Config,
        asset_store: Arc<dyn AssetStore>,
        account_store: Arc<dyn AccountStore>,
        database: Arc<dyn ConnectionStatus>,
    ) -> Self {
        let credentials =
            CredentialIssuer::new(&config.media_host, config.upload_credential_ttl_secs);
        let accounts = AccountService::new(account_store, config.bcrypt_cost);
        let assets = AssetService::new(asset_store);

        Self {
            credentials,
            accounts,
            assets,
            database,
        }
    }
}
