//! Configuration module
//!
//! Server configuration loaded from the environment (and an optional `.env` file):
//! database, HTTP, media host key pair and account settings.

use std::env;
use std::fmt;
use std::str::FromStr;

// Common constants
const SERVER_PORT: u16 = 4000;
const MAX_CONNECTIONS: u32 = 20;
const CONNECTION_TIMEOUT_SECS: u64 = 30;
const UPLOAD_CREDENTIAL_TTL_SECS: i64 = 30 * 60;
const BCRYPT_COST: u32 = 10;
const MAX_BODY_BYTES: usize = 1024 * 1024;

/// The media host refuses signatures that expire more than one hour ahead.
pub const MAX_UPLOAD_CREDENTIAL_TTL_SECS: i64 = 60 * 60;

/// Public/private key pair issued by the media host.
///
/// The private key is only ever read by the credential issuer; `Debug` redacts it.
#[derive(Clone, Default)]
pub struct MediaHostKeys {
    pub public_key: Option<String>,
    pub private_key: Option<String>,
}

impl fmt::Debug for MediaHostKeys {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("MediaHostKeys")
            .field("public_key", &self.public_key)
            .field(
                "private_key",
                &self.private_key.as_ref().map(|_| "[REDACTED]"),
            )
            .finish()
    }
}

/// Application configuration.
#[derive(Clone, Debug)]
pub struct Config {
    pub server_port: u16,
    pub environment: String,
    pub cors_origins: Vec<String>,
    pub database_url: String,
    pub db_max_connections: u32,
    pub db_timeout_seconds: u64,
    pub media_host: MediaHostKeys,
    pub upload_credential_ttl_secs: i64,
    pub bcrypt_cost: u32,
    pub max_body_bytes: usize,
}

impl Config {
    pub fn from_env() -> Result<Self, anyhow::Error> {
        dotenvy::dotenv().ok();

        let environment = env::var("ENVIRONMENT")
            .or_else(|_| env::var("APP_ENV"))
            .unwrap_or_else(|_| "development".to_string());

        let cors_origins_str = env::var("CORS_ORIGINS").unwrap_or_else(|_| "*".to_string());
        let is_production =
            environment.to_lowercase() == "production" || environment.to_lowercase() == "prod";
        if is_production && cors_origins_str.trim() == "*" {
            return Err(anyhow::anyhow!(
                "CORS_ORIGINS cannot be '*' in production. Please specify explicit origins."
            ));
        }

        let cors_origins: Vec<String> = cors_origins_str
            .split(',')
            .map(|s| s.trim().to_string())
            .filter(|s| !s.is_empty())
            .collect();

        let database_url = env::var("DATABASE_URL")
            .map_err(|_| anyhow::anyhow!("DATABASE_URL must be set"))?;

        let config = Config {
            server_port: number_var("PORT", SERVER_PORT)?,
            environment,
            cors_origins,
            database_url,
            db_max_connections: number_var("DB_MAX_CONNECTIONS", MAX_CONNECTIONS)?,
            db_timeout_seconds: number_var("DB_TIMEOUT_SECONDS", CONNECTION_TIMEOUT_SECS)?,
            media_host: MediaHostKeys {
                public_key: non_blank_var("MEDIA_HOST_PUBLIC_KEY"),
                private_key: non_blank_var("MEDIA_HOST_PRIVATE_KEY"),
            },
            upload_credential_ttl_secs: number_var(
                "UPLOAD_CREDENTIAL_TTL_SECS",
                UPLOAD_CREDENTIAL_TTL_SECS,
            )?,
            bcrypt_cost: number_var("BCRYPT_COST", BCRYPT_COST)?,
            max_body_bytes: number_var("MAX_BODY_BYTES", MAX_BODY_BYTES)?,
        };

        Ok(config)
    }

    /// Check values that parse fine but cannot work at runtime.
    pub fn validate(&self) -> Result<(), anyhow::Error> {
        if self.database_url.trim().is_empty() {
            anyhow::bail!("DATABASE_URL must not be empty");
        }
        if self.db_max_connections == 0 {
            anyhow::bail!("DB_MAX_CONNECTIONS must be at least 1");
        }
        if self.upload_credential_ttl_secs <= 0
            || self.upload_credential_ttl_secs > MAX_UPLOAD_CREDENTIAL_TTL_SECS
        {
            anyhow::bail!(
                "UPLOAD_CREDENTIAL_TTL_SECS must be between 1 and {}",
                MAX_UPLOAD_CREDENTIAL_TTL_SECS
            );
        }
        // bcrypt only accepts costs in 4..=31
        if !(4..=31).contains(&self.bcrypt_cost) {
            anyhow::bail!("BCRYPT_COST must be between 4 and 31");
        }
        Ok(())
    }

    /// Check if the application is running in production mode
    pub fn is_production(&self) -> bool {
        let env = self.environment.to_lowercase();
        env == "production" || env == "prod"
    }
}

fn non_blank_var(key: &str) -> Option<String> {
    env::var(key).ok().filter(|v| !v.trim().is_empty())
}

/// Numeric variable, `default` when unset. A set but unparsable value is an error.
fn number_var<T: FromStr>(key: &str, default: T) -> Result<T, anyhow::Error> {
    parse_number(key, env::var(key).ok(), default)
}

fn parse_number<T: FromStr>(key: &str, raw: Option<String>, default: T) -> Result<T, anyhow::Error> {
    match raw {
        None => Ok(default),
        Some(value) => value
            .trim()
            .parse()
            .map_err(|_| anyhow::anyhow!("{} must be a valid number", key)),
    }
}

#[cfg(test)]
impl Config {
    /// Minimal configuration for unit tests.
    pub fn for_tests() -> Self {
        Config {
            server_port: SERVER_PORT,
            environment: "test".to_string(),
            cors_origins: vec!["*".to_string()],
            database_url: "postgres://localhost/reelvault".to_string(),
            db_max_connections: MAX_CONNECTIONS,
            db_timeout_seconds: CONNECTION_TIMEOUT_SECS,
            media_host: MediaHostKeys::default(),
            upload_credential_ttl_secs: UPLOAD_CREDENTIAL_TTL_SECS,
            bcrypt_cost: BCRYPT_COST,
            max_body_bytes: MAX_BODY_BYTES,
        }
    }
}
