use std::{env, io::Write};

use chrono::Duration;
use ck_common::Secret;
use log::*;
use rand::{distributions::Alphanumeric, Rng};
use serde_json::json;
use tempfile::NamedTempFile;

use crate::errors::ServerError;

const DEFAULT_CK_HOST: &str = "127.0.0.1";
const DEFAULT_CK_PORT: u16 = 5000;
const DEFAULT_TOKEN_EXPIRY: Duration = Duration::days(7);
const MIN_SECRET_LEN: usize = 32;

#[derive(Clone, Debug)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
    pub database_url: String,
    pub auth: AuthConfig,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: DEFAULT_CK_HOST.to_string(),
            port: DEFAULT_CK_PORT,
            database_url: String::default(),
            auth: AuthConfig::default(),
        }
    }
}

impl ServerConfig {
    pub fn new(host: &str, port: u16) -> Self {
        Self { host: host.to_string(), port, ..Default::default() }
    }

    pub fn from_env_or_default() -> Self {
        let host = env::var("CK_HOST").ok().unwrap_or_else(|| DEFAULT_CK_HOST.into());
        let port = env::var("CK_PORT")
            .map(|s| {
                s.parse::<u16>().unwrap_or_else(|e| {
                    error!("🪛️ {s} is not a valid port for CK_PORT. {e} Using the default, {DEFAULT_CK_PORT}, instead.");
                    DEFAULT_CK_PORT
                })
            })
            .ok()
            .unwrap_or(DEFAULT_CK_PORT);
        let database_url = env::var("CK_DATABASE_URL").ok().unwrap_or_else(|| {
            error!("🪛️ CK_DATABASE_URL is not set. Please set it to the URL for the CoinKeeper database.");
            String::default()
        });
        let auth = AuthConfig::try_from_env().unwrap_or_else(|e| {
            warn!(
                "🪛️ Could not load the authentication configuration from environment variables. {e}. Reverting to the \
                 default configuration."
            );
            AuthConfig::default()
        });
        Self { host, port, database_url, auth }
    }
}

//-------------------------------------------------  AuthConfig  -------------------------------------------------------
#[derive(Clone, Debug)]
pub struct AuthConfig {
    /// The secret used to sign and verify access tokens (HMAC-SHA256).
    pub jwt_secret: Secret<String>,
    /// How long issued access tokens stay valid.
    pub token_expiry: Duration,
}

impl Default for AuthConfig {
    fn default() -> Self {
        let mut tmpfile = NamedTempFile::new().ok().and_then(|f| f.keep().ok());
        warn!(
            "🚨️🚨️🚨️ The JWT signing secret has not been set. I'm using a random value for this session. DO NOT \
             operate on production like this since every user session will be invalidated when the server restarts. \
             🚨️🚨️🚨️"
        );
        let secret: String = rand::thread_rng().sample_iter(&Alphanumeric).take(64).map(char::from).collect();
        match &mut tmpfile {
            Some((f, p)) => {
                let key_data = json!({ "jwt_secret": secret }).to_string();
                match writeln!(f, "{key_data}") {
                    Ok(()) => warn!(
                        "🚨️🚨️🚨️ The JWT signing secret for this session was written to {}. If this is a production \
                         instance, you are doing it wrong! Set the CK_JWT_SECRET environment variable instead. 🚨️🚨️🚨️",
                        p.to_str().unwrap_or("???")
                    ),
                    Err(e) => warn!("🪛️ Could not write the JWT signing secret to the temporary file. {e}"),
                }
            },
            None => {
                warn!("🪛️ Could not create a temporary file to store the JWT signing secret. ");
            },
        }
        Self { jwt_secret: Secret::new(secret), token_expiry: DEFAULT_TOKEN_EXPIRY }
    }
}

impl AuthConfig {
    pub fn try_from_env() -> Result<Self, ServerError> {
        let secret =
            env::var("CK_JWT_SECRET").map_err(|e| ServerError::ConfigurationError(format!("{e} [CK_JWT_SECRET]")))?;
        if secret.len() < MIN_SECRET_LEN {
            return Err(ServerError::ConfigurationError(format!(
                "CK_JWT_SECRET must be at least {MIN_SECRET_LEN} characters long"
            )));
        }
        let token_expiry = env::var("CK_TOKEN_EXPIRY_DAYS")
            .map_err(|_| {
                info!(
                    "🪛️ CK_TOKEN_EXPIRY_DAYS is not set. Using the default value of {} days.",
                    DEFAULT_TOKEN_EXPIRY.num_days()
                )
            })
            .and_then(|s| {
                s.parse::<i64>()
                    .map(Duration::days)
                    .map_err(|e| warn!("🪛️ Invalid configuration value for CK_TOKEN_EXPIRY_DAYS. {e}"))
            })
            .ok()
            .unwrap_or(DEFAULT_TOKEN_EXPIRY);
        Ok(Self { jwt_secret: Secret::new(secret), token_expiry })
    }
}
