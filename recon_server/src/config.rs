use std::{env, time::Duration};

use log::*;
use midtrans_tools::MidtransConfig;
use recon_common::helpers::{env_flag, env_millis};
use recon_engine::helpers::{Backoff, RetryPolicy};

use crate::errors::ServerError;

const DEFAULT_RECON_HOST: &str = "127.0.0.1";
const DEFAULT_RECON_PORT: u16 = 8370;
const DEFAULT_DATABASE_URL: &str = "sqlite://data/recon_store.db";
const DEFAULT_STORE_MAX_ATTEMPTS: u32 = 3;
const DEFAULT_STORE_RETRY_DELAY: Duration = Duration::from_millis(1000);
const DEFAULT_STORE_TIMEOUT: Duration = Duration::from_millis(10_000);

#[derive(Clone, Debug)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
    pub database_url: String,
    /// Processor credentials and environment
    pub midtrans: MidtransConfig,
    /// Total attempts at saving a payment status, including the first.
    pub store_max_attempts: u32,
    /// The wait after the first failed save. Later waits grow linearly.
    pub store_retry_delay: Duration,
    /// Upper bound for a single save attempt.
    pub store_timeout: Duration,
    pub options: ServerOptions,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: DEFAULT_RECON_HOST.to_string(),
            port: DEFAULT_RECON_PORT,
            database_url: DEFAULT_DATABASE_URL.to_string(),
            midtrans: MidtransConfig::default(),
            store_max_attempts: DEFAULT_STORE_MAX_ATTEMPTS,
            store_retry_delay: DEFAULT_STORE_RETRY_DELAY,
            store_timeout: DEFAULT_STORE_TIMEOUT,
            options: ServerOptions::default(),
        }
    }
}

impl ServerConfig {
    pub fn new(host: &str, port: u16) -> Self {
        Self { host: host.to_string(), port, ..Default::default() }
    }

    pub fn from_env_or_default() -> Self {
        let host = env::var("RECON_HOST").ok().unwrap_or_else(|| DEFAULT_RECON_HOST.into());
        let port = env::var("RECON_PORT")
            .map(|s| {
                s.parse::<u16>().unwrap_or_else(|e| {
                    error!(
                        "🪛️ {s} is not a valid port for RECON_PORT. {e} Using the default, {DEFAULT_RECON_PORT}, \
                         instead."
                    );
                    DEFAULT_RECON_PORT
                })
            })
            .ok()
            .unwrap_or(DEFAULT_RECON_PORT);
        let database_url = env::var("RECON_DATABASE_URL").ok().unwrap_or_else(|| {
            warn!("🪛️ RECON_DATABASE_URL is not set. Using the default, {DEFAULT_DATABASE_URL}.");
            DEFAULT_DATABASE_URL.to_string()
        });
        let midtrans = MidtransConfig::new_from_env_or_default();
        let store_max_attempts = env::var("RECON_STORE_MAX_ATTEMPTS")
            .map_err(|_| info!("🪛️ RECON_STORE_MAX_ATTEMPTS is not set. Using {DEFAULT_STORE_MAX_ATTEMPTS}."))
            .and_then(|s| {
                s.parse::<u32>()
                    .map_err(|e| warn!("🪛️ Invalid configuration value for RECON_STORE_MAX_ATTEMPTS. {e}"))
            })
            .ok()
            .filter(|n| *n > 0)
            .unwrap_or(DEFAULT_STORE_MAX_ATTEMPTS);
        let store_retry_delay = env_millis("RECON_STORE_RETRY_DELAY_MS").unwrap_or_else(|| {
            info!("🪛️ RECON_STORE_RETRY_DELAY_MS is not set. Using {}ms.", DEFAULT_STORE_RETRY_DELAY.as_millis());
            DEFAULT_STORE_RETRY_DELAY
        });
        let store_timeout = env_millis("RECON_STORE_TIMEOUT_MS").unwrap_or_else(|| {
            info!("🪛️ RECON_STORE_TIMEOUT_MS is not set. Using {}ms.", DEFAULT_STORE_TIMEOUT.as_millis());
            DEFAULT_STORE_TIMEOUT
        });
        let options = ServerOptions::from_env_or_default();
        Self { host, port, database_url, midtrans, store_max_attempts, store_retry_delay, store_timeout, options }
    }

    /// Refuses configurations the server cannot run safely with. Without a server key every notification signature
    /// could be forged.
    pub fn validate(&self) -> Result<(), ServerError> {
        if !self.midtrans.server_key.is_set() {
            return Err(ServerError::ConfigurationError(
                "RECON_MIDTRANS_SERVER_KEY must be set to verify payment notifications".into(),
            ));
        }
        Ok(())
    }

    /// The retry policy for payment status writes.
    pub fn retry_policy(&self) -> RetryPolicy {
        RetryPolicy::new(self.store_max_attempts, self.store_retry_delay, Backoff::Linear)
            .with_attempt_timeout(Some(self.store_timeout))
    }
}

//-------------------------------------------------  ServerOptions  ----------------------------------------------------
/// The switches that change how handlers behave. Holds no secrets, so it is shared with every request.
#[derive(Clone, Copy, Debug)]
pub struct ServerOptions {
    /// Reject notifications whose content type is not `application/json`.
    pub strict_content_type: bool,
    /// Answer 200 to authentic notifications whose status does not correspond to any payment status, so that the
    /// processor stops redelivering them.
    pub ack_unmapped_statuses: bool,
    /// Check every notification against the processor's own record before applying it.
    pub confirm_with_processor: bool,
}

impl Default for ServerOptions {
    fn default() -> Self {
        Self { strict_content_type: true, ack_unmapped_statuses: false, confirm_with_processor: false }
    }
}

impl ServerOptions {
    pub fn from_env_or_default() -> Self {
        let defaults = Self::default();
        let strict_content_type = env_flag("RECON_STRICT_CONTENT_TYPE", defaults.strict_content_type);
        if !strict_content_type {
            warn!("🪛️ Notifications will be accepted regardless of their content type");
        }
        let ack_unmapped_statuses = env_flag("RECON_ACK_UNMAPPED_STATUSES", defaults.ack_unmapped_statuses);
        let confirm_with_processor = env_flag("RECON_CONFIRM_WITH_PROCESSOR", defaults.confirm_with_processor);
        if confirm_with_processor {
            info!("🪛️ Notifications will be confirmed with the payment processor before they are applied");
        }
        Self { strict_content_type, ack_unmapped_statuses, confirm_with_processor }
    }
}
