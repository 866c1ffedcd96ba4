use std::{fmt::Display, time::Duration};

use log::*;
use recon_common::{
    helpers::{env_flag, env_millis},
    Secret,
};

const DEFAULT_TIMEOUT: Duration = Duration::from_secs(10);

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum MidtransEnvironment {
    #[default]
    Sandbox,
    Production,
}

impl MidtransEnvironment {
    pub fn core_api_url(&self) -> &'static str {
        match self {
            Self::Sandbox => "https://api.sandbox.midtrans.com",
            Self::Production => "https://api.midtrans.com",
        }
    }

    pub fn snap_api_url(&self) -> &'static str {
        match self {
            Self::Sandbox => "https://app.sandbox.midtrans.com/snap/v1",
            Self::Production => "https://app.midtrans.com/snap/v1",
        }
    }
}

impl Display for MidtransEnvironment {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Sandbox => write!(f, "sandbox"),
            Self::Production => write!(f, "production"),
        }
    }
}

#[derive(Debug, Clone, Default)]
pub struct MidtransConfig {
    /// The merchant's server key. It authenticates API calls and is the shared secret behind notification
    /// signatures.
    pub server_key: Secret<String>,
    /// The client key is only used by front-end Snap integrations. We carry it so that it can be handed to clients.
    pub client_key: String,
    pub environment: MidtransEnvironment,
    /// Upper bound for every request made to the processor.
    pub timeout: Duration,
}

impl MidtransConfig {
    pub fn new(server_key: &str, environment: MidtransEnvironment) -> Self {
        Self {
            server_key: Secret::new(server_key.to_string()),
            client_key: String::default(),
            environment,
            timeout: DEFAULT_TIMEOUT,
        }
    }

    pub fn new_from_env_or_default() -> Self {
        let server_key = Secret::new(std::env::var("RECON_MIDTRANS_SERVER_KEY").unwrap_or_else(|_| {
            error!(
                "🪛️ RECON_MIDTRANS_SERVER_KEY is not set. Notifications cannot be verified and processor calls will \
                 be rejected until it is."
            );
            String::default()
        }));
        let client_key = std::env::var("RECON_MIDTRANS_CLIENT_KEY").unwrap_or_else(|_| {
            warn!("🪛️ RECON_MIDTRANS_CLIENT_KEY not set, using an empty client key");
            String::default()
        });
        let environment = if env_flag("RECON_MIDTRANS_PRODUCTION", false) {
            MidtransEnvironment::Production
        } else {
            MidtransEnvironment::Sandbox
        };
        info!("🪛️ Using the Midtrans {environment} environment");
        let timeout = env_millis("RECON_PROCESSOR_TIMEOUT_MS").unwrap_or_else(|| {
            info!("🪛️ RECON_PROCESSOR_TIMEOUT_MS not set, using {}ms", DEFAULT_TIMEOUT.as_millis());
            DEFAULT_TIMEOUT
        });
        Self { server_key, client_key, environment, timeout }
    }
}
