use std::time::Duration;

use cucumber::World;
use log::*;
use recon_common::Secret;
use recon_engine::{
    events::EventProducers,
    helpers::{Backoff, RetryPolicy},
    Ack,
    ReconcileError,
    ReconciliationApi,
    SignatureVerifier,
    SqliteDatabase,
};

use crate::support::{prepare_test_env, SERVER_KEY};

#[derive(Default, Debug, World)]
pub struct ReconWorld {
    pub system: Option<ReconSystem>,
    pub last_result: Option<Result<Ack, ReconcileError>>,
}

#[derive(Debug)]
pub struct ReconSystem {
    pub db_path: String,
    pub api: ReconciliationApi<SignatureVerifier, SqliteDatabase>,
}

impl ReconWorld {
    pub fn api(&self) -> &ReconciliationApi<SignatureVerifier, SqliteDatabase> {
        &self.system.as_ref().expect("ReconciliationApi not initialised").api
    }

    pub fn last_result(&self) -> &Result<Ack, ReconcileError> {
        self.last_result.as_ref().expect("No notification has been processed yet")
    }
}

impl ReconSystem {
    pub async fn new() -> Self {
        let url = prepare_test_env().await;
        let db = SqliteDatabase::new_with_url(&url, 2).await.expect("Error creating connection to database");
        debug!("Created database: {url}");
        let verifier = SignatureVerifier::new(Secret::new(SERVER_KEY.to_string()));
        let policy = RetryPolicy::new(3, Duration::from_millis(10), Backoff::Linear);
        let api = ReconciliationApi::new(verifier, db, EventProducers::default()).with_retry_policy(policy);
        Self { db_path: url, api }
    }
}
