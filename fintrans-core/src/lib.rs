//! Fintrans Core - mock money transfers with optimistic updates
//!
//! This crate follows hexagonal architecture:
//!
//! - **domain**: profile, transaction record, validation and decision rules
//! - **ports**: traits for storage and the transfer processor
//! - **services**: profile/log stores, the wallet submission flow, event log
//! - **adapters**: file and in-memory storage, HTTP and in-process processors
//! - **server**: the mock processor HTTP endpoint

pub mod adapters;
pub mod config;
pub mod domain;
pub mod log_migrations;
pub mod ports;
pub mod server;
pub mod services;

use std::path::{Path, PathBuf};
use std::sync::Arc;

use anyhow::Result;

use adapters::{FileStore, HttpProcessor, LocalProcessor};
use config::Config;
use ports::{KeyValueStore, TransferProcessor};
use services::*;

// Re-export commonly used types at crate root
pub use domain::result::{Error, OperationResult};
pub use domain::{Direction, TransactionRecord, TransactionStatus, TransferRejection, UserProfile};
pub use services::{EntryPoint, LogEvent, LoggingService};

/// Main context for client operations
///
/// Holds the configuration, storage, processor and event log for one data
/// directory.
pub struct FintransContext {
    pub config: Config,
    pub data_dir: PathBuf,
    pub store: Arc<dyn KeyValueStore>,
    pub profiles: ProfileStore,
    pub transaction_logs: TransactionLogStore,
    pub processor: Arc<dyn TransferProcessor>,
    /// `None` when the event log could not be opened; logging never blocks operations
    pub events: Option<Arc<LoggingService>>,
}

impl FintransContext {
    /// Create a context over `data_dir`
    pub fn new(data_dir: &Path, entry_point: EntryPoint) -> Result<Self> {
        std::fs::create_dir_all(data_dir)?;
        let config = Config::load(data_dir)?;

        let store: Arc<dyn KeyValueStore> = Arc::new(FileStore::new(data_dir.join("storage")));

        let processor: Arc<dyn TransferProcessor> = match config.effective_processor_url() {
            Some(url) => Arc::new(HttpProcessor::new(url)),
            None => Arc::new(LocalProcessor::new(
                config.processor_delay,
                config.failure_threshold,
            )),
        };

        let events = LoggingService::new(data_dir, entry_point, env!("CARGO_PKG_VERSION"))
            .ok()
            .map(Arc::new);

        Ok(Self::from_parts(config, data_dir.to_path_buf(), store, processor, events))
    }

    /// Assemble a context from already-built parts
    pub fn from_parts(
        config: Config,
        data_dir: PathBuf,
        store: Arc<dyn KeyValueStore>,
        processor: Arc<dyn TransferProcessor>,
        events: Option<Arc<LoggingService>>,
    ) -> Self {
        Self {
            profiles: ProfileStore::new(Arc::clone(&store)),
            transaction_logs: TransactionLogStore::new(Arc::clone(&store)),
            config,
            data_dir,
            store,
            processor,
            events,
        }
    }

    /// Record an event, ignoring any errors
    pub fn log(&self, event: LogEvent) {
        if let Some(events) = &self.events {
            let _ = events.log(event);
        }
    }

    /// The signed-in user, if any
    pub fn current_user(&self) -> domain::result::Result<Option<UserProfile>> {
        self.profiles.load()
    }

    /// Start a new session, replacing any current one
    pub fn sign_in(&self, name: &str, pin: &str) -> domain::result::Result<UserProfile> {
        let profile = self
            .profiles
            .sign_in(name, pin, self.config.starting_balance)?;
        self.log(LogEvent::new("signed_in"));
        Ok(profile)
    }

    pub fn logout(&self) -> domain::result::Result<()> {
        self.profiles.logout()?;
        self.log(LogEvent::new("signed_out"));
        Ok(())
    }

    /// Open the wallet for the signed-in user
    pub fn wallet(&self) -> domain::result::Result<WalletService> {
        let profile = self
            .current_user()?
            .ok_or_else(|| Error::not_found("not signed in"))?;

        let wallet = WalletService::open(
            profile,
            self.profiles.clone(),
            self.transaction_logs.clone(),
            Arc::clone(&self.processor),
        )?;

        Ok(match &self.events {
            Some(events) => wallet.with_event_log(Arc::clone(events)),
            None => wallet,
        })
    }
}
