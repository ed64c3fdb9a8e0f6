//! Wallet service - optimistic transfer submission
//!
//! A transfer runs in two steps:
//!
//! 1. [`WalletService::begin`] validates the input and, in one synchronous
//!    step, prepends a `pending` record, deducts the amount and raises the
//!    busy flag. Nothing changes if validation fails.
//! 2. [`PendingTransfer::resolve`] asks the processor for a decision and
//!    reconciles:
//!    - decision received: the record takes the decided status and the
//!      deduction stays, even when the decision is `failed`;
//!    - no decision (the call itself failed): the record is marked `failed`
//!      and the amount is added back.
//!
//!    Either way the busy flag drops and the draft inputs are cleared.
//!
//! The two failure paths are not symmetric: a processor rejection keeps the
//! money deducted.
//!
//! Several transfers may be in flight at once. Each one only touches its own
//! record (found by id) and adjusts the balance by its own amount.

use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

use rust_decimal::Decimal;
use serde::Serialize;
use uuid::Uuid;

use crate::domain::result::{Error, Result};
use crate::domain::{validate_transfer, TransactionRecord, TransactionStatus, UserProfile};
use crate::ports::TransferProcessor;

use super::history::TransactionLogStore;
use super::logging::{LogEvent, LoggingService};
use super::profile::ProfileStore;
use super::status::WalletSummary;

/// The send-money form inputs
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct TransferDraft {
    pub recipient: String,
    pub amount: String,
}

impl TransferDraft {
    pub fn clear(&mut self) {
        self.recipient.clear();
        self.amount.clear();
    }
}

/// Final state of a resolved transfer
#[derive(Debug, Clone, Serialize)]
pub struct TransferOutcome {
    pub record: TransactionRecord,
    /// Balance right after reconciliation
    pub balance: Decimal,
    /// True when the amount was added back because no decision arrived
    pub rolled_back: bool,
    /// Why no decision arrived
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

struct WalletState {
    profile: UserProfile,
    history: Vec<TransactionRecord>,
    busy: bool,
    draft: TransferDraft,
}

/// Session state for one signed-in user plus the submission flow.
///
/// Cloning is cheap and every clone shares the same session.
#[derive(Clone)]
pub struct WalletService {
    state: Arc<Mutex<WalletState>>,
    profiles: ProfileStore,
    log_store: TransactionLogStore,
    processor: Arc<dyn TransferProcessor>,
    events: Option<Arc<LoggingService>>,
}

impl WalletService {
    /// Open the wallet for `profile`, loading its transaction log
    pub fn open(
        profile: UserProfile,
        profiles: ProfileStore,
        log_store: TransactionLogStore,
        processor: Arc<dyn TransferProcessor>,
    ) -> Result<Self> {
        let history = log_store.load(&profile.id)?;

        Ok(Self {
            state: Arc::new(Mutex::new(WalletState {
                profile,
                history,
                busy: false,
                draft: TransferDraft::default(),
            })),
            profiles,
            log_store,
            processor,
            events: None,
        })
    }

    /// Record flow events in the event log
    pub fn with_event_log(mut self, events: Arc<LoggingService>) -> Self {
        self.events = Some(events);
        self
    }

    // The lock is never held across an await, so a poisoned guard only means
    // another thread panicked mid-step; the data is still usable.
    fn state(&self) -> MutexGuard<'_, WalletState> {
        self.state.lock().unwrap_or_else(PoisonError::into_inner)
    }

    pub fn profile(&self) -> UserProfile {
        self.state().profile.clone()
    }

    pub fn balance(&self) -> Decimal {
        self.state().profile.balance
    }

    /// Transaction log, newest first
    pub fn history(&self) -> Vec<TransactionRecord> {
        self.state().history.clone()
    }

    pub fn find(&self, id: Uuid) -> Option<TransactionRecord> {
        self.state().history.iter().find(|r| r.id == id).cloned()
    }

    /// True between a successful `begin` and the next resolution
    pub fn is_busy(&self) -> bool {
        self.state().busy
    }

    pub fn draft(&self) -> TransferDraft {
        self.state().draft.clone()
    }

    pub fn set_recipient(&self, recipient: impl Into<String>) {
        self.state().draft.recipient = recipient.into();
    }

    pub fn set_amount(&self, amount: impl Into<String>) {
        self.state().draft.amount = amount.into();
    }

    pub fn summary(&self) -> WalletSummary {
        let state = self.state();
        WalletSummary::new(&state.profile, &state.history, state.busy)
    }

    /// Validate and apply the optimistic part of a transfer.
    ///
    /// On success the pending record is already in the log and the balance is
    /// already reduced when this returns.
    pub fn begin(&self, recipient: &str, amount_input: &str) -> Result<PendingTransfer> {
        let mut state = self.state();

        let transfer = match validate_transfer(state.profile.balance, recipient, amount_input) {
            Ok(transfer) => transfer,
            Err(rejection) => {
                drop(state);
                self.record_event(
                    LogEvent::new("transfer_rejected").with_error(rejection.to_string()),
                );
                return Err(rejection.into());
            }
        };

        let record = TransactionRecord::outgoing(transfer.recipient, transfer.amount);
        state.history.insert(0, record.clone());
        state.profile.balance -= record.amount;
        state.busy = true;
        self.persist(&state);

        let user_id = state.profile.id.clone();
        drop(state);

        self.record_event(
            LogEvent::new("transfer_submitted")
                .with_transfer(record.id)
                .with_status(TransactionStatus::Pending.as_str()),
        );

        Ok(PendingTransfer {
            wallet: self.clone(),
            user_id,
            record,
        })
    }

    /// Begin and resolve in one call
    pub async fn submit(&self, recipient: &str, amount_input: &str) -> Result<TransferOutcome> {
        let pending = self.begin(recipient, amount_input)?;
        Ok(pending.resolve().await)
    }

    /// Begin a transfer from whatever the draft currently holds.
    ///
    /// A rejected draft is left as typed; the draft is cleared once the
    /// transfer resolves.
    pub fn begin_draft(&self) -> Result<PendingTransfer> {
        let draft = self.draft();
        self.begin(&draft.recipient, &draft.amount)
    }

    /// Begin from the draft and resolve in one call
    pub async fn submit_draft(&self) -> Result<TransferOutcome> {
        let pending = self.begin_draft()?;
        Ok(pending.resolve().await)
    }

    fn finish(
        &self,
        pending: &TransactionRecord,
        decision: Result<TransactionStatus>,
    ) -> TransferOutcome {
        let decision = decision.and_then(|status| {
            if status.is_terminal() {
                Ok(status)
            } else {
                Err(Error::processor(format!(
                    "processor returned non-terminal status {}",
                    status
                )))
            }
        });

        let (status, error) = match decision {
            Ok(status) => (status, None),
            Err(e) => (TransactionStatus::Failed, Some(e.to_string())),
        };
        let rolled_back = error.is_some();

        let mut state = self.state();

        if rolled_back {
            state.profile.balance += pending.amount;
        }

        let record = match state.history.iter_mut().find(|r| r.id == pending.id) {
            Some(existing) => {
                if let Err(e) = existing.resolve(status) {
                    tracing::warn!(tx_id = %pending.id, error = %e, "transfer resolved twice");
                }
                existing.clone()
            }
            None => {
                tracing::warn!(tx_id = %pending.id, "resolved transfer missing from log");
                let mut detached = pending.clone();
                detached.status = status;
                detached
            }
        };

        state.busy = false;
        state.draft.clear();
        self.persist(&state);
        let balance = state.profile.balance;
        drop(state);

        let event = match (&error, status) {
            (Some(message), _) => LogEvent::new("transfer_rolled_back")
                .with_error(message.clone())
                .with_error_details(self.processor.name()),
            (None, TransactionStatus::Completed) => LogEvent::new("transfer_completed"),
            (None, _) => LogEvent::new("transfer_declined"),
        };
        self.record_event(event.with_transfer(record.id).with_status(status.as_str()));

        TransferOutcome {
            record,
            balance,
            rolled_back,
            error,
        }
    }

    /// Mirror the in-memory state to storage. Storage failures are reported
    /// but never undo the in-memory change.
    fn persist(&self, state: &WalletState) {
        if let Err(e) = self.profiles.save(&state.profile) {
            tracing::warn!(error = %e, "failed to save profile");
        }
        if let Err(e) = self.log_store.save(&state.profile.id, &state.history) {
            tracing::warn!(error = %e, "failed to save transaction log");
        }
    }

    fn record_event(&self, event: LogEvent) {
        if let Some(events) = &self.events {
            let _ = events.log(event);
        }
    }
}

/// A transfer whose optimistic step has been applied and whose decision is outstanding
#[must_use = "a pending transfer stays pending until it is resolved"]
pub struct PendingTransfer {
    wallet: WalletService,
    user_id: String,
    record: TransactionRecord,
}

impl PendingTransfer {
    /// The record as it was created (status `pending`)
    pub fn record(&self) -> &TransactionRecord {
        &self.record
    }

    /// Ask the processor for a decision and reconcile the wallet.
    ///
    /// Always completes; failures end up in the outcome, not as an error.
    pub async fn resolve(self) -> TransferOutcome {
        let decision = self
            .wallet
            .processor
            .process(&self.user_id, &self.record)
            .await;
        self.wallet.finish(&self.record, decision)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::adapters::MemoryStore;
    use crate::domain::TransferRejection;
    use crate::ports::KeyValueStore;
    use crate::services::history_key;
    use async_trait::async_trait;
    use tokio::sync::Notify;

    /// Answers every call with the same scripted result
    struct ScriptedProcessor {
        decision: Option<TransactionStatus>,
    }

    #[async_trait]
    impl TransferProcessor for ScriptedProcessor {
        fn name(&self) -> &str {
            "scripted"
        }

        async fn process(&self, _user_id: &str, _tx: &TransactionRecord) -> Result<TransactionStatus> {
            self.decision
                .ok_or_else(|| Error::processor("connection reset"))
        }
    }

    /// Holds every call until released, then completes
    struct GatedProcessor {
        gate: Notify,
    }

    #[async_trait]
    impl TransferProcessor for GatedProcessor {
        fn name(&self) -> &str {
            "gated"
        }

        async fn process(&self, _user_id: &str, _tx: &TransactionRecord) -> Result<TransactionStatus> {
            self.gate.notified().await;
            Ok(TransactionStatus::Completed)
        }
    }

    fn wallet_with(balance: i64, processor: Arc<dyn TransferProcessor>) -> (Arc<MemoryStore>, WalletService) {
        let store = Arc::new(MemoryStore::new());
        let profiles = ProfileStore::new(store.clone());
        let log_store = TransactionLogStore::new(store.clone());
        let profile = profiles
            .sign_in("Tester", "", Decimal::from(balance))
            .unwrap();
        let wallet = WalletService::open(profile, profiles, log_store, processor).unwrap();
        (store, wallet)
    }

    fn scripted(decision: Option<TransactionStatus>) -> Arc<dyn TransferProcessor> {
        Arc::new(ScriptedProcessor { decision })
    }

    #[tokio::test]
    async fn test_begin_applies_optimistic_state() {
        let gated = Arc::new(GatedProcessor { gate: Notify::new() });
        let (_, wallet) = wallet_with(1000, gated.clone());

        let pending = wallet.begin("Alice", "200").unwrap();

        assert_eq!(wallet.balance(), Decimal::from(800));
        assert!(wallet.is_busy());
        let history = wallet.history();
        assert_eq!(history.len(), 1);
        assert_eq!(history[0].id, pending.record().id);
        assert_eq!(history[0].status, TransactionStatus::Pending);

        gated.gate.notify_one();
        let outcome = pending.resolve().await;

        assert_eq!(outcome.record.status, TransactionStatus::Completed);
        assert_eq!(outcome.balance, Decimal::from(800));
        assert!(!outcome.rolled_back);
        assert!(!wallet.is_busy());
    }

    #[tokio::test]
    async fn test_declined_keeps_deduction() {
        let (_, wallet) = wallet_with(10000, scripted(Some(TransactionStatus::Failed)));

        let outcome = wallet.submit("Carl", "6000").await.unwrap();

        assert_eq!(outcome.record.status, TransactionStatus::Failed);
        assert!(!outcome.rolled_back);
        assert_eq!(wallet.balance(), Decimal::from(4000));
    }

    #[tokio::test]
    async fn test_call_failure_restores_balance() {
        let (_, wallet) = wallet_with(1000, scripted(None));

        let outcome = wallet.submit("Alice", "200").await.unwrap();

        assert_eq!(outcome.record.status, TransactionStatus::Failed);
        assert!(outcome.rolled_back);
        assert_eq!(outcome.error.as_deref(), Some("Processor error: connection reset"));
        assert_eq!(wallet.balance(), Decimal::from(1000));
        assert!(!wallet.is_busy());
    }

    #[tokio::test]
    async fn test_non_terminal_decision_counts_as_call_failure() {
        let (_, wallet) = wallet_with(1000, scripted(Some(TransactionStatus::Pending)));

        let outcome = wallet.submit("Alice", "200").await.unwrap();

        assert_eq!(outcome.record.status, TransactionStatus::Failed);
        assert!(outcome.rolled_back);
        assert_eq!(wallet.balance(), Decimal::from(1000));
    }

    #[tokio::test]
    async fn test_rejections_change_nothing() {
        let (store, wallet) = wallet_with(1000, scripted(Some(TransactionStatus::Completed)));
        let stored_before = store.get(&history_key(&wallet.profile().id)).unwrap();

        for (recipient, amount, expected) in [
            ("", "10", TransferRejection::EmptyRecipient),
            ("Bob", "0", TransferRejection::InvalidAmount),
            ("Bob", "-5", TransferRejection::InvalidAmount),
            ("Bob", "ten", TransferRejection::InvalidAmount),
            ("Bob", "6000", TransferRejection::InsufficientFunds),
        ] {
            let err = wallet.begin(recipient, amount).err().unwrap();
            assert_eq!(err.rejection(), Some(expected), "{recipient:?} {amount:?}");
        }

        assert_eq!(wallet.balance(), Decimal::from(1000));
        assert!(wallet.history().is_empty());
        assert!(!wallet.is_busy());
        assert_eq!(
            store.get(&history_key(&wallet.profile().id)).unwrap(),
            stored_before
        );
    }

    #[tokio::test]
    async fn test_draft_cleared_after_resolution_only() {
        let (_, wallet) = wallet_with(1000, scripted(None));

        wallet.set_recipient("Bob");
        wallet.set_amount("6000");
        assert!(wallet.submit_draft().await.is_err());
        assert_eq!(wallet.draft().recipient, "Bob");
        assert_eq!(wallet.draft().amount, "6000");

        wallet.set_amount("50");
        wallet.submit_draft().await.unwrap();
        assert_eq!(wallet.draft(), TransferDraft::default());
    }

    #[tokio::test]
    async fn test_draft_kept_while_pending() {
        let gated = Arc::new(GatedProcessor { gate: Notify::new() });
        let (_, wallet) = wallet_with(1000, gated.clone());

        wallet.set_recipient("Alice");
        wallet.set_amount("200");
        let pending = wallet.begin_draft().unwrap();
        assert_eq!(pending.record().counterparty, "Alice");
        assert_eq!(wallet.draft().amount, "200");

        gated.gate.notify_one();
        let outcome = pending.resolve().await;
        assert_eq!(outcome.record.status, TransactionStatus::Completed);
        assert_eq!(wallet.draft(), TransferDraft::default());
    }

    #[tokio::test]
    async fn test_overlapping_transfers_resolve_independently() {
        let gated = Arc::new(GatedProcessor { gate: Notify::new() });
        let (_, wallet) = wallet_with(1000, gated.clone());

        let first = wallet.begin("Alice", "100").unwrap();
        let second = wallet.begin("Bob", "300").unwrap();
        assert_eq!(wallet.balance(), Decimal::from(600));

        let history = wallet.history();
        assert_eq!(history[0].counterparty, "Bob");
        assert_eq!(history[1].counterparty, "Alice");

        let second_id = second.record().id;
        let first_id = first.record().id;

        gated.gate.notify_one();
        let second_outcome = second.resolve().await;
        assert_eq!(second_outcome.record.id, second_id);
        assert_eq!(
            wallet.find(first_id).unwrap().status,
            TransactionStatus::Pending
        );

        gated.gate.notify_one();
        first.resolve().await;

        assert_eq!(wallet.find(first_id).unwrap().status, TransactionStatus::Completed);
        assert_eq!(wallet.find(second_id).unwrap().status, TransactionStatus::Completed);
        assert_eq!(wallet.balance(), Decimal::from(600));
    }

    #[tokio::test]
    async fn test_state_is_mirrored_to_storage() {
        let (store, wallet) = wallet_with(1000, scripted(Some(TransactionStatus::Completed)));
        wallet.submit("Alice", "200").await.unwrap();

        let profiles = ProfileStore::new(store.clone());
        let log_store = TransactionLogStore::new(store);
        let profile = profiles.load().unwrap().unwrap();
        assert_eq!(profile.balance, Decimal::from(800));

        let history = log_store.load(&profile.id).unwrap();
        assert_eq!(history.len(), 1);
        assert_eq!(history[0].status, TransactionStatus::Completed);
    }
}
