use std::collections::HashMap;
use std::sync::{Arc, Mutex};

use rust_decimal::prelude::ToPrimitive;
use rust_decimal::Decimal;
use serde::Serialize;

use cwl_crypto::{ChainHasher, CreditPayload};
use cwl_types::{TransactionId, TransactionKind, TransactionStatus, TxDigest, UserId, WalletId};

use crate::error::{LedgerError, StoreError};
use crate::records::Transaction;
use crate::traits::{CommitOutcome, LedgerStore};

/// How many times an append may lose the chain-head race before giving up.
///
/// With the per-wallet gate all appends through one `CreditAppender` are
/// serialized, so the bound is only reachable when another writer commits
/// to the same wallet out of band.
const MAX_APPEND_ATTEMPTS: u32 = 5;

/// Updated balances returned from a successful credit.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct CreditReceipt {
    pub wallet_id: WalletId,
    pub transaction_id: TransactionId,
    pub fiat_balance: Decimal,
    pub token_balance: u64,
    pub status: TransactionStatus,
}

/// The chain append protocol.
///
/// Owns the read-latest → compute-digest → commit sequence and its
/// concurrency contract: appends to the same wallet are serialized by a
/// per-wallet gate held across the whole sequence, and the store's
/// conditional commit catches any writer that bypassed the gate. Appends
/// to different wallets proceed fully in parallel.
pub struct CreditAppender<S> {
    store: Arc<S>,
    gates: Mutex<HashMap<WalletId, Arc<Mutex<()>>>>,
}

impl<S: LedgerStore> CreditAppender<S> {
    pub fn new(store: Arc<S>) -> Self {
        Self {
            store,
            gates: Mutex::new(HashMap::new()),
        }
    }

    /// The underlying store handle.
    pub fn store(&self) -> &Arc<S> {
        &self.store
    }

    /// Append a deposit credit to a wallet's chain.
    ///
    /// Exactly one transaction is recorded and the token balance credited
    /// exactly once per successful call; a failed call leaves the wallet
    /// and its chain untouched. Token policy: one token per whole unit of
    /// amount, truncating toward zero (`10.99` mints 10 tokens).
    pub fn append_credit(
        &self,
        wallet_id: WalletId,
        amount: Decimal,
    ) -> Result<CreditReceipt, LedgerError> {
        let gate = self.gate(wallet_id)?;
        let _serialized = gate
            .lock()
            .map_err(|_| StoreError::Backend("wallet gate poisoned".into()))?;

        let mut attempts = 0;
        loop {
            attempts += 1;

            let mut wallet = self
                .store
                .wallet(&wallet_id)?
                .ok_or(LedgerError::WalletNotFound { wallet_id })?;

            if amount <= Decimal::ZERO {
                return Err(LedgerError::InvalidAmount { amount });
            }
            let tokens = amount
                .trunc()
                .to_u64()
                .ok_or(LedgerError::InvalidAmount { amount })?;

            let prev_digest = self
                .store
                .latest_transaction(&wallet_id)?
                .map(|tx| tx.digest)
                .unwrap_or(TxDigest::GENESIS);

            let payload = CreditPayload::new(wallet_id, amount, TransactionKind::Deposit);
            let digest = ChainHasher::digest(&payload.canonical_bytes(), &prev_digest);

            wallet.credit_tokens(tokens);
            let transaction = Transaction::credit(
                wallet_id,
                amount,
                TransactionKind::Deposit,
                format!("Deposit received: {amount}"),
                digest,
                prev_digest,
            );

            match self.store.commit_append(&wallet, &transaction)? {
                CommitOutcome::Committed(stored) => {
                    tracing::debug!(
                        wallet = %wallet_id,
                        transaction = %stored.id,
                        %amount,
                        tokens,
                        "credit appended"
                    );
                    return Ok(CreditReceipt {
                        wallet_id,
                        transaction_id: stored.id,
                        fiat_balance: wallet.fiat_balance,
                        token_balance: wallet.token_balance,
                        status: stored.status,
                    });
                }
                CommitOutcome::Conflict { head } => {
                    if attempts >= MAX_APPEND_ATTEMPTS {
                        tracing::warn!(
                            wallet = %wallet_id,
                            attempts,
                            "append contention exceeded"
                        );
                        return Err(LedgerError::ContentionExceeded { attempts });
                    }
                    tracing::debug!(
                        wallet = %wallet_id,
                        head = %head,
                        attempt = attempts,
                        "chain head moved, retrying append"
                    );
                }
            }
        }
    }

    /// Append a deposit credit for a user, resolving their wallet first.
    ///
    /// This is the deposit-webhook entry point: external payment events
    /// carry a user id, not a wallet id.
    pub fn append_credit_for_user(
        &self,
        user_id: UserId,
        amount: Decimal,
    ) -> Result<CreditReceipt, LedgerError> {
        let wallet = self
            .store
            .wallet_for_user(&user_id)?
            .ok_or(LedgerError::NoWalletForUser { user_id })?;
        self.append_credit(wallet.id, amount)
    }

    fn gate(&self, wallet_id: WalletId) -> Result<Arc<Mutex<()>>, LedgerError> {
        let mut gates = self
            .gates
            .lock()
            .map_err(|_| StoreError::Backend("gate registry poisoned".into()))?;
        Ok(gates.entry(wallet_id).or_default().clone())
    }
}
