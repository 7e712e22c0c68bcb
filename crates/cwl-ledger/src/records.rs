use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use cwl_crypto::{ChainLink, CreditPayload};
use cwl_types::{
    ChainStamp, TransactionId, TransactionKind, TransactionStatus, TxDigest, UserId, WalletId,
};

use crate::error::LedgerError;

/// A user's wallet: one fiat balance and one token balance.
///
/// Balances never go negative — the fiat side is guarded by the entity
/// methods, the token side by construction (`u64`). Wallets are created on
/// onboarding and mutated only through the append protocol.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Wallet {
    pub id: WalletId,
    pub user_id: UserId,
    pub fiat_balance: Decimal,
    pub token_balance: u64,
    pub created_at: ChainStamp,
}

impl Wallet {
    /// Create an empty wallet for a user.
    pub fn new(user_id: UserId) -> Self {
        Self {
            id: WalletId::new(),
            user_id,
            fiat_balance: Decimal::ZERO,
            token_balance: 0,
            created_at: ChainStamp::now(),
        }
    }

    /// Add fiat to the wallet. Rejects non-positive amounts.
    pub fn deposit_fiat(&mut self, amount: Decimal) -> Result<(), LedgerError> {
        if amount <= Decimal::ZERO {
            return Err(LedgerError::InvalidAmount { amount });
        }
        self.fiat_balance += amount;
        Ok(())
    }

    /// Remove fiat from the wallet. Rejects non-positive amounts and
    /// anything that would take the balance below zero.
    pub fn withdraw_fiat(&mut self, amount: Decimal) -> Result<(), LedgerError> {
        if amount <= Decimal::ZERO {
            return Err(LedgerError::InvalidAmount { amount });
        }
        if self.fiat_balance < amount {
            return Err(LedgerError::InsufficientFunds {
                balance: self.fiat_balance,
                requested: amount,
            });
        }
        self.fiat_balance -= amount;
        Ok(())
    }

    /// Credit tokens to the wallet.
    ///
    /// Zero is allowed: a sub-unit deposit records a transaction without
    /// minting a token.
    pub fn credit_tokens(&mut self, tokens: u64) {
        self.token_balance += tokens;
    }
}

/// A single credit event in a wallet's chain.
///
/// The financial fields and both digest fields are write-once; only
/// `status` may transition, and timestamps are assigned by the store at
/// commit. `digest` commits to the canonical payload and to `prev_digest`,
/// which is the predecessor's digest or the genesis sentinel.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Transaction {
    pub id: TransactionId,
    pub wallet_id: WalletId,
    pub amount: Decimal,
    pub kind: TransactionKind,
    pub status: TransactionStatus,
    pub description: String,
    pub created_at: ChainStamp,
    pub digest: TxDigest,
    pub prev_digest: TxDigest,
}

impl Transaction {
    /// A settled credit entry with its chain digests already computed.
    pub fn credit(
        wallet_id: WalletId,
        amount: Decimal,
        kind: TransactionKind,
        description: String,
        digest: TxDigest,
        prev_digest: TxDigest,
    ) -> Self {
        Self {
            id: TransactionId::new(),
            wallet_id,
            amount,
            kind,
            status: TransactionStatus::Completed,
            description,
            created_at: ChainStamp::now(),
            digest,
            prev_digest,
        }
    }

    /// An entry awaiting settlement (e.g. a charge not yet confirmed).
    pub fn pending(
        wallet_id: WalletId,
        amount: Decimal,
        kind: TransactionKind,
        description: String,
        digest: TxDigest,
        prev_digest: TxDigest,
    ) -> Self {
        Self {
            status: TransactionStatus::Pending,
            ..Self::credit(wallet_id, amount, kind, description, digest, prev_digest)
        }
    }

    /// Settle a pending entry. No-op once the status is terminal.
    pub fn complete(&mut self) {
        if self.status == TransactionStatus::Pending {
            self.status = TransactionStatus::Completed;
        }
    }

    /// Fail a pending entry. No-op once the status is terminal.
    pub fn fail(&mut self) {
        if self.status == TransactionStatus::Pending {
            self.status = TransactionStatus::Failed;
        }
    }

    /// The hashed fields of this transaction.
    pub fn payload(&self) -> CreditPayload {
        CreditPayload::new(self.wallet_id, self.amount, self.kind)
    }
}

impl ChainLink for Transaction {
    fn digest(&self) -> TxDigest {
        self.digest
    }

    fn prev_digest(&self) -> TxDigest {
        self.prev_digest
    }

    fn payload_bytes(&self) -> Vec<u8> {
        self.payload().canonical_bytes()
    }
}
