use rust_decimal::Decimal;
use thiserror::Error;

use cwl_types::{UserId, WalletId};

/// Errors produced by the persistence boundary.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum StoreError {
    #[error("wallet {wallet_id} does not exist in the store")]
    MissingWallet { wallet_id: WalletId },

    #[error("user {user_id} already has a wallet")]
    WalletExists { user_id: UserId },

    #[error("store backend failure: {0}")]
    Backend(String),
}

/// Convenience alias for store operations.
pub type StoreResult<T> = Result<T, StoreError>;

/// Errors produced by ledger operations.
///
/// A broken chain is *not* represented here: audits report breaks as a
/// normal [`ChainAudit`](crate::validation::ChainAudit) result so callers
/// can display them.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum LedgerError {
    #[error("wallet not found: {wallet_id}")]
    WalletNotFound { wallet_id: WalletId },

    #[error("no wallet for user: {user_id}")]
    NoWalletForUser { user_id: UserId },

    #[error("amount must be positive, got {amount}")]
    InvalidAmount { amount: Decimal },

    #[error("insufficient funds: balance {balance}, requested {requested}")]
    InsufficientFunds {
        balance: Decimal,
        requested: Decimal,
    },

    #[error("append lost the chain head race {attempts} times; giving up")]
    ContentionExceeded { attempts: u32 },

    #[error("store error: {0}")]
    Store(#[from] StoreError),
}
