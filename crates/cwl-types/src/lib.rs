//! Foundation types for the ChainWallet Ledger (CWL).
//!
//! This crate provides the identity, digest, and temporal types used
//! throughout the CWL system. Every other CWL crate depends on `cwl-types`.
//!
//! # Key Types
//!
//! - [`WalletId`] / [`UserId`] — Wallet and owning-user identifiers
//! - [`TransactionId`] — UUID v7 transaction identifier (time-ordered)
//! - [`TxDigest`] — SHA-256 chain digest with a fixed all-zero genesis sentinel
//! - [`ChainStamp`] — Hybrid physical/logical creation timestamp
//! - [`TransactionKind`] / [`TransactionStatus`] — Ledger entry tags

pub mod digest;
pub mod error;
pub mod ids;
pub mod temporal;
pub mod transaction;

pub use digest::TxDigest;
pub use error::TypeError;
pub use ids::{TransactionId, UserId, WalletId};
pub use temporal::ChainStamp;
pub use transaction::{TransactionKind, TransactionStatus};
