//! Hashing primitives for the ChainWallet Ledger.
//!
//! Provides the frozen canonical encoding of transaction payloads, the
//! SHA-256 chain digest computation, and pure hash-chain link verification.
//!
//! All crypto operations wrap established libraries — no custom cryptography.

pub mod chain;
pub mod encoder;
pub mod hasher;

pub use chain::{BreakReason, ChainLink, ChainVerifier, LinkCheck};
pub use encoder::{CreditPayload, ENCODING_DOMAIN};
pub use hasher::ChainHasher;
