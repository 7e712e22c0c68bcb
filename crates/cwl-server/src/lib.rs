//! HTTP server for the ChainWallet Ledger.
//!
//! Exposes wallet onboarding, credit intake (the deposit-webhook path),
//! and the chain audit endpoint over axum. The core ledger never sees any
//! of this: handlers translate requests into `cwl-ledger` calls and map
//! `LedgerError` kinds onto HTTP status codes.

pub mod config;
pub mod error;
pub mod handler;
pub mod router;
pub mod server;

pub use config::ServerConfig;
pub use error::{ServerError, ServerResult};
pub use handler::AppState;
pub use server::CwlServer;
