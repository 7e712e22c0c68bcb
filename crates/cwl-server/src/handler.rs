use std::sync::Arc;

use axum::extract::{Path, State};
use axum::response::Json;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use serde_json::json;

use cwl_ledger::{ChainAuditor, CreditAppender, CreditReceipt, InMemoryLedgerStore, LedgerStore};
use cwl_types::{TransactionId, UserId, WalletId};

use crate::error::ServerError;

/// Shared handler state: the append protocol and, through it, the store.
#[derive(Clone)]
pub struct AppState {
    appender: Arc<CreditAppender<InMemoryLedgerStore>>,
}

impl AppState {
    pub fn new(store: Arc<InMemoryLedgerStore>) -> Self {
        Self {
            appender: Arc::new(CreditAppender::new(store)),
        }
    }

    fn store(&self) -> &InMemoryLedgerStore {
        self.appender.store().as_ref()
    }
}

#[derive(Debug, Default, Deserialize)]
pub struct CreateWalletRequest {
    /// Owning user; generated when the caller does not supply one.
    pub user_id: Option<UserId>,
}

#[derive(Debug, Serialize)]
pub struct CreateWalletResponse {
    pub wallet_id: WalletId,
    pub user_id: UserId,
    pub fiat_balance: Decimal,
    pub token_balance: u64,
}

#[derive(Debug, Deserialize)]
pub struct CreditRequest {
    pub user_id: UserId,
    pub amount: Decimal,
}

#[derive(Debug, Serialize)]
pub struct AuditEntry {
    pub id: TransactionId,
    pub hash: String,
    pub previous_hash: String,
}

#[derive(Debug, Serialize)]
pub struct AuditResponse {
    pub wallet_id: WalletId,
    pub chain_valid: bool,
    pub first_break: Option<TransactionId>,
    pub transaction_count: u64,
    pub chain: Vec<AuditEntry>,
}

/// Health check handler.
pub async fn health_handler() -> Json<serde_json::Value> {
    Json(json!({
        "name": "cwl-server",
        "version": env!("CARGO_PKG_VERSION"),
        "status": "ok",
    }))
}

/// Create a wallet for a user.
pub async fn create_wallet_handler(
    State(state): State<AppState>,
    body: Option<Json<CreateWalletRequest>>,
) -> Result<Json<CreateWalletResponse>, ServerError> {
    let request = body.map(|Json(request)| request).unwrap_or_default();
    let user_id = request.user_id.unwrap_or_default();

    let wallet = state.store().create_wallet(user_id)?;
    tracing::info!(wallet = %wallet.id, user = %user_id, "wallet created");

    Ok(Json(CreateWalletResponse {
        wallet_id: wallet.id,
        user_id: wallet.user_id,
        fiat_balance: wallet.fiat_balance,
        token_balance: wallet.token_balance,
    }))
}

/// Record a credit for a user's wallet (the deposit-webhook entry point).
pub async fn credit_handler(
    State(state): State<AppState>,
    Json(request): Json<CreditRequest>,
) -> Result<Json<CreditReceipt>, ServerError> {
    let receipt = state
        .appender
        .append_credit_for_user(request.user_id, request.amount)?;
    Ok(Json(receipt))
}

/// Audit a wallet's chain end-to-end.
pub async fn audit_handler(
    State(state): State<AppState>,
    Path(wallet_id): Path<String>,
) -> Result<Json<AuditResponse>, ServerError> {
    let wallet_id: WalletId = wallet_id
        .parse()
        .map_err(|e: cwl_types::TypeError| ServerError::InvalidWalletId(e.to_string()))?;

    let audit = ChainAuditor::validate_chain(state.store(), wallet_id)?;

    Ok(Json(AuditResponse {
        wallet_id: audit.wallet_id,
        chain_valid: audit.valid,
        first_break: audit.first_break,
        transaction_count: audit.transaction_count,
        chain: audit
            .entries
            .into_iter()
            .map(|entry| AuditEntry {
                id: entry.id,
                hash: entry.digest.to_hex(),
                previous_hash: entry.prev_digest.to_hex(),
            })
            .collect(),
    }))
}
