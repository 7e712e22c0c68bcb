use serde::Serialize;

use cwl_crypto::{ChainVerifier, LinkCheck};
use cwl_types::{TransactionId, TxDigest, WalletId};

use crate::error::LedgerError;
use crate::traits::LedgerStore;

/// One link of an audited chain, in creation order.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct ChainEntry {
    pub id: TransactionId,
    pub digest: TxDigest,
    pub prev_digest: TxDigest,
}

/// Result of auditing a wallet's chain.
///
/// An invalid chain is a normal result, not an error: `valid` is false and
/// `first_break` names the earliest transaction whose link failed. The
/// entry listing always covers the whole loaded chain.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct ChainAudit {
    pub wallet_id: WalletId,
    pub valid: bool,
    pub first_break: Option<TransactionId>,
    pub transaction_count: u64,
    pub entries: Vec<ChainEntry>,
}

/// End-to-end chain auditor.
///
/// Walks a wallet's stored chain in creation order and recomputes every
/// digest link. Checks, per link: the first entry starts from the genesis
/// sentinel; every later entry's `prev_digest` equals its predecessor's
/// digest; and every later entry's stored digest matches the digest
/// recomputed from its own fields. Verification stops at the first break.
pub struct ChainAuditor;

impl ChainAuditor {
    pub fn validate_chain<S: LedgerStore>(
        store: &S,
        wallet_id: WalletId,
    ) -> Result<ChainAudit, LedgerError> {
        if store.wallet(&wallet_id)?.is_none() {
            return Err(LedgerError::WalletNotFound { wallet_id });
        }

        // One consistent snapshot; a concurrent half-committed append must
        // never show up as a spurious break.
        let transactions = store.transactions(&wallet_id)?;

        let entries = transactions
            .iter()
            .map(|tx| ChainEntry {
                id: tx.id,
                digest: tx.digest,
                prev_digest: tx.prev_digest,
            })
            .collect();

        let (valid, first_break) = match ChainVerifier::verify(&transactions) {
            LinkCheck::Intact => (true, None),
            LinkCheck::Broken { index, reason } => {
                let culprit = transactions[index].id;
                tracing::warn!(
                    wallet = %wallet_id,
                    transaction = %culprit,
                    index,
                    ?reason,
                    "chain integrity violation detected"
                );
                (false, Some(culprit))
            }
        };

        Ok(ChainAudit {
            wallet_id,
            valid,
            first_break,
            transaction_count: transactions.len() as u64,
            entries,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::append::CreditAppender;
    use crate::memory::InMemoryLedgerStore;
    use cwl_types::UserId;
    use rust_decimal_macros::dec;
    use std::sync::Arc;

    fn credited_chain(credits: usize) -> (Arc<InMemoryLedgerStore>, WalletId) {
        let store = Arc::new(InMemoryLedgerStore::new());
        let appender = CreditAppender::new(Arc::clone(&store));
        let wallet = store.create_wallet(UserId::new()).unwrap();
        for _ in 0..credits {
            appender.append_credit(wallet.id, dec!(10.00)).unwrap();
        }
        (store, wallet.id)
    }

    #[test]
    fn unknown_wallet_is_an_error_not_a_break() {
        let store = InMemoryLedgerStore::new();
        let wallet_id = WalletId::new();
        let err = ChainAuditor::validate_chain(&store, wallet_id).unwrap_err();
        assert_eq!(err, LedgerError::WalletNotFound { wallet_id });
    }

    #[test]
    fn empty_chain_is_trivially_valid() {
        let (store, wallet_id) = credited_chain(0);
        let audit = ChainAuditor::validate_chain(store.as_ref(), wallet_id).unwrap();
        assert!(audit.valid);
        assert_eq!(audit.transaction_count, 0);
        assert!(audit.first_break.is_none());
        assert!(audit.entries.is_empty());
    }

    #[test]
    fn intact_chain_reports_every_entry() {
        let (store, wallet_id) = credited_chain(3);
        let audit = ChainAuditor::validate_chain(store.as_ref(), wallet_id).unwrap();

        assert!(audit.valid);
        assert_eq!(audit.transaction_count, 3);
        assert!(audit.entries[0].prev_digest.is_genesis());
        assert_eq!(audit.entries[1].prev_digest, audit.entries[0].digest);
        assert_eq!(audit.entries[2].prev_digest, audit.entries[1].digest);
    }

    #[test]
    fn tampered_amount_breaks_at_that_entry() {
        let (store, wallet_id) = credited_chain(3);

        // Rewrite the second entry's amount behind the store's back, the
        // way a direct database edit would.
        let tampered_id = {
            let mut state = store.inner.write().unwrap();
            let chain = state.chains.get_mut(&wallet_id).unwrap();
            chain[1].amount = dec!(999.00);
            chain[1].id
        };

        let audit = ChainAuditor::validate_chain(store.as_ref(), wallet_id).unwrap();
        assert!(!audit.valid);
        assert_eq!(audit.first_break, Some(tampered_id));
        assert_eq!(audit.transaction_count, 3);
        assert_eq!(audit.entries.len(), 3);
    }

    #[test]
    fn rewired_prev_digest_breaks_at_that_entry() {
        let (store, wallet_id) = credited_chain(3);

        let tampered_id = {
            let mut state = store.inner.write().unwrap();
            let chain = state.chains.get_mut(&wallet_id).unwrap();
            chain[2].prev_digest = TxDigest::from_raw([7; 32]);
            chain[2].id
        };

        let audit = ChainAuditor::validate_chain(store.as_ref(), wallet_id).unwrap();
        assert!(!audit.valid);
        assert_eq!(audit.first_break, Some(tampered_id));
    }

    #[test]
    fn non_genesis_first_entry_breaks_at_index_zero() {
        let (store, wallet_id) = credited_chain(2);

        let first_id = {
            let mut state = store.inner.write().unwrap();
            let chain = state.chains.get_mut(&wallet_id).unwrap();
            chain[0].prev_digest = TxDigest::from_raw([1; 32]);
            chain[0].id
        };

        let audit = ChainAuditor::validate_chain(store.as_ref(), wallet_id).unwrap();
        assert!(!audit.valid);
        assert_eq!(audit.first_break, Some(first_id));
    }

    #[test]
    fn only_the_first_break_is_reported() {
        let (store, wallet_id) = credited_chain(4);

        let earliest = {
            let mut state = store.inner.write().unwrap();
            let chain = state.chains.get_mut(&wallet_id).unwrap();
            chain[1].amount = dec!(999.00);
            chain[3].amount = dec!(888.00);
            chain[1].id
        };

        let audit = ChainAuditor::validate_chain(store.as_ref(), wallet_id).unwrap();
        assert_eq!(audit.first_break, Some(earliest));
    }
}
