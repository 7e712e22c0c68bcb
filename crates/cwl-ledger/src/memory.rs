use std::collections::HashMap;
use std::sync::RwLock;

use cwl_types::{ChainStamp, TxDigest, UserId, WalletId};

use crate::error::{StoreError, StoreResult};
use crate::records::{Transaction, Wallet};
use crate::traits::{CommitOutcome, LedgerStore};

/// In-memory [`LedgerStore`] for tests, local demos, and embedding.
///
/// All state lives behind one `RwLock`, which is what makes
/// [`commit_append`](LedgerStore::commit_append) atomic: the transaction
/// push and the wallet update happen under a single write guard.
pub struct InMemoryLedgerStore {
    pub(crate) inner: RwLock<StoreState>,
}

#[derive(Default)]
pub(crate) struct StoreState {
    pub(crate) wallets: HashMap<WalletId, Wallet>,
    pub(crate) users: HashMap<UserId, WalletId>,
    pub(crate) chains: HashMap<WalletId, Vec<Transaction>>,
}

impl InMemoryLedgerStore {
    pub fn new() -> Self {
        Self {
            inner: RwLock::new(StoreState::default()),
        }
    }

    fn read(&self) -> StoreResult<std::sync::RwLockReadGuard<'_, StoreState>> {
        self.inner
            .read()
            .map_err(|_| StoreError::Backend("store read lock poisoned".into()))
    }

    fn write(&self) -> StoreResult<std::sync::RwLockWriteGuard<'_, StoreState>> {
        self.inner
            .write()
            .map_err(|_| StoreError::Backend("store write lock poisoned".into()))
    }
}

impl Default for InMemoryLedgerStore {
    fn default() -> Self {
        Self::new()
    }
}

impl LedgerStore for InMemoryLedgerStore {
    fn wallet(&self, wallet_id: &WalletId) -> StoreResult<Option<Wallet>> {
        Ok(self.read()?.wallets.get(wallet_id).cloned())
    }

    fn wallet_for_user(&self, user_id: &UserId) -> StoreResult<Option<Wallet>> {
        let state = self.read()?;
        Ok(state
            .users
            .get(user_id)
            .and_then(|wallet_id| state.wallets.get(wallet_id))
            .cloned())
    }

    fn create_wallet(&self, user_id: UserId) -> StoreResult<Wallet> {
        let mut state = self.write()?;
        if state.users.contains_key(&user_id) {
            return Err(StoreError::WalletExists { user_id });
        }

        let wallet = Wallet::new(user_id);
        state.users.insert(user_id, wallet.id);
        state.wallets.insert(wallet.id, wallet.clone());
        Ok(wallet)
    }

    fn latest_transaction(&self, wallet_id: &WalletId) -> StoreResult<Option<Transaction>> {
        let state = self.read()?;
        Ok(state
            .chains
            .get(wallet_id)
            .and_then(|chain| chain.last())
            .cloned())
    }

    fn transactions(&self, wallet_id: &WalletId) -> StoreResult<Vec<Transaction>> {
        Ok(self.read()?.chains.get(wallet_id).cloned().unwrap_or_default())
    }

    fn commit_append(
        &self,
        wallet: &Wallet,
        transaction: &Transaction,
    ) -> StoreResult<CommitOutcome> {
        let mut state = self.write()?;
        if !state.wallets.contains_key(&wallet.id) {
            return Err(StoreError::MissingWallet { wallet_id: wallet.id });
        }

        let last = state.chains.get(&wallet.id).and_then(|chain| chain.last());
        let head = last.map(|tx| tx.digest).unwrap_or(TxDigest::GENESIS);
        if transaction.prev_digest != head {
            return Ok(CommitOutcome::Conflict { head });
        }

        let mut stored = transaction.clone();
        stored.created_at = match last {
            Some(prev) => ChainStamp::next_after(&prev.created_at),
            None => ChainStamp::now(),
        };

        state.chains.entry(wallet.id).or_default().push(stored.clone());
        state.wallets.insert(wallet.id, wallet.clone());
        Ok(CommitOutcome::Committed(stored))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use cwl_crypto::{ChainHasher, CreditPayload};
    use cwl_types::TransactionKind;
    use rust_decimal::Decimal;
    use rust_decimal_macros::dec;

    fn credit_tx(wallet: &Wallet, amount: Decimal, prev: TxDigest) -> Transaction {
        let payload = CreditPayload::new(wallet.id, amount, TransactionKind::Deposit);
        let digest = ChainHasher::digest(&payload.canonical_bytes(), &prev);
        Transaction::credit(
            wallet.id,
            amount,
            TransactionKind::Deposit,
            "deposit".into(),
            digest,
            prev,
        )
    }

    #[test]
    fn create_wallet_binds_user_once() {
        let store = InMemoryLedgerStore::new();
        let user_id = UserId::new();

        let wallet = store.create_wallet(user_id).unwrap();
        assert_eq!(store.wallet_for_user(&user_id).unwrap().unwrap().id, wallet.id);

        let err = store.create_wallet(user_id).unwrap_err();
        assert_eq!(err, StoreError::WalletExists { user_id });
    }

    #[test]
    fn missing_wallet_lookups_return_none() {
        let store = InMemoryLedgerStore::new();
        assert!(store.wallet(&WalletId::new()).unwrap().is_none());
        assert!(store.wallet_for_user(&UserId::new()).unwrap().is_none());
        assert!(store.latest_transaction(&WalletId::new()).unwrap().is_none());
        assert!(store.transactions(&WalletId::new()).unwrap().is_empty());
    }

    #[test]
    fn commit_append_updates_chain_and_wallet_together() {
        let store = InMemoryLedgerStore::new();
        let mut wallet = store.create_wallet(UserId::new()).unwrap();

        let tx = credit_tx(&wallet, dec!(10.00), TxDigest::GENESIS);
        wallet.credit_tokens(10);

        let outcome = store.commit_append(&wallet, &tx).unwrap();
        let stored = match outcome {
            CommitOutcome::Committed(stored) => stored,
            other => panic!("unexpected outcome: {other:?}"),
        };

        assert_eq!(stored.digest, tx.digest);
        assert_eq!(store.wallet(&wallet.id).unwrap().unwrap().token_balance, 10);
        assert_eq!(
            store.latest_transaction(&wallet.id).unwrap().unwrap().id,
            stored.id
        );
    }

    #[test]
    fn commit_append_rejects_unknown_wallet() {
        let store = InMemoryLedgerStore::new();
        let wallet = Wallet::new(UserId::new());
        let tx = credit_tx(&wallet, dec!(1), TxDigest::GENESIS);

        let err = store.commit_append(&wallet, &tx).unwrap_err();
        assert_eq!(err, StoreError::MissingWallet { wallet_id: wallet.id });
    }

    #[test]
    fn stale_prev_digest_conflicts_without_writing() {
        let store = InMemoryLedgerStore::new();
        let mut wallet = store.create_wallet(UserId::new()).unwrap();

        let first = credit_tx(&wallet, dec!(1), TxDigest::GENESIS);
        wallet.credit_tokens(1);
        store.commit_append(&wallet, &first).unwrap();
        let head = store.latest_transaction(&wallet.id).unwrap().unwrap().digest;

        // A second writer that still believes the chain is empty.
        let mut stale_wallet = store.wallet(&wallet.id).unwrap().unwrap();
        let stale = credit_tx(&stale_wallet, dec!(2), TxDigest::GENESIS);
        stale_wallet.credit_tokens(2);

        let outcome = store.commit_append(&stale_wallet, &stale).unwrap();
        assert_eq!(outcome, CommitOutcome::Conflict { head });

        // Nothing from the losing write may be visible.
        assert_eq!(store.transactions(&wallet.id).unwrap().len(), 1);
        assert_eq!(store.wallet(&wallet.id).unwrap().unwrap().token_balance, 1);
    }

    #[test]
    fn committed_stamps_increase_per_wallet() {
        let store = InMemoryLedgerStore::new();
        let mut wallet = store.create_wallet(UserId::new()).unwrap();
        let mut prev = TxDigest::GENESIS;

        for i in 1..=20u64 {
            let tx = credit_tx(&wallet, dec!(1), prev);
            wallet.credit_tokens(1);
            prev = tx.digest;
            match store.commit_append(&wallet, &tx).unwrap() {
                CommitOutcome::Committed(_) => {}
                other => panic!("append {i} failed: {other:?}"),
            }
        }

        let chain = store.transactions(&wallet.id).unwrap();
        assert_eq!(chain.len(), 20);
        for pair in chain.windows(2) {
            assert!(pair[0].created_at < pair[1].created_at);
        }
    }

    #[test]
    fn chains_are_isolated_per_wallet() {
        let store = InMemoryLedgerStore::new();
        let mut alpha = store.create_wallet(UserId::new()).unwrap();
        let mut beta = store.create_wallet(UserId::new()).unwrap();

        let tx_a = credit_tx(&alpha, dec!(1), TxDigest::GENESIS);
        alpha.credit_tokens(1);
        store.commit_append(&alpha, &tx_a).unwrap();

        let tx_b = credit_tx(&beta, dec!(2), TxDigest::GENESIS);
        beta.credit_tokens(2);
        store.commit_append(&beta, &tx_b).unwrap();

        assert_eq!(store.transactions(&alpha.id).unwrap().len(), 1);
        assert_eq!(store.transactions(&beta.id).unwrap().len(), 1);
        assert_eq!(store.wallet(&beta.id).unwrap().unwrap().token_balance, 2);
    }
}
