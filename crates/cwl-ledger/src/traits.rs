use cwl_types::{TxDigest, UserId, WalletId};

use crate::error::StoreResult;
use crate::records::{Transaction, Wallet};

/// Result of an atomic append commit.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum CommitOutcome {
    /// Both writes landed; the stored transaction carries the stamp the
    /// store assigned to it.
    Committed(Transaction),
    /// The wallet's chain head moved since the caller read it. Nothing was
    /// written; `head` is the digest that is actually current.
    Conflict { head: TxDigest },
}

/// Storage boundary for wallets and their transaction chains.
///
/// The append protocol and the auditor only ever see this trait; the
/// backing engine (in-memory, SQL, ...) is wired up by the infrastructure
/// layer. Implementations must satisfy:
///
/// - `transactions` returns one consistent snapshot in ascending creation
///   order — never a half-committed append.
/// - `commit_append` is atomic: the new transaction and the updated wallet
///   become visible together or not at all. It compares the submitted
///   transaction's `prev_digest` against the current chain head and returns
///   [`CommitOutcome::Conflict`] on mismatch without writing.
/// - The store assigns each committed transaction's `created_at` so that
///   stamps within one wallet's chain are strictly increasing.
/// - A committed transaction's financial and digest fields are never
///   rewritten.
pub trait LedgerStore: Send + Sync {
    /// Look up a wallet by id.
    fn wallet(&self, wallet_id: &WalletId) -> StoreResult<Option<Wallet>>;

    /// Look up a user's wallet.
    fn wallet_for_user(&self, user_id: &UserId) -> StoreResult<Option<Wallet>>;

    /// Create an empty wallet for a user. Fails if the user already has one.
    fn create_wallet(&self, user_id: UserId) -> StoreResult<Wallet>;

    /// The most recent transaction of a wallet's chain, if any.
    fn latest_transaction(&self, wallet_id: &WalletId) -> StoreResult<Option<Transaction>>;

    /// All transactions of a wallet in ascending creation order.
    fn transactions(&self, wallet_id: &WalletId) -> StoreResult<Vec<Transaction>>;

    /// Atomically persist an appended transaction and the updated wallet.
    fn commit_append(&self, wallet: &Wallet, transaction: &Transaction)
        -> StoreResult<CommitOutcome>;
}
