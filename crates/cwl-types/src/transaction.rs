use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::TypeError;

/// Kind of credit event recorded in a wallet's chain.
///
/// The stable uppercase tag returned by [`TransactionKind::as_str`] is part
/// of the canonical encoding and therefore part of the digest contract:
/// renaming a tag invalidates every digest that committed to it.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum TransactionKind {
    /// External fiat deposit converted into tokens.
    Deposit,
    /// Token purchase.
    Mint,
    /// Credit transferred onward (e.g. into a game balance).
    Credit,
}

impl TransactionKind {
    /// The stable tag used in the canonical encoding.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Deposit => "DEPOSIT",
            Self::Mint => "MINT",
            Self::Credit => "CREDIT",
        }
    }
}

impl fmt::Display for TransactionKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for TransactionKind {
    type Err = TypeError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "DEPOSIT" => Ok(Self::Deposit),
            "MINT" => Ok(Self::Mint),
            "CREDIT" => Ok(Self::Credit),
            other => Err(TypeError::UnknownKind(other.to_string())),
        }
    }
}

/// Lifecycle status of a ledger transaction.
///
/// `Pending` may transition to `Completed` or `Failed`; both of those are
/// terminal. Status is the only mutable field of a recorded transaction.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum TransactionStatus {
    Pending,
    Completed,
    Failed,
}

impl TransactionStatus {
    /// Returns `true` once the status can no longer change.
    pub fn is_terminal(&self) -> bool {
        matches!(self, Self::Completed | Self::Failed)
    }
}

impl fmt::Display for TransactionStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Pending => write!(f, "PENDING"),
            Self::Completed => write!(f, "COMPLETED"),
            Self::Failed => write!(f, "FAILED"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn kind_tags_are_stable() {
        assert_eq!(TransactionKind::Deposit.as_str(), "DEPOSIT");
        assert_eq!(TransactionKind::Mint.as_str(), "MINT");
        assert_eq!(TransactionKind::Credit.as_str(), "CREDIT");
    }

    #[test]
    fn kind_parse_roundtrip() {
        for kind in [
            TransactionKind::Deposit,
            TransactionKind::Mint,
            TransactionKind::Credit,
        ] {
            assert_eq!(kind.as_str().parse::<TransactionKind>().unwrap(), kind);
        }
    }

    #[test]
    fn kind_parse_rejects_unknown() {
        let err = "WITHDRAWAL".parse::<TransactionKind>().unwrap_err();
        assert_eq!(err, TypeError::UnknownKind("WITHDRAWAL".to_string()));
    }

    #[test]
    fn status_terminality() {
        assert!(!TransactionStatus::Pending.is_terminal());
        assert!(TransactionStatus::Completed.is_terminal());
        assert!(TransactionStatus::Failed.is_terminal());
    }

    #[test]
    fn serde_uses_uppercase_tags() {
        let json = serde_json::to_string(&TransactionKind::Deposit).unwrap();
        assert_eq!(json, "\"DEPOSIT\"");
        let json = serde_json::to_string(&TransactionStatus::Completed).unwrap();
        assert_eq!(json, "\"COMPLETED\"");
    }
}
