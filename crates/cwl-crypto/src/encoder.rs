use rust_decimal::Decimal;
use serde_json::json;

use cwl_types::{TransactionKind, WalletId};

/// Version tag prefixed to every canonical payload.
///
/// The canonical byte form is a frozen wire contract: every digest ever
/// issued commits to it. Any change to the field set, the key order, the
/// amount normalization, or this tag invalidates all stored chains, so a
/// format change requires a new domain version, never an edit in place.
pub const ENCODING_DOMAIN: &str = "cwl-tx-v1";

/// The hashed fields of a credit transaction.
///
/// Only these three fields are committed to by the chain digest. Status,
/// description, and timestamps stay outside the digest so that status
/// transitions do not re-open settled links.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct CreditPayload {
    pub wallet_id: WalletId,
    pub amount: Decimal,
    pub kind: TransactionKind,
}

impl CreditPayload {
    pub fn new(wallet_id: WalletId, amount: Decimal, kind: TransactionKind) -> Self {
        Self {
            wallet_id,
            amount,
            kind,
        }
    }

    /// The deterministic byte form of this payload.
    ///
    /// Layout: `cwl-tx-v1:` followed by compact JSON with keys in sorted
    /// order. Amounts are rendered via [`canonical_amount`], kinds via
    /// their stable uppercase tag, wallet ids as lowercase hyphenated
    /// UUIDs. Logically equal payloads are byte-identical regardless of
    /// how their fields were produced.
    pub fn canonical_bytes(&self) -> Vec<u8> {
        // serde_json maps are BTreeMap-backed, so key order is sorted,
        // not insertion order.
        let fields = json!({
            "amount": canonical_amount(&self.amount),
            "kind": self.kind.as_str(),
            "wallet_id": self.wallet_id.to_string(),
        });

        let mut bytes = Vec::with_capacity(96);
        bytes.extend_from_slice(ENCODING_DOMAIN.as_bytes());
        bytes.push(b':');
        bytes.extend_from_slice(fields.to_string().as_bytes());
        bytes
    }
}

/// Render an amount in its canonical text form.
///
/// Plain decimal notation, no exponent, no locale formatting, trailing
/// fractional zeros stripped — `1.00`, `1.0`, and `1` all render as `"1"`.
pub fn canonical_amount(amount: &Decimal) -> String {
    amount.normalize().to_string()
}
