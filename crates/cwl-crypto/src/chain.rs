use cwl_types::TxDigest;

use crate::hasher::ChainHasher;

/// Trait for entries that participate in a wallet's hash chain.
pub trait ChainLink {
    /// The entry's own committed digest.
    fn digest(&self) -> TxDigest;
    /// The digest of the chain predecessor (genesis sentinel for the first).
    fn prev_digest(&self) -> TxDigest;
    /// Canonical payload bytes for digest recomputation.
    fn payload_bytes(&self) -> Vec<u8>;
}

/// Outcome of walking a chain: either intact, or broken at one index.
///
/// A broken chain is a normal verification result, not an error — callers
/// decide how to surface it.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum LinkCheck {
    Intact,
    Broken { index: usize, reason: BreakReason },
}

impl LinkCheck {
    pub fn is_intact(&self) -> bool {
        matches!(self, Self::Intact)
    }
}

/// Why a chain failed verification at a given index.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum BreakReason {
    /// The first entry's `prev_digest` is not the genesis sentinel.
    NonGenesisStart,
    /// An entry's `prev_digest` does not match its predecessor's digest.
    LinkMismatch,
    /// An entry's stored digest does not match the recomputed one.
    DigestMismatch,
}

/// Hash chain integrity verifier.
///
/// Walks a sequence of links in creation order and checks:
/// 1. The first link starts from the genesis sentinel
/// 2. Each subsequent link's `prev_digest` matches its predecessor's digest
/// 3. Each subsequent link's digest recomputes from its payload and
///    predecessor
///
/// The first link's own digest is accepted as stored; recomputation starts
/// at index 1. Verification short-circuits at the first broken link.
pub struct ChainVerifier;

impl ChainVerifier {
    pub fn verify(links: &[impl ChainLink]) -> LinkCheck {
        if links.is_empty() {
            return LinkCheck::Intact;
        }

        if !links[0].prev_digest().is_genesis() {
            return LinkCheck::Broken {
                index: 0,
                reason: BreakReason::NonGenesisStart,
            };
        }

        for i in 1..links.len() {
            let expected_prev = links[i - 1].digest();
            if links[i].prev_digest() != expected_prev {
                return LinkCheck::Broken {
                    index: i,
                    reason: BreakReason::LinkMismatch,
                };
            }

            let computed = ChainHasher::digest(&links[i].payload_bytes(), &expected_prev);
            if computed != links[i].digest() {
                return LinkCheck::Broken {
                    index: i,
                    reason: BreakReason::DigestMismatch,
                };
            }
        }

        LinkCheck::Intact
    }
}
