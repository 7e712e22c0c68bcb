use sha2::{Digest, Sha256};

use cwl_types::TxDigest;

/// Chain digest computation.
///
/// A transaction's digest is `SHA-256(payload ‖ prev_hex)` where `payload`
/// is the canonical byte form of its hashed fields and `prev_hex` is the
/// 64-character lowercase hex rendering of the predecessor's digest (the
/// genesis sentinel for a wallet's first transaction). Hashing the *hex*
/// form of the previous digest, rather than its raw bytes, is part of the
/// frozen digest contract.
pub struct ChainHasher;

impl ChainHasher {
    /// Compute the chain digest for a payload and its predecessor.
    ///
    /// Pure and stateless: the same inputs always produce the same digest,
    /// and any single-bit change to either input changes it.
    pub fn digest(payload: &[u8], prev: &TxDigest) -> TxDigest {
        let mut hasher = Sha256::new();
        hasher.update(payload);
        hasher.update(prev.to_hex().as_bytes());
        TxDigest::from_raw(hasher.finalize().into())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn bit_distance(a: &TxDigest, b: &TxDigest) -> u32 {
        a.as_bytes()
            .iter()
            .zip(b.as_bytes())
            .map(|(x, y)| (x ^ y).count_ones())
            .sum()
    }

    #[test]
    fn digest_is_deterministic() {
        let prev = TxDigest::GENESIS;
        let a = ChainHasher::digest(b"payload-bytes", &prev);
        let b = ChainHasher::digest(b"payload-bytes", &prev);
        assert_eq!(a, b);
    }

    #[test]
    fn known_genesis_vector() {
        let digest = ChainHasher::digest(b"payload-bytes", &TxDigest::GENESIS);
        assert_eq!(
            digest.to_hex(),
            "c6728ef314c388a5333d0f63d4d2a2f8799af603aa889978f33556130aaf455d"
        );
    }

    #[test]
    fn digest_depends_on_payload() {
        let prev = TxDigest::GENESIS;
        assert_ne!(
            ChainHasher::digest(b"payload-a", &prev),
            ChainHasher::digest(b"payload-b", &prev)
        );
    }

    #[test]
    fn digest_depends_on_previous() {
        let a = ChainHasher::digest(b"payload", &TxDigest::GENESIS);
        let b = ChainHasher::digest(b"payload", &TxDigest::from_raw([1; 32]));
        assert_ne!(a, b);
    }

    #[test]
    fn digest_is_lowercase_hex() {
        let digest = ChainHasher::digest(b"payload", &TxDigest::GENESIS);
        let hex = digest.to_hex();
        assert_eq!(hex.len(), 64);
        assert!(hex.bytes().all(|b| b.is_ascii_hexdigit() && !b.is_ascii_uppercase()));
    }

    #[test]
    fn single_byte_flip_avalanches() {
        let prev = TxDigest::GENESIS;
        let base = ChainHasher::digest(b"amount:10.00", &prev);

        let mut total = 0u32;
        for i in 0..20u8 {
            let mut tampered = b"amount:10.00".to_vec();
            let idx = (i as usize) % tampered.len();
            tampered[idx] ^= 1 << (i % 8);
            let flipped = ChainHasher::digest(&tampered, &prev);
            assert_ne!(flipped, base);

            let distance = bit_distance(&base, &flipped);
            // A single SHA-256 sample lands near 128 of 256 bits; 64 is
            // already an astronomically unlikely floor.
            assert!(distance > 64, "only {distance} bits changed");
            total += distance;
        }

        let average = total / 20;
        assert!(average >= 100, "average distance {average} too low");
    }
}
