// Copyright (c) 2025-2026 The Ledger-CN Developers

//! CryptoNote ring signatures.
//!
//! A ring signature proves that one member of a stated set of public keys
//! signed the prefix hash, without revealing which. Decoy slots carry
//! uniformly random (challenge, response) pairs; the real slot is solved
//! algebraically so the challenges close over the commitment hash:
//!
//! ```text
//! L_i = r_i·G + c_i·P_i
//! R_i = r_i·H_p(P_i) + c_i·I
//! Σ c_i == H_s(prefix_hash ‖ I ‖ L_0 R_0 … L_n R_n)
//! ```
//!
//! A ring of length 1 degenerates to a plain Schnorr signature and satisfies
//! the same closure equation.

use curve25519_dalek::{
    ristretto::{CompressedRistretto, RistrettoPoint},
    scalar::Scalar,
};
use rand_core::CryptoRngCore;
use sha2::{Digest, Sha512};
use zeroize::Zeroize;

use super::{decode_point, hash_to_point, Digest32};
use crate::Error;

/// Maximum ring size
pub const RING_MAX: usize = 16;

// Wire bound and signing bound must agree
static_assertions::const_assert_eq!(RING_MAX, ledger_cn_apdu::tx::RING_MAX);

/// Ring signature: one (challenge, response) pair per ring member,
/// in ring order
pub type RingSignature = heapless::Vec<(Scalar, Scalar), RING_MAX>;

/// Generate a ring signature over `prefix_hash` for the ring member at
/// `real_index`, spendable with `onetime_private`.
///
/// Fails with [`Error::InvalidRingIndex`] if `real_index` is out of range,
/// [`Error::InvalidEncoding`] if a ring member is not a valid point,
/// [`Error::InvalidKey`] if `onetime_private` does not open the real member,
/// and [`Error::InvalidLength`] for an empty or oversized ring.
pub fn generate(
    prefix_hash: &Digest32,
    key_image: &RistrettoPoint,
    ring: &[CompressedRistretto],
    real_index: usize,
    onetime_private: &Scalar,
    rng: &mut impl CryptoRngCore,
) -> Result<RingSignature, Error> {
    if ring.is_empty() || ring.len() > RING_MAX {
        return Err(Error::InvalidLength);
    }
    if real_index >= ring.len() {
        return Err(Error::InvalidRingIndex);
    }

    let mut h = Sha512::new();
    h.update(prefix_hash);
    h.update(key_image.compress().as_bytes());

    let mut sig = RingSignature::new();
    let mut sum = Scalar::ZERO;
    let mut k = Scalar::ZERO;

    for (i, member) in ring.iter().enumerate() {
        let p = decode_point(member)?;
        let hp = hash_to_point(member.as_bytes());

        if i == real_index {
            // The claimed spend must open the real slot
            if RistrettoPoint::mul_base(onetime_private) != p {
                return Err(Error::InvalidKey);
            }

            k = Scalar::random(rng);
            h.update(RistrettoPoint::mul_base(&k).compress().as_bytes());
            h.update((k * hp).compress().as_bytes());

            // Placeholder, solved below once the aggregate challenge is known
            let _ = sig.push((Scalar::ZERO, Scalar::ZERO));
        } else {
            let c = Scalar::random(rng);
            let r = Scalar::random(rng);

            h.update((RistrettoPoint::mul_base(&r) + c * p).compress().as_bytes());
            h.update((r * hp + c * key_image).compress().as_bytes());

            sum += c;
            let _ = sig.push((c, r));
        }
    }

    // Close the ring: the real challenge absorbs the difference, the real
    // response hides the commitment nonce
    let c_real = Scalar::from_hash(h) - sum;
    let r_real = k - c_real * onetime_private;

    sig[real_index] = (c_real, r_real);

    k.zeroize();

    Ok(sig)
}

/// Verify a ring signature.
///
/// Total function: any malformed input (bad point, length mismatch) yields
/// `false`, never an error, since verification may run over fully
/// attacker-supplied data.
pub fn verify(
    prefix_hash: &Digest32,
    key_image: &CompressedRistretto,
    ring: &[CompressedRistretto],
    signature: &[(Scalar, Scalar)],
) -> bool {
    if ring.is_empty() || ring.len() > RING_MAX || signature.len() != ring.len() {
        return false;
    }

    let image = match key_image.decompress() {
        Some(v) => v,
        None => return false,
    };

    let mut h = Sha512::new();
    h.update(prefix_hash);
    h.update(key_image.as_bytes());

    let mut sum = Scalar::ZERO;

    for (member, (c, r)) in ring.iter().zip(signature.iter().copied()) {
        let p = match member.decompress() {
            Some(v) => v,
            None => return false,
        };
        let hp = hash_to_point(member.as_bytes());

        h.update((RistrettoPoint::mul_base(&r) + c * p).compress().as_bytes());
        h.update((r * hp + c * image).compress().as_bytes());

        sum += c;
    }

    // Scalar equality is constant time (subtle backed)
    Scalar::from_hash(h) == sum
}

#[cfg(test)]
mod test {
    use super::*;
    use crate::crypto::{generate_key_image, generate_keypair};
    use rand_core::OsRng;

    fn build_ring(
        size: usize,
        real_index: usize,
    ) -> (heapless::Vec<CompressedRistretto, RING_MAX>, Scalar) {
        let mut rng = OsRng {};
        let mut ring = heapless::Vec::new();
        let mut onetime_private = Scalar::ZERO;

        for i in 0..size {
            let (x, p) = generate_keypair(&mut rng);
            if i == real_index {
                onetime_private = x;
            }
            let _ = ring.push(p.compress());
        }

        (ring, onetime_private)
    }

    #[test]
    fn ring_sign_verify() {
        let mut rng = OsRng {};
        let prefix_hash = [0x5a; 32];

        let (ring, x) = build_ring(RING_MAX, 3);
        let key_image = generate_key_image(&x, &ring[3]);

        let sig = generate(&prefix_hash, &key_image, &ring, 3, &x, &mut rng).unwrap();

        assert_eq!(sig.len(), ring.len());
        assert!(verify(&prefix_hash, &key_image.compress(), &ring, &sig));
    }

    #[test]
    fn ring_rejects_bad_index() {
        let mut rng = OsRng {};
        let (ring, x) = build_ring(4, 0);
        let key_image = generate_key_image(&x, &ring[0]);

        assert_eq!(
            generate(&[0u8; 32], &key_image, &ring, 4, &x, &mut rng),
            Err(Error::InvalidRingIndex)
        );

        assert_eq!(
            generate(&[0u8; 32], &key_image, &[], 0, &x, &mut rng),
            Err(Error::InvalidLength)
        );
    }

    #[test]
    fn ring_rejects_wrong_key() {
        let mut rng = OsRng {};
        let (ring, x) = build_ring(4, 1);
        let key_image = generate_key_image(&x, &ring[1]);

        // Signing for a slot the key does not open
        assert_eq!(
            generate(&[0u8; 32], &key_image, &ring, 2, &x, &mut rng),
            Err(Error::InvalidKey)
        );
    }

    #[test]
    fn verify_is_total() {
        let (ring, _) = build_ring(3, 0);
        let sig = [(Scalar::ZERO, Scalar::ZERO); 3];

        // Invalid key image encoding
        assert!(!verify(&[0u8; 32], &CompressedRistretto([0xff; 32]), &ring, &sig));

        // Length mismatch
        let good_image = ring[0];
        assert!(!verify(&[0u8; 32], &good_image, &ring, &sig[..2]));

        // Invalid ring member encoding
        let mut bad_ring = ring.clone();
        bad_ring[1] = CompressedRistretto([0xff; 32]);
        assert!(!verify(&[0u8; 32], &good_image, &bad_ring, &sig));
    }
}
