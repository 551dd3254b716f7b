// Copyright (c) 2025-2026 The Ledger-CN Developers

//! Single-key Schnorr signatures over a message digest, the non-ring
//! companion to [ring][super::ring] (and the shape a ring of one collapses
//! to).

use curve25519_dalek::{
    ristretto::{CompressedRistretto, RistrettoPoint},
    scalar::Scalar,
};
use rand_core::CryptoRngCore;
use zeroize::Zeroize;

use super::{decode_point, hash_to_scalar, Digest32};
use crate::Error;

/// Schnorr signature (challenge, response)
#[derive(Copy, Clone, PartialEq, Debug)]
pub struct Signature {
    pub c: Scalar,
    pub r: Scalar,
}

/// Sign a 32-byte digest with `private_key`.
///
/// Fails with [`Error::InvalidKey`] if `public_key` does not match the
/// private key.
pub fn generate_signature(
    digest: &Digest32,
    public_key: &CompressedRistretto,
    private_key: &Scalar,
    rng: &mut impl CryptoRngCore,
) -> Result<Signature, Error> {
    let p = decode_point(public_key)?;

    if RistrettoPoint::mul_base(private_key) != p {
        return Err(Error::InvalidKey);
    }

    let mut k = Scalar::random(rng);
    let commitment = RistrettoPoint::mul_base(&k);

    let c = hash_to_scalar(&[
        digest,
        public_key.as_bytes(),
        commitment.compress().as_bytes(),
    ]);
    let r = k - c * private_key;

    k.zeroize();

    Ok(Signature { c, r })
}

/// Check a signature over a 32-byte digest.
///
/// Total function: malformed inputs yield `false`.
pub fn check_signature(
    digest: &Digest32,
    public_key: &CompressedRistretto,
    signature: &Signature,
) -> bool {
    let p = match public_key.decompress() {
        Some(v) => v,
        None => return false,
    };

    let commitment = RistrettoPoint::mul_base(&signature.r) + signature.c * p;

    let c = hash_to_scalar(&[
        digest,
        public_key.as_bytes(),
        commitment.compress().as_bytes(),
    ]);

    c == signature.c
}
