// Copyright (c) 2025-2026 The Ledger-CN Developers

//! Shared-secret derivations and per-output one-time keys.
//!
//! A transaction carries a public key `R = r·G`; the shared derivation
//! `D = 8·a·R == 8·r·A` seeds a per-output scalar `H_s(D ‖ output_index)`
//! from which the one-time keypair is offset, so every output is spendable
//! with a unique, unlinkable key.

use curve25519_dalek::{
    ristretto::{CompressedRistretto, RistrettoPoint},
    scalar::Scalar,
};

use super::{decode_point, hash_to_scalar, keys::G, varint};
use crate::Error;

/// Compute the shared derivation `8 · private_key · public_key`.
///
/// Fails with [`Error::InvalidEncoding`] if the point encoding is invalid
/// and [`Error::InvalidKey`] if the scalar is degenerate.
pub fn generate_key_derivation(
    public_key: &CompressedRistretto,
    private_key: &Scalar,
) -> Result<RistrettoPoint, Error> {
    let p = decode_point(public_key)?;

    if private_key == &Scalar::ZERO {
        return Err(Error::InvalidKey);
    }

    Ok(Scalar::from(8u8) * private_key * p)
}

/// Hash a derivation and output index into the per-output scalar
/// `H_s(derivation ‖ varint(output_index))`
pub fn derivation_to_scalar(derivation: &RistrettoPoint, output_index: u64) -> Scalar {
    let (idx, n) = varint(output_index);

    hash_to_scalar(&[derivation.compress().as_bytes(), &idx[..n]])
}

/// Derive the one-time public key for an output:
/// `spend_public + H_s(derivation ‖ output_index)·G`
pub fn derive_public_key(
    derivation: &RistrettoPoint,
    output_index: u64,
    spend_public: &RistrettoPoint,
) -> RistrettoPoint {
    spend_public + derivation_to_scalar(derivation, output_index) * G
}

/// Derive the one-time private key for an output:
/// `spend_private + H_s(derivation ‖ output_index) mod L`
pub fn derive_secret_key(
    derivation: &RistrettoPoint,
    output_index: u64,
    spend_private: &Scalar,
) -> Scalar {
    spend_private + derivation_to_scalar(derivation, output_index)
}
