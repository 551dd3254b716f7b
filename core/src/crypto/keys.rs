// Copyright (c) 2025-2026 The Ledger-CN Developers

//! Wallet identity and encoding validation.
//!
//! The wallet holds a master spend scalar; the view scalar is derived from
//! it by scalar-domain hashing so a single device secret reconstructs the
//! whole identity.

use curve25519_dalek::{
    constants::RISTRETTO_BASEPOINT_POINT,
    ristretto::{CompressedRistretto, RistrettoPoint},
    scalar::Scalar,
};
use rand_core::CryptoRngCore;
use zeroize::{Zeroize, ZeroizeOnDrop};

use super::hash_to_scalar;
use crate::Error;

/// Decode and validate a compressed point.
///
/// Fails with [`Error::InvalidEncoding`] unless the bytes are the canonical
/// encoding of a group element; mandatory before any attacker-supplied point
/// is used.
pub fn decode_point(p: &CompressedRistretto) -> Result<RistrettoPoint, Error> {
    p.decompress().ok_or(Error::InvalidEncoding)
}

/// Decode and validate a scalar, rejecting non-canonical encodings
pub fn decode_scalar(b: &[u8; 32]) -> Result<Scalar, Error> {
    Option::<Scalar>::from(Scalar::from_canonical_bytes(*b)).ok_or(Error::InvalidEncoding)
}

/// Generate a random keypair
pub fn generate_keypair(rng: &mut impl CryptoRngCore) -> (Scalar, RistrettoPoint) {
    let private = Scalar::random(rng);
    let public = RistrettoPoint::mul_base(&private);

    (private, public)
}

/// Device-resident wallet identity.
///
/// Holds the master spend scalar and the view scalar derived from it.
/// Instances are short-lived: fetched from the driver for one operation and
/// zeroized immediately after use (and on drop).
#[derive(Clone, Zeroize, ZeroizeOnDrop)]
pub struct WalletKeys {
    spend_private: Scalar,
    view_private: Scalar,
}

impl WalletKeys {
    /// Build the full identity from the master spend key,
    /// deriving `view_private = H_s(spend_private)`
    pub fn from_spend_private(spend_private: Scalar) -> Self {
        let view_private = hash_to_scalar(&[spend_private.as_bytes()]);

        Self {
            spend_private,
            view_private,
        }
    }

    /// Master spend private key
    pub fn spend_private(&self) -> &Scalar {
        &self.spend_private
    }

    /// View private key
    pub fn view_private(&self) -> &Scalar {
        &self.view_private
    }

    /// Spend public key (`spend_private · G`)
    pub fn spend_public(&self) -> RistrettoPoint {
        RistrettoPoint::mul_base(&self.spend_private)
    }

    /// View public key (`view_private · G`)
    pub fn view_public(&self) -> RistrettoPoint {
        RistrettoPoint::mul_base(&self.view_private)
    }
}

/// Curve base point, re-exported for the signing paths
pub(crate) const G: RistrettoPoint = RISTRETTO_BASEPOINT_POINT;
