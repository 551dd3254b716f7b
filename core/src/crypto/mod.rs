// Copyright (c) 2025-2026 The Ledger-CN Developers

//! Elliptic-curve primitives underlying the signing engine.
//!
//! All group operations are carried on the Ristretto group via
//! [curve25519-dalek][curve25519_dalek]: constant-time scalar
//! multiplication, strict canonical point encodings, no secret-dependent
//! branching or table lookups in any path handling key material.
//!
//! Attacker-supplied encodings are validated on entry ([`decode_point`],
//! [`decode_scalar`][keys::decode_scalar]) and never reach a multiplication
//! unchecked.

mod hash;
pub use hash::{hash_to_point, hash_to_scalar, varint, Digest32};

mod keys;
pub use keys::{decode_point, decode_scalar, generate_keypair, WalletKeys};

mod derive;
pub use derive::{
    derivation_to_scalar, derive_public_key, derive_secret_key, generate_key_derivation,
};

mod key_image;
pub use key_image::{generate_key_image, key_image_for_output};

pub mod ring;
pub use ring::{RingSignature, RING_MAX};

mod sig;
pub use sig::{check_signature, generate_signature, Signature};
