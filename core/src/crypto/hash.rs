// Copyright (c) 2025-2026 The Ledger-CN Developers

//! Hash domains used across the primitives: scalar-domain hashing,
//! deterministic hash-to-point, 32-byte binding digests and the varint
//! encoding mixed into per-output domains.

use curve25519_dalek::{ristretto::RistrettoPoint, scalar::Scalar};
use sha2::{Digest, Sha512};

/// 32-byte binding digest (prefix hashes)
pub type Digest32 = [u8; 32];

/// Hash arbitrary parts into a scalar (wide reduction mod the group order)
pub fn hash_to_scalar(parts: &[&[u8]]) -> Scalar {
    let mut h = Sha512::new();
    for p in parts {
        h.update(p);
    }

    Scalar::from_hash(h)
}

/// Deterministically map an encoded point onto the curve.
///
/// Used for key images: the image base must have no known discrete log
/// relation to the group generator.
pub fn hash_to_point(encoded: &[u8; 32]) -> RistrettoPoint {
    let d = Sha512::new().chain_update(encoded).finalize();

    let mut wide = [0u8; 64];
    wide.copy_from_slice(d.as_ref());

    RistrettoPoint::from_uniform_bytes(&wide)
}

/// Variable-length (LEB128) encoding of an index, returned as
/// (buffer, length)
pub fn varint(mut value: u64) -> ([u8; 10], usize) {
    let mut buff = [0u8; 10];
    let mut n = 0;

    while value >= 0x80 {
        buff[n] = (value as u8 & 0x7f) | 0x80;
        value >>= 7;
        n += 1;
    }
    buff[n] = value as u8;

    (buff, n + 1)
}
