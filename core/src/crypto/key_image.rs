// Copyright (c) 2025-2026 The Ledger-CN Developers

//! Key images: the deterministic, unique tag a one-time private key leaves
//! on the ledger, consumed by validators for double-spend detection.

use curve25519_dalek::{
    ristretto::{CompressedRistretto, RistrettoPoint},
    scalar::Scalar,
};
use zeroize::Zeroize;

use super::{
    decode_point, derive_public_key, derive_secret_key, generate_key_derivation, hash_to_point,
    WalletKeys,
};
use crate::Error;

/// Compute the key image `I = x · H_p(P)` for a one-time keypair `(x, P)`
pub fn generate_key_image(
    onetime_private: &Scalar,
    onetime_public: &CompressedRistretto,
) -> RistrettoPoint {
    onetime_private * hash_to_point(onetime_public.as_bytes())
}

/// Recover the key image for an owned output from its transaction public
/// key, output index and one-time output key.
///
/// Composes derivation and key-image generation so the caller never handles
/// the intermediate one-time private key; that key is zeroized before
/// return. Fails with [`Error::InvalidKey`] if the recovered one-time public
/// key does not match `output_key` (the output does not belong to this
/// wallet).
pub fn key_image_for_output(
    tx_public_key: &CompressedRistretto,
    output_index: u64,
    output_key: &CompressedRistretto,
    keys: &WalletKeys,
) -> Result<RistrettoPoint, Error> {
    let expected = decode_point(output_key)?;

    let derivation = generate_key_derivation(tx_public_key, keys.view_private())?;

    // Check ownership against the public derivation before touching the
    // spend key
    if derive_public_key(&derivation, output_index, &keys.spend_public()) != expected {
        return Err(Error::InvalidKey);
    }

    let mut onetime_private = derive_secret_key(&derivation, output_index, keys.spend_private());
    let image = generate_key_image(&onetime_private, output_key);

    onetime_private.zeroize();

    Ok(image)
}

#[cfg(test)]
mod test {
    use super::*;
    use crate::crypto::generate_keypair;
    use rand_core::OsRng;

    #[test]
    fn key_image_deterministic() {
        let mut rng = OsRng {};
        let (x, p) = generate_keypair(&mut rng);

        let a = generate_key_image(&x, &p.compress());
        let b = generate_key_image(&x, &p.compress());

        assert_eq!(a, b);
    }

    #[test]
    fn key_image_recovery_matches_primitive() {
        let mut rng = OsRng {};

        let (spend_private, _) = generate_keypair(&mut rng);
        let keys = WalletKeys::from_spend_private(spend_private);

        let (r, tx_public) = generate_keypair(&mut rng);

        // Construct the output as a sender would
        let derivation =
            generate_key_derivation(&keys.view_public().compress(), &r).unwrap();
        let output_key = derive_public_key(&derivation, 3, &keys.spend_public()).compress();

        let image =
            key_image_for_output(&tx_public.compress(), 3, &output_key, &keys).unwrap();

        let onetime_private = derive_secret_key(&derivation, 3, keys.spend_private());
        assert_eq!(image, generate_key_image(&onetime_private, &output_key));
    }

    #[test]
    fn key_image_rejects_foreign_output() {
        let mut rng = OsRng {};

        let keys = WalletKeys::from_spend_private(generate_keypair(&mut rng).0);
        let (_, tx_public) = generate_keypair(&mut rng);
        let (_, stranger) = generate_keypair(&mut rng);

        assert_eq!(
            key_image_for_output(&tx_public.compress(), 0, &stranger.compress(), &keys),
            Err(Error::InvalidKey)
        );
    }
}
