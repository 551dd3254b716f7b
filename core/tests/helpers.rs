// Copyright (c) 2025-2026 The Ledger-CN Developers

//! Shared helpers for integration tests

#![allow(unused)]

use curve25519_dalek::{ristretto::CompressedRistretto, scalar::Scalar};
use rand_core::OsRng;

use ledger_cn_core::{
    crypto::{derive_public_key, generate_key_derivation, generate_keypair, WalletKeys},
    engine::{Confirm, Driver},
};

/// Driver implementation for test use
pub struct TestDriver {
    spend: Scalar,
    approve: bool,
}

impl TestDriver {
    /// Create a new test driver with a random master key
    pub fn new() -> Self {
        Self {
            spend: Scalar::random(&mut OsRng {}),
            approve: true,
        }
    }

    /// Create a driver whose user rejects every confirmation
    pub fn denying() -> Self {
        Self {
            spend: Scalar::random(&mut OsRng {}),
            approve: false,
        }
    }

    /// Wallet identity matching the driver's master key
    pub fn keys(&self) -> WalletKeys {
        WalletKeys::from_spend_private(self.spend)
    }
}

impl Driver for TestDriver {
    fn spend_private_key(&self) -> Scalar {
        self.spend
    }

    fn confirm(&mut self, _request: &Confirm) -> bool {
        self.approve
    }
}

/// Construct an output owned by `keys`, as a sender would:
/// a fresh transaction keypair and the derived one-time output key
pub fn owned_output(
    keys: &WalletKeys,
    output_index: u64,
) -> (CompressedRistretto, CompressedRistretto) {
    let (r, tx_public) = generate_keypair(&mut OsRng {});

    let derivation = generate_key_derivation(&keys.view_public().compress(), &r).unwrap();
    let output_key = derive_public_key(&derivation, output_index, &keys.spend_public());

    (tx_public.compress(), output_key.compress())
}

/// A decoy ring member (a key nobody in the test owns)
pub fn decoy() -> CompressedRistretto {
    generate_keypair(&mut OsRng {}).1.compress()
}
