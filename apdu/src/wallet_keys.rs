// Copyright (c) 2025-2026 The Ledger-CN Developers

//! Wallet key APDUs, used to export the view-only wallet
//!
//! Only the spend _public_ key and view private key ever leave the device,
//! sufficient for a host to scan for incoming outputs without being able to
//! spend them.

use curve25519_dalek::{ristretto::CompressedRistretto, scalar::Scalar};
use encdec::{Decode, Encode};

use crate::{
    helpers::{pt, scalar},
    ApduError, ApduStatic, Instruction, CN_APDU_CLA,
};

/// Fetch the view-only wallet keys (0 length APDU)
#[derive(Clone, PartialEq, Debug, Encode, Decode)]
#[encdec(error = "ApduError")]
pub struct WalletKeyReq;

impl ApduStatic for WalletKeyReq {
    const CLA: u8 = CN_APDU_CLA;
    const INS: u8 = Instruction::GetWalletKeys as u8;
}

/// Wallet key response APDU
///
/// ## Encoding:
/// ```text
///  0                   1                   2                   3
///  0 1 2 3 4 5 6 7 8 9 0 1 2 3 4 5 6 7 8 9 0 1 2 3 4 5 6 7 8 9 0 1
/// +-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+
/// |                                                               |
/// /                       SPEND_PUBLIC_KEY                        /
/// /                  (32-byte compressed point)                   /
/// |                                                               |
/// +-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+
/// |                                                               |
/// /                       VIEW_PRIVATE_KEY                        /
/// /                   (32-byte canonical scalar)                  /
/// |                                                               |
/// +-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+
/// ```
#[derive(Clone, PartialEq, Debug, Encode, Decode)]
#[encdec(error = "ApduError")]
pub struct WalletKeyResp {
    /// Root spend public key
    #[encdec(with = "pt")]
    pub spend_public: CompressedRistretto,

    /// Root view private key
    #[encdec(with = "scalar")]
    pub view_private: Scalar,
}

impl WalletKeyResp {
    /// Create a new wallet key response APDU
    pub fn new(spend_public: CompressedRistretto, view_private: Scalar) -> Self {
        Self {
            spend_public,
            view_private,
        }
    }
}
