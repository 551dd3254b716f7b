// Copyright (c) 2025-2026 The Ledger-CN Developers

//! Key image APDUs, used to recover the key image of an owned output
//! without exposing the one-time private key to the host.

use curve25519_dalek::ristretto::CompressedRistretto;
use encdec::{Decode, Encode};

use crate::{helpers::pt, ApduError, ApduStatic, Instruction, CN_APDU_CLA};

/// Recover the key image for the output at `output_index` of the
/// transaction identified by `tx_public_key`
///
/// ## Encoding:
/// ```text
///  0                   1                   2                   3
///  0 1 2 3 4 5 6 7 8 9 0 1 2 3 4 5 6 7 8 9 0 1 2 3 4 5 6 7 8 9 0 1
/// +-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+
/// |                                                               |
/// /                         TX_PUBLIC_KEY                         /
/// /                   (32-byte compressed point)                  /
/// |                                                               |
/// +-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+
/// |                          OUTPUT_INDEX                         |
/// |                          (8-byte u64)                         |
/// +-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+
/// |                                                               |
/// /                           OUTPUT_KEY                          /
/// /                   (32-byte compressed point)                  /
/// |                                                               |
/// +-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+
/// ```
#[derive(Clone, PartialEq, Debug, Encode, Decode)]
#[encdec(error = "ApduError")]
pub struct KeyImageReq {
    /// Transaction public key (`R = r·G`)
    #[encdec(with = "pt")]
    pub tx_public_key: CompressedRistretto,

    /// Index of the output within the transaction
    pub output_index: u64,

    /// One-time output key the image is requested for
    #[encdec(with = "pt")]
    pub output_key: CompressedRistretto,
}

impl KeyImageReq {
    /// Create a new key image request APDU
    pub fn new(
        tx_public_key: CompressedRistretto,
        output_index: u64,
        output_key: CompressedRistretto,
    ) -> Self {
        Self {
            tx_public_key,
            output_index,
            output_key,
        }
    }
}

impl ApduStatic for KeyImageReq {
    const CLA: u8 = CN_APDU_CLA;
    const INS: u8 = Instruction::GetKeyImage as u8;
}

/// Key image response APDU, a single 32-byte compressed point
#[derive(Clone, PartialEq, Debug, Encode, Decode)]
#[encdec(error = "ApduError")]
pub struct KeyImageResp {
    /// Computed key image
    #[encdec(with = "pt")]
    pub key_image: CompressedRistretto,
}

impl KeyImageResp {
    /// Create a new key image response APDU
    pub fn new(key_image: CompressedRistretto) -> Self {
        Self { key_image }
    }
}
