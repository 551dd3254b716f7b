// Copyright (c) 2025-2026 The Ledger-CN Developers

//! APDUs for building the transaction prefix: adding outputs and
//! finalizing the binding digest.

use curve25519_dalek::ristretto::CompressedRistretto;
use encdec::{Decode, Encode};

use crate::{helpers::pt, ApduError, ApduStatic, Instruction, CN_APDU_CLA};

/// Add an output to the pending transaction.
///
/// The device computes and retains the shared-secret derivation for the
/// output, the host never sees it.
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
pub struct TxAddOutput {
    /// Transaction public key the output was created under
    #[encdec(with = "pt")]
    pub tx_public_key: CompressedRistretto,

    /// Index of the output within the transaction
    pub output_index: u64,

    /// One-time output key
    #[encdec(with = "pt")]
    pub output_key: CompressedRistretto,
}

impl TxAddOutput {
    /// Create a new add-output APDU
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

impl ApduStatic for TxAddOutput {
    const CLA: u8 = CN_APDU_CLA;
    const INS: u8 = Instruction::TxAddOutput as u8;
}

/// Finalize the transaction prefix (0 length APDU).
///
/// Blocks on user confirmation, then computes the binding digest all
/// signatures commit to.
#[derive(Clone, PartialEq, Debug, Encode, Decode)]
#[encdec(error = "ApduError")]
pub struct TxFinalizePrefix;

impl ApduStatic for TxFinalizePrefix {
    const CLA: u8 = CN_APDU_CLA;
    const INS: u8 = Instruction::TxFinalizePrefix as u8;
}

/// Prefix hash response APDU, returned on successful finalization
#[derive(Clone, PartialEq, Debug, Encode, Decode)]
#[encdec(error = "ApduError")]
pub struct TxPrefixHash {
    /// Binding digest over the accumulated inputs/outputs
    pub prefix_hash: [u8; 32],
}

#[cfg(test)]
mod test {
    use super::*;
    use curve25519_dalek::{constants::RISTRETTO_BASEPOINT_POINT, scalar::Scalar};
    use encdec::{Decode, Encode};

    #[test]
    fn tx_add_output_encode_decode() {
        let p = |v: u64| (RISTRETTO_BASEPOINT_POINT * Scalar::from(v)).compress();

        let a = TxAddOutput::new(p(3), 1, p(5));

        let mut buff = [0u8; 128];
        let n = a.encode(&mut buff).unwrap();
        assert_eq!(n, 72);

        let (b, m) = TxAddOutput::decode(&buff).unwrap();
        assert_eq!(n, m);
        assert_eq!(a, b);
    }

    #[test]
    fn tx_prefix_hash_encode_decode() {
        let a = TxPrefixHash {
            prefix_hash: rand::random(),
        };

        let mut buff = [0u8; 32];
        let n = a.encode(&mut buff).unwrap();
        assert_eq!(n, 32);

        let (b, m) = TxPrefixHash::decode(&buff).unwrap();
        assert_eq!(n, m);
        assert_eq!(a, b);
    }
}
