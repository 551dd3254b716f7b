// Copyright (c) 2025-2026 The Ledger-CN Developers

//! Session state and status words
//!

use encdec::{DecodeOwned, Encode};
use ledger_proto::ApduError;
use num_enum::TryFromPrimitive;
use strum::{Display, EnumIter, EnumString, EnumVariantNames};

/// Status word appended to successful responses
pub const SW_OK: u16 = 0x9000;

/// Status word for a user-denied operation, the working set has been wiped
pub const SW_DENIED: u16 = 0x6985;

/// Transaction session state enumeration
/// used in [`TxInfo`][crate::tx::TxInfo] to communicate session progress
#[derive(
    Copy, Clone, PartialEq, Debug, EnumString, Display, EnumVariantNames, EnumIter, TryFromPrimitive,
)]
#[repr(u8)]
pub enum TxState {
    /// No session live
    Idle = 0x00,
    /// Session started, input/output counts declared
    InputsReceived = 0x10,
    /// At least one output loaded
    OutputsReceived = 0x11,
    /// Prefix digest computed, ready for signing
    PrefixFinalized = 0x20,
    /// One or more inputs signed
    Signing = 0x21,
    /// All signatures emitted
    Complete = 0x30,
}

impl Encode for TxState {
    type Error = ApduError;

    fn encode_len(&self) -> Result<usize, ApduError> {
        Ok(1)
    }

    fn encode(&self, buff: &mut [u8]) -> Result<usize, ApduError> {
        if buff.is_empty() {
            return Err(ApduError::InvalidLength);
        }

        buff[0] = *self as u8;
        Ok(1)
    }
}

impl DecodeOwned for TxState {
    type Output = Self;

    type Error = ApduError;

    fn decode_owned(buff: &[u8]) -> Result<(Self::Output, usize), ApduError> {
        if buff.is_empty() {
            return Err(ApduError::InvalidLength);
        }

        match Self::try_from(buff[0]) {
            Ok(v) => Ok((v, 1)),
            Err(_) => Err(ApduError::InvalidEncoding),
        }
    }
}
