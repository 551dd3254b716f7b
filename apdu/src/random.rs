// Copyright (c) 2025-2026 The Ledger-CN Developers

//! Random value APDUs, exposing the device TRNG to the host
//! (used by hosts without a trustworthy entropy source)

use encdec::{Decode, Encode};

use crate::{ApduError, ApduStatic, Instruction, CN_APDU_CLA};

/// Fetch a random value (0 length APDU)
#[derive(Clone, PartialEq, Debug, Encode, Decode)]
#[encdec(error = "ApduError")]
pub struct RandomReq;

impl ApduStatic for RandomReq {
    const CLA: u8 = CN_APDU_CLA;
    const INS: u8 = Instruction::GetRandom as u8;
}

/// Random value response APDU, 32 bytes of device entropy
#[derive(Clone, PartialEq, Debug, Encode, Decode)]
#[encdec(error = "ApduError")]
pub struct RandomResp {
    /// Random value
    pub value: [u8; 32],
}
