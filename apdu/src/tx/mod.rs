// Copyright (c) 2025-2026 The Ledger-CN Developers

//! Transaction session APDUs, used to build and sign a transaction.
//!
//! See `ledger-cn-core::engine` for the session state machine these drive.

use encdec::{Decode, Encode};

use crate::{state::TxState, ApduError, ApduStatic, Instruction, CN_APDU_CLA};

mod prefix;
pub use prefix::*;

mod sign;
pub use sign::*;

/// Maximum ring size accepted on the wire
pub const RING_MAX: usize = 16;

/// Maximum number of inputs signed within one session
pub const MAX_INPUTS: usize = 8;

/// Maximum number of outputs within one session
pub const MAX_OUTPUTS: usize = 16;

/// Start a transaction session, declaring the input and output counts.
///
/// Discards any live session (and wipes its working set) first.
///
/// ## Encoding:
/// ```text
///  0                   1
///  0 1 2 3 4 5 6 7 8 9 0 1 2 3 4 5
/// +-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+
/// |   NUM_INPUTS  |  NUM_OUTPUTS  |
/// +-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+
/// ```
#[derive(Clone, PartialEq, Debug, Encode, Decode)]
#[encdec(error = "ApduError")]
pub struct TxStart {
    /// Number of inputs that will be signed
    pub num_inputs: u8,
    /// Number of outputs that will be added
    pub num_outputs: u8,
}

impl TxStart {
    /// Create a new session start APDU
    pub fn new(num_inputs: u8, num_outputs: u8) -> Self {
        Self {
            num_inputs,
            num_outputs,
        }
    }
}

impl ApduStatic for TxStart {
    const CLA: u8 = CN_APDU_CLA;
    const INS: u8 = Instruction::TxStart as u8;
}

/// Commit the transaction, fetching the assembled signature set (0 length APDU)
#[derive(Clone, PartialEq, Debug, Encode, Decode)]
#[encdec(error = "ApduError")]
pub struct TxCommit;

impl ApduStatic for TxCommit {
    const CLA: u8 = CN_APDU_CLA;
    const INS: u8 = Instruction::TxCommit as u8;
}

/// Abort the session, wiping the working set (0 length APDU)
#[derive(Clone, PartialEq, Debug, Encode, Decode)]
#[encdec(error = "ApduError")]
pub struct TxDeny;

impl ApduStatic for TxDeny {
    const CLA: u8 = CN_APDU_CLA;
    const INS: u8 = Instruction::TxDeny as u8;
}

/// Session information request APDU (0 length APDU)
#[derive(Clone, PartialEq, Debug, Encode, Decode)]
#[encdec(error = "ApduError")]
pub struct TxInfoReq;

impl ApduStatic for TxInfoReq {
    const CLA: u8 = CN_APDU_CLA;
    const INS: u8 = Instruction::TxGetInfo as u8;
}

/// Session information response APDU.
///
/// Received in response to session commands without a dedicated response
/// body, contains the current session state and a value where relevant
/// (outputs loaded while building, inputs signed while signing).
///
/// ## Encoding:
/// ```text
///  0                   1                   2
///  0 1 2 3 4 5 6 7 8 9 0 1 2 3 4 5 6 7 8 9 0 1 2 3
/// +-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+
/// |     STATE     |             VALUE             |
/// +-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+
/// ```
#[derive(Clone, PartialEq, Debug, Encode, Decode)]
#[encdec(error = "ApduError")]
pub struct TxInfo {
    /// Current session state
    pub state: TxState,
    /// Value associated with the current state (zero otherwise)
    pub value: u16,
}

#[cfg(test)]
mod test {
    use super::*;
    use encdec::{Decode, Encode};

    #[test]
    fn tx_start_encode_decode() {
        let a = TxStart::new(2, 3);

        let mut buff = [0u8; 8];
        let n = a.encode(&mut buff).unwrap();
        assert_eq!(n, 2);

        let (b, m) = TxStart::decode(&buff).unwrap();
        assert_eq!(n, m);
        assert_eq!(a, b);
    }

    #[test]
    fn tx_info_encode_decode() {
        let a = TxInfo {
            state: TxState::Signing,
            value: 2,
        };

        let mut buff = [0u8; 8];
        let n = a.encode(&mut buff).unwrap();
        assert_eq!(n, 3);

        let (b, m) = TxInfo::decode(&buff).unwrap();
        assert_eq!(n, m);
        assert_eq!(a, b);
    }
}
