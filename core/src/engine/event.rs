// Copyright (c) 2025-2026 The Ledger-CN Developers

use curve25519_dalek::ristretto::CompressedRistretto;
use encdec::{Decode, DecodeOwned};
use heapless::Vec;

use ledger_cn_apdu::{
    key_image::KeyImageReq,
    random::RandomReq,
    tx::{
        TxAddOutput, TxCommit, TxDeny, TxFinalizePrefix, TxInfoReq, TxSignInput, TxStart, RING_MAX,
    },
    wallet_keys::WalletKeyReq,
    ApduError, ApduStatic,
};

/// [`Engine`][super::Engine] input events, typically decoded from request
/// APDUs
#[derive(Clone, Debug)]
pub enum Event {
    None,

    /// Fetch view-only wallet keys
    GetWalletKeys,

    /// Recover the key image for an owned output
    GetKeyImage {
        tx_public_key: CompressedRistretto,
        output_index: u64,
        output_key: CompressedRistretto,
    },

    /// Fetch random value via RNG
    GetRandom,

    /// Start a transaction session
    TxStart {
        num_inputs: u8,
        num_outputs: u8,
    },

    /// Add an output to the pending transaction
    TxAddOutput {
        tx_public_key: CompressedRistretto,
        output_index: u64,
        output_key: CompressedRistretto,
    },

    /// Finalize the transaction prefix (binding digest)
    TxFinalizePrefix,

    /// Sign one input with a ring signature
    TxSignInput {
        output_index: u64,
        real_index: u8,
        ring: Vec<CompressedRistretto, RING_MAX>,
    },

    /// Commit the transaction, fetching the assembled signature set
    TxCommit,

    /// Abort the session, wiping the working set
    TxDeny,

    /// Fetch session state
    TxGetInfo,
}

/// Helper for decoding APDUs to events
fn decode_event<'a, T>(buff: &'a [u8]) -> Result<Event, ApduError>
where
    T: Decode<'a, Error = ApduError>,
    Event: From<T::Output>,
{
    T::decode(buff).map(|(v, _n)| Event::from(v))
}

impl Event {
    /// Parse an incoming request to an engine event
    pub fn parse(ins: u8, buff: &[u8]) -> Result<Self, ApduError> {
        match ins {
            WalletKeyReq::INS => decode_event::<WalletKeyReq>(buff),
            KeyImageReq::INS => decode_event::<KeyImageReq>(buff),
            RandomReq::INS => decode_event::<RandomReq>(buff),

            TxStart::INS => decode_event::<TxStart>(buff),
            TxAddOutput::INS => decode_event::<TxAddOutput>(buff),
            TxFinalizePrefix::INS => decode_event::<TxFinalizePrefix>(buff),
            TxSignInput::INS => TxSignInput::decode_owned(buff).map(|(v, _n)| Event::from(v)),
            TxCommit::INS => decode_event::<TxCommit>(buff),
            TxDeny::INS => decode_event::<TxDeny>(buff),
            TxInfoReq::INS => decode_event::<TxInfoReq>(buff),

            _ => Err(ApduError::InvalidEncoding),
        }
    }
}

impl From<WalletKeyReq> for Event {
    fn from(_: WalletKeyReq) -> Self {
        Event::GetWalletKeys
    }
}

impl From<KeyImageReq> for Event {
    fn from(a: KeyImageReq) -> Self {
        Event::GetKeyImage {
            tx_public_key: a.tx_public_key,
            output_index: a.output_index,
            output_key: a.output_key,
        }
    }
}

impl From<RandomReq> for Event {
    fn from(_: RandomReq) -> Self {
        Event::GetRandom
    }
}

impl From<TxStart> for Event {
    fn from(a: TxStart) -> Self {
        Event::TxStart {
            num_inputs: a.num_inputs,
            num_outputs: a.num_outputs,
        }
    }
}

impl From<TxAddOutput> for Event {
    fn from(a: TxAddOutput) -> Self {
        Event::TxAddOutput {
            tx_public_key: a.tx_public_key,
            output_index: a.output_index,
            output_key: a.output_key,
        }
    }
}

impl From<TxFinalizePrefix> for Event {
    fn from(_: TxFinalizePrefix) -> Self {
        Event::TxFinalizePrefix
    }
}

impl From<TxSignInput> for Event {
    fn from(a: TxSignInput) -> Self {
        Event::TxSignInput {
            output_index: a.output_index,
            real_index: a.real_index,
            ring: a.ring,
        }
    }
}

impl From<TxCommit> for Event {
    fn from(_: TxCommit) -> Self {
        Event::TxCommit
    }
}

impl From<TxDeny> for Event {
    fn from(_: TxDeny) -> Self {
        Event::TxDeny
    }
}

impl From<TxInfoReq> for Event {
    fn from(_: TxInfoReq) -> Self {
        Event::TxGetInfo
    }
}
