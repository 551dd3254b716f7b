// Copyright (c) 2025-2026 The Ledger-CN Developers

use curve25519_dalek::{ristretto::CompressedRistretto, scalar::Scalar};
use encdec::Encode;
use heapless::Vec;

use ledger_cn_apdu::{
    state::TxState,
    tx::{TxCommitResp, TxSignature, MAX_INPUTS},
    ApduError,
};

use crate::{apdu, crypto::Digest32};

use super::State;

/// [`Engine`][super::Engine] outputs (in response to events), typically
/// encoded to response APDUs
#[derive(Clone, PartialEq, Debug)]
pub enum Output {
    None,

    /// Session state
    State { state: State, value: u16 },

    /// View-only wallet keys
    WalletKeys {
        spend_public: CompressedRistretto,
        view_private: Scalar,
    },

    /// Recovered key image
    KeyImage { key_image: CompressedRistretto },

    /// Random value
    RandomValue { value: [u8; 32] },

    /// Binding digest from prefix finalization
    TxPrefixHash { prefix_hash: Digest32 },

    /// Key image and ring signature for one signed input
    TxSignature(TxSignature),

    /// Assembled signature set, in input order
    TxSignatures(Vec<TxSignature, MAX_INPUTS>),
}

impl Output {
    /// Encode an [`Output`] object to a response APDU
    pub fn encode(&self, buff: &mut [u8]) -> Result<usize, ApduError> {
        match self.clone() {
            Output::None => Ok(0),
            Output::State { state, value } => apdu::tx::TxInfo {
                state: state.state(),
                value,
            }
            .encode(buff),
            Output::WalletKeys {
                spend_public,
                view_private,
            } => apdu::wallet_keys::WalletKeyResp {
                spend_public,
                view_private,
            }
            .encode(buff),
            Output::KeyImage { key_image } => {
                apdu::key_image::KeyImageResp { key_image }.encode(buff)
            }
            Output::RandomValue { value } => apdu::random::RandomResp { value }.encode(buff),
            Output::TxPrefixHash { prefix_hash } => {
                apdu::tx::TxPrefixHash { prefix_hash }.encode(buff)
            }
            Output::TxSignature(sig) => sig.encode(buff),
            Output::TxSignatures(signatures) => TxCommitResp { signatures }.encode(buff),
        }
    }

    /// Fetch state for outputs containing this
    pub fn state(&self) -> Option<State> {
        match &self {
            Output::State { state, .. } => Some(*state),
            _ => None,
        }
    }
}

impl PartialEq<State> for Output {
    fn eq(&self, other: &State) -> bool {
        match self {
            Output::State { state, .. } => state == other,
            _ => false,
        }
    }
}

impl State {
    /// Map [engine][crate::engine] states to wire states for transmission
    pub fn state(&self) -> TxState {
        match self {
            State::Idle => TxState::Idle,
            State::InputsReceived => TxState::InputsReceived,
            State::OutputsReceived => TxState::OutputsReceived,
            State::PrefixFinalized => TxState::PrefixFinalized,
            State::Signing => TxState::Signing,
            State::Complete => TxState::Complete,
        }
    }
}
