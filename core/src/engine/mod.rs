// Copyright (c) 2025-2026 The Ledger-CN Developers

//! The [Engine] provides the signing functionality required by hardware
//! wallets: it owns the single live transaction session, sequences the
//! commands that build and sign a transaction, and invokes the
//! [crypto][crate::crypto] primitives.
//!
//! This handles [Event] inputs and returns [Output] responses to the caller,
//! see [apdu][crate::apdu] for protocol / encoding specifications.
//!
//! Commands are strictly ordered: every mutating event carries an implicit
//! "current state matches the expected predecessor" precondition, checked
//! before any mutation, so replayed or reordered commands from a compromised
//! host fail with [`Error::UnexpectedEvent`] and change nothing.

use curve25519_dalek::{ristretto::CompressedRistretto, scalar::Scalar};
use rand_core::{CryptoRngCore, OsRng};
use strum::{Display, EnumIter, EnumString, EnumVariantNames};
use zeroize::Zeroize;

use ledger_cn_apdu::tx::TxSignature;

use crate::crypto::{
    decode_point, derive_secret_key, generate_key_derivation, generate_key_image,
    key_image_for_output, ring, WalletKeys,
};
use crate::Error;

mod event;
pub use event::Event;

mod output;
pub use output::Output;

mod session;
use session::{OutputEntry, Session};

/// Engine internal state enumeration
#[derive(Copy, Clone, PartialEq, Debug, EnumString, Display, EnumVariantNames, EnumIter)]
pub enum State {
    /// Idle state, no session running
    Idle,
    /// Session started, input/output counts declared
    InputsReceived,
    /// Accumulating outputs
    OutputsReceived,
    /// Prefix digest computed, signatures bind to it
    PrefixFinalized,
    /// Signing inputs
    Signing,
    /// Transaction complete
    Complete,
}

/// Confirmation request passed to the [`Driver`], the single blocking
/// suspension point of the engine
#[derive(Copy, Clone, PartialEq, Debug)]
pub enum Confirm {
    /// Approve signing the pending transaction
    SignTransaction { num_inputs: u8, num_outputs: u8 },
}

/// [`Driver`] trait provides platform support for [`Engine`] instances:
/// the device identity and the user-confirmation collaborator.
pub trait Driver {
    /// Fetch the device master spend key.
    ///
    /// The engine derives the remaining wallet identity from this and
    /// zeroizes every copy after each use; implementations must not retain
    /// references to engine-held key material.
    fn spend_private_key(&self) -> Scalar;

    /// Block on user confirmation for `request`.
    ///
    /// No other command is processed while this call is outstanding; a
    /// `false` return takes the deny path (working set wiped, session
    /// reset).
    fn confirm(&mut self, request: &Confirm) -> bool;
}

impl<T: Driver> Driver for &mut T {
    fn spend_private_key(&self) -> Scalar {
        T::spend_private_key(self)
    }

    fn confirm(&mut self, request: &Confirm) -> bool {
        T::confirm(self, request)
    }
}

/// [`Engine`] provides hardware-independent CryptoNote signing support
pub struct Engine<DRV: Driver, RNG: CryptoRngCore = OsRng> {
    state: State,
    unlocked: bool,

    session: Session,

    drv: DRV,
    rng: RNG,
}

impl<DRV: Driver> Engine<DRV> {
    /// Create a new engine instance with the provided driver,
    /// using the default [OsRng]
    pub const fn new(drv: DRV) -> Self {
        Self::new_with_rng(drv, OsRng {})
    }
}

impl<DRV: Driver, RNG: CryptoRngCore> Engine<DRV, RNG> {
    /// Create a new engine instance with the provided driver and rng
    pub const fn new_with_rng(drv: DRV, rng: RNG) -> Self {
        Self {
            state: State::Idle,
            unlocked: false,
            session: Session::new(),
            drv,
            rng,
        }
    }

    /// Handle incoming events
    pub fn update(&mut self, evt: &Event) -> Result<Output, Error> {
        #[cfg(feature = "log")]
        log::debug!("event (state: {:?}): {:02x?}", self.state, evt);

        match (self.state, evt) {
            // Empty event, do nothing
            (_, Event::None) => (),

            // Fetch view-only wallet keys
            (_, Event::GetWalletKeys) => {
                // Check for unlock state
                if !self.unlocked {
                    return Err(Error::ApprovalPending);
                }

                return Ok(self.get_wallet_keys());
            }

            // Recover the key image for an owned output
            (
                _,
                Event::GetKeyImage {
                    tx_public_key,
                    output_index,
                    output_key,
                },
            ) => {
                // Check for unlock state
                if !self.unlocked {
                    return Err(Error::ApprovalPending);
                }

                let mut keys = self.wallet_keys();
                let r = key_image_for_output(tx_public_key, *output_index, output_key, &keys);
                keys.zeroize();

                return Ok(Output::KeyImage {
                    key_image: r?.compress(),
                });
            }

            // Fetch a random value
            (_, Event::GetRandom) => {
                let mut value = [0u8; 32];
                self.rng.fill_bytes(&mut value);

                return Ok(Output::RandomValue { value });
            }

            // Start a session, discarding (and wiping) any prior one
            (
                _,
                Event::TxStart {
                    num_inputs,
                    num_outputs,
                },
            ) => {
                self.session.start(*num_inputs, *num_outputs)?;
                self.state = State::InputsReceived;
            }

            // Accumulate outputs, computing the shared-secret derivation
            // for each
            (
                State::InputsReceived | State::OutputsReceived,
                Event::TxAddOutput {
                    tx_public_key,
                    output_index,
                    output_key,
                },
            ) => {
                self.tx_add_output(tx_public_key, *output_index, output_key)?;
                self.state = State::OutputsReceived;
            }

            // Finalize the prefix: confirm with the user, then bind the
            // session to its digest
            (State::OutputsReceived, Event::TxFinalizePrefix) => {
                // All declared outputs must be present before binding
                if !self.session.outputs_complete() {
                    return Err(Error::UnexpectedEvent);
                }

                let request = Confirm::SignTransaction {
                    num_inputs: self.session.num_inputs(),
                    num_outputs: self.session.num_outputs(),
                };

                // The one blocking suspension point; rejection is the
                // deny path
                if !self.drv.confirm(&request) {
                    self.deny();
                    return Err(Error::OperationNotPermitted);
                }

                let prefix_hash = self.session.finalize_prefix();
                self.state = State::PrefixFinalized;

                return Ok(Output::TxPrefixHash { prefix_hash });
            }

            // Sign inputs, in session order
            (
                State::PrefixFinalized | State::Signing,
                Event::TxSignInput {
                    output_index,
                    real_index,
                    ring,
                },
            ) => {
                let sig = self.tx_sign_input(*output_index, *real_index as usize, ring)?;
                self.state = State::Signing;

                return Ok(Output::TxSignature(sig));
            }

            // Commit: emit the assembled signature set
            (State::Signing, Event::TxCommit) => {
                if !self.session.all_signed() {
                    return Err(Error::UnexpectedEvent);
                }

                let sigs = heapless::Vec::from_slice(self.session.signatures())
                    .map_err(|_| Error::Unknown)?;

                // Session secrets are no longer needed once every input
                // carries a signature
                self.session.wipe_secrets();
                self.state = State::Complete;

                return Ok(Output::TxSignatures(sigs));
            }

            // Deny: wipe and report, valid from any state
            (_, Event::TxDeny) => {
                self.deny();
                return Err(Error::OperationNotPermitted);
            }

            // Fetch session state / information
            (_, Event::TxGetInfo) => (),

            // Handle unexpected events
            _e => {
                #[cfg(feature = "log")]
                log::error!("Unexpected event in state {:?}: {:02x?}", self.state, _e);

                return Err(Error::UnexpectedEvent);
            }
        }

        // Default to returning updated state
        Ok(Output::State {
            state: self.state,
            value: self.state_value(),
        })
    }

    /// Fetch current engine state
    pub fn state(&self) -> State {
        self.state
    }

    /// Check whether engine is unlocked (ie. key requests and key image
    /// scanning have been approved)
    pub fn is_unlocked(&self) -> bool {
        self.unlocked
    }

    /// Unlock the engine (allowing key requests and scanning)
    pub fn unlock(&mut self) {
        self.unlocked = true;
    }

    /// Lock the engine (requires approval for key requests and scanning)
    pub fn lock(&mut self) {
        self.unlocked = false;
    }

    /// Deny the pending operation: wipe the working set and return to idle.
    ///
    /// Safe to invoke from any state; no secret material survives it.
    pub fn deny(&mut self) {
        self.session.wipe();
        self.state = State::Idle;
    }

    /// Reset engine state, wiping any live session
    pub fn reset(&mut self) {
        self.session.wipe();
        self.state = State::Idle;
    }

    /// Count reported alongside the state (outputs loaded while building,
    /// inputs signed while signing)
    fn state_value(&self) -> u16 {
        match self.state {
            State::OutputsReceived => self.session.outputs_loaded() as u16,
            State::Signing => self.session.signed() as u16,
            _ => 0,
        }
    }

    /// Build the wallet identity from the device master key
    fn wallet_keys(&self) -> WalletKeys {
        let mut spend_private = self.drv.spend_private_key();
        let keys = WalletKeys::from_spend_private(spend_private);

        spend_private.zeroize();

        keys
    }

    fn get_wallet_keys(&mut self) -> Output {
        let mut keys = self.wallet_keys();

        let r = Output::WalletKeys {
            spend_public: keys.spend_public().compress(),
            view_private: *keys.view_private(),
        };

        keys.zeroize();

        r
    }

    /// Validate an output, compute its derivation and append it to the
    /// session. No session mutation on any failure.
    fn tx_add_output(
        &mut self,
        tx_public_key: &CompressedRistretto,
        output_index: u64,
        output_key: &CompressedRistretto,
    ) -> Result<(), Error> {
        // The output key must itself be a valid point; it feeds the prefix
        // digest and later the ring
        decode_point(output_key)?;

        let mut keys = self.wallet_keys();
        let r = generate_key_derivation(tx_public_key, keys.view_private());
        keys.zeroize();

        let mut derivation = r?;

        let entry = OutputEntry {
            output_index,
            tx_public_key: tx_public_key.to_bytes(),
            output_key: output_key.to_bytes(),
        };

        let r = self.session.add_output(entry, &derivation);

        derivation.zeroize();

        r
    }

    /// Recover the one-time key for the real ring member, compute the key
    /// image and produce the ring signature bound to the session prefix.
    fn tx_sign_input(
        &mut self,
        output_index: u64,
        real_index: usize,
        ring_keys: &[CompressedRistretto],
    ) -> Result<TxSignature, Error> {
        // Reject further inputs once every declared input is signed
        if self.session.all_signed() {
            return Err(Error::UnexpectedEvent);
        }

        if real_index >= ring_keys.len() {
            return Err(Error::InvalidRingIndex);
        }

        // The real slot must hold the one-time key of the referenced output
        let (output_key, derivation_bytes) = match self.session.output(output_index) {
            Some((entry, derivation)) => (entry.output_key, *derivation),
            None => return Err(Error::InvalidKey),
        };

        if ring_keys[real_index].to_bytes() != output_key {
            return Err(Error::InvalidKey);
        }

        let derivation = decode_point(&CompressedRistretto(derivation_bytes))?;

        let mut keys = self.wallet_keys();
        let mut onetime_private =
            derive_secret_key(&derivation, output_index, keys.spend_private());
        keys.zeroize();

        let key_image = generate_key_image(&onetime_private, &ring_keys[real_index]);

        let r = ring::generate(
            self.session.prefix_hash(),
            &key_image,
            ring_keys,
            real_index,
            &onetime_private,
            &mut self.rng,
        );

        onetime_private.zeroize();

        let sig = TxSignature {
            input_index: self.session.signed() as u8,
            key_image: key_image.compress(),
            ring: r?,
        };

        self.session.push_signature(sig.clone())?;

        Ok(sig)
    }
}
