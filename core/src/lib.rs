// Copyright (c) 2025-2026 The Ledger-CN Developers

//! CryptoNote hardware wallet signing core
//!
//! This provides a common [Engine][engine] holding a device-resident master
//! key and building a transaction's signature material (one-time key images
//! and ring signatures) in response to short command messages, without the
//! master private key ever leaving the device.
//!
//! Interactions with the [Engine][engine] are performed via
//! [Event][engine::Event]s and [Output][engine::Output]s, see
//! [ledger_cn_apdu] for wire objects and encodings.
//!
//! ## Operations
//!
//! Wallet view keys (spend public + view private) can be requested via
//! [`WalletKeyReq`][ledger_cn_apdu::wallet_keys::WalletKeyReq], and key
//! images for owned outputs recovered via
//! [`KeyImageReq`][ledger_cn_apdu::key_image::KeyImageReq]; both require the
//! engine to be unlocked.
//!
//! ### Executing a transaction
//!
//! A transaction is a strictly ordered sequence of commands; any command
//! arriving out of order fails without mutating the session.
//!
//! 1. Issue [`TxStart`][ledger_cn_apdu::tx::TxStart] declaring the input and
//!    output counts to start a session (discarding and wiping any prior one)
//! 2. Issue [`TxAddOutput`][ledger_cn_apdu::tx::TxAddOutput] for each output;
//!    the device computes and retains the shared-secret derivation
//! 3. Issue [`TxFinalizePrefix`][ledger_cn_apdu::tx::TxFinalizePrefix]; the
//!    device blocks on user confirmation, then computes the binding
//!    [`prefix hash`][ledger_cn_apdu::tx::TxPrefixHash] every signature
//!    commits to
//! 4. Issue [`TxSignInput`][ledger_cn_apdu::tx::TxSignInput] for each input,
//!    carrying the ring and the real member index, receiving a
//!    [`TxSignature`][ledger_cn_apdu::tx::TxSignature] (key image + ring
//!    signature) per input
//! 5. Issue [`TxCommit`][ledger_cn_apdu::tx::TxCommit] to fetch the
//!    assembled [signature set][ledger_cn_apdu::tx::TxCommitResp] and close
//!    the session
//!
//! A [`TxDeny`][ledger_cn_apdu::tx::TxDeny] (or a rejected confirmation)
//! wipes the session working set and returns the engine to idle from any
//! state.

#![cfg_attr(not(feature = "std"), no_std)]

pub use ledger_cn_apdu::{self as apdu};

pub mod crypto;

pub mod engine;

mod error;
pub use error::Error;
