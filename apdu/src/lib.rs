// Copyright (c) 2025-2026 The Ledger-CN Developers

//! Protocol / APDU definitions for CryptoNote hardware wallet communication
//!
//! This crate provides the protocol vocabulary shared between the signing
//! engine and hosts: request and response objects with binary wire encodings,
//! instruction codes, and the status-word convention appended to every
//! response.
//!
//! APDUs use a primitive binary encoding to simplify implementation with
//! other languages and platforms. All multi-byte integer fields are
//! little-endian, curve points are 32-byte compressed encodings, scalars are
//! 32-byte canonical little-endian encodings.
//!
//! Transport framing (chunking, channel negotiation) is owned by the
//! dispatcher and is not described here.

#![no_std]

pub use ledger_proto::{ApduError, ApduStatic};

pub mod key_image;
pub mod random;
pub mod state;
pub mod tx;
pub mod wallet_keys;

mod helpers;

/// CryptoNote wallet APDU class
pub const CN_APDU_CLA: u8 = 0xcf;

/// Protocol version, reported alongside responses by the dispatcher
pub const CN_PROTO_VERSION: u8 = 0x01;

/// CryptoNote wallet APDU instruction codes
#[derive(Copy, Clone, Debug, PartialEq)]
#[repr(u8)]
pub enum Instruction {
    /// Fetch wallet view keys (spend public + view private)
    GetWalletKeys = 0x10,

    /// Recover the key image for an owned output
    GetKeyImage = 0x12,

    /// Fetch a random value
    GetRandom = 0x13,

    /// Start a transaction session
    TxStart = 0x20,

    /// Add an output to the pending transaction
    TxAddOutput = 0x21,

    /// Finalize the transaction prefix (computes the binding digest)
    TxFinalizePrefix = 0x22,

    /// Sign one input with a ring signature
    TxSignInput = 0x23,

    /// Commit the transaction, fetching the assembled signature set
    TxCommit = 0x24,

    /// Abort the session, wiping the working set
    TxDeny = 0x25,

    /// Fetch transaction session state
    TxGetInfo = 0x26,
}
