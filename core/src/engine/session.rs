// Copyright (c) 2025-2026 The Ledger-CN Developers

//! Transaction session storage: output descriptors, accumulated signatures
//! and the working set holding secret material in transit.
//!
//! The working set is the only place session secrets live and is zeroed on
//! every exit path: deny, session restart, commit and drop.

use curve25519_dalek::ristretto::RistrettoPoint;
use heapless::Vec;
use sha2::{Digest as _, Sha512_256};
use zeroize::{Zeroize, ZeroizeOnDrop};

use ledger_cn_apdu::tx::{TxSignature, MAX_INPUTS, MAX_OUTPUTS};

use crate::crypto::{varint, Digest32};
use crate::Error;

/// Version byte leading the canonical prefix layout
const PREFIX_VERSION: u8 = 0x01;

/// Descriptor for a loaded output (public data; the matching derivation
/// lives in the [`WorkingSet`] slot of the same index)
#[derive(Clone, Debug, Default)]
pub(crate) struct OutputEntry {
    pub output_index: u64,
    pub tx_public_key: [u8; 32],
    pub output_key: [u8; 32],
}

/// Fixed scratch region for per-session secret material.
///
/// One derivation slot per possible output; wiped wholesale rather than
/// tracking which slots are live.
#[derive(Zeroize, ZeroizeOnDrop)]
pub(crate) struct WorkingSet {
    derivations: [[u8; 32]; MAX_OUTPUTS],
}

impl WorkingSet {
    const fn new() -> Self {
        Self {
            derivations: [[0u8; 32]; MAX_OUTPUTS],
        }
    }

    /// Raw view over the scratch region, for wipe verification
    #[cfg(test)]
    pub fn bytes(&self) -> impl Iterator<Item = u8> + '_ {
        self.derivations.iter().flatten().copied()
    }
}

/// A single transaction session.
///
/// Exactly one session is live at a time; the engine discards (and wipes)
/// the previous one on [`start`][Self::start].
pub(crate) struct Session {
    num_inputs: u8,
    num_outputs: u8,

    outputs: Vec<OutputEntry, MAX_OUTPUTS>,

    pub(crate) working: WorkingSet,

    prefix_hash: Digest32,

    signatures: Vec<TxSignature, MAX_INPUTS>,
}

impl Session {
    pub const fn new() -> Self {
        Self {
            num_inputs: 0,
            num_outputs: 0,
            outputs: Vec::new(),
            working: WorkingSet::new(),
            prefix_hash: [0u8; 32],
            signatures: Vec::new(),
        }
    }

    /// Reset for a new transaction, wiping anything left from the last one
    pub fn start(&mut self, num_inputs: u8, num_outputs: u8) -> Result<(), Error> {
        if num_inputs == 0
            || num_inputs as usize > MAX_INPUTS
            || num_outputs == 0
            || num_outputs as usize > MAX_OUTPUTS
        {
            return Err(Error::InvalidLength);
        }

        self.wipe();

        self.num_inputs = num_inputs;
        self.num_outputs = num_outputs;

        Ok(())
    }

    /// Append an output descriptor and stash its derivation in the
    /// working set
    pub fn add_output(
        &mut self,
        entry: OutputEntry,
        derivation: &RistrettoPoint,
    ) -> Result<(), Error> {
        if self.outputs.len() >= self.num_outputs as usize {
            return Err(Error::InvalidLength);
        }

        // An output index can only be loaded once per session
        if self.outputs.iter().any(|o| o.output_index == entry.output_index) {
            return Err(Error::UnexpectedEvent);
        }

        self.working.derivations[self.outputs.len()] = derivation.compress().to_bytes();
        let _ = self.outputs.push(entry);

        Ok(())
    }

    /// Whether every declared output has been loaded
    pub fn outputs_complete(&self) -> bool {
        self.outputs.len() == self.num_outputs as usize
    }

    pub fn num_inputs(&self) -> u8 {
        self.num_inputs
    }

    pub fn num_outputs(&self) -> u8 {
        self.num_outputs
    }

    pub fn outputs_loaded(&self) -> usize {
        self.outputs.len()
    }

    /// Serialize the accumulated inputs/outputs into the canonical layout
    /// and bind the session to its digest.
    ///
    /// Layout: `version ‖ varint(num_inputs) ‖ varint(num_outputs) ‖
    /// per-output (varint(output_index) ‖ tx_public_key ‖ output_key)`,
    /// streamed straight into the hasher.
    pub fn finalize_prefix(&mut self) -> Digest32 {
        let mut h = Sha512_256::new();

        h.update([PREFIX_VERSION]);

        let (b, n) = varint(self.num_inputs as u64);
        h.update(&b[..n]);
        let (b, n) = varint(self.num_outputs as u64);
        h.update(&b[..n]);

        for o in &self.outputs {
            let (b, n) = varint(o.output_index);
            h.update(&b[..n]);
            h.update(o.tx_public_key);
            h.update(o.output_key);
        }

        self.prefix_hash.copy_from_slice(h.finalize().as_ref());
        self.prefix_hash
    }

    /// Binding digest computed by [`finalize_prefix`][Self::finalize_prefix]
    pub fn prefix_hash(&self) -> &Digest32 {
        &self.prefix_hash
    }

    /// Look up a loaded output and its derivation by output index
    pub fn output(&self, output_index: u64) -> Option<(&OutputEntry, &[u8; 32])> {
        self.outputs
            .iter()
            .position(|o| o.output_index == output_index)
            .map(|i| (&self.outputs[i], &self.working.derivations[i]))
    }

    /// Append a produced signature (session order)
    pub fn push_signature(&mut self, sig: TxSignature) -> Result<(), Error> {
        self.signatures.push(sig).map_err(|_| Error::InvalidLength)
    }

    pub fn signed(&self) -> usize {
        self.signatures.len()
    }

    /// Whether every declared input carries a signature
    pub fn all_signed(&self) -> bool {
        self.num_inputs != 0 && self.signatures.len() == self.num_inputs as usize
    }

    pub fn signatures(&self) -> &[TxSignature] {
        &self.signatures
    }

    /// Zero the working set once signing is finished; descriptors and
    /// signatures remain readable for the commit response
    pub fn wipe_secrets(&mut self) {
        self.working.zeroize();
    }

    /// Wipe the whole session: scratch secrets, descriptors, digest and
    /// accumulated signatures
    pub fn wipe(&mut self) {
        self.working.zeroize();
        self.prefix_hash.zeroize();
        self.outputs.clear();
        self.signatures.clear();
        self.num_inputs = 0;
        self.num_outputs = 0;
    }
}

impl Drop for Session {
    fn drop(&mut self) {
        self.wipe();
    }
}

#[cfg(test)]
mod test {
    use super::*;
    use curve25519_dalek::constants::RISTRETTO_BASEPOINT_POINT;
    use curve25519_dalek::scalar::Scalar;

    fn entry(i: u64) -> OutputEntry {
        OutputEntry {
            output_index: i,
            tx_public_key: [i as u8; 32],
            output_key: [i as u8 + 1; 32],
        }
    }

    fn derivation(v: u64) -> RistrettoPoint {
        RISTRETTO_BASEPOINT_POINT * Scalar::from(v + 1)
    }

    #[test]
    fn session_bounds() {
        let mut s = Session::new();

        assert_eq!(s.start(0, 1), Err(Error::InvalidLength));
        assert_eq!(s.start(1, 0), Err(Error::InvalidLength));
        assert_eq!(s.start(MAX_INPUTS as u8 + 1, 1), Err(Error::InvalidLength));
        assert_eq!(s.start(1, MAX_OUTPUTS as u8 + 1), Err(Error::InvalidLength));
        assert!(s.start(2, 2).is_ok());
    }

    #[test]
    fn duplicate_output_index_rejected() {
        let mut s = Session::new();
        s.start(1, 2).unwrap();

        s.add_output(entry(5), &derivation(0)).unwrap();
        assert_eq!(
            s.add_output(entry(5), &derivation(1)),
            Err(Error::UnexpectedEvent)
        );
    }

    #[test]
    fn prefix_hash_binds_contents() {
        let mut a = Session::new();
        a.start(1, 1).unwrap();
        a.add_output(entry(0), &derivation(0)).unwrap();

        let mut b = Session::new();
        b.start(1, 1).unwrap();
        b.add_output(entry(0), &derivation(0)).unwrap();

        assert_eq!(a.finalize_prefix(), b.finalize_prefix());

        // A differing output index changes the digest
        let mut c = Session::new();
        c.start(1, 1).unwrap();
        c.add_output(entry(1), &derivation(0)).unwrap();

        assert_ne!(a.finalize_prefix(), c.finalize_prefix());
    }

    #[test]
    fn wipe_zeroes_working_set() {
        let mut s = Session::new();
        s.start(1, 2).unwrap();
        s.add_output(entry(0), &derivation(0)).unwrap();
        s.add_output(entry(1), &derivation(1)).unwrap();

        assert!(s.working.bytes().any(|b| b != 0));

        s.wipe();

        assert!(s.working.bytes().all(|b| b == 0));
        assert_eq!(s.outputs_loaded(), 0);
        assert_eq!(s.num_inputs(), 0);
    }
}
