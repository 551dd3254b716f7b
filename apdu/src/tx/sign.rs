// Copyright (c) 2025-2026 The Ledger-CN Developers

//! APDUs for the signing phase: per-input ring signatures and the final
//! commit carrying the assembled signature set.
//!
//! Bodies here are variable length (one 32-byte entry per ring member) so
//! [`Encode`]/[`DecodeOwned`] are implemented by hand.

use curve25519_dalek::{ristretto::CompressedRistretto, scalar::Scalar};
use encdec::{DecodeOwned, Encode};
use heapless::Vec;

use crate::{
    helpers::scalar,
    tx::{MAX_INPUTS, RING_MAX},
    ApduError, ApduStatic, Instruction, CN_APDU_CLA,
};

/// Sign one input of the pending transaction.
///
/// Carries the full ring for the input; the device recovers the one-time
/// private key for the real member, computes the key image and produces the
/// ring signature over the session prefix hash.
///
/// ## Encoding:
/// ```text
///  0                   1                   2                   3
///  0 1 2 3 4 5 6 7 8 9 0 1 2 3 4 5 6 7 8 9 0 1 2 3 4 5 6 7 8 9 0 1
/// +-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+
/// |                          OUTPUT_INDEX                         |
/// |                          (8-byte u64)                         |
/// +-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+
/// |   REAL_INDEX  |   RING_SIZE   |                               |
/// +-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+                                 +
/// /                     RING_SIZE x RING_MEMBER                   /
/// /                  (32-byte compressed points)                  /
/// |                                                               |
/// +-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+
/// ```
#[derive(Clone, PartialEq, Debug)]
pub struct TxSignInput {
    /// Index of the real spend within the wallet's owned outputs
    pub output_index: u64,

    /// Index of the real member within the ring
    pub real_index: u8,

    /// Candidate public keys (the ring)
    pub ring: Vec<CompressedRistretto, RING_MAX>,
}

impl TxSignInput {
    /// Create a new sign-input APDU
    pub fn new(output_index: u64, real_index: u8, ring: Vec<CompressedRistretto, RING_MAX>) -> Self {
        Self {
            output_index,
            real_index,
            ring,
        }
    }
}

impl ApduStatic for TxSignInput {
    const CLA: u8 = CN_APDU_CLA;
    const INS: u8 = Instruction::TxSignInput as u8;
}

impl Encode for TxSignInput {
    type Error = ApduError;

    fn encode_len(&self) -> Result<usize, ApduError> {
        Ok(8 + 2 + self.ring.len() * 32)
    }

    fn encode(&self, buff: &mut [u8]) -> Result<usize, ApduError> {
        if buff.len() < self.encode_len()? {
            return Err(ApduError::InvalidLength);
        }

        buff[..8].copy_from_slice(&self.output_index.to_le_bytes());
        buff[8] = self.real_index;
        buff[9] = self.ring.len() as u8;

        let mut n = 10;
        for p in &self.ring {
            buff[n..n + 32].copy_from_slice(p.as_bytes());
            n += 32;
        }

        Ok(n)
    }
}

impl DecodeOwned for TxSignInput {
    type Output = Self;

    type Error = ApduError;

    fn decode_owned(buff: &[u8]) -> Result<(Self::Output, usize), ApduError> {
        if buff.len() < 10 {
            return Err(ApduError::InvalidLength);
        }

        let output_index = u64::from_le_bytes(buff[..8].try_into().unwrap());
        let real_index = buff[8];
        let ring_size = buff[9] as usize;

        if ring_size > RING_MAX || buff.len() < 10 + ring_size * 32 {
            return Err(ApduError::InvalidLength);
        }

        let mut ring = Vec::new();
        let mut n = 10;
        for _ in 0..ring_size {
            let mut d = [0u8; 32];
            d.copy_from_slice(&buff[n..n + 32]);
            let _ = ring.push(CompressedRistretto(d));
            n += 32;
        }

        Ok((
            Self {
                output_index,
                real_index,
                ring,
            },
            n,
        ))
    }
}

/// Ring signature response APDU, one per signed input.
///
/// Also carried, in input order, within [`TxCommitResp`].
///
/// ## Encoding:
/// ```text
///  0                   1                   2                   3
///  0 1 2 3 4 5 6 7 8 9 0 1 2 3 4 5 6 7 8 9 0 1 2 3 4 5 6 7 8 9 0 1
/// +-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+
/// |  INPUT_INDEX  |   RING_SIZE   |                               |
/// +-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-                                +
/// /                           KEY_IMAGE                           /
/// /                   (32-byte compressed point)                  /
/// |                                                               |
/// +-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+
/// |                                                               |
/// /            RING_SIZE x (CHALLENGE ‖ RESPONSE) PAIRS           /
/// /                  (2 x 32-byte canonical scalars)              /
/// |                                                               |
/// +-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+
/// ```
#[derive(Clone, PartialEq, Debug)]
pub struct TxSignature {
    /// Position of the input within the session (signing order)
    pub input_index: u8,

    /// Key image for the spent output
    pub key_image: CompressedRistretto,

    /// Ring signature, one (challenge, response) pair per ring member
    pub ring: Vec<(Scalar, Scalar), RING_MAX>,
}

impl Encode for TxSignature {
    type Error = ApduError;

    fn encode_len(&self) -> Result<usize, ApduError> {
        Ok(2 + 32 + self.ring.len() * 64)
    }

    fn encode(&self, buff: &mut [u8]) -> Result<usize, ApduError> {
        if buff.len() < self.encode_len()? {
            return Err(ApduError::InvalidLength);
        }

        buff[0] = self.input_index;
        buff[1] = self.ring.len() as u8;
        buff[2..34].copy_from_slice(self.key_image.as_bytes());

        let mut n = 34;
        for (c, r) in &self.ring {
            n += scalar::enc(c, &mut buff[n..])?;
            n += scalar::enc(r, &mut buff[n..])?;
        }

        Ok(n)
    }
}

impl DecodeOwned for TxSignature {
    type Output = Self;

    type Error = ApduError;

    fn decode_owned(buff: &[u8]) -> Result<(Self::Output, usize), ApduError> {
        if buff.len() < 34 {
            return Err(ApduError::InvalidLength);
        }

        let input_index = buff[0];
        let ring_size = buff[1] as usize;

        if ring_size > RING_MAX || buff.len() < 34 + ring_size * 64 {
            return Err(ApduError::InvalidLength);
        }

        let mut d = [0u8; 32];
        d.copy_from_slice(&buff[2..34]);
        let key_image = CompressedRistretto(d);

        let mut ring = Vec::new();
        let mut n = 34;
        for _ in 0..ring_size {
            let (c, m) = scalar::dec(&buff[n..])?;
            n += m;
            let (r, m) = scalar::dec(&buff[n..])?;
            n += m;
            let _ = ring.push((c, r));
        }

        Ok((
            Self {
                input_index,
                key_image,
                ring,
            },
            n,
        ))
    }
}

/// Commit response APDU: the assembled signature set, in input order
///
/// ## Encoding:
/// ```text
/// +-+-+-+-+-+-+-+-+-+-+-+-+- ...
/// |   NUM_INPUTS  |  NUM_INPUTS x TxSignature bodies
/// +-+-+-+-+-+-+-+-+-+-+-+-+- ...
/// ```
#[derive(Clone, PartialEq, Debug)]
pub struct TxCommitResp {
    /// One signature per transaction input
    pub signatures: Vec<TxSignature, MAX_INPUTS>,
}

impl Encode for TxCommitResp {
    type Error = ApduError;

    fn encode_len(&self) -> Result<usize, ApduError> {
        let mut n = 1;
        for s in &self.signatures {
            n += s.encode_len()?;
        }
        Ok(n)
    }

    fn encode(&self, buff: &mut [u8]) -> Result<usize, ApduError> {
        if buff.len() < self.encode_len()? {
            return Err(ApduError::InvalidLength);
        }

        buff[0] = self.signatures.len() as u8;

        let mut n = 1;
        for s in &self.signatures {
            n += s.encode(&mut buff[n..])?;
        }

        Ok(n)
    }
}

impl DecodeOwned for TxCommitResp {
    type Output = Self;

    type Error = ApduError;

    fn decode_owned(buff: &[u8]) -> Result<(Self::Output, usize), ApduError> {
        if buff.is_empty() {
            return Err(ApduError::InvalidLength);
        }

        let count = buff[0] as usize;
        if count > MAX_INPUTS {
            return Err(ApduError::InvalidLength);
        }

        let mut signatures = Vec::new();
        let mut n = 1;
        for _ in 0..count {
            let (s, m) = TxSignature::decode_owned(&buff[n..])?;
            n += m;
            let _ = signatures.push(s);
        }

        Ok((Self { signatures }, n))
    }
}

#[cfg(test)]
mod test {
    use super::*;
    use curve25519_dalek::constants::RISTRETTO_BASEPOINT_POINT;

    fn point(v: u64) -> CompressedRistretto {
        (RISTRETTO_BASEPOINT_POINT * Scalar::from(v)).compress()
    }

    fn signature(input_index: u8, ring_size: usize) -> TxSignature {
        let mut ring = Vec::new();
        for i in 0..ring_size {
            let _ = ring.push((Scalar::from(i as u64 + 1), Scalar::from(i as u64 + 100)));
        }

        TxSignature {
            input_index,
            key_image: point(42),
            ring,
        }
    }

    #[test]
    fn tx_sign_input_encode_decode() {
        let mut ring = Vec::new();
        for i in 0..3u64 {
            let _ = ring.push(point(i + 1));
        }

        let a = TxSignInput::new(7, 1, ring);

        let mut buff = [0u8; 256];
        let n = a.encode(&mut buff).unwrap();
        assert_eq!(n, 10 + 3 * 32);

        let (b, m) = TxSignInput::decode_owned(&buff).unwrap();
        assert_eq!(n, m);
        assert_eq!(a, b);
    }

    #[test]
    fn tx_sign_input_rejects_oversize_ring() {
        let mut buff = [0u8; 1024];
        buff[9] = RING_MAX as u8 + 1;

        assert!(TxSignInput::decode_owned(&buff).is_err());
    }

    #[test]
    fn tx_signature_encode_decode() {
        let a = signature(0, 4);

        let mut buff = [0u8; 512];
        let n = a.encode(&mut buff).unwrap();
        assert_eq!(n, 34 + 4 * 64);

        let (b, m) = TxSignature::decode_owned(&buff).unwrap();
        assert_eq!(n, m);
        assert_eq!(a, b);
    }

    #[test]
    fn tx_commit_resp_encode_decode() {
        let mut signatures = Vec::new();
        let _ = signatures.push(signature(0, 3));
        let _ = signatures.push(signature(1, 2));

        let a = TxCommitResp { signatures };

        let mut buff = [0u8; 1024];
        let n = a.encode(&mut buff).unwrap();

        let (b, m) = TxCommitResp::decode_owned(&buff).unwrap();
        assert_eq!(n, m);
        assert_eq!(a, b);
    }
}
