// Copyright (c) 2025-2026 The Ledger-CN Developers

/// encdec helper module for compressed points
///
/// Passes the 32-byte encoding through unmodified, decompression (and the
/// validity check that goes with it) happens in the engine so that points
/// constructed programmatically take the same path as points off the wire.
pub(crate) mod pt {
    use curve25519_dalek::ristretto::CompressedRistretto;
    use ledger_proto::ApduError;

    pub fn enc(p: &CompressedRistretto, buff: &mut [u8]) -> Result<usize, ApduError> {
        let d = p.as_bytes();

        if buff.len() < d.len() {
            return Err(ApduError::InvalidLength);
        }

        buff[..d.len()].copy_from_slice(&d[..]);

        Ok(d.len())
    }

    pub fn enc_len(_p: &CompressedRistretto) -> Result<usize, ApduError> {
        Ok(32)
    }

    pub fn dec(buff: &[u8]) -> Result<(CompressedRistretto, usize), ApduError> {
        let mut d = [0u8; 32];

        if buff.len() < d.len() {
            return Err(ApduError::InvalidLength);
        }

        d.copy_from_slice(&buff[..32]);

        Ok((CompressedRistretto(d), 32))
    }
}

/// encdec helper module for scalars
///
/// Decoding enforces the canonical (fully reduced) encoding, a non-canonical
/// scalar is a malformed request.
pub(crate) mod scalar {
    use curve25519_dalek::scalar::Scalar;
    use ledger_proto::ApduError;

    pub fn enc(s: &Scalar, buff: &mut [u8]) -> Result<usize, ApduError> {
        let d = s.to_bytes();

        if buff.len() < d.len() {
            return Err(ApduError::InvalidLength);
        }

        buff[..d.len()].copy_from_slice(&d);

        Ok(d.len())
    }

    pub fn enc_len(_s: &Scalar) -> Result<usize, ApduError> {
        Ok(32)
    }

    pub fn dec(buff: &[u8]) -> Result<(Scalar, usize), ApduError> {
        let mut d = [0u8; 32];

        if buff.len() < d.len() {
            return Err(ApduError::InvalidLength);
        }

        d.copy_from_slice(&buff[..32]);

        match Option::<Scalar>::from(Scalar::from_canonical_bytes(d)) {
            Some(s) => Ok((s, d.len())),
            None => Err(ApduError::InvalidEncoding),
        }
    }
}
