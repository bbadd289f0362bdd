//! Compact ECDSA signatures with embedded public-key recovery metadata.
//!
//! A compact signature is 65 bytes: a header byte followed by `r` and `s` in
//! fixed 32-byte big-endian slots. The header encodes which of up to four
//! candidate public keys produced the signature, plus whether that key
//! serializes compressed:
//!
//! ```text
//! header = 27 + recid            recid in 0..=3, uncompressed key
//! header = 31 + recid            recid in 0..=3, compressed key
//! ```
//!
//! Recovery follows SEC1 §4.1.6 for prime-field curves. secp256k1 has
//! cofactor 1, so every decompressed candidate already lies in the
//! prime-order group; signing still confirms the recid by comparing the
//! recovered key against the signer's own.

use k256::elliptic_curve::bigint::{ArrayEncoding, CheckedAdd};
use k256::elliptic_curve::ops::{LinearCombination, Reduce};
use k256::elliptic_curve::point::DecompressPoint;
use k256::elliptic_curve::subtle::Choice;
use k256::elliptic_curve::{Curve, Group};
use k256::{AffinePoint, FieldBytes, NonZeroScalar, ProjectivePoint, Scalar, Secp256k1, U256};

use crate::error::Error;
use crate::key::Key;
use crate::point::Point;

/// Length of a compact signature: header, `r`, `s`.
pub const COMPACT_SIGNATURE_SIZE: usize = 65;

const HEADER_MIN: u8 = 27;
const HEADER_MAX: u8 = 34;
const HEADER_COMPRESSED_OFFSET: u8 = 4;

/// Recover the public key that produced `(r, s)` over `hash` for the given
/// recovery ID (SEC1 §4.1.6).
///
/// The candidate x-coordinate is `r + (recid / 2)·n`; values that overflow
/// 256 bits or exceed the field modulus cannot be coordinates and fail, as
/// does an x-coordinate with no curve point of the requested y-parity.
pub(crate) fn recover_public_key(
    hash: &[u8; 32],
    r: &NonZeroScalar,
    s: &NonZeroScalar,
    recid: u8,
) -> Result<Point, Error> {
    debug_assert!(recid < 4);
    let r_scalar: Scalar = **r;
    let s_scalar: Scalar = **s;

    let mut x = U256::from_be_byte_array(r_scalar.to_bytes());
    if recid >= 2 {
        x = Option::from(x.checked_add(&Secp256k1::ORDER)).ok_or(Error::RecoveryFailed)?;
    }
    let y_is_odd = Choice::from(recid & 1);
    let r_point: Option<AffinePoint> =
        AffinePoint::decompress(&x.to_be_byte_array(), y_is_odd).into();
    let r_point = r_point.ok_or(Error::RecoveryFailed)?;

    // Q = (s/r)·R - (e/r)·G
    let r_inv: Option<Scalar> = r_scalar.invert().into();
    let r_inv = r_inv.ok_or(Error::RecoveryFailed)?;
    let e = <Scalar as Reduce<U256>>::reduce_bytes(FieldBytes::from_slice(hash));
    let u1 = -(e * r_inv);
    let u2 = s_scalar * r_inv;
    let q = ProjectivePoint::lincomb(
        &ProjectivePoint::GENERATOR,
        &u1,
        &ProjectivePoint::from(r_point),
        &u2,
    );
    if bool::from(q.is_identity()) {
        return Err(Error::RecoveryFailed);
    }
    Ok(Point::from_projective(q))
}

fn parse_signature_scalar(bytes: &[u8]) -> Result<NonZeroScalar, Error> {
    Option::from(NonZeroScalar::from_repr(*FieldBytes::from_slice(bytes)))
        .ok_or(Error::ScalarOutOfRange)
}

impl Key {
    /// Sign a 32-byte hash and emit the 65-byte recoverable form.
    ///
    /// Exactly one recovery ID reproduces this key's public point; finding
    /// none means the signature itself is broken, which is reported as a
    /// recovery failure rather than user error.
    pub fn sign_compact(&self, hash: &[u8; 32]) -> Result<[u8; COMPACT_SIGNATURE_SIZE], Error> {
        let public = self.public_point().ok_or(Error::MissingSecret)?;
        let expected = public.encode_compressed()?;

        let signature = self.sign_raw(hash)?;
        let (r, s) = signature.split_scalars();

        let mut found = None;
        for recid in 0..4u8 {
            let Ok(candidate) = recover_public_key(hash, &r, &s, recid) else {
                continue;
            };
            if candidate.encode_compressed()? == expected {
                found = Some(recid);
                break;
            }
        }
        let recid = found.ok_or(Error::RecoveryFailed)?;

        let mut out = [0u8; COMPACT_SIGNATURE_SIZE];
        out[0] = HEADER_MIN
            + recid
            + if self.is_compressed() {
                HEADER_COMPRESSED_OFFSET
            } else {
                0
            };
        out[1..33].copy_from_slice(&r.to_bytes());
        out[33..65].copy_from_slice(&s.to_bytes());
        Ok(out)
    }

    /// Populate this key with the public key recovered from a compact
    /// signature over `hash`.
    ///
    /// The secret half is cleared and the compression flag is taken from the
    /// header. Recovery alone does not prove the signature valid; callers
    /// that have not already verified `(r, s)` must still do so. On any
    /// failure the key is left reset.
    pub fn set_compact_signature(&mut self, hash: &[u8; 32], signature: &[u8]) -> Result<(), Error> {
        self.reset();
        if signature.len() != COMPACT_SIGNATURE_SIZE {
            return Err(Error::InvalidEncoding);
        }
        let header = signature[0];
        if !(HEADER_MIN..=HEADER_MAX).contains(&header) {
            return Err(Error::InvalidEncoding);
        }
        let compressed = header >= HEADER_MIN + HEADER_COMPRESSED_OFFSET;
        let recid = header
            - HEADER_MIN
            - if compressed {
                HEADER_COMPRESSED_OFFSET
            } else {
                0
            };

        let r = parse_signature_scalar(&signature[1..33])?;
        let s = parse_signature_scalar(&signature[33..65])?;
        let public = recover_public_key(hash, &r, &s, recid)?;
        self.install_recovered(public, compressed);
        Ok(())
    }

    /// Check a compact signature against this key by recovering the signer
    /// and comparing canonical compressed encodings.
    pub fn verify_compact(&self, hash: &[u8; 32], signature: &[u8]) -> bool {
        let Some(public) = self.public_point() else {
            return false;
        };
        let Ok(expected) = public.encode_compressed() else {
            return false;
        };

        let mut recovered = Key::new();
        if recovered.set_compact_signature(hash, signature).is_err() {
            return false;
        }
        match recovered.public_point().map(Point::encode_compressed) {
            Some(Ok(actual)) => actual == expected,
            _ => false,
        }
    }
}
