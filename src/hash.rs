//! The 160-bit hash used by stealth derivation.

use k256::elliptic_curve::ops::Reduce;
use k256::{FieldBytes, Scalar, U256};
use ripemd::Ripemd160;
use sha2::{Digest, Sha256};

/// RIPEMD-160 of SHA-256, the 160-bit hash both sides of a stealth payment
/// apply to the compressed shared-secret point.
pub fn hash160(data: &[u8]) -> [u8; 20] {
    Ripemd160::digest(Sha256::digest(data)).into()
}

/// Interpret a 160-bit digest as an unsigned big-endian integer scalar.
///
/// A 20-byte value is always far below the group order, so the reduction is
/// numerically the identity; it keeps the integer-to-scalar conversion in one
/// place.
pub(crate) fn hash160_scalar(digest: &[u8; 20]) -> Scalar {
    let mut wide = FieldBytes::default();
    wide[12..].copy_from_slice(digest);
    <Scalar as Reduce<U256>>::reduce_bytes(&wide)
}
