//! Curve point and secret scalar wrappers over the `k256` backend.
//!
//! `Point` carries the group element (including the point at infinity, which
//! several derivation steps must detect and reject). `SecretScalar` holds a
//! private scalar as raw bytes and zeroizes them on drop; the inner bytes are
//! validated to lie in `[1, n)` at construction.

use k256::elliptic_curve::group::Group;
use k256::elliptic_curve::ops::{LinearCombination, Reduce};
use k256::elliptic_curve::sec1::{FromEncodedPoint, ToEncodedPoint};
use k256::{AffinePoint, EncodedPoint, FieldBytes, NonZeroScalar, ProjectivePoint, Scalar, U256};
use rand_core::OsRng;
use zeroize::Zeroize;

use crate::error::Error;

/// Length of a SEC1 compressed point encoding.
pub const COMPRESSED_POINT_SIZE: usize = 33;

/// Length of a SEC1 uncompressed point encoding.
pub const UNCOMPRESSED_POINT_SIZE: usize = 65;

/// An element of the secp256k1 group.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Point(ProjectivePoint);

impl Point {
    /// Decode a SEC1 point. Accepts the 33-byte compressed and 65-byte
    /// uncompressed forms; every other length is rejected before parsing.
    ///
    /// Neither form can encode the point at infinity, so a decoded point is
    /// always a proper group element.
    pub fn decode(bytes: &[u8]) -> Result<Self, Error> {
        if bytes.len() != COMPRESSED_POINT_SIZE && bytes.len() != UNCOMPRESSED_POINT_SIZE {
            return Err(Error::InvalidEncoding);
        }
        let encoded = EncodedPoint::from_bytes(bytes).map_err(|_| Error::InvalidEncoding)?;
        let affine = Option::<AffinePoint>::from(AffinePoint::from_encoded_point(&encoded))
            .ok_or(Error::NotOnCurve)?;
        Ok(Self(affine.into()))
    }

    /// Compressed SEC1 encoding. The point at infinity has no SEC1 encoding.
    pub fn encode_compressed(&self) -> Result<[u8; COMPRESSED_POINT_SIZE], Error> {
        if self.is_infinity() {
            return Err(Error::PointAtInfinity);
        }
        let mut out = [0u8; COMPRESSED_POINT_SIZE];
        out.copy_from_slice(self.0.to_affine().to_encoded_point(true).as_bytes());
        Ok(out)
    }

    /// SEC1 encoding with the caller's choice of form.
    pub fn encode(&self, compressed: bool) -> Result<Vec<u8>, Error> {
        if self.is_infinity() {
            return Err(Error::PointAtInfinity);
        }
        Ok(self
            .0
            .to_affine()
            .to_encoded_point(compressed)
            .as_bytes()
            .to_vec())
    }

    /// Whether this is the identity element.
    pub fn is_infinity(&self) -> bool {
        bool::from(self.0.is_identity())
    }

    /// Group addition.
    pub fn add(&self, other: &Self) -> Self {
        Self(self.0 + other.0)
    }

    /// Scalar multiplication.
    pub fn mul(&self, scalar: &Scalar) -> Self {
        Self(self.0 * scalar)
    }

    /// `k·G` for the group generator `G`.
    pub fn generator_mul(scalar: &Scalar) -> Self {
        Self(ProjectivePoint::GENERATOR * scalar)
    }

    /// `k·G + Q` as a single linear combination, the shape both the stealth
    /// derivation and signature recovery are written in.
    pub fn generator_mul_add(scalar: &Scalar, q: &Self) -> Self {
        Self(ProjectivePoint::lincomb(
            &ProjectivePoint::GENERATOR,
            scalar,
            &q.0,
            &Scalar::ONE,
        ))
    }

    pub(crate) fn from_projective(point: ProjectivePoint) -> Self {
        Self(point)
    }

    pub(crate) fn to_affine(self) -> AffinePoint {
        self.0.to_affine()
    }
}

/// A private scalar in `[1, n)`, zeroized on drop.
///
/// The raw bytes are kept rather than the field representation so cleanup
/// wipes the actual secret material.
#[derive(Clone)]
pub struct SecretScalar {
    bytes: [u8; 32],
}

impl SecretScalar {
    /// Sample a uniform non-zero scalar from the OS RNG.
    pub fn random() -> Self {
        let scalar = NonZeroScalar::random(&mut OsRng);
        Self {
            bytes: scalar.to_bytes().into(),
        }
    }

    /// Accept exactly the big-endian values in `[1, n)`.
    pub fn from_bytes(bytes: &[u8; 32]) -> Result<Self, Error> {
        let valid: Option<NonZeroScalar> =
            NonZeroScalar::from_repr(*FieldBytes::from_slice(bytes)).into();
        valid.ok_or(Error::ScalarOutOfRange)?;
        Ok(Self { bytes: *bytes })
    }

    /// The scalar as a field element. The bytes were validated below the
    /// group order, so the reduction is exact.
    pub fn to_scalar(&self) -> Scalar {
        <Scalar as Reduce<U256>>::reduce_bytes(FieldBytes::from_slice(&self.bytes))
    }

    /// Big-endian bytes, fixed width. Small values stay left-padded.
    pub fn as_bytes(&self) -> &[u8; 32] {
        &self.bytes
    }

    /// Compressed public key for this secret. A non-zero scalar times the
    /// generator is never the identity, so this is total.
    pub fn public_key_bytes(&self) -> [u8; COMPRESSED_POINT_SIZE] {
        let mut out = [0u8; COMPRESSED_POINT_SIZE];
        let affine = (ProjectivePoint::GENERATOR * self.to_scalar()).to_affine();
        out.copy_from_slice(affine.to_encoded_point(true).as_bytes());
        out
    }
}

impl Drop for SecretScalar {
    fn drop(&mut self) {
        self.bytes.zeroize();
    }
}

impl core::fmt::Debug for SecretScalar {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_struct("SecretScalar").finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    /// Compressed encoding of the generator.
    const GENERATOR_COMPRESSED: &str =
        "0279be667ef9dcbbac55a06295ce870b07029bfcdb2dce28d959f2815b16f81798";

    /// The group order `n`, big-endian.
    const GROUP_ORDER: &str =
        "fffffffffffffffffffffffffffffffebaaedce6af48a03bbfd25e8cd0364141";

    fn order_minus_one() -> [u8; 32] {
        let mut bytes: [u8; 32] = hex::decode(GROUP_ORDER).unwrap().try_into().unwrap();
        bytes[31] -= 1;
        bytes
    }

    #[test]
    fn decode_rejects_bad_lengths() {
        for len in [0usize, 1, 32, 34, 64, 66] {
            let bytes = vec![0x02u8; len];
            assert_eq!(Point::decode(&bytes), Err(Error::InvalidEncoding));
        }
    }

    #[test]
    fn decode_rejects_unknown_tag() {
        let mut bytes = [0u8; 33];
        bytes[0] = 0x05;
        assert_eq!(Point::decode(&bytes), Err(Error::InvalidEncoding));
    }

    #[test]
    fn decode_rejects_off_curve_coordinates() {
        // (1, 1) does not satisfy y^2 = x^3 + 7.
        let mut bytes = [0u8; 65];
        bytes[0] = 0x04;
        bytes[32] = 0x01;
        bytes[64] = 0x01;
        assert_eq!(Point::decode(&bytes), Err(Error::NotOnCurve));

        // An x-coordinate at the field maximum is not a field element.
        let mut high_x = [0xffu8; 33];
        high_x[0] = 0x02;
        assert_eq!(Point::decode(&high_x), Err(Error::NotOnCurve));
    }

    #[test]
    fn generator_round_trips_both_forms() {
        let generator = Point::generator_mul(&Scalar::ONE);
        let compressed = generator.encode_compressed().unwrap();
        assert_eq!(hex::encode(compressed), GENERATOR_COMPRESSED);

        let uncompressed = generator.encode(false).unwrap();
        assert_eq!(uncompressed.len(), UNCOMPRESSED_POINT_SIZE);
        assert_eq!(Point::decode(&uncompressed).unwrap(), generator);
        assert_eq!(Point::decode(&compressed).unwrap(), generator);
    }

    #[test]
    fn generator_mul_add_matches_separate_operations() {
        let two = Scalar::ONE + Scalar::ONE;
        let q = Point::generator_mul(&two);
        let k = two + Scalar::ONE;
        let combined = Point::generator_mul_add(&k, &q);
        let separate = Point::generator_mul(&k).add(&q);
        assert_eq!(combined, separate);
    }

    #[test]
    fn infinity_is_reachable_and_unencodable() {
        // (n - 1)·G + G = O.
        let minus_one = SecretScalar::from_bytes(&order_minus_one()).unwrap();
        let sum = Point::generator_mul_add(&minus_one.to_scalar(), &Point::generator_mul(&Scalar::ONE));
        assert!(sum.is_infinity());
        assert_eq!(sum.encode_compressed(), Err(Error::PointAtInfinity));
        assert_eq!(sum.encode(false), Err(Error::PointAtInfinity));
    }

    #[test]
    fn secret_scalar_range_checks() {
        assert_eq!(
            SecretScalar::from_bytes(&[0u8; 32]).unwrap_err(),
            Error::ScalarOutOfRange
        );

        let order: [u8; 32] = hex::decode(GROUP_ORDER).unwrap().try_into().unwrap();
        assert_eq!(
            SecretScalar::from_bytes(&order).unwrap_err(),
            Error::ScalarOutOfRange
        );

        assert!(SecretScalar::from_bytes(&order_minus_one()).is_ok());

        let mut one = [0u8; 32];
        one[31] = 0x01;
        let scalar = SecretScalar::from_bytes(&one).unwrap();
        assert_eq!(scalar.to_scalar(), Scalar::ONE);
        assert_eq!(hex::encode(scalar.public_key_bytes()), GENERATOR_COMPRESSED);
    }

    #[test]
    fn random_scalars_differ() {
        let a = SecretScalar::random();
        let b = SecretScalar::random();
        assert_ne!(a.as_bytes(), b.as_bytes());
    }
}
