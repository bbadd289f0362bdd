//! An ECDSA keypair on secp256k1.
//!
//! A `Key` may hold a secret scalar with its public point, or a public point
//! alone (the shape signature recovery produces). The `compressed` flag only
//! affects how the public key serializes; signing is unaffected.
//!
//! Signatures use deterministic RFC 6979 nonces and serialize as strict DER.
//! The legacy private-key container is the SEC1 / RFC 5915 `ECPrivateKey`
//! structure with the secp256k1 OID.

use k256::ecdsa::signature::hazmat::{PrehashSigner, PrehashVerifier};
use k256::ecdsa::{Signature, SigningKey, VerifyingKey};
use k256::FieldBytes;
use sec1::der::asn1::ObjectIdentifier;
use sec1::der::{Decode, Encode};
use sec1::{EcParameters, EcPrivateKey};
use zeroize::{Zeroize, Zeroizing};

use crate::error::Error;
use crate::point::{Point, SecretScalar, COMPRESSED_POINT_SIZE};

/// ASN.1 OID for secp256k1, `1.3.132.0.10`.
const SECP256K1_OID: ObjectIdentifier = ObjectIdentifier::new_unwrap("1.3.132.0.10");

/// A secp256k1 keypair.
#[derive(Clone)]
pub struct Key {
    secret: Option<SecretScalar>,
    public: Option<Point>,
    compressed: bool,
}

impl Key {
    /// An empty key. Nothing can be signed or verified until one of the
    /// setters populates it.
    pub fn new() -> Self {
        Self {
            secret: None,
            public: None,
            compressed: false,
        }
    }

    /// Generate a fresh keypair from the OS RNG.
    pub fn generate(compressed: bool) -> Self {
        let secret = SecretScalar::random();
        let public = Point::generator_mul(&secret.to_scalar());
        Self {
            secret: Some(secret),
            public: Some(public),
            compressed,
        }
    }

    /// Build a key from a raw 32-byte big-endian secret.
    pub fn from_secret_bytes(secret: &[u8; 32], compressed: bool) -> Result<Self, Error> {
        let mut key = Self::new();
        key.set_secret(secret, compressed)?;
        Ok(key)
    }

    /// Parse a SEC1 DER private key.
    pub fn from_sec1_der(der: &[u8]) -> Result<Self, Error> {
        let mut key = Self::new();
        key.set_sec1_der(der)?;
        Ok(key)
    }

    /// Replace this key with the given secret. The value must be in `[1, n)`;
    /// on failure the key is left reset.
    pub fn set_secret(&mut self, secret: &[u8; 32], compressed: bool) -> Result<(), Error> {
        self.reset();
        let scalar = SecretScalar::from_bytes(secret)?;
        let public = Point::generator_mul(&scalar.to_scalar());
        self.secret = Some(scalar);
        self.public = Some(public);
        self.compressed = compressed;
        Ok(())
    }

    /// The secret as fixed-width big-endian bytes. Values below 2^248 stay
    /// left-padded rather than shrinking.
    pub fn secret_bytes(&self) -> Option<[u8; 32]> {
        self.secret.as_ref().map(|secret| *secret.as_bytes())
    }

    /// Replace this key from a SEC1 / RFC 5915 DER `ECPrivateKey`.
    ///
    /// The curve OID must name secp256k1. When the structure embeds a public
    /// key it must match re-derivation from the secret, and its length sets
    /// the compression flag. On any failure the key is left reset.
    pub fn set_sec1_der(&mut self, der: &[u8]) -> Result<(), Error> {
        self.reset();
        let parsed = EcPrivateKey::from_der(der).map_err(|_| Error::InvalidEncoding)?;
        match parsed.parameters {
            Some(EcParameters::NamedCurve(oid)) if oid == SECP256K1_OID => {}
            _ => return Err(Error::InvalidEncoding),
        }

        let mut secret_bytes: [u8; 32] = parsed
            .private_key
            .try_into()
            .map_err(|_| Error::InvalidEncoding)?;
        let parse = SecretScalar::from_bytes(&secret_bytes);
        secret_bytes.zeroize();
        let scalar = parse?;
        let public = Point::generator_mul(&scalar.to_scalar());

        let mut compressed = false;
        if let Some(embedded) = parsed.public_key {
            let embedded_point = Point::decode(embedded)?;
            if embedded_point != public {
                return Err(Error::InconsistentKey);
            }
            compressed = embedded.len() == COMPRESSED_POINT_SIZE;
        }

        self.secret = Some(scalar);
        self.public = Some(public);
        self.compressed = compressed;
        Ok(())
    }

    /// Emit the SEC1 DER private key, embedding the public key in whichever
    /// form the compression flag selects. The buffer zeroizes on drop.
    pub fn to_sec1_der(&self) -> Result<Zeroizing<Vec<u8>>, Error> {
        let secret = self.secret.as_ref().ok_or(Error::MissingSecret)?;
        let public = self.public.as_ref().ok_or(Error::MissingSecret)?;
        let public_bytes = public.encode(self.compressed)?;
        let document = EcPrivateKey {
            private_key: secret.as_bytes(),
            parameters: Some(EcParameters::NamedCurve(SECP256K1_OID)),
            public_key: Some(&public_bytes),
        }
        .to_der()
        .map_err(|_| Error::InvalidEncoding)?;
        Ok(Zeroizing::new(document))
    }

    /// Replace this key with a public key alone. A 33-byte encoding marks the
    /// key compressed, a 65-byte one uncompressed. On failure the key is left
    /// reset.
    pub fn set_public_key(&mut self, bytes: &[u8]) -> Result<(), Error> {
        self.reset();
        let point = Point::decode(bytes)?;
        self.public = Some(point);
        self.compressed = bytes.len() == COMPRESSED_POINT_SIZE;
        Ok(())
    }

    /// The public key encoded per the compression flag.
    pub fn public_key_bytes(&self) -> Option<Vec<u8>> {
        let public = self.public.as_ref()?;
        public.encode(self.compressed).ok()
    }

    pub(crate) fn public_point(&self) -> Option<&Point> {
        self.public.as_ref()
    }

    /// Sign a 32-byte message hash, returning a strict-DER ECDSA signature
    /// with an RFC 6979 deterministic nonce.
    pub fn sign(&self, hash: &[u8; 32]) -> Result<Vec<u8>, Error> {
        let signature = self.sign_raw(hash)?;
        Ok(signature.to_der().as_bytes().to_vec())
    }

    pub(crate) fn sign_raw(&self, hash: &[u8; 32]) -> Result<Signature, Error> {
        let secret = self.secret.as_ref().ok_or(Error::MissingSecret)?;
        let signing = SigningKey::from_bytes(FieldBytes::from_slice(secret.as_bytes()))
            .map_err(|_| Error::ScalarOutOfRange)?;
        signing.sign_prehash(hash).map_err(|_| Error::SigningFailed)
    }

    /// Verify a DER signature over a 32-byte hash. Non-canonical DER is
    /// rejected.
    pub fn verify(&self, hash: &[u8; 32], signature: &[u8]) -> bool {
        let Some(public) = self.public.as_ref() else {
            return false;
        };
        let Ok(parsed) = Signature::from_der(signature) else {
            return false;
        };
        let Ok(verifier) = VerifyingKey::from_affine(public.to_affine()) else {
            return false;
        };
        verifier.verify_prehash(hash, &parsed).is_ok()
    }

    /// Whether the key is populated and internally consistent: a held secret
    /// must re-derive the held public point.
    pub fn is_valid(&self) -> bool {
        match (&self.secret, &self.public) {
            (Some(secret), Some(public)) => {
                Point::generator_mul(&secret.to_scalar()) == *public
            }
            (None, Some(_)) => true,
            _ => false,
        }
    }

    /// Whether the key holds neither a secret nor a public half.
    pub fn is_null(&self) -> bool {
        self.secret.is_none() && self.public.is_none()
    }

    /// How the public key serializes.
    pub fn is_compressed(&self) -> bool {
        self.compressed
    }

    /// Clear both halves. Secret material is zeroized as it drops.
    pub fn reset(&mut self) {
        self.secret = None;
        self.public = None;
        self.compressed = false;
    }

    pub(crate) fn install_recovered(&mut self, public: Point, compressed: bool) {
        self.secret = None;
        self.public = Some(public);
        self.compressed = compressed;
    }
}

impl Default for Key {
    fn default() -> Self {
        Self::new()
    }
}

impl core::fmt::Debug for Key {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_struct("Key")
            .field("public", &self.public_key_bytes().map(hex_preview))
            .field("compressed", &self.compressed)
            .finish_non_exhaustive()
    }
}

fn hex_preview(bytes: Vec<u8>) -> String {
    bytes.iter().map(|b| format!("{b:02x}")).collect()
}
