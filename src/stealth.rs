//! Dual-key stealth addresses on secp256k1.
//!
//! A recipient holds two ordinary keypairs: a scan pair `(l, L)` and a spend
//! pair `(h, H)`, publishing the compressed points `(L, H)` as a long-lived
//! stealth address. Every payment to that address lands on a fresh one-time
//! public key no observer can link back to it.
//!
//! ## Sender
//! 1. Pick a fresh ephemeral scalar `r`, publish `R = r·G`.
//! 2. Shared secret `T = r·L`.
//! 3. One-time key `P = H160(T)·G + H`.
//!
//! ## Recipient
//! 1. For each candidate `(R, P)`: shared secret `T' = l·R` (equal to `T`
//!    because `l·r·G = r·L`).
//! 2. Recompute `P' = H160(T')·G + H`; if `P'` matches `P` the payment is
//!    ours.
//! 3. One-time secret `p = H160(T') + h (mod n)`, with `p·G = P`.

use subtle::ConstantTimeEq;
use zeroize::Zeroize;

use crate::error::Error;
use crate::hash::{hash160, hash160_scalar};
use crate::key::Key;
use crate::point::{Point, SecretScalar, COMPRESSED_POINT_SIZE};

/// Length of an encoded stealth address: two compressed points.
pub const STEALTH_ADDRESS_SIZE: usize = 2 * COMPRESSED_POINT_SIZE;

/// The public half of a stealth key set: the recipient's scan point `L` and
/// spend point `H`, both compressed. This is what a recipient publishes and
/// what senders derive one-time keys from.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct StealthAddress {
    /// Compressed scan public key `L`.
    pub scan_pubkey: [u8; COMPRESSED_POINT_SIZE],
    /// Compressed spend public key `H`.
    pub spend_pubkey: [u8; COMPRESSED_POINT_SIZE],
}

/// A one-time payment derived by a sender: the ephemeral witness `R` the
/// recipient scans for and the one-time public key `P` the funds go to.
pub struct StealthPayment {
    /// Compressed ephemeral public key `R = r·G`, published alongside the
    /// payment.
    pub ephemeral_pubkey: [u8; COMPRESSED_POINT_SIZE],
    /// Compressed one-time public key `P`.
    pub payment_pubkey: [u8; COMPRESSED_POINT_SIZE],
    ephemeral_secret: SecretScalar,
}

impl StealthPayment {
    /// The ephemeral secret `r` behind this derivation. Zeroized when the
    /// payment is dropped.
    pub fn ephemeral_secret(&self) -> &SecretScalar {
        &self.ephemeral_secret
    }
}

impl StealthAddress {
    /// Build an address from two public-key encodings. Either SEC1 form is
    /// accepted; both keys are canonicalized to compressed.
    pub fn new(scan_pubkey: &[u8], spend_pubkey: &[u8]) -> Result<Self, Error> {
        Ok(Self {
            scan_pubkey: Point::decode(scan_pubkey)?.encode_compressed()?,
            spend_pubkey: Point::decode(spend_pubkey)?.encode_compressed()?,
        })
    }

    /// Fixed-width encoding: `L || H`, both compressed.
    pub fn encode(&self) -> [u8; STEALTH_ADDRESS_SIZE] {
        let mut out = [0u8; STEALTH_ADDRESS_SIZE];
        out[..COMPRESSED_POINT_SIZE].copy_from_slice(&self.scan_pubkey);
        out[COMPRESSED_POINT_SIZE..].copy_from_slice(&self.spend_pubkey);
        out
    }

    /// Decode the fixed-width `L || H` form.
    pub fn decode(bytes: &[u8]) -> Result<Self, Error> {
        if bytes.len() != STEALTH_ADDRESS_SIZE {
            return Err(Error::InvalidEncoding);
        }
        Self::new(
            &bytes[..COMPRESSED_POINT_SIZE],
            &bytes[COMPRESSED_POINT_SIZE..],
        )
    }

    /// Derive a fresh one-time key for this address using an ephemeral
    /// scalar from the OS RNG.
    ///
    /// A point-at-infinity result is a recoverable failure; the caller may
    /// simply retry, which draws new randomness.
    pub fn derive_payment(&self) -> Result<StealthPayment, Error> {
        self.derive_payment_with(SecretScalar::random())
    }

    /// Derive the one-time key for a caller-chosen ephemeral scalar. The
    /// same scalar always reproduces the same payment.
    pub fn derive_payment_with(&self, ephemeral: SecretScalar) -> Result<StealthPayment, Error> {
        let scan_point = Point::decode(&self.scan_pubkey)?;
        let spend_point = Point::decode(&self.spend_pubkey)?;

        let r = ephemeral.to_scalar();
        let ephemeral_pubkey = Point::generator_mul(&r).encode_compressed()?;

        // T = r·L, then P = H160(T)·G + H.
        let mut shared = scan_point.mul(&r).encode_compressed()?;
        let tweak = hash160_scalar(&hash160(&shared));
        shared.zeroize();

        let payment = Point::generator_mul_add(&tweak, &spend_point);
        let payment_pubkey = payment.encode_compressed()?;

        Ok(StealthPayment {
            ephemeral_pubkey,
            payment_pubkey,
            ephemeral_secret: ephemeral,
        })
    }
}

/// The recipient's private stealth key set: the scan secret `l` and spend
/// secret `h` with their compressed public points.
pub struct StealthKeys {
    scan_secret: SecretScalar,
    spend_secret: SecretScalar,
    scan_pubkey: [u8; COMPRESSED_POINT_SIZE],
    spend_pubkey: [u8; COMPRESSED_POINT_SIZE],
}

impl StealthKeys {
    /// Generate both halves from the OS RNG.
    pub fn generate() -> Self {
        Self::from_parts(SecretScalar::random(), SecretScalar::random())
    }

    /// Rebuild the key set from the two raw secrets.
    pub fn from_secrets(scan_secret: &[u8; 32], spend_secret: &[u8; 32]) -> Result<Self, Error> {
        Ok(Self::from_parts(
            SecretScalar::from_bytes(scan_secret)?,
            SecretScalar::from_bytes(spend_secret)?,
        ))
    }

    /// Rebuild the key set from two SEC1 DER private keys.
    pub fn from_sec1_der_pair(scan_der: &[u8], spend_der: &[u8]) -> Result<Self, Error> {
        let scan_key = Key::from_sec1_der(scan_der)?;
        let spend_key = Key::from_sec1_der(spend_der)?;
        let (Some(mut scan_secret), Some(mut spend_secret)) =
            (scan_key.secret_bytes(), spend_key.secret_bytes())
        else {
            return Err(Error::MissingSecret);
        };
        let keys = Self::from_secrets(&scan_secret, &spend_secret);
        scan_secret.zeroize();
        spend_secret.zeroize();
        keys
    }

    fn from_parts(scan_secret: SecretScalar, spend_secret: SecretScalar) -> Self {
        let scan_pubkey = scan_secret.public_key_bytes();
        let spend_pubkey = spend_secret.public_key_bytes();
        Self {
            scan_secret,
            spend_secret,
            scan_pubkey,
            spend_pubkey,
        }
    }

    /// Export the raw secret pair `(l, h)` for storage. Handle with care.
    pub fn export_secrets(&self) -> ([u8; 32], [u8; 32]) {
        (*self.scan_secret.as_bytes(), *self.spend_secret.as_bytes())
    }

    /// Export both halves as SEC1 DER private keys. The buffers zeroize on
    /// drop.
    pub fn to_sec1_der_pair(
        &self,
    ) -> Result<(zeroize::Zeroizing<Vec<u8>>, zeroize::Zeroizing<Vec<u8>>), Error> {
        let scan_key = Key::from_secret_bytes(self.scan_secret.as_bytes(), true)?;
        let spend_key = Key::from_secret_bytes(self.spend_secret.as_bytes(), true)?;
        Ok((scan_key.to_sec1_der()?, spend_key.to_sec1_der()?))
    }

    /// The public stealth address `(L, H)` for this key set.
    pub fn stealth_address(&self) -> StealthAddress {
        StealthAddress {
            scan_pubkey: self.scan_pubkey,
            spend_pubkey: self.spend_pubkey,
        }
    }

    /// Check whether a payment `(R, P)` derived against the spend key
    /// `spend_pubkey` belongs to this key set, and if so unlock it.
    ///
    /// Returns the one-time key `p = H160(l·R) + h` (compressed) whose public
    /// point equals `P`. `None` is the common not-ours outcome and is cheap;
    /// it also covers malformed candidate encodings.
    pub fn scan_payment(
        &self,
        ephemeral_pubkey: &[u8],
        spend_pubkey: &[u8],
        payment_pubkey: &[u8],
    ) -> Option<Key> {
        let ephemeral = Point::decode(ephemeral_pubkey).ok()?;
        let spend = Point::decode(spend_pubkey).ok()?;
        let payment = Point::decode(payment_pubkey).ok()?.encode_compressed().ok()?;

        // T' = l·R equals the sender's r·L.
        let mut shared = ephemeral
            .mul(&self.scan_secret.to_scalar())
            .encode_compressed()
            .ok()?;
        let tweak = hash160_scalar(&hash160(&shared));
        shared.zeroize();

        // P' = H160(T')·G + H. An infinity result cannot match any payment.
        let expected = Point::generator_mul_add(&tweak, &spend)
            .encode_compressed()
            .ok()?;
        if !bool::from(expected.as_slice().ct_eq(payment.as_slice())) {
            return None;
        }

        // p = H160(T') + h
        let one_time = tweak + self.spend_secret.to_scalar();
        let mut secret_bytes: [u8; 32] = one_time.to_bytes().into();
        let key = Key::from_secret_bytes(&secret_bytes, true).ok();
        secret_bytes.zeroize();
        key
    }
}

impl core::fmt::Debug for StealthKeys {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_struct("StealthKeys")
            .field("scan_pubkey", &hex_bytes(&self.scan_pubkey))
            .field("spend_pubkey", &hex_bytes(&self.spend_pubkey))
            .finish_non_exhaustive()
    }
}

fn hex_bytes(bytes: &[u8]) -> String {
    bytes.iter().map(|b| format!("{b:02x}")).collect()
}
