//! secp256k1 key management with recoverable compact signatures and
//! dual-key stealth addresses.
//!
//! Three layers, leaves first:
//!
//! - [`Point`] and [`SecretScalar`]: thin wrappers over the `k256` group and
//!   scalar arithmetic, including the combined `k·G + Q` primitive the
//!   stealth derivation and signature recovery are both written in.
//! - [`Key`]: an ECDSA keypair with strict-DER sign/verify, SEC1 DER
//!   private-key interop, and the 65-byte compact signature form that embeds
//!   a recovery ID so verifiers can reconstruct the signer's public key from
//!   the signature alone.
//! - [`StealthKeys`] / [`StealthAddress`]: a recipient publishes two
//!   compressed public keys `(L, H)`; senders derive unlinkable one-time
//!   payment keys from them, and the recipient alone can recognize and spend
//!   each one.
//!
//! Message hashes are always 32 bytes; producing them is the caller's
//! concern. The 160-bit hash the stealth scheme uses is [`hash160`]
//! (RIPEMD-160 of SHA-256).
//!
//! Secret material zeroizes on drop, recognition compares in constant time,
//! and ECDSA nonces are deterministic per RFC 6979.

pub use k256;

mod error;
mod hash;
mod key;
mod point;
mod recovery;
mod stealth;

pub use error::Error;
pub use hash::hash160;
pub use key::Key;
pub use point::{Point, SecretScalar, COMPRESSED_POINT_SIZE, UNCOMPRESSED_POINT_SIZE};
pub use recovery::COMPACT_SIGNATURE_SIZE;
pub use stealth::{StealthAddress, StealthKeys, StealthPayment, STEALTH_ADDRESS_SIZE};

#[cfg(test)]
mod test_vectors;
