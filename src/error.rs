//! Error types for key parsing, signing, recovery, and stealth derivation.

use thiserror::Error;

/// Errors surfaced by key and stealth-address operations.
///
/// Parse-level failures (`InvalidEncoding`, `NotOnCurve`, `ScalarOutOfRange`)
/// leave the receiving key reset. A failed stealth recognition is not an
/// error: it is the `None` arm of `StealthKeys::scan_payment`.
#[derive(Debug, Error, Clone, Copy, PartialEq, Eq)]
pub enum Error {
    /// Input bytes are not a well-formed encoding: wrong length, bad DER
    /// structure, or an unknown compact-signature header.
    #[error("malformed encoding")]
    InvalidEncoding,

    /// Decoded coordinates do not satisfy the curve equation.
    #[error("point is not on the curve")]
    NotOnCurve,

    /// A scalar was zero or not below the group order.
    #[error("scalar out of range for the curve order")]
    ScalarOutOfRange,

    /// A parsed private key does not re-derive its embedded public key.
    #[error("secret and public key halves are inconsistent")]
    InconsistentKey,

    /// No candidate public key could be recovered from a signature.
    #[error("public key recovery failed")]
    RecoveryFailed,

    /// A derivation step produced the point at infinity. The caller may
    /// retry with fresh randomness.
    #[error("derivation produced the point at infinity")]
    PointAtInfinity,

    /// The operation needs a secret key but only a public half is held.
    #[error("key holds no secret")]
    MissingSecret,

    /// The ECDSA backend rejected the signing request.
    #[error("signing failed")]
    SigningFailed,
}
