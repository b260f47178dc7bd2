//! Padding configuration fixed at handle construction.

use crate::hash::HashAlg;

/// Padding discipline for a handle, chosen once at construction.
///
/// The two disciplines shape outputs differently: raw operations emit
/// fixed-width values, exactly the modulus size and left-zero-padded, while
/// PKCS#1 v1.5 operations emit variable-length values bounded by the modulus
/// size. Sign and verify are only offered under [`Padding::Pkcs1`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Padding {
    /// No padding scheme; inputs are treated as bare big integers.
    Raw,
    /// PKCS#1 v1.5 padding, applied and removed by the engine.
    Pkcs1 {
        /// Hash the caller's digests are produced with; only meaningful for
        /// sign and verify.
        hash: HashAlg,
    },
}
