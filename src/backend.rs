//! Backend entry points: the capability query and the blob-to-handle
//! builder.

use crate::encoding::parse_key_blob;
use crate::errors::{Error, Result};
use crate::key::{KeyKind, RsaHandle};
use crate::padding::Padding;

/// Asymmetric algorithms offered by this backend.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[non_exhaustive]
pub enum Algorithm {
    /// RSA, the only algorithm currently implemented.
    Rsa,
}

/// Reports whether an algorithm/padding combination can be built.
///
/// A `true` answer means [`build`] will not fail for configuration reasons;
/// it can still fail on the key material itself.
pub fn supports(algorithm: Algorithm, padding: Padding) -> bool {
    match algorithm {
        Algorithm::Rsa => match padding {
            Padding::Raw => true,
            Padding::Pkcs1 { hash } => hash.pkcs1_supported(),
        },
    }
}

/// Builds a cipher handle from a DER key blob.
///
/// The padding/hash combination is validated before the blob is touched, so
/// an unsupported configuration reports [`Error::UnsupportedPadding`] even
/// for a garbage key.
pub fn build(
    algorithm: Algorithm,
    kind: KeyKind,
    key_blob: &[u8],
    padding: Padding,
) -> Result<RsaHandle> {
    if !supports(algorithm, padding) {
        return Err(Error::UnsupportedPadding);
    }
    let params = parse_key_blob(kind, key_blob)?;
    RsaHandle::from_parameters(kind, &params, padding)
}
