//! Error types.

use alloc::string::String;
use core::fmt;

/// Alias for [`core::result::Result`] with the crate's [`Error`] type.
pub type Result<T> = core::result::Result<T, Error>;

/// Errors raised by key construction and the cipher operations.
///
/// No error is fatal: a failed operation leaves the handle valid and
/// reusable, and nothing is retried internally.
#[derive(Debug, Clone, PartialEq, Eq)]
#[non_exhaustive]
pub enum Error {
    /// A key parameter could not be parsed as an unsigned big integer.
    KeyParse {
        /// Name of the offending parameter.
        field: &'static str,
    },

    /// The engine rejected the assembled key record.
    KeyBuild,

    /// The operation is not offered under the handle's padding/hash
    /// configuration.
    UnsupportedPadding,

    /// The input exceeds the size ceiling derived from the modulus.
    InputTooLarge,

    /// The result does not fit the supplied output buffer.
    OutputTooSmall,

    /// An engine primitive failed; carries the engine's diagnostic text.
    Engine(String),

    /// The signature is not valid for the given digest under this key.
    ///
    /// This is an expected negative result of `verify`, not a fault.
    Verification,
}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Error::KeyParse { field } => write!(f, "malformed key parameter: {}", field),
            Error::KeyBuild => write!(f, "engine rejected key material"),
            Error::UnsupportedPadding => write!(f, "unsupported padding scheme"),
            Error::InputTooLarge => write!(f, "input exceeds modulus size"),
            Error::OutputTooSmall => write!(f, "output buffer too small"),
            Error::Engine(reason) => write!(f, "engine error: {}", reason),
            Error::Verification => write!(f, "verification error"),
        }
    }
}

#[cfg(feature = "std")]
impl std::error::Error for Error {}
