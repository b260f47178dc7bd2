//! Key construction, the size policy, and the long-lived cipher handle.

use core::cmp::Ordering;
use core::fmt;

use crate::engine::{BigIntEngine, CrtParams, PkEngine};
use crate::errors::{Error, Result};
use crate::padding::Padding;

/// Kind tag accompanying an incoming key blob.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum KeyKind {
    /// Public key: modulus and public exponent.
    Public,
    /// Private key: adds the private exponent and, optionally, the factors.
    Private,
}

/// Raw big-endian key parameters, as emitted by a key-structure parser.
///
/// Produced once and consumed immediately by the handle builder; nothing is
/// retained. Which fields must be present depends on the key kind: public
/// keys need `n` and `e`, private keys additionally `d`. The factors `p` and
/// `q` are optional — when either is absent or zero the private key is built
/// without CRT acceleration, which is slower but otherwise equivalent.
#[derive(Debug, Clone, Copy)]
pub struct RsaKeyParameters<'a> {
    /// Modulus.
    pub n: &'a [u8],
    /// Public exponent.
    pub e: &'a [u8],
    /// Private exponent.
    pub d: Option<&'a [u8]>,
    /// First prime factor.
    pub p: Option<&'a [u8]>,
    /// Second prime factor.
    pub q: Option<&'a [u8]>,
}

impl<'a> RsaKeyParameters<'a> {
    /// Parameters for a public key.
    pub fn public(n: &'a [u8], e: &'a [u8]) -> Self {
        Self {
            n,
            e,
            d: None,
            p: None,
            q: None,
        }
    }

    /// Parameters for a private key without factor material.
    pub fn private(n: &'a [u8], e: &'a [u8], d: &'a [u8]) -> Self {
        Self {
            n,
            e,
            d: Some(d),
            p: None,
            q: None,
        }
    }

    /// Adds the prime factors, enabling CRT acceleration.
    pub fn with_factors(mut self, p: &'a [u8], q: &'a [u8]) -> Self {
        self.p = Some(p);
        self.q = Some(q);
        self
    }
}

/// Ready-to-use cipher handle.
///
/// Holds the engine-native key record, the padding/hash configuration fixed
/// at construction, and the four size ceilings derived from the modulus bit
/// length. Operations never mutate the handle, so a handle can be shared
/// across threads whenever the engine's key record is `Sync`. Dropping the
/// handle releases the key record; the bundled engine zeroizes private
/// material on release.
pub struct RsaHandle<E: PkEngine = BigIntEngine> {
    pub(crate) engine: E,
    pub(crate) key: E::Key,
    padding: Padding,
    max_plaintext_len: usize,
    max_ciphertext_len: usize,
    max_dgst_len: usize,
    max_signature_len: usize,
}

// Key material stays out of the output; only the configuration and the
// modulus size are shown.
impl<E: PkEngine> fmt::Debug for RsaHandle<E> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("RsaHandle")
            .field("padding", &self.padding)
            .field("modulus_size", &self.max_signature_len)
            .finish_non_exhaustive()
    }
}

impl RsaHandle {
    /// Builds a handle on the bundled engine from parsed key parameters.
    pub fn from_parameters(
        kind: KeyKind,
        params: &RsaKeyParameters<'_>,
        padding: Padding,
    ) -> Result<Self> {
        Self::with_engine(BigIntEngine, kind, params, padding)
    }
}

impl<E: PkEngine> RsaHandle<E> {
    /// Builds a handle from parsed key parameters on a caller-supplied
    /// engine.
    pub fn with_engine(
        engine: E,
        kind: KeyKind,
        params: &RsaKeyParameters<'_>,
        padding: Padding,
    ) -> Result<Self> {
        if let Padding::Pkcs1 { hash } = padding {
            if !hash.pkcs1_supported() {
                return Err(Error::UnsupportedPadding);
            }
        }

        let n = parse_field(&engine, "n", params.n)?;
        if engine.int_is_zero(&n) {
            return Err(Error::KeyParse { field: "n" });
        }
        let e = parse_field(&engine, "e", params.e)?;
        if engine.int_is_zero(&e) {
            return Err(Error::KeyParse { field: "e" });
        }

        let bits = engine.int_bits(&n);

        let key = match kind {
            KeyKind::Public => engine.public_key(n, e).map_err(|_| Error::KeyBuild)?,
            KeyKind::Private => {
                let d = params.d.ok_or(Error::KeyParse { field: "d" })?;
                let d = parse_field(&engine, "d", d)?;
                if engine.int_is_zero(&d) {
                    return Err(Error::KeyParse { field: "d" });
                }
                let crt = derive_crt(&engine, params.p, params.q)?;
                engine
                    .private_key(n, e, d, crt)
                    .map_err(|_| Error::KeyBuild)?
            }
        };

        // All four ceilings are the modulus byte length: the RSA block size
        // is uniform regardless of operation, and padding overhead is
        // enforced at the engine level.
        let k = (bits + 7) / 8;

        Ok(Self {
            engine,
            key,
            padding,
            max_plaintext_len: k,
            max_ciphertext_len: k,
            max_dgst_len: k,
            max_signature_len: k,
        })
    }

    /// The handle's padding/hash configuration.
    pub fn padding(&self) -> Padding {
        self.padding
    }

    /// Maximum plaintext length accepted by `encrypt`.
    pub fn max_plaintext_len(&self) -> usize {
        self.max_plaintext_len
    }

    /// Maximum ciphertext length accepted by `decrypt`.
    pub fn max_ciphertext_len(&self) -> usize {
        self.max_ciphertext_len
    }

    /// Maximum digest length accepted by `sign` and `verify`.
    pub fn max_dgst_len(&self) -> usize {
        self.max_dgst_len
    }

    /// Maximum signature length accepted by `verify`, and the buffer size
    /// that guarantees `sign` succeeds.
    pub fn max_signature_len(&self) -> usize {
        self.max_signature_len
    }
}

fn parse_field<E: PkEngine>(engine: &E, field: &'static str, bytes: &[u8]) -> Result<E::Int> {
    engine
        .int_from_bytes(bytes)
        .map_err(|_| Error::KeyParse { field })
}

/// Builds the CRT record when both factors are present and nonzero,
/// swapping the factors so that `p < q` and computing `u = p⁻¹ mod q`.
fn derive_crt<E: PkEngine>(
    engine: &E,
    p: Option<&[u8]>,
    q: Option<&[u8]>,
) -> Result<Option<CrtParams<E::Int>>> {
    let (Some(p), Some(q)) = (p, q) else {
        return Ok(None);
    };

    let mut p = parse_field(engine, "p", p)?;
    let mut q = parse_field(engine, "q", q)?;
    if engine.int_is_zero(&p) || engine.int_is_zero(&q) {
        return Ok(None);
    }

    if engine.int_cmp(&p, &q) == Ordering::Greater {
        core::mem::swap(&mut p, &mut q);
    }
    let u = engine.int_invert_mod(&p, &q).ok_or(Error::KeyBuild)?;

    Ok(Some(CrtParams { p, q, u }))
}
