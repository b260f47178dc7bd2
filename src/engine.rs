//! The big-integer / public-key engine boundary.
//!
//! All modular arithmetic is delegated across this seam. [`PkEngine`] models
//! the engine as an opaque capability set: integer parse/print helpers the
//! key builder needs, key-record assembly, and the four blocking cipher
//! primitives. The builder and executor only ever talk to the engine through
//! this trait, so an alternative engine slots in without touching them.
//!
//! [`BigIntEngine`] is the bundled implementation, built on `num-bigint-dig`.

mod bigint;
mod pkcs1v15;

pub use bigint::{BigIntEngine, RsaKey};

use alloc::vec::Vec;
use core::cmp::Ordering;

use crate::errors::Result;
use crate::hash::HashAlg;

/// Payload for the `encrypt` and `sign` primitives, tagged with the padding
/// discipline the engine must apply.
#[derive(Debug, Clone, Copy)]
pub enum DataRequest<'a> {
    /// Bare value, operated on as an unsigned big integer.
    Raw(&'a [u8]),
    /// Message the engine must PKCS#1 v1.5 block-type-2 pad before use.
    Pkcs1(&'a [u8]),
    /// Digest the engine must wrap in a DigestInfo and block-type-1 pad.
    /// Only valid for `sign` and `verify`.
    Pkcs1Digest {
        /// Hash algorithm the digest was produced with.
        hash: HashAlg,
        /// The digest bytes.
        digest: &'a [u8],
    },
}

/// Ciphertext handed to the `decrypt` primitive, tagged with the padding
/// discipline the engine must remove from the recovered plaintext.
#[derive(Debug, Clone, Copy)]
pub enum EncRequest<'a> {
    /// Recovered plaintext is returned as a bare integer serialization.
    Raw(&'a [u8]),
    /// Recovered plaintext is PKCS#1 v1.5 unpadded before return.
    Pkcs1(&'a [u8]),
}

/// CRT acceleration material for a private key, already canonicalized by
/// the key builder: `p < q` and `u = p⁻¹ mod q`.
#[derive(Debug, Clone)]
pub struct CrtParams<I> {
    /// Smaller prime factor.
    pub p: I,
    /// Larger prime factor.
    pub q: I,
    /// Inverse of `p` modulo `q`.
    pub u: I,
}

/// Capability set of a big-integer / public-key engine.
///
/// Primitives are synchronous, call-scoped and must not retain references to
/// request buffers. Key records handed out by `public_key`/`private_key` are
/// immutable; invoking primitives concurrently on a shared record is safe
/// whenever `Self::Key: Sync` holds for the implementation.
pub trait PkEngine {
    /// Engine-native unsigned big integer.
    type Int;
    /// Engine-native key record.
    type Key;

    /// Parses a big-endian byte string into an engine integer.
    ///
    /// An encoding the engine cannot interpret (for instance an empty
    /// string) is an error.
    fn int_from_bytes(&self, bytes: &[u8]) -> Result<Self::Int>;

    /// Serializes an integer big-endian with no excess leading zeros.
    fn int_to_bytes(&self, value: &Self::Int) -> Vec<u8>;

    /// Bit length of an integer.
    fn int_bits(&self, value: &Self::Int) -> usize;

    /// Whether an integer is zero.
    fn int_is_zero(&self, value: &Self::Int) -> bool;

    /// Compares two integers.
    fn int_cmp(&self, a: &Self::Int, b: &Self::Int) -> Ordering;

    /// Computes `a⁻¹ mod m`, or `None` when no inverse exists.
    fn int_invert_mod(&self, a: &Self::Int, m: &Self::Int) -> Option<Self::Int>;

    /// Assembles a public key record from modulus and public exponent.
    fn public_key(&self, n: Self::Int, e: Self::Int) -> Result<Self::Key>;

    /// Assembles a private key record, with CRT acceleration when `crt`
    /// material is supplied.
    fn private_key(
        &self,
        n: Self::Int,
        e: Self::Int,
        d: Self::Int,
        crt: Option<CrtParams<Self::Int>>,
    ) -> Result<Self::Key>;

    /// Encrypts `data` under the record's public part, returning the
    /// ciphertext integer's natural big-endian serialization.
    fn encrypt(&self, key: &Self::Key, data: DataRequest<'_>) -> Result<Vec<u8>>;

    /// Decrypts `ciphertext` with the record's private part. Raw requests
    /// yield the plaintext integer's natural serialization; PKCS#1 requests
    /// yield the unpadded message.
    fn decrypt(&self, key: &Self::Key, ciphertext: EncRequest<'_>) -> Result<Vec<u8>>;

    /// Signs a digest payload, returning the signature integer's natural
    /// big-endian serialization.
    fn sign(&self, key: &Self::Key, data: DataRequest<'_>) -> Result<Vec<u8>>;

    /// Checks `signature` against a digest payload; any rejection, including
    /// a cryptographic mismatch, is an error.
    fn verify(&self, key: &Self::Key, signature: &[u8], data: DataRequest<'_>) -> Result<()>;
}
