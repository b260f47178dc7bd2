//! The operation executor: size policing and output shaping around the
//! engine's cipher primitives.

use alloc::vec::Vec;

use crate::engine::{DataRequest, EncRequest, PkEngine};
use crate::errors::{Error, Result};
use crate::key::RsaHandle;
use crate::padding::Padding;

impl<E: PkEngine> RsaHandle<E> {
    /// Encrypts `plaintext` into `out`, returning the number of bytes
    /// written.
    ///
    /// Under [`Padding::Raw`] the output is fixed-width: exactly
    /// [`max_signature_len`](Self::max_signature_len) bytes, left-padded
    /// with zeros, so `out` must be at least that long. Under
    /// [`Padding::Pkcs1`] the ciphertext length varies up to the modulus
    /// size and `out` only needs to hold the value actually produced.
    pub fn encrypt(&self, plaintext: &[u8], out: &mut [u8]) -> Result<usize> {
        if plaintext.len() > self.max_plaintext_len() {
            return Err(Error::InputTooLarge);
        }
        let request = match self.padding() {
            Padding::Raw => DataRequest::Raw(plaintext),
            Padding::Pkcs1 { .. } => DataRequest::Pkcs1(plaintext),
        };
        let value = self.engine.encrypt(&self.key, request)?;
        self.emit(&value, out)
    }

    /// Decrypts `ciphertext` into `out`, returning the number of bytes
    /// written.
    ///
    /// Output shaping mirrors [`encrypt`](Self::encrypt): raw plaintexts
    /// come back fixed-width at the modulus size, PKCS#1 plaintexts at the
    /// recovered message length.
    pub fn decrypt(&self, ciphertext: &[u8], out: &mut [u8]) -> Result<usize> {
        if ciphertext.len() > self.max_ciphertext_len() {
            return Err(Error::InputTooLarge);
        }
        let request = match self.padding() {
            Padding::Raw => EncRequest::Raw(ciphertext),
            Padding::Pkcs1 { .. } => EncRequest::Pkcs1(ciphertext),
        };
        let value = self.engine.decrypt(&self.key, request)?;
        self.emit(&value, out)
    }

    /// Signs `digest` into `out`, returning the number of bytes written.
    ///
    /// Only available under [`Padding::Pkcs1`]; the digest is wrapped in the
    /// DigestInfo for the handle's hash before padding. A buffer of
    /// [`max_signature_len`](Self::max_signature_len) bytes always
    /// suffices.
    pub fn sign(&self, digest: &[u8], out: &mut [u8]) -> Result<usize> {
        let Padding::Pkcs1 { hash } = self.padding() else {
            return Err(Error::UnsupportedPadding);
        };
        if digest.len() > self.max_dgst_len() {
            return Err(Error::InputTooLarge);
        }
        let value = self
            .engine
            .sign(&self.key, DataRequest::Pkcs1Digest { hash, digest })?;
        if value.len() > out.len() {
            return Err(Error::OutputTooSmall);
        }
        out[..value.len()].copy_from_slice(&value);
        Ok(value.len())
    }

    /// Checks `signature` over `digest`.
    ///
    /// Only available under [`Padding::Pkcs1`]. Any failure past the size
    /// checks, malformed signature included, reports as
    /// [`Error::Verification`] so callers cannot distinguish why a
    /// signature was rejected.
    pub fn verify(&self, signature: &[u8], digest: &[u8]) -> Result<()> {
        let Padding::Pkcs1 { hash } = self.padding() else {
            return Err(Error::UnsupportedPadding);
        };
        if digest.len() > self.max_dgst_len() || signature.len() > self.max_signature_len() {
            return Err(Error::InputTooLarge);
        }
        self.engine
            .verify(
                &self.key,
                signature,
                DataRequest::Pkcs1Digest { hash, digest },
            )
            .map_err(|_| Error::Verification)
    }

    /// [`encrypt`](Self::encrypt) into a freshly allocated buffer.
    pub fn encrypt_to_vec(&self, plaintext: &[u8]) -> Result<Vec<u8>> {
        let mut out = vec![0u8; self.max_ciphertext_len()];
        let written = self.encrypt(plaintext, &mut out)?;
        out.truncate(written);
        Ok(out)
    }

    /// [`decrypt`](Self::decrypt) into a freshly allocated buffer.
    pub fn decrypt_to_vec(&self, ciphertext: &[u8]) -> Result<Vec<u8>> {
        let mut out = vec![0u8; self.max_plaintext_len()];
        let written = self.decrypt(ciphertext, &mut out)?;
        out.truncate(written);
        Ok(out)
    }

    /// [`sign`](Self::sign) into a freshly allocated buffer.
    pub fn sign_to_vec(&self, digest: &[u8]) -> Result<Vec<u8>> {
        let mut out = vec![0u8; self.max_signature_len()];
        let written = self.sign(digest, &mut out)?;
        out.truncate(written);
        Ok(out)
    }

    /// Shapes an engine result into the caller's buffer.
    ///
    /// Raw values are widened to the full output buffer with leading zeros,
    /// reversing the natural serialization's stripping; PKCS#1 values are
    /// copied verbatim at their own length.
    fn emit(&self, value: &[u8], out: &mut [u8]) -> Result<usize> {
        match self.padding() {
            Padding::Raw => {
                if value.len() > out.len() {
                    return Err(Error::OutputTooSmall);
                }
                let start = out.len() - value.len();
                out[..start].fill(0);
                out[start..].copy_from_slice(value);
                Ok(out.len())
            }
            Padding::Pkcs1 { .. } => {
                if value.len() > out.len() {
                    return Err(Error::OutputTooSmall);
                }
                out[..value.len()].copy_from_slice(value);
                Ok(value.len())
            }
        }
    }
}
