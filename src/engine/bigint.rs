//! Bundled engine implementation on top of `num-bigint-dig`.

use alloc::string::String;
use alloc::vec::Vec;
use core::cmp::Ordering;

use num_bigint::{BigUint, IntoBigInt, IntoBigUint, ModInverse, RandBigInt, ToBigInt};
use num_traits::{One, Signed, Zero};
use rand_core::{CryptoRngCore, OsRng};
use zeroize::{Zeroize, Zeroizing};

use super::{pkcs1v15, CrtParams, DataRequest, EncRequest, PkEngine};
use crate::errors::{Error, Result};

/// Software engine performing modular exponentiation with `num-bigint-dig`.
///
/// Private-key operations are blinded with a fresh random factor per call,
/// and CRT results are checked against the public exponent before release.
#[derive(Debug, Default, Clone, Copy)]
pub struct BigIntEngine;

/// Key record assembled by [`BigIntEngine`].
#[derive(Debug, Clone)]
pub enum RsaKey {
    /// Public record: modulus and public exponent.
    Public {
        /// Modulus.
        n: BigUint,
        /// Public exponent.
        e: BigUint,
    },
    /// Private record; `crt` is present when factor material was supplied.
    Private {
        /// Modulus.
        n: BigUint,
        /// Public exponent.
        e: BigUint,
        /// Private exponent.
        d: BigUint,
        /// CRT acceleration material, canonicalized so `p < q`.
        crt: Option<CrtParams<BigUint>>,
    },
}

impl RsaKey {
    /// Returns the modulus of the key.
    pub fn n(&self) -> &BigUint {
        match self {
            RsaKey::Public { n, .. } | RsaKey::Private { n, .. } => n,
        }
    }

    /// Returns the public exponent of the key.
    pub fn e(&self) -> &BigUint {
        match self {
            RsaKey::Public { e, .. } | RsaKey::Private { e, .. } => e,
        }
    }

    /// Returns the modulus size in bytes.
    pub fn size(&self) -> usize {
        (self.n().bits() + 7) / 8
    }
}

impl Zeroize for RsaKey {
    fn zeroize(&mut self) {
        if let RsaKey::Private { d, crt, .. } = self {
            d.zeroize();
            if let Some(crt) = crt {
                crt.p.zeroize();
                crt.q.zeroize();
                crt.u.zeroize();
            }
        }
    }
}

impl Drop for RsaKey {
    fn drop(&mut self) {
        self.zeroize();
    }
}

impl PkEngine for BigIntEngine {
    type Int = BigUint;
    type Key = RsaKey;

    fn int_from_bytes(&self, bytes: &[u8]) -> Result<BigUint> {
        if bytes.is_empty() {
            return Err(Error::Engine(String::from("empty integer encoding")));
        }
        Ok(BigUint::from_bytes_be(bytes))
    }

    fn int_to_bytes(&self, value: &BigUint) -> Vec<u8> {
        value.to_bytes_be()
    }

    fn int_bits(&self, value: &BigUint) -> usize {
        value.bits()
    }

    fn int_is_zero(&self, value: &BigUint) -> bool {
        value.is_zero()
    }

    fn int_cmp(&self, a: &BigUint, b: &BigUint) -> Ordering {
        a.cmp(b)
    }

    fn int_invert_mod(&self, a: &BigUint, m: &BigUint) -> Option<BigUint> {
        a.clone().mod_inverse(m).and_then(IntoBigUint::into_biguint)
    }

    fn public_key(&self, n: BigUint, e: BigUint) -> Result<RsaKey> {
        if n.is_zero() || e.is_zero() {
            return Err(Error::Engine(String::from(
                "modulus and exponent must be nonzero",
            )));
        }
        Ok(RsaKey::Public { n, e })
    }

    fn private_key(
        &self,
        n: BigUint,
        e: BigUint,
        d: BigUint,
        crt: Option<CrtParams<BigUint>>,
    ) -> Result<RsaKey> {
        if n.is_zero() || e.is_zero() || d.is_zero() {
            return Err(Error::Engine(String::from(
                "modulus and exponents must be nonzero",
            )));
        }
        if let Some(crt) = &crt {
            if crt.p.is_zero() || crt.u.is_zero() || crt.p >= crt.q {
                return Err(Error::Engine(String::from("invalid crt material")));
            }
        }
        Ok(RsaKey::Private { n, e, d, crt })
    }

    fn encrypt(&self, key: &RsaKey, data: DataRequest<'_>) -> Result<Vec<u8>> {
        match data {
            DataRequest::Raw(value) => {
                let m = BigUint::from_bytes_be(value);
                if &m >= key.n() {
                    return Err(Error::Engine(String::from(
                        "data value exceeds the modulus",
                    )));
                }
                Ok(m.modpow(key.e(), key.n()).to_bytes_be())
            }
            DataRequest::Pkcs1(msg) => {
                let em = pkcs1v15::encrypt_pad(&mut OsRng, msg, key.size())?;
                let m = Zeroizing::new(BigUint::from_bytes_be(&em));
                Ok(m.modpow(key.e(), key.n()).to_bytes_be())
            }
            DataRequest::Pkcs1Digest { .. } => Err(Error::Engine(String::from(
                "digest payload is only valid for signing",
            ))),
        }
    }

    fn decrypt(&self, key: &RsaKey, ciphertext: EncRequest<'_>) -> Result<Vec<u8>> {
        match ciphertext {
            EncRequest::Raw(c) => {
                let c = BigUint::from_bytes_be(c);
                let mut m = self.private_op(key, &c)?;
                let out = m.to_bytes_be();
                m.zeroize();
                Ok(out)
            }
            EncRequest::Pkcs1(c) => {
                let c = BigUint::from_bytes_be(c);
                let mut m = self.private_op(key, &c)?;
                let em = left_pad(&m.to_bytes_be(), key.size())?;
                m.zeroize();
                pkcs1v15::encrypt_unpad(em, key.size())
            }
        }
    }

    fn sign(&self, key: &RsaKey, data: DataRequest<'_>) -> Result<Vec<u8>> {
        match data {
            DataRequest::Pkcs1Digest { hash, digest } => {
                let em = pkcs1v15::sign_pad(hash.asn1_prefix(), digest, key.size())?;
                let m = Zeroizing::new(BigUint::from_bytes_be(&em));
                let s = self.private_op(key, &m)?;
                Ok(s.to_bytes_be())
            }
            DataRequest::Raw(_) | DataRequest::Pkcs1(_) => Err(Error::Engine(String::from(
                "signing requires a digest payload",
            ))),
        }
    }

    fn verify(&self, key: &RsaKey, signature: &[u8], data: DataRequest<'_>) -> Result<()> {
        let DataRequest::Pkcs1Digest { hash, digest } = data else {
            return Err(Error::Engine(String::from(
                "verification requires a digest payload",
            )));
        };
        let s = BigUint::from_bytes_be(signature);
        if &s >= key.n() {
            return Err(Error::Verification);
        }
        let em = left_pad(&s.modpow(key.e(), key.n()).to_bytes_be(), key.size())?;
        pkcs1v15::sign_unpad(hash.asn1_prefix(), digest, &em, key.size())
    }
}

impl BigIntEngine {
    /// Runs the secret-key operation `value^d mod n` with blinding, using
    /// CRT acceleration when the record carries factor material.
    fn private_op(&self, key: &RsaKey, value: &BigUint) -> Result<BigUint> {
        let RsaKey::Private { n, e, d, crt } = key else {
            return Err(Error::Engine(String::from(
                "secret key operation on a public key",
            )));
        };
        if value >= n {
            return Err(Error::Engine(String::from("value exceeds the modulus")));
        }

        let (mut blinded, mut unblinder) = blind(&mut OsRng, n, e, value);
        let mut m = match crt {
            Some(crt) => crt_exp(&blinded, d, crt),
            None => blinded.modpow(d, n),
        };
        blinded.zeroize();

        // unblind
        let out = (&m * &unblinder) % n;
        m.zeroize();
        unblinder.zeroize();

        if crt.is_some() {
            // A fault in the CRT computation would leak the factors; check
            // that the result matches the original value under e.
            if value != &out.modpow(e, n) {
                return Err(Error::Engine(String::from("crt fault detected")));
            }
        }

        Ok(out)
    }
}

/// Returns the blinded value, along with the unblinding factor.
fn blind<R: CryptoRngCore>(
    rng: &mut R,
    n: &BigUint,
    e: &BigUint,
    c: &BigUint,
) -> (BigUint, BigUint) {
    // Blinding multiplies c by r^e. The secret operation then computes
    // (c * r^e)^d = m * r mod n, and the factor of r is removed by
    // multiplying with the multiplicative inverse of r.
    let mut r: BigUint;
    let unblinder;
    loop {
        r = rng.gen_biguint_below(n);
        if r.is_zero() {
            r = BigUint::one();
        }
        if let Some(ir) = r.clone().mod_inverse(n) {
            if let Some(ub) = ir.into_biguint() {
                unblinder = ub;
                break;
            }
        }
    }

    let c = {
        let mut rpowe = r.modpow(e, n);
        let mut c = c * &rpowe;
        c %= n;

        rpowe.zeroize();

        c
    };

    (c, unblinder)
}

/// CRT exponentiation with the canonical factor order `p < q` and
/// `u = p⁻¹ mod q`: `m1 = v^(d mod p−1) mod p`, `m2 = v^(d mod q−1) mod q`,
/// `h = u·(m2 − m1) mod q`, result `m1 + p·h`.
fn crt_exp(value: &BigUint, d: &BigUint, crt: &CrtParams<BigUint>) -> BigUint {
    let one = BigUint::one();
    let mut dp = d % (&crt.p - &one);
    let mut dq = d % (&crt.q - &one);

    let mut m1 = value.modpow(&dp, &crt.p);
    let mut m2 = value.modpow(&dq, &crt.q);

    let q_int = crt.q.to_bigint().unwrap();
    let mut h = m2.clone().into_bigint().unwrap();
    h -= m1.clone().into_bigint().unwrap();
    while h.is_negative() {
        h += &q_int;
    }
    h *= crt.u.to_bigint().unwrap();
    h %= &q_int;

    let m = &m1 + &crt.p * h.into_biguint().unwrap();

    // clear tmp values
    dp.zeroize();
    dq.zeroize();
    m1.zeroize();
    m2.zeroize();

    m
}

/// Returns a new vector of the given length, with 0s left padded.
#[inline]
fn left_pad(input: &[u8], padded_len: usize) -> Result<Vec<u8>> {
    if input.len() > padded_len {
        return Err(Error::Engine(String::from(
            "value longer than the padded length",
        )));
    }

    let mut out = vec![0u8; padded_len];
    out[padded_len - input.len()..].copy_from_slice(input);
    Ok(out)
}
