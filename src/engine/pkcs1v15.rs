//! PKCS#1 v1.5 padding as described in [RFC8017 § 7.2 and § 8.2].
//!
//! Applied and removed on the engine side; the operation executor never
//! sees an encoded message block.
//!
//! [RFC8017 § 7.2 and § 8.2]: https://datatracker.ietf.org/doc/html/rfc8017

use alloc::string::String;
use alloc::vec::Vec;
use rand_core::CryptoRngCore;
use subtle::{Choice, ConditionallySelectable, ConstantTimeEq};
use zeroize::Zeroizing;

use crate::errors::{Error, Result};

/// Fills the provided slice with random values, which are guaranteed
/// to not be zero.
#[inline]
fn non_zero_random_bytes<R: CryptoRngCore + ?Sized>(rng: &mut R, data: &mut [u8]) {
    rng.fill_bytes(data);

    for el in data {
        while *el == 0u8 {
            rng.fill_bytes(core::slice::from_mut(el));
        }
    }
}

/// Applies the encryption padding scheme: the message must be no longer
/// than the modulus size `k` minus 11 bytes.
pub(super) fn encrypt_pad<R>(rng: &mut R, msg: &[u8], k: usize) -> Result<Zeroizing<Vec<u8>>>
where
    R: CryptoRngCore + ?Sized,
{
    if msg.len() + 11 > k {
        return Err(Error::Engine(String::from(
            "message too long for pkcs#1 v1.5 block",
        )));
    }

    // EM = 0x00 || 0x02 || PS || 0x00 || M
    let mut em = Zeroizing::new(vec![0u8; k]);
    em[1] = 2;
    non_zero_random_bytes(rng, &mut em[2..k - msg.len() - 1]);
    em[k - msg.len() - 1] = 0;
    em[k - msg.len()..].copy_from_slice(msg);
    Ok(em)
}

/// Removes the encryption padding, returning the message.
///
/// Note that whether this function returns an error or not discloses secret
/// information; callers decrypting attacker-controlled ciphertexts must take
/// their own countermeasures against padding oracles.
#[inline]
pub(super) fn encrypt_unpad(em: Vec<u8>, k: usize) -> Result<Vec<u8>> {
    let (valid, out, index) = unpad_inner(em, k)?;
    if valid == 0 {
        return Err(Error::Engine(String::from(
            "invalid pkcs#1 v1.5 encryption padding",
        )));
    }

    Ok(out[index as usize..].to_vec())
}

/// Scans the encoded block for the padding structure. Returns one or zero in
/// `valid` depending on whether the block was correctly structured; the block
/// is returned in either case so memory access patterns stay constant. When
/// valid, `index` is the offset of the message.
#[inline]
fn unpad_inner(em: Vec<u8>, k: usize) -> Result<(u8, Vec<u8>, u32)> {
    if k < 11 {
        return Err(Error::Engine(String::from("modulus too small for pkcs#1")));
    }

    let first_byte_is_zero = em[0].ct_eq(&0u8);
    let second_byte_is_two = em[1].ct_eq(&2u8);

    // The padding must be a run of non-zero random octets, a zero octet,
    // then the message.
    //   looking_for_index: 1 iff we are still looking for the zero.
    //   index: the offset of the first zero byte.
    let mut looking_for_index = 1u8;
    let mut index = 0u32;

    for (i, el) in em.iter().enumerate().skip(2) {
        let equals0 = el.ct_eq(&0u8);
        index.conditional_assign(&(i as u32), Choice::from(looking_for_index) & equals0);
        looking_for_index.conditional_assign(&0u8, equals0);
    }

    // The random filler must be at least 8 bytes long, starting two bytes in.
    let valid_ps = Choice::from((((2i32 + 8i32 - index as i32 - 1i32) >> 31) & 1) as u8);
    let valid =
        first_byte_is_zero & second_byte_is_two & Choice::from(!looking_for_index & 1) & valid_ps;
    index = u32::conditional_select(&0, &(index + 1), valid);

    Ok((valid.unwrap_u8(), em, index))
}

/// Applies the signature padding scheme around a DigestInfo prefix and
/// digest.
#[inline]
pub(super) fn sign_pad(prefix: &[u8], digest: &[u8], k: usize) -> Result<Vec<u8>> {
    let hash_len = digest.len();
    let t_len = prefix.len() + digest.len();
    if k < t_len + 11 {
        return Err(Error::Engine(String::from(
            "digest too long for pkcs#1 v1.5 block",
        )));
    }

    // EM = 0x00 || 0x01 || PS || 0x00 || T
    let mut em = vec![0xff; k];
    em[0] = 0;
    em[1] = 1;
    em[k - t_len - 1] = 0;
    em[k - t_len..k - hash_len].copy_from_slice(prefix);
    em[k - hash_len..k].copy_from_slice(digest);

    Ok(em)
}

/// Checks a recovered signature block against the expected encoding of
/// `prefix || digest`, in constant time.
#[inline]
pub(super) fn sign_unpad(prefix: &[u8], digest: &[u8], em: &[u8], k: usize) -> Result<()> {
    let hash_len = digest.len();
    let t_len = prefix.len() + digest.len();
    if k < t_len + 11 {
        return Err(Error::Verification);
    }

    // EM = 0x00 || 0x01 || PS || 0x00 || T
    let mut ok = em[0].ct_eq(&0u8);
    ok &= em[1].ct_eq(&1u8);
    ok &= em[k - hash_len..k].ct_eq(digest);
    ok &= em[k - t_len..k - hash_len].ct_eq(prefix);
    ok &= em[k - t_len - 1].ct_eq(&0u8);

    for el in em.iter().skip(2).take(k - t_len - 3) {
        ok &= el.ct_eq(&0xff)
    }

    if ok.unwrap_u8() != 1 {
        return Err(Error::Verification);
    }

    Ok(())
}
