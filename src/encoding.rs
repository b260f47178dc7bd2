//! PKCS#1 and PKCS#8 key-structure parsing.
//!
//! Incoming blobs are DER. Private keys are accepted either as a bare
//! PKCS#1 `RSAPrivateKey` or wrapped in a PKCS#8 `PrivateKeyInfo`; public
//! keys as a bare PKCS#1 `RSAPublicKey` or an X.509 `SubjectPublicKeyInfo`.
//! The wrapped form is tried first and the bare form used as fallback, so
//! callers do not have to declare which container they hold.

use crate::errors::{Error, Result};
use crate::key::{KeyKind, RsaKeyParameters};

/// Parses a key blob into borrowed big-endian parameters.
pub(crate) fn parse_key_blob(kind: KeyKind, blob: &[u8]) -> Result<RsaKeyParameters<'_>> {
    match kind {
        KeyKind::Public => parse_public_blob(blob),
        KeyKind::Private => parse_private_blob(blob),
    }
}

fn parse_private_blob(blob: &[u8]) -> Result<RsaKeyParameters<'_>> {
    // PKCS#8 wrapper first; a blob that is not a PrivateKeyInfo at all is
    // retried as bare PKCS#1. A well-formed wrapper carrying a non-RSA
    // algorithm is rejected outright.
    let inner = match pkcs8::PrivateKeyInfo::try_from(blob) {
        Ok(info) => {
            verify_algorithm_id(&info.algorithm)?;
            info.private_key
        }
        Err(_) => blob,
    };

    let key =
        pkcs1::RsaPrivateKey::try_from(inner).map_err(|_| Error::KeyParse { field: "key" })?;
    if key.version() != pkcs1::Version::TwoPrime {
        return Err(Error::KeyParse { field: "version" });
    }

    Ok(RsaKeyParameters::private(
        key.modulus.as_bytes(),
        key.public_exponent.as_bytes(),
        key.private_exponent.as_bytes(),
    )
    .with_factors(key.prime1.as_bytes(), key.prime2.as_bytes()))
}

fn parse_public_blob(blob: &[u8]) -> Result<RsaKeyParameters<'_>> {
    let inner = match pkcs8::SubjectPublicKeyInfoRef::try_from(blob) {
        Ok(spki) => {
            verify_algorithm_id(&spki.algorithm)?;
            spki.subject_public_key
                .as_bytes()
                .ok_or(Error::KeyParse { field: "key" })?
        }
        Err(_) => blob,
    };

    let key = pkcs1::RsaPublicKey::try_from(inner).map_err(|_| Error::KeyParse { field: "key" })?;

    Ok(RsaKeyParameters::public(
        key.modulus.as_bytes(),
        key.public_exponent.as_bytes(),
    ))
}

/// Checks that a PKCS#8 `AlgorithmIdentifier` names rsaEncryption.
fn verify_algorithm_id(algorithm: &pkcs8::AlgorithmIdentifierRef<'_>) -> Result<()> {
    if algorithm.oid != pkcs1::ALGORITHM_OID {
        return Err(Error::KeyParse { field: "algorithm" });
    }
    Ok(())
}
