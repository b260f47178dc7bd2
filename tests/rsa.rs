use base64ct::{Base64, Encoding};
use hex_literal::hex;
use sha1::{Digest, Sha1};
use sha2::Sha256;

use rsa_backend::{
    build, supports, Algorithm, Error, HashAlg, KeyKind, Padding, RsaHandle, RsaKeyParameters,
};

// 1024-bit test key from the Wycheproof project.
// https://github.com/C2SP/wycheproof/blob/main/testvectors/rsa_oaep_misc_test.json
const N: &[u8] = &hex!(
    "d0941e63a980fa92fb25ed4c7b3307f827023034ae7f1a7491f0699ca7607285"
    "e62ad8e994bac21b8b6e305e334f4874067d28e304230dca7f0e85f7ce595770"
    "b6e054c9f844ba86c0696eeba0769d8d4a347e8fe85c724ac1c44994af18a39e"
    "719f721f1bc50c46a39e6c075fcd1649f01f22608ce7dc6955502258336987d9"
);
const E: &[u8] = &[0x01, 0x00, 0x01];
const D: &[u8] = &hex!(
    "5ff4a47e690ea338573e3d8b3fea5c32378ff4296855a51017cba86a9f3de9b1"
    "dc0fbe36c76b9bbd1c4a170a5f448c2a8489b3f3ac858be4aacb3daaa14dccc1"
    "83622eedd3ae6f0427a2a298b51b97818a5430f13705f42d8b25476f939c935e"
    "389e30d9ade5d0180920135f5aef0c5fecd15f00b83b51dab8ba930d88826801"
);
const P: &[u8] = &hex!(
    "e882d12d5f0be26a80359f13c08210bdcbf759dfee695313efa8886919659b06"
    "4e3c656a267af6275ed1af89a5dfe9e25b31a02bafbd59445b7507a22989a681"
);
const Q: &[u8] = &hex!(
    "e5a65cfa668bd857d59135a78c18c8adb7c222368e9d74abad8e83299f7ac3c2"
    "ad7aa44ddb05deea6d9b20dbaf09a8615284a17c72d3723240334685ea7e2559"
);

fn private_handle(padding: Padding) -> RsaHandle {
    let params = RsaKeyParameters::private(N, E, D).with_factors(P, Q);
    RsaHandle::from_parameters(KeyKind::Private, &params, padding).unwrap()
}

fn public_handle(padding: Padding) -> RsaHandle {
    RsaHandle::from_parameters(KeyKind::Public, &RsaKeyParameters::public(N, E), padding).unwrap()
}

const PKCS1_SHA1: Padding = Padding::Pkcs1 {
    hash: HashAlg::Sha1,
};
const PKCS1_SHA256: Padding = Padding::Pkcs1 {
    hash: HashAlg::Sha256,
};

#[test]
fn size_ceilings_match_modulus_size() {
    let handle = private_handle(Padding::Raw);
    assert_eq!(handle.max_plaintext_len(), 128);
    assert_eq!(handle.max_ciphertext_len(), 128);
    assert_eq!(handle.max_dgst_len(), 128);
    assert_eq!(handle.max_signature_len(), 128);
}

#[test]
fn decrypt_pkcs1v15_known_vectors() {
    let handle = private_handle(PKCS1_SHA1);

    let tests = [
        (
            "f0f4qsNunKxRgsag5/p3AER7uoqs/Gupe33kuJWGAkLjobLsLszxp7uwVngeoxpDi87rTcJ9y0Sbu2QfnV/KvwEHiuQ8NL1FCRt4ujwgNtQms9XHjkTeLUX9tapoxdA0QhLsjblZFdb3fAvZXHGKPTBdHkxHut6LHG37SxbHeQY=",
            "x",
        ),
        (
            "l+L4+CdrgcFJ9LngppA+o7pZAKmZs4Gu5cRsum7OAji0+XNamTaPKxgtAio5A8ltRLJxrfZnRFOIOyn4964vMIB2YfVG/Vak//kLIn/rbgaVGndmWxQuR6ykEruOuqn5JUqv4JHaW30aDzEkCbpXWpFJ7dhfrWZdSv4XKpt9cY4=",
            "testing.",
        ),
        (
            "JtlpY3lTeCmkRRrIgfuOXH0ubMOL1U/n6nM6r6kF2iuRiFIPapfEzHF2WSvrbxZXa8gzJo1PuAJiJ6Vy90vOWbP43VEXLk5wyGZPePwHQ1WwOcE+6okZ9j9zmAmAnQUyaUjPfhwyDC64ObjiSKeIPCYSsdURy/Z67lcTZ6JJ8+8=",
            "testing.\n",
        ),
        (
            "TcyqI5jrGyln5AspqnvWShPIjKIZtXbNApf9TqAZrsl31RS+k6blEJy6YVZeow9QKis+UyIcz08nMGX/D3lm/JA4bwpyBFAvSFr2MNjNpGh9QqEcGryI0CpLA1fy56x7YGB/Y0eJZXnSj91udGubJTEI9ULTouoFAKxoWq7ioTc=",
            "01234567890123456789012345678901234567890123456789012",
        ),
    ];

    for (ciphertext, expected) in &tests {
        let ciphertext = Base64::decode_vec(ciphertext).unwrap();
        let out = handle.decrypt_to_vec(&ciphertext).unwrap();
        assert_eq!(out, expected.as_bytes());
    }
}

#[test]
fn sign_pkcs1v15_known_vector() {
    let handle = private_handle(PKCS1_SHA1);
    let digest = Sha1::digest(b"Test.\n");
    let expected = hex!(
        "2c5954065af5f8c651cc46c49af719507648947a6100ef5c37294939a396c529"
        "551bd65c90c4aae0417cd3e621bcfb1d40630b6593a14589b94943efa5034231"
        "0c23b07aa7acd102dc0b922272db0908509467d56ae3edc5d4ec71ba072f509d"
        "0f83d7bc1d88174c0c39a3587963c8625e606c3b99cf9a202da0c0b3677a082d"
    );

    let signature = handle.sign_to_vec(&digest).unwrap();
    assert_eq!(signature, expected);
}

#[test]
fn verify_pkcs1v15_accepts_and_rejects() {
    let signer = private_handle(PKCS1_SHA1);
    let verifier = public_handle(PKCS1_SHA1);

    let digest = Sha1::digest(b"Test.\n");
    let signature = signer.sign_to_vec(&digest).unwrap();
    verifier.verify(&signature, &digest).unwrap();

    let mut bad = signature.clone();
    bad[17] ^= 0x40;
    assert_eq!(verifier.verify(&bad, &digest), Err(Error::Verification));

    let other = Sha1::digest(b"Test?\n");
    assert_eq!(verifier.verify(&signature, &other), Err(Error::Verification));
}

#[test]
fn crt_and_plain_keys_sign_identically() {
    let with_crt = private_handle(PKCS1_SHA256);
    let without_crt = RsaHandle::from_parameters(
        KeyKind::Private,
        &RsaKeyParameters::private(N, E, D),
        PKCS1_SHA256,
    )
    .unwrap();

    let digest = Sha256::digest(b"crt agreement");
    assert_eq!(
        with_crt.sign_to_vec(&digest).unwrap(),
        without_crt.sign_to_vec(&digest).unwrap()
    );
}

#[test]
fn pkcs1v15_encrypt_decrypt_roundtrip() {
    let encryptor = public_handle(PKCS1_SHA256);
    let decryptor = private_handle(PKCS1_SHA256);

    for message in [&b"x"[..], &b"testing."[..], &[0u8; 117][..]] {
        let ciphertext = encryptor.encrypt_to_vec(message).unwrap();
        // Natural serialization: up to the modulus size, occasionally less
        // when the ciphertext value has leading zero octets.
        assert!(ciphertext.len() <= 128);
        assert_ne!(&ciphertext[..], message);
        assert_eq!(decryptor.decrypt_to_vec(&ciphertext).unwrap(), message);
    }
}

#[test]
fn raw_roundtrip_preserves_full_width() {
    let handle = private_handle(Padding::Raw);

    // Exactly the modulus size, small enough as an integer to stay below n.
    let mut plaintext = [0x01u8; 128];
    plaintext[0] = 0x00;

    let ciphertext = handle.encrypt_to_vec(&plaintext).unwrap();
    assert_eq!(ciphertext.len(), 128);
    let recovered = handle.decrypt_to_vec(&ciphertext).unwrap();
    assert_eq!(recovered, plaintext);
}

#[test]
fn inputs_above_ceiling_rejected() {
    let raw = private_handle(Padding::Raw);
    let pkcs1 = private_handle(PKCS1_SHA256);
    let oversize = [0u8; 129];
    let mut out = [0u8; 256];

    for handle in [&raw, &pkcs1] {
        assert_eq!(
            handle.encrypt(&oversize, &mut out),
            Err(Error::InputTooLarge)
        );
        assert_eq!(
            handle.decrypt(&oversize, &mut out),
            Err(Error::InputTooLarge)
        );
    }
    assert_eq!(pkcs1.sign(&oversize, &mut out), Err(Error::InputTooLarge));
    assert_eq!(
        pkcs1.verify(&out[..128], &oversize),
        Err(Error::InputTooLarge)
    );
    assert_eq!(
        pkcs1.verify(&oversize, &out[..20]),
        Err(Error::InputTooLarge)
    );
}

#[test]
fn undersized_output_buffers_rejected() {
    let handle = private_handle(PKCS1_SHA1);
    let digest = Sha1::digest(b"Test.\n");

    let mut small = [0u8; 64];
    assert_eq!(handle.sign(&digest, &mut small), Err(Error::OutputTooSmall));

    let ciphertext = Base64::decode_vec(
        "f0f4qsNunKxRgsag5/p3AER7uoqs/Gupe33kuJWGAkLjobLsLszxp7uwVngeoxpDi87rTcJ9y0Sbu2QfnV/KvwEHiuQ8NL1FCRt4ujwgNtQms9XHjkTeLUX9tapoxdA0QhLsjblZFdb3fAvZXHGKPTBdHkxHut6LHG37SxbHeQY=",
    )
    .unwrap();
    let mut empty = [0u8; 0];
    assert_eq!(
        handle.decrypt(&ciphertext, &mut empty),
        Err(Error::OutputTooSmall)
    );
}

#[test]
fn raw_handles_refuse_signatures() {
    let handle = private_handle(Padding::Raw);
    let mut out = [0u8; 128];
    assert_eq!(
        handle.sign(&[0u8; 20], &mut out),
        Err(Error::UnsupportedPadding)
    );
    assert_eq!(
        handle.verify(&out, &[0u8; 20]),
        Err(Error::UnsupportedPadding)
    );
}

#[test]
fn public_handles_refuse_secret_operations() {
    let handle = public_handle(PKCS1_SHA1);
    let digest = Sha1::digest(b"Test.\n");
    assert!(matches!(
        handle.sign_to_vec(&digest),
        Err(Error::Engine(_))
    ));
}

#[test]
fn capability_query() {
    assert!(supports(Algorithm::Rsa, Padding::Raw));
    assert!(supports(Algorithm::Rsa, PKCS1_SHA1));
    assert!(supports(Algorithm::Rsa, PKCS1_SHA256));
    assert!(!supports(
        Algorithm::Rsa,
        Padding::Pkcs1 {
            hash: HashAlg::Sha384
        }
    ));
}

// 2048-bit keypair generated with openssl, PKCS#8 private key and X.509
// SubjectPublicKeyInfo public key.
const PRIVATE_PKCS8_B64: &str = concat!(
    "MIIEvAIBADANBgkqhkiG9w0BAQEFAASCBKYwggSiAgEAAoIBAQCwLLXTHaYT57yN",
    "HZT6BTnJIDaJ8GTnu05PnwQQcV7Xgom164T52qaMmvsK/PGlzMzQdo9YjYKsExZE",
    "EllJe4O1mVA1T/LyKLkPZgKqcp11/9UAkk3pHsPkb0YOb3g1721K6tQ78ufjeIOt",
    "5WJ+n+HJHOvhvyjmO0aQ51eh0jSyUu6U9fA+qrtPO4D/mUVRDJmCLSyGzIMd4Xan",
    "zTSWZ8JWLjahIdMPOZYUrGpICOxwt9Jaow37ogAalRVHnTb8PkklOo9pr0a3ZdQQ",
    "P3yV/A5gmgXXLi2BkQ0b2y8FOuD/JjBXL4Ks9nUVn/nMMaFhDxmL3ZZ9AuvB94AR",
    "B0MvuZh9AgMBAAECggEABoVaB1dURJhZDBV0OcI5iVWakr63md/F3kdDnlu+koDd",
    "/V63rG76izDmsQQYP3Zgt0TW1ehDcmP3ziDG2blycF5WKM2tqGcwlfBvypn8WEnH",
    "5eWEcEul5JFZ09C8b61N8sOALq01PzVOv8dCPu9jKzL19mfPofX4myKt4esKX2gy",
    "psId9QmgsrRRsCSvQeUxOA3Sqaa0a+atALZByPKZN8XzmZu1Ie5QPQvh/xYDJU1D",
    "GEiNgwZGy0eXL2Se5OjKAR40f4SzArbs/Jb2gRFHTjpdJ9g33GqoP94jZPcogtm2",
    "FHgI5vl9jL4uXiSJLkgl4FfFvoIXWuUi1xAC5NDT4QKBgQDnaxGFvt6vW8JKEyEq",
    "6Nf9K2Y2nQbvEmqnvS/RPwuqKuh66KCNG2rePFzXLHCplbYHt9hhF+Ity9lFzxSK",
    "ipRC6BD9aqaqF6qhm1nZWnXsPWjWDsFYzQHv8LA4pL8gmxbz+IOs1jbbIQAdq8X5",
    "uv7C1YSCrPkpm/nTljzwU/d/gwKBgQDC42in2DURf1+cU9Qw+hNDCy0EgkB7STzV",
    "dCreCAFXhSIzFwq9bjzOeSFtvZlWxKNJKNUiDXgN/grRREG/m1kW7EdHAMiOVVNK",
    "SbQ/+zHy6SMKNu0ArkokaCAEludVVRjkwh5GsyFvFaBINJBnp/zDYhNkkxStjCRf",
    "rW0/fmcH/wKBgF/IA9+caWShEOBB3Kd66fKiJNMT2QvYToaQmhr8AiLzUXeVkuX0",
    "ZB4JU8/HV/YIveeh4xAEp5uW1J29IN5ajxTGIkoQ+1xJIVl0CBMbCtW1cQ+v2byc",
    "VWHu97DqFyUyq6RcxnshymCV3wtozi8Xg1w2rXq8hv/+y78UXrKFvllrAoGAItrb",
    "F9GyRAvcxK+1boD7Ou1fwsOs1p/VknNxSz5xRv7Xi/2d/R0fIOpHEUJsjzkh3u6/",
    "l5SDGTWLJ7wmaidVeqUNZmR8egBGoi2mYB8D4ubRTn1eS9XgCrzYpRl8DCXpCtiw",
    "44IcA6sBfIhyHyfLLAJ5Z25qr1M2GiqBNG7d7G8CgYBoIYe3OeuqZn2T+eA3rmMv",
    "djLUQsO3CvmFYBDvNqmiwNx3OOV/YFQVvSAGaEP/5pJGVmAKUDaALgTveToLV6jq",
    "bS99QZDnrW+xkvJi6N1ZAlQpIOX5Y/Q2qyBa1Hf2Z21mnqZSN3HHC6aQl+83uety",
    "JJXbL24vf1AajzeJk6CpdQ==",
);
const PUBLIC_SPKI_B64: &str = concat!(
    "MIIBIjANBgkqhkiG9w0BAQEFAAOCAQ8AMIIBCgKCAQEAsCy10x2mE+e8jR2U+gU5",
    "ySA2ifBk57tOT58EEHFe14KJteuE+dqmjJr7CvzxpczM0HaPWI2CrBMWRBJZSXuD",
    "tZlQNU/y8ii5D2YCqnKddf/VAJJN6R7D5G9GDm94Ne9tSurUO/Ln43iDreVifp/h",
    "yRzr4b8o5jtGkOdXodI0slLulPXwPqq7TzuA/5lFUQyZgi0shsyDHeF2p800lmfC",
    "Vi42oSHTDzmWFKxqSAjscLfSWqMN+6IAGpUVR502/D5JJTqPaa9Gt2XUED98lfwO",
    "YJoF1y4tgZENG9svBTrg/yYwVy+CrPZ1FZ/5zDGhYQ8Zi92WfQLrwfeAEQdDL7mY",
    "fQIDAQAB",
);

#[test]
fn build_from_der_blobs() {
    let private_der = Base64::decode_vec(PRIVATE_PKCS8_B64).unwrap();
    let public_der = Base64::decode_vec(PUBLIC_SPKI_B64).unwrap();

    let signer = build(Algorithm::Rsa, KeyKind::Private, &private_der, PKCS1_SHA256).unwrap();
    let verifier = build(Algorithm::Rsa, KeyKind::Public, &public_der, PKCS1_SHA256).unwrap();
    assert_eq!(signer.max_signature_len(), 256);
    assert_eq!(verifier.max_signature_len(), 256);

    let digest = Sha256::digest(b"der blob roundtrip");
    let signature = signer.sign_to_vec(&digest).unwrap();
    verifier.verify(&signature, &digest).unwrap();
}

#[test]
fn build_rejects_malformed_blobs() {
    let private_der = Base64::decode_vec(PRIVATE_PKCS8_B64).unwrap();
    let err = build(
        Algorithm::Rsa,
        KeyKind::Private,
        &private_der[..40],
        PKCS1_SHA256,
    )
    .unwrap_err();
    assert!(matches!(err, Error::KeyParse { .. }));
}

#[test]
fn build_rejects_unsupported_hash() {
    let public_der = Base64::decode_vec(PUBLIC_SPKI_B64).unwrap();
    let err = build(
        Algorithm::Rsa,
        KeyKind::Public,
        &public_der,
        Padding::Pkcs1 {
            hash: HashAlg::Sha384,
        },
    )
    .unwrap_err();
    assert_eq!(err, Error::UnsupportedPadding);
}
