//! Copyright (c) 2026, Kirky.X
//!
//! MIT License
//!
//! Blowfish through the public API

use bfguard::blowfish::{strip_padding, Blowfish};
use bfguard::CipherError;

/// Eric Young's ECB vectors: (key, plaintext, ciphertext).
const ECB_VECTORS: &[([u8; 8], [u8; 8], [u8; 8])] = &[
    (
        [0x00; 8],
        [0x00; 8],
        [0x4E, 0xF9, 0x97, 0x45, 0x61, 0x98, 0xDD, 0x78],
    ),
    (
        [0xFF; 8],
        [0xFF; 8],
        [0x51, 0x86, 0x6F, 0xD5, 0xB8, 0x5E, 0xCB, 0x8A],
    ),
    (
        [0x01, 0x23, 0x45, 0x67, 0x89, 0xAB, 0xCD, 0xEF],
        [0x11; 8],
        [0x61, 0xF9, 0xC3, 0x80, 0x22, 0x81, 0xB0, 0x96],
    ),
];

#[test]
fn test_published_ecb_vectors() {
    for (key, plain, cipher) in ECB_VECTORS {
        let bf = Blowfish::new(key).unwrap();
        assert_eq!(bf.encrypt(plain), cipher.to_vec(), "key {:02x?}", key);
        assert_eq!(bf.decrypt(cipher), plain.to_vec(), "key {:02x?}", key);
    }
}

#[test]
fn test_round_trip_various_lengths() {
    let bf = Blowfish::new(b"a reasonably long passphrase").unwrap();
    for len in [1usize, 7, 8, 9, 15, 16, 100] {
        let data: Vec<u8> = (0..len as u8).map(|b| b.wrapping_mul(37) | 1).collect();
        let encrypted = bf.encrypt(&data);
        assert_eq!(encrypted.len() % 8, 0);
        assert_eq!(strip_padding(&bf.decrypt(&encrypted)), data.as_slice());
    }
}

#[test]
fn test_same_key_is_deterministic() {
    let a = Blowfish::new(b"shared").unwrap();
    let b = Blowfish::new(b"shared").unwrap();
    assert_eq!(a.encrypt(b"payload"), b.encrypt(b"payload"));
    assert_ne!(
        a.encrypt(b"payload"),
        Blowfish::new(b"other").unwrap().encrypt(b"payload")
    );
}

#[test]
fn test_key_length_boundary() {
    assert!(Blowfish::new(&[7u8; 56]).is_ok());
    assert_eq!(
        Blowfish::new(&[7u8; 57]).unwrap_err(),
        CipherError::InvalidKey { len: 57 }
    );
    assert_eq!(
        Blowfish::new(b"").unwrap_err(),
        CipherError::InvalidKey { len: 0 }
    );
}

#[test]
fn test_text_helpers() {
    let bf = Blowfish::new(b"secret").unwrap();
    assert_eq!(bf.encrypt_hex(b"hello"), "3efe022eca4b05b1");

    let encoded = bf.encrypt_base64(b"token");
    let decoded = bf.decrypt_base64(&encoded).unwrap();
    assert_eq!(strip_padding(&decoded), b"token");

    assert!(matches!(
        bf.decrypt_hex("zz"),
        Err(CipherError::InvalidInput(_))
    ));
}
