//! Copyright (c) 2026, Kirky.X
//!
//! MIT License
//!
//! Blowfish block cipher
//!
//! Pure-software Blowfish (64-bit block, 16-round Feistel network) in ECB mode
//! with NUL zero-padding. Each [`Blowfish`] owns its key schedule; the
//! published constants in [`tables`] are never mutated.
//!
//! # Examples
//!
//! ```rust
//! use bfguard::blowfish::Blowfish;
//!
//! let cipher = Blowfish::new(b"my secret key").unwrap();
//! let ciphertext = cipher.encrypt(b"hello");
//! assert_eq!(ciphertext.len(), 8);
//!
//! let plaintext = cipher.decrypt(&ciphertext);
//! assert_eq!(plaintext, b"hello\0\0\0");
//! ```

pub mod tables;

use base64::engine::general_purpose::STANDARD as BASE64;
use base64::Engine;

use crate::constants::{BLOWFISH_BLOCK_SIZE, BLOWFISH_MAX_KEY_LENGTH, BLOWFISH_ROUNDS};
use crate::error::CipherError;
use tables::{P_INIT, S_INIT};

/// Blowfish cipher instance holding a derived key schedule.
#[derive(Clone)]
pub struct Blowfish {
    /// P-array: 18 round subkeys
    p: [u32; 18],
    /// S-boxes S0..S3
    s: [[u32; 256]; 4],
}

impl std::fmt::Debug for Blowfish {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Blowfish")
            .field("schedule", &"***")
            .finish()
    }
}

impl Blowfish {
    /// Create a cipher keyed with `key`.
    ///
    /// # Errors
    ///
    /// Returns [`CipherError::InvalidKey`] when the key is empty or longer
    /// than 56 bytes.
    pub fn new(key: &[u8]) -> Result<Self, CipherError> {
        let mut cipher = Self {
            p: P_INIT,
            s: S_INIT,
        };
        cipher.set_key(key)?;
        Ok(cipher)
    }

    /// Re-key the cipher.
    ///
    /// The schedule is rebuilt from the published constants, so re-keying
    /// with the same key always yields the same schedule. On error the
    /// current schedule is left untouched.
    pub fn set_key(&mut self, key: &[u8]) -> Result<(), CipherError> {
        validate_key(key)?;

        self.p = P_INIT;
        self.s = S_INIT;

        let mut k = 0usize;
        for subkey in self.p.iter_mut() {
            let mut data = 0u32;
            for _ in 0..4 {
                data = (data << 8) | u32::from(key[k]);
                k = (k + 1) % key.len();
            }
            *subkey ^= data;
        }

        let (mut xl, mut xr) = (0u32, 0u32);
        for i in (0..self.p.len()).step_by(2) {
            (xl, xr) = self.encipher(xl, xr);
            self.p[i] = xl;
            self.p[i + 1] = xr;
        }

        for b in 0..4 {
            for i in (0..256).step_by(2) {
                (xl, xr) = self.encipher(xl, xr);
                self.s[b][i] = xl;
                self.s[b][i + 1] = xr;
            }
        }

        Ok(())
    }

    /// Round function `F`.
    #[inline]
    fn f(&self, x: u32) -> u32 {
        let [a, b, c, d] = x.to_be_bytes();
        (self.s[0][a as usize].wrapping_add(self.s[1][b as usize]) ^ self.s[2][c as usize])
            .wrapping_add(self.s[3][d as usize])
    }

    /// Encipher one 64-bit block given as two big-endian halves.
    pub fn encipher(&self, mut xl: u32, mut xr: u32) -> (u32, u32) {
        for i in 0..BLOWFISH_ROUNDS {
            let temp = xl ^ self.p[i];
            xl = self.f(temp) ^ xr;
            xr = temp;
        }
        // xr now holds the last round's temp; final swap and whitening.
        let temp = xr;
        xr = xl ^ self.p[16];
        xl = temp ^ self.p[17];
        (xl, xr)
    }

    /// Decipher one 64-bit block; exact inverse of [`Blowfish::encipher`].
    pub fn decipher(&self, mut xl: u32, mut xr: u32) -> (u32, u32) {
        for i in (2..BLOWFISH_ROUNDS + 2).rev() {
            let temp = xl ^ self.p[i];
            xl = self.f(temp) ^ xr;
            xr = temp;
        }
        let temp = xr;
        xr = xl ^ self.p[1];
        xl = temp ^ self.p[0];
        (xl, xr)
    }

    /// Encrypt `plaintext` in ECB mode, NUL-padding the last block.
    pub fn encrypt(&self, plaintext: &[u8]) -> Vec<u8> {
        self.process(plaintext, |xl, xr| self.encipher(xl, xr))
    }

    /// Decrypt `ciphertext` in ECB mode.
    ///
    /// Padding added by [`Blowfish::encrypt`] is not removed; see
    /// [`strip_padding`].
    pub fn decrypt(&self, ciphertext: &[u8]) -> Vec<u8> {
        self.process(ciphertext, |xl, xr| self.decipher(xl, xr))
    }

    /// Encrypt and encode the ciphertext as standard base64.
    pub fn encrypt_base64(&self, plaintext: &[u8]) -> String {
        BASE64.encode(self.encrypt(plaintext))
    }

    /// Decode standard base64 and decrypt.
    pub fn decrypt_base64(&self, encoded: &str) -> Result<Vec<u8>, CipherError> {
        let ciphertext = BASE64
            .decode(encoded.trim())
            .map_err(|e| CipherError::InvalidInput(format!("invalid base64 ciphertext: {}", e)))?;
        Ok(self.decrypt(&ciphertext))
    }

    /// Encrypt and encode the ciphertext as lowercase hex.
    pub fn encrypt_hex(&self, plaintext: &[u8]) -> String {
        hex::encode(self.encrypt(plaintext))
    }

    /// Decode hex and decrypt.
    pub fn decrypt_hex(&self, encoded: &str) -> Result<Vec<u8>, CipherError> {
        let ciphertext = hex::decode(encoded.trim())
            .map_err(|e| CipherError::InvalidInput(format!("invalid hex ciphertext: {}", e)))?;
        Ok(self.decrypt(&ciphertext))
    }

    fn process<F>(&self, input: &[u8], mut block_fn: F) -> Vec<u8>
    where
        F: FnMut(u32, u32) -> (u32, u32),
    {
        let padded_len = padded_len(input.len());
        let mut output = Vec::with_capacity(padded_len);
        let mut block = [0u8; BLOWFISH_BLOCK_SIZE];

        for chunk in input.chunks(BLOWFISH_BLOCK_SIZE) {
            block.fill(0);
            block[..chunk.len()].copy_from_slice(chunk);

            let xl = u32::from_be_bytes([block[0], block[1], block[2], block[3]]);
            let xr = u32::from_be_bytes([block[4], block[5], block[6], block[7]]);
            let (xl, xr) = block_fn(xl, xr);

            output.extend_from_slice(&xl.to_be_bytes());
            output.extend_from_slice(&xr.to_be_bytes());
        }

        output
    }
}

fn validate_key(key: &[u8]) -> Result<(), CipherError> {
    if key.is_empty() || key.len() > BLOWFISH_MAX_KEY_LENGTH {
        return Err(CipherError::InvalidKey { len: key.len() });
    }
    Ok(())
}

fn padded_len(len: usize) -> usize {
    len.div_ceil(BLOWFISH_BLOCK_SIZE) * BLOWFISH_BLOCK_SIZE
}

/// Trim trailing NUL bytes left by zero-padding.
///
/// Only correct for plaintexts that never end in NUL themselves.
pub fn strip_padding(data: &[u8]) -> &[u8] {
    let end = data
        .iter()
        .rposition(|&b| b != 0)
        .map(|pos| pos + 1)
        .unwrap_or(0);
    &data[..end]
}
