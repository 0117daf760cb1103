use crate::{DecryptError, Result};
use aes::{Aes128, Aes192, Aes256};
use cbc::{
    Decryptor,
    cipher::{BlockCipher, BlockDecryptMut, KeyInit, KeyIvInit, block_padding::NoPadding},
};

/// AES block size in bytes. Both the IV and every ciphertext must line up with it.
pub const BLOCK_SIZE: usize = 16;

/// Length of the `0x` marker in front of an `EXT-X-KEY` IV attribute.
pub const IV_HEX_PREFIX_LEN: usize = 2;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
enum Cipher {
    Aes128,
    Aes192,
    Aes256,
}

impl Cipher {
    fn for_key(key: &[u8]) -> Result<Self> {
        match key.len() {
            16 => Ok(Self::Aes128),
            24 => Ok(Self::Aes192),
            32 => Ok(Self::Aes256),
            x => Err(DecryptError::InvalidKey(x)),
        }
    }
}

/// Key and IV of one media playlist.
///
/// The context only stores key material. Every call to [`decrypt_in_place`](Self::decrypt_in_place)
/// starts a new CBC chain from the stored IV, so a single context can be shared
/// between threads decrypting different segments at the same time.
#[derive(Clone)]
pub struct DecryptionContext {
    cipher: Cipher,
    key: Vec<u8>,
    iv: [u8; BLOCK_SIZE],
}

impl DecryptionContext {
    /// Create a context from raw key bytes and an already decoded IV.
    pub fn new(key: &[u8], iv: [u8; BLOCK_SIZE]) -> Result<Self> {
        Ok(Self {
            cipher: Cipher::for_key(key)?,
            key: key.to_vec(),
            iv,
        })
    }

    /// Create a context from raw key bytes and a hex IV as written in a playlist.
    ///
    /// The key is checked before the IV is decoded.
    pub fn from_hex_iv(key: &[u8], iv_hex: &str) -> Result<Self> {
        let cipher = Cipher::for_key(key)?;
        let iv = decode_iv(iv_hex)?;

        Ok(Self {
            cipher,
            key: key.to_vec(),
            iv,
        })
    }

    /// Size of the AES key in bytes.
    pub fn key_size(&self) -> usize {
        self.key.len()
    }

    /// Decrypt `data` in place without touching the padding.
    pub fn decrypt_in_place(&self, data: &mut [u8]) -> Result<()> {
        if data.is_empty() {
            return Err(DecryptError::EmptyBody);
        }

        if data.len() % BLOCK_SIZE != 0 {
            return Err(DecryptError::Alignment(data.len()));
        }

        let len = data.len();
        let result = match self.cipher {
            Cipher::Aes128 => decryptor::<Aes128>(&self.key, &self.iv)?
                .decrypt_padded_mut::<NoPadding>(data)
                .map(|_| ()),
            Cipher::Aes192 => decryptor::<Aes192>(&self.key, &self.iv)?
                .decrypt_padded_mut::<NoPadding>(data)
                .map(|_| ()),
            Cipher::Aes256 => decryptor::<Aes256>(&self.key, &self.iv)?
                .decrypt_padded_mut::<NoPadding>(data)
                .map(|_| ()),
        };

        result.map_err(|_| DecryptError::Alignment(len))
    }

    /// Decrypt a whole segment body and hand it back, padding included.
    pub fn decrypt_segment(&self, mut data: Vec<u8>) -> Result<Vec<u8>> {
        self.decrypt_in_place(&mut data)?;
        Ok(data)
    }
}

impl std::fmt::Debug for DecryptionContext {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("DecryptionContext")
            .field("cipher", &self.cipher)
            .field("iv", &hex::encode(self.iv))
            .finish_non_exhaustive()
    }
}

fn decryptor<C>(key: &[u8], iv: &[u8; BLOCK_SIZE]) -> Result<Decryptor<C>>
where
    C: BlockCipher + BlockDecryptMut + KeyInit,
{
    Decryptor::<C>::new_from_slices(key, iv).map_err(|_| DecryptError::InvalidKey(key.len()))
}

/// Decode a playlist IV such as `0x00000000000000000000000000000001`.
///
/// The first [`IV_HEX_PREFIX_LEN`] characters are dropped when they are a `0x`
/// or `0X` marker. The remaining digits must decode to exactly [`BLOCK_SIZE`] bytes.
pub fn decode_iv(iv_hex: &str) -> Result<[u8; BLOCK_SIZE]> {
    let digits = match iv_hex.get(..IV_HEX_PREFIX_LEN) {
        Some("0x" | "0X") => &iv_hex[IV_HEX_PREFIX_LEN..],
        _ => iv_hex,
    };

    let invalid = |reason: String| DecryptError::InvalidIv {
        iv: iv_hex.to_owned(),
        reason,
    };

    let bytes = hex::decode(digits).map_err(|e| invalid(e.to_string()))?;

    <[u8; BLOCK_SIZE]>::try_from(bytes.as_slice()).map_err(|_| {
        invalid(format!(
            "IV length must be equal to block size ({} bytes), got {} bytes",
            BLOCK_SIZE,
            bytes.len()
        ))
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use cbc::{Encryptor, cipher::BlockEncryptMut};

    const ZERO_IV: &str = "0x00000000000000000000000000000000";

    fn encrypt(key: &[u8; 16], iv: &[u8; 16], plaintext: &[u8]) -> Vec<u8> {
        let mut buf = plaintext.to_vec();
        Encryptor::<Aes128>::new(key.into(), iv.into())
            .encrypt_padded_mut::<NoPadding>(&mut buf, plaintext.len())
            .unwrap();
        buf
    }

    #[test]
    fn test_decode_iv() {
        let iv = decode_iv("0x000102030405060708090a0b0c0d0e0f").unwrap();
        assert_eq!(iv, [0, 1, 2, 3, 4, 5, 6, 7, 8, 9, 10, 11, 12, 13, 14, 15]);
    }

    #[test]
    fn test_decode_iv_uppercase_marker() {
        assert_eq!(
            decode_iv("0X000000000000000000000000000000FF").unwrap()[15],
            0xff
        );
    }

    #[test]
    fn test_decode_iv_without_marker() {
        assert_eq!(decode_iv("00000000000000000000000000000001").unwrap()[15], 1);
    }

    #[test]
    fn test_decode_iv_wrong_length() {
        for iv in ["0x", "0x00", "0x000000000000000000000000000000", "0x0000000000000000000000000000000000"] {
            assert!(
                matches!(decode_iv(iv), Err(DecryptError::InvalidIv { .. })),
                "{iv} should be rejected"
            );
        }
    }

    #[test]
    fn test_decode_iv_not_hex() {
        assert!(matches!(
            decode_iv("0xzz000000000000000000000000000000"),
            Err(DecryptError::InvalidIv { .. })
        ));
    }

    #[test]
    fn test_key_sizes() {
        for size in [16, 24, 32] {
            let ctx = DecryptionContext::new(&vec![7; size], [0; 16]).unwrap();
            assert_eq!(ctx.key_size(), size);
        }

        for size in [0, 8, 15, 17, 64] {
            assert!(matches!(
                DecryptionContext::new(&vec![7; size], [0; 16]),
                Err(DecryptError::InvalidKey(x)) if x == size
            ));
        }
    }

    #[test]
    fn test_key_checked_before_iv() {
        assert!(matches!(
            DecryptionContext::from_hex_iv(&[0; 5], "0x00"),
            Err(DecryptError::InvalidKey(5))
        ));
    }

    #[test]
    fn test_decrypt_round_trip() {
        let key = [0x2b; 16];
        let iv = [0x11; 16];
        let plaintext = [b'A'; 48];
        let ciphertext = encrypt(&key, &iv, &plaintext);
        assert_ne!(ciphertext, plaintext);

        let ctx = DecryptionContext::new(&key, iv).unwrap();
        assert_eq!(ctx.decrypt_segment(ciphertext).unwrap(), plaintext);
    }

    #[test]
    fn test_shared_context_does_not_chain_between_calls() {
        let key = [0; 16];
        let ciphertext = encrypt(&key, &[0; 16], &[b'B'; 32]);
        let ctx = DecryptionContext::from_hex_iv(&key, ZERO_IV).unwrap();

        let first = ctx.decrypt_segment(ciphertext.clone()).unwrap();
        let second = ctx.decrypt_segment(ciphertext).unwrap();
        assert_eq!(first, second);
        assert_eq!(first, [b'B'; 32]);
    }

    #[test]
    fn test_decrypt_alignment() {
        let ctx = DecryptionContext::new(&[0; 16], [0; 16]).unwrap();
        assert!(matches!(
            ctx.decrypt_segment(vec![0; 15]),
            Err(DecryptError::Alignment(15))
        ));
        assert!(matches!(
            ctx.decrypt_segment(vec![0; 33]),
            Err(DecryptError::Alignment(33))
        ));
    }

    #[test]
    fn test_decrypt_empty() {
        let ctx = DecryptionContext::new(&[0; 32], [0; 16]).unwrap();
        assert!(matches!(
            ctx.decrypt_segment(vec![]),
            Err(DecryptError::EmptyBody)
        ));
    }
}
