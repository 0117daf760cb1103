use crate::{BLOCK_SIZE, DecryptError, Result};

/// Result of checking the trailing padding of a decrypted segment.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum PaddingCheck {
    /// Plaintext ends in `p` bytes of value `p`, with `1 <= p <= 16`.
    Valid,
    /// Anything else. Usually a wrong key or IV, or a damaged segment.
    PaddingError,
}

impl PaddingCheck {
    pub fn is_valid(self) -> bool {
        self == Self::Valid
    }
}

/// Classify the PKCS#7 padding at the end of `plaintext`.
///
/// A last byte above the block size, a zero last byte, or trailing bytes that
/// don't all repeat the last byte are reported as [`PaddingCheck::PaddingError`].
/// Only an empty buffer is an error.
pub fn classify(plaintext: &[u8]) -> Result<PaddingCheck> {
    let Some(&last) = plaintext.last() else {
        return Err(DecryptError::EmptyBody);
    };

    let pad = last as usize;

    if pad == 0 || pad > BLOCK_SIZE || pad > plaintext.len() {
        return Ok(PaddingCheck::PaddingError);
    }

    if plaintext[plaintext.len() - pad..].iter().all(|&x| x == last) {
        Ok(PaddingCheck::Valid)
    } else {
        Ok(PaddingCheck::PaddingError)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::DecryptionContext;
    use aes::Aes128;
    use cbc::{
        Encryptor,
        cipher::{BlockEncryptMut, KeyIvInit, block_padding::NoPadding},
    };

    fn padded(body: &[u8], pad: u8, len: usize) -> Vec<u8> {
        let mut data = body.to_vec();
        data.resize(len - pad as usize, b'x');
        data.extend(std::iter::repeat_n(pad, pad as usize));
        data
    }

    #[test]
    fn test_valid_padding_every_length() {
        for pad in 1..=16u8 {
            assert_eq!(
                classify(&padded(b"segment", pad, 32)).unwrap(),
                PaddingCheck::Valid,
                "pad {pad}"
            );
        }
    }

    #[test]
    fn test_full_block_of_padding() {
        let mut data = vec![b'A'; 16];
        data.extend([16; 16]);
        assert_eq!(classify(&data).unwrap(), PaddingCheck::Valid);
    }

    #[test]
    fn test_pad_above_block_size() {
        for last in [17u8, 20, 32, 128, 255] {
            // trailing bytes all equal the last byte, still rejected
            let data = vec![last; 32];
            assert_eq!(classify(&data).unwrap(), PaddingCheck::PaddingError);
        }
    }

    #[test]
    fn test_zero_pad() {
        let mut data = vec![b'A'; 15];
        data.push(0);
        assert_eq!(classify(&data).unwrap(), PaddingCheck::PaddingError);
    }

    #[test]
    fn test_mismatched_trailing_bytes() {
        let mut data = vec![b'A'; 12];
        data.extend([4, 4, 3, 4]);
        assert_eq!(classify(&data).unwrap(), PaddingCheck::PaddingError);

        let mut data = vec![b'A'; 14];
        data.extend([1, 2]);
        assert_eq!(classify(&data).unwrap(), PaddingCheck::PaddingError);
    }

    #[test]
    fn test_pad_longer_than_buffer() {
        assert_eq!(classify(&[3, 3]).unwrap(), PaddingCheck::PaddingError);
    }

    #[test]
    fn test_empty() {
        assert!(matches!(classify(&[]), Err(DecryptError::EmptyBody)));
    }

    #[test]
    fn test_zero_key_scenario() {
        let mut plaintext = vec![b'A'; 15];
        plaintext.push(1);

        let key = [0u8; 16];
        let mut ciphertext = plaintext.clone();
        Encryptor::<Aes128>::new(&key.into(), &[0u8; 16].into())
            .encrypt_padded_mut::<NoPadding>(&mut ciphertext, 16)
            .unwrap();

        let ctx =
            DecryptionContext::from_hex_iv(&key, "0x00000000000000000000000000000000").unwrap();
        let decrypted = ctx.decrypt_segment(ciphertext.clone()).unwrap();
        assert_eq!(decrypted, plaintext);
        assert_eq!(classify(&decrypted).unwrap(), PaddingCheck::Valid);

        // same input, same answer
        let again = ctx.decrypt_segment(ciphertext).unwrap();
        assert_eq!(again, decrypted);
        assert_eq!(classify(&again).unwrap(), PaddingCheck::Valid);
    }
}
