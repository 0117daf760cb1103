use thiserror::Error;

/// Errors raised while building a decryption context or decrypting a segment.
#[derive(Debug, Error)]
pub enum DecryptError {
    /// Key bytes are not a valid AES key (16, 24 or 32 bytes).
    #[error("invalid key size: expected 16, 24 or 32 bytes, got {0} bytes")]
    InvalidKey(usize),

    /// IV could not be decoded into exactly one cipher block.
    #[error("invalid IV {iv:?}: {reason}")]
    InvalidIv { iv: String, reason: String },

    /// Ciphertext length is not a multiple of the block size.
    #[error("data length {0} is not a multiple of the 16 byte block size")]
    Alignment(usize),

    /// Nothing to decrypt.
    #[error("segment body is empty")]
    EmptyBody,
}
