//! Decryption and padding checks for AES-CBC encrypted HLS segments.
//!
//! A [`DecryptionContext`] is built once per media playlist from the raw key
//! bytes and the playlist's `IV` attribute, then shared by every segment of
//! that playlist. Decrypted segments are handed to [`classify`] which reports
//! whether the plaintext ends in a well-formed PKCS#7 padding block.
//!
//! ```
//! use segverify_crypto::{DecryptionContext, PaddingCheck, classify};
//!
//! # fn main() -> segverify_crypto::Result<()> {
//! let ctx = DecryptionContext::from_hex_iv(&[0; 16], "0x00000000000000000000000000000000")?;
//! let plaintext = ctx.decrypt_segment(vec![0; 32])?;
//! assert_eq!(plaintext.len(), 32);
//!
//! assert_eq!(classify(b"AAAAAAAAAAAAAAA\x01")?, PaddingCheck::Valid);
//! # Ok(())
//! # }
//! ```

mod context;
mod error;
mod padding;

pub use context::{BLOCK_SIZE, DecryptionContext, IV_HEX_PREFIX_LEN, decode_iv};
pub use error::DecryptError;
pub use padding::{PaddingCheck, classify};

/// A `Result` alias where the `Err` case is `segverify_crypto::DecryptError`.
pub type Result<T> = std::result::Result<T, DecryptError>;
