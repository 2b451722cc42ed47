// RSA Encryption Implementation
// Unpadded textbook encryption of text blocks, rendered as hex tokens

use super::bigint::{mod_exp, RsaBigInt};
use super::block::{encode_blocks, transform_blocks, CipherOptions};
use super::keygen::RsaPublicKey;
use crate::error::{RsaError, RsaResult};

/// Encrypt one block integer: c = m^e mod n
pub fn encrypt_block(m: &RsaBigInt, public_key: &RsaPublicKey) -> RsaResult<RsaBigInt> {
    if m >= &public_key.n {
        return Err(RsaError::BlockTooLarge { index: 0 });
    }
    Ok(mod_exp(m, &public_key.e, &public_key.n))
}

/// Encrypt text into ciphertext block integers, in block order
pub fn encrypt_text(
    plaintext: &str,
    public_key: &RsaPublicKey,
    options: &CipherOptions,
) -> RsaResult<Vec<RsaBigInt>> {
    let blocks = encode_blocks(plaintext, &public_key.n, options.chunk_mode)?;
    log::debug!(
        "encrypting {} blocks under a {}-bit modulus",
        blocks.len(),
        public_key.bit_length()
    );
    Ok(transform_blocks(&blocks, &public_key.e, &public_key.n, options.parallel))
}

/// Render ciphertext blocks as lowercase hex joined by single spaces
pub fn format_ciphertext(blocks: &[RsaBigInt]) -> String {
    blocks
        .iter()
        .map(|c| format!("{:x}", c))
        .collect::<Vec<_>>()
        .join(" ")
}
