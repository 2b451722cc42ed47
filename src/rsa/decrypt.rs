// RSA Decryption Implementation
// Parses hex ciphertext tokens and recovers the plaintext blocks in order

use num_bigint::BigUint;
use num_traits::Zero;

use super::bigint::{mod_exp, RsaBigInt};
use super::block::{decode_blocks, transform_blocks, CipherOptions};
use super::keygen::RsaPrivateKey;
use crate::error::{RsaError, RsaResult};

/// Split ciphertext on whitespace and parse every token as hexadecimal
pub fn parse_ciphertext(ciphertext: &str) -> RsaResult<Vec<RsaBigInt>> {
    ciphertext
        .split_whitespace()
        .enumerate()
        .map(|(index, token)| {
            let malformed = || RsaError::MalformedCiphertext {
                index,
                token: token.to_string(),
            };
            // parse_bytes alone would let `_` separators through
            if !token.bytes().all(|b| b.is_ascii_hexdigit()) {
                return Err(malformed());
            }
            BigUint::parse_bytes(token.as_bytes(), 16).ok_or_else(malformed)
        })
        .collect()
}

fn check_modulus(private_key: &RsaPrivateKey) -> RsaResult<()> {
    if private_key.n.is_zero() {
        return Err(RsaError::ModulusTooSmall { bits: 0 });
    }
    Ok(())
}

/// Decrypt one block integer: m = c^d mod n
pub fn decrypt_block(c: &RsaBigInt, private_key: &RsaPrivateKey) -> RsaResult<RsaBigInt> {
    check_modulus(private_key)?;
    Ok(mod_exp(c, &private_key.d, &private_key.n))
}

/// Decrypt hex ciphertext back into text
pub fn decrypt_text(
    ciphertext: &str,
    private_key: &RsaPrivateKey,
    options: &CipherOptions,
) -> RsaResult<String> {
    check_modulus(private_key)?;
    let blocks = parse_ciphertext(ciphertext)?;
    log::debug!(
        "decrypting {} blocks under a {}-bit modulus",
        blocks.len(),
        private_key.bit_length()
    );
    let plain = transform_blocks(&blocks, &private_key.d, &private_key.n, options.parallel);
    decode_blocks(&plain, options.chunk_mode)
}
