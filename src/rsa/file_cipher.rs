// File Cipher Driver
// Encrypts and decrypts whole files block by block

use std::path::Path;

use super::block::CipherOptions;
use super::decrypt::decrypt_text;
use super::encrypt::{encrypt_text, format_ciphertext};
use super::keygen::{RsaPrivateKey, RsaPublicKey};
use crate::error::RsaResult;
use crate::util::file_ops::{format_file_size, read_file, read_text, write_file};

/// What a file operation processed
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CipherSummary {
    pub blocks: usize,
    pub input_bytes: u64,
    pub output_bytes: u64,
}

/// Encrypt a UTF-8 text file into space-separated hex blocks
///
/// The output file is only created once every block has been encrypted.
pub fn encrypt_file(
    public_key: &RsaPublicKey,
    input: &Path,
    output: &Path,
    options: &CipherOptions,
) -> RsaResult<CipherSummary> {
    let plaintext = read_text(input)?;
    let blocks = encrypt_text(&plaintext, public_key, options)?;
    let ciphertext = format_ciphertext(&blocks);
    write_file(output, ciphertext.as_bytes())?;

    let summary = CipherSummary {
        blocks: blocks.len(),
        input_bytes: plaintext.len() as u64,
        output_bytes: ciphertext.len() as u64,
    };
    log::info!(
        "encrypted {} ({}) into {} blocks -> {}",
        input.display(),
        format_file_size(summary.input_bytes),
        summary.blocks,
        output.display()
    );
    Ok(summary)
}

/// Decrypt a file of hex blocks back into UTF-8 text
///
/// The output file is only created once every block has been decrypted and decoded.
pub fn decrypt_file(
    private_key: &RsaPrivateKey,
    input: &Path,
    output: &Path,
    options: &CipherOptions,
) -> RsaResult<CipherSummary> {
    // undecodable bytes become U+FFFD, which parses as a malformed token
    let ciphertext = String::from_utf8_lossy(&read_file(input)?).into_owned();
    let plaintext = decrypt_text(&ciphertext, private_key, options)?;
    write_file(output, plaintext.as_bytes())?;

    let summary = CipherSummary {
        blocks: ciphertext.split_whitespace().count(),
        input_bytes: ciphertext.len() as u64,
        output_bytes: plaintext.len() as u64,
    };
    log::info!(
        "decrypted {} blocks from {} -> {} ({})",
        summary.blocks,
        input.display(),
        output.display(),
        format_file_size(summary.output_bytes)
    );
    Ok(summary)
}
