// Block Codec
// Splits text into integer blocks below the modulus and reassembles decrypted blocks

use num_traits::Zero;
use rayon::prelude::*;

use super::bigint::{from_bytes, mod_exp, RsaBigInt};
use crate::error::{RsaError, RsaResult};

/// How plaintext is cut into blocks of `block_int_size` units
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum ChunkMode {
    /// Count characters per block. A block holding multi-byte characters can
    /// exceed `block_int_size` bytes and may then overflow the modulus.
    #[default]
    Chars,
    /// Count bytes per block. A multi-byte character may straddle two blocks,
    /// so blocks are only decodable as a whole stream.
    Bytes,
}

impl std::str::FromStr for ChunkMode {
    type Err = RsaError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "chars" => Ok(ChunkMode::Chars),
            "bytes" => Ok(ChunkMode::Bytes),
            other => Err(RsaError::InvalidConfig(format!(
                "unknown chunk mode `{}`, expected `chars` or `bytes`",
                other
            ))),
        }
    }
}

/// Options shared by encryption and decryption
#[derive(Clone, Debug)]
pub struct CipherOptions {
    pub chunk_mode: ChunkMode,
    /// Transform blocks on the rayon thread pool
    pub parallel: bool,
}

impl Default for CipherOptions {
    fn default() -> Self {
        Self {
            chunk_mode: ChunkMode::Chars,
            parallel: true,
        }
    }
}

impl CipherOptions {
    pub fn with_chunk_mode(mut self, mode: ChunkMode) -> Self {
        self.chunk_mode = mode;
        self
    }

    pub fn with_parallel(mut self, parallel: bool) -> Self {
        self.parallel = parallel;
        self
    }
}

/// Raise every block to `exp` modulo `n`, keeping block order
pub fn transform_blocks(
    blocks: &[RsaBigInt],
    exp: &RsaBigInt,
    n: &RsaBigInt,
    parallel: bool,
) -> Vec<RsaBigInt> {
    if parallel {
        blocks.par_iter().map(|m| mod_exp(m, exp, n)).collect()
    } else {
        blocks.iter().map(|m| mod_exp(m, exp, n)).collect()
    }
}

/// Units per block for a modulus: floor(bits(n) / 8) - 1
pub fn block_int_size(n: &RsaBigInt) -> RsaResult<usize> {
    let bits = n.bits();
    match (bits / 8).checked_sub(1) {
        Some(size) if size > 0 => Ok(size as usize),
        _ => Err(RsaError::ModulusTooSmall { bits }),
    }
}

/// Big-endian bytes of a block integer; zero has no bytes
pub fn block_bytes(m: &RsaBigInt) -> Vec<u8> {
    if m.is_zero() {
        Vec::new()
    } else {
        m.to_bytes_be()
    }
}

fn check_block(index: usize, bytes: &[u8], n: &RsaBigInt) -> RsaResult<RsaBigInt> {
    let m = from_bytes(bytes);
    if &m >= n {
        return Err(RsaError::BlockTooLarge { index });
    }
    Ok(m)
}

/// Encode text as block integers, each strictly less than `n`
pub fn encode_blocks(text: &str, n: &RsaBigInt, mode: ChunkMode) -> RsaResult<Vec<RsaBigInt>> {
    let size = block_int_size(n)?;

    match mode {
        ChunkMode::Chars => {
            let chars: Vec<char> = text.chars().collect();
            chars
                .chunks(size)
                .enumerate()
                .map(|(index, chunk)| {
                    let block: String = chunk.iter().collect();
                    check_block(index, block.as_bytes(), n)
                })
                .collect()
        }
        ChunkMode::Bytes => text
            .as_bytes()
            .chunks(size)
            .enumerate()
            .map(|(index, chunk)| check_block(index, chunk, n))
            .collect(),
    }
}

/// Reassemble decrypted block integers into text, in order
pub fn decode_blocks(blocks: &[RsaBigInt], mode: ChunkMode) -> RsaResult<String> {
    match mode {
        ChunkMode::Chars => {
            let mut text = String::new();
            for (index, m) in blocks.iter().enumerate() {
                let bytes = block_bytes(m);
                let chunk = std::str::from_utf8(&bytes)
                    .map_err(|source| RsaError::InvalidUtf8 { index, source })?;
                text.push_str(chunk);
            }
            Ok(text)
        }
        ChunkMode::Bytes => {
            let mut bytes = Vec::new();
            // end offset of every block inside `bytes`
            let mut ends = Vec::with_capacity(blocks.len());
            for m in blocks {
                bytes.extend(block_bytes(m));
                ends.push(bytes.len());
            }

            match std::str::from_utf8(&bytes) {
                Ok(text) => Ok(text.to_string()),
                Err(source) => {
                    let offset = source.valid_up_to();
                    let index = ends.iter().position(|&end| end > offset).unwrap_or(0);
                    Err(RsaError::InvalidUtf8 { index, source })
                }
            }
        }
    }
}
