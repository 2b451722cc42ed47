// RSA Error Types
// Every failure the key generator, block codec and file driver can surface

use std::io;
use std::path::PathBuf;
use std::str::Utf8Error;

use thiserror::Error;

/// Errors returned by the RSA library
#[derive(Debug, Error)]
pub enum RsaError {
    #[error("no {bits}-bit prime found after {attempts} candidates")]
    PrimeGenerationFailure { bits: u64, attempts: u32 },

    #[error("modular inverse does not exist")]
    InverseNotFound,

    #[error("block {index} is too large for the key size")]
    BlockTooLarge { index: usize },

    #[error("ciphertext token {index} is not hexadecimal: `{token}`")]
    MalformedCiphertext { index: usize, token: String },

    #[error("block {index} does not decode to UTF-8: {source}")]
    InvalidUtf8 {
        index: usize,
        #[source]
        source: Utf8Error,
    },

    #[error("a {bits}-bit modulus cannot carry any plaintext block")]
    ModulusTooSmall { bits: u64 },

    #[error("invalid configuration: {0}")]
    InvalidConfig(String),

    #[error("IO error on {}: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
}

/// Result type for RSA operations
pub type RsaResult<T> = Result<T, RsaError>;
