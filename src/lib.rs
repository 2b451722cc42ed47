//! Textbook RSA: prime generation, key generation, and unpadded block-wise
//! encryption of text files into space-separated hexadecimal blocks.
//!
//! This is the deterministic schoolbook scheme without padding. It is meant
//! for study, not for protecting data.

pub mod cli;
pub mod error;
pub mod rsa;
pub mod util;

pub use error::{RsaError, RsaResult};
