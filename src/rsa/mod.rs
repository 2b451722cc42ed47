// RSA Module - Main module file
// Exports all RSA-related functionality

pub mod bigint;
pub mod block;
pub mod decrypt;
pub mod encrypt;
pub mod file_cipher;
pub mod keygen;
pub mod prime;
pub mod report;

pub use bigint::{extended_gcd, mod_exp, mod_inverse, RsaBigInt};
pub use block::{block_int_size, decode_blocks, encode_blocks, ChunkMode, CipherOptions};
pub use decrypt::{decrypt_block, decrypt_text, parse_ciphertext};
pub use encrypt::{encrypt_block, encrypt_text, format_ciphertext};
pub use file_cipher::{decrypt_file, encrypt_file, CipherSummary};
pub use keygen::{
    generate_default_keys, generate_keys, generate_keys_with_rng, KeyGenConfig, RsaKeyPair,
    RsaPrivateKey, RsaPublicKey,
};
pub use prime::{generate_prime, generate_prime_with_rng, is_probable_prime, MAX_PRIME_BITS};
pub use report::{ConsoleReporter, KeyEvent, KeyReporter, LogReporter, NoopReporter};
