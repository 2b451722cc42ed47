// Command Line Interface
// Subcommands for key generation, file encryption and decryption

use std::path::PathBuf;

use anyhow::Context;
use clap::{Args, Parser, Subcommand, ValueEnum};

use crate::rsa::{
    decrypt_file, encrypt_file, generate_keys, ChunkMode, CipherOptions, ConsoleReporter,
    KeyGenConfig, KeyReporter, LogReporter, NoopReporter, RsaBigInt, RsaKeyPair, RsaPrivateKey,
    RsaPublicKey,
};

#[derive(Parser, Debug)]
#[command(name = "rsa_textbook", version, about = "Textbook RSA file encryption")]
pub struct Cli {
    /// Log at debug level
    #[arg(short, long, global = true)]
    pub verbose: bool,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Generate a key pair and print (e, n) and (d, n)
    Keygen(KeygenArgs),
    /// Encrypt a text file with a public key
    Encrypt(EncryptArgs),
    /// Decrypt a ciphertext file with a private key
    Decrypt(DecryptArgs),
    /// Generate keys, encrypt a file and decrypt it again
    Roundtrip(RoundtripArgs),
}

#[derive(ValueEnum, Clone, Copy, Debug, PartialEq, Eq)]
pub enum ReportTarget {
    Console,
    Log,
    #[value(name = "none")]
    Silent,
}

impl ReportTarget {
    fn reporter(self) -> Box<dyn KeyReporter> {
        match self {
            ReportTarget::Console => Box::new(ConsoleReporter),
            ReportTarget::Log => Box::new(LogReporter),
            ReportTarget::Silent => Box::new(NoopReporter),
        }
    }
}

#[derive(Args, Debug)]
pub struct KeyOptions {
    /// Bit width b of each prime, 2^b <= p < 2^(b+1)
    #[arg(long, default_value_t = 64)]
    pub bits: u64,

    /// Miller-Rabin rounds per candidate
    #[arg(
        long,
        default_value_t = crate::rsa::prime::DEFAULT_MR_ROUNDS,
        value_parser = clap::value_parser!(u32).range(1..)
    )]
    pub rounds: u32,

    /// Keep q even when it equals p
    #[arg(long)]
    pub allow_equal_primes: bool,
}

impl KeyOptions {
    fn config(&self) -> KeyGenConfig {
        KeyGenConfig::default()
            .with_prime_bits(self.bits)
            .with_mr_rounds(self.rounds)
            .with_distinct_primes(!self.allow_equal_primes)
    }
}

#[derive(Args, Debug)]
pub struct BlockOptions {
    /// Count block units in characters or bytes
    #[arg(long, default_value = "chars")]
    pub chunk: ChunkMode,

    /// Transform blocks on a single thread
    #[arg(long)]
    pub sequential: bool,
}

impl BlockOptions {
    fn options(&self) -> CipherOptions {
        CipherOptions::default()
            .with_chunk_mode(self.chunk)
            .with_parallel(!self.sequential)
    }
}

#[derive(Args, Debug)]
pub struct KeygenArgs {
    #[command(flatten)]
    pub key: KeyOptions,

    /// Where primes and keys are reported while generating
    #[arg(long, value_enum, default_value_t = ReportTarget::Silent)]
    pub report: ReportTarget,
}

#[derive(Args, Debug)]
pub struct EncryptArgs {
    /// Public exponent (decimal)
    #[arg(short, long)]
    pub e: RsaBigInt,

    /// Modulus (decimal)
    #[arg(short, long)]
    pub n: RsaBigInt,

    /// Plaintext file
    #[arg(short, long)]
    pub input: PathBuf,

    /// Ciphertext file to write
    #[arg(short, long)]
    pub output: PathBuf,

    #[command(flatten)]
    pub block: BlockOptions,
}

#[derive(Args, Debug)]
pub struct DecryptArgs {
    /// Private exponent (decimal)
    #[arg(short, long)]
    pub d: RsaBigInt,

    /// Modulus (decimal)
    #[arg(short, long)]
    pub n: RsaBigInt,

    /// Ciphertext file
    #[arg(short, long)]
    pub input: PathBuf,

    /// Plaintext file to write
    #[arg(short, long)]
    pub output: PathBuf,

    #[command(flatten)]
    pub block: BlockOptions,
}

#[derive(Args, Debug)]
pub struct RoundtripArgs {
    /// Plaintext file
    #[arg(short, long, default_value = "RSA-test.txt")]
    pub input: PathBuf,

    /// Ciphertext file to write
    #[arg(short, long, default_value = "Encrypted-RSA.txt")]
    pub cipher: PathBuf,

    /// Decrypted file to write
    #[arg(short, long, default_value = "Decrypted-RSA.txt")]
    pub output: PathBuf,

    #[command(flatten)]
    pub key: KeyOptions,

    #[command(flatten)]
    pub block: BlockOptions,
}

fn print_keys(keypair: &RsaKeyPair) {
    println!("public: {} {}", keypair.public_key.e, keypair.public_key.n);
    println!("private: {} {}", keypair.private_key.d, keypair.private_key.n);
}

/// Execute one parsed command line
pub fn run(cli: Cli) -> anyhow::Result<()> {
    match cli.command {
        Command::Keygen(args) => {
            let reporter = args.report.reporter();
            let keypair = generate_keys(&args.key.config(), reporter.as_ref())
                .context("key generation failed")?;
            print_keys(&keypair);
        }
        Command::Encrypt(args) => {
            let public_key = RsaPublicKey::new(args.e, args.n);
            encrypt_file(&public_key, &args.input, &args.output, &args.block.options())
                .with_context(|| format!("failed to encrypt {}", args.input.display()))?;
        }
        Command::Decrypt(args) => {
            let private_key = RsaPrivateKey::new(args.d, args.n);
            decrypt_file(&private_key, &args.input, &args.output, &args.block.options())
                .with_context(|| format!("failed to decrypt {}", args.input.display()))?;
        }
        Command::Roundtrip(args) => {
            let keypair = generate_keys(&args.key.config(), &ConsoleReporter)
                .context("key generation failed")?;
            let options = args.block.options();

            encrypt_file(&keypair.public_key, &args.input, &args.cipher, &options)
                .with_context(|| format!("failed to encrypt {}", args.input.display()))?;
            decrypt_file(&keypair.private_key, &args.cipher, &args.output, &options)
                .with_context(|| format!("failed to decrypt {}", args.cipher.display()))?;

            println!("Encryption and decryption completed.");
        }
    }

    Ok(())
}
