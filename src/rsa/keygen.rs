// RSA Key Generation
// Implements textbook RSA key pair generation (public and private keys)

use std::fmt;

use num_traits::One;
use rand::{thread_rng, Rng};

use super::bigint::{from_u64, gcd, mod_inverse, RsaBigInt};
use super::prime::{
    generate_prime_with_rng, random_prime_in_range, DEFAULT_MAX_ATTEMPTS, DEFAULT_MR_ROUNDS,
    MAX_PRIME_BITS,
};
use super::report::{KeyEvent, KeyReporter, NoopReporter};
use crate::error::{RsaError, RsaResult};

/// RSA Public Key
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RsaPublicKey {
    pub e: RsaBigInt, // Public exponent
    pub n: RsaBigInt, // Modulus
}

/// RSA Private Key
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RsaPrivateKey {
    pub d: RsaBigInt, // Private exponent
    pub n: RsaBigInt, // Modulus (same as public)
}

/// RSA Key Pair (both public and private keys)
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RsaKeyPair {
    pub public_key: RsaPublicKey,
    pub private_key: RsaPrivateKey,
}

impl RsaPublicKey {
    pub fn new(e: RsaBigInt, n: RsaBigInt) -> Self {
        Self { e, n }
    }

    /// Get the bit length of the modulus
    pub fn bit_length(&self) -> u64 {
        self.n.bits()
    }
}

impl RsaPrivateKey {
    pub fn new(d: RsaBigInt, n: RsaBigInt) -> Self {
        Self { d, n }
    }

    /// Get the bit length of the modulus
    pub fn bit_length(&self) -> u64 {
        self.n.bits()
    }
}

impl fmt::Display for RsaPublicKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "({}, {})", self.e, self.n)
    }
}

impl fmt::Display for RsaPrivateKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "({}, {})", self.d, self.n)
    }
}

impl RsaKeyPair {
    /// Build a key pair from known primes and public exponent
    pub fn from_primes(p: &RsaBigInt, q: &RsaBigInt, e: &RsaBigInt) -> RsaResult<Self> {
        let n = p * q;
        let phi = totient(p, q);
        let d = mod_inverse(e, &phi)?;

        Ok(Self {
            public_key: RsaPublicKey::new(e.clone(), n.clone()),
            private_key: RsaPrivateKey::new(d, n),
        })
    }

    /// Get the bit length of the modulus
    pub fn bit_length(&self) -> u64 {
        self.public_key.bit_length()
    }
}

/// Settings for key generation
#[derive(Clone, Debug)]
pub struct KeyGenConfig {
    /// Each prime lies in [2^prime_bits, 2^(prime_bits+1))
    pub prime_bits: u64,
    pub mr_rounds: u32,
    pub max_attempts: u32,
    /// Re-sample q until it differs from p
    pub distinct_primes: bool,
}

impl Default for KeyGenConfig {
    fn default() -> Self {
        Self {
            prime_bits: 64,
            mr_rounds: DEFAULT_MR_ROUNDS,
            max_attempts: DEFAULT_MAX_ATTEMPTS,
            distinct_primes: true,
        }
    }
}

impl KeyGenConfig {
    pub fn with_prime_bits(mut self, bits: u64) -> Self {
        self.prime_bits = bits;
        self
    }

    pub fn with_mr_rounds(mut self, rounds: u32) -> Self {
        self.mr_rounds = rounds;
        self
    }

    pub fn with_max_attempts(mut self, attempts: u32) -> Self {
        self.max_attempts = attempts;
        self
    }

    pub fn with_distinct_primes(mut self, distinct: bool) -> Self {
        self.distinct_primes = distinct;
        self
    }

    fn validate(&self) -> RsaResult<()> {
        // 2^2 <= p keeps phi >= 16 so [3, phi) always holds a prime
        if self.prime_bits < 2 {
            return Err(RsaError::InvalidConfig(format!(
                "prime_bits must be at least 2, got {}",
                self.prime_bits
            )));
        }
        if self.prime_bits > MAX_PRIME_BITS {
            return Err(RsaError::InvalidConfig(format!(
                "prime_bits must be at most {}, got {}",
                MAX_PRIME_BITS, self.prime_bits
            )));
        }
        // zero rounds would accept anything without a small factor
        if self.mr_rounds == 0 {
            return Err(RsaError::InvalidConfig(
                "mr_rounds must be positive".to_string(),
            ));
        }
        if self.max_attempts == 0 {
            return Err(RsaError::InvalidConfig(
                "max_attempts must be positive".to_string(),
            ));
        }
        Ok(())
    }
}

fn totient(p: &RsaBigInt, q: &RsaBigInt) -> RsaBigInt {
    (p - 1u8) * (q - 1u8)
}

/// Generate an RSA key pair with the given RNG
pub fn generate_keys_with_rng<R: Rng + ?Sized>(
    config: &KeyGenConfig,
    rng: &mut R,
    reporter: &dyn KeyReporter,
) -> RsaResult<RsaKeyPair> {
    config.validate()?;
    let bits = config.prime_bits;

    // Step 1: Generate two random primes p and q
    let p = generate_prime_with_rng(bits, config.mr_rounds, config.max_attempts, rng)?;
    let mut q = generate_prime_with_rng(bits, config.mr_rounds, config.max_attempts, rng)?;

    if config.distinct_primes {
        let mut attempts = 0;
        while q == p {
            attempts += 1;
            if attempts > config.max_attempts {
                return Err(RsaError::PrimeGenerationFailure {
                    bits,
                    attempts: config.max_attempts,
                });
            }
            log::debug!("q equals p, sampling q again");
            q = generate_prime_with_rng(bits, config.mr_rounds, config.max_attempts, rng)?;
        }
    }
    reporter.report(&KeyEvent::PrimesGenerated { p: &p, q: &q });

    // Step 2: n = p * q, φ(n) = (p-1)(q-1)
    let n = &p * &q;
    let phi = totient(&p, &q);

    // Step 3: prime e in [3, φ(n)) coprime to φ(n)
    let low = from_u64(3);
    let mut e = random_prime_in_range(&low, &phi, config.mr_rounds, config.max_attempts, rng)?;
    let mut attempts = 0;
    while !gcd(&e, &phi).is_one() {
        attempts += 1;
        if attempts > config.max_attempts {
            return Err(RsaError::PrimeGenerationFailure {
                bits: phi.bits(),
                attempts: config.max_attempts,
            });
        }
        e = random_prime_in_range(&low, &phi, config.mr_rounds, config.max_attempts, rng)?;
    }

    // Step 4: d = e^(-1) mod φ(n)
    let d = mod_inverse(&e, &phi)?;

    let keypair = RsaKeyPair {
        public_key: RsaPublicKey::new(e, n.clone()),
        private_key: RsaPrivateKey::new(d, n),
    };
    log::debug!(
        "generated {}-bit modulus from two {}-bit primes",
        keypair.bit_length(),
        bits + 1
    );
    reporter.report(&KeyEvent::KeysGenerated {
        public: &keypair.public_key,
        private: &keypair.private_key,
    });

    Ok(keypair)
}

/// Generate an RSA key pair using the thread-local RNG
pub fn generate_keys(config: &KeyGenConfig, reporter: &dyn KeyReporter) -> RsaResult<RsaKeyPair> {
    generate_keys_with_rng(config, &mut thread_rng(), reporter)
}

/// Generate an RSA key pair with default settings (64-bit primes, nothing reported)
pub fn generate_default_keys() -> RsaResult<RsaKeyPair> {
    generate_keys(&KeyGenConfig::default(), &NoopReporter)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::rsa::bigint::mod_exp;
    use num_bigint::RandBigInt;
    use rand::rngs::StdRng;
    use rand::SeedableRng;
    use std::cell::Cell;

    fn reporter_fn<F: Fn(&KeyEvent<'_>)>(f: F) -> F {
        f
    }

    #[test]
    fn test_textbook_keypair() {
        let keypair = RsaKeyPair::from_primes(&from_u64(61), &from_u64(53), &from_u64(17)).unwrap();
        assert_eq!(keypair.public_key, RsaPublicKey::new(from_u64(17), from_u64(3233)));
        assert_eq!(keypair.private_key, RsaPrivateKey::new(from_u64(2753), from_u64(3233)));

        let c = mod_exp(&from_u64(65), &keypair.public_key.e, &keypair.public_key.n);
        assert_eq!(c, from_u64(2790));
        let m = mod_exp(&c, &keypair.private_key.d, &keypair.private_key.n);
        assert_eq!(m, from_u64(65));
    }

    #[test]
    fn test_from_primes_not_coprime() {
        // φ = 60 * 52 = 3120 is divisible by 3
        let result = RsaKeyPair::from_primes(&from_u64(61), &from_u64(53), &from_u64(3));
        assert!(matches!(result, Err(RsaError::InverseNotFound)));
    }

    #[test]
    fn test_key_generation() {
        let keypair = generate_default_keys().unwrap();
        // product of two 65-bit numbers
        let bits = keypair.bit_length();
        assert!(bits == 129 || bits == 130);
        assert_eq!(keypair.public_key.n, keypair.private_key.n);
        assert!(keypair.public_key.e > from_u64(2));
        assert!(keypair.public_key.e < keypair.public_key.n);
    }

    #[test]
    fn test_key_consistency() {
        let mut rng = StdRng::seed_from_u64(42);
        let config = KeyGenConfig::default().with_prime_bits(32);
        let keypair = generate_keys_with_rng(&config, &mut rng, &NoopReporter).unwrap();
        let (public, private) = (&keypair.public_key, &keypair.private_key);

        for _ in 0..50 {
            let m = rng.gen_biguint_below(&public.n);
            let c = mod_exp(&m, &public.e, &public.n);
            assert_eq!(mod_exp(&c, &private.d, &private.n), m);
        }
    }

    #[test]
    fn test_small_keys() {
        let mut rng = StdRng::seed_from_u64(9);
        let config = KeyGenConfig::default().with_prime_bits(2);
        for _ in 0..20 {
            let keypair = generate_keys_with_rng(&config, &mut rng, &NoopReporter).unwrap();
            let n = &keypair.public_key.n;
            for m in 0..25u64 {
                let m = from_u64(m);
                let c = mod_exp(&m, &keypair.public_key.e, n);
                assert_eq!(mod_exp(&c, &keypair.private_key.d, n), m);
            }
        }
    }

    #[test]
    fn test_reporter_sees_primes_and_keys() {
        let mut rng = StdRng::seed_from_u64(1);
        let primes = Cell::new(0);
        let keys = Cell::new(0);
        let reporter = reporter_fn(|event| match event {
            KeyEvent::PrimesGenerated { .. } => primes.set(primes.get() + 1),
            KeyEvent::KeysGenerated { .. } => keys.set(keys.get() + 1),
        });

        generate_keys_with_rng(&KeyGenConfig::default(), &mut rng, &reporter).unwrap();
        assert_eq!((primes.get(), keys.get()), (1, 1));
    }

    #[test]
    fn test_distinct_primes() {
        let mut rng = StdRng::seed_from_u64(3);
        let config = KeyGenConfig::default().with_prime_bits(2);
        let seen = Cell::new(true);
        let reporter = reporter_fn(|event| {
            if let KeyEvent::PrimesGenerated { p, q } = event {
                seen.set(seen.get() && p != q);
            }
        });

        for _ in 0..20 {
            generate_keys_with_rng(&config, &mut rng, &reporter).unwrap();
        }
        assert!(seen.get());
    }

    #[test]
    fn test_invalid_config() {
        let config = KeyGenConfig::default().with_prime_bits(1);
        assert!(matches!(
            generate_keys(&config, &NoopReporter),
            Err(RsaError::InvalidConfig(_))
        ));

        let config = KeyGenConfig::default().with_max_attempts(0);
        assert!(matches!(
            generate_keys(&config, &NoopReporter),
            Err(RsaError::InvalidConfig(_))
        ));

        let config = KeyGenConfig::default().with_prime_bits(u64::MAX);
        assert!(matches!(
            generate_keys(&config, &NoopReporter),
            Err(RsaError::InvalidConfig(_))
        ));
    }

    #[test]
    fn test_zero_rounds_rejected() {
        let config = KeyGenConfig::default().with_prime_bits(16).with_mr_rounds(0);
        assert!(matches!(
            generate_keys(&config, &NoopReporter),
            Err(RsaError::InvalidConfig(_))
        ));
    }
}
