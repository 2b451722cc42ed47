// Primality Testing and Prime Generation
// Miller-Rabin over random witnesses, bounded random search for primes

use num_bigint::RandBigInt;
use num_integer::Integer;
use num_traits::{One, Zero};
use rand::{thread_rng, Rng};

use super::bigint::{mod_exp, RsaBigInt};
use crate::error::{RsaError, RsaResult};

/// Miller-Rabin rounds; a composite survives each round with probability <= 1/4
pub const DEFAULT_MR_ROUNDS: u32 = 64;

/// Candidates drawn before a prime search gives up
pub const DEFAULT_MAX_ATTEMPTS: u32 = 10_000;

/// Widest prime the generator accepts
pub const MAX_PRIME_BITS: u64 = 8192;

const SMALL_PRIMES: [u32; 25] = [
    2, 3, 5, 7, 11, 13, 17, 19, 23, 29, 31, 37, 41, 43, 47, 53, 59, 61, 67, 71, 73, 79, 83, 89, 97,
];

/// Miller-Rabin primality test
/// Returns true if n is probably prime
pub fn is_probable_prime<R: Rng + ?Sized>(n: &RsaBigInt, rounds: u32, rng: &mut R) -> bool {
    if n < &RsaBigInt::from(2u8) {
        return false;
    }
    for &p in SMALL_PRIMES.iter() {
        let p = RsaBigInt::from(p);
        if n == &p {
            return true;
        }
        if (n % &p).is_zero() {
            return false;
        }
    }

    // Write n-1 as d * 2^s with d odd
    let n_minus_one = n - 1u8;
    let mut d = n_minus_one.clone();
    let mut s = 0u32;
    while d.is_even() {
        d >>= 1;
        s += 1;
    }

    let two = RsaBigInt::from(2u8);

    'witness: for _ in 0..rounds {
        // Random witness a in [2, n-2]
        let a = rng.gen_biguint_range(&two, &n_minus_one);
        let mut x = mod_exp(&a, &d, n);

        if x.is_one() || x == n_minus_one {
            continue;
        }

        for _ in 1..s {
            x = mod_exp(&x, &two, n);
            if x == n_minus_one {
                continue 'witness;
            }
        }

        return false;
    }

    true
}

fn search_prime<R: Rng + ?Sized>(
    low: &RsaBigInt,
    high: &RsaBigInt,
    rounds: u32,
    max_attempts: u32,
    rng: &mut R,
) -> Option<RsaBigInt> {
    if low >= high {
        return None;
    }

    let two = RsaBigInt::from(2u8);
    for _ in 0..max_attempts {
        let mut candidate = rng.gen_biguint_range(low, high);

        // Even candidates other than 2 move to the next odd number
        if candidate.is_even() && candidate != two {
            candidate += 1u8;
            if &candidate >= high {
                continue;
            }
        }

        if is_probable_prime(&candidate, rounds, rng) {
            return Some(candidate);
        }
    }

    None
}

/// Random prime p with `low <= p < high`
pub fn random_prime_in_range<R: Rng + ?Sized>(
    low: &RsaBigInt,
    high: &RsaBigInt,
    rounds: u32,
    max_attempts: u32,
    rng: &mut R,
) -> RsaResult<RsaBigInt> {
    search_prime(low, high, rounds, max_attempts, rng).ok_or(RsaError::PrimeGenerationFailure {
        bits: high.bits(),
        attempts: max_attempts,
    })
}

/// Random prime p with `2^bits <= p < 2^(bits+1)`, using the given RNG
pub fn generate_prime_with_rng<R: Rng + ?Sized>(
    bits: u64,
    rounds: u32,
    max_attempts: u32,
    rng: &mut R,
) -> RsaResult<RsaBigInt> {
    if bits == 0 || bits > MAX_PRIME_BITS {
        return Err(RsaError::InvalidConfig(format!(
            "prime bit width must be in 1..={}, got {}",
            MAX_PRIME_BITS, bits
        )));
    }

    let low = RsaBigInt::one() << bits;
    let high = RsaBigInt::one() << (bits + 1);

    search_prime(&low, &high, rounds, max_attempts, rng)
        .ok_or(RsaError::PrimeGenerationFailure { bits, attempts: max_attempts })
}

/// Random prime p with `2^bits <= p < 2^(bits+1)`
pub fn generate_prime(bits: u64) -> RsaResult<RsaBigInt> {
    generate_prime_with_rng(bits, DEFAULT_MR_ROUNDS, DEFAULT_MAX_ATTEMPTS, &mut thread_rng())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::rsa::bigint::from_u64;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    fn naive_is_prime(n: u64) -> bool {
        if n < 2 {
            return false;
        }
        let mut i = 2;
        while i * i <= n {
            if n % i == 0 {
                return false;
            }
            i += 1;
        }
        true
    }

    #[test]
    fn test_is_probable_prime() {
        let mut rng = StdRng::seed_from_u64(1);
        assert!(is_probable_prime(&from_u64(2), 5, &mut rng));
        assert!(is_probable_prime(&from_u64(3), 5, &mut rng));
        assert!(is_probable_prime(&from_u64(7), 5, &mut rng));
        assert!(!is_probable_prime(&from_u64(0), 5, &mut rng));
        assert!(!is_probable_prime(&from_u64(1), 5, &mut rng));
        assert!(!is_probable_prime(&from_u64(4), 5, &mut rng));
        assert!(!is_probable_prime(&from_u64(9), 5, &mut rng));
    }

    #[test]
    fn test_is_probable_prime_matches_trial_division() {
        let mut rng = StdRng::seed_from_u64(2);
        for n in 0..5000u64 {
            assert_eq!(
                is_probable_prime(&from_u64(n), DEFAULT_MR_ROUNDS, &mut rng),
                naive_is_prime(n),
                "n = {}",
                n
            );
        }
    }

    #[test]
    fn test_carmichael_numbers_rejected() {
        let mut rng = StdRng::seed_from_u64(3);
        for n in [561u64, 1105, 1729, 2465, 2821, 6601, 8911, 41041, 825265] {
            assert!(!is_probable_prime(&from_u64(n), DEFAULT_MR_ROUNDS, &mut rng));
        }
    }

    #[test]
    fn test_large_known_prime() {
        let mut rng = StdRng::seed_from_u64(4);
        // 2^61 - 1 and 2^89 - 1 are Mersenne primes
        let m61 = (RsaBigInt::one() << 61u32) - 1u8;
        let m89 = (RsaBigInt::one() << 89u32) - 1u8;
        assert!(is_probable_prime(&m61, DEFAULT_MR_ROUNDS, &mut rng));
        assert!(is_probable_prime(&m89, DEFAULT_MR_ROUNDS, &mut rng));
        assert!(!is_probable_prime(&(&m61 * &m89), DEFAULT_MR_ROUNDS, &mut rng));
    }

    #[test]
    fn test_generate_prime_range() {
        let mut rng = StdRng::seed_from_u64(5);
        for bits in [1u64, 2, 3, 8, 16, 64, 128] {
            let p = generate_prime_with_rng(bits, DEFAULT_MR_ROUNDS, DEFAULT_MAX_ATTEMPTS, &mut rng)
                .unwrap();
            assert!(p >= RsaBigInt::one() << bits);
            assert!(p < RsaBigInt::one() << (bits + 1));
            assert!(is_probable_prime(&p, DEFAULT_MR_ROUNDS, &mut rng));
        }
    }

    #[test]
    fn test_generate_prime_default_rng() {
        let p = generate_prime(64).unwrap();
        assert_eq!(p.bits(), 65);
    }

    #[test]
    fn test_generate_prime_zero_bits() {
        let result = generate_prime(0);
        assert!(matches!(result, Err(RsaError::InvalidConfig(_))));
    }

    #[test]
    fn test_generate_prime_too_wide() {
        for bits in [MAX_PRIME_BITS + 1, u64::MAX] {
            assert!(matches!(generate_prime(bits), Err(RsaError::InvalidConfig(_))));
        }
    }

    #[test]
    fn test_random_prime_in_range() {
        let mut rng = StdRng::seed_from_u64(6);
        for _ in 0..50 {
            let p = random_prime_in_range(&from_u64(3), &from_u64(100), 20, 1000, &mut rng).unwrap();
            assert!(p >= from_u64(3) && p < from_u64(100));
            assert!(naive_is_prime(p.try_into().unwrap()));
        }
    }

    #[test]
    fn test_random_prime_in_range_without_primes() {
        let mut rng = StdRng::seed_from_u64(7);
        // [24, 29) holds no prime
        let result = random_prime_in_range(&from_u64(24), &from_u64(29), 20, 100, &mut rng);
        assert!(matches!(
            result,
            Err(RsaError::PrimeGenerationFailure { attempts: 100, .. })
        ));

        let result = random_prime_in_range(&from_u64(10), &from_u64(10), 20, 100, &mut rng);
        assert!(result.is_err());
    }
}
