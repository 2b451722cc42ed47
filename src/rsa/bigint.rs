// RSA Big Integer Operations
// Number theory on top of num-bigint: modular exponentiation, extended Euclid, inverses

use num_bigint::{BigInt, BigUint};
use num_integer::Integer;
use num_traits::{One, Signed, Zero};

use crate::error::{RsaError, RsaResult};

/// RSA Big Integer type alias
pub type RsaBigInt = BigUint;

/// Create a big integer from u64
pub fn from_u64(n: u64) -> RsaBigInt {
    RsaBigInt::from(n)
}

/// Create a big integer from bytes (big-endian)
pub fn from_bytes(bytes: &[u8]) -> RsaBigInt {
    RsaBigInt::from_bytes_be(bytes)
}

/// Modular exponentiation: base^exp mod modulus
///
/// Square-and-multiply over the exponent bits, least significant first.
/// Every product is reduced right away so operands never exceed modulus^2.
///
/// # Panics
///
/// Panics if `modulus` is zero.
pub fn mod_exp(base: &RsaBigInt, exp: &RsaBigInt, modulus: &RsaBigInt) -> RsaBigInt {
    if modulus.is_one() {
        return RsaBigInt::zero();
    }

    let mut result = RsaBigInt::one();
    let mut base = base % modulus;
    let mut exp = exp.clone();

    while !exp.is_zero() {
        if exp.is_odd() {
            result = (&result * &base) % modulus;
        }
        exp >>= 1;
        base = (&base * &base) % modulus;
    }

    result
}

/// Extended Euclidean Algorithm
///
/// Returns `(gcd, x, y)` such that `a*x + b*y = gcd(a, b)`.
/// `extended_gcd(0, b)` is `(b, 0, 1)`.
pub fn extended_gcd(a: &RsaBigInt, b: &RsaBigInt) -> (RsaBigInt, BigInt, BigInt) {
    if a.is_zero() {
        return (b.clone(), BigInt::zero(), BigInt::one());
    }

    let (mut old_r, mut r) = (BigInt::from(a.clone()), BigInt::from(b.clone()));
    let (mut old_x, mut x) = (BigInt::one(), BigInt::zero());
    let (mut old_y, mut y) = (BigInt::zero(), BigInt::one());

    while !r.is_zero() {
        let q = &old_r / &r;

        let next_r = &old_r - &q * &r;
        old_r = std::mem::replace(&mut r, next_r);

        let next_x = &old_x - &q * &x;
        old_x = std::mem::replace(&mut x, next_x);

        let next_y = &old_y - &q * &y;
        old_y = std::mem::replace(&mut y, next_y);
    }

    // old_r is a remainder of non-negative operands
    (old_r.magnitude().clone(), old_x, old_y)
}

/// Compute modular inverse: e^(-1) mod phi, in `[0, phi)`
pub fn mod_inverse(e: &RsaBigInt, phi: &RsaBigInt) -> RsaResult<RsaBigInt> {
    if phi.is_zero() {
        return Err(RsaError::InverseNotFound);
    }

    let (gcd, x, _) = extended_gcd(e, phi);
    if !gcd.is_one() {
        return Err(RsaError::InverseNotFound);
    }

    let phi = BigInt::from(phi.clone());
    let d = x.mod_floor(&phi);
    debug_assert!(!d.is_negative());
    Ok(d.magnitude().clone())
}

/// Greatest common divisor
pub fn gcd(a: &RsaBigInt, b: &RsaBigInt) -> RsaBigInt {
    a.gcd(b)
}
