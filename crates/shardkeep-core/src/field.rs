//! Prime field arithmetic for Shamir's Secret Sharing
//!
//! All share arithmetic happens modulo a Mersenne prime. Field elements are
//! carried as [`BigUint`]; the Euclidean algorithm and Lagrange interpolation
//! need signed intermediates, so those work on [`BigInt`].

use std::fmt;
use std::str::FromStr;

use num_bigint::{BigInt, BigUint};
use num_integer::Integer;
use num_traits::{One, Zero};
use serde::{Deserialize, Serialize};

use crate::{Result, ShardkeepError};

/// Named field moduli
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FieldModulus {
    /// 12th Mersenne prime, 2^127 - 1 (12-byte secrets)
    #[default]
    Mersenne127,
    /// 13th Mersenne prime, 2^521 - 1 (54-byte secrets)
    Mersenne521,
}

impl FieldModulus {
    /// Exponent `e` of the Mersenne prime 2^e - 1
    pub fn exponent(self) -> usize {
        match self {
            FieldModulus::Mersenne127 => 127,
            FieldModulus::Mersenne521 => 521,
        }
    }

    /// The prime itself
    pub fn prime(self) -> BigUint {
        mersenne_prime(self.exponent())
    }
}

impl fmt::Display for FieldModulus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FieldModulus::Mersenne127 => write!(f, "mersenne127"),
            FieldModulus::Mersenne521 => write!(f, "mersenne521"),
        }
    }
}

impl FromStr for FieldModulus {
    type Err = ShardkeepError;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_ascii_lowercase().as_str() {
            "mersenne127" | "m127" | "127" => Ok(FieldModulus::Mersenne127),
            "mersenne521" | "m521" | "521" => Ok(FieldModulus::Mersenne521),
            other => Err(ShardkeepError::InvalidModulus(other.to_string())),
        }
    }
}

/// 2^exponent - 1
pub fn mersenne_prime(exponent: usize) -> BigUint {
    (BigUint::one() << exponent) - BigUint::one()
}

/// Iterative extended Euclidean algorithm.
///
/// Returns `(x, y)` such that `a*x + b*y = gcd(a, b)`. Division is floored,
/// so for a positive `b` every remainder after the first step is
/// non-negative and the gcd comes out positive.
pub fn extended_gcd(a: &BigInt, b: &BigInt) -> (BigInt, BigInt) {
    let (mut a, mut b) = (a.clone(), b.clone());
    let (mut x, mut last_x) = (BigInt::zero(), BigInt::one());
    let (mut y, mut last_y) = (BigInt::one(), BigInt::zero());

    while !b.is_zero() {
        let (quot, rem) = a.div_mod_floor(&b);
        a = std::mem::replace(&mut b, rem);

        let next_x = &last_x - &quot * &x;
        last_x = std::mem::replace(&mut x, next_x);

        let next_y = &last_y - &quot * &y;
        last_y = std::mem::replace(&mut y, next_y);
    }

    (last_x, last_y)
}

/// Inverse of `den` modulo `p`.
///
/// The result is the raw Bezout coefficient and may be negative or exceed
/// `p`; callers reduce once at the end of their computation.
///
/// Fails with [`ShardkeepError::DivisionByZero`] when `den` is a multiple
/// of `p` or otherwise shares a factor with it.
pub fn mod_inverse(den: &BigInt, p: &BigInt) -> Result<BigInt> {
    if den.mod_floor(p).is_zero() {
        return Err(ShardkeepError::DivisionByZero);
    }

    let (inv, _) = extended_gcd(den, p);

    // gcd != 1 only happens with a composite modulus
    if !(den * &inv).mod_floor(p).is_one() {
        return Err(ShardkeepError::DivisionByZero);
    }

    Ok(inv)
}

/// `num / den` modulo `p`, left unreduced.
///
/// The result `r` satisfies `den * r ≡ num (mod p)`.
pub fn mod_div(num: &BigInt, den: &BigInt, p: &BigInt) -> Result<BigInt> {
    Ok(num * mod_inverse(den, p)?)
}

/// Reduce a signed value into `[0, p)`
pub fn normalize(value: &BigInt, p: &BigInt) -> BigUint {
    // mod_floor is already non-negative for positive p; the extra `+ p`
    // keeps the result well-defined for either sign convention
    let reduced = (value.mod_floor(p) + p).mod_floor(p);
    reduced.magnitude().clone()
}
