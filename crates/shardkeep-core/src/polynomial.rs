//! Share generation
//!
//! The secret becomes the constant term of a random polynomial of degree
//! `minimum - 1`; share `i` is that polynomial evaluated at `x = i`.

use num_bigint::{BigUint, RandBigInt};
use num_traits::Zero;
use rand::{CryptoRng, RngCore};

use crate::{Result, ShardkeepError, MIN_THRESHOLD};

/// One point on the secret polynomial
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Share {
    /// x-coordinate (1..=N, never 0)
    pub index: u32,
    /// y-coordinate, in [0, P)
    pub value: BigUint,
}

/// Evaluate a polynomial at `x` using Horner's method.
///
/// `coefficients[0]` is the constant term. The accumulator is reduced
/// modulo `prime` after every step.
pub fn eval_at(coefficients: &[BigUint], x: u32, prime: &BigUint) -> BigUint {
    let mut accum = BigUint::zero();
    for coeff in coefficients.iter().rev() {
        accum *= x;
        accum += coeff;
        accum %= prime;
    }
    accum
}

/// Build a random polynomial around `secret` and evaluate it at 1..=total.
///
/// Each of the `minimum - 1` non-constant coefficients is drawn uniformly
/// from [0, prime) with its own call to `rng`. The polynomial is dropped
/// before returning.
pub fn generate<R>(
    rng: &mut R,
    secret: &BigUint,
    minimum: u32,
    total: u32,
    prime: &BigUint,
) -> Result<Vec<Share>>
where
    R: RngCore + CryptoRng,
{
    if minimum > total {
        return Err(ShardkeepError::PoolConfig { minimum, total });
    }
    if minimum < MIN_THRESHOLD {
        return Err(ShardkeepError::InvalidThreshold(minimum));
    }
    if secret >= prime {
        return Err(ShardkeepError::InvalidShare(
            "secret element is not below the field modulus".into(),
        ));
    }

    let mut poly = Vec::with_capacity(minimum as usize);
    poly.push(secret.clone());
    for _ in 1..minimum {
        poly.push(rng.gen_biguint_below(prime));
    }

    let shares = (1..=total)
        .map(|i| Share {
            index: i,
            value: eval_at(&poly, i, prime),
        })
        .collect();

    log::debug!(
        "evaluated degree-{} polynomial at {} points",
        minimum - 1,
        total
    );
    Ok(shares)
}
