//! Secret recovery by Lagrange interpolation at x = 0
//!
//! Purely algebraic: shares from different polynomials interpolate to a
//! wrong value without any error. Consistency has to be checked on the
//! shard records before calling [`recover`].

use std::collections::HashSet;

use num_bigint::{BigInt, BigUint};
use num_integer::Integer;
use num_traits::{One, Zero};

use crate::field::{mod_div, normalize};
use crate::polynomial::Share;
use crate::{Result, ShardkeepError};

fn product<I: IntoIterator<Item = BigInt>>(values: I) -> BigInt {
    values.into_iter().fold(BigInt::one(), |acc, v| acc * v)
}

/// Interpolate the polynomial through `points` and evaluate it at `x`.
///
/// The per-term divisions are carried over a common denominator so only
/// one division result needs the final reduction.
pub fn lagrange_interpolate(x: &BigInt, points: &[(BigInt, BigInt)], p: &BigInt) -> Result<BigUint> {
    let k = points.len();

    let mut nums = Vec::with_capacity(k);
    let mut dens = Vec::with_capacity(k);
    for (i, (cur, _)) in points.iter().enumerate() {
        let others = points
            .iter()
            .enumerate()
            .filter(|&(j, _)| j != i)
            .map(|(_, (o, _))| o);
        nums.push(product(others.clone().map(|o| x - o)));
        dens.push(product(others.map(|o| cur - o)));
    }

    let den = product(dens.iter().cloned());

    let mut num = BigInt::zero();
    for (i, (_, y)) in points.iter().enumerate() {
        let term = (&nums[i] * &den * y).mod_floor(p);
        num += mod_div(&term, &dens[i], p)?;
    }

    Ok(normalize(&mod_div(&num, &den, p)?, p))
}

/// Recover the constant term from at least `minimum` shares
pub fn recover(shares: &[Share], minimum: usize, prime: &BigUint) -> Result<BigUint> {
    if shares.len() < minimum || shares.is_empty() {
        return Err(ShardkeepError::InsufficientShares {
            required: minimum.max(1),
            supplied: shares.len(),
        });
    }

    let mut seen = HashSet::with_capacity(shares.len());
    for share in shares {
        if !seen.insert(share.index) {
            return Err(ShardkeepError::DuplicateIndex(share.index));
        }
    }

    let p = BigInt::from(prime.clone());
    let points: Vec<(BigInt, BigInt)> = shares
        .iter()
        .map(|s| (BigInt::from(s.index), BigInt::from(s.value.clone())))
        .collect();

    log::debug!(
        "interpolating from shares {:?}",
        shares.iter().map(|s| s.index).collect::<Vec<_>>()
    );
    lagrange_interpolate(&BigInt::zero(), &points, &p)
}
