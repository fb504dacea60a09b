//! Secret <-> field element codec
//!
//! A text secret is turned into one field element by base64-encoding its
//! UTF-8 bytes and packing every base64 character into 7 bits, most
//! significant character first.
//!
//! Decoding goes the other way, but takes the bit width from the element's
//! minimal binary representation rather than from a known character count.
//! When the first base64 character is below 64 (`+`, `/`, `0`-`9`, `=`),
//! its leading zero bit is lost and the 7-bit chunks no longer line up.
//! Such secrets fail to decode with [`ShardkeepError::SecretDecode`]. This
//! matches the on-disk format of existing shard files and is kept as is.

use base64::engine::general_purpose::STANDARD;
use base64::Engine as _;
use num_bigint::BigUint;
use num_traits::Zero;

use crate::{Result, ShardkeepError};

/// Bits used for each base64 character
pub const BITS_PER_CHAR: usize = 7;

/// Encode a secret into a field element below `modulus`
pub fn encode(secret: &str, modulus: &BigUint) -> Result<BigUint> {
    let b64 = STANDARD.encode(secret.as_bytes());

    let mut element = BigUint::zero();
    for c in b64.bytes() {
        element <<= BITS_PER_CHAR;
        element += u32::from(c);
    }

    if &element >= modulus {
        return Err(ShardkeepError::SecretTooLarge {
            bytes: secret.len(),
            max_bytes: max_secret_bytes(modulus),
        });
    }

    log::debug!(
        "encoded {}-byte secret as {} base64 chars ({} bits)",
        secret.len(),
        b64.len(),
        element.bits()
    );
    Ok(element)
}

/// Decode a field element back into the secret text
pub fn decode(element: &BigUint) -> Result<String> {
    if element.is_zero() {
        return Ok(String::new());
    }

    let bits = element.to_str_radix(2);
    let b64: String = bits
        .as_bytes()
        .chunks(BITS_PER_CHAR)
        .map(|chunk| {
            chunk
                .iter()
                .fold(0u8, |acc, &bit| (acc << 1) | (bit - b'0')) as char
        })
        .collect();

    log::debug!(
        "decoding {}-bit element into {} base64 chars",
        bits.len(),
        b64.len()
    );

    let bytes = STANDARD
        .decode(b64.as_bytes())
        .map_err(|e| ShardkeepError::SecretDecode(format!("invalid base64: {}", e)))?;

    String::from_utf8(bytes)
        .map_err(|e| ShardkeepError::SecretDecode(format!("invalid UTF-8: {}", e)))
}

/// Largest secret length in bytes that always encodes below `modulus`.
///
/// Base64 emits whole quartets (3 bytes -> 4 chars -> 28 bits), and any
/// value with fewer bits than the modulus is smaller than it.
pub fn max_secret_bytes(modulus: &BigUint) -> usize {
    let usable_bits = modulus.bits().saturating_sub(1) as usize;
    (usable_bits / (4 * BITS_PER_CHAR)) * 3
}
