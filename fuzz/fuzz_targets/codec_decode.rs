#![no_main]

use libfuzzer_sys::fuzz_target;
use num_bigint::BigUint;
use shardkeep_core::codec;

fuzz_target!(|data: &[u8]| {
    // Any field element handed back by interpolation must decode or error,
    // never panic.
    let element = BigUint::from_bytes_be(data);
    let _ = codec::decode(&element);

    // Printable input should survive encoding under the large modulus
    if let Ok(s) = std::str::from_utf8(data) {
        let modulus = shardkeep_core::FieldModulus::Mersenne521.prime();
        if let Ok(element) = codec::encode(s, &modulus) {
            let _ = codec::decode(&element);
        }
    }
});
