// Licensed to the Apache Software Foundation (ASF) under one
// or more contributor license agreements.  See the NOTICE file
// distributed with this work for additional information
// regarding copyright ownership.  The ASF licenses this file
// to you under the Apache License, Version 2.0 (the
// "License"); you may not use this file except in compliance
// with the License.  You may obtain a copy of the License at
//
//   http://www.apache.org/licenses/LICENSE-2.0
//
// Unless required by applicable law or agreed to in writing,
// software distributed under the License is distributed on an
// "AS IS" BASIS, WITHOUT WARRANTIES OR CONDITIONS OF ANY
// KIND, either express or implied.  See the License for the
// specific language governing permissions and limitations
// under the License.

//! Seeded hashing of single list elements.
//!
//! Values that the comparator can treat as equal must hash identically, so
//! floats go through [`float_key`] and nested values are folded from their
//! children in order.

use std::hash::BuildHasher;

use hashbrown::DefaultHashBuilder;

const GOLDEN_GAMMA: u64 = 0x9e37_79b9_7f4a_7c15;
const FNV_OFFSET: u64 = 0xcbf2_9ce4_8422_2325;
const FNV_PRIME: u64 = 0x0000_0100_0000_01b3;

/// Fresh seed for one kernel invocation. Both operands of a binary
/// operation share it so hashes from either side can probe the same table.
pub(crate) fn operation_seed() -> u64 {
    DefaultHashBuilder::default().hash_one(0u8)
}

/// Folds a child hash into a running hash; order sensitive.
pub(crate) fn fold(acc: u64, child: u64) -> u64 {
    let spread = child
        .wrapping_add(GOLDEN_GAMMA)
        .wrapping_add(acc << 6)
        .wrapping_add(acc >> 2);
    acc ^ spread
}

pub(crate) fn hash_word(seed: u64, word: u64) -> u64 {
    splitmix(seed ^ word)
}

pub(crate) fn hash_wide(seed: u64, value: i128) -> u64 {
    let bits = value as u128;
    fold(hash_word(seed, bits as u64), hash_word(seed, (bits >> 64) as u64))
}

pub(crate) fn hash_bytes(seed: u64, bytes: &[u8]) -> u64 {
    let body = bytes
        .iter()
        .fold(seed ^ FNV_OFFSET, |h, b| (h ^ u64::from(*b)).wrapping_mul(FNV_PRIME));
    // length terminator keeps "ab"+"c" apart from "a"+"bc" inside lists
    hash_word(body, bytes.len() as u64)
}

pub(crate) fn hash_null(seed: u64) -> u64 {
    hash_word(seed, GOLDEN_GAMMA)
}

/// Bits that are equal for every pair of floats the comparator may treat
/// as equal: all NaNs fold to one pattern and `-0.0` folds to `+0.0`.
pub(crate) fn float_key(value: f64) -> u64 {
    match value {
        v if v.is_nan() => f64::NAN.to_bits(),
        v if v == 0.0 => 0,
        v => v.to_bits(),
    }
}

fn splitmix(mut z: u64) -> u64 {
    z = z.wrapping_add(GOLDEN_GAMMA);
    z = (z ^ (z >> 30)).wrapping_mul(0xbf58_476d_1ce4_e5b9);
    z = (z ^ (z >> 27)).wrapping_mul(0x94d0_49bb_1331_11eb);
    z ^ (z >> 31)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn signed_zero_and_nan_payloads_fold() {
        assert_eq!(float_key(-0.0), float_key(0.0));
        let negative_nan = -f64::NAN;
        let payload_nan = f64::from_bits(0x7ff8_0000_0000_0001);
        assert_eq!(float_key(negative_nan), float_key(f64::NAN));
        assert_eq!(float_key(payload_nan), float_key(f64::NAN));
        assert_ne!(float_key(1.0), float_key(-1.0));
    }

    #[test]
    fn byte_hash_depends_on_length() {
        let seed = 7;
        assert_ne!(hash_bytes(seed, b""), hash_bytes(seed, b"\0"));
        assert_eq!(hash_bytes(seed, b"abc"), hash_bytes(seed, b"abc"));
    }

    #[test]
    fn wide_hash_uses_both_halves() {
        let seed = 11;
        assert_ne!(hash_wide(seed, 1), hash_wide(seed, 1 + (1i128 << 64)));
    }

    #[test]
    fn fold_is_order_sensitive() {
        let (a, b) = (hash_word(3, 1), hash_word(3, 2));
        assert_ne!(fold(fold(0, a), b), fold(fold(0, b), a));
    }
}
