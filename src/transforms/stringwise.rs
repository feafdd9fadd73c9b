//! Whole-buffer transforms.
//!
//! Stringwise transforms produce output bytes that depend on position or
//! on neighbouring bytes, so they cannot be expressed as a translation
//! table. Each function is total, pure, and length-preserving.

use super::byte_local::rol;
use crate::types::Direction;

/// Return the data unchanged.
pub fn identity(data: &[u8], _direction: Direction) -> Vec<u8> {
    data.to_vec()
}

/// XOR with a key that increments after each byte. Self-inverse.
pub fn xor_inc(data: &[u8], key: u8, _direction: Direction) -> Vec<u8> {
    data.iter()
        .enumerate()
        .map(|(i, &b)| b ^ key.wrapping_add(i as u8))
        .collect()
}

/// XOR with a key that decrements after each byte. Self-inverse.
pub fn xor_dec(data: &[u8], key: u8, _direction: Direction) -> Vec<u8> {
    data.iter()
        .enumerate()
        .map(|(i, &b)| b ^ key.wrapping_add(0xFF).wrapping_sub(i as u8))
        .collect()
}

/// Subtract a key that increments after each byte; encode adds it back.
pub fn sub_inc(data: &[u8], key: u8, direction: Direction) -> Vec<u8> {
    data.iter()
        .enumerate()
        .map(|(i, &b)| {
            let k = key.wrapping_add(i as u8);
            match direction {
                Direction::Decode => b.wrapping_sub(k),
                Direction::Encode => b.wrapping_add(k),
            }
        })
        .collect()
}

/// XOR with a key, chained with the previous byte.
///
/// Decoding XORs each byte with the key and its left neighbour in the
/// input; encoding chains over the already-produced output instead so the
/// two compose to the identity.
pub fn xor_lchained(data: &[u8], key: u8, direction: Direction) -> Vec<u8> {
    let mut result = Vec::with_capacity(data.len());
    if data.is_empty() {
        return result;
    }
    match direction {
        Direction::Decode => {
            result.push(data[0] ^ key);
            for i in 1..data.len() {
                result.push(data[i] ^ key ^ data[i - 1]);
            }
        }
        Direction::Encode => {
            result.push(data[0] ^ key);
            for i in 1..data.len() {
                let prev = result[i - 1];
                result.push(data[i] ^ key ^ prev);
            }
        }
    }
    result
}

/// XOR with a key, chained with the next byte.
pub fn xor_rchained(data: &[u8], key: u8, direction: Direction) -> Vec<u8> {
    let n = data.len();
    if n == 0 {
        return Vec::new();
    }
    match direction {
        Direction::Decode => {
            let mut result = Vec::with_capacity(n);
            for i in 0..n - 1 {
                result.push(data[i] ^ key ^ data[i + 1]);
            }
            result.push(data[n - 1] ^ key);
            result
        }
        Direction::Encode => {
            let mut result = vec![0u8; n];
            result[n - 1] = data[n - 1] ^ key;
            for i in (0..n - 1).rev() {
                result[i] = data[i] ^ key ^ result[i + 1];
            }
            result
        }
    }
}

/// XOR with an incrementing key, then rotate left.
pub fn xor_inc_rol(data: &[u8], key: u8, count: u8, direction: Direction) -> Vec<u8> {
    data.iter()
        .enumerate()
        .map(|(i, &b)| {
            let k = key.wrapping_add(i as u8);
            match direction {
                Direction::Decode => rol(b ^ k, count),
                Direction::Encode => rol(b, 8 - count) ^ k,
            }
        })
        .collect()
}

/// XOR each byte with the key and every byte to its right.
///
/// Decoding walks `i` from `n-1` down to 2 writing `out[i-1]`, then sets
/// the final byte; index 0 is never written and stays zero. Encoding is
/// the natural right-fold chain, which consequently round-trips only at
/// indices >= 1.
pub fn xor_rchained_all(data: &[u8], key: u8, direction: Direction) -> Vec<u8> {
    let n = data.len();
    if n == 0 {
        return Vec::new();
    }
    match direction {
        Direction::Decode => {
            let mut result = vec![0u8; n];
            let mut i = n - 1;
            while i >= 2 {
                result[i - 1] = data[i - 1] ^ key ^ data[i];
                i -= 1;
            }
            result[n - 1] = data[n - 1] ^ key;
            result
        }
        Direction::Encode => {
            let mut result = vec![0u8; n];
            result[n - 1] = data[n - 1] ^ key;
            for i in (0..n - 1).rev() {
                result[i] = data[i] ^ key ^ result[i + 1];
            }
            result
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    const SAMPLE: &[u8] = b"The quick brown fox jumps over the lazy dog";

    #[test]
    fn test_identity() {
        assert_eq!(identity(SAMPLE, Direction::Decode), SAMPLE);
    }

    #[test]
    fn test_xor_inc_round_trip() {
        for key in [0u8, 1, 0x5A, 0xFF] {
            let enc = xor_inc(SAMPLE, key, Direction::Encode);
            assert_eq!(xor_inc(&enc, key, Direction::Decode), SAMPLE);
        }
    }

    #[test]
    fn test_xor_dec_round_trip() {
        let enc = xor_dec(SAMPLE, 0x13, Direction::Encode);
        assert_eq!(xor_dec(&enc, 0x13, Direction::Decode), SAMPLE);
    }

    #[test]
    fn test_sub_inc_round_trip() {
        let enc = sub_inc(SAMPLE, 0xFE, Direction::Encode);
        assert_eq!(sub_inc(&enc, 0xFE, Direction::Decode), SAMPLE);
    }

    #[test]
    fn test_sub_inc_wraps() {
        // 0x00 minus key 0x01 wraps to 0xFF
        assert_eq!(sub_inc(&[0x00], 0x01, Direction::Decode), vec![0xFF]);
    }

    #[test]
    fn test_xor_lchained_round_trip() {
        let enc = xor_lchained(SAMPLE, 0x42, Direction::Encode);
        assert_eq!(xor_lchained(&enc, 0x42, Direction::Decode), SAMPLE);
    }

    #[test]
    fn test_xor_rchained_round_trip() {
        let enc = xor_rchained(SAMPLE, 0x42, Direction::Encode);
        assert_eq!(xor_rchained(&enc, 0x42, Direction::Decode), SAMPLE);
    }

    #[test]
    fn test_xor_inc_rol_round_trip() {
        for r in 1..=7u8 {
            let enc = xor_inc_rol(SAMPLE, 0x21, r, Direction::Encode);
            assert_eq!(xor_inc_rol(&enc, 0x21, r, Direction::Decode), SAMPLE);
        }
    }

    #[test]
    fn test_xor_rchained_all_index_zero_quirk() {
        // The decode loop never writes index 0.
        let data = [0x11u8, 0x22, 0x33, 0x44];
        let key = 0x55;
        let out = xor_rchained_all(&data, key, Direction::Decode);
        assert_eq!(out[0], 0);
        assert_eq!(out[1], data[1] ^ key ^ data[2]);
        assert_eq!(out[2], data[2] ^ key ^ data[3]);
        assert_eq!(out[3], data[3] ^ key);
    }

    #[test]
    fn test_xor_rchained_all_round_trips_after_index_zero() {
        let enc = xor_rchained_all(SAMPLE, 0x7C, Direction::Encode);
        let dec = xor_rchained_all(&enc, 0x7C, Direction::Decode);
        assert_eq!(&dec[1..], &SAMPLE[1..]);
        assert_eq!(dec[0], 0);
    }

    #[test]
    fn test_length_preserved() {
        for len in [0usize, 1, 2, 3, 64] {
            let data = vec![0xA5u8; len];
            assert_eq!(identity(&data, Direction::Decode).len(), len);
            assert_eq!(xor_inc(&data, 9, Direction::Decode).len(), len);
            assert_eq!(xor_dec(&data, 9, Direction::Decode).len(), len);
            assert_eq!(sub_inc(&data, 9, Direction::Decode).len(), len);
            assert_eq!(xor_lchained(&data, 9, Direction::Decode).len(), len);
            assert_eq!(xor_rchained(&data, 9, Direction::Decode).len(), len);
            assert_eq!(xor_inc_rol(&data, 9, 3, Direction::Decode).len(), len);
            assert_eq!(xor_rchained_all(&data, 9, Direction::Decode).len(), len);
        }
    }
}
