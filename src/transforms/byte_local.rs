//! Byte maps for the byte-local transform families.
//!
//! A byte-local transform maps each input byte independently of its
//! position, so the whole transform is expressible as a 256-entry
//! translation table. The functions here compute one output byte; table
//! synthesis and application live in the parent module.

use crate::types::Direction;

/// Rotate a byte left by `count` bits (modulo 8).
pub fn rol(byte: u8, count: u8) -> u8 {
    byte.rotate_left(u32::from(count) % 8)
}

/// Decode/encode one byte for the rotate-left family.
pub fn rol_byte(byte: u8, count: u8, direction: Direction) -> u8 {
    match direction {
        Direction::Decode => rol(byte, count),
        Direction::Encode => rol(byte, 8 - count),
    }
}

/// XOR is its own inverse, so the direction is irrelevant.
pub fn xor_byte(byte: u8, key: u8, _direction: Direction) -> u8 {
    byte ^ key
}

/// Decode adds the key with wrap-around; encode subtracts it.
pub fn add_byte(byte: u8, key: u8, direction: Direction) -> u8 {
    match direction {
        Direction::Decode => byte.wrapping_add(key),
        Direction::Encode => byte.wrapping_sub(key),
    }
}

/// XOR with `key` then rotate left by `count`.
pub fn xor_rol_byte(byte: u8, key: u8, count: u8, direction: Direction) -> u8 {
    match direction {
        Direction::Decode => rol(byte ^ key, count),
        Direction::Encode => rol(byte, 8 - count) ^ key,
    }
}

/// Add `key` then rotate left by `count`.
pub fn add_rol_byte(byte: u8, key: u8, count: u8, direction: Direction) -> u8 {
    match direction {
        Direction::Decode => rol(byte.wrapping_add(key), count),
        Direction::Encode => rol(byte, 8 - count).wrapping_sub(key),
    }
}

/// Rotate left by `count` then add `key`.
pub fn rol_add_byte(byte: u8, count: u8, key: u8, direction: Direction) -> u8 {
    match direction {
        Direction::Decode => rol(byte, count).wrapping_add(key),
        Direction::Encode => rol(byte.wrapping_sub(key), 8 - count),
    }
}

/// XOR with `key1` then add `key2`.
pub fn xor_add_byte(byte: u8, key1: u8, key2: u8, direction: Direction) -> u8 {
    match direction {
        Direction::Decode => (byte ^ key1).wrapping_add(key2),
        Direction::Encode => byte.wrapping_sub(key2) ^ key1,
    }
}

/// Add `key1` then XOR with `key2`.
pub fn add_xor_byte(byte: u8, key1: u8, key2: u8, direction: Direction) -> u8 {
    match direction {
        Direction::Decode => byte.wrapping_add(key1) ^ key2,
        Direction::Encode => (byte ^ key2).wrapping_sub(key1),
    }
}

/// The Outlook PST permutative decoding table (MS-PST mpbbCrypt).
///
/// Only the decode half of the published table is embedded; the encode
/// table is its inverse permutation, computed on demand.
pub const PST_DECODE: [u8; 256] = [
    65, 54, 19, 98, 168, 33, 110, 187, //
    244, 22, 204, 4, 127, 100, 232, 93, //
    30, 242, 203, 42, 116, 197, 94, 53, //
    210, 149, 71, 158, 150, 45, 154, 136, //
    76, 125, 132, 63, 219, 172, 49, 182, //
    72, 95, 246, 196, 216, 57, 139, 231, //
    35, 59, 56, 142, 200, 193, 223, 37, //
    177, 32, 165, 70, 96, 78, 156, 251, //
    170, 211, 86, 81, 69, 124, 85, 0, //
    7, 201, 43, 157, 133, 155, 9, 160, //
    143, 173, 179, 15, 99, 171, 137, 75, //
    215, 167, 21, 90, 113, 102, 66, 191, //
    38, 74, 107, 152, 250, 234, 119, 83, //
    178, 112, 5, 44, 253, 89, 58, 134, //
    126, 206, 6, 235, 130, 120, 87, 199, //
    141, 67, 175, 180, 28, 212, 91, 205, //
    226, 233, 39, 79, 195, 8, 114, 128, //
    207, 176, 239, 245, 40, 109, 190, 48, //
    77, 52, 146, 213, 14, 60, 34, 50, //
    229, 228, 249, 159, 194, 209, 10, 129, //
    18, 225, 238, 145, 131, 118, 227, 151, //
    230, 97, 138, 23, 121, 164, 183, 220, //
    144, 122, 92, 140, 2, 166, 202, 105, //
    222, 80, 26, 17, 147, 185, 82, 135, //
    88, 252, 237, 29, 55, 73, 27, 106, //
    224, 41, 51, 153, 189, 108, 217, 148, //
    243, 64, 84, 111, 240, 198, 115, 184, //
    214, 62, 101, 24, 68, 31, 221, 103, //
    16, 241, 12, 25, 236, 174, 3, 161, //
    20, 123, 169, 11, 255, 248, 163, 192, //
    162, 1, 247, 46, 188, 36, 104, 117, //
    13, 254, 186, 47, 181, 208, 218, 61, //
];

/// The inverse of [`PST_DECODE`].
pub fn pst_encode_table() -> [u8; 256] {
    let mut inverse = [0u8; 256];
    for (i, &out) in PST_DECODE.iter().enumerate() {
        inverse[out as usize] = i as u8;
    }
    inverse
}

/// Decode/encode one byte through the PST substitution table.
pub fn pst_byte(byte: u8, direction: Direction) -> u8 {
    match direction {
        Direction::Decode => PST_DECODE[byte as usize],
        Direction::Encode => pst_encode_table()[byte as usize],
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_rol_zero_is_identity() {
        for b in 0..=255u8 {
            assert_eq!(rol(b, 0), b);
            assert_eq!(rol(b, 8), b);
        }
    }

    #[test]
    fn test_rol_round_trip() {
        for b in 0..=255u8 {
            for r in 0..=7u8 {
                assert_eq!(rol(rol(b, r), 8 - r), b);
            }
        }
    }

    #[test]
    fn test_rol_known_value() {
        // 0b0000_0001 rotated left by 3 is 0b0000_1000
        assert_eq!(rol(0x01, 3), 0x08);
        // the high bit wraps around
        assert_eq!(rol(0x80, 1), 0x01);
    }

    #[test]
    fn test_add_wraps() {
        assert_eq!(add_byte(0xFF, 1, Direction::Decode), 0);
        assert_eq!(add_byte(0, 1, Direction::Encode), 0xFF);
    }

    #[test]
    fn test_add_128_equals_xor_128() {
        // the classic collision: +128 and ^128 are the same byte map
        for b in 0..=255u8 {
            assert_eq!(
                add_byte(b, 0x80, Direction::Decode),
                xor_byte(b, 0x80, Direction::Decode)
            );
        }
    }

    #[test]
    fn test_pst_table_is_permutation() {
        let mut seen = [false; 256];
        for &v in PST_DECODE.iter() {
            assert!(!seen[v as usize], "duplicate value {v}");
            seen[v as usize] = true;
        }
    }

    #[test]
    fn test_pst_round_trip() {
        for b in 0..=255u8 {
            let enc = pst_byte(b, Direction::Encode);
            assert_eq!(pst_byte(enc, Direction::Decode), b);
        }
    }
}
