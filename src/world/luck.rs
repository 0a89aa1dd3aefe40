//! Deterministic "luck": a pure function from a key to a value in `[0, 1)`.
//!
//! World content is never stored for cells the player has not touched. It is
//! recomputed from the cell's coordinate whenever needed, so the output must be
//! identical across calls and process restarts. No seed, no global state.
//!
//! # Encoding
//!
//! Each key part is written as a type byte followed by its payload:
//! - `Int`: `0x01` then 8 little-endian bytes
//! - `Tag`: `0x02`, 8-byte little-endian length, then the UTF-8 bytes
//!
//! The bytes are folded with FNV-1a and finalised with the splitmix64 mixer.

use crate::world::GridCoord;

const FNV_OFFSET: u64 = 0xCBF2_9CE4_8422_2325;
const FNV_PRIME: u64 = 0x0000_0100_0000_01B3;

const TYPE_INT: u8 = 0x01;
const TYPE_TAG: u8 = 0x02;

/// One component of a luck key.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum KeyPart<'a> {
    /// An integer component, typically a coordinate axis.
    Int(i64),
    /// A textual tag distinguishing independent draws for the same coordinate.
    Tag(&'a str),
}

#[inline]
fn fold(mut hash: u64, bytes: &[u8]) -> u64 {
    for &b in bytes {
        hash ^= u64::from(b);
        hash = hash.wrapping_mul(FNV_PRIME);
    }
    hash
}

#[inline]
const fn mix(mut v: u64) -> u64 {
    v ^= v >> 30;
    v = v.wrapping_mul(0xBF58_476D_1CE4_E5B9);
    v ^= v >> 27;
    v = v.wrapping_mul(0x94D0_49BB_1331_11EB);
    v ^ (v >> 31)
}

/// Hash a key to a 64-bit value.
#[must_use]
pub fn luck_bits(key: &[KeyPart<'_>]) -> u64 {
    let mut hash = FNV_OFFSET;
    for part in key {
        match *part {
            KeyPart::Int(v) => {
                hash = fold(hash, &[TYPE_INT]);
                hash = fold(hash, &v.to_le_bytes());
            }
            KeyPart::Tag(tag) => {
                hash = fold(hash, &[TYPE_TAG]);
                hash = fold(hash, &(tag.len() as u64).to_le_bytes());
                hash = fold(hash, tag.as_bytes());
            }
        }
    }
    mix(hash)
}

/// Hash a key to a float in `[0, 1)`.
///
/// Uses the top 53 bits so every output is exactly representable and `1.0` is
/// never produced.
#[must_use]
#[allow(clippy::cast_precision_loss)]
pub fn luck(key: &[KeyPart<'_>]) -> f64 {
    const SCALE: f64 = 1.0 / (1u64 << 53) as f64;
    (luck_bits(key) >> 11) as f64 * SCALE
}

/// Luck for a cell, optionally specialised by a tag such as `"initialValue"`.
#[must_use]
pub fn cell_luck(coord: GridCoord, tag: Option<&str>) -> f64 {
    let x = KeyPart::Int(i64::from(coord.x));
    let y = KeyPart::Int(i64::from(coord.y));
    match tag {
        Some(tag) => luck(&[x, y, KeyPart::Tag(tag)]),
        None => luck(&[x, y]),
    }
}

/// Pick an index into a list of `len` candidates.
///
/// Returns 0 for an empty list; callers guard against that case.
#[must_use]
#[allow(
    clippy::cast_possible_truncation,
    clippy::cast_sign_loss,
    clippy::cast_precision_loss
)]
pub fn pick_index(roll: f64, len: usize) -> usize {
    if len == 0 {
        return 0;
    }
    ((roll * len as f64).floor() as usize).min(len - 1)
}
