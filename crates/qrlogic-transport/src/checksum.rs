// SPDX-License-Identifier: Apache-2.0
// © James Ross Ω FLYING•ROBOTS <https://github.com/flyingrobots>
//! Per-chunk integrity tag.
//!
//! Algorithm (version [`CHECKSUM_VERSION`]), fixed on both ends of the wire:
//!
//! 1. `h: i32 = 0`
//! 2. for each UTF-16 code unit `u` of the input: `h = (h << 5) - h + u`
//!    with two's-complement wrapping (i.e. `h * 31 + u`)
//! 3. render `|h|` (computed without overflow, so `i32::MIN` maps to
//!    2147483648) in lowercase base36.
//!
//! Not cryptographic. It catches camera misreads, nothing more. Changing any
//! step requires bumping [`CHECKSUM_VERSION`].

/// Version of the checksum contract.
pub const CHECKSUM_VERSION: u32 = 1;

const DIGITS: &[u8; 36] = b"0123456789abcdefghijklmnopqrstuvwxyz";

/// Raw 32-bit rolling hash of `data`.
pub fn rolling_hash(data: &str) -> i32 {
    data.encode_utf16().fold(0i32, |h, unit| {
        h.wrapping_shl(5).wrapping_sub(h).wrapping_add(i32::from(unit))
    })
}

/// Base36 checksum token of `data`.
pub fn checksum(data: &str) -> String {
    to_base36(rolling_hash(data).unsigned_abs())
}

/// True when `token` is the checksum of `data`.
pub fn verify(data: &str, token: &str) -> bool {
    checksum(data) == token
}

fn to_base36(mut n: u32) -> String {
    if n == 0 {
        return "0".to_owned();
    }
    let mut buf = Vec::with_capacity(7);
    while n > 0 {
        buf.push(DIGITS[(n % 36) as usize]);
        n /= 36;
    }
    buf.reverse();
    String::from_utf8(buf).unwrap_or_default()
}

#[cfg(test)]
#[allow(clippy::expect_used, clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn empty_input_hashes_to_zero() {
        assert_eq!(rolling_hash(""), 0);
        assert_eq!(checksum(""), "0");
    }

    #[test]
    fn matches_reference_vectors() {
        // "a" = 97 -> "2p"; "abc" = 96354 -> "22ci"
        assert_eq!(rolling_hash("a"), 97);
        assert_eq!(checksum("a"), "2p");
        assert_eq!(rolling_hash("abc"), 96354);
        assert_eq!(checksum("abc"), "22ci");
    }

    #[test]
    fn wraps_like_a_32_bit_integer() {
        // "hello world".hashCode() in Java is 1794106052.
        assert_eq!(rolling_hash("hello world"), 1794106052);
        // Long inputs overflow repeatedly; result must still be deterministic.
        let long = "x".repeat(10_000);
        assert_eq!(checksum(&long), checksum(&long.clone()));
    }

    #[test]
    fn negative_hashes_use_their_magnitude() {
        let h = rolling_hash("polygenelubricants");
        assert_eq!(h, i32::MIN);
        assert_eq!(checksum("polygenelubricants"), to_base36(2_147_483_648));
    }

    #[test]
    fn order_sensitive() {
        assert_ne!(checksum("ab"), checksum("ba"));
    }

    #[test]
    fn counts_utf16_units_not_bytes() {
        // U+00E9 is one UTF-16 unit (233), two UTF-8 bytes.
        assert_eq!(rolling_hash("\u{e9}"), 233);
        // U+1F600 is a surrogate pair: 0xD83D, 0xDE00.
        assert_eq!(rolling_hash("\u{1F600}"), 0xD83D * 31 + 0xDE00);
    }

    #[test]
    fn verify_rejects_other_tokens() {
        let token = checksum("payload");
        assert!(verify("payload", &token));
        assert!(!verify("paylaod", &token));
        assert!(!verify("payload", "0"));
    }
}
