//! Bucket selection strategies.

use core::num::NonZeroUsize;

/// Maps a key to one of `bucket_count` chains.
///
/// Implementations must be pure: the same key and bucket count always
/// yield the same index, and the index is strictly less than
/// `bucket_count`. The map checks the bound and panics on violation.
pub trait BucketHasher {
    fn bucket_of(&self, key: &str, bucket_count: NonZeroUsize) -> usize;
}

/// Sums the scalar value of every `char` in the key and reduces it
/// modulo the bucket count.
///
/// Order-insensitive: anagrams always share a bucket.
#[derive(Copy, Clone, Debug, Default, Eq, PartialEq)]
pub struct CharSum;

impl CharSum {
    /// The unreduced checksum. A `u128` cannot overflow for any string
    /// that fits in memory.
    #[inline]
    pub fn checksum(key: &str) -> u128 {
        key.chars().map(|c| u32::from(c) as u128).sum()
    }
}

impl BucketHasher for CharSum {
    #[inline]
    fn bucket_of(&self, key: &str, bucket_count: NonZeroUsize) -> usize {
        (Self::checksum(key) % bucket_count.get() as u128) as usize
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn n(v: usize) -> NonZeroUsize {
        NonZeroUsize::new(v).unwrap()
    }

    /// Invariant: the index is the code-point sum modulo the bucket count.
    #[test]
    fn char_sum_reduces_modulo_bucket_count() {
        // 'a' + 'b' + 'c' = 97 + 98 + 99 = 294
        assert_eq!(CharSum::checksum("abc"), 294);
        assert_eq!(CharSum.bucket_of("abc", n(42)), 294 % 42);
        assert_eq!(CharSum.bucket_of("abc", n(1000)), 294);
        assert_eq!(CharSum.bucket_of("", n(42)), 0);
    }

    /// Invariant: anagrams land in the same bucket for every bucket count.
    #[test]
    fn anagrams_share_a_bucket() {
        for count in [1, 2, 7, 42, 97, 1024] {
            let b = CharSum.bucket_of("abc", n(count));
            assert_eq!(CharSum.bucket_of("bca", n(count)), b);
            assert_eq!(CharSum.bucket_of("cab", n(count)), b);
        }
    }

    /// Invariant: non-ASCII keys sum scalar values, not UTF-8 bytes.
    #[test]
    fn sums_scalar_values_not_bytes() {
        // 'é' is U+00E9 (233) but two bytes in UTF-8.
        assert_eq!(CharSum::checksum("é"), 233);
        assert_eq!(CharSum::checksum("€"), 0x20AC);
        assert_eq!(CharSum.bucket_of("€", n(100)), 0x20AC % 100);
    }

    /// Invariant: the index is always strictly below the bucket count.
    #[test]
    fn index_in_range() {
        for count in 1..64 {
            for key in ["", "a", "name", "course", "location", "zzzzzzzz"] {
                assert!(CharSum.bucket_of(key, n(count)) < count);
            }
        }
    }
}
