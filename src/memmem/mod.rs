//! Substring search over byte slices.
//!
//! Three independent engines share the same contract:
//!
//! - an empty needle matches at offset `0` of any haystack;
//! - a needle longer than the haystack never matches;
//! - otherwise the offset of the first occurrence is returned.
//!
//! [`find_naive`] compares every window, [`find_bmh`] uses the
//! Boyer-Moore-Horspool skip table and [`find_kmp`] / [`find_kmp_all`] run
//! the Knuth-Morris-Pratt automaton. The [`SubstringSearch`] trait lets
//! callers pick an engine at runtime.

use alloc::vec::Vec;
use core::cell::RefCell;
use core::fmt;

mod horspool;
mod kmp;
mod naive;

pub use horspool::{find_bmh, SkipTable, SKIP_TABLE_LEN};
pub use kmp::{find_kmp, find_kmp_all, FailureTable};
pub use naive::find_naive;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MemmemError {
    /// A search table could not be allocated.
    AllocationFailed,
}

impl fmt::Display for MemmemError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            MemmemError::AllocationFailed => write!(f, "failed to allocate search table"),
        }
    }
}

#[cfg(feature = "std")]
impl std::error::Error for MemmemError {}

/// A substring search engine.
pub trait SubstringSearch {
    /// Offset of the first occurrence of `needle` in `haystack`.
    fn find(&self, haystack: &[u8], needle: &[u8]) -> Result<Option<usize>, MemmemError>;

    /// Offsets of every occurrence, overlapping ones included, in ascending
    /// order. Empty for an empty needle.
    fn find_all(&self, haystack: &[u8], needle: &[u8]) -> Result<Vec<usize>, MemmemError> {
        let mut found = Vec::new();
        if needle.is_empty() {
            return Ok(found);
        }
        let mut start = 0;
        while start < haystack.len() {
            match self.find(&haystack[start..], needle)? {
                Some(offset) => {
                    found
                        .try_reserve(1)
                        .map_err(|_| MemmemError::AllocationFailed)?;
                    found.push(start + offset);
                    start += offset + 1;
                }
                None => break,
            }
        }
        Ok(found)
    }
}

/// Sliding-window comparison at every offset.
#[derive(Debug, Clone, Copy, Default)]
pub struct Naive;

impl SubstringSearch for Naive {
    fn find(&self, haystack: &[u8], needle: &[u8]) -> Result<Option<usize>, MemmemError> {
        Ok(find_naive(haystack, needle))
    }
}

/// Boyer-Moore-Horspool with a skip table kept between calls.
///
/// Repeated searches refill the same table instead of allocating a new one.
#[derive(Debug, Default)]
pub struct Horspool {
    table: RefCell<SkipTable>,
}

impl Horspool {
    pub fn new() -> Self {
        Self::default()
    }
}

impl SubstringSearch for Horspool {
    fn find(&self, haystack: &[u8], needle: &[u8]) -> Result<Option<usize>, MemmemError> {
        let mut table = self.table.borrow_mut();
        find_bmh(haystack, needle, Some(&mut *table))
    }
}

/// Knuth-Morris-Pratt.
#[derive(Debug, Clone, Copy, Default)]
pub struct Kmp;

impl SubstringSearch for Kmp {
    fn find(&self, haystack: &[u8], needle: &[u8]) -> Result<Option<usize>, MemmemError> {
        find_kmp(haystack, needle)
    }

    fn find_all(&self, haystack: &[u8], needle: &[u8]) -> Result<Vec<usize>, MemmemError> {
        find_kmp_all(haystack, needle)
    }
}

/// Engine selector.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Algorithm {
    Naive,
    Horspool,
    Kmp,
}

impl Algorithm {
    pub const ALL: [Algorithm; 3] = [Algorithm::Naive, Algorithm::Horspool, Algorithm::Kmp];

    pub fn name(self) -> &'static str {
        match self {
            Algorithm::Naive => "naive",
            Algorithm::Horspool => "horspool",
            Algorithm::Kmp => "kmp",
        }
    }
}

impl fmt::Display for Algorithm {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl SubstringSearch for Algorithm {
    fn find(&self, haystack: &[u8], needle: &[u8]) -> Result<Option<usize>, MemmemError> {
        match self {
            Algorithm::Naive => Ok(find_naive(haystack, needle)),
            Algorithm::Horspool => find_bmh(haystack, needle, None),
            Algorithm::Kmp => find_kmp(haystack, needle),
        }
    }

    fn find_all(&self, haystack: &[u8], needle: &[u8]) -> Result<Vec<usize>, MemmemError> {
        match self {
            Algorithm::Kmp => find_kmp_all(haystack, needle),
            Algorithm::Naive => Naive.find_all(haystack, needle),
            Algorithm::Horspool => Horspool::new().find_all(haystack, needle),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use alloc::vec;

    const HAYSTACK: &[u8] = b"foobarbarfoobar";

    #[test]
    fn every_engine_finds_first_bar() {
        for algo in Algorithm::ALL {
            assert_eq!(algo.find(HAYSTACK, b"bar"), Ok(Some(3)), "{}", algo);
        }
        assert_eq!(Naive.find(HAYSTACK, b"bar"), Ok(Some(3)));
        assert_eq!(Horspool::new().find(HAYSTACK, b"bar"), Ok(Some(3)));
        assert_eq!(Kmp.find(HAYSTACK, b"bar"), Ok(Some(3)));
    }

    #[test]
    fn default_find_all_matches_kmp() {
        for needle in [&b"bar"[..], b"o", b"oo", b"foobar", b"zzz", b""] {
            let expected = find_kmp_all(HAYSTACK, needle).unwrap();
            for algo in Algorithm::ALL {
                assert_eq!(algo.find_all(HAYSTACK, needle).unwrap(), expected, "{}", algo);
            }
        }
        assert_eq!(Naive.find_all(b"aaaa", b"aa").unwrap(), vec![0, 1, 2]);
    }

    #[test]
    fn horspool_reuses_its_table() {
        let engine = Horspool::new();
        assert_eq!(engine.find(b"abcabc", b"cab"), Ok(Some(2)));
        assert_eq!(engine.find(b"xxyxx", b"y"), Ok(Some(2)));
        assert_eq!(engine.table.borrow().skip(b'x'), 1);
    }

    #[test]
    fn names() {
        use alloc::string::ToString;
        assert_eq!(Algorithm::Horspool.to_string(), "horspool");
        assert_eq!(
            MemmemError::AllocationFailed.to_string(),
            "failed to allocate search table"
        );
    }
}
