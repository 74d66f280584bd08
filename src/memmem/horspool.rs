use alloc::vec::Vec;

use super::MemmemError;

/// Number of entries in a skip table, one per byte value.
pub const SKIP_TABLE_LEN: usize = 256;

/// Boyer-Moore-Horspool skip distances indexed by byte value.
///
/// Passing one to [`find_bmh`] lets repeated searches run without touching
/// the heap.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SkipTable {
    skips: [usize; SKIP_TABLE_LEN],
}

impl Default for SkipTable {
    fn default() -> Self {
        Self::new()
    }
}

impl SkipTable {
    /// Zeroed table; call [`SkipTable::fill`] before using it.
    pub const fn new() -> Self {
        Self {
            skips: [0; SKIP_TABLE_LEN],
        }
    }

    pub fn for_needle(needle: &[u8]) -> Self {
        let mut table = Self::new();
        table.fill(needle);
        table
    }

    /// Overwrite the table with the skips for `needle`.
    pub fn fill(&mut self, needle: &[u8]) {
        fill_skips(&mut self.skips, needle);
    }

    /// Distance to advance when `byte` sits under the needle's last position.
    pub fn skip(&self, byte: u8) -> usize {
        self.skips[byte as usize]
    }

    pub fn as_slice(&self) -> &[usize] {
        &self.skips
    }
}

/// Every byte skips the full needle length, except bytes occurring before
/// the last position, which skip to their last such occurrence.
fn fill_skips(skips: &mut [usize], needle: &[u8]) {
    let len = needle.len();
    skips.fill(len);
    for (k, &byte) in needle.iter().enumerate().take(len.saturating_sub(1)) {
        skips[byte as usize] = len - 1 - k;
    }
}

fn scan(haystack: &[u8], needle: &[u8], skips: &[usize]) -> Option<usize> {
    let len = needle.len();
    let last = len - 1;
    let mut pos = 0;
    while haystack.len() - pos >= len {
        if &haystack[pos..pos + len] == needle {
            return Some(pos);
        }
        pos += skips[haystack[pos + last] as usize];
    }
    None
}

/// Offset of the first occurrence of `needle` in `haystack` using
/// Boyer-Moore-Horspool.
///
/// With `scratch` the skip table is built in the caller's buffer and no
/// allocation happens. Without it a temporary table is allocated and freed
/// before returning.
pub fn find_bmh(
    haystack: &[u8],
    needle: &[u8],
    scratch: Option<&mut SkipTable>,
) -> Result<Option<usize>, MemmemError> {
    if needle.is_empty() {
        return Ok(Some(0));
    }
    if needle.len() > haystack.len() {
        return Ok(None);
    }

    #[cfg(feature = "verbose-logging")]
    log::trace!(
        "horspool: needle_len={} haystack_len={} scratch={}",
        needle.len(),
        haystack.len(),
        scratch.is_some()
    );

    match scratch {
        Some(table) => {
            table.fill(needle);
            Ok(scan(haystack, needle, table.as_slice()))
        }
        None => {
            let mut skips = Vec::new();
            skips
                .try_reserve_exact(SKIP_TABLE_LEN)
                .map_err(|_| MemmemError::AllocationFailed)?;
            skips.resize(SKIP_TABLE_LEN, 0);
            fill_skips(&mut skips, needle);
            Ok(scan(haystack, needle, &skips))
        }
    }
}
