use alloc::vec::Vec;

use super::MemmemError;

fn try_states(len: usize) -> Result<Vec<isize>, MemmemError> {
    let cap = len.checked_add(1).ok_or(MemmemError::AllocationFailed)?;
    let mut states = Vec::new();
    states
        .try_reserve_exact(cap)
        .map_err(|_| MemmemError::AllocationFailed)?;
    Ok(states)
}

/// Knuth-Morris-Pratt failure table for one needle.
///
/// Holds `needle.len() + 1` states. `state(0)` is `-1`; a negative state
/// means "advance the haystack and restart the needle". The final entry is
/// the state to resume from after a complete match, which is what lets
/// [`find_kmp_all`] report overlapping occurrences.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FailureTable {
    states: Vec<isize>,
}

impl FailureTable {
    pub fn new(needle: &[u8]) -> Result<Self, MemmemError> {
        let len = needle.len();
        let mut states = try_states(len)?;
        states.resize(len + 1, 0);
        states[0] = -1;

        let mut i = 1;
        let mut j: isize = 0;
        while i < len {
            if needle[i] == needle[j as usize] {
                states[i] = states[j as usize];
            } else {
                states[i] = j;
                while j >= 0 && needle[i] != needle[j as usize] {
                    j = states[j as usize];
                }
            }
            i += 1;
            j += 1;
        }
        if len > 0 {
            states[len] = j;
        }

        #[cfg(feature = "verbose-logging")]
        log::trace!("kmp failure table: needle_len={} resume={}", len, states[len]);

        Ok(Self { states })
    }

    /// Length of the needle the table was built for.
    pub fn needle_len(&self) -> usize {
        self.states.len() - 1
    }

    /// State for needle position `j`, or `None` past `needle_len()`.
    pub fn state(&self, j: usize) -> Option<isize> {
        self.states.get(j).copied()
    }

    pub fn as_slice(&self) -> &[isize] {
        &self.states
    }

    /// Run the automaton over `haystack`, calling `on_match` with each match
    /// offset. Scanning stops as soon as `on_match` returns `false`.
    fn scan<F>(&self, haystack: &[u8], needle: &[u8], mut on_match: F) -> Result<(), MemmemError>
    where
        F: FnMut(usize) -> Result<bool, MemmemError>,
    {
        let len = needle.len();
        let mut i = 0;
        let mut j: isize = 0;
        while i < haystack.len() {
            if haystack[i] == needle[j as usize] {
                i += 1;
                j += 1;
                if j as usize == len {
                    if !on_match(i - len)? {
                        return Ok(());
                    }
                    j = self.states[len];
                }
            } else {
                j = self.states[j as usize];
                if j < 0 {
                    i += 1;
                    j += 1;
                }
            }
        }
        Ok(())
    }
}

/// Offset of the first occurrence of `needle` in `haystack` using
/// Knuth-Morris-Pratt.
pub fn find_kmp(haystack: &[u8], needle: &[u8]) -> Result<Option<usize>, MemmemError> {
    if needle.is_empty() {
        return Ok(Some(0));
    }
    if needle.len() > haystack.len() {
        return Ok(None);
    }
    let table = FailureTable::new(needle)?;
    let mut first = None;
    table.scan(haystack, needle, |offset| {
        first = Some(offset);
        Ok(false)
    })?;
    Ok(first)
}

/// Offsets of every occurrence of `needle` in `haystack`, overlapping ones
/// included, in ascending order.
///
/// Empty when there is no match, when either input is empty or when the
/// needle is longer than the haystack.
pub fn find_kmp_all(haystack: &[u8], needle: &[u8]) -> Result<Vec<usize>, MemmemError> {
    let mut offsets = Vec::new();
    if haystack.is_empty() || needle.is_empty() || needle.len() > haystack.len() {
        return Ok(offsets);
    }
    let table = FailureTable::new(needle)?;
    table.scan(haystack, needle, |offset| {
        offsets
            .try_reserve(1)
            .map_err(|_| MemmemError::AllocationFailed)?;
        offsets.push(offset);
        Ok(true)
    })?;
    Ok(offsets)
}
