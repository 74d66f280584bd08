/// Offset of the first occurrence of `needle` in `haystack`, comparing the
/// needle against every window.
pub fn find_naive(haystack: &[u8], needle: &[u8]) -> Option<usize> {
    if needle.is_empty() {
        return Some(0);
    }
    if needle.len() > haystack.len() {
        return None;
    }
    haystack.windows(needle.len()).position(|window| window == needle)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn degenerate_inputs() {
        assert_eq!(find_naive(b"", b""), Some(0));
        assert_eq!(find_naive(b"abc", b""), Some(0));
        assert_eq!(find_naive(b"", b"a"), None);
        assert_eq!(find_naive(b"ab", b"abc"), None);
    }

    #[test]
    fn first_occurrence() {
        assert_eq!(find_naive(b"foobarbarfoobar", b"bar"), Some(3));
        assert_eq!(find_naive(b"foobarbarfoobar", b"foo"), Some(0));
        assert_eq!(find_naive(b"foobarbarfoobar", b"rfo"), Some(8));
        assert_eq!(find_naive(b"foobarbarfoobar", b"baz"), None);
        assert_eq!(find_naive(b"abc", b"abc"), Some(0));
    }
}
