// Test intent: verifies the three search engines agree with each other and
// with the documented edge cases.
use proptest::prelude::*;
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use skit::memmem::{
    find_bmh, find_kmp, find_kmp_all, find_naive, Algorithm, FailureTable, Horspool, Kmp,
    MemmemError, Naive, SkipTable, SubstringSearch,
};

fn brute_force_all(haystack: &[u8], needle: &[u8]) -> Vec<usize> {
    if needle.is_empty() || needle.len() > haystack.len() {
        return Vec::new();
    }
    (0..=haystack.len() - needle.len())
        .filter(|&i| &haystack[i..i + needle.len()] == needle)
        .collect()
}

#[test]
fn foobar_scenario() {
    let haystack = b"foobarbarfoobar";
    let mut scratch = SkipTable::new();
    assert_eq!(find_naive(haystack, b"bar"), Some(3));
    assert_eq!(find_bmh(haystack, b"bar", None), Ok(Some(3)));
    assert_eq!(find_bmh(haystack, b"bar", Some(&mut scratch)), Ok(Some(3)));
    assert_eq!(find_kmp(haystack, b"bar"), Ok(Some(3)));
    assert_eq!(find_kmp_all(haystack, b"bar"), Ok(vec![3, 6, 12]));
}

#[test]
fn empty_needle_matches_at_zero() {
    for haystack in [&b""[..], b"a", b"foobar"] {
        assert_eq!(find_naive(haystack, b""), Some(0));
        assert_eq!(find_bmh(haystack, b"", None), Ok(Some(0)));
        assert_eq!(find_kmp(haystack, b""), Ok(Some(0)));
        assert!(find_kmp_all(haystack, b"").unwrap().is_empty());
    }
}

#[test]
fn needle_longer_than_haystack_never_matches() {
    assert_eq!(find_naive(b"abc", b"abcd"), None);
    assert_eq!(find_bmh(b"abc", b"abcd", None), Ok(None));
    assert_eq!(find_kmp(b"abc", b"abcd"), Ok(None));
    assert_eq!(find_kmp_all(b"abc", b"abcd"), Ok(vec![]));
}

#[test]
fn match_at_offset_zero_is_reported() {
    for algo in Algorithm::ALL {
        assert_eq!(algo.find(b"needle in haystack", b"needle"), Ok(Some(0)), "{}", algo);
    }
    assert_eq!(find_kmp_all(b"aXa", b"a"), Ok(vec![0, 2]));
}

#[test]
fn overlapping_matches() {
    assert_eq!(find_kmp_all(b"aaaaa", b"aaa"), Ok(vec![0, 1, 2]));
    assert_eq!(find_kmp_all(b"abababab", b"abab"), Ok(vec![0, 2, 4]));
    assert_eq!(Naive.find_all(b"aaaaa", b"aaa"), Ok(vec![0, 1, 2]));
    assert_eq!(Horspool::new().find_all(b"aaaaa", b"aaa"), Ok(vec![0, 1, 2]));
    assert_eq!(Kmp.find_all(b"aaaaa", b"aaa"), Ok(vec![0, 1, 2]));
}

#[test]
fn non_ascii_bytes() {
    let haystack = [0u8, 255, 128, 255, 128, 0];
    let needle = [255u8, 128];
    assert_eq!(find_bmh(&haystack, &needle, None), Ok(Some(1)));
    assert_eq!(find_kmp_all(&haystack, &needle), Ok(vec![1, 3]));
    assert_eq!(SkipTable::for_needle(&needle).skip(255), 1);
}

#[test]
fn random_small_alphabet_agreement() {
    let mut rng = StdRng::seed_from_u64(42);
    let mut scratch = SkipTable::new();
    for _ in 0..2000 {
        let hay_len = rng.gen_range(0..40);
        let needle_len = rng.gen_range(0..6);
        let haystack: Vec<u8> = (0..hay_len).map(|_| rng.gen_range(b'a'..b'd')).collect();
        let needle: Vec<u8> = (0..needle_len).map(|_| rng.gen_range(b'a'..b'd')).collect();

        let expected = find_naive(&haystack, &needle);
        assert_eq!(find_bmh(&haystack, &needle, None), Ok(expected));
        assert_eq!(find_bmh(&haystack, &needle, Some(&mut scratch)), Ok(expected));
        assert_eq!(find_kmp(&haystack, &needle), Ok(expected));
        assert_eq!(
            find_kmp_all(&haystack, &needle).unwrap(),
            brute_force_all(&haystack, &needle)
        );
    }
}

#[test]
fn failure_table_resume_state() {
    let table = FailureTable::new(b"abab").unwrap();
    assert_eq!(table.needle_len(), 4);
    assert_eq!(table.state(0), Some(-1));
    assert_eq!(table.state(4), Some(2));
    assert_eq!(table.state(5), None);
}

#[test]
fn error_is_std_error() {
    let err: Box<dyn std::error::Error> = Box::new(MemmemError::AllocationFailed);
    assert_eq!(err.to_string(), "failed to allocate search table");
}

proptest! {
    #[test]
    fn engines_agree(
        haystack in proptest::collection::vec(any::<u8>(), 0..128),
        needle in proptest::collection::vec(any::<u8>(), 0..8),
    ) {
        let expected = find_naive(&haystack, &needle);
        prop_assert_eq!(find_bmh(&haystack, &needle, None).unwrap(), expected);
        prop_assert_eq!(find_kmp(&haystack, &needle).unwrap(), expected);
        prop_assert_eq!(find_kmp_all(&haystack, &needle).unwrap(), brute_force_all(&haystack, &needle));
    }

    #[test]
    fn planted_needle_is_found(
        prefix in proptest::collection::vec(0u8..3, 0..32),
        needle in proptest::collection::vec(0u8..3, 1..6),
        suffix in proptest::collection::vec(0u8..3, 0..32),
    ) {
        let mut haystack = prefix.clone();
        haystack.extend_from_slice(&needle);
        haystack.extend_from_slice(&suffix);
        for algo in Algorithm::ALL {
            let found = algo.find(&haystack, &needle).unwrap();
            prop_assert!(found.is_some());
            prop_assert!(found.unwrap() <= prefix.len());
            let all = algo.find_all(&haystack, &needle).unwrap();
            prop_assert!(all.contains(&prefix.len()));
        }
    }
}
