//! # skit - small signal and search kernels
//!
//! Two independent engines with no shared state:
//!
//! - **FFT**: [`fft::FftPlan`] precomputes the bit-reversal permutation and
//!   cosine/sine tables for one power-of-two length and then transforms
//!   caller-owned real/imaginary buffers in place. [`fft::FftPlanner`]
//!   shares plans between call sites; [`fft_recursive`] is a plan-free
//!   out-of-place variant.
//! - **Substring search**: [`memmem`] finds byte needles in byte haystacks
//!   with a naive scan, Boyer-Moore-Horspool or Knuth-Morris-Pratt.
//!
//! ## Cargo Features
//!
//! - `std` (default): `std::error::Error` impls and the
//!   `SKIT_PLAN_CACHE_ENTRIES` environment override
//! - `verbose-logging`: emit `log` records from plan construction, the
//!   planner cache and search table construction
//! - `internal-tests`: extra property tests inside the crate
//!
//! ## Example
//!
//! ```
//! use skit::fft::FftPlan;
//! use skit::memmem::find_kmp_all;
//!
//! let plan = FftPlan::<f64>::new(8).unwrap();
//! let mut re = [1.0, 2.0, 3.0, 4.0, 5.0, 6.0, 7.0, 8.0];
//! let mut im = [0.0; 8];
//! plan.fft(&mut re, &mut im).unwrap();
//! assert!((re[0] - 36.0).abs() < 1e-9);
//! plan.ifft(&mut re, &mut im).unwrap();
//! assert!((re[7] - 8.0).abs() < 1e-9);
//!
//! assert_eq!(find_kmp_all(b"foobarbarfoobar", b"bar").unwrap(), vec![3, 6, 12]);
//! ```
//!
//! ## License
//!
//! Licensed under either of
//! - Apache License, Version 2.0 ([LICENSE-APACHE](LICENSE-APACHE) or https://www.apache.org/licenses/LICENSE-2.0)
//! - MIT license ([LICENSE-MIT](LICENSE-MIT) or https://opensource.org/licenses/MIT)
//!
//! at your option.

#![no_std]
extern crate alloc;
#[cfg(feature = "std")]
extern crate std;

/// Plan-based iterative radix-2 FFT
///
/// Precomputed tables, in-place transforms over split buffers and a
/// planner that shares plans by length.
pub mod fft;

/// Butterfly stages driven by [`fft::FftPlan`].
pub mod fft_kernels;

/// Recursive radix-2 FFT
///
/// Out-of-place transform over interleaved complex samples.
pub mod fft_recursive;

/// Byte substring search
///
/// Naive, Boyer-Moore-Horspool and Knuth-Morris-Pratt engines.
pub mod memmem;

pub mod num;

pub use fft::{FftError, FftPlan, FftPlanner};
pub use memmem::{MemmemError, SubstringSearch};
pub use num::{Complex, Complex32, Complex64, Float, SplitComplex};


#[cfg(all(feature = "internal-tests", test))]
mod prop_tests {
    use crate::fft::FftPlan;
    use crate::memmem::{find_bmh, find_kmp, find_kmp_all, find_naive};
    use alloc::vec::Vec;
    use proptest::prelude::*;

    proptest! {
        #[test]
        fn prop_search_engines_agree(
            haystack in proptest::collection::vec(0u8..4, 0..64),
            needle in proptest::collection::vec(0u8..4, 0..6),
        ) {
            let expected = find_naive(&haystack, &needle);
            prop_assert_eq!(find_bmh(&haystack, &needle, None).unwrap(), expected);
            prop_assert_eq!(find_kmp(&haystack, &needle).unwrap(), expected);
            let all = find_kmp_all(&haystack, &needle).unwrap();
            if !needle.is_empty() {
                prop_assert_eq!(all.first().copied(), expected);
            }
        }

        #[test]
        fn prop_fft_roundtrip(exp in 0u32..9, seed in proptest::collection::vec(-100.0f64..100.0, 512)) {
            let n = 1usize << exp;
            let plan = FftPlan::<f64>::new(n).unwrap();
            let mut re: Vec<f64> = seed.iter().take(n).copied().collect();
            let mut im: Vec<f64> = seed.iter().rev().take(n).copied().collect();
            let (orig_re, orig_im) = (re.clone(), im.clone());
            plan.fft(&mut re, &mut im).unwrap();
            plan.ifft(&mut re, &mut im).unwrap();
            for k in 0..n {
                prop_assert!((re[k] - orig_re[k]).abs() < 1e-9);
                prop_assert!((im[k] - orig_im[k]).abs() < 1e-9);
            }
        }
    }
}
