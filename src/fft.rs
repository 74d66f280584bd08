//! Plan-based iterative radix-2 Fast Fourier Transform.
//!
//! An [`FftPlan`] precomputes the bit-reversal permutation and the
//! cosine/sine tables for one power-of-two length, then transforms
//! caller-owned split real/imaginary buffers in place as many times as
//! needed. The forward transform is unnormalised; the inverse divides by
//! `N`. An [`FftPlanner`] hands out shared plans keyed by length.

use alloc::collections::VecDeque;
use alloc::sync::Arc;
use alloc::vec::Vec;
use core::fmt;
use core::sync::atomic::{AtomicUsize, Ordering};
use hashbrown::HashMap;

use crate::fft_kernels::{self, Direction};

#[cfg(feature = "std")]
use std::sync::OnceLock;

pub use crate::num::{Complex, Complex32, Complex64, Float, SplitComplex};

/// Number of plans an [`FftPlanner`] keeps before evicting the least
/// recently used one.
pub const DEFAULT_PLAN_CACHE_ENTRIES: usize = 64;

/// Environment variable overriding [`DEFAULT_PLAN_CACHE_ENTRIES`].
pub const PLAN_CACHE_ENV: &str = "SKIT_PLAN_CACHE_ENTRIES";

/// Override for the planner cache limit.
///
/// `0` means no override and the environment/default value is used.
static PLAN_CACHE_ENTRIES_OVERRIDE: AtomicUsize = AtomicUsize::new(0);

#[cfg(feature = "std")]
static PLAN_CACHE_ENTRIES_ENV: OnceLock<usize> = OnceLock::new();

/// Set the cache limit used by planners created afterwards with
/// [`FftPlanner::new`].
///
/// Passing `0` reverts to the environment variable or built-in default.
pub fn set_plan_cache_limit(entries: usize) {
    PLAN_CACHE_ENTRIES_OVERRIDE.store(entries, Ordering::Relaxed);
}

/// Cache limit a new [`FftPlanner`] starts with.
pub fn plan_cache_limit() -> usize {
    let override_entries = PLAN_CACHE_ENTRIES_OVERRIDE.load(Ordering::Relaxed);
    if override_entries != 0 {
        return override_entries;
    }
    #[cfg(feature = "std")]
    {
        *PLAN_CACHE_ENTRIES_ENV.get_or_init(|| {
            std::env::var(PLAN_CACHE_ENV)
                .ok()
                .and_then(|v| v.trim().parse::<usize>().ok())
                .filter(|&v| v != 0)
                .unwrap_or(DEFAULT_PLAN_CACHE_ENTRIES)
        })
    }
    #[cfg(not(feature = "std"))]
    {
        DEFAULT_PLAN_CACHE_ENTRIES
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FftError {
    /// The plan has length zero or was released.
    EmptyInput,
    /// The plan length is not a power of two.
    NonPowerOfTwo,
    /// A data buffer does not have the plan's length.
    MismatchedLengths,
    /// Memory for the plan tables could not be reserved.
    AllocationFailed,
}

impl fmt::Display for FftError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FftError::EmptyInput => write!(f, "transform length is zero or the plan was released"),
            FftError::NonPowerOfTwo => write!(f, "transform length must be a power of two"),
            FftError::MismatchedLengths => {
                write!(f, "buffer length does not match the transform length")
            }
            FftError::AllocationFailed => write!(f, "failed to allocate transform tables"),
        }
    }
}

#[cfg(feature = "std")]
impl std::error::Error for FftError {}

/// Number of significant bits in `n` (`0` for `0`).
pub fn bit_size(mut n: usize) -> usize {
    let mut size = 0;
    while n != 0 {
        size += 1;
        n >>= 1;
    }
    size
}

/// Reverse the lowest `bits` bits of `value`.
pub fn bit_reverse(value: usize, bits: usize) -> usize {
    let mut reversed = 0;
    for i in 0..bits {
        reversed = (reversed << 1) | ((value >> i) & 1);
    }
    reversed
}

fn try_table<E>(n: usize) -> Result<Vec<E>, FftError> {
    let mut table = Vec::new();
    table
        .try_reserve_exact(n)
        .map_err(|_| FftError::AllocationFailed)?;
    Ok(table)
}

/// Precomputed tables for a fixed transform length.
///
/// Immutable once built, so a plan can be shared between threads that
/// transform disjoint buffers.
#[derive(Debug, Clone, PartialEq)]
pub struct FftPlan<T: Float> {
    n: usize,
    bit_reverse: Vec<usize>,
    cosine: Vec<T>,
    sine: Vec<T>,
}

impl<T: Float> FftPlan<T> {
    /// Build the tables for length `n`.
    ///
    /// Any `n` is accepted here, including zero; transforms on a plan whose
    /// length is zero or not a power of two fail with [`FftError`].
    pub fn new(n: usize) -> Result<Self, FftError> {
        let mut bit_reverse = try_table::<usize>(n)?;
        let mut cosine = try_table::<T>(n)?;
        let mut sine = try_table::<T>(n)?;

        let log2_n = bit_size(n).saturating_sub(1);
        // Tables are evaluated in f64 and narrowed, so f32 plans keep full accuracy.
        let step = -2.0 * core::f64::consts::PI / n as f64;
        for i in 0..n {
            let w = step * i as f64;
            bit_reverse.push(self::bit_reverse(i, log2_n));
            sine.push(T::from_f64(libm::sin(w)));
            cosine.push(T::from_f64(libm::cos(w)));
        }

        #[cfg(feature = "verbose-logging")]
        log::debug!("built fft plan: n={} log2_n={}", n, log2_n);

        Ok(Self {
            n,
            bit_reverse,
            cosine,
            sine,
        })
    }

    /// Transform length, `0` once released.
    pub fn len(&self) -> usize {
        self.n
    }

    pub fn is_empty(&self) -> bool {
        self.n == 0
    }

    pub fn bit_reverse(&self) -> &[usize] {
        &self.bit_reverse
    }

    /// `cos(-2π·i/N)` for `i` in `0..N`.
    pub fn cosine(&self) -> &[T] {
        &self.cosine
    }

    /// `sin(-2π·i/N)` for `i` in `0..N`.
    pub fn sine(&self) -> &[T] {
        &self.sine
    }

    /// Drop the tables and reset the length to zero. Calling it again is a
    /// no-op; transforms on a released plan fail with
    /// [`FftError::EmptyInput`].
    pub fn release(&mut self) {
        #[cfg(feature = "verbose-logging")]
        {
            if self.n != 0 {
                log::debug!("released fft plan: n={}", self.n);
            }
        }
        self.n = 0;
        self.bit_reverse = Vec::new();
        self.cosine = Vec::new();
        self.sine = Vec::new();
    }

    /// In-place forward FFT, no normalisation.
    pub fn fft(&self, re: &mut [T], im: &mut [T]) -> Result<(), FftError> {
        self.transform(re, im, Direction::Forward)
    }

    /// In-place inverse FFT, every output divided by `N`.
    pub fn ifft(&self, re: &mut [T], im: &mut [T]) -> Result<(), FftError> {
        self.transform(re, im, Direction::Inverse)
    }

    pub fn fft_split(&self, data: SplitComplex<'_, T>) -> Result<(), FftError> {
        self.fft(data.re, data.im)
    }

    pub fn ifft_split(&self, data: SplitComplex<'_, T>) -> Result<(), FftError> {
        self.ifft(data.re, data.im)
    }

    /// Check every precondition before the first write to the buffers.
    fn validate(&self, re: &[T], im: &[T]) -> Result<(), FftError> {
        let n = self.n;
        if n == 0
            || self.bit_reverse.len() != n
            || self.cosine.len() != n
            || self.sine.len() != n
        {
            return Err(FftError::EmptyInput);
        }
        if !n.is_power_of_two() {
            return Err(FftError::NonPowerOfTwo);
        }
        if re.len() != n || im.len() != n {
            return Err(FftError::MismatchedLengths);
        }
        Ok(())
    }

    fn transform(&self, re: &mut [T], im: &mut [T], direction: Direction) -> Result<(), FftError> {
        self.validate(re, im)?;
        let n = self.n;

        fft_kernels::permute(re, im, &self.bit_reverse);
        if n >= 2 {
            fft_kernels::fft2(re, im);
        }
        if n >= 4 {
            fft_kernels::fft4(re, im, direction);
        }
        let mut block = 8;
        while block <= n {
            fft_kernels::radix2_stage(re, im, &self.cosine, &self.sine, block, direction);
            block <<= 1;
        }
        if direction == Direction::Inverse {
            // Exact for powers of two, so this equals dividing by `n`.
            let scale = T::one() / T::from_f64(n as f64);
            fft_kernels::scale(re, im, scale);
        }
        Ok(())
    }
}

/// Hands out shared [`FftPlan`]s, building each length once.
///
/// At most [`cache_limit`](FftPlanner::cache_limit) plans are kept; the
/// least recently used one is evicted first.
pub struct FftPlanner<T: Float> {
    cache: HashMap<usize, Arc<FftPlan<T>>>,
    order: VecDeque<usize>,
    cache_limit: usize,
}

impl<T: Float> Default for FftPlanner<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T: Float> FftPlanner<T> {
    pub fn new() -> Self {
        Self::with_cache_limit(plan_cache_limit())
    }

    /// Planner that keeps at most `limit` plans. A limit of `0` disables
    /// caching; every call builds a fresh plan.
    pub fn with_cache_limit(limit: usize) -> Self {
        Self {
            cache: HashMap::new(),
            order: VecDeque::new(),
            cache_limit: limit,
        }
    }

    pub fn cache_limit(&self) -> usize {
        self.cache_limit
    }

    /// Number of cached plans.
    pub fn len(&self) -> usize {
        self.cache.len()
    }

    pub fn is_empty(&self) -> bool {
        self.cache.is_empty()
    }

    pub fn clear(&mut self) {
        self.cache.clear();
        self.order.clear();
    }

    /// Shared plan for length `n`.
    ///
    /// Plans evicted from the cache stay valid for whoever still holds them.
    pub fn plan(&mut self, n: usize) -> Result<Arc<FftPlan<T>>, FftError> {
        if let Some(plan) = self.cache.get(&n) {
            let plan = Arc::clone(plan);
            #[cfg(feature = "verbose-logging")]
            log::trace!("fft planner hit: n={}", n);
            self.order.retain(|&x| x != n);
            self.order.push_back(n);
            return Ok(plan);
        }
        let plan = Arc::new(FftPlan::new(n)?);
        if self.cache_limit == 0 {
            return Ok(plan);
        }
        while self.cache.len() >= self.cache_limit {
            let Some(old) = self.order.pop_front() else {
                break;
            };
            self.cache.remove(&old);
            #[cfg(feature = "verbose-logging")]
            log::debug!("fft planner cache full, evicted n={}", old);
        }
        self.cache.insert(n, Arc::clone(&plan));
        self.order.push_back(n);
        Ok(plan)
    }
}
