//! Recursive out-of-place radix-2 FFT over interleaved complex samples.
//!
//! Needs no plan: each level computes its own twiddle step. Slower than
//! [`crate::fft::FftPlan`] but independent of it, which makes it a handy
//! cross-check.

use crate::fft::FftError;
use crate::num::{Complex, Float};

fn check_lengths<T: Float>(input: &[Complex<T>], output: &[Complex<T>]) -> Result<usize, FftError> {
    let n = input.len();
    if n == 0 {
        return Err(FftError::EmptyInput);
    }
    if !n.is_power_of_two() {
        return Err(FftError::NonPowerOfTwo);
    }
    if output.len() < n {
        return Err(FftError::MismatchedLengths);
    }
    Ok(n)
}

/// Transform the `n` samples `input[0], input[stride], ...` into
/// `out[..n]`, even half first.
fn recurse<T: Float>(input: &[Complex<T>], out: &mut [Complex<T>], n: usize, stride: usize, sign: T) {
    if n <= 1 {
        out[0] = input[0];
        return;
    }
    let half = n / 2;
    {
        let (even, odd) = out.split_at_mut(half);
        recurse(input, even, half, stride * 2, sign);
        recurse(&input[stride..], odd, half, stride * 2, sign);
    }

    let angle = sign * T::from_f64(2.0) * T::pi() / T::from_f64(n as f64);
    let omega_n = Complex::expi(angle);
    let mut omega = Complex::one();
    for k in 0..half {
        let even = out[k];
        let odd = omega * out[k + half];
        out[k] = even + odd;
        out[k + half] = even - odd;
        omega = omega * omega_n;
    }
}

/// Forward FFT of `input` into `output[..input.len()]`.
///
/// `input.len()` must be a nonzero power of two and `output` at least as
/// long.
pub fn fft<T: Float>(input: &[Complex<T>], output: &mut [Complex<T>]) -> Result<(), FftError> {
    let n = check_lengths(input, output)?;
    recurse(input, &mut output[..n], n, 1, -T::one());
    Ok(())
}

/// Inverse FFT of `input` into `output[..input.len()]`, scaled by `1/n`.
pub fn ifft<T: Float>(input: &[Complex<T>], output: &mut [Complex<T>]) -> Result<(), FftError> {
    let n = check_lengths(input, output)?;
    recurse(input, &mut output[..n], n, 1, T::one());
    let scale = T::one() / T::from_f64(n as f64);
    for c in output[..n].iter_mut() {
        *c = c.scale(scale);
    }
    Ok(())
}
