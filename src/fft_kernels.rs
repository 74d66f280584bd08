//! Butterfly stages used by the plan-based radix-2 transform.
//!
//! Each kernel works on split real/imaginary buffers of equal, power-of-two
//! length that have already been permuted into bit-reversed order. Length
//! checks are the caller's job ([`crate::fft::FftPlan`] does them up front).

use crate::num::Float;

/// Direction of a transform pass.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Direction {
    Forward,
    Inverse,
}

/// Swap every element with its bit-reversed partner, once per pair.
#[inline]
pub fn permute<T: Float>(re: &mut [T], im: &mut [T], bit_reverse: &[usize]) {
    for (i, &j) in bit_reverse.iter().enumerate() {
        if i < j {
            re.swap(i, j);
            im.swap(i, j);
        }
    }
}

/// Length-2 DFT on every adjacent pair.
#[inline]
pub fn fft2<T: Float>(re: &mut [T], im: &mut [T]) {
    for (r, i) in re.chunks_exact_mut(2).zip(im.chunks_exact_mut(2)) {
        let (r0, i0, r1, i1) = (r[0], i[0], r[1], i[1]);
        r[0] = r0 + r1;
        i[0] = i0 + i1;
        r[1] = r0 - r1;
        i[1] = i0 - i1;
    }
}

/// Second radix-2 stage specialised for the fixed twiddles `1` and `∓j`.
///
/// The upper element of each odd pair is rotated by `-j` going forward and
/// by `+j` going backward, so no table lookups are needed.
#[inline]
pub fn fft4<T: Float>(re: &mut [T], im: &mut [T], direction: Direction) {
    let forward = direction == Direction::Forward;
    for (r, i) in re.chunks_exact_mut(4).zip(im.chunks_exact_mut(4)) {
        let (r0, i0, r1, i1) = (r[0], i[0], r[1], i[1]);
        let (r2, i2, r3, i3) = (r[2], i[2], r[3], i[3]);
        // (r3, i3) rotated by -j is (i3, -r3); by +j it is (-i3, r3).
        let (tr, ti) = if forward { (i3, -r3) } else { (-i3, r3) };
        r[0] = r0 + r2;
        i[0] = i0 + i2;
        r[1] = r1 + tr;
        i[1] = i1 + ti;
        r[2] = r0 - r2;
        i[2] = i0 - i2;
        r[3] = r1 - tr;
        i[3] = i1 - ti;
    }
}

/// One general radix-2 stage combining halves of every `block`-sized group.
///
/// Twiddle `k` of the stage is read from the length-`n` tables at
/// `k * (n / block)`. The inverse direction conjugates it by negating the
/// sine.
#[inline]
pub fn radix2_stage<T: Float>(
    re: &mut [T],
    im: &mut [T],
    cosine: &[T],
    sine: &[T],
    block: usize,
    direction: Direction,
) {
    let n = re.len();
    let half = block / 2;
    let stride = n / block;
    for (rb, ib) in re.chunks_exact_mut(block).zip(im.chunks_exact_mut(block)) {
        let (r_lo, r_hi) = rb.split_at_mut(half);
        let (i_lo, i_hi) = ib.split_at_mut(half);
        for k in 0..half {
            let w_re = cosine[k * stride];
            let w_im = match direction {
                Direction::Forward => sine[k * stride],
                Direction::Inverse => -sine[k * stride],
            };
            let (a_re, a_im) = (r_lo[k], i_lo[k]);
            let (b_re, b_im) = (r_hi[k], i_hi[k]);
            let t_re = b_re * w_re - b_im * w_im;
            let t_im = b_re * w_im + b_im * w_re;
            r_lo[k] = a_re + t_re;
            i_lo[k] = a_im + t_im;
            r_hi[k] = a_re - t_re;
            i_hi[k] = a_im - t_im;
        }
    }
}

/// Multiply every element of both buffers by `scale`.
#[inline]
pub fn scale<T: Float>(re: &mut [T], im: &mut [T], scale: T) {
    for v in re.iter_mut().chain(im.iter_mut()) {
        *v = *v * scale;
    }
}
