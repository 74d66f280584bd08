use alloc::vec::Vec;

// Minimal float trait for the generic transforms (no_std, libm-backed)
pub trait Float:
    Copy
    + Clone
    + PartialEq
    + PartialOrd
    + core::fmt::Debug
    + core::ops::Add<Output = Self>
    + core::ops::Sub<Output = Self>
    + core::ops::Mul<Output = Self>
    + core::ops::Div<Output = Self>
    + core::ops::Neg<Output = Self>
    + Send
    + Sync
    + 'static
{
    fn zero() -> Self;
    fn one() -> Self;
    fn from_f64(x: f64) -> Self;
    fn cos(self) -> Self;
    fn sin(self) -> Self;
    fn sin_cos(self) -> (Self, Self) {
        (self.sin(), self.cos())
    }
    fn pi() -> Self;
}

impl Float for f32 {
    fn zero() -> Self {
        0.0
    }
    fn one() -> Self {
        1.0
    }
    fn from_f64(x: f64) -> Self {
        x as f32
    }
    fn cos(self) -> Self {
        libm::cosf(self)
    }
    fn sin(self) -> Self {
        libm::sinf(self)
    }
    fn pi() -> Self {
        core::f32::consts::PI
    }
}

impl Float for f64 {
    fn zero() -> Self {
        0.0
    }
    fn one() -> Self {
        1.0
    }
    fn from_f64(x: f64) -> Self {
        x
    }
    fn cos(self) -> Self {
        libm::cos(self)
    }
    fn sin(self) -> Self {
        libm::sin(self)
    }
    fn pi() -> Self {
        core::f64::consts::PI
    }
}

#[repr(C)]
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Complex<T: Float> {
    pub re: T,
    pub im: T,
}

impl<T: Float> Complex<T> {
    pub fn new(re: T, im: T) -> Self {
        Self { re, im }
    }
    pub fn zero() -> Self {
        Self {
            re: T::zero(),
            im: T::zero(),
        }
    }
    pub fn one() -> Self {
        Self {
            re: T::one(),
            im: T::zero(),
        }
    }
    /// `exp(i·theta)` on the unit circle.
    #[inline(always)]
    pub fn expi(theta: T) -> Self {
        let (sin, cos) = theta.sin_cos();
        Self { re: cos, im: sin }
    }
    #[inline(always)]
    pub fn scale(self, k: T) -> Self {
        Self {
            re: self.re * k,
            im: self.im * k,
        }
    }
}

impl<T: Float> core::ops::Neg for Complex<T> {
    type Output = Self;
    #[inline(always)]
    fn neg(self) -> Self {
        Self {
            re: -self.re,
            im: -self.im,
        }
    }
}

impl<T: Float> core::ops::Add for Complex<T> {
    type Output = Self;
    #[inline(always)]
    fn add(self, other: Self) -> Self {
        Self {
            re: self.re + other.re,
            im: self.im + other.im,
        }
    }
}

impl<T: Float> core::ops::Sub for Complex<T> {
    type Output = Self;
    #[inline(always)]
    fn sub(self, other: Self) -> Self {
        Self {
            re: self.re - other.re,
            im: self.im - other.im,
        }
    }
}

impl<T: Float> core::ops::Mul for Complex<T> {
    type Output = Self;
    #[inline(always)]
    fn mul(self, other: Self) -> Self {
        Self {
            re: self.re * other.re - self.im * other.im,
            im: self.re * other.im + self.im * other.re,
        }
    }
}

pub type Complex32 = Complex<f32>;
pub type Complex64 = Complex<f64>;

/// Borrowed pair of equal-length real and imaginary buffers.
///
/// This is the layout the plan-based transforms in [`crate::fft`] operate
/// on; the buffers stay owned by the caller and are mutated in place.
#[derive(Debug, PartialEq)]
pub struct SplitComplex<'a, T: Float> {
    pub re: &'a mut [T],
    pub im: &'a mut [T],
}

impl<'a, T: Float> SplitComplex<'a, T> {
    /// Pair two buffers. Returns `None` when their lengths differ.
    pub fn new(re: &'a mut [T], im: &'a mut [T]) -> Option<Self> {
        if re.len() != im.len() {
            return None;
        }
        Some(Self { re, im })
    }
    pub fn len(&self) -> usize {
        self.re.len()
    }
    pub fn is_empty(&self) -> bool {
        self.re.is_empty()
    }
    pub fn copy_from_complex(input: &[Complex<T>], re: &'a mut [T], im: &'a mut [T]) -> Self {
        copy_from_complex(input, re, im);
        Self { re, im }
    }
    pub fn copy_to_complex(&self, out: &mut [Complex<T>]) {
        copy_to_complex(self.re, self.im, out);
    }
    pub fn to_complex_vec(&self) -> Vec<Complex<T>> {
        self.re
            .iter()
            .zip(self.im.iter())
            .map(|(&re, &im)| Complex::new(re, im))
            .collect()
    }
}

/// Copy interleaved values into split buffers. Copies `min` of the three
/// lengths.
pub fn copy_from_complex<T: Float>(input: &[Complex<T>], re: &mut [T], im: &mut [T]) {
    for ((c, r), i) in input.iter().zip(re.iter_mut()).zip(im.iter_mut()) {
        *r = c.re;
        *i = c.im;
    }
}

/// Copy split buffers into interleaved values. Copies `min` of the three
/// lengths.
pub fn copy_to_complex<T: Float>(re: &[T], im: &[T], out: &mut [Complex<T>]) {
    for ((c, &r), &i) in out.iter_mut().zip(re.iter()).zip(im.iter()) {
        c.re = r;
        c.im = i;
    }
}
