//! Energy reductions: sum of squares and per-pair energies.
//!
//! Like the pitch kernels these narrow `f64` inputs to `f32` on load and
//! accumulate in single precision, one running total in sequential order.

use crate::arch::Arch;

/// Dispatch wrapper for `sum_sqr`.
#[cfg(feature = "simd")]
#[inline]
pub fn sum_sqr(x: &[f64], arch: Arch) -> f64 {
    crate::simd::sum_sqr(x, arch)
}

/// Dispatch wrapper for `sum_sqr` (scalar-only build).
#[cfg(not(feature = "simd"))]
#[inline]
pub fn sum_sqr(x: &[f64], _arch: Arch) -> f64 {
    sum_sqr_scalar(x)
}

/// Dispatch wrapper for `pair_energy`.
#[cfg(feature = "simd")]
#[inline]
pub fn pair_energy(x: &[f64], out: &mut [f32], arch: Arch) -> f64 {
    crate::simd::pair_energy(x, out, arch)
}

/// Dispatch wrapper for `pair_energy` (scalar-only build).
#[cfg(not(feature = "simd"))]
#[inline]
pub fn pair_energy(x: &[f64], out: &mut [f32], _arch: Arch) -> f64 {
    pair_energy_scalar(x, out)
}

/// Sum of squares of `x`, accumulated in single precision. Empty input
/// yields 0.
#[inline]
pub fn sum_sqr_scalar(x: &[f64]) -> f64 {
    let mut e: f32 = 0.0;
    for &v in x {
        let v = v as f32;
        e += v * v;
    }
    e as f64
}

/// Energy of consecutive sample pairs. `out[i]` receives
/// `x[2i]^2 + x[2i+1]^2`; the return value is the running single-precision
/// total over all pairs. A trailing odd sample is ignored.
#[inline]
pub fn pair_energy_scalar(x: &[f64], out: &mut [f32]) -> f64 {
    let pairs = x.len() / 2;
    debug_assert!(out.len() >= pairs);
    let mut total: f32 = 0.0;
    for i in 0..pairs {
        let a = x[2 * i] as f32;
        let b = x[2 * i + 1] as f32;
        let e = a * a + b * b;
        out[i] = e;
        total += e;
    }
    total as f64
}
