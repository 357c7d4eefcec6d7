//! Pitch correlation kernels.
//!
//! Inputs are `f64` slices but all accumulation is single precision: the
//! doubles are a transport format and are narrowed on load, matching the
//! reference rounding. Each kernel takes an explicit [`Arch`] and routes
//! through the SIMD dispatch layer when the `simd` feature is on.

use crate::arch::Arch;

// -- Dispatch wrappers --
// When the `simd` feature is enabled, these route through the SIMD dispatch
// layer. Otherwise, they call the scalar implementations directly.

/// Dispatch wrapper for `xcorr_kernel`.
#[cfg(feature = "simd")]
#[inline]
pub fn xcorr_kernel(x: &[f64], y: &[f64], sum: &mut [f32; 4], len: usize, arch: Arch) {
    crate::simd::xcorr_kernel(x, y, sum, len, arch)
}

/// Dispatch wrapper for `xcorr_kernel` (scalar-only build).
#[cfg(not(feature = "simd"))]
#[inline]
pub fn xcorr_kernel(x: &[f64], y: &[f64], sum: &mut [f32; 4], len: usize, _arch: Arch) {
    xcorr_kernel_scalar(x, y, sum, len)
}

/// Dispatch wrapper for `inner_prod`.
#[cfg(feature = "simd")]
#[inline]
pub fn inner_prod(x: &[f64], y: &[f64], n: usize, arch: Arch) -> f64 {
    crate::simd::inner_prod(x, y, n, arch)
}

/// Dispatch wrapper for `inner_prod` (scalar-only build).
#[cfg(not(feature = "simd"))]
#[inline]
pub fn inner_prod(x: &[f64], y: &[f64], n: usize, _arch: Arch) -> f64 {
    inner_prod_scalar(x, y, n)
}

/// Dispatch wrapper for `dual_inner_prod`.
#[cfg(feature = "simd")]
#[inline]
pub fn dual_inner_prod(x: &[f64], y01: &[f64], y02: &[f64], n: usize, arch: Arch) -> (f64, f64) {
    crate::simd::dual_inner_prod(x, y01, y02, n, arch)
}

/// Dispatch wrapper for `dual_inner_prod` (scalar-only build).
#[cfg(not(feature = "simd"))]
#[inline]
pub fn dual_inner_prod(x: &[f64], y01: &[f64], y02: &[f64], n: usize, _arch: Arch) -> (f64, f64) {
    dual_inner_prod_scalar(x, y01, y02, n)
}

/// 4-lag cross-correlation kernel: accumulates
/// `sum[k] += x[j] * y[j + k]` for `k` in `0..4` over `j` in `0..len`.
///
/// `len` must be at least 3; `x` needs `len` elements and `y` needs
/// `len + 3`. Accelerated backends keep lag `k` in lane `k` and step `j`
/// scalarly, so every lane reproduces this exact accumulation chain.
#[inline]
pub fn xcorr_kernel_scalar(x: &[f64], y: &[f64], sum: &mut [f32; 4], len: usize) {
    assert!(len >= 3);
    let mut y_0: f32;
    let mut y_1: f32;
    let mut y_2: f32;
    let mut y_3: f32 = 0.0;
    let mut xi = 0usize;
    let mut yi = 0usize;
    y_0 = y[yi] as f32;
    yi += 1;
    y_1 = y[yi] as f32;
    yi += 1;
    y_2 = y[yi] as f32;
    yi += 1;
    let mut j = 0usize;
    while j < len - 3 {
        let tmp = x[xi] as f32;
        xi += 1;
        y_3 = y[yi] as f32;
        yi += 1;
        sum[0] += tmp * y_0;
        sum[1] += tmp * y_1;
        sum[2] += tmp * y_2;
        sum[3] += tmp * y_3;

        let tmp = x[xi] as f32;
        xi += 1;
        y_0 = y[yi] as f32;
        yi += 1;
        sum[0] += tmp * y_1;
        sum[1] += tmp * y_2;
        sum[2] += tmp * y_3;
        sum[3] += tmp * y_0;

        let tmp = x[xi] as f32;
        xi += 1;
        y_1 = y[yi] as f32;
        yi += 1;
        sum[0] += tmp * y_2;
        sum[1] += tmp * y_3;
        sum[2] += tmp * y_0;
        sum[3] += tmp * y_1;

        let tmp = x[xi] as f32;
        xi += 1;
        y_2 = y[yi] as f32;
        yi += 1;
        sum[0] += tmp * y_3;
        sum[1] += tmp * y_0;
        sum[2] += tmp * y_1;
        sum[3] += tmp * y_2;

        j += 4;
    }
    if j < len {
        let tmp = x[xi] as f32;
        xi += 1;
        y_3 = y[yi] as f32;
        yi += 1;
        sum[0] += tmp * y_0;
        sum[1] += tmp * y_1;
        sum[2] += tmp * y_2;
        sum[3] += tmp * y_3;
        j += 1;
    }
    if j < len {
        let tmp = x[xi] as f32;
        xi += 1;
        y_0 = y[yi] as f32;
        yi += 1;
        sum[0] += tmp * y_1;
        sum[1] += tmp * y_2;
        sum[2] += tmp * y_3;
        sum[3] += tmp * y_0;
        j += 1;
    }
    if j < len {
        let tmp = x[xi] as f32;
        y_1 = y[yi] as f32;
        sum[0] += tmp * y_2;
        sum[1] += tmp * y_3;
        sum[2] += tmp * y_0;
        sum[3] += tmp * y_1;
    }
}

/// Inner product of `x` and `y` over `n` elements, single-precision
/// sequential accumulation. `n == 0` yields 0.
#[inline]
pub fn inner_prod_scalar(x: &[f64], y: &[f64], n: usize) -> f64 {
    let mut xy: f32 = 0.0;
    for i in 0..n {
        xy += x[i] as f32 * y[i] as f32;
    }
    xy as f64
}

/// Two inner products sharing one pass over `x`: `(x . y01, x . y02)`.
#[inline]
pub fn dual_inner_prod_scalar(x: &[f64], y01: &[f64], y02: &[f64], n: usize) -> (f64, f64) {
    let mut xy01: f32 = 0.0;
    let mut xy02: f32 = 0.0;
    for i in 0..n {
        xy01 += x[i] as f32 * y01[i] as f32;
        xy02 += x[i] as f32 * y02[i] as f32;
    }
    (xy01 as f64, xy02 as f64)
}

/// Ranged cross-correlation: `xcorr[l] = sum_{i<len} x[l + i] * y[i]` for
/// every lag `l` in `0..xcorr.len()`.
///
/// The lag offsets the first operand, so `x` must have at least
/// `len + max_lag - 1` elements when lags are grouped (`max_lag > 3` and
/// `len >= 3`); `y` needs `len`. Lags are produced four at a time through
/// [`xcorr_kernel`], the remainder one lag at a time with the identical
/// per-lag accumulation order. An empty `xcorr` or `len == 0` writes
/// nothing / zeros.
pub fn pitch_xcorr(x: &[f64], y: &[f64], xcorr: &mut [f64], len: usize, arch: Arch) {
    let max_lag = xcorr.len();
    let mut l = 0usize;
    if len >= 3 {
        while l + 4 <= max_lag {
            let mut sum: [f32; 4] = [0.0; 4];
            xcorr_kernel(&y[..len], &x[l..], &mut sum, len, arch);
            xcorr[l] = sum[0] as f64;
            xcorr[l + 1] = sum[1] as f64;
            xcorr[l + 2] = sum[2] as f64;
            xcorr[l + 3] = sum[3] as f64;
            l += 4;
        }
    }
    while l < max_lag {
        xcorr[l] = inner_prod(&x[l..], y, len, arch);
        l += 1;
    }
}

/// All-scalar [`pitch_xcorr`], same grouping, for equivalence testing.
pub fn pitch_xcorr_scalar(x: &[f64], y: &[f64], xcorr: &mut [f64], len: usize) {
    let max_lag = xcorr.len();
    let mut l = 0usize;
    if len >= 3 {
        while l + 4 <= max_lag {
            let mut sum: [f32; 4] = [0.0; 4];
            xcorr_kernel_scalar(&y[..len], &x[l..], &mut sum, len);
            xcorr[l] = sum[0] as f64;
            xcorr[l + 1] = sum[1] as f64;
            xcorr[l + 2] = sum[2] as f64;
            xcorr[l + 3] = sum[3] as f64;
            l += 4;
        }
    }
    while l < max_lag {
        xcorr[l] = inner_prod_scalar(&x[l..], y, len);
        l += 1;
    }
}

/// Short autocorrelation over five lags:
/// `ac[l] = sum_{i<n-l} x[i] * x[i+l]`.
///
/// Two phases: a fast region of length `n - 4` through [`pitch_xcorr`],
/// then a scalar correction loop for the trailing products the fast region
/// cannot cover. The correction continues each lag's single-precision
/// accumulation chain in place, which makes `ac[0]` a straight sequential
/// fold over all `n` squares — identical bits to
/// [`sum_sqr`](crate::energy::sum_sqr).
pub fn autocorr5(x: &[f64], ac: &mut [f64; 5], n: usize, arch: Arch) {
    let fast_n = n.saturating_sub(4);
    if fast_n > 0 {
        pitch_xcorr(x, &x[..fast_n], &mut ac[..], fast_n, arch);
    } else {
        *ac = [0.0; 5];
    }
    for k in 0..5 {
        let mut d = ac[k] as f32;
        for i in (k + fast_n)..n {
            d += x[i] as f32 * x[i - k] as f32;
        }
        ac[k] = d as f64;
    }
}
