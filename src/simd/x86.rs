//! SSE2 / AVX2+FMA backends.
//!
//! Bit-exactness contract: every kernel performs the same floating-point
//! operations as its scalar counterpart in an order that preserves each
//! accumulation chain. Multi-output kernels keep independent outputs in
//! vector lanes; single-accumulator reductions only vectorize the
//! narrowing and multiplies, then fold the stored products in scalar
//! order.

#[cfg(target_arch = "x86")]
use core::arch::x86::*;
#[cfg(target_arch = "x86_64")]
use core::arch::x86_64::*;

/// Loads `x[i..i+4]` and narrows to four `f32` lanes.
#[inline]
unsafe fn load4_ps(x: &[f64], i: usize) -> __m128 {
    debug_assert!(i + 4 <= x.len());
    let lo = _mm_cvtpd_ps(_mm_loadu_pd(x.as_ptr().add(i)));
    let hi = _mm_cvtpd_ps(_mm_loadu_pd(x.as_ptr().add(i + 2)));
    _mm_movelh_ps(lo, hi)
}

/// Four lags in four lanes; the sample index steps scalarly so each lane
/// reproduces the scalar chain for its lag.
#[target_feature(enable = "sse2")]
pub unsafe fn xcorr_kernel_sse2(x: &[f64], y: &[f64], sum: &mut [f32; 4], len: usize) {
    assert!(len >= 3);
    assert!(x.len() >= len && y.len() >= len + 3);
    let mut acc = _mm_loadu_ps(sum.as_ptr());
    for j in 0..len {
        let xv = _mm_set1_ps(*x.get_unchecked(j) as f32);
        let yv = load4_ps(y, j);
        acc = _mm_add_ps(acc, _mm_mul_ps(xv, yv));
    }
    _mm_storeu_ps(sum.as_mut_ptr(), acc);
}

#[target_feature(enable = "sse2")]
pub unsafe fn inner_prod_sse2(x: &[f64], y: &[f64], n: usize) -> f64 {
    let mut xy: f32 = 0.0;
    let mut prods = [0.0f32; 4];
    let mut i = 0usize;
    while i + 4 <= n {
        let p = _mm_mul_ps(load4_ps(x, i), load4_ps(y, i));
        _mm_storeu_ps(prods.as_mut_ptr(), p);
        xy += prods[0];
        xy += prods[1];
        xy += prods[2];
        xy += prods[3];
        i += 4;
    }
    while i < n {
        xy += x[i] as f32 * y[i] as f32;
        i += 1;
    }
    xy as f64
}

#[target_feature(enable = "sse2")]
pub unsafe fn dual_inner_prod_sse2(x: &[f64], y01: &[f64], y02: &[f64], n: usize) -> (f64, f64) {
    let mut xy01: f32 = 0.0;
    let mut xy02: f32 = 0.0;
    let mut p01 = [0.0f32; 4];
    let mut p02 = [0.0f32; 4];
    let mut i = 0usize;
    while i + 4 <= n {
        let xv = load4_ps(x, i);
        _mm_storeu_ps(p01.as_mut_ptr(), _mm_mul_ps(xv, load4_ps(y01, i)));
        _mm_storeu_ps(p02.as_mut_ptr(), _mm_mul_ps(xv, load4_ps(y02, i)));
        for k in 0..4 {
            xy01 += p01[k];
            xy02 += p02[k];
        }
        i += 4;
    }
    while i < n {
        xy01 += x[i] as f32 * y01[i] as f32;
        xy02 += x[i] as f32 * y02[i] as f32;
        i += 1;
    }
    (xy01 as f64, xy02 as f64)
}

#[target_feature(enable = "sse2")]
pub unsafe fn sum_sqr_sse2(x: &[f64]) -> f64 {
    let n = x.len();
    let mut e: f32 = 0.0;
    let mut sq = [0.0f32; 4];
    let mut i = 0usize;
    while i + 4 <= n {
        let v = load4_ps(x, i);
        _mm_storeu_ps(sq.as_mut_ptr(), _mm_mul_ps(v, v));
        e += sq[0];
        e += sq[1];
        e += sq[2];
        e += sq[3];
        i += 4;
    }
    while i < n {
        let v = x[i] as f32;
        e += v * v;
        i += 1;
    }
    e as f64
}

/// Two sample pairs per iteration; each pair energy is the same
/// mul-mul-add the scalar path performs, and the running total is folded
/// in pair order.
#[target_feature(enable = "sse2")]
pub unsafe fn pair_energy_sse2(x: &[f64], out: &mut [f32]) -> f64 {
    let pairs = x.len() / 2;
    debug_assert!(out.len() >= pairs);
    let mut total: f32 = 0.0;
    let mut sq = [0.0f32; 4];
    let mut p = 0usize;
    while p + 2 <= pairs {
        let v = load4_ps(x, 2 * p);
        _mm_storeu_ps(sq.as_mut_ptr(), _mm_mul_ps(v, v));
        let e0 = sq[0] + sq[1];
        let e1 = sq[2] + sq[3];
        out[p] = e0;
        total += e0;
        out[p + 1] = e1;
        total += e1;
        p += 2;
    }
    if p < pairs {
        let a = x[2 * p] as f32;
        let b = x[2 * p + 1] as f32;
        let e = a * a + b * b;
        out[p] = e;
        total += e;
    }
    total as f64
}

#[target_feature(enable = "sse2")]
pub unsafe fn pvq_split_sse2(x: &[f64], abs_x: &mut [f32], signx: &mut [i32]) {
    let n = x.len();
    debug_assert!(abs_x.len() >= n && signx.len() >= n);
    let zero = _mm_setzero_pd();
    let abs_mask = _mm_castsi128_pd(_mm_set1_epi64x(i64::MAX));
    let mut j = 0usize;
    while j + 2 <= n {
        let v = _mm_loadu_pd(x.as_ptr().add(j));
        let m = _mm_movemask_pd(_mm_cmplt_pd(v, zero));
        signx[j] = m & 1;
        signx[j + 1] = (m >> 1) & 1;
        let a = _mm_cvtpd_ps(_mm_and_pd(v, abs_mask));
        _mm_store_ss(abs_x.as_mut_ptr().add(j), a);
        _mm_store_ss(
            abs_x.as_mut_ptr().add(j + 1),
            _mm_shuffle_ps(a, a, 0b01_01_01_01),
        );
        j += 2;
    }
    if j < n {
        signx[j] = (x[j] < 0.0) as i32;
        abs_x[j] = x[j].abs() as f32;
    }
}

/// Even and odd rotation chains ride in the two `f64` lanes; the fused
/// multiply-adds mirror the scalar `mul_add` calls exactly.
#[target_feature(enable = "avx2", enable = "fma")]
pub unsafe fn exp_rotation1_fma(x: &mut [f64], c: f64, s: f64) {
    let len = x.len();
    if len < 3 {
        return;
    }
    let ms = -s;
    let cv = _mm_set1_pd(c);
    let sv = _mm_set1_pd(s);
    let msv = _mm_set1_pd(ms);
    let p = x.as_mut_ptr();

    let end = len - 2;
    let mut i = 0usize;
    // Iterations i and i+1 touch disjoint elements, so a pair of chains
    // can advance together.
    while i + 2 <= end {
        let lo = _mm_loadu_pd(p.add(i));
        let hi = _mm_loadu_pd(p.add(i + 2));
        let nhi = _mm_fmadd_pd(cv, hi, _mm_mul_pd(sv, lo));
        let nlo = _mm_fmadd_pd(cv, lo, _mm_mul_pd(msv, hi));
        _mm_storeu_pd(p.add(i + 2), nhi);
        _mm_storeu_pd(p.add(i), nlo);
        i += 2;
    }
    while i < end {
        let x1 = x[i];
        let x2 = x[i + 2];
        x[i + 2] = c.mul_add(x2, s * x1);
        x[i] = c.mul_add(x1, ms * x2);
        i += 1;
    }

    let mut i = len as i32 - 5;
    while i >= 1 {
        let j = (i - 1) as usize;
        let lo = _mm_loadu_pd(p.add(j));
        let hi = _mm_loadu_pd(p.add(j + 2));
        let nhi = _mm_fmadd_pd(cv, hi, _mm_mul_pd(sv, lo));
        let nlo = _mm_fmadd_pd(cv, lo, _mm_mul_pd(msv, hi));
        _mm_storeu_pd(p.add(j + 2), nhi);
        _mm_storeu_pd(p.add(j), nlo);
        i -= 2;
    }
    if i == 0 {
        let x1 = x[0];
        let x2 = x[2];
        x[2] = c.mul_add(x2, s * x1);
        x[0] = c.mul_add(x1, ms * x2);
    }
}
