//! NEON backends, mirroring the x86 bit-exactness strategy: lanes hold
//! independent outputs or chains, single accumulators fold stored
//! products in scalar order, and the `f64` rotation uses fused
//! multiply-adds to match the scalar `mul_add` calls.

use core::arch::aarch64::*;

/// Loads `x[i..i+4]` and narrows to four `f32` lanes.
#[inline]
unsafe fn load4_f32(x: &[f64], i: usize) -> float32x4_t {
    debug_assert!(i + 4 <= x.len());
    let lo = vcvt_f32_f64(vld1q_f64(x.as_ptr().add(i)));
    let hi = vcvt_f32_f64(vld1q_f64(x.as_ptr().add(i + 2)));
    vcombine_f32(lo, hi)
}

#[target_feature(enable = "neon")]
pub unsafe fn xcorr_kernel_neon(x: &[f64], y: &[f64], sum: &mut [f32; 4], len: usize) {
    assert!(len >= 3);
    assert!(x.len() >= len && y.len() >= len + 3);
    let mut acc = vld1q_f32(sum.as_ptr());
    for j in 0..len {
        let xv = *x.get_unchecked(j) as f32;
        let yv = load4_f32(y, j);
        // Separate multiply and add keeps lanes identical to the scalar
        // chains; vfmaq would contract them.
        acc = vaddq_f32(acc, vmulq_n_f32(yv, xv));
    }
    vst1q_f32(sum.as_mut_ptr(), acc);
}

#[target_feature(enable = "neon")]
pub unsafe fn inner_prod_neon(x: &[f64], y: &[f64], n: usize) -> f64 {
    let mut xy: f32 = 0.0;
    let mut prods = [0.0f32; 4];
    let mut i = 0usize;
    while i + 4 <= n {
        vst1q_f32(
            prods.as_mut_ptr(),
            vmulq_f32(load4_f32(x, i), load4_f32(y, i)),
        );
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

#[target_feature(enable = "neon")]
pub unsafe fn dual_inner_prod_neon(x: &[f64], y01: &[f64], y02: &[f64], n: usize) -> (f64, f64) {
    let mut xy01: f32 = 0.0;
    let mut xy02: f32 = 0.0;
    let mut p01 = [0.0f32; 4];
    let mut p02 = [0.0f32; 4];
    let mut i = 0usize;
    while i + 4 <= n {
        let xv = load4_f32(x, i);
        vst1q_f32(p01.as_mut_ptr(), vmulq_f32(xv, load4_f32(y01, i)));
        vst1q_f32(p02.as_mut_ptr(), vmulq_f32(xv, load4_f32(y02, i)));
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

#[target_feature(enable = "neon")]
pub unsafe fn sum_sqr_neon(x: &[f64]) -> f64 {
    let n = x.len();
    let mut e: f32 = 0.0;
    let mut sq = [0.0f32; 4];
    let mut i = 0usize;
    while i + 4 <= n {
        let v = load4_f32(x, i);
        vst1q_f32(sq.as_mut_ptr(), vmulq_f32(v, v));
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

#[target_feature(enable = "neon")]
pub unsafe fn pair_energy_neon(x: &[f64], out: &mut [f32]) -> f64 {
    let pairs = x.len() / 2;
    debug_assert!(out.len() >= pairs);
    let mut total: f32 = 0.0;
    let mut sq = [0.0f32; 4];
    let mut p = 0usize;
    while p + 2 <= pairs {
        let v = load4_f32(x, 2 * p);
        vst1q_f32(sq.as_mut_ptr(), vmulq_f32(v, v));
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

#[target_feature(enable = "neon")]
pub unsafe fn pvq_split_neon(x: &[f64], abs_x: &mut [f32], signx: &mut [i32]) {
    let n = x.len();
    debug_assert!(abs_x.len() >= n && signx.len() >= n);
    let zero = vdupq_n_f64(0.0);
    let mut j = 0usize;
    while j + 2 <= n {
        let v = vld1q_f64(x.as_ptr().add(j));
        let m = vcltq_f64(v, zero);
        signx[j] = (vgetq_lane_u64::<0>(m) & 1) as i32;
        signx[j + 1] = (vgetq_lane_u64::<1>(m) & 1) as i32;
        let a = vcvt_f32_f64(vabsq_f64(v));
        vst1_f32(abs_x.as_mut_ptr().add(j), a);
        j += 2;
    }
    if j < n {
        signx[j] = (x[j] < 0.0) as i32;
        abs_x[j] = x[j].abs() as f32;
    }
}

#[target_feature(enable = "neon")]
pub unsafe fn exp_rotation1_neon(x: &mut [f64], c: f64, s: f64) {
    let len = x.len();
    if len < 3 {
        return;
    }
    let ms = -s;
    let p = x.as_mut_ptr();

    let end = len - 2;
    let mut i = 0usize;
    while i + 2 <= end {
        let lo = vld1q_f64(p.add(i));
        let hi = vld1q_f64(p.add(i + 2));
        let nhi = vfmaq_n_f64(vmulq_n_f64(lo, s), hi, c);
        let nlo = vfmaq_n_f64(vmulq_n_f64(hi, ms), lo, c);
        vst1q_f64(p.add(i + 2), nhi);
        vst1q_f64(p.add(i), nlo);
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
        let lo = vld1q_f64(p.add(j));
        let hi = vld1q_f64(p.add(j + 2));
        let nhi = vfmaq_n_f64(vmulq_n_f64(lo, s), hi, c);
        let nlo = vfmaq_n_f64(vmulq_n_f64(hi, ms), lo, c);
        vst1q_f64(p.add(j + 2), nhi);
        vst1q_f64(p.add(j), nlo);
        i -= 2;
    }
    if i == 0 {
        let x1 = x[0];
        let x2 = x[2];
        x[2] = c.mul_add(x2, s * x1);
        x[0] = c.mul_add(x1, ms * x2);
    }
}
