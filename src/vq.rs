//! Spread rotation and pyramid vector quantization kernels.
//!
//! The rotation works in full double precision with fused multiply-adds;
//! the pulse search keeps its running correlation and energy in single
//! precision like the other kernels.

use crate::arch::Arch;

/// Per-spread-level denominator factors for [`spread_angle`], ordered from
/// lightest to heaviest spreading.
pub const SPREAD_FACTOR: [i32; 3] = [15, 10, 5];

/// Dispatch wrapper for `exp_rotation1`.
#[cfg(feature = "simd")]
#[inline]
pub fn exp_rotation1(x: &mut [f64], c: f64, s: f64, arch: Arch) {
    crate::simd::exp_rotation1(x, c, s, arch)
}

/// Dispatch wrapper for `exp_rotation1` (scalar-only build).
#[cfg(not(feature = "simd"))]
#[inline]
pub fn exp_rotation1(x: &mut [f64], c: f64, s: f64, _arch: Arch) {
    exp_rotation1_scalar(x, c, s)
}

/// Search setup: splits `x` into magnitudes and sign flags and clears the
/// pulse state. `abs_x[j] = |x[j]|` narrowed to `f32`, `signx[j] = 1` when
/// `x[j]` is negative, else 0; `y` and `iy` come back zeroed, ready for
/// [`op_pvq_search`].
#[inline]
pub fn pvq_decompose(
    x: &[f64],
    abs_x: &mut [f32],
    signx: &mut [i32],
    y: &mut [f32],
    iy: &mut [i32],
    arch: Arch,
) {
    y[..x.len()].fill(0.0);
    iy[..x.len()].fill(0);
    #[cfg(feature = "simd")]
    crate::simd::pvq_split(x, abs_x, signx, arch);
    #[cfg(not(feature = "simd"))]
    {
        let _ = arch;
        pvq_split_scalar(x, abs_x, signx);
    }
}

/// In-place Givens rotation cascade at stride 2.
///
/// A forward pass rotates each pair `(x[i], x[i+2])` for ascending `i`,
/// then a backward pass applies the same `(c, s)` rotation to descending
/// pairs starting at `i = len - 5`. Both passes fuse the leading multiply
/// into the add, so accelerated backends must use FMA as well. Slices
/// shorter than 3 are left untouched.
pub fn exp_rotation1_scalar(x: &mut [f64], c: f64, s: f64) {
    let len = x.len();
    if len < 3 {
        return;
    }
    let ms = -s;
    for i in 0..len - 2 {
        let x1 = x[i];
        let x2 = x[i + 2];
        x[i + 2] = c.mul_add(x2, s * x1);
        x[i] = c.mul_add(x1, ms * x2);
    }
    let mut i = len as i32 - 5;
    while i >= 0 {
        let j = i as usize;
        let x1 = x[j];
        let x2 = x[j + 2];
        x[j + 2] = c.mul_add(x2, s * x1);
        x[j] = c.mul_add(x1, ms * x2);
        i -= 1;
    }
}

/// Rotation angle for a band of `len` samples carrying `k` pulses.
///
/// The gain shrinks as pulses accumulate, so heavily coded bands are
/// rotated less. The cosine/sine pair is evaluated in single precision
/// before widening, matching the reference tables.
pub fn spread_angle(len: usize, k: usize, factor: i32) -> (f64, f64) {
    let gain = len as f32 / (len as i32 + factor * k as i32) as f32;
    let theta = 0.5 * gain * gain;
    let c = (0.5 * std::f32::consts::PI * theta).cos();
    let s = (0.5 * std::f32::consts::PI * theta).sin();
    (c as f64, s as f64)
}

/// Scalar magnitude/sign split behind [`pvq_decompose`].
#[inline]
pub fn pvq_split_scalar(x: &[f64], abs_x: &mut [f32], signx: &mut [i32]) {
    for j in 0..x.len() {
        signx[j] = (x[j] < 0.0) as i32;
        abs_x[j] = x[j].abs() as f32;
    }
}

/// Greedy pulse placement maximizing correlation against energy.
///
/// Places `pulses_left` unit pulses one at a time; each placement picks the
/// position `j` maximizing `(xy + abs_x[j])^2 / (yy + 1 + y[j])`, compared
/// cross-multiplied so no division happens in the loop. Ties go to the
/// lowest index. `y` holds twice the pulse counts so `yy + 1 + y[j]` is the
/// candidate energy directly; both `y` and `iy` are updated in place.
///
/// Returns the updated `(xy, yy)` accumulators; with `n <= 0` or no pulses
/// they come back unchanged.
pub fn op_pvq_search(
    abs_x: &[f32],
    y: &mut [f32],
    iy: &mut [i32],
    xy: f64,
    yy: f64,
    n: i32,
    pulses_left: i32,
) -> (f64, f64) {
    if n <= 0 || pulses_left <= 0 {
        return (xy, yy);
    }
    let n = n as usize;
    let mut xy = xy as f32;
    let mut yy = yy as f32;
    for _ in 0..pulses_left {
        let mut best_id = 0usize;
        let mut best_num: f32 = -1e15;
        let mut best_den: f32 = 0.0;
        yy += 1.0;
        for j in 0..n {
            let rxy = xy + abs_x[j];
            let ryy = yy + y[j];
            let rxy2 = rxy * rxy;
            if best_den * rxy2 > ryy * best_num {
                best_den = ryy;
                best_num = rxy2;
                best_id = j;
            }
        }
        xy += abs_x[best_id];
        yy += y[best_id];
        y[best_id] += 2.0;
        iy[best_id] += 1;
    }
    (xy as f64, yy as f64)
}

/// Re-applies the signs captured by [`pvq_decompose`] onto the pulse
/// counts: entries with `signx[j] == 1` are negated branch-free.
#[inline]
pub fn pvq_restore_signs(signx: &[i32], iy: &mut [i32]) {
    for j in 0..signx.len() {
        iy[j] = (iy[j] ^ -signx[j]) + signx[j];
    }
}
