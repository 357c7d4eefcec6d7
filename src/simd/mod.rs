//! Per-kernel SIMD dispatch.
//!
//! Every function here takes the caller's [`Arch`] and either forwards to
//! an accelerated backend or falls back to the scalar implementation. The
//! backends are required to be bit-identical to the scalar paths, so
//! dispatch is purely a speed decision.

use crate::arch::Arch;

#[cfg(any(target_arch = "x86", target_arch = "x86_64"))]
mod x86;

#[cfg(target_arch = "aarch64")]
mod aarch64;

#[inline(always)]
pub fn xcorr_kernel(x: &[f64], y: &[f64], sum: &mut [f32; 4], len: usize, arch: Arch) {
    #[cfg(any(target_arch = "x86", target_arch = "x86_64"))]
    if arch.has_sse2() {
        return unsafe { x86::xcorr_kernel_sse2(x, y, sum, len) };
    }
    #[cfg(target_arch = "aarch64")]
    if arch.has_neon() {
        return unsafe { aarch64::xcorr_kernel_neon(x, y, sum, len) };
    }
    let _ = arch;
    crate::pitch::xcorr_kernel_scalar(x, y, sum, len)
}

#[inline(always)]
pub fn inner_prod(x: &[f64], y: &[f64], n: usize, arch: Arch) -> f64 {
    #[cfg(any(target_arch = "x86", target_arch = "x86_64"))]
    if arch.has_sse2() {
        return unsafe { x86::inner_prod_sse2(x, y, n) };
    }
    #[cfg(target_arch = "aarch64")]
    if arch.has_neon() {
        return unsafe { aarch64::inner_prod_neon(x, y, n) };
    }
    let _ = arch;
    crate::pitch::inner_prod_scalar(x, y, n)
}

#[inline(always)]
pub fn dual_inner_prod(x: &[f64], y01: &[f64], y02: &[f64], n: usize, arch: Arch) -> (f64, f64) {
    #[cfg(any(target_arch = "x86", target_arch = "x86_64"))]
    if arch.has_sse2() {
        return unsafe { x86::dual_inner_prod_sse2(x, y01, y02, n) };
    }
    #[cfg(target_arch = "aarch64")]
    if arch.has_neon() {
        return unsafe { aarch64::dual_inner_prod_neon(x, y01, y02, n) };
    }
    let _ = arch;
    crate::pitch::dual_inner_prod_scalar(x, y01, y02, n)
}

#[inline(always)]
pub fn sum_sqr(x: &[f64], arch: Arch) -> f64 {
    #[cfg(any(target_arch = "x86", target_arch = "x86_64"))]
    if arch.has_sse2() {
        return unsafe { x86::sum_sqr_sse2(x) };
    }
    #[cfg(target_arch = "aarch64")]
    if arch.has_neon() {
        return unsafe { aarch64::sum_sqr_neon(x) };
    }
    let _ = arch;
    crate::energy::sum_sqr_scalar(x)
}

#[inline(always)]
pub fn pair_energy(x: &[f64], out: &mut [f32], arch: Arch) -> f64 {
    #[cfg(any(target_arch = "x86", target_arch = "x86_64"))]
    if arch.has_sse2() {
        return unsafe { x86::pair_energy_sse2(x, out) };
    }
    #[cfg(target_arch = "aarch64")]
    if arch.has_neon() {
        return unsafe { aarch64::pair_energy_neon(x, out) };
    }
    let _ = arch;
    crate::energy::pair_energy_scalar(x, out)
}

// The rotation wants FMA, which on x86 is only advertised alongside AVX2
// in the feature probe. Plain SSE2 machines take the scalar path.
#[inline(always)]
pub fn exp_rotation1(x: &mut [f64], c: f64, s: f64, arch: Arch) {
    #[cfg(any(target_arch = "x86", target_arch = "x86_64"))]
    if arch.has_avx2() {
        return unsafe { x86::exp_rotation1_fma(x, c, s) };
    }
    #[cfg(target_arch = "aarch64")]
    if arch.has_neon() {
        return unsafe { aarch64::exp_rotation1_neon(x, c, s) };
    }
    let _ = arch;
    crate::vq::exp_rotation1_scalar(x, c, s)
}

#[inline(always)]
pub fn pvq_split(x: &[f64], abs_x: &mut [f32], signx: &mut [i32], arch: Arch) {
    #[cfg(any(target_arch = "x86", target_arch = "x86_64"))]
    if arch.has_sse2() {
        return unsafe { x86::pvq_split_sse2(x, abs_x, signx) };
    }
    #[cfg(target_arch = "aarch64")]
    if arch.has_neon() {
        return unsafe { aarch64::pvq_split_neon(x, abs_x, signx) };
    }
    let _ = arch;
    crate::vq::pvq_split_scalar(x, abs_x, signx)
}
