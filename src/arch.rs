//! CPU architecture detection and SIMD dispatch support.
//!
//! Detection happens once per process via [`detected()`] (or explicitly via
//! [`select_arch()`] at init time), and the result is threaded through all
//! kernel dispatch calls. There is no runtime re-selection: the dispatcher is
//! stateless apart from this one read-only value.

use std::sync::OnceLock;

/// CPU architecture level for SIMD dispatch.
///
/// Variants are platform-gated: x86 ISA variants only exist on x86/x86_64,
/// ARM variants only on aarch64. [`Scalar`](Arch::Scalar) is always available
/// and every accelerated path produces bit-identical results to it.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Arch {
    /// No SIMD — portable scalar fallback. All platforms.
    #[default]
    Scalar,

    // -- x86 / x86_64 --
    /// x86 SSE2 (128-bit SIMD, baseline for the f64→f32 narrowing kernels).
    #[cfg(any(target_arch = "x86", target_arch = "x86_64"))]
    Sse2,
    /// x86 AVX2 + FMA (required by the f64 Givens rotation path).
    #[cfg(any(target_arch = "x86", target_arch = "x86_64"))]
    Avx2,

    // -- aarch64 --
    /// ARM NEON (128-bit SIMD, always available on aarch64).
    #[cfg(target_arch = "aarch64")]
    Neon,
}

impl Arch {
    /// True for SSE2 or higher (x86).
    #[cfg(any(target_arch = "x86", target_arch = "x86_64"))]
    #[inline]
    pub fn has_sse2(self) -> bool {
        matches!(self, Self::Sse2 | Self::Avx2)
    }

    /// True for AVX2 + FMA (x86).
    #[cfg(any(target_arch = "x86", target_arch = "x86_64"))]
    #[inline]
    pub fn has_avx2(self) -> bool {
        matches!(self, Self::Avx2)
    }

    /// True for NEON (aarch64).
    #[cfg(target_arch = "aarch64")]
    #[inline]
    pub fn has_neon(self) -> bool {
        matches!(self, Self::Neon)
    }
}

/// Detect the highest supported SIMD architecture at runtime.
///
/// Called once at init; the result is stored and passed through dispatch
/// calls. Use [`detected()`] for the memoized process-wide value.
///
/// When the `simd` feature is disabled, always returns [`Arch::Scalar`].
// AVX2 alone is not enough: the f64 rotation path emits FMA instructions
// to match the scalar mul_add contract.
#[cfg(all(feature = "simd", any(target_arch = "x86", target_arch = "x86_64")))]
cpufeatures::new!(detect_avx2_fma, "avx2", "fma");
#[cfg(all(feature = "simd", any(target_arch = "x86", target_arch = "x86_64")))]
cpufeatures::new!(detect_sse2, "sse2");

#[cfg(feature = "simd")]
pub fn select_arch() -> Arch {
    #[cfg(any(target_arch = "x86", target_arch = "x86_64"))]
    {
        if detect_avx2_fma::get() {
            return Arch::Avx2;
        }
        if detect_sse2::get() {
            return Arch::Sse2;
        }
        return Arch::Scalar;
    }

    #[cfg(target_arch = "aarch64")]
    {
        // NEON is architecturally guaranteed on aarch64; the detection macro
        // keeps the unusual no-NEON targets honest.
        if std::arch::is_aarch64_feature_detected!("neon") {
            return Arch::Neon;
        }
        return Arch::Scalar;
    }

    #[allow(unreachable_code)]
    Arch::Scalar
}

/// When the `simd` feature is disabled, always returns [`Arch::Scalar`].
#[cfg(not(feature = "simd"))]
pub fn select_arch() -> Arch {
    Arch::Scalar
}

static DETECTED: OnceLock<Arch> = OnceLock::new();

/// Process-wide memoized [`select_arch()`] result.
///
/// Initialized on first call, immutable thereafter. Kernels take an explicit
/// [`Arch`] argument so tests can force any backend; production callers pass
/// this value.
pub fn detected() -> Arch {
    *DETECTED.get_or_init(select_arch)
}
