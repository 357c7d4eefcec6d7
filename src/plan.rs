//! Transform configuration: FFT factorization, twiddle and bit-reversal
//! tables, and the IMDCT trig table.
//!
//! The kernels themselves ([`kiss_fft`](crate::kiss_fft),
//! [`mdct`](crate::mdct)) never allocate and never validate; everything
//! size-dependent is computed here, once, outside the hot path. Unsupported
//! sizes are reported through [`PlanError`] instead of being silently
//! miscomputed.

use num_complex::Complex32;
use num_traits::Zero;
use thiserror::Error;

use crate::kiss_fft::fft_impl;

/// Supported factor count ceiling; enough for every size with prime factors
/// in {2, 3, 5} up to [`MAX_NFFT`].
const MAX_FACTORS: usize = 8;

/// Bit-reversal entries are `i16`, which bounds the transform size.
const MAX_NFFT: usize = i16::MAX as usize;

/// Configuration errors reported by the plan layer.
#[derive(Debug, Error, Clone, Copy, PartialEq, Eq)]
pub enum PlanError {
    /// The size has a prime factor larger than 5, or needs more than
    /// [`MAX_FACTORS`] stages.
    #[error("transform size {0} is not factorable into radices 2/3/4/5")]
    UnsupportedSize(usize),
    /// The size is zero or exceeds the bit-reversal table range.
    #[error("transform size {0} is out of range")]
    OutOfRange(usize),
    /// IMDCT trig tables require the full transform length to be a multiple
    /// of 4.
    #[error("mdct size {0} is not a multiple of 4")]
    NotMultipleOfFour(usize),
}

/// A mixed-radix FFT plan: factor list, bit-reversal table and twiddles for
/// one transform size.
///
/// The plan owns its tables; kernels only borrow them. Plans are immutable
/// after construction and safe to share across threads.
#[derive(Debug, Clone, PartialEq)]
pub struct FftPlan {
    nfft: usize,
    factors: [(i32, i32); MAX_FACTORS],
    bitrev: Vec<i16>,
    twiddles: Vec<Complex32>,
}

impl FftPlan {
    /// Build a plan for an `nfft`-point forward transform.
    ///
    /// Factorization prefers radix 4, then 2, 3 and 5; sizes with any other
    /// prime factor are rejected.
    pub fn new(nfft: usize) -> Result<Self, PlanError> {
        if nfft == 0 || nfft > MAX_NFFT {
            return Err(PlanError::OutOfRange(nfft));
        }
        let (factors, stages) = kf_factor(nfft)?;

        let mut bitrev = vec![0i16; nfft];
        if stages > 0 {
            compute_bitrev_table(0, &mut bitrev, 0, 1, 1, &factors[..stages]);
        }

        // Twiddles in double precision, narrowed once.
        let mut twiddles = Vec::with_capacity(nfft);
        for i in 0..nfft {
            let phase = -2.0 * std::f64::consts::PI / nfft as f64 * i as f64;
            twiddles.push(Complex32::new(phase.cos() as f32, phase.sin() as f32));
        }

        Ok(Self {
            nfft,
            factors,
            bitrev,
            twiddles,
        })
    }

    /// Transform size.
    #[inline]
    pub fn nfft(&self) -> usize {
        self.nfft
    }

    /// Twiddle table (`exp(-2πik/nfft)`, `k` in `[0, nfft)`).
    #[inline]
    pub fn twiddles(&self) -> &[Complex32] {
        &self.twiddles
    }

    /// Bit-reversal scatter table.
    #[inline]
    pub fn bitrev(&self) -> &[i16] {
        &self.bitrev
    }

    /// Stage factor list as `(radix, m)` pairs, innermost last.
    #[inline]
    pub fn factors(&self) -> &[(i32, i32); MAX_FACTORS] {
        &self.factors
    }

    /// Forward FFT: bit-reversal scatter of `fin` into `fout`, then the
    /// in-place stage composition. No scaling is applied.
    ///
    /// Both buffers must be exactly `nfft` long.
    pub fn fft_into(&self, fin: &[Complex32], fout: &mut [Complex32]) {
        debug_assert_eq!(fin.len(), self.nfft);
        debug_assert_eq!(fout.len(), self.nfft);
        for (&x, &br) in fin.iter().zip(self.bitrev.iter()) {
            fout[br as usize] = x;
        }
        fft_impl(fout, &self.factors, &self.twiddles);
    }

    /// In-place stage composition over an already bit-reversed buffer.
    pub fn fft_in_place(&self, fout: &mut [Complex32]) {
        debug_assert_eq!(fout.len(), self.nfft);
        fft_impl(fout, &self.factors, &self.twiddles);
    }
}

/// Factor `n` into the supported radices.
///
/// Prefers radix 4 over 2, and when a lone factor of 2 remains after several
/// stages, swaps it toward the outer position so the radix-2 kernel only ever
/// sees its `m == 1` and `m == 4` forms.
fn kf_factor(nfft: usize) -> Result<([(i32, i32); MAX_FACTORS], usize), PlanError> {
    let mut facbuf = [(0i32, 0i32); MAX_FACTORS];
    let mut p = 4i32;
    let mut n = nfft as i32;
    let mut stages = 0usize;

    while n > 1 {
        while n % p != 0 {
            p = match p {
                4 => 2,
                2 => 3,
                _ => p + 2,
            };
            if p > 32000 || p * p > n {
                p = n;
            }
        }
        n /= p;
        if p > 5 || stages >= MAX_FACTORS {
            return Err(PlanError::UnsupportedSize(nfft));
        }
        facbuf[stages].0 = p;
        if p == 2 && stages > 1 {
            facbuf[stages].0 = 4;
            facbuf[1].0 = 2;
        }
        stages += 1;
    }

    for i in 0..stages / 2 {
        let tmp = facbuf[i].0;
        facbuf[i].0 = facbuf[stages - i - 1].0;
        facbuf[stages - i - 1].0 = tmp;
    }

    let mut n = nfft as i32;
    for pair in facbuf.iter_mut().take(stages) {
        n /= pair.0;
        pair.1 = n;
    }

    Ok((facbuf, stages))
}

/// Fill the bit-reversal table by factor recursion.
///
/// `fout` is the output index being assigned, `f_idx` the write position in
/// `bitrev`, stepped by `fstride * in_stride` at each level.
fn compute_bitrev_table(
    fout: i32,
    bitrev: &mut [i16],
    mut f_idx: i32,
    fstride: i32,
    in_stride: i32,
    factors: &[(i32, i32)],
) {
    let (p, m) = factors[0];
    let step = fstride * in_stride;

    if m == 1 {
        for j in 0..p {
            if f_idx >= 0 && (f_idx as usize) < bitrev.len() {
                bitrev[f_idx as usize] = (fout + j) as i16;
            }
            f_idx += step;
        }
        return;
    }

    let mut fout = fout;
    for _ in 0..p {
        compute_bitrev_table(fout, bitrev, f_idx, fstride * p, in_stride, &factors[1..]);
        f_idx += step;
        fout += m;
    }
}

/// Build the IMDCT rotation table for a full transform length `n`.
///
/// The table has `n/2` entries: the first `n/4` hold
/// `cos(2π(i + 0.125)/n)`, the second `n/4` the matching sines. Values are
/// computed in double precision and narrowed once, so every backend reads
/// identical twiddles.
pub fn imdct_trig(n: usize) -> Result<Vec<f32>, PlanError> {
    if n == 0 || n % 4 != 0 {
        return Err(PlanError::NotMultipleOfFour(n));
    }
    let n4 = n / 4;
    let mut trig = vec![0.0f32; 2 * n4];
    for i in 0..n4 {
        let phase = 2.0 * std::f64::consts::PI * (i as f64 + 0.125) / n as f64;
        trig[i] = phase.cos() as f32;
        trig[n4 + i] = phase.sin() as f32;
    }
    Ok(trig)
}

/// Scratch buffers for the composed IMDCT half-signal reconstruction in
/// [`imdct_half_into`]. Reused across frames by callers.
#[derive(Debug, Clone, Default)]
pub struct ImdctScratch {
    fft_in: Vec<Complex32>,
}

/// Composed IMDCT core: pre-rotation, N/4 complex FFT, post-rotation.
///
/// `spectrum` holds `n2` frequency samples; `buf` receives the `n2` rotated
/// time-domain values (the caller owns windowing/overlap). `trig` must come
/// from [`imdct_trig`] for `n = 2 * n2`, and `plan` must be an `n2 / 2`-point
/// plan.
pub fn imdct_half_into(
    plan: &FftPlan,
    trig: &[f32],
    spectrum: &[f64],
    buf: &mut [f32],
    scratch: &mut ImdctScratch,
) {
    let n2 = buf.len();
    let n4 = n2 / 2;
    debug_assert_eq!(plan.nfft(), n4);
    debug_assert_eq!(trig.len(), n2);
    debug_assert!(spectrum.len() >= n2);

    scratch.fft_in.clear();
    scratch.fft_in.resize(n4, Complex32::zero());
    crate::mdct::imdct_pre_rotate(spectrum, trig, &mut scratch.fft_in, n2, n4);

    let fout: &mut [Complex32] = bytemuck::cast_slice_mut(buf);
    plan.fft_into(&scratch.fft_in, fout);

    crate::mdct::imdct_post_rotate(buf, trig, n4);
}

#[cfg(test)]
mod tests {
    use super::*;

    fn stage_count(factors: &[(i32, i32)]) -> usize {
        factors.iter().take_while(|&&(p, _)| p != 0).count()
    }

    #[test]
    fn factorization_products() {
        for &n in &[4, 8, 12, 15, 16, 20, 36, 60, 64, 100, 120, 240, 480, 960] {
            let plan = FftPlan::new(n).unwrap();
            let stages = stage_count(plan.factors());
            let product: i32 = plan.factors()[..stages].iter().map(|&(p, _)| p).product();
            assert_eq!(product as usize, n, "nfft={n}");
            // m values descend by the stage radix down to 1.
            assert_eq!(plan.factors()[stages - 1].1, 1, "nfft={n}");
        }
    }

    #[test]
    fn rejects_large_primes() {
        for &n in &[7, 14, 22, 39, 77, 481] {
            assert_eq!(
                FftPlan::new(n).unwrap_err(),
                PlanError::UnsupportedSize(n),
                "nfft={n}"
            );
        }
        assert_eq!(FftPlan::new(0).unwrap_err(), PlanError::OutOfRange(0));
    }

    #[test]
    fn bitrev_is_a_permutation() {
        for &n in &[15, 60, 480] {
            let plan = FftPlan::new(n).unwrap();
            let mut seen = vec![false; n];
            for &b in plan.bitrev() {
                assert!(!seen[b as usize]);
                seen[b as usize] = true;
            }
            assert!(seen.iter().all(|&s| s));
        }
    }

    #[test]
    fn trig_table_halves() {
        let trig = imdct_trig(480).unwrap();
        assert_eq!(trig.len(), 240);
        for i in 0..120 {
            let phase = 2.0 * std::f64::consts::PI * (i as f64 + 0.125) / 480.0;
            assert_eq!(trig[i], phase.cos() as f32);
            assert_eq!(trig[120 + i], phase.sin() as f32);
        }
        assert!(imdct_trig(30).is_err());
        assert!(imdct_trig(0).is_err());
    }
}
