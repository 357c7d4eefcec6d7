//! Mixed-radix FFT butterfly kernels.
//!
//! Each butterfly computes one stage in place over a buffer of complex
//! samples; a full transform is the composition of stages driven by
//! [`fft_impl`] from a [`FftPlan`](crate::plan::FftPlan) factor list.
//!
//! Twiddle multiplies are written in explicit two-step multiply/add
//! component form. The compiler never contracts separate float operations
//! into FMAs, so every backend and every optimization level produces the
//! same bits.

use num_complex::Complex32;

/// One butterfly stage: `radix` complex samples at stride `m`, `n` groups
/// spaced `mm` apart, twiddles read at stride `fstride`.
///
/// Descriptors are caller-validated; the kernels do no bounds checking on
/// the hot path beyond what the driver guarantees.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FftStageDesc {
    pub radix: i32,
    pub m: i32,
    pub n: i32,
    pub mm: i32,
    pub fstride: usize,
}

/// Radix-2 butterfly.
///
/// `m == 1` is the unit-twiddle form: each pair `(a, b)` becomes
/// `(a + b, a - b)`. The only other shape the factorizer emits is `m == 4`,
/// a radix-2 directly after a radix-4 stage, where the accumulated twiddles
/// collapse to multiples of `1/sqrt(2)`.
pub fn kf_bfly2(fout: &mut [Complex32], m: i32, n: i32) {
    if m <= 0 || n <= 0 {
        return;
    }
    if m == 1 {
        debug_assert_eq!(fout.len(), n as usize * 2);
        for chunk in fout.chunks_exact_mut(2) {
            let a = chunk[0];
            let b = chunk[1];
            chunk[0] = a + b;
            chunk[1] = a - b;
        }
        return;
    }

    debug_assert_eq!(m, 4);
    debug_assert_eq!(fout.len(), n as usize * 8);
    let tw: f32 = std::f32::consts::FRAC_1_SQRT_2;
    for chunk in fout.chunks_exact_mut(8) {
        let (fout1, fout2) = chunk.split_at_mut(4);

        let t = fout2[0];
        fout2[0] = fout1[0] - t;
        fout1[0] += t;

        let t = Complex32::new(
            (fout2[1].re + fout2[1].im) * tw,
            (fout2[1].im - fout2[1].re) * tw,
        );
        fout2[1] = fout1[1] - t;
        fout1[1] += t;

        let t = Complex32::new(fout2[2].im, -fout2[2].re);
        fout2[2] = fout1[2] - t;
        fout1[2] += t;

        let t = Complex32::new(
            (fout2[3].im - fout2[3].re) * tw,
            -(fout2[3].im + fout2[3].re) * tw,
        );
        fout2[3] = fout1[3] - t;
        fout1[3] += t;
    }
}

/// Radix-4 butterfly.
pub fn kf_bfly4(fout: &mut [Complex32], fstride: usize, tw: &[Complex32], m: i32, n: i32, mm: i32) {
    if m <= 0 || n <= 0 {
        return;
    }
    if m == 1 {
        /* Degenerate case where all the twiddles are 1. */
        debug_assert_eq!(fout.len(), n as usize * 4);
        for chunk in fout.chunks_exact_mut(4) {
            let scratch0 = chunk[0] - chunk[2];
            let tmp = chunk[2];
            chunk[0] += tmp;
            let scratch1 = chunk[1] + chunk[3];
            chunk[2] = chunk[0] - scratch1;
            chunk[0] += scratch1;
            let scratch1 = chunk[1] - chunk[3];

            chunk[1] = Complex32::new(scratch0.re + scratch1.im, scratch0.im - scratch1.re);
            chunk[3] = Complex32::new(scratch0.re - scratch1.im, scratch0.im + scratch1.re);
        }
        return;
    }

    let m = m as usize;
    let m2 = 2 * m;
    let m3 = 3 * m;
    debug_assert!(fout.len() >= (n - 1) as usize * mm as usize + 4 * m);
    for i in 0..n as usize {
        let base = i * mm as usize;
        let mut tw1 = 0usize;
        let mut tw2 = 0usize;
        let mut tw3 = 0usize;
        for j in 0..m {
            let idx = base + j;
            unsafe {
                let a = *fout.get_unchecked(idx);
                let b1 = *fout.get_unchecked(idx + m);
                let b2 = *fout.get_unchecked(idx + m2);
                let b3 = *fout.get_unchecked(idx + m3);
                let w1 = *tw.get_unchecked(tw1);
                let w2 = *tw.get_unchecked(tw2);
                let w3 = *tw.get_unchecked(tw3);

                let s0r = b1.re * w1.re - b1.im * w1.im;
                let s0i = b1.re * w1.im + b1.im * w1.re;
                let s1r = b2.re * w2.re - b2.im * w2.im;
                let s1i = b2.re * w2.im + b2.im * w2.re;
                let s2r = b3.re * w3.re - b3.im * w3.im;
                let s2i = b3.re * w3.im + b3.im * w3.re;

                let s5r = a.re - s1r;
                let s5i = a.im - s1i;
                let mut f0r = a.re + s1r;
                let mut f0i = a.im + s1i;

                let s3r = s0r + s2r;
                let s3i = s0i + s2i;
                let s4r = s0r - s2r;
                let s4i = s0i - s2i;

                *fout.get_unchecked_mut(idx + m2) = Complex32::new(f0r - s3r, f0i - s3i);
                f0r += s3r;
                f0i += s3i;
                *fout.get_unchecked_mut(idx) = Complex32::new(f0r, f0i);

                *fout.get_unchecked_mut(idx + m) = Complex32::new(s5r + s4i, s5i - s4r);
                *fout.get_unchecked_mut(idx + m3) = Complex32::new(s5r - s4i, s5i + s4r);
            }
            tw1 += fstride;
            tw2 += fstride * 2;
            tw3 += fstride * 3;
        }
    }
}

/// Radix-3 butterfly.
pub fn kf_bfly3(fout: &mut [Complex32], fstride: usize, tw: &[Complex32], m: i32, n: i32, mm: i32) {
    if m <= 0 || n <= 0 {
        return;
    }
    let m = m as usize;
    let m2 = 2 * m;
    let epi3_im = tw[fstride * m].im;
    debug_assert!(fout.len() >= (n - 1) as usize * mm as usize + 3 * m);
    for i in 0..n as usize {
        let base = i * mm as usize;
        let mut tw1 = 0usize;
        let mut tw2 = 0usize;
        for j in 0..m {
            let idx = base + j;
            unsafe {
                let a = *fout.get_unchecked(idx);
                let b1 = *fout.get_unchecked(idx + m);
                let b2 = *fout.get_unchecked(idx + m2);
                let w1 = *tw.get_unchecked(tw1);
                let w2 = *tw.get_unchecked(tw2);

                let s1r = b1.re * w1.re - b1.im * w1.im;
                let s1i = b1.re * w1.im + b1.im * w1.re;
                let s2r = b2.re * w2.re - b2.im * w2.im;
                let s2i = b2.re * w2.im + b2.im * w2.re;

                let s3r = s1r + s2r;
                let s3i = s1i + s2i;
                let s0r = (s1r - s2r) * epi3_im;
                let s0i = (s1i - s2i) * epi3_im;

                let f1r = a.re - 0.5f32 * s3r;
                let f1i = a.im - 0.5f32 * s3i;

                *fout.get_unchecked_mut(idx) = Complex32::new(a.re + s3r, a.im + s3i);
                *fout.get_unchecked_mut(idx + m2) = Complex32::new(f1r + s0i, f1i - s0r);
                *fout.get_unchecked_mut(idx + m) = Complex32::new(f1r - s0i, f1i + s0r);
            }
            tw1 += fstride;
            tw2 += fstride * 2;
        }
    }
}

/// Radix-5 butterfly.
///
/// `ya` and `yb` are the fifth roots of unity read from the twiddle table;
/// their components are the two fixed constants derived from cos/sin of
/// 2π/5 that every backend must apply identically.
pub fn kf_bfly5(fout: &mut [Complex32], fstride: usize, tw: &[Complex32], m: i32, n: i32, mm: i32) {
    if m <= 0 || n <= 0 {
        return;
    }
    let ya = tw[fstride * m as usize];
    let yb = tw[fstride * m as usize * 2];
    let m = m as usize;
    let m2 = 2 * m;
    let m3 = 3 * m;
    let m4 = 4 * m;
    debug_assert!(fout.len() >= (n - 1) as usize * mm as usize + 5 * m);
    for i in 0..n as usize {
        let base = i * mm as usize;
        let mut tw1 = 0usize;
        let mut tw2 = 0usize;
        let mut tw3 = 0usize;
        let mut tw4 = 0usize;
        for u in 0..m {
            let idx = base + u;
            unsafe {
                let a = *fout.get_unchecked(idx);
                let b1 = *fout.get_unchecked(idx + m);
                let b2 = *fout.get_unchecked(idx + m2);
                let b3 = *fout.get_unchecked(idx + m3);
                let b4 = *fout.get_unchecked(idx + m4);
                let w1 = *tw.get_unchecked(tw1);
                let w2 = *tw.get_unchecked(tw2);
                let w3 = *tw.get_unchecked(tw3);
                let w4 = *tw.get_unchecked(tw4);

                let s1r = b1.re * w1.re - b1.im * w1.im;
                let s1i = b1.re * w1.im + b1.im * w1.re;
                let s2r = b2.re * w2.re - b2.im * w2.im;
                let s2i = b2.re * w2.im + b2.im * w2.re;
                let s3r = b3.re * w3.re - b3.im * w3.im;
                let s3i = b3.re * w3.im + b3.im * w3.re;
                let s4r = b4.re * w4.re - b4.im * w4.im;
                let s4i = b4.re * w4.im + b4.im * w4.re;

                let s7r = s1r + s4r;
                let s7i = s1i + s4i;
                let s10r = s1r - s4r;
                let s10i = s1i - s4i;
                let s8r = s2r + s3r;
                let s8i = s2i + s3i;
                let s9r = s2r - s3r;
                let s9i = s2i - s3i;

                *fout.get_unchecked_mut(idx) =
                    Complex32::new(a.re + (s7r + s8r), a.im + (s7i + s8i));

                let s5r = a.re + (s7r * ya.re + s8r * yb.re);
                let s5i = a.im + (s7i * ya.re + s8i * yb.re);
                let s6r = s10i * ya.im + s9i * yb.im;
                let s6i = -(s10r * ya.im + s9r * yb.im);
                *fout.get_unchecked_mut(idx + m) = Complex32::new(s5r - s6r, s5i - s6i);
                *fout.get_unchecked_mut(idx + m4) = Complex32::new(s5r + s6r, s5i + s6i);

                let s11r = a.re + (s7r * yb.re + s8r * ya.re);
                let s11i = a.im + (s7i * yb.re + s8i * ya.re);
                let s12r = s9i * ya.im - s10i * yb.im;
                let s12i = s10r * yb.im - s9r * ya.im;
                *fout.get_unchecked_mut(idx + m2) = Complex32::new(s11r + s12r, s11i + s12i);
                *fout.get_unchecked_mut(idx + m3) = Complex32::new(s11r - s12r, s11i - s12i);
            }
            tw1 += fstride;
            tw2 += fstride * 2;
            tw3 += fstride * 3;
            tw4 += fstride * 4;
        }
    }
}

/// Dispatch one stage described by `desc`. Unknown radices are ignored, as
/// are descriptors with non-positive `m` or `n`.
pub fn fft_stage(fout: &mut [Complex32], tw: &[Complex32], desc: &FftStageDesc) {
    match desc.radix {
        2 => kf_bfly2(fout, desc.m, desc.n),
        4 => kf_bfly4(fout, desc.fstride, tw, desc.m, desc.n, desc.mm),
        3 => kf_bfly3(fout, desc.fstride, tw, desc.m, desc.n, desc.mm),
        5 => kf_bfly5(fout, desc.fstride, tw, desc.m, desc.n, desc.mm),
        _ => {}
    }
}

/// In-place stage composition over an already bit-reversed buffer.
///
/// `factors` is `(radix, m)` pairs as produced by the plan factorizer,
/// zero-terminated when fewer than eight stages are used. Stages run from
/// the innermost (`m == 1`) factor outward.
pub fn fft_impl(fout: &mut [Complex32], factors: &[(i32, i32); 8], tw: &[Complex32]) {
    let mut fstride = [0i32; 9];
    fstride[0] = 1;

    let mut l = 0usize;
    while l < factors.len() {
        let (p, m) = factors[l];
        if p == 0 {
            break;
        }
        fstride[l + 1] = fstride[l] * p;
        l += 1;
        if m == 1 {
            break;
        }
    }
    if l == 0 {
        return;
    }

    let mut m = factors[l - 1].1;
    for i in (0..l).rev() {
        let m2 = if i > 0 { factors[i - 1].1 } else { 1 };
        let desc = FftStageDesc {
            radix: factors[i].0,
            m,
            n: fstride[i],
            mm: m2,
            fstride: fstride[i] as usize,
        };
        fft_stage(fout, tw, &desc);
        m = m2;
    }
}
