//! IMDCT rotation stages.
//!
//! The inverse MDCT is computed as an N/4-point complex FFT wrapped in two
//! twiddle rotations. The rotations are the kernels here; the FFT and the
//! trig/bitrev tables come from [`plan`](crate::plan), and windowing/overlap
//! belongs to the caller.

use num_complex::Complex32;

/// IMDCT pre-rotation.
///
/// Reads the half-length real spectrum at the even forward positions `2i`
/// and the mirrored odd positions `n2 - 1 - 2i`, narrows to single
/// precision, and rotates each pair by `(trig[i], trig[n4 + i])` into the
/// FFT input at position `i` (natural order; the bit-reversal scatter is
/// the transform driver's job).
///
/// `spectrum` must hold at least `n2` values, `trig` at least `n2`, `fout`
/// exactly `n4`, with `n2 == 2 * n4`.
pub fn imdct_pre_rotate(
    spectrum: &[f64],
    trig: &[f32],
    fout: &mut [Complex32],
    n2: usize,
    n4: usize,
) {
    debug_assert_eq!(n2, 2 * n4);
    debug_assert!(spectrum.len() >= n2);
    debug_assert!(trig.len() >= n2);
    debug_assert_eq!(fout.len(), n4);

    for i in 0..n4 {
        let xe = spectrum[2 * i] as f32;
        let xo = spectrum[n2 - 1 - 2 * i] as f32;
        let t0 = trig[i];
        let t1 = trig[n4 + i];
        let yr = xo * t0 + xe * t1;
        let yi = xe * t0 - xo * t1;
        fout[i] = Complex32::new(yr, yi);
    }
}

/// IMDCT post-rotation, in place over the FFT output viewed as `2 * n4`
/// interleaved scalars.
///
/// Walks the forward offset `i` and the mirrored backward offset
/// `n4 - 1 - i` simultaneously, rotating the forward sample by
/// `(trig[i], trig[n4 + i])` and the backward one by
/// `(trig[n4 - i - 1], trig[n2 - i - 1])`, cross-writing the imaginary
/// halves. The backward sample is loaded before the forward result is
/// stored: at the midpoint (odd `n4`) both offsets alias the same pair.
pub fn imdct_post_rotate(buf: &mut [f32], trig: &[f32], n4: usize) {
    let n2 = 2 * n4;
    debug_assert_eq!(buf.len(), n2);
    debug_assert!(trig.len() >= n2);

    for i in 0..(n4 + 1) / 2 {
        let f = 2 * i;
        let b = n2 - 2 - 2 * i;

        let re = buf[f];
        let im = buf[f + 1];
        let t0 = trig[i];
        let t1 = trig[n4 + i];
        let yr = re * t0 + im * t1;
        let yi = re * t1 - im * t0;

        let re = buf[b];
        let im = buf[b + 1];
        buf[f] = yr;
        buf[b + 1] = yi;

        let t0 = trig[n4 - i - 1];
        let t1 = trig[n2 - i - 1];
        let yr = re * t0 + im * t1;
        let yi = re * t1 - im * t0;
        buf[b] = yr;
        buf[f + 1] = yi;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::plan::imdct_trig;

    #[test]
    fn pre_rotate_is_an_isometry_per_pair() {
        // Each output pair is a rotation of the (odd, even) input pair, so
        // the two-norms must match to narrowed precision.
        let n = 64;
        let (n2, n4) = (n / 2, n / 4);
        let trig = imdct_trig(n).unwrap();
        let spectrum: Vec<f64> = (0..n2).map(|i| (i as f64 * 0.37).sin()).collect();
        let mut fout = vec![Complex32::new(0.0, 0.0); n4];
        imdct_pre_rotate(&spectrum, &trig, &mut fout, n2, n4);
        for i in 0..n4 {
            let xe = spectrum[2 * i] as f32;
            let xo = spectrum[n2 - 1 - 2 * i] as f32;
            let want = (xe * xe + xo * xo) as f64;
            let got = (fout[i].re * fout[i].re + fout[i].im * fout[i].im) as f64;
            assert!((want - got).abs() < 1e-5, "pair {i}: {want} vs {got}");
        }
    }

    #[test]
    fn post_rotate_midpoint_aliasing() {
        // Odd n4: the middle complex pair is its own mirror and must be
        // rotated from its original value, not from a half-written one.
        let n4 = 5usize;
        let n2 = 2 * n4;
        let trig = imdct_trig(2 * n2).unwrap();
        let mut buf: Vec<f32> = (0..n2).map(|i| i as f32 + 1.0).collect();
        let orig = buf.clone();
        imdct_post_rotate(&mut buf, &trig, n4);

        let mid = n4 / 2;
        let (re, im) = (orig[2 * mid], orig[2 * mid + 1]);
        // Forward rotation result for the midpoint, from pristine inputs.
        let t0 = trig[mid];
        let t1 = trig[n4 + mid];
        let yr = re * t0 + im * t1;
        // Backward rotation of the same (pristine) pair.
        let t0b = trig[n4 - mid - 1];
        let t1b = trig[n2 - mid - 1];
        let yi = re * t1b - im * t0b;
        assert_eq!(buf[2 * mid], yr);
        assert_eq!(buf[2 * mid + 1], yi);
    }
}
