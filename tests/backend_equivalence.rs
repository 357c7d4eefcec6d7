//! Bit-exactness of the detected backend against the scalar path for the
//! composite kernels, across lengths covering every vector remainder.

mod test_common;

use celt_dsp::arch::{detected, Arch};
use celt_dsp::{energy, pitch};
use test_common::{TestRng, TEST_LENGTHS};

#[test]
fn pitch_xcorr_is_bit_identical() {
    let arch = detected();
    let mut rng = TestRng::new(1);
    for &len in TEST_LENGTHS {
        for &max_lag in &[0usize, 1, 2, 3, 4, 5, 7, 8, 9, 16, 25] {
            let x = rng.signal(len + max_lag.saturating_sub(1).max(3));
            let y = rng.signal(len);
            let mut out_scalar = vec![f64::NAN; max_lag];
            let mut out_dispatch = vec![f64::NAN; max_lag];
            pitch::pitch_xcorr_scalar(&x, &y, &mut out_scalar, len);
            pitch::pitch_xcorr(&x, &y, &mut out_dispatch, len, arch);
            for l in 0..max_lag {
                assert_eq!(
                    out_scalar[l].to_bits(),
                    out_dispatch[l].to_bits(),
                    "len={len} max_lag={max_lag} l={l}"
                );
            }
        }
    }
}

#[test]
fn pitch_xcorr_scalar_arch_agrees_with_scalar_driver() {
    let mut rng = TestRng::new(9);
    for &len in &[3usize, 8, 100, 240] {
        let max_lag = 11;
        let x = rng.signal(len + max_lag);
        let y = rng.signal(len);
        let mut a = vec![0.0f64; max_lag];
        let mut b = vec![0.0f64; max_lag];
        pitch::pitch_xcorr_scalar(&x, &y, &mut a, len);
        pitch::pitch_xcorr(&x, &y, &mut b, len, Arch::Scalar);
        assert_eq!(a, b, "len={len}");
    }
}

#[test]
fn autocorr_lag_zero_equals_sum_sqr() {
    let arch = detected();
    let mut rng = TestRng::new(3);
    for &n in TEST_LENGTHS {
        let x = rng.signal(n);
        let mut ac = [0.0f64; 5];
        pitch::autocorr5(&x, &mut ac, n, arch);
        assert_eq!(
            ac[0].to_bits(),
            energy::sum_sqr(&x, arch).to_bits(),
            "n={n}"
        );
    }
}

#[test]
fn autocorr_is_bit_identical_across_backends() {
    let arch = detected();
    let mut rng = TestRng::new(4);
    for &n in TEST_LENGTHS {
        let x = rng.signal(n);
        let mut ac_scalar = [0.0f64; 5];
        let mut ac_dispatch = [0.0f64; 5];
        pitch::autocorr5(&x, &mut ac_scalar, n, Arch::Scalar);
        pitch::autocorr5(&x, &mut ac_dispatch, n, arch);
        for k in 0..5 {
            assert_eq!(
                ac_scalar[k].to_bits(),
                ac_dispatch[k].to_bits(),
                "n={n} k={k}"
            );
        }
    }
}
