//! FFT accuracy against a direct double-precision DFT.
//!
//! The plan computes an unscaled forward transform; the inverse is run
//! through the usual conjugation trick and checked against the unscaled
//! conjugate DFT. SNR must exceed 60 dB for every supported size.

mod test_common;

use celt_dsp::FftPlan;
use num_complex::Complex32;
use test_common::TestRng;

const SIZES: &[usize] = &[4, 8, 12, 15, 16, 20, 36, 60, 64, 100, 120, 240, 480];

/// Reference DFT in f64, returning SNR of `output` against it in dB.
fn check_fft(input: &[Complex32], output: &[Complex32], nfft: usize, isinverse: bool) -> f64 {
    let mut errpow = 0.0f64;
    let mut sigpow = 0.0f64;

    for bin in 0..nfft {
        let mut ansr = 0.0f64;
        let mut ansi = 0.0f64;

        for k in 0..nfft {
            let phase = -2.0 * std::f64::consts::PI * bin as f64 * k as f64 / nfft as f64;
            let re = phase.cos();
            let im = if isinverse { -phase.sin() } else { phase.sin() };

            ansr += input[k].re as f64 * re - input[k].im as f64 * im;
            ansi += input[k].re as f64 * im + input[k].im as f64 * re;
        }

        let difr = ansr - output[bin].re as f64;
        let difi = ansi - output[bin].im as f64;
        errpow += difr * difr + difi * difi;
        sigpow += ansr * ansr + ansi * ansi;
    }

    10.0 * (sigpow / errpow).log10()
}

/// Inverse via conjugation: bit-reverse scatter, conjugate, forward stages,
/// conjugate again.
fn ifft(plan: &FftPlan, fin: &[Complex32], fout: &mut [Complex32]) {
    for (&x, &br) in fin.iter().zip(plan.bitrev().iter()) {
        fout[br as usize] = x.conj();
    }
    plan.fft_in_place(fout);
    for c in fout.iter_mut() {
        *c = c.conj();
    }
}

fn run(nfft: usize, isinverse: bool) {
    let plan = FftPlan::new(nfft).unwrap();
    let mut rng = TestRng::new(42);

    let mut input = vec![Complex32::new(0.0, 0.0); nfft];
    for c in input.iter_mut() {
        c.re = (rng.next_u32() % 32767) as f32 - 16384.0;
        c.im = (rng.next_u32() % 32767) as f32 - 16384.0;
    }

    let mut output = vec![Complex32::new(0.0, 0.0); nfft];
    if isinverse {
        ifft(&plan, &input, &mut output);
    } else {
        plan.fft_into(&input, &mut output);
    }

    let snr = check_fft(&input, &output, nfft, isinverse);
    assert!(snr > 60.0, "nfft={nfft} inverse={isinverse} snr={snr:.2} dB");
}

#[test]
fn forward_matches_reference_dft() {
    for &nfft in SIZES {
        run(nfft, false);
    }
}

#[test]
fn inverse_matches_reference_dft() {
    for &nfft in SIZES {
        run(nfft, true);
    }
}

#[test]
fn forward_then_inverse_recovers_input() {
    for &nfft in SIZES {
        let plan = FftPlan::new(nfft).unwrap();
        let mut rng = TestRng::new(7);
        let input: Vec<Complex32> = (0..nfft)
            .map(|_| {
                Complex32::new(
                    rng.next_sample() as f32,
                    rng.next_sample() as f32,
                )
            })
            .collect();

        let mut freq = vec![Complex32::new(0.0, 0.0); nfft];
        plan.fft_into(&input, &mut freq);
        let mut time = vec![Complex32::new(0.0, 0.0); nfft];
        ifft(&plan, &freq, &mut time);

        for i in 0..nfft {
            let got = time[i] / nfft as f32;
            assert!(
                (got.re - input[i].re).abs() < 1e-4 && (got.im - input[i].im).abs() < 1e-4,
                "nfft={nfft} i={i} got={got} want={}",
                input[i]
            );
        }
    }
}
