use celt_dsp::plan::{imdct_half_into, imdct_trig, FftPlan, ImdctScratch};
use celt_dsp::{detected, energy, pitch, vq, Arch};
use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion};

fn generate_signal(len: usize, seed: u32) -> Vec<f64> {
    let mut v = Vec::with_capacity(len);
    let mut state = seed;
    for _ in 0..len {
        state = state.wrapping_mul(1103515245).wrapping_add(12345);
        v.push((state as i32 >> 16) as f64 / 32768.0);
    }
    v
}

fn bench_xcorr_kernel(c: &mut Criterion) {
    let arch = detected();
    let mut group = c.benchmark_group("xcorr_kernel");
    for &n in &[64, 240, 480, 960] {
        let x = generate_signal(n, 42);
        let y = generate_signal(n + 3, 123);
        group.bench_with_input(BenchmarkId::new("scalar", n), &n, |b, &n| {
            b.iter(|| {
                let mut sum = [0.0f32; 4];
                pitch::xcorr_kernel_scalar(&x[..n], &y, &mut sum, n);
                black_box(sum)
            })
        });
        group.bench_with_input(BenchmarkId::new("dispatch", n), &n, |b, &n| {
            b.iter(|| {
                let mut sum = [0.0f32; 4];
                pitch::xcorr_kernel(&x[..n], &y, &mut sum, n, arch);
                black_box(sum)
            })
        });
    }
    group.finish();
}

fn bench_inner_prod(c: &mut Criterion) {
    let arch = detected();
    let mut group = c.benchmark_group("inner_prod");
    for &n in &[64, 240, 480, 960] {
        let x = generate_signal(n, 42);
        let y = generate_signal(n, 123);
        group.bench_with_input(BenchmarkId::new("scalar", n), &n, |b, &n| {
            b.iter(|| black_box(pitch::inner_prod_scalar(&x, &y, n)))
        });
        group.bench_with_input(BenchmarkId::new("dispatch", n), &n, |b, &n| {
            b.iter(|| black_box(pitch::inner_prod(&x, &y, n, arch)))
        });
    }
    group.finish();
}

fn bench_pitch_xcorr(c: &mut Criterion) {
    let arch = detected();
    let mut group = c.benchmark_group("pitch_xcorr");
    for &len in &[240usize, 480, 960] {
        let max_lag = 120;
        let x = generate_signal(len + max_lag, 42);
        let y = generate_signal(len, 123);
        group.bench_with_input(BenchmarkId::new("scalar", len), &len, |b, &len| {
            b.iter(|| {
                let mut out = vec![0.0f64; max_lag];
                pitch::pitch_xcorr(&x, &y, &mut out, len, Arch::Scalar);
                black_box(out)
            })
        });
        group.bench_with_input(BenchmarkId::new("dispatch", len), &len, |b, &len| {
            b.iter(|| {
                let mut out = vec![0.0f64; max_lag];
                pitch::pitch_xcorr(&x, &y, &mut out, len, arch);
                black_box(out)
            })
        });
    }
    group.finish();
}

fn bench_sum_sqr(c: &mut Criterion) {
    let arch = detected();
    let mut group = c.benchmark_group("sum_sqr");
    for &n in &[64, 240, 480, 960] {
        let x = generate_signal(n, 42);
        group.bench_with_input(BenchmarkId::new("scalar", n), &n, |b, _| {
            b.iter(|| black_box(energy::sum_sqr_scalar(&x)))
        });
        group.bench_with_input(BenchmarkId::new("dispatch", n), &n, |b, _| {
            b.iter(|| black_box(energy::sum_sqr(&x, arch)))
        });
    }
    group.finish();
}

fn bench_exp_rotation(c: &mut Criterion) {
    let arch = detected();
    let mut group = c.benchmark_group("exp_rotation1");
    for &n in &[64, 176, 240] {
        let x = generate_signal(n, 42);
        let (cos_a, sin_a) = vq::spread_angle(n, 8, vq::SPREAD_FACTOR[1]);
        group.bench_with_input(BenchmarkId::new("scalar", n), &n, |b, _| {
            b.iter(|| {
                let mut buf = x.clone();
                vq::exp_rotation1_scalar(&mut buf, cos_a, sin_a);
                black_box(buf)
            })
        });
        group.bench_with_input(BenchmarkId::new("dispatch", n), &n, |b, _| {
            b.iter(|| {
                let mut buf = x.clone();
                vq::exp_rotation1(&mut buf, cos_a, sin_a, arch);
                black_box(buf)
            })
        });
    }
    group.finish();
}

fn bench_pvq_search(c: &mut Criterion) {
    let mut group = c.benchmark_group("op_pvq_search");
    for &(n, k) in &[(32usize, 8i32), (64, 16), (176, 24)] {
        let x = generate_signal(n, 42);
        let mut abs_x = vec![0.0f32; n];
        let mut signx = vec![0i32; n];
        vq::pvq_split_scalar(&x, &mut abs_x, &mut signx);
        let id = format!("{n}x{k}");
        group.bench_function(BenchmarkId::new("search", id), |b| {
            b.iter(|| {
                let mut y = vec![0.0f32; n];
                let mut iy = vec![0i32; n];
                black_box(vq::op_pvq_search(&abs_x, &mut y, &mut iy, 0.0, 0.0, n as i32, k))
            })
        });
    }
    group.finish();
}

fn bench_imdct(c: &mut Criterion) {
    let mut group = c.benchmark_group("imdct_half");
    for &n4 in &[60usize, 120, 240] {
        let n2 = 2 * n4;
        let plan = FftPlan::new(n4).unwrap();
        let trig = imdct_trig(4 * n4).unwrap();
        let spectrum = generate_signal(n2, 42);
        group.bench_with_input(BenchmarkId::from_parameter(n4), &n4, |b, _| {
            let mut scratch = ImdctScratch::default();
            let mut buf = vec![0.0f32; n2];
            b.iter(|| {
                imdct_half_into(&plan, &trig, &spectrum, &mut buf, &mut scratch);
                black_box(buf[0])
            })
        });
    }
    group.finish();
}

criterion_group!(
    benches,
    bench_xcorr_kernel,
    bench_inner_prod,
    bench_pitch_xcorr,
    bench_sum_sqr,
    bench_exp_rotation,
    bench_pvq_search,
    bench_imdct
);
criterion_main!(benches);
