//! Scalar and SIMD DSP kernels for a CELT-style audio codec.
//!
//! This crate is the numeric hot-path layer of a codec: mixed-radix FFT
//! butterflies, IMDCT pre/post rotations, the exponential (Givens) spread
//! rotation, pitch correlation and energy reductions, and the PVQ pulse
//! search. Every kernel is a pure function over caller-supplied buffers: no
//! allocation, no locking, no error channel on the hot path.
//!
//! # Backend dispatch
//!
//! Each kernel has a portable scalar implementation and, where profitable,
//! accelerated SIMD implementations (SSE2/AVX2 on x86, NEON on aarch64).
//! The load-bearing contract is that all implementations of a kernel are
//! **bit-identical**: accelerated paths place independent outputs in vector
//! lanes and keep every accumulation chain in the scalar order, so switching
//! backends never changes a single bit of output. Detection happens once per
//! process via [`arch::detected`], and the chosen [`Arch`](arch::Arch) is
//! threaded through all dispatch calls.
//!
//! # Precision model
//!
//! Correlation and PVQ interfaces are declared in `f64` but work in `f32`:
//! double precision is a transport format, single precision is the working
//! precision, matching the reference implementation's rounding exactly.
//! FFT/IMDCT buffers are `Complex32`; the Givens spread works in `f64`.

pub mod arch;
pub mod energy;
pub mod kiss_fft;
pub mod mdct;
pub mod pitch;
pub mod plan;
pub mod vq;

#[cfg(feature = "simd")]
pub(crate) mod simd;

pub use arch::{detected, select_arch, Arch};
pub use plan::{imdct_trig, FftPlan, PlanError};
