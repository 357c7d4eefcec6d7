//! Shared test infrastructure: deterministic RNG and signal generation.

// Not every integration test uses every helper.
#![allow(dead_code)]

/// Marsaglia Multiply-With-Carry RNG.
///
/// Deterministic across platforms, so the kernel tests always see the same
/// input vectors.
pub struct TestRng {
    rz: u32,
    rw: u32,
}

impl TestRng {
    pub fn new(seed: u32) -> Self {
        Self { rz: seed, rw: 0 }
    }

    pub fn next_u32(&mut self) -> u32 {
        self.rz = 36969u32
            .wrapping_mul(self.rz & 65535)
            .wrapping_add(self.rz >> 16);
        self.rw = 18000u32
            .wrapping_mul(self.rw & 65535)
            .wrapping_add(self.rw >> 16);
        (self.rz << 16).wrapping_add(self.rw)
    }

    /// Next sample in roughly [-1, 1).
    pub fn next_sample(&mut self) -> f64 {
        (self.next_u32() as i32 >> 16) as f64 / 32768.0
    }

    /// A signal of `len` samples in roughly [-1, 1).
    pub fn signal(&mut self, len: usize) -> Vec<f64> {
        (0..len).map(|_| self.next_sample()).collect()
    }
}

/// Lengths exercising every SIMD grouping remainder (0..4 leftover lanes)
/// plus the frame sizes the kernels see in practice.
pub const TEST_LENGTHS: &[usize] = &[0, 1, 2, 3, 4, 5, 7, 8, 15, 16, 63, 64, 100, 240, 480, 960];
