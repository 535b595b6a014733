//! Random byte sources for the frame codec.
//!
//! Every byte the codec draws (seed, padding length, padding, keystream) comes from a
//! [`RandomSource`]. Production code uses [`RngSource`] over an OS-seeded `StdRng`;
//! tests use [`ConstantSource`] or [`SequenceSource`] to make frames reproducible.
//!
//! None of these sources turn the frame into encryption: the keystream travels inside
//! the frame it obfuscates.

use rand::rngs::StdRng;
use rand::{RngCore, SeedableRng};

/// A byte-granular random source.
pub trait RandomSource {
    /// Draw the next byte.
    fn next_byte(&mut self) -> u8;

    /// Fill `dest` with consecutive draws.
    ///
    /// Overrides must yield the same bytes as calling `next_byte` once per slot.
    fn fill(&mut self, dest: &mut [u8]) {
        for byte in dest.iter_mut() {
            *byte = self.next_byte();
        }
    }
}

impl<R: RandomSource + ?Sized> RandomSource for &mut R {
    fn next_byte(&mut self) -> u8 {
        (**self).next_byte()
    }

    fn fill(&mut self, dest: &mut [u8]) {
        (**self).fill(dest)
    }
}

impl<R: RandomSource + ?Sized> RandomSource for Box<R> {
    fn next_byte(&mut self) -> u8 {
        (**self).next_byte()
    }

    fn fill(&mut self, dest: &mut [u8]) {
        (**self).fill(dest)
    }
}

/// Adapter from any `rand` generator.
#[derive(Debug, Clone)]
pub struct RngSource<R>(R);

impl<R: RngCore> RngSource<R> {
    pub fn new(rng: R) -> Self {
        Self(rng)
    }

    pub fn into_inner(self) -> R {
        self.0
    }
}

impl RngSource<StdRng> {
    /// A `StdRng` seeded from the operating system.
    pub fn from_os_seed() -> Self {
        Self(StdRng::from_os_rng())
    }

    /// A reproducible generator for benchmarks and tests.
    pub fn seeded(seed: u64) -> Self {
        Self(StdRng::seed_from_u64(seed))
    }
}

impl Default for RngSource<StdRng> {
    fn default() -> Self {
        Self::from_os_seed()
    }
}

impl<R: RngCore> RandomSource for RngSource<R> {
    fn next_byte(&mut self) -> u8 {
        (self.0.next_u32() & 0xFF) as u8
    }
}

/// Emits the same byte forever.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ConstantSource(pub u8);

impl RandomSource for ConstantSource {
    fn next_byte(&mut self) -> u8 {
        self.0
    }
}

/// Replays a fixed byte sequence, wrapping around at the end.
#[derive(Debug, Clone)]
pub struct SequenceSource {
    bytes: Vec<u8>,
    position: usize,
    draws: usize,
}

impl SequenceSource {
    /// An empty sequence behaves like `ConstantSource(0)`.
    pub fn new(bytes: impl Into<Vec<u8>>) -> Self {
        Self {
            bytes: bytes.into(),
            position: 0,
            draws: 0,
        }
    }

    /// Number of bytes drawn so far.
    pub fn draws(&self) -> usize {
        self.draws
    }
}

impl RandomSource for SequenceSource {
    fn next_byte(&mut self) -> u8 {
        self.draws += 1;
        if self.bytes.is_empty() {
            return 0;
        }
        let byte = self.bytes[self.position];
        self.position = (self.position + 1) % self.bytes.len();
        byte
    }
}
