//! Uniform draws from the session random stream.

use rand_chacha::rand_core::Rng;

use crate::types::Direction;

/// Uniform index in `0..len`. `len` must be non-zero.
pub(crate) fn random_index<R: Rng + ?Sized>(rng: &mut R, len: usize) -> usize {
    debug_assert!(len > 0);
    (rng.next_u64() % len as u64) as usize
}

pub(crate) fn random_direction<R: Rng + ?Sized>(rng: &mut R) -> Direction {
    Direction::ALL[random_index(rng, Direction::ALL.len())]
}
