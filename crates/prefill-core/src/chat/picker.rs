//! Speaker selection for roleplay prefixes.

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

/// Chooses one of `n` speakers.
///
/// Injected into the conversation loop so tests can replace randomness
/// with a deterministic stub. `n` is always at least 1 and the result must
/// be below `n`.
pub trait SpeakerPicker: Send {
    fn pick(&mut self, n: usize) -> usize;
}

/// Uniform random picker backed by `StdRng`.
pub struct RandomPicker {
    rng: StdRng,
}

impl RandomPicker {
    pub fn new() -> Self {
        Self {
            rng: StdRng::from_entropy(),
        }
    }

    /// Reproducible picker, for demos and tests.
    pub fn seeded(seed: u64) -> Self {
        Self {
            rng: StdRng::seed_from_u64(seed),
        }
    }
}

impl Default for RandomPicker {
    fn default() -> Self {
        Self::new()
    }
}

impl SpeakerPicker for RandomPicker {
    fn pick(&mut self, n: usize) -> usize {
        if n <= 1 {
            return 0;
        }
        self.rng.gen_range(0..n)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_single_speaker_is_deterministic() {
        let mut picker = RandomPicker::new();
        for _ in 0..20 {
            assert_eq!(picker.pick(1), 0);
        }
    }

    #[test]
    fn test_pick_stays_in_range() {
        let mut picker = RandomPicker::seeded(7);
        for _ in 0..200 {
            assert!(picker.pick(3) < 3);
        }
    }

    #[test]
    fn test_seeded_pickers_agree() {
        let mut a = RandomPicker::seeded(42);
        let mut b = RandomPicker::seeded(42);
        let left: Vec<usize> = (0..16).map(|_| a.pick(5)).collect();
        let right: Vec<usize> = (0..16).map(|_| b.pick(5)).collect();
        assert_eq!(left, right);
    }

    #[test]
    fn test_every_speaker_eventually_picked() {
        let mut picker = RandomPicker::seeded(1);
        let mut seen = [false; 4];
        for _ in 0..500 {
            seen[picker.pick(4)] = true;
        }
        assert!(seen.iter().all(|s| *s));
    }
}
