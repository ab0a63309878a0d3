//! Injectable randomness for flee placement
//!
//! Anything implementing `rand::RngCore` works (the browser build seeds a
//! `Pcg32` from the clock). Tests use `ScriptedRandom` to pin every draw.

use rand::{Rng, RngCore};

/// Source of uniform samples in `[0, 1)`
pub trait RandomSource {
    fn unit(&mut self) -> f32;

    /// True with probability `p`
    fn chance(&mut self, p: f32) -> bool {
        self.unit() < p
    }

    /// Uniform sample in `[-0.5, 0.5)`
    fn centered(&mut self) -> f32 {
        self.unit() - 0.5
    }
}

impl<R: RngCore> RandomSource for R {
    fn unit(&mut self) -> f32 {
        self.random::<f32>()
    }
}

/// Replays a fixed list of samples, cycling when exhausted
#[derive(Debug, Clone)]
pub struct ScriptedRandom {
    values: Vec<f32>,
    cursor: usize,
}

impl ScriptedRandom {
    /// Samples are clamped into `[0, 1)`; an empty script always yields 0.5
    pub fn new(values: impl Into<Vec<f32>>) -> Self {
        let values = values
            .into()
            .into_iter()
            .map(|v| v.clamp(0.0, 0.999_999))
            .collect();
        Self { values, cursor: 0 }
    }

    /// Same sample forever
    pub fn constant(value: f32) -> Self {
        Self::new(vec![value])
    }

    /// Number of samples drawn so far
    pub fn draws(&self) -> usize {
        self.cursor
    }
}

impl RandomSource for ScriptedRandom {
    fn unit(&mut self) -> f32 {
        if self.values.is_empty() {
            self.cursor += 1;
            return 0.5;
        }
        let v = self.values[self.cursor % self.values.len()];
        self.cursor += 1;
        v
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::SeedableRng;
    use rand_pcg::Pcg32;

    #[test]
    fn test_scripted_cycles() {
        let mut r = ScriptedRandom::new(vec![0.1, 0.9]);
        assert_eq!(r.unit(), 0.1);
        assert_eq!(r.unit(), 0.9);
        assert_eq!(r.unit(), 0.1);
        assert_eq!(r.draws(), 3);
    }

    #[test]
    fn test_scripted_clamps_and_empty() {
        let mut r = ScriptedRandom::new(vec![1.5, -1.0]);
        assert!(r.unit() < 1.0);
        assert_eq!(r.unit(), 0.0);

        let mut empty = ScriptedRandom::new(Vec::new());
        assert_eq!(empty.unit(), 0.5);
        assert_eq!(empty.centered(), 0.0);
    }

    #[test]
    fn test_pcg_in_unit_range() {
        let mut rng = Pcg32::seed_from_u64(7);
        for _ in 0..1000 {
            let v = RandomSource::unit(&mut rng);
            assert!((0.0..1.0).contains(&v));
        }
    }
}
