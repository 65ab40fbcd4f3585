//! Roll sources for every random decision in combat
//!
//! Hit, dodge and crit rolls and multi-target subsampling all draw from one
//! `RollSource`, so a seeded generator replays a battle exactly.

use std::collections::VecDeque;

use rand::RngCore;

pub trait RollSource {
    /// Uniform roll in 1..=sides
    fn roll(&mut self, sides: u32) -> u32;

    /// `amount` distinct indices from 0..len, in draw order
    fn sample_indices(&mut self, len: usize, amount: usize) -> Vec<usize>;
}

impl<R: RngCore + ?Sized> RollSource for R {
    fn roll(&mut self, sides: u32) -> u32 {
        use rand::Rng;
        if sides == 0 {
            return 0;
        }
        self.gen_range(1..=sides)
    }

    fn sample_indices(&mut self, len: usize, amount: usize) -> Vec<usize> {
        let amount = amount.min(len);
        rand::seq::index::sample(self, len, amount).into_vec()
    }
}

/// Replays a fixed list of rolls, for tests and scripted replays
///
/// Once the script runs out every roll returns `fallback`. Sampling always
/// takes the first `amount` indices.
#[derive(Debug, Clone)]
pub struct ScriptedRolls {
    rolls: VecDeque<u32>,
    fallback: u32,
}

impl ScriptedRolls {
    pub fn new(rolls: impl IntoIterator<Item = u32>) -> Self {
        Self {
            rolls: rolls.into_iter().collect(),
            fallback: 1,
        }
    }

    /// A source that returns the same value forever
    pub fn constant(value: u32) -> Self {
        Self {
            rolls: VecDeque::new(),
            fallback: value,
        }
    }

    pub fn with_fallback(mut self, fallback: u32) -> Self {
        self.fallback = fallback;
        self
    }

    pub fn remaining(&self) -> usize {
        self.rolls.len()
    }
}

impl RollSource for ScriptedRolls {
    fn roll(&mut self, sides: u32) -> u32 {
        let value = self.rolls.pop_front().unwrap_or(self.fallback);
        value.clamp(1, sides.max(1))
    }

    fn sample_indices(&mut self, len: usize, amount: usize) -> Vec<usize> {
        (0..amount.min(len)).collect()
    }
}
