//! RNG module - Park-Miller linear congruential generator
//!
//! Level boards and respawned tokens are regenerated deterministically from
//! an integer seed, so the generator is part of the rules contract:
//! `seed' = seed * 16807 mod 2147483647` (the minimal standard generator).
//!
//! Output is folded to the unit interval before range reduction so that the
//! draw sequence matches the original level definitions exactly.

/// Park-Miller modulus (2^31 - 1, a Mersenne prime)
const MODULUS: u64 = 2_147_483_647;

/// Park-Miller multiplier
const MULTIPLIER: u64 = 16_807;

/// Deterministic LCG used for level generation, respawns, and shuffles
#[derive(Debug, Clone)]
pub struct GameRng {
    state: u64,
}

impl GameRng {
    /// Create a new RNG with the given seed
    ///
    /// A zero (or modulus-divisible) seed would fix the generator at zero,
    /// so it is remapped into the valid state range.
    pub fn new(seed: u32) -> Self {
        let mut state = u64::from(seed) % MODULUS;
        if state == 0 {
            state = MODULUS - 1;
        }
        Self { state }
    }

    /// Advance the generator and return the raw state in `1..MODULUS`
    pub fn next_u32(&mut self) -> u32 {
        self.state = (self.state * MULTIPLIER) % MODULUS;
        self.state as u32
    }

    /// Next value in the half-open unit interval `[0, 1)`
    pub fn next_unit(&mut self) -> f64 {
        (self.next_u32() - 1) as f64 / (MODULUS - 1) as f64
    }

    /// Next value in `[0, max)`; returns 0 when `max` is 0
    pub fn next_range(&mut self, max: usize) -> usize {
        if max == 0 {
            return 0;
        }
        let pick = (self.next_unit() * max as f64) as usize;
        pick.min(max - 1)
    }

    /// Shuffle a slice using Fisher-Yates
    pub fn shuffle<T>(&mut self, slice: &mut [T]) {
        for i in (1..slice.len()).rev() {
            let j = self.next_range(i + 1);
            slice.swap(i, j);
        }
    }

    /// Current generator state (for diagnostics and snapshots)
    pub fn state(&self) -> u32 {
        self.state as u32
    }
}

impl Default for GameRng {
    fn default() -> Self {
        Self::new(1)
    }
}
