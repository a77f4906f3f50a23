//! Game session module - one level in play
//!
//! Owns the live board, tile grid, token factory, and RNG for a single
//! level and turns player intents into settled state transitions:
//!
//! - `request_swap`: legality check, match/bonus evaluation, full cascade
//!   resolution, score and objective bookkeeping
//! - `request_bonus_activation`: applies a consumable bonus (from the
//!   player's stash) directly onto a cell and resolves the result
//! - `request_shuffle`: rerolls token positions within the level's
//!   shuffle allowance
//! - `hint`: delegates to the hint engine on read-only state
//!
//! Rejected intents return `None`/`false` and leave the session exactly as
//! it was, including the RNG sequence.

use log::warn;
use thiserror::Error;

use gemfall_core::bonus::activate_index;
use gemfall_core::{
    find_matches, CascadeResolver, GameRng, GemFactory, Resolution, SwapOutcome,
};
use gemfall_types::{
    BonusKind, BonusSpawn, Match, Objective, ObjectiveKind, ResolutionStep, Swap, Tile,
    LEVEL_SEED_STRIDE,
};

use crate::hint::{find_best_move, HintCandidate};
use crate::level::LevelConfig;

/// Reroll attempts before a shuffle accepts a board with ready matches
const SHUFFLE_ATTEMPTS: usize = 10;

#[derive(Debug, Error, PartialEq, Eq)]
pub enum EngineError {
    #[error("board must have non-zero dimensions")]
    EmptyBoard,
    #[error("tile grid length {tiles} does not match board length {cells}")]
    TileGridMismatch { tiles: usize, cells: usize },
}

/// Settled outcome of one accepted player intent
#[derive(Debug, Clone, PartialEq)]
pub struct SwapReport {
    /// Ordered cascade steps for the presentation layer to replay
    pub steps: Vec<ResolutionStep>,
    pub score_gain: u32,
    /// Final cascade multiplier the intent reached
    pub multiplier: u32,
    pub layers_cleared: u32,
    /// Bonus tokens earned during the cascade
    pub bonuses: Vec<BonusSpawn>,
}

#[derive(Debug)]
pub struct GameSession {
    level_id: u32,
    board: gemfall_core::Board,
    tiles: Vec<Tile>,
    factory: GemFactory,
    rng: GameRng,
    score: u32,
    objectives: Vec<Objective>,
    shuffle_allowance: u32,
    shuffles_used: u32,
}

impl GameSession {
    /// Start a session from a level config
    ///
    /// The session RNG is reseeded from the level id so gameplay after the
    /// (deterministic) generation phase stays reproducible per level.
    pub fn new(config: LevelConfig) -> Result<Self, EngineError> {
        if config.board.is_empty() {
            return Err(EngineError::EmptyBoard);
        }
        if config.tiles.len() != config.board.len() {
            return Err(EngineError::TileGridMismatch {
                tiles: config.tiles.len(),
                cells: config.board.len(),
            });
        }
        Ok(Self {
            level_id: config.id,
            rng: GameRng::new(config.id.wrapping_mul(LEVEL_SEED_STRIDE)),
            board: config.board,
            tiles: config.tiles,
            factory: GemFactory::new(),
            score: 0,
            objectives: config.objectives,
            shuffle_allowance: config.shuffle_allowance,
            shuffles_used: 0,
        })
    }

    pub fn board(&self) -> &gemfall_core::Board {
        &self.board
    }

    pub fn tiles(&self) -> &[Tile] {
        &self.tiles
    }

    pub fn score(&self) -> u32 {
        self.score
    }

    pub fn level_id(&self) -> u32 {
        self.level_id
    }

    pub fn objectives(&self) -> &[Objective] {
        &self.objectives
    }

    pub fn shuffles_remaining(&self) -> u32 {
        self.shuffle_allowance.saturating_sub(self.shuffles_used)
    }

    /// Whether every objective has reached its target
    pub fn is_complete(&self) -> bool {
        self.objectives.iter().all(Objective::is_complete)
    }

    /// Attempt a player swap; `None` means the move was rejected and the
    /// session is unchanged
    pub fn request_swap(&mut self, a: usize, b: usize) -> Option<SwapReport> {
        let outcome = gemfall_core::evaluate_swap(&self.board, &self.tiles, a, b, &mut self.rng);
        if !outcome.is_accepted() {
            return None;
        }
        Some(self.settle(&outcome))
    }

    /// Apply a consumable bonus of `kind` directly onto `index`
    ///
    /// The bonus token replaces whatever occupies the cell and activates
    /// immediately with no swap counterpart (a stash rainbow therefore runs
    /// in random mode), and the cascade resolves as usual. `None` means the
    /// activation had no effect (bad index, blocked cell) and the session
    /// is unchanged.
    pub fn request_bonus_activation(&mut self, kind: BonusKind, index: usize) -> Option<SwapReport> {
        if !self.board.in_bounds(index) || self.board.is_blocked(index) {
            return None;
        }

        let mut staged = self.board.clone();
        staged.set(index, Some(self.factory.create_bonus(kind)));

        let mut preview_rng = self.rng.clone();
        let activation = activate_index(&staged, &self.tiles, index, &mut preview_rng);
        if activation.is_empty() {
            warn!("bonus activation {:?} at index {} had no effect", kind, index);
            return None;
        }
        self.rng = preview_rng;

        let outcome = SwapOutcome {
            board: staged,
            matches: vec![Match::bonus_activation(activation.cleared)],
            swap: Some(Swap::new(index, index)),
            unfrozen: activation.unfrozen,
            touched: activation.touched,
        };
        Some(self.settle(&outcome))
    }

    /// Reroll token positions; `false` when the allowance is spent
    ///
    /// Existing tokens are permuted in place (no new ids), rerolling up to
    /// [`SHUFFLE_ATTEMPTS`] times to avoid leaving a ready-made match; the
    /// final attempt is accepted either way.
    pub fn request_shuffle(&mut self) -> bool {
        if self.shuffles_used >= self.shuffle_allowance {
            return false;
        }

        let (indices, mut tokens): (Vec<usize>, Vec<_>) = self.board.occupied().unzip();
        for _ in 0..SHUFFLE_ATTEMPTS {
            self.rng.shuffle(&mut tokens);
            for (&index, &token) in indices.iter().zip(tokens.iter()) {
                self.board.set(index, Some(token));
            }
            if find_matches(&self.board).is_empty() {
                break;
            }
        }

        self.shuffles_used += 1;
        true
    }

    /// Best move on the current state, without advancing the session
    pub fn hint(&self) -> Option<HintCandidate> {
        find_best_move(&self.board, &self.tiles, &self.factory, &self.rng)
    }

    /// Resolve an accepted outcome and fold it into session state
    fn settle(&mut self, outcome: &SwapOutcome) -> SwapReport {
        let resolution: Resolution =
            CascadeResolver::new(&mut self.factory, &mut self.rng).resolve(outcome, &self.tiles);

        self.board = resolution.board;
        self.tiles = resolution.tiles;
        self.score += resolution.score;
        for objective in &mut self.objectives {
            match objective.kind {
                ObjectiveKind::ClearLayers => objective.advance(resolution.layers_cleared),
                ObjectiveKind::Score => objective.advance(resolution.score),
            }
        }

        SwapReport {
            steps: resolution.steps,
            score_gain: resolution.score,
            multiplier: resolution.multiplier,
            layers_cleared: resolution.layers_cleared,
            bonuses: resolution.bonuses,
        }
    }
}
