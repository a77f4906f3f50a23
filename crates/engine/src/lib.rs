//! Engine module - level generation, hints, and session orchestration
//!
//! Sits on top of `gemfall-core` and owns everything a running game needs
//! beyond raw rule evaluation:
//!
//! - [`level`]: deterministic (seeded) level configs - boards, tile-layer
//!   grids, objectives, shuffle allowances
//! - [`hint`]: exhaustive adjacent-swap search ranked by a weighted
//!   heuristic (bonus usage > bonus creation > cascade depth > raw score)
//! - [`session`]: one level in play - accepts player intents (swap, bonus
//!   activation, shuffle), runs them through the core pipeline, and tracks
//!   score, multiplier, and objective progress
//!
//! Like the core, the engine is synchronous and single-threaded: every
//! request is a pure state transition producing a step sequence for the
//! external presentation layer. Callers with an in-flight cascade queue
//! further requests themselves and replay them once the board settles.

pub mod hint;
pub mod level;
pub mod session;

pub use gemfall_core as core;
pub use gemfall_types as types;

pub use hint::{find_best_move, HintCandidate};
pub use level::{generate_level, generate_level_set, LevelConfig};
pub use session::{EngineError, GameSession, SwapReport};
