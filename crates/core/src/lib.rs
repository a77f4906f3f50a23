//! Core rules module - pure, deterministic, and testable
//!
//! This module contains the complete match-3 rules core: swap legality,
//! match detection, bonus classification and activation, tile damage, and
//! cascade resolution. It has **zero dependencies** on UI, networking, or
//! I/O, making it:
//!
//! - **Deterministic**: Same seed produces identical boards and cascades
//! - **Testable**: Comprehensive unit tests for all game rules
//! - **Portable**: Can run in any environment (desktop shell, web, headless)
//! - **Pure**: Every evaluation works on a copy of the caller's board;
//!   nothing in this crate mutates caller state in place
//!
//! # Module Structure
//!
//! - [`board`]: flat cols x rows board with blocked-cell support
//! - [`rng`]: Park-Miller LCG for reproducible level generation and spawns
//! - [`gems`]: token creation with session-unique identities
//! - [`matching`]: origin-dedup run scanner (horizontal/vertical, >= 3)
//! - [`patterns`]: bonus pattern classifier (cross/rainbow/bomb creation)
//! - [`bonus`]: bonus activation with breadth-first chain reactions
//! - [`swap`]: swap legality and evaluation (bonus priority over matching)
//! - [`resolver`]: the cascade state machine producing resolution steps
//!
//! # Pipeline
//!
//! A player swap flows through chained dependent stages:
//!
//! ```text
//! evaluate_swap -> (bonus activation | match detection)
//!     -> resolve: damage -> protect new bonus -> unfreeze -> remove
//!                 -> gravity -> respawn -> re-scan -> loop
//! ```
//!
//! Each loop iteration is recorded as a [`ResolutionStep`] so the external
//! presentation layer can replay the cascade as discrete animations. The
//! loop is iterative (no recursion) and strictly removes at least one token
//! per iteration, so it always terminates within board size.
//!
//! [`ResolutionStep`]: gemfall_types::ResolutionStep
//!
//! # Example
//!
//! ```
//! use gemfall_core::{Board, CascadeResolver, GemFactory, GameRng, evaluate_swap};
//! use gemfall_types::{GemKind, Tile, TokenKind};
//!
//! let mut factory = GemFactory::new();
//! let mut rng = GameRng::new(1337);
//!
//! // ruby sapphire ruby ruby / ... - swapping 0 and 1 lines up three rubies
//! let kinds = [
//!     "ruby", "sapphire", "ruby", "ruby",
//!     "topaz", "emerald", "sapphire", "topaz",
//!     "emerald", "topaz", "emerald", "sapphire",
//! ];
//! let board = Board::from_kinds(4, 3, &kinds, &mut factory).unwrap();
//! let tiles = vec![Tile::with_layers(1); 12];
//!
//! let outcome = evaluate_swap(&board, &tiles, 0, 1, &mut rng);
//! assert!(!outcome.matches.is_empty());
//!
//! let resolution = CascadeResolver::new(&mut factory, &mut rng)
//!     .resolve(&outcome, &tiles);
//! assert!(!resolution.steps.is_empty());
//! ```

pub mod board;
pub mod bonus;
pub mod gems;
pub mod matching;
pub mod patterns;
pub mod resolver;
pub mod rng;
pub mod swap;

pub use gemfall_types as types;

// Re-export commonly used items for convenience
pub use board::Board;
pub use bonus::{activate_index, activate_swap, preview_swap, BonusActivation};
pub use gems::GemFactory;
pub use matching::find_matches;
pub use patterns::{detect_bonuses, BonusSeed};
pub use resolver::{CascadeResolver, Resolution};
pub use rng::GameRng;
pub use swap::{evaluate_swap, SwapOutcome};
