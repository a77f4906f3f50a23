//! Swap/match engine module - swap legality and evaluation
//!
//! `evaluate_swap` is the entry point for a player move. It validates
//! legality (distinct, in-bounds, 4-adjacent, neither endpoint frozen),
//! performs the swap on a board copy, and evaluates it: a swap involving a
//! bonus token activates it (bonus priority - ordinary matching is skipped
//! in the same call), otherwise the match detector runs. A matchless swap
//! returns the pre-swap board with empty matches, which callers read as
//! "illegal/no-op" and may animate as a reject bounce.
//!
//! Illegal moves are results, not errors: every rejection degrades to a
//! no-op outcome so the board always stays consistent.

use crate::board::Board;
use crate::bonus::activate_swap;
use crate::matching::find_matches;
use crate::rng::GameRng;
use gemfall_types::{Match, Swap, Tile};

/// Normalized result of evaluating one proposed swap
#[derive(Debug, Clone, PartialEq)]
pub struct SwapOutcome {
    /// The swapped board on success, an untouched copy on rejection
    pub board: Board,
    /// Detected matches; empty means the swap was rejected or matchless
    pub matches: Vec<Match>,
    /// The accepted swap, `None` on rejection
    pub swap: Option<Swap>,
    /// Frozen tiles flipped by an unfreeze_all activation
    pub unfrozen: Vec<usize>,
    /// Damage-accounting superset from bonus activation (empty for
    /// ordinary matches, whose damage set is the match indices)
    pub touched: Vec<usize>,
}

impl SwapOutcome {
    fn rejected(board: &Board) -> Self {
        Self {
            board: board.clone(),
            matches: Vec::new(),
            swap: None,
            unfrozen: Vec::new(),
            touched: Vec::new(),
        }
    }

    /// Whether the swap was accepted with at least one match
    pub fn is_accepted(&self) -> bool {
        !self.matches.is_empty()
    }

    /// Whether the swap triggered a bonus activation
    pub fn uses_bonus(&self) -> bool {
        self.matches.iter().any(Match::is_bonus_activation)
    }
}

fn endpoint_frozen(tiles: &[Tile], index: usize) -> bool {
    tiles.get(index).is_some_and(|tile| tile.is_frozen())
}

/// Evaluate a proposed swap of the tokens at `a` and `b`
///
/// The caller's board and tiles are never mutated; `rng` only advances when
/// a random-mode rainbow activates.
pub fn evaluate_swap(
    board: &Board,
    tiles: &[Tile],
    a: usize,
    b: usize,
    rng: &mut GameRng,
) -> SwapOutcome {
    if a == b || !board.are_adjacent(a, b) {
        return SwapOutcome::rejected(board);
    }
    if endpoint_frozen(tiles, a) || endpoint_frozen(tiles, b) {
        return SwapOutcome::rejected(board);
    }

    let swap = Swap::new(a, b);
    let mut swapped = board.clone();
    swapped.swap(a, b);

    let a_is_bonus = swapped.get(a).map(|t| t.kind.is_bonus()).unwrap_or(false);
    let b_is_bonus = swapped.get(b).map(|t| t.kind.is_bonus()).unwrap_or(false);

    if a_is_bonus || b_is_bonus {
        let activation = activate_swap(&swapped, tiles, swap, rng);
        if !activation.cleared.is_empty() {
            return SwapOutcome {
                board: swapped,
                matches: vec![Match::bonus_activation(activation.cleared)],
                swap: Some(swap),
                unfrozen: activation.unfrozen,
                touched: activation.touched,
            };
        }
    }

    let matches = find_matches(&swapped);
    if matches.is_empty() {
        return SwapOutcome::rejected(board);
    }

    SwapOutcome {
        board: swapped,
        matches,
        swap: Some(swap),
        unfrozen: Vec::new(),
        touched: Vec::new(),
    }
}
