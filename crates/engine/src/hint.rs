//! Hint engine module - exhaustive adjacent-swap search
//!
//! Evaluates swapping every cell with its right and below neighbor (each
//! unique adjacent pair once), resolves each candidate to completion on
//! cloned state, and ranks them: bonus usage beats bonus creation beats
//! multi-cascade beats a plain match, with total cells cleared, cascade
//! depth, raw score, and a small central-position bias breaking ties.

use gemfall_core::{evaluate_swap, Board, CascadeResolver, GameRng, GemFactory};
use gemfall_types::{Swap, Tile};

/// Priority tiers; the dominant term of the heuristic
const PRIORITY_USE_BONUS: u32 = 4;
const PRIORITY_CREATE_BONUS: u32 = 3;
const PRIORITY_CASCADE: u32 = 2;
const PRIORITY_BASIC: u32 = 1;

/// A ranked candidate move
#[derive(Debug, Clone, PartialEq)]
pub struct HintCandidate {
    pub swap: Swap,
    pub uses_bonus: bool,
    pub creates_bonus: bool,
    pub cascade_count: usize,
    pub total_cleared: usize,
    pub score_gain: u32,
    pub priority: u32,
    pub heuristic: f64,
}

/// Find the best legal move, or `None` when no adjacent swap matches
///
/// Simulation runs on cloned board, tiles, factory, and RNG; the caller's
/// state is never advanced by asking for a hint.
pub fn find_best_move(
    board: &Board,
    tiles: &[Tile],
    factory: &GemFactory,
    rng: &GameRng,
) -> Option<HintCandidate> {
    if board.is_empty() || tiles.len() != board.len() {
        return None;
    }

    let mut best: Option<HintCandidate> = None;
    for index in 0..board.len() {
        let (col, _) = board.coords(index);
        if col + 1 < board.cols() {
            consider(board, tiles, factory, rng, index, index + 1, &mut best);
        }
        let below = index + board.cols();
        if below < board.len() {
            consider(board, tiles, factory, rng, index, below, &mut best);
        }
    }
    best
}

#[allow(clippy::too_many_arguments)]
fn consider(
    board: &Board,
    tiles: &[Tile],
    factory: &GemFactory,
    rng: &GameRng,
    a: usize,
    b: usize,
    best: &mut Option<HintCandidate>,
) {
    let Some(candidate) = evaluate_candidate(board, tiles, factory, rng, a, b) else {
        return;
    };
    let better = match best {
        None => true,
        Some(current) => candidate.heuristic > current.heuristic,
    };
    if better {
        *best = Some(candidate);
    }
}

fn evaluate_candidate(
    board: &Board,
    tiles: &[Tile],
    factory: &GemFactory,
    rng: &GameRng,
    a: usize,
    b: usize,
) -> Option<HintCandidate> {
    let mut sim_rng = rng.clone();
    let outcome = evaluate_swap(board, tiles, a, b, &mut sim_rng);
    if !outcome.is_accepted() {
        return None;
    }

    let uses_bonus = outcome.uses_bonus();
    let mut sim_factory = factory.clone();
    let resolution = CascadeResolver::new(&mut sim_factory, &mut sim_rng).resolve(&outcome, tiles);

    let creates_bonus = !resolution.bonuses.is_empty();
    let cascade_count = resolution.steps.len();
    let mut cleared: Vec<usize> = resolution
        .steps
        .iter()
        .flat_map(|step| step.cleared.iter().copied())
        .collect();
    cleared.sort_unstable();
    cleared.dedup();
    let total_cleared = cleared.len();
    let max_matches_in_step = resolution
        .steps
        .iter()
        .map(|step| step.matches.len())
        .max()
        .unwrap_or(0);

    let priority = if uses_bonus {
        PRIORITY_USE_BONUS
    } else if creates_bonus {
        PRIORITY_CREATE_BONUS
    } else if cascade_count > 1 || max_matches_in_step > 1 {
        PRIORITY_CASCADE
    } else {
        PRIORITY_BASIC
    };

    let swap = Swap::new(a, b);
    let heuristic = build_heuristic(
        priority,
        uses_bonus,
        creates_bonus,
        total_cleared,
        cascade_count,
        max_matches_in_step,
        resolution.score,
        center_bias(board, swap),
    );

    Some(HintCandidate {
        swap,
        uses_bonus,
        creates_bonus,
        cascade_count,
        total_cleared,
        score_gain: resolution.score,
        priority,
        heuristic,
    })
}

/// Mean distance of the swap endpoints from the board center
fn center_bias(board: &Board, swap: Swap) -> f64 {
    let center_x = (board.cols() as f64 - 1.0) / 2.0;
    let center_y = (board.rows() as f64 - 1.0) / 2.0;
    let distance = |index: usize| {
        let (col, row) = board.coords(index);
        let dx = col as f64 - center_x;
        let dy = row as f64 - center_y;
        (dx * dx + dy * dy).sqrt()
    };
    (distance(swap.a) + distance(swap.b)) / 2.0
}

#[allow(clippy::too_many_arguments)]
fn build_heuristic(
    priority: u32,
    uses_bonus: bool,
    creates_bonus: bool,
    total_cleared: usize,
    cascade_count: usize,
    max_matches_in_step: usize,
    score_gain: u32,
    center_bias: f64,
) -> f64 {
    let bonus_weight = if uses_bonus {
        5.0
    } else if creates_bonus {
        2.0
    } else {
        0.0
    };
    f64::from(priority) * 1e9
        + bonus_weight * 1e7
        + total_cleared as f64 * 1e6
        + cascade_count as f64 * 6e5
        + max_matches_in_step as f64 * 4e5
        + f64::from(score_gain) * 100.0
        - center_bias * 1e5
}

#[cfg(test)]
mod tests {
    use super::*;

    fn fixture(cols: usize, rows: usize, kinds: &[&str]) -> (Board, GemFactory) {
        let mut factory = GemFactory::new();
        let board = Board::from_kinds(cols, rows, kinds, &mut factory).unwrap();
        (board, factory)
    }

    fn playable(len: usize) -> Vec<Tile> {
        vec![Tile::with_layers(1); len]
    }

    #[test]
    fn no_move_on_a_dead_board() {
        let (board, factory) = fixture(
            3,
            3,
            &[
                "ruby", "sapphire", "emerald", //
                "topaz", "amethyst", "moonstone", //
                "ruby", "sapphire", "emerald",
            ],
        );
        let hint = find_best_move(&board, &playable(9), &factory, &GameRng::new(1));
        assert!(hint.is_none());
    }

    #[test]
    fn finds_the_only_matching_swap() {
        let (board, factory) = fixture(
            4,
            3,
            &[
                "ruby", "sapphire", "ruby", "ruby", //
                "topaz", "emerald", "sapphire", "topaz", //
                "emerald", "topaz", "moonstone", "sapphire",
            ],
        );
        let hint = find_best_move(&board, &playable(12), &factory, &GameRng::new(1)).unwrap();
        assert_eq!(hint.swap, Swap::new(0, 1));
        assert_eq!(hint.priority, PRIORITY_BASIC);
        assert!(hint.total_cleared >= 3);
        assert!(hint.score_gain >= 300);
    }

    #[test]
    fn bonus_usage_outranks_a_plain_match() {
        // Swapping 4<->5 activates the bomb; swapping 0<->1 merely matches
        let (board, factory) = fixture(
            4,
            4,
            &[
                "ruby", "sapphire", "ruby", "ruby", //
                "bomb", "topaz", "sapphire", "topaz", //
                "emerald", "topaz", "emerald", "sapphire", //
                "moonstone", "amethyst", "moonstone", "amethyst",
            ],
        );
        let hint = find_best_move(&board, &playable(16), &factory, &GameRng::new(1)).unwrap();
        assert!(hint.uses_bonus);
        assert_eq!(hint.priority, PRIORITY_USE_BONUS);
        assert!(hint.swap.contains(4));
    }

    #[test]
    fn bonus_creation_outranks_a_plain_match() {
        // Swap 1<->5 forms a four-line (creates a bomb); swap 8<->9 would
        // only form a three-run.
        let (board, factory) = fixture(
            4,
            4,
            &[
                "ruby", "sapphire", "ruby", "ruby", //
                "topaz", "ruby", "sapphire", "topaz", //
                "emerald", "moonstone", "emerald", "emerald", //
                "amethyst", "sapphire", "amethyst", "sapphire",
            ],
        );
        let hint = find_best_move(&board, &playable(16), &factory, &GameRng::new(1)).unwrap();
        assert!(hint.creates_bonus);
        assert_eq!(hint.priority, PRIORITY_CREATE_BONUS);
        assert_eq!(hint.swap, Swap::new(1, 5));
    }

    #[test]
    fn hints_never_advance_caller_state() {
        let (board, factory) = fixture(
            4,
            3,
            &[
                "ruby", "sapphire", "ruby", "ruby", //
                "topaz", "emerald", "sapphire", "topaz", //
                "emerald", "topaz", "moonstone", "sapphire",
            ],
        );
        let rng = GameRng::new(1337);
        let state_before = rng.state();
        let created_before = factory.created_count();
        let _ = find_best_move(&board, &playable(12), &factory, &rng);
        assert_eq!(rng.state(), state_before);
        assert_eq!(factory.created_count(), created_before);
    }

    #[test]
    fn mismatched_tiles_yield_no_hint() {
        let (board, factory) = fixture(
            3,
            3,
            &[
                "ruby", "ruby", "sapphire", //
                "topaz", "amethyst", "moonstone", //
                "ruby", "sapphire", "emerald",
            ],
        );
        assert!(find_best_move(&board, &playable(2), &factory, &GameRng::new(1)).is_none());
    }
}
