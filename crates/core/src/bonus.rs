//! Bonus activator module - interprets bonus effects and chain reactions
//!
//! Activation is a pure computation: given a board, tiles, and the swap
//! that triggered it, it returns the index sets a real application of the
//! effect would touch. The resolver applies them; callers can also use the
//! same computation non-destructively to preview a prospective bonus swap.
//!
//! Effects:
//! - **bomb**: the 3x3 block centered on its position, clipped to bounds
//! - **cross**: the entire row and column through its position
//! - **rainbow**: depends on its swap counterpart - plain token clears every
//!   token of that kind ("target"), another rainbow clears every occupied
//!   cell ("all"), any other bonus or no counterpart picks up to
//!   [`RAINBOW_RANDOM_PICKS`] random occupied cells ("random")
//! - **clear_row**: the row containing the triggering position
//! - **unfreeze_all**: non-destructive - flips every frozen tile to
//!   playable and reports all cells as touched for damage accounting
//! - **transform_gems**: reserved; logs a warning and only consumes itself
//!
//! Any bonus token caught inside another bonus's cleared set is enqueued
//! and processed breadth-first, each position at most once. A chained
//! rainbow has no originating counterpart and defaults to random mode.

use std::collections::{HashSet, VecDeque};

use log::warn;

use crate::board::Board;
use crate::rng::GameRng;
use gemfall_types::{BonusKind, Swap, Tile, Token, TokenKind, RAINBOW_RANDOM_PICKS};

/// How a rainbow bonus selects its targets
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum RainbowMode {
    /// Clear every token of the counterpart's kind
    Target(TokenKind),
    /// Clear every occupied cell (rainbow swapped into rainbow)
    All,
    /// Clear up to [`RAINBOW_RANDOM_PICKS`] random occupied cells
    Random,
}

/// Everything a bonus chain touched, de-duplicated across the whole chain
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct BonusActivation {
    /// Positions whose tokens are destroyed, sorted ascending
    pub cleared: Vec<usize>,
    /// Superset of `cleared` including unfreeze_all's full-board walk,
    /// sorted ascending; drives tile-damage accounting
    pub touched: Vec<usize>,
    /// Frozen tiles flipped to playable, sorted ascending
    pub unfrozen: Vec<usize>,
}

impl BonusActivation {
    /// Whether the chain had any effect at all
    pub fn is_empty(&self) -> bool {
        self.cleared.is_empty() && self.unfrozen.is_empty()
    }
}

/// Rainbow selection mode derived from its swap counterpart
fn rainbow_mode(counterpart: Option<Token>) -> RainbowMode {
    match counterpart.map(|token| token.kind) {
        Some(TokenKind::Bonus(BonusKind::Rainbow)) => RainbowMode::All,
        Some(TokenKind::Bonus(_)) | None => RainbowMode::Random,
        Some(kind) => RainbowMode::Target(kind),
    }
}

/// Queue entry: a bonus position awaiting activation
struct Pending {
    index: usize,
    kind: BonusKind,
    rainbow: RainbowMode,
}

impl Pending {
    fn initial(index: usize, token: Token, counterpart: Option<Token>) -> Option<Self> {
        let kind = token.kind.bonus()?;
        let rainbow = if kind == BonusKind::Rainbow {
            rainbow_mode(counterpart)
        } else {
            RainbowMode::Random
        };
        Some(Self {
            index,
            kind,
            rainbow,
        })
    }

    /// Chained activations have no originating counterpart
    fn chained(index: usize, token: Token) -> Option<Self> {
        let kind = token.kind.bonus()?;
        Some(Self {
            index,
            kind,
            rainbow: RainbowMode::Random,
        })
    }
}

/// Activate every bonus a swap triggers, chaining breadth-first
///
/// Returns empty sets when neither swapped token is a bonus. The board and
/// tiles are read, never written; `rng` drives random-mode rainbows.
pub fn activate_swap(
    board: &Board,
    tiles: &[Tile],
    swap: Swap,
    rng: &mut GameRng,
) -> BonusActivation {
    let a = board.get(swap.a);
    let b = board.get(swap.b);

    let mut queue: VecDeque<Pending> = VecDeque::new();
    if let Some(pending) = a.and_then(|token| Pending::initial(swap.a, token, b)) {
        queue.push_back(pending);
    }
    if let Some(pending) = b.and_then(|token| Pending::initial(swap.b, token, a)) {
        queue.push_back(pending);
    }

    run_chain(board, tiles, queue, rng)
}

/// Activate the bonus at a single position with no swap counterpart
///
/// Entry point for stash-applied bonuses. There is no counterpart token, so
/// a rainbow activated this way runs in random mode rather than seeing
/// itself (or whatever it replaced) as its counterpart.
pub fn activate_index(
    board: &Board,
    tiles: &[Tile],
    index: usize,
    rng: &mut GameRng,
) -> BonusActivation {
    let mut queue: VecDeque<Pending> = VecDeque::new();
    if let Some(pending) = board
        .get(index)
        .and_then(|token| Pending::initial(index, token, None))
    {
        queue.push_back(pending);
    }

    run_chain(board, tiles, queue, rng)
}

fn run_chain(
    board: &Board,
    tiles: &[Tile],
    mut queue: VecDeque<Pending>,
    rng: &mut GameRng,
) -> BonusActivation {
    let mut cleared: HashSet<usize> = HashSet::new();
    let mut touched: HashSet<usize> = HashSet::new();
    let mut unfrozen: HashSet<usize> = HashSet::new();
    let mut processed: HashSet<usize> = HashSet::new();

    while let Some(pending) = queue.pop_front() {
        if !processed.insert(pending.index) {
            continue;
        }

        let effect = activate_at(board, tiles, &pending, rng);
        for index in effect.unfrozen {
            unfrozen.insert(index);
        }
        for index in effect.touched {
            touched.insert(index);
        }
        for index in effect.cleared {
            touched.insert(index);
            if !cleared.insert(index) || index == pending.index {
                continue;
            }
            // A bonus caught in the blast joins the chain
            if let Some(token) = board.get(index) {
                if token.kind.is_bonus() && !processed.contains(&index) {
                    if let Some(next) = Pending::chained(index, token) {
                        queue.push_back(next);
                    }
                }
            }
        }
    }

    let mut activation = BonusActivation {
        cleared: cleared.into_iter().collect(),
        touched: touched.into_iter().collect(),
        unfrozen: unfrozen.into_iter().collect(),
    };
    activation.cleared.sort_unstable();
    activation.touched.sort_unstable();
    activation.unfrozen.sort_unstable();
    activation
}

/// Non-destructive preview of the cells a prospective bonus swap would clear
pub fn preview_swap(board: &Board, tiles: &[Tile], swap: Swap, rng: &mut GameRng) -> Vec<usize> {
    activate_swap(board, tiles, swap, rng).cleared
}

/// One bonus position's raw effect, before chain de-duplication
struct Effect {
    cleared: Vec<usize>,
    touched: Vec<usize>,
    unfrozen: Vec<usize>,
}

impl Effect {
    fn cleared(cleared: Vec<usize>) -> Self {
        Self {
            cleared,
            touched: Vec::new(),
            unfrozen: Vec::new(),
        }
    }
}

fn activate_at(board: &Board, tiles: &[Tile], pending: &Pending, rng: &mut GameRng) -> Effect {
    match pending.kind {
        BonusKind::Bomb => Effect::cleared(bomb_area(board, pending.index)),
        BonusKind::Cross => Effect::cleared(row_and_column(board, pending.index)),
        BonusKind::Rainbow => Effect::cleared(rainbow_targets(board, pending, rng)),
        BonusKind::ClearRow => Effect::cleared(full_row(board, pending.index)),
        BonusKind::UnfreezeAll => unfreeze_all(board, tiles, pending.index),
        BonusKind::TransformGems => {
            // Reserved effect: consume the token, change nothing else
            warn!(
                "transform_gems activation at index {} has no effect yet",
                pending.index
            );
            Effect::cleared(vec![pending.index])
        }
    }
}

/// 3x3 block centered on `index`, clipped to board bounds
fn bomb_area(board: &Board, index: usize) -> Vec<usize> {
    let (col, row) = board.coords(index);
    let mut cleared = Vec::with_capacity(9);
    for r in row.saturating_sub(1)..=(row + 1).min(board.rows() - 1) {
        for c in col.saturating_sub(1)..=(col + 1).min(board.cols() - 1) {
            if let Some(i) = board.index(c, r) {
                if !board.is_blocked(i) {
                    cleared.push(i);
                }
            }
        }
    }
    cleared
}

/// The entire row and column through `index`
fn row_and_column(board: &Board, index: usize) -> Vec<usize> {
    let (col, row) = board.coords(index);
    let mut cleared = Vec::with_capacity(board.cols() + board.rows());
    for c in 0..board.cols() {
        if let Some(i) = board.index(c, row) {
            if !board.is_blocked(i) {
                cleared.push(i);
            }
        }
    }
    for r in 0..board.rows() {
        if let Some(i) = board.index(col, r) {
            if !board.is_blocked(i) && i != index {
                cleared.push(i);
            }
        }
    }
    cleared
}

/// The row containing `index`
fn full_row(board: &Board, index: usize) -> Vec<usize> {
    let (_, row) = board.coords(index);
    (0..board.cols())
        .filter_map(|c| board.index(c, row))
        .filter(|&i| !board.is_blocked(i))
        .collect()
}

fn rainbow_targets(board: &Board, pending: &Pending, rng: &mut GameRng) -> Vec<usize> {
    let mut cleared = Vec::new();
    match pending.rainbow {
        RainbowMode::All => {
            cleared.extend(board.occupied().map(|(index, _)| index));
        }
        RainbowMode::Target(target) => {
            cleared.extend(
                board
                    .occupied()
                    .filter(|(_, token)| token.kind == target)
                    .map(|(index, _)| index),
            );
        }
        RainbowMode::Random => {
            let mut available: Vec<usize> = board
                .occupied()
                .map(|(index, _)| index)
                .filter(|&index| index != pending.index)
                .collect();
            let picks = RAINBOW_RANDOM_PICKS.min(available.len());
            for _ in 0..picks {
                let slot = rng.next_range(available.len());
                cleared.push(available.swap_remove(slot));
            }
        }
    }
    // A rainbow always consumes itself
    if !cleared.contains(&pending.index) {
        cleared.push(pending.index);
    }
    cleared
}

/// Flip every frozen tile to playable; destructive only toward the bonus
/// token itself, but every cell counts as touched
fn unfreeze_all(board: &Board, tiles: &[Tile], index: usize) -> Effect {
    let unfrozen = tiles
        .iter()
        .enumerate()
        .filter(|(_, tile)| tile.is_frozen())
        .map(|(i, _)| i)
        .collect();
    Effect {
        cleared: vec![index],
        touched: (0..board.len()).filter(|&i| !board.is_blocked(i)).collect(),
        unfrozen,
    }
}
