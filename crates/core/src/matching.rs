//! Match detector module - same-kind run scanning
//!
//! A single left-to-right, top-to-bottom sweep finds every horizontal and
//! vertical run of length >= 3. A cell only starts a run when the previous
//! cell along the scan direction could not have started the same run
//! (origin dedup), so the sweep is O(n) and never reports a run twice.
//!
//! Wildcard tokens extend a run of any origin kind without breaking it but
//! never start a run themselves. Empty and blocked cells break runs.

use crate::board::Board;
use gemfall_types::{Match, Orientation, TokenKind, MIN_RUN_LEN};

/// Scan the board and report every run of >= 3 same-kind tokens
///
/// Re-run after every cascade step; scanning a static board twice returns
/// identical match sets.
pub fn find_matches(board: &Board) -> Vec<Match> {
    let mut matches = Vec::new();
    for index in 0..board.len() {
        if let Some(run) = collect_run(board, index, Direction::Horizontal) {
            matches.push(run);
        }
        if let Some(run) = collect_run(board, index, Direction::Vertical) {
            matches.push(run);
        }
    }
    matches
}

#[derive(Clone, Copy, PartialEq)]
enum Direction {
    Horizontal,
    Vertical,
}

impl Direction {
    fn orientation(self) -> Orientation {
        match self {
            Direction::Horizontal => Orientation::Horizontal,
            Direction::Vertical => Orientation::Vertical,
        }
    }
}

/// Whether `kind` continues a run of `origin` (same kind or wildcard)
fn extends(origin: TokenKind, kind: TokenKind) -> bool {
    kind == origin || kind == TokenKind::Wildcard
}

/// Step from `index` along `direction`; `None` when leaving the line
fn step(board: &Board, index: usize, direction: Direction, forward: bool) -> Option<usize> {
    let (col, row) = board.coords(index);
    match (direction, forward) {
        (Direction::Horizontal, true) => board.index(col + 1, row),
        (Direction::Horizontal, false) => col.checked_sub(1).and_then(|c| board.index(c, row)),
        (Direction::Vertical, true) => board.index(col, row + 1),
        (Direction::Vertical, false) => row.checked_sub(1).and_then(|r| board.index(col, r)),
    }
}

/// Whether a run of `origin` starting at `index` was already reported from
/// an earlier origin along this direction
///
/// Walks backwards through any wildcards; if the first non-wildcard cell
/// behind us matches the origin kind, the earlier sweep covered this run.
fn covered_by_earlier_origin(
    board: &Board,
    index: usize,
    origin: TokenKind,
    direction: Direction,
) -> bool {
    let mut cursor = index;
    while let Some(prev) = step(board, cursor, direction, false) {
        match board.get(prev).map(|token| token.kind) {
            Some(TokenKind::Wildcard) => cursor = prev,
            Some(kind) => return kind == origin,
            None => return false,
        }
    }
    false
}

fn collect_run(board: &Board, start: usize, direction: Direction) -> Option<Match> {
    let origin = board.get(start)?.kind;
    if origin == TokenKind::Wildcard {
        return None;
    }
    if covered_by_earlier_origin(board, start, origin, direction) {
        return None;
    }

    let mut indices = vec![start];
    let mut cursor = start;
    while let Some(next) = step(board, cursor, direction, true) {
        match board.get(next).map(|token| token.kind) {
            Some(kind) if extends(origin, kind) => {
                indices.push(next);
                cursor = next;
            }
            _ => break,
        }
    }

    if indices.len() < MIN_RUN_LEN {
        return None;
    }
    Some(Match::run(origin, indices, direction.orientation()))
}
