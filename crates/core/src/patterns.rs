//! Bonus pattern classifier - decides which match shapes earn bonus tokens
//!
//! Cross patterns are checked before lines. A horizontal and a vertical run
//! of the same kind sharing exactly one cell, with >= 5 unique cells
//! combined, creates a cross bonus at the overlap. Among cross candidates
//! the preference order is: overlap cell is a swap endpoint, then the
//! pattern touches a swap endpoint anywhere, then larger combined size.
//!
//! Every straight run of length >= 4 earns its own bonus (each line is
//! evaluated independently): length >= 5 creates a rainbow, exactly 4 a
//! bomb, positioned at the swap endpoint inside the run when present, else
//! at the run's middle element.

use gemfall_types::{
    BonusKind, Match, MatchKind, Orientation, Swap, BOMB_LINE_LEN, CROSS_MIN_CELLS,
    RAINBOW_LINE_LEN,
};

/// A bonus token the current match batch should create
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BonusSeed {
    pub kind: BonusKind,
    pub index: usize,
}

/// Classify the ordinary matches of one resolution pass into bonus creations
///
/// `swap` is the originating swap on the first pass and `None` on cascade
/// passes. Synthetic bonus-activation matches never create bonuses.
pub fn detect_bonuses(matches: &[Match], swap: Option<Swap>) -> Vec<BonusSeed> {
    let ordinary: Vec<&Match> = matches
        .iter()
        .filter(|m| !m.is_bonus_activation())
        .collect();
    if ordinary.is_empty() {
        return Vec::new();
    }

    let mut seeds = Vec::new();
    let mut consumed = vec![false; ordinary.len()];

    if let Some(cross) = best_cross(&ordinary, swap) {
        seeds.push(BonusSeed {
            kind: BonusKind::Cross,
            index: cross.center,
        });
        consumed[cross.horizontal] = true;
        consumed[cross.vertical] = true;
    }

    for (slot, m) in ordinary.iter().enumerate() {
        if consumed[slot] || m.indices.len() < BOMB_LINE_LEN {
            continue;
        }
        let kind = if m.indices.len() >= RAINBOW_LINE_LEN {
            BonusKind::Rainbow
        } else {
            BonusKind::Bomb
        };
        seeds.push(BonusSeed {
            kind,
            index: bonus_position(m, swap),
        });
    }

    seeds
}

struct CrossCandidate {
    center: usize,
    horizontal: usize,
    vertical: usize,
    center_is_swap: bool,
    includes_swap: bool,
    weight: usize,
}

fn best_cross(ordinary: &[&Match], swap: Option<Swap>) -> Option<CrossCandidate> {
    let mut best: Option<CrossCandidate> = None;

    for (h_slot, h) in ordinary.iter().enumerate() {
        if h.orientation != Some(Orientation::Horizontal) {
            continue;
        }
        for (v_slot, v) in ordinary.iter().enumerate() {
            if v.orientation != Some(Orientation::Vertical) {
                continue;
            }
            if !same_run_kind(h, v) {
                continue;
            }

            let mut overlaps = h.indices.iter().filter(|index| v.indices.contains(index));
            let center = match (overlaps.next(), overlaps.next()) {
                (Some(&center), None) => center,
                // Zero or multiple shared cells is not a cross
                _ => continue,
            };

            // Unique combined cell count (the overlap is counted once)
            let weight = h.indices.len() + v.indices.len() - 1;
            if weight < CROSS_MIN_CELLS {
                continue;
            }

            let center_is_swap = swap.is_some_and(|s| s.contains(center));
            let includes_swap = swap.is_some_and(|s| {
                h.indices.iter().chain(&v.indices).any(|&i| s.contains(i))
            });

            let candidate = CrossCandidate {
                center,
                horizontal: h_slot,
                vertical: v_slot,
                center_is_swap,
                includes_swap,
                weight,
            };

            let better = match &best {
                None => true,
                Some(current) => {
                    (candidate.center_is_swap, candidate.includes_swap, candidate.weight)
                        > (current.center_is_swap, current.includes_swap, current.weight)
                }
            };
            if better {
                best = Some(candidate);
            }
        }
    }

    best
}

fn same_run_kind(a: &Match, b: &Match) -> bool {
    match (&a.kind, &b.kind) {
        (MatchKind::Run(ka), MatchKind::Run(kb)) => ka == kb,
        _ => false,
    }
}

/// Bonus position inside a line run: swap endpoint when contained, else the
/// middle element
fn bonus_position(m: &Match, swap: Option<Swap>) -> usize {
    if let Some(swap) = swap {
        if let Some(&endpoint) = m.indices.iter().find(|&&index| swap.contains(index)) {
            return endpoint;
        }
    }
    m.indices[m.indices.len() / 2]
}
