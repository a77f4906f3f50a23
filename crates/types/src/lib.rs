//! Core types module - shared data structures and constants
//!
//! This module defines the fundamental types used throughout the rules core.
//! All types are pure data structures with no external dependencies, making
//! them usable in any context (core logic, session orchestration, adapter
//! serialization).
//!
//! # Board Dimensions
//!
//! Default level dimensions (levels may override):
//!
//! - **Columns**: 8 (indexed 0-7)
//! - **Rows**: 9 (indexed 0-8)
//! - **Index mapping**: `index = row * cols + col`
//!
//! # Tuning Constants
//!
//! | Constant | Value | Description |
//! |----------|-------|-------------|
//! | `MIN_RUN_LEN` | 3 | Shortest reported same-kind run |
//! | `BOMB_LINE_LEN` | 4 | Line length that creates a bomb |
//! | `RAINBOW_LINE_LEN` | 5 | Line length that creates a rainbow |
//! | `CROSS_MIN_CELLS` | 5 | Minimum unique cells in a cross pattern |
//! | `RAINBOW_RANDOM_PICKS` | 15 | Cells a random-mode rainbow selects |
//! | `BASE_MATCH_SCORE` | 100 | Points per cleared cell at 1x |
//! | `MAX_CASCADE_MULTIPLIER` | 10 | Cap on the cascade score multiplier |
//!
//! `RAINBOW_RANDOM_PICKS` is a balancing value, not a structural invariant;
//! it is independent of board size.
//!
//! # Examples
//!
//! ```
//! use gemfall_types::{GemKind, TokenKind, BonusKind, Swap};
//!
//! let kind = TokenKind::Gem(GemKind::Ruby);
//! assert!(!kind.is_bonus());
//! assert!(TokenKind::Bonus(BonusKind::Bomb).is_bonus());
//!
//! // Parse from the wire representation (case-insensitive)
//! assert_eq!(TokenKind::from_str("ruby"), Some(kind));
//!
//! let swap = Swap { a: 3, b: 4 };
//! assert_eq!(swap.endpoints(), [3, 4]);
//! ```

/// Default board columns for generated levels
pub const DEFAULT_BOARD_COLS: usize = 8;

/// Default board rows for generated levels
pub const DEFAULT_BOARD_ROWS: usize = 9;

/// Minimum run length reported as a match
pub const MIN_RUN_LEN: usize = 3;

/// Straight run length that creates a bomb bonus
pub const BOMB_LINE_LEN: usize = 4;

/// Straight run length that creates a rainbow bonus
pub const RAINBOW_LINE_LEN: usize = 5;

/// Minimum unique cell count for a cross pattern (3 + 3 sharing one cell)
pub const CROSS_MIN_CELLS: usize = 5;

/// Number of cells a random-mode rainbow clears (balancing value, tunable)
pub const RAINBOW_RANDOM_PICKS: usize = 15;

/// Base score per cleared cell at multiplier 1
pub const BASE_MATCH_SCORE: u32 = 100;

/// Cap on the cascade score multiplier
pub const MAX_CASCADE_MULTIPLIER: u32 = 10;

/// Per-level RNG seed stride (`seed = level_id * LEVEL_SEED_STRIDE`)
pub const LEVEL_SEED_STRIDE: u32 = 1337;

/// Number of levels in the generated campaign
pub const LEVEL_COUNT: u32 = 12;

/// Score objective base value
pub const SCORE_TARGET_BASE: u32 = 20_000;

/// Score objective increment per level
pub const SCORE_TARGET_STEP: u32 = 1_500;

/// The six base gem colors
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum GemKind {
    Ruby,
    Sapphire,
    Emerald,
    Topaz,
    Amethyst,
    Moonstone,
}

/// All base gem colors in canonical order (used by random selection)
pub const GEM_KINDS: [GemKind; 6] = [
    GemKind::Ruby,
    GemKind::Sapphire,
    GemKind::Emerald,
    GemKind::Topaz,
    GemKind::Amethyst,
    GemKind::Moonstone,
];

impl GemKind {
    /// Parse gem kind from string (case-insensitive)
    pub fn from_str(s: &str) -> Option<Self> {
        match s.to_lowercase().as_str() {
            "ruby" => Some(GemKind::Ruby),
            "sapphire" => Some(GemKind::Sapphire),
            "emerald" => Some(GemKind::Emerald),
            "topaz" => Some(GemKind::Topaz),
            "amethyst" => Some(GemKind::Amethyst),
            "moonstone" => Some(GemKind::Moonstone),
            _ => None,
        }
    }

    /// Convert to lowercase string representation
    pub fn as_str(&self) -> &'static str {
        match self {
            GemKind::Ruby => "ruby",
            GemKind::Sapphire => "sapphire",
            GemKind::Emerald => "emerald",
            GemKind::Topaz => "topaz",
            GemKind::Amethyst => "amethyst",
            GemKind::Moonstone => "moonstone",
        }
    }
}

/// Bonus token kinds
///
/// Activation effects:
/// - **Bomb**: clears the 3x3 block centered on its position
/// - **Rainbow**: clears by color / everything / random cells, depending on
///   its swap counterpart
/// - **Cross**: clears its entire row and column
/// - **ClearRow**: clears its row
/// - **TransformGems**: reserved (no effect yet)
/// - **UnfreezeAll**: flips every frozen tile to playable
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum BonusKind {
    Bomb,
    Rainbow,
    Cross,
    ClearRow,
    TransformGems,
    UnfreezeAll,
}

impl BonusKind {
    /// Parse bonus kind from string (case-insensitive, snake_case wire names)
    pub fn from_str(s: &str) -> Option<Self> {
        match s.to_lowercase().as_str() {
            "bomb" => Some(BonusKind::Bomb),
            "rainbow" => Some(BonusKind::Rainbow),
            "cross" => Some(BonusKind::Cross),
            "clear_row" => Some(BonusKind::ClearRow),
            "transform_gems" => Some(BonusKind::TransformGems),
            "unfreeze_all" => Some(BonusKind::UnfreezeAll),
            _ => None,
        }
    }

    /// Convert to the snake_case wire name
    pub fn as_str(&self) -> &'static str {
        match self {
            BonusKind::Bomb => "bomb",
            BonusKind::Rainbow => "rainbow",
            BonusKind::Cross => "cross",
            BonusKind::ClearRow => "clear_row",
            BonusKind::TransformGems => "transform_gems",
            BonusKind::UnfreezeAll => "unfreeze_all",
        }
    }
}

/// What occupies a board cell: a plain gem, a bonus token, or a wildcard
///
/// Wildcards extend a run of any origin kind without breaking it but never
/// start a run themselves.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TokenKind {
    Gem(GemKind),
    Bonus(BonusKind),
    Wildcard,
}

impl TokenKind {
    /// Whether this kind is an activatable bonus
    pub fn is_bonus(&self) -> bool {
        matches!(self, TokenKind::Bonus(_))
    }

    /// Bonus kind, if this is a bonus token
    pub fn bonus(&self) -> Option<BonusKind> {
        match self {
            TokenKind::Bonus(kind) => Some(*kind),
            _ => None,
        }
    }

    /// Parse from the wire name (gem color, bonus name, or "wildcard")
    pub fn from_str(s: &str) -> Option<Self> {
        if s.eq_ignore_ascii_case("wildcard") {
            return Some(TokenKind::Wildcard);
        }
        if let Some(gem) = GemKind::from_str(s) {
            return Some(TokenKind::Gem(gem));
        }
        BonusKind::from_str(s).map(TokenKind::Bonus)
    }

    /// Convert to the wire name
    pub fn as_str(&self) -> &'static str {
        match self {
            TokenKind::Gem(gem) => gem.as_str(),
            TokenKind::Bonus(bonus) => bonus.as_str(),
            TokenKind::Wildcard => "wildcard",
        }
    }
}

/// Opaque unique token identity
///
/// Stable across moves: the resolver preserves a token's id through drops so
/// consumers can animate "this sprite moved" rather than "this sprite was
/// replaced". Ids are unique for the lifetime of a `GemFactory` instance
/// (see `gemfall-core`).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct GemId(pub u64);

impl std::fmt::Display for GemId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "gem-{}", self.0)
    }
}

/// A typed, uniquely-identified playable unit occupying one board cell
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Token {
    pub id: GemId,
    pub kind: TokenKind,
    /// Presentation hint set on freshly created bonus tokens
    pub highlight: bool,
}

/// Structural state of the tile layer beneath a cell
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TileState {
    Playable,
    Frozen,
}

/// Per-cell structural state, independent of which token sits on it
///
/// `health` counts how many hits (matches/clears covering the cell) remain
/// before the tile layer is fully removed. A tile at health 0 takes no
/// further damage. Frozen tiles block damage and active clearing but
/// unfreeze when an orthogonally adjacent cell is cleared.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Tile {
    pub state: TileState,
    pub health: u8,
    pub max_health: u8,
}

impl Tile {
    /// A playable tile with the given number of layers
    pub fn with_layers(layers: u8) -> Self {
        Self {
            state: TileState::Playable,
            health: layers,
            max_health: layers,
        }
    }

    /// A frozen tile with the given number of layers
    pub fn frozen(layers: u8) -> Self {
        Self {
            state: TileState::Frozen,
            health: layers,
            max_health: layers,
        }
    }

    /// Whether the tile layer is fully removed
    pub fn is_cleared(&self) -> bool {
        self.health == 0
    }

    /// Whether the tile currently blocks damage and clearing
    pub fn is_frozen(&self) -> bool {
        self.state == TileState::Frozen
    }
}

impl Default for Tile {
    fn default() -> Self {
        Self::with_layers(1)
    }
}

/// Run orientation for ordinary matches
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Orientation {
    Horizontal,
    Vertical,
}

/// What kind of match a group of indices represents
///
/// `BonusActivation` is the synthetic kind for cells cleared by an activated
/// bonus rather than an ordinary same-kind run.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum MatchKind {
    Run(TokenKind),
    BonusActivation,
}

/// A detected group of board positions to clear together
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Match {
    pub kind: MatchKind,
    /// Board positions in scan order (run order for ordinary matches)
    pub indices: Vec<usize>,
    /// Present for ordinary runs, absent for bonus activations
    pub orientation: Option<Orientation>,
}

impl Match {
    /// An ordinary run match
    pub fn run(kind: TokenKind, indices: Vec<usize>, orientation: Orientation) -> Self {
        Self {
            kind: MatchKind::Run(kind),
            indices,
            orientation: Some(orientation),
        }
    }

    /// A synthetic bonus-activation match
    pub fn bonus_activation(indices: Vec<usize>) -> Self {
        Self {
            kind: MatchKind::BonusActivation,
            indices,
            orientation: None,
        }
    }

    /// Whether this match came from a bonus activation
    pub fn is_bonus_activation(&self) -> bool {
        self.kind == MatchKind::BonusActivation
    }
}

/// The two positions exchanged by a player move (must be 4-adjacent)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Swap {
    pub a: usize,
    pub b: usize,
}

impl Swap {
    pub fn new(a: usize, b: usize) -> Self {
        Self { a, b }
    }

    /// Both endpoints in declaration order
    pub fn endpoints(&self) -> [usize; 2] {
        [self.a, self.b]
    }

    /// Whether the given index is one of the swap endpoints
    pub fn contains(&self, index: usize) -> bool {
        self.a == index || self.b == index
    }
}

/// A token movement recorded during gravity collapse
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TokenDrop {
    pub from: usize,
    pub to: usize,
    pub token: Token,
}

/// A freshly created token filling an empty cell
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TokenSpawn {
    pub index: usize,
    pub token: Token,
}

/// A bonus token created by a match pattern during a resolution pass
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BonusSpawn {
    pub kind: BonusKind,
    pub index: usize,
    pub token: Token,
}

/// A tile-layer change recorded for step reporting
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TileUpdate {
    /// The tile at `index` took one hit; `health` is the value after the hit
    Damage {
        index: usize,
        health: u8,
        max_health: u8,
    },
    /// The frozen tile at `index` became playable
    Unfreeze { index: usize },
}

/// One cascade iteration's recorded effects - the unit of externally
/// observable progress, consumed by the presentation layer for animation
#[derive(Debug, Clone, PartialEq)]
pub struct ResolutionStep {
    /// The match batch that drove this iteration
    pub matches: Vec<Match>,
    /// Cleared positions, sorted ascending
    pub cleared: Vec<usize>,
    /// Token movements from gravity collapse
    pub drops: Vec<TokenDrop>,
    /// Replacement tokens filling the top of each column
    pub spawns: Vec<TokenSpawn>,
    /// Bonus tokens created this iteration (protected from their own pass)
    pub bonuses: Vec<BonusSpawn>,
    /// Tile damage and unfreeze events
    pub tile_updates: Vec<TileUpdate>,
    /// Score gained this iteration
    pub score: u32,
    /// Cascade multiplier applied to this iteration
    pub multiplier: u32,
}

/// Objective kinds tracked per level
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ObjectiveKind {
    /// Clear every tile layer (target = sum of all tile max health)
    ClearLayers,
    /// Reach a score threshold
    Score,
}

/// A level objective with progress tracking
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Objective {
    pub kind: ObjectiveKind,
    pub target: u32,
    pub progress: u32,
}

impl Objective {
    pub fn new(kind: ObjectiveKind, target: u32) -> Self {
        Self {
            kind,
            target,
            progress: 0,
        }
    }

    /// Whether the target has been reached
    pub fn is_complete(&self) -> bool {
        self.progress >= self.target
    }

    /// Add progress, saturating at the target
    pub fn advance(&mut self, amount: u32) {
        self.progress = self.progress.saturating_add(amount).min(self.target);
    }
}
