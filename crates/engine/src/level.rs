//! Level generator module - deterministic seeded level configs
//!
//! Level definitions are never persisted: each one is regenerated from an
//! integer seed derived from its id (`seed = id * LEVEL_SEED_STRIDE`), so
//! the same id always yields the same board, tile grid, and objectives.

use gemfall_core::{Board, GameRng, GemFactory};
use gemfall_types::{
    Objective, ObjectiveKind, Tile, TokenKind, DEFAULT_BOARD_COLS, DEFAULT_BOARD_ROWS,
    LEVEL_COUNT, LEVEL_SEED_STRIDE, SCORE_TARGET_BASE, SCORE_TARGET_STEP,
};

/// Everything needed to start one level
#[derive(Debug, Clone)]
pub struct LevelConfig {
    pub id: u32,
    pub cols: usize,
    pub rows: usize,
    pub board: Board,
    pub tiles: Vec<Tile>,
    pub objectives: Vec<Objective>,
    /// Board reshuffles the player may spend on this level
    pub shuffle_allowance: u32,
}

impl LevelConfig {
    /// Sum of all tile layers - the clear-layers objective target
    pub fn total_layers(&self) -> u32 {
        self.tiles.iter().map(|tile| u32::from(tile.max_health)).sum()
    }
}

/// Tile layers per cell: the first level plays on single layers
fn layer_count(id: u32) -> u8 {
    if id == 1 {
        1
    } else {
        2
    }
}

/// Generate the config for one level id
///
/// Tokens are created through `factory` so their ids stay unique within
/// the caller's session.
pub fn generate_level(id: u32, factory: &mut GemFactory) -> LevelConfig {
    let cols = DEFAULT_BOARD_COLS;
    let rows = DEFAULT_BOARD_ROWS;
    let mut rng = GameRng::new(id.wrapping_mul(LEVEL_SEED_STRIDE));

    // Board::new only fails for zero dimensions; the defaults are not zero
    let mut board = Board::new(cols, rows).expect("default board dimensions are valid");
    for index in 0..board.len() {
        let kind = TokenKind::Gem(GemFactory::random_kind(&mut rng));
        board.set(index, Some(factory.create(kind)));
    }

    let tiles = vec![Tile::with_layers(layer_count(id)); cols * rows];
    let total_layers: u32 = tiles.iter().map(|tile| u32::from(tile.max_health)).sum();

    let objectives = vec![
        Objective::new(ObjectiveKind::ClearLayers, total_layers),
        Objective::new(
            ObjectiveKind::Score,
            SCORE_TARGET_BASE + id * SCORE_TARGET_STEP,
        ),
    ];

    LevelConfig {
        id,
        cols,
        rows,
        board,
        tiles,
        objectives,
        shuffle_allowance: (4u32.saturating_sub(id / 5)).max(1),
    }
}

/// Generate the full campaign (ids 1..=LEVEL_COUNT)
pub fn generate_level_set(factory: &mut GemFactory) -> Vec<LevelConfig> {
    (1..=LEVEL_COUNT)
        .map(|id| generate_level(id, factory))
        .collect()
}
