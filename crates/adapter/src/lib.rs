//! Adapter module - JSON encoding for the external presentation layer
//!
//! The rules core emits plain Rust records ([`ResolutionStep`], board
//! snapshots); the presentation layer consumes line-delimited JSON. This
//! crate owns that boundary: serde DTOs whose field names are the wire
//! contract, plus `encode_*`/`decode_*` helpers.
//!
//! # Wire contract
//!
//! Field names are `camelCase` and must stay stable - animators key off
//! them directly:
//!
//! - gem: `{"id":"gem-7","type":"ruby","highlight":false}`
//! - tile: `{"type":"frozen","health":2,"maxHealth":2}`
//! - drop: `{"from":3,"to":11,"gem":{...}}`
//! - spawn / bonus: `{"index":0,"gem":{...}}` (bonus adds `"type"`)
//! - swap request: `{"aIndex":3,"bIndex":4}`
//!
//! A step carries `matches`, `cleared`, `drops`, `spawns`, `bonuses`,
//! `tileUpdates`, `score`, and `multiplier`; a settled resolution wraps the
//! step list with `scoreGain`, `multiplier`, and `layersCleared`.

use anyhow::{bail, Context, Result};
use serde::{Deserialize, Serialize};

use gemfall_core::{Board, Resolution};
use gemfall_types::{
    Match, MatchKind, ResolutionStep, Tile, Token, TokenKind,
};

/// Wire form of a token
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GemDto {
    pub id: String,
    #[serde(rename = "type")]
    pub kind: String,
    pub highlight: bool,
}

impl From<Token> for GemDto {
    fn from(token: Token) -> Self {
        Self {
            id: token.id.to_string(),
            kind: token.kind.as_str().to_string(),
            highlight: token.highlight,
        }
    }
}

/// Wire form of a tile layer
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TileDto {
    #[serde(rename = "type")]
    pub kind: String,
    pub health: u8,
    pub max_health: u8,
}

impl From<Tile> for TileDto {
    fn from(tile: Tile) -> Self {
        Self {
            kind: if tile.is_frozen() { "frozen" } else { "standard" }.to_string(),
            health: tile.health,
            max_health: tile.max_health,
        }
    }
}

/// Wire form of a detected match group
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MatchDto {
    /// Origin token kind for runs, `"bonus-blast"` for activations
    #[serde(rename = "type")]
    pub kind: String,
    pub indices: Vec<usize>,
}

impl From<&Match> for MatchDto {
    fn from(m: &Match) -> Self {
        let kind = match m.kind {
            MatchKind::Run(kind) => kind.as_str().to_string(),
            MatchKind::BonusActivation => "bonus-blast".to_string(),
        };
        Self {
            kind,
            indices: m.indices.clone(),
        }
    }
}

/// A token falling to a new position
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DropDto {
    pub from: usize,
    pub to: usize,
    pub gem: GemDto,
}

/// A replacement token entering the board
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SpawnDto {
    pub index: usize,
    pub gem: GemDto,
}

/// A bonus token earned during a pass
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BonusDto {
    pub index: usize,
    pub gem: GemDto,
    #[serde(rename = "type")]
    pub kind: String,
}

/// A tile-layer change
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "camelCase")]
pub enum TileUpdateDto {
    #[serde(rename_all = "camelCase")]
    Damage {
        index: usize,
        health: u8,
        max_health: u8,
    },
    Unfreeze { index: usize },
}

/// One cascade iteration on the wire
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StepDto {
    pub matches: Vec<MatchDto>,
    pub cleared: Vec<usize>,
    pub drops: Vec<DropDto>,
    pub spawns: Vec<SpawnDto>,
    pub bonuses: Vec<BonusDto>,
    pub tile_updates: Vec<TileUpdateDto>,
    pub score: u32,
    pub multiplier: u32,
}

impl From<&ResolutionStep> for StepDto {
    fn from(step: &ResolutionStep) -> Self {
        Self {
            matches: step.matches.iter().map(MatchDto::from).collect(),
            cleared: step.cleared.clone(),
            drops: step
                .drops
                .iter()
                .map(|d| DropDto {
                    from: d.from,
                    to: d.to,
                    gem: d.token.into(),
                })
                .collect(),
            spawns: step
                .spawns
                .iter()
                .map(|s| SpawnDto {
                    index: s.index,
                    gem: s.token.into(),
                })
                .collect(),
            bonuses: step
                .bonuses
                .iter()
                .map(|b| BonusDto {
                    index: b.index,
                    gem: b.token.into(),
                    kind: b.kind.as_str().to_string(),
                })
                .collect(),
            tile_updates: step
                .tile_updates
                .iter()
                .map(|update| match *update {
                    gemfall_types::TileUpdate::Damage {
                        index,
                        health,
                        max_health,
                    } => TileUpdateDto::Damage {
                        index,
                        health,
                        max_health,
                    },
                    gemfall_types::TileUpdate::Unfreeze { index } => {
                        TileUpdateDto::Unfreeze { index }
                    }
                })
                .collect(),
            score: step.score,
            multiplier: step.multiplier,
        }
    }
}

/// A settled cascade on the wire
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ResolutionDto {
    pub steps: Vec<StepDto>,
    pub score_gain: u32,
    pub multiplier: u32,
    pub layers_cleared: u32,
}

impl From<&Resolution> for ResolutionDto {
    fn from(resolution: &Resolution) -> Self {
        Self {
            steps: resolution.steps.iter().map(StepDto::from).collect(),
            score_gain: resolution.score,
            multiplier: resolution.multiplier,
            layers_cleared: resolution.layers_cleared,
        }
    }
}

/// Full board state on the wire; `gems` aligns index-for-index with the
/// board, `null` for empty or blocked cells
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BoardSnapshotDto {
    pub cols: usize,
    pub rows: usize,
    pub gems: Vec<Option<GemDto>>,
    pub tiles: Vec<TileDto>,
}

/// Inbound player move
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SwapRequestDto {
    pub a_index: usize,
    pub b_index: usize,
}

/// Encode one cascade step
pub fn encode_step(step: &ResolutionStep) -> Result<String> {
    serde_json::to_string(&StepDto::from(step)).context("encoding resolution step")
}

/// Encode a settled resolution (step list plus totals)
pub fn encode_resolution(resolution: &Resolution) -> Result<String> {
    serde_json::to_string(&ResolutionDto::from(resolution)).context("encoding resolution")
}

/// Encode the current board and tile grid
pub fn encode_snapshot(board: &Board, tiles: &[Tile]) -> Result<String> {
    if tiles.len() != board.len() {
        bail!(
            "tile grid length {} does not match board length {}",
            tiles.len(),
            board.len()
        );
    }
    let snapshot = BoardSnapshotDto {
        cols: board.cols(),
        rows: board.rows(),
        gems: (0..board.len())
            .map(|index| board.get(index).map(GemDto::from))
            .collect(),
        tiles: tiles.iter().copied().map(TileDto::from).collect(),
    };
    serde_json::to_string(&snapshot).context("encoding board snapshot")
}

/// Decode an inbound swap request line
pub fn decode_swap_request(line: &str) -> Result<SwapRequestDto> {
    serde_json::from_str(line).context("decoding swap request")
}

/// Parse a wire token kind name back into the typed form
pub fn parse_kind(name: &str) -> Result<TokenKind> {
    TokenKind::from_str(name).with_context(|| format!("unknown token kind {name:?}"))
}
