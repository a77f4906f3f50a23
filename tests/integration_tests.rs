//! End-to-end session flows: swap, cascade, objectives, hint, JSON out

use gemfall::adapter::{decode_swap_request, encode_snapshot, encode_step};
use gemfall::core::{Board, GemFactory};
use gemfall::engine::{generate_level, GameSession, LevelConfig};
use gemfall::types::{BonusKind, Objective, ObjectiveKind, Tile};

fn small_config(kinds: &[&str]) -> LevelConfig {
    let mut factory = GemFactory::new();
    let board = Board::from_kinds(4, 3, kinds, &mut factory).unwrap();
    LevelConfig {
        id: 1,
        cols: 4,
        rows: 3,
        board,
        tiles: vec![Tile::with_layers(1); 12],
        objectives: vec![
            Objective::new(ObjectiveKind::ClearLayers, 12),
            Objective::new(ObjectiveKind::Score, 500),
        ],
        shuffle_allowance: 1,
    }
}

const READY: [&str; 12] = [
    "ruby", "sapphire", "ruby", "ruby", //
    "topaz", "emerald", "sapphire", "topaz", //
    "emerald", "topaz", "moonstone", "sapphire",
];

#[test]
fn generated_level_boots_a_session() {
    let mut factory = GemFactory::new();
    let config = generate_level(1, &mut factory);
    let session = GameSession::new(config).unwrap();
    assert_eq!(session.board().occupied_count(), 8 * 9);
    assert!(!session.is_complete());
}

#[test]
fn player_swap_flows_to_json_steps() {
    let mut session = GameSession::new(small_config(&READY)).unwrap();

    let request = decode_swap_request(r#"{"aIndex":0,"bIndex":1}"#).unwrap();
    let report = session
        .request_swap(request.a_index, request.b_index)
        .unwrap();
    assert!(report.score_gain >= 300);

    for step in &report.steps {
        let line = encode_step(step).unwrap();
        let value: serde_json::Value = serde_json::from_str(&line).unwrap();
        assert!(value["cleared"].is_array());
        assert!(value["multiplier"].is_u64());
    }

    // The settled state snapshots cleanly
    let snapshot = encode_snapshot(session.board(), session.tiles()).unwrap();
    let value: serde_json::Value = serde_json::from_str(&snapshot).unwrap();
    assert_eq!(value["gems"].as_array().unwrap().len(), 12);
}

#[test]
fn hint_then_play_the_hint() {
    let mut session = GameSession::new(small_config(&READY)).unwrap();
    let hint = session.hint().unwrap();
    let report = session.request_swap(hint.swap.a, hint.swap.b).unwrap();
    assert!(!report.steps.is_empty());
    assert!(session.score() > 0);
}

#[test]
fn stash_bonus_drives_objective_progress() {
    let mut session = GameSession::new(small_config(&READY)).unwrap();
    let report = session
        .request_bonus_activation(BonusKind::Bomb, 5)
        .unwrap();
    assert!(report.layers_cleared >= 9);
    let layers = session
        .objectives()
        .iter()
        .find(|o| o.kind == ObjectiveKind::ClearLayers)
        .unwrap();
    assert_eq!(layers.progress, report.layers_cleared.min(12));
}

#[test]
fn shuffle_consumes_the_allowance_and_keeps_tokens() {
    let mut session = GameSession::new(small_config(&READY)).unwrap();
    let count_before = session.board().occupied_count();
    assert!(session.request_shuffle());
    assert_eq!(session.board().occupied_count(), count_before);
    assert!(!session.request_shuffle());
}

#[test]
fn rejected_swap_costs_nothing() {
    let mut session = GameSession::new(small_config(&READY)).unwrap();
    // Diagonal, therefore never legal
    assert!(session.request_swap(0, 5).is_none());
    assert_eq!(session.score(), 0);
    assert!(session
        .objectives()
        .iter()
        .all(|objective| objective.progress == 0));
}
