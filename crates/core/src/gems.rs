//! Gem factory module - token creation with session-unique identities
//!
//! Token identity must be stable across moves so the presentation layer can
//! animate "this sprite moved" through drops and cascades. The factory is
//! an explicit instance owned by the session (not a module-level counter),
//! which keeps tests isolated and id sequences reproducible.

use crate::rng::GameRng;
use gemfall_types::{BonusKind, GemId, GemKind, Token, TokenKind, GEM_KINDS};

/// Creates tokens with unique ids and supplies random color selection
#[derive(Debug, Clone, Default)]
pub struct GemFactory {
    next_id: u64,
}

impl GemFactory {
    /// Create a factory whose first token gets id 0
    pub fn new() -> Self {
        Self { next_id: 0 }
    }

    /// Create a token of the given kind
    pub fn create(&mut self, kind: TokenKind) -> Token {
        let id = GemId(self.next_id);
        self.next_id += 1;
        Token {
            id,
            kind,
            highlight: false,
        }
    }

    /// Create a highlighted bonus token (freshly earned bonuses glow)
    pub fn create_bonus(&mut self, kind: BonusKind) -> Token {
        let mut token = self.create(TokenKind::Bonus(kind));
        token.highlight = true;
        token
    }

    /// Pick a random base gem color through the caller's RNG
    pub fn random_kind(rng: &mut GameRng) -> GemKind {
        GEM_KINDS[rng.next_range(GEM_KINDS.len())]
    }

    /// Create a token with a random base gem color
    pub fn create_random(&mut self, rng: &mut GameRng) -> Token {
        self.create(TokenKind::Gem(Self::random_kind(rng)))
    }

    /// Number of tokens created so far
    pub fn created_count(&self) -> u64 {
        self.next_id
    }

    /// Reset the id counter to zero
    ///
    /// Only safe between sessions: ids handed out before the reset will be
    /// reused afterwards. Intended for test isolation and level restarts.
    pub fn reset(&mut self) {
        self.next_id = 0;
    }
}
