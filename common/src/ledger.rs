use serde::{Deserialize, Serialize};

use crate::board::{Mark, Position};

/// Who triggered a move. Informational metadata carried on the ledger for
/// display; game logic and replay never read it. Serialized values match
/// the stored history documents.
#[derive(Serialize, Deserialize, Clone, Copy, Debug, PartialEq, Eq)]
pub enum MoveActor {
    #[serde(rename = "st")]
    Host,
    #[serde(rename = "nd")]
    Guest,
    #[serde(rename = "bot")]
    Bot,
}

/// One applied ply, immutable once appended
#[derive(Serialize, Deserialize, Clone, Debug, PartialEq, Eq)]
pub struct Move {
    #[serde(rename = "playerId")]
    pub actor: MoveActor,
    pub symbol: Mark,
    pub position: Position,
    /// 1-based, strictly increasing by one per ply
    #[serde(rename = "moveNumber")]
    pub move_number: u32,
    /// Unix milliseconds
    pub timestamp: i64,
}

/// Append-only chronological log of one game's moves. Insertion order,
/// chronological order and `move_number` order coincide; entries are never
/// edited or reordered, only appended or dropped wholesale on restart.
#[derive(Serialize, Deserialize, Clone, Debug, Default, PartialEq, Eq)]
#[serde(transparent)]
pub struct Ledger {
    moves: Vec<Move>,
}

impl Ledger {
    pub fn new() -> Ledger {
        Ledger { moves: Vec::new() }
    }

    pub(crate) fn append(&mut self, game_move: Move) {
        self.moves.push(game_move);
    }

    pub fn len(&self) -> usize {
        self.moves.len()
    }

    pub fn is_empty(&self) -> bool {
        self.moves.is_empty()
    }

    pub fn moves(&self) -> &[Move] {
        &self.moves
    }

    pub fn last(&self) -> Option<&Move> {
        self.moves.last()
    }
}

impl From<Vec<Move>> for Ledger {
    fn from(moves: Vec<Move>) -> Ledger {
        Ledger { moves }
    }
}
