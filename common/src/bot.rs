use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use serde::{Deserialize, Serialize};

use crate::board::{Board, Position};

/// Requested bot strength. Stored with game settings and history records;
/// every level currently maps to the random policy, the enum reserves the
/// selector for stronger strategies.
#[derive(Serialize, Deserialize, Clone, Copy, Debug, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum Difficulty {
    Easy,
    Medium,
    Hard,
}

impl Default for Difficulty {
    fn default() -> Difficulty {
        Difficulty::Medium
    }
}

impl std::fmt::Display for Difficulty {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Difficulty::Easy => write!(f, "easy"),
            Difficulty::Medium => write!(f, "medium"),
            Difficulty::Hard => write!(f, "hard"),
        }
    }
}

impl Difficulty {
    pub fn from_string(s: &str) -> Option<Difficulty> {
        match s {
            "easy" => Some(Difficulty::Easy),
            "medium" => Some(Difficulty::Medium),
            "hard" => Some(Difficulty::Hard),
            _ => None,
        }
    }
}

/// Move-selection policy for the bot opponent. Callers guarantee `legal`
/// is non-empty by checking `Board::is_full` before invoking the bot.
pub trait BotStrategy: Send + Sync {
    fn select_move(&mut self, board: &Board, legal: &[Position]) -> Position;
}

/// Uniform random draw over the empty cells
pub struct RandomBot {
    rng: StdRng,
}

impl RandomBot {
    pub fn new() -> RandomBot {
        RandomBot {
            rng: StdRng::from_entropy(),
        }
    }

    /// Deterministic variant for tests
    pub fn seeded(seed: u64) -> RandomBot {
        RandomBot {
            rng: StdRng::seed_from_u64(seed),
        }
    }
}

impl Default for RandomBot {
    fn default() -> RandomBot {
        RandomBot::new()
    }
}

impl BotStrategy for RandomBot {
    fn select_move(&mut self, _board: &Board, legal: &[Position]) -> Position {
        legal[self.rng.gen_range(0..legal.len())]
    }
}

/// Policy lookup by requested strength
pub fn strategy_for(difficulty: Difficulty) -> Box<dyn BotStrategy> {
    match difficulty {
        Difficulty::Easy | Difficulty::Medium | Difficulty::Hard => Box::new(RandomBot::new()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::board::Mark;

    #[test]
    fn test_single_empty_cell_is_always_picked() {
        let mut board = Board::new(3, 3).unwrap();
        let mut mark = Mark::X;
        for row in 0..3 {
            for col in 0..3 {
                if (row, col) == (1, 2) {
                    continue;
                }
                board.set(row, col, mark).unwrap();
                mark = mark.other();
            }
        }

        let legal = board.legal_positions();
        assert_eq!(legal.len(), 1);

        let mut bot = RandomBot::seeded(7);
        for _ in 0..10 {
            let pick = bot.select_move(&board, &legal);
            assert_eq!(pick, Position { row: 1, col: 2 });
        }
    }

    #[test]
    fn test_selection_is_always_legal() {
        let board = Board::new(5, 5).unwrap();
        let legal = board.legal_positions();

        let mut bot = RandomBot::seeded(42);
        for _ in 0..100 {
            let pick = bot.select_move(&board, &legal);
            assert!(legal.contains(&pick));
        }
    }

    #[test]
    fn test_seeded_bots_agree() {
        let board = Board::new(4, 4).unwrap();
        let legal = board.legal_positions();

        let mut first = RandomBot::seeded(99);
        let mut second = RandomBot::seeded(99);
        for _ in 0..20 {
            assert_eq!(
                first.select_move(&board, &legal),
                second.select_move(&board, &legal)
            );
        }
    }

    #[test]
    fn test_strategy_for_covers_every_difficulty() {
        let board = Board::new(3, 3).unwrap();
        let legal = board.legal_positions();
        for difficulty in [Difficulty::Easy, Difficulty::Medium, Difficulty::Hard] {
            let mut bot = strategy_for(difficulty);
            let pick = bot.select_move(&board, &legal);
            assert!(legal.contains(&pick));
        }
    }
}
