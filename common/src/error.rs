use std::fmt;

/// Errors that can occur during game operations
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum GameError {
    /// Board dimensions outside the supported range
    InvalidDimension { rows: usize, cols: usize },
    /// Coordinates outside the board
    OutOfBounds { row: usize, col: usize },
    /// Target cell already holds a mark
    CellOccupied { row: usize, col: usize },
    /// Game already reached a terminal status
    GameNotPlaying,
    /// Replay step outside the ledger range
    InvalidStep { step: usize, len: usize },
}

impl fmt::Display for GameError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            GameError::InvalidDimension { rows, cols } => {
                write!(f, "Invalid board dimensions {rows}x{cols}: rows and cols must be between 3 and 10")
            }
            GameError::OutOfBounds { row, col } => write!(f, "Cell ({row}, {col}) is outside the board"),
            GameError::CellOccupied { row, col } => write!(f, "Cell ({row}, {col}) is already occupied"),
            GameError::GameNotPlaying => write!(f, "Game is not in progress"),
            GameError::InvalidStep { step, len } => {
                write!(f, "Replay step {step} is outside the ledger range 0..={len}")
            }
        }
    }
}

impl std::error::Error for GameError {}
