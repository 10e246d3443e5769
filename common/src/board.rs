use serde::{Deserialize, Serialize};

use crate::GameError;

/// Smallest board edge accepted at game creation
pub const MIN_DIMENSION: usize = 3;
/// Largest board edge accepted at game creation
pub const MAX_DIMENSION: usize = 10;
/// The required run length never grows past five, even on large boards
pub const MAX_WIN_LENGTH: usize = 5;

/// A player symbol. An empty cell is modeled as `Option<Mark>`.
#[derive(Serialize, Deserialize, Clone, Copy, Debug, PartialEq, Eq)]
pub enum Mark {
    X,
    O,
}

impl Mark {
    /// The opposing symbol
    pub fn other(self) -> Mark {
        match self {
            Mark::X => Mark::O,
            Mark::O => Mark::X,
        }
    }

    pub fn from_string(s: &str) -> Option<Mark> {
        match s {
            "X" => Some(Mark::X),
            "O" => Some(Mark::O),
            _ => None,
        }
    }
}

impl std::fmt::Display for Mark {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Mark::X => write!(f, "X"),
            Mark::O => write!(f, "O"),
        }
    }
}

/// Zero-indexed board coordinates
#[derive(Serialize, Deserialize, Clone, Copy, Debug, PartialEq, Eq)]
pub struct Position {
    pub row: usize,
    pub col: usize,
}

/// A rectangular grid of cells, stored row-major. Dimensions are fixed for
/// the lifetime of a game; only cell contents change, and only through
/// [`Board::set`] onto empty cells.
#[derive(Serialize, Deserialize, Clone, Debug, PartialEq)]
pub struct Board {
    rows: usize,
    cols: usize,
    cells: Vec<Option<Mark>>,
}

impl Board {
    /// Create an all-empty board. Both dimensions must be in `[3, 10]`.
    pub fn new(rows: usize, cols: usize) -> Result<Board, GameError> {
        let valid = MIN_DIMENSION..=MAX_DIMENSION;
        if !valid.contains(&rows) || !valid.contains(&cols) {
            return Err(GameError::InvalidDimension { rows, cols });
        }
        Ok(Board {
            rows,
            cols,
            cells: vec![None; rows * cols],
        })
    }

    pub fn rows(&self) -> usize {
        self.rows
    }

    pub fn cols(&self) -> usize {
        self.cols
    }

    /// Minimum contiguous same-symbol run required to win on this board:
    /// `min(rows, cols, 5)`, which the dimension bounds keep at 3 or above.
    pub fn win_length(&self) -> usize {
        self.rows.min(self.cols).min(MAX_WIN_LENGTH)
    }

    fn index(&self, row: usize, col: usize) -> Result<usize, GameError> {
        if row >= self.rows || col >= self.cols {
            return Err(GameError::OutOfBounds { row, col });
        }
        Ok(row * self.cols + col)
    }

    pub fn get(&self, row: usize, col: usize) -> Result<Option<Mark>, GameError> {
        Ok(self.cells[self.index(row, col)?])
    }

    /// Write a mark into an empty cell
    pub fn set(&mut self, row: usize, col: usize, mark: Mark) -> Result<(), GameError> {
        let index = self.index(row, col)?;
        if self.cells[index].is_some() {
            return Err(GameError::CellOccupied { row, col });
        }
        self.cells[index] = Some(mark);
        Ok(())
    }

    pub fn is_full(&self) -> bool {
        self.cells.iter().all(|cell| cell.is_some())
    }

    /// All empty cells, in row-major order
    pub fn legal_positions(&self) -> Vec<Position> {
        self.cells
            .iter()
            .enumerate()
            .filter(|(_, cell)| cell.is_none())
            .map(|(index, _)| Position {
                row: index / self.cols,
                col: index % self.cols,
            })
            .collect()
    }

    /// An empty board with the same dimensions
    pub fn cleared(&self) -> Board {
        Board {
            rows: self.rows,
            cols: self.cols,
            cells: vec![None; self.rows * self.cols],
        }
    }

    /// The cells as nested rows, for API snapshots
    pub fn grid(&self) -> Vec<Vec<Option<Mark>>> {
        self.cells.chunks(self.cols).map(|row| row.to_vec()).collect()
    }
}
