use crate::board::{Board, Mark, Position};

/// Scan order for run directions: horizontal, vertical, diagonal-down,
/// diagonal-up. Combined with the row-major cell scan this makes the
/// first-hit tie-break deterministic.
const DIRECTIONS: [(isize, isize); 4] = [(0, 1), (1, 0), (1, 1), (1, -1)];

/// A detected win: the owning symbol and exactly `win_length` coordinates
/// in board order along the run's direction.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Win {
    pub winner: Mark,
    pub line: Vec<Position>,
}

/// Look for a contiguous run of at least `board.win_length()` cells holding
/// the same mark. Every occupied cell is probed in all four directions: the
/// run is grown backward then forward from the probe cell, so a qualifying
/// line is found no matter which of its cells the scan reaches first. The
/// first qualifying hit is returned immediately; duplicate detections of
/// the same line are therefore harmless.
pub fn detect_win(board: &Board) -> Option<Win> {
    let length = board.win_length();
    for row in 0..board.rows() {
        for col in 0..board.cols() {
            let mark = match board.get(row, col) {
                Ok(Some(mark)) => mark,
                _ => continue,
            };
            for (d_row, d_col) in DIRECTIONS {
                if let Some(line) = run_through(board, mark, row, col, d_row, d_col, length) {
                    return Some(Win { winner: mark, line });
                }
            }
        }
    }
    None
}

fn mark_at(board: &Board, row: isize, col: isize) -> Option<Mark> {
    if row < 0 || col < 0 {
        return None;
    }
    board.get(row as usize, col as usize).ok().flatten()
}

/// Grow the longest run of `mark` through `(row, col)` along `(d_row,
/// d_col)`, walking up to `length - 1` steps each way. Returns the first
/// `length` cells of the run, smallest coordinate first along the
/// direction, when the run qualifies.
fn run_through(
    board: &Board,
    mark: Mark,
    row: usize,
    col: usize,
    d_row: isize,
    d_col: isize,
    length: usize,
) -> Option<Vec<Position>> {
    let origin = (row as isize, col as isize);

    let mut backward = Vec::new();
    for step in 1..length as isize {
        let (r, c) = (origin.0 - d_row * step, origin.1 - d_col * step);
        if mark_at(board, r, c) != Some(mark) {
            break;
        }
        backward.push(Position {
            row: r as usize,
            col: c as usize,
        });
    }

    let mut line: Vec<Position> = backward.into_iter().rev().collect();
    line.push(Position { row, col });
    for step in 1..length as isize {
        let (r, c) = (origin.0 + d_row * step, origin.1 + d_col * step);
        if mark_at(board, r, c) != Some(mark) {
            break;
        }
        line.push(Position {
            row: r as usize,
            col: c as usize,
        });
    }

    if line.len() >= length {
        line.truncate(length);
        Some(line)
    } else {
        None
    }
}
