//! The 7x6 connect four grid.

use std::collections::BTreeMap;
use std::str::FromStr;

use tracing::{debug, instrument};

use crate::{BoardParseError, Disc};

/// Number of columns.
pub const WIDTH: usize = 7;

/// Number of rows.
pub const HEIGHT: usize = 6;

/// Fixed 7x6 connect four board. Row 0 is the top row.
///
/// Cells only go from empty to occupied; the only way back is [`Board::reset`].
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Board {
    /// Cells in row-major order.
    cells: [Disc; WIDTH * HEIGHT],
}

impl Board {
    /// Creates an empty board.
    pub fn new() -> Self {
        Self {
            cells: [Disc::None; WIDTH * HEIGHT],
        }
    }

    fn index(row: usize, col: usize) -> usize {
        assert!(row < HEIGHT, "row {row} out of bounds");
        assert!(col < WIDTH, "column {col} out of bounds");
        row * WIDTH + col
    }

    /// Returns the content of the cell at `row`, `col` (both 0-based).
    ///
    /// # Panics
    ///
    /// Panics if `row` or `col` is outside the board. Callers are expected
    /// to stay in bounds; this is not a user-facing error.
    pub fn cell(&self, row: usize, col: usize) -> Disc {
        self.cells[Self::index(row, col)]
    }

    fn set_cell(&mut self, row: usize, col: usize, disc: Disc) {
        self.cells[Self::index(row, col)] = disc;
    }

    /// Drops `disc` into the 0-based `column`.
    ///
    /// The disc lands in the lowest empty row. Returns false without touching
    /// the board if the column is full or out of range.
    #[instrument(skip(self))]
    pub fn add_disc(&mut self, column: usize, disc: Disc) -> bool {
        if column >= WIDTH {
            debug!(column, "Column out of range");
            return false;
        }

        match (0..HEIGHT).rev().find(|&row| !self.cell(row, column).is_some()) {
            Some(row) => {
                self.set_cell(row, column, disc);
                debug!(row, column, ?disc, "Disc placed");
                true
            }
            None => {
                debug!(column, "Column is full");
                false
            }
        }
    }

    /// Returns true if no more discs fit in the 0-based `column`.
    ///
    /// Out-of-range columns count as full.
    pub fn column_is_full(&self, column: usize) -> bool {
        column >= WIDTH || self.cell(0, column).is_some()
    }

    /// Returns true if every column is full.
    pub fn is_full(&self) -> bool {
        (0..WIDTH).all(|col| self.column_is_full(col))
    }

    /// Clears every cell.
    pub fn reset(&mut self) {
        self.cells = [Disc::None; WIDTH * HEIGHT];
    }

    /// Returns true if four equal discs line up anywhere on the board.
    pub fn has_connect_four(&self) -> bool {
        let horizontal = || {
            (0..HEIGHT).any(|row| {
                (0..=WIDTH - 4).any(|col| {
                    self.four_equal([(row, col), (row, col + 1), (row, col + 2), (row, col + 3)])
                })
            })
        };

        let vertical = || {
            (0..WIDTH).any(|col| {
                (0..=HEIGHT - 4).any(|row| {
                    self.four_equal([(row, col), (row + 1, col), (row + 2, col), (row + 3, col)])
                })
            })
        };

        // Runs down and to the left: /
        let rising = || {
            (3..WIDTH).any(|col| {
                (0..=HEIGHT - 4).any(|row| {
                    self.four_equal([
                        (row, col),
                        (row + 1, col - 1),
                        (row + 2, col - 2),
                        (row + 3, col - 3),
                    ])
                })
            })
        };

        // Runs down and to the right: \
        let falling = || {
            (0..=WIDTH - 4).any(|col| {
                (0..=HEIGHT - 4).any(|row| {
                    self.four_equal([
                        (row, col),
                        (row + 1, col + 1),
                        (row + 2, col + 2),
                        (row + 3, col + 3),
                    ])
                })
            })
        };

        horizontal() || vertical() || rising() || falling()
    }

    fn four_equal(&self, cells: [(usize, usize); 4]) -> bool {
        let [(row, col), rest @ ..] = cells;
        let disc = self.cell(row, col);
        disc.is_some() && rest.iter().all(|&(r, c)| self.cell(r, c) == disc)
    }

    /// Returns row `row` (0-based) as a string of disc symbols.
    fn row_symbols(&self, row: usize) -> String {
        (0..WIDTH).map(|col| self.cell(row, col).symbol()).collect()
    }

    /// Returns the board as a map from 1-based row number to the row's
    /// symbols, left to right.
    pub fn to_map(&self) -> BTreeMap<usize, String> {
        (0..HEIGHT)
            .map(|row| (row + 1, self.row_symbols(row)))
            .collect()
    }

    /// Builds a board from the map produced by [`Board::to_map`].
    ///
    /// Rows missing from the map are left empty.
    ///
    /// # Errors
    ///
    /// Returns [`BoardParseError`] if a row number is outside `1..=6` or a
    /// row does not hold exactly seven symbols.
    #[instrument(skip(map), fields(rows = map.len()))]
    pub fn from_map(map: &BTreeMap<usize, String>) -> Result<Self, BoardParseError> {
        let mut board = Self::new();
        for (&row, symbols) in map {
            if !(1..=HEIGHT).contains(&row) {
                return Err(BoardParseError::new(format!("row {row} out of range")));
            }
            let discs: Vec<Disc> = symbols.chars().map(Disc::from_symbol).collect();
            if discs.len() != WIDTH {
                return Err(BoardParseError::new(format!(
                    "row {row} has {} cells, expected {WIDTH}",
                    discs.len()
                )));
            }
            for (col, disc) in discs.into_iter().enumerate() {
                board.set_cell(row - 1, col, disc);
            }
        }
        Ok(board)
    }
}

impl Default for Board {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Display for Board {
    /// One `|c|c|...|` line per row, top to bottom.
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        for row in 0..HEIGHT {
            write!(f, "|")?;
            for col in 0..WIDTH {
                write!(f, "{}|", self.cell(row, col))?;
            }
            writeln!(f)?;
        }
        Ok(())
    }
}

impl FromStr for Board {
    type Err = BoardParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let lines: Vec<&str> = s.lines().collect();
        if lines.len() != HEIGHT {
            return Err(BoardParseError::new(format!(
                "expected {HEIGHT} rows, found {}",
                lines.len()
            )));
        }

        let mut board = Self::new();
        for (row, line) in lines.into_iter().enumerate() {
            let chars: Vec<char> = line.chars().collect();
            if chars.len() != 2 * WIDTH + 1 {
                return Err(BoardParseError::new(format!(
                    "row {} has length {}, expected {}",
                    row + 1,
                    chars.len(),
                    2 * WIDTH + 1
                )));
            }
            if chars.iter().step_by(2).any(|&c| c != '|') {
                return Err(BoardParseError::new(format!(
                    "row {} is missing a '|' separator",
                    row + 1
                )));
            }
            for (col, &symbol) in chars.iter().skip(1).step_by(2).enumerate() {
                board.set_cell(row, col, Disc::from_symbol(symbol));
            }
        }
        Ok(board)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_fill_each_column_bottom_to_top() {
        for col in 0..WIDTH {
            let mut board = Board::new();
            for placed in 0..HEIGHT {
                assert!(board.add_disc(col, Disc::Red));
                assert_eq!(board.cell(HEIGHT - 1 - placed, col), Disc::Red);
            }
            let before = board.clone();
            assert!(!board.add_disc(col, Disc::Yellow));
            assert_eq!(board, before);
        }
    }

    #[test]
    fn test_add_disc_out_of_range() {
        let mut board = Board::new();
        assert!(!board.add_disc(WIDTH, Disc::Red));
        assert_eq!(board, Board::new());
    }

    #[test]
    fn test_discs_stack() {
        let mut board = Board::new();
        board.add_disc(2, Disc::Red);
        board.add_disc(2, Disc::Yellow);
        assert_eq!(board.cell(5, 2), Disc::Red);
        assert_eq!(board.cell(4, 2), Disc::Yellow);
        assert_eq!(board.cell(3, 2), Disc::None);
    }

    #[test]
    #[should_panic(expected = "out of bounds")]
    fn test_cell_out_of_bounds_panics() {
        let board = Board::new();
        board.cell(HEIGHT, 0);
    }

    #[test]
    fn test_no_connect_four_on_empty_board() {
        assert!(!Board::new().has_connect_four());
    }

    #[test]
    fn test_horizontal() {
        let mut board = Board::new();
        for col in 3..7 {
            board.add_disc(col, Disc::Yellow);
        }
        assert!(board.has_connect_four());
    }

    #[test]
    fn test_vertical() {
        let mut board = Board::new();
        for _ in 0..4 {
            board.add_disc(6, Disc::Red);
        }
        assert!(board.has_connect_four());
    }

    #[test]
    fn test_rising_diagonal() {
        // X in (5,0) (4,1) (3,2) (2,3)
        let mut board = Board::new();
        board.add_disc(0, Disc::Red);
        board.add_disc(1, Disc::Yellow);
        board.add_disc(1, Disc::Red);
        board.add_disc(2, Disc::Yellow);
        board.add_disc(2, Disc::Yellow);
        board.add_disc(2, Disc::Red);
        board.add_disc(3, Disc::Yellow);
        board.add_disc(3, Disc::Yellow);
        board.add_disc(3, Disc::Yellow);
        assert!(!board.has_connect_four());
        board.add_disc(3, Disc::Red);
        assert!(board.has_connect_four());
    }

    #[test]
    fn test_falling_diagonal() {
        // O in (2,3) (3,4) (4,5) (5,6)
        let mut board = Board::new();
        board.add_disc(6, Disc::Yellow);
        board.add_disc(5, Disc::Red);
        board.add_disc(5, Disc::Yellow);
        board.add_disc(4, Disc::Red);
        board.add_disc(4, Disc::Red);
        board.add_disc(4, Disc::Yellow);
        board.add_disc(3, Disc::Red);
        board.add_disc(3, Disc::Red);
        board.add_disc(3, Disc::Red);
        board.add_disc(3, Disc::Yellow);
        assert!(board.has_connect_four());
    }

    #[test]
    fn test_three_plus_different_is_not_a_win() {
        let mut board = Board::new();
        board.add_disc(0, Disc::Red);
        board.add_disc(1, Disc::Red);
        board.add_disc(2, Disc::Red);
        board.add_disc(3, Disc::Yellow);
        assert!(!board.has_connect_four());

        let mut board = Board::new();
        for _ in 0..3 {
            board.add_disc(4, Disc::Yellow);
        }
        board.add_disc(4, Disc::Red);
        assert!(!board.has_connect_four());
    }

    #[test]
    fn test_reset_clears_board() {
        let mut board = Board::new();
        board.add_disc(0, Disc::Red);
        board.add_disc(6, Disc::Yellow);
        board.reset();
        assert_eq!(board, Board::new());
    }

    #[test]
    fn test_is_full() {
        let mut board = Board::new();
        for col in 0..WIDTH {
            for _ in 0..HEIGHT {
                board.add_disc(col, Disc::Red);
            }
        }
        assert!(board.is_full());
        assert!(board.column_is_full(3));
    }

    #[test]
    fn test_text_form() {
        let mut board = Board::new();
        board.add_disc(0, Disc::Red);
        board.add_disc(1, Disc::Yellow);
        let text = board.to_string();
        let lines: Vec<&str> = text.lines().collect();
        assert_eq!(lines.len(), HEIGHT);
        assert_eq!(lines[0], "| | | | | | | |");
        assert_eq!(lines[5], "|X|O| | | | | |");
    }

    #[test]
    fn test_text_round_trip() {
        let mut board = Board::new();
        board.add_disc(1, Disc::Red);
        board.add_disc(2, Disc::Yellow);
        board.add_disc(2, Disc::Red);
        let parsed: Board = board.to_string().parse().unwrap();
        assert_eq!(parsed, board);
    }

    #[test]
    fn test_parse_rejects_wrong_row_count() {
        let result = "| | | | | | | |\n".parse::<Board>();
        assert!(result.is_err());
    }

    #[test]
    fn test_parse_rejects_missing_separator() {
        let text = "| | | | | | | |\n".repeat(5) + "|X|O| | | | |  \n";
        assert!(text.parse::<Board>().is_err());
    }

    #[test]
    fn test_map_form() {
        let mut board = Board::new();
        board.add_disc(0, Disc::Yellow);
        board.add_disc(3, Disc::Red);
        let map = board.to_map();
        assert_eq!(map.len(), HEIGHT);
        assert_eq!(map[&1], "       ");
        assert_eq!(map[&6], "O  X   ");
    }

    #[test]
    fn test_map_round_trip() {
        let mut board = Board::new();
        board.add_disc(1, Disc::Yellow);
        board.add_disc(3, Disc::Red);
        board.add_disc(1, Disc::Yellow);
        let restored = Board::from_map(&board.to_map()).unwrap();
        assert_eq!(restored, board);
    }

    #[test]
    fn test_from_map_partial_rows() {
        let mut map = BTreeMap::new();
        map.insert(6, "X      ".to_string());
        let board = Board::from_map(&map).unwrap();
        assert_eq!(board.cell(5, 0), Disc::Red);
        assert_eq!(board.cell(0, 0), Disc::None);
    }

    #[test]
    fn test_from_map_rejects_bad_input() {
        let mut map = BTreeMap::new();
        map.insert(7, "       ".to_string());
        assert!(Board::from_map(&map).is_err());

        let mut map = BTreeMap::new();
        map.insert(1, "XO".to_string());
        assert!(Board::from_map(&map).is_err());
    }

    #[test]
    fn test_map_json_uses_string_keys() {
        let json = serde_json::to_value(Board::new().to_map()).unwrap();
        assert_eq!(json["1"], "       ");
        let back: BTreeMap<usize, String> = serde_json::from_value(json).unwrap();
        assert_eq!(Board::from_map(&back).unwrap(), Board::new());
    }
}
