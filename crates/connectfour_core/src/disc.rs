//! Cell contents.

use serde::{Deserialize, Serialize};

/// A disc in a single board cell, or the absence of one.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Disc {
    /// Empty cell.
    #[default]
    None,
    /// Player 1's disc, rendered as `X`.
    Red,
    /// Player 2's disc, rendered as `O`.
    Yellow,
}

impl Disc {
    /// Returns the single-character rendering of this disc.
    pub fn symbol(self) -> char {
        match self {
            Disc::None => ' ',
            Disc::Red => 'X',
            Disc::Yellow => 'O',
        }
    }

    /// Parses a disc from its rendering. Unknown characters are empty cells.
    pub fn from_symbol(symbol: char) -> Self {
        match symbol {
            'X' => Disc::Red,
            'O' => Disc::Yellow,
            _ => Disc::None,
        }
    }

    /// Returns true if the cell holds a disc.
    pub fn is_some(self) -> bool {
        self != Disc::None
    }
}

impl From<char> for Disc {
    fn from(symbol: char) -> Self {
        Self::from_symbol(symbol)
    }
}

impl std::fmt::Display for Disc {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.symbol())
    }
}
