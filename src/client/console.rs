//! Plain-text rendering for the terminal.

use std::collections::BTreeMap;
use std::fmt::Write;

use connectfour_core::{Board, HEIGHT, WIDTH};

use crate::service::{GameStateResponse, NewGameResponse};

/// Returns the column numbers, aligned over the board cells.
fn column_header() -> String {
    let mut header = String::from(" ");
    for column in 1..=WIDTH {
        let _ = write!(header, "{} ", column);
    }
    header
}

/// Renders a board with a 1-based column header above it.
pub fn render_board(board: &Board) -> String {
    render_board_map(&board.to_map())
}

/// Renders a board received as a row map. Missing rows render empty.
pub fn render_board_map(rows: &BTreeMap<usize, String>) -> String {
    let mut out = column_header();
    for row in 1..=HEIGHT {
        out.push('\n');
        let cells = rows.get(&row).map(String::as_str).unwrap_or("");
        out.push('|');
        for c in cells.chars().chain(std::iter::repeat(' ')).take(WIDTH) {
            out.push(c);
            out.push('|');
        }
    }
    out
}

/// Renders a full game state: players, status, turn and board.
pub fn render_state(state: &GameStateResponse) -> String {
    let player2 = if state.player2_email.is_empty() {
        "(waiting)".to_string()
    } else {
        format!("{} <{}>", state.player2_name, state.player2_email)
    };

    let mut out = String::new();
    let _ = writeln!(out, "Game:     {}", state.key);
    let _ = writeln!(out, "Status:   {}", state.status);
    let _ = writeln!(out, "Player 1: {} <{}> (X)", state.player1_name, state.player1_email);
    let _ = writeln!(out, "Player 2: {} (O)", player2);
    if state.player_turn != 0 {
        let _ = writeln!(out, "Turn:     {} <{}>", state.player_turn_name, state.player_turn_email);
    }
    out.push_str(&render_board_map(&state.board));
    out
}

/// Renders a game listing, one game per line.
pub fn render_games(games: &[NewGameResponse]) -> String {
    if games.is_empty() {
        return "No games.".to_string();
    }
    games
        .iter()
        .map(|g| {
            format!(
                "{:<30} {:<9} {} {}",
                g.key,
                g.status,
                g.created_by,
                g.created_at.format("%Y-%m-%d %H:%M")
            )
        })
        .collect::<Vec<_>>()
        .join("\n")
}

#[cfg(test)]
mod tests {
    use connectfour_core::Disc;

    use super::*;

    #[test]
    fn test_header_is_one_based() {
        assert_eq!(column_header(), " 1 2 3 4 5 6 7 ");
    }

    #[test]
    fn test_rendered_rows_match_board_text() {
        let mut board = Board::new();
        board.add_disc(0, Disc::Red);
        board.add_disc(6, Disc::Yellow);
        let rendered = render_board(&board);
        let rows: Vec<&str> = rendered.lines().skip(1).collect();
        assert_eq!(rows, board.to_string().lines().collect::<Vec<_>>());
        assert_eq!(rows[HEIGHT - 1], "|X| | | | | |O|");
    }

    #[test]
    fn test_short_rows_are_padded() {
        let rows = BTreeMap::from([(6, "X".to_string())]);
        let rendered = render_board_map(&rows);
        assert!(rendered.ends_with("|X| | | | | | |"));
        assert_eq!(rendered.lines().count(), HEIGHT + 1);
    }
}
