//! Hot-seat mode: two players sharing one terminal, no server.

use std::io::{BufRead, Write};

use connectfour_core::{Board, GameError, PlayerTurn};
use tracing::{debug, info, instrument};

/// Result of a single local move.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MoveOutcome {
    /// The turn passed to the other player.
    Continue,
    /// The player connected four.
    Won(PlayerTurn),
    /// The board filled up.
    Draw,
}

/// A series of rounds on one board between two named players.
#[derive(Debug, Clone)]
pub struct LocalGame {
    names: [String; 2],
    board: Board,
    turn: PlayerTurn,
    wins: [u32; 2],
    draws: u32,
}

impl LocalGame {
    /// Starts the first round. Player one moves first.
    pub fn new(player1: impl Into<String>, player2: impl Into<String>) -> Self {
        Self {
            names: [player1.into(), player2.into()],
            board: Board::new(),
            turn: PlayerTurn::One,
            wins: [0, 0],
            draws: 0,
        }
    }

    /// Returns the board of the current round.
    pub fn board(&self) -> &Board {
        &self.board
    }

    /// Returns the player to move.
    pub fn turn(&self) -> PlayerTurn {
        self.turn
    }

    /// Returns the name of `player`.
    pub fn name(&self, player: PlayerTurn) -> &str {
        &self.names[usize::from(player.number() - 1)]
    }

    /// Returns the rounds won by `player`.
    pub fn wins(&self, player: PlayerTurn) -> u32 {
        self.wins[usize::from(player.number() - 1)]
    }

    /// Returns the number of drawn rounds.
    pub fn draws(&self) -> u32 {
        self.draws
    }

    /// Drops the current player's disc in the 1-based `column`.
    ///
    /// # Errors
    ///
    /// Returns [`GameError::InvalidMove`] if the column is out of range or
    /// full; the board is left unchanged.
    #[instrument(skip(self), fields(player = self.turn.number()))]
    pub fn play(&mut self, column: i64) -> Result<MoveOutcome, GameError> {
        let index = column
            .checked_sub(1)
            .and_then(|c| usize::try_from(c).ok())
            .ok_or(GameError::InvalidMove { column })?;

        if !self.board.add_disc(index, self.turn.disc()) {
            return Err(GameError::InvalidMove { column });
        }

        if self.board.has_connect_four() {
            self.wins[usize::from(self.turn.number() - 1)] += 1;
            info!(winner = %self.name(self.turn), "Round won");
            return Ok(MoveOutcome::Won(self.turn));
        }
        if self.board.is_full() {
            self.draws += 1;
            info!("Round drawn");
            return Ok(MoveOutcome::Draw);
        }

        self.turn = self.turn.other();
        Ok(MoveOutcome::Continue)
    }

    /// Clears the board for another round. Player one opens again.
    pub fn new_round(&mut self) {
        debug!("Starting new round");
        self.board.reset();
        self.turn = PlayerTurn::One;
    }
}

/// Runs hot-seat rounds reading moves from `input` until a player quits
/// (`q`) or the input ends.
///
/// # Errors
///
/// Returns any I/O error from `input` or `output`.
#[instrument(skip(input, output))]
pub fn run_local<R: BufRead, W: Write>(
    player1: &str,
    player2: &str,
    mut input: R,
    mut output: W,
) -> std::io::Result<LocalGame> {
    let mut game = LocalGame::new(player1, player2);
    let mut line = String::new();

    loop {
        writeln!(output, "{}", crate::client::render_board(game.board()))?;
        let player = game.turn();
        write!(
            output,
            "{} ({}), choose a column 1-7 or q to quit: ",
            game.name(player),
            player.disc()
        )?;
        output.flush()?;

        line.clear();
        if input.read_line(&mut line)? == 0 {
            break;
        }
        let answer = line.trim();
        if answer.eq_ignore_ascii_case("q") {
            break;
        }

        let Ok(column) = answer.parse::<i64>() else {
            writeln!(output, "'{}' is not a column number.", answer)?;
            continue;
        };

        match game.play(column) {
            Err(err) => writeln!(output, "{}", err)?,
            Ok(MoveOutcome::Continue) => {}
            Ok(outcome) => {
                writeln!(output, "{}", crate::client::render_board(game.board()))?;
                match outcome {
                    MoveOutcome::Won(winner) => {
                        writeln!(output, "{} connects four!", game.name(winner))?
                    }
                    _ => writeln!(output, "The board is full, it's a draw.")?,
                }
                writeln!(
                    output,
                    "Score: {} {} - {} {} ({} drawn)",
                    game.name(PlayerTurn::One),
                    game.wins(PlayerTurn::One),
                    game.wins(PlayerTurn::Two),
                    game.name(PlayerTurn::Two),
                    game.draws()
                )?;
                game.new_round();
            }
        }
    }

    writeln!(output, "Bye!")?;
    Ok(game)
}

#[cfg(test)]
mod tests {
    use std::io::Cursor;

    use connectfour_core::{Disc, HEIGHT};

    use super::*;

    #[test]
    fn test_vertical_win_and_reset() {
        let mut game = LocalGame::new("Sanae", "Dick");
        for _ in 0..3 {
            assert_eq!(game.play(1), Ok(MoveOutcome::Continue));
            assert_eq!(game.play(2), Ok(MoveOutcome::Continue));
        }
        assert_eq!(game.play(1), Ok(MoveOutcome::Won(PlayerTurn::One)));
        assert_eq!(game.wins(PlayerTurn::One), 1);

        game.new_round();
        assert_eq!(game.board(), &Board::new());
        assert_eq!(game.turn(), PlayerTurn::One);
    }

    #[test]
    fn test_invalid_columns_leave_board_alone() {
        let mut game = LocalGame::new("Sanae", "Dick");
        assert_eq!(game.play(0), Err(GameError::InvalidMove { column: 0 }));
        assert_eq!(game.play(8), Err(GameError::InvalidMove { column: 8 }));
        assert_eq!(game.board(), &Board::new());
        assert_eq!(game.turn(), PlayerTurn::One);
    }

    #[test]
    fn test_full_column_rejected() {
        let mut game = LocalGame::new("Sanae", "Dick");
        for _ in 0..HEIGHT {
            game.play(4).unwrap();
        }
        assert_eq!(game.play(4), Err(GameError::InvalidMove { column: 4 }));
    }

    #[test]
    fn test_run_local_scripted_round() {
        let script = "1\n2\n1\n2\nx\n1\n2\n1\nq\n";
        let mut output = Vec::new();
        let game = run_local("Sanae", "Dick", Cursor::new(script), &mut output).unwrap();
        let output = String::from_utf8(output).unwrap();

        assert!(output.contains("Sanae connects four!"));
        assert!(output.contains("'x' is not a column number."));
        assert!(output.contains("Score: Sanae 1 - 0 Dick (0 drawn)"));
        assert_eq!(game.wins(PlayerTurn::One), 1);
        // The board was reset after the win.
        assert_eq!(game.board().cell(HEIGHT - 1, 0), Disc::None);
    }

    #[test]
    fn test_run_local_stops_at_end_of_input() {
        let mut output = Vec::new();
        let game = run_local("Sanae", "Dick", Cursor::new("3\n"), &mut output).unwrap();
        assert_eq!(game.board().cell(HEIGHT - 1, 2), Disc::Red);
        assert!(String::from_utf8(output).unwrap().ends_with("Bye!\n"));
    }
}
