//! Database rows and their conversions to domain types.

use chrono::NaiveDateTime;
use connectfour_core::{Board, Game, GameRecord, GameStatus, PlayerTurn, User};
use derive_getters::Getters;
use derive_new::new;
use diesel::prelude::*;
use tracing::instrument;

use crate::db::{DbError, schema};

/// User row.
#[derive(Debug, Clone, Queryable, Identifiable, Selectable, Getters)]
#[diesel(table_name = schema::users)]
pub struct UserRow {
    id: i32,
    email: String,
    name: String,
    token: String,
    created_at: NaiveDateTime,
}

impl From<UserRow> for User {
    fn from(row: UserRow) -> Self {
        User {
            id: row.id,
            name: row.name,
            email: row.email,
            token: row.token,
        }
    }
}

/// Insertable user row.
#[derive(Debug, Clone, Insertable, new)]
#[diesel(table_name = schema::users)]
pub struct NewUserRow {
    email: String,
    name: String,
    token: String,
}

/// Game row. The board is stored in its textual form.
#[derive(Debug, Clone, Queryable, Selectable, Insertable, Getters)]
#[diesel(table_name = schema::games)]
#[diesel(treat_none_as_default_value = false)]
pub struct GameRow {
    game_key: String,
    player1_id: i32,
    player2_id: Option<i32>,
    player_turn: Option<i32>,
    public: bool,
    status: String,
    board: String,
    created_at: NaiveDateTime,
    started_at: Option<NaiveDateTime>,
    finished_at: Option<NaiveDateTime>,
}

impl GameRow {
    /// Flattens a game for storage.
    #[instrument(skip(game), fields(key = %game.key()))]
    pub fn from_game(game: &Game) -> Self {
        Self {
            game_key: game.key().to_string(),
            player1_id: game.player1().id,
            player2_id: game.player2().map(|p| p.id),
            player_turn: game.turn().map(|t| i32::from(t.number())),
            public: game.is_public(),
            status: game.status().to_string(),
            board: game.board().to_string(),
            created_at: game.created_at().naive_utc(),
            started_at: game.started_at().map(|t| t.naive_utc()),
            finished_at: game.finished_at().map(|t| t.naive_utc()),
        }
    }

    /// Rebuilds the game from this row and its already loaded players.
    ///
    /// # Errors
    ///
    /// Returns [`DbError`] if the status, turn or board column is corrupt.
    #[instrument(skip(self, player1, player2), fields(key = %self.game_key))]
    pub fn into_game(self, player1: User, player2: Option<User>) -> Result<Game, DbError> {
        let status: GameStatus = self
            .status
            .parse()
            .map_err(|_| DbError::new(format!("Invalid status: '{}'", self.status)))?;

        let turn = self
            .player_turn
            .map(|n| {
                u8::try_from(n)
                    .ok()
                    .and_then(PlayerTurn::from_number)
                    .ok_or_else(|| DbError::new(format!("Invalid player turn: {}", n)))
            })
            .transpose()?;

        let board: Board = self.board.parse()?;

        Ok(Game::restore(GameRecord {
            key: self.game_key,
            player1,
            player2,
            turn,
            created_at: self.created_at.and_utc(),
            started_at: self.started_at.map(|t| t.and_utc()),
            finished_at: self.finished_at.map(|t| t.and_utc()),
            public: self.public,
            status,
            board,
        }))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn user(id: i32, email: &str) -> User {
        let mut user = User::new(email, email);
        user.id = id;
        user
    }

    #[test]
    fn test_game_row_round_trip() {
        let sanae = user(1, "sanae@evilnerd.nl");
        let dick = user(2, "dick@evilnerd.nl");
        let mut game = Game::new(sanae.clone(), false);
        game.join(dick.clone()).unwrap();
        game.play(&sanae, 4).unwrap();

        let row = GameRow::from_game(&game);
        assert_eq!(row.player_turn(), &Some(2));
        assert_eq!(row.status(), "started");

        let restored = row.into_game(sanae, Some(dick)).unwrap();
        assert_eq!(restored.key(), game.key());
        assert_eq!(restored.board(), game.board());
        assert_eq!(restored.turn(), game.turn());
        assert_eq!(restored.status(), game.status());
    }

    #[test]
    fn test_corrupt_status_is_an_error() {
        let sanae = user(1, "sanae@evilnerd.nl");
        let mut row = GameRow::from_game(&Game::new(sanae.clone(), true));
        row.status = "paused".to_string();
        assert!(row.into_game(sanae, None).is_err());
    }

    #[test]
    fn test_corrupt_turn_is_an_error() {
        let sanae = user(1, "sanae@evilnerd.nl");
        let mut row = GameRow::from_game(&Game::new(sanae.clone(), true));
        row.player_turn = Some(3);
        assert!(row.into_game(sanae, None).is_err());
    }
}
