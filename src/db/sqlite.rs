//! SQLite store built on diesel.

use std::collections::HashMap;

use connectfour_core::{Game, GameStatus, User};
use diesel::prelude::*;
use diesel_migrations::{EmbeddedMigrations, MigrationHarness, embed_migrations};
use tracing::{debug, info, instrument};

use crate::db::{DbError, GameRepository, GameRow, NewUserRow, UserRepository, UserRow, schema};

const MIGRATIONS: EmbeddedMigrations = embed_migrations!("migrations");

/// Milliseconds a connection waits on a locked database before failing.
const BUSY_TIMEOUT_MS: u32 = 5000;

/// SQLite-backed user and game store.
///
/// Opens a fresh connection per call, so it is cheap to clone and share.
#[derive(Debug, Clone)]
pub struct SqliteRepository {
    db_path: String,
}

impl SqliteRepository {
    /// Creates a repository for the database file at `db_path`.
    ///
    /// The file is created on first connection if it does not exist.
    /// Call [`SqliteRepository::run_migrations`] before first use.
    #[instrument(skip(db_path), fields(db_path = %db_path.as_ref()))]
    pub fn new(db_path: impl AsRef<str>) -> Self {
        info!("Creating SqliteRepository");
        Self {
            db_path: db_path.as_ref().to_string(),
        }
    }

    /// Returns the database path.
    pub fn db_path(&self) -> &str {
        &self.db_path
    }

    /// Applies any pending schema migrations.
    ///
    /// # Errors
    ///
    /// Returns [`DbError`] if connecting or migrating fails.
    #[instrument(skip(self), fields(db_path = %self.db_path))]
    pub fn run_migrations(&self) -> Result<(), DbError> {
        let mut conn = self.connection()?;
        let applied = conn
            .run_pending_migrations(MIGRATIONS)
            .map_err(|e| DbError::new(format!("Migrations failed: {}", e)))?;
        info!(count = applied.len(), "Migrations applied");
        Ok(())
    }

    #[instrument(skip(self))]
    fn connection(&self) -> Result<SqliteConnection, DbError> {
        debug!(path = %self.db_path, "Establishing connection");
        let mut conn = SqliteConnection::establish(&self.db_path)
            .map_err(|e| DbError::new(format!("Failed to connect to '{}': {}", self.db_path, e)))?;
        diesel::sql_query(format!("PRAGMA busy_timeout = {}", BUSY_TIMEOUT_MS)).execute(&mut conn)?;
        Ok(conn)
    }

    fn load_users(
        conn: &mut SqliteConnection,
        ids: Vec<i32>,
    ) -> Result<HashMap<i32, User>, DbError> {
        let rows = schema::users::table
            .filter(schema::users::id.eq_any(ids))
            .select(UserRow::as_select())
            .load(conn)?;

        Ok(rows
            .into_iter()
            .map(|row| {
                let user = User::from(row);
                (user.id, user)
            })
            .collect())
    }

    fn assemble(rows: Vec<GameRow>, users: &HashMap<i32, User>) -> Result<Vec<Game>, DbError> {
        let lookup = |id: i32| {
            users
                .get(&id)
                .cloned()
                .ok_or_else(|| DbError::new(format!("Game references unknown user {}", id)))
        };

        rows.into_iter()
            .map(|row| {
                let player1 = lookup(*row.player1_id())?;
                let player2 = (*row.player2_id()).map(lookup).transpose()?;
                row.into_game(player1, player2)
            })
            .collect()
    }

    fn player_ids(rows: &[GameRow]) -> Vec<i32> {
        let mut ids: Vec<i32> = rows
            .iter()
            .flat_map(|row| std::iter::once(*row.player1_id()).chain(*row.player2_id()))
            .collect();
        ids.sort_unstable();
        ids.dedup();
        ids
    }
}

impl UserRepository for SqliteRepository {
    #[instrument(skip(self))]
    fn find_by_email(&self, email: &str) -> Result<Option<User>, DbError> {
        debug!("Looking up user by email");
        let mut conn = self.connection()?;

        let user = schema::users::table
            .filter(schema::users::email.eq(email))
            .select(UserRow::as_select())
            .first(&mut conn)
            .optional()?;

        debug!(found = user.is_some(), "User lookup done");
        Ok(user.map(User::from))
    }

    #[instrument(skip(self, user), fields(email = %user.email))]
    fn create(&self, user: User) -> Result<User, DbError> {
        let mut conn = self.connection()?;

        let row = diesel::insert_into(schema::users::table)
            .values(NewUserRow::new(user.email, user.name, user.token))
            .returning(UserRow::as_returning())
            .get_result(&mut conn)?;

        info!(user_id = row.id(), "User created");
        Ok(User::from(row))
    }
}

impl GameRepository for SqliteRepository {
    #[instrument(skip(self, game), fields(key = %game.key(), status = %game.status()))]
    fn save(&self, game: &Game) -> Result<(), DbError> {
        let mut conn = self.connection()?;

        diesel::replace_into(schema::games::table)
            .values(GameRow::from_game(game))
            .execute(&mut conn)?;

        debug!("Game saved");
        Ok(())
    }

    #[instrument(skip(self))]
    fn fetch(&self, key: &str) -> Result<Option<Game>, DbError> {
        let mut conn = self.connection()?;

        let Some(row) = schema::games::table
            .find(key)
            .select(GameRow::as_select())
            .first(&mut conn)
            .optional()?
        else {
            debug!("Game not found");
            return Ok(None);
        };

        let rows = vec![row];
        let users = Self::load_users(&mut conn, Self::player_ids(&rows))?;
        Ok(Self::assemble(rows, &users)?.pop())
    }

    #[instrument(skip(self))]
    fn list(&self, user_id: Option<i32>, status: Option<GameStatus>) -> Result<Vec<Game>, DbError> {
        let mut conn = self.connection()?;

        let mut query = schema::games::table.into_boxed();
        if let Some(id) = user_id {
            query = query.filter(
                schema::games::player1_id
                    .nullable()
                    .eq(Some(id))
                    .or(schema::games::player2_id.eq(Some(id))),
            );
        }
        if let Some(status) = status {
            query = query.filter(schema::games::status.eq(status.to_string()));
        }

        let rows: Vec<GameRow> = query
            .order(schema::games::created_at.asc())
            .select(GameRow::as_select())
            .load(&mut conn)?;

        let users = Self::load_users(&mut conn, Self::player_ids(&rows))?;
        let games = Self::assemble(rows, &users)?;
        info!(count = games.len(), "Games listed");
        Ok(games)
    }
}
