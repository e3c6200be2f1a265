//! Persistence of users and games.

mod error;
mod memory;
mod models;
mod repository;
mod schema;
mod sqlite;

pub use error::{DbError, DbErrorKind};
pub use memory::MemoryRepository;
pub use models::{GameRow, NewUserRow, UserRow};
pub use repository::{GameRepository, UserRepository};
pub use sqlite::SqliteRepository;
