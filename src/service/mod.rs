//! User and game services.

mod error;
mod games;
mod locks;
mod request;
mod response;
mod users;

pub use error::ServiceError;
pub use games::GamesService;
pub use locks::KeyLocks;
pub use request::{NewGameRequest, PlayMoveRequest, RegisterRequest};
pub use response::{CreateUserResponse, ErrorResponse, GameStateResponse, NewGameResponse};
pub use users::{UserService, generate_token};
