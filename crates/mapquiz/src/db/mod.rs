//! Database persistence layer for profiles, guessed regions and session results.

mod error;
mod models;
mod repository;
mod schema; // Diesel generated schema - internal use only

pub use error::{DbError, DbErrorKind};
pub use models::{
    GuessedRegion, NewGuessedRegion, NewSessionResult, NewUser, QuizStats, SessionResult, User,
};
pub use repository::{MIGRATIONS, QuizRepository};
