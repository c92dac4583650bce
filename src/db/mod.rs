//! SQLite storage for the game catalog.
//!
//! `migrations` opens the pool, sets pragmas, and applies the schema;
//! `repo` holds all queries against the games and categories tables.

pub mod migrations;
pub mod repo;

pub use migrations::init_db;
pub use repo::{GameListFilter, GameUpdate, NewGame, Repository};
