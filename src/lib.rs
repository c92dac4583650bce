pub mod api;
pub mod config;
pub mod db;
pub mod domain;
pub mod error;
pub mod gate;
pub mod importer;
pub mod session;
pub mod urlcheck;

pub use config::Config;
pub use db::{init_db, Repository};
pub use domain::{Category, Game, GameStatus};
pub use error::AppError;
