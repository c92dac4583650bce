//! Domain types for the game catalog.
//!
//! This module provides:
//! - Game and Category records as they come out of the store
//! - Request payloads for create/update operations
//! - Slug derivation from display names

pub mod category;
pub mod game;
pub mod slug;

pub use category::{Category, CategoryPayload, DEFAULT_CATEGORY_COLOR};
pub use game::{Game, GamePayload, GameStatus, ParseGameStatusError};
