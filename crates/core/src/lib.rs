#![warn(clippy::all, missing_docs)]

//! Core domain logic for the homedeck console home screen.
//!
//! This crate hosts the data models, the home-screen state machine,
//! catalog handling, and configuration used by the terminal UI and any
//! future frontends.

pub mod catalog;
pub mod config;
pub mod home;
pub mod models;

pub use catalog::{Catalog, CatalogError};
pub use config::AppConfig;
pub use home::{hover_alpha, millis_of_minute, sort_games, Action, HomeState};
pub use models::{DisplayMode, Game, Player};
