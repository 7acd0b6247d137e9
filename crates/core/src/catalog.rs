//! Player and game catalogs.
//!
//! The built-in catalog mirrors the console's factory contents. An
//! installation can replace it with a JSON document referenced from the
//! configuration; the document is seeded from the built-in set on first
//! run so there is always a valid file to edit.

use std::{
    fs,
    path::{Path, PathBuf},
};

use anyhow::{Context, Result};
use chrono::DateTime;
use once_cell::sync::Lazy;
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::models::{Game, Player};

/// Errors raised while loading a catalog document.
#[derive(Debug, Error)]
pub enum CatalogError {
    /// The file could not be read.
    #[error("failed to read catalog {}", path.display())]
    Io {
        /// Path of the offending document.
        path: PathBuf,
        /// Underlying IO error.
        #[source]
        source: std::io::Error,
    },
    /// The document was not valid catalog JSON.
    #[error("failed to parse catalog {}", path.display())]
    Parse {
        /// Path of the offending document.
        path: PathBuf,
        /// Underlying deserialization error.
        #[source]
        source: serde_json::Error,
    },
    /// The document parsed but lists no games.
    #[error("catalog {} contains no games", path.display())]
    Empty {
        /// Path of the offending document.
        path: PathBuf,
    },
}

/// The fixed player roster and game list shown on the home screen.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Catalog {
    /// Player roster, in display order.
    pub players: Vec<Player>,
    /// Game list; ordering is reapplied by the state machine.
    pub games: Vec<Game>,
}

impl Catalog {
    /// The compiled-in factory catalog.
    pub fn builtin() -> Catalog {
        BUILTIN.clone()
    }

    /// Read a catalog document from disk.
    pub fn load(path: impl AsRef<Path>) -> std::result::Result<Catalog, CatalogError> {
        let path = path.as_ref();
        let content = fs::read_to_string(path).map_err(|source| CatalogError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        let catalog: Catalog =
            serde_json::from_str(&content).map_err(|source| CatalogError::Parse {
                path: path.to_path_buf(),
                source,
            })?;
        if catalog.games.is_empty() {
            return Err(CatalogError::Empty {
                path: path.to_path_buf(),
            });
        }
        Ok(catalog)
    }

    /// Write this catalog to disk, creating parent directories if needed.
    pub fn persist(&self, path: impl AsRef<Path>) -> Result<()> {
        let path = path.as_ref();
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent).with_context(|| {
                format!("failed to create catalog directory {}", parent.display())
            })?;
        }
        let serialized =
            serde_json::to_string_pretty(self).context("failed to serialize catalog")?;
        fs::write(path, serialized)
            .with_context(|| format!("failed to write catalog {}", path.display()))
    }
}

fn player(id: u32, name: &str, icon: &str) -> Player {
    Player {
        id,
        name: name.to_string(),
        icon: icon.to_string(),
    }
}

fn game(id: u32, title: &str, icon: &str) -> Game {
    Game {
        id,
        title: title.to_string(),
        icon: icon.to_string(),
        last_played: DateTime::UNIX_EPOCH,
    }
}

static BUILTIN: Lazy<Catalog> = Lazy::new(|| Catalog {
    players: vec![
        player(1, "Alex", "🦊"),
        player(2, "Sören", "🐸"),
        player(3, "美優", "🐱"),
        player(4, "Robin", "🤖"),
    ],
    games: vec![
        game(10, "Star Courier", "🚀"),
        game(14, "Puzzle Harbor", "🧩"),
        game(21, "Drift League", "🏎"),
        game(27, "Garden of Glyphs", "🌿"),
        game(33, "Deep Reef", "🐠"),
        game(42, "Skyline Skater", "🛹"),
        game(48, "Chrono Caves", "⏳"),
        game(55, "Beat Foundry", "🥁"),
    ],
});

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    #[test]
    fn builtin_is_populated_and_never_played() {
        let catalog = Catalog::builtin();
        assert!(!catalog.players.is_empty());
        assert!(!catalog.games.is_empty());
        assert!(catalog.games.iter().all(Game::never_played));
    }

    #[test]
    fn round_trips_through_json() -> Result<()> {
        let dir = tempdir()?;
        let path = dir.path().join("deck").join("catalog.json");

        let catalog = Catalog::builtin();
        catalog.persist(&path)?;
        let loaded = Catalog::load(&path)?;
        assert_eq!(loaded, catalog);
        Ok(())
    }

    #[test]
    fn missing_file_is_an_io_error() {
        let dir = tempdir().expect("tempdir");
        let err = Catalog::load(dir.path().join("absent.json")).unwrap_err();
        assert!(matches!(err, CatalogError::Io { .. }));
    }

    #[test]
    fn malformed_document_is_a_parse_error() -> Result<()> {
        let dir = tempdir()?;
        let path = dir.path().join("catalog.json");
        fs::write(&path, "{ not json")?;
        let err = Catalog::load(&path).unwrap_err();
        assert!(matches!(err, CatalogError::Parse { .. }));
        Ok(())
    }

    #[test]
    fn empty_game_list_is_rejected() -> Result<()> {
        let dir = tempdir()?;
        let path = dir.path().join("catalog.json");
        fs::write(&path, r#"{"players": [], "games": []}"#)?;
        let err = Catalog::load(&path).unwrap_err();
        assert!(matches!(err, CatalogError::Empty { .. }));
        Ok(())
    }

    #[test]
    fn last_played_defaults_to_the_epoch() -> Result<()> {
        let dir = tempdir()?;
        let path = dir.path().join("catalog.json");
        fs::write(
            &path,
            r#"{
                "players": [{"id": 1, "name": "Alex", "icon": "🦊"}],
                "games": [{"id": 10, "title": "Star Courier", "icon": "🚀"}]
            }"#,
        )?;
        let catalog = Catalog::load(&path)?;
        assert!(catalog.games[0].never_played());
        Ok(())
    }
}
