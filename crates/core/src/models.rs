//! Shared domain models.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// A selectable profile shown in the avatar row.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Player {
    /// Numeric identity, unique within the roster.
    pub id: u32,
    /// Display name; may contain non-ASCII.
    pub name: String,
    /// Opaque icon reference (glyph or asset path).
    pub icon: String,
}

impl Player {
    /// Fallback character for avatars whose icon cannot be rendered.
    pub fn initial(&self) -> char {
        self.name.chars().next().unwrap_or('?')
    }
}

/// A launchable tile in the game row.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Game {
    /// Numeric identity, unique within the catalog.
    pub id: u32,
    /// Human-readable game title.
    pub title: String,
    /// Opaque icon reference (glyph or asset path).
    pub icon: String,
    /// Most recent play instant; the Unix epoch means never played.
    #[serde(default = "epoch")]
    pub last_played: DateTime<Utc>,
}

impl Game {
    /// Whether this game still carries the never-played default stamp.
    pub fn never_played(&self) -> bool {
        self.last_played == DateTime::UNIX_EPOCH
    }

    /// Copy of this record stamped with a new play instant.
    pub fn played_at(&self, instant: DateTime<Utc>) -> Game {
        Game {
            last_played: instant,
            ..self.clone()
        }
    }
}

fn epoch() -> DateTime<Utc> {
    DateTime::UNIX_EPOCH
}

/// Day/night theme selector.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DisplayMode {
    /// Light palette.
    #[default]
    Day,
    /// Dark palette.
    Night,
}

impl DisplayMode {
    /// The other mode.
    pub fn toggled(self) -> Self {
        match self {
            Self::Day => Self::Night,
            Self::Night => Self::Day,
        }
    }
}
