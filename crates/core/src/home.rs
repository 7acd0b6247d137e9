//! The home-screen state machine.
//!
//! A single [`HomeState`] value drives the whole screen. Discrete
//! [`Action`]s are applied run-to-completion; every transition is total
//! and yields a complete replacement state, so there is never a partially
//! updated snapshot to observe.

use chrono::{DateTime, FixedOffset, Offset, Timelike, Utc};
use tracing::debug;

use crate::models::{DisplayMode, Game, Player};

/// Discrete actions accepted by the state machine.
///
/// The set is closed: anything the front end cannot express as one of
/// these variants simply is not a transition.
#[derive(Debug, Clone)]
pub enum Action {
    /// Flip between day and night theming.
    ToggleTheme,
    /// Select a game tile, stamping it as most recently played.
    /// Selecting the current selection clears it instead.
    SelectGame(Game),
    /// Switch the active player profile, dropping any game selection.
    SelectPlayer(Player),
    /// Advance the clock to a freshly read instant.
    Tick(DateTime<Utc>),
    /// Install the host timezone, resolved once at startup.
    SetTimeZone(FixedOffset),
}

/// Complete home-screen state. Replaced wholesale on every transition.
#[derive(Debug, Clone)]
pub struct HomeState {
    /// Active theme.
    pub mode: DisplayMode,
    /// Fixed player roster, in declaration order.
    pub players: Vec<Player>,
    /// Game catalog, always sorted by [`sort_games`].
    pub games: Vec<Game>,
    /// Active player profile, if any.
    pub selected_player: Option<Player>,
    /// Selected game, if any. Always a member of `games` by value.
    pub selected_game: Option<Game>,
    /// Last instant delivered by the clock driver.
    pub now: DateTime<Utc>,
    /// Offset used for clock display.
    pub tz: FixedOffset,
}

impl HomeState {
    /// Build the initial state: games sorted, the first player active,
    /// no game selected, clock at the epoch until the first tick.
    pub fn new(players: Vec<Player>, mut games: Vec<Game>, mode: DisplayMode) -> Self {
        sort_games(&mut games);
        let selected_player = players.first().cloned();
        Self {
            mode,
            players,
            games,
            selected_player,
            selected_game: None,
            now: DateTime::UNIX_EPOCH,
            tz: Utc.fix(),
        }
    }

    /// Apply one action, producing the next state.
    ///
    /// Total over well-formed state: actions referencing a game or player
    /// outside the respective catalog are no-ops, not faults.
    pub fn apply(&self, action: Action) -> HomeState {
        let mut next = self.clone();
        match action {
            Action::ToggleTheme => {
                next.mode = next.mode.toggled();
                debug!(mode = ?next.mode, "theme toggled");
            }
            Action::SelectGame(game) => next.select_game(game),
            Action::SelectPlayer(player) => next.select_player(player),
            Action::Tick(instant) => next.now = instant,
            Action::SetTimeZone(tz) => {
                debug!(offset = %tz, "timezone installed");
                next.tz = tz;
            }
        }
        next
    }

    /// Current instant shifted into the display timezone.
    pub fn local_time(&self) -> DateTime<FixedOffset> {
        self.now.with_timezone(&self.tz)
    }

    /// Highlight pulse intensity for the current clock reading.
    pub fn pulse_alpha(&self) -> f64 {
        hover_alpha(millis_of_minute(self.now))
    }

    fn select_game(&mut self, game: Game) {
        if self.selected_game.as_ref() == Some(&game) {
            debug!(id = game.id, "game deselected");
            self.selected_game = None;
            return;
        }
        let Some(slot) = self.games.iter().position(|g| *g == game) else {
            debug!(id = game.id, "ignoring selection of unknown game");
            return;
        };
        let stamped = game.played_at(self.now);
        self.games[slot] = stamped.clone();
        sort_games(&mut self.games);
        debug!(id = stamped.id, at = %stamped.last_played, "game played");
        self.selected_game = Some(stamped);
    }

    fn select_player(&mut self, player: Player) {
        if self.selected_player.as_ref() == Some(&player) {
            return;
        }
        if !self.players.contains(&player) {
            debug!(id = player.id, "ignoring selection of unknown player");
            return;
        }
        debug!(id = player.id, name = %player.name, "player selected");
        self.selected_player = Some(player);
        self.selected_game = None;
    }
}

/// Ordering policy: most recently played first, ties broken by id, both
/// descending. Never-played games carry the epoch stamp and therefore
/// sort last. The sort is stable, so applying it twice changes nothing.
pub fn sort_games(games: &mut [Game]) {
    games.sort_by(|a, b| b.last_played.cmp(&a.last_played).then(b.id.cmp(&a.id)));
}

/// Milliseconds elapsed within the current minute of `instant`.
pub fn millis_of_minute(instant: DateTime<Utc>) -> u32 {
    instant.second() * 1_000 + instant.timestamp_subsec_millis()
}

/// Highlight pulse for the focused element, repeating each second.
///
/// Full intensity up to 300ms and from 800ms on; between the two the
/// intensity ramps linearly as `ms / 1000`.
pub fn hover_alpha(millis_of_minute: u32) -> f64 {
    let ms = millis_of_minute % 1_000;
    if ms <= 300 || ms >= 800 {
        1.0
    } else {
        f64::from(ms) / 1_000.0
    }
}
