use std::{io, thread, time::Duration};

use anyhow::{Context, Result};
use chrono::{DateTime, FixedOffset, Utc};
use crossterm::{
    event::{self, Event, KeyCode, KeyEvent, KeyModifiers},
    execute,
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
};
use ratatui::{
    backend::CrosstermBackend,
    layout::{Alignment, Constraint, Direction, Layout, Rect},
    style::{Modifier, Style},
    text::{Line, Span},
    widgets::{Block, BorderType, Borders, Paragraph},
    Frame, Terminal,
};
use tokio::sync::mpsc;
use tracing::info;

use homedeck_core::{Action, AppConfig, Catalog, Game, HomeState};

use crate::theme::{blend, Palette};

/// Clock driver cadence. Sub-second because the hover pulse ramps within
/// each second; the clock text itself only changes per minute.
const TICK_RATE: Duration = Duration::from_millis(60);

const AVATAR_CARD_WIDTH: u16 = 14;
const TILE_WIDTH: u16 = 24;
const BUTTON_WIDTH: u16 = 18;

const WIFI_GLYPH: &str = "▂▄▆";

enum AppEvent {
    Input(Event),
    Tick,
}

/// Screen regions reachable with Up/Down/Tab.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum FocusRow {
    Players,
    Games,
    Actions,
}

impl FocusRow {
    fn next(self) -> Self {
        match self {
            Self::Players => Self::Games,
            Self::Games => Self::Actions,
            Self::Actions => Self::Players,
        }
    }

    fn prev(self) -> Self {
        match self {
            Self::Players => Self::Actions,
            Self::Games => Self::Players,
            Self::Actions => Self::Games,
        }
    }
}

/// Decorative quick-action buttons under the game row.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum QuickAction {
    News,
    Shop,
    Album,
    Controllers,
    Settings,
    Power,
}

impl QuickAction {
    const ALL: [QuickAction; 6] = [
        QuickAction::News,
        QuickAction::Shop,
        QuickAction::Album,
        QuickAction::Controllers,
        QuickAction::Settings,
        QuickAction::Power,
    ];

    fn icon(self) -> &'static str {
        match self {
            Self::News => "📰",
            Self::Shop => "🛒",
            Self::Album => "📷",
            Self::Controllers => "🎮",
            Self::Settings => "⚙",
            Self::Power => "⏻",
        }
    }

    fn label(self) -> &'static str {
        match self {
            Self::News => "News",
            Self::Shop => "Shop",
            Self::Album => "Album",
            Self::Controllers => "Controllers",
            Self::Settings => "Settings",
            Self::Power => "Power",
        }
    }

    fn message(self) -> &'static str {
        match self {
            Self::News => "No new bulletins",
            Self::Shop => "The shop is closed",
            Self::Album => "The album is empty",
            Self::Controllers => "One controller connected",
            Self::Settings => "Settings are fixed on this deck",
            Self::Power => "Powering down",
        }
    }
}

/// The single home screen: state machine plus view plumbing.
pub struct HomeApp {
    state: HomeState,
    config: AppConfig,
    focus: FocusRow,
    player_cursor: usize,
    game_cursor: usize,
    game_offset: usize,
    game_viewport: usize,
    action_cursor: usize,
    status: String,
    should_quit: bool,
}

impl HomeApp {
    pub fn new(catalog: Catalog, config: AppConfig, timezone: FixedOffset) -> Self {
        let state = HomeState::new(catalog.players, catalog.games, config.start_mode)
            .apply(Action::SetTimeZone(timezone));
        Self {
            state,
            config,
            focus: FocusRow::Games,
            player_cursor: 0,
            game_cursor: 0,
            game_offset: 0,
            game_viewport: 1,
            action_cursor: 0,
            status: String::new(),
            should_quit: false,
        }
    }

    pub async fn run(&mut self) -> Result<()> {
        self.dispatch(Action::Tick(Utc::now()));
        self.status = format!(
            "{} profiles · {} games ready",
            self.state.players.len(),
            self.state.games.len()
        );
        info!(
            players = self.state.players.len(),
            games = self.state.games.len(),
            "home screen up"
        );

        let mut stdout = io::stdout();
        enable_raw_mode().context("failed to enter raw mode")?;
        execute!(stdout, EnterAlternateScreen).context("failed to enter alternate screen")?;
        let backend = CrosstermBackend::new(stdout);
        let mut terminal = Terminal::new(backend).context("failed to create terminal")?;
        terminal.hide_cursor()?;
        terminal.clear()?;

        let (event_tx, mut event_rx) = mpsc::channel::<AppEvent>(128);
        spawn_input_thread(event_tx);

        loop {
            terminal.draw(|frame| self.draw(frame))?;
            if self.should_quit {
                break;
            }
            match event_rx.recv().await {
                Some(AppEvent::Input(event)) => self.handle_input(event),
                Some(AppEvent::Tick) => self.dispatch(Action::Tick(Utc::now())),
                None => break,
            }
            if self.should_quit {
                break;
            }
        }

        restore_terminal(&mut terminal)
    }

    fn dispatch(&mut self, action: Action) {
        self.state = self.state.apply(action);
    }

    fn handle_input(&mut self, event: Event) {
        if let Event::Key(key) = event {
            self.handle_key(key);
        }
    }

    fn handle_key(&mut self, key: KeyEvent) {
        match key.code {
            KeyCode::Char('q') if key.modifiers.is_empty() => self.should_quit = true,
            KeyCode::Char('c') if key.modifiers.contains(KeyModifiers::CONTROL) => {
                self.should_quit = true;
            }
            KeyCode::Esc => self.should_quit = true,
            KeyCode::Char('t') if key.modifiers.is_empty() => {
                self.dispatch(Action::ToggleTheme);
                self.status = format!("{:?} mode", self.state.mode);
            }
            KeyCode::Char('h') | KeyCode::Left => self.move_cursor(-1),
            KeyCode::Char('l') | KeyCode::Right => self.move_cursor(1),
            KeyCode::Char('k') | KeyCode::Up | KeyCode::BackTab => {
                self.focus = self.focus.prev();
            }
            KeyCode::Char('j') | KeyCode::Down | KeyCode::Tab => {
                self.focus = self.focus.next();
            }
            KeyCode::Enter | KeyCode::Char(' ') => self.activate(),
            _ => {}
        }
    }

    fn move_cursor(&mut self, delta: isize) {
        let (cursor, len) = match self.focus {
            FocusRow::Players => (&mut self.player_cursor, self.state.players.len()),
            FocusRow::Games => (&mut self.game_cursor, self.state.games.len()),
            FocusRow::Actions => (&mut self.action_cursor, QuickAction::ALL.len()),
        };
        if len == 0 {
            return;
        }
        *cursor = cursor.saturating_add_signed(delta).min(len - 1);
        if self.focus == FocusRow::Games {
            self.ensure_game_visible();
        }
    }

    fn activate(&mut self) {
        match self.focus {
            FocusRow::Players => self.activate_player(),
            FocusRow::Games => self.activate_game(),
            FocusRow::Actions => self.activate_action(),
        }
    }

    fn activate_player(&mut self) {
        let Some(player) = self.state.players.get(self.player_cursor).cloned() else {
            return;
        };
        if self.state.selected_player.as_ref() == Some(&player) {
            self.status = format!("{} is already signed in", player.name);
            return;
        }
        self.dispatch(Action::SelectPlayer(player.clone()));
        self.status = format!("Welcome back, {}", player.name);
    }

    fn activate_game(&mut self) {
        let Some(game) = self.state.games.get(self.game_cursor).cloned() else {
            return;
        };
        self.dispatch(Action::SelectGame(game.clone()));
        match self.state.selected_game.as_ref() {
            Some(selected) => {
                self.status = format!("Launching {}", selected.title);
                // The play stamp reorders the catalog; keep the cursor on
                // the tile the user just activated.
                if let Some(idx) = self.state.games.iter().position(|g| g == selected) {
                    self.game_cursor = idx;
                    self.ensure_game_visible();
                }
            }
            None => self.status = format!("{} closed", game.title),
        }
    }

    fn activate_action(&mut self) {
        let action = QuickAction::ALL[self.action_cursor.min(QuickAction::ALL.len() - 1)];
        self.status = action.message().to_string();
        if action == QuickAction::Power {
            self.should_quit = true;
        }
    }

    fn ensure_game_visible(&mut self) {
        if self.game_cursor < self.game_offset {
            self.game_offset = self.game_cursor;
        } else if self.game_cursor >= self.game_offset + self.game_viewport {
            self.game_offset = self.game_cursor + 1 - self.game_viewport;
        }
    }

    fn draw(&mut self, frame: &mut Frame) {
        let palette = Palette::for_mode(self.state.mode);
        let alpha = self.state.pulse_alpha();
        let area = frame.size();

        frame.render_widget(
            Block::default().style(
                Style::default()
                    .bg(palette.background)
                    .fg(palette.foreground),
            ),
            area,
        );

        let rows = Layout::default()
            .direction(Direction::Vertical)
            .constraints([
                Constraint::Length(1), // status bar
                Constraint::Length(1),
                Constraint::Length(4), // avatar row
                Constraint::Length(1),
                Constraint::Min(6), // game tiles
                Constraint::Length(1),
                Constraint::Length(3), // quick actions
                Constraint::Length(1), // footer
            ])
            .split(area);

        self.render_status_bar(frame, rows[0], &palette);
        self.render_players(frame, rows[2], &palette, alpha);
        self.render_games(frame, rows[4], &palette, alpha);
        self.render_actions(frame, rows[6], &palette, alpha);
        self.render_footer(frame, rows[7], &palette);
    }

    fn render_status_bar(&self, frame: &mut Frame, area: Rect, palette: &Palette) {
        let player = self
            .state
            .selected_player
            .as_ref()
            .map(|p| p.name.as_str())
            .unwrap_or("nobody");
        let right = format!(
            "{WIFI_GLYPH}  {}  {} ",
            battery_glyph(self.config.battery_percent),
            self.clock_text()
        );
        let right_width = (right.chars().count() as u16).min(area.width);

        let columns = Layout::default()
            .direction(Direction::Horizontal)
            .constraints([Constraint::Min(10), Constraint::Length(right_width)])
            .split(area);

        let brand = Paragraph::new(Line::from(vec![
            Span::styled(
                " ⌂ homedeck",
                Style::default()
                    .fg(palette.accent)
                    .add_modifier(Modifier::BOLD),
            ),
            Span::styled(format!("  · {player}"), Style::default().fg(palette.muted)),
        ]));
        frame.render_widget(brand, columns[0]);

        let glyphs = Paragraph::new(Line::from(Span::styled(
            right,
            Style::default().fg(palette.status_fg),
        )))
        .alignment(Alignment::Right);
        frame.render_widget(glyphs, columns[1]);
    }

    fn render_players(&self, frame: &mut Frame, area: Rect, palette: &Palette, alpha: f64) {
        let mut constraints: Vec<Constraint> = self
            .state
            .players
            .iter()
            .map(|_| Constraint::Length(AVATAR_CARD_WIDTH))
            .collect();
        constraints.push(Constraint::Min(0));
        let cells = Layout::default()
            .direction(Direction::Horizontal)
            .constraints(constraints)
            .split(area);

        for (idx, player) in self.state.players.iter().enumerate() {
            let selected = self.state.selected_player.as_ref() == Some(player);
            let focused = self.focus == FocusRow::Players && self.player_cursor == idx;
            let border = if focused {
                blend(palette.avatar_rest, palette.avatar_hover, alpha)
            } else if selected {
                palette.accent
            } else {
                palette.avatar_rest
            };
            let border_type = if selected {
                BorderType::Thick
            } else {
                BorderType::Rounded
            };

            let icon = if player.icon.is_empty() {
                player.initial().to_string()
            } else {
                player.icon.clone()
            };
            let name_style = if selected {
                Style::default()
                    .fg(palette.foreground)
                    .add_modifier(Modifier::BOLD)
            } else {
                Style::default().fg(palette.muted)
            };

            let card = Paragraph::new(vec![
                Line::from(icon),
                Line::from(Span::styled(player.name.clone(), name_style)),
            ])
            .block(
                Block::default()
                    .borders(Borders::ALL)
                    .border_type(border_type)
                    .border_style(Style::default().fg(border)),
            )
            .alignment(Alignment::Center);
            frame.render_widget(card, cells[idx]);
        }
    }

    fn render_games(&mut self, frame: &mut Frame, area: Rect, palette: &Palette, alpha: f64) {
        self.game_viewport = (area.width / TILE_WIDTH).max(1) as usize;
        self.ensure_game_visible();

        let visible = self
            .state
            .games
            .iter()
            .enumerate()
            .skip(self.game_offset)
            .take(self.game_viewport);

        let mut constraints: Vec<Constraint> = (0..self.game_viewport)
            .map(|_| Constraint::Length(TILE_WIDTH))
            .collect();
        constraints.push(Constraint::Min(0));
        let cells = Layout::default()
            .direction(Direction::Horizontal)
            .constraints(constraints)
            .split(area);

        for (cell, (idx, game)) in cells.iter().zip(visible) {
            let selected = self.state.selected_game.as_ref() == Some(game);
            let focused = self.focus == FocusRow::Games && self.game_cursor == idx;
            let border = if focused {
                blend(palette.tile_rest, palette.tile_hover, alpha)
            } else if selected {
                palette.accent
            } else {
                palette.tile_rest
            };
            let border_type = if selected {
                BorderType::Double
            } else {
                BorderType::Rounded
            };

            let mut lines = vec![
                Line::from(game.icon.clone()),
                Line::from(Span::styled(
                    game.title.clone(),
                    Style::default()
                        .fg(palette.foreground)
                        .add_modifier(Modifier::BOLD),
                )),
                Line::from(Span::styled(
                    self.last_played_label(game),
                    Style::default().fg(palette.muted),
                )),
            ];
            if selected {
                lines.push(Line::from(Span::styled(
                    "▶ in session",
                    Style::default()
                        .fg(palette.accent)
                        .add_modifier(Modifier::BOLD),
                )));
            }

            let tile = Paragraph::new(lines)
                .block(
                    Block::default()
                        .borders(Borders::ALL)
                        .border_type(border_type)
                        .border_style(Style::default().fg(border)),
                )
                .alignment(Alignment::Center);
            frame.render_widget(tile, *cell);
        }
    }

    fn render_actions(&self, frame: &mut Frame, area: Rect, palette: &Palette, alpha: f64) {
        let mut constraints: Vec<Constraint> = QuickAction::ALL
            .iter()
            .map(|_| Constraint::Length(BUTTON_WIDTH))
            .collect();
        constraints.push(Constraint::Min(0));
        let cells = Layout::default()
            .direction(Direction::Horizontal)
            .constraints(constraints)
            .split(area);

        for (idx, action) in QuickAction::ALL.iter().enumerate() {
            let focused = self.focus == FocusRow::Actions && self.action_cursor == idx;
            let border = if focused {
                blend(palette.button_rest, palette.button_hover, alpha)
            } else {
                palette.button_rest
            };
            let label_style = if focused {
                Style::default()
                    .fg(palette.foreground)
                    .add_modifier(Modifier::BOLD)
            } else {
                Style::default().fg(palette.muted)
            };

            let button = Paragraph::new(Line::from(Span::styled(
                format!("{} {}", action.icon(), action.label()),
                label_style,
            )))
            .block(
                Block::default()
                    .borders(Borders::ALL)
                    .border_type(BorderType::Rounded)
                    .border_style(Style::default().fg(border)),
            )
            .alignment(Alignment::Center);
            frame.render_widget(button, cells[idx]);
        }
    }

    fn render_footer(&self, frame: &mut Frame, area: Rect, palette: &Palette) {
        let hints = "←→ move · ↑↓ row · enter select · t theme · q quit ";
        let hints_width = (hints.chars().count() as u16).min(area.width);

        let columns = Layout::default()
            .direction(Direction::Horizontal)
            .constraints([Constraint::Min(10), Constraint::Length(hints_width)])
            .split(area);

        let status = Paragraph::new(Line::from(Span::styled(
            format!(" {}", self.status),
            Style::default().fg(palette.status_fg),
        )));
        frame.render_widget(status, columns[0]);

        let help = Paragraph::new(Line::from(Span::styled(
            hints,
            Style::default().fg(palette.muted),
        )))
        .alignment(Alignment::Right);
        frame.render_widget(help, columns[1]);
    }

    fn clock_text(&self) -> String {
        let local = self.state.local_time();
        if self.config.twelve_hour_clock {
            local.format("%I:%M %p").to_string()
        } else {
            local.format("%H:%M").to_string()
        }
    }

    fn last_played_label(&self, game: &Game) -> String {
        if game.never_played() {
            "never played".to_string()
        } else {
            let local: DateTime<FixedOffset> = game.last_played.with_timezone(&self.state.tz);
            format!("played {}", local.format("%b %d %H:%M"))
        }
    }
}

fn battery_glyph(percent: u8) -> String {
    let gauge = match percent {
        0..=20 => "[|    ]",
        21..=40 => "[||   ]",
        41..=60 => "[|||  ]",
        61..=80 => "[|||| ]",
        _ => "[|||||]",
    };
    format!("{gauge} {percent}%")
}

fn restore_terminal(terminal: &mut Terminal<CrosstermBackend<io::Stdout>>) -> Result<()> {
    disable_raw_mode().context("failed to disable raw mode")?;
    execute!(terminal.backend_mut(), LeaveAlternateScreen)
        .context("failed to leave alternate screen")?;
    terminal.show_cursor()?;
    Ok(())
}

fn spawn_input_thread(sender: mpsc::Sender<AppEvent>) {
    thread::spawn(move || loop {
        match event::poll(TICK_RATE) {
            Ok(true) => match event::read() {
                Ok(evt) => {
                    if sender.blocking_send(AppEvent::Input(evt)).is_err() {
                        break;
                    }
                }
                Err(_) => break,
            },
            Ok(false) => {
                if sender.blocking_send(AppEvent::Tick).is_err() {
                    break;
                }
            }
            Err(_) => break,
        }
    });
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Offset;

    fn sample_app() -> HomeApp {
        HomeApp::new(Catalog::builtin(), AppConfig::default(), chrono::Utc.fix())
    }

    #[test]
    fn focus_cycles_through_all_rows() {
        let mut row = FocusRow::Players;
        row = row.next();
        assert_eq!(row, FocusRow::Games);
        row = row.next();
        assert_eq!(row, FocusRow::Actions);
        row = row.next();
        assert_eq!(row, FocusRow::Players);
        assert_eq!(row.prev(), FocusRow::Actions);
    }

    #[test]
    fn activating_a_game_tracks_its_sorted_position() {
        let mut app = sample_app();
        app.dispatch(Action::Tick(Utc::now()));
        app.focus = FocusRow::Games;
        app.game_cursor = app.state.games.len() - 1;
        let target = app.state.games[app.game_cursor].clone();

        app.activate();
        assert_eq!(app.state.games[0].id, target.id);
        assert_eq!(app.game_cursor, 0);
        assert!(app.status.starts_with("Launching"));
    }

    #[test]
    fn activating_the_selection_again_closes_it() {
        let mut app = sample_app();
        app.dispatch(Action::Tick(Utc::now()));
        app.focus = FocusRow::Games;
        app.activate();
        assert!(app.state.selected_game.is_some());
        app.activate();
        assert!(app.state.selected_game.is_none());
        assert!(app.status.ends_with("closed"));
    }

    #[test]
    fn power_button_quits() {
        let mut app = sample_app();
        app.focus = FocusRow::Actions;
        app.action_cursor = QuickAction::ALL.len() - 1;
        app.activate();
        assert!(app.should_quit);
    }

    #[test]
    fn battery_glyph_covers_the_gauge() {
        assert_eq!(battery_glyph(10), "[|    ] 10%");
        assert_eq!(battery_glyph(80), "[|||| ] 80%");
        assert_eq!(battery_glyph(100), "[|||||] 100%");
    }
}
