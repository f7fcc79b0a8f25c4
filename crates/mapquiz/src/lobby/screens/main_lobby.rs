//! Main lobby screen: the hub between profile selection, the quiz and stats.

use crossterm::event::{KeyCode, KeyEvent};
use derive_getters::Getters;
use ratatui::{
    Frame,
    layout::{Alignment, Constraint, Direction, Layout},
    style::{Color, Modifier, Style},
    widgets::{Block, Borders, List, ListItem, ListState, Paragraph},
};
use strum::{EnumIter, IntoEnumIterator};
use tracing::{debug, info, instrument, warn};

use crate::lobby::screen::{Screen, ScreenTransition};
use crate::{ProfileService, User};

/// Menu options available in the main lobby.
#[derive(Debug, Clone, Copy, PartialEq, Eq, EnumIter)]
enum LobbyOption {
    Play,
    ViewStats,
    ResetProgress,
    ChangeProfile,
    Quit,
}

impl LobbyOption {
    fn label(self) -> &'static str {
        match self {
            Self::Play => "Play",
            Self::ViewStats => "View Statistics",
            Self::ResetProgress => "Forget Guessed Regions",
            Self::ChangeProfile => "Change Profile",
            Self::Quit => "Quit",
        }
    }

    fn count() -> usize {
        Self::iter().count()
    }
}

/// State for the main lobby screen.
#[derive(Debug, Getters)]
pub struct MainLobbyScreen {
    current_user: User,
    map_id: String,
    list_state: ListState,
    status_line: Option<String>,
}

impl MainLobbyScreen {
    /// Creates the lobby for `current_user`, playing the map `map_id`.
    #[instrument(skip(current_user), fields(user_id = current_user.id()))]
    pub fn new(current_user: User, map_id: impl Into<String> + std::fmt::Debug) -> Self {
        debug!("Initializing MainLobbyScreen");
        let mut list_state = ListState::default();
        list_state.select(Some(0));
        Self {
            current_user,
            map_id: map_id.into(),
            list_state,
            status_line: None,
        }
    }

    fn select_previous(&mut self) {
        let count = LobbyOption::count();
        let i = match self.list_state.selected() {
            Some(i) if i > 0 => i - 1,
            _ => count - 1,
        };
        self.list_state.select(Some(i));
    }

    fn select_next(&mut self) {
        let count = LobbyOption::count();
        let i = self.list_state.selected().map_or(0, |i| (i + 1) % count);
        self.list_state.select(Some(i));
    }

    fn selected_option(&self) -> LobbyOption {
        let idx = self.list_state.selected().unwrap_or(0);
        LobbyOption::iter().nth(idx).unwrap_or(LobbyOption::Play)
    }

    /// Clears the saved progress for the current map.
    #[instrument(skip(self, profile_service))]
    fn reset_progress(&mut self, profile_service: &ProfileService) {
        let result = profile_service.reset_progress(*self.current_user.id(), Some(&self.map_id));
        self.status_line = Some(match result {
            Ok(0) => "Nothing to forget on this map.".to_string(),
            Ok(n) => format!("Forgot {} guessed regions.", n),
            Err(e) => {
                warn!(error = %e, "Failed to reset progress");
                "Could not reset progress.".to_string()
            }
        });
    }
}

impl Screen for MainLobbyScreen {
    #[instrument(level = "trace", skip(self, frame, profile_service))]
    fn render(&self, frame: &mut Frame, profile_service: &ProfileService) {
        let area = frame.area();
        let chunks = Layout::default()
            .direction(Direction::Vertical)
            .constraints([
                Constraint::Length(3),
                Constraint::Length(3),
                Constraint::Min(5),
                Constraint::Length(3),
                Constraint::Length(3),
            ])
            .split(area);

        let title = Paragraph::new("Map Quiz - Lobby")
            .style(
                Style::default()
                    .fg(Color::Cyan)
                    .add_modifier(Modifier::BOLD),
            )
            .alignment(Alignment::Center)
            .block(Block::default().borders(Borders::ALL));
        frame.render_widget(title, chunks[0]);

        let stats_text = match profile_service.get_stats(*self.current_user.id()) {
            Ok(stats) => format!(
                "Player: {}   Sessions: {}   Best: {}   Regions named: {}",
                self.current_user.display_name(),
                stats.sessions_played(),
                stats.best_score(),
                stats.regions_guessed()
            ),
            Err(_) => format!("Player: {}", self.current_user.display_name()),
        };
        let profile_bar = Paragraph::new(stats_text)
            .style(Style::default().fg(Color::Green))
            .alignment(Alignment::Center)
            .block(Block::default().borders(Borders::ALL));
        frame.render_widget(profile_bar, chunks[1]);

        let items: Vec<ListItem> = LobbyOption::iter()
            .map(|opt| ListItem::new(opt.label()))
            .collect();
        let menu = List::new(items)
            .block(Block::default().borders(Borders::ALL).title("Menu"))
            .highlight_style(
                Style::default()
                    .fg(Color::Yellow)
                    .add_modifier(Modifier::BOLD),
            )
            .highlight_symbol("> ");
        let mut list_state = self.list_state;
        frame.render_stateful_widget(menu, chunks[2], &mut list_state);

        let status = Paragraph::new(self.status_line.as_deref().unwrap_or(""))
            .style(Style::default().fg(Color::Yellow))
            .alignment(Alignment::Center)
            .block(Block::default().borders(Borders::ALL));
        frame.render_widget(status, chunks[3]);

        let help = Paragraph::new("↑↓: Navigate | Enter: Select | q: Quit")
            .style(Style::default().fg(Color::DarkGray))
            .alignment(Alignment::Center)
            .block(Block::default().borders(Borders::ALL));
        frame.render_widget(help, chunks[4]);
    }

    #[instrument(skip(self, key, profile_service))]
    fn handle_key(&mut self, key: KeyEvent, profile_service: &ProfileService) -> ScreenTransition {
        match key.code {
            KeyCode::Up => {
                self.select_previous();
                ScreenTransition::Stay
            }
            KeyCode::Down => {
                self.select_next();
                ScreenTransition::Stay
            }
            KeyCode::Enter => {
                let option = self.selected_option();
                info!(option = ?option, "Lobby option selected");
                self.status_line = None;
                match option {
                    LobbyOption::Play => ScreenTransition::GoToQuiz,
                    LobbyOption::ViewStats => ScreenTransition::GoToStatsView,
                    LobbyOption::ResetProgress => {
                        self.reset_progress(profile_service);
                        ScreenTransition::Stay
                    }
                    LobbyOption::ChangeProfile => ScreenTransition::GoToProfileSelect,
                    LobbyOption::Quit => ScreenTransition::Quit,
                }
            }
            KeyCode::Char('q') | KeyCode::Char('Q') => ScreenTransition::Quit,
            _ => ScreenTransition::Stay,
        }
    }
}
