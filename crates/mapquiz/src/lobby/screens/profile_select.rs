//! Profile selection screen: pick who is playing, or add a new player.

use crossterm::event::{KeyCode, KeyEvent};
use derive_getters::Getters;
use ratatui::{
    Frame,
    layout::{Alignment, Constraint, Direction, Layout},
    style::{Color, Modifier, Style},
    widgets::{Block, Borders, List, ListItem, ListState, Paragraph},
};
use tracing::{debug, info, instrument, warn};

use crate::lobby::screen::{Screen, ScreenTransition};
use crate::{ProfileService, User};

/// State for the profile selection screen.
#[derive(Debug, Getters)]
pub struct ProfileSelectScreen {
    users: Vec<User>,
    list_state: ListState,
    new_name_input: String,
    input_mode: bool,
    error_message: Option<String>,
    selected_user: Option<User>,
}

impl ProfileSelectScreen {
    /// Creates the screen, loading existing profiles. With no profiles yet
    /// it opens straight into name entry.
    #[instrument(skip(profile_service))]
    pub fn new(profile_service: &ProfileService) -> Self {
        let (users, error_message) = match profile_service.repository().list_users() {
            Ok(users) => (users, None),
            Err(e) => {
                warn!(error = %e, "Could not load profiles");
                (Vec::new(), Some("Could not load profiles".to_string()))
            }
        };
        info!(user_count = users.len(), "ProfileSelectScreen initialized");

        let mut list_state = ListState::default();
        if !users.is_empty() {
            list_state.select(Some(0));
        }
        let input_mode = users.is_empty();
        Self {
            users,
            list_state,
            new_name_input: String::new(),
            input_mode,
            error_message,
            selected_user: None,
        }
    }

    /// Moves the highlight by `step` rows, wrapping around.
    #[instrument(skip(self))]
    fn move_selection(&mut self, step: isize) {
        if self.users.is_empty() {
            return;
        }
        let len = self.users.len() as isize;
        let current = self.list_state.selected().unwrap_or(0) as isize;
        let next = (current + step).rem_euclid(len) as usize;
        self.list_state.select(Some(next));
    }

    /// Confirms the highlighted profile.
    #[instrument(skip(self))]
    fn confirm_selection(&mut self) -> bool {
        let Some(user) = self
            .list_state
            .selected()
            .and_then(|idx| self.users.get(idx))
        else {
            return false;
        };
        info!(user_id = user.id(), display_name = %user.display_name(), "Profile selected");
        self.selected_user = Some(user.clone());
        true
    }

    /// Creates (or reuses) a profile named after the input field.
    #[instrument(skip(self, profile_service))]
    fn create_profile(&mut self, profile_service: &ProfileService) -> bool {
        let name = self.new_name_input.trim().to_string();
        if name.is_empty() {
            self.error_message = Some("Name cannot be empty".to_string());
            return false;
        }

        match profile_service.get_or_create_user(name) {
            Ok(user) => {
                debug!(user_id = user.id(), "Profile ready");
                self.new_name_input.clear();
                self.input_mode = false;
                self.error_message = None;
                self.selected_user = Some(user);
                true
            }
            Err(e) => {
                warn!(error = %e, "Failed to create profile");
                self.error_message = Some(format!("Failed to create profile: {}", e.message));
                false
            }
        }
    }
}

impl Screen for ProfileSelectScreen {
    #[instrument(level = "trace", skip(self, frame, _profile_service))]
    fn render(&self, frame: &mut Frame, _profile_service: &ProfileService) {
        let area = frame.area();
        let chunks = Layout::default()
            .direction(Direction::Vertical)
            .constraints([
                Constraint::Length(3),
                Constraint::Min(5),
                Constraint::Length(3),
                Constraint::Length(3),
                Constraint::Length(3),
            ])
            .split(area);

        let title = Paragraph::new("Who is playing?")
            .style(
                Style::default()
                    .fg(Color::Cyan)
                    .add_modifier(Modifier::BOLD),
            )
            .alignment(Alignment::Center)
            .block(Block::default().borders(Borders::ALL));
        frame.render_widget(title, chunks[0]);

        let items: Vec<ListItem> = self
            .users
            .iter()
            .map(|u| ListItem::new(u.display_name().as_str()))
            .collect();

        let list = List::new(items)
            .block(Block::default().borders(Borders::ALL).title("Players"))
            .highlight_style(
                Style::default()
                    .fg(Color::Yellow)
                    .add_modifier(Modifier::BOLD),
            )
            .highlight_symbol("> ");

        let mut list_state = self.list_state;
        frame.render_stateful_widget(list, chunks[1], &mut list_state);

        let (input_title, input_style) = if self.input_mode {
            (
                "New player name (Enter to confirm, Esc to cancel)",
                Style::default().fg(Color::White),
            )
        } else {
            ("Press 'n' to add a player", Style::default().fg(Color::DarkGray))
        };
        let input = Paragraph::new(self.new_name_input.as_str())
            .style(input_style)
            .block(Block::default().borders(Borders::ALL).title(input_title));
        frame.render_widget(input, chunks[2]);

        let error = Paragraph::new(self.error_message.as_deref().unwrap_or(""))
            .style(Style::default().fg(Color::Red))
            .alignment(Alignment::Center)
            .block(Block::default().borders(Borders::ALL));
        frame.render_widget(error, chunks[3]);

        let help_text = if self.input_mode {
            "Type name | Enter: Confirm | Esc: Cancel"
        } else {
            "↑↓: Select | Enter: Confirm | n: New | q: Quit"
        };
        let help = Paragraph::new(help_text)
            .style(Style::default().fg(Color::DarkGray))
            .alignment(Alignment::Center)
            .block(Block::default().borders(Borders::ALL));
        frame.render_widget(help, chunks[4]);
    }

    #[instrument(skip(self, key, profile_service))]
    fn handle_key(&mut self, key: KeyEvent, profile_service: &ProfileService) -> ScreenTransition {
        if self.input_mode {
            return match key.code {
                KeyCode::Char(c) => {
                    self.new_name_input.push(c);
                    ScreenTransition::Stay
                }
                KeyCode::Backspace => {
                    self.new_name_input.pop();
                    ScreenTransition::Stay
                }
                KeyCode::Enter if self.create_profile(profile_service) => {
                    ScreenTransition::GoToMainLobby
                }
                KeyCode::Esc => {
                    self.input_mode = false;
                    self.new_name_input.clear();
                    self.error_message = None;
                    ScreenTransition::Stay
                }
                _ => ScreenTransition::Stay,
            };
        }

        match key.code {
            KeyCode::Up => {
                self.move_selection(-1);
                ScreenTransition::Stay
            }
            KeyCode::Down => {
                self.move_selection(1);
                ScreenTransition::Stay
            }
            KeyCode::Enter if self.confirm_selection() => ScreenTransition::GoToMainLobby,
            KeyCode::Char('n') | KeyCode::Char('N') => {
                self.input_mode = true;
                self.error_message = None;
                ScreenTransition::Stay
            }
            KeyCode::Char('q') | KeyCode::Char('Q') => ScreenTransition::Quit,
            _ => ScreenTransition::Stay,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::QuizRepository;
    use tempfile::NamedTempFile;

    fn setup() -> (NamedTempFile, ProfileService) {
        let db_file = NamedTempFile::new().expect("Failed to create temp file");
        let db_path = db_file.path().to_str().expect("Invalid path").to_string();
        let repo = QuizRepository::new(db_path).expect("Failed to create repository");
        repo.run_migrations().expect("Migrations failed");
        (db_file, ProfileService::new(repo))
    }

    fn type_name(screen: &mut ProfileSelectScreen, name: &str, service: &ProfileService) {
        for c in name.chars() {
            screen.handle_key(KeyEvent::from(KeyCode::Char(c)), service);
        }
    }

    #[test]
    fn test_empty_database_opens_in_name_entry() {
        let (_db, service) = setup();
        let screen = ProfileSelectScreen::new(&service);
        assert!(*screen.input_mode());
        assert!(screen.users().is_empty());
    }

    #[test]
    fn test_new_name_creates_profile() {
        let (_db, service) = setup();
        let mut screen = ProfileSelectScreen::new(&service);
        type_name(&mut screen, "  Ngozi ", &service);

        let transition = screen.handle_key(KeyEvent::from(KeyCode::Enter), &service);
        assert_eq!(transition, ScreenTransition::GoToMainLobby);
        let user = screen.selected_user().clone().expect("User selected");
        assert_eq!(user.display_name(), "Ngozi");
        assert!(screen.new_name_input().is_empty());
    }

    #[test]
    fn test_existing_name_reuses_profile() {
        let (_db, service) = setup();
        let existing = service
            .get_or_create_user("Tunde".to_string())
            .expect("Create failed");

        let mut screen = ProfileSelectScreen::new(&service);
        screen.handle_key(KeyEvent::from(KeyCode::Char('n')), &service);
        type_name(&mut screen, "Tunde", &service);

        let transition = screen.handle_key(KeyEvent::from(KeyCode::Enter), &service);
        assert_eq!(transition, ScreenTransition::GoToMainLobby);
        assert_eq!(screen.error_message(), &None);
        let user = screen.selected_user().clone().expect("User selected");
        assert_eq!(user.id(), existing.id());
        assert_eq!(service.repository().list_users().expect("List failed").len(), 1);
    }

    #[test]
    fn test_blank_name_stays_with_error() {
        let (_db, service) = setup();
        let mut screen = ProfileSelectScreen::new(&service);
        type_name(&mut screen, "   ", &service);

        let transition = screen.handle_key(KeyEvent::from(KeyCode::Enter), &service);
        assert_eq!(transition, ScreenTransition::Stay);
        assert_eq!(
            screen.error_message().as_deref(),
            Some("Name cannot be empty")
        );
        assert!(screen.selected_user().is_none());
    }
}
