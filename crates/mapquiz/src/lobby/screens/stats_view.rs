//! Statistics view screen: best scores and recent sessions for a user.

use crossterm::event::{KeyCode, KeyEvent};
use derive_getters::Getters;
use mapquiz_core::CompletionTier;
use ratatui::{
    Frame,
    layout::{Alignment, Constraint, Direction, Layout},
    style::{Color, Modifier, Style},
    widgets::{Block, Borders, Cell, Paragraph, Row, Table},
};
use tracing::{debug, info, instrument};

use crate::lobby::screen::{Screen, ScreenTransition};
use crate::{ProfileService, QuizStats, SessionResult, User};

const RECENT_LIMIT: usize = 20;

/// State for the statistics view screen.
#[derive(Debug, Getters)]
pub struct StatsViewScreen {
    current_user: User,
    stats: Option<QuizStats>,
    recent_sessions: Vec<SessionResult>,
}

impl StatsViewScreen {
    /// Creates the stats view for `current_user`, loading data immediately.
    #[instrument(skip(current_user, profile_service))]
    pub fn new(current_user: User, profile_service: &ProfileService) -> Self {
        let user_id = *current_user.id();
        debug!(user_id, "Initializing StatsViewScreen");

        let stats = profile_service.get_stats(user_id).ok();
        let mut recent_sessions = profile_service.get_history(user_id).unwrap_or_default();
        recent_sessions.truncate(RECENT_LIMIT);

        info!(
            user_id,
            sessions = recent_sessions.len(),
            "StatsViewScreen initialized"
        );

        Self {
            current_user,
            stats,
            recent_sessions,
        }
    }
}

fn tier_color(result: &SessionResult) -> Color {
    match result.parse_tier() {
        Ok(CompletionTier::Perfect) => Color::Green,
        Ok(CompletionTier::Low) => Color::Red,
        Ok(CompletionTier::Standard) => Color::Yellow,
        Err(_) => Color::White,
    }
}

impl Screen for StatsViewScreen {
    #[instrument(level = "trace", skip(self, frame, _profile_service))]
    fn render(&self, frame: &mut Frame, _profile_service: &ProfileService) {
        let area = frame.area();
        let chunks = Layout::default()
            .direction(Direction::Vertical)
            .constraints([
                Constraint::Length(3),
                Constraint::Length(3),
                Constraint::Min(5),
                Constraint::Length(3),
            ])
            .split(area);

        let title = Paragraph::new(format!(
            "Statistics - {}",
            self.current_user.display_name()
        ))
        .style(
            Style::default()
                .fg(Color::Cyan)
                .add_modifier(Modifier::BOLD),
        )
        .alignment(Alignment::Center)
        .block(Block::default().borders(Borders::ALL));
        frame.render_widget(title, chunks[0]);

        let summary_text = match &self.stats {
            Some(stats) => format!(
                "Sessions: {}   Best: {}   Perfect runs: {}   Regions named: {}",
                stats.sessions_played(),
                stats.best_score(),
                stats.perfect_runs(),
                stats.regions_guessed()
            ),
            None => "No statistics available".to_string(),
        };
        let summary = Paragraph::new(summary_text)
            .style(Style::default().fg(Color::Green))
            .alignment(Alignment::Center)
            .block(Block::default().borders(Borders::ALL).title("Summary"));
        frame.render_widget(summary, chunks[1]);

        let bold = Style::default().add_modifier(Modifier::BOLD);
        let header = Row::new(vec![
            Cell::from("Map").style(bold),
            Cell::from("Score").style(bold),
            Cell::from("Result").style(bold),
            Cell::from("Played").style(bold),
        ])
        .style(Style::default().fg(Color::Yellow));

        let rows: Vec<Row> = self
            .recent_sessions
            .iter()
            .map(|result| {
                Row::new(vec![
                    Cell::from(result.map_id().as_str()),
                    Cell::from(result.summary().to_string()),
                    Cell::from(result.tier().as_str())
                        .style(Style::default().fg(tier_color(result))),
                    Cell::from(result.played_at().format("%Y-%m-%d %H:%M").to_string()),
                ])
            })
            .collect();

        let widths = [
            Constraint::Percentage(30),
            Constraint::Percentage(15),
            Constraint::Percentage(20),
            Constraint::Percentage(35),
        ];
        let table = Table::new(rows, widths).header(header).block(
            Block::default()
                .borders(Borders::ALL)
                .title(format!("Recent Sessions ({} most recent)", RECENT_LIMIT)),
        );
        frame.render_widget(table, chunks[2]);

        let help = Paragraph::new("Esc / b: Back to Lobby | q: Quit")
            .style(Style::default().fg(Color::DarkGray))
            .alignment(Alignment::Center)
            .block(Block::default().borders(Borders::ALL));
        frame.render_widget(help, chunks[3]);
    }

    #[instrument(skip(self, key, _profile_service))]
    fn handle_key(&mut self, key: KeyEvent, _profile_service: &ProfileService) -> ScreenTransition {
        match key.code {
            KeyCode::Esc | KeyCode::Char('b') | KeyCode::Char('B') => {
                info!("Returning to main lobby from stats");
                ScreenTransition::GoToMainLobby
            }
            KeyCode::Char('q') | KeyCode::Char('Q') => ScreenTransition::Quit,
            _ => ScreenTransition::Stay,
        }
    }
}
