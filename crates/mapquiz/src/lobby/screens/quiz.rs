//! Quiz screen: the map, the guess field and the round clock.

use std::cell::RefCell;
use std::rc::Rc;
use std::time::Instant;

use crossterm::event::{KeyCode, KeyEvent};
use derive_getters::Getters;
use mapquiz_core::{
    CompletionTier, GameSession, MapCanvas, Phase, QuizError, QuizRules, Region, ScoreSummary,
    Transition,
};
use ratatui::{
    Frame,
    layout::{Alignment, Constraint, Direction, Layout},
    style::{Color, Modifier, Style},
    widgets::{Block, Borders, Clear, Paragraph, Wrap},
};
use tracing::{debug, info, instrument, warn};

use crate::lobby::clock::{ClockEvent, RoundClock};
use crate::lobby::map_grid::{centered_rect, render_map_grid};
use crate::lobby::screen::{Screen, ScreenTransition};
use crate::{GridLayout, ProfileService, QuizConfig, QuizMap, User};

/// State for the quiz screen.
#[derive(Debug, Getters)]
pub struct QuizScreen {
    current_user: User,
    session: GameSession<MapCanvas>,
    layout: GridLayout,
    clock: RoundClock,
    input: String,
    show_rules: bool,
    notice: Option<String>,
    #[getter(skip)]
    last_fact: Rc<RefCell<Option<String>>>,
    result_recorded: bool,
}

impl QuizScreen {
    /// Creates a quiz screen for `current_user` on `quiz_map`.
    ///
    /// Regions the user guessed in earlier sessions are shown until the
    /// first round starts.
    #[instrument(skip_all, fields(user_id = current_user.id(), map_id = %quiz_map.map().id()))]
    pub fn new(
        current_user: User,
        quiz_map: QuizMap,
        config: &QuizConfig,
        profile_service: &ProfileService,
    ) -> Self {
        let (map, layout) = quiz_map.into_parts();
        let store = profile_service.progress_store(&current_user, map.id());

        let last_fact = Rc::new(RefCell::new(None));
        let sink = Rc::clone(&last_fact);
        let session = GameSession::builder(map, MapCanvas::new())
            .rules(*config.rules())
            .pacing(*config.pacing())
            .progress_store(store)
            .on_correct(move |region: &Region| {
                *sink.borrow_mut() = region.description().clone();
            })
            .build();

        info!(
            previously_guessed = session.previously_guessed().len(),
            "QuizScreen initialized"
        );

        Self {
            current_user,
            session,
            layout,
            clock: RoundClock::new(),
            input: String::new(),
            show_rules: false,
            notice: None,
            last_fact,
            result_recorded: false,
        }
    }

    /// Text shown under the status line after a correct guess.
    pub fn last_fact(&self) -> Option<String> {
        self.last_fact.borrow().clone()
    }

    /// Starts or restarts the session.
    #[instrument(skip(self, profile_service))]
    fn start(&mut self, now: Instant, profile_service: &ProfileService) {
        self.clock.cancel_all();
        self.input.clear();
        self.last_fact.borrow_mut().take();
        self.result_recorded = false;
        let result = self.session.start();
        self.apply(result, now, profile_service);
    }

    /// Feeds the outcome of a session action to the clock and the UI.
    #[instrument(skip(self, result, profile_service))]
    fn apply(
        &mut self,
        result: Result<Transition, QuizError>,
        now: Instant,
        profile_service: &ProfileService,
    ) {
        let transition = match result {
            Ok(transition) => transition,
            Err(e) => {
                debug!(error = %e, "Action rejected");
                if e.is_blocking() {
                    self.notice = Some(e.to_string());
                }
                return;
            }
        };

        self.clock.observe(&transition, now);
        if matches!(transition, Transition::RoundStarted { .. }) {
            self.last_fact.borrow_mut().take();
        }
        if let Transition::Completed { summary, tier } = transition {
            self.record_result(summary, tier, profile_service);
        }
    }

    /// Saves the final score once per session.
    #[instrument(skip(self, profile_service))]
    fn record_result(
        &mut self,
        summary: ScoreSummary,
        tier: CompletionTier,
        profile_service: &ProfileService,
    ) {
        if self.result_recorded {
            return;
        }
        self.result_recorded = true;

        if let Err(e) = profile_service.record_session_result(
            *self.current_user.id(),
            self.session.map().id(),
            summary,
            tier,
        ) {
            warn!(error = %e, "Failed to record session result");
        }
    }

    /// Submits the guess field.
    fn submit(&mut self, now: Instant, profile_service: &ProfileService) {
        let guess = std::mem::take(&mut self.input);
        let result = self.session.submit_guess(&guess);
        self.apply(result, now, profile_service);
    }

    /// Leaves the quiz, cancelling everything that is pending.
    #[instrument(skip(self))]
    fn leave(&mut self) -> ScreenTransition {
        self.session.abandon();
        self.clock.cancel_all();
        info!(score = %self.session.score(), "Leaving quiz");
        ScreenTransition::GoToMainLobby
    }
}

fn rules_text(rules: &QuizRules) -> String {
    format!(
        "A region is highlighted on the map. Type its name and press Enter.\n\n\
         You have {} tries and {} seconds for each region.\n\
         Tab skips a region ({} per game). It comes back later.\n\
         F2 reveals the name ({} per game).\n\
         F5 restarts. Esc returns to the lobby.\n\n\
         Case, spaces, hyphens and the word \"state\" are ignored.\n\n\
         Press F1 or Esc to close.",
        rules.attempts_per_round, rules.round_seconds, rules.max_skip_uses, rules.max_reveal_uses
    )
}

impl Screen for QuizScreen {
    #[instrument(level = "trace", skip(self, frame, _profile_service))]
    fn render(&self, frame: &mut Frame, _profile_service: &ProfileService) {
        let area = frame.area();
        let chunks = Layout::default()
            .direction(Direction::Vertical)
            .constraints([
                Constraint::Length(3),
                Constraint::Length(3),
                Constraint::Min(10),
                Constraint::Length(4),
                Constraint::Length(3),
                Constraint::Length(3),
            ])
            .split(area);

        let title = Paragraph::new(format!(
            "Map Quiz - {}",
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

        let budget = self.session.budget();
        let tries = self
            .session
            .attempts_left()
            .map_or_else(|| "-".to_string(), |n| n.to_string());
        let status = Paragraph::new(format!(
            "Score: {}   Time: {}   Tries: {}   Skips: {}   Reveals: {}",
            self.session.score(),
            self.session.clock(),
            tries,
            budget.skip().remaining(),
            budget.reveal().remaining()
        ))
        .style(Style::default().fg(Color::Green))
        .alignment(Alignment::Center)
        .block(Block::default().borders(Borders::ALL));
        frame.render_widget(status, chunks[1]);

        render_map_grid(frame, chunks[2], &self.session, &self.layout);

        let mut message = self.session.message().to_string();
        if let Some(fact) = self.last_fact() {
            message.push('\n');
            message.push_str(&fact);
        }
        let message_color = match self.session.phase() {
            Phase::Complete(CompletionTier::Perfect) => Color::Green,
            Phase::Complete(CompletionTier::Low) => Color::Red,
            _ => Color::White,
        };
        let message = Paragraph::new(message)
            .style(Style::default().fg(message_color))
            .alignment(Alignment::Center)
            .wrap(Wrap { trim: true })
            .block(Block::default().borders(Borders::ALL));
        frame.render_widget(message, chunks[3]);

        let input_active = self.session.phase() == Phase::RoundActive;
        let input_style = if input_active {
            Style::default().fg(Color::White)
        } else {
            Style::default().fg(Color::DarkGray)
        };
        let input = Paragraph::new(self.input.as_str())
            .style(input_style)
            .block(Block::default().borders(Borders::ALL).title("Your guess"));
        frame.render_widget(input, chunks[4]);

        let help_text = match self.session.phase() {
            Phase::RoundActive | Phase::Intermission => {
                "Enter: Guess | Tab: Skip | F2: Reveal | F5: Restart | F1: Rules | Esc: Lobby"
            }
            _ => "Enter: Start | F1: Rules | Esc: Lobby",
        };
        let help = Paragraph::new(help_text)
            .style(Style::default().fg(Color::DarkGray))
            .alignment(Alignment::Center)
            .block(Block::default().borders(Borders::ALL));
        frame.render_widget(help, chunks[5]);

        if self.show_rules {
            let popup = centered_rect(area, 70, 14);
            frame.render_widget(Clear, popup);
            let rules = Paragraph::new(rules_text(self.session.rules()))
                .wrap(Wrap { trim: false })
                .block(
                    Block::default()
                        .borders(Borders::ALL)
                        .title("How to play")
                        .border_style(Style::default().fg(Color::Yellow)),
                );
            frame.render_widget(rules, popup);
        }

        if let Some(notice) = &self.notice {
            let popup = centered_rect(area, 50, 5);
            frame.render_widget(Clear, popup);
            let notice = Paragraph::new(format!("{}\n\nPress any key.", notice))
                .style(Style::default().fg(Color::Red))
                .alignment(Alignment::Center)
                .block(Block::default().borders(Borders::ALL).title("Cannot start"));
            frame.render_widget(notice, popup);
        }
    }

    #[instrument(skip(self, key, profile_service))]
    fn handle_key(&mut self, key: KeyEvent, profile_service: &ProfileService) -> ScreenTransition {
        let now = Instant::now();

        if self.notice.take().is_some() {
            return ScreenTransition::Stay;
        }

        let phase = self.session.phase();
        match key.code {
            KeyCode::F(1) => {
                self.show_rules = !self.show_rules;
                ScreenTransition::Stay
            }
            KeyCode::Esc if self.show_rules => {
                self.show_rules = false;
                ScreenTransition::Stay
            }
            KeyCode::Esc => self.leave(),
            KeyCode::F(5) => {
                self.start(now, profile_service);
                ScreenTransition::Stay
            }
            KeyCode::F(2) => {
                let result = self.session.reveal();
                self.apply(result, now, profile_service);
                ScreenTransition::Stay
            }
            KeyCode::Tab => {
                let result = self.session.skip();
                self.apply(result, now, profile_service);
                ScreenTransition::Stay
            }
            KeyCode::Enter if phase == Phase::RoundActive => {
                self.submit(now, profile_service);
                ScreenTransition::Stay
            }
            KeyCode::Enter if phase != Phase::Intermission => {
                self.start(now, profile_service);
                ScreenTransition::Stay
            }
            KeyCode::Backspace => {
                self.input.pop();
                ScreenTransition::Stay
            }
            KeyCode::Char(c) if phase == Phase::RoundActive => {
                self.input.push(c);
                ScreenTransition::Stay
            }
            _ => ScreenTransition::Stay,
        }
    }

    #[instrument(level = "trace", skip(self, profile_service))]
    fn on_tick(&mut self, now: Instant, profile_service: &ProfileService) -> ScreenTransition {
        while let Some(event) = self.clock.poll(now) {
            let transition = match event {
                ClockEvent::Tick(token) => {
                    let transition = self.session.tick(token);
                    if transition == Transition::Ignored {
                        self.clock.cancel_tick();
                    }
                    transition
                }
                ClockEvent::Advance(ticket) => self.session.advance(ticket),
            };
            self.apply(Ok(transition), now, profile_service);
        }
        ScreenTransition::Stay
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::QuizRepository;
    use mapquiz_core::{RegionMap, RegionStatus};
    use tempfile::NamedTempFile;

    fn setup() -> (NamedTempFile, ProfileService, QuizScreen) {
        let db_file = NamedTempFile::new().expect("Failed to create temp file");
        let db_path = db_file.path().to_str().expect("Invalid path").to_string();
        let repo = QuizRepository::new(db_path).expect("Failed to create repository");
        repo.run_migrations().expect("Migrations failed");
        let service = ProfileService::new(repo);
        let user = service
            .get_or_create_user("Kemi".to_string())
            .expect("Create failed");

        let map = RegionMap::new("solo", "Solo", vec![Region::new("fct", "Abuja")])
            .expect("Valid map");
        let layout = GridLayout::reading_order(&map);
        let config = QuizConfig::from_toml(
            "[pacing]\ncorrect_ms = 0\nfailed_ms = 0\ntimeout_ms = 0\nskip_ms = 0\nreveal_ms = 0",
        )
        .expect("Valid config");

        let screen = QuizScreen::new(user, QuizMap::new(map, layout), &config, &service);
        (db_file, service, screen)
    }

    fn press(screen: &mut QuizScreen, code: KeyCode, service: &ProfileService) -> ScreenTransition {
        screen.handle_key(KeyEvent::from(code), service)
    }

    #[test]
    fn test_enter_starts_then_typed_guess_completes() {
        let (_db, service, mut screen) = setup();
        assert_eq!(screen.session().phase(), Phase::Idle);

        press(&mut screen, KeyCode::Enter, &service);
        assert_eq!(screen.session().phase(), Phase::RoundActive);
        assert!(screen.clock().has_pending_tick());

        for c in "abuja".chars() {
            press(&mut screen, KeyCode::Char(c), &service);
        }
        press(&mut screen, KeyCode::Enter, &service);
        assert_eq!(screen.session().phase(), Phase::Intermission);
        assert!(screen.input().is_empty());

        screen.on_tick(Instant::now(), &service);
        assert_eq!(
            screen.session().phase(),
            Phase::Complete(CompletionTier::Perfect)
        );
        assert!(*screen.result_recorded());

        let history = service
            .get_history(*screen.current_user().id())
            .expect("History failed");
        assert_eq!(history.len(), 1);
        assert_eq!(history[0].tier(), "perfect");
    }

    #[test]
    fn test_correct_guess_shows_region_description() {
        let (_db, service, mut screen) = setup();
        press(&mut screen, KeyCode::Enter, &service);
        assert_eq!(screen.last_fact(), None);
        screen.session.submit_guess("Abuja").expect("Guess failed");
        // Regions without a description clear the fact line.
        assert_eq!(screen.last_fact(), None);
        assert_eq!(
            screen.session().status_of(&"fct".into()),
            Some(RegionStatus::Correct)
        );
    }

    #[test]
    fn test_fact_line_clears_when_next_round_starts() {
        let (_db, service, _) = setup();
        let user = service
            .get_or_create_user("Sade".to_string())
            .expect("Create failed");
        let map = RegionMap::new(
            "pair",
            "Pair",
            vec![
                Region::new("lagos", "Lagos").with_description("Capital: Ikeja"),
                Region::new("ogun", "Ogun").with_description("Capital: Abeokuta"),
            ],
        )
        .expect("Valid map");
        let layout = GridLayout::reading_order(&map);
        let config = QuizConfig::from_toml(
            "[pacing]\ncorrect_ms = 0\nfailed_ms = 0\ntimeout_ms = 0\nskip_ms = 0\nreveal_ms = 0",
        )
        .expect("Valid config");
        let mut screen = QuizScreen::new(user, QuizMap::new(map, layout), &config, &service);

        press(&mut screen, KeyCode::Enter, &service);
        let name = screen
            .session()
            .active_region()
            .expect("Round active")
            .display_name()
            .clone();
        for c in name.chars() {
            press(&mut screen, KeyCode::Char(c), &service);
        }
        press(&mut screen, KeyCode::Enter, &service);
        assert!(screen.last_fact().is_some());

        screen.on_tick(Instant::now(), &service);
        assert_eq!(screen.session().phase(), Phase::RoundActive);
        assert_eq!(screen.last_fact(), None);
    }

    #[test]
    fn test_typing_is_ignored_before_start() {
        let (_db, service, mut screen) = setup();
        press(&mut screen, KeyCode::Char('x'), &service);
        assert!(screen.input().is_empty());
    }

    #[test]
    fn test_f1_toggles_rules_and_esc_closes_them_first() {
        let (_db, service, mut screen) = setup();
        press(&mut screen, KeyCode::F(1), &service);
        assert!(*screen.show_rules());

        let stay = press(&mut screen, KeyCode::Esc, &service);
        assert_eq!(stay, ScreenTransition::Stay);
        assert!(!*screen.show_rules());
    }

    #[test]
    fn test_esc_abandons_and_returns_to_lobby() {
        let (_db, service, mut screen) = setup();
        press(&mut screen, KeyCode::Enter, &service);

        let transition = press(&mut screen, KeyCode::Esc, &service);
        assert_eq!(transition, ScreenTransition::GoToMainLobby);
        assert_eq!(screen.session().phase(), Phase::Abandoned);
        assert!(!screen.clock().has_pending_tick());
        assert!(
            service
                .get_history(*screen.current_user().id())
                .expect("History failed")
                .is_empty()
        );
    }
}
