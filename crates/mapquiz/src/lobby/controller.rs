//! Lobby controller: the state machine driving the multi-screen TUI.

use std::time::Instant;

use crossterm::event::{self, Event, KeyEventKind};
use derive_getters::Getters;
use ratatui::{Terminal, backend::Backend};
use tokio::time::{Duration, sleep};
use tracing::{debug, info, instrument, warn};

use crate::lobby::screen::{Screen, ScreenTransition};
use crate::lobby::screens::{MainLobbyScreen, ProfileSelectScreen, QuizScreen, StatsViewScreen};
use crate::{ProfileService, QuizConfig, QuizMap, User};

/// Active screen in the lobby state machine.
#[derive(Debug)]
enum ActiveScreen {
    ProfileSelect(ProfileSelectScreen),
    MainLobby(MainLobbyScreen),
    StatsView(StatsViewScreen),
    Quiz(Box<QuizScreen>),
}

impl ActiveScreen {
    fn as_screen(&self) -> &dyn Screen {
        match self {
            Self::ProfileSelect(s) => s,
            Self::MainLobby(s) => s,
            Self::StatsView(s) => s,
            Self::Quiz(s) => &**s,
        }
    }

    fn as_screen_mut(&mut self) -> &mut dyn Screen {
        match self {
            Self::ProfileSelect(s) => s,
            Self::MainLobby(s) => s,
            Self::StatsView(s) => s,
            Self::Quiz(s) => &mut **s,
        }
    }
}

/// Controller that drives the lobby state machine.
///
/// Call [`LobbyController::run`] to start the event loop.
#[derive(Debug, Getters)]
pub struct LobbyController {
    profile_service: ProfileService,
    quiz_map: QuizMap,
    config: QuizConfig,
    current_user: Option<User>,
}

impl LobbyController {
    /// Creates a new lobby controller that starts on profile selection.
    #[instrument(skip_all, fields(map_id = %quiz_map.map().id()))]
    pub fn new(profile_service: ProfileService, quiz_map: QuizMap, config: QuizConfig) -> Self {
        info!("Creating LobbyController");
        Self {
            profile_service,
            quiz_map,
            config,
            current_user: None,
        }
    }

    /// Preselects a user so the lobby opens on the main menu.
    #[instrument(skip(self, user), fields(user_id = user.id()))]
    pub fn with_user(mut self, user: User) -> Self {
        self.current_user = Some(user);
        self
    }

    fn initial_screen(&self) -> ActiveScreen {
        match &self.current_user {
            Some(user) => ActiveScreen::MainLobby(self.main_lobby(user.clone())),
            None => self.profile_select(),
        }
    }

    fn main_lobby(&self, user: User) -> MainLobbyScreen {
        MainLobbyScreen::new(user, self.quiz_map.map().id())
    }

    /// Runs the lobby event loop until the user quits.
    #[instrument(skip(self, terminal))]
    pub async fn run<B: Backend + std::io::Write>(
        &mut self,
        terminal: &mut Terminal<B>,
    ) -> anyhow::Result<()>
    where
        <B as Backend>::Error: Send + Sync + 'static,
    {
        info!("Starting lobby event loop");

        let mut screen = self.initial_screen();

        loop {
            terminal.draw(|f| screen.as_screen().render(f, &self.profile_service))?;

            let mut transition = ScreenTransition::Stay;

            // Poll for input with short timeout to keep the loop responsive.
            if event::poll(Duration::from_millis(100))?
                && let Event::Key(key) = event::read()?
                && key.kind != KeyEventKind::Release
            {
                transition = screen
                    .as_screen_mut()
                    .handle_key(key, &self.profile_service);
            }

            if transition == ScreenTransition::Stay {
                transition = screen
                    .as_screen_mut()
                    .on_tick(Instant::now(), &self.profile_service);
            }

            if transition != ScreenTransition::Stay {
                screen = match self.apply_transition(transition, screen) {
                    Some(next) => next,
                    None => {
                        info!("Lobby quitting");
                        return Ok(());
                    }
                };
            }

            sleep(Duration::from_millis(10)).await;
        }
    }

    /// Applies a screen transition, returning the next screen or `None` to quit.
    #[instrument(skip(self, current))]
    fn apply_transition(
        &mut self,
        transition: ScreenTransition,
        current: ActiveScreen,
    ) -> Option<ActiveScreen> {
        debug!(transition = ?transition, "Applying screen transition");
        match transition {
            ScreenTransition::Stay => Some(current),

            ScreenTransition::GoToProfileSelect => {
                info!("Navigating to ProfileSelect");
                Some(ActiveScreen::ProfileSelect(ProfileSelectScreen::new(
                    &self.profile_service,
                )))
            }

            ScreenTransition::GoToMainLobby => {
                if let Some(user) = extract_user_from_screen(&current) {
                    self.current_user = Some(user);
                }
                let Some(user) = self.current_user.clone() else {
                    warn!("No user available for MainLobby, redirecting to ProfileSelect");
                    return Some(self.profile_select());
                };
                info!(user_id = user.id(), "Navigating to MainLobby");
                Some(ActiveScreen::MainLobby(self.main_lobby(user)))
            }

            ScreenTransition::GoToStatsView => {
                let Some(user) = self.current_user.clone() else {
                    warn!("No user for StatsView, redirecting to ProfileSelect");
                    return Some(self.profile_select());
                };
                info!(user_id = user.id(), "Navigating to StatsView");
                Some(ActiveScreen::StatsView(StatsViewScreen::new(
                    user,
                    &self.profile_service,
                )))
            }

            ScreenTransition::GoToQuiz => {
                let Some(user) = self.current_user.clone() else {
                    warn!("No user for Quiz, redirecting to ProfileSelect");
                    return Some(self.profile_select());
                };
                info!(user_id = user.id(), "Navigating to Quiz");
                Some(ActiveScreen::Quiz(Box::new(QuizScreen::new(
                    user,
                    self.quiz_map.clone(),
                    &self.config,
                    &self.profile_service,
                ))))
            }

            ScreenTransition::Quit => None,
        }
    }

    fn profile_select(&self) -> ActiveScreen {
        ActiveScreen::ProfileSelect(ProfileSelectScreen::new(&self.profile_service))
    }
}

/// Extracts the selected user from screens that perform profile selection.
fn extract_user_from_screen(screen: &ActiveScreen) -> Option<User> {
    match screen {
        ActiveScreen::ProfileSelect(s) => s.selected_user().clone(),
        _ => None,
    }
}
