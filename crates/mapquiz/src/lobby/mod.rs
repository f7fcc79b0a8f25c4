//! Lobby system: multi-screen TUI with profile selection, the quiz and statistics.

mod clock;
mod controller;
mod map_grid;
mod screen;
mod screens;

pub use clock::{ClockEvent, RoundClock};
pub use controller::LobbyController;
pub use screen::{Screen, ScreenTransition};
pub use screens::QuizScreen;
