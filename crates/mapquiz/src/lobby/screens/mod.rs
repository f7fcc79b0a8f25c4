//! Individual lobby screens.

mod main_lobby;
mod profile_select;
mod quiz;
mod stats_view;

pub use main_lobby::MainLobbyScreen;
pub use profile_select::ProfileSelectScreen;
pub use quiz::QuizScreen;
pub use stats_view::StatsViewScreen;
