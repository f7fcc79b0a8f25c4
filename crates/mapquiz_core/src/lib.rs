//! Map quiz core - game logic for naming highlighted regions on a map
//!
//! The crate has no I/O of its own. Rendering goes through the [`MapView`]
//! trait and persistence through [`ProgressStore`], so any frontend can
//! drive a [`GameSession`].
//!
//! # Architecture
//!
//! - **Matching**: guess normalization and comparison ([`normalize`], [`Guess`])
//! - **Rounds**: per-region countdown and attempts ([`RoundTimer`], [`RoundState`])
//! - **Budgets**: per-session skip and reveal allowances ([`SessionBudget`])
//! - **Session**: the state machine tying it all together ([`GameSession`])
//!
//! # Example
//!
//! ```
//! use mapquiz_core::{GameSession, MapCanvas, Pacing, Region, RegionMap, Transition};
//!
//! # fn example() -> Result<(), Box<dyn std::error::Error>> {
//! let map = RegionMap::new("demo", "Demo", vec![Region::new("kano", "Kano")])?;
//! let mut session = GameSession::builder(map, MapCanvas::new())
//!     .pacing(Pacing::immediate())
//!     .seed(7)
//!     .build();
//!
//! session.start()?;
//! let Transition::Resolved { ticket, .. } = session.submit_guess("kano state")? else {
//!     unreachable!();
//! };
//! let done = session.advance(ticket);
//! assert!(matches!(done, Transition::Completed { .. }));
//! # Ok(())
//! # }
//! # example().unwrap();
//! ```

#![warn(missing_docs)]
#![forbid(unsafe_code)]

// Private module declarations
mod budget;
mod error;
mod map;
mod matcher;
mod progress;
mod region;
mod round;
mod rules;
mod score;
mod session;
mod timer;
mod view;

// Crate-level exports - Errors
pub use error::{BudgetKind, QuizError};

// Crate-level exports - Regions and maps
pub use map::{MapError, RegionMap};
pub use region::{Region, RegionId, RegionStatus};

// Crate-level exports - Name matching
pub use matcher::{Guess, NameKey, matches, normalize};

// Crate-level exports - Round mechanics
pub use budget::{Budget, SessionBudget};
pub use round::RoundState;
pub use timer::{RoundTimer, TimerTick, TimerToken, format_clock};

// Crate-level exports - Rules and scoring
pub use rules::{
    ATTEMPTS_PER_ROUND, LOW_SCORE_THRESHOLD, MAX_REVEAL_USES, MAX_SKIP_USES, Pacing,
    QuizRules, ROUND_SECONDS,
};
pub use score::{CompletionTier, ScoreState, ScoreSummary};

// Crate-level exports - Session
pub use session::{AdvanceTicket, CorrectHook, GameSession, Phase, SessionBuilder, Transition};

// Crate-level exports - Rendering and persistence seams
pub use progress::{MemoryProgressStore, PersistedProgress, ProgressStore, StoreError};
pub use view::{Highlight, MapCanvas, MapView, NullView};
