//! Session state machine: round sequencing, scoring and completion.
//!
//! A [`GameSession`] is an owned value driven by discrete events: a guess,
//! a skip or reveal request, a one-second tick, or the deferred advance
//! that follows every resolved round. Each call runs to completion and
//! reports what happened as a [`Transition`].
//!
//! Two tokens keep stale events from leaking into a later round:
//!
//! - every round runs on its own [`TimerToken`]; ticks carrying any other
//!   token are ignored;
//! - every resolution issues a fresh [`AdvanceTicket`]; only the ticket of
//!   the pending intermission can advance the session.

use std::fmt;
use std::time::Duration;

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use serde::{Deserialize, Serialize};
use tracing::{debug, info, instrument, trace, warn};

use crate::matcher::Guess;
use crate::{
    BudgetKind, CompletionTier, Highlight, MapView, Pacing, PersistedProgress, ProgressStore,
    QuizError, QuizRules, Region, RegionId, RegionMap, RegionStatus, RoundState, RoundTimer,
    ScoreState, ScoreSummary, SessionBudget, TimerTick, TimerToken,
};

/// Identifies the deferred advance scheduled by one resolved round.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct AdvanceTicket(u64);

/// Where the session is in its lifecycle.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Phase {
    /// Built but not started.
    Idle,
    /// A region is highlighted and the clock is running.
    RoundActive,
    /// A round just resolved; waiting for the deferred advance.
    Intermission,
    /// Every region is resolved.
    Complete(CompletionTier),
    /// The player left mid-session.
    Abandoned,
}

impl Phase {
    /// Returns true while rounds are being played.
    pub fn is_playing(self) -> bool {
        matches!(self, Self::RoundActive | Self::Intermission)
    }
}

/// What a session call did.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Transition {
    /// A new round began.
    RoundStarted {
        /// The highlighted region.
        region: RegionId,
        /// Token the driver must present with each tick.
        timer: TimerToken,
        /// Length of the round.
        seconds: u32,
    },
    /// A wrong guess; the round goes on.
    Missed {
        /// Wrong guesses still allowed.
        attempts_left: u32,
    },
    /// The clock moved on by one second.
    Ticked {
        /// Seconds left.
        remaining: u32,
    },
    /// The round is over. Call [`GameSession::advance`] with `ticket` after `delay`.
    Resolved {
        /// The region of the finished round.
        region: RegionId,
        /// How it was resolved.
        status: RegionStatus,
        /// Ticket for the deferred advance.
        ticket: AdvanceTicket,
        /// Suggested pause before advancing.
        delay: Duration,
    },
    /// No region is left; the session is over.
    Completed {
        /// Final score.
        summary: ScoreSummary,
        /// Message tier earned.
        tier: CompletionTier,
    },
    /// Nothing to act on: no active round, or a stale token or ticket.
    Ignored,
}

/// Callback run for every correct guess.
pub type CorrectHook = Box<dyn FnMut(&Region)>;

#[derive(Debug)]
enum Stage {
    Idle,
    Round(RoundState),
    Intermission(AdvanceTicket),
    Complete(CompletionTier),
    Abandoned,
}

// ─────────────────────────────────────────────────────────────
//  Builder
// ─────────────────────────────────────────────────────────────

/// Configures and builds a [`GameSession`].
pub struct SessionBuilder<V> {
    map: RegionMap,
    view: V,
    rules: QuizRules,
    pacing: Pacing,
    seed: Option<u64>,
    store: Option<Box<dyn ProgressStore>>,
    on_correct: Option<CorrectHook>,
}

impl<V: MapView> SessionBuilder<V> {
    /// Overrides the default rules.
    pub fn rules(mut self, rules: QuizRules) -> Self {
        self.rules = rules;
        self
    }

    /// Overrides the default pacing.
    pub fn pacing(mut self, pacing: Pacing) -> Self {
        self.pacing = pacing;
        self
    }

    /// Seeds region selection, making a run reproducible.
    pub fn seed(mut self, seed: u64) -> Self {
        self.seed = Some(seed);
        self
    }

    /// Attaches a store for previously guessed regions.
    pub fn progress_store(mut self, store: impl ProgressStore + 'static) -> Self {
        self.store = Some(Box::new(store));
        self
    }

    /// Runs `hook` for every correct guess, after the score is updated.
    pub fn on_correct(mut self, hook: impl FnMut(&Region) + 'static) -> Self {
        self.on_correct = Some(Box::new(hook));
        self
    }

    /// Builds an idle session.
    ///
    /// Previously guessed regions are loaded from the store and painted as
    /// correct. That paint is cosmetic: [`GameSession::start`] resets every
    /// region and the score regardless of it.
    #[instrument(skip(self), fields(map_id = %self.map.id(), regions = self.map.len()))]
    pub fn build(mut self) -> GameSession<V> {
        let rng = match self.seed {
            Some(seed) => StdRng::seed_from_u64(seed),
            None => StdRng::from_entropy(),
        };

        let progress = match self.store.as_mut().map(|store| store.load()) {
            Some(Ok(progress)) => progress,
            Some(Err(e)) => {
                warn!(error = %e, "Could not load saved progress; starting without it");
                PersistedProgress::new()
            }
            None => PersistedProgress::new(),
        };

        for region in self.map.regions() {
            if progress.contains(region.display_name()) {
                self.view.highlight(region.id(), Highlight::Correct);
            }
        }
        info!(previously_guessed = progress.len(), "Session built");

        let total = self.map.len() as u32;
        GameSession {
            statuses: vec![RegionStatus::Unresolved; self.map.len()],
            budget: SessionBudget::new(self.rules.max_skip_uses, self.rules.max_reveal_uses),
            score: ScoreState::new(total),
            timer: RoundTimer::new(),
            stage: Stage::Idle,
            tickets_issued: 0,
            message: "Press start when you are ready.".to_string(),
            map: self.map,
            view: self.view,
            rules: self.rules,
            pacing: self.pacing,
            rng,
            progress,
            store: self.store,
            on_correct: self.on_correct,
        }
    }
}

// ─────────────────────────────────────────────────────────────
//  Session
// ─────────────────────────────────────────────────────────────

/// One play-through of a map.
pub struct GameSession<V> {
    map: RegionMap,
    statuses: Vec<RegionStatus>,
    view: V,
    rules: QuizRules,
    pacing: Pacing,
    budget: SessionBudget,
    score: ScoreState,
    timer: RoundTimer,
    stage: Stage,
    tickets_issued: u64,
    rng: StdRng,
    progress: PersistedProgress,
    store: Option<Box<dyn ProgressStore>>,
    on_correct: Option<CorrectHook>,
    message: String,
}

impl<V: MapView> GameSession<V> {
    /// Starts configuring a session over `map`, drawing on `view`.
    pub fn builder(map: RegionMap, view: V) -> SessionBuilder<V> {
        SessionBuilder {
            map,
            view,
            rules: QuizRules::default(),
            pacing: Pacing::default(),
            seed: None,
            store: None,
            on_correct: None,
        }
    }

    /// Starts (or restarts) the session and opens the first round.
    ///
    /// Cancels any running countdown and pending advance, resets the score,
    /// both budgets and every region status, clears labels and repaints the
    /// map.
    ///
    /// # Errors
    ///
    /// Returns [`QuizError::MapMissing`] if the map has no regions. The session
    /// is left untouched.
    #[instrument(skip(self), fields(map_id = %self.map.id()))]
    pub fn start(&mut self) -> Result<Transition, QuizError> {
        if self.map.is_empty() {
            warn!("Cannot start a session on an empty map");
            return Err(QuizError::MapMissing(self.map.id().to_string()));
        }

        self.timer.stop();
        self.stage = Stage::Idle;
        self.statuses.fill(RegionStatus::Unresolved);
        self.score = ScoreState::new(self.map.len() as u32);
        self.budget.refill();

        self.view.clear_labels();
        for region in self.map.regions() {
            self.view.highlight(region.id(), Highlight::Neutral);
        }

        info!(regions = self.map.len(), "Session started");
        self.message = "Game started! Good luck.".to_string();
        Ok(self.select_next())
    }

    /// Submits a guess for the active region.
    ///
    /// A wrong guess spends an attempt; the last attempt fails the region.
    ///
    /// # Errors
    ///
    /// Returns [`QuizError::EmptyGuess`] for blank input, without spending an
    /// attempt.
    #[instrument(skip(self))]
    pub fn submit_guess(&mut self, raw: &str) -> Result<Transition, QuizError> {
        let index = match &self.stage {
            Stage::Round(round) => round.index(),
            _ => {
                debug!("No active round; guess ignored");
                return Ok(Transition::Ignored);
            }
        };

        let guess = Guess::parse(raw).inspect_err(|e| self.message = e.to_string())?;

        if guess.is_for(self.map.regions()[index].display_name()) {
            return Ok(self.resolve(RegionStatus::Correct));
        }

        let attempts_left = match &mut self.stage {
            Stage::Round(round) => round.record_miss(),
            _ => return Ok(Transition::Ignored),
        };
        debug!(guess = %guess.text(), attempts_left, "Wrong guess");

        if attempts_left > 0 {
            self.message = format!("Wrong! {} tries left for this region.", attempts_left);
            return Ok(Transition::Missed { attempts_left });
        }
        Ok(self.resolve(RegionStatus::Failed))
    }

    /// Delivers a one-second tick for the round running on `token`.
    #[instrument(skip(self))]
    pub fn tick(&mut self, token: TimerToken) -> Transition {
        match &self.stage {
            Stage::Round(round) if round.timer() == token => {}
            _ => {
                trace!(?token, "Tick does not belong to the active round");
                return Transition::Ignored;
            }
        }

        match self.timer.tick(token) {
            TimerTick::Running { remaining } => Transition::Ticked { remaining },
            TimerTick::Expired => self.resolve(RegionStatus::Timeout),
            TimerTick::Stale => Transition::Ignored,
        }
    }

    /// Skips the active region. It stays in the pool and comes back later.
    ///
    /// A re-queued region is an ordinary candidate again, so while skips
    /// remain the same region can be drawn and skipped more than once.
    ///
    /// # Errors
    ///
    /// Returns [`QuizError::BudgetExhausted`] once the skips are used up.
    #[instrument(skip(self))]
    pub fn skip(&mut self) -> Result<Transition, QuizError> {
        self.spend(BudgetKind::Skip, RegionStatus::Skipped)
    }

    /// Reveals the active region's name and resolves it for good.
    ///
    /// # Errors
    ///
    /// Returns [`QuizError::BudgetExhausted`] once the reveals are used up.
    #[instrument(skip(self))]
    pub fn reveal(&mut self) -> Result<Transition, QuizError> {
        self.spend(BudgetKind::Reveal, RegionStatus::Revealed)
    }

    /// Runs the deferred advance scheduled by a resolved round: opens the
    /// next round, or completes the session when nothing is left.
    #[instrument(skip(self))]
    pub fn advance(&mut self, ticket: AdvanceTicket) -> Transition {
        match &self.stage {
            Stage::Intermission(pending) if *pending == ticket => self.select_next(),
            _ => {
                debug!(?ticket, "Advance ticket is no longer pending");
                Transition::Ignored
            }
        }
    }

    /// Leaves the session mid-play. Cancels the clock and any pending advance.
    #[instrument(skip(self))]
    pub fn abandon(&mut self) {
        if self.phase() == Phase::Abandoned {
            debug!("Session already abandoned");
            return;
        }
        self.timer.stop();
        self.stage = Stage::Abandoned;
        self.message = "Session paused.".to_string();
        info!(score = %self.score.summary(), "Session abandoned");
    }

    // ─────────────────────────────────────────────────────────
    //  Internal transitions
    // ─────────────────────────────────────────────────────────

    fn spend(&mut self, kind: BudgetKind, status: RegionStatus) -> Result<Transition, QuizError> {
        if !matches!(self.stage, Stage::Round(_)) {
            debug!(%kind, "No active round; request ignored");
            return Ok(Transition::Ignored);
        }

        self.budget
            .get_mut(kind)
            .try_consume()
            .inspect_err(|e| self.message = e.to_string())?;
        Ok(self.resolve(status))
    }

    /// Closes the active round with `status` and schedules the advance.
    fn resolve(&mut self, status: RegionStatus) -> Transition {
        let round = match std::mem::replace(&mut self.stage, Stage::Idle) {
            Stage::Round(round) => round,
            other => {
                self.stage = other;
                return Transition::Ignored;
            }
        };

        self.timer.stop();
        let index = round.index();
        self.statuses[index] = status;

        if status == RegionStatus::Correct {
            self.score.record_correct();
            self.remember_correct(index);
        }

        let region = &self.map.regions()[index];
        let id = region.id().clone();
        let name = region.display_name().clone();

        self.view.highlight(&id, status.into());
        if status != RegionStatus::Skipped {
            self.view.label(&id, &name);
        }

        self.message = match status {
            RegionStatus::Correct => format!("Correct! It was {}. Next region coming...", name),
            RegionStatus::Failed => format!(
                "No tries left. The correct answer was {}. Moving on...",
                name
            ),
            RegionStatus::Timeout => format!("Time's up for {}. Moving on...", name),
            RegionStatus::Skipped => "Skipped. That region will come back later.".to_string(),
            RegionStatus::Revealed => format!("Revealed: {}. Moving on...", name),
            RegionStatus::Unresolved => String::new(),
        };

        self.tickets_issued += 1;
        let ticket = AdvanceTicket(self.tickets_issued);
        let delay = self.pacing.delay_after(status);
        self.stage = Stage::Intermission(ticket);

        info!(region = %id, %status, score = %self.score.summary(), "Round resolved");
        Transition::Resolved {
            region: id,
            status,
            ticket,
            delay,
        }
    }

    /// Runs the correct-guess hook and persists the region name.
    fn remember_correct(&mut self, index: usize) {
        let region = &self.map.regions()[index];

        if let Some(hook) = self.on_correct.as_mut() {
            hook(region);
        }

        if !self.progress.insert(region.display_name().clone()) {
            debug!(region = %region.id(), "Region already in saved progress");
            return;
        }

        if let Some(store) = self.store.as_mut()
            && let Err(e) = store.save(&self.progress)
        {
            warn!(error = %e, region = %region.id(), "Failed to save progress");
        }
    }

    /// Opens a round on a random candidate, or completes the session.
    fn select_next(&mut self) -> Transition {
        let candidates: Vec<usize> = self
            .statuses
            .iter()
            .enumerate()
            .filter(|(_, status)| status.is_candidate())
            .map(|(i, _)| i)
            .collect();

        if candidates.is_empty() {
            return self.complete();
        }

        let index = candidates[self.rng.gen_range(0..candidates.len())];
        let region = self.map.regions()[index].id().clone();
        let seconds = self.rules.round_seconds;
        let attempts = self.rules.attempts_per_round;

        let timer = self.timer.start(seconds);
        self.view.highlight(&region, Highlight::Active);
        self.message = format!(
            "A region is highlighted: you have {} tries and {} seconds.",
            attempts, seconds
        );
        self.stage = Stage::Round(RoundState::new(index, region.clone(), attempts, timer));

        debug!(region = %region, candidates = candidates.len(), "Round opened");
        Transition::RoundStarted {
            region,
            timer,
            seconds,
        }
    }

    fn complete(&mut self) -> Transition {
        self.timer.stop();
        let summary = self.score.summary();
        let tier = CompletionTier::classify(summary, self.rules.low_score_threshold);
        self.message = tier.message(summary);
        self.stage = Stage::Complete(tier);
        info!(%summary, %tier, "Session complete");
        Transition::Completed { summary, tier }
    }
}

// ─────────────────────────────────────────────────────────────
//  Read access
// ─────────────────────────────────────────────────────────────

impl<V> GameSession<V> {
    /// Current lifecycle phase.
    pub fn phase(&self) -> Phase {
        match self.stage {
            Stage::Idle => Phase::Idle,
            Stage::Round(_) => Phase::RoundActive,
            Stage::Intermission(_) => Phase::Intermission,
            Stage::Complete(tier) => Phase::Complete(tier),
            Stage::Abandoned => Phase::Abandoned,
        }
    }

    /// Status line, updated after every transition.
    pub fn message(&self) -> &str {
        &self.message
    }

    /// Current score.
    pub fn score(&self) -> ScoreSummary {
        self.score.summary()
    }

    /// Skip and reveal budgets.
    pub fn budget(&self) -> &SessionBudget {
        &self.budget
    }

    /// The round in progress, if any.
    pub fn round(&self) -> Option<&RoundState> {
        match &self.stage {
            Stage::Round(round) => Some(round),
            _ => None,
        }
    }

    /// The highlighted region, if a round is in progress.
    pub fn active_region(&self) -> Option<&Region> {
        self.round().map(|round| &self.map.regions()[round.index()])
    }

    /// Wrong guesses still allowed in the active round.
    pub fn attempts_left(&self) -> Option<u32> {
        self.round().map(RoundState::attempts_left)
    }

    /// Token of the running countdown.
    pub fn timer_token(&self) -> Option<TimerToken> {
        self.timer.token()
    }

    /// Ticket of the pending advance.
    pub fn pending_advance(&self) -> Option<AdvanceTicket> {
        match self.stage {
            Stage::Intermission(ticket) => Some(ticket),
            _ => None,
        }
    }

    /// Countdown as `MM:SS`.
    pub fn clock(&self) -> String {
        self.timer.display()
    }

    /// Seconds left in the round.
    pub fn remaining_seconds(&self) -> u32 {
        self.timer.remaining()
    }

    /// Status of a region in this session.
    pub fn status_of(&self, id: &RegionId) -> Option<RegionStatus> {
        self.map.position(id).map(|i| self.statuses[i])
    }

    /// Every region with its status, in map order.
    pub fn statuses(&self) -> impl Iterator<Item = (&Region, RegionStatus)> {
        self.map.regions().iter().zip(self.statuses.iter().copied())
    }

    /// Regions that can still be selected for a round, including the active one.
    pub fn candidates_remaining(&self) -> usize {
        self.statuses.iter().filter(|s| s.is_candidate()).count()
    }

    /// Names guessed correctly in this and earlier sessions.
    pub fn previously_guessed(&self) -> &PersistedProgress {
        &self.progress
    }

    /// The map being played.
    pub fn map(&self) -> &RegionMap {
        &self.map
    }

    /// Rules in force.
    pub fn rules(&self) -> &QuizRules {
        &self.rules
    }

    /// The map view.
    pub fn view(&self) -> &V {
        &self.view
    }

    /// The map view, mutably.
    pub fn view_mut(&mut self) -> &mut V {
        &mut self.view
    }
}

impl<V: fmt::Debug> fmt::Debug for GameSession<V> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("GameSession")
            .field("map", &self.map.id())
            .field("stage", &self.stage)
            .field("score", &self.score)
            .field("budget", &self.budget)
            .field("timer", &self.timer)
            .field("view", &self.view)
            .field("has_store", &self.store.is_some())
            .field("has_hook", &self.on_correct.is_some())
            .finish_non_exhaustive()
    }
}
