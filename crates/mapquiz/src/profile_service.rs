//! Profile management business logic layer.

use mapquiz_core::{CompletionTier, PersistedProgress, ScoreSummary};
use tracing::{debug, info, instrument};

use crate::{
    DbError, NewSessionResult, QuizRepository, QuizStats, SessionResult, SqliteProgressStore, User,
};

/// Service layer for user profile operations.
///
/// Wraps [`QuizRepository`] with get-or-create semantics, session recording
/// and per-map progress.
#[derive(Debug, Clone)]
pub struct ProfileService {
    repository: QuizRepository,
}

impl ProfileService {
    /// Creates a new profile service backed by the given repository.
    #[instrument(skip(repository))]
    pub fn new(repository: QuizRepository) -> Self {
        info!("Creating ProfileService");
        Self { repository }
    }

    /// Returns the underlying repository.
    #[instrument(skip(self))]
    pub fn repository(&self) -> &QuizRepository {
        &self.repository
    }

    /// Returns an existing user by name or creates one if not found.
    #[instrument(skip(self))]
    pub fn get_or_create_user(&self, display_name: String) -> Result<User, DbError> {
        debug!(display_name = %display_name, "Getting or creating user");

        if let Some(user) = self.repository.get_user_by_name(&display_name)? {
            info!(user_id = user.id(), "Existing user found");
            return Ok(user);
        }

        info!(display_name = %display_name, "Creating new user");
        self.repository.create_user(display_name)
    }

    /// Records a completed session for a user.
    #[instrument(skip(self))]
    pub fn record_session_result(
        &self,
        user_id: i32,
        map_id: &str,
        summary: ScoreSummary,
        tier: CompletionTier,
    ) -> Result<SessionResult, DbError> {
        debug!(user_id, map_id = %map_id, %summary, %tier, "Recording session result");

        let result = NewSessionResult::new(
            user_id,
            map_id.to_string(),
            summary.correct as i32,
            summary.total as i32,
            tier.to_string(),
        );

        let recorded = self.repository.record_session(result)?;
        info!(result_id = recorded.id(), "Session result recorded");
        Ok(recorded)
    }

    /// Returns aggregated stats for a user.
    #[instrument(skip(self))]
    pub fn get_stats(&self, user_id: i32) -> Result<QuizStats, DbError> {
        debug!(user_id, "Getting quiz stats");
        self.repository.get_quiz_stats(user_id)
    }

    /// Returns all session results for a user, most recent first.
    #[instrument(skip(self))]
    pub fn get_history(&self, user_id: i32) -> Result<Vec<SessionResult>, DbError> {
        debug!(user_id, "Getting session history");
        self.repository.get_session_results(user_id)
    }

    /// Returns the regions a user has guessed on a map.
    #[instrument(skip(self))]
    pub fn progress(&self, user_id: i32, map_id: &str) -> Result<PersistedProgress, DbError> {
        let progress: PersistedProgress = self
            .repository
            .get_guessed_regions(user_id, map_id)?
            .into_iter()
            .map(|region| region.region_name().clone())
            .collect();
        debug!(user_id, map_id = %map_id, count = progress.len(), "Progress loaded");
        Ok(progress)
    }

    /// Forgets a user's guessed regions on one map, or on all maps.
    #[instrument(skip(self))]
    pub fn reset_progress(&self, user_id: i32, map_id: Option<&str>) -> Result<usize, DbError> {
        info!(user_id, ?map_id, "Resetting progress");
        self.repository.clear_guessed_regions(user_id, map_id)
    }

    /// Returns a progress store bound to one user and map.
    #[instrument(skip(self, user), fields(user_id = user.id()))]
    pub fn progress_store(&self, user: &User, map_id: &str) -> SqliteProgressStore {
        SqliteProgressStore::new(self.repository.clone(), *user.id(), map_id.to_string())
    }
}
