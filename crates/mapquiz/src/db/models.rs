//! Database models and domain types.

use chrono::NaiveDateTime;
use derive_getters::Getters;
use derive_new::new;
use diesel::prelude::*;
use mapquiz_core::{CompletionTier, ScoreSummary};
use serde::Serialize;
use tracing::instrument;

use crate::db::{DbError, DbErrorKind, schema};

/// User profile database model.
#[derive(Debug, Clone, Queryable, Identifiable, Selectable, Getters)]
#[diesel(table_name = schema::users)]
pub struct User {
    id: i32,
    display_name: String,
    created_at: NaiveDateTime,
    updated_at: NaiveDateTime,
}

/// Insertable user model for creating new users.
#[derive(Debug, Clone, Insertable, new)]
#[diesel(table_name = schema::users)]
pub struct NewUser {
    display_name: String,
}

/// A region a user has named correctly on a given map.
#[derive(Debug, Clone, Queryable, Identifiable, Associations, Selectable, Getters)]
#[diesel(table_name = schema::guessed_regions)]
#[diesel(belongs_to(User))]
pub struct GuessedRegion {
    id: i32,
    user_id: i32,
    map_id: String,
    region_name: String,
    guessed_at: NaiveDateTime,
}

/// Insertable guessed region.
#[derive(Debug, Clone, Insertable, new, Getters)]
#[diesel(table_name = schema::guessed_regions)]
pub struct NewGuessedRegion {
    user_id: i32,
    map_id: String,
    region_name: String,
}

/// One completed quiz session.
#[derive(Debug, Clone, Queryable, Identifiable, Associations, Selectable, Getters)]
#[diesel(table_name = schema::session_results)]
#[diesel(belongs_to(User))]
pub struct SessionResult {
    id: i32,
    user_id: i32,
    map_id: String,
    correct: i32,
    total: i32,
    tier: String,
    played_at: NaiveDateTime,
}

impl SessionResult {
    /// Parses the stored tier string into a [`CompletionTier`].
    ///
    /// # Errors
    ///
    /// Returns [`DbError`] if the string is not a known tier.
    #[instrument(skip(self), fields(tier = %self.tier))]
    pub fn parse_tier(&self) -> Result<CompletionTier, DbError> {
        CompletionTier::from_name(&self.tier).ok_or_else(|| {
            DbError::new(
                DbErrorKind::InvalidData,
                format!("Invalid tier: '{}'", self.tier),
            )
        })
    }

    /// Score as `correct/total`.
    pub fn summary(&self) -> ScoreSummary {
        ScoreSummary::new(self.correct.max(0) as u32, self.total.max(0) as u32)
    }
}

/// Insertable session result.
#[derive(Debug, Clone, Insertable, new, Getters)]
#[diesel(table_name = schema::session_results)]
pub struct NewSessionResult {
    user_id: i32,
    map_id: String,
    correct: i32,
    total: i32,
    tier: String,
}

/// Aggregated statistics for a user.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Getters)]
pub struct QuizStats {
    sessions_played: i32,
    perfect_runs: i32,
    best_correct: i32,
    best_total: i32,
    regions_guessed: i32,
}

impl QuizStats {
    /// Creates new aggregated statistics.
    #[instrument]
    pub fn new(
        sessions_played: i32,
        perfect_runs: i32,
        best_correct: i32,
        best_total: i32,
        regions_guessed: i32,
    ) -> Self {
        Self {
            sessions_played,
            perfect_runs,
            best_correct,
            best_total,
            regions_guessed,
        }
    }

    /// Best score as `correct/total`, or a dash before the first session.
    #[instrument(skip(self))]
    pub fn best_score(&self) -> String {
        if self.sessions_played == 0 {
            "-".to_string()
        } else {
            format!("{}/{}", self.best_correct, self.best_total)
        }
    }
}
