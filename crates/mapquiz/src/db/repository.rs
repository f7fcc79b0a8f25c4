//! Database repository for profiles, guessed regions and session results.

use diesel::prelude::*;
use diesel_migrations::{EmbeddedMigrations, MigrationHarness, embed_migrations};
use tracing::{debug, info, instrument, warn};

use crate::db::{
    DbError, DbErrorKind, GuessedRegion, NewGuessedRegion, NewSessionResult, NewUser, QuizStats,
    SessionResult, User, schema,
};

/// Schema migrations compiled into the binary.
pub const MIGRATIONS: EmbeddedMigrations = embed_migrations!("migrations");

/// Database repository for quiz persistence.
///
/// Holds only the path; each call opens its own connection.
#[derive(Debug, Clone)]
pub struct QuizRepository {
    db_path: String,
}

impl QuizRepository {
    /// Creates a new repository connected to the database at the given path.
    ///
    /// # Errors
    ///
    /// Returns [`DbError`] if the path is empty.
    #[instrument(skip(db_path), fields(db_path = %db_path))]
    pub fn new(db_path: String) -> Result<Self, DbError> {
        if db_path.trim().is_empty() {
            return Err(DbError::new(DbErrorKind::Connection, "Database path is empty"));
        }
        info!(path = %db_path, "Creating QuizRepository");
        Ok(Self { db_path })
    }

    /// Path of the database file.
    pub fn db_path(&self) -> &str {
        &self.db_path
    }

    /// Establishes a database connection.
    #[instrument(skip(self))]
    fn connection(&self) -> Result<SqliteConnection, DbError> {
        debug!(path = %self.db_path, "Establishing connection");
        SqliteConnection::establish(&self.db_path).map_err(|e| {
            DbError::new(
                DbErrorKind::Connection,
                format!("Failed to connect to '{}': {}", self.db_path, e),
            )
        })
    }

    /// Applies any pending schema migrations. Creates the file if needed.
    ///
    /// # Errors
    ///
    /// Returns [`DbError`] if a migration fails.
    #[instrument(skip(self))]
    pub fn run_migrations(&self) -> Result<(), DbError> {
        let mut conn = self.connection()?;
        let applied = conn
            .run_pending_migrations(MIGRATIONS)
            .map_err(|e| {
                DbError::new(DbErrorKind::Migration, format!("Migration failed: {}", e))
            })?;
        info!(count = applied.len(), "Migrations applied");
        Ok(())
    }

    // ─────────────────────────────────────────────────────────
    //  Users
    // ─────────────────────────────────────────────────────────

    /// Creates a new user profile.
    ///
    /// # Errors
    ///
    /// Returns [`DbError`] if the display name is already taken or a database error occurs.
    #[instrument(skip(self))]
    pub fn create_user(&self, display_name: String) -> Result<User, DbError> {
        debug!(display_name = %display_name, "Creating user");
        let mut conn = self.connection()?;

        let new_user = NewUser::new(display_name);

        let user = diesel::insert_into(schema::users::table)
            .values(&new_user)
            .returning(User::as_returning())
            .get_result(&mut conn)?;

        info!(user_id = user.id(), display_name = %user.display_name(), "User created");
        Ok(user)
    }

    /// Gets a user by display name. Returns `None` if not found.
    ///
    /// # Errors
    ///
    /// Returns [`DbError`] if a database error occurs.
    #[instrument(skip(self))]
    pub fn get_user_by_name(&self, display_name: &str) -> Result<Option<User>, DbError> {
        debug!(display_name = %display_name, "Looking up user by name");
        let mut conn = self.connection()?;

        let user = schema::users::table
            .filter(schema::users::display_name.eq(display_name))
            .first::<User>(&mut conn)
            .optional()?;

        if let Some(ref u) = user {
            debug!(user_id = u.id(), "User found");
        } else {
            debug!("User not found");
        }

        Ok(user)
    }

    /// Lists all user profiles, ordered by creation time.
    ///
    /// # Errors
    ///
    /// Returns [`DbError`] if a database error occurs.
    #[instrument(skip(self))]
    pub fn list_users(&self) -> Result<Vec<User>, DbError> {
        debug!("Listing all users");
        let mut conn = self.connection()?;

        let users = schema::users::table
            .order((schema::users::created_at.asc(), schema::users::id.asc()))
            .load::<User>(&mut conn)?;

        info!(count = users.len(), "Users loaded");
        Ok(users)
    }

    // ─────────────────────────────────────────────────────────
    //  Guessed regions
    // ─────────────────────────────────────────────────────────

    /// Adds region names to a user's progress on a map. Names already present
    /// are left alone. Returns how many rows were inserted.
    ///
    /// # Errors
    ///
    /// Returns [`DbError`] if a database error occurs. Nothing is written then.
    #[instrument(skip(self, names), fields(count = names.len()))]
    pub fn add_guessed_regions(
        &self,
        user_id: i32,
        map_id: &str,
        names: &[String],
    ) -> Result<usize, DbError> {
        debug!(user_id, map_id = %map_id, "Adding guessed regions");
        let mut conn = self.connection()?;

        let inserted = conn.transaction::<_, diesel::result::Error, _>(|conn| {
            let mut inserted = 0;
            for name in names {
                let row = NewGuessedRegion::new(user_id, map_id.to_string(), name.clone());
                inserted += diesel::insert_or_ignore_into(schema::guessed_regions::table)
                    .values(&row)
                    .execute(conn)?;
            }
            Ok(inserted)
        })?;

        info!(user_id, map_id = %map_id, inserted, "Guessed regions saved");
        Ok(inserted)
    }

    /// Gets the guessed regions of a user on a map, oldest first.
    ///
    /// # Errors
    ///
    /// Returns [`DbError`] if a database error occurs.
    #[instrument(skip(self))]
    pub fn get_guessed_regions(
        &self,
        user_id: i32,
        map_id: &str,
    ) -> Result<Vec<GuessedRegion>, DbError> {
        debug!(user_id, map_id = %map_id, "Loading guessed regions");
        let mut conn = self.connection()?;

        let regions = schema::guessed_regions::table
            .filter(schema::guessed_regions::user_id.eq(user_id))
            .filter(schema::guessed_regions::map_id.eq(map_id))
            .order(schema::guessed_regions::id.asc())
            .load::<GuessedRegion>(&mut conn)?;

        debug!(count = regions.len(), "Guessed regions loaded");
        Ok(regions)
    }

    /// Deletes a user's guessed regions, on one map or on all of them.
    /// Returns how many rows were removed.
    ///
    /// # Errors
    ///
    /// Returns [`DbError`] if a database error occurs.
    #[instrument(skip(self))]
    pub fn clear_guessed_regions(
        &self,
        user_id: i32,
        map_id: Option<&str>,
    ) -> Result<usize, DbError> {
        let mut conn = self.connection()?;

        let removed = match map_id {
            Some(map_id) => diesel::delete(
                schema::guessed_regions::table
                    .filter(schema::guessed_regions::user_id.eq(user_id))
                    .filter(schema::guessed_regions::map_id.eq(map_id)),
            )
            .execute(&mut conn)?,
            None => diesel::delete(
                schema::guessed_regions::table.filter(schema::guessed_regions::user_id.eq(user_id)),
            )
            .execute(&mut conn)?,
        };

        info!(user_id, ?map_id, removed, "Guessed regions cleared");
        Ok(removed)
    }

    // ─────────────────────────────────────────────────────────
    //  Session results
    // ─────────────────────────────────────────────────────────

    /// Records a completed session.
    ///
    /// # Errors
    ///
    /// Returns [`DbError`] if a database error occurs.
    #[instrument(skip(self, result), fields(user_id = result.user_id(), map_id = %result.map_id(), tier = %result.tier()))]
    pub fn record_session(&self, result: NewSessionResult) -> Result<SessionResult, DbError> {
        debug!("Recording session result");
        let mut conn = self.connection()?;

        let recorded = diesel::insert_into(schema::session_results::table)
            .values(&result)
            .returning(SessionResult::as_returning())
            .get_result(&mut conn)?;

        info!(
            result_id = recorded.id(),
            correct = recorded.correct(),
            total = recorded.total(),
            "Session result recorded"
        );
        Ok(recorded)
    }

    /// Gets all session results for a user, most recent first.
    ///
    /// # Errors
    ///
    /// Returns [`DbError`] if a database error occurs.
    #[instrument(skip(self))]
    pub fn get_session_results(&self, user_id: i32) -> Result<Vec<SessionResult>, DbError> {
        debug!(user_id, "Loading session results");
        let mut conn = self.connection()?;

        let results = schema::session_results::table
            .filter(schema::session_results::user_id.eq(user_id))
            .order((
                schema::session_results::played_at.desc(),
                schema::session_results::id.desc(),
            ))
            .load::<SessionResult>(&mut conn)?;

        info!(user_id, count = results.len(), "Session results loaded");
        Ok(results)
    }

    /// Computes aggregated statistics for a user across all maps.
    ///
    /// # Errors
    ///
    /// Returns [`DbError`] if a database error occurs.
    #[instrument(skip(self))]
    pub fn get_quiz_stats(&self, user_id: i32) -> Result<QuizStats, DbError> {
        debug!(user_id, "Computing quiz stats");
        let results = self.get_session_results(user_id)?;
        let mut conn = self.connection()?;

        let regions_guessed: i64 = schema::guessed_regions::table
            .filter(schema::guessed_regions::user_id.eq(user_id))
            .count()
            .get_result(&mut conn)?;

        let mut perfect_runs = 0;
        for result in &results {
            match result.parse_tier() {
                Ok(mapquiz_core::CompletionTier::Perfect) => perfect_runs += 1,
                Ok(_) => {}
                Err(e) => warn!(error = %e, result_id = result.id(), "Unknown tier value"),
            }
        }

        let (best_correct, best_total) = results
            .iter()
            .max_by_key(|r| (*r.correct(), -*r.total()))
            .map(|r| (*r.correct(), *r.total()))
            .unwrap_or((0, 0));

        let stats = QuizStats::new(
            results.len() as i32,
            perfect_runs,
            best_correct,
            best_total,
            regions_guessed as i32,
        );

        info!(
            user_id,
            sessions = results.len(),
            perfect_runs,
            best = %stats.best_score(),
            regions_guessed,
            "Quiz stats computed"
        );
        Ok(stats)
    }
}
