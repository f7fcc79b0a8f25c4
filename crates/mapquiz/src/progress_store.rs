//! SQLite-backed [`ProgressStore`].

use derive_getters::Getters;
use mapquiz_core::{PersistedProgress, ProgressStore, StoreError};
use tracing::{debug, instrument};

use crate::QuizRepository;

/// Keeps one user's guessed regions for one map in the quiz database.
///
/// Saving merges into what is stored; nothing is ever removed by a save.
#[derive(Debug, Clone, Getters)]
pub struct SqliteProgressStore {
    #[getter(skip)]
    repository: QuizRepository,
    user_id: i32,
    map_id: String,
}

impl SqliteProgressStore {
    /// Creates a store for `user_id` on `map_id`.
    #[instrument(skip(repository))]
    pub fn new(repository: QuizRepository, user_id: i32, map_id: String) -> Self {
        Self {
            repository,
            user_id,
            map_id,
        }
    }
}

impl ProgressStore for SqliteProgressStore {
    #[instrument(skip(self), fields(user_id = self.user_id, map_id = %self.map_id))]
    fn load(&mut self) -> Result<PersistedProgress, StoreError> {
        let progress: PersistedProgress = self
            .repository
            .get_guessed_regions(self.user_id, &self.map_id)?
            .into_iter()
            .map(|region| region.region_name().clone())
            .collect();
        debug!(count = progress.len(), "Progress loaded");
        Ok(progress)
    }

    #[instrument(skip(self, progress), fields(user_id = self.user_id, map_id = %self.map_id, count = progress.len()))]
    fn save(&mut self, progress: &PersistedProgress) -> Result<(), StoreError> {
        let names: Vec<String> = progress.iter().map(str::to_string).collect();
        let inserted = self
            .repository
            .add_guessed_regions(self.user_id, &self.map_id, &names)?;
        debug!(inserted, "Progress saved");
        Ok(())
    }
}
