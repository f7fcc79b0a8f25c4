//! Tests for the profile service and the SQLite progress store.

use mapquiz::{ProfileService, QuizRepository, SqliteProgressStore};
use mapquiz_core::{
    CompletionTier, GameSession, NullView, Pacing, PersistedProgress, Phase, ProgressStore,
    Region, RegionMap, ScoreSummary, Transition,
};
use tempfile::NamedTempFile;

fn setup_test_db() -> (NamedTempFile, ProfileService) {
    let db_file = NamedTempFile::new().expect("Failed to create temp file");
    let db_path = db_file.path().to_str().expect("Invalid path").to_string();

    let repo = QuizRepository::new(db_path).expect("Failed to create repository");
    repo.run_migrations().expect("Migrations failed");
    (db_file, ProfileService::new(repo))
}

fn two_region_map() -> RegionMap {
    RegionMap::new(
        "pair",
        "Pair",
        vec![Region::new("kano", "Kano"), Region::new("kogi", "Kogi")],
    )
    .expect("Valid map")
}

#[test]
fn test_get_or_create_user_reuses_existing() {
    let (_db, service) = setup_test_db();
    let first = service
        .get_or_create_user("Ngozi".to_string())
        .expect("Create failed");
    let second = service
        .get_or_create_user("Ngozi".to_string())
        .expect("Lookup failed");
    assert_eq!(first.id(), second.id());
    assert_eq!(service.repository().list_users().expect("List failed").len(), 1);
}

#[test]
fn test_record_session_result_feeds_stats_and_history() {
    let (_db, service) = setup_test_db();
    let user = service
        .get_or_create_user("Obi".to_string())
        .expect("Create failed");

    service
        .record_session_result(
            *user.id(),
            "nigeria",
            ScoreSummary::new(36, 36),
            CompletionTier::Perfect,
        )
        .expect("Record failed");
    service
        .record_session_result(
            *user.id(),
            "nigeria",
            ScoreSummary::new(3, 36),
            CompletionTier::Low,
        )
        .expect("Record failed");

    let stats = service.get_stats(*user.id()).expect("Stats failed");
    assert_eq!(*stats.sessions_played(), 2);
    assert_eq!(*stats.perfect_runs(), 1);
    assert_eq!(stats.best_score(), "36/36");

    let history = service.get_history(*user.id()).expect("History failed");
    assert_eq!(history.len(), 2);
    assert_eq!(history[0].tier(), "low");
}

#[test]
fn test_progress_and_reset() {
    let (_db, service) = setup_test_db();
    let user = service
        .get_or_create_user("Pelumi".to_string())
        .expect("Create failed");
    service
        .repository()
        .add_guessed_regions(*user.id(), "nigeria", &["Lagos".to_string()])
        .expect("Insert failed");

    let progress = service.progress(*user.id(), "nigeria").expect("Load failed");
    assert!(progress.contains("Lagos"));

    let removed = service
        .reset_progress(*user.id(), Some("nigeria"))
        .expect("Reset failed");
    assert_eq!(removed, 1);
    assert!(
        service
            .progress(*user.id(), "nigeria")
            .expect("Load failed")
            .is_empty()
    );
}

#[test]
fn test_progress_store_merges_on_save() {
    let (_db, service) = setup_test_db();
    let user = service
        .get_or_create_user("Rukky".to_string())
        .expect("Create failed");
    let mut store = service.progress_store(&user, "nigeria");
    assert_eq!(store.map_id(), "nigeria");

    let first: PersistedProgress = ["Lagos", "Kano"].into_iter().collect();
    store.save(&first).expect("Save failed");

    // A save never removes names that are already stored.
    let second: PersistedProgress = ["Oyo"].into_iter().collect();
    store.save(&second).expect("Save failed");

    let loaded = store.load().expect("Load failed");
    assert_eq!(loaded.len(), 3);
    assert!(loaded.contains("Lagos") && loaded.contains("Oyo"));
}

#[test]
fn test_progress_store_is_scoped_to_its_map() {
    let (_db, service) = setup_test_db();
    let user = service
        .get_or_create_user("Seun".to_string())
        .expect("Create failed");

    let mut nigeria = SqliteProgressStore::new(
        service.repository().clone(),
        *user.id(),
        "nigeria".to_string(),
    );
    let mut ghana = service.progress_store(&user, "ghana");

    nigeria
        .save(&["Lagos"].into_iter().collect())
        .expect("Save failed");
    assert!(ghana.load().expect("Load failed").is_empty());
}

#[test]
fn test_session_saves_correct_guess_to_database() {
    let (_db, service) = setup_test_db();
    let user = service
        .get_or_create_user("Tobi".to_string())
        .expect("Create failed");

    let mut session = GameSession::builder(two_region_map(), NullView)
        .pacing(Pacing::immediate())
        .seed(3)
        .progress_store(service.progress_store(&user, "pair"))
        .build();

    let mut transition = session.start().expect("Start failed");
    while let Transition::RoundStarted { .. } = transition {
        let name = session
            .active_region()
            .expect("A round should be active")
            .display_name()
            .clone();
        let resolved = session.submit_guess(&name).expect("Guess failed");
        let Transition::Resolved { ticket, .. } = resolved else {
            panic!("Expected a resolution, got {:?}", resolved);
        };
        transition = session.advance(ticket);
    }

    assert_eq!(session.phase(), Phase::Complete(CompletionTier::Perfect));
    let stored = service.progress(*user.id(), "pair").expect("Load failed");
    assert!(stored.contains("Kano") && stored.contains("Kogi"));
}

#[test]
fn test_session_shows_database_progress_before_start() {
    let (_db, service) = setup_test_db();
    let user = service
        .get_or_create_user("Uche".to_string())
        .expect("Create failed");
    service
        .repository()
        .add_guessed_regions(*user.id(), "pair", &["Kogi".to_string()])
        .expect("Insert failed");

    let session = GameSession::builder(two_region_map(), NullView)
        .progress_store(service.progress_store(&user, "pair"))
        .build();
    assert!(session.previously_guessed().contains("Kogi"));
    assert_eq!(session.phase(), Phase::Idle);
}
