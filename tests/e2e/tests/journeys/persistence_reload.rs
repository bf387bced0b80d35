//! Journey: state survives restarts and damaged blobs

use chrono::{Duration, TimeZone, Utc};
use serde_json::json;
use studyplan_core::{KeyValueStore, StudyMetric, TimeOfDay};
use studyplan_e2e_tests::{TestDataFactory, TestEngineManager};

#[test]
fn test_everything_reloads_after_restart() {
    let mut manager = TestEngineManager::new_temp();
    let now = Utc.with_ymd_and_hms(2025, 9, 1, 8, 0, 0).unwrap();
    let day = TestDataFactory::date(2025, 9, 1);

    manager.seed_reviews(&["vocab-1", "vocab-2"], &[true, true], now);
    manager.seed_metrics(TestDataFactory::morning_person("french", day));
    let before = manager.engine.predict_optimal_duration("french", 2.0).unwrap();

    manager.reopen();

    let state = manager.engine.review_state("vocab-1").unwrap().unwrap();
    assert_eq!(state.correct, 2);
    assert_eq!(state.interval, 16);
    assert_eq!(state.next_review, now + Duration::days(16));

    assert_eq!(manager.engine.metrics().unwrap().len(), 8);
    let after = manager.engine.predict_optimal_duration("french", 2.0).unwrap();
    assert!((before - after).abs() < 1e-12);
    assert_eq!(
        manager.engine.recommended_time_of_day().unwrap(),
        TimeOfDay::Morning
    );
}

#[test]
fn test_blobs_use_documented_keys_and_shapes() {
    let manager = TestEngineManager::new_temp();
    let now = Utc.with_ymd_and_hms(2025, 9, 1, 8, 0, 0).unwrap();
    let at = TestDataFactory::at(TestDataFactory::date(2025, 9, 1), 10);

    manager.engine.record_response("c1", false, Some(now)).unwrap();
    manager
        .engine
        .add_study_metric(StudyMetric::new("art", 2.0, 50.0, 50.0, at))
        .unwrap();

    let raw = manager.raw_store();
    assert_eq!(
        raw.keys().unwrap(),
        vec!["flashcard_history", "study_metrics", "subject_weights"]
    );

    let history = raw.load("flashcard_history").unwrap().unwrap();
    assert_eq!(history[0][0], json!("c1"));
    assert_eq!(history[0][1]["incorrect"], json!(1));
    assert!(history[0][1]["easeFactor"].is_number());
    assert!(history[0][1]["nextReview"].is_string());

    let metrics = raw.load("study_metrics").unwrap().unwrap();
    assert_eq!(metrics[0]["subjectId"], json!("art"));
    assert_eq!(metrics[0]["studyTime"], json!(2.0));

    let weights = raw.load("subject_weights").unwrap().unwrap();
    assert_eq!(weights, json!([["art", 2.0]]));
}

#[test]
fn test_damaged_blob_resets_only_that_component() {
    let mut manager = TestEngineManager::new_temp();
    let now = Utc.with_ymd_and_hms(2025, 9, 1, 8, 0, 0).unwrap();
    let day = TestDataFactory::date(2025, 9, 1);

    manager.seed_reviews(&["kept"], &[true], now);
    manager.seed_metrics(TestDataFactory::daily_metrics("geo", day, 2, 9, 1.0, 60.0));

    manager
        .raw_store()
        .save("study_metrics", &json!({"unexpected": true}))
        .unwrap();
    manager.reopen();

    assert!(manager.engine.metrics().unwrap().is_empty());
    assert!(manager.engine.review_state("kept").unwrap().is_some());
    // weights blob was intact, so learned durations survive
    assert!((manager.engine.predict_optimal_duration("geo", 2.0).unwrap() - 1.0).abs() < 1e-9);
}

#[test]
fn test_persist_rewrites_all_components() {
    let manager = TestEngineManager::new_temp();
    let now = Utc.with_ymd_and_hms(2025, 9, 1, 8, 0, 0).unwrap();
    manager.engine.record_response("c1", true, Some(now)).unwrap();

    let raw = manager.raw_store();
    raw.remove("flashcard_history").unwrap();
    assert!(raw.load("flashcard_history").unwrap().is_none());

    manager.engine.persist().unwrap();
    assert!(raw.load("flashcard_history").unwrap().is_some());
    assert!(raw.load("study_metrics").unwrap().is_some());
}
