//! Journey: study history shapes later plans

use chrono::Duration;
use studyplan_core::{EngineConfig, PlanRequest, StudyEngine, TimeOfDay};
use studyplan_e2e_tests::{TestDataFactory, TestEngineManager};

#[test]
fn test_best_time_needs_enough_history() {
    let manager = TestEngineManager::new_temp();
    let day = TestDataFactory::date(2025, 5, 5);

    manager.seed_metrics(TestDataFactory::daily_metrics("math", day, 4, 8, 1.0, 95.0));
    assert_eq!(
        manager.engine.recommended_time_of_day().unwrap(),
        TimeOfDay::Distributed
    );

    manager.seed_metrics(TestDataFactory::daily_metrics("math", day, 1, 8, 1.0, 95.0));
    assert_eq!(
        manager.engine.recommended_time_of_day().unwrap(),
        TimeOfDay::Morning
    );
}

#[test]
fn test_morning_person_is_recommended_mornings() {
    let manager = TestEngineManager::new_temp();
    let day = TestDataFactory::date(2025, 5, 5);
    let metrics = TestDataFactory::morning_person("math", day);

    assert_eq!(
        manager.engine.predict_best_time_of_day(&metrics).unwrap(),
        TimeOfDay::Morning
    );

    manager.seed_metrics(metrics);
    assert_eq!(
        manager.engine.recommended_time_of_day().unwrap(),
        TimeOfDay::Morning
    );
}

#[test]
fn test_even_performance_stays_distributed() {
    let engine = StudyEngine::in_memory();
    let day = TestDataFactory::date(2025, 5, 5);
    let mut metrics = TestDataFactory::daily_metrics("math", day, 2, 9, 1.0, 80.0);
    metrics.extend(TestDataFactory::daily_metrics("math", day, 2, 14, 1.0, 84.0));
    metrics.extend(TestDataFactory::daily_metrics("math", day, 2, 21, 1.0, 78.0));

    assert_eq!(
        engine.predict_best_time_of_day(&metrics).unwrap(),
        TimeOfDay::Distributed
    );
}

#[test]
fn test_adaptive_schedule_favours_subjects_needing_more_time() {
    let manager = TestEngineManager::new_temp();
    let start = TestDataFactory::date(2025, 6, 2);
    let exam = start + Duration::days(30);
    let request = PlanRequest::new(start, start + Duration::days(10), 2.0, TimeOfDay::Evening);

    // Same difficulty, but essays have taken 4h sessions historically
    manager.seed_metrics(TestDataFactory::daily_metrics("essays", start - Duration::days(7), 3, 19, 4.0, 90.0));
    let mut subjects = vec![
        TestDataFactory::subject("essays", exam, 3),
        TestDataFactory::subject("grammar", exam, 3),
    ];

    let schedule = manager
        .engine
        .generate_adaptive_schedule(&mut subjects, &request)
        .unwrap();

    // essays 3.25h predicted vs grammar 1.5h, over a 20h budget
    assert_eq!(subjects[0].time_to_spend, Some(14.0));
    assert_eq!(subjects[1].time_to_spend, Some(6.0));

    let essays: f64 = schedule.iter().filter(|e| e.subject_id == "essays").map(|e| e.duration).sum();
    let grammar: f64 = schedule.iter().filter(|e| e.subject_id == "grammar").map(|e| e.duration).sum();
    assert!(essays > grammar);

    // The plain split ignores history
    let mut plain = subjects.clone();
    manager.engine.generate_schedule(&mut plain, &request).unwrap();
    assert_eq!(plain[0].time_to_spend, Some(10.0));
    assert_eq!(plain[1].time_to_spend, Some(10.0));
}

#[test]
fn test_custom_optimizer_config_is_honoured() {
    let mut config = EngineConfig::default();
    config.optimizer.min_metrics_for_time_of_day = 2;
    config.optimizer.history_weight = 1.0;
    let manager = TestEngineManager::with_config(config);
    let day = TestDataFactory::date(2025, 5, 5);

    manager.seed_metrics(TestDataFactory::daily_metrics("chem", day, 2, 15, 2.5, 70.0));

    assert_eq!(
        manager.engine.recommended_time_of_day().unwrap(),
        TimeOfDay::Afternoon
    );
    let predicted = manager.engine.predict_optimal_duration("chem", 5.0).unwrap();
    assert!((predicted - 2.5).abs() < 1e-9);
}
