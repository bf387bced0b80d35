//! Journey: review a deck over several weeks

use chrono::{DateTime, Duration, TimeZone, Utc};
use studyplan_core::Flashcard;
use studyplan_e2e_tests::{TestDataFactory, TestEngineManager};

fn t0() -> DateTime<Utc> {
    Utc.with_ymd_and_hms(2025, 4, 1, 19, 30, 0).unwrap()
}

fn ids<'a>(cards: &[&'a Flashcard]) -> Vec<&'a str> {
    cards.iter().map(|c| c.id.as_str()).collect()
}

#[test]
fn test_new_deck_is_entirely_due() {
    let manager = TestEngineManager::new_temp();
    let deck = TestDataFactory::flashcards("spanish", 5);

    let due = manager.engine.due_cards(&deck, t0()).unwrap();
    assert_eq!(due.len(), 5);
    assert_eq!(manager.engine.flashcard_difficulty(&deck[0].id).unwrap(), 0.5);
}

#[test]
fn test_review_cycle_spaces_out_cards() {
    let manager = TestEngineManager::new_temp();
    let deck = TestDataFactory::flashcards("spanish", 5);

    // Day 0: everything right
    for card in &deck {
        let state = manager.engine.record_response(&card.id, true, Some(t0())).unwrap();
        assert_eq!(state.interval, 6);
        assert!((state.ease_factor - 2.6).abs() < 1e-9);
        assert_eq!(state.next_review, t0() + Duration::days(6));
    }
    assert!(manager.engine.due_cards(&deck, t0()).unwrap().is_empty());
    assert!(manager
        .engine
        .due_cards(&deck, t0() + Duration::days(6) - Duration::seconds(1))
        .unwrap()
        .is_empty());

    // Day 6: first card slips, the rest graduate further
    let day6 = t0() + Duration::days(6);
    assert_eq!(manager.engine.due_cards(&deck, day6).unwrap().len(), 5);
    let slipped = manager.engine.record_response(&deck[0].id, false, Some(day6)).unwrap();
    assert_eq!(slipped.interval, 1);
    assert!((slipped.ease_factor - 2.4).abs() < 1e-9);

    for card in &deck[1..] {
        let state = manager.engine.record_response(&card.id, true, Some(day6)).unwrap();
        assert_eq!(state.interval, 16);
        assert!((state.ease_factor - 2.7).abs() < 1e-9);
    }

    // Day 7: only the slipped card is back
    let due = manager.engine.due_cards(&deck, day6 + Duration::days(1)).unwrap();
    assert_eq!(ids(&due), vec!["spanish-card-0"]);

    assert_eq!(manager.engine.flashcard_difficulty("spanish-card-0").unwrap(), 0.5);
    assert_eq!(manager.engine.flashcard_difficulty("spanish-card-3").unwrap(), 0.0);

    // Day 22: everything due again, still in deck order
    let due = manager.engine.due_cards(&deck, day6 + Duration::days(16)).unwrap();
    assert_eq!(
        ids(&due),
        vec![
            "spanish-card-0",
            "spanish-card-1",
            "spanish-card-2",
            "spanish-card-3",
            "spanish-card-4"
        ]
    );
}

#[test]
fn test_repeated_failures_floor_the_ease_factor() {
    let manager = TestEngineManager::new_temp();

    let mut last = None;
    for day in 0..10 {
        let now = t0() + Duration::days(day);
        last = Some(manager.engine.record_response("hard-card", false, Some(now)).unwrap());
    }

    let state = last.unwrap();
    assert_eq!(state.incorrect, 10);
    assert_eq!(state.interval, 1);
    assert!((state.ease_factor - 1.3).abs() < 1e-9);
    assert_eq!(manager.engine.flashcard_difficulty("hard-card").unwrap(), 1.0);
}

#[test]
fn test_deleted_cards_lose_their_history() {
    let manager = TestEngineManager::new_temp();
    let deck = TestDataFactory::flashcards("latin", 3);
    manager.seed_reviews(&["latin-card-0", "latin-card-1"], &[true], t0());

    assert_eq!(manager.engine.due_cards(&deck, t0()).unwrap().len(), 1);

    let forgotten = manager
        .engine
        .forget_cards(["latin-card-0", "latin-card-2"])
        .unwrap();
    assert_eq!(forgotten, 1);
    assert!(manager.engine.review_state("latin-card-0").unwrap().is_none());
    assert_eq!(manager.engine.due_cards(&deck, t0()).unwrap().len(), 2);
}
