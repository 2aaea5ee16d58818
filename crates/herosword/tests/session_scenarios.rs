//! End-to-end sessions in simulated mode.

use herosword::{EngineError, Session, SimulatedEngine, SwordEngine};
use herosword_economy::{
    EconomyError, EngineConfig, FixedRoll, InMemoryCollectionStore, Outcome, ScriptedRoll,
    TomlCollectionFile,
};
use herosword_shared::{Mist, SessionEvent, SwordId};

fn start_scripted(
    rolls: impl IntoIterator<Item = u8>,
    store: InMemoryCollectionStore,
) -> (SimulatedEngine<InMemoryCollectionStore, ScriptedRoll>, Session) {
    SimulatedEngine::start_with_roll(&EngineConfig::default(), store, ScriptedRoll::new(rolls))
        .unwrap()
}

#[tokio::test]
async fn test_three_successes_evolve_to_knife() {
    let (mut engine, mut session) = start_scripted([0], InMemoryCollectionStore::new());
    let start = session.balance().amount();

    let mut outcomes = Vec::new();
    for _ in 0..3 {
        let step = engine.enhance(&session).await.unwrap();
        outcomes.push(step.outcome.unwrap());
        session = step.session;
    }

    assert_eq!(
        outcomes,
        vec![
            Outcome::Success { evolved: false },
            Outcome::Success { evolved: false },
            Outcome::Success { evolved: true },
        ]
    );
    let sword = session.active().unwrap();
    assert_eq!(sword.tier(), 2);
    assert_eq!(sword.enhancement_count(), 0);
    assert_eq!(sword.success_rate(), 90);
    assert_eq!(sword.attack_power(), 13);
    assert_eq!(sword.magic_power(), 8);
    assert_eq!(sword.display_name(), "knife");
    assert_eq!(sword.value(), Mist::new(1_001_500_000));
    assert_eq!(
        start.checked_sub(session.balance().amount()),
        Some(Mist::new(3_000_000))
    );
}

#[tokio::test]
async fn test_failed_roll_replaces_sword_and_charges_fee() {
    let (mut engine, session) = start_scripted([99], InMemoryCollectionStore::new());
    let old = session.active().unwrap().id();

    let step = engine.enhance(&session).await.unwrap();
    assert_eq!(step.outcome, Some(Outcome::Failure));

    let replacement = step.session.active().unwrap();
    assert_ne!(replacement.id(), old);
    assert_eq!(replacement.tier(), 1);
    assert_eq!(replacement.enhancement_count(), 0);
    assert_eq!(
        session.balance().amount().checked_sub(step.session.balance().amount()),
        Some(Mist::new(1_000_000))
    );
    assert_eq!(
        step.events,
        vec![
            SessionEvent::Destroyed {
                id: old,
                cost: Mist::new(1_000_000),
            },
            SessionEvent::Minted {
                id: replacement.id(),
            },
        ]
    );
}

#[tokio::test]
async fn test_failure_removes_saved_snapshot() {
    let store = InMemoryCollectionStore::new();
    let (mut engine, session) = start_scripted([0, 99], store.clone());

    let session = engine.save_to_collection(&session).await.unwrap().session;
    let saved_id = session.active().unwrap().id();

    // The first roll succeeds; the snapshot keeps the pre-enhancement stats.
    let session = engine.enhance(&session).await.unwrap().session;
    assert_eq!(
        session.collection().latest(saved_id).unwrap().enhancement_count(),
        0
    );

    let step = engine.enhance(&session).await.unwrap();
    assert_eq!(step.outcome, Some(Outcome::Failure));
    assert!(step.session.collection().is_empty());
    assert!(store.snapshot().is_empty());
}

#[tokio::test]
async fn test_resave_after_evolution_keeps_both_snapshots() {
    let store = InMemoryCollectionStore::new();
    let (mut engine, mut session) = start_scripted([0, 0, 0, 99], store.clone());
    let id = session.active().unwrap().id();

    session = engine.save_to_collection(&session).await.unwrap().session;
    for _ in 0..3 {
        session = engine.enhance(&session).await.unwrap().session;
    }
    assert_eq!(session.active().unwrap().tier(), 2);

    let step = engine.save_to_collection(&session).await.unwrap();
    assert_eq!(step.events, vec![SessionEvent::Saved { id }]);
    session = step.session;
    assert_eq!(session.collection().len(), 2);
    assert_eq!(session.collection().latest(id), session.active());
    assert_eq!(session.collection().latest(id).unwrap().tier(), 2);
    assert_eq!(store.snapshot().len(), 2);

    let step = engine.enhance(&session).await.unwrap();
    assert_eq!(step.outcome, Some(Outcome::Failure));
    assert_eq!(step.events[1], SessionEvent::Removed { id });
    assert!(store.snapshot().is_empty());
}

#[tokio::test]
async fn test_sell_credits_value_and_mints_replacement() {
    let config = EngineConfig {
        starting_balance: Mist::new(5_000_000),
        ..EngineConfig::default()
    };
    let (mut engine, session) = SimulatedEngine::start_with_roll(
        &config,
        InMemoryCollectionStore::new(),
        FixedRoll::SUCCESS,
    )
    .unwrap();
    let sold = *session.active().unwrap();

    let step = engine.sell(&session).await.unwrap();
    assert_eq!(
        step.session.balance().amount(),
        Mist::new(5_000_000).checked_add(sold.value()).unwrap()
    );
    assert_ne!(step.session.active().unwrap().id(), sold.id());
    assert_eq!(
        step.events[0],
        SessionEvent::Sold {
            id: sold.id(),
            earned: Mist::new(1_000_000_000),
        }
    );
}

#[tokio::test]
async fn test_save_and_remove_round_trip() {
    let store = InMemoryCollectionStore::new();
    let (mut engine, session) = start_scripted([0], store.clone());
    let id = session.active().unwrap().id();

    let saved = engine.save_to_collection(&session).await.unwrap();
    assert_eq!(saved.events, vec![SessionEvent::Saved { id }]);
    assert_eq!(store.snapshot().len(), 1);

    let again = engine.save_to_collection(&saved.session).await.unwrap();
    assert!(again.events.is_empty());
    assert_eq!(again.session.collection().len(), 1);

    let removed = engine
        .remove_from_collection(&again.session, id)
        .await
        .unwrap();
    assert_eq!(removed.events, vec![SessionEvent::Removed { id }]);
    assert!(store.snapshot().is_empty());

    let absent = engine
        .remove_from_collection(&removed.session, SwordId::Local(999))
        .await
        .unwrap();
    assert!(absent.events.is_empty());
    assert_eq!(store.save_count(), 2);
}

#[tokio::test]
async fn test_broke_player_cannot_enhance() {
    let config = EngineConfig {
        starting_balance: Mist::new(999_999),
        ..EngineConfig::default()
    };
    let (mut engine, session) = SimulatedEngine::start_with_roll(
        &config,
        InMemoryCollectionStore::new(),
        FixedRoll::SUCCESS,
    )
    .unwrap();

    assert!(!session.summary().can_afford_next);
    let err = engine.enhance(&session).await.unwrap_err();
    assert_eq!(
        err,
        EngineError::Economy(EconomyError::InsufficientFunds {
            required: Mist::new(1_000_000),
            available: Mist::new(999_999),
        })
    );
}

#[tokio::test]
async fn test_collection_file_survives_restart() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("saves").join("collection.toml");

    let evolved = {
        let (mut engine, mut session) = SimulatedEngine::start_with_roll(
            &EngineConfig::default(),
            TomlCollectionFile::new(&path),
            FixedRoll::SUCCESS,
        )
        .unwrap();
        for _ in 0..3 {
            session = engine.enhance(&session).await.unwrap().session;
        }
        session = engine.save_to_collection(&session).await.unwrap().session;
        *session.active().unwrap()
    };
    assert!(path.exists());

    let (_, resumed) = SimulatedEngine::start_with_roll(
        &EngineConfig::default(),
        TomlCollectionFile::new(&path),
        FixedRoll::SUCCESS,
    )
    .unwrap();
    assert_eq!(resumed.collection().latest(evolved.id()), Some(&evolved));
    assert_ne!(resumed.active().unwrap().id(), evolved.id());
}

#[tokio::test]
async fn test_seeded_sessions_replay() {
    let config = EngineConfig {
        seed: Some(7),
        ..EngineConfig::default()
    };

    let mut runs = Vec::new();
    for _ in 0..2 {
        let (mut engine, mut session) =
            SimulatedEngine::start(&config, InMemoryCollectionStore::new()).unwrap();
        let mut outcomes = Vec::new();
        for _ in 0..12 {
            let step = engine.enhance(&session).await.unwrap();
            outcomes.push(step.outcome);
            session = step.session;
        }
        runs.push((outcomes, session.active().copied()));
    }
    assert_eq!(runs[0], runs[1]);
}
