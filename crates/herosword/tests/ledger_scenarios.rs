//! Ledger-mode sessions against the in-process chain.

use std::sync::Arc;

use herosword::{EngineError, LedgerEngine, SwordEngine};
use herosword_blockchain::{HeroSword, LedgerError, MoveFunction, SimulatedChain, SwordLedger};
use herosword_economy::{
    EconomyError, ExecutionMode, FixedRoll, InMemoryCollectionStore, LedgerSettings, Network,
    Outcome, ScriptedRoll, TypeClass,
};
use herosword_shared::constants::TESTNET_PACKAGE_ID;
use herosword_shared::{Mist, ObjectId, SessionEvent, SwordId};

const FUNDS: Mist = Mist::new(2_000_000_000);

#[tokio::test]
async fn test_full_run_matches_chain_state() {
    let chain = Arc::new(
        SimulatedChain::new(TESTNET_PACKAGE_ID, FUNDS).with_roll(ScriptedRoll::new([0, 0, 0, 99])),
    );
    let store = InMemoryCollectionStore::new();
    let (mut engine, session) =
        LedgerEngine::connect(chain.clone(), store.clone(), &LedgerSettings::default())
            .await
            .unwrap();
    assert_eq!(engine.mode(), ExecutionMode::Ledger);

    let mut session = engine.mint_base(&session).await.unwrap().session;
    let id = session.active().unwrap().id();

    for _ in 0..3 {
        session = engine.enhance(&session).await.unwrap().session;
    }
    assert_eq!(session.active().unwrap().tier(), 2);
    session = engine.save_to_collection(&session).await.unwrap().session;
    assert!(chain.is_persistent(id.object().unwrap()));
    assert_eq!(store.snapshot().len(), 1);

    let step = engine.enhance(&session).await.unwrap();
    assert_eq!(step.outcome, Some(Outcome::Failure));
    assert!(step.events.contains(&SessionEvent::Removed { id }));
    assert!(store.snapshot().is_empty());
    assert_eq!(step.session.balance().amount(), chain.balance());
    assert_eq!(
        FUNDS.checked_sub(chain.balance()),
        Some(Mist::new(4_000_000))
    );

    let functions: Vec<MoveFunction> = chain.executed().iter().map(|call| call.function).collect();
    assert_eq!(
        functions,
        vec![
            MoveFunction::MintSword,
            MoveFunction::EnhanceSword,
            MoveFunction::EnhanceSword,
            MoveFunction::EnhanceSword,
            MoveFunction::SaveSwordAsNft,
            MoveFunction::EnhanceSword,
        ]
    );
}

#[tokio::test]
async fn test_deposited_sword_is_active_on_connect() {
    let chain = SimulatedChain::new(TESTNET_PACKAGE_ID, FUNDS).with_roll(FixedRoll::SUCCESS);
    let object = ObjectId::repeat_byte(0x42);
    chain.deposit(&HeroSword {
        id: object,
        tier: 5,
        chain_type: TypeClass(1),
        attack_power: 40,
        magic_power: 30,
        enhancement_count: 2,
        success_rate: 60,
        value: Mist::new(100_000_000),
    });

    let (mut engine, session) =
        LedgerEngine::connect(&chain, InMemoryCollectionStore::new(), &LedgerSettings::default())
            .await
            .unwrap();
    let sword = session.active().unwrap();
    assert_eq!(sword.id(), SwordId::Object(object));
    assert_eq!(sword.display_name(), "steel blade");

    let step = engine.sell(&session).await.unwrap();
    assert_eq!(
        step.session.balance().amount(),
        FUNDS.checked_add(Mist::new(100_000_000)).unwrap()
    );
    assert!(step.session.active().is_none());
    assert!(chain.fetch_owned_swords().await.unwrap().is_empty());
}

#[tokio::test]
async fn test_mainnet_without_override_is_refused() {
    let chain = SimulatedChain::new(TESTNET_PACKAGE_ID, FUNDS);
    let settings = LedgerSettings {
        network: Network::Mainnet,
        ..LedgerSettings::default()
    };
    let result = LedgerEngine::connect(chain, InMemoryCollectionStore::new(), &settings).await;
    assert!(matches!(
        result,
        Err(EngineError::Economy(EconomyError::InvalidConfig(_)))
    ));
}

#[tokio::test]
async fn test_rejected_sell_leaves_everything_in_place() {
    let chain = Arc::new(SimulatedChain::new(TESTNET_PACKAGE_ID, FUNDS));
    let (mut engine, session) =
        LedgerEngine::connect(chain.clone(), InMemoryCollectionStore::new(), &LedgerSettings::default())
            .await
            .unwrap();
    let session = engine.mint_base(&session).await.unwrap().session;
    let session = engine.save_to_collection(&session).await.unwrap().session;

    chain.reject_next(MoveFunction::SellSword, "ENotOwner");
    let err = engine.sell(&session).await.unwrap_err();
    assert!(matches!(
        err,
        EngineError::RemoteCallFailed {
            operation: "sell",
            source: LedgerError::CallRejected { ref reason, .. },
        } if reason == "ENotOwner"
    ));
    assert_eq!(chain.balance(), FUNDS);
    assert_eq!(chain.fetch_owned_swords().await.unwrap().len(), 1);
    assert_eq!(session.collection().len(), 1);
}
