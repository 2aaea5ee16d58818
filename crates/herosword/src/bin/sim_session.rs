//! # Headless Session
//!
//! Runs a sword session from a config file and prints what happens.
//!
//! ```text
//! sim_session [CONFIG] [ATTEMPTS]
//! ```
//!
//! Enhances the active sword until the balance runs out or `ATTEMPTS` is
//! reached, saving every sword that evolves. In ledger mode the calls go to
//! an in-process chain. Set `RUST_LOG` for engine logs.

use std::process::ExitCode;

use herosword::{EngineResult, LedgerEngine, Session, SimulatedEngine, SwordEngine};
use herosword_blockchain::SimulatedChain;
use herosword_economy::{
    CollectionStore, EngineConfig, ExecutionMode, InMemoryCollectionStore, SeededRoll,
    TomlCollectionFile,
};
use herosword_shared::SessionEvent;
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

const DEFAULT_ATTEMPTS: u32 = 20;

fn init_tracing() {
    let env_filter = EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new("info"))
        .unwrap_or_else(|_| EnvFilter::new("warn"));

    tracing_subscriber::registry()
        .with(fmt::layer().with_target(false))
        .with(env_filter)
        .init();
}

fn describe(event: &SessionEvent) -> String {
    match event {
        SessionEvent::Minted { id } => format!("minted {id}"),
        SessionEvent::Enhanced {
            id,
            from_count,
            to_count,
            cost,
        } => format!(
            "enhanced {id} +{from_count} -> +{to_count} for {}",
            cost.to_sui_string(4)
        ),
        SessionEvent::Evolved {
            from_tier,
            to_tier,
            from_name,
            to_name,
            ..
        } => format!("evolved {from_name} (tier {from_tier}) into {to_name} (tier {to_tier})"),
        SessionEvent::Destroyed { id, cost } => {
            format!("destroyed {id}, lost {}", cost.to_sui_string(4))
        }
        SessionEvent::Sold { id, earned } => format!("sold {id} for {}", earned.to_sui_string(4)),
        SessionEvent::Saved { id } => format!("saved {id}"),
        SessionEvent::Removed { id } => format!("removed {id} from collection"),
        SessionEvent::BalanceReconciled { before, after } => format!(
            "balance {} -> {}",
            before.to_sui_string(4),
            after.to_sui_string(4)
        ),
    }
}

fn report(events: &[SessionEvent]) {
    for event in events {
        println!("  {}", describe(event));
    }
}

/// Enhance loop shared by both modes.
async fn play<E: SwordEngine>(
    engine: &mut E,
    mut session: Session,
    attempts: u32,
) -> EngineResult<Session> {
    println!("start: {}", session.summary());

    for attempt in 1..=attempts {
        if session.active().is_none() {
            let step = engine.mint_base(&session).await?;
            report(&step.events);
            session = step.session;
        }
        if !session.summary().can_afford_next {
            println!("out of funds after {} attempts", attempt - 1);
            break;
        }

        let step = match engine.enhance(&session).await {
            Ok(step) => step,
            Err(e) => {
                tracing::warn!(attempt, error = %e, "Enhancement refused");
                continue;
            }
        };
        println!("attempt {attempt}:");
        report(&step.events);
        if let Some(e) = &step.write_error {
            println!("  collection not written: {e}");
        }
        session = step.session;

        if step.outcome.is_some_and(|outcome| outcome.evolved()) {
            let step = engine.save_to_collection(&session).await?;
            report(&step.events);
            session = step.session;
        }
    }

    println!("end:   {}", session.summary());
    Ok(session)
}

async fn run(config: EngineConfig, attempts: u32) -> EngineResult<()> {
    let store: Box<dyn CollectionStore> = match &config.collection_path {
        Some(path) => Box::new(TomlCollectionFile::new(path.clone())),
        None => Box::new(InMemoryCollectionStore::new()),
    };

    match config.mode {
        ExecutionMode::Simulated => {
            let (mut engine, session) = SimulatedEngine::start(&config, store)?;
            play(&mut engine, session, attempts).await?;
        }
        ExecutionMode::Ledger => {
            config.validate()?;
            let package = config.ledger.package_id()?;
            let roll = config
                .seed
                .map_or_else(SeededRoll::from_entropy, SeededRoll::from_seed);
            let chain = SimulatedChain::new(package, config.starting_balance).with_roll(roll);
            let (mut engine, session) = LedgerEngine::connect(chain, store, &config.ledger).await?;
            play(&mut engine, session, attempts).await?;
        }
    }
    Ok(())
}

fn main() -> ExitCode {
    init_tracing();

    let mut args = std::env::args().skip(1);
    let config = match args.next() {
        Some(path) => match EngineConfig::load(&path) {
            Ok(config) => config,
            Err(e) => {
                eprintln!("Error: {e}");
                return ExitCode::FAILURE;
            }
        },
        None => EngineConfig::default(),
    };
    let attempts = match args.next().map(|raw| raw.parse::<u32>()) {
        Some(Ok(n)) => n,
        Some(Err(e)) => {
            eprintln!("Error: ATTEMPTS must be a number: {e}");
            return ExitCode::FAILURE;
        }
        None => DEFAULT_ATTEMPTS,
    };

    let runtime = match tokio::runtime::Builder::new_current_thread()
        .enable_time()
        .build()
    {
        Ok(runtime) => runtime,
        Err(e) => {
            eprintln!("Error: could not start runtime: {e}");
            return ExitCode::FAILURE;
        }
    };

    match runtime.block_on(run(config, attempts)) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("Error: {e}");
            ExitCode::FAILURE
        }
    }
}
