//! # Sword Engines
//!
//! The five session operations as one capability, with one implementation
//! per execution mode. Callers hold a `Session`, pass it by reference, and
//! replace it with the one in the returned [`Transition`]. On error the
//! caller keeps the session it already has.
//!
//! Calls must be serialized: every operation takes `&mut self`, so at most
//! one request per engine is in flight.

mod ledger;
mod simulated;

use herosword_economy::{
    Collection, CollectionStore, EconomyError, EconomyResult, ExecutionMode, Outcome, Sword,
};
use herosword_shared::{Mist, SessionEvent, SwordId};

use crate::error::EngineResult;
use crate::session::Session;

pub use ledger::LedgerEngine;
pub use simulated::SimulatedEngine;

/// Result of a successful engine operation.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Transition {
    /// The session to adopt.
    pub session: Session,
    /// Enhancement outcome, for `enhance` only.
    pub outcome: Option<Outcome>,
    /// What the player should be told, in order.
    pub events: Vec<SessionEvent>,
    /// A collection write that failed after the transition was already
    /// committed. The session is authoritative; the store is behind it.
    pub write_error: Option<EconomyError>,
}

impl Transition {
    fn new(session: Session, events: Vec<SessionEvent>) -> Self {
        Self {
            session,
            outcome: None,
            events,
            write_error: None,
        }
    }

    fn with_outcome(self, outcome: Outcome) -> Self {
        Self {
            outcome: Some(outcome),
            ..self
        }
    }

    fn with_write_error(self, write_error: Option<EconomyError>) -> Self {
        Self {
            write_error,
            ..self
        }
    }
}

/// The session operations, independent of execution mode.
#[allow(async_fn_in_trait)]
pub trait SwordEngine {
    /// Mode this engine executes in.
    fn mode(&self) -> ExecutionMode;

    /// Puts a fresh tier-1 sword in the active slot.
    async fn mint_base(&mut self, session: &Session) -> EngineResult<Transition>;

    /// Attempts one enhancement of the active sword.
    async fn enhance(&mut self, session: &Session) -> EngineResult<Transition>;

    /// Sells the active sword for its value.
    async fn sell(&mut self, session: &Session) -> EngineResult<Transition>;

    /// Saves a snapshot of the active sword. Saving an unchanged sword twice
    /// is a no-op.
    async fn save_to_collection(&mut self, session: &Session) -> EngineResult<Transition>;

    /// Drops a saved snapshot. Removing an absent id is a no-op.
    async fn remove_from_collection(
        &mut self,
        session: &Session,
        id: SwordId,
    ) -> EngineResult<Transition>;
}

/// Events for an enhancement that went from `before` to `after`.
fn enhancement_events(
    before: &Sword,
    after: Option<&Sword>,
    outcome: Outcome,
    cost: Mist,
) -> Vec<SessionEvent> {
    let mut events = Vec::with_capacity(2);
    match (outcome, after) {
        (Outcome::Success { evolved }, Some(after)) => {
            events.push(SessionEvent::Enhanced {
                id: before.id(),
                from_count: before.enhancement_count(),
                to_count: after.enhancement_count(),
                cost,
            });
            if evolved {
                events.push(SessionEvent::Evolved {
                    id: before.id(),
                    from_tier: before.tier(),
                    to_tier: after.tier(),
                    from_name: before.display_name().to_string(),
                    to_name: after.display_name().to_string(),
                });
            }
        }
        _ => {
            events.push(SessionEvent::Destroyed {
                id: before.id(),
                cost,
            });
        }
    }
    events
}

/// Writes `after` through the store if it differs from `before`.
fn persist<S: CollectionStore>(
    store: &S,
    before: &Collection,
    after: &Collection,
) -> EconomyResult<()> {
    if before == after {
        return Ok(());
    }
    store.save_collection(after)
}

/// Collection with `id` removed, plus the matching event.
fn removal(collection: &Collection, id: SwordId) -> (Collection, Option<SessionEvent>) {
    if collection.contains(id) {
        (collection.without(id), Some(SessionEvent::Removed { id }))
    } else {
        (collection.clone(), None)
    }
}

/// Collection with a snapshot of `sword` saved, plus the matching event.
fn saving(collection: &Collection, sword: &Sword) -> (Collection, Option<SessionEvent>) {
    if collection.contains_snapshot(sword) {
        (collection.clone(), None)
    } else {
        (
            collection.with_saved(*sword),
            Some(SessionEvent::Saved { id: sword.id() }),
        )
    }
}
