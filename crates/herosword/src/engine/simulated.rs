//! Simulated mode: local rolls, local balance, local ids.

use herosword_economy::{
    Balance, CollectionStore, EngineConfig, ExecutionMode, LocalIdAllocator, PercentRoll,
    Progression, SeededRoll,
};
use herosword_shared::{SessionEvent, SwordId};
use tracing::{debug, info, warn};

use super::{enhancement_events, persist, removal, saving, SwordEngine, Transition};
use crate::error::EngineResult;
use crate::session::Session;

/// Engine that runs the progression rules in-process.
///
/// Every operation completes synchronously; the async trait methods never
/// suspend.
pub struct SimulatedEngine<S, R = SeededRoll> {
    progression: Progression,
    store: S,
    roll: R,
    ids: LocalIdAllocator,
}

impl<S: CollectionStore> SimulatedEngine<S> {
    /// Starts a session from config, seeding rolls from `config.seed` or the
    /// OS.
    ///
    /// # Errors
    ///
    /// Invalid config, or a collection that fails to load.
    pub fn start(config: &EngineConfig, store: S) -> EngineResult<(Self, Session)> {
        let roll = config
            .seed
            .map_or_else(SeededRoll::from_entropy, SeededRoll::from_seed);
        Self::start_with_roll(config, store, roll)
    }
}

impl<S: CollectionStore, R: PercentRoll> SimulatedEngine<S, R> {
    /// Starts a session with an explicit roll source.
    ///
    /// # Errors
    ///
    /// Invalid config, or a collection that fails to load.
    pub fn start_with_roll(
        config: &EngineConfig,
        store: S,
        roll: R,
    ) -> EngineResult<(Self, Session)> {
        config.validate()?;
        let collection = store.load_collection()?;
        let mut ids = LocalIdAllocator::after(collection.ids());
        let progression = Progression::new(config.base_sword);
        let active = progression.base_sword(&mut ids);

        info!(
            balance = %config.starting_balance,
            saved = collection.len(),
            active = %active.id(),
            "Simulated session started"
        );

        let session = Session::new(
            ExecutionMode::Simulated,
            Some(active),
            Balance::simulated(config.starting_balance),
            collection,
        );
        Ok((
            Self {
                progression,
                store,
                roll,
                ids,
            },
            session,
        ))
    }

    /// The collection store.
    pub fn store(&self) -> &S {
        &self.store
    }

    /// Puts a fresh base sword in the active slot.
    pub fn mint_now(&mut self, session: &Session) -> Transition {
        let sword = self.progression.base_sword(&mut self.ids);
        debug!(sword = %sword.id(), "Base sword minted");
        Transition::new(
            session.clone().with_active(Some(sword)),
            vec![SessionEvent::Minted { id: sword.id() }],
        )
    }

    /// One enhancement attempt.
    ///
    /// # Errors
    ///
    /// `NoActiveSword` or `InsufficientFunds`. The session is untouched on
    /// error. A collection write that fails after a destruction does not
    /// undo the roll; it comes back in [`Transition::write_error`].
    pub fn enhance_now(&mut self, session: &Session) -> EngineResult<Transition> {
        let sword = *session.require_active()?;
        let step = self.progression.attempt_enhancement(
            &sword,
            session.balance(),
            &mut self.roll,
            &mut self.ids,
        )?;

        let mut events = enhancement_events(
            &sword,
            step.outcome.is_success().then_some(&step.sword),
            step.outcome,
            step.cost,
        );
        let mut collection = session.collection().clone();
        let mut write_error = None;

        if let Some(destroyed) = step.destroyed {
            let (after, removed) = removal(&collection, destroyed);
            if let Err(e) = persist(&self.store, &collection, &after) {
                warn!(sword = %destroyed, error = %e, "Collection write failed after destruction");
                write_error = Some(e);
            }
            collection = after;
            events.extend(removed);
            events.push(SessionEvent::Minted {
                id: step.sword.id(),
            });
        }

        let next = session
            .clone()
            .with_active(Some(step.sword))
            .with_balance(step.balance)
            .with_collection(collection);
        Ok(Transition::new(next, events)
            .with_outcome(step.outcome)
            .with_write_error(write_error))
    }

    /// Sells the active sword and mints a replacement.
    ///
    /// # Errors
    ///
    /// `NoActiveSword`, `ArithmeticOverflow`, or a failed collection write.
    pub fn sell_now(&mut self, session: &Session) -> EngineResult<Transition> {
        let sword = *session.require_active()?;
        let sale = self.progression.sell(&sword, session.balance())?;

        let (collection, removed) = removal(session.collection(), sale.removed);
        persist(&self.store, session.collection(), &collection)?;

        let replacement = self.progression.base_sword(&mut self.ids);
        let mut events = vec![SessionEvent::Sold {
            id: sale.removed,
            earned: sale.earned,
        }];
        events.extend(removed);
        events.push(SessionEvent::Minted {
            id: replacement.id(),
        });

        let next = session
            .clone()
            .with_active(Some(replacement))
            .with_balance(sale.balance)
            .with_collection(collection);
        Ok(Transition::new(next, events))
    }

    /// Saves the active sword.
    ///
    /// # Errors
    ///
    /// `NoActiveSword`, or a failed collection write.
    pub fn save_now(&mut self, session: &Session) -> EngineResult<Transition> {
        let sword = session.require_active()?;
        let (collection, saved) = saving(session.collection(), sword);
        persist(&self.store, session.collection(), &collection)?;
        Ok(Transition::new(
            session.clone().with_collection(collection),
            saved.into_iter().collect(),
        ))
    }

    /// Drops a saved snapshot.
    ///
    /// # Errors
    ///
    /// A failed collection write.
    pub fn remove_now(&mut self, session: &Session, id: SwordId) -> EngineResult<Transition> {
        let (collection, removed) = removal(session.collection(), id);
        persist(&self.store, session.collection(), &collection)?;
        Ok(Transition::new(
            session.clone().with_collection(collection),
            removed.into_iter().collect(),
        ))
    }
}

impl<S: CollectionStore, R: PercentRoll> SwordEngine for SimulatedEngine<S, R> {
    fn mode(&self) -> ExecutionMode {
        ExecutionMode::Simulated
    }

    async fn mint_base(&mut self, session: &Session) -> EngineResult<Transition> {
        Ok(self.mint_now(session))
    }

    async fn enhance(&mut self, session: &Session) -> EngineResult<Transition> {
        self.enhance_now(session)
    }

    async fn sell(&mut self, session: &Session) -> EngineResult<Transition> {
        self.sell_now(session)
    }

    async fn save_to_collection(&mut self, session: &Session) -> EngineResult<Transition> {
        self.save_now(session)
    }

    async fn remove_from_collection(
        &mut self,
        session: &Session,
        id: SwordId,
    ) -> EngineResult<Transition> {
        self.remove_now(session, id)
    }
}
