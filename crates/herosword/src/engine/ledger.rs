//! Ledger mode: every state change is a contract call.
//!
//! Nothing in the session moves until the call settles. After a confirmed
//! call the engine re-reads the wallet and derives the transition from what
//! the chain now reports:
//!
//! | call    | old id still owned          | old id gone            |
//! |---------|-----------------------------|------------------------|
//! | enhance | `Success { evolved }`       | `Failure` (destroyed)  |
//! | sell    | -                           | sold                   |
//!
//! A balance that cannot be re-read keeps its previous value, flagged stale.
//! If the owned-object re-read fails the call has still settled; the caller
//! keeps its session and recovers with [`LedgerEngine::resync`].

use std::future::Future;
use std::time::Duration;

use herosword_blockchain::{HeroSword, LedgerError, OwnedSwords, SwordLedger, SyncDelta};
use herosword_economy::{
    enhancement_cost, Balance, Collection, CollectionStore, EconomyError, ExecutionMode,
    LedgerSettings, Outcome, Sword,
};
use herosword_shared::{ObjectId, SessionEvent, SwordId, MAX_ENHANCEMENTS_PER_TIER};
use tracing::{debug, error, info, warn};

use super::{enhancement_events, persist, removal, saving, SwordEngine, Transition};
use crate::error::{EngineError, EngineResult};
use crate::session::Session;

/// Engine that delegates every state change to a [`SwordLedger`].
pub struct LedgerEngine<L, S> {
    ledger: L,
    store: S,
    owned: OwnedSwords,
    timeout: Duration,
}

/// Wallet state read after a confirmed call.
struct Refresh {
    delta: SyncDelta,
    balance: Balance,
    events: Vec<SessionEvent>,
}

impl<L: SwordLedger, S: CollectionStore> LedgerEngine<L, S> {
    /// Connects to the ledger and loads the opening session.
    ///
    /// The first owned sword becomes active; a wallet without swords starts
    /// with an empty slot.
    ///
    /// # Errors
    ///
    /// `InvalidConfig` if no package is configured, `RemoteCallFailed` if the
    /// ledger targets another package or the opening reads fail.
    pub async fn connect(
        ledger: L,
        store: S,
        settings: &LedgerSettings,
    ) -> EngineResult<(Self, Session)> {
        let package = settings.package_id()?;
        if ledger.package() != package {
            return Err(EngineError::RemoteCallFailed {
                operation: "connect",
                source: LedgerError::NotConfigured(format!(
                    "ledger targets {} but config expects {package}",
                    ledger.package()
                )),
            });
        }

        let collection = store.load_collection()?;
        let mut engine = Self {
            ledger,
            store,
            owned: OwnedSwords::new(),
            timeout: settings.remote_timeout(),
        };

        let owned = engine
            .remote("fetch_owned_swords", engine.ledger.fetch_owned_swords())
            .await?;
        let balance = engine
            .remote("fetch_balance", engine.ledger.fetch_balance())
            .await?;
        engine.owned.apply_snapshot(owned);
        let active = engine.first_owned()?;

        info!(
            %package,
            balance = %balance,
            owned = engine.owned.len(),
            saved = collection.len(),
            "Ledger session connected"
        );

        let session = Session::new(
            ExecutionMode::Ledger,
            active,
            Balance::external(balance),
            collection,
        );
        Ok((engine, session))
    }

    /// Rebuilds the session from a fresh read of owned swords and the
    /// balance.
    ///
    /// Recovers from an operation whose call settled but whose re-read
    /// failed. The active sword keeps its slot if its object is still owned
    /// and takes the chain's current stats; otherwise the first owned sword
    /// becomes active and any saved snapshot of the vanished object is
    /// dropped.
    ///
    /// # Errors
    ///
    /// `RemoteCallFailed` if owned objects cannot be read.
    pub async fn resync(&mut self, session: &Session) -> EngineResult<Transition> {
        let refresh = self.refresh("resync", session.balance()).await?;
        let previous = session.active().and_then(|sword| sword.id().object());

        let mut events = Vec::new();
        let mut collection = session.collection().clone();
        let mut write_error = None;
        let active = match previous.and_then(|object| self.owned.get(&object)) {
            Some(current) => Some(Self::decode("resync", current)?),
            None => {
                if let Some(object) = previous {
                    let (after, removed) = removal(&collection, SwordId::Object(object));
                    write_error = self.persist_after_confirmed(session, &after);
                    collection = after;
                    events.extend(removed);
                }
                self.first_owned()?
            }
        };
        events.extend(refresh.events);

        info!(
            active = ?active.map(|sword| sword.id()),
            owned = self.owned.len(),
            "Session resynced"
        );
        let next = session
            .clone()
            .with_active(active)
            .with_balance(refresh.balance)
            .with_collection(collection);
        Ok(Transition::new(next, events).with_write_error(write_error))
    }

    /// Owned swords as of the last read.
    pub fn owned(&self) -> &OwnedSwords {
        &self.owned
    }

    /// The ledger collaborator.
    pub fn ledger(&self) -> &L {
        &self.ledger
    }

    /// Bounds a ledger future by the configured timeout.
    async fn remote<T>(
        &self,
        operation: &'static str,
        call: impl Future<Output = Result<T, LedgerError>>,
    ) -> EngineResult<T> {
        let source = match tokio::time::timeout(self.timeout, call).await {
            Ok(Ok(value)) => return Ok(value),
            Ok(Err(source)) => source,
            Err(_) => LedgerError::Timeout {
                target: operation.to_string(),
                after_ms: u64::try_from(self.timeout.as_millis()).unwrap_or(u64::MAX),
            },
        };
        warn!(operation, error = %source, "Remote call failed");
        Err(EngineError::RemoteCallFailed { operation, source })
    }

    fn decode(operation: &'static str, sword: &HeroSword) -> EngineResult<Sword> {
        sword
            .to_sword()
            .map_err(|source| EngineError::RemoteCallFailed { operation, source })
    }

    fn first_owned(&self) -> EngineResult<Option<Sword>> {
        self.owned
            .first()
            .map(|sword| Self::decode("fetch_owned_swords", sword))
            .transpose()
    }

    fn active_object(session: &Session) -> EngineResult<(Sword, ObjectId)> {
        let sword = *session.require_active()?;
        let object = sword.id().object().ok_or_else(|| {
            EngineError::Economy(EconomyError::InvalidSword {
                id: sword.id(),
                reason: "local sword in a ledger session".to_string(),
            })
        })?;
        Ok((sword, object))
    }

    /// Re-reads owned swords and the balance after a confirmed call.
    ///
    /// A failed owned-object read is an error (the transition cannot be
    /// derived). A failed balance read is not.
    async fn refresh(&mut self, operation: &'static str, before: Balance) -> EngineResult<Refresh> {
        let snapshot = self
            .remote(operation, self.ledger.fetch_owned_swords())
            .await?;

        let mut events = Vec::new();
        let balance = match self.remote(operation, self.ledger.fetch_balance()).await {
            Ok(fetched) => {
                if fetched != before.amount() {
                    events.push(SessionEvent::BalanceReconciled {
                        before: before.amount(),
                        after: fetched,
                    });
                }
                before.reconciled(fetched)
            }
            Err(e) => {
                warn!(operation, error = %e, "Balance refresh failed, keeping last value");
                before.marked_stale()
            }
        };

        let delta = self.owned.apply_snapshot(snapshot);
        debug!(
            operation,
            added = delta.added.len(),
            removed = delta.removed.len(),
            changed = delta.changed.len(),
            "Wallet refreshed"
        );
        Ok(Refresh {
            delta,
            balance,
            events,
        })
    }

    /// Collection writes after a confirmed call never fail the operation.
    fn persist_after_confirmed(&self, before: &Session, after: &Collection) -> Option<EconomyError> {
        match persist(&self.store, before.collection(), after) {
            Ok(()) => None,
            Err(e) => {
                warn!(error = %e, "Collection write failed after confirmed call");
                Some(e)
            }
        }
    }

    async fn mint(&mut self, session: &Session) -> EngineResult<Transition> {
        self.remote("mint_base", self.ledger.mint_base()).await?;
        let refresh = self.refresh("mint_base", session.balance()).await?;

        let minted = refresh
            .delta
            .added
            .first()
            .and_then(|id| self.owned.get(id))
            .or_else(|| self.owned.first())
            .map(|sword| Self::decode("mint_base", sword))
            .transpose()?;

        let mut events = Vec::new();
        if let Some(sword) = &minted {
            info!(sword = %sword.id(), "Sword minted on chain");
            events.push(SessionEvent::Minted { id: sword.id() });
        }
        events.extend(refresh.events);

        let next = session
            .clone()
            .with_active(minted.or(session.active().copied()))
            .with_balance(refresh.balance);
        Ok(Transition::new(next, events))
    }

    async fn attempt(&mut self, session: &Session) -> EngineResult<Transition> {
        let (sword, object) = Self::active_object(session)?;
        if sword.enhancement_count() >= MAX_ENHANCEMENTS_PER_TIER {
            error!(sword = %sword.id(), "Sword at enhancement cap without evolving");
            return Err(EconomyError::MaxTierReached {
                tier: sword.tier(),
                enhancement_count: sword.enhancement_count(),
            }
            .into());
        }
        let cost = enhancement_cost(sword.enhancement_count());
        session.balance().ensure_affordable(cost)?;

        self.remote("enhance", self.ledger.enhance(object)).await?;
        let refresh = self.refresh("enhance", session.balance()).await?;

        let mut write_error = None;
        let (outcome, active, collection) = match self.owned.get(&object) {
            Some(updated) => {
                let updated = Self::decode("enhance", updated)?;
                let evolved = updated.tier() > sword.tier();
                (
                    Outcome::Success { evolved },
                    Some(updated),
                    session.collection().clone(),
                )
            }
            None => {
                let (collection, _) = removal(session.collection(), sword.id());
                write_error = self.persist_after_confirmed(session, &collection);
                (Outcome::Failure, self.first_owned()?, collection)
            }
        };

        let mut events = enhancement_events(&sword, active.as_ref(), outcome, cost);
        if outcome == Outcome::Failure && session.collection().contains(sword.id()) {
            events.push(SessionEvent::Removed { id: sword.id() });
        }
        events.extend(refresh.events);

        let next = session
            .clone()
            .with_active(active)
            .with_balance(refresh.balance)
            .with_collection(collection);
        Ok(Transition::new(next, events)
            .with_outcome(outcome)
            .with_write_error(write_error))
    }

    async fn sell_active(&mut self, session: &Session) -> EngineResult<Transition> {
        let (sword, object) = Self::active_object(session)?;

        self.remote("sell", self.ledger.sell(object)).await?;
        let refresh = self.refresh("sell", session.balance()).await?;

        if self.owned.get(&object).is_some() {
            warn!(sword = %sword.id(), "Sold sword still reported as owned");
        }

        let (collection, removed) = removal(session.collection(), sword.id());
        let write_error = self.persist_after_confirmed(session, &collection);

        let mut events = vec![SessionEvent::Sold {
            id: sword.id(),
            earned: sword.value(),
        }];
        events.extend(removed);
        events.extend(refresh.events);

        let active = self
            .owned
            .iter()
            .find(|owned| owned.id != object)
            .map(|owned| Self::decode("sell", owned))
            .transpose()?;

        let next = session
            .clone()
            .with_active(active)
            .with_balance(refresh.balance)
            .with_collection(collection);
        Ok(Transition::new(next, events).with_write_error(write_error))
    }

    async fn save_active(&mut self, session: &Session) -> EngineResult<Transition> {
        let (sword, object) = Self::active_object(session)?;

        self.remote("save_to_collection", self.ledger.save_as_persistent(object))
            .await?;
        let refresh = self.refresh("save_to_collection", session.balance()).await?;

        let active = match self.owned.get(&object) {
            Some(current) => Self::decode("save_to_collection", current)?,
            None => sword,
        };
        let (collection, saved) = saving(session.collection(), &active);
        persist(&self.store, session.collection(), &collection)?;

        let mut events: Vec<SessionEvent> = saved.into_iter().collect();
        events.extend(refresh.events);

        let next = session
            .clone()
            .with_active(Some(active))
            .with_balance(refresh.balance)
            .with_collection(collection);
        Ok(Transition::new(next, events))
    }
}

impl<L: SwordLedger, S: CollectionStore> SwordEngine for LedgerEngine<L, S> {
    fn mode(&self) -> ExecutionMode {
        ExecutionMode::Ledger
    }

    async fn mint_base(&mut self, session: &Session) -> EngineResult<Transition> {
        self.mint(session).await
    }

    async fn enhance(&mut self, session: &Session) -> EngineResult<Transition> {
        self.attempt(session).await
    }

    async fn sell(&mut self, session: &Session) -> EngineResult<Transition> {
        self.sell_active(session).await
    }

    async fn save_to_collection(&mut self, session: &Session) -> EngineResult<Transition> {
        self.save_active(session).await
    }

    async fn remove_from_collection(
        &mut self,
        session: &Session,
        id: SwordId,
    ) -> EngineResult<Transition> {
        let (collection, removed) = removal(session.collection(), id);
        persist(&self.store, session.collection(), &collection)?;
        Ok(Transition::new(
            session.clone().with_collection(collection),
            removed.into_iter().collect(),
        ))
    }
}
