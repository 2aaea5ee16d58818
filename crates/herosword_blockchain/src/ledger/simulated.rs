//! In-memory chain for tests and headless runs.
//!
//! Behaves like the deployed sword package: enhancement rolls against the
//! sword's success rate, a failed roll burns the object, a sale burns it and
//! pays out its value. Objects are stored as raw Move fields so every read
//! goes through the same decoder a real transport would use.

use std::collections::{BTreeSet, HashMap};
use std::time::Duration;

use herosword_economy::{
    Balance, EconomyError, LocalIdAllocator, Outcome, PercentRoll, Progression, SeededRoll,
};
use herosword_shared::{Mist, ObjectId};
use parking_lot::Mutex;
use tracing::debug;

use super::{Receipt, SwordLedger};
use crate::contracts::{HeroSword, MoveCall, MoveFields, MoveFunction};
use crate::error::{LedgerError, LedgerResult};

/// Builds a deterministic 32-byte id from a tag and a counter.
fn sequential_id(tag: u8, n: u64) -> ObjectId {
    let mut bytes = [0u8; 32];
    bytes[0] = tag;
    bytes[24..].copy_from_slice(&n.to_be_bytes());
    ObjectId::from(bytes)
}

const OBJECT_TAG: u8 = 0x5e;
const DIGEST_TAG: u8 = 0xd1;

struct ChainState {
    objects: Vec<(ObjectId, MoveFields)>,
    persistent: BTreeSet<ObjectId>,
    balance: Mist,
    next_object: u64,
    next_digest: u64,
    executed: Vec<MoveCall>,
    roll: Box<dyn PercentRoll + Send>,
    rejections: HashMap<MoveFunction, String>,
    balance_failures: u32,
    owned_failures: u32,
    latency: Duration,
}

impl ChainState {
    fn position(&self, id: ObjectId) -> LedgerResult<usize> {
        self.objects
            .iter()
            .position(|(object, _)| *object == id)
            .ok_or(LedgerError::ObjectNotFound(id))
    }

    fn digest(&mut self) -> ObjectId {
        self.next_digest += 1;
        sequential_id(DIGEST_TAG, self.next_digest)
    }
}

/// A single-player chain held in memory.
pub struct SimulatedChain {
    package: ObjectId,
    progression: Progression,
    state: Mutex<ChainState>,
}

impl SimulatedChain {
    /// Empty chain with `balance` MIST in the player's wallet.
    #[must_use]
    pub fn new(package: ObjectId, balance: Mist) -> Self {
        Self {
            package,
            progression: Progression::default(),
            state: Mutex::new(ChainState {
                objects: Vec::new(),
                persistent: BTreeSet::new(),
                balance,
                next_object: 0,
                next_digest: 0,
                executed: Vec::new(),
                roll: Box::new(SeededRoll::from_entropy()),
                rejections: HashMap::new(),
                balance_failures: 0,
                owned_failures: 0,
                latency: Duration::ZERO,
            }),
        }
    }

    /// Replaces the roll source used by `enhance_sword`.
    #[must_use]
    pub fn with_roll(self, roll: impl PercentRoll + Send + 'static) -> Self {
        self.state.lock().roll = Box::new(roll);
        self
    }

    /// Current wallet balance.
    #[must_use]
    pub fn balance(&self) -> Mist {
        self.state.lock().balance
    }

    /// Every call that executed, in order.
    #[must_use]
    pub fn executed(&self) -> Vec<MoveCall> {
        self.state.lock().executed.clone()
    }

    /// Returns true if `id` was saved with `save_sword_as_nft`.
    #[must_use]
    pub fn is_persistent(&self, id: ObjectId) -> bool {
        self.state.lock().persistent.contains(&id)
    }

    /// Places a sword object in the wallet without a call.
    pub fn deposit(&self, sword: &HeroSword) {
        self.state.lock().objects.push((sword.id, sword.to_fields()));
    }

    /// Rejects the next call to `function` with `reason`.
    pub fn reject_next(&self, function: MoveFunction, reason: impl Into<String>) {
        self.state.lock().rejections.insert(function, reason.into());
    }

    /// Fails the next `count` balance reads.
    pub fn fail_balance_reads(&self, count: u32) {
        self.state.lock().balance_failures = count;
    }

    /// Fails the next `count` owned-object reads.
    pub fn fail_owned_reads(&self, count: u32) {
        self.state.lock().owned_failures = count;
    }

    /// Delays every call and read by `latency`.
    pub fn set_latency(&self, latency: Duration) {
        self.state.lock().latency = latency;
    }

    async fn settle(&self) {
        let latency = self.state.lock().latency;
        if !latency.is_zero() {
            tokio::time::sleep(latency).await;
        }
    }

    fn execute<F>(&self, call: MoveCall, apply: F) -> LedgerResult<Receipt>
    where
        F: FnOnce(&Self, &mut ChainState) -> LedgerResult<()>,
    {
        let mut state = self.state.lock();
        if let Some(reason) = state.rejections.remove(&call.function) {
            return Err(LedgerError::CallRejected {
                target: call.target(),
                reason,
            });
        }
        apply(self, &mut *state).map_err(|e| match e {
            LedgerError::CallRejected { reason, .. } => LedgerError::CallRejected {
                target: call.target(),
                reason,
            },
            other => other,
        })?;
        let digest = state.digest();
        debug!(%call, %digest, "Simulated call executed");
        state.executed.push(call.clone());
        Ok(Receipt { digest, call })
    }

    fn abort(reason: &str) -> LedgerError {
        LedgerError::CallRejected {
            target: String::new(),
            reason: reason.to_string(),
        }
    }

    fn apply_enhance(&self, state: &mut ChainState, id: ObjectId) -> LedgerResult<()> {
        let index = state.position(id)?;
        let sword = HeroSword::from_fields(id, &state.objects[index].1)?.to_sword()?;
        let balance = Balance::external(state.balance);
        let mut ids = LocalIdAllocator::new();

        let step = self
            .progression
            .attempt_enhancement(&sword, balance, state.roll.as_mut(), &mut ids)
            .map_err(|e| match e {
                EconomyError::InsufficientFunds { .. } => Self::abort("EInsufficientBalance"),
                other => Self::abort(&other.to_string()),
            })?;

        state.balance = step.balance.amount();
        match step.outcome {
            Outcome::Success { .. } => {
                let updated = HeroSword::from_sword(&step.sword)
                    .ok_or_else(|| LedgerError::Decode(format!("{id} lost its object id")))?;
                state.objects[index].1 = updated.to_fields();
            }
            Outcome::Failure => {
                state.objects.remove(index);
                state.persistent.remove(&id);
            }
        }
        Ok(())
    }

    fn apply_sell(state: &mut ChainState, id: ObjectId) -> LedgerResult<()> {
        let index = state.position(id)?;
        let sword = HeroSword::from_fields(id, &state.objects[index].1)?;
        state.balance = state
            .balance
            .checked_add(sword.value)
            .ok_or_else(|| Self::abort("EOverflow"))?;
        state.objects.remove(index);
        state.persistent.remove(&id);
        Ok(())
    }
}

impl SwordLedger for SimulatedChain {
    fn package(&self) -> ObjectId {
        self.package
    }

    async fn mint_base(&self) -> LedgerResult<Receipt> {
        self.settle().await;
        self.execute(MoveCall::mint_sword(self.package), |_, state| {
            state.next_object += 1;
            let id = sequential_id(OBJECT_TAG, state.next_object);
            state.objects.push((id, MoveFields::new()));
            Ok(())
        })
    }

    async fn enhance(&self, sword: ObjectId) -> LedgerResult<Receipt> {
        self.settle().await;
        self.execute(MoveCall::enhance_sword(self.package, sword), |chain, state| {
            chain.apply_enhance(state, sword)
        })
    }

    async fn sell(&self, sword: ObjectId) -> LedgerResult<Receipt> {
        self.settle().await;
        self.execute(MoveCall::sell_sword(self.package, sword), |_, state| {
            Self::apply_sell(state, sword)
        })
    }

    async fn save_as_persistent(&self, sword: ObjectId) -> LedgerResult<Receipt> {
        self.settle().await;
        self.execute(
            MoveCall::save_sword_as_nft(self.package, sword),
            |_, state| {
                state.position(sword)?;
                state.persistent.insert(sword);
                Ok(())
            },
        )
    }

    async fn fetch_balance(&self) -> LedgerResult<Mist> {
        self.settle().await;
        let mut state = self.state.lock();
        if state.balance_failures > 0 {
            state.balance_failures -= 1;
            return Err(LedgerError::Decode("balance endpoint unavailable".to_string()));
        }
        Ok(state.balance)
    }

    async fn fetch_owned_swords(&self) -> LedgerResult<Vec<HeroSword>> {
        self.settle().await;
        let mut state = self.state.lock();
        if state.owned_failures > 0 {
            state.owned_failures -= 1;
            return Err(LedgerError::Decode("owned objects unavailable".to_string()));
        }
        state
            .objects
            .iter()
            .map(|(id, fields)| HeroSword::from_fields(*id, fields))
            .collect()
    }
}
