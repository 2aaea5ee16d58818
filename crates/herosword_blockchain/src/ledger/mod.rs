//! # Ledger Seam
//!
//! Everything ledger mode needs from the outside world, as one trait:
//! four state-changing calls and two reads. A transport that signs and
//! submits real transactions implements it; so does [`SimulatedChain`].
//!
//! Calls settle exactly once. A returned error means the transaction did not
//! execute.

mod simulated;

use std::sync::Arc;

use herosword_shared::{Mist, ObjectId};

use crate::contracts::{HeroSword, MoveCall};
use crate::error::LedgerResult;

pub use simulated::SimulatedChain;

/// Proof that a call executed.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Receipt {
    /// Transaction digest.
    pub digest: ObjectId,
    /// The call that ran.
    pub call: MoveCall,
}

/// Remote execution and balance source for ledger mode.
#[allow(async_fn_in_trait)]
pub trait SwordLedger {
    /// Package the calls are sent to.
    fn package(&self) -> ObjectId;

    /// Calls `mint_sword`.
    async fn mint_base(&self) -> LedgerResult<Receipt>;

    /// Calls `enhance_sword` on an owned sword.
    async fn enhance(&self, sword: ObjectId) -> LedgerResult<Receipt>;

    /// Calls `sell_sword` on an owned sword.
    async fn sell(&self, sword: ObjectId) -> LedgerResult<Receipt>;

    /// Calls `save_sword_as_nft` on an owned sword.
    async fn save_as_persistent(&self, sword: ObjectId) -> LedgerResult<Receipt>;

    /// Reads the player's SUI balance.
    async fn fetch_balance(&self) -> LedgerResult<Mist>;

    /// Reads every `HeroSword` the player owns.
    async fn fetch_owned_swords(&self) -> LedgerResult<Vec<HeroSword>>;
}

impl<L: SwordLedger + ?Sized> SwordLedger for &L {
    fn package(&self) -> ObjectId {
        (**self).package()
    }

    async fn mint_base(&self) -> LedgerResult<Receipt> {
        (**self).mint_base().await
    }

    async fn enhance(&self, sword: ObjectId) -> LedgerResult<Receipt> {
        (**self).enhance(sword).await
    }

    async fn sell(&self, sword: ObjectId) -> LedgerResult<Receipt> {
        (**self).sell(sword).await
    }

    async fn save_as_persistent(&self, sword: ObjectId) -> LedgerResult<Receipt> {
        (**self).save_as_persistent(sword).await
    }

    async fn fetch_balance(&self) -> LedgerResult<Mist> {
        (**self).fetch_balance().await
    }

    async fn fetch_owned_swords(&self) -> LedgerResult<Vec<HeroSword>> {
        (**self).fetch_owned_swords().await
    }
}

impl<L: SwordLedger + ?Sized> SwordLedger for Arc<L> {
    fn package(&self) -> ObjectId {
        (**self).package()
    }

    async fn mint_base(&self) -> LedgerResult<Receipt> {
        (**self).mint_base().await
    }

    async fn enhance(&self, sword: ObjectId) -> LedgerResult<Receipt> {
        (**self).enhance(sword).await
    }

    async fn sell(&self, sword: ObjectId) -> LedgerResult<Receipt> {
        (**self).sell(sword).await
    }

    async fn save_as_persistent(&self, sword: ObjectId) -> LedgerResult<Receipt> {
        (**self).save_as_persistent(sword).await
    }

    async fn fetch_balance(&self) -> LedgerResult<Mist> {
        (**self).fetch_balance().await
    }

    async fn fetch_owned_swords(&self) -> LedgerResult<Vec<HeroSword>> {
        (**self).fetch_owned_swords().await
    }
}
