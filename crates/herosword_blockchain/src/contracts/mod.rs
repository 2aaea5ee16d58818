//! # Contract Definitions
//!
//! The sword package's Move entry points and the on-chain `HeroSword`
//! object layout.
//!
//! ```text
//! module {package}::sword {
//!     entry fun mint_sword(ctx)
//!     entry fun enhance_sword(sword: &mut HeroSword, payment: &mut Coin<SUI>, ctx)
//!     entry fun sell_sword(sword: HeroSword, payment: &mut Coin<SUI>, ctx)
//!     entry fun save_sword_as_nft(sword: &HeroSword, ctx)
//! }
//! ```

use std::collections::BTreeMap;
use std::fmt;
use std::str::FromStr;

use herosword_economy::{tier_info, Sword, SwordParts, TypeClass};
use herosword_shared::{
    Mist, ObjectId, SwordId, BASE_ATTACK_POWER, BASE_MAGIC_POWER, BASE_SUCCESS_RATE,
};

use crate::error::{LedgerError, LedgerResult};

/// Move module holding every sword entry point.
pub const SWORD_MODULE: &str = "sword";

/// Move struct name of an owned sword.
pub const HERO_SWORD_STRUCT: &str = "HeroSword";

/// Fully qualified struct type used to filter owned objects.
#[must_use]
pub fn hero_sword_type(package: ObjectId) -> String {
    format!("{package}::{SWORD_MODULE}::{HERO_SWORD_STRUCT}")
}

/// Entry functions of the sword module.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum MoveFunction {
    /// Mints a tier-1 sword to the sender.
    MintSword,
    /// One enhancement attempt, paid from gas.
    EnhanceSword,
    /// Burns the sword and pays out its value.
    SellSword,
    /// Marks the sword as a persistent collectible.
    SaveSwordAsNft,
}

impl MoveFunction {
    /// Function name inside the module.
    #[must_use]
    pub const fn name(self) -> &'static str {
        match self {
            Self::MintSword => "mint_sword",
            Self::EnhanceSword => "enhance_sword",
            Self::SellSword => "sell_sword",
            Self::SaveSwordAsNft => "save_sword_as_nft",
        }
    }
}

/// A single transaction argument.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum CallArg {
    /// An owned object passed by id.
    Object(ObjectId),
    /// The gas coin, used as payment.
    Gas,
}

/// One Move call, ready for a transport to sign and execute.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct MoveCall {
    /// Deployed package.
    pub package: ObjectId,
    /// Entry function.
    pub function: MoveFunction,
    /// Arguments in order.
    pub arguments: Vec<CallArg>,
}

impl MoveCall {
    /// `mint_sword()`
    #[must_use]
    pub fn mint_sword(package: ObjectId) -> Self {
        Self {
            package,
            function: MoveFunction::MintSword,
            arguments: Vec::new(),
        }
    }

    /// `enhance_sword(sword, gas)`
    #[must_use]
    pub fn enhance_sword(package: ObjectId, sword: ObjectId) -> Self {
        Self {
            package,
            function: MoveFunction::EnhanceSword,
            arguments: vec![CallArg::Object(sword), CallArg::Gas],
        }
    }

    /// `sell_sword(sword, gas)`
    #[must_use]
    pub fn sell_sword(package: ObjectId, sword: ObjectId) -> Self {
        Self {
            package,
            function: MoveFunction::SellSword,
            arguments: vec![CallArg::Object(sword), CallArg::Gas],
        }
    }

    /// `save_sword_as_nft(sword)`
    #[must_use]
    pub fn save_sword_as_nft(package: ObjectId, sword: ObjectId) -> Self {
        Self {
            package,
            function: MoveFunction::SaveSwordAsNft,
            arguments: vec![CallArg::Object(sword)],
        }
    }

    /// `package::sword::function`
    #[must_use]
    pub fn target(&self) -> String {
        format!("{}::{SWORD_MODULE}::{}", self.package, self.function.name())
    }

    /// The sword object this call operates on, if any.
    #[must_use]
    pub fn sword(&self) -> Option<ObjectId> {
        self.arguments.iter().find_map(|arg| match arg {
            CallArg::Object(id) => Some(*id),
            CallArg::Gas => None,
        })
    }
}

impl fmt::Display for MoveCall {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}(", self.target())?;
        for (i, arg) in self.arguments.iter().enumerate() {
            if i > 0 {
                f.write_str(", ")?;
            }
            match arg {
                CallArg::Object(id) => write!(f, "{id}")?,
                CallArg::Gas => f.write_str("gas")?,
            }
        }
        f.write_str(")")
    }
}

/// Raw Move object content: field name to decimal string.
pub type MoveFields = BTreeMap<String, String>;

/// A `HeroSword` object as the chain reports it.
///
/// Every numeric field travels as a decimal string. Missing fields take the
/// defaults the contract mints with. The chain's name and image fields are
/// ignored; the evolution table is the only source of display attributes.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct HeroSword {
    /// Object id.
    pub id: ObjectId,
    /// `level`: the evolution tier.
    pub tier: u32,
    /// `sword_type` as stored on chain.
    pub chain_type: TypeClass,
    /// `attack_power`
    pub attack_power: u32,
    /// `magic_power`
    pub magic_power: u32,
    /// `enhancement_count`
    pub enhancement_count: u32,
    /// `success_rate`
    pub success_rate: u8,
    /// `value` in MIST.
    pub value: Mist,
}

/// Value of a freshly minted sword as the contract stores it.
pub const CHAIN_DEFAULT_VALUE: u64 = 100;

fn field<T>(fields: &MoveFields, name: &str, default: T) -> LedgerResult<T>
where
    T: FromStr,
    T::Err: fmt::Display,
{
    match fields.get(name) {
        None => Ok(default),
        Some(raw) => raw
            .trim()
            .parse()
            .map_err(|e| LedgerError::Decode(format!("field {name}={raw:?}: {e}"))),
    }
}

impl HeroSword {
    /// Decodes the Move fields of an owned object.
    ///
    /// # Errors
    ///
    /// `Decode` if a present field is not a number of the right width.
    pub fn from_fields(id: ObjectId, fields: &MoveFields) -> LedgerResult<Self> {
        Ok(Self {
            id,
            tier: field(fields, "level", 1)?,
            chain_type: TypeClass(field(fields, "sword_type", 0)?),
            attack_power: field(fields, "attack_power", BASE_ATTACK_POWER)?,
            magic_power: field(fields, "magic_power", BASE_MAGIC_POWER)?,
            enhancement_count: field(fields, "enhancement_count", 0)?,
            success_rate: field(fields, "success_rate", BASE_SUCCESS_RATE)?,
            value: Mist::new(field(fields, "value", CHAIN_DEFAULT_VALUE)?),
        })
    }

    /// Encodes back into Move fields, name and image included.
    #[must_use]
    pub fn to_fields(&self) -> MoveFields {
        let info = tier_info(self.tier);
        [
            ("name", info.display_name.to_string()),
            ("image_url", info.artwork_ref.to_string()),
            ("level", self.tier.to_string()),
            ("sword_type", self.chain_type.to_string()),
            ("attack_power", self.attack_power.to_string()),
            ("magic_power", self.magic_power.to_string()),
            ("enhancement_count", self.enhancement_count.to_string()),
            ("success_rate", self.success_rate.to_string()),
            ("value", self.value.get().to_string()),
        ]
        .into_iter()
        .map(|(k, v)| (k.to_string(), v))
        .collect()
    }

    /// Mirrors an engine sword onto the chain layout.
    ///
    /// Returns `None` for local ids, which never exist on chain.
    #[must_use]
    pub fn from_sword(sword: &Sword) -> Option<Self> {
        let id = sword.id().object()?;
        Some(Self {
            id,
            tier: sword.tier(),
            chain_type: sword.type_class(),
            attack_power: sword.attack_power(),
            magic_power: sword.magic_power(),
            enhancement_count: sword.enhancement_count(),
            success_rate: sword.success_rate(),
            value: sword.value(),
        })
    }

    /// Converts into an engine sword.
    ///
    /// # Errors
    ///
    /// `Decode` if the object violates the sword invariants.
    pub fn to_sword(&self) -> LedgerResult<Sword> {
        Sword::try_from(SwordParts {
            id: SwordId::Object(self.id),
            tier: self.tier,
            enhancement_count: self.enhancement_count,
            attack_power: self.attack_power,
            magic_power: self.magic_power,
            success_rate: self.success_rate,
            value: self.value,
        })
        .map_err(|e| LedgerError::Decode(e.to_string()))
    }
}
