/// Garden Idle game state definitions.
use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

/// `inc` given to chores migrated from the old plain-string format.
pub const LEGACY_CHORE_INC: f64 = 0.10;

/// Chores a brand-new save starts with.
pub const DEFAULT_CHORES: [&str; 3] = ["Fold laundry", "Empty dishwasher", "Water plants"];

/// Garden features that can be upgraded.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum UpgradeKey {
    Tree,
    Bench,
    Pond,
}

impl UpgradeKey {
    /// All upgrade keys in display order.
    pub fn all() -> &'static [UpgradeKey] {
        &[UpgradeKey::Tree, UpgradeKey::Bench, UpgradeKey::Pond]
    }

    /// Key as stored in the save record.
    pub fn as_str(&self) -> &'static str {
        match self {
            UpgradeKey::Tree => "tree",
            UpgradeKey::Bench => "bench",
            UpgradeKey::Pond => "pond",
        }
    }

    /// Reverse of [`UpgradeKey::as_str`]. Unknown keys yield `None`.
    pub fn parse(s: &str) -> Option<UpgradeKey> {
        UpgradeKey::all().iter().copied().find(|k| k.as_str() == s)
    }

    /// Static definition for this key.
    pub fn def(&self) -> &'static UpgradeDef {
        match self {
            UpgradeKey::Tree => &UPGRADES[0],
            UpgradeKey::Bench => &UPGRADES[1],
            UpgradeKey::Pond => &UPGRADES[2],
        }
    }
}

/// Static description of one garden feature.
#[derive(Debug)]
pub struct UpgradeDef {
    pub key: UpgradeKey,
    pub label: &'static str,
    /// Cost of the first level.
    pub base: f64,
    /// Per-level cost multiplier (> 1).
    pub growth: f64,
    pub max: u32,
    /// Stage icons, first = untouched, last = fully grown.
    pub icons: &'static [&'static str],
}

pub static UPGRADES: [UpgradeDef; 3] = [
    UpgradeDef {
        key: UpgradeKey::Tree,
        label: "Tree",
        base: 50.0,
        growth: 1.8,
        max: 10,
        icons: &["🌱", "🌿", "🌳", "🌸"],
    },
    UpgradeDef {
        key: UpgradeKey::Bench,
        label: "Bench",
        base: 80.0,
        growth: 1.8,
        max: 10,
        icons: &["🪵", "🪑", "🪑✨", "🪑🌼"],
    },
    UpgradeDef {
        key: UpgradeKey::Pond,
        label: "Pond",
        base: 100.0,
        growth: 1.8,
        max: 10,
        icons: &["💧", "🌊", "🐟", "🦆"],
    },
];

/// A recurring real-world task. Completing it adds `inc` to the permanent rate.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Chore {
    pub name: String,
    pub inc: f64,
}

impl Chore {
    pub fn new(name: impl Into<String>, inc: f64) -> Self {
        Self {
            name: name.into(),
            inc,
        }
    }
}

/// The single persisted record.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GameState {
    /// Coin balance. Fractional; displayed floored.
    pub coins: f64,
    /// Epoch ms up to which accrual has been applied.
    pub last_ts: u64,
    /// Permanent rate bonus earned from chores.
    pub perm_rps: f64,
    pub chores: Vec<Chore>,
    /// Level per upgrade key, always holding every key in [`UpgradeKey::all`].
    pub upgrades: BTreeMap<UpgradeKey, u32>,
}

impl GameState {
    /// Fresh state for a player with no save.
    pub fn new(now_ms: u64) -> Self {
        Self {
            coins: 0.0,
            last_ts: now_ms,
            perm_rps: 0.0,
            chores: default_chores(),
            upgrades: default_upgrades(),
        }
    }

    /// Current level of an upgrade (0 when absent).
    pub fn level(&self, key: UpgradeKey) -> u32 {
        self.upgrades.get(&key).copied().unwrap_or(0)
    }
}

pub fn default_chores() -> Vec<Chore> {
    DEFAULT_CHORES
        .iter()
        .map(|name| Chore::new(*name, LEGACY_CHORE_INC))
        .collect()
}

pub fn default_upgrades() -> BTreeMap<UpgradeKey, u32> {
    UpgradeKey::all().iter().map(|k| (*k, 0)).collect()
}
