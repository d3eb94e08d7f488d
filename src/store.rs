//! Garden Idle のセーブ/ロード。
//!
//! ## 方針
//!
//! - 永続化先は key-value スロット 1 つだけ（ブラウザでは `localStorage`）。
//! - 操作ごとに「ロード → 変更 → セーブ」を行い、メモリ上に長生きする状態は持たない。
//!   セーブはレコード全体の上書きで、最後に書いた者が勝つ。
//! - ロードは決して失敗しない。スロットが空・壊れている場合はデフォルト状態を返す。
//! - 旧形式のデータはフィールド単位で救済する: 文字列だけの家事は
//!   `{name, inc: 0.10}` に移行し、知らないアップグレードキーは捨て、
//!   足りないキーはレベル 0 で補う。

use std::cell::RefCell;
use std::collections::{BTreeMap, HashMap};

use serde_json::{Map, Value};
use thiserror::Error;

use crate::log;
use crate::state::{default_upgrades, Chore, GameState, UpgradeKey, LEGACY_CHORE_INC};
use crate::time::Clock;

/// localStorage のキー。
pub const STORAGE_KEY: &str = "bs-upgrade-state";

/// Failure talking to the key-value backend.
#[derive(Debug, Error, PartialEq)]
pub enum SlotError {
    #[error("storage backend unavailable")]
    Unavailable,
    #[error("failed to read slot: {0}")]
    Read(String),
    #[error("failed to write slot: {0}")]
    Write(String),
}

#[derive(Debug, Error)]
pub enum StoreError {
    #[error("failed to serialize game state: {0}")]
    Serialize(#[from] serde_json::Error),
    #[error(transparent)]
    Slot(#[from] SlotError),
}

/// A local key-value slot holding strings.
pub trait Slot {
    fn read(&self, key: &str) -> Result<Option<String>, SlotError>;
    fn write(&self, key: &str, value: &str) -> Result<(), SlotError>;
    fn remove(&self, key: &str) -> Result<(), SlotError>;
}

/// In-memory slot for native builds and tests.
#[derive(Debug, Default)]
pub struct MemorySlot {
    items: RefCell<HashMap<String, String>>,
}

impl MemorySlot {
    pub fn new() -> Self {
        Self::default()
    }

    /// Slot pre-filled with raw text under [`STORAGE_KEY`], e.g. an old save.
    pub fn with_raw(raw: &str) -> Self {
        let slot = Self::new();
        slot.items
            .borrow_mut()
            .insert(STORAGE_KEY.to_string(), raw.to_string());
        slot
    }

    /// Raw text currently stored under [`STORAGE_KEY`].
    pub fn raw(&self) -> Option<String> {
        self.items.borrow().get(STORAGE_KEY).cloned()
    }
}

impl Slot for MemorySlot {
    fn read(&self, key: &str) -> Result<Option<String>, SlotError> {
        Ok(self.items.borrow().get(key).cloned())
    }

    fn write(&self, key: &str, value: &str) -> Result<(), SlotError> {
        self.items
            .borrow_mut()
            .insert(key.to_string(), value.to_string());
        Ok(())
    }

    fn remove(&self, key: &str) -> Result<(), SlotError> {
        self.items.borrow_mut().remove(key);
        Ok(())
    }
}

/// `window.localStorage`. WASM 環境でのみ動作。
#[cfg(target_arch = "wasm32")]
#[derive(Debug, Default)]
pub struct LocalStorageSlot;

#[cfg(target_arch = "wasm32")]
impl LocalStorageSlot {
    fn storage(&self) -> Result<web_sys::Storage, SlotError> {
        web_sys::window()
            .ok_or(SlotError::Unavailable)?
            .local_storage()
            .map_err(|e| SlotError::Read(format!("{e:?}")))?
            .ok_or(SlotError::Unavailable)
    }
}

#[cfg(target_arch = "wasm32")]
impl Slot for LocalStorageSlot {
    fn read(&self, key: &str) -> Result<Option<String>, SlotError> {
        self.storage()?
            .get_item(key)
            .map_err(|e| SlotError::Read(format!("{e:?}")))
    }

    fn write(&self, key: &str, value: &str) -> Result<(), SlotError> {
        self.storage()?
            .set_item(key, value)
            .map_err(|e| SlotError::Write(format!("{e:?}")))
    }

    fn remove(&self, key: &str) -> Result<(), SlotError> {
        self.storage()?
            .remove_item(key)
            .map_err(|e| SlotError::Write(format!("{e:?}")))
    }
}

/// Load/save pair over one slot. Holds no game state of its own.
pub struct Store<S, C> {
    slot: S,
    clock: C,
}

impl<S: Slot, C: Clock> Store<S, C> {
    pub fn new(slot: S, clock: C) -> Self {
        Self { slot, clock }
    }

    pub fn slot(&self) -> &S {
        &self.slot
    }

    pub fn now_ms(&self) -> u64 {
        self.clock.now_ms()
    }

    /// Fresh copy of the persisted state, or defaults when there is none.
    pub fn load(&self) -> GameState {
        let now = self.clock.now_ms();
        match self.slot.read(STORAGE_KEY) {
            Ok(Some(raw)) => merge_saved(&raw, now),
            Ok(None) => GameState::new(now),
            Err(e) => {
                log::warn(&format!("セーブデータを読めません（新規状態で続行）: {e}"));
                GameState::new(now)
            }
        }
    }

    /// Overwrite the slot with the whole state.
    pub fn save(&self, state: &GameState) -> Result<(), StoreError> {
        let json = serde_json::to_string(state)?;
        self.slot.write(STORAGE_KEY, &json)?;
        Ok(())
    }

    /// Load, mutate, save. Returns the saved state (for rendering) and
    /// whatever `f` returned. A failed save is logged, not surfaced.
    pub fn update<R>(&self, f: impl FnOnce(&mut GameState) -> R) -> (GameState, R) {
        let mut state = self.load();
        let out = f(&mut state);
        if let Err(e) = self.save(&state) {
            log::warn(&format!("セーブに失敗: {e}"));
        }
        (state, out)
    }

    /// Drop the persisted record entirely.
    pub fn clear(&self) -> Result<(), StoreError> {
        self.slot.remove(STORAGE_KEY)?;
        Ok(())
    }
}

/// Merge a persisted record over defaults, field by field.
/// Any field that is missing or has the wrong shape keeps its default.
pub fn merge_saved(raw: &str, now_ms: u64) -> GameState {
    let mut state = GameState::new(now_ms);

    let obj = match serde_json::from_str::<Value>(raw) {
        Ok(Value::Object(obj)) => obj,
        Ok(_) => {
            log::warn("セーブデータがオブジェクトではありません（破棄します）");
            return state;
        }
        Err(e) => {
            log::warn(&format!("セーブデータのパースに失敗（破棄します）: {e}"));
            return state;
        }
    };

    if let Some(coins) = obj.get("coins").and_then(non_negative) {
        state.coins = coins;
    }
    if let Some(ts) = obj.get("lastTs").and_then(non_negative) {
        // 端末の時計が戻った場合でも lastTs が now を超えないようにする
        state.last_ts = (ts.floor() as u64).min(now_ms);
    }
    if let Some(rps) = obj.get("permRps").and_then(non_negative) {
        state.perm_rps = rps;
    }
    if let Some(Value::Array(items)) = obj.get("chores") {
        state.chores = merge_chores(items);
    }
    if let Some(Value::Object(levels)) = obj.get("upgrades") {
        state.upgrades = merge_upgrades(levels);
    }

    state
}

fn non_negative(v: &Value) -> Option<f64> {
    v.as_f64().filter(|x| x.is_finite() && *x >= 0.0)
}

fn merge_chores(items: &[Value]) -> Vec<Chore> {
    let mut migrated = 0;
    let chores: Vec<Chore> = items
        .iter()
        .filter_map(|item| match item {
            Value::String(name) => {
                migrated += 1;
                Some(Chore::new(name.clone(), LEGACY_CHORE_INC))
            }
            Value::Object(fields) => {
                let name = fields.get("name")?.as_str()?;
                let inc = fields.get("inc").and_then(non_negative).unwrap_or(0.0);
                Some(Chore::new(name, inc))
            }
            _ => None,
        })
        .collect();
    if migrated > 0 {
        log::info(&format!("旧形式の家事 {migrated} 件をマイグレーション"));
    }
    chores
}

fn merge_upgrades(levels: &Map<String, Value>) -> BTreeMap<UpgradeKey, u32> {
    let mut upgrades = default_upgrades();
    for (name, value) in levels {
        let Some(key) = UpgradeKey::parse(name) else {
            log::info(&format!("未知のアップグレード '{name}' を破棄"));
            continue;
        };
        let level = value
            .as_u64()
            .map(|l| l.min(key.def().max as u64) as u32)
            .unwrap_or(0);
        upgrades.insert(key, level);
    }
    upgrades
}
