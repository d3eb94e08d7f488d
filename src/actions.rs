//! Commands the presentation layer sends to the core.
//!
//! Every action runs as its own load → apply → save transaction against the
//! store, so a UI handler never holds game state between events.

use crate::accrual::accrue;
use crate::economy;
use crate::minigames::grant;
use crate::state::{GameState, UpgradeKey};
use crate::store::{Slot, Store};
use crate::time::Clock;

#[derive(Clone, Debug, PartialEq)]
pub enum Action {
    /// Periodic tick or tab became visible again.
    Tick,
    PurchaseUpgrade(UpgradeKey),
    CompleteChore(usize),
    RemoveChore(usize),
    /// Raw text from the "add chore" form.
    AddChore { name: String, inc: String },
    /// Lump sum from a minigame that has already been scored.
    GrantReward(u64),
}

/// Apply one action to an in-memory state. Returns whether it changed anything.
pub fn apply(state: &mut GameState, action: &Action, now_ms: u64) -> bool {
    match action {
        Action::Tick => accrue(state, now_ms) > 0,
        Action::PurchaseUpgrade(key) => economy::purchase_upgrade(state, *key),
        Action::CompleteChore(index) => economy::complete_chore(state, *index),
        Action::RemoveChore(index) => economy::remove_chore(state, *index),
        Action::AddChore { name, inc } => economy::add_chore(state, name, inc),
        Action::GrantReward(amount) => {
            grant(state, *amount, "reward");
            true
        }
    }
}

/// Load, apply, save. Returns the state to re-render and whether the action
/// did anything.
pub fn dispatch<S: Slot, C: Clock>(store: &Store<S, C>, action: &Action) -> (GameState, bool) {
    let now = store.now_ms();
    store.update(|state| apply(state, action, now))
}
