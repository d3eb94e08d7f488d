//! Garden Idle: the core of an idle garden game.
//!
//! Coins trickle in every second; chores raise the rate for good, garden
//! upgrades spend coins, and three minigames pay out lump sums scaled by the
//! current rate. Everything here is UI-agnostic: the presentation layer
//! calls [`accrual::catch_up`] on a timer and on visibility change, sends
//! [`actions::Action`]s on input, and re-renders whatever state comes back.

pub mod accrual;
pub mod actions;
pub mod economy;
pub mod log;
pub mod minigames;
pub mod state;
pub mod store;
pub mod time;

pub use accrual::{accrue, catch_up, current_rps};
pub use actions::{dispatch, Action};
pub use state::{Chore, GameState, UpgradeKey};
pub use store::{MemorySlot, Slot, Store};
pub use time::{Clock, ManualClock, SystemClock};

#[cfg(target_arch = "wasm32")]
pub use store::LocalStorageSlot;

/// Store over `localStorage` and the browser clock.
#[cfg(target_arch = "wasm32")]
pub fn browser_store() -> Store<LocalStorageSlot, SystemClock> {
    Store::new(LocalStorageSlot, SystemClock)
}
