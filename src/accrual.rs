//! Idle accrual. Pure functions over [`GameState`], plus the periodic tick.

use crate::state::GameState;
use crate::store::{Slot, Store};
use crate::time::Clock;

/// Coins per second every player gets for free.
pub const BASE_RATE: f64 = 1.0;

/// How often the presentation layer should call [`catch_up`].
pub const TICK_INTERVAL_MS: u64 = 1000;

/// Coins per second right now.
pub fn current_rps(state: &GameState) -> f64 {
    BASE_RATE + state.perm_rps
}

/// Display-only rate per minute.
pub fn rate_per_minute(state: &GameState) -> f64 {
    current_rps(state) * 60.0
}

/// Credit every whole second elapsed since `last_ts`.
///
/// `last_ts` moves forward by whole seconds only, so the sub-second remainder
/// carries into the next call. The balance stops at `f64::MAX`.
/// Returns the number of seconds applied.
pub fn accrue(state: &mut GameState, now_ms: u64) -> u64 {
    let dt = now_ms.saturating_sub(state.last_ts) / 1000;
    if dt > 0 {
        state.coins = (state.coins + dt as f64 * current_rps(state)).min(f64::MAX);
        state.last_ts += dt * 1000;
    }
    dt
}

/// Periodic tick / visibility catch-up: load, accrue, save.
/// Returns the state to render.
pub fn catch_up<S: Slot, C: Clock>(store: &Store<S, C>) -> GameState {
    let now = store.now_ms();
    let (state, _) = store.update(|s| accrue(s, now));
    state
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::store::MemorySlot;
    use crate::time::ManualClock;

    #[test]
    fn base_rate_without_chores() {
        let s = GameState::new(0);
        assert!((current_rps(&s) - 1.0).abs() < 1e-9);
        assert!((rate_per_minute(&s) - 60.0).abs() < 1e-9);
    }

    #[test]
    fn perm_rps_adds_to_base() {
        let mut s = GameState::new(0);
        s.perm_rps = 0.5;
        assert!((current_rps(&s) - 1.5).abs() < 1e-9);
        assert!((rate_per_minute(&s) - 90.0).abs() < 1e-9);
    }

    #[test]
    fn accrue_whole_seconds() {
        let mut s = GameState::new(10_000);
        assert_eq!(accrue(&mut s, 13_000), 3);
        assert!((s.coins - 3.0).abs() < 1e-9);
        assert_eq!(s.last_ts, 13_000);
    }

    #[test]
    fn sub_second_remainder_carried_over() {
        let mut s = GameState::new(0);
        assert_eq!(accrue(&mut s, 1_700), 1);
        assert_eq!(s.last_ts, 1_000);
        // 700ms left over + 300ms = one more second
        assert_eq!(accrue(&mut s, 2_000), 1);
        assert!((s.coins - 2.0).abs() < 1e-9);
    }

    #[test]
    fn less_than_a_second_is_noop() {
        let mut s = GameState::new(5_000);
        let before = s.clone();
        assert_eq!(accrue(&mut s, 5_999), 0);
        assert_eq!(s, before);
    }

    #[test]
    fn clock_behind_last_ts_is_noop() {
        let mut s = GameState::new(5_000);
        let before = s.clone();
        assert_eq!(accrue(&mut s, 1_000), 0);
        assert_eq!(s, before);
    }

    #[test]
    fn balance_stays_finite_at_huge_rates() {
        let mut s = GameState::new(0);
        s.perm_rps = f64::MAX;
        assert_eq!(accrue(&mut s, 2_000), 2);
        assert_eq!(s.coins, f64::MAX);
        accrue(&mut s, 5_000);
        assert_eq!(s.coins, f64::MAX);
    }

    #[test]
    fn catch_up_persists() {
        let clock = ManualClock::new(1_000_000);
        let store = Store::new(MemorySlot::new(), &clock);
        store.save(&store.load()).unwrap();

        clock.advance(2_500);
        let s = catch_up(&store);
        assert!((s.coins - 2.0).abs() < 1e-9);
        assert_eq!(s.last_ts, 1_002_000);
        assert_eq!(store.load(), s);

        clock.advance(500);
        let s = catch_up(&store);
        assert!((s.coins - 3.0).abs() < 1e-9);
        assert_eq!(s.last_ts, 1_003_000);
    }
}
