//! Garden economy: upgrade costs, chores, display helpers. Pure functions,
//! fully testable. Every command is a silent no-op on invalid input and
//! returns whether it changed anything.

use crate::state::{Chore, GameState, UpgradeDef, UpgradeKey};

/// Cost of going from `level` to `level + 1`. `None` once the upgrade is
/// maxed out (unreachable).
pub fn upgrade_cost(def: &UpgradeDef, level: u32) -> Option<u64> {
    if level >= def.max {
        return None;
    }
    Some((def.base * def.growth.powi(level as i32)).floor() as u64)
}

/// Cost of the next level of `key` for this state.
pub fn next_cost(state: &GameState, key: UpgradeKey) -> Option<u64> {
    upgrade_cost(key.def(), state.level(key))
}

/// Whether a purchase would go through (used to disable buttons).
pub fn can_purchase(state: &GameState, key: UpgradeKey) -> bool {
    next_cost(state, key).is_some_and(|cost| state.coins >= cost as f64)
}

/// Buy exactly one level of `key`.
pub fn purchase_upgrade(state: &mut GameState, key: UpgradeKey) -> bool {
    let Some(cost) = next_cost(state, key) else {
        return false;
    };
    let cost = cost as f64;
    if state.coins < cost {
        return false;
    }
    state.coins -= cost;
    *state.upgrades.entry(key).or_insert(0) += 1;
    true
}

/// Complete chore `index`: its `inc` is added to the permanent rate.
/// Chores are recurring, so this can be repeated forever. The rate stops at
/// `f64::MAX` so it always survives a save.
pub fn complete_chore(state: &mut GameState, index: usize) -> bool {
    let Some(inc) = state.chores.get(index).map(|c| c.inc) else {
        return false;
    };
    state.perm_rps = (state.perm_rps + inc).min(f64::MAX);
    true
}

/// Delete chore `index`. Rate already earned from it is kept.
pub fn remove_chore(state: &mut GameState, index: usize) -> bool {
    if index >= state.chores.len() {
        return false;
    }
    state.chores.remove(index);
    true
}

/// Append a chore from raw form input. Blank names are rejected; an
/// unparsable or negative increment becomes 0.
pub fn add_chore(state: &mut GameState, name: &str, inc: &str) -> bool {
    let name = name.trim();
    if name.is_empty() {
        return false;
    }
    state.chores.push(Chore::new(name, parse_inc(inc)));
    true
}

/// Parse a rate increment typed by the player.
pub fn parse_inc(raw: &str) -> f64 {
    raw.trim()
        .parse::<f64>()
        .ok()
        .filter(|x| x.is_finite() && *x >= 0.0)
        .unwrap_or(0.0)
}

/// Garden icon for `level`: the icon list is spread evenly over `0..=max`.
pub fn stage_icon(def: &UpgradeDef, level: u32) -> &'static str {
    let n = def.icons.len();
    if n == 0 {
        return "";
    }
    let level = level.min(def.max) as usize;
    let idx = if def.max == 0 {
        n - 1
    } else {
        (level * n / def.max as usize).min(n - 1)
    };
    def.icons[idx]
}

/// Coin amount as shown to the player: floored, with thousands separators.
pub fn format_coins(n: f64) -> String {
    let s = (n.max(0.0).floor() as u64).to_string();
    let mut result = String::new();
    for (i, c) in s.chars().rev().enumerate() {
        if i > 0 && i % 3 == 0 {
            result.push(',');
        }
        result.push(c);
    }
    result.chars().rev().collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::state::UPGRADES;

    fn tree() -> &'static UpgradeDef {
        UpgradeKey::Tree.def()
    }

    #[test]
    fn cost_examples() {
        assert_eq!(upgrade_cost(tree(), 0), Some(50));
        assert_eq!(upgrade_cost(tree(), 1), Some(90));
        assert_eq!(upgrade_cost(tree(), 3), Some(291));
    }

    #[test]
    fn cost_unreachable_at_max() {
        assert_eq!(upgrade_cost(tree(), 10), None);
        assert_eq!(upgrade_cost(tree(), 11), None);
        assert!(upgrade_cost(tree(), 9).is_some());
    }

    #[test]
    fn purchase_success() {
        let mut s = GameState::new(0);
        s.coins = 100.0;
        assert!(purchase_upgrade(&mut s, UpgradeKey::Tree));
        assert_eq!(s.level(UpgradeKey::Tree), 1);
        assert!((s.coins - 50.0).abs() < 1e-9);
    }

    #[test]
    fn purchase_insufficient_funds() {
        let mut s = GameState::new(0);
        s.coins = 49.9;
        assert!(!can_purchase(&s, UpgradeKey::Tree));
        assert!(!purchase_upgrade(&mut s, UpgradeKey::Tree));
        assert_eq!(s.level(UpgradeKey::Tree), 0);
        assert!((s.coins - 49.9).abs() < 1e-9);
    }

    #[test]
    fn purchase_at_max_is_noop() {
        let mut s = GameState::new(0);
        s.coins = 1e12;
        s.upgrades.insert(UpgradeKey::Pond, 10);
        assert!(!can_purchase(&s, UpgradeKey::Pond));
        assert!(!purchase_upgrade(&mut s, UpgradeKey::Pond));
        assert_eq!(s.level(UpgradeKey::Pond), 10);
        assert_eq!(s.coins, 1e12);
    }

    #[test]
    fn purchase_buys_one_level_only() {
        let mut s = GameState::new(0);
        s.coins = 1e9;
        purchase_upgrade(&mut s, UpgradeKey::Bench);
        assert_eq!(s.level(UpgradeKey::Bench), 1);
        assert!((s.coins - (1e9 - 80.0)).abs() < 1e-6);
    }

    #[test]
    fn chores_are_repeatable() {
        let mut s = GameState::new(0);
        assert!(complete_chore(&mut s, 0));
        assert!(complete_chore(&mut s, 0));
        assert!(complete_chore(&mut s, 2));
        assert!((s.perm_rps - 0.3).abs() < 1e-9);
    }

    #[test]
    fn huge_chore_rate_stays_finite() {
        let mut s = GameState::new(0);
        assert!(add_chore(&mut s, "Move a mountain", "1e308"));
        complete_chore(&mut s, 3);
        complete_chore(&mut s, 3);
        assert_eq!(s.perm_rps, f64::MAX);
    }

    #[test]
    fn complete_out_of_range_is_noop() {
        let mut s = GameState::new(0);
        assert!(!complete_chore(&mut s, 3));
        assert_eq!(s.perm_rps, 0.0);
    }

    #[test]
    fn remove_keeps_earned_rate() {
        let mut s = GameState::new(0);
        complete_chore(&mut s, 1);
        assert!(remove_chore(&mut s, 1));
        assert_eq!(s.chores.len(), 2);
        assert_eq!(s.chores[1].name, "Water plants");
        assert!((s.perm_rps - 0.1).abs() < 1e-9);
        assert!(!remove_chore(&mut s, 2));
    }

    #[test]
    fn add_chore_trims_and_parses() {
        let mut s = GameState::new(0);
        assert!(add_chore(&mut s, "  Walk dog ", "0.25"));
        assert_eq!(s.chores.last(), Some(&Chore::new("Walk dog", 0.25)));
    }

    #[test]
    fn add_chore_rejects_blank_name() {
        let mut s = GameState::new(0);
        assert!(!add_chore(&mut s, "", "1"));
        assert!(!add_chore(&mut s, "   \t", "1"));
        assert_eq!(s.chores.len(), 3);
    }

    #[test]
    fn add_chore_bad_inc_becomes_zero() {
        for raw in ["abc", "", "-1", "NaN", "inf"] {
            assert_eq!(parse_inc(raw), 0.0, "raw = {raw}");
        }
        let mut s = GameState::new(0);
        assert!(add_chore(&mut s, "Mop", "lots"));
        assert_eq!(s.chores.last().map(|c| c.inc), Some(0.0));
    }

    #[test]
    fn stage_icons_bucket_linearly() {
        let def = tree();
        assert_eq!(stage_icon(def, 0), "🌱");
        assert_eq!(stage_icon(def, 2), "🌱");
        assert_eq!(stage_icon(def, 3), "🌿");
        assert_eq!(stage_icon(def, 5), "🌳");
        assert_eq!(stage_icon(def, 8), "🌸");
        assert_eq!(stage_icon(def, 10), "🌸");
        assert_eq!(stage_icon(def, 99), "🌸");
    }

    #[test]
    fn format_coins_floors_and_groups() {
        assert_eq!(format_coins(0.0), "0");
        assert_eq!(format_coins(999.99), "999");
        assert_eq!(format_coins(1234.5), "1,234");
        assert_eq!(format_coins(1_234_567.0), "1,234,567");
    }

    #[test]
    fn every_def_has_increasing_costs() {
        for def in UPGRADES.iter() {
            let costs: Vec<u64> = (0..def.max).filter_map(|l| upgrade_cost(def, l)).collect();
            assert_eq!(costs.len(), def.max as usize);
            assert!(costs.windows(2).all(|w| w[0] < w[1]), "{}", def.label);
        }
    }
}
