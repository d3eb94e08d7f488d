//! Minigames: self-contained sessions that pay out relative to the
//! player's current rate.

pub mod match3;
pub mod odd_tile;
pub mod sudoku;

use rand::rngs::StdRng;
use rand::SeedableRng;

use crate::log;
use crate::state::GameState;

use match3::Match3Session;
use odd_tile::OddTileSession;
use sudoku::SudokuSession;

/// `floor(rps × factor)`, never less than 1 coin. Saturates at `u64::MAX`.
pub fn scaled_reward(rps: f64, factor: f64) -> u64 {
    let raw = (rps * factor).floor();
    if raw >= 1.0 {
        raw as u64
    } else {
        1
    }
}

/// Credit a minigame reward to the balance.
pub fn grant(state: &mut GameState, reward: u64, source: &str) {
    state.coins = (state.coins + reward as f64).min(f64::MAX);
    log::info(&format!("{source}: {reward} コイン獲得"));
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum MinigameKind {
    OddTile,
    Match3,
    Sudoku,
}

impl MinigameKind {
    pub fn all() -> &'static [MinigameKind] {
        &[MinigameKind::OddTile, MinigameKind::Match3, MinigameKind::Sudoku]
    }

    pub fn name(&self) -> &str {
        match self {
            MinigameKind::OddTile => "Odd Tile Out",
            MinigameKind::Match3 => "Garden Match",
            MinigameKind::Sudoku => "Sudoku",
        }
    }
}

/// Whichever minigame is currently open. Dropping it cancels the session
/// with no reward.
pub enum Session {
    OddTile(OddTileSession),
    Match3(Match3Session),
    Sudoku(SudokuSession),
}

impl Session {
    /// Open a new session. `seed` drives all of its randomness.
    pub fn start(kind: MinigameKind, seed: u64, now_ms: u64) -> Self {
        match kind {
            MinigameKind::OddTile => {
                let mut rng = StdRng::seed_from_u64(seed);
                Session::OddTile(OddTileSession::start(&mut rng))
            }
            MinigameKind::Match3 => Session::Match3(Match3Session::start(seed, now_ms)),
            MinigameKind::Sudoku => Session::Sudoku(SudokuSession::start(seed)),
        }
    }

    pub fn kind(&self) -> MinigameKind {
        match self {
            Session::OddTile(_) => MinigameKind::OddTile,
            Session::Match3(_) => MinigameKind::Match3,
            Session::Sudoku(_) => MinigameKind::Sudoku,
        }
    }
}
