//! Odd-Tile-Out: nine tiles, one a shade darker. One pick decides it.

use rand::Rng;

use super::{grant, scaled_reward};
use crate::accrual::current_rps;
use crate::state::GameState;

pub const GRID_SIZE: usize = 3;
pub const TILE_COUNT: usize = GRID_SIZE * GRID_SIZE;

/// Reward = rps × this, at least 1.
pub const REWARD_FACTOR: f64 = 10.0;

const HUE: u16 = 210;
const SATURATION: u8 = 90;
const BASE_LIGHTNESS: u8 = 85;
/// How much darker the odd tile is.
const ODD_DARKEN: u8 = 12;

/// HSL colour of one tile. Purely visual.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct TileShade {
    pub hue: u16,
    pub saturation: u8,
    pub lightness: u8,
}

impl TileShade {
    /// CSS colour string, e.g. `hsl(210 90% 85%)`.
    pub fn css(&self) -> String {
        format!("hsl({} {}% {}%)", self.hue, self.saturation, self.lightness)
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum OddTileOutcome {
    /// Found it; `reward` coins were credited.
    Found { reward: u64 },
    /// Wrong tile. No reward.
    Missed,
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct OddTileSession {
    odd: usize,
}

impl OddTileSession {
    pub fn start(rng: &mut impl Rng) -> Self {
        Self {
            odd: rng.gen_range(0..TILE_COUNT),
        }
    }

    /// Session with a known odd tile (wrapped into range).
    pub fn with_odd(odd: usize) -> Self {
        Self {
            odd: odd % TILE_COUNT,
        }
    }

    pub fn odd_index(&self) -> usize {
        self.odd
    }

    pub fn tile_shade(&self, index: usize) -> TileShade {
        let lightness = if index == self.odd {
            BASE_LIGHTNESS - ODD_DARKEN
        } else {
            BASE_LIGHTNESS
        };
        TileShade {
            hue: HUE,
            saturation: SATURATION,
            lightness,
        }
    }

    /// Pick tile `index`. Consumes the session: there is no second try.
    /// An index outside the grid hands the session back untouched.
    pub fn pick(self, index: usize, state: &mut GameState) -> Result<OddTileOutcome, Self> {
        if index >= TILE_COUNT {
            return Err(self);
        }
        if index != self.odd {
            return Ok(OddTileOutcome::Missed);
        }
        let reward = scaled_reward(current_rps(state), REWARD_FACTOR);
        grant(state, reward, "odd tile");
        Ok(OddTileOutcome::Found { reward })
    }
}
