//! Garden Match: a 5×5 match-3 with cascades on a 60-second clock.
//!
//! [`Board`] holds the pure grid algorithms (run detection, clearing,
//! gravity, cascade resolution). [`Match3Session`] adds selection, score and
//! the countdown, and leaves the pacing of cascade waves to the caller.

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

use super::{grant, scaled_reward};
use crate::accrual::current_rps;
use crate::state::GameState;
use crate::time::Countdown;

pub const SIZE: usize = 5;
/// Number of distinct symbols.
pub const KINDS: u8 = 5;
/// Shortest run that counts as a match.
pub const MIN_RUN: usize = 3;
/// Round length.
pub const ROUND_MS: u64 = 60_000;
/// Suggested pause between cascade waves when animating.
pub const CASCADE_DELAY_MS: u64 = 250;
/// Reward = rps × max(this, score), at least 1.
pub const MIN_SCORE_FACTOR: u32 = 5;

/// Display glyph per symbol kind.
pub const SYMBOLS: [&str; KINDS as usize] = ["🌷", "🌻", "🍄", "🍓", "🐝"];

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct Pos {
    pub row: usize,
    pub col: usize,
}

impl Pos {
    pub fn new(row: usize, col: usize) -> Self {
        Self { row, col }
    }

    pub fn in_bounds(&self) -> bool {
        self.row < SIZE && self.col < SIZE
    }

    /// Orthogonal neighbours only.
    pub fn is_adjacent(&self, other: Pos) -> bool {
        self.row.abs_diff(other.row) + self.col.abs_diff(other.col) == 1
    }
}

/// A straight line of ≥ [`MIN_RUN`] identical symbols.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Run {
    pub cells: Vec<Pos>,
}

impl Run {
    pub fn len(&self) -> usize {
        self.cells.len()
    }

    pub fn is_empty(&self) -> bool {
        self.cells.is_empty()
    }
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Board {
    cells: [[u8; SIZE]; SIZE],
}

impl Board {
    /// Board from explicit rows. Symbols are wrapped into `0..KINDS`.
    pub fn from_rows(rows: [[u8; SIZE]; SIZE]) -> Self {
        let mut cells = rows;
        for row in cells.iter_mut() {
            for cell in row.iter_mut() {
                *cell %= KINDS;
            }
        }
        Self { cells }
    }

    /// Random board with no ready-made runs.
    pub fn random(rng: &mut impl Rng) -> Self {
        let mut cells = [[0u8; SIZE]; SIZE];
        for row in 0..SIZE {
            for col in 0..SIZE {
                loop {
                    let kind = rng.gen_range(0..KINDS);
                    let left_run =
                        col >= 2 && cells[row][col - 1] == kind && cells[row][col - 2] == kind;
                    let up_run =
                        row >= 2 && cells[row - 1][col] == kind && cells[row - 2][col] == kind;
                    if !left_run && !up_run {
                        cells[row][col] = kind;
                        break;
                    }
                }
            }
        }
        Self { cells }
    }

    pub fn get(&self, pos: Pos) -> Option<u8> {
        self.cells.get(pos.row)?.get(pos.col).copied()
    }

    pub fn rows(&self) -> &[[u8; SIZE]; SIZE] {
        &self.cells
    }

    fn swap(&mut self, a: Pos, b: Pos) {
        let tmp = self.cells[a.row][a.col];
        self.cells[a.row][a.col] = self.cells[b.row][b.col];
        self.cells[b.row][b.col] = tmp;
    }

    /// All horizontal and vertical runs. A cell can belong to one of each.
    pub fn find_runs(&self) -> Vec<Run> {
        let mut runs = Vec::new();
        for row in 0..SIZE {
            collect_runs(&mut runs, (0..SIZE).map(|col| Pos::new(row, col)), self);
        }
        for col in 0..SIZE {
            collect_runs(&mut runs, (0..SIZE).map(|row| Pos::new(row, col)), self);
        }
        runs
    }

    pub fn has_runs(&self) -> bool {
        !self.find_runs().is_empty()
    }

    /// Whether some run passes through `pos`.
    pub fn has_run_at(&self, pos: Pos) -> bool {
        self.find_runs().iter().any(|run| run.cells.contains(&pos))
    }

    /// Swap two neighbours, keeping the swap only if a run now passes
    /// through one of the two cells. Runs elsewhere on the board don't count.
    /// Returns whether the swap was kept.
    pub fn try_swap(&mut self, a: Pos, b: Pos) -> bool {
        if !a.in_bounds() || !b.in_bounds() || !a.is_adjacent(b) {
            return false;
        }
        self.swap(a, b);
        if self.has_run_at(a) || self.has_run_at(b) {
            true
        } else {
            self.swap(a, b);
            false
        }
    }

    /// One cascade wave: score and clear every current run, let columns
    /// fall, refill from the top. Returns the points scored (0 = stable).
    pub fn resolve_step(&mut self, rng: &mut impl Rng) -> u32 {
        let runs = self.find_runs();
        if runs.is_empty() {
            return 0;
        }

        let mut cleared = [[false; SIZE]; SIZE];
        let mut points = 0;
        for run in &runs {
            points += run.len() as u32;
            for p in &run.cells {
                cleared[p.row][p.col] = true;
            }
        }

        for col in 0..SIZE {
            let survivors: Vec<u8> = (0..SIZE)
                .rev()
                .filter(|&row| !cleared[row][col])
                .map(|row| self.cells[row][col])
                .collect();
            for (i, row) in (0..SIZE).rev().enumerate() {
                self.cells[row][col] = match survivors.get(i) {
                    Some(&kind) => kind,
                    None => rng.gen_range(0..KINDS),
                };
            }
        }
        points
    }

    /// Cascade until stable. Returns the total points.
    pub fn resolve_all(&mut self, rng: &mut impl Rng) -> u32 {
        let mut total = 0;
        loop {
            let points = self.resolve_step(rng);
            if points == 0 {
                return total;
            }
            total += points;
        }
    }
}

fn collect_runs(runs: &mut Vec<Run>, line: impl Iterator<Item = Pos>, board: &Board) {
    let mut current: Vec<Pos> = Vec::new();
    for pos in line {
        let same = current
            .last()
            .is_some_and(|&prev| board.get(prev) == board.get(pos));
        if !same {
            if current.len() >= MIN_RUN {
                runs.push(Run {
                    cells: std::mem::take(&mut current),
                });
            }
            current.clear();
        }
        current.push(pos);
    }
    if current.len() >= MIN_RUN {
        runs.push(Run { cells: current });
    }
}

/// What a tap on the board did.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum SelectOutcome {
    /// First cell of a pair picked (or selection moved to a non-neighbour).
    Selected,
    /// Tapped the selected cell again.
    Deselected,
    /// Swap kept; a cascade is now pending.
    Swapped,
    /// Swap made no run and was undone.
    Reverted,
    /// Round over, cascade running, or tap off the board.
    Ignored,
}

pub struct Match3Session {
    board: Board,
    score: u32,
    selected: Option<Pos>,
    countdown: Countdown,
    rng: StdRng,
    cascading: bool,
    finished: bool,
}

impl Match3Session {
    pub fn start(seed: u64, now_ms: u64) -> Self {
        let mut rng = StdRng::seed_from_u64(seed);
        let board = Board::random(&mut rng);
        Self::from_parts(board, rng, now_ms)
    }

    /// Session over a known board.
    pub fn with_board(board: Board, seed: u64, now_ms: u64) -> Self {
        Self::from_parts(board, StdRng::seed_from_u64(seed), now_ms)
    }

    fn from_parts(board: Board, rng: StdRng, now_ms: u64) -> Self {
        Self {
            board,
            score: 0,
            selected: None,
            countdown: Countdown::start(now_ms, ROUND_MS),
            rng,
            cascading: false,
            finished: false,
        }
    }

    pub fn board(&self) -> &Board {
        &self.board
    }

    pub fn score(&self) -> u32 {
        self.score
    }

    pub fn selected(&self) -> Option<Pos> {
        self.selected
    }

    pub fn is_cascading(&self) -> bool {
        self.cascading
    }

    pub fn is_finished(&self) -> bool {
        self.finished
    }

    pub fn remaining_secs(&self, now_ms: u64) -> u64 {
        self.countdown.remaining_secs(now_ms)
    }

    /// Tap a cell. The second tap of an adjacent pair attempts the swap, and
    /// the selection is cleared whatever the result.
    pub fn select(&mut self, pos: Pos, now_ms: u64) -> SelectOutcome {
        if self.finished
            || self.cascading
            || self.countdown.is_expired(now_ms)
            || !pos.in_bounds()
        {
            return SelectOutcome::Ignored;
        }

        let Some(first) = self.selected else {
            self.selected = Some(pos);
            return SelectOutcome::Selected;
        };
        if first == pos {
            self.selected = None;
            return SelectOutcome::Deselected;
        }
        if !first.is_adjacent(pos) {
            self.selected = Some(pos);
            return SelectOutcome::Selected;
        }

        self.selected = None;
        if self.board.try_swap(first, pos) {
            self.cascading = true;
            SelectOutcome::Swapped
        } else {
            SelectOutcome::Reverted
        }
    }

    /// Resolve one cascade wave, adding its points to the score.
    /// Returns `None` when nothing was pending.
    pub fn cascade_step(&mut self) -> Option<u32> {
        if !self.cascading {
            return None;
        }
        let points = self.board.resolve_step(&mut self.rng);
        self.score += points;
        self.cascading = self.board.has_runs();
        Some(points)
    }

    /// Resolve the pending cascade in one go.
    pub fn settle(&mut self) -> u32 {
        let mut total = 0;
        while let Some(points) = self.cascade_step() {
            total += points;
        }
        total
    }

    /// Check the clock. On expiry the round ends and the reward is credited
    /// from whatever has been scored so far, even mid-cascade.
    pub fn poll(&mut self, now_ms: u64, state: &mut GameState) -> Option<u64> {
        if self.finished || !self.countdown.is_expired(now_ms) {
            return None;
        }
        self.finished = true;
        self.cascading = false;
        self.selected = None;
        let factor = self.score.max(MIN_SCORE_FACTOR) as f64;
        let reward = scaled_reward(current_rps(state), factor);
        grant(state, reward, "garden match");
        Some(reward)
    }
}
