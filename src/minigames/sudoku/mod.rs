//! Sudoku: fill a 9×9 puzzle from the bank with a 1–9 keypad.
//!
//! Given cells are locked. A conflict scan flags every cell that shares a
//! value with another cell in its row, column or 3×3 box. "Check" compares
//! the whole grid with the stored solution.

pub mod bank;

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

use super::{grant, scaled_reward};
use crate::accrual::current_rps;
use crate::state::GameState;

use bank::BANK;

pub const CELLS: usize = 81;
/// Reward = rps × this, at least 1.
pub const REWARD_FACTOR: f64 = 100.0;

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct Cell {
    pub value: Option<u8>,
    /// Part of the puzzle; cannot be edited.
    pub given: bool,
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub enum CheckOutcome {
    /// Grid matches the solution; `reward` coins were credited.
    Solved { reward: u64 },
    /// Not yet. Indices of cells to highlight.
    Unsolved { conflicts: Vec<usize> },
    /// Solved by an earlier check; nothing was credited this time.
    AlreadySolved,
}

/// Cells sharing a value with a peer in any row, column or box.
pub fn find_conflicts(cells: &[Cell; CELLS]) -> [bool; CELLS] {
    let mut flagged = [false; CELLS];
    for unit in units() {
        for (i, &a) in unit.iter().enumerate() {
            for &b in &unit[i + 1..] {
                if cells[a].value.is_some() && cells[a].value == cells[b].value {
                    flagged[a] = true;
                    flagged[b] = true;
                }
            }
        }
    }
    flagged
}

/// The 27 units: 9 rows, 9 columns, 9 boxes.
fn units() -> impl Iterator<Item = [usize; 9]> {
    let rows = (0..9).map(|r| std::array::from_fn::<usize, 9, _>(|k| r * 9 + k));
    let cols = (0..9).map(|c| std::array::from_fn::<usize, 9, _>(|k| k * 9 + c));
    let boxes = (0..9).map(|b| {
        let (br, bc) = (b / 3 * 3, b % 3 * 3);
        std::array::from_fn::<usize, 9, _>(|k| (br + k / 3) * 9 + bc + k % 3)
    });
    rows.chain(cols).chain(boxes)
}

pub struct SudokuSession {
    puzzle: usize,
    cells: [Cell; CELLS],
    selected: Option<usize>,
    rng: StdRng,
    solved: bool,
}

impl SudokuSession {
    /// Open a random puzzle from the bank.
    pub fn start(seed: u64) -> Self {
        let mut rng = StdRng::seed_from_u64(seed);
        let puzzle = rng.gen_range(0..BANK.len());
        Self::from_parts(puzzle, rng)
    }

    /// Open a specific bank entry (wrapped into range).
    pub fn with_puzzle(index: usize, seed: u64) -> Self {
        Self::from_parts(index % BANK.len(), StdRng::seed_from_u64(seed))
    }

    fn from_parts(puzzle: usize, rng: StdRng) -> Self {
        Self {
            puzzle,
            cells: load_givens(BANK[puzzle].givens),
            selected: None,
            rng,
            solved: false,
        }
    }

    pub fn puzzle_index(&self) -> usize {
        self.puzzle
    }

    pub fn cells(&self) -> &[Cell; CELLS] {
        &self.cells
    }

    pub fn selected(&self) -> Option<usize> {
        self.selected
    }

    pub fn is_solved(&self) -> bool {
        self.solved
    }

    /// Select an editable cell for keypad input. Given cells can't be picked.
    pub fn select(&mut self, index: usize) -> bool {
        if self.solved || !self.is_editable(index) {
            return false;
        }
        self.selected = Some(index);
        true
    }

    /// Keypad digit for the selected cell.
    pub fn press(&mut self, digit: u8) -> bool {
        match self.selected {
            Some(index) => self.set(index, digit),
            None => false,
        }
    }

    /// Clear the selected cell.
    pub fn erase(&mut self) -> bool {
        let Some(index) = self.selected else {
            return false;
        };
        if self.solved || !self.is_editable(index) {
            return false;
        }
        self.cells[index].value = None;
        true
    }

    /// Write `digit` (1–9) into an editable cell.
    pub fn set(&mut self, index: usize, digit: u8) -> bool {
        if self.solved || !self.is_editable(index) || !(1..=9).contains(&digit) {
            return false;
        }
        self.cells[index].value = Some(digit);
        true
    }

    fn is_editable(&self, index: usize) -> bool {
        self.cells.get(index).is_some_and(|c| !c.given)
    }

    /// The grid as 81 digits, `0` for blanks (same layout as the bank).
    pub fn grid_string(&self) -> String {
        self.cells
            .iter()
            .map(|c| char::from(b'0' + c.value.unwrap_or(0)))
            .collect()
    }

    /// Indices of currently conflicting cells.
    pub fn conflicts(&self) -> Vec<usize> {
        find_conflicts(&self.cells)
            .iter()
            .enumerate()
            .filter(|(_, flag)| **flag)
            .map(|(i, _)| i)
            .collect()
    }

    /// Compare with the solution. On a match the reward is credited and the
    /// session ends; otherwise the conflicts come back for highlighting.
    pub fn check(&mut self, state: &mut GameState) -> CheckOutcome {
        if self.solved {
            return CheckOutcome::AlreadySolved;
        }
        if self.grid_string() == BANK[self.puzzle].solution {
            self.solved = true;
            self.selected = None;
            let reward = scaled_reward(current_rps(state), REWARD_FACTOR);
            grant(state, reward, "sudoku");
            return CheckOutcome::Solved { reward };
        }
        CheckOutcome::Unsolved {
            conflicts: self.conflicts(),
        }
    }

    /// Throw away the current edits and draw another puzzle. The session
    /// stays open.
    pub fn new_puzzle(&mut self) {
        let mut next = self.rng.gen_range(0..BANK.len());
        if BANK.len() > 1 && next == self.puzzle {
            next = (next + 1) % BANK.len();
        }
        self.puzzle = next;
        self.cells = load_givens(BANK[next].givens);
        self.selected = None;
        self.solved = false;
    }
}

fn load_givens(givens: &str) -> [Cell; CELLS] {
    let mut cells = [Cell::default(); CELLS];
    for (cell, b) in cells.iter_mut().zip(givens.bytes()) {
        let digit = b.wrapping_sub(b'0');
        if (1..=9).contains(&digit) {
            *cell = Cell {
                value: Some(digit),
                given: true,
            };
        }
    }
    cells
}

#[cfg(test)]
mod tests {
    use super::*;

    fn solution_digits(puzzle: usize) -> Vec<u8> {
        BANK[puzzle].solution.bytes().map(|b| b - b'0').collect()
    }

    /// Fill every blank with its solution digit.
    fn fill_in(session: &mut SudokuSession) {
        let solution = solution_digits(session.puzzle_index());
        for (i, d) in solution.into_iter().enumerate() {
            if !session.cells()[i].given {
                assert!(session.set(i, d));
            }
        }
    }

    fn first_blank(session: &SudokuSession) -> usize {
        session.cells().iter().position(|c| !c.given).unwrap()
    }

    #[test]
    fn start_loads_givens_locked() {
        let session = SudokuSession::with_puzzle(0, 1);
        assert_eq!(session.grid_string(), BANK[0].givens);
        assert!(session.cells()[0].given);
        assert_eq!(session.cells()[0].value, Some(5));
        assert!(!session.cells()[2].given);
        assert!(session.conflicts().is_empty());
    }

    #[test]
    fn givens_cannot_be_edited() {
        let mut session = SudokuSession::with_puzzle(0, 1);
        assert!(!session.select(0));
        assert!(!session.set(0, 9));
        assert_eq!(session.cells()[0].value, Some(5));
    }

    #[test]
    fn keypad_writes_selected_cell() {
        let mut session = SudokuSession::with_puzzle(0, 1);
        let blank = first_blank(&session);
        assert!(!session.press(4));
        assert!(session.select(blank));
        assert!(session.press(4));
        assert_eq!(session.cells()[blank].value, Some(4));
        assert!(!session.press(0));
        assert!(!session.press(10));
        assert!(session.erase());
        assert_eq!(session.cells()[blank].value, None);
    }

    #[test]
    fn duplicate_in_row_is_flagged() {
        let mut session = SudokuSession::with_puzzle(0, 1);
        // Row 0 is 5 3 _ _ 7 ...; a second 5 at index 2 clashes with index 0.
        assert!(session.set(2, 5));
        let conflicts = session.conflicts();
        assert!(conflicts.contains(&0));
        assert!(conflicts.contains(&2));
    }

    #[test]
    fn duplicate_in_column_and_box_is_flagged() {
        let cells = {
            let mut c = [Cell::default(); CELLS];
            c[0].value = Some(7);
            c[72].value = Some(7); // same column
            c[40].value = Some(3);
            c[50].value = Some(3); // same box (rows 3-5, cols 3-5)
            c
        };
        let flagged = find_conflicts(&cells);
        assert!(flagged[0] && flagged[72]);
        assert!(flagged[40] && flagged[50]);
        assert_eq!(flagged.iter().filter(|f| **f).count(), 4);
    }

    #[test]
    fn full_correct_grid_is_solved() {
        let mut session = SudokuSession::with_puzzle(1, 1);
        fill_in(&mut session);
        assert_eq!(session.grid_string(), BANK[1].solution);

        let mut s = GameState::new(0);
        s.perm_rps = 0.25;
        assert_eq!(
            session.check(&mut s),
            CheckOutcome::Solved { reward: 125 }
        );
        assert!((s.coins - 125.0).abs() < 1e-9);
        assert!(session.is_solved());

        // No double payout, no more edits.
        assert_eq!(session.check(&mut s), CheckOutcome::AlreadySolved);
        assert!((s.coins - 125.0).abs() < 1e-9);
        assert!(!session.set(first_blank(&session), 1));
    }

    #[test]
    fn single_wrong_digit_is_not_solved_and_conflicts() {
        let mut session = SudokuSession::with_puzzle(2, 1);
        fill_in(&mut session);
        let blank = first_blank(&session);
        let right = session.cells()[blank].value.unwrap();
        let wrong = right % 9 + 1;
        assert!(session.set(blank, wrong));

        let mut s = GameState::new(0);
        match session.check(&mut s) {
            CheckOutcome::Unsolved { conflicts } => assert!(conflicts.contains(&blank)),
            other => panic!("expected unsolved, got {other:?}"),
        }
        assert_eq!(s.coins, 0.0);
        assert!(!session.is_solved());
    }

    #[test]
    fn incomplete_grid_is_not_solved() {
        let mut session = SudokuSession::with_puzzle(3, 1);
        let mut s = GameState::new(0);
        assert_eq!(
            session.check(&mut s),
            CheckOutcome::Unsolved { conflicts: vec![] }
        );
    }

    #[test]
    fn new_puzzle_discards_edits() {
        let mut session = SudokuSession::with_puzzle(0, 5);
        let blank = first_blank(&session);
        session.select(blank);
        session.press(1);
        session.new_puzzle();
        assert_ne!(session.puzzle_index(), 0);
        assert_eq!(session.selected(), None);
        assert_eq!(session.grid_string(), BANK[session.puzzle_index()].givens);
    }

    #[test]
    fn start_picks_from_bank() {
        for seed in 0..20 {
            assert!(SudokuSession::start(seed).puzzle_index() < BANK.len());
        }
    }
}
