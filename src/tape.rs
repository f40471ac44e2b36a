//! This module defines the `Tape`, the interpreter's memory: a zero-initialized buffer of cells
//! with a cursor that can move arbitrarily far in either direction.
//!
//! The buffer doubles whenever the cursor would leave it. Growing to the left inserts the new
//! cells in front of the existing ones and shifts the cursor with them, so logical positions
//! never change. `origin` remembers where logical offset 0 ended up physically.

use crate::types::{Cell, DEFAULT_TAPE_SIZE};
use log::debug;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Tape {
    cells: Vec<Cell>,
    cursor: usize,
    origin: usize,
}

impl Default for Tape {
    fn default() -> Self {
        Self::new(DEFAULT_TAPE_SIZE)
    }
}

impl Tape {
    /// Creates a zeroed tape of `size` cells with the cursor on the first one.
    /// A size of zero is clamped to one so that doubling always makes room.
    pub fn new(size: usize) -> Self {
        Self {
            cells: vec![0; size.max(1)],
            cursor: 0,
            origin: 0,
        }
    }

    /// Returns the cell under the cursor.
    pub fn current(&self) -> Cell {
        self.cells[self.cursor]
    }

    /// Overwrites the cell under the cursor.
    pub fn set_current(&mut self, value: Cell) {
        self.cells[self.cursor] = value;
    }

    /// Adds a signed amount to the cell under the cursor, wrapping on overflow.
    pub fn add_current(&mut self, amount: i64) {
        let cell = &mut self.cells[self.cursor];
        *cell = cell.wrapping_add_signed(amount);
    }

    /// Moves the cursor by `offset` cells (positive is right), growing the tape as needed.
    pub fn shift(&mut self, offset: i64) {
        if offset < 0 {
            let distance = offset.unsigned_abs() as usize;
            while distance > self.cursor {
                self.grow_left();
            }
            self.cursor -= distance;
        } else {
            self.cursor += offset as usize;
            while self.cursor >= self.cells.len() {
                self.grow_right();
            }
        }
    }

    /// Doubles the tape, appending zeroed cells after the existing ones.
    fn grow_right(&mut self) {
        let size = self.cells.len();
        debug!("Growing tape right from {} to {} cells", size, size * 2);
        self.cells.resize(size * 2, 0);
    }

    /// Doubles the tape, inserting zeroed cells before the existing ones.
    fn grow_left(&mut self) {
        let size = self.cells.len();
        debug!("Growing tape left from {} to {} cells", size, size * 2);
        self.cells.splice(0..0, std::iter::repeat(0).take(size));
        self.cursor += size;
        self.origin += size;
    }

    /// Returns the physical index of the cursor in the backing buffer.
    pub fn cursor(&self) -> usize {
        self.cursor
    }

    /// Returns the physical index of logical offset 0.
    pub fn origin(&self) -> usize {
        self.origin
    }

    /// Returns the logical position of the cursor relative to where it started.
    pub fn offset(&self) -> i64 {
        self.cursor as i64 - self.origin as i64
    }

    /// Reads the cell at a logical offset. Cells that were never allocated read as zero.
    pub fn value_at(&self, offset: i64) -> Cell {
        match (self.origin as i64).checked_add(offset) {
            Some(index) if index >= 0 => self.cells.get(index as usize).copied().unwrap_or(0),
            _ => 0,
        }
    }

    /// Returns the number of allocated cells.
    pub fn len(&self) -> usize {
        self.cells.len()
    }

    pub fn is_empty(&self) -> bool {
        self.cells.is_empty()
    }

    /// Returns the backing buffer.
    pub fn cells(&self) -> &[Cell] {
        &self.cells
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new_tape_is_zeroed() {
        let tape = Tape::new(16);

        assert_eq!(tape.len(), 16);
        assert_eq!(tape.cursor(), 0);
        assert_eq!(tape.offset(), 0);
        assert!(tape.cells().iter().all(|&c| c == 0));
    }

    #[test]
    fn test_default_size() {
        assert_eq!(Tape::default().len(), DEFAULT_TAPE_SIZE);
    }

    #[test]
    fn test_zero_size_is_clamped() {
        let mut tape = Tape::new(0);
        assert_eq!(tape.len(), 1);

        tape.shift(5);
        assert_eq!(tape.offset(), 5);
        assert!(tape.len() > 5);
    }

    #[test]
    fn test_add_wraps() {
        let mut tape = Tape::new(1);

        tape.add_current(-1);
        assert_eq!(tape.current(), Cell::MAX);

        tape.add_current(2);
        assert_eq!(tape.current(), 1);
    }

    #[test]
    fn test_grow_right_doubles() {
        let mut tape = Tape::new(4);
        tape.set_current(7);

        tape.shift(4);
        assert_eq!(tape.len(), 8);
        assert_eq!(tape.cursor(), 4);
        assert_eq!(tape.cells()[0], 7);

        // Needs more than one doubling.
        tape.shift(20);
        assert_eq!(tape.len(), 32);
        assert_eq!(tape.cursor(), 24);
    }

    #[test]
    fn test_grow_left_shifts_contents() {
        let mut tape = Tape::new(4);
        tape.set_current(9);

        tape.shift(-1);
        assert_eq!(tape.len(), 8);
        assert_eq!(tape.cursor(), 3);
        assert_eq!(tape.origin(), 4);
        assert_eq!(tape.offset(), -1);
        assert_eq!(&tape.cells()[..4], &[0, 0, 0, 0]);
        assert_eq!(tape.cells()[4], 9);
        assert_eq!(tape.value_at(0), 9);
    }

    #[test]
    fn test_grow_left_repeats_for_large_offsets() {
        let mut tape = Tape::new(2);
        tape.set_current(3);

        tape.shift(-9);
        assert_eq!(tape.len(), 16);
        assert_eq!(tape.offset(), -9);

        tape.shift(9);
        assert_eq!(tape.current(), 3);
    }

    #[test]
    fn test_value_at_outside_allocation() {
        let tape = Tape::new(4);

        assert_eq!(tape.value_at(-100), 0);
        assert_eq!(tape.value_at(100), 0);
    }

    #[test]
    fn test_value_at_extreme_offsets() {
        let mut tape = Tape::new(4);
        tape.shift(-1);
        tape.set_current(7);

        assert_eq!(tape.origin(), 4);
        assert_eq!(tape.value_at(-1), 7);
        assert_eq!(tape.value_at(i64::MAX), 0);
        assert_eq!(tape.value_at(i64::MIN), 0);
    }

    #[test]
    fn test_zero_shift_is_noop() {
        let mut tape = Tape::new(8);
        tape.shift(3);
        tape.set_current(5);
        let before = tape.clone();

        tape.shift(0);
        tape.add_current(0);
        assert_eq!(tape, before);
    }
}
