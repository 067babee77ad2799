//! Core board model for the alchemy garden.
//!
//! This module defines:
//! - `Position`: an axial hex coordinate.
//! - `Board`: the occupied cells with their reverse index, plus the set of
//!   currently free tiles and its reverse index, kept up to date on every
//!   mutation.
//! - `BoardError`: everything that can go wrong while building or checking a board.
//!
//! A tile is free when three consecutive neighbor slots around it are empty
//! and, for metals, when no lower-ranked metal is left anywhere on the board.
use std::collections::{BTreeMap, BTreeSet};
use std::error::Error;
use std::fmt;

use log::trace;

use crate::element::{Element, ELEMENT_COUNT};
use crate::layout::{self, GardenLayout};

/// A cell of the hex grid in axial coordinates.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct Position {
    pub row: i32,
    pub col: i32,
}

/// Neighbor offsets in cyclic order around a cell.
///
/// Consecutive entries (wrapping around) are adjacent to each other, which is
/// what the open-wedge rule relies on.
pub const DIRECTIONS: [(i32, i32); 6] = [(-1, 0), (0, 1), (1, 1), (1, 0), (0, -1), (-1, -1)];

impl Position {
    pub const fn new(row: i32, col: i32) -> Self {
        Position { row, col }
    }

    /// The neighbor in direction `k` of [`DIRECTIONS`].
    pub fn neighbor(self, k: usize) -> Position {
        let (dr, dc) = DIRECTIONS[k % 6];
        Position::new(self.row + dr, self.col + dc)
    }

    /// The six neighbors, in [`DIRECTIONS`] order.
    pub fn neighbors(self) -> [Position; 6] {
        std::array::from_fn(|k| self.neighbor(k))
    }

    /// Number of steps between two cells.
    pub fn distance(self, other: Position) -> i32 {
        let dr = other.row - self.row;
        let dc = other.col - self.col;
        if dr.signum() * dc.signum() >= 0 {
            dr.abs().max(dc.abs())
        } else {
            dr.abs() + dc.abs()
        }
    }
}

impl fmt::Display for Position {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "({}, {})", self.row, self.col)
    }
}

/// Errors raised while building, parsing or validating a board.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum BoardError {
    /// A tile was added on a cell that already holds one.
    OccupiedPosition(Position),
    /// A tile was removed from a cell that holds none.
    VacantPosition(Position),
    /// A label that names no element.
    UnknownElement(String),
    /// Malformed text board.
    Format { line: usize, reason: String },
    /// The incremental bookkeeping disagrees with a from-scratch recomputation.
    InvariantViolation(String),
}

impl fmt::Display for BoardError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            BoardError::OccupiedPosition(p) => write!(f, "position {p} is already occupied"),
            BoardError::VacantPosition(p) => write!(f, "position {p} holds no tile"),
            BoardError::UnknownElement(label) => write!(f, "'{label}' is not an element"),
            BoardError::Format { line, reason } => write!(f, "line {line}: {reason}"),
            BoardError::InvariantViolation(what) => write!(f, "board invariant violated: {what}"),
        }
    }
}

impl Error for BoardError {}

/// The garden under solve.
///
/// `tiles` and `by_element` describe every occupied cell, `free` and
/// `free_by_element` the subset that can be removed right now. The four maps
/// are ordered so that two boards holding the same tiles compare equal no
/// matter in which order the tiles were added, and so that move enumeration
/// is deterministic.
///
/// # Examples
/// ```
/// use garden_solver::element::Element;
/// use garden_solver::engine::{Board, Position};
///
/// let mut board = Board::new();
/// board.add_tile(Position::new(5, 5), Element::Fire).unwrap();
/// board.add_tile(Position::new(5, 6), Element::Fire).unwrap();
/// assert!(board.is_free(Position::new(5, 5)));
/// assert_eq!(board.len(), 2);
///
/// assert_eq!(board.remove_tile(Position::new(5, 6)).unwrap(), Element::Fire);
/// assert_eq!(board.len(), 1);
/// ```
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct Board {
    tiles: BTreeMap<Position, Element>,
    by_element: [BTreeSet<Position>; ELEMENT_COUNT],
    free: BTreeMap<Position, Element>,
    free_by_element: [BTreeSet<Position>; ELEMENT_COUNT],
}

impl Board {
    /// Creates an empty board.
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of tiles on the board.
    pub fn len(&self) -> usize {
        self.tiles.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tiles.is_empty()
    }

    /// The element at `p`, if any.
    pub fn get(&self, p: Position) -> Option<Element> {
        self.tiles.get(&p).copied()
    }

    /// All tiles in position order.
    pub fn tiles(&self) -> &BTreeMap<Position, Element> {
        &self.tiles
    }

    /// Currently removable tiles in position order.
    pub fn free_tiles(&self) -> &BTreeMap<Position, Element> {
        &self.free
    }

    /// Positions holding `element`.
    pub fn positions_of(&self, element: Element) -> &BTreeSet<Position> {
        &self.by_element[element.index()]
    }

    /// Free positions holding `element`.
    pub fn free_positions_of(&self, element: Element) -> &BTreeSet<Position> {
        &self.free_by_element[element.index()]
    }

    /// Remaining tiles of `element`.
    pub fn count(&self, element: Element) -> usize {
        self.by_element[element.index()].len()
    }

    /// Tile count for every element, zero counts included.
    pub fn counts(&self) -> BTreeMap<Element, usize> {
        Element::ALL.iter().map(|&e| (e, self.count(e))).collect()
    }

    /// Whether the counts match a freshly dealt garden of `layout` exactly.
    pub fn is_full(&self, layout: GardenLayout) -> bool {
        Element::ALL.iter().all(|&e| self.count(e) == layout.expected_count(e))
    }

    /// The layout whose full distribution this board matches, if any.
    pub fn detect_layout(&self) -> Option<GardenLayout> {
        GardenLayout::ALL.into_iter().find(|&layout| self.is_full(layout))
    }

    /// The lowest-ranked metal still on the board.
    pub fn lowest_metal(&self) -> Option<Element> {
        Element::METALS.into_iter().find(|&m| self.count(m) > 0)
    }

    /// Places `element` on `p` and refreshes the free set around it.
    ///
    /// # Errors
    /// [`BoardError::OccupiedPosition`] if `p` already holds a tile.
    pub fn add_tile(&mut self, p: Position, element: Element) -> Result<(), BoardError> {
        if self.tiles.contains_key(&p) {
            return Err(BoardError::OccupiedPosition(p));
        }
        self.tiles.insert(p, element);
        self.by_element[element.index()].insert(p);
        self.refresh(p);
        self.refresh_around(p, element);
        Ok(())
    }

    /// Places a tile given by its two-letter label, as reported by a board recognizer.
    ///
    /// # Errors
    /// [`BoardError::UnknownElement`] for an unknown label, otherwise as [`Board::add_tile`].
    pub fn add_labeled_tile(&mut self, p: Position, label: &str) -> Result<(), BoardError> {
        let element = label.parse()?;
        self.add_tile(p, element)
    }

    /// Takes the tile off `p` and refreshes the free set around it.
    ///
    /// # Errors
    /// [`BoardError::VacantPosition`] if `p` holds no tile.
    pub fn remove_tile(&mut self, p: Position) -> Result<Element, BoardError> {
        let element = self.tiles.remove(&p).ok_or(BoardError::VacantPosition(p))?;
        self.by_element[element.index()].remove(&p);
        self.unmark_free(p, element);
        self.refresh_around(p, element);
        Ok(element)
    }

    /// Whether the tile on `p` can be removed right now.
    ///
    /// Recomputed from `tiles` alone; the cached free set must always agree
    /// with it. Empty cells are never free.
    pub fn is_free(&self, p: Position) -> bool {
        let Some(element) = self.get(p) else {
            return false;
        };
        if element.is_metal() && self.lowest_metal() != Some(element) {
            return false;
        }
        self.has_open_wedge(p)
    }

    /// Whether three consecutive neighbor slots of `p` are empty.
    ///
    /// Does not look at `p` itself, so it also answers "would a tile placed
    /// here be reachable".
    pub fn has_open_wedge(&self, p: Position) -> bool {
        let empty = p.neighbors().map(|n| !self.tiles.contains_key(&n));
        (0..6).any(|k| empty[k] && empty[(k + 5) % 6] && empty[(k + 4) % 6])
    }

    /// Verifies that the cached indices agree with a from-scratch recomputation.
    ///
    /// # Errors
    /// [`BoardError::InvariantViolation`] describing the first mismatch found.
    pub fn check_invariants(&self) -> Result<(), BoardError> {
        let violation = |what: String| Err(BoardError::InvariantViolation(what));

        for (p, e) in &self.free {
            if self.tiles.get(p) != Some(e) {
                let held = self.tiles.get(p);
                return violation(format!("{p} is free as {e} but the board holds {held:?}"));
            }
        }
        for &p in self.tiles.keys() {
            if self.free.contains_key(&p) != self.is_free(p) {
                return violation(format!("cached freedom of {p} is stale"));
            }
        }
        if !mirrors(&self.tiles, &self.by_element) {
            return violation("element index does not mirror the tiles".to_string());
        }
        if !mirrors(&self.free, &self.free_by_element) {
            return violation("free element index does not mirror the free tiles".to_string());
        }

        let mut rebuilt = Board::new();
        for (&p, &e) in &self.tiles {
            rebuilt.add_tile(p, e)?;
        }
        if rebuilt != *self {
            return violation("board differs from a board rebuilt from its tiles".to_string());
        }
        Ok(())
    }

    fn refresh_around(&mut self, p: Position, element: Element) {
        for n in p.neighbors() {
            if self.tiles.contains_key(&n) {
                self.refresh(n);
            }
        }
        if element.is_metal() {
            self.refresh_metals();
        }
    }

    // Metal freedom depends on the whole metal population, not only on neighbors.
    fn refresh_metals(&mut self) {
        let metals: Vec<Position> = Element::METALS
            .iter()
            .flat_map(|m| self.by_element[m.index()].iter().copied())
            .collect();
        for p in metals {
            self.refresh(p);
        }
    }

    fn refresh(&mut self, p: Position) {
        let Some(element) = self.get(p) else {
            return;
        };
        if self.is_free(p) {
            self.mark_free(p, element);
        } else {
            self.unmark_free(p, element);
        }
    }

    fn mark_free(&mut self, p: Position, element: Element) {
        if self.free.insert(p, element).is_none() {
            self.free_by_element[element.index()].insert(p);
            trace!("{p} ({element}) became free");
        }
    }

    fn unmark_free(&mut self, p: Position, element: Element) {
        if self.free.remove(&p).is_some() {
            self.free_by_element[element.index()].remove(&p);
        }
    }
}

fn mirrors(map: &BTreeMap<Position, Element>, index: &[BTreeSet<Position>; ELEMENT_COUNT]) -> bool {
    let indexed: usize = index.iter().map(BTreeSet::len).sum();
    indexed == map.len()
        && Element::ALL
            .iter()
            .all(|e| index[e.index()].iter().all(|p| map.get(p) == Some(e)))
}

impl fmt::Display for Board {
    /// Draws the garden as an offset hexagon of two-letter labels, `..` for empty cells.
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for row in 0..layout::GARDEN_ROWS {
            let indent = (row - layout::GARDEN_RADIUS).unsigned_abs() as usize;
            write!(f, "{}", " ".repeat(indent * 2))?;
            let cells: Vec<String> = layout::column_range(row)
                .map(|col| match self.get(Position::new(row, col)) {
                    Some(e) => e.code().to_string(),
                    None => "..".to_string(),
                })
                .collect();
            write!(f, "{}", cells.join("  "))?;
            if row < layout::GARDEN_ROWS - 1 {
                writeln!(f)?;
            }
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::rngs::SmallRng;
    use rand::seq::SliceRandom;
    use rand::{Rng, SeedableRng};

    fn p(row: i32, col: i32) -> Position {
        Position::new(row, col)
    }

    fn board_with(tiles: &[((i32, i32), Element)]) -> Board {
        let mut board = Board::new();
        for &((r, c), e) in tiles {
            board.add_tile(p(r, c), e).unwrap();
        }
        board
    }

    fn random_board(seed: u64, fill: usize) -> Board {
        let mut rng = SmallRng::seed_from_u64(seed);
        let mut cells: Vec<Position> = layout::garden_cells().collect();
        cells.shuffle(&mut rng);
        let mut board = Board::new();
        for &cell in cells.iter().take(fill) {
            let e = Element::ALL[rng.gen_range(0..Element::ALL.len())];
            board.add_tile(cell, e).unwrap();
        }
        board
    }

    #[test]
    fn test_directions_are_cyclically_adjacent() {
        let origin = p(5, 5);
        for k in 0..6 {
            assert_eq!(origin.neighbor(k).distance(origin), 1);
            assert_eq!(origin.neighbor(k).distance(origin.neighbor(k + 1)), 1);
        }
    }

    #[test]
    fn test_add_tile_rejects_occupied_position() {
        let mut board = board_with(&[((3, 3), Element::Fire)]);
        assert_eq!(
            board.add_tile(p(3, 3), Element::Water),
            Err(BoardError::OccupiedPosition(p(3, 3)))
        );
        assert_eq!(board.get(p(3, 3)), Some(Element::Fire));
    }

    #[test]
    fn test_add_labeled_tile_rejects_unknown_label() {
        let mut board = Board::new();
        assert_eq!(
            board.add_labeled_tile(p(0, 0), "ZZ"),
            Err(BoardError::UnknownElement("ZZ".to_string()))
        );
        board.add_labeled_tile(p(0, 0), "HG").unwrap();
        assert_eq!(board.get(p(0, 0)), Some(Element::Quicksilver));
    }

    #[test]
    fn test_remove_tile_from_vacant_position() {
        let mut board = Board::new();
        assert_eq!(board.remove_tile(p(1, 1)), Err(BoardError::VacantPosition(p(1, 1))));
    }

    #[test]
    fn test_surrounded_tile_is_not_free() {
        let center = p(5, 5);
        let mut board = board_with(&[((5, 5), Element::Air)]);
        for n in center.neighbors() {
            board.add_tile(n, Element::Water).unwrap();
        }
        assert!(!board.is_free(center));
        assert!(!board.free_tiles().contains_key(&center));
        board.check_invariants().unwrap();
    }

    #[test]
    fn test_wedge_of_three_empty_neighbors_is_free() {
        let center = p(5, 5);
        let mut board = board_with(&[((5, 5), Element::Air)]);
        // Occupy directions 0, 1, 2; leave 3, 4, 5 open.
        for k in 0..3 {
            board.add_tile(center.neighbor(k), Element::Earth).unwrap();
        }
        assert!(board.is_free(center));
        board.check_invariants().unwrap();
    }

    #[test]
    fn test_two_gaps_do_not_make_a_wedge() {
        let center = p(5, 5);
        let mut board = board_with(&[((5, 5), Element::Air)]);
        // Empty slots at 0, 1 and 3, 4: never three in a row.
        for k in [2, 5] {
            board.add_tile(center.neighbor(k), Element::Earth).unwrap();
        }
        assert!(!board.is_free(center));
        board.remove_tile(center.neighbor(5)).unwrap();
        assert!(board.is_free(center));
        board.check_invariants().unwrap();
    }

    #[test]
    fn test_wedge_wraps_around_direction_zero() {
        let center = p(5, 5);
        let mut board = board_with(&[((5, 5), Element::Air)]);
        // Empty slots at 5, 0, 1.
        for k in [2, 3, 4] {
            board.add_tile(center.neighbor(k), Element::Earth).unwrap();
        }
        assert!(board.is_free(center));
    }

    #[test]
    fn test_only_lowest_metal_is_free() {
        let mut board = board_with(&[
            ((0, 0), Element::Tin),
            ((5, 5), Element::Lead),
            ((10, 10), Element::Iron),
        ]);
        assert!(board.is_free(p(5, 5)));
        assert!(!board.is_free(p(0, 0)));
        assert!(!board.is_free(p(10, 10)));

        board.remove_tile(p(5, 5)).unwrap();
        assert!(board.is_free(p(0, 0)));
        assert!(!board.is_free(p(10, 10)));
        assert_eq!(board.free_positions_of(Element::Tin).len(), 1);
        board.check_invariants().unwrap();

        board.add_tile(p(5, 5), Element::Lead).unwrap();
        assert!(!board.free_tiles().contains_key(&p(0, 0)));
        board.check_invariants().unwrap();
    }

    #[test]
    fn test_lowest_metal_still_needs_a_wedge() {
        let center = p(5, 5);
        let mut board = board_with(&[((5, 5), Element::Lead)]);
        for n in center.neighbors() {
            board.add_tile(n, Element::Fire).unwrap();
        }
        assert_eq!(board.lowest_metal(), Some(Element::Lead));
        assert!(!board.is_free(center));
    }

    #[test]
    fn test_counts_and_layout_detection() {
        let board = board_with(&[
            ((0, 0), Element::Fire),
            ((0, 1), Element::Fire),
            ((1, 1), Element::Gold),
        ]);
        let counts = board.counts();
        assert_eq!(counts.len(), ELEMENT_COUNT);
        assert_eq!(counts[&Element::Fire], 2);
        assert_eq!(counts[&Element::Gold], 1);
        assert_eq!(counts[&Element::Quintessence], 0);
        assert!(!board.is_full(GardenLayout::Standard));
        assert_eq!(board.detect_layout(), None);
    }

    #[test]
    fn test_incremental_free_set_matches_recomputation() {
        for seed in 0..20 {
            let mut board = random_board(seed, 30 + seed as usize);
            board.check_invariants().unwrap();

            let mut rng = SmallRng::seed_from_u64(seed + 1000);
            let mut occupied: Vec<Position> = board.tiles().keys().copied().collect();
            occupied.shuffle(&mut rng);
            for cell in occupied.into_iter().take(15) {
                board.remove_tile(cell).unwrap();
                board.check_invariants().unwrap();
            }
        }
    }

    #[test]
    fn test_remove_then_restore_is_exact() {
        for seed in 0..20 {
            let mut board = random_board(seed, 45);
            let before = board.clone();
            let mut rng = SmallRng::seed_from_u64(seed);
            let mut occupied: Vec<Position> = board.tiles().keys().copied().collect();
            occupied.shuffle(&mut rng);

            let taken: Vec<(Position, Element)> = occupied
                .iter()
                .take(5)
                .map(|&cell| (cell, board.remove_tile(cell).unwrap()))
                .collect();
            for &(cell, e) in taken.iter().rev() {
                board.add_tile(cell, e).unwrap();
            }
            assert_eq!(board, before);
        }
    }

    #[test]
    fn test_display_draws_hexagon() {
        let board = board_with(&[((0, 0), Element::Fire), ((10, 10), Element::Gold)]);
        let drawn = board.to_string();
        let lines: Vec<&str> = drawn.lines().collect();
        assert_eq!(lines.len(), 11);
        assert!(lines[0].trim_start().starts_with("FI"));
        assert!(lines[10].trim_end().ends_with("M5"));
        assert_eq!(lines[5].split_whitespace().count(), 11);
    }
}
