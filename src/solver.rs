//! Depth-first backtracking search for sequences of moves that clear the garden.
//!
//! The search runs on the caller's board in place: every move is applied by
//! removing its tiles and undone by putting the same elements back, so the
//! board only needs one copy. Solutions are produced lazily by [`Solutions`],
//! which keeps its own stack of frames instead of recursing.
use std::fmt;

use itertools::Itertools;
use log::{debug, trace};

use crate::element::Element;
use crate::engine::{Board, Position};
use crate::heuristics::has_hope;
use crate::moves::{pairings, Move};

/// An ordered list of moves that clears the board it was found on.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct Solution {
    pub moves: Vec<Move>,
}

impl Solution {
    /// Every position of every move, in the order they must be clicked.
    pub fn clicks(&self) -> impl Iterator<Item = Position> + '_ {
        self.moves.iter().flat_map(|m| m.positions().iter().copied())
    }

    /// Applies the moves to `board` in order, checking each one is legal when played.
    ///
    /// On `Err(i)`, `self.moves[i]` is the first move that was not legal and
    /// `board` is left as it was after the `i` moves before it.
    pub fn replay(&self, board: &mut Board) -> Result<(), usize> {
        for (i, mv) in self.moves.iter().enumerate() {
            let legal = pairings(board);
            if !legal.contains(mv) {
                return Err(i);
            }
            for &p in mv.positions() {
                if board.remove_tile(p).is_err() {
                    return Err(i);
                }
            }
        }
        Ok(())
    }
}

impl fmt::Display for Solution {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.moves.iter().join(" "))
    }
}

/// Counters describing how much of the search tree has been explored.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct SearchStats {
    /// States entered, including the starting one.
    pub states: u64,
    /// States rejected by [`has_hope`].
    pub pruned: u64,
    /// States with hope but no legal move.
    pub dead_ends: u64,
    /// Solutions handed to the caller.
    pub solutions: u64,
}

impl fmt::Display for SearchStats {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} states, {} pruned, {} dead ends, {} solutions",
            self.states, self.pruned, self.dead_ends, self.solutions
        )
    }
}

// Candidate moves of one search state and how far through them we are.
struct Frame {
    candidates: Vec<Move>,
    next: usize,
}

enum Entered {
    Expanded,
    Solved,
    Hopeless,
}

/// Lazy iterator over every solution of a board.
///
/// Nothing is explored until [`Iterator::next`] is called, and each call stops
/// as soon as the next solution is found. Between calls the board is left in
/// the state of the deepest unfinished frame; once the iterator is dropped,
/// whether exhausted, abandoned early or unwound by a panic, the board is back
/// exactly as it was lent.
///
/// # Examples
/// ```
/// use garden_solver::element::Element;
/// use garden_solver::engine::{Board, Position};
///
/// let mut board = Board::new();
/// board.add_tile(Position::new(5, 5), Element::Air).unwrap();
/// board.add_tile(Position::new(5, 6), Element::Air).unwrap();
/// let before = board.clone();
///
/// let solutions: Vec<_> = board.solve().collect();
/// assert_eq!(solutions.len(), 1);
/// assert_eq!(solutions[0].moves.len(), 1);
/// assert_eq!(board, before);
/// ```
pub struct Solutions<'a> {
    board: &'a mut Board,
    frames: Vec<Frame>,
    // One entry per applied move: the move and the tiles it took off.
    applied: Vec<(Move, Vec<(Position, Element)>)>,
    started: bool,
    stats: SearchStats,
}

impl<'a> Solutions<'a> {
    pub fn new(board: &'a mut Board) -> Self {
        Solutions {
            board,
            frames: Vec::new(),
            applied: Vec::new(),
            started: false,
            stats: SearchStats::default(),
        }
    }

    /// Exploration counters so far.
    pub fn stats(&self) -> SearchStats {
        self.stats
    }

    /// Number of moves currently applied to the board.
    pub fn depth(&self) -> usize {
        self.applied.len()
    }

    fn enter(&mut self) -> Entered {
        self.stats.states += 1;
        if !has_hope(self.board) {
            self.stats.pruned += 1;
            return Entered::Hopeless;
        }
        if self.board.is_empty() {
            return Entered::Solved;
        }
        let candidates = pairings(self.board);
        trace!(
            "depth {}: {} tiles, {} candidate moves",
            self.applied.len(),
            self.board.len(),
            candidates.len()
        );
        if candidates.is_empty() {
            self.stats.dead_ends += 1;
        }
        self.frames.push(Frame { candidates, next: 0 });
        Entered::Expanded
    }

    fn apply(&mut self, mv: Move) {
        let mut taken = Vec::with_capacity(mv.len());
        for &p in mv.positions() {
            match self.board.remove_tile(p) {
                Ok(element) => taken.push((p, element)),
                Err(err) => {
                    restore(self.board, &taken);
                    panic!("move {mv} does not match the board: {err}");
                }
            }
        }
        self.applied.push((mv, taken));
    }

    fn undo(&mut self) {
        if let Some((_, taken)) = self.applied.pop() {
            restore(self.board, &taken);
        }
    }

    fn current_solution(&self) -> Solution {
        Solution {
            moves: self.applied.iter().map(|(mv, _)| *mv).collect(),
        }
    }

    fn yielded(&mut self, solution: Solution) -> Option<Solution> {
        self.stats.solutions += 1;
        debug!("solution {} found after {}", self.stats.solutions, self.stats);
        Some(solution)
    }
}

fn restore(board: &mut Board, taken: &[(Position, Element)]) {
    for &(p, element) in taken.iter().rev() {
        if let Err(err) = board.add_tile(p, element) {
            panic!("cannot put {element} back on {p}: {err}");
        }
    }
}

impl Iterator for Solutions<'_> {
    type Item = Solution;

    fn next(&mut self) -> Option<Solution> {
        if !self.started {
            self.started = true;
            match self.enter() {
                Entered::Expanded => {}
                Entered::Solved => return self.yielded(Solution::default()),
                Entered::Hopeless => return None,
            }
        }

        loop {
            let frame = self.frames.last_mut()?;
            let Some(&mv) = frame.candidates.get(frame.next) else {
                self.frames.pop();
                self.undo();
                continue;
            };
            frame.next += 1;

            self.apply(mv);
            match self.enter() {
                Entered::Expanded => {}
                Entered::Hopeless => self.undo(),
                Entered::Solved => {
                    let solution = self.current_solution();
                    self.undo();
                    return self.yielded(solution);
                }
            }
        }
    }
}

impl Drop for Solutions<'_> {
    fn drop(&mut self) {
        while !self.applied.is_empty() {
            self.undo();
        }
        debug!("search closed: {}", self.stats);
    }
}

impl Board {
    /// Lazily enumerates the solutions of this board; see [`Solutions`].
    pub fn solve(&mut self) -> Solutions<'_> {
        Solutions::new(self)
    }
}

/// The first solution of `board`, or `None` if the search space holds none.
pub fn first_solution(board: &mut Board) -> Option<Solution> {
    board.solve().next()
}
