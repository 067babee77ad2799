//! Seeded generation of gardens that are known to be clearable.
//!
//! Gardens are built by playing a planned game backwards: the move groups are
//! decided first, then put on the board last move first, each one on cells
//! where all of its tiles are free at the moment it lands. Replaying the
//! groups forwards is then a solution, returned alongside the board.
use std::error::Error;
use std::fmt;

use log::debug;
use rand::rngs::SmallRng;
use rand::seq::{index, SliceRandom};
use rand::{Rng, SeedableRng};

use crate::element::{Element, ElementKind};
use crate::engine::{Board, Position};
use crate::layout::{self, GardenLayout};
use crate::moves::{pairings, Move};
use crate::solver::Solution;

/// Elements removed together by one planned move.
pub type Group = Vec<Element>;

/// Attempts at placing a single group before the whole board is restarted.
const GROUP_TRIES: usize = 64;

const DEFAULT_RESTARTS: usize = 200;

#[derive(Clone, Debug, PartialEq, Eq)]
pub enum GenerateError {
    /// A planned group is not a legal move shape.
    InvalidGroup(Group),
    /// The plan holds more tiles than the garden has cells.
    TooManyTiles(usize),
    /// No placement was found within the restart budget.
    Exhausted { restarts: usize },
}

impl fmt::Display for GenerateError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            GenerateError::InvalidGroup(group) => {
                let codes: Vec<&str> = group.iter().map(|e| e.code()).collect();
                write!(f, "[{}] is not a legal move", codes.join(" "))
            }
            GenerateError::TooManyTiles(n) => write!(f, "{n} tiles do not fit in the garden"),
            GenerateError::Exhausted { restarts } => {
                write!(f, "no garden could be laid out after {restarts} restarts")
            }
        }
    }
}

impl Error for GenerateError {}

/// Random garden builder. The same seed always yields the same gardens.
///
/// # Examples
/// ```
/// use garden_solver::generator::Generator;
/// use garden_solver::layout::GardenLayout;
///
/// let (board, witness) = Generator::with_seed(1).generate(GardenLayout::Standard).unwrap();
/// assert!(board.is_full(GardenLayout::Standard));
/// assert_eq!(witness.clicks().count(), 55);
/// ```
pub struct Generator {
    rng: SmallRng,
    max_restarts: usize,
}

impl Generator {
    pub fn with_seed(seed: u64) -> Self {
        Generator {
            rng: SmallRng::seed_from_u64(seed),
            max_restarts: DEFAULT_RESTARTS,
        }
    }

    /// Caps how many times a dead-ended layout is thrown away and retried.
    pub fn max_restarts(mut self, max_restarts: usize) -> Self {
        self.max_restarts = max_restarts;
        self
    }

    /// A full garden of `layout` together with one way of clearing it.
    pub fn generate(&mut self, layout: GardenLayout) -> Result<(Board, Solution), GenerateError> {
        let plan = self.plan(layout);
        self.place(&plan)
    }

    /// Plans the moves of a `layout` garden, in removal order.
    ///
    /// Cardinals left over by the quintessence moves are paired among
    /// themselves, except for some that take a vitae partner. Metals appear
    /// in rank order, each but gold paired with a quicksilver.
    pub fn plan(&mut self, layout: GardenLayout) -> Vec<Group> {
        let quintessence = layout.expected_count(Element::Quintessence);
        let mut others: Vec<Group> = Vec::new();
        for _ in 0..quintessence {
            let mut quintet = vec![Element::Quintessence];
            quintet.extend(Element::CARDINALS);
            others.push(quintet);
        }

        let mut left = Element::CARDINALS
            .map(|c| layout.expected_count(c).saturating_sub(quintessence));
        let mut vitae = layout.expected_count(Element::Vitae);
        while vitae >= 2 && self.rng.gen_bool(0.5) {
            let k = self.rng.gen_range(0..left.len());
            if left[k] < 2 {
                break;
            }
            left[k] -= 2;
            vitae -= 2;
            others.push(vec![Element::CARDINALS[k], Element::Vitae]);
            others.push(vec![Element::CARDINALS[k], Element::Vitae]);
        }
        for (k, &cardinal) in Element::CARDINALS.iter().enumerate() {
            if left[k] % 2 == 1 && vitae > 0 {
                left[k] -= 1;
                vitae -= 1;
                others.push(vec![cardinal, Element::Vitae]);
            }
            for _ in 0..left[k] / 2 {
                others.push(vec![cardinal, cardinal]);
            }
        }
        for _ in 0..vitae / 2 {
            others.push(vec![Element::Vitae, Element::Vitae]);
        }
        let salt = layout.expected_count(Element::Life).min(layout.expected_count(Element::Death));
        for _ in 0..salt {
            others.push(vec![Element::Life, Element::Death]);
        }
        others.shuffle(&mut self.rng);

        let metals: Vec<Group> = Element::METALS
            .iter()
            .map(|&m| match m {
                Element::Gold => vec![Element::Gold],
                _ => vec![m, Element::Quicksilver],
            })
            .collect();

        let total = others.len() + metals.len();
        let mut slots = index::sample(&mut self.rng, total, metals.len()).into_vec();
        slots.sort_unstable();
        let mut metals = metals.into_iter();
        let mut others = others.into_iter();
        (0..total)
            .filter_map(|i| {
                if slots.binary_search(&i).is_ok() {
                    metals.next()
                } else {
                    others.next()
                }
            })
            .collect()
    }

    /// Lays out `groups` (in removal order) on an empty garden.
    ///
    /// # Errors
    /// [`GenerateError::InvalidGroup`] or [`GenerateError::TooManyTiles`] for a
    /// plan that cannot be a game, [`GenerateError::Exhausted`] when every
    /// attempt dead-ended.
    pub fn place(&mut self, groups: &[Group]) -> Result<(Board, Solution), GenerateError> {
        if let Some(group) = groups.iter().find(|g| !is_move_shape(g)) {
            return Err(GenerateError::InvalidGroup(group.clone()));
        }
        let tiles: usize = groups.iter().map(Vec::len).sum();
        if tiles > layout::garden_cells().count() {
            return Err(GenerateError::TooManyTiles(tiles));
        }

        for restart in 0..self.max_restarts {
            if let Some(found) = self.try_place(groups) {
                return Ok(found);
            }
            debug!("garden dead-ended, restart {}", restart + 1);
        }
        Err(GenerateError::Exhausted {
            restarts: self.max_restarts,
        })
    }

    fn try_place(&mut self, groups: &[Group]) -> Option<(Board, Solution)> {
        let mut board = Board::new();
        let mut moves = Vec::with_capacity(groups.len());
        for group in groups.iter().rev() {
            moves.push(self.place_group(&mut board, group)?);
        }
        moves.reverse();
        Some((board, Solution { moves }))
    }

    fn place_group(&mut self, board: &mut Board, group: &[Element]) -> Option<Move> {
        for _ in 0..GROUP_TRIES {
            let mut cells = Vec::with_capacity(group.len());
            for &element in group {
                match self.land_tile(board, element, &cells) {
                    Some(cell) => cells.push(cell),
                    None => break,
                }
            }

            if cells.len() == group.len() {
                let landed = pairings(board).into_iter().find(|m| {
                    m.len() == cells.len() && cells.iter().all(|c| m.positions().contains(c))
                });
                if landed.is_some() {
                    return landed;
                }
            }
            for &cell in cells.iter().rev() {
                board.remove_tile(cell).ok();
            }
        }
        None
    }

    // Puts `element` on the first candidate cell that leaves it and the group
    // tiles already placed free.
    fn land_tile(
        &mut self,
        board: &mut Board,
        element: Element,
        placed: &[Position],
    ) -> Option<Position> {
        for cell in self.candidate_cells(board) {
            if board.add_tile(cell, element).is_err() {
                continue;
            }
            if board.is_free(cell) && placed.iter().all(|&p| board.is_free(p)) {
                return Some(cell);
            }
            board.remove_tile(cell).ok();
        }
        None
    }

    // Empty cells that a tile could be taken from, innermost ring first and in
    // random order within a ring.
    fn candidate_cells(&mut self, board: &Board) -> Vec<Position> {
        let mut candidates: Vec<Position> = layout::garden_cells()
            .filter(|&c| board.get(c).is_none() && board.has_open_wedge(c))
            .collect();
        candidates.shuffle(&mut self.rng);
        candidates.sort_by_key(|&c| layout::ring_of(c));
        candidates
    }
}

fn is_move_shape(group: &[Element]) -> bool {
    match group {
        [Element::Gold] => true,
        [a, b] => a.can_pair(*b),
        [first, rest @ ..] if rest.len() == 4 => {
            *first == Element::Quintessence
                && Element::CARDINALS.iter().all(|c| rest.contains(c))
                && rest.iter().all(|e| e.kind() == ElementKind::Cardinal)
        }
        _ => false,
    }
}
