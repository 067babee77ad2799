//! Legal move enumeration.
//!
//! A move removes one, two or five free tiles at once:
//! - `Pair`: two tiles related by [`Element::can_pair`].
//! - `Single`: a free gold, which closes the metal sequence without a partner.
//! - `Quintet`: a quintessence together with one tile of each cardinal.
use std::fmt;

use itertools::{iproduct, Itertools};

use crate::element::Element;
use crate::engine::{Board, Position};

/// A group of tiles removed together in one step.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Move {
    Single(Position),
    Pair([Position; 2]),
    /// Quintessence first, then fire, water, air and earth.
    Quintet([Position; 5]),
}

impl Move {
    /// Positions of this move in the order they are clicked.
    pub fn positions(&self) -> &[Position] {
        match self {
            Move::Single(p) => std::slice::from_ref(p),
            Move::Pair(ps) => ps,
            Move::Quintet(ps) => ps,
        }
    }

    pub fn len(&self) -> usize {
        self.positions().len()
    }
}

impl fmt::Display for Move {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "[{}]", self.positions().iter().join(" "))
    }
}

/// Every move available on `board`, in a deterministic order.
///
/// Pairs come first (ordered by their later tile, then their earlier one),
/// then gold singles, then quintessence combinations.
///
/// # Examples
/// ```
/// use garden_solver::element::Element;
/// use garden_solver::engine::{Board, Position};
/// use garden_solver::moves::{pairings, Move};
///
/// let mut board = Board::new();
/// board.add_tile(Position::new(0, 0), Element::Water).unwrap();
/// board.add_tile(Position::new(10, 10), Element::Water).unwrap();
/// assert_eq!(
///     pairings(&board),
///     vec![Move::Pair([Position::new(10, 10), Position::new(0, 0)])]
/// );
/// ```
pub fn pairings(board: &Board) -> Vec<Move> {
    let free: Vec<(Position, Element)> = board.free_tiles().iter().map(|(&p, &e)| (p, e)).collect();

    let mut moves = Vec::new();
    for (i, &(pa, a)) in free.iter().enumerate() {
        for &(pb, b) in &free[..i] {
            if a.can_pair(b) {
                moves.push(Move::Pair([pa, pb]));
            }
        }
    }

    moves.extend(board.free_positions_of(Element::Gold).iter().map(|&p| Move::Single(p)));

    let [fire, water, air, earth] = Element::CARDINALS.map(|c| board.free_positions_of(c));
    moves.extend(
        iproduct!(
            board.free_positions_of(Element::Quintessence),
            fire,
            water,
            air,
            earth
        )
        .map(|(&q, &fi, &wa, &ai, &ea)| Move::Quintet([q, fi, wa, ai, ea])),
    );

    moves
}
