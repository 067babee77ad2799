//! Cheap pruning checks evaluated before a search state is expanded.
use crate::element::Element;
use crate::engine::Board;

/// Necessary condition for `board` to be clearable, judged from tile counts alone.
///
/// Every pending quintessence consumes one tile of each cardinal. Whatever is
/// left of a cardinal pairs off with itself, except for an odd leftover, which
/// needs a vitae partner. So the board is hopeless when some cardinal has fewer
/// tiles than there are quintessences, or when more cardinals have an odd
/// leftover than there are vitae.
///
/// Never rejects a clearable board; may accept boards that are stuck for
/// other reasons.
///
/// # Examples
/// ```
/// use garden_solver::element::Element;
/// use garden_solver::engine::{Board, Position};
/// use garden_solver::heuristics::has_hope;
///
/// let mut board = Board::new();
/// board.add_tile(Position::new(0, 0), Element::Fire).unwrap();
/// assert!(!has_hope(&board));
/// board.add_tile(Position::new(0, 3), Element::Vitae).unwrap();
/// assert!(has_hope(&board));
/// ```
pub fn has_hope(board: &Board) -> bool {
    let quintessence = board.count(Element::Quintessence);

    let mut odd = 0;
    for cardinal in Element::CARDINALS {
        let count = board.count(cardinal);
        if count < quintessence {
            return false;
        }
        if (count - quintessence) % 2 == 1 {
            odd += 1;
        }
    }
    odd <= board.count(Element::Vitae)
}
