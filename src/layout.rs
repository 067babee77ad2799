//! Garden geometry and the tile distributions of a freshly dealt garden.
//!
//! The garden is a hexagon of radius 5 stored in axial coordinates: 11 rows,
//! where row `i` holds columns `max(0, i - 5) ..= min(10, i + 5)`. That gives
//! 91 cells, 55 of which are occupied on a full board.
use crate::element::{Element, ELEMENT_COUNT};
use crate::engine::Position;

/// Number of rows (and columns) spanned by the garden.
pub const GARDEN_ROWS: i32 = 11;

/// Distance from the center cell to the rim.
pub const GARDEN_RADIUS: i32 = 5;

/// The center cell of the garden.
pub const GARDEN_CENTER: Position = Position::new(GARDEN_RADIUS, GARDEN_RADIUS);

/// Whether `p` lies inside the garden hexagon.
///
/// ```
/// use garden_solver::engine::Position;
/// use garden_solver::layout::is_on_garden;
/// assert!(is_on_garden(Position::new(0, 0)));
/// assert!(is_on_garden(Position::new(10, 10)));
/// assert!(!is_on_garden(Position::new(0, 6)));
/// ```
pub fn is_on_garden(p: Position) -> bool {
    (0..GARDEN_ROWS).contains(&p.row) && column_range(p.row).contains(&p.col)
}

/// On-garden columns of row `row`.
pub fn column_range(row: i32) -> std::ops::RangeInclusive<i32> {
    (row - GARDEN_RADIUS).max(0)..=(row + GARDEN_RADIUS).min(GARDEN_ROWS - 1)
}

/// All garden cells, row by row.
pub fn garden_cells() -> impl Iterator<Item = Position> {
    (0..GARDEN_ROWS).flat_map(|row| column_range(row).map(move |col| Position::new(row, col)))
}

/// Hex distance from the center cell.
pub fn ring_of(p: Position) -> i32 {
    p.distance(GARDEN_CENTER)
}

/// The two garden deals the solver recognizes.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum GardenLayout {
    /// 8 of each cardinal, 4 vitae, 4 life, 4 death, 5 quicksilver, one of each metal.
    Standard,
    /// Like `Standard`, but two quintessence replace one life and one death.
    Extended,
}

impl GardenLayout {
    pub const ALL: [GardenLayout; 2] = [GardenLayout::Standard, GardenLayout::Extended];

    /// How many tiles of `element` a full garden of this layout holds.
    pub fn expected_count(self, element: Element) -> usize {
        match (self, element) {
            (_, Element::Fire | Element::Water | Element::Air | Element::Earth) => 8,
            (_, Element::Vitae) => 4,
            (_, Element::Quicksilver) => 5,
            (_, e) if e.is_metal() => 1,
            (GardenLayout::Standard, Element::Life | Element::Death) => 4,
            (GardenLayout::Extended, Element::Life | Element::Death) => 3,
            (GardenLayout::Standard, Element::Quintessence) => 0,
            (GardenLayout::Extended, Element::Quintessence) => 2,
            _ => 0,
        }
    }

    /// Expected counts indexed by [`Element::index`].
    pub fn expected_counts(self) -> [usize; ELEMENT_COUNT] {
        Element::ALL.map(|e| self.expected_count(e))
    }

    /// Total tiles on a full garden of this layout.
    pub fn tile_total(self) -> usize {
        self.expected_counts().iter().sum()
    }
}

impl std::fmt::Display for GardenLayout {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            GardenLayout::Standard => write!(f, "standard"),
            GardenLayout::Extended => write!(f, "extended"),
        }
    }
}
