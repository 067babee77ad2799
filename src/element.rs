//! Tile kinds of the alchemy garden and the fixed pairing relation between them.
//!
//! - `Element`: every tile kind that can appear on the board.
//! - `ElementKind`: the rule family an element belongs to, with the metal rank
//!   carried explicitly instead of being parsed out of a label.
//! - `can_pair`: the symmetric binary pairing relation, precomputed once into a
//!   read-only table.
use std::fmt;
use std::str::FromStr;

use crate::engine::BoardError;

/// Number of distinct elements.
pub const ELEMENT_COUNT: usize = 15;

/// Number of metal ranks. The highest rank is removed on its own.
pub const METAL_COUNT: usize = 6;

/// A tile kind.
///
/// The discriminant doubles as a dense index into per-element tables, see
/// [`Element::index`].
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum Element {
    Fire,
    Water,
    Air,
    Earth,
    Lead,
    Tin,
    Iron,
    Copper,
    Silver,
    Gold,
    /// Pairs with any cardinal or with another vitae.
    Vitae,
    Quicksilver,
    Life,
    Death,
    Quintessence,
}

/// Rule family of an [`Element`].
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum ElementKind {
    Cardinal,
    /// Metal with its rank, 0 (lead) to 5 (gold).
    Metal(u8),
    Quicksilver,
    Vitae,
    /// One half of the Life/Death pair.
    Salt,
    Quintessence,
}

impl Element {
    /// All elements in index order.
    pub const ALL: [Element; ELEMENT_COUNT] = [
        Element::Fire,
        Element::Water,
        Element::Air,
        Element::Earth,
        Element::Lead,
        Element::Tin,
        Element::Iron,
        Element::Copper,
        Element::Silver,
        Element::Gold,
        Element::Vitae,
        Element::Quicksilver,
        Element::Life,
        Element::Death,
        Element::Quintessence,
    ];

    /// The four cardinals, in the order a quintessence move lists them.
    pub const CARDINALS: [Element; 4] =
        [Element::Fire, Element::Water, Element::Air, Element::Earth];

    /// Metals in the order they must leave the board.
    pub const METALS: [Element; METAL_COUNT] = [
        Element::Lead,
        Element::Tin,
        Element::Iron,
        Element::Copper,
        Element::Silver,
        Element::Gold,
    ];

    /// Dense index of this element, `0..ELEMENT_COUNT`.
    pub const fn index(self) -> usize {
        self as usize
    }

    pub const fn kind(self) -> ElementKind {
        match self {
            Element::Fire | Element::Water | Element::Air | Element::Earth => ElementKind::Cardinal,
            Element::Lead => ElementKind::Metal(0),
            Element::Tin => ElementKind::Metal(1),
            Element::Iron => ElementKind::Metal(2),
            Element::Copper => ElementKind::Metal(3),
            Element::Silver => ElementKind::Metal(4),
            Element::Gold => ElementKind::Metal(5),
            Element::Vitae => ElementKind::Vitae,
            Element::Quicksilver => ElementKind::Quicksilver,
            Element::Life | Element::Death => ElementKind::Salt,
            Element::Quintessence => ElementKind::Quintessence,
        }
    }

    /// Rank of a metal, `None` for everything else.
    ///
    /// ```
    /// use garden_solver::element::Element;
    /// assert_eq!(Element::Lead.metal_rank(), Some(0));
    /// assert_eq!(Element::Gold.metal_rank(), Some(5));
    /// assert_eq!(Element::Quicksilver.metal_rank(), None);
    /// ```
    pub const fn metal_rank(self) -> Option<u8> {
        match self.kind() {
            ElementKind::Metal(rank) => Some(rank),
            _ => None,
        }
    }

    pub const fn is_metal(self) -> bool {
        self.metal_rank().is_some()
    }

    pub const fn is_cardinal(self) -> bool {
        matches!(self.kind(), ElementKind::Cardinal)
    }

    /// Two-letter label used by the board recognizer and the text format.
    pub const fn code(self) -> &'static str {
        match self {
            Element::Fire => "FI",
            Element::Water => "WA",
            Element::Air => "AI",
            Element::Earth => "EA",
            Element::Lead => "M0",
            Element::Tin => "M1",
            Element::Iron => "M2",
            Element::Copper => "M3",
            Element::Silver => "M4",
            Element::Gold => "M5",
            Element::Vitae => "CH",
            Element::Quicksilver => "HG",
            Element::Life => "LI",
            Element::Death => "DE",
            Element::Quintessence => "QU",
        }
    }

    /// Whether `self` and `other` may be removed together as a pair.
    ///
    /// ```
    /// use garden_solver::element::Element;
    /// assert!(Element::Fire.can_pair(Element::Fire));
    /// assert!(Element::Vitae.can_pair(Element::Earth));
    /// assert!(Element::Quicksilver.can_pair(Element::Silver));
    /// assert!(!Element::Quicksilver.can_pair(Element::Gold));
    /// assert!(!Element::Life.can_pair(Element::Life));
    /// ```
    pub fn can_pair(self, other: Element) -> bool {
        PAIRINGS[self.index()][other.index()]
    }
}

impl fmt::Display for Element {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.code())
    }
}

impl FromStr for Element {
    type Err = BoardError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let label = s.trim();
        Element::ALL
            .iter()
            .copied()
            .find(|e| e.code().eq_ignore_ascii_case(label))
            .ok_or_else(|| BoardError::UnknownElement(label.to_string()))
    }
}

static PAIRINGS: [[bool; ELEMENT_COUNT]; ELEMENT_COUNT] = build_pairings();

const fn build_pairings() -> [[bool; ELEMENT_COUNT]; ELEMENT_COUNT] {
    let mut table = [[false; ELEMENT_COUNT]; ELEMENT_COUNT];
    let mut i = 0;
    while i < ELEMENT_COUNT {
        let mut j = 0;
        while j < ELEMENT_COUNT {
            table[i][j] = pairs(Element::ALL[i], Element::ALL[j]);
            j += 1;
        }
        i += 1;
    }
    table
}

const fn pairs(a: Element, b: Element) -> bool {
    match (a.kind(), b.kind()) {
        (ElementKind::Cardinal, ElementKind::Cardinal) => a as usize == b as usize,
        (ElementKind::Cardinal, ElementKind::Vitae)
        | (ElementKind::Vitae, ElementKind::Cardinal)
        | (ElementKind::Vitae, ElementKind::Vitae) => true,
        (ElementKind::Metal(rank), ElementKind::Quicksilver)
        | (ElementKind::Quicksilver, ElementKind::Metal(rank)) => (rank as usize) < METAL_COUNT - 1,
        (ElementKind::Salt, ElementKind::Salt) => a as usize != b as usize,
        _ => false,
    }
}
