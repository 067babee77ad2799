//! # Alchemy Garden Solver Library
//!
//! This library models the hexagonal "alchemy garden" solitaire and provides a
//! depth-first backtracking solver that finds a sequence of moves clearing the
//! whole board.
//!
//! It is used by two binaries:
//! - `garden_solver`: Reads a garden from a text file and prints a solution as
//!   a list of moves and the click sequence to play them.
//! - `garden_generator`: Deals random, known-solvable gardens from a seed and
//!   optionally solves them.
//!
//! ## Modules
//! - `element`: Tile kinds (`Element`) and the fixed pairing relation between them.
//! - `engine`: Hex positions, the `Board` with its incrementally maintained set
//!   of free tiles, and `BoardError`.
//! - `moves`: `Move` and the legal move generator (`pairings`).
//! - `heuristics`: The count-based pruning check (`has_hope`).
//! - `solver`: The lazy backtracking search (`Solutions`, `first_solution`).
//! - `layout`: Garden geometry and the standard and extended tile distributions.
//! - `generator`: Seeded generation of solvable gardens.
//! - `utils`: Reading and writing gardens in text form.

pub mod element;
pub mod engine;
pub mod generator;
pub mod heuristics;
pub mod layout;
pub mod moves;
pub mod solver;
pub mod utils;
