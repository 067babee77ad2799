use crate::element::Element;
use crate::engine::{Board, BoardError, Position};
use crate::layout::{self, GARDEN_ROWS};

/// Label of an empty cell in the text format.
pub const EMPTY_LABEL: &str = "__";

/// Parses a garden from its text form.
///
/// Each non-blank line is one garden row, starting from row 0, made of
/// whitespace-separated two-letter labels. Token `j` of a line describes column
/// `j` of that row, so every line has up to 11 tokens and the cells outside the
/// hexagon must be written as `__`, which also marks empty cells. Lines
/// starting with `#` are comments. Missing rows and short lines are filled with
/// empty cells.
///
/// # Returns
/// * `Ok(Board)` with one tile per non-empty cell.
/// * `Err(BoardError)` if:
///     - there are more than 11 rows, or a row has more than 11 tokens
///       ([`BoardError::Format`]),
///     - a tile sits outside the hexagon ([`BoardError::Format`]),
///     - a label names no element ([`BoardError::UnknownElement`]).
///
/// # Examples
/// ```
/// use garden_solver::element::Element;
/// use garden_solver::engine::Position;
/// use garden_solver::utils::board_from_text;
///
/// let board = board_from_text("FI FI __ CH\n__ __ AI").unwrap();
/// assert_eq!(board.len(), 4);
/// assert_eq!(board.get(Position::new(0, 3)), Some(Element::Vitae));
/// assert_eq!(board.get(Position::new(1, 2)), Some(Element::Air));
///
/// assert!(board_from_text("FI XX").is_err());
/// assert!(board_from_text("__ __ __ __ __ __ FI").is_err());
/// ```
pub fn board_from_text(text: &str) -> Result<Board, BoardError> {
    let rows: Vec<(usize, &str)> = text
        .lines()
        .enumerate()
        .map(|(i, line)| (i + 1, line.trim()))
        .filter(|(_, line)| !line.is_empty() && !line.starts_with('#'))
        .collect();

    if rows.len() > GARDEN_ROWS as usize {
        return Err(BoardError::Format {
            line: rows[GARDEN_ROWS as usize].0,
            reason: format!("expected at most {} rows, found {}", GARDEN_ROWS, rows.len()),
        });
    }

    let mut board = Board::new();
    for (row, &(line, content)) in rows.iter().enumerate() {
        let tokens: Vec<&str> = content.split_whitespace().collect();
        if tokens.len() > GARDEN_ROWS as usize {
            return Err(BoardError::Format {
                line,
                reason: format!("expected at most {} cells, found {}", GARDEN_ROWS, tokens.len()),
            });
        }
        for (col, token) in tokens.into_iter().enumerate() {
            if token == EMPTY_LABEL {
                continue;
            }
            let element: Element = token.parse()?;
            let p = Position::new(row as i32, col as i32);
            if !layout::is_on_garden(p) {
                return Err(BoardError::Format {
                    line,
                    reason: format!("{element} at {p} lies outside the garden"),
                });
            }
            board.add_tile(p, element)?;
        }
    }
    Ok(board)
}

/// Writes `board` in the format read by [`board_from_text`].
///
/// Tiles outside the garden hexagon are not written.
pub fn board_to_text(board: &Board) -> String {
    (0..GARDEN_ROWS)
        .map(|row| {
            (0..GARDEN_ROWS)
                .map(|col| match board.get(Position::new(row, col)) {
                    Some(e) if layout::is_on_garden(Position::new(row, col)) => e.code(),
                    _ => EMPTY_LABEL,
                })
                .collect::<Vec<_>>()
                .join(" ")
        })
        .collect::<Vec<_>>()
        .join("\n")
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::generator::Generator;
    use crate::layout::GardenLayout;

    #[test]
    fn test_board_from_text_skips_comments_and_blank_lines() {
        let board = board_from_text("# learned board\n\nM0 __ HG\n\n__ M5\n").unwrap();
        assert_eq!(board.get(Position::new(0, 0)), Some(Element::Lead));
        assert_eq!(board.get(Position::new(0, 2)), Some(Element::Quicksilver));
        assert_eq!(board.get(Position::new(1, 1)), Some(Element::Gold));
        assert_eq!(board.len(), 3);
    }

    #[test]
    fn test_board_from_text_unknown_label() {
        let result = board_from_text("FI ZZ");
        assert_eq!(result.unwrap_err(), BoardError::UnknownElement("ZZ".to_string()));
    }

    #[test]
    fn test_board_from_text_off_garden_tile() {
        let text = "__ __ __ __ __ __ FI";
        match board_from_text(text) {
            Err(BoardError::Format { line, reason }) => {
                assert_eq!(line, 1);
                assert!(reason.contains("outside the garden"), "{reason}");
            }
            other => panic!("unexpected result {other:?}"),
        }
    }

    #[test]
    fn test_board_from_text_too_many_rows() {
        let text = vec!["__"; 12].join("\n");
        match board_from_text(&text) {
            Err(BoardError::Format { line, .. }) => assert_eq!(line, 12),
            other => panic!("unexpected result {other:?}"),
        }
    }

    #[test]
    fn test_board_from_text_row_too_long() {
        let text = vec!["__"; 12].join(" ");
        assert!(matches!(board_from_text(&text), Err(BoardError::Format { line: 1, .. })));
    }

    #[test]
    fn test_empty_text_is_empty_board() {
        assert!(board_from_text("").unwrap().is_empty());
    }

    #[test]
    fn test_text_round_trip_of_generated_garden() {
        let (board, _) = Generator::with_seed(11).generate(GardenLayout::Standard).unwrap();
        let text = board_to_text(&board);
        assert_eq!(text.lines().count(), 11);
        assert!(text.lines().all(|l| l.split_whitespace().count() == 11));
        let parsed = board_from_text(&text).unwrap();
        assert_eq!(parsed, board);
        assert_eq!(parsed.detect_layout(), Some(GardenLayout::Standard));
    }
}
