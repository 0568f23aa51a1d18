//! Pure win-pattern detection on the 4x4 board.
//!
//! A pattern is newly achieved when all four of its positions are completed
//! and its normalized (order-independent) position-set has not been credited
//! before. The enumeration order below is part of the contract: it fixes the
//! order in which `bingo.achieved` events are emitted when a single toggle
//! completes several lines at once.

use std::collections::HashSet;

use crate::dao::models::PatternKind;

/// Number of cells on a board.
pub const BOARD_CELLS: usize = 16;
/// Cells per winning line.
pub const LINE_LEN: usize = 4;

/// Every winning line, in detection order: rows top to bottom, columns left
/// to right, then the two diagonals.
pub const WINNING_LINES: [(PatternKind, [u8; LINE_LEN]); 10] = [
    (PatternKind::Row, [0, 1, 2, 3]),
    (PatternKind::Row, [4, 5, 6, 7]),
    (PatternKind::Row, [8, 9, 10, 11]),
    (PatternKind::Row, [12, 13, 14, 15]),
    (PatternKind::Column, [0, 4, 8, 12]),
    (PatternKind::Column, [1, 5, 9, 13]),
    (PatternKind::Column, [2, 6, 10, 14]),
    (PatternKind::Column, [3, 7, 11, 15]),
    (PatternKind::Diagonal, [0, 5, 10, 15]),
    (PatternKind::Diagonal, [3, 6, 9, 12]),
];

/// Sorted copy of a line's positions, the key under which duplicate credit
/// is detected.
pub fn normalized(positions: &[u8; LINE_LEN]) -> [u8; LINE_LEN] {
    let mut sorted = *positions;
    sorted.sort_unstable();
    sorted
}

/// Return the lines fully covered by `completed` whose normalized
/// position-set is not in `already_achieved`, in [`WINNING_LINES`] order.
pub fn detect(
    completed: &HashSet<u8>,
    already_achieved: &HashSet<[u8; LINE_LEN]>,
) -> Vec<(PatternKind, [u8; LINE_LEN])> {
    WINNING_LINES
        .iter()
        .filter(|(_, positions)| {
            positions.iter().all(|position| completed.contains(position))
                && !already_achieved.contains(&normalized(positions))
        })
        .copied()
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn completed(positions: &[u8]) -> HashSet<u8> {
        positions.iter().copied().collect()
    }

    #[test]
    fn full_row_detected_once() {
        let found = detect(&completed(&[0, 1, 2, 3]), &HashSet::new());
        assert_eq!(found, vec![(PatternKind::Row, [0, 1, 2, 3])]);
    }

    #[test]
    fn diagonal_detected() {
        let found = detect(&completed(&[0, 5, 10, 15]), &HashSet::new());
        assert_eq!(found, vec![(PatternKind::Diagonal, [0, 5, 10, 15])]);
    }

    #[test]
    fn partial_line_is_not_a_bingo() {
        let found = detect(&completed(&[0, 1, 2]), &HashSet::new());
        assert!(found.is_empty());
    }

    #[test]
    fn detection_is_idempotent() {
        let positions = completed(&[0, 1, 2, 3]);
        let first = detect(&positions, &HashSet::new());
        assert_eq!(first.len(), 1);

        let achieved = first
            .iter()
            .map(|(_, line)| normalized(line))
            .collect::<HashSet<_>>();
        assert!(detect(&positions, &achieved).is_empty());
    }

    #[test]
    fn duplicate_credit_blocked_regardless_of_order() {
        let achieved = HashSet::from([[0u8, 1, 2, 3]]);
        // Same line, recorded in scrambled order, must still be recognised.
        let found = detect(&completed(&[3, 2, 1, 0]), &achieved);
        assert!(found.is_empty());
    }

    #[test]
    fn multiple_lines_reported_in_rows_columns_diagonals_order() {
        // Completing the whole board yields all ten lines at once.
        let all = completed(&(0..16).collect::<Vec<u8>>());
        let found = detect(&all, &HashSet::new());
        assert_eq!(found.len(), WINNING_LINES.len());
        assert_eq!(found, WINNING_LINES.to_vec());
    }

    #[test]
    fn corner_cell_participates_in_row_column_and_diagonal() {
        let positions = completed(&[0, 1, 2, 3, 4, 8, 12, 5, 10, 15]);
        let found = detect(&positions, &HashSet::new());
        let kinds = found.iter().map(|(kind, _)| *kind).collect::<Vec<_>>();
        assert_eq!(
            kinds,
            vec![PatternKind::Row, PatternKind::Column, PatternKind::Diagonal]
        );
    }

    #[test]
    fn every_line_has_four_distinct_in_range_positions() {
        for (_, line) in WINNING_LINES {
            let unique = line.iter().copied().collect::<HashSet<_>>();
            assert_eq!(unique.len(), LINE_LEN);
            assert!(line.iter().all(|&p| (p as usize) < BOARD_CELLS));
        }
    }
}
