use crate::grid::Grid;
use crate::rules::{day_number, week_number};
use serde::{Deserialize, Serialize};

/// Positional conventions of a program sheet.
///
/// Row indices count data rows, i.e. the CSV header line is not row 0.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SheetLayout {
    /// Row holding the `Week N` labels.
    pub header_row: usize,
    /// Row holding the reference (1RM) weights.
    pub reference_row: usize,
    /// First row of training data.
    pub data_start_row: usize,
    /// Week labels are only looked for from this column on.
    pub first_week_col: usize,
    /// Grids shorter than this carry no program.
    pub min_rows: usize,
    /// Rep counts above this are stray data, not sets.
    pub max_reps: u32,
    /// Loads above this are totals, not single-set weights. Kilograms.
    pub max_set_weight: f64,
}

impl Default for SheetLayout {
    fn default() -> Self {
        Self {
            header_row: 3,
            reference_row: 1,
            data_start_row: 5,
            first_week_col: 7,
            min_rows: 5,
            max_reps: 50,
            max_set_weight: 500.0,
        }
    }
}

/// Contiguous column range of one training week. Both ends inclusive.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct WeekBlock {
    pub week_number: u32,
    pub start_col: usize,
    pub end_col: usize,
}

impl WeekBlock {
    /// The column holding row labels for this week.
    pub fn label_col(&self) -> usize {
        self.start_col
    }

    /// Columns carrying set data (everything after the label column).
    pub fn data_cols(&self) -> std::ops::RangeInclusive<usize> {
        self.start_col + 1..=self.end_col
    }
}

/// Start of one training day inside a week; it ends where the next begins.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DayBlock {
    pub day_number: u32,
    pub start_row: usize,
}

/// Scan the header row for `Week N` labels and split the columns into weeks.
pub fn find_week_blocks(grid: &Grid, layout: &SheetLayout) -> Vec<WeekBlock> {
    let mut blocks = Vec::new();
    if grid.len() < layout.min_rows || grid.column_count() == 0 {
        return blocks;
    }
    let last_col = grid.column_count() - 1;
    let label_at = |col: usize| {
        grid.label(layout.header_row, col)
            .and_then(|l| week_number(&l))
    };

    let mut open: Option<(u32, usize)> = None;
    for col in layout.first_week_col..grid.column_count() {
        if let Some(week) = label_at(col) {
            if let Some((prev, start)) = open {
                blocks.push(WeekBlock {
                    week_number: prev,
                    start_col: start,
                    end_col: col - 1,
                });
            }
            open = Some((week, col));
        }
    }

    if let Some((week, start)) = open {
        let end_col = (start + 1..=last_col)
            .find(|&col| label_at(col).is_some())
            .map_or(last_col, |col| col - 1);
        blocks.push(WeekBlock {
            week_number: week,
            start_col: start,
            end_col,
        });
    }

    log::debug!("Found {} week blocks", blocks.len());
    blocks
}

/// Find the `Day N` markers in the label column of a week.
///
/// A missing `Day 1` marker is implied at `start_row`; a week without any
/// marker is a single day.
pub fn find_day_blocks(
    grid: &Grid,
    week: &WeekBlock,
    start_row: usize,
    end_row: usize,
) -> Vec<DayBlock> {
    let mut blocks: Vec<DayBlock> = (start_row..end_row.min(grid.len()))
        .filter_map(|row| {
            grid.label(row, week.label_col())
                .and_then(|l| day_number(&l))
                .map(|day_number| DayBlock {
                    day_number,
                    start_row: row,
                })
        })
        .collect();

    if !blocks.iter().any(|b| b.day_number == 1) {
        blocks.insert(
            0,
            DayBlock {
                day_number: 1,
                start_row,
            },
        );
    }
    blocks
}

/// Row range `[start, end)` of each day block.
pub fn day_row_ranges(days: &[DayBlock], end_row: usize) -> Vec<(DayBlock, usize, usize)> {
    days.iter()
        .enumerate()
        .map(|(i, day)| {
            let end = days.get(i + 1).map_or(end_row, |next| next.start_row);
            (*day, day.start_row, end)
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::grid::tests::grid_from;

    fn header_grid(labels: &[(usize, &str)], width: usize) -> Grid {
        let mut rows = vec![vec![""; width]; 6];
        for (col, label) in labels {
            rows[3][*col] = *label;
        }
        grid_from(&rows)
    }

    #[test]
    fn short_grid_has_no_weeks() {
        let grid = grid_from(&vec![vec!["", "", "", "", "", "", "", "Week 1"]; 4]);
        assert!(find_week_blocks(&grid, &SheetLayout::default()).is_empty());
    }

    #[test]
    fn two_weeks_split_at_the_second_label() {
        let grid = header_grid(&[(7, "Week 1"), (12, "Week 2")], 17);
        let blocks = find_week_blocks(&grid, &SheetLayout::default());
        assert_eq!(
            blocks,
            vec![
                WeekBlock { week_number: 1, start_col: 7, end_col: 11 },
                WeekBlock { week_number: 2, start_col: 12, end_col: 16 },
            ]
        );
    }

    #[test]
    fn labels_before_first_week_col_are_ignored() {
        let grid = header_grid(&[(2, "Week 9"), (8, "week 1")], 10);
        let blocks = find_week_blocks(&grid, &SheetLayout::default());
        assert_eq!(blocks, vec![WeekBlock { week_number: 1, start_col: 8, end_col: 9 }]);
    }

    #[test]
    fn no_day_markers_is_one_day() {
        let grid = grid_from(&vec![vec!["x"]; 12]);
        let week = WeekBlock { week_number: 1, start_col: 0, end_col: 0 };
        assert_eq!(
            find_day_blocks(&grid, &week, 5, grid.len()),
            vec![DayBlock { day_number: 1, start_row: 5 }]
        );
    }

    #[test]
    fn missing_day_one_is_inserted() {
        let mut rows = vec![vec![""]; 14];
        rows[10] = vec!["Day 2"];
        let grid = grid_from(&rows);
        let week = WeekBlock { week_number: 1, start_col: 0, end_col: 0 };
        let days = find_day_blocks(&grid, &week, 5, grid.len());
        assert_eq!(
            days,
            vec![
                DayBlock { day_number: 1, start_row: 5 },
                DayBlock { day_number: 2, start_row: 10 },
            ]
        );
        assert_eq!(
            day_row_ranges(&days, 14),
            vec![(days[0], 5, 10), (days[1], 10, 14)]
        );
    }

    #[test]
    fn explicit_day_one_is_kept() {
        let mut rows = vec![vec![""]; 12];
        rows[6] = vec!["DAY 1"];
        rows[9] = vec!["Day 2"];
        let grid = grid_from(&rows);
        let week = WeekBlock { week_number: 1, start_col: 0, end_col: 0 };
        let days = find_day_blocks(&grid, &week, 5, grid.len());
        assert_eq!(
            days,
            vec![
                DayBlock { day_number: 1, start_row: 6 },
                DayBlock { day_number: 2, start_row: 9 },
            ]
        );
    }
}
