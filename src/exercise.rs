use crate::accessory::parse_accessories;
use crate::grid::Grid;
use crate::layout::{SheetLayout, WeekBlock};
use crate::program::{DayNumbering, DaySlot, ExerciseEntry, Reps};
use crate::rules::{RowKind, canonical_exercise_name, classify_label};

/// Read every exercise and accessory block of one day.
///
/// Rows that are not recognised contribute nothing; a day without any
/// exercise rows yields an empty list.
pub fn parse_day(
    grid: &Grid,
    layout: &SheetLayout,
    slot: DaySlot,
    start_row: usize,
    end_row: usize,
) -> Vec<ExerciseEntry> {
    let mut numbering = DayNumbering::default();
    let mut entries = Vec::new();

    for row in start_row..end_row {
        let Some(label) = grid.label(row, slot.week.label_col()) else {
            continue;
        };
        match classify_label(&label) {
            RowKind::Noise | RowKind::Unrecognised => {}
            RowKind::Accessories => {
                entries.extend(parse_accessories(grid, slot, row, &label, &mut numbering));
            }
            RowKind::ExerciseHeader => {
                if !is_data_bearing(grid, &slot.week, row) {
                    log::debug!("Row {row} names {label:?} but carries no set data");
                    continue;
                }
                let name = canonical_exercise_name(&label);
                let number = numbering.number_for(&name);
                entries.extend(parse_exercise_sets(grid, layout, slot, row, &name, number));
            }
        }
    }

    log::debug!(
        "Week {} day {}: {} entries, {} distinct exercises",
        slot.week.week_number,
        slot.day_number,
        entries.len(),
        numbering.current()
    );
    entries
}

/// An exercise header owns data when the label below it is blank and its own
/// row has a number somewhere in the week's data columns.
pub fn is_data_bearing(grid: &Grid, week: &WeekBlock, row: usize) -> bool {
    if row + 1 >= grid.len() || !grid.cell(row + 1, week.label_col()).is_blank() {
        return false;
    }
    week.data_cols()
        .take_while(|&col| col < grid.column_count())
        .any(|col| grid.cell(row, col).as_number().is_some())
}

/// Parse the reps / weight / percentage rows starting at `row`.
///
/// Every column of the week becomes one single-set entry unless the reps are
/// missing or out of range, or the weight is missing or looks like a summary
/// total.
pub fn parse_exercise_sets(
    grid: &Grid,
    layout: &SheetLayout,
    slot: DaySlot,
    row: usize,
    exercise_name: &str,
    exercise_number: u32,
) -> Vec<ExerciseEntry> {
    let mut entries = Vec::new();
    if row + 2 >= grid.len() {
        return entries;
    }

    for col in slot
        .week
        .data_cols()
        .take_while(|&col| col < grid.column_count())
    {
        let Some(reps) = grid.cell(row, col).as_number().map(f64::trunc) else {
            continue;
        };
        if reps <= 0.0 || reps > f64::from(layout.max_reps) {
            log::debug!("Dropping column {col} of {exercise_name}: {reps} reps");
            continue;
        }
        let Some(weight) = grid.cell(row + 1, col).as_number() else {
            log::debug!("Dropping column {col} of {exercise_name}: no weight");
            continue;
        };
        if weight > layout.max_set_weight {
            log::debug!("Dropping column {col} of {exercise_name}: {weight} looks like a total");
            continue;
        }
        let percent = grid.cell(row + 2, col).as_percent();

        entries.push(ExerciseEntry {
            week_number: slot.week.week_number,
            day_number: slot.day_number,
            exercise_number,
            exercise_name: exercise_name.to_string(),
            sets: 1,
            reps: Reps::Count(reps as u32),
            weight: Some(weight),
            percent,
        });
    }
    entries
}
