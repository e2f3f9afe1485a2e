//! Turning a program sheet into an ordered stream of set records.

use crate::exercise::parse_day;
use crate::grid::Grid;
use crate::layout::{SheetLayout, WeekBlock, day_row_ranges, find_day_blocks, find_week_blocks};
use crate::reference::{ReferenceWeights, extract_reference_weights};
use serde::{Serialize, Serializer};
use std::collections::HashMap;
use std::fmt;

/// Owner of every record until a multi-user store exists.
pub const PLACEHOLDER_USER_ID: u32 = 1;

/// Prescribed repetitions: a fixed count for a set, a range for accessories.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Reps {
    Count(u32),
    Range { min: u32, max: u32 },
}

impl fmt::Display for Reps {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Reps::Count(n) => write!(f, "{n}"),
            Reps::Range { min, max } => write!(f, "{min}-{max}"),
        }
    }
}

impl Serialize for Reps {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        match self {
            Reps::Count(n) => serializer.serialize_u32(*n),
            range => serializer.collect_str(range),
        }
    }
}

/// The week and day a row belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DaySlot {
    pub week: WeekBlock,
    pub day_number: u32,
}

/// One prescribed exercise line before it gets a run-wide id.
#[derive(Debug, Clone, PartialEq)]
pub struct ExerciseEntry {
    pub week_number: u32,
    pub day_number: u32,
    pub exercise_number: u32,
    pub exercise_name: String,
    pub sets: u32,
    pub reps: Reps,
    pub weight: Option<f64>,
    pub percent: Option<f64>,
}

/// A numbered record of the output stream.
#[derive(Debug, Clone, PartialEq)]
pub struct ExerciseRecord {
    pub id: u64,
    pub program_name: String,
    pub week_number: u32,
    pub day_number: u32,
    pub exercise_number: u32,
    pub exercise_name: String,
    pub sets: u32,
    pub reps: Reps,
    pub weight: Option<f64>,
    pub percent: Option<f64>,
}

impl ExerciseRecord {
    fn new(id: u64, program_name: &str, entry: &ExerciseEntry) -> Self {
        Self {
            id,
            program_name: program_name.to_string(),
            week_number: entry.week_number,
            day_number: entry.day_number,
            exercise_number: entry.exercise_number,
            exercise_name: entry.exercise_name.clone(),
            sets: entry.sets,
            reps: entry.reps,
            weight: entry.weight,
            percent: entry.percent,
        }
    }

    pub fn is_accessory(&self) -> bool {
        matches!(self.reps, Reps::Range { .. })
    }
}

/// Exercise numbering within one day.
///
/// Primary lifts and accessories share the counter; a name seen before keeps
/// its number.
#[derive(Debug, Default)]
pub struct DayNumbering {
    current: u32,
    seen: HashMap<String, u32>,
}

impl DayNumbering {
    pub fn number_for(&mut self, name: &str) -> u32 {
        if let Some(n) = self.seen.get(name) {
            return *n;
        }
        self.current += 1;
        self.seen.insert(name.to_string(), self.current);
        self.current
    }

    /// Highest number handed out so far.
    pub fn current(&self) -> u32 {
        self.current
    }
}

/// Everything read from one program tab.
#[derive(Debug, Clone, Default)]
pub struct ParsedProgram {
    pub program_name: String,
    pub reference_weights: ReferenceWeights,
    pub weeks: Vec<WeekBlock>,
    pub entries: Vec<ExerciseEntry>,
}

/// Walk weeks, then days, then rows, collecting exercise and accessory entries.
pub fn parse_program(grid: &Grid, layout: &SheetLayout, program_name: &str) -> ParsedProgram {
    let weeks = find_week_blocks(grid, layout);
    let mut program = ParsedProgram {
        program_name: program_name.to_string(),
        ..Default::default()
    };
    if weeks.is_empty() {
        log::info!("No week labels found in {program_name}");
        return program;
    }

    program.reference_weights = extract_reference_weights(grid, layout);

    let end_row = grid.len();
    for week in &weeks {
        let days = find_day_blocks(grid, week, layout.data_start_row, end_row);
        log::debug!(
            "Week {} (columns {}..={}): {} day blocks",
            week.week_number,
            week.start_col,
            week.end_col,
            days.len()
        );
        for (day, start, end) in day_row_ranges(&days, end_row) {
            let slot = DaySlot {
                week: *week,
                day_number: day.day_number,
            };
            program
                .entries
                .extend(parse_day(grid, layout, slot, start, end));
        }
    }
    program.weeks = weeks;
    program
}

/// Accumulates records of a run and hands out the global ids.
#[derive(Debug)]
pub struct RecordAssembler {
    next_id: u64,
    records: Vec<ExerciseRecord>,
}

impl Default for RecordAssembler {
    fn default() -> Self {
        Self {
            next_id: 1,
            records: Vec::new(),
        }
    }
}

impl RecordAssembler {
    pub fn new() -> Self {
        Self::default()
    }

    /// Append a program's entries in discovery order; returns the new records.
    pub fn push_program(&mut self, program: &ParsedProgram) -> &[ExerciseRecord] {
        let first = self.records.len();
        for entry in &program.entries {
            self.records
                .push(ExerciseRecord::new(self.next_id, &program.program_name, entry));
            self.next_id += 1;
        }
        &self.records[first..]
    }

    pub fn into_records(self) -> Vec<ExerciseRecord> {
        self.records
    }
}
