use crate::program::{ExerciseRecord, PLACEHOLDER_USER_ID, Reps};
use serde::Serialize;
use std::io::Write;
use std::path::Path;

/// Output record layout.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, clap::ValueEnum)]
pub enum OutputFormat {
    /// Delimited rows with a header and a global id column
    #[default]
    Csv,
    /// One JSON array for program import, with athlete and completion fields
    Json,
}

/// Athlete fields only present in the JSON layout.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct AthleteInfo {
    pub athlete_name: String,
    pub start_date: String,
}

#[derive(Serialize)]
struct CsvRow<'a> {
    id: u64,
    user_id: u32,
    program_name: &'a str,
    week_number: u32,
    day_number: u32,
    exercise_number: u32,
    exercise_name: &'a str,
    sets: u32,
    reps: Reps,
    weights: Option<f64>,
    notes: String,
}

impl<'a> From<&'a ExerciseRecord> for CsvRow<'a> {
    fn from(r: &'a ExerciseRecord) -> Self {
        Self {
            id: r.id,
            user_id: PLACEHOLDER_USER_ID,
            program_name: &r.program_name,
            week_number: r.week_number,
            day_number: r.day_number,
            exercise_number: r.exercise_number,
            exercise_name: &r.exercise_name,
            sets: r.sets,
            reps: r.reps,
            weights: r.weight,
            notes: r.percent.map(|p| format!("{p:.0}%")).unwrap_or_default(),
        }
    }
}

#[derive(Serialize)]
struct JsonRecord<'a> {
    user_id: String,
    athlete_name: &'a str,
    program_name: &'a str,
    start_date: &'a str,
    week_number: u32,
    day_number: u32,
    exercise_number: u32,
    exercise_name: &'a str,
    sets: u32,
    reps: String,
    weights: Option<f64>,
    percent: Option<f64>,
    completed: bool,
}

impl<'a> JsonRecord<'a> {
    fn new(r: &'a ExerciseRecord, athlete: &'a AthleteInfo) -> Self {
        Self {
            user_id: PLACEHOLDER_USER_ID.to_string(),
            athlete_name: &athlete.athlete_name,
            program_name: &r.program_name,
            start_date: &athlete.start_date,
            week_number: r.week_number,
            day_number: r.day_number,
            exercise_number: r.exercise_number,
            exercise_name: &r.exercise_name,
            sets: r.sets,
            reps: r.reps.to_string(),
            weights: r.weight,
            percent: r.percent,
            completed: false,
        }
    }
}

pub fn write_csv<T: Serialize>(writer: impl Write, records: &[T]) -> csv::Result<()> {
    let mut wtr = csv::Writer::from_writer(writer);
    for r in records {
        wtr.serialize(r)?;
    }
    wtr.flush().map_err(Into::into)
}

/// Write records in the CSV layout, header line included.
pub fn write_records_csv(writer: impl Write, records: &[ExerciseRecord]) -> csv::Result<()> {
    let rows: Vec<CsvRow> = records.iter().map(CsvRow::from).collect();
    write_csv(writer, &rows)
}

/// Write records as one JSON array in the import layout.
pub fn write_records_json(
    mut writer: impl Write,
    records: &[ExerciseRecord],
    athlete: &AthleteInfo,
) -> std::io::Result<()> {
    let rows: Vec<JsonRecord> = records
        .iter()
        .map(|r| JsonRecord::new(r, athlete))
        .collect();
    serde_json::to_writer(&mut writer, &rows)?;
    writeln!(writer)
}

pub fn save_records<P: AsRef<Path>>(
    path: P,
    format: OutputFormat,
    records: &[ExerciseRecord],
    athlete: &AthleteInfo,
) -> Result<(), crate::error::Error> {
    let file = std::fs::File::create(path)?;
    write_records(file, format, records, athlete)
}

pub fn write_records(
    writer: impl Write,
    format: OutputFormat,
    records: &[ExerciseRecord],
    athlete: &AthleteInfo,
) -> Result<(), crate::error::Error> {
    match format {
        OutputFormat::Csv => write_records_csv(writer, records)?,
        OutputFormat::Json => write_records_json(writer, records, athlete)?,
    }
    Ok(())
}
