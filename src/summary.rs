// Summaries of extracted programs
use crate::program::ExerciseRecord;
use std::collections::{BTreeSet, HashMap};

/// Shape of one program as seen in its records.
#[derive(Debug, Default, PartialEq)]
pub struct ProgramSummary {
    pub program_name: String,
    pub total_records: usize,
    pub accessory_records: usize,
    pub weeks: usize,
    pub days: usize,
    pub exercise_types: usize,
    pub most_common_exercise: Option<String>,
}

/// Summarise records per program, in the order programs first appear.
pub fn summarize(records: &[ExerciseRecord]) -> Vec<ProgramSummary> {
    let mut order: Vec<&str> = Vec::new();
    let mut groups: HashMap<&str, Vec<&ExerciseRecord>> = HashMap::new();
    for r in records {
        let group = groups.entry(r.program_name.as_str()).or_insert_with(|| {
            order.push(r.program_name.as_str());
            Vec::new()
        });
        group.push(r);
    }

    order
        .into_iter()
        .map(|name| summarize_program(name, &groups[name]))
        .collect()
}

fn summarize_program(name: &str, records: &[&ExerciseRecord]) -> ProgramSummary {
    let weeks: BTreeSet<u32> = records.iter().map(|r| r.week_number).collect();
    let days: BTreeSet<u32> = records.iter().map(|r| r.day_number).collect();
    let mut exercise_counts: HashMap<&str, usize> = HashMap::new();
    for r in records {
        *exercise_counts.entry(r.exercise_name.as_str()).or_insert(0) += 1;
    }

    // ties go to the alphabetically first name so the result is stable
    let most_common_exercise = exercise_counts
        .iter()
        .max_by(|(a, ca), (b, cb)| ca.cmp(cb).then_with(|| b.cmp(a)))
        .map(|(ex, _)| ex.to_string());

    ProgramSummary {
        program_name: name.to_string(),
        total_records: records.len(),
        accessory_records: records.iter().filter(|r| r.is_accessory()).count(),
        weeks: weeks.len(),
        days: days.len(),
        exercise_types: exercise_counts.len(),
        most_common_exercise,
    }
}

/// One-line description for status output.
pub fn format_summary(summary: &ProgramSummary) -> String {
    let mut line = format!(
        "{}: {} weeks, {} exercise types, {} days, {} records ({} accessory)",
        summary.program_name,
        summary.weeks,
        summary.exercise_types,
        summary.days,
        summary.total_records,
        summary.accessory_records
    );
    if let Some(ex) = &summary.most_common_exercise {
        line.push_str(&format!(", most common: {ex}"));
    }
    line
}
