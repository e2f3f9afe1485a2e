use crate::grid::Grid;
use crate::program::{DayNumbering, DaySlot, ExerciseEntry, Reps};
use crate::rules::{ACCESSORY_HEADING_LINES, ends_accessory_list, is_accessory_name};
use once_cell::sync::Lazy;
use regex::Regex;

/// Rows below an accessory cell that may hold exercise names.
const LOOKAHEAD_ROWS: usize = 4;

static LABELLED_SCHEME: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"(?i)Accessories\s+(\d+)\s*[x×]\s*(\d+)\s*[-–]\s*(\d+)")
        .expect("accessory scheme pattern")
});
static BARE_SCHEME: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"(\d+)\s*[xX×]\s*(\d+)\s*[-–]\s*(\d+)").expect("bare scheme pattern")
});

/// Sets and rep range shared by every accessory of a block.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AccessoryScheme {
    pub sets: u32,
    pub reps_min: u32,
    pub reps_max: u32,
}

impl Default for AccessoryScheme {
    fn default() -> Self {
        Self {
            sets: 2,
            reps_min: 10,
            reps_max: 15,
        }
    }
}

impl AccessoryScheme {
    /// Read `"<sets> x <min>-<max>"` from the cell text, falling back to
    /// 2 x 10-15 when no scheme is written.
    pub fn parse(text: &str) -> Self {
        [&*LABELLED_SCHEME, &*BARE_SCHEME]
            .iter()
            .find_map(|re| {
                let caps = re.captures(text)?;
                Some(Self {
                    sets: caps[1].parse().ok()?,
                    reps_min: caps[2].parse().ok()?,
                    reps_max: caps[3].parse().ok()?,
                })
            })
            .unwrap_or_default()
    }

    pub fn reps(&self) -> Reps {
        Reps::Range {
            min: self.reps_min,
            max: self.reps_max,
        }
    }
}

/// Collect accessory names from the lines of the cell after its first line,
/// then from up to four label cells below it.
pub fn accessory_names(grid: &Grid, col: usize, row: usize, cell_text: &str) -> Vec<String> {
    let mut names: Vec<String> = cell_text
        .lines()
        .skip(1)
        .map(str::trim)
        .filter(|line| !ACCESSORY_HEADING_LINES.contains(line))
        .filter(|line| is_accessory_name(line))
        .map(str::to_string)
        .collect();

    for below in row + 1..=row + LOOKAHEAD_ROWS {
        if below >= grid.len() {
            break;
        }
        let Some(label) = grid.label(below, col) else {
            continue;
        };
        if ends_accessory_list(&label) {
            break;
        }
        if is_accessory_name(&label) {
            names.push(label);
        }
    }
    names
}

/// One entry per accessory name, numbered on the day's shared counter.
pub fn parse_accessories(
    grid: &Grid,
    slot: DaySlot,
    row: usize,
    cell_text: &str,
    numbering: &mut DayNumbering,
) -> Vec<ExerciseEntry> {
    let scheme = AccessoryScheme::parse(cell_text);
    let names = accessory_names(grid, slot.week.label_col(), row, cell_text);
    log::debug!(
        "Accessories at row {row}: {} x {}, {} exercises",
        scheme.sets,
        scheme.reps(),
        names.len()
    );

    names
        .into_iter()
        .map(|name| ExerciseEntry {
            week_number: slot.week.week_number,
            day_number: slot.day_number,
            exercise_number: numbering.number_for(&name),
            exercise_name: name,
            sets: scheme.sets,
            reps: scheme.reps(),
            weight: None,
            percent: None,
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::exercise::parse_day;
    use crate::layout::{SheetLayout, WeekBlock};
    use crate::program::tests::sheet;

    fn slot() -> DaySlot {
        DaySlot {
            week: WeekBlock {
                week_number: 2,
                start_col: 7,
                end_col: 11,
            },
            day_number: 3,
        }
    }

    #[test]
    fn scheme_patterns_in_priority_order() {
        let scheme = AccessoryScheme::parse("Accessories 3 x 8-12:");
        assert_eq!((scheme.sets, scheme.reps_min, scheme.reps_max), (3, 8, 12));
        let scheme = AccessoryScheme::parse("ACCESSORIES 4×6–8");
        assert_eq!((scheme.sets, scheme.reps_min, scheme.reps_max), (4, 6, 8));
        let scheme = AccessoryScheme::parse("Accessories (do 3X 10-20)");
        assert_eq!((scheme.sets, scheme.reps_min, scheme.reps_max), (3, 10, 20));
        assert_eq!(AccessoryScheme::parse("Accessories:"), AccessoryScheme::default());
        assert_eq!(AccessoryScheme::default().reps().to_string(), "10-15");
    }

    #[test]
    fn embedded_lines_continue_day_numbering() {
        let grid = sheet(&[
            &[(7, "Snatch"), (8, "2")],
            &[(8, "80")],
            &[(8, "75%")],
            &[(7, "Accessories 3 x 8-12:\nLunges\nFace Pulls")],
        ]);
        let entries = parse_day(&grid, &SheetLayout::default(), slot(), 5, grid.len());
        assert_eq!(entries.len(), 3);
        let accessories = &entries[1..];
        assert_eq!(accessories[0].exercise_name, "Lunges");
        assert_eq!(accessories[1].exercise_name, "Face Pulls");
        for (acc, number) in accessories.iter().zip([2, 3]) {
            assert_eq!(acc.exercise_number, number);
            assert_eq!(acc.sets, 3);
            assert_eq!(acc.reps, Reps::Range { min: 8, max: 12 });
            assert_eq!(acc.weight, None);
            assert_eq!(acc.percent, None);
            assert_eq!(acc.week_number, 2);
            assert_eq!(acc.day_number, 3);
        }
    }

    #[test]
    fn primary_lift_after_accessories_takes_next_number() {
        let grid = sheet(&[
            &[(7, "Snatch"), (8, "2")],
            &[(8, "80")],
            &[(8, "75%")],
            &[(7, "Accessories\nLunges")],
            &[(7, "Clean"), (8, "3")],
            &[(8, "90")],
            &[(8, "75%")],
        ]);
        let entries = parse_day(&grid, &SheetLayout::default(), slot(), 5, grid.len());
        let numbered: Vec<_> = entries
            .iter()
            .map(|e| (e.exercise_name.as_str(), e.exercise_number))
            .collect();
        assert_eq!(numbered, vec![("Snatch", 1), ("Lunges", 2), ("Clean", 3)]);
    }

    #[test]
    fn rows_below_until_a_stop_label() {
        let text = "Accessories 2 x 10-15\nAthlete Comments:";
        let grid = sheet(&[
            &[(7, text)],
            &[(7, "Ring Rows")],
            &[],
            &[(7, "12")],
            &[(7, "Hang Snatch")],
            &[(7, "Back Extensions")],
        ]);
        let mut numbering = DayNumbering::default();
        let entries = parse_accessories(&grid, slot(), 5, text, &mut numbering);
        let names: Vec<_> = entries.iter().map(|e| e.exercise_name.as_str()).collect();
        assert_eq!(names, vec!["Ring Rows"]);
        assert_eq!(numbering.current(), 1);
    }

    #[test]
    fn lookahead_is_limited_to_four_rows() {
        let grid = sheet(&[
            &[(7, "Accessories")],
            &[(7, "Dips")],
            &[(7, "Pull-ups")],
            &[(7, "Planks")],
            &[(7, "Side Planks")],
            &[(7, "Farmer Carries")],
        ]);
        let names = accessory_names(&grid, 7, 5, "Accessories");
        assert_eq!(names, vec!["Dips", "Pull-ups", "Planks", "Side Planks"]);
    }

    #[test]
    fn repeated_accessory_keeps_its_number() {
        let mut numbering = DayNumbering::default();
        assert_eq!(numbering.number_for("Snatch"), 1);
        let text = "Accessories 2 x 10-15\nDips\nDips";
        let grid = sheet(&[&[(7, text)]]);
        let entries = parse_accessories(&grid, slot(), 5, text, &mut numbering);
        let numbers: Vec<_> = entries.iter().map(|e| e.exercise_number).collect();
        assert_eq!(numbers, vec![2, 2]);
        assert_eq!(entries[0].reps.to_string(), "10-15");
    }
}
