use crate::grid::Grid;
use crate::layout::SheetLayout;
use serde::{Serialize, Serializer};

/// Lift named by each of the leading columns of the reference row.
pub const REFERENCE_LIFTS: [&str; 6] = [
    "Snatch",
    "Clean",
    "Jerk",
    "Clean and Jerk",
    "Back Squat",
    "Front Squat",
];

/// Baseline (1RM style) weights the program's percentages refer to.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ReferenceWeights {
    entries: Vec<(&'static str, f64)>,
}

impl ReferenceWeights {
    #[cfg(test)]
    pub fn get(&self, lift: &str) -> Option<f64> {
        self.entries
            .iter()
            .find(|(name, _)| *name == lift)
            .map(|(_, w)| *w)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&'static str, f64)> + '_ {
        self.entries.iter().copied()
    }
}

impl Serialize for ReferenceWeights {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_map(self.iter())
    }
}

/// Read the reference weights; non-numeric cells are skipped.
pub fn extract_reference_weights(grid: &Grid, layout: &SheetLayout) -> ReferenceWeights {
    let entries = REFERENCE_LIFTS
        .iter()
        .enumerate()
        .take(grid.column_count())
        .filter_map(|(col, lift)| {
            grid.cell(layout.reference_row, col)
                .as_number()
                .map(|w| (*lift, w))
        })
        .collect();
    ReferenceWeights { entries }
}
