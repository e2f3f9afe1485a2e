use phf::phf_set;
use std::collections::HashMap;
use std::io;

/// Strings that count as a missing value when a CSV export is read.
static NA_MARKERS: phf::Set<&'static str> = phf_set! {
    "#N/A", "#N/A N/A", "#NA", "-1.#IND", "-1.#QNAN", "-NaN", "-nan",
    "1.#IND", "1.#QNAN", "<NA>", "N/A", "NA", "NULL", "NaN", "None",
    "n/a", "nan", "null",
};

/// A single spreadsheet value.
#[derive(Debug, Clone, PartialEq, Default)]
pub enum Cell {
    #[default]
    Blank,
    Number(f64),
    Text(String),
}

impl Cell {
    /// Type a raw CSV field.
    pub fn from_field(raw: &str) -> Self {
        let trimmed = raw.trim();
        if trimmed.is_empty() || NA_MARKERS.contains(trimmed) {
            return Cell::Blank;
        }
        match trimmed.parse::<f64>() {
            Ok(n) if n.is_finite() => Cell::Number(n),
            _ => Cell::Text(raw.to_string()),
        }
    }

    pub fn is_blank(&self) -> bool {
        match self {
            Cell::Blank => true,
            Cell::Number(_) => false,
            Cell::Text(s) => s.trim().is_empty(),
        }
    }

    /// Numeric value of the cell, accepting numeric text.
    pub fn as_number(&self) -> Option<f64> {
        match self {
            Cell::Blank => None,
            Cell::Number(n) => Some(*n),
            Cell::Text(s) => s.trim().parse::<f64>().ok().filter(|n| n.is_finite()),
        }
    }

    /// Numeric value after stripping any `%` characters.
    pub fn as_percent(&self) -> Option<f64> {
        match self {
            Cell::Text(s) => s
                .trim()
                .replace('%', "")
                .parse::<f64>()
                .ok()
                .filter(|n| n.is_finite()),
            other => other.as_number(),
        }
    }

    /// Trimmed textual form, `None` for blank cells.
    pub fn label(&self) -> Option<String> {
        match self {
            Cell::Blank => None,
            Cell::Number(n) => Some(n.to_string()),
            Cell::Text(s) => {
                let t = s.trim();
                if t.is_empty() { None } else { Some(t.to_string()) }
            }
        }
    }
}

/// Rectangular table of typed cells with named columns.
///
/// Every lookup is total: unknown columns and rows outside the table read as
/// [`Cell::Blank`].
#[derive(Debug, Clone, Default)]
pub struct Grid {
    columns: Vec<String>,
    rows: Vec<Vec<Cell>>,
}

static BLANK: Cell = Cell::Blank;

impl Grid {
    pub fn new(columns: Vec<String>, rows: Vec<Vec<Cell>>) -> Self {
        let columns = unique_column_names(columns);
        let width = columns.len();
        let rows = rows
            .into_iter()
            .map(|mut r| {
                r.resize(width, Cell::Blank);
                r
            })
            .collect();
        Self { columns, rows }
    }

    /// Build a grid from CSV text whose first record holds the column names.
    pub fn from_csv_reader<R: io::Read>(reader: R) -> Result<Self, csv::Error> {
        let mut rdr = csv::ReaderBuilder::new()
            .has_headers(true)
            .flexible(true)
            .from_reader(reader);
        let columns: Vec<String> = rdr.headers()?.iter().map(|h| h.to_string()).collect();
        let width = columns.len();
        let mut rows = Vec::new();
        for (i, record) in rdr.records().enumerate() {
            let record = record?;
            if record.len() > width {
                log::warn!(
                    "Row {i} has {} fields but the header names {width}; extra fields dropped",
                    record.len()
                );
            }
            rows.push(record.iter().take(width).map(Cell::from_field).collect());
        }
        Ok(Self::new(columns, rows))
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    pub fn column_count(&self) -> usize {
        self.columns.len()
    }

    /// Column names in sheet order.
    pub fn columns(&self) -> &[String] {
        &self.columns
    }

    #[cfg(test)]
    pub fn column_index(&self, name: &str) -> Option<usize> {
        self.columns.iter().position(|c| c == name)
    }

    /// Cell at a row and column position.
    pub fn cell(&self, row: usize, col: usize) -> &Cell {
        self.rows
            .get(row)
            .and_then(|r| r.get(col))
            .unwrap_or(&BLANK)
    }

    /// Cell at a row in the named column.
    #[cfg(test)]
    pub fn get(&self, row: usize, column: &str) -> &Cell {
        match self.column_index(column) {
            Some(col) => self.cell(row, col),
            None => &BLANK,
        }
    }

    /// Trimmed label text at a position, `None` when blank.
    pub fn label(&self, row: usize, col: usize) -> Option<String> {
        self.cell(row, col).label()
    }
}

fn unique_column_names(raw: Vec<String>) -> Vec<String> {
    let mut seen: HashMap<String, usize> = HashMap::new();
    let mut out = Vec::with_capacity(raw.len());
    for (i, name) in raw.into_iter().enumerate() {
        let base = if name.trim().is_empty() {
            format!("Unnamed: {i}")
        } else {
            name
        };
        let mut candidate = base.clone();
        while let Some(count) = seen.get_mut(&candidate) {
            *count += 1;
            candidate = format!("{base}.{count}");
        }
        seen.insert(candidate.clone(), 0);
        out.push(candidate);
    }
    out
}

#[cfg(test)]
pub(crate) mod tests {
    use super::*;

    /// Build a grid from string rows; column names are `c0`, `c1`, ...
    pub(crate) fn grid_from<S: AsRef<str>, R: AsRef<[S]>>(rows: &[R]) -> Grid {
        let width = rows.iter().map(|r| r.as_ref().len()).max().unwrap_or(0);
        let columns = (0..width).map(|i| format!("c{i}")).collect();
        let rows = rows
            .iter()
            .map(|r| r.as_ref().iter().map(|f| Cell::from_field(f.as_ref())).collect())
            .collect();
        Grid::new(columns, rows)
    }

    #[test]
    fn field_typing() {
        assert_eq!(Cell::from_field(""), Cell::Blank);
        assert_eq!(Cell::from_field("   "), Cell::Blank);
        assert_eq!(Cell::from_field("N/A"), Cell::Blank);
        assert_eq!(Cell::from_field(" 62.5 "), Cell::Number(62.5));
        assert_eq!(Cell::from_field("70%"), Cell::Text("70%".into()));
        assert_eq!(Cell::from_field("inf"), Cell::Text("inf".into()));
    }

    #[test]
    fn percent_and_number_accessors() {
        assert_eq!(Cell::Text("72%".into()).as_percent(), Some(72.0));
        assert_eq!(Cell::Text("72%".into()).as_number(), None);
        assert_eq!(Cell::Number(0.5).as_percent(), Some(0.5));
        assert_eq!(Cell::Text(" 5 ".into()).as_number(), Some(5.0));
        assert_eq!(Cell::Blank.as_percent(), None);
    }

    #[test]
    fn lookups_outside_the_table_are_blank() {
        let grid = grid_from(&[vec!["a", "1"], vec!["b"]]);
        assert_eq!(grid.cell(5, 0), &Cell::Blank);
        assert_eq!(grid.cell(0, 9), &Cell::Blank);
        assert_eq!(grid.get(0, "missing"), &Cell::Blank);
        assert_eq!(grid.get(0, "c1"), &Cell::Number(1.0));
        // short rows are padded
        assert_eq!(grid.cell(1, 1), &Cell::Blank);
    }

    #[test]
    fn csv_headers_are_made_unique() {
        let data = "Name,,Name,\nSnatch,1,2,3\n";
        let grid = Grid::from_csv_reader(data.as_bytes()).unwrap();
        assert_eq!(grid.columns(), ["Name", "Unnamed: 1", "Name.1", "Unnamed: 3"]);
        assert_eq!(grid.column_index("Name.1"), Some(2));
        assert_eq!(grid.len(), 1);
        assert_eq!(grid.get(0, "Name.1"), &Cell::Number(2.0));
    }

    #[test]
    fn csv_ragged_rows() {
        let data = "a,b\n1\n2,3,4\n";
        let grid = Grid::from_csv_reader(data.as_bytes()).unwrap();
        assert_eq!(grid.len(), 2);
        assert_eq!(grid.cell(0, 1), &Cell::Blank);
        assert_eq!(grid.cell(1, 1), &Cell::Number(3.0));
        assert_eq!(grid.cell(1, 2), &Cell::Blank);
    }

    #[test]
    fn multiline_cells_survive_csv() {
        let data = "a\n\"Accessories 3 x 8-12:\nLunges\"\n";
        let grid = Grid::from_csv_reader(data.as_bytes()).unwrap();
        assert_eq!(
            grid.label(0, 0).as_deref(),
            Some("Accessories 3 x 8-12:\nLunges")
        );
    }
}
