//! Command-line entry point: fetch or read program sheets and write their
//! exercise records.

use clap::Parser;
use std::fs::File;
use std::io::{self, Write};
use std::path::{Path, PathBuf};
use std::process::ExitCode;

use chrono::NaiveDate;
use log::{debug, info, warn};

mod accessory;
mod config;
use config::{SHEET_ID_ENV, Settings, resolve_sheet_id};
mod error;
use error::Error;
mod exercise;
mod export;
use export::{AthleteInfo, OutputFormat, save_records, write_records};
mod fetch;
use fetch::SheetFetcher;
mod grid;
use grid::Grid;
mod layout;
use layout::SheetLayout;
mod program;
use program::{RecordAssembler, parse_program};
mod reference;
mod rules;
mod summary;
use summary::{format_summary, summarize};

/// Extract week/day/exercise records from a weightlifting program sheet.
#[derive(Debug, Parser)]
#[command(version, about)]
struct Cli {
    /// Sheet id; falls back to PROGRAM_SHEET_ID, then the settings file
    #[arg(long)]
    sheet_id: Option<String>,
    /// Tab to process; repeat for several tabs
    #[arg(long = "tab", value_name = "NAME")]
    tabs: Vec<String>,
    /// Parse a local CSV export instead of fetching
    #[arg(long, value_name = "CSV")]
    input: Option<PathBuf>,
    #[arg(long, value_enum, default_value_t = OutputFormat::Csv)]
    format: OutputFormat,
    /// Output file; standard output when omitted
    #[arg(short, long, value_name = "PATH")]
    output: Option<PathBuf>,
    /// Athlete name for JSON output
    #[arg(long, default_value = "", value_parser = parse_athlete)]
    athlete: String,
    /// Program start date for JSON output
    #[arg(long, value_name = "YYYY-MM-DD")]
    start_date: Option<NaiveDate>,
    /// Print a summary of each program to stderr
    #[arg(long)]
    summary: bool,
    /// Print each tab's reference weights as JSON to stderr
    #[arg(long)]
    reference_weights: bool,
    /// Store the sheet id and tabs of this run in the settings file
    #[arg(long)]
    save_settings: bool,
}

fn parse_athlete(s: &str) -> Result<String, String> {
    Ok(s.trim().to_lowercase())
}

impl Cli {
    fn athlete(&self) -> AthleteInfo {
        AthleteInfo {
            athlete_name: self.athlete.clone(),
            start_date: self
                .start_date
                .map(|d| d.format("%Y-%m-%d").to_string())
                .unwrap_or_default(),
        }
    }
}

/// Program name for a local file: the first `--tab`, else the file stem.
fn input_program_name(cli: &Cli, input: &Path) -> String {
    cli.tabs.first().cloned().unwrap_or_else(|| {
        input
            .file_stem()
            .map(|s| s.to_string_lossy().into_owned())
            .unwrap_or_else(|| "program".to_string())
    })
}

fn process_grid(
    assembler: &mut RecordAssembler,
    grid: &Grid,
    layout: &SheetLayout,
    program_name: &str,
    cli: &Cli,
) -> Result<(), Error> {
    if grid.is_empty() {
        warn!("{program_name} has no rows");
    }
    debug!(
        "{program_name}: {} rows under columns {:?}",
        grid.len(),
        grid.columns()
    );
    let program = parse_program(grid, layout, program_name);
    if program.reference_weights.is_empty() {
        debug!("No reference weights in {program_name}");
    } else {
        debug!(
            "{} reference weights in {program_name}: {}",
            program.reference_weights.len(),
            serde_json::to_string(&program.reference_weights)?
        );
    }
    if cli.reference_weights {
        eprintln!(
            "{program_name}: {}",
            serde_json::to_string(&program.reference_weights)?
        );
    }
    let added = assembler.push_program(&program).len();
    info!(
        "Processed {program_name}: {} weeks, {added} records",
        program.weeks.len()
    );
    Ok(())
}

fn run(cli: &Cli) -> Result<(), Error> {
    let mut settings = Settings::load();
    let mut assembler = RecordAssembler::new();

    if let Some(input) = &cli.input {
        let name = input_program_name(cli, input);
        let grid = File::open(input)
            .map_err(Error::from)
            .and_then(|f| Grid::from_csv_reader(f).map_err(Error::from))
            .map_err(|e| e.in_tab(&name))?;
        process_grid(&mut assembler, &grid, &settings.layout, &name, cli)?;
    } else {
        let sheet_id = resolve_sheet_id(cli.sheet_id.as_deref(), &settings).ok_or_else(|| {
            Error::Config(format!(
                "No sheet id given; pass --sheet-id or set {SHEET_ID_ENV}"
            ))
        })?;
        let tabs = if cli.tabs.is_empty() {
            settings.tabs.clone()
        } else {
            cli.tabs.clone()
        };
        let fetcher = SheetFetcher::new(settings.timeout());

        if tabs.is_empty() {
            let grid = fetch_grid(&fetcher, &sheet_id, None).map_err(|e| e.in_tab(&sheet_id))?;
            process_grid(&mut assembler, &grid, &settings.layout, &sheet_id, cli)?;
        }
        for tab in &tabs {
            let grid = fetch_grid(&fetcher, &sheet_id, Some(tab)).map_err(|e| e.in_tab(tab))?;
            process_grid(&mut assembler, &grid, &settings.layout, tab, cli)?;
        }

        if cli.save_settings {
            settings.sheet_id = Some(sheet_id);
            settings.tabs = tabs;
            let path = settings.save()?;
            info!("Saved settings to {}", path.display());
        }
    }

    let records = assembler.into_records();
    for s in summarize(&records) {
        info!("{}", format_summary(&s));
        if cli.summary {
            eprintln!("{}", format_summary(&s));
        }
    }

    let athlete = cli.athlete();
    match &cli.output {
        Some(path) => {
            save_records(path, cli.format, &records, &athlete)?;
            info!("Wrote {} records to {}", records.len(), path.display());
        }
        None => {
            let stdout = io::stdout();
            let mut out = stdout.lock();
            write_records(&mut out, cli.format, &records, &athlete)?;
            out.flush()?;
        }
    }
    Ok(())
}

fn fetch_grid(fetcher: &SheetFetcher, sheet_id: &str, tab: Option<&str>) -> Result<Grid, Error> {
    let text = fetcher.fetch_csv(sheet_id, tab)?;
    Ok(Grid::from_csv_reader(text.as_bytes())?)
}

fn main() -> ExitCode {
    env_logger::init();
    let cli = Cli::parse();
    match run(&cli) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("Error: {e}");
            ExitCode::FAILURE
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;
    use crate::config::tests::ConfigHome;

    const SHEET: &str = "\
a,b,c,d,e,f,g,h,i,j,k,l
,,,,,,,,,,,
100,,,120,150,,,,,,,
,,,,,,,,,,,
,,,,,,,Week 1,,,,
,,,,,,,,,,,
,,,,,,,Snatch,3,3,,
,,,,,,,,70,72.5,,
,,,,,,,,70%,72%,,
,,,,,,,\"Accessories 3 x 8-12
Lunges\",,,,
";

    fn cli(args: &[&str]) -> Cli {
        Cli::try_parse_from(std::iter::once("program_sheet_scraper").chain(args.iter().copied()))
            .unwrap()
    }

    #[test]
    fn verify_cli() {
        Cli::command().debug_assert();
    }

    #[test]
    fn parses_arguments() {
        let c = cli(&[
            "--tab",
            "A",
            "--tab",
            "B",
            "--athlete",
            "  Sam Lee ",
            "--start-date",
            "2025-01-06",
            "--format",
            "json",
        ]);
        assert_eq!(c.tabs, vec!["A", "B"]);
        assert_eq!(c.format, OutputFormat::Json);
        let athlete = c.athlete();
        assert_eq!(athlete.athlete_name, "sam lee");
        assert_eq!(athlete.start_date, "2025-01-06");

        assert!(
            Cli::try_parse_from(["program_sheet_scraper", "--start-date", "06/01/2025"]).is_err()
        );
    }

    #[test]
    fn input_name_defaults_to_file_stem() {
        let c = cli(&["--input", "/tmp/Strength Block.csv"]);
        assert_eq!(
            input_program_name(&c, Path::new("/tmp/Strength Block.csv")),
            "Strength Block"
        );
        let c = cli(&["--input", "x.csv", "--tab", "4-Day Template"]);
        assert_eq!(input_program_name(&c, Path::new("x.csv")), "4-Day Template");
    }

    #[test]
    fn local_file_to_csv_output() {
        let _home = ConfigHome::new();
        let dir = tempfile::tempdir().unwrap();
        let input = dir.path().join("Template.csv");
        let output = dir.path().join("out.csv");
        std::fs::write(&input, SHEET).unwrap();

        let c = cli(&[
            "--input",
            input.to_str().unwrap(),
            "-o",
            output.to_str().unwrap(),
        ]);
        run(&c).unwrap();

        let text = std::fs::read_to_string(&output).unwrap();
        let lines: Vec<_> = text.lines().collect();
        assert_eq!(lines.len(), 4);
        assert_eq!(lines[1], "1,1,Template,1,1,1,Snatch,1,3,70.0,70%");
        assert_eq!(lines[2], "2,1,Template,1,1,1,Snatch,1,3,72.5,72%");
        assert_eq!(lines[3], "3,1,Template,1,1,2,Lunges,3,8-12,,");
    }

    #[test]
    fn missing_input_names_the_program() {
        let _home = ConfigHome::new();
        let c = cli(&["--input", "/nonexistent/Block.csv"]);
        let err = run(&c).unwrap_err();
        assert!(err.to_string().starts_with("Error processing Block: "));
    }

    #[test]
    fn fetch_without_sheet_id_fails() {
        let _home = ConfigHome::new();
        unsafe {
            std::env::remove_var(SHEET_ID_ENV);
        }
        let err = run(&cli(&[])).unwrap_err();
        assert!(matches!(err, Error::Config(_)));
    }
}
