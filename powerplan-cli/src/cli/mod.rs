//! Command line arguments

pub mod prompt;

use clap::Parser;
use std::path::PathBuf;

use crate::config::{Settings, TieBreakMode};
use crate::excel::OutputFormat;

/// Assign every catalog code in a power plan extract to the fewest power plans that cover them
#[derive(Debug, Parser)]
#[command(name = "powerplan-cli", version, about)]
pub struct Cli {
    /// Path to the power plan extract (.xlsx, .xlsm, .xls, .ods or .csv)
    pub input: PathBuf,

    /// Output file; skips the file name prompt
    #[arg(short, long)]
    pub output: Option<PathBuf>,

    /// Sheet to read from the input workbook (default: first sheet)
    #[arg(short, long)]
    pub sheet: Option<String>,

    /// Order used to break ties between equally large power plans
    #[arg(long, value_enum)]
    pub tie_break: Option<TieBreakMode>,

    /// Output format (default: inferred from the output file name, else xlsx)
    #[arg(long, value_enum)]
    pub format: Option<OutputFormat>,

    /// Settings file (default: <config dir>/powerplan-cli/config.toml)
    #[arg(long)]
    pub config: Option<PathBuf>,

    /// Accept the default output file name without prompting
    #[arg(short, long)]
    pub yes: bool,

    /// Run the selection and print the summary without writing a file
    #[arg(long)]
    pub dry_run: bool,

    /// Disable colored output
    #[arg(long)]
    pub no_color: bool,

    /// Increase logging verbosity (-v info, -vv debug, -vvv trace)
    #[arg(short, long, action = clap::ArgAction::Count)]
    pub verbose: u8,
}

impl Cli {
    /// Log filter implied by the verbosity flags
    pub fn log_filter(&self) -> &'static str {
        match self.verbose {
            0 => "warn",
            1 => "info",
            2 => "debug",
            _ => "trace",
        }
    }

    /// Apply command line overrides on top of file settings
    pub fn apply_to(&self, settings: &mut Settings) {
        if let Some(ref sheet) = self.sheet {
            settings.input.sheet = Some(sheet.clone());
        }
        if let Some(tie_break) = self.tie_break {
            settings.selection.tie_break = tie_break;
        }
    }

    /// Output format: explicit flag, else the output file's extension, else the
    /// default file name's extension, else xlsx
    pub fn output_format(&self, settings: &Settings) -> OutputFormat {
        self.format
            .or_else(|| self.output.as_deref().and_then(OutputFormat::from_path))
            .or_else(|| {
                OutputFormat::from_path(std::path::Path::new(&settings.output.default_file_name))
            })
            .unwrap_or_default()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn parse(args: &[&str]) -> Cli {
        Cli::try_parse_from(std::iter::once("powerplan-cli").chain(args.iter().copied())).unwrap()
    }

    #[test]
    fn test_minimal_args() {
        let cli = parse(&["extract.xlsx"]);

        assert_eq!(cli.input, PathBuf::from("extract.xlsx"));
        assert!(cli.output.is_none());
        assert!(!cli.yes);
        assert_eq!(cli.log_filter(), "warn");
    }

    #[test]
    fn test_input_is_required() {
        assert!(Cli::try_parse_from(["powerplan-cli"]).is_err());
    }

    #[test]
    fn test_verbosity_levels() {
        assert_eq!(parse(&["in.xlsx", "-v"]).log_filter(), "info");
        assert_eq!(parse(&["in.xlsx", "-vv"]).log_filter(), "debug");
        assert_eq!(parse(&["in.xlsx", "-vvvv"]).log_filter(), "trace");
    }

    #[test]
    fn test_overrides_apply_to_settings() {
        let cli = parse(&["in.xlsx", "--sheet", "Extract", "--tie-break", "input-order"]);
        let mut settings = Settings::default();
        cli.apply_to(&mut settings);

        assert_eq!(settings.input.sheet.as_deref(), Some("Extract"));
        assert_eq!(settings.selection.tie_break, TieBreakMode::InputOrder);
    }

    #[test]
    fn test_output_format_resolution() {
        let settings = Settings::default();

        assert_eq!(parse(&["in.xlsx"]).output_format(&settings), OutputFormat::Xlsx);
        assert_eq!(
            parse(&["in.xlsx", "-o", "plans.csv"]).output_format(&settings),
            OutputFormat::Csv
        );
        assert_eq!(
            parse(&["in.xlsx", "-o", "plans.csv", "--format", "xlsx"]).output_format(&settings),
            OutputFormat::Xlsx
        );

        let mut csv_default = Settings::default();
        csv_default.output.default_file_name = "plans.csv".to_string();
        assert_eq!(parse(&["in.xlsx"]).output_format(&csv_default), OutputFormat::Csv);
    }
}
