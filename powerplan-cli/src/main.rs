mod cli;
mod config;
mod excel;
mod report;
mod services;

use anyhow::{Context, Result};
use clap::Parser;
use colored::*;
use std::path::PathBuf;

use cli::Cli;
use config::Settings;
use excel::WriteOptions;
use services::coverage::{self, CatalogRow, CoverageError, CoverageResults, TieBreak};

fn main() {
    let cli = Cli::parse();

    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(cli.log_filter()))
        .format_timestamp(None)
        .init();

    if cli.no_color {
        colored::control::set_override(false);
    }

    if let Err(err) = run(cli) {
        eprintln!("{} {:#}", "Error:".bright_red().bold(), err);
        std::process::exit(1);
    }
}

fn run(cli: Cli) -> Result<()> {
    let mut settings = Settings::load(cli.config.as_deref())?;
    cli.apply_to(&mut settings);

    let outcome = execute(&cli, &settings, coverage::compute_coverage)?;
    report::print_summary(&outcome.results, outcome.output.as_deref(), cli.verbose > 0);
    Ok(())
}

/// Results of a completed run and where they were written (None on a dry run)
struct RunOutcome {
    results: CoverageResults,
    output: Option<PathBuf>,
}

/// Read the extract, select power plans with `select`, then resolve the output
/// path and write. Nothing is prompted for or created unless `select` succeeds.
fn execute<F>(cli: &Cli, settings: &Settings, select: F) -> Result<RunOutcome>
where
    F: FnOnce(&[CatalogRow], TieBreak) -> Result<CoverageResults, CoverageError>,
{
    if !cli.input.exists() {
        anyhow::bail!("Input file does not exist: {}", cli.input.display());
    }

    let rows = excel::read_catalog_rows(&cli.input, &settings.columns, settings.input.sheet.as_deref())
        .with_context(|| format!("Failed to read power plan extract: {}", cli.input.display()))?;

    if rows.is_empty() {
        log::warn!("No catalog rows found in {}", cli.input.display());
    }

    let results = select(&rows, settings.selection.tie_break.into())
        .context("Power plan selection failed")?;

    if cli.dry_run {
        return Ok(RunOutcome {
            results,
            output: None,
        });
    }

    let format = cli.output_format(settings);
    let output_path = cli::prompt::resolve_output_path(
        cli.output.as_deref(),
        cli.yes,
        &settings.output.default_file_name,
        format.extension(),
    )?;

    let options = WriteOptions {
        format,
        sheet_name: settings.output.sheet_name.clone(),
        summary_sheet: settings.output.summary_sheet,
    };
    excel::write_assignments(&output_path, &results, &options)?;

    Ok(RunOutcome {
        results,
        output: Some(output_path),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::path::Path;

    const EXTRACT: &str = "POWERPLAN_DESCRIPTION,CATALOG_CD,PRIMARY\nP1,C1,a\nP1,C2,b\nP2,C2,b\nP2,C3,c\n";

    fn cli_for(input: &Path, output: &Path, extra: &[&str]) -> Cli {
        let mut args = vec![
            "powerplan-cli".to_string(),
            input.display().to_string(),
            "--output".to_string(),
            output.display().to_string(),
        ];
        args.extend(extra.iter().map(|s| s.to_string()));
        Cli::try_parse_from(args).unwrap()
    }

    #[test]
    fn test_execute_writes_output() {
        let dir = tempfile::tempdir().unwrap();
        let input = dir.path().join("extract.csv");
        std::fs::write(&input, EXTRACT).unwrap();
        let output = dir.path().join("plans.csv");

        let cli = cli_for(&input, &output, &[]);
        let outcome = execute(&cli, &Settings::default(), coverage::compute_coverage).unwrap();

        assert_eq!(outcome.output.as_deref(), Some(output.as_path()));
        assert_eq!(outcome.results.assignment.len(), 2);
        let written = std::fs::read_to_string(&output).unwrap();
        assert_eq!(written, "PowerPlan,Catalog_cd,Primary\nP1,C1,a\nP1,C2,b\nP2,C3,c\n");
    }

    #[test]
    fn test_selection_error_writes_nothing() {
        let dir = tempfile::tempdir().unwrap();
        let input = dir.path().join("extract.csv");
        std::fs::write(&input, EXTRACT).unwrap();
        let output = dir.path().join("plans.xlsx");

        let cli = cli_for(&input, &output, &[]);
        let result = execute(&cli, &Settings::default(), |_, _| {
            Err(CoverageError::Unclaimable {
                codes: vec!["C9".to_string()],
                remaining_plans: 0,
            })
        });

        let err = result.err().expect("selection error should abort the run");
        let message = format!("{:#}", err);
        assert!(message.contains("Power plan selection failed"));
        assert!(message.contains("C9"));
        assert!(!output.exists());
    }

    #[test]
    fn test_input_error_writes_nothing() {
        let dir = tempfile::tempdir().unwrap();
        let input = dir.path().join("extract.csv");
        std::fs::write(&input, "POWERPLAN_DESCRIPTION,PRIMARY\nP1,a\n").unwrap();
        let output = dir.path().join("plans.xlsx");

        let cli = cli_for(&input, &output, &[]);
        let result = execute(&cli, &Settings::default(), coverage::compute_coverage);

        assert!(result.is_err());
        assert!(!output.exists());
    }

    #[test]
    fn test_dry_run_writes_nothing() {
        let dir = tempfile::tempdir().unwrap();
        let input = dir.path().join("extract.csv");
        std::fs::write(&input, EXTRACT).unwrap();
        let output = dir.path().join("plans.xlsx");

        let cli = cli_for(&input, &output, &["--dry-run"]);
        let outcome = execute(&cli, &Settings::default(), coverage::compute_coverage).unwrap();

        assert!(outcome.output.is_none());
        assert_eq!(outcome.results.universe_size, 3);
        assert!(!output.exists());
    }
}
