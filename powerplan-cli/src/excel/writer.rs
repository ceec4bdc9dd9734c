//! Write assignment rows to xlsx or CSV

use anyhow::{Context, Result};
use clap::ValueEnum;
use rust_xlsxwriter::{Format, Workbook, Worksheet};
use std::path::Path;

use crate::services::coverage::{AssignmentRow, CoverageResults};

/// Output column headers
mod columns {
    pub const POWER_PLAN: &str = "PowerPlan";
    pub const CATALOG_CODE: &str = "Catalog_cd";
    pub const PRIMARY: &str = "Primary";
}

const SUMMARY_SHEET_NAME: &str = "Summary";

/// Output file format
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, ValueEnum)]
pub enum OutputFormat {
    #[default]
    Xlsx,
    Csv,
}

impl OutputFormat {
    /// File extension without the dot
    pub fn extension(&self) -> &'static str {
        match self {
            OutputFormat::Xlsx => "xlsx",
            OutputFormat::Csv => "csv",
        }
    }

    /// Infer the format from a file name's extension
    pub fn from_path(path: &Path) -> Option<Self> {
        let ext = path.extension()?.to_str()?;
        if ext.eq_ignore_ascii_case("xlsx") {
            Some(OutputFormat::Xlsx)
        } else if ext.eq_ignore_ascii_case("csv") {
            Some(OutputFormat::Csv)
        } else {
            None
        }
    }
}

/// Options for xlsx output
#[derive(Debug, Clone)]
pub struct WriteOptions {
    pub format: OutputFormat,
    pub sheet_name: String,
    pub summary_sheet: bool,
}

/// Write coverage results to `path` in the requested format
pub fn write_assignments(path: &Path, results: &CoverageResults, options: &WriteOptions) -> Result<()> {
    match options.format {
        OutputFormat::Xlsx => write_xlsx(path, results, options)?,
        OutputFormat::Csv => write_csv(path, &results.rows)?,
    }

    log::info!("Wrote {} row(s) to {}", results.rows.len(), path.display());
    Ok(())
}

fn write_xlsx(path: &Path, results: &CoverageResults, options: &WriteOptions) -> Result<()> {
    let mut workbook = Workbook::new();
    let header_format = Format::new().set_bold();

    let worksheet = workbook.add_worksheet();
    worksheet
        .set_name(&options.sheet_name)
        .with_context(|| format!("Invalid sheet name: {}", options.sheet_name))?;
    write_assignment_sheet(worksheet, &results.rows, &header_format)?;

    if options.summary_sheet {
        let summary = workbook.add_worksheet();
        summary.set_name(SUMMARY_SHEET_NAME)?;
        write_summary_sheet(summary, results, &header_format)?;
    }

    workbook
        .save(path)
        .with_context(|| format!("Failed to save Excel file: {}", path.display()))?;

    Ok(())
}

fn write_assignment_sheet(ws: &mut Worksheet, rows: &[AssignmentRow], header_format: &Format) -> Result<()> {
    let headers = [columns::POWER_PLAN, columns::CATALOG_CODE, columns::PRIMARY];
    for (col, name) in headers.iter().enumerate() {
        ws.write_string_with_format(0, col as u16, *name, header_format)?;
    }

    for (idx, record) in rows.iter().enumerate() {
        let row = (idx + 1) as u32;
        ws.write_string(row, 0, &record.power_plan)?;
        ws.write_string(row, 1, &record.catalog_code)?;
        // Missing primaries stay as empty cells
        if let Some(ref primary) = record.primary {
            ws.write_string(row, 2, primary)?;
        }
    }

    ws.autofit();
    Ok(())
}

fn write_summary_sheet(ws: &mut Worksheet, results: &CoverageResults, header_format: &Format) -> Result<()> {
    ws.write_string_with_format(0, 0, "Rank", header_format)?;
    ws.write_string_with_format(0, 1, columns::POWER_PLAN, header_format)?;
    ws.write_string_with_format(0, 2, "Catalog codes claimed", header_format)?;

    let mut row = 1u32;
    for step in &results.steps {
        ws.write_number(row, 0, step.rank as f64)?;
        ws.write_string(row, 1, &step.power_plan)?;
        ws.write_number(row, 2, step.claimed.len() as f64)?;
        row += 1;
    }

    row += 1;
    let totals = [
        ("Input rows", results.input_rows),
        ("Distinct catalog codes", results.universe_size),
        ("Distinct power plans", results.plan_count),
        ("Power plans selected", results.assignment.len()),
        ("Codes without primary", results.missing_primaries.len()),
    ];
    for (label, value) in totals {
        ws.write_string_with_format(row, 1, label, header_format)?;
        ws.write_number(row, 2, value as f64)?;
        row += 1;
    }

    ws.autofit();
    Ok(())
}

fn write_csv(path: &Path, rows: &[AssignmentRow]) -> Result<()> {
    let mut wtr = csv::Writer::from_path(path)
        .with_context(|| format!("Failed to create CSV file: {}", path.display()))?;

    wtr.write_record([columns::POWER_PLAN, columns::CATALOG_CODE, columns::PRIMARY])
        .context("Failed to write CSV header")?;

    for record in rows {
        wtr.write_record([
            record.power_plan.as_str(),
            record.catalog_code.as_str(),
            record.primary.as_deref().unwrap_or(""),
        ])
        .with_context(|| format!("Failed to write catalog code: {}", record.catalog_code))?;
    }

    wtr.flush().context("Failed to flush CSV writer")?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::ColumnSettings;
    use crate::excel::read_catalog_rows;
    use crate::services::coverage::{CatalogRow, TieBreak, compute_coverage};
    use calamine::{Data, Reader, Xlsx, open_workbook};

    fn results() -> CoverageResults {
        let rows = vec![
            CatalogRow::new("P1", "C1", Some("a")),
            CatalogRow::new("P1", "C2", Some("b")),
            CatalogRow::new("P2", "C2", Some("b")),
            CatalogRow::new("P2", "C3", None),
        ];
        compute_coverage(&rows, TieBreak::Lexicographic).unwrap()
    }

    #[test]
    fn test_output_format_from_path() {
        assert_eq!(OutputFormat::from_path(Path::new("out.xlsx")), Some(OutputFormat::Xlsx));
        assert_eq!(OutputFormat::from_path(Path::new("out.CSV")), Some(OutputFormat::Csv));
        assert_eq!(OutputFormat::from_path(Path::new("out.txt")), None);
        assert_eq!(OutputFormat::from_path(Path::new("out")), None);
    }

    #[test]
    fn test_write_csv() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("out.csv");
        let options = WriteOptions {
            format: OutputFormat::Csv,
            sheet_name: "ignored".to_string(),
            summary_sheet: false,
        };

        write_assignments(&path, &results(), &options).unwrap();

        let text = std::fs::read_to_string(&path).unwrap();
        assert_eq!(
            text,
            "PowerPlan,Catalog_cd,Primary\nP1,C1,a\nP1,C2,b\nP2,C3,\n"
        );
    }

    #[test]
    fn test_write_xlsx_with_summary() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("out.xlsx");
        let options = WriteOptions {
            format: OutputFormat::Xlsx,
            sheet_name: "Assignments".to_string(),
            summary_sheet: true,
        };

        write_assignments(&path, &results(), &options).unwrap();

        let mut workbook: Xlsx<_> = open_workbook(&path).unwrap();
        assert_eq!(workbook.sheet_names(), vec!["Assignments".to_string(), "Summary".to_string()]);

        let range = workbook.worksheet_range("Assignments").unwrap();
        let first: Vec<Data> = range.rows().next().unwrap().to_vec();
        assert_eq!(first[0], Data::String("PowerPlan".to_string()));
        assert_eq!(range.height(), 4);

        // Output columns can be fed back in with matching column names
        let columns = ColumnSettings {
            power_plan: "PowerPlan".to_string(),
            catalog_code: "Catalog_cd".to_string(),
            primary: "Primary".to_string(),
        };
        let reread = read_catalog_rows(&path, &columns, Some("Assignments")).unwrap();
        assert_eq!(reread.len(), 3);
        assert_eq!(reread[2], CatalogRow::new("P2", "C3", None));
    }
}
