//! Read catalog rows from a spreadsheet or CSV extract
//!
//! The first non-empty row of the sheet is the header. Columns are located by
//! name (case-insensitive, surrounding whitespace ignored), so extra columns
//! and any column order are accepted.

use anyhow::{Context, Result};
use calamine::{Data, Reader, open_workbook_auto};
use std::path::Path;

use super::error::InputError;
use crate::config::ColumnSettings;
use crate::services::coverage::CatalogRow;

/// Sheet label used in messages for CSV input
const CSV_SHEET_LABEL: &str = "csv";

/// Read catalog rows from `path`. CSV files are read with the `csv` crate,
/// everything else through calamine (xlsx, xlsm, xls, ods).
pub fn read_catalog_rows(
    path: &Path,
    columns: &ColumnSettings,
    sheet: Option<&str>,
) -> Result<Vec<CatalogRow>> {
    let is_csv = path
        .extension()
        .and_then(|e| e.to_str())
        .is_some_and(|e| e.eq_ignore_ascii_case("csv"));

    let table = if is_csv {
        read_csv_table(path)?
    } else {
        read_workbook_table(path, sheet)?
    };

    let rows = table.into_catalog_rows(columns)?;
    log::info!("Read {} row(s) from {}", rows.len(), path.display());
    Ok(rows)
}

/// Header plus string cells, with the 1-based row number of each data row
#[derive(Debug, Default)]
struct RawTable {
    sheet: String,
    header: Vec<String>,
    rows: Vec<(usize, Vec<Option<String>>)>,
}

struct ColumnIndices {
    power_plan: usize,
    catalog_code: usize,
    primary: Option<usize>,
}

impl RawTable {
    fn find_column(&self, name: &str) -> Option<usize> {
        let wanted = name.trim();
        self.header
            .iter()
            .position(|h| h.trim().eq_ignore_ascii_case(wanted))
    }

    fn require_column(&self, name: &str) -> Result<usize, InputError> {
        self.find_column(name).ok_or_else(|| InputError::MissingColumn {
            sheet: self.sheet.clone(),
            column: name.to_string(),
            available: self.header.iter().filter(|h| !h.is_empty()).cloned().collect(),
        })
    }

    fn column_indices(&self, columns: &ColumnSettings) -> Result<ColumnIndices, InputError> {
        let power_plan = self.require_column(&columns.power_plan)?;
        let catalog_code = self.require_column(&columns.catalog_code)?;
        let primary = self.find_column(&columns.primary);

        if primary.is_none() {
            log::warn!(
                "Sheet '{}' has no '{}' column, primaries will be empty",
                self.sheet,
                columns.primary
            );
        }

        Ok(ColumnIndices {
            power_plan,
            catalog_code,
            primary,
        })
    }

    fn into_catalog_rows(self, columns: &ColumnSettings) -> Result<Vec<CatalogRow>, InputError> {
        let indices = self.column_indices(columns)?;
        let mut out = Vec::with_capacity(self.rows.len());

        for (row_number, cells) in &self.rows {
            let cell = |idx: usize| cells.get(idx).cloned().flatten();

            // Skip fully blank rows
            if cells.iter().all(|c| c.is_none()) {
                continue;
            }

            let power_plan = cell(indices.power_plan).ok_or_else(|| InputError::BlankField {
                sheet: self.sheet.clone(),
                row: *row_number,
                column: columns.power_plan.clone(),
            })?;
            let catalog_code = cell(indices.catalog_code).ok_or_else(|| InputError::BlankField {
                sheet: self.sheet.clone(),
                row: *row_number,
                column: columns.catalog_code.clone(),
            })?;
            let primary = indices.primary.and_then(cell);

            out.push(CatalogRow {
                power_plan,
                catalog_code,
                primary,
            });
        }

        Ok(out)
    }
}

fn read_workbook_table(path: &Path, sheet: Option<&str>) -> Result<RawTable> {
    let mut workbook = open_workbook_auto(path)
        .with_context(|| format!("Failed to open spreadsheet: {}", path.display()))?;

    let sheet_names = workbook.sheet_names();
    let sheet_name = match sheet {
        Some(name) => {
            if !sheet_names.iter().any(|s| s == name) {
                return Err(InputError::SheetNotFound {
                    sheet: name.to_string(),
                    available: sheet_names,
                }
                .into());
            }
            name.to_string()
        }
        None => sheet_names.first().cloned().ok_or(InputError::NoSheets)?,
    };

    let range = workbook
        .worksheet_range(&sheet_name)
        .with_context(|| format!("Failed to read sheet: {}", sheet_name))?;

    // Row numbers as shown in the spreadsheet, accounting for leading empty rows
    let first_row = range.start().map(|(row, _)| row as usize + 1).unwrap_or(1);

    let mut rows = range.rows();
    let header: Vec<String> = match rows.next() {
        Some(cells) => cells
            .iter()
            .map(|c| cell_to_string(c).unwrap_or_default())
            .collect(),
        None => return Err(InputError::EmptySheet { sheet: sheet_name }.into()),
    };

    let data = rows
        .enumerate()
        .map(|(idx, cells)| {
            (
                first_row + idx + 1,
                cells.iter().map(cell_to_string).collect(),
            )
        })
        .collect();

    Ok(RawTable {
        sheet: sheet_name,
        header,
        rows: data,
    })
}

fn read_csv_table(path: &Path) -> Result<RawTable> {
    let mut reader = csv::ReaderBuilder::new()
        .has_headers(true)
        .flexible(true)
        .trim(csv::Trim::All)
        .from_path(path)
        .with_context(|| format!("Failed to open CSV file: {}", path.display()))?;

    let header: Vec<String> = reader
        .headers()
        .context("Failed to read CSV header")?
        .iter()
        .map(|h| h.to_string())
        .collect();

    if header.iter().all(|h| h.is_empty()) {
        return Err(InputError::EmptySheet {
            sheet: CSV_SHEET_LABEL.to_string(),
        }
        .into());
    }

    let mut rows = Vec::new();
    for (idx, record) in reader.records().enumerate() {
        let record = record.with_context(|| format!("Failed to read CSV row {}", idx + 2))?;
        let cells = record
            .iter()
            .map(|c| if c.is_empty() { None } else { Some(c.to_string()) })
            .collect();
        rows.push((idx + 2, cells));
    }

    Ok(RawTable {
        sheet: CSV_SHEET_LABEL.to_string(),
        header,
        rows,
    })
}

/// Convert a cell to trimmed text. Whole numbers lose their decimal point so
/// numeric catalog codes read the same as their text form.
fn cell_to_string(cell: &Data) -> Option<String> {
    match cell {
        Data::Empty | Data::Error(_) => None,
        Data::String(s) => {
            let trimmed = s.trim();
            if trimmed.is_empty() {
                None
            } else {
                Some(trimmed.to_string())
            }
        }
        Data::Int(i) => Some(i.to_string()),
        Data::Float(f) => {
            if f.fract() == 0.0 && f.abs() < i64::MAX as f64 {
                Some((*f as i64).to_string())
            } else {
                Some(f.to_string())
            }
        }
        Data::Bool(b) => Some(b.to_string()),
        Data::DateTime(dt) => Some(format!("{}", dt)),
        Data::DateTimeIso(s) | Data::DurationIso(s) => Some(s.clone()),
    }
}
