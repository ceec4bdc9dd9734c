/// Input validation errors raised before the coverage service runs
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum InputError {
    /// Workbook contains no sheets
    NoSheets,
    /// Requested sheet does not exist
    SheetNotFound {
        sheet: String,
        available: Vec<String>,
    },
    /// Sheet has no header row
    EmptySheet { sheet: String },
    /// Required column missing from the header row
    MissingColumn {
        sheet: String,
        column: String,
        available: Vec<String>,
    },
    /// Required cell is blank in an otherwise non-blank row
    BlankField {
        sheet: String,
        row: usize,
        column: String,
    },
}

impl std::fmt::Display for InputError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            InputError::NoSheets => write!(f, "Workbook has no sheets"),
            InputError::SheetNotFound { sheet, available } => write!(
                f,
                "Sheet '{}' not found (available: {})",
                sheet,
                available.join(", ")
            ),
            InputError::EmptySheet { sheet } => {
                write!(f, "Sheet '{}' is empty - expected a header row", sheet)
            }
            InputError::MissingColumn {
                sheet,
                column,
                available,
            } => write!(
                f,
                "Sheet '{}' has no '{}' column (found: {})",
                sheet,
                column,
                available.join(", ")
            ),
            InputError::BlankField { sheet, row, column } => write!(
                f,
                "Sheet '{}' row {}: '{}' is blank",
                sheet, row, column
            ),
        }
    }
}

impl std::error::Error for InputError {}
