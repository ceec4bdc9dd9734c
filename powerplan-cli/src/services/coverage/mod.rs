// Coverage service: assigns every catalog code to exactly one power plan
//
// Pure business logic with no file or terminal I/O, so it can be driven by
// the CLI as well as by tests.

pub mod core;
pub mod error;
pub mod models;

pub use self::core::GreedySelector;
pub use error::CoverageError;
pub use models::{Assignment, AssignmentRow, CatalogRow, SelectionStep, TieBreak};

/// Complete coverage results
#[derive(Debug, Clone)]
pub struct CoverageResults {
    pub assignment: Assignment,
    pub steps: Vec<SelectionStep>,
    /// Flattened output rows in selection order
    pub rows: Vec<AssignmentRow>,
    /// Number of input rows
    pub input_rows: usize,
    /// Number of distinct catalog codes
    pub universe_size: usize,
    /// Number of distinct power plans in the input
    pub plan_count: usize,
    /// Catalog codes with no primary value
    pub missing_primaries: Vec<String>,
}

/// Compute the greedy cover for a set of input rows
/// Main orchestrator function for the coverage service
pub fn compute_coverage(
    rows: &[CatalogRow],
    tie_break: TieBreak,
) -> Result<CoverageResults, CoverageError> {
    let candidates = self::core::build_candidate_map(rows);
    let universe = self::core::build_universe(rows);
    let primaries = self::core::build_primary_lookup(rows);

    let plan_count = candidates.len();
    let universe_size = universe.len();

    log::info!(
        "Selecting power plans for {} catalog code(s) across {} plan(s) (tie-break: {})",
        universe_size,
        plan_count,
        tie_break.label()
    );

    let selection = GreedySelector::new(candidates, universe, tie_break).run()?;
    let output_rows = self::core::expand_assignment(&selection.assignment, &primaries);

    let missing_primaries: Vec<String> = output_rows
        .iter()
        .filter(|r| r.primary.is_none())
        .map(|r| r.catalog_code.clone())
        .collect();

    if !missing_primaries.is_empty() {
        log::warn!(
            "{} catalog code(s) have no primary value",
            missing_primaries.len()
        );
    }

    log::info!(
        "Selected {} of {} power plan(s)",
        selection.assignment.len(),
        plan_count
    );

    Ok(CoverageResults {
        assignment: selection.assignment,
        steps: selection.steps,
        rows: output_rows,
        input_rows: rows.len(),
        universe_size,
        plan_count,
        missing_primaries,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_compute_coverage_summary() {
        let rows = vec![
            CatalogRow::new("P1", "C1", Some("a")),
            CatalogRow::new("P1", "C2", Some("b")),
            CatalogRow::new("P2", "C2", Some("b")),
            CatalogRow::new("P2", "C3", None),
            CatalogRow::new("P3", "C3", None),
        ];

        let results = compute_coverage(&rows, TieBreak::Lexicographic).unwrap();

        assert_eq!(results.input_rows, 5);
        assert_eq!(results.universe_size, 3);
        assert_eq!(results.plan_count, 3);
        assert_eq!(results.assignment.plans(), vec!["P1", "P2"]);
        assert_eq!(results.rows.len(), 3);
        assert_eq!(results.missing_primaries, vec!["C3".to_string()]);
        assert_eq!(results.steps.len(), 2);
    }

    #[test]
    fn test_compute_coverage_empty_input() {
        let results = compute_coverage(&[], TieBreak::default()).unwrap();

        assert!(results.rows.is_empty());
        assert_eq!(results.universe_size, 0);
        assert_eq!(results.plan_count, 0);
    }
}
