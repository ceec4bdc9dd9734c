//! Terminal summary of a coverage run

use colored::*;
use std::path::Path;

use crate::services::coverage::CoverageResults;

/// Print run totals, and each selection step when `verbose` is set
pub fn print_summary(results: &CoverageResults, output: Option<&Path>, verbose: bool) {
    if verbose {
        print_steps(results);
    }

    println!("{}", "Power plan coverage".bold());
    println!("  Input rows:              {}", results.input_rows);
    println!("  Distinct catalog codes:  {}", results.universe_size);
    println!("  Distinct power plans:    {}", results.plan_count);
    println!(
        "  Power plans selected:    {}",
        results.assignment.len().to_string().bright_green().bold()
    );
    println!("  Catalog codes assigned:  {}", results.assignment.code_count());

    let missing = results.missing_primaries.len();
    if missing > 0 {
        println!(
            "  Codes without primary:   {}",
            missing.to_string().yellow()
        );
    } else {
        println!("  Codes without primary:   0");
    }

    match output {
        Some(path) => println!("  Output written to:       {}", path.display().to_string().cyan()),
        None => println!("  {}", "Dry run - no output written".dimmed()),
    }
}

fn print_steps(results: &CoverageResults) {
    let width = results
        .steps
        .iter()
        .map(|s| s.power_plan.len())
        .max()
        .unwrap_or(0);

    for step in &results.steps {
        println!(
            "  {:>4}. {:<width$}  claims {:>5}  remaining {:>5}",
            step.rank,
            step.power_plan,
            step.claimed.len(),
            step.remaining_after,
            width = width
        );
    }
    println!();
}
