//! Core set-cover functions: candidate/universe/primary builders, the greedy
//! selector and the output expander

use std::collections::{BTreeSet, HashMap};

use super::error::CoverageError;
use super::models::{
    Assignment, AssignmentRow, CandidateMap, CatalogRow, PlanCandidates, PrimaryLookup,
    SelectionStep, TieBreak,
};

/// Group rows by power plan, collapsing duplicate catalog codes.
/// Plans are kept in the order they first appear in `rows`.
pub fn build_candidate_map(rows: &[CatalogRow]) -> CandidateMap {
    let mut index: HashMap<&str, usize> = HashMap::new();
    let mut entries: Vec<PlanCandidates> = Vec::new();

    for row in rows {
        let idx = *index.entry(row.power_plan.as_str()).or_insert_with(|| {
            entries.push(PlanCandidates {
                power_plan: row.power_plan.clone(),
                first_seen: entries.len(),
                catalog_codes: BTreeSet::new(),
            });
            entries.len() - 1
        });

        if let Some(entry) = entries.get_mut(idx) {
            entry.catalog_codes.insert(row.catalog_code.clone());
        }
    }

    CandidateMap::from_entries(entries)
}

/// All distinct catalog codes in `rows`
pub fn build_universe(rows: &[CatalogRow]) -> BTreeSet<String> {
    rows.iter().map(|r| r.catalog_code.clone()).collect()
}

/// Map each catalog code to its primary value.
///
/// When a code carries different primaries the last one in input order wins.
/// Rows with no primary never overwrite a value seen earlier.
pub fn build_primary_lookup(rows: &[CatalogRow]) -> PrimaryLookup {
    let mut lookup = PrimaryLookup::new();

    for row in rows {
        let Some(primary) = &row.primary else {
            continue;
        };

        if let Some(previous) = lookup.insert(row.catalog_code.clone(), primary.clone()) {
            if &previous != primary {
                log::warn!(
                    "Catalog code {} has conflicting primaries '{}' and '{}', keeping '{}'",
                    row.catalog_code,
                    previous,
                    primary,
                    primary
                );
            }
        }
    }

    lookup
}

/// Outcome of a complete greedy run
#[derive(Debug, Clone)]
pub struct Selection {
    pub assignment: Assignment,
    pub steps: Vec<SelectionStep>,
}

/// Greedy set-cover state: the shrinking candidate map and universe plus the growing assignment
#[derive(Debug, Clone)]
pub struct GreedySelector {
    candidates: CandidateMap,
    universe: BTreeSet<String>,
    assignment: Assignment,
    steps: Vec<SelectionStep>,
}

impl GreedySelector {
    /// Create a selector. Candidate codes outside `universe` are dropped and the
    /// candidate map is put in the scan order given by `tie_break`.
    pub fn new(mut candidates: CandidateMap, universe: BTreeSet<String>, tie_break: TieBreak) -> Self {
        candidates.restrict_to(&universe);
        candidates.order_by(tie_break);

        Self {
            candidates,
            universe,
            assignment: Assignment::new(),
            steps: Vec::new(),
        }
    }

    fn unclaimable(&self) -> CoverageError {
        CoverageError::Unclaimable {
            codes: self.universe.iter().cloned().collect(),
            remaining_plans: self.candidates.len(),
        }
    }

    /// Run one iteration. Returns `Ok(None)` once every code has been claimed.
    pub fn step(&mut self) -> Result<Option<SelectionStep>, CoverageError> {
        if self.universe.is_empty() {
            return Ok(None);
        }

        let best = self
            .candidates
            .largest()
            // an empty winner means every remaining plan is empty
            .filter(|&idx| self.candidates.iter().nth(idx).is_some_and(|e| !e.is_empty()));

        let Some(idx) = best else {
            return Err(self.unclaimable());
        };

        let candidate_sizes: Vec<(String, usize)> = self
            .candidates
            .iter()
            .map(|e| (e.power_plan.clone(), e.len()))
            .collect();

        let Some(selected) = self.candidates.take(idx) else {
            return Err(self.unclaimable());
        };

        let remaining_before = self.universe.len();
        self.candidates.subtract(&selected.catalog_codes);
        self.universe.retain(|code| !selected.catalog_codes.contains(code));

        let claimed: Vec<String> = selected.catalog_codes.into_iter().collect();
        // plan names are unique in the candidate map, so this is the plan's only claim
        self.assignment.record(selected.power_plan.clone(), claimed.clone());

        let step = SelectionStep {
            rank: self.steps.len() + 1,
            power_plan: selected.power_plan,
            claimed,
            candidate_sizes,
            remaining_before,
            remaining_after: self.universe.len(),
        };

        log::debug!(
            "Step {}: {} claims {} code(s), {} remaining",
            step.rank,
            step.power_plan,
            step.claimed.len(),
            step.remaining_after
        );

        self.steps.push(step.clone());
        Ok(Some(step))
    }

    /// Run until every code is claimed
    pub fn run(mut self) -> Result<Selection, CoverageError> {
        while self.step()?.is_some() {}

        Ok(Selection {
            assignment: self.assignment,
            steps: self.steps,
        })
    }
}

#[cfg(test)]
impl GreedySelector {
    fn from_rows(rows: &[CatalogRow], tie_break: TieBreak) -> Self {
        Self::new(build_candidate_map(rows), build_universe(rows), tie_break)
    }

    fn candidates(&self) -> &CandidateMap {
        &self.candidates
    }

    fn universe(&self) -> &BTreeSet<String> {
        &self.universe
    }

    fn is_done(&self) -> bool {
        self.universe.is_empty()
    }
}

/// Flatten an assignment into one row per (plan, code), joining in primaries
pub fn expand_assignment(assignment: &Assignment, primaries: &PrimaryLookup) -> Vec<AssignmentRow> {
    assignment
        .iter()
        .flat_map(|claim| {
            claim.catalog_codes.iter().map(|code| {
                let primary = primaries.get(code).cloned();
                if primary.is_none() {
                    log::debug!("No primary recorded for catalog code {}", code);
                }
                AssignmentRow {
                    power_plan: claim.power_plan.clone(),
                    catalog_code: code.clone(),
                    primary,
                }
            })
        })
        .collect()
}
