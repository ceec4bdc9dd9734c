use std::cmp::Ordering;
use std::collections::{BTreeSet, HashMap};

/// One input record: a catalog code listed under a power plan
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CatalogRow {
    pub power_plan: String,
    pub catalog_code: String,
    pub primary: Option<String>,
}

impl CatalogRow {
    #[cfg(test)]
    pub fn new(
        power_plan: impl Into<String>,
        catalog_code: impl Into<String>,
        primary: Option<&str>,
    ) -> Self {
        Self {
            power_plan: power_plan.into(),
            catalog_code: catalog_code.into(),
            primary: primary.map(|p| p.to_string()),
        }
    }
}

/// One output record: a catalog code and the power plan that claimed it
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AssignmentRow {
    pub power_plan: String,
    pub catalog_code: String,
    /// None when the code never had a primary value in the input
    pub primary: Option<String>,
}

/// Catalog code -> primary value
pub type PrimaryLookup = HashMap<String, String>;

/// Order in which the candidate map is scanned when looking for the largest plan.
///
/// The first plan in this order wins when several plans share the largest
/// candidate set.
#[derive(Debug, Clone, Copy, Default)]
pub enum TieBreak {
    /// Ascending by power plan name
    #[default]
    Lexicographic,
    /// Order in which each power plan first appears in the input rows
    InputOrder,
}

impl TieBreak {
    /// Compare two plans for scan order. `Less` means `a` is scanned first.
    pub fn compare(&self, a: &PlanCandidates, b: &PlanCandidates) -> Ordering {
        match self {
            TieBreak::Lexicographic => a.power_plan.cmp(&b.power_plan),
            TieBreak::InputOrder => a.first_seen.cmp(&b.first_seen),
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            TieBreak::Lexicographic => "lexicographic",
            TieBreak::InputOrder => "input-order",
        }
    }
}

/// Catalog codes a single power plan could still claim
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PlanCandidates {
    pub power_plan: String,
    /// Index of the plan's first row in the input
    pub first_seen: usize,
    pub catalog_codes: BTreeSet<String>,
}

impl PlanCandidates {
    pub fn len(&self) -> usize {
        self.catalog_codes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.catalog_codes.is_empty()
    }
}

/// Power plan -> catalog codes it could still claim.
///
/// Entries are kept in scan order; removing an entry never reorders the rest.
/// Power plan names are unique within the map.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CandidateMap {
    entries: Vec<PlanCandidates>,
}

impl CandidateMap {
    /// Build from entries already in scan order.
    ///
    /// Entries sharing a power plan name are merged into the first one: their
    /// codes are unioned and the first entry keeps its position and `first_seen`.
    pub fn from_entries(entries: Vec<PlanCandidates>) -> Self {
        let mut index: HashMap<String, usize> = HashMap::new();
        let mut merged: Vec<PlanCandidates> = Vec::with_capacity(entries.len());

        for entry in entries {
            match index.get(&entry.power_plan) {
                Some(&idx) => {
                    log::warn!(
                        "Power plan {} listed more than once, merging its catalog codes",
                        entry.power_plan
                    );
                    merged[idx].catalog_codes.extend(entry.catalog_codes);
                }
                None => {
                    index.insert(entry.power_plan.clone(), merged.len());
                    merged.push(entry);
                }
            }
        }

        Self { entries: merged }
    }

    #[cfg(test)]
    pub fn get(&self, power_plan: &str) -> Option<&BTreeSet<String>> {
        self.entries
            .iter()
            .find(|e| e.power_plan == power_plan)
            .map(|e| &e.catalog_codes)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Entries in current scan order
    pub fn iter(&self) -> impl Iterator<Item = &PlanCandidates> {
        self.entries.iter()
    }

    /// Power plan names in current scan order
    #[cfg(test)]
    pub fn plans(&self) -> Vec<&str> {
        self.entries.iter().map(|e| e.power_plan.as_str()).collect()
    }

    /// Fix the scan order using a tie-break rule
    pub fn order_by(&mut self, tie_break: TieBreak) {
        self.entries.sort_by(|a, b| tie_break.compare(a, b));
    }

    /// Drop codes that are not part of `universe`
    pub fn restrict_to(&mut self, universe: &BTreeSet<String>) {
        for entry in &mut self.entries {
            entry.catalog_codes.retain(|c| universe.contains(c));
        }
    }

    /// Index of the first entry with the largest candidate set
    pub fn largest(&self) -> Option<usize> {
        let mut best: Option<(usize, usize)> = None;
        for (idx, entry) in self.entries.iter().enumerate() {
            if best.is_none_or(|(_, size)| entry.len() > size) {
                best = Some((idx, entry.len()));
            }
        }
        best.map(|(idx, _)| idx)
    }

    /// Remove and return the entry at `idx`
    pub fn take(&mut self, idx: usize) -> Option<PlanCandidates> {
        if idx < self.entries.len() {
            Some(self.entries.remove(idx))
        } else {
            None
        }
    }

    /// Remove claimed codes from every remaining plan
    pub fn subtract(&mut self, claimed: &BTreeSet<String>) {
        for entry in &mut self.entries {
            entry.catalog_codes.retain(|c| !claimed.contains(c));
        }
    }
}

/// Codes claimed by one power plan
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Claim {
    pub power_plan: String,
    pub catalog_codes: Vec<String>,
}

/// Power plan -> claimed catalog codes, in selection order
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Assignment {
    claims: Vec<Claim>,
}

impl Assignment {
    pub fn new() -> Self {
        Self::default()
    }

    /// Record a claim. A plan claims at most once; callers take each plan
    /// out of a `CandidateMap`, whose names are unique.
    pub fn record(&mut self, power_plan: String, catalog_codes: Vec<String>) {
        debug_assert!(
            !self.contains(&power_plan),
            "power plan {} claimed twice",
            power_plan
        );
        self.claims.push(Claim {
            power_plan,
            catalog_codes,
        });
    }

    pub fn contains(&self, power_plan: &str) -> bool {
        self.claims.iter().any(|c| c.power_plan == power_plan)
    }

    #[cfg(test)]
    pub fn get(&self, power_plan: &str) -> Option<&[String]> {
        self.claims
            .iter()
            .find(|c| c.power_plan == power_plan)
            .map(|c| c.catalog_codes.as_slice())
    }

    pub fn iter(&self) -> impl Iterator<Item = &Claim> {
        self.claims.iter()
    }

    /// Power plans in selection order
    #[cfg(test)]
    pub fn plans(&self) -> Vec<&str> {
        self.claims.iter().map(|c| c.power_plan.as_str()).collect()
    }

    /// Number of selected power plans
    pub fn len(&self) -> usize {
        self.claims.len()
    }

    #[cfg(test)]
    pub fn is_empty(&self) -> bool {
        self.claims.is_empty()
    }

    /// Total number of claimed catalog codes
    pub fn code_count(&self) -> usize {
        self.claims.iter().map(|c| c.catalog_codes.len()).sum()
    }
}

/// Record of one greedy iteration
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SelectionStep {
    /// 1-based iteration number
    pub rank: usize,
    pub power_plan: String,
    pub claimed: Vec<String>,
    /// (plan, candidate size) for every plan still in the map when this step chose
    pub candidate_sizes: Vec<(String, usize)>,
    /// Universe size before the claim
    pub remaining_before: usize,
    /// Universe size after the claim
    pub remaining_after: usize,
}
