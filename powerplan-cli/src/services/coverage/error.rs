/// Maximum number of codes listed in an error message
const MAX_LISTED_CODES: usize = 10;

/// Fatal errors raised by the greedy selector
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CoverageError {
    /// Catalog codes remain but no power plan left in the candidate map can claim any of them
    Unclaimable {
        codes: Vec<String>,
        remaining_plans: usize,
    },
}

impl std::fmt::Display for CoverageError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            CoverageError::Unclaimable {
                codes,
                remaining_plans,
            } => {
                let listed: Vec<&str> = codes
                    .iter()
                    .take(MAX_LISTED_CODES)
                    .map(|c| c.as_str())
                    .collect();
                write!(
                    f,
                    "No claimable power plan for remaining codes: {{{}}}",
                    listed.join(", ")
                )?;
                if codes.len() > MAX_LISTED_CODES {
                    write!(f, " and {} more", codes.len() - MAX_LISTED_CODES)?;
                }
                write!(
                    f,
                    " ({} unclaimed code(s), {} power plan(s) left with no candidates)",
                    codes.len(),
                    remaining_plans
                )
            }
        }
    }
}

impl std::error::Error for CoverageError {}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_display_lists_codes() {
        let err = CoverageError::Unclaimable {
            codes: vec!["C9".to_string()],
            remaining_plans: 0,
        };

        assert_eq!(
            err.to_string(),
            "No claimable power plan for remaining codes: {C9} (1 unclaimed code(s), 0 power plan(s) left with no candidates)"
        );
    }

    #[test]
    fn test_display_truncates_long_lists() {
        let codes: Vec<String> = (0..15).map(|i| format!("C{:02}", i)).collect();
        let err = CoverageError::Unclaimable {
            codes,
            remaining_plans: 2,
        };
        let message = err.to_string();

        assert!(message.contains("C09"));
        assert!(!message.contains("C10"));
        assert!(message.contains("and 5 more"));
    }
}
