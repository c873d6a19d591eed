//! Normalizes raw Dev/Report points against each group's size.
//!
//! Every reviewer splits 100 points per dimension across the members of
//! their group, so a member's expected share is `100 / group_size`. Dividing
//! a raw score by that share puts every group on the same scale, where `1.0`
//! is an average rating.

use std::collections::{BTreeMap, HashMap, HashSet};

use serde::Serialize;
use tracing::{debug, warn};

use crate::error::RatingError;
use crate::record::{NormalizedRecord, ReviewRecord};

/// Points each reviewer distributes per dimension.
pub const POINT_BUDGET: f64 = 100.0;

/// Allowed drift between a reviewer's point total and [`POINT_BUDGET`].
pub const BUDGET_TOLERANCE: f64 = 1.0;

/// Counts the distinct members of every group in a single pass.
pub fn group_sizes(records: &[ReviewRecord]) -> HashMap<String, usize> {
    let mut members: HashMap<&str, HashSet<&str>> = HashMap::new();
    for r in records {
        members
            .entry(r.group_name.as_str())
            .or_default()
            .insert(r.member_name.as_str());
    }

    members
        .into_iter()
        .map(|(group, names)| (group.to_string(), names.len()))
        .collect()
}

/// Appends `norm_dev` and `norm_report` to every row, preserving row order.
///
/// # Errors
///
/// Returns [`RatingError::EmptyGroup`] if a row's group has no members.
pub fn normalize(records: Vec<ReviewRecord>) -> Result<Vec<NormalizedRecord>, RatingError> {
    let sizes = group_sizes(&records);
    debug!(groups = sizes.len(), "Group sizes computed");

    records
        .into_iter()
        .map(|record| {
            let size = sizes.get(&record.group_name).copied().unwrap_or(0);
            if size == 0 {
                return Err(RatingError::EmptyGroup(record.group_name));
            }
            let expected_per_member = POINT_BUDGET / size as f64;
            Ok(NormalizedRecord::from_record(record, expected_per_member))
        })
        .collect()
}

/// A reviewer whose points in a group do not add up to [`POINT_BUDGET`].
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct BudgetWarning {
    pub group_name: String,
    pub reviewer: String,
    pub dev_total: f64,
    pub report_total: f64,
}

/// Flags reviewers whose Dev or Report totals drift from the point budget.
///
/// Normalization assumes every reviewer hands out exactly 100 points, which
/// the input never guarantees. Results are sorted by group, then reviewer.
pub fn check_point_budgets(records: &[ReviewRecord]) -> Vec<BudgetWarning> {
    let mut totals: BTreeMap<(&str, &str), (f64, f64)> = BTreeMap::new();
    for r in records {
        let entry = totals
            .entry((r.group_name.as_str(), r.reviewer.as_str()))
            .or_default();
        entry.0 += r.dev_value;
        entry.1 += r.report_value;
    }

    let off_budget = |total: f64| (total - POINT_BUDGET).abs() > BUDGET_TOLERANCE;

    totals
        .into_iter()
        .filter(|(_, (dev, report))| off_budget(*dev) || off_budget(*report))
        .map(|((group, reviewer), (dev_total, report_total))| {
            warn!(
                group = group,
                reviewer = reviewer,
                dev_total,
                report_total,
                "Reviewer points do not sum to 100"
            );
            BudgetWarning {
                group_name: group.to_string(),
                reviewer: reviewer.to_string(),
                dev_total,
                report_total,
            }
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn record(group: &str, reviewer: &str, member: &str, dev: f64, report: f64) -> ReviewRecord {
        ReviewRecord {
            group_name: group.to_string(),
            member_name: member.to_string(),
            reviewer: reviewer.to_string(),
            dev_value: dev,
            report_value: report,
            dev_comments: None,
            report_comments: None,
        }
    }

    #[test]
    fn test_group_sizes_counts_distinct_members() {
        let rows = vec![
            record("A", "x", "x", 50.0, 50.0),
            record("A", "x", "y", 50.0, 50.0),
            record("A", "y", "x", 50.0, 50.0),
            record("B", "z", "z", 100.0, 100.0),
        ];
        let sizes = group_sizes(&rows);
        assert_eq!(sizes["A"], 2);
        assert_eq!(sizes["B"], 1);
    }

    #[test]
    fn test_group_of_four_doubles_fifty_points() {
        let rows = vec![
            record("G", "a", "a", 50.0, 25.0),
            record("G", "a", "b", 10.0, 25.0),
            record("G", "a", "c", 20.0, 25.0),
            record("G", "a", "d", 20.0, 25.0),
        ];
        let norm = normalize(rows).unwrap();
        assert_eq!(norm[0].norm_dev, 2.0);
        assert_eq!(norm[0].norm_report, 1.0);
        assert!((norm[1].norm_dev - 0.4).abs() < 1e-12);
    }

    #[test]
    fn test_even_split_normalizes_to_one_across_groups() {
        let third = 100.0 / 3.0;
        let rows = vec![
            record("A", "a1", "a1", third, third),
            record("A", "a1", "a2", third, third),
            record("A", "a1", "a3", third, third),
            record("B", "b1", "b1", 50.0, 50.0),
            record("B", "b1", "b2", 50.0, 50.0),
        ];
        for r in normalize(rows).unwrap() {
            assert!((r.norm_dev - 1.0).abs() < 1e-9, "{r:?}");
            assert!((r.norm_report - 1.0).abs() < 1e-9, "{r:?}");
        }
    }

    #[test]
    fn test_normalize_matches_closed_form() {
        let rows = vec![
            record("A", "a", "a", 12.0, 70.0),
            record("A", "a", "b", 88.0, 30.0),
            record("A", "b", "c", 40.0, 0.0),
        ];
        let norm = normalize(rows.clone()).unwrap();
        for (raw, n) in rows.iter().zip(&norm) {
            assert!((n.norm_dev - raw.dev_value * 3.0 / 100.0).abs() < 1e-12);
            assert!((n.norm_report - raw.report_value * 3.0 / 100.0).abs() < 1e-12);
        }
    }

    #[test]
    fn test_normalize_preserves_order() {
        let rows = vec![
            record("B", "b", "b", 100.0, 100.0),
            record("A", "a", "a", 100.0, 100.0),
        ];
        let norm = normalize(rows).unwrap();
        assert_eq!(norm[0].group_name, "B");
        assert_eq!(norm[1].group_name, "A");
    }

    #[test]
    fn test_normalize_empty_table() {
        assert!(normalize(Vec::new()).unwrap().is_empty());
    }

    #[test]
    fn test_check_point_budgets_flags_drift() {
        let rows = vec![
            record("A", "a", "a", 50.0, 50.0),
            record("A", "a", "b", 50.0, 50.5),
            record("A", "b", "a", 60.0, 50.0),
            record("A", "b", "b", 60.0, 50.0),
        ];
        let warnings = check_point_budgets(&rows);
        assert_eq!(warnings.len(), 1);
        assert_eq!(warnings[0].reviewer, "b");
        assert_eq!(warnings[0].dev_total, 120.0);
    }

    #[test]
    fn test_check_point_budgets_tolerance_is_inclusive() {
        let rows = vec![
            // exactly one point over: tolerated
            record("A", "a", "a", 50.0, 50.0),
            record("A", "a", "b", 51.0, 50.0),
            // just past the tolerance: flagged
            record("A", "b", "a", 50.0, 50.0),
            record("A", "b", "b", 50.0, 51.01),
            // exactly one point under: tolerated
            record("A", "c", "a", 49.0, 50.0),
            record("A", "c", "b", 50.0, 50.0),
        ];
        let warnings = check_point_budgets(&rows);
        assert_eq!(warnings.len(), 1);
        assert_eq!(warnings[0].reviewer, "b");
        assert_eq!(warnings[0].dev_total, 100.0);
        assert!(warnings[0].report_total > 101.0);
    }
}
