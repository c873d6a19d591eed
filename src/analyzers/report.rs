//! Content of the per-student export report.

use chrono::Utc;

use crate::analyzers::aggregate::{ratings_about, received_comments, self_rating};
use crate::analyzers::types::{BoxStats, StudentReport};
use crate::analyzers::utility::{median, quantile};
use crate::record::NormalizedRecord;
use crate::summarize::{NO_COMMENTS, SentimentModel, summarize_comments};

/// Placeholder for a missing self-report comment.
pub const NO_SELF_COMMENT: &str = "(none)";

/// Five-number summary of `values`. Returns `None` for empty input.
pub fn box_stats(values: &[f64]) -> Option<BoxStats> {
    if values.is_empty() {
        return None;
    }
    Some(BoxStats {
        min: quantile(values, 0.0),
        q1: quantile(values, 0.25),
        median: median(values),
        q3: quantile(values, 0.75),
        max: quantile(values, 1.0),
    })
}

fn comment_or_none(comment: Option<&str>) -> String {
    comment
        .map(str::trim)
        .filter(|c| !c.is_empty())
        .unwrap_or(NO_SELF_COMMENT)
        .to_string()
}

/// Builds the export report for `student`.
///
/// Returns `None` when the student received no ratings; there is nothing to plot.
pub fn student_report(
    records: &[NormalizedRecord],
    student: &str,
    model: &dyn SentimentModel,
) -> Option<StudentReport> {
    let about = ratings_about(records, student);
    let first = about.first()?;

    let dev: Vec<f64> = about.iter().map(|r| r.norm_dev).collect();
    let report: Vec<f64> = about.iter().map(|r| r.norm_report).collect();
    let own = self_rating(records, student);

    let comments = received_comments(records, student);
    let comment_summary = if comments.is_empty() {
        NO_COMMENTS.to_string()
    } else {
        summarize_comments(&comments, model)
    };

    Some(StudentReport {
        generated_at: Utc::now(),
        student: student.to_string(),
        group_name: first.group_name.clone(),
        dev_box: box_stats(&dev)?,
        report_box: box_stats(&report)?,
        self_dev: own.map(|r| r.norm_dev),
        self_report: own.map(|r| r.norm_report),
        self_dev_comment: comment_or_none(own.and_then(|r| r.dev_comments.as_deref())),
        self_report_comment: comment_or_none(own.and_then(|r| r.report_comments.as_deref())),
        comment_summary,
    })
}
