//! Data types produced by the aggregation queries.

use chrono::{DateTime, Utc};
use serde::Serialize;

use crate::analyzers::classify::{ScoreClass, Spread};
use crate::record::NormalizedRecord;

/// Mean and median of both normalized dimensions over a set of rows.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DimensionStats {
    pub dev_mean: f64,
    pub dev_median: f64,
    pub report_mean: f64,
    pub report_median: f64,
}

/// A student's own Dev/Report rating of themselves.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SelfRating {
    pub norm_dev: f64,
    pub norm_report: f64,
    pub dev_comments: Option<String>,
    pub report_comments: Option<String>,
}

impl From<&NormalizedRecord> for SelfRating {
    fn from(r: &NormalizedRecord) -> Self {
        SelfRating {
            norm_dev: r.norm_dev,
            norm_report: r.norm_report,
            dev_comments: r.dev_comments.clone(),
            report_comments: r.report_comments.clone(),
        }
    }
}

/// Statistics over the ratings one student received.
///
/// `all` covers every received row. `peers` leaves out the self-rating,
/// which is reported on its own in `self_rating`.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ReceivedSummary {
    pub count: usize,
    pub all: DimensionStats,
    pub peers: Option<DimensionStats>,
    pub self_rating: Option<SelfRating>,
}

/// One normalized rating row with its threshold classes.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RatingLine {
    /// The other party: the rated member for given ratings, the reviewer for received ones.
    pub counterpart: String,
    pub norm_dev: f64,
    pub dev_class: ScoreClass,
    pub norm_report: f64,
    pub report_class: ScoreClass,
    pub dev_comments: Option<String>,
    pub report_comments: Option<String>,
}

/// Everything shown for one selected student.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct StudentView {
    pub student: String,
    pub group_name: Option<String>,
    pub given: Vec<RatingLine>,
    pub received: Vec<RatingLine>,
    pub summary: Option<ReceivedSummary>,
    pub comment_summary: Option<String>,
}

/// Mean ratings one member received inside their group.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct MemberSummary {
    pub member_name: String,
    pub norm_dev: f64,
    pub dev_class: ScoreClass,
    pub norm_report: f64,
    pub report_class: ScoreClass,
    pub avg_total: f64,
    pub avg_class: ScoreClass,
}

/// Rating spread and per-member means of one group.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct GroupSummary {
    pub group_name: String,
    pub dev_std: f64,
    pub dev_spread: Spread,
    pub report_std: f64,
    pub report_spread: Spread,
    pub total_variance: f64,
    pub total_spread: Spread,
    pub members: Vec<MemberSummary>,
}

/// Five-number summary backing a boxplot.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct BoxStats {
    pub min: f64,
    pub q1: f64,
    pub median: f64,
    pub q3: f64,
    pub max: f64,
}

/// Content of a per-student export report.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct StudentReport {
    pub generated_at: DateTime<Utc>,
    pub student: String,
    pub group_name: String,
    pub dev_box: BoxStats,
    pub report_box: BoxStats,
    pub self_dev: Option<f64>,
    pub self_report: Option<f64>,
    pub self_dev_comment: String,
    pub self_report_comment: String,
    pub comment_summary: String,
}
