//! Typed rows of the peer-review table.

use serde::{Deserialize, Serialize};

/// Column headers every input CSV must carry, in file order.
pub const REQUIRED_COLUMNS: &[&str] = &[
    "Group Name",
    "Member Name",
    "Reviewer",
    "Dev Value",
    "Report Value",
    "Dev Comments",
    "Report Comments",
];

/// One reviewer → member rating event, as read from a CSV row.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct ReviewRecord {
    #[serde(rename = "Group Name")]
    pub group_name: String,
    #[serde(rename = "Member Name")]
    pub member_name: String,
    #[serde(rename = "Reviewer")]
    pub reviewer: String,
    #[serde(rename = "Dev Value")]
    pub dev_value: f64,
    #[serde(rename = "Report Value")]
    pub report_value: f64,
    #[serde(rename = "Dev Comments")]
    pub dev_comments: Option<String>,
    #[serde(rename = "Report Comments")]
    pub report_comments: Option<String>,
}

/// A [`ReviewRecord`] with its scores normalized against the group size.
///
/// `norm_dev == 1.0` means the member got exactly the expected share.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct NormalizedRecord {
    #[serde(rename = "Group Name")]
    pub group_name: String,
    #[serde(rename = "Member Name")]
    pub member_name: String,
    #[serde(rename = "Reviewer")]
    pub reviewer: String,
    #[serde(rename = "Dev Value")]
    pub dev_value: f64,
    #[serde(rename = "Report Value")]
    pub report_value: f64,
    #[serde(rename = "Dev Comments")]
    pub dev_comments: Option<String>,
    #[serde(rename = "Report Comments")]
    pub report_comments: Option<String>,
    #[serde(rename = "Norm Dev")]
    pub norm_dev: f64,
    #[serde(rename = "Norm Report")]
    pub norm_report: f64,
}

impl NormalizedRecord {
    /// Attaches normalized scores given the expected per-member share.
    pub fn from_record(record: ReviewRecord, expected_per_member: f64) -> Self {
        NormalizedRecord {
            norm_dev: record.dev_value / expected_per_member,
            norm_report: record.report_value / expected_per_member,
            group_name: record.group_name,
            member_name: record.member_name,
            reviewer: record.reviewer,
            dev_value: record.dev_value,
            report_value: record.report_value,
            dev_comments: record.dev_comments,
            report_comments: record.report_comments,
        }
    }

    /// True when the reviewer rated themselves.
    pub fn is_self_rating(&self) -> bool {
        self.reviewer == self.member_name
    }

    /// Non-blank, trimmed dev and report comments of this row.
    pub fn comments(&self) -> impl Iterator<Item = &str> {
        [self.dev_comments.as_deref(), self.report_comments.as_deref()]
            .into_iter()
            .flatten()
            .map(str::trim)
            .filter(|c| !c.is_empty())
    }
}
