use std::collections::{BTreeMap, BTreeSet};

use crate::analyzers::classify::{classify_score, classify_spread, classify_total_spread};
use crate::analyzers::types::{
    DimensionStats, GroupSummary, MemberSummary, RatingLine, ReceivedSummary, SelfRating,
    StudentView,
};
use crate::analyzers::utility::{mean, median, stddev};
use crate::record::NormalizedRecord;
use crate::summarize::{SentimentModel, summarize_comments};

/// Sorted distinct reviewers: the students that can be selected.
pub fn students(records: &[NormalizedRecord]) -> Vec<String> {
    records
        .iter()
        .map(|r| r.reviewer.clone())
        .collect::<BTreeSet<_>>()
        .into_iter()
        .collect()
}

/// Rows where `student` is the reviewer, in table order.
pub fn ratings_given<'a>(records: &'a [NormalizedRecord], student: &str) -> Vec<&'a NormalizedRecord> {
    records.iter().filter(|r| r.reviewer == student).collect()
}

/// Rows where `student` is the rated member, in table order.
pub fn ratings_about<'a>(records: &'a [NormalizedRecord], student: &str) -> Vec<&'a NormalizedRecord> {
    records.iter().filter(|r| r.member_name == student).collect()
}

/// The first row in which `student` rated themselves.
pub fn self_rating<'a>(records: &'a [NormalizedRecord], student: &str) -> Option<&'a NormalizedRecord> {
    records
        .iter()
        .find(|r| r.member_name == student && r.reviewer == student)
}

fn dimension_stats(rows: &[&NormalizedRecord]) -> DimensionStats {
    let dev: Vec<f64> = rows.iter().map(|r| r.norm_dev).collect();
    let report: Vec<f64> = rows.iter().map(|r| r.norm_report).collect();

    DimensionStats {
        dev_mean: mean(&dev),
        dev_median: median(&dev),
        report_mean: mean(&report),
        report_median: median(&report),
    }
}

/// Mean/median of the ratings `student` received, with the self-rating kept apart.
///
/// Returns `None` when nobody rated the student.
pub fn ratings_received(records: &[NormalizedRecord], student: &str) -> Option<ReceivedSummary> {
    let about = ratings_about(records, student);
    if about.is_empty() {
        return None;
    }

    let peers: Vec<&NormalizedRecord> = about
        .iter()
        .copied()
        .filter(|r| !r.is_self_rating())
        .collect();

    Some(ReceivedSummary {
        count: about.len(),
        all: dimension_stats(&about),
        peers: (!peers.is_empty()).then(|| dimension_stats(&peers)),
        self_rating: self_rating(records, student).map(SelfRating::from),
    })
}

fn rating_line(r: &NormalizedRecord, counterpart: &str) -> RatingLine {
    RatingLine {
        counterpart: counterpart.to_string(),
        norm_dev: r.norm_dev,
        dev_class: classify_score(r.norm_dev),
        norm_report: r.norm_report,
        report_class: classify_score(r.norm_report),
        dev_comments: r.dev_comments.clone(),
        report_comments: r.report_comments.clone(),
    }
}

/// Trimmed, non-blank Dev and Report comments of the ratings `student` received.
pub fn received_comments<'a>(records: &'a [NormalizedRecord], student: &str) -> Vec<&'a str> {
    ratings_about(records, student)
        .into_iter()
        .flat_map(|r| r.comments())
        .collect()
}

/// Given ratings, received ratings, meta-analysis and comment synopsis of one student.
pub fn student_view(
    records: &[NormalizedRecord],
    student: &str,
    model: &dyn SentimentModel,
) -> StudentView {
    let given_rows = ratings_given(records, student);
    let about = ratings_about(records, student);
    let group_name = about
        .first()
        .or(given_rows.first())
        .map(|r| r.group_name.clone());

    let comments = received_comments(records, student);
    let comment_summary =
        (!comments.is_empty()).then(|| summarize_comments(&comments, model));

    StudentView {
        student: student.to_string(),
        group_name,
        given: given_rows
            .iter()
            .map(|r| rating_line(r, &r.member_name))
            .collect(),
        received: about.iter().map(|r| rating_line(r, &r.reviewer)).collect(),
        summary: ratings_received(records, student),
        comment_summary,
    }
}

/// Spread of ratings and per-member means within one group.
///
/// Returns `None` if the group has no rows.
pub fn group_summary(records: &[NormalizedRecord], group: &str) -> Option<GroupSummary> {
    let rows: Vec<&NormalizedRecord> = records.iter().filter(|r| r.group_name == group).collect();
    if rows.is_empty() {
        return None;
    }

    let dev: Vec<f64> = rows.iter().map(|r| r.norm_dev).collect();
    let report: Vec<f64> = rows.iter().map(|r| r.norm_report).collect();
    let dev_std = stddev(&dev, mean(&dev));
    let report_std = stddev(&report, mean(&report));
    let total_variance = dev_std + report_std;

    let mut by_member: BTreeMap<&str, (Vec<f64>, Vec<f64>)> = BTreeMap::new();
    for r in &rows {
        let entry = by_member.entry(r.member_name.as_str()).or_default();
        entry.0.push(r.norm_dev);
        entry.1.push(r.norm_report);
    }

    let members = by_member
        .into_iter()
        .map(|(name, (dev, report))| {
            let norm_dev = mean(&dev);
            let norm_report = mean(&report);
            let avg_total = (norm_dev + norm_report) / 2.0;
            MemberSummary {
                member_name: name.to_string(),
                norm_dev,
                dev_class: classify_score(norm_dev),
                norm_report,
                report_class: classify_score(norm_report),
                avg_total,
                avg_class: classify_score(avg_total),
            }
        })
        .collect();

    Some(GroupSummary {
        group_name: group.to_string(),
        dev_std,
        dev_spread: classify_spread(dev_std),
        report_std,
        report_spread: classify_spread(report_std),
        total_variance,
        total_spread: classify_total_spread(total_variance),
        members,
    })
}

/// [`group_summary`] for every group, sorted by group name.
pub fn group_overview(records: &[NormalizedRecord]) -> Vec<GroupSummary> {
    records
        .iter()
        .map(|r| r.group_name.as_str())
        .collect::<BTreeSet<_>>()
        .into_iter()
        .filter_map(|group| group_summary(records, group))
        .collect()
}
