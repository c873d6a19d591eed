//! Output formatting and persistence for analysis results.
//!
//! Supports structured log rendering of the student and group views, JSON
//! printing, normalized-table CSV export, and per-student report files.

use anyhow::Result;
use serde::Serialize;
use tracing::{debug, info, warn};

use crate::analyzers::types::{GroupSummary, RatingLine, StudentView};
use crate::error::RatingError;
use crate::record::NormalizedRecord;
use crate::session::Session;
use crate::summarize::SentimentModel;
use csv::WriterBuilder;
use std::fs;
use std::path::{Path, PathBuf};

/// Logs any value using Rust's debug pretty-print format.
pub fn print_pretty<T: std::fmt::Debug>(value: &T) {
    debug!("{:#?}", value);
}

/// Prints a value as pretty JSON on stdout.
pub fn print_json<T: Serialize>(value: &T) -> Result<()> {
    println!("{}", serde_json::to_string_pretty(value)?);
    Ok(())
}

/// Writes the normalized table, input columns plus `Norm Dev`/`Norm Report`, to a CSV file.
pub fn write_normalized_csv(path: &Path, records: &[NormalizedRecord]) -> Result<()> {
    debug!(path = %path.display(), rows = records.len(), "Writing normalized CSV");

    let mut writer = WriterBuilder::new().has_headers(true).from_path(path)?;
    for record in records {
        writer.serialize(record)?;
    }
    writer.flush()?;

    Ok(())
}

fn log_rating(direction: &str, line: &RatingLine) {
    info!(
        direction,
        counterpart = %line.counterpart,
        norm_dev = line.norm_dev,
        dev = %line.dev_class,
        norm_report = line.norm_report,
        report = %line.report_class,
        dev_comments = line.dev_comments.as_deref().unwrap_or(""),
        report_comments = line.report_comments.as_deref().unwrap_or(""),
        "Rating"
    );
}

/// Logs the meta-analysis, given and received ratings, and comment summary of a student.
pub fn log_student_view(view: &StudentView) {
    info!(
        student = %view.student,
        group = view.group_name.as_deref().unwrap_or("-"),
        given = view.given.len(),
        received = view.received.len(),
        "Student"
    );

    if let Some(summary) = &view.summary {
        let own = summary.self_rating.as_ref();
        info!(
            dev_mean = summary.all.dev_mean,
            dev_median = summary.all.dev_median,
            report_mean = summary.all.report_mean,
            report_median = summary.all.report_median,
            self_dev = ?own.map(|s| s.norm_dev),
            self_report = ?own.map(|s| s.norm_report),
            "Meta-analysis (normalized)"
        );
        match &summary.peers {
            Some(peers) => info!(
                dev_mean = peers.dev_mean,
                dev_median = peers.dev_median,
                report_mean = peers.report_mean,
                report_median = peers.report_median,
                "Ratings from others"
            ),
            None => info!("No ratings from others"),
        }
    }

    for line in &view.given {
        log_rating("given", line);
    }
    for line in &view.received {
        log_rating("received", line);
    }

    if let Some(text) = &view.comment_summary {
        info!(summary = %text, "Comments summary");
    }
}

/// Logs the spread and per-member means of every group.
pub fn log_group_overview(groups: &[GroupSummary]) {
    for g in groups {
        info!(
            group = %g.group_name,
            dev_std = g.dev_std,
            dev = %g.dev_spread,
            report_std = g.report_std,
            report = %g.report_spread,
            total_variance = g.total_variance,
            total = %g.total_spread,
            "Group"
        );
        for m in &g.members {
            info!(
                group = %g.group_name,
                member = %m.member_name,
                norm_dev = m.norm_dev,
                dev = %m.dev_class,
                norm_report = m.norm_report,
                report = %m.report_class,
                avg = m.avg_total,
                avg_class = %m.avg_class,
                "Member"
            );
        }
    }
}

/// File name of a student's export report.
pub fn report_file_name(student: &str) -> String {
    let safe: String = student
        .chars()
        .map(|c| if matches!(c, '/' | '\\') { '_' } else { c })
        .collect();
    format!("{safe}_Report.json")
}

/// Writes `<student>_Report.json` into `export_dir`.
///
/// Returns `Ok(None)` when the student received no ratings and nothing was written.
pub fn export_student_report(
    session: &Session,
    student: &str,
    export_dir: &Path,
    model: &dyn SentimentModel,
) -> Result<Option<PathBuf>, RatingError> {
    let Some(report) = session.report_for(student, model) else {
        warn!(student, "No ratings received, report skipped");
        return Ok(None);
    };

    let path = export_dir.join(report_file_name(student));
    fs::write(&path, serde_json::to_vec_pretty(&report)?)?;
    debug!(student, path = %path.display(), "Report written");

    Ok(Some(path))
}

/// Exports a report for every student of the session.
///
/// A missing export folder is rejected before anything is written. Returns
/// the number of reports written.
#[tracing::instrument(skip_all, fields(students = session.students().len()))]
pub fn export_all(
    session: &Session,
    export_dir: Option<&Path>,
    model: &dyn SentimentModel,
) -> Result<usize, RatingError> {
    let export_dir = export_dir.ok_or(RatingError::NoExportDir)?;
    fs::create_dir_all(export_dir)?;

    let mut written = 0;
    for student in session.students() {
        if export_student_report(session, student, export_dir, model)?.is_some() {
            written += 1;
        }
    }

    info!(written, export_dir = %export_dir.display(), "Export complete");
    Ok(written)
}
