//! The loaded review table and the queries run against it.

use std::path::{Path, PathBuf};

use tracing::info;

use crate::analyzers::aggregate::{group_overview, student_view, students};
use crate::analyzers::report::student_report;
use crate::analyzers::types::{GroupSummary, StudentReport, StudentView};
use crate::error::RatingError;
use crate::ingest::load_csv_dir;
use crate::normalize::{BudgetWarning, check_point_budgets, normalize};
use crate::record::NormalizedRecord;
use crate::summarize::SentimentModel;

/// One loaded folder of peer reviews.
///
/// A session is never updated in place: loading a folder again builds a new
/// session that replaces the old one.
#[derive(Debug, Clone)]
pub struct Session {
    source: PathBuf,
    records: Vec<NormalizedRecord>,
    students: Vec<String>,
    budget_warnings: Vec<BudgetWarning>,
}

impl Session {
    /// Loads and normalizes every CSV in `dir`.
    #[tracing::instrument(skip_all, fields(dir = %dir.display()))]
    pub fn load(dir: &Path) -> Result<Self, RatingError> {
        let raw = load_csv_dir(dir)?;
        let budget_warnings = check_point_budgets(&raw);
        let records = normalize(raw)?;
        let students = students(&records);

        info!(
            rows = records.len(),
            students = students.len(),
            budget_warnings = budget_warnings.len(),
            "Session loaded"
        );

        Ok(Session {
            source: dir.to_path_buf(),
            records,
            students,
            budget_warnings,
        })
    }

    /// Builds a session from an already normalized table.
    pub fn from_records(source: impl Into<PathBuf>, records: Vec<NormalizedRecord>) -> Self {
        let students = students(&records);
        Session {
            source: source.into(),
            records,
            students,
            budget_warnings: Vec::new(),
        }
    }

    pub fn source(&self) -> &Path {
        &self.source
    }

    pub fn records(&self) -> &[NormalizedRecord] {
        &self.records
    }

    /// Sorted distinct reviewers.
    pub fn students(&self) -> &[String] {
        &self.students
    }

    pub fn budget_warnings(&self) -> &[BudgetWarning] {
        &self.budget_warnings
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    pub fn student_view(&self, student: &str, model: &dyn SentimentModel) -> StudentView {
        student_view(&self.records, student, model)
    }

    pub fn group_overview(&self) -> Vec<GroupSummary> {
        group_overview(&self.records)
    }

    pub fn report_for(&self, student: &str, model: &dyn SentimentModel) -> Option<StudentReport> {
        student_report(&self.records, student, model)
    }
}
