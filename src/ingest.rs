//! Loads every peer-review CSV in a folder into one table.

use std::fs::{self, File};
use std::path::{Path, PathBuf};

use tracing::{debug, info};

use crate::error::RatingError;
use crate::record::{REQUIRED_COLUMNS, ReviewRecord};

/// Reads all `.csv` files directly inside `dir` and concatenates their rows.
///
/// Files are read in file-name order so repeated loads of the same folder
/// produce the same table. An empty folder yields an empty table.
///
/// # Errors
///
/// Fails if `dir` cannot be listed, if a file lacks a required column, or if
/// a row cannot be decoded.
#[tracing::instrument(skip_all, fields(dir = %dir.display()))]
pub fn load_csv_dir(dir: &Path) -> Result<Vec<ReviewRecord>, RatingError> {
    let mut rows = Vec::new();

    for path in csv_files(dir)? {
        let before = rows.len();
        rows.extend(load_csv_file(&path)?);
        debug!(file = %path.display(), rows = rows.len() - before, "CSV file loaded");
    }

    info!(rows = rows.len(), "Review table loaded");
    Ok(rows)
}

/// Lists the `.csv` files of `dir` (non-recursive), sorted by name.
fn csv_files(dir: &Path) -> Result<Vec<PathBuf>, RatingError> {
    let input_err = |source| RatingError::InputDir {
        path: dir.to_path_buf(),
        source,
    };

    let mut files = Vec::new();
    for entry in fs::read_dir(dir).map_err(input_err)? {
        let path = entry.map_err(input_err)?.path();

        if !path.is_file() || path.extension().and_then(|e| e.to_str()) != Some("csv") {
            continue;
        }
        files.push(path);
    }

    files.sort();
    Ok(files)
}

/// Reads one CSV file, checking its header before decoding any row.
pub fn load_csv_file(path: &Path) -> Result<Vec<ReviewRecord>, RatingError> {
    let csv_err = |source| RatingError::Csv {
        path: path.to_path_buf(),
        source,
    };

    let file = File::open(path).map_err(|source| RatingError::ReadFile {
        path: path.to_path_buf(),
        source,
    })?;
    let mut rdr = csv::ReaderBuilder::new()
        .trim(csv::Trim::All)
        .from_reader(file);

    let headers = rdr.headers().map_err(csv_err)?;
    if let Some(missing) = REQUIRED_COLUMNS
        .iter()
        .find(|col| !headers.iter().any(|h| h == **col))
    {
        return Err(RatingError::MalformedInput {
            path: path.to_path_buf(),
            column: missing.to_string(),
        });
    }

    let mut rows = Vec::new();
    for result in rdr.deserialize() {
        let record: ReviewRecord = result.map_err(csv_err)?;
        rows.push(record);
    }

    Ok(rows)
}

#[cfg(test)]
mod tests {
    use super::*;

    const HEADER: &str =
        "Group Name,Member Name,Reviewer,Dev Value,Report Value,Dev Comments,Report Comments\n";

    fn write(dir: &Path, name: &str, body: &str) {
        fs::write(dir.join(name), body).unwrap();
    }

    #[test]
    fn test_empty_dir_yields_empty_table() {
        let dir = tempfile::tempdir().unwrap();
        let rows = load_csv_dir(dir.path()).unwrap();
        assert!(rows.is_empty());
    }

    #[test]
    fn test_missing_dir_is_input_error() {
        let dir = tempfile::tempdir().unwrap();
        let err = load_csv_dir(&dir.path().join("nope")).unwrap_err();
        assert!(matches!(err, RatingError::InputDir { .. }));
    }

    #[test]
    fn test_concatenates_in_file_name_order() {
        let dir = tempfile::tempdir().unwrap();
        write(dir.path(), "b.csv", &format!("{HEADER}g,x,y,10,20,,\n"));
        write(dir.path(), "a.csv", &format!("{HEADER}g,a,b,30,40,good,\ng,c,d,1,2,,ok\n"));
        write(dir.path(), "notes.txt", "ignored");

        let rows = load_csv_dir(dir.path()).unwrap();
        let members: Vec<_> = rows.iter().map(|r| r.member_name.as_str()).collect();
        assert_eq!(members, vec!["a", "c", "x"]);
        assert_eq!(rows[0].dev_comments.as_deref(), Some("good"));
        assert_eq!(rows[0].report_comments, None);
        assert_eq!(rows[1].report_comments.as_deref(), Some("ok"));
    }

    #[test]
    fn test_subdirectories_are_not_descended() {
        let dir = tempfile::tempdir().unwrap();
        fs::create_dir(dir.path().join("nested.csv")).unwrap();
        fs::create_dir(dir.path().join("sub")).unwrap();
        write(&dir.path().join("sub"), "a.csv", &format!("{HEADER}g,a,b,30,40,,\n"));

        assert!(load_csv_dir(dir.path()).unwrap().is_empty());
    }

    #[test]
    fn test_missing_column_is_malformed_input() {
        let dir = tempfile::tempdir().unwrap();
        write(
            dir.path(),
            "bad.csv",
            "Group Name,Member Name,Reviewer,Dev Value,Report Value,Dev Comments\ng,a,b,1,2,x\n",
        );

        match load_csv_dir(dir.path()).unwrap_err() {
            RatingError::MalformedInput { column, .. } => assert_eq!(column, "Report Comments"),
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn test_header_is_case_sensitive() {
        let dir = tempfile::tempdir().unwrap();
        write(
            dir.path(),
            "bad.csv",
            "group name,Member Name,Reviewer,Dev Value,Report Value,Dev Comments,Report Comments\n",
        );

        assert!(matches!(
            load_csv_dir(dir.path()).unwrap_err(),
            RatingError::MalformedInput { .. }
        ));
    }

    #[test]
    fn test_non_numeric_value_names_the_file() {
        let dir = tempfile::tempdir().unwrap();
        write(dir.path(), "bad.csv", &format!("{HEADER}g,a,b,lots,40,,\n"));

        let err = load_csv_dir(dir.path()).unwrap_err();
        assert!(matches!(err, RatingError::Csv { .. }));
        assert!(err.to_string().contains("bad.csv"));
    }

    #[test]
    fn test_unopenable_file_names_the_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("gone.csv");

        let err = load_csv_file(&path).unwrap_err();
        assert!(matches!(err, RatingError::ReadFile { .. }));
        assert!(err.to_string().contains("gone.csv"));
    }

    #[test]
    fn test_extra_columns_are_ignored() {
        let dir = tempfile::tempdir().unwrap();
        write(
            dir.path(),
            "a.csv",
            "Reviewer,Group Name,Member Name,Dev Value,Report Value,Dev Comments,Report Comments,Extra\n\
             b,g,a,33.5,40,,,zzz\n",
        );

        let rows = load_csv_dir(dir.path()).unwrap();
        assert_eq!(rows.len(), 1);
        assert_eq!(rows[0].reviewer, "b");
        assert_eq!(rows[0].dev_value, 33.5);
    }
}
