//! SQL file loader

use std::fs;
use std::path::Path;

use crate::error::{PipelineError, Result};

/// Base name of a SQL file, as used in log markers and errors
pub fn sql_file_name(path: &Path) -> String {
    path.file_name()
        .map(|name| name.to_string_lossy().into_owned())
        .unwrap_or_else(|| path.display().to_string())
}

/// Read the full text of a SQL file
///
/// A path that does not exist fails with [`PipelineError::MissingSqlFile`]
/// before any read is attempted. Read failures on an existing path are
/// returned as [`PipelineError::Io`]. The file is read from disk on every call.
pub fn read_sql(path: &Path) -> Result<String> {
    if !path.exists() {
        return Err(PipelineError::MissingSqlFile {
            name: sql_file_name(path),
            path: path.to_path_buf(),
        });
    }
    Ok(fs::read_to_string(path)?)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::path::PathBuf;

    #[test]
    fn test_read_sql() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("brandon_shelter_query_branch_count.sql");
        fs::write(&path, "SELECT COUNT(*) AS branch_count FROM branches;").unwrap();

        let sql = read_sql(&path).unwrap();
        assert_eq!(sql, "SELECT COUNT(*) AS branch_count FROM branches;");
    }

    #[test]
    fn test_missing_file_is_named() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("brandon_shelter_clean.sql");

        match read_sql(&path) {
            Err(PipelineError::MissingSqlFile { name, path: p }) => {
                assert_eq!(name, "brandon_shelter_clean.sql");
                assert_eq!(p, path);
            }
            other => panic!("expected MissingSqlFile, got {:?}", other),
        }
    }

    #[test]
    fn test_reads_are_not_cached() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("q.sql");

        fs::write(&path, "SELECT 1;").unwrap();
        assert_eq!(read_sql(&path).unwrap(), "SELECT 1;");

        fs::write(&path, "SELECT 2;").unwrap();
        assert_eq!(read_sql(&path).unwrap(), "SELECT 2;");
    }

    #[test]
    fn test_directory_is_an_io_error() {
        let dir = tempfile::tempdir().unwrap();
        let err = read_sql(dir.path()).unwrap_err();
        assert!(matches!(err, PipelineError::Io(_)));
    }

    #[test]
    fn test_sql_file_name() {
        let path = PathBuf::from("sql/duckdb/brandon_shelter_bootstrap.sql");
        assert_eq!(sql_file_name(&path), "brandon_shelter_bootstrap.sql");
    }
}
