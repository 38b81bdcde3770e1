use std::path::{Path, PathBuf};

use crate::error::SqlfmtError;

/// What happened to one input file.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FileStatus {
    /// Already formatted.
    Unchanged,
    /// Reformatted, or would be in check/diff/list mode.
    Changed,
    /// Reading, formatting or writing failed.
    Error,
}

#[derive(Debug, Clone)]
pub struct FileResult {
    pub path: PathBuf,
    pub status: FileStatus,
    pub error: Option<String>,
}

impl FileResult {
    pub fn unchanged(path: &Path) -> Self {
        Self {
            path: path.to_path_buf(),
            status: FileStatus::Unchanged,
            error: None,
        }
    }

    pub fn changed(path: &Path) -> Self {
        Self {
            path: path.to_path_buf(),
            status: FileStatus::Changed,
            error: None,
        }
    }

    pub fn failed(path: &Path, error: &SqlfmtError) -> Self {
        Self {
            path: path.to_path_buf(),
            status: FileStatus::Error,
            error: Some(error.to_string()),
        }
    }
}

/// Outcome of a batch run, one entry per file.
#[derive(Debug, Default)]
pub struct Report {
    pub results: Vec<FileResult>,
}

impl Report {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add(&mut self, result: FileResult) {
        self.results.push(result);
    }

    pub fn total(&self) -> usize {
        self.results.len()
    }

    pub fn unchanged(&self) -> usize {
        self.count(FileStatus::Unchanged)
    }

    pub fn changed(&self) -> usize {
        self.count(FileStatus::Changed)
    }

    pub fn errors(&self) -> usize {
        self.count(FileStatus::Error)
    }

    pub fn has_errors(&self) -> bool {
        self.errors() > 0
    }

    pub fn has_changes(&self) -> bool {
        self.changed() > 0
    }

    fn count(&self, status: FileStatus) -> usize {
        self.results.iter().filter(|r| r.status == status).count()
    }

    /// Paths of files that were (or would be) reformatted.
    pub fn changed_paths(&self) -> impl Iterator<Item = &Path> {
        self.results
            .iter()
            .filter(|r| r.status == FileStatus::Changed)
            .map(|r| r.path.as_path())
    }

    /// One-line summary, e.g. `3 file(s) processed, 1 reformatted, 2 unchanged`.
    pub fn summary(&self) -> String {
        let mut parts = vec![format!("{} file(s) processed", self.total())];
        if self.changed() > 0 {
            parts.push(format!("{} reformatted", self.changed()));
        }
        if self.unchanged() > 0 {
            parts.push(format!("{} unchanged", self.unchanged()));
        }
        if self.errors() > 0 {
            parts.push(format!("{} error(s)", self.errors()));
        }
        parts.join(", ")
    }

    pub fn print_errors(&self) {
        for result in &self.results {
            if let Some(error) = &result.error {
                eprintln!("error: {}: {}", result.path.display(), error);
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_report_summary() {
        let mut report = Report::new();
        report.add(FileResult::changed(Path::new("a.sql")));
        report.add(FileResult::unchanged(Path::new("b.sql")));
        report.add(FileResult::failed(
            Path::new("c.sql"),
            &SqlfmtError::Parsing {
                position: 3,
                message: "FROM is missing its operand".to_string(),
            },
        ));

        assert_eq!(report.total(), 3);
        assert_eq!(report.changed(), 1);
        assert_eq!(report.unchanged(), 1);
        assert_eq!(report.errors(), 1);
        assert!(report.has_errors());
        assert!(report.has_changes());
        assert_eq!(
            report.summary(),
            "3 file(s) processed, 1 reformatted, 1 unchanged, 1 error(s)"
        );
        assert_eq!(
            report.changed_paths().collect::<Vec<_>>(),
            vec![Path::new("a.sql")]
        );
        assert_eq!(
            report.results[2].error.as_deref(),
            Some("sqlfmt parsing error at token 3: FROM is missing its operand")
        );
    }

    #[test]
    fn test_empty_report() {
        let report = Report::new();
        assert_eq!(report.summary(), "0 file(s) processed");
        assert!(!report.has_errors());
        assert!(!report.has_changes());
    }
}
