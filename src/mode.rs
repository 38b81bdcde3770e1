use crate::options::FormatOptions;

/// Mode holds the batch-run configuration: how to format, and what to do
/// with the result.
#[derive(Debug, Clone, Default)]
pub struct Mode {
    pub format: FormatOptions,

    /// Report files that would change without writing them.
    pub check: bool,

    /// Print a unified diff for every file that would change.
    pub diff: bool,

    /// Print the paths of files that would change.
    pub list: bool,

    /// Glob patterns matched against file and directory names.
    pub exclude: Vec<String>,

    pub verbose: bool,

    pub quiet: bool,

    /// Number of threads for parallel processing (0 = all cores).
    pub threads: usize,

    pub single_process: bool,
}

impl Mode {
    /// Whether formatted output should be written back to disk.
    pub fn writes_files(&self) -> bool {
        !self.check && !self.diff && !self.list
    }

    /// SQL file extensions to process.
    pub fn sql_extensions(&self) -> &[&str] {
        &["sql"]
    }
}
