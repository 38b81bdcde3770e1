use std::collections::HashSet;
use std::path::{Path, PathBuf};

use tracing::{debug, info, warn};

use crate::error::SqlfmtError;
use crate::formatter::SqlFormatter;
use crate::mode::Mode;
use crate::options::FormatOptions;
use crate::report::{FileResult, Report};

/// Format a SQL string. This is the core API function.
///
/// The result starts with a newline and has no trailing newline, so it can
/// be spliced after a host-language string opener.
pub fn format_string(source: &str, options: &FormatOptions) -> Result<String, SqlfmtError> {
    SqlFormatter::new(options).format(source)
}

/// Format raw bytes. Invalid UTF-8 is a lexing error.
pub fn format_bytes(source: &[u8], options: &FormatOptions) -> Result<String, SqlfmtError> {
    SqlFormatter::new(options).format_bytes(source)
}

/// Format the contents of a `.sql` file: like [`format_bytes`], but laid out
/// as a text file with no leading blank line and a final newline.
pub fn format_document(source: &[u8], options: &FormatOptions) -> Result<String, SqlfmtError> {
    let formatted = format_bytes(source, options)?;
    let body = formatted.strip_prefix('\n').unwrap_or(&formatted);
    if body.is_empty() {
        return Ok(String::new());
    }
    Ok(format!("{}\n", body))
}

/// Run the formatter on a collection of files.
pub fn run(files: &[PathBuf], mode: &Mode) -> Report {
    let matching_paths = get_matching_paths(files, mode);
    debug!(files = matching_paths.len(), "collected input files");
    let mut report = Report::new();

    let results: Vec<FileResult> = if mode.single_process || matching_paths.len() <= 1 {
        format_sequential(&matching_paths, mode)
    } else {
        use rayon::prelude::*;

        match rayon::ThreadPoolBuilder::new()
            .num_threads(mode.threads)
            .build()
        {
            Ok(pool) => pool.install(|| {
                matching_paths
                    .par_iter()
                    .map(|path| format_file(path, mode))
                    .collect()
            }),
            Err(e) => {
                warn!(error = %e, "could not build thread pool, formatting sequentially");
                format_sequential(&matching_paths, mode)
            }
        }
    };

    for result in results {
        report.add(result);
    }
    info!("{}", report.summary());
    report
}

fn format_sequential(paths: &[PathBuf], mode: &Mode) -> Vec<FileResult> {
    paths.iter().map(|path| format_file(path, mode)).collect()
}

/// Format a single file, writing it back unless the mode is read-only.
fn format_file(path: &Path, mode: &Mode) -> FileResult {
    let source = match std::fs::read(path) {
        Ok(s) => s,
        Err(e) => return FileResult::failed(path, &SqlfmtError::Io(e)),
    };

    let formatted = match format_document(&source, &mode.format) {
        Ok(f) => f,
        Err(e) => {
            debug!(path = %path.display(), error = %e, "formatting failed");
            return FileResult::failed(path, &e);
        }
    };

    if source == formatted.as_bytes() {
        return FileResult::unchanged(path);
    }

    if !mode.writes_files() {
        if mode.diff {
            print_diff(path, &String::from_utf8_lossy(&source), &formatted);
        }
        return FileResult::changed(path);
    }

    match std::fs::write(path, &formatted) {
        Ok(()) => FileResult::changed(path),
        Err(e) => FileResult::failed(path, &SqlfmtError::Io(e)),
    }
}

/// Get all SQL file paths that match the given inputs.
pub fn get_matching_paths(paths: &[PathBuf], mode: &Mode) -> Vec<PathBuf> {
    let extensions = mode.sql_extensions();
    let mut result = HashSet::new();

    for path in paths {
        if path.is_file() {
            if is_sql_file(path, extensions) {
                result.insert(path.clone());
            }
        } else if path.is_dir() {
            collect_sql_files(path, extensions, &mode.exclude, &mut result);
        }
    }

    let mut sorted: Vec<PathBuf> = result.into_iter().collect();
    sorted.sort();
    sorted
}

fn is_sql_file(path: &Path, extensions: &[&str]) -> bool {
    path.extension()
        .map(|ext| ext.to_string_lossy().to_lowercase())
        .is_some_and(|ext| extensions.contains(&ext.as_str()))
}

/// Recursively collect SQL files from a directory, skipping hidden entries
/// and names matching an exclude pattern.
fn collect_sql_files(
    dir: &Path,
    extensions: &[&str],
    exclude: &[String],
    result: &mut HashSet<PathBuf>,
) {
    let entries = match std::fs::read_dir(dir) {
        Ok(e) => e,
        Err(e) => {
            warn!(dir = %dir.display(), error = %e, "skipping unreadable directory");
            return;
        }
    };

    for entry in entries.flatten() {
        let path = entry.path();
        let name = path
            .file_name()
            .map(|n| n.to_string_lossy().to_string())
            .unwrap_or_default();

        if name.starts_with('.') || is_excluded(&name, exclude) {
            continue;
        }

        if path.is_dir() {
            collect_sql_files(&path, extensions, exclude, result);
        } else if is_sql_file(&path, extensions) {
            result.insert(path);
        }
    }
}

fn is_excluded(name: &str, exclude: &[String]) -> bool {
    exclude.iter().any(|pattern| {
        glob::Pattern::new(pattern)
            .map(|p| p.matches(name))
            .unwrap_or(false)
    })
}

/// Print a unified diff between original and formatted content.
fn print_diff(path: &Path, original: &str, formatted: &str) {
    use similar::TextDiff;

    let name = path.display().to_string();
    let diff = TextDiff::from_lines(original, formatted);
    eprint!(
        "{}",
        diff.unified_diff()
            .context_radius(3)
            .header(&name, &name)
    );
}
