use crate::constants::{PROGRESS_BAR_TEMPLATE, REPORT_INDENT};
use crate::error::{FileError, Result};
use crate::logger::{indent_lines, is_quiet};
use futures::future::join_all;
use glob::glob;
use indicatif::{ProgressBar, ProgressStyle};
use std::collections::HashSet;
use std::future::Future;
use std::path::{Path, PathBuf};

/// Resolves glob patterns to absolute file paths.
///
/// Paths keep the order of the patterns (and glob's own ordering within a
/// pattern); a file matched by several patterns is listed once. Directories and
/// unreadable entries are skipped.
///
/// # Arguments
/// * `patterns` - Glob patterns as given on the command line
///
/// # Returns
/// * `Ok(paths)` - Canonical paths of every matching file
/// * `Err(NcliError::Glob)` - If a pattern is not a valid glob
pub fn resolve_globs(patterns: &[String]) -> Result<Vec<PathBuf>> {
    let mut seen = HashSet::new();
    let mut files = Vec::new();

    for pattern in patterns {
        for entry in glob(pattern)?.flatten() {
            if !entry.is_file() {
                continue;
            }
            let Ok(canonical) = entry.canonicalize() else {
                continue;
            };
            if seen.insert(canonical.clone()) {
                files.push(canonical);
            }
        }
    }

    Ok(files)
}

/// Case-insensitive check of the last extension against `allowed`.
pub fn has_extension(path: &Path, allowed: &[&str]) -> bool {
    path.extension()
        .and_then(|ext| ext.to_str())
        .map(|ext| allowed.iter().any(|a| a.eq_ignore_ascii_case(ext)))
        .unwrap_or(false)
}

/// Files split by whether their extension is accepted by a command.
#[derive(Debug, Default, PartialEq, Eq)]
pub struct Selection {
    pub accepted: Vec<PathBuf>,
    pub rejected: Vec<PathBuf>,
}

/// What a command should do with a resolved file list.
#[derive(Debug, PartialEq, Eq)]
pub enum Precheck {
    Proceed(Vec<PathBuf>),
    /// Some files have the wrong type and `--ignore` was not given.
    MixedTypes(Vec<PathBuf>),
    NothingToDo,
}

impl Selection {
    pub fn partition(paths: Vec<PathBuf>, allowed: &[&str]) -> Self {
        let (accepted, rejected) = paths.into_iter().partition(|path| has_extension(path, allowed));
        Self { accepted, rejected }
    }

    pub fn precheck(self, ignore: bool) -> Precheck {
        if !self.rejected.is_empty() && !ignore {
            Precheck::MixedTypes(self.rejected)
        } else if self.accepted.is_empty() {
            Precheck::NothingToDo
        } else {
            Precheck::Proceed(self.accepted)
        }
    }
}

pub fn list_paths(paths: &[PathBuf]) -> String {
    paths
        .iter()
        .map(|path| format!("-  {}", path.display()))
        .collect::<Vec<_>>()
        .join("\n")
}

fn create_progress_bar(len: u64, message: &str) -> ProgressBar {
    if is_quiet() {
        return ProgressBar::hidden();
    }
    let pb = ProgressBar::new(len);
    if let Ok(style) = ProgressStyle::default_bar().template(PROGRESS_BAR_TEMPLATE) {
        pb.set_style(style.progress_chars("#>-"));
    }
    pb.set_message(message.to_string());
    pb
}

/// Starts `job` for every path at once and waits until all of them settle.
///
/// One job failing never cancels the others; results come back in the order
/// of `paths`.
pub async fn run_settled<'a, F, Fut, T, E>(paths: &'a [PathBuf], message: &str, job: F) -> Vec<std::result::Result<T, E>>
where
    F: Fn(&'a Path) -> Fut,
    Fut: Future<Output = std::result::Result<T, E>>,
{
    let progress = create_progress_bar(paths.len() as u64, message);

    let jobs = paths.iter().map(|path| {
        let progress = progress.clone();
        let task = job(path.as_path());
        async move {
            let result = task.await;
            progress.inc(1);
            result
        }
    });
    let results = join_all(jobs).await;

    progress.finish_and_clear();
    results
}

/// Aggregated outcome of a batch.
#[derive(Debug)]
pub struct BatchReport<E> {
    pub succeeded: Vec<String>,
    pub failed: Vec<E>,
}

impl<E: FileError> BatchReport<E> {
    pub fn from_results(results: Vec<std::result::Result<String, E>>) -> Self {
        let mut succeeded = Vec::new();
        let mut failed = Vec::new();
        for result in results {
            match result {
                Ok(output) => succeeded.push(output),
                Err(err) => failed.push(err),
            }
        }
        Self { succeeded, failed }
    }

    pub fn success_count(&self) -> usize {
        self.succeeded.len()
    }

    pub fn failure_count(&self) -> usize {
        self.failed.len()
    }

    /// Each failure as `-  <path>` followed by its indented message.
    pub fn failure_listing(&self) -> String {
        self.failed
            .iter()
            .map(|err| {
                format!(
                    "-  {}\n{}",
                    err.file().display(),
                    indent_lines(&err.to_string(), REPORT_INDENT)
                )
            })
            .collect::<Vec<_>>()
            .join("\n\n")
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ConversionError;
    use std::fs::File;
    use tempfile::TempDir;

    #[test]
    fn test_has_extension() {
        assert!(has_extension(Path::new("icon.svg"), &["svg"]));
        assert!(has_extension(Path::new("ICON.SVG"), &["svg"]));
        assert!(has_extension(Path::new("photo.jpg"), &["png", "jpg"]));
        assert!(!has_extension(Path::new("icon.svg.bak"), &["svg"]));
        assert!(!has_extension(Path::new("svg"), &["svg"]));
    }

    #[test]
    fn test_resolve_globs() {
        let temp_dir = TempDir::new().unwrap();
        File::create(temp_dir.path().join("a.svg")).unwrap();
        File::create(temp_dir.path().join("b.svg")).unwrap();
        File::create(temp_dir.path().join("c.png")).unwrap();
        std::fs::create_dir(temp_dir.path().join("dir.svg")).unwrap();

        let pattern = format!("{}/*.svg", temp_dir.path().display());
        let files = resolve_globs(&[pattern]).unwrap();

        let names: Vec<_> = files
            .iter()
            .map(|p| p.file_name().unwrap().to_string_lossy().into_owned())
            .collect();
        assert_eq!(names, ["a.svg", "b.svg"]);
        assert!(files.iter().all(|p| p.is_absolute()));
    }

    #[test]
    fn test_resolve_globs_deduplicates() {
        let temp_dir = TempDir::new().unwrap();
        File::create(temp_dir.path().join("a.svg")).unwrap();

        let all = format!("{}/*", temp_dir.path().display());
        let exact = temp_dir.path().join("a.svg").to_string_lossy().into_owned();
        let files = resolve_globs(&[all, exact]).unwrap();
        assert_eq!(files.len(), 1);
    }

    #[test]
    fn test_resolve_globs_no_match_and_bad_pattern() {
        let temp_dir = TempDir::new().unwrap();
        let pattern = format!("{}/*.svg", temp_dir.path().display());
        assert!(resolve_globs(&[pattern]).unwrap().is_empty());

        assert!(resolve_globs(&["[".to_string()]).is_err());
    }

    #[test]
    fn test_precheck() {
        let paths = vec![PathBuf::from("/a.svg"), PathBuf::from("/b.txt")];

        let selection = Selection::partition(paths.clone(), &["svg"]);
        assert_eq!(selection.precheck(false), Precheck::MixedTypes(vec![PathBuf::from("/b.txt")]));

        let selection = Selection::partition(paths, &["svg"]);
        assert_eq!(selection.precheck(true), Precheck::Proceed(vec![PathBuf::from("/a.svg")]));

        let selection = Selection::partition(vec![PathBuf::from("/b.txt")], &["svg"]);
        assert_eq!(selection.precheck(true), Precheck::NothingToDo);

        assert_eq!(Selection::default().precheck(false), Precheck::NothingToDo);
    }

    #[test]
    fn test_list_paths() {
        let listing = list_paths(&[PathBuf::from("/a.txt"), PathBuf::from("/b.txt")]);
        assert_eq!(listing, "-  /a.txt\n-  /b.txt");
    }

    #[tokio::test]
    async fn test_run_settled_keeps_order_and_failures() {
        let paths = vec![PathBuf::from("/ok-1"), PathBuf::from("/bad"), PathBuf::from("/ok-2")];

        let results = run_settled(&paths, "testing", |path| async move {
            tokio::task::yield_now().await;
            if path.ends_with("bad") {
                Err(ConversionError::new(path, "broken file"))
            } else {
                Ok(path.display().to_string())
            }
        })
        .await;

        let report = BatchReport::from_results(results);
        assert_eq!(report.success_count(), 2);
        assert_eq!(report.failure_count(), 1);
        assert_eq!(report.succeeded, ["/ok-1", "/ok-2"]);
        assert_eq!(report.failure_listing(), "-  /bad\n   broken file");
    }

    #[test]
    fn test_failure_listing_indents_multiline_messages() {
        let report = BatchReport::from_results(vec![
            Err(ConversionError::new("/x.svg", "line one\nline two")),
            Err(ConversionError::new("/y.svg", "other")),
        ]);
        assert_eq!(
            report.failure_listing(),
            "-  /x.svg\n   line one\n   line two\n\n-  /y.svg\n   other"
        );
    }
}
