use crate::batch::{list_paths, run_settled, BatchReport, Precheck, Selection};
use crate::constants::SVG_EXTENSION;
use crate::error::{ConversionError, NcliError, Result};
use crate::files;
use crate::isolate::isolate;
use crate::svg::{component_path, svg_to_component};
use std::path::Path;

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ReactSvgOptions {
    /// Delete each source SVG once its component has been written.
    pub remove: bool,
    /// Skip non-SVG files instead of refusing to run.
    pub ignore: bool,
    /// Emit `.jsx` instead of `.tsx`.
    pub jsx: bool,
}

/// Converts one SVG file into a component module next to it.
///
/// # Returns
/// * `Ok(file_name)` - Name of the written component file
/// * `Err(ConversionError)` - Any read, parse, reify or write failure, tagged with `path`
pub async fn convert_file(path: &Path, options: &ReactSvgOptions) -> std::result::Result<String, ConversionError> {
    isolate(async {
        let raw = files::read_text(path).await?;
        let component = svg_to_component(&raw)?;

        let output = component_path(path, options.jsx);
        files::write_text(&output, &component).await?;

        if options.remove {
            files::remove_file(path).await?;
        }

        Ok::<_, NcliError>(file_name(&output))
    })
    .await
    .map_err(|err| ConversionError::new(path, err))
}

/// Runs the `react-svg` command over the files matched by `patterns`.
///
/// Returns `None` when the command stopped before converting anything.
pub async fn run(patterns: &[String], options: ReactSvgOptions) -> Result<Option<BatchReport<ConversionError>>> {
    let resolved = crate::batch::resolve_globs(patterns)?;
    let paths = match Selection::partition(resolved, &[SVG_EXTENSION]).precheck(options.ignore) {
        Precheck::Proceed(paths) => paths,
        Precheck::MixedTypes(offending) => {
            crate::error!(
                "Not all resolved paths are SVGs use the --ignore flag to ignore non SVG files:\n{}",
                list_paths(&offending)
            );
            return Ok(None);
        }
        Precheck::NothingToDo => {
            crate::error!("No SVG files found in the provided path(s).");
            return Ok(None);
        }
    };

    crate::verbose!("Converting {} SVG file(s)", paths.len());
    let results = run_settled(&paths, "Converting", |path| convert_file(path, &options)).await;
    let report = BatchReport::from_results(results);
    print_report(&report, &options);

    Ok(Some(report))
}

fn print_report(report: &BatchReport<ConversionError>, options: &ReactSvgOptions) {
    if report.success_count() > 0 {
        crate::info!(
            "✅ Converted {} SVG file(s) to React components.",
            report.success_count()
        );
        for output in &report.succeeded {
            crate::verbose!("-  {}", output);
        }
        if options.remove {
            crate::info!("🗑️  Removed original SVG file(s).");
        }
    }

    if report.failure_count() > 0 {
        crate::error!(
            "Failed to convert {} SVG file(s) to React components.",
            report.failure_count()
        );
        eprintln!("{}", report.failure_listing());
    }
}

fn file_name(path: &Path) -> String {
    path.file_name()
        .map(|name| name.to_string_lossy().into_owned())
        .unwrap_or_else(|| path.display().to_string())
}
