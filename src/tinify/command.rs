use super::client::{CompressionService, ConvertTarget};
use crate::batch::{list_paths, resolve_globs, run_settled, BatchReport, Precheck, Selection};
use crate::config::ConfigRepository;
use crate::constants::{API_KEY_PROMPT, DEFAULT_POSTFIX, TINIFY_EXTENSIONS};
use crate::error::{NcliError, Result, TinifyError};
use crate::files;
use crate::isolate::isolate;
use dialoguer::Input;
use image::ImageFormat;
use std::io::{self, BufRead, IsTerminal, Write};
use std::path::{Path, PathBuf};

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TinifyOptions {
    /// Replace the source file instead of writing `<name>.<postfix>.<ext>`.
    pub remove: bool,
    pub ignore: bool,
    pub postfix: String,
    /// Ask the service to convert every image to WebP.
    pub webp: bool,
}

impl Default for TinifyOptions {
    fn default() -> Self {
        Self {
            remove: false,
            ignore: false,
            postfix: DEFAULT_POSTFIX.to_string(),
            webp: false,
        }
    }
}

/// Source of a freshly entered API key.
pub trait KeyPrompt {
    fn request_api_key(&self) -> Result<String>;
}

/// Asks on the terminal, or reads one line when stdin is piped.
#[derive(Debug, Default, Clone, Copy)]
pub struct TerminalPrompt;

impl KeyPrompt for TerminalPrompt {
    fn request_api_key(&self) -> Result<String> {
        if io::stdin().is_terminal() {
            return Input::<String>::new()
                .with_prompt(API_KEY_PROMPT)
                .allow_empty(true)
                .interact_text()
                .map_err(|e| NcliError::Prompt(e.to_string()));
        }

        print!("{}: ", API_KEY_PROMPT);
        io::stdout().flush()?;
        let mut line = String::new();
        io::stdin().lock().read_line(&mut line)?;
        Ok(line.trim().to_string())
    }
}

/// Outcome of the credential check that precedes every batch.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum KeyStatus {
    Validated(String),
    /// A freshly entered key was refused; nothing was stored.
    Rejected,
    /// The stored key was refused and has been wiped from the config.
    RejectedAndCleared,
}

/// Loads or prompts for the API key and checks it against the service.
///
/// A new key is persisted only after the service accepts it. A stored key
/// that no longer validates is cleared so the next run prompts again.
pub async fn ensure_api_key(
    repo: &dyn ConfigRepository,
    prompt: &dyn KeyPrompt,
    service: &dyn CompressionService,
) -> Result<KeyStatus> {
    let mut config = repo.load()?;

    if let Some(stored) = config.api_key().map(str::to_string) {
        if let Err(err) = isolate(service.validate(&stored)).await {
            crate::verbose!("Stored key rejected: {}", err);
            crate::error!("API key is invalid.");
            config.tinify.api_key.clear();
            repo.save(&config)?;
            return Ok(KeyStatus::RejectedAndCleared);
        }
        return Ok(KeyStatus::Validated(stored));
    }

    let entered = prompt.request_api_key()?.trim().to_string();
    if entered.is_empty() {
        crate::error!("API key is invalid.");
        return Ok(KeyStatus::Rejected);
    }
    if let Err(err) = isolate(service.validate(&entered)).await {
        crate::verbose!("Entered key rejected: {}", err);
        crate::error!("API key is invalid.");
        return Ok(KeyStatus::Rejected);
    }

    crate::info!("Key is Valid! Caching in home directory...");
    config.tinify.api_key = entered.clone();
    repo.save(&config)?;
    Ok(KeyStatus::Validated(entered))
}

/// Where the compressed image for `path` is written.
pub fn output_path(path: &Path, extension: &str, options: &TinifyOptions) -> PathBuf {
    if options.remove || options.postfix.is_empty() {
        path.with_extension(extension)
    } else {
        path.with_extension(format!("{}.{}", options.postfix, extension))
    }
}

fn fallback_extension(path: &Path, options: &TinifyOptions) -> String {
    if options.webp {
        return ConvertTarget::WebP.extension().to_string();
    }
    path.extension()
        .map(|ext| ext.to_string_lossy().into_owned())
        .unwrap_or_default()
}

fn check_image_format(bytes: &[u8]) -> Result<()> {
    match image::guess_format(bytes) {
        Ok(ImageFormat::Png | ImageFormat::Jpeg | ImageFormat::WebP) => Ok(()),
        Ok(other) => Err(NcliError::UnsupportedImage(format!("{:?} images are not supported", other))),
        Err(_) => Err(NcliError::UnsupportedImage("unrecognized image data".to_string())),
    }
}

/// Compresses one image through `service` and writes the result next to it.
pub async fn minify_file(
    path: &Path,
    api_key: &str,
    service: &dyn CompressionService,
    options: &TinifyOptions,
) -> std::result::Result<String, TinifyError> {
    isolate(async {
        let source = files::read_bytes(path).await?;
        check_image_format(&source)?;

        let convert = options.webp.then_some(ConvertTarget::WebP);
        let compressed = service.compress(api_key, source, convert).await?;
        if let Some(count) = compressed.compression_count {
            crate::verbose!("{}: {} compression(s) used this month", path.display(), count);
        }

        let extension = compressed
            .extension
            .clone()
            .unwrap_or_else(|| fallback_extension(path, options));
        let output = output_path(path, &extension, options);
        files::write_bytes(&output, &compressed.data).await?;

        if options.remove && output != path {
            files::remove_file(path).await?;
        }

        Ok::<_, NcliError>(file_name(&output))
    })
    .await
    .map_err(|err| TinifyError::new(path, err))
}

/// Runs the `tinify` command over the files matched by `patterns`.
///
/// Returns `None` when nothing was compressed: no usable files, or the API
/// key was rejected.
pub async fn run(
    patterns: &[String],
    options: &TinifyOptions,
    repo: &dyn ConfigRepository,
    prompt: &dyn KeyPrompt,
    service: &dyn CompressionService,
) -> Result<Option<BatchReport<TinifyError>>> {
    let resolved = resolve_globs(patterns)?;
    let paths = match Selection::partition(resolved, TINIFY_EXTENSIONS).precheck(options.ignore) {
        Precheck::Proceed(paths) => paths,
        Precheck::MixedTypes(offending) => {
            crate::error!(
                "Not all resolved paths are PNG/WEBP/JPEG use the --ignore flag to ignore non PNG/WEBP/JPEG files:\n{}",
                list_paths(&offending)
            );
            return Ok(None);
        }
        Precheck::NothingToDo => {
            crate::error!("No PNG/WEBP/JPEG files found in the provided path(s).");
            return Ok(None);
        }
    };

    let api_key = match ensure_api_key(repo, prompt, service).await? {
        KeyStatus::Validated(key) => key,
        KeyStatus::Rejected | KeyStatus::RejectedAndCleared => return Ok(None),
    };
    let api_key = api_key.as_str();

    crate::verbose!("Minifying {} image(s)", paths.len());
    let results = run_settled(&paths, "Minifying", |path| minify_file(path, api_key, service, options)).await;
    let report = BatchReport::from_results(results);
    print_report(&report, options);

    Ok(Some(report))
}

fn print_report(report: &BatchReport<TinifyError>, options: &TinifyOptions) {
    if report.success_count() > 0 {
        let converted = if options.webp { "and converted " } else { "" };
        crate::info!("✅ Minified {}{} file(s).", converted, report.success_count());
        for output in &report.succeeded {
            crate::verbose!("-  {}", output);
        }
        if options.remove {
            crate::info!("🗑️  Removed original unoptimized file(s).");
        }
    }

    if report.failure_count() > 0 {
        let converted = if options.webp { "and convert " } else { "" };
        crate::error!("Failed to minify {}{} file(s).", converted, report.failure_count());
        eprintln!("{}", report.failure_listing());
    }
}

fn file_name(path: &Path) -> String {
    path.file_name()
        .map(|name| name.to_string_lossy().into_owned())
        .unwrap_or_else(|| path.display().to_string())
}
