use crate::constants::DEFAULT_OUTPUT_SUFFIX;
use crate::error::{CompressionError, Result};
use crate::formats::{is_image_file, OutputFormat, SourceFormat};
use crate::job::{CompressionJob, CompressionResult};
use crate::method::{Method, MethodKind, MethodParams, MethodRegistry};
use crate::processing::compress_job;
use crate::report::BatchReport;
use crate::validation::{prepare_output_dir, validate_input_root, validate_output_dir};
use std::collections::HashSet;
use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::time::Instant;
use walkdir::{DirEntry, WalkDir};

/// Everything a front-end collects before a batch starts.
#[derive(Debug, Clone)]
pub struct BatchConfig {
    pub input: PathBuf,
    pub output_dir: PathBuf,
    /// Method name as typed by the user, resolved through the registry
    pub method: String,
    pub params: MethodParams,
    pub recursive: bool,
    /// Appended to each output file stem
    pub suffix: String,
}

impl Default for BatchConfig {
    fn default() -> Self {
        Self {
            input: PathBuf::from("."),
            output_dir: PathBuf::from("compressed"),
            method: MethodKind::JpegQuality.name().to_string(),
            params: MethodParams::default(),
            recursive: false,
            suffix: DEFAULT_OUTPUT_SUFFIX.to_string(),
        }
    }
}

/// Cooperative stop flag. Checked between jobs only; files already written
/// stay on disk.
#[derive(Debug, Clone, Default)]
pub struct StopHandle(Arc<AtomicBool>);

impl StopHandle {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn stop(&self) {
        self.0.store(true, Ordering::Relaxed);
    }

    pub fn is_stopped(&self) -> bool {
        self.0.load(Ordering::Relaxed)
    }
}

/// Advisory progress callbacks. Observers only see shared references.
pub trait ProgressObserver {
    fn job_started(&self, _index: usize, _total: usize, _job: &CompressionJob) {}

    fn job_finished(&self, _index: usize, _total: usize, _result: &CompressionResult) {}
}

/// Observer that ignores all events.
pub struct NoProgress;

impl ProgressObserver for NoProgress {}

/// A validated batch, ready to run.
#[derive(Debug, Clone)]
pub struct BatchPlan {
    pub method: Method,
    pub output_dir: PathBuf,
    pub jobs: Vec<CompressionJob>,
}

pub struct BatchDispatcher<'a> {
    registry: &'a MethodRegistry,
    stop: StopHandle,
}

impl<'a> BatchDispatcher<'a> {
    pub fn new(registry: &'a MethodRegistry) -> Self {
        Self {
            registry,
            stop: StopHandle::new(),
        }
    }

    pub fn with_stop_handle(mut self, stop: StopHandle) -> Self {
        self.stop = stop;
        self
    }

    pub fn stop_handle(&self) -> StopHandle {
        self.stop.clone()
    }

    /// Validates the configuration and expands the input into jobs.
    ///
    /// Any error here is a configuration error and no file has been touched.
    pub fn prepare(&self, config: &BatchConfig) -> Result<BatchPlan> {
        let method = self.registry.resolve(&config.method, &config.params)?;
        validate_input_root(&config.input)?;
        validate_output_dir(&config.output_dir)?;
        if config.suffix.contains(|c| c == '/' || c == '\\') {
            return Err(CompressionError::config(format!(
                "Output suffix must not contain path separators: {:?}",
                config.suffix
            )));
        }

        let files = collect_image_files(&config.input, config.recursive, Some(&config.output_dir))?;
        crate::verbose!("Found {} candidate image(s) under {:?}", files.len(), config.input);

        let jobs = plan_jobs(&files, &config.input, &config.output_dir, method, &config.suffix)?;
        Ok(BatchPlan {
            method,
            output_dir: config.output_dir.clone(),
            jobs,
        })
    }

    /// Runs every job in order and returns one result per job.
    ///
    /// Only the output directory creation can fail the call; per-job errors
    /// end up in the report.
    pub fn run(&self, plan: &BatchPlan, observer: &dyn ProgressObserver) -> Result<BatchReport> {
        prepare_output_dir(&plan.output_dir)?;

        let start_time = Instant::now();
        let total = plan.jobs.len();
        let mut report = BatchReport::new();
        let mut cancelled = false;

        for (index, job) in plan.jobs.iter().enumerate() {
            if self.stop.is_stopped() {
                cancelled = true;
                report.record(CompressionResult::skipped(job.clone()));
                continue;
            }

            observer.job_started(index, total, job);
            let result = compress_job(job);
            if let Some(err) = result.error() {
                crate::verbose!("{:?} failed: {}", job.input, err.message);
            }
            observer.job_finished(index, total, &result);
            report.record(result);
        }

        report.finish(start_time.elapsed(), cancelled);
        Ok(report)
    }

    pub fn execute(&self, config: &BatchConfig, observer: &dyn ProgressObserver) -> Result<BatchReport> {
        let plan = self.prepare(config)?;
        self.run(&plan, observer)
    }
}

/// Expands the batch root into a sorted list of candidate images.
///
/// A single file is returned as-is whatever its extension (it fails later as
/// unsupported if need be). Directory walks keep every file with a
/// supported extension, dot-prefixed ones included, and never descend into
/// `exclude`.
pub fn collect_image_files(root: &Path, recursive: bool, exclude: Option<&Path>) -> Result<Vec<PathBuf>> {
    validate_input_root(root)?;

    if root.is_file() {
        return Ok(vec![root.to_path_buf()]);
    }

    let excluded = exclude.and_then(|p| p.canonicalize().ok());
    let walker = if recursive {
        WalkDir::new(root)
    } else {
        WalkDir::new(root).max_depth(1)
    };

    let mut image_files = Vec::new();
    let entries = walker.into_iter().filter_entry(|e| {
        e.depth() == 0 || !is_excluded(e, excluded.as_deref())
    });

    for entry in entries {
        let entry = match entry {
            Ok(entry) => entry,
            Err(e) => {
                crate::warn!("Skipping unreadable entry: {}", e);
                continue;
            }
        };
        let path = entry.path();
        if path.is_file() && is_image_file(path) {
            image_files.push(entry.into_path());
        }
    }

    image_files.sort();
    Ok(image_files)
}

fn is_excluded(entry: &DirEntry, excluded: Option<&Path>) -> bool {
    match excluded {
        Some(excluded) if entry.file_type().is_dir() => entry
            .path()
            .canonicalize()
            .map(|p| p == excluded)
            .unwrap_or(false),
        _ => false,
    }
}

/// Output location for one input: same relative directory under
/// `output_dir`, stem plus suffix, extension of the target format.
///
/// `base` is the batch root when it is a directory, `None` for a
/// single-file batch.
pub fn generate_output_path(
    input_path: &Path,
    base: Option<&Path>,
    output_dir: &Path,
    format: OutputFormat,
    suffix: &str,
) -> Result<PathBuf> {
    let file_stem = input_path
        .file_stem()
        .ok_or_else(|| CompressionError::UnsupportedFormat(format!("Invalid file name: {:?}", input_path)))?;

    let relative_dir = base
        .and_then(|base| input_path.strip_prefix(base).ok())
        .and_then(|relative| relative.parent())
        .unwrap_or_else(|| Path::new(""));

    let output_filename = format!("{}{}.{}", file_stem.to_string_lossy(), suffix, format.extension());
    Ok(output_dir.join(relative_dir).join(output_filename))
}

/// One job per file, in the given order, with unique output paths.
///
/// Fails if any output would land on a file that is itself an input of the
/// batch, since that input could be replaced before it is read.
pub fn plan_jobs(
    files: &[PathBuf],
    root: &Path,
    output_dir: &Path,
    method: Method,
    suffix: &str,
) -> Result<Vec<CompressionJob>> {
    let base = root.is_dir().then_some(root);
    let mut taken: HashSet<PathBuf> = HashSet::new();
    let mut jobs = Vec::with_capacity(files.len());
    let inputs: HashSet<PathBuf> = files.iter().filter_map(|f| f.canonicalize().ok()).collect();

    for input in files {
        let output_format = method.output_format(SourceFormat::from_path(input));
        let mut output = generate_output_path(input, base, output_dir, output_format, suffix)?;

        if taken.contains(&output) {
            output = disambiguate(input, &output, output_format, suffix, &taken);
            crate::verbose!("Output name clash for {:?}, using {:?}", input, output);
        }

        if overwrites_an_input(&output, &inputs) {
            return Err(CompressionError::config(format!(
                "Output {:?} for {:?} would overwrite an input of this batch; choose another output directory or suffix",
                output, input
            )));
        }

        taken.insert(output.clone());
        jobs.push(CompressionJob {
            input: input.clone(),
            output,
            method,
            output_format,
        });
    }

    Ok(jobs)
}

/// `a.png` and `a.jpg` both want `a_compressed.jpg`; the later one becomes
/// `a_png_compressed.jpg`, then `a_png_2_compressed.jpg` and so on.
fn disambiguate(
    input: &Path,
    output: &Path,
    format: OutputFormat,
    suffix: &str,
    taken: &HashSet<PathBuf>,
) -> PathBuf {
    let stem = input.file_stem().map(|s| s.to_string_lossy()).unwrap_or_default();
    let source_ext = input.extension().map(|e| e.to_string_lossy()).unwrap_or_default();
    let dir = output.parent().unwrap_or_else(|| Path::new(""));

    let mut candidate = dir.join(format!("{}_{}{}.{}", stem, source_ext, suffix, format.extension()));
    let mut counter = 2;
    while taken.contains(&candidate) {
        candidate = dir.join(format!(
            "{}_{}_{}{}.{}",
            stem,
            source_ext,
            counter,
            suffix,
            format.extension()
        ));
        counter += 1;
    }
    candidate
}

fn overwrites_an_input(output: &Path, inputs: &HashSet<PathBuf>) -> bool {
    output
        .canonicalize()
        .map(|p| inputs.contains(&p))
        .unwrap_or(false)
}
