use anyhow::Context;
use clap::Parser;
use img_compress::cli::Args;
use img_compress::utils::{create_progress_bar, format_file_size};
use img_compress::{
    error, info, logger, verbose, warn, BatchDispatcher, CompressionJob, CompressionResult,
    MethodRegistry, ProgressObserver,
};
use indicatif::ProgressBar;
use std::process::ExitCode;

const EXIT_FAILURES: u8 = 1;
const EXIT_CONFIG: u8 = 2;

/// Drives the indicatif bar from batch progress events.
struct BarProgress {
    bar: ProgressBar,
}

impl ProgressObserver for BarProgress {
    fn job_started(&self, _index: usize, _total: usize, job: &CompressionJob) {
        if let Some(name) = job.input.file_name() {
            self.bar.set_message(name.to_string_lossy().into_owned());
        }
    }

    fn job_finished(&self, _index: usize, _total: usize, result: &CompressionResult) {
        self.bar.suspend(|| {
            if let Some(err) = result.error() {
                error!("{:?}: [{}] {}", result.job.input, err.kind, err.message);
            } else if let Some(size) = result.compressed_size() {
                verbose!(
                    "{:?} -> {:?}: {} -> {} in {:.2?}",
                    result.job.input,
                    result.job.output,
                    format_file_size(result.original_size),
                    format_file_size(size),
                    result.elapsed
                );
            }
        });
        self.bar.inc(1);
    }
}

fn main() -> ExitCode {
    let args = Args::parse();
    // JSON mode keeps stdout for the report only.
    logger::init(args.quiet || args.json, args.verbose);

    match run(&args) {
        Ok(code) => code,
        Err(err) => {
            error!("{:#}", err);
            ExitCode::from(EXIT_CONFIG)
        }
    }
}

fn run(args: &Args) -> anyhow::Result<ExitCode> {
    let registry = MethodRegistry::standard();

    if args.list_methods {
        print_methods(&registry);
        return Ok(ExitCode::SUCCESS);
    }

    let config = args
        .batch_config()
        .context("An input path and --output directory are required")?;
    let dispatcher = BatchDispatcher::new(&registry);
    let plan = dispatcher
        .prepare(&config)
        .context("Invalid batch configuration")?;

    if plan.jobs.is_empty() {
        warn!("No image files found in {:?}", config.input);
    } else {
        info!("🚀 Found {} image(s) to compress", plan.jobs.len());
        info!("⚙️  Method: {}", plan.method);
        info!("📁 Output: {:?}", plan.output_dir);
    }

    let observer = BarProgress {
        bar: create_progress_bar(plan.jobs.len() as u64),
    };
    let report = dispatcher
        .run(&plan, &observer)
        .with_context(|| format!("Could not prepare output directory {:?}", plan.output_dir))?;
    observer.bar.finish_and_clear();

    if args.json {
        println!("{}", report.to_json().context("Failed to serialize report")?);
    } else if !args.quiet {
        report.print_summary();
    }

    if args.on_failure.should_fail(&report) {
        return Ok(ExitCode::from(EXIT_FAILURES));
    }
    if report.has_failures() {
        warn!("{} file(s) failed; exiting with success (--on-failure warn)", report.failed());
    }
    Ok(ExitCode::SUCCESS)
}

fn print_methods(registry: &MethodRegistry) {
    println!("Available compression methods:\n");
    for kind in registry.kinds() {
        println!("  {:<16} {:<18} {}", kind.name(), kind.display_name(), kind.description());
        if !kind.aliases().is_empty() {
            println!("  {:<16} aliases: {}", "", kind.aliases().join(", "));
        }
    }
}
