use crate::constants::{
    COMPRESSED_SIZE_PREFIX, COMPRESSION_RATIO_PREFIX, ERROR_PREFIX, ORIGINAL_SIZE_PREFIX,
    SUCCESS_PREFIX, WARNING_PREFIX,
};
use crate::job::{CompressionResult, JobOutcome};
use crate::utils::{calculate_compression_ratio, format_file_size};
use serde::Serialize;
use std::time::Duration;

/// Aggregate totals. Sizes only count successfully compressed files.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize)]
pub struct BatchSummary {
    pub total_jobs: usize,
    pub processed: usize,
    pub failed: usize,
    pub skipped: usize,
    pub total_original_size: u64,
    pub total_compressed_size: u64,
    pub bytes_saved: i64,
    pub overall_ratio: f64,
    pub elapsed: Duration,
}

/// Outcome of a whole batch, one result per job in execution order.
#[derive(Debug, Clone, Default, Serialize)]
pub struct BatchReport {
    results: Vec<CompressionResult>,
    summary: BatchSummary,
    cancelled: bool,
}

impl BatchReport {
    pub fn new() -> Self {
        Self::default()
    }

    pub(crate) fn record(&mut self, result: CompressionResult) {
        let summary = &mut self.summary;
        summary.total_jobs += 1;
        match result.outcome {
            JobOutcome::Compressed { compressed_size } => {
                summary.processed += 1;
                summary.total_original_size += result.original_size;
                summary.total_compressed_size += compressed_size;
                summary.bytes_saved = summary.total_original_size as i64 - summary.total_compressed_size as i64;
                summary.overall_ratio =
                    calculate_compression_ratio(summary.total_original_size, summary.total_compressed_size);
            }
            JobOutcome::Failed(_) => summary.failed += 1,
            JobOutcome::Skipped => summary.skipped += 1,
        }
        self.results.push(result);
    }

    pub(crate) fn finish(&mut self, elapsed: Duration, cancelled: bool) {
        self.summary.elapsed = elapsed;
        self.cancelled = cancelled;
    }

    pub fn results(&self) -> &[CompressionResult] {
        &self.results
    }

    pub fn summary(&self) -> &BatchSummary {
        &self.summary
    }

    pub fn len(&self) -> usize {
        self.results.len()
    }

    pub fn is_empty(&self) -> bool {
        self.results.is_empty()
    }

    pub fn processed(&self) -> usize {
        self.summary.processed
    }

    pub fn failed(&self) -> usize {
        self.summary.failed
    }

    pub fn skipped(&self) -> usize {
        self.summary.skipped
    }

    pub fn total_original_size(&self) -> u64 {
        self.summary.total_original_size
    }

    pub fn total_compressed_size(&self) -> u64 {
        self.summary.total_compressed_size
    }

    pub fn bytes_saved(&self) -> i64 {
        self.summary.bytes_saved
    }

    pub fn overall_ratio(&self) -> f64 {
        self.summary.overall_ratio
    }

    pub fn elapsed(&self) -> Duration {
        self.summary.elapsed
    }

    pub fn is_cancelled(&self) -> bool {
        self.cancelled
    }

    pub fn has_failures(&self) -> bool {
        self.summary.failed > 0
    }

    pub fn failures(&self) -> impl Iterator<Item = &CompressionResult> {
        self.results.iter().filter(|r| r.error().is_some())
    }

    pub fn to_json(&self) -> serde_json::Result<String> {
        serde_json::to_string_pretty(self)
    }

    /// Human-readable summary for the console
    pub fn render_summary(&self) -> String {
        let s = &self.summary;
        let mut out = String::new();

        out.push_str("\n📊 Batch Compression Summary:\n");
        out.push_str(&format!("  {} Successful: {}\n", SUCCESS_PREFIX, s.processed));
        out.push_str(&format!("  {} Failed: {}\n", ERROR_PREFIX, s.failed));
        if s.skipped > 0 {
            out.push_str(&format!("  {}  Skipped (stopped): {}\n", WARNING_PREFIX, s.skipped));
        }
        out.push_str(&format!(
            "  {} {}\n",
            ORIGINAL_SIZE_PREFIX,
            format_file_size(s.total_original_size)
        ));
        out.push_str(&format!(
            "  {} {}\n",
            COMPRESSED_SIZE_PREFIX,
            format_file_size(s.total_compressed_size)
        ));
        if s.total_original_size > 0 {
            out.push_str(&format!("  {} {:.1}%\n", COMPRESSION_RATIO_PREFIX, s.overall_ratio));
        }
        out.push_str(&format!("  ⏱️  Total time: {:.2?}\n", s.elapsed));

        if s.failed > 0 {
            out.push_str("\n  Failed files:\n");
            for result in self.failures() {
                if let Some(err) = result.error() {
                    out.push_str(&format!(
                        "    {} {} [{}] {}\n",
                        ERROR_PREFIX,
                        result.job.input.display(),
                        err.kind,
                        err.message
                    ));
                }
            }
        }
        out
    }

    pub fn print_summary(&self) {
        print!("{}", self.render_summary());
    }
}

/// What a failed job means for the process exit status.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, clap::ValueEnum)]
pub enum FailurePolicy {
    /// Exit non-zero when any job failed
    #[default]
    Fail,
    /// Report failures but exit zero
    Warn,
}

impl FailurePolicy {
    pub fn should_fail(&self, report: &BatchReport) -> bool {
        match self {
            FailurePolicy::Fail => report.has_failures(),
            FailurePolicy::Warn => false,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::CompressionError;
    use crate::formats::OutputFormat;
    use crate::job::CompressionJob;
    use crate::method::Method;
    use std::path::PathBuf;

    fn job(name: &str) -> CompressionJob {
        CompressionJob {
            input: PathBuf::from(format!("in/{}.png", name)),
            output: PathBuf::from(format!("out/{}_compressed.jpg", name)),
            method: Method::JpegQuality { quality: 80 },
            output_format: OutputFormat::Jpeg,
        }
    }

    fn sample_report() -> BatchReport {
        let mut report = BatchReport::new();
        report.record(CompressionResult::compressed(job("a"), 1000, 600, Duration::from_millis(5)));
        report.record(CompressionResult::compressed(job("b"), 1000, 400, Duration::from_millis(5)));
        let err = CompressionError::decode("in/c.png", "bad header");
        report.record(CompressionResult::failed(job("c"), 50, &err, Duration::from_millis(1)));
        report.finish(Duration::from_millis(20), false);
        report
    }

    #[test]
    fn test_aggregates() {
        let report = sample_report();

        assert_eq!(report.len(), 3);
        assert_eq!(report.processed(), 2);
        assert_eq!(report.failed(), 1);
        assert_eq!(report.skipped(), 0);
        assert_eq!(report.total_original_size(), 2000);
        assert_eq!(report.total_compressed_size(), 1000);
        assert_eq!(report.bytes_saved(), 1000);
        assert_eq!(report.overall_ratio(), 50.0);
        assert!(report.has_failures());
        assert_eq!(report.failures().count(), 1);
    }

    #[test]
    fn test_bytes_saved_can_be_negative() {
        let mut report = BatchReport::new();
        report.record(CompressionResult::compressed(job("a"), 100, 150, Duration::ZERO));
        assert_eq!(report.bytes_saved(), -50);
        assert_eq!(report.overall_ratio(), -50.0);
    }

    #[test]
    fn test_skipped_counted_separately() {
        let mut report = BatchReport::new();
        report.record(CompressionResult::skipped(job("a")));
        report.finish(Duration::ZERO, true);

        assert_eq!(report.skipped(), 1);
        assert_eq!(report.processed(), 0);
        assert!(!report.has_failures());
        assert!(report.is_cancelled());
    }

    #[test]
    fn test_failure_policy() {
        let report = sample_report();
        assert!(FailurePolicy::Fail.should_fail(&report));
        assert!(!FailurePolicy::Warn.should_fail(&report));
        assert!(!FailurePolicy::Fail.should_fail(&BatchReport::new()));
    }

    #[test]
    fn test_render_summary_lists_failures() {
        let text = sample_report().render_summary();
        assert!(text.contains("Successful: 2"));
        assert!(text.contains("Failed: 1"));
        assert!(text.contains("50.0%"));
        assert!(text.contains("in/c.png"));
        assert!(text.contains("DecodeError"));
    }

    #[test]
    fn test_json_report() {
        let json = sample_report().to_json().unwrap();
        let value: serde_json::Value = serde_json::from_str(&json).unwrap();

        assert_eq!(value["summary"]["processed"], 2);
        assert_eq!(value["summary"]["failed"], 1);
        assert_eq!(value["results"].as_array().unwrap().len(), 3);
        assert_eq!(value["results"][2]["outcome"]["status"], "failed");
        assert_eq!(value["results"][2]["outcome"]["kind"], "DecodeError");
        assert_eq!(value["results"][0]["job"]["method"]["method"], "jpeg-quality");
    }
}
