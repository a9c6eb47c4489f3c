pub mod batch;
pub mod cli;
pub mod constants;
pub mod error;
pub mod formats;
pub mod job;
pub mod logger;
pub mod method;
pub mod processing;
pub mod report;
pub mod utils;
pub mod validation;

pub use batch::{
    collect_image_files, generate_output_path, plan_jobs, BatchConfig, BatchDispatcher, BatchPlan,
    NoProgress, ProgressObserver, StopHandle,
};
pub use error::{CompressionError, ErrorKind, Result};
pub use formats::{is_image_file, OutputFormat, SourceFormat};
pub use job::{CompressionJob, CompressionResult, JobError, JobOutcome};
pub use method::{Bounds, Method, MethodKind, MethodParams, MethodRegistry};
pub use processing::{compress_job, encode_image, fit_within, load_image_with_metadata};
pub use report::{BatchReport, BatchSummary, FailurePolicy};
