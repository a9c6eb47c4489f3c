use crate::batch::BatchConfig;
use crate::constants::{DEFAULT_OUTPUT_SUFFIX, DEFAULT_QUALITY};
use crate::method::MethodParams;
use crate::report::FailurePolicy;
use clap::Parser;
use std::path::PathBuf;

#[derive(Parser, Debug)]
#[command(
    name = "img-compress",
    version,
    about = "Batch image compressor: JPEG quality, PNG optimization, WebP conversion, resizing and blur-assisted lossy compression",
    long_about = "img-compress walks a file or directory, applies one compression method to every \
                  supported image (jpg, jpeg, png, bmp, tif, tiff, webp) and writes the results under \
                  the output directory, mirroring the input layout. A per-file and overall report is \
                  printed at the end.",
    after_help = "EXAMPLES:\n  \
    img-compress photo.png -o out -m jpeg-quality -q 80\n  \
    img-compress ./images -o ./compressed -r -m webp -q 75\n  \
    img-compress ./scans -o ./small -m size-reduction --max-width 1280 --max-height 720\n  \
    img-compress ./images -o ./out --json --on-failure warn\n  \
    img-compress --list-methods"
)]
pub struct Args {
    #[arg(
        help = "Input image file or directory",
        required_unless_present = "list_methods"
    )]
    pub input: Option<PathBuf>,

    #[arg(
        short = 'o',
        long,
        value_name = "DIR",
        help = "Output directory (created if missing)",
        required_unless_present = "list_methods"
    )]
    pub output: Option<PathBuf>,

    #[arg(
        short = 'm',
        long,
        env = "IMG_COMPRESS_METHOD",
        default_value = "jpeg-quality",
        help = "Compression method (see --list-methods)",
        long_help = "Compression method: jpeg-quality, png-optimize, webp-convert, size-reduction, \
                     advanced-lossy. Short aliases (jpeg, png, webp, resize, lossy) and display \
                     names such as \"JPEG Quality\" are accepted too."
    )]
    pub method: String,

    #[arg(
        short = 'q',
        long,
        env = "IMG_COMPRESS_QUALITY",
        default_value_t = DEFAULT_QUALITY,
        help = "Quality (1-100)",
        long_help = "Encoder quality from 1 (smallest) to 100 (best). Ignored by png-optimize, \
                     which is lossless, but still validated. For advanced-lossy lower values also \
                     widen the blur kernel."
    )]
    pub quality: u8,

    #[arg(
        long,
        value_name = "PIXELS",
        help = "Maximum width (size-reduction, advanced-lossy)",
        long_help = "Maximum output width. size-reduction defaults to 1920 when omitted; \
                     advanced-lossy only resizes when a bound is given. Other methods reject it."
    )]
    pub max_width: Option<u32>,

    #[arg(
        long,
        value_name = "PIXELS",
        help = "Maximum height (size-reduction, advanced-lossy)",
        long_help = "Maximum output height. size-reduction defaults to 1080 when omitted; \
                     advanced-lossy only resizes when a bound is given. Other methods reject it."
    )]
    pub max_height: Option<u32>,

    #[arg(short = 'r', long, help = "Process subdirectories recursively")]
    pub recursive: bool,

    #[arg(
        long,
        default_value = DEFAULT_OUTPUT_SUFFIX,
        help = "Suffix appended to output file names"
    )]
    pub suffix: String,

    #[arg(
        long,
        value_enum,
        default_value_t = FailurePolicy::Fail,
        help = "Exit status when some files fail",
        long_help = "fail: exit with status 1 if any file failed. \
                     warn: report failures but exit 0."
    )]
    pub on_failure: FailurePolicy,

    #[arg(long, help = "Print the report as JSON on stdout")]
    pub json: bool,

    #[arg(long, help = "List available compression methods and exit")]
    pub list_methods: bool,

    #[arg(long, conflicts_with = "verbose", help = "Only print errors")]
    pub quiet: bool,

    #[arg(short = 'v', long, help = "Print per-file details")]
    pub verbose: bool,
}

impl Args {
    /// Batch configuration from the parsed flags; `None` when input or
    /// output is missing (only possible with `--list-methods`).
    pub fn batch_config(&self) -> Option<BatchConfig> {
        Some(BatchConfig {
            input: self.input.clone()?,
            output_dir: self.output.clone()?,
            method: self.method.clone(),
            params: MethodParams {
                quality: self.quality,
                max_width: self.max_width,
                max_height: self.max_height,
            },
            recursive: self.recursive,
            suffix: self.suffix.clone(),
        })
    }
}
