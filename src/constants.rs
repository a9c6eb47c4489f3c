pub const DEFAULT_QUALITY: u8 = 85;
pub const MIN_QUALITY: u8 = 1;
pub const MAX_QUALITY: u8 = 100;

pub const DEFAULT_MAX_WIDTH: u32 = 1920;
pub const DEFAULT_MAX_HEIGHT: u32 = 1080;

pub const DEFAULT_OUTPUT_SUFFIX: &str = "_compressed";

/// Highest oxipng preset.
pub const OXIPNG_MAX_PRESET: u8 = 6;

// Advanced-Lossy blur kernel: k = (100 - quality) / BLUR_QUALITY_STEP, odd, >= MIN_BLUR_KERNEL
pub const BLUR_QUALITY_STEP: u8 = 20;
pub const MIN_BLUR_KERNEL: u32 = 3;

pub const SUPPORTED_IMAGE_EXTENSIONS: &[&str] = &["jpg", "jpeg", "png", "bmp", "tif", "tiff", "webp"];

pub const PROGRESS_BAR_TEMPLATE: &str =
    "{spinner:.green} [{elapsed_precise}] [{bar:40.cyan/blue}] {pos}/{len} {msg}";

// Common output message prefixes
pub const ORIGINAL_SIZE_PREFIX: &str = "📊 Total original size:";
pub const COMPRESSED_SIZE_PREFIX: &str = "📈 Total compressed size:";
pub const COMPRESSION_RATIO_PREFIX: &str = "🎯 Overall compression:";
pub const SUCCESS_PREFIX: &str = "✅";
pub const WARNING_PREFIX: &str = "⚠️";
pub const ERROR_PREFIX: &str = "❌";
