use crate::constants::{BLUR_QUALITY_STEP, DEFAULT_QUALITY, MIN_BLUR_KERNEL, OXIPNG_MAX_PRESET};
use crate::error::{CompressionError, Result};
use crate::formats::{OutputFormat, SourceFormat};
use crate::job::{CompressionJob, CompressionResult};
use crate::method::Bounds;
use image::codecs::jpeg::JpegEncoder;
use image::codecs::png::PngEncoder;
use image::imageops::FilterType;
use image::{DynamicImage, GenericImageView, ImageError, ImageReader};
use oxipng::{Options, StripChunks};
use std::borrow::Cow;
use std::fs;
use std::path::{Path, PathBuf};
use std::time::Instant;

/// Runs one job and turns its outcome into a result. Errors stop at this
/// boundary.
pub fn compress_job(job: &CompressionJob) -> CompressionResult {
    let start = Instant::now();
    match process_image_pipeline(job) {
        Ok((original_size, compressed_size)) => {
            CompressionResult::compressed(job.clone(), original_size, compressed_size, start.elapsed())
        }
        Err(e) => {
            let original_size = fs::metadata(&job.input).map(|m| m.len()).unwrap_or(0);
            CompressionResult::failed(job.clone(), original_size, &e, start.elapsed())
        }
    }
}

/// Core image processing pipeline that handles the common workflow:
/// load -> transform -> encode -> save
///
/// # Arguments
/// * `job` - The resolved job (input, output, method, target format)
///
/// # Returns
/// * `Ok((original_size, compressed_size))` - Tuple of file sizes in bytes
/// * `Err(CompressionError)` - If any processing step fails; nothing is
///   written in that case
pub fn process_image_pipeline(job: &CompressionJob) -> Result<(u64, u64)> {
    let (img, original_size) = load_image_with_metadata(&job.input)?;
    crate::verbose!(
        "Loaded {:?}: {}x{}, {} bytes",
        job.input,
        img.width(),
        img.height(),
        original_size
    );

    let img = job.method.transform(img);
    let quality = job.method.quality().unwrap_or(DEFAULT_QUALITY);
    let bytes = encode_image(&img, job.output_format, quality)?;

    let compressed_size = write_output(&job.output, &bytes)?;
    Ok((original_size, compressed_size))
}

/// Loads an image file and returns it along with its size on disk.
///
/// The extension must be a supported source format. Content sniffing takes
/// precedence over the extension when decoding.
pub fn load_image_with_metadata(input_path: &Path) -> Result<(DynamicImage, u64)> {
    if SourceFormat::from_path(input_path).is_none() {
        return Err(CompressionError::UnsupportedFormat(format!(
            "{} is not a supported input (jpg, jpeg, png, bmp, tif, tiff, webp)",
            input_path.display()
        )));
    }

    let file_size = fs::metadata(input_path)
        .map_err(|e| CompressionError::decode(input_path, e.to_string()))?
        .len();

    let img = ImageReader::open(input_path)
        .and_then(|reader| reader.with_guessed_format())
        .map_err(|e| CompressionError::decode(input_path, e.to_string()))?
        .decode()
        .map_err(|e| match e {
            ImageError::Unsupported(u) => CompressionError::UnsupportedFormat(u.to_string()),
            other => CompressionError::decode(input_path, other.to_string()),
        })?;

    Ok((img, file_size))
}

/// Largest size that fits inside `bounds` with the same aspect ratio.
/// Never upscales; the limiting side lands exactly on its bound.
pub fn fit_within(width: u32, height: u32, bounds: Bounds) -> (u32, u32) {
    if width <= bounds.max_width && height <= bounds.max_height {
        return (width, height);
    }

    let (w, h) = (width as u64, height as u64);
    let (max_w, max_h) = (bounds.max_width as u64, bounds.max_height as u64);

    // max_w / w <= max_h / h, without floating point
    if max_w * h <= max_h * w {
        let new_h = ((h * max_w + w / 2) / w).clamp(1, max_h);
        (max_w as u32, new_h as u32)
    } else {
        let new_w = ((w * max_h + h / 2) / h).clamp(1, max_w);
        (new_w as u32, max_h as u32)
    }
}

pub fn resize_to_fit(img: DynamicImage, bounds: Bounds) -> DynamicImage {
    let (width, height) = img.dimensions();
    let (new_width, new_height) = fit_within(width, height, bounds);
    if (new_width, new_height) == (width, height) {
        return img;
    }
    crate::verbose!("Resizing {}x{} -> {}x{}", width, height, new_width, new_height);
    img.resize_exact(new_width, new_height, FilterType::Lanczos3)
}

/// Odd Gaussian kernel size for the Advanced-Lossy blur; lower quality
/// means a wider kernel.
pub fn blur_kernel_size(quality: u8) -> u32 {
    let k = ((100 - quality.min(100)) / BLUR_QUALITY_STEP).max(1) as u32;
    let k = if k % 2 == 0 { k + 1 } else { k };
    k.max(MIN_BLUR_KERNEL)
}

/// Sigma for a kernel of size `k`, as OpenCV derives it when none is given.
pub fn kernel_sigma(kernel_size: u32) -> f32 {
    0.3 * ((kernel_size as f32 - 1.0) * 0.5 - 1.0) + 0.8
}

pub fn soften(img: &DynamicImage, quality: u8) -> DynamicImage {
    let kernel = blur_kernel_size(quality);
    let sigma = kernel_sigma(kernel);
    crate::verbose!("Blurring with {}x{} kernel (sigma {:.2})", kernel, kernel, sigma);
    img.blur(sigma)
}

pub fn encode_image(img: &DynamicImage, format: OutputFormat, quality: u8) -> Result<Vec<u8>> {
    match format {
        OutputFormat::Jpeg => encode_jpeg(img, quality),
        OutputFormat::Png => encode_png(img),
        OutputFormat::WebP => encode_webp(img, quality),
    }
}

fn encode_error(format: OutputFormat, reason: impl ToString) -> CompressionError {
    CompressionError::Encode {
        format: format.to_string(),
        reason: reason.to_string(),
    }
}

fn encode_jpeg(img: &DynamicImage, quality: u8) -> Result<Vec<u8>> {
    // JPEG has no alpha and no 16-bit mode
    let rgb = img.to_rgb8();
    let mut buf = Vec::new();
    rgb.write_with_encoder(JpegEncoder::new_with_quality(&mut buf, quality))
        .map_err(|e| encode_error(OutputFormat::Jpeg, e))?;
    Ok(buf)
}

fn encode_png(img: &DynamicImage) -> Result<Vec<u8>> {
    let img: Cow<'_, DynamicImage> = match img {
        DynamicImage::ImageRgb32F(_) => Cow::Owned(DynamicImage::ImageRgb16(img.to_rgb16())),
        DynamicImage::ImageRgba32F(_) => Cow::Owned(DynamicImage::ImageRgba16(img.to_rgba16())),
        _ => Cow::Borrowed(img),
    };

    let mut raw = Vec::new();
    img.write_with_encoder(PngEncoder::new(&mut raw))
        .map_err(|e| encode_error(OutputFormat::Png, e))?;

    let mut options = Options::from_preset(OXIPNG_MAX_PRESET);
    options.strip = StripChunks::Safe;
    oxipng::optimize_from_memory(&raw, &options)
        .map_err(|e| CompressionError::PngOptimization(e.to_string()))
}

fn encode_webp(img: &DynamicImage, quality: u8) -> Result<Vec<u8>> {
    let encoded = if img.color().has_alpha() {
        let rgba = img.to_rgba8();
        webp::Encoder::from_rgba(rgba.as_raw(), rgba.width(), rgba.height())
            .encode_simple(false, quality as f32)
    } else {
        let rgb = img.to_rgb8();
        webp::Encoder::from_rgb(rgb.as_raw(), rgb.width(), rgb.height())
            .encode_simple(false, quality as f32)
    };

    encoded
        .map(|memory| memory.to_vec())
        .map_err(|e| encode_error(OutputFormat::WebP, format!("{:?}", e)))
}

/// Writes `bytes` to `output`, going through a sibling `.part` file so a
/// failed write never leaves a truncated output behind.
pub fn write_output(output: &Path, bytes: &[u8]) -> Result<u64> {
    let write_error = |source: std::io::Error| CompressionError::Write {
        path: output.to_path_buf(),
        source,
    };

    if let Some(parent) = output.parent().filter(|p| !p.as_os_str().is_empty()) {
        fs::create_dir_all(parent).map_err(write_error)?;
    }

    struct PartialFileGuard(PathBuf);
    impl Drop for PartialFileGuard {
        fn drop(&mut self) {
            let _ = fs::remove_file(&self.0);
        }
    }

    let mut partial_name = output.as_os_str().to_owned();
    partial_name.push(".part");
    let partial = PathBuf::from(partial_name);
    let _guard = PartialFileGuard(partial.clone());

    fs::write(&partial, bytes).map_err(write_error)?;
    fs::rename(&partial, output).map_err(write_error)?;

    Ok(bytes.len() as u64)
}
