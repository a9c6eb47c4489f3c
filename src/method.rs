//! Compression methods and the registry that resolves them by name.

use crate::constants::{DEFAULT_MAX_HEIGHT, DEFAULT_MAX_WIDTH, DEFAULT_QUALITY};
use crate::error::{CompressionError, Result};
use crate::formats::{OutputFormat, SourceFormat};
use crate::processing::{resize_to_fit, soften};
use crate::validation::{validate_dimension, validate_quality};
use image::DynamicImage;
use serde::Serialize;
use std::collections::HashMap;
use std::fmt;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "kebab-case")]
pub enum MethodKind {
    JpegQuality,
    PngOptimize,
    WebpConvert,
    SizeReduction,
    AdvancedLossy,
}

impl MethodKind {
    pub const ALL: [MethodKind; 5] = [
        MethodKind::JpegQuality,
        MethodKind::PngOptimize,
        MethodKind::WebpConvert,
        MethodKind::SizeReduction,
        MethodKind::AdvancedLossy,
    ];

    /// Canonical command-line name
    pub fn name(&self) -> &'static str {
        match self {
            MethodKind::JpegQuality => "jpeg-quality",
            MethodKind::PngOptimize => "png-optimize",
            MethodKind::WebpConvert => "webp-convert",
            MethodKind::SizeReduction => "size-reduction",
            MethodKind::AdvancedLossy => "advanced-lossy",
        }
    }

    pub fn display_name(&self) -> &'static str {
        match self {
            MethodKind::JpegQuality => "JPEG Quality",
            MethodKind::PngOptimize => "PNG Optimization",
            MethodKind::WebpConvert => "WebP Conversion",
            MethodKind::SizeReduction => "Size Reduction",
            MethodKind::AdvancedLossy => "Advanced Lossy",
        }
    }

    pub fn description(&self) -> &'static str {
        match self {
            MethodKind::JpegQuality => "Re-encode as JPEG at the given quality",
            MethodKind::PngOptimize => "Re-encode as PNG with maximum oxipng optimization, strip metadata",
            MethodKind::WebpConvert => "Convert to lossy WebP at the given quality",
            MethodKind::SizeReduction => "Downscale to fit max width/height, keep the source format",
            MethodKind::AdvancedLossy => "Blur to drop fine detail, then JPEG at the given quality",
        }
    }

    pub fn aliases(&self) -> &'static [&'static str] {
        match self {
            MethodKind::JpegQuality => &["jpeg", "jpg"],
            MethodKind::PngOptimize => &["png"],
            MethodKind::WebpConvert => &["webp"],
            MethodKind::SizeReduction => &["resize"],
            MethodKind::AdvancedLossy => &["lossy"],
        }
    }

    pub fn accepts_bounds(&self) -> bool {
        matches!(self, MethodKind::SizeReduction | MethodKind::AdvancedLossy)
    }
}

impl fmt::Display for MethodKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.display_name())
    }
}

/// Upper limits for a downscale; both are at least one pixel.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct Bounds {
    pub max_width: u32,
    pub max_height: u32,
}

impl Bounds {
    pub fn new(max_width: u32, max_height: u32) -> Result<Self> {
        Ok(Self {
            max_width: validate_dimension("max width", max_width)?,
            max_height: validate_dimension("max height", max_height)?,
        })
    }
}

impl Default for Bounds {
    fn default() -> Self {
        Self {
            max_width: DEFAULT_MAX_WIDTH,
            max_height: DEFAULT_MAX_HEIGHT,
        }
    }
}

/// Raw, unvalidated parameters as collected by a front-end.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MethodParams {
    pub quality: u8,
    pub max_width: Option<u32>,
    pub max_height: Option<u32>,
}

impl Default for MethodParams {
    fn default() -> Self {
        Self {
            quality: DEFAULT_QUALITY,
            max_width: None,
            max_height: None,
        }
    }
}

impl MethodParams {
    fn bounds(&self) -> Result<Option<Bounds>> {
        if self.max_width.is_none() && self.max_height.is_none() {
            return Ok(None);
        }
        Bounds::new(
            self.max_width.unwrap_or(DEFAULT_MAX_WIDTH),
            self.max_height.unwrap_or(DEFAULT_MAX_HEIGHT),
        )
        .map(Some)
    }
}

/// A fully resolved compression method. Each case carries only the
/// parameters it uses.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(tag = "method", rename_all = "kebab-case")]
pub enum Method {
    JpegQuality { quality: u8 },
    PngOptimize,
    WebpConvert { quality: u8 },
    SizeReduction { quality: u8, bounds: Bounds },
    AdvancedLossy { quality: u8, bounds: Option<Bounds> },
}

impl Method {
    /// Build a method from raw parameters.
    ///
    /// Quality is always range-checked, even for PNG where it is unused.
    /// Max dimensions are rejected for methods that never resize.
    pub fn new(kind: MethodKind, params: &MethodParams) -> Result<Self> {
        let quality = validate_quality(params.quality)?;
        let bounds = params.bounds()?;

        if bounds.is_some() && !kind.accepts_bounds() {
            return Err(CompressionError::config(format!(
                "{} does not take --max-width/--max-height; use size-reduction or advanced-lossy",
                kind.name()
            )));
        }

        Ok(match kind {
            MethodKind::JpegQuality => Method::JpegQuality { quality },
            MethodKind::PngOptimize => Method::PngOptimize,
            MethodKind::WebpConvert => Method::WebpConvert { quality },
            MethodKind::SizeReduction => Method::SizeReduction {
                quality,
                bounds: bounds.unwrap_or_default(),
            },
            MethodKind::AdvancedLossy => Method::AdvancedLossy { quality, bounds },
        })
    }

    pub fn kind(&self) -> MethodKind {
        match self {
            Method::JpegQuality { .. } => MethodKind::JpegQuality,
            Method::PngOptimize => MethodKind::PngOptimize,
            Method::WebpConvert { .. } => MethodKind::WebpConvert,
            Method::SizeReduction { .. } => MethodKind::SizeReduction,
            Method::AdvancedLossy { .. } => MethodKind::AdvancedLossy,
        }
    }

    /// Encoder quality; PNG is lossless and has none.
    pub fn quality(&self) -> Option<u8> {
        match *self {
            Method::JpegQuality { quality }
            | Method::WebpConvert { quality }
            | Method::SizeReduction { quality, .. }
            | Method::AdvancedLossy { quality, .. } => Some(quality),
            Method::PngOptimize => None,
        }
    }

    pub fn bounds(&self) -> Option<Bounds> {
        match *self {
            Method::SizeReduction { bounds, .. } => Some(bounds),
            Method::AdvancedLossy { bounds, .. } => bounds,
            _ => None,
        }
    }

    /// Target encoding for an input of the given format.
    pub fn output_format(&self, source: Option<SourceFormat>) -> OutputFormat {
        match self {
            Method::JpegQuality { .. } | Method::AdvancedLossy { .. } => OutputFormat::Jpeg,
            Method::PngOptimize => OutputFormat::Png,
            Method::WebpConvert { .. } => OutputFormat::WebP,
            Method::SizeReduction { .. } => source
                .and_then(|s| s.native_output())
                .unwrap_or(OutputFormat::Jpeg),
        }
    }

    /// Pixel-level transform applied before encoding.
    pub fn transform(&self, img: DynamicImage) -> DynamicImage {
        match *self {
            Method::JpegQuality { .. } | Method::PngOptimize | Method::WebpConvert { .. } => img,
            Method::SizeReduction { bounds, .. } => resize_to_fit(img, bounds),
            Method::AdvancedLossy { quality, bounds } => {
                let img = match bounds {
                    Some(bounds) => resize_to_fit(img, bounds),
                    None => img,
                };
                soften(&img, quality)
            }
        }
    }
}

impl fmt::Display for Method {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.kind())?;
        if let Some(quality) = self.quality() {
            write!(f, " (quality {}", quality)?;
            if let Some(bounds) = self.bounds() {
                write!(f, ", max {}x{}", bounds.max_width, bounds.max_height)?;
            }
            write!(f, ")")?;
        }
        Ok(())
    }
}

/// Immutable name -> method lookup, built once at startup and handed to the
/// dispatcher.
#[derive(Debug, Clone)]
pub struct MethodRegistry {
    by_name: HashMap<String, MethodKind>,
    kinds: Vec<MethodKind>,
}

impl MethodRegistry {
    /// Registry with all five methods under their canonical names, short
    /// aliases and display names.
    pub fn standard() -> Self {
        let mut by_name = HashMap::new();
        for kind in MethodKind::ALL {
            by_name.insert(normalize(kind.name()), kind);
            by_name.insert(normalize(kind.display_name()), kind);
            for alias in kind.aliases() {
                by_name.insert(normalize(alias), kind);
            }
        }
        Self {
            by_name,
            kinds: MethodKind::ALL.to_vec(),
        }
    }

    pub fn lookup(&self, name: &str) -> Result<MethodKind> {
        self.by_name
            .get(&normalize(name))
            .copied()
            .ok_or_else(|| CompressionError::UnknownMethod(name.to_string()))
    }

    pub fn resolve(&self, name: &str, params: &MethodParams) -> Result<Method> {
        Method::new(self.lookup(name)?, params)
    }

    pub fn kinds(&self) -> &[MethodKind] {
        &self.kinds
    }
}

fn normalize(name: &str) -> String {
    name.trim()
        .to_lowercase()
        .chars()
        .map(|c| if c == ' ' || c == '_' { '-' } else { c })
        .collect()
}
